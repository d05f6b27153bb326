//! Repository implementations, one per entity.
//!
//! Methods are associated functions taking `&mut SqliteConnection` so that
//! every query joins whatever transaction the caller is holding.

pub mod client;
pub mod contract;
pub mod event;
pub mod staff;
pub mod unique;

pub use client::ClientRepository;
pub use contract::ContractRepository;
pub use event::EventRepository;
pub use staff::StaffRepository;
