//! # crmdesk-database
//!
//! SQLite connection management, schema migration, the transaction-scoped
//! [`UnitOfWork`], and concrete repository implementations for all CrmDesk
//! entities. Repository methods take `&mut SqliteConnection` so every
//! statement participates in the caller's transaction.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod uow;

pub use connection::DatabasePool;
pub use uow::UnitOfWork;
