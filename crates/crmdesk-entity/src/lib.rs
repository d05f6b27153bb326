//! # crmdesk-entity
//!
//! Domain entity models for CrmDesk. Every row struct in this crate
//! represents a database table row; each entity also defines its
//! create-request struct and its sparse [`Patch`] type. All row structs
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and `sqlx::FromRow`.

pub mod client;
pub mod contract;
pub mod event;
pub mod kind;
pub mod patch;
pub mod staff;

pub use client::{Client, ClientPatch, CreateClient};
pub use contract::{Contract, ContractPatch, CreateContract};
pub use event::{CreateEvent, Event, EventPatch};
pub use kind::EntityKind;
pub use patch::{Patch, UniqueProbe};
pub use staff::{CreateStaffUser, Role, StaffPatch, StaffUser};
