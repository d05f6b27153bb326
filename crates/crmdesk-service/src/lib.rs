//! # crmdesk-service
//!
//! Entity workflows for CrmDesk. Each service orchestrates the
//! authentication gates, ownership scopes, field policies, the patch
//! merger, and the repositories into the concrete mutation rules of the
//! system.
//!
//! Every mutating method takes an explicit [`crmdesk_database::UnitOfWork`]
//! and a [`RequestContext`]; nothing here opens its own transaction or
//! resolves its own identity.

pub mod auth;
pub mod client;
pub mod context;
pub mod contract;
pub mod event;
pub mod merge;
pub mod staff;

pub use auth::AuthService;
pub use client::{ClientService, CreateClientRequest};
pub use context::RequestContext;
pub use contract::{ContractService, CreateContractRequest};
pub use event::{CreateEventRequest, EventService};
pub use staff::{CreateStaffRequest, StaffService};
