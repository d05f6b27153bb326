//! # crmdesk-auth
//!
//! Authentication and authorization for CrmDesk.
//!
//! ## Modules
//!
//! - `jwt` — bearer credential creation and validation
//! - `password` — Argon2id password hashing and verification
//! - `principal` — the acting identity resolved for one request
//! - `session` — stored credential → live [`Principal`] resolution
//! - `rbac` — role gates and per-role field policies
//! - `scope` — per-record ownership predicates

pub mod jwt;
pub mod password;
pub mod principal;
pub mod rbac;
pub mod scope;
pub mod session;

pub use jwt::{Claims, TokenDecoder, TokenEncoder};
pub use password::PasswordHasher;
pub use principal::Principal;
pub use rbac::FieldPolicy;
pub use scope::OwnershipScope;
pub use session::SessionResolver;
