//! Staff user domain entities.

pub mod model;
pub mod role;

pub use model::{CreateStaffUser, StaffPatch, StaffUser};
pub use role::Role;
