//! Role-based access control: the role gate and the per-role field policy.

pub mod fields;
pub mod gate;

pub use fields::FieldPolicy;
pub use gate::{require_authenticated, require_role};
