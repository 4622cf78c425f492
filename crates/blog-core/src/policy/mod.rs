//! Visibility and authorization policy.

mod authorization;
mod visibility;

pub use authorization::{Action, Authored, authorize};
pub use visibility::{PostQuery, UncategorizedPolicy, Viewer, VisibilityPolicy};
