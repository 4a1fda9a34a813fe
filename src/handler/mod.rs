//! Request handler module
//!
//! Exact-path routing for resource calls and the handlers behind each route.

pub mod resources;
pub mod router;

// Re-export main entry points
pub use resources::{echo, ping, prometheus_rules};
pub use router::{resolve, ResourceRoute};
