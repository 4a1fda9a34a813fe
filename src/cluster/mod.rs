//! Cluster API module
//!
//! Credential resolution and the rule listing seam over `kube`.

mod credentials;
mod rules;

pub use credentials::connect;
pub use rules::{KubeRuleSource, RuleList, RuleSource};
