//! Resource routing module
//!
//! Binds the fixed set of resource paths to routes. Matching is exact on the
//! URI path; no prefix, wildcard or parameter extraction.

/// Routes served by the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRoute {
    Ping,
    Echo,
    PrometheusRules,
}

/// Path table, one entry per route
const ROUTES: &[(&str, ResourceRoute)] = &[
    ("/ping", ResourceRoute::Ping),
    ("/echo", ResourceRoute::Echo),
    ("/prometheus/rules", ResourceRoute::PrometheusRules),
];

/// Find the route bound to `path`, `None` falls through to the host's 404
pub fn resolve(path: &str) -> Option<ResourceRoute> {
    ROUTES
        .iter()
        .find(|(bound, _)| *bound == path)
        .map(|(_, route)| *route)
}
