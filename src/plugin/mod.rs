//! Plugin capability module
//!
//! A host drives a plugin instance through three independent capabilities:
//! resource calls, health checks and disposal. A plugin type opts into each one
//! by implementing the matching trait; [`Plugin`] is the union the host stores.

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use serde::Serialize;

/// A resource call with its body already collected
pub type ResourceRequest = Request<Bytes>;

/// Response produced by a resource call
pub type ResourceResponse = Response<Full<Bytes>>;

/// Handles HTTP-style requests routed to the plugin's own resource surface
#[async_trait]
pub trait CallResourceHandler: Send + Sync {
    async fn call_resource(&self, req: ResourceRequest) -> ResourceResponse;
}

/// Coarse health status reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    // Reported by plugins that probe their dependencies
    #[allow(dead_code)]
    Error,
}

/// Health check request issued by the host
#[derive(Debug, Clone, Default)]
pub struct CheckHealthRequest {
    /// Headers of the inbound probe, lowercase names
    pub headers: Vec<(String, String)>,
}

/// Health check outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckHealthResult {
    pub status: HealthStatus,
    pub message: String,
}

impl CheckHealthResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Ok,
            message: message.into(),
        }
    }
}

/// Answers host-invoked liveness probes
#[async_trait]
pub trait CheckHealthHandler: Send + Sync {
    async fn check_health(&self, req: &CheckHealthRequest) -> CheckHealthResult;
}

/// Cleanup hook invoked when the host retires an instance
pub trait InstanceDisposer {
    fn dispose(&self);
}

/// Everything the host needs from a plugin instance
pub trait Plugin: CallResourceHandler + CheckHealthHandler + InstanceDisposer {}

impl<T> Plugin for T where T: CallResourceHandler + CheckHealthHandler + InstanceDisposer {}
