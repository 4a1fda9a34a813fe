//! Plugin instance module
//!
//! `App` owns the rule source for its lifetime and implements every capability
//! the host calls: resource calls, health checks and disposal.

mod error;

pub use error::AppError;

use async_trait::async_trait;
use std::sync::Arc;

use crate::cluster::{self, KubeRuleSource, RuleSource};
use crate::config::AppSettings;
use crate::handler::{self, ResourceRoute};
use crate::http;
use crate::logger;
use crate::plugin::{
    CallResourceHandler, CheckHealthHandler, CheckHealthRequest, CheckHealthResult,
    InstanceDisposer, ResourceRequest, ResourceResponse,
};

/// Backend instance serving the rule manager's resource routes
pub struct App {
    rules: Arc<dyn RuleSource>,
    namespace: String,
}

impl App {
    /// Create a new instance from its settings.
    ///
    /// Credential or client construction failures abort instance creation.
    pub async fn new(settings: &AppSettings) -> Result<Self, AppError> {
        let client = cluster::connect(&settings.kube).await?;
        let app = Self::with_rule_source(
            Arc::new(KubeRuleSource::new(client)),
            settings.prometheus.namespace.clone(),
        );
        logger::log_info(&format!(
            "[Plugin] Instance created, rule namespace: {}",
            app.namespace
        ));
        Ok(app)
    }

    pub fn with_rule_source(rules: Arc<dyn RuleSource>, namespace: impl Into<String>) -> Self {
        Self {
            rules,
            namespace: namespace.into(),
        }
    }
}

#[async_trait]
impl CallResourceHandler for App {
    async fn call_resource(&self, req: ResourceRequest) -> ResourceResponse {
        let Some(route) = handler::resolve(req.uri().path()) else {
            return http::build_404_response();
        };
        logger::log_debug(&format!("[Plugin] {} {} -> {route:?}", req.method(), req.uri()));

        match route {
            ResourceRoute::Ping => handler::ping(),
            ResourceRoute::Echo => handler::echo(req.method(), req.body()),
            ResourceRoute::PrometheusRules => {
                handler::prometheus_rules(self.rules.as_ref(), &self.namespace).await
            }
        }
    }
}

#[async_trait]
impl CheckHealthHandler for App {
    async fn check_health(&self, req: &CheckHealthRequest) -> CheckHealthResult {
        logger::log_debug(&format!(
            "[Plugin] Health check ({} headers)",
            req.headers.len()
        ));
        CheckHealthResult::ok("ok")
    }
}

impl InstanceDisposer for App {
    fn dispose(&self) {
        logger::log_info("[Plugin] Instance disposed");
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::cluster::RuleList;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory rule source recording the namespaces it was asked for
    pub struct FakeRuleSource {
        pub result: fn() -> Result<RuleList, AppError>,
        pub calls: AtomicUsize,
        pub namespaces: std::sync::Mutex<Vec<String>>,
    }

    impl FakeRuleSource {
        pub fn new(result: fn() -> Result<RuleList, AppError>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
                namespaces: std::sync::Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RuleSource for FakeRuleSource {
        async fn list_rules(&self, namespace: &str) -> Result<RuleList, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.namespaces.lock().unwrap().push(namespace.to_string());
            (self.result)()
        }
    }

    pub fn sample_rules() -> Result<RuleList, AppError> {
        Ok(serde_json::from_value(serde_json::json!({
            "apiVersion": "monitoring.coreos.com/v1",
            "kind": "PrometheusRuleList",
            "metadata": { "resourceVersion": "42" },
            "items": [{
                "apiVersion": "monitoring.coreos.com/v1",
                "kind": "PrometheusRule",
                "metadata": { "name": "node-alerts", "namespace": "opentelemetry" },
                "spec": {
                    "groups": [{
                        "name": "node",
                        "rules": [{
                            "alert": "HighLoad",
                            "expr": "node_load1 > 4",
                            "for": "5m",
                            "labels": { "severity": "warning" }
                        }]
                    }]
                }
            }]
        }))
        .expect("sample rule list must deserialize"))
    }

    pub fn forbidden() -> Result<RuleList, AppError> {
        let response: kube::core::ErrorResponse = serde_json::from_value(serde_json::json!({
            "status": "Failure",
            "message": "prometheusrules.monitoring.coreos.com is forbidden",
            "reason": "Forbidden",
            "code": 403
        }))
        .expect("error response must deserialize");
        Err(AppError::ListRules(kube::Error::Api(response)))
    }
}
