// Rule listing module
// Lists PrometheusRule custom resources through the monitoring API group

use async_trait::async_trait;
use kube::api::{Api, ApiResource, DynamicObject, ListParams};
use kube::core::{GroupVersionKind, ObjectList};
use kube::Client;

use crate::app::AppError;

/// Collection returned by the cluster, serialized without interpretation
pub type RuleList = ObjectList<DynamicObject>;

const RULE_GROUP: &str = "monitoring.coreos.com";
const RULE_VERSION: &str = "v1";
const RULE_KIND: &str = "PrometheusRule";

/// Source of custom rule resources
#[async_trait]
pub trait RuleSource: Send + Sync {
    async fn list_rules(&self, namespace: &str) -> Result<RuleList, AppError>;
}

/// `RuleSource` backed by the Kubernetes API server
pub struct KubeRuleSource {
    client: Client,
    resource: ApiResource,
}

impl KubeRuleSource {
    pub fn new(client: Client) -> Self {
        let gvk = GroupVersionKind::gvk(RULE_GROUP, RULE_VERSION, RULE_KIND);
        Self {
            client,
            resource: ApiResource::from_gvk(&gvk),
        }
    }
}

#[async_trait]
impl RuleSource for KubeRuleSource {
    async fn list_rules(&self, namespace: &str) -> Result<RuleList, AppError> {
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &self.resource);
        api.list(&ListParams::default())
            .await
            .map_err(AppError::ListRules)
    }
}
