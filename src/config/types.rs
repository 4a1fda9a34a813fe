// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub plugin: PluginConfig,
    pub kube: KubeConfig,
    pub prometheus: PrometheusConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Listen queue length
    pub backlog: i32,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Where the host mounts the plugin's capabilities
#[derive(Debug, Deserialize, Clone)]
pub struct PluginConfig {
    /// Prefix stripped before a request is handed to the resource router
    pub resource_prefix: String,
    /// Path answered by the plugin's health check
    pub health_path: String,
}

/// Kubernetes credential selection
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct KubeConfig {
    /// Load credentials from a kubeconfig file instead of the in-cluster service account
    pub local_kubeconfig: bool,
    /// Explicit kubeconfig path; standard lookup (`KUBECONFIG`, `~/.kube/config`) when unset
    #[serde(default)]
    pub kubeconfig_path: Option<String>,
}

/// Prometheus operator resources
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PrometheusConfig {
    /// Namespace the rule list is read from
    pub namespace: String,
}

/// Settings a plugin instance is created from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub kube: KubeConfig,
    pub prometheus: PrometheusConfig,
}
