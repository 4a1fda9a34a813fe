// Configuration module entry point
// Loads application configuration and holds the runtime state shared by connections

mod state;
mod types;

use config::builder::DefaultState;
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{AppSettings, Config, KubeConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Environment variables use the `PROMRULES_` prefix and `__` between
    /// nested keys, e.g. `PROMRULES_KUBE__LOCAL_KUBECONFIG=true`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PROMRULES")
                    .prefix_separator("_")
                    .separator("__"),
            );
        Self::with_defaults(settings)?.build()?.try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<DefaultState>,
    ) -> Result<config::ConfigBuilder<DefaultState>, config::ConfigError> {
        builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.backlog", 128)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "prometheus-manager")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("plugin.resource_prefix", "/resources")?
            .set_default("plugin.health_path", "/health")?
            .set_default("kube.local_kubeconfig", false)?
            .set_default("prometheus.namespace", "opentelemetry")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Instance settings handed to the plugin factory
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            kube: self.kube.clone(),
            prometheus: self.prometheus.clone(),
        }
    }
}

#[cfg(test)]
impl Config {
    /// Configuration built from defaults only
    pub fn defaults() -> Self {
        Self::with_defaults(config::Config::builder())
            .and_then(|builder| builder.build())
            .and_then(config::Config::try_deserialize)
            .expect("defaults must deserialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.server.workers.is_none());
        assert_eq!(cfg.server.backlog, 128);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.logging.access_log_file.is_none());
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert_eq!(cfg.plugin.resource_prefix, "/resources");
        assert_eq!(cfg.plugin.health_path, "/health");
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_in_cluster_is_default_credential_source() {
        let settings = Config::defaults().app_settings();
        assert!(!settings.kube.local_kubeconfig);
        assert!(settings.kube.kubeconfig_path.is_none());
        assert_eq!(settings.prometheus.namespace, "opentelemetry");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let source = r#"
            [kube]
            local_kubeconfig = true
            kubeconfig_path = "/tmp/kubeconfig"

            [prometheus]
            namespace = "monitoring"
        "#;
        let builder = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml));
        let cfg: Config = Config::with_defaults(builder)
            .and_then(|builder| builder.build())
            .and_then(config::Config::try_deserialize)
            .expect("config must deserialize");

        assert!(cfg.kube.local_kubeconfig);
        assert_eq!(cfg.kube.kubeconfig_path.as_deref(), Some("/tmp/kubeconfig"));
        assert_eq!(cfg.prometheus.namespace, "monitoring");
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::defaults();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
