// Credential resolution module
// Builds the kube client either from a kubeconfig file or the in-cluster service account

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;

use crate::app::AppError;
use crate::config::KubeConfig;
use crate::logger;

/// Resolve credentials and construct the client shared by every request
pub async fn connect(settings: &KubeConfig) -> Result<Client, AppError> {
    let config = load_client_config(settings).await?;
    logger::log_info(&format!("[Cluster] API server: {}", config.cluster_url));
    Client::try_from(config).map_err(AppError::Client)
}

async fn load_client_config(settings: &KubeConfig) -> Result<kube::Config, AppError> {
    if !settings.local_kubeconfig {
        logger::log_info("[Cluster] Using in-cluster service account credentials");
        return Ok(kube::Config::incluster()?);
    }

    let options = KubeConfigOptions::default();
    let config = match settings.kubeconfig_path.as_deref() {
        Some(path) => {
            logger::log_info(&format!("[Cluster] Using kubeconfig: {path}"));
            let kubeconfig = Kubeconfig::read_from(path)?;
            kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?
        }
        None => {
            logger::log_info("[Cluster] Using kubeconfig from KUBECONFIG or ~/.kube/config");
            kube::Config::from_kubeconfig(&options).await?
        }
    };
    Ok(config)
}
