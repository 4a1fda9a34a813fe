use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("failed to load in-cluster config: {0}")]
    InCluster(#[from] kube::config::InClusterError),

    #[error("failed to build kubernetes client: {0}")]
    Client(#[source] kube::Error),

    /// Rendered verbatim in the 500 response body
    #[error(transparent)]
    ListRules(kube::Error),
}
