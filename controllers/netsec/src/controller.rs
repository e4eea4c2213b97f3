//! Main controller implementation.
//!
//! Wires the Kubernetes client, the cloud firewall API client and the
//! ClusterNetwork watcher together.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::watch_cluster_networks;
use cloudsec_client::{CloudSecClient, CloudSecClientTrait};
use crds::ClusterNetwork;
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Main controller for cluster network security management.
pub struct Controller {
    cluster_network_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(
        api_url: String,
        api_token: String,
        namespace: Option<String>,
    ) -> Result<Self, ControllerError> {
        info!("Initializing netsec controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await.map_err(ControllerError::Kube)?;

        // Create cloud API client
        let cloud_client =
            CloudSecClient::new(api_url.clone(), api_token).map_err(ControllerError::Cloud)?;

        // Validate token and connectivity before proceeding
        info!("Validating cloud API token and connectivity...");
        cloud_client.validate_credentials().await.map_err(|e| {
            error!("Failed to validate cloud API token: {}", e);
            error!("Please ensure:");
            error!("  1. CLOUDSEC_API_TOKEN environment variable is set correctly");
            error!("  2. The token is valid for the cloud account");
            error!("  3. The API is reachable at {}", api_url);
            ControllerError::Cloud(e)
        })?;
        info!("Cloud API token validated and connectivity established");

        let ns = namespace.as_deref().unwrap_or("default");
        let cluster_network_api: Api<ClusterNetwork> = Api::namespaced(kube_client, ns);

        let reconciler = Arc::new(Reconciler::new(cloud_client, cluster_network_api.clone()));
        let cluster_network_watcher =
            tokio::spawn(watch_cluster_networks(cluster_network_api, reconciler));

        Ok(Self {
            cluster_network_watcher,
        })
    }

    /// Runs the controller until its watcher stops.
    pub async fn run(self) -> Result<(), ControllerError> {
        match self.cluster_network_watcher.await {
            Ok(result) => result,
            Err(e) => Err(ControllerError::Watch(format!(
                "ClusterNetwork watcher task failed: {e}"
            ))),
        }
    }
}
