//! netsec controller
//!
//! Reconciles ClusterNetwork resources against the cloud firewall-group
//! API: per-role security groups are created and authorized to match the
//! declared network posture, and torn down when the cluster is deleted.

mod controller;
mod error;
mod reconciler;
mod scope;
mod watcher;

#[cfg(test)]
mod test_utils;

use crate::controller::Controller;
use crate::error::ControllerError;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting netsec controller");

    // Load configuration from environment variables
    let api_url = env::var("CLOUDSEC_API_URL")
        .unwrap_or_else(|_| "https://cloudsec.internal".to_string());
    let api_token = env::var("CLOUDSEC_API_TOKEN").map_err(|_| {
        ControllerError::InvalidConfig(
            "CLOUDSEC_API_TOKEN environment variable is required".to_string(),
        )
    })?;
    let namespace = env::var("WATCH_NAMESPACE").ok();

    info!("Configuration:");
    info!("  Cloud API URL: {}", api_url);
    info!(
        "  Namespace: {}",
        namespace.as_deref().unwrap_or("all namespaces")
    );

    // Initialize and run controller
    let controller = Controller::new(api_url, api_token, namespace).await?;
    controller.run().await?;

    Ok(())
}
