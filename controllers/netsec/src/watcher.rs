//! ClusterNetwork watcher.
//!
//! Watches ClusterNetwork resources with `kube_runtime::Controller` and a
//! finalizer, so applying a resource converges its security groups and
//! deleting it runs the teardown engine before the object disappears.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crds::ClusterNetwork;
use futures::StreamExt;
use kube::Api;
use kube_runtime::controller::{Action, Controller};
use kube_runtime::finalizer::{finalizer, Error as FinalizerError, Event as Finalizer};
use kube_runtime::watcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Finalizer guarding cloud-side teardown.
pub const FINALIZER: &str = "netops.stratoform.io/security-groups";

async fn reconcile(
    cn: Arc<ClusterNetwork>,
    ctx: Arc<Reconciler>,
) -> Result<Action, FinalizerError<ControllerError>> {
    let api: Api<ClusterNetwork> = ctx.cluster_network_api.clone();
    finalizer(&api, FINALIZER, cn, |event| async {
        match event {
            Finalizer::Apply(cn) => {
                ctx.reconcile_cluster_network(&cn).await?;
                Ok(Action::requeue(Duration::from_secs(300)))
            }
            Finalizer::Cleanup(cn) => {
                ctx.delete_cluster_network(&cn).await?;
                Ok(Action::await_change())
            }
        }
    })
    .await
}

fn error_policy(
    cn: Arc<ClusterNetwork>,
    error: &FinalizerError<ControllerError>,
    _ctx: Arc<Reconciler>,
) -> Action {
    error!(
        "Reconciliation error for ClusterNetwork {:?}: {}",
        cn.metadata.name, error
    );
    // Configuration errors only resolve when the spec changes; requeueing
    // them would retry a fatal condition forever.
    if let FinalizerError::ApplyFailed(e) = error {
        if e.is_terminal() {
            return Action::await_change();
        }
    }
    Action::requeue(Duration::from_secs(60))
}

/// Runs the ClusterNetwork controller loop until the watch stream ends.
pub async fn watch_cluster_networks(
    api: Api<ClusterNetwork>,
    reconciler: Arc<Reconciler>,
) -> Result<(), ControllerError> {
    info!("Starting ClusterNetwork watcher");

    Controller::new(api, watcher::Config::default())
        .run(reconcile, error_policy, reconciler)
        .for_each(|result| async move {
            match result {
                Ok(obj) => debug!("Reconciled ClusterNetwork {:?}", obj),
                Err(e) => error!("ClusterNetwork watcher error: {}", e),
            }
        })
        .await;

    Ok(())
}
