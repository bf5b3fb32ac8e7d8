use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::AbortHandle;
use tracing::{debug, error};

use crate::client::lightwave_client::LightwaveClient;
use crate::models::viewer_model::ViewerConfig;
use crate::state::view_state::ViewState;

/// Parts of the page that are refreshed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Lists,
    Signals,
    Data,
}

/// Why an exclusive task produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFailure {
    /// A newer action for the same region, or a view reset, aborted it.
    Superseded,
    Panicked,
}

#[derive(Clone)]
pub struct AppState {
    pub config: &'static ViewerConfig,
    pub client: LightwaveClient,
    pub view: Arc<RwLock<ViewState>>,
    inflight: Arc<Mutex<HashMap<Region, (u64, AbortHandle)>>>,
    generation: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: &'static ViewerConfig, client: LightwaveClient) -> Self {
        Self {
            config,
            client,
            view: Arc::new(RwLock::new(ViewState::new())),
            inflight: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Runs `work` as the only in-flight task for `region`, aborting the
    /// previous one. Work that commits into the view must do so inside
    /// `work`, so an aborted task never overwrites newer data.
    pub async fn run_exclusive<F, T>(&self, region: Region, work: F) -> Result<T, TaskFailure>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let id = self.generation.fetch_add(1, Ordering::Relaxed);
        // work starts only once it is registered
        let (go_tx, go_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _ = go_rx.await;
            work.await
        });

        {
            let mut inflight = self.inflight.lock().await;
            if let Some((old_id, old)) = inflight.insert(region, (id, handle.abort_handle())) {
                debug!("{:?} request {} superseded by {}", region, old_id, id);
                old.abort();
            }
        }
        let _ = go_tx.send(());

        let result = handle.await;

        {
            let mut inflight = self.inflight.lock().await;
            if inflight.get(&region).map(|(current, _)| *current) == Some(id) {
                inflight.remove(&region);
            }
        }

        result.map_err(|e| {
            if e.is_cancelled() {
                TaskFailure::Superseded
            } else {
                error!("{:?} request {} failed: {}", region, id, e);
                TaskFailure::Panicked
            }
        })
    }

    /// Aborts whatever is in flight for `region`.
    pub async fn cancel(&self, region: Region) {
        if let Some((id, handle)) = self.inflight.lock().await.remove(&region) {
            debug!("{:?} request {} cancelled", region, id);
            handle.abort();
        }
    }
}
