// src/engine/runtime.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::core::Dispatcher;
use crate::engine::worker::run_kind_worker;
use crate::errors::{Error, Result};
use crate::resource::{Notification, ResourceType};

/// Number of notifications handled per kind, reported when the runtime exits.
pub type RuntimeSummary = BTreeMap<ResourceType, usize>;

/// Routes a notification stream to one worker per resource kind.
///
/// Workers run concurrently; notifications of the same kind are handled in
/// delivery order by a single worker. Per-kind queues are unbounded, so a
/// slow kind never holds up routing for the others; backpressure applies
/// only at the source channel. This is the async shell around the
/// synchronous [`Dispatcher`].
pub struct Runtime {
    dispatcher: Arc<Dispatcher>,
    source_rx: mpsc::Receiver<Notification>,
    cancel: CancellationToken,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        source_rx: mpsc::Receiver<Notification>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            dispatcher,
            source_rx,
            cancel,
        }
    }

    /// Main routing loop.
    ///
    /// - Reads notifications from the source until it closes or `cancel`
    ///   fires.
    /// - Spawns a worker the first time a kind is seen.
    /// - Waits for all workers before returning.
    pub async fn run(mut self) -> Result<RuntimeSummary> {
        info!("driftwatch runtime started");

        let mut senders: HashMap<ResourceType, mpsc::UnboundedSender<Notification>> = HashMap::new();
        let mut workers: JoinSet<(ResourceType, usize)> = JoinSet::new();

        loop {
            let notification = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("cancellation requested; stopping router");
                    break;
                }
                next = self.source_rx.recv() => match next {
                    Some(n) => n,
                    None => {
                        info!("notification source closed");
                        break;
                    }
                },
            };

            let Some(kind) = notification.resource_type() else {
                warn!(event = %notification.event, "notification payload is not an object; skipping");
                continue;
            };

            let tx = senders.entry(kind.clone()).or_insert_with(|| {
                debug!(%kind, "spawning worker");
                let (tx, rx) = mpsc::unbounded_channel();
                let dispatcher = Arc::clone(&self.dispatcher);
                let cancel = self.cancel.clone();
                let worker_kind = kind.clone();
                workers.spawn(async move {
                    let handled = run_kind_worker(worker_kind.clone(), rx, dispatcher, cancel).await;
                    (worker_kind, handled)
                });
                tx
            });

            if tx.send(notification).is_err() {
                // Only happens once the worker stopped, i.e. on cancellation.
                debug!(%kind, "worker gone; dropping notification");
            }
        }

        // Closing the channels lets workers drain and exit.
        drop(senders);

        let mut summary = RuntimeSummary::new();
        while let Some(joined) = workers.join_next().await {
            let (kind, handled) = joined.map_err(Error::from)?;
            summary.insert(kind, handled);
        }

        info!(kinds = summary.len(), "runtime exiting");
        Ok(summary)
    }
}
