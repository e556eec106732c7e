// src/engine/worker.rs

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::core::{DispatchOutcome, Dispatcher};
use crate::resource::{Notification, ResourceType};

/// Consume the notifications of a single kind, strictly in order.
///
/// Returns the number of notifications handled once the channel closes or
/// `cancel` fires. Cancellation is only observed between notifications.
pub async fn run_kind_worker(
    kind: ResourceType,
    mut rx: mpsc::UnboundedReceiver<Notification>,
    dispatcher: Arc<Dispatcher>,
    cancel: CancellationToken,
) -> usize {
    debug!(%kind, "worker started");
    let mut handled = 0;

    loop {
        let notification = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(%kind, "worker cancelled");
                break;
            }
            next = rx.recv() => match next {
                Some(n) => n,
                None => break,
            },
        };

        let outcome = dispatcher.dispatch(&notification);
        handled += 1;

        if outcome == DispatchOutcome::Malformed {
            debug!(%kind, "malformed notification skipped");
        }
    }

    debug!(%kind, handled, "worker finished");
    handled
}
