//! # Periodic Refresh
//!
//! Happy hour starts and ends while a cart sits open, so the summary has to
//! be recomputed on a timer and not only when the cart changes.
//!
//! ```text
//! ┌──────────────┐  every period   ┌──────────────────┐  send_replace   ┌───────────┐
//! │ tokio        │ ──────────────► │ session.summary()│ ──────────────► │ watch::Rx │
//! │ interval     │                 │ (sync, no await) │                 │ (UI)      │
//! └──────────────┘                 └──────────────────┘                 └───────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::session::{CartSummary, CheckoutSession};

/// Handle to a running refresh task.
#[derive(Debug)]
pub struct RefreshHandle {
    pub summaries: watch::Receiver<CartSummary>,
    pub task: JoinHandle<()>,
}

/// Spawns a task that republishes the session summary every `period`.
///
/// The first summary is available immediately. The task ends once every
/// receiver has been dropped.
///
/// Must be called from within a tokio runtime.
pub fn spawn_refresh(session: Arc<CheckoutSession>, period: Duration) -> RefreshHandle {
    let (tx, rx) = watch::channel(session.summary());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately and the initial summary is
        // already in the channel
        ticker.tick().await;

        info!(session = %session.id(), period_secs = period.as_secs(), "Refresh task started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let summary = session.summary();
                    debug!(
                        session = %session.id(),
                        total = %summary.view.total_text,
                        happy_hour = summary.clock.happy_hour,
                        "Summary refreshed"
                    );
                    tx.send_replace(summary);
                }
                _ = tx.closed() => break,
            }
        }

        info!(session = %session.id(), "Refresh task stopped");
    });

    RefreshHandle {
        summaries: rx,
        task,
    }
}
