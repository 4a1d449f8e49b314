use super::{PublicView, Screen};
use crate::store::StateStore;
use crate::types::SharedState;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

fn apply<S: Screen>(view: &mut PublicView, screen: &mut S, snapshot: Option<SharedState>) {
    let update = view.observe(snapshot);
    for effect in update.effects {
        screen.effect(effect);
    }
    if update.changed {
        screen.redraw(view);
    }
}

/// Poll the store until `shutdown` flips to true or its sender goes away.
///
/// The first read happens immediately, then one per `interval`. Reads that
/// find nothing usable leave the screen as it is.
pub async fn run_polling<S: Screen>(
    store: StateStore,
    interval: Duration,
    view: &mut PublicView,
    screen: &mut S,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                apply(view, screen, store.load_async().await);
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::debug!("Stopped polling '{}'", store.key());
}

/// Follow operator snapshots published in the same process.
///
/// A lagging receiver skips to the newest snapshots; only the latest record
/// matters for display. Ends when the operator drops its sender.
pub async fn run_subscribed<S: Screen>(
    mut snapshots: broadcast::Receiver<SharedState>,
    view: &mut PublicView,
    screen: &mut S,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            // Drain queued snapshots before honoring shutdown
            biased;
            received = snapshots.recv() => {
                match received {
                    Ok(snapshot) => apply(view, screen, Some(snapshot)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!("Public screen skipped {} snapshots", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::debug!("Stopped following operator snapshots");
}

/// A public screen running as a background task
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<PublicView>,
}

impl PollerHandle {
    /// Stop the loop and hand back the final view state
    pub async fn stop(self) -> Option<PublicView> {
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!("Public screen task failed: {}", e);
                None
            }
        }
    }
}

/// Spawn a polling public screen
pub fn spawn_polling<S: Screen + 'static>(
    store: StateStore,
    interval: Duration,
    mut view: PublicView,
    mut screen: S,
) -> PollerHandle {
    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        run_polling(store, interval, &mut view, &mut screen, rx).await;
        view
    });
    PollerHandle { shutdown: tx, task }
}

/// Spawn a public screen fed by the operator's in-process snapshots
pub fn spawn_subscribed<S: Screen + 'static>(
    snapshots: broadcast::Receiver<SharedState>,
    mut view: PublicView,
    mut screen: S,
) -> PollerHandle {
    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        run_subscribed(snapshots, &mut view, &mut screen, rx).await;
        view
    });
    PollerHandle { shutdown: tx, task }
}
