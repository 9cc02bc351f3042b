//! Classify-and-switch worker
//!
//! One dedicated thread drains the wheel queue strictly one event at a
//! time: resolve the element under the pointer, classify it, then either
//! switch a tab or remember the element as not worth looking at again.
//!
//! # Failure Handling
//!
//! The UI tree belongs to other processes; any read can fail because a
//! window closed or its process stopped answering. Such failures are
//! logged per event and the loop keeps waiting; a single bad event must
//! never take the worker down. Only cancellation ends the loop.

use crate::actuate::{Actuator, Keystrokes, SwitchDirection};
use crate::capture::queue::{CancelHandle, RecvError, WheelReceiver};
use crate::capture::types::WheelEvent;
use crate::classify::{self, HostKind, SkipCache};
use crate::tree::{UiNode, UiTree};
use crate::{Error, Result};
use crossbeam_channel::bounded;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Worker tuning, derived from the application config.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Bound of the not-a-tab memo
    pub skip_cache_capacity: usize,
    /// Delay bracketing the synthetic Tab pair
    pub keystroke_gap: Duration,
    /// Skip switching while the user physically holds Ctrl
    pub suppress_when_ctrl_held: bool,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            skip_cache_capacity: classify::skip_cache::DEFAULT_CAPACITY,
            keystroke_gap: Duration::from_millis(100),
            suppress_when_ctrl_held: true,
        }
    }
}

/// Handle one dequeued wheel event.
///
/// Errors mean a tree query failed mid-classification; the caller logs
/// and moves on. A failed *switch* is handled here (logged, not
/// escalated) because from the user's perspective a missed switch is a
/// no-op they can retry by scrolling again.
pub fn process_event<T: UiTree, K: Keystrokes>(
    tree: &T,
    cache: &mut SkipCache,
    actuator: &Actuator<K>,
    event: WheelEvent,
) -> Result<()> {
    let point = event.point();
    let Some(hit) = tree.element_at(point)? else {
        debug!(x = point.x, y = point.y, "no element under pointer");
        return Ok(());
    };

    let id = hit.runtime_id()?;
    if cache.contains(&id) {
        debug!(element = %id, "known non-tab element, skipping");
        return Ok(());
    }

    let classification = classify::identify(tree, &hit, point)?;
    debug!(
        kind = %classification.kind,
        delta = event.delta,
        "element classified"
    );

    // A zero delta carries no direction; it neither switches nor taints
    // the element in the cache.
    let Some(direction) = SwitchDirection::from_delta(event.delta) else {
        return Ok(());
    };

    if classification.kind.is_switch_target() {
        if let Err(e) = actuator.switch(&classification, direction) {
            warn!(error = %e, "tab switch failed");
        }
    } else if classification.kind == HostKind::Unsupported {
        if cache.insert(id.clone()) {
            debug!(element = %id, "added to skip cache");
        }
    } else {
        // Terminal body: the same element is a hit once the pointer
        // moves up onto the strip; caching it would disable the host.
        debug!(element = %id, "outside the tab strip, not cached");
    }

    Ok(())
}

/// Consumer loop: block on the queue, process, repeat until cancelled.
pub fn run_loop<T: UiTree, K: Keystrokes>(
    receiver: &WheelReceiver,
    tree: &T,
    actuator: &Actuator<K>,
    settings: &WorkerSettings,
) {
    let mut cache = SkipCache::new(settings.skip_cache_capacity);
    info!("switch worker running");

    loop {
        match receiver.recv() {
            Ok(event) => {
                if let Err(e) = process_event(tree, &mut cache, actuator, event) {
                    warn!(error = %e, "event dropped after a tree query failure");
                }
            }
            Err(RecvError::Cancelled) => {
                info!("switch worker cancellation received");
                break;
            }
        }
    }

    info!("switch worker stopped");
}

/// Owns the worker thread.
///
/// The UI tree backend is created *on* the worker thread (COM apartment
/// affinity), so `spawn` takes a factory and reports its outcome back
/// before returning: a backend that cannot be created is a setup
/// failure, not something to discover silently later.
pub struct SwitchWorker {
    handle: Option<JoinHandle<()>>,
    cancel: Option<CancelHandle>,
}

impl SwitchWorker {
    pub fn spawn<T, K, F>(
        receiver: WheelReceiver,
        cancel: CancelHandle,
        make_tree: F,
        keys: K,
        settings: WorkerSettings,
    ) -> Result<Self>
    where
        T: UiTree + 'static,
        K: Keystrokes + Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let handle = thread::Builder::new()
            .name("tab-switch".into())
            .spawn(move || {
                let tree = match make_tree() {
                    Ok(tree) => {
                        let _ = ready_tx.send(Ok(()));
                        tree
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let actuator = Actuator::new(
                    keys,
                    settings.keystroke_gap,
                    settings.suppress_when_ctrl_held,
                );
                run_loop(&receiver, &tree, &actuator, &settings);
            })
            .map_err(|e| Error::Queue(format!("failed to spawn switch worker: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                handle: Some(handle),
                cancel: Some(cancel),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(Error::Queue("switch worker died during startup".into()))
            }
        }
    }

    /// Request cancellation and wait for the in-flight event to finish.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for SwitchWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
