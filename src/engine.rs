//! Hook + worker lifecycle
//!
//! Wires the pipeline together and owns its teardown order: the worker
//! starts before the hook so no event is ever dropped on the floor, and
//! shutdown cancels the worker (waiting out any in-flight switch) before
//! releasing the hook.

use crate::actuate::WinKeystrokes;
use crate::app::config::Config;
use crate::capture::queue;
use crate::capture::wheel_hook::WheelHook;
use crate::tree::uia::UiaTree;
use crate::worker::{SwitchWorker, WorkerSettings};
use crate::Result;
use std::time::Duration;
use tracing::info;

/// The running wheel-to-tab-switch pipeline.
pub struct SwitchEngine {
    hook: WheelHook,
    worker: SwitchWorker,
}

impl SwitchEngine {
    /// Install the hook and start the worker. Either failing is fatal;
    /// nothing is left half-started.
    pub fn start(config: &Config) -> Result<Self> {
        let settings = WorkerSettings {
            skip_cache_capacity: config.classifier.skip_cache_capacity,
            keystroke_gap: Duration::from_millis(config.actuator.keystroke_gap_ms),
            suppress_when_ctrl_held: config.actuator.suppress_when_ctrl_held,
        };

        let (sender, receiver, cancel) = queue::channel();
        let worker =
            SwitchWorker::spawn(receiver, cancel, UiaTree::new, WinKeystrokes, settings)?;
        let hook = match WheelHook::install(sender) {
            Ok(hook) => hook,
            Err(e) => {
                // Worker drop cancels and joins it.
                drop(worker);
                return Err(e);
            }
        };

        info!("switch engine started");
        Ok(Self { hook, worker })
    }

    /// Cancel the worker, wait for it, then release the hook.
    pub fn shutdown(&mut self) {
        self.worker.stop();
        self.hook.remove();
        info!("switch engine stopped");
    }
}

impl Drop for SwitchEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
