//! Wheel event capture
//!
//! This module owns everything between the OS and the worker thread: the
//! low-level mouse hook, the event record it produces, and the queue that
//! carries records to the consumer. The hook callback path never blocks.

pub mod queue;
pub mod types;
#[cfg(windows)]
pub mod wheel_hook;

pub use queue::{channel, CancelHandle, WheelReceiver, WheelSender};
pub use types::WheelEvent;
#[cfg(windows)]
pub use wheel_hook::WheelHook;
