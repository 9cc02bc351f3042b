//! Hook-to-worker event queue
//!
//! An unbounded FIFO channel connecting the hook callback (producer) to
//! the switch worker (consumer), with cooperative cancellation.
//!
//! Architecture:
//! - Producer (hook callback): never blocks, sends from the hook thread
//! - Consumer (switch worker): blocks until an event arrives or shutdown
//!   is requested
//!
//! Built on `crossbeam_channel`; cancellation is a second one-slot
//! channel raced against the event channel with `select!`.

use super::types::WheelEvent;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender, TryRecvError};
use tracing::trace;

/// Why a blocking receive returned without an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvError {
    /// Shutdown was requested (or every handle on the other side is gone)
    Cancelled,
}

/// Producer half of the wheel queue.
///
/// `send` is wait-free from the caller's perspective: the channel is
/// unbounded, so the hook callback never stalls the message pump.
#[derive(Clone)]
pub struct WheelSender {
    events: Sender<WheelEvent>,
}

impl WheelSender {
    /// Enqueue one event. Never blocks; an event sent after the consumer
    /// has gone away is silently dropped.
    #[inline]
    pub fn send(&self, event: WheelEvent) {
        if self.events.send(event).is_err() {
            trace!("wheel event dropped, consumer gone");
        }
    }

    /// Number of events waiting in the queue
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

/// Consumer half of the wheel queue.
pub struct WheelReceiver {
    events: Receiver<WheelEvent>,
    cancel: Receiver<()>,
    cancelled: std::cell::Cell<bool>,
}

impl WheelReceiver {
    /// Block until an event is available or cancellation is signaled.
    ///
    /// FIFO order is preserved. Events already queued when cancellation
    /// fires are abandoned; shutdown wins. Once cancelled, every further
    /// call returns [`RecvError::Cancelled`] immediately.
    pub fn recv(&self) -> Result<WheelEvent, RecvError> {
        if self.cancelled.get() {
            return Err(RecvError::Cancelled);
        }
        // Checked ahead of the select so a pending shutdown always beats
        // pending events (select picks ready arms at random).
        match self.cancel.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                self.cancelled.set(true);
                return Err(RecvError::Cancelled);
            }
            Err(TryRecvError::Empty) => {}
        }
        select! {
            recv(self.cancel) -> _ => {
                self.cancelled.set(true);
                Err(RecvError::Cancelled)
            }
            recv(self.events) -> msg => msg.map_err(|_| {
                self.cancelled.set(true);
                RecvError::Cancelled
            }),
        }
    }

    /// Non-blocking variant, `None` when the queue is empty.
    pub fn try_recv(&self) -> Option<WheelEvent> {
        self.events.try_recv().ok()
    }
}

/// Shutdown signal for the consumer's blocking wait.
///
/// Cancelling is idempotent; dropping the handle also cancels.
pub struct CancelHandle {
    cancel: Sender<()>,
}

impl CancelHandle {
    /// Unblock the consumer and make every subsequent `recv` return
    /// [`RecvError::Cancelled`].
    pub fn cancel(&self) {
        // One slot latches the signal even when the consumer is busy
        // with an event rather than parked in recv.
        let _ = self.cancel.try_send(());
    }
}

/// Create a connected (producer, consumer, cancel) triple.
pub fn channel() -> (WheelSender, WheelReceiver, CancelHandle) {
    let (tx, rx) = unbounded();
    // Capacity 1 so cancel() can latch the signal even before the
    // consumer reaches its select.
    let (cancel_tx, cancel_rx) = bounded(1);
    (
        WheelSender { events: tx },
        WheelReceiver {
            events: rx,
            cancel: cancel_rx,
            cancelled: std::cell::Cell::new(false),
        },
        CancelHandle { cancel: cancel_tx },
    )
}
