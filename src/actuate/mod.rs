//! Tab switch actuation
//!
//! Two mechanisms: hosts with addressable tab elements get a direct
//! `SelectionItem.Select` on the chosen neighbor; the document viewer
//! gets a synthetic Ctrl(+Shift)+Tab aimed at its window. Either way a
//! failed switch is a no-op from the user's point of view (they can
//! scroll again), so failures are reported to the caller for logging and
//! never retried.

#[cfg(windows)]
pub mod keys;

#[cfg(windows)]
pub use keys::WinKeystrokes;

use crate::classify::{Classification, HostKind};
use crate::tree::{UiNode, WindowHandle};
use crate::{Error, Result};
use std::cmp::Ordering;
use std::time::Duration;
use tracing::debug;

/// Which neighbor of the active tab to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDirection {
    /// Wheel up: the tab before the active one
    Previous,
    /// Wheel down: the tab after the active one
    Next,
}

impl SwitchDirection {
    /// Direction for a wheel delta; `None` for a zero delta, which must
    /// never switch anything.
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta.cmp(&0) {
            Ordering::Greater => Some(SwitchDirection::Previous),
            Ordering::Less => Some(SwitchDirection::Next),
            Ordering::Equal => None,
        }
    }

    /// Moving to the previous tab needs Shift in the keystroke sequence
    pub fn is_reverse(&self) -> bool {
        matches!(self, SwitchDirection::Previous)
    }
}

/// Keyboard synthesis port. The production implementation drives
/// `SendInput`/`PostMessageW`; tests record calls.
pub trait Keystrokes {
    /// Whether the user is physically holding Ctrl right now
    fn ctrl_held(&self) -> bool;

    /// Hold Ctrl (and Shift when `reverse`), post a Tab key-down/key-up
    /// pair to `target`, release the modifiers. `gap` brackets the Tab
    /// pair so the host's own key-combo detection sees the held
    /// modifiers before and after it.
    fn post_ctrl_tab(&self, target: WindowHandle, reverse: bool, gap: Duration) -> Result<()>;
}

/// Performs the actual tab switch for a classification.
pub struct Actuator<K: Keystrokes> {
    keys: K,
    keystroke_gap: Duration,
    suppress_when_ctrl_held: bool,
}

impl<K: Keystrokes> Actuator<K> {
    pub fn new(keys: K, keystroke_gap: Duration, suppress_when_ctrl_held: bool) -> Self {
        Self {
            keys,
            keystroke_gap,
            suppress_when_ctrl_held,
        }
    }

    /// Switch to the chosen neighbor tab.
    ///
    /// With Ctrl already held by the user the wheel usually means zoom;
    /// actuation is suppressed (configurable) rather than guessing.
    pub fn switch<N: UiNode>(
        &self,
        classification: &Classification<N>,
        direction: SwitchDirection,
    ) -> Result<()> {
        if self.suppress_when_ctrl_held && self.keys.ctrl_held() {
            debug!("Ctrl held by the user, leaving the wheel alone");
            return Ok(());
        }

        let chosen = match direction {
            SwitchDirection::Previous => &classification.previous,
            SwitchDirection::Next => &classification.next,
        };

        match classification.kind {
            HostKind::DocumentViewerCtrlTab => {
                let target = chosen.native_window()?;
                if target.is_null() {
                    return Err(Error::Actuation(
                        "viewer window exposes no native handle".into(),
                    ));
                }
                self.keys
                    .post_ctrl_tab(target, direction.is_reverse(), self.keystroke_gap)?;
                debug!(window = target.0, reverse = direction.is_reverse(), "Ctrl+Tab posted");
                Ok(())
            }
            _ => {
                chosen.select()?;
                debug!(tab = %chosen.name().unwrap_or_default(), "tab selected");
                Ok(())
            }
        }
    }
}
