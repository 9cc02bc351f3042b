//! Low-level mouse wheel hook
//!
//! Installs a process-wide `WH_MOUSE_LL` hook on a dedicated thread that
//! owns a message pump; low-level hooks deliver through the installing
//! thread's message queue, so the pump is what keeps the hook alive.
//!
//! The callback executes synchronously inside the desktop's input
//! delivery; it must finish fast and must never block. It reads the
//! wheel message payload, pushes one record onto the (unbounded, wait
//! free) queue, and forwards the message unmodified down the hook chain.
//! Everything slow happens on the worker thread.

use super::queue::WheelSender;
use super::types::WheelEvent;
use crate::{Error, Result};
use crossbeam_channel::bounded;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, trace};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HC_ACTION, MSG, MSLLHOOKSTRUCT, WH_MOUSE_LL,
    WM_MOUSEWHEEL, WM_QUIT,
};

/// Queue sender for the hook callback.
///
/// The callback cannot capture state, so the sender lives behind a
/// process-wide pointer. The owning [`WheelHook`] keeps the allocation
/// alive for the hook's entire lifetime and reclaims it only after the
/// pump thread (the only caller) has been joined.
static SENDER_PTR: AtomicPtr<WheelSender> = AtomicPtr::new(ptr::null_mut());

/// Owns the installed hook and its pump thread.
pub struct WheelHook {
    thread: Option<JoinHandle<()>>,
    thread_id: Arc<AtomicU32>,
    installed: Arc<AtomicBool>,
}

impl WheelHook {
    /// Install the hook. Fails if a hook is already installed in this
    /// process or the OS rejects the registration.
    pub fn install(sender: WheelSender) -> Result<Self> {
        let sender_ptr = Box::into_raw(Box::new(sender));
        if SENDER_PTR
            .compare_exchange(ptr::null_mut(), sender_ptr, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            unsafe { drop(Box::from_raw(sender_ptr)) };
            return Err(Error::Hook("wheel hook already installed".into()));
        }

        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);
        let thread_id = Arc::new(AtomicU32::new(0));
        let installed = Arc::new(AtomicBool::new(true));

        let thread_id_in = Arc::clone(&thread_id);
        let thread = thread::Builder::new()
            .name("wheel-hook".into())
            .spawn(move || {
                let hook = match unsafe {
                    SetWindowsHookExW(WH_MOUSE_LL, Some(wheel_proc), None, 0)
                } {
                    Ok(hook) => hook,
                    Err(e) => {
                        let _ = ready_tx.send(Err(Error::Hook(format!(
                            "SetWindowsHookEx(WH_MOUSE_LL) failed: {e}"
                        ))));
                        return;
                    }
                };
                thread_id_in.store(unsafe { GetCurrentThreadId() }, Ordering::SeqCst);
                let _ = ready_tx.send(Ok(()));
                info!(hook = ?hook, "wheel hook installed");

                let mut msg = MSG::default();
                loop {
                    let result = unsafe { GetMessageW(&mut msg, HWND(ptr::null_mut()), 0, 0) };
                    if result.0 == -1 {
                        error!("wheel hook message pump failed");
                        break;
                    }
                    if result.0 == 0 || msg.message == WM_QUIT {
                        break;
                    }
                    unsafe {
                        let _ = TranslateMessage(&msg);
                        DispatchMessageW(&msg);
                    }
                }

                match unsafe { UnhookWindowsHookEx(hook) } {
                    Ok(()) => info!("wheel hook removed"),
                    Err(e) => error!(error = %e, "wheel hook removal failed"),
                }
            })
            .map_err(|e| {
                Self::reclaim_sender();
                Error::Hook(format!("failed to spawn hook thread: {e}"))
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                thread: Some(thread),
                thread_id,
                installed,
            }),
            Ok(Err(e)) => {
                let _ = thread.join();
                Self::reclaim_sender();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Self::reclaim_sender();
                Err(Error::Hook("hook thread died during startup".into()))
            }
        }
    }

    /// Unhook and stop the pump thread. Idempotent.
    pub fn remove(&mut self) {
        if !self.installed.swap(false, Ordering::SeqCst) {
            return;
        }

        let thread_id = self.thread_id.load(Ordering::SeqCst);
        if thread_id != 0 {
            unsafe {
                let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
            }
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        // The pump thread is gone, so no callback can still be running.
        Self::reclaim_sender();
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    fn reclaim_sender() {
        let sender = SENDER_PTR.swap(ptr::null_mut(), Ordering::SeqCst);
        if !sender.is_null() {
            unsafe { drop(Box::from_raw(sender)) };
        }
    }
}

impl Drop for WheelHook {
    fn drop(&mut self) {
        self.remove();
    }
}

/// The hook callback. Runs on the pump thread for every low-level mouse
/// message on the desktop; queues wheel messages and forwards everything
/// unmodified.
unsafe extern "system" fn wheel_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 && wparam.0 as u32 == WM_MOUSEWHEEL && lparam.0 != 0 {
        let data = &*(lparam.0 as *const MSLLHOOKSTRUCT);
        // Wheel rotation is the signed high word of mouseData.
        let delta = ((data.mouseData >> 16) as u16 as i16) as i32;
        let sender = SENDER_PTR.load(Ordering::SeqCst);
        if !sender.is_null() {
            (*sender).send(WheelEvent::new(data.pt.x, data.pt.y, delta));
            trace!(x = data.pt.x, y = data.pt.y, delta, "wheel event queued");
        }
    }
    CallNextHookEx(None, code, wparam, lparam)
}
