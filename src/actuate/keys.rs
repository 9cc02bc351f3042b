//! Win32 keystroke synthesis.
//!
//! Modifiers go through `SendInput` so the whole desktop sees them held;
//! the Tab pair is posted straight to the target window with
//! `PostMessageW`, which works even when that window is not foreground.

use super::Keystrokes;
use crate::tree::WindowHandle;
use crate::{Error, Result};
use std::mem;
use std::thread;
use std::time::Duration;
use tracing::trace;
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, VIRTUAL_KEY, VK_CONTROL, VK_SHIFT, VK_TAB,
};
use windows::Win32::UI::WindowsAndMessaging::{PostMessageW, WM_KEYDOWN, WM_KEYUP};

/// Production keystroke port.
pub struct WinKeystrokes;

impl Keystrokes for WinKeystrokes {
    fn ctrl_held(&self) -> bool {
        let state = unsafe { GetAsyncKeyState(VK_CONTROL.0 as i32) };
        (state as u16 & 0x8000) != 0
    }

    fn post_ctrl_tab(&self, target: WindowHandle, reverse: bool, gap: Duration) -> Result<()> {
        let modifiers: &[VIRTUAL_KEY] = if reverse {
            &[VK_CONTROL, VK_SHIFT]
        } else {
            &[VK_CONTROL]
        };

        send_keys(modifiers, true)?;
        thread::sleep(gap);
        let posted = post_tab_pair(target);
        thread::sleep(gap);
        // Modifiers are released even when the Tab pair failed; a stuck
        // global Ctrl would break the whole session's input.
        let released = send_keys(modifiers, false);
        posted?;
        released
    }
}

fn post_tab_pair(target: WindowHandle) -> Result<()> {
    let hwnd = HWND(target.0 as *mut _);
    unsafe {
        PostMessageW(hwnd, WM_KEYDOWN, WPARAM(VK_TAB.0 as usize), LPARAM(0))
            .map_err(|e| Error::Actuation(format!("PostMessage(WM_KEYDOWN) failed: {e}")))?;
        PostMessageW(hwnd, WM_KEYUP, WPARAM(VK_TAB.0 as usize), LPARAM(0))
            .map_err(|e| Error::Actuation(format!("PostMessage(WM_KEYUP) failed: {e}")))?;
    }
    trace!(window = target.0, "Tab pair posted");
    Ok(())
}

fn send_keys(keys: &[VIRTUAL_KEY], down: bool) -> Result<()> {
    let flags = if down {
        KEYBD_EVENT_FLAGS(0)
    } else {
        KEYEVENTF_KEYUP
    };
    let inputs: Vec<INPUT> = keys
        .iter()
        .map(|&vk| INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: vk,
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        })
        .collect();

    let sent = unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(Error::Actuation(format!(
            "SendInput injected {sent} of {} keys",
            inputs.len()
        )));
    }
    trace!(keys = inputs.len(), down, "modifiers injected");
    Ok(())
}
