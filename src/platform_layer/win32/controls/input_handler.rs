/*
 * Single-line text fields (EDIT class). User edits arrive as EN_CHANGE and
 * are reported with the control's full current text. WM_CTLCOLOREDIT
 * applies the field's colors; a transparent background keeps the system
 * default.
 */
use super::label_handler::lookup_colors;
use crate::platform_layer::types::{NativeEvent, NativeEventKind};
use crate::platform_layer::win32::window_common::{ES_AUTOHSCROLL_STYLE, WC_EDIT, hwnd_handle};

use windows::Win32::{
    Foundation::{HWND, LRESULT},
    Graphics::Gdi::{HDC, SetBkColor, SetTextColor},
    UI::WindowsAndMessaging::{GetWindowTextLengthW, GetWindowTextW, WINDOW_STYLE, WS_BORDER, WS_TABSTOP},
};
use windows::core::PCWSTR;

pub(crate) fn class_and_style() -> (PCWSTR, WINDOW_STYLE) {
    (WC_EDIT, WS_BORDER | WS_TABSTOP | ES_AUTOHSCROLL_STYLE)
}

pub(crate) fn read_control_text(hwnd_control: HWND) -> String {
    let len = unsafe { GetWindowTextLengthW(hwnd_control) };
    if len <= 0 {
        return String::new();
    }
    let mut buffer = vec![0u16; len as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd_control, &mut buffer) };
    if copied <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buffer[..copied as usize])
}

pub(crate) fn handle_en_change(hwnd_control: HWND) -> NativeEvent {
    let text = read_control_text(hwnd_control);
    log::trace!("InputHandler: EN_CHANGE from HWND {hwnd_control:?}, text '{text}'");
    NativeEvent::new(
        hwnd_handle(hwnd_control),
        NativeEventKind::TextEdited { text },
    )
}

pub(crate) fn handle_wm_ctlcoloredit(hdc: HDC, hwnd_control: HWND) -> Option<LRESULT> {
    let (text, background) = lookup_colors(hwnd_control)?;
    let (color, brush) = background?;
    unsafe {
        SetTextColor(hdc, text);
        SetBkColor(hdc, color);
    }
    Some(LRESULT(brush.0 as isize))
}
