/*
 * Static text labels (STATIC class), and the WM_CTLCOLORSTATIC /
 * WM_CTLCOLORBTN replies that give labels and buttons their colors. A label
 * without a background is drawn transparently over the window.
 */
use crate::platform_layer::win32::window_common::{SS_LEFT, WC_STATIC, hwnd_key, with_shared};

use windows::Win32::{
    Foundation::{COLORREF, HWND, LRESULT},
    Graphics::Gdi::{
        GetStockObject, HBRUSH, HDC, NULL_BRUSH, SetBkColor, SetBkMode, SetTextColor, TRANSPARENT,
    },
    UI::WindowsAndMessaging::WINDOW_STYLE,
};
use windows::core::PCWSTR;

pub(crate) fn class_and_style() -> (PCWSTR, WINDOW_STYLE) {
    (WC_STATIC, SS_LEFT)
}

// Copies a control's colors out of the shared state so no borrow outlives the lookup.
pub(crate) fn lookup_colors(hwnd_control: HWND) -> Option<(COLORREF, Option<(COLORREF, HBRUSH)>)> {
    with_shared(|shared| {
        shared.control_colors.get(&hwnd_key(hwnd_control)).map(|colors| {
            (
                colors.text,
                colors
                    .background
                    .as_ref()
                    .map(|(color, brush)| (*color, brush.handle())),
            )
        })
    })
}

pub(crate) fn handle_wm_ctlcolorstatic(hdc: HDC, hwnd_control: HWND) -> Option<LRESULT> {
    let (text, background) = lookup_colors(hwnd_control)?;
    unsafe {
        SetTextColor(hdc, text);
        match background {
            Some((color, brush)) => {
                SetBkColor(hdc, color);
                Some(LRESULT(brush.0 as isize))
            }
            None => {
                SetBkMode(hdc, TRANSPARENT);
                Some(LRESULT(GetStockObject(NULL_BRUSH).0 as isize))
            }
        }
    }
}
