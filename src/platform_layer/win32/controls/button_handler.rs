/*
 * Push buttons (BUTTON class). A BN_CLICKED notification becomes an
 * `Activate` without a position; the core anchors the click at the button's
 * origin.
 */
use crate::platform_layer::types::{NativeEvent, NativeEventKind};
use crate::platform_layer::win32::window_common::{BS_PUSHBUTTON_STYLE, WC_BUTTON, hwnd_handle};

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{WINDOW_STYLE, WS_TABSTOP};
use windows::core::PCWSTR;

pub(crate) fn class_and_style() -> (PCWSTR, WINDOW_STYLE) {
    (WC_BUTTON, BS_PUSHBUTTON_STYLE | WS_TABSTOP)
}

pub(crate) fn handle_bn_clicked(hwnd_control: HWND) -> NativeEvent {
    log::trace!("ButtonHandler: BN_CLICKED from HWND {hwnd_control:?}");
    NativeEvent::new(
        hwnd_handle(hwnd_control),
        NativeEventKind::Activate { position: None },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform_layer::types::NativeHandle;

    #[test]
    fn test_handle_bn_clicked_reports_activation_without_position() {
        // Arrange
        let hwnd = HWND(0x1234 as _);

        // Act
        let event = handle_bn_clicked(hwnd);

        // Assert
        assert_eq!(
            event,
            NativeEvent::new(
                NativeHandle(0x1234),
                NativeEventKind::Activate { position: None }
            )
        );
    }
}
