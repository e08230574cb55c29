/*
 * The window class and window procedure shared by every top-level LightGUI
 * window on Win32.
 *
 * The window procedure runs inside `DispatchMessageW` (and, for sent
 * messages, inside whichever Win32 call triggered it), so it cannot reach the
 * `Win32Platform` that owns the windows. Everything it needs lives in a
 * thread-local `WndProcShared` instead: decoded events waiting for
 * `next_event`, per-control colors for WM_CTLCOLOR* replies, and the back
 * buffers WM_PAINT copies from. A window counts as live once its back buffer
 * is registered here. Borrows of that state must never be held
 * across a Win32 call that can send a message.
 */
use super::controls;
use super::styling::ControlColors;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::{MouseButton, NativeEvent, NativeEventKind, NativeHandle};

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::ffi::c_void;
use windows::{
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::{BeginPaint, BitBlt, COLOR_WINDOW, EndPaint, HBRUSH, HDC, PAINTSTRUCT, SRCCOPY},
        UI::Input::KeyboardAndMouse::{GetKeyState, VK_CONTROL, VK_MENU, VK_SHIFT},
        UI::WindowsAndMessaging::*,
    },
    core::{HSTRING, PCWSTR, w},
};

pub(crate) const WC_BUTTON: PCWSTR = w!("BUTTON");
pub(crate) const WC_STATIC: PCWSTR = w!("STATIC");
pub(crate) const WC_EDIT: PCWSTR = w!("EDIT");

pub(crate) const BS_PUSHBUTTON_STYLE: WINDOW_STYLE = WINDOW_STYLE(0x0000_0000);
pub(crate) const SS_LEFT: WINDOW_STYLE = WINDOW_STYLE(0x0000_0000);
pub(crate) const ES_AUTOHSCROLL_STYLE: WINDOW_STYLE = WINDOW_STYLE(0x0000_0080);

// WM_COMMAND notification codes.
const BN_CLICKED_CODE: u32 = 0;
const EN_CHANGE_CODE: u32 = 0x0300;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PaintSource {
    pub(crate) dc: HDC,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

#[derive(Default)]
pub(crate) struct WndProcShared {
    pub(crate) pending: VecDeque<NativeEvent>,
    pub(crate) control_colors: HashMap<isize, ControlColors>,
    // One entry per live top-level window.
    pub(crate) paint_sources: HashMap<isize, PaintSource>,
}

thread_local! {
    static SHARED: RefCell<WndProcShared> = RefCell::new(WndProcShared::default());
}

pub(crate) fn with_shared<R>(f: impl FnOnce(&mut WndProcShared) -> R) -> R {
    SHARED.with(|shared| f(&mut shared.borrow_mut()))
}

pub(crate) fn hwnd_key(hwnd: HWND) -> isize {
    hwnd.0 as isize
}

pub(crate) fn hwnd_handle(hwnd: HWND) -> NativeHandle {
    NativeHandle(hwnd.0 as usize as u64)
}

#[inline]
pub(crate) fn loword(value: usize) -> u32 {
    (value & 0xFFFF) as u32
}

#[inline]
pub(crate) fn hiword(value: usize) -> u32 {
    ((value >> 16) & 0xFFFF) as u32
}

/// Signed client coordinates packed in a mouse message's LPARAM.
#[inline]
pub(crate) fn point_from_lparam(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as u16 as i16;
    let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16;
    (i32::from(x), i32::from(y))
}

fn key_is_down(key: i32) -> bool {
    unsafe { GetKeyState(key) < 0 }
}

fn push_event(event: NativeEvent) {
    with_shared(|shared| shared.pending.push_back(event));
}

pub(crate) fn register_window_class(
    instance: HINSTANCE,
    class_name: &HSTRING,
) -> PlatformResult<()> {
    unsafe {
        let mut existing = WNDCLASSEXW::default();
        if GetClassInfoExW(Some(instance), class_name, &mut existing).is_ok() {
            return Ok(());
        }

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(lightgui_wnd_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: instance,
            hIcon: LoadIconW(None, IDI_APPLICATION)?,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as *mut c_void),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hIconSm: LoadIconW(None, IDI_APPLICATION)?,
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            return Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed: {error:?}"
            )));
        }
    }
    log::debug!("Win32: Registered window class {class_name}.");
    Ok(())
}

pub(crate) fn unregister_window_class(instance: HINSTANCE, class_name: &HSTRING) {
    if let Err(e) = unsafe { UnregisterClassW(class_name, Some(instance)) } {
        log::warn!("Win32: UnregisterClassW for {class_name} failed: {e}");
    }
}

fn mouse_button_message(msg: u32) -> Option<(MouseButton, bool)> {
    match msg {
        WM_LBUTTONDOWN => Some((MouseButton::Left, true)),
        WM_LBUTTONUP => Some((MouseButton::Left, false)),
        WM_RBUTTONDOWN => Some((MouseButton::Right, true)),
        WM_RBUTTONUP => Some((MouseButton::Right, false)),
        WM_MBUTTONDOWN => Some((MouseButton::Middle, true)),
        WM_MBUTTONUP => Some((MouseButton::Middle, false)),
        _ => None,
    }
}

/*
 * WM_COMMAND from a child control: the control's HWND is in LPARAM and the
 * notification code in the high word of WPARAM. Menu and accelerator
 * commands (LPARAM 0) are ignored.
 */
fn handle_wm_command(wparam: WPARAM, lparam: LPARAM) {
    if lparam.0 == 0 {
        return;
    }
    let hwnd_control = HWND(lparam.0 as *mut c_void);
    match hiword(wparam.0) {
        BN_CLICKED_CODE => push_event(controls::button_handler::handle_bn_clicked(hwnd_control)),
        EN_CHANGE_CODE => push_event(controls::input_handler::handle_en_change(hwnd_control)),
        _ => {}
    }
}

fn handle_wm_paint(hwnd: HWND) {
    let source = with_shared(|shared| shared.paint_sources.get(&hwnd_key(hwnd)).copied());
    unsafe {
        let mut ps = PAINTSTRUCT::default();
        let hdc = BeginPaint(hwnd, &mut ps);
        if !hdc.is_invalid() {
            if let Some(source) = source {
                if let Err(e) = BitBlt(
                    hdc,
                    0,
                    0,
                    source.width,
                    source.height,
                    Some(source.dc),
                    0,
                    0,
                    SRCCOPY,
                ) {
                    log::warn!("Win32: BitBlt during WM_PAINT failed: {e}");
                }
            }
        }
        _ = EndPaint(hwnd, &ps);
    }
}

// Posts WM_QUIT once the last registered window is gone.
fn handle_wm_destroy(hwnd: HWND) {
    let remaining = with_shared(|shared| {
        shared
            .paint_sources
            .remove(&hwnd_key(hwnd))
            .map(|_| shared.paint_sources.len())
    });
    let Some(remaining) = remaining else {
        return;
    };
    log::debug!("Win32: WM_DESTROY for {hwnd:?}, {remaining} window(s) left.");
    if remaining == 0 {
        unsafe { PostQuitMessage(0) };
    }
}

unsafe extern "system" fn lightgui_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let source = hwnd_handle(hwnd);
    match msg {
        WM_CLOSE => {
            // The application decides whether the window goes away.
            push_event(NativeEvent::new(source, NativeEventKind::CloseRequested));
            return LRESULT(0);
        }
        WM_SIZE => {
            push_event(NativeEvent::new(
                source,
                NativeEventKind::Configure {
                    width: loword(lparam.0 as usize) as i32,
                    height: hiword(lparam.0 as usize) as i32,
                },
            ));
            return LRESULT(0);
        }
        WM_MOUSEMOVE => {
            let (x, y) = point_from_lparam(lparam);
            push_event(NativeEvent::new(source, NativeEventKind::MouseMove { x, y }));
            return LRESULT(0);
        }
        WM_KEYDOWN | WM_KEYUP | WM_SYSKEYDOWN | WM_SYSKEYUP => {
            let pressed = msg == WM_KEYDOWN || msg == WM_SYSKEYDOWN;
            push_event(NativeEvent::new(
                source,
                NativeEventKind::Key {
                    key_code: wparam.0 as i32,
                    pressed,
                    ctrl: key_is_down(i32::from(VK_CONTROL.0)),
                    shift: key_is_down(i32::from(VK_SHIFT.0)),
                    alt: key_is_down(i32::from(VK_MENU.0)),
                },
            ));
            // System keys still need default handling (Alt+F4, menus).
            if msg == WM_KEYDOWN || msg == WM_KEYUP {
                return LRESULT(0);
            }
        }
        WM_COMMAND => {
            handle_wm_command(wparam, lparam);
            return LRESULT(0);
        }
        WM_CTLCOLORSTATIC | WM_CTLCOLORBTN => {
            let hdc = HDC(wparam.0 as *mut c_void);
            let hwnd_control = HWND(lparam.0 as *mut c_void);
            if let Some(result) = controls::label_handler::handle_wm_ctlcolorstatic(hdc, hwnd_control) {
                return result;
            }
        }
        WM_CTLCOLOREDIT => {
            let hdc = HDC(wparam.0 as *mut c_void);
            let hwnd_control = HWND(lparam.0 as *mut c_void);
            if let Some(result) = controls::input_handler::handle_wm_ctlcoloredit(hdc, hwnd_control) {
                return result;
            }
        }
        WM_PAINT => {
            handle_wm_paint(hwnd);
            return LRESULT(0);
        }
        // The back buffer covers the whole client area.
        WM_ERASEBKGND => return LRESULT(1),
        WM_DESTROY => {
            handle_wm_destroy(hwnd);
            return LRESULT(0);
        }
        _ => {}
    }
    if let Some((button, pressed)) = mouse_button_message(msg) {
        let (x, y) = point_from_lparam(lparam);
        push_event(NativeEvent::new(
            source,
            NativeEventKind::MouseButton {
                button,
                pressed,
                x,
                y,
            },
        ));
        return LRESULT(0);
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_from_lparam_is_signed() {
        // Arrange: x = -5, y = 300
        let lparam = LPARAM(((300isize) << 16) | (0xFFFB_isize));

        // Act
        let (x, y) = point_from_lparam(lparam);

        // Assert
        assert_eq!((x, y), (-5, 300));
    }

    #[test]
    fn test_loword_hiword() {
        let value = 0x0300_0010usize;
        assert_eq!(loword(value), 0x0010);
        assert_eq!(hiword(value), 0x0300);
    }

    #[test]
    fn test_mouse_button_messages() {
        assert_eq!(mouse_button_message(WM_LBUTTONDOWN), Some((MouseButton::Left, true)));
        assert_eq!(mouse_button_message(WM_RBUTTONUP), Some((MouseButton::Right, false)));
        assert_eq!(mouse_button_message(WM_MBUTTONDOWN), Some((MouseButton::Middle, true)));
        assert_eq!(mouse_button_message(WM_MOUSEMOVE), None);
    }

    #[test]
    fn test_shared_state_queues_events_in_order() {
        // Arrange
        let first = NativeEvent::new(NativeHandle(1), NativeEventKind::CloseRequested);
        let second = NativeEvent::new(NativeHandle(2), NativeEventKind::Expose);

        // Act
        push_event(first.clone());
        push_event(second.clone());
        let drained: Vec<_> = with_shared(|shared| shared.pending.drain(..).collect());

        // Assert
        assert_eq!(drained, vec![first, second]);
    }
}
