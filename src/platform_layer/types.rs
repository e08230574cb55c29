/*
 * This module defines the data types exchanged between the application, the
 * toolkit core and the platform backends. It includes the opaque handles for
 * windows and widgets, the normalized application-facing `Event`, and the
 * lower-level `NativeEvent` that a backend produces before the core has
 * resolved which window or widget it belongs to.
 */

use std::any::Any;
use std::rc::Rc;

// An opaque identifier for a toolkit window.
//
// Handles are handed out from a counter that never repeats within a toolkit
// instance, so a handle kept after `destroy_window` can never alias a newer
// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) u64);

// An opaque identifier for a widget. Shares the counter with `WindowId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) u64);

/*
 * The identity of a native object (an X11 window id, a Win32 HWND) as a plain
 * integer. The core only compares these; it never interprets them.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Application data attached to a window or a widget and handed back to callbacks.
pub type UserData = Rc<dyn Any>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Payload of an application-facing event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    WindowClose,
    WindowResize {
        width: i32,
        height: i32,
    },
    MouseMove {
        x: i32,
        y: i32,
        delta_x: i32,
        delta_y: i32,
    },
    MouseButton {
        button: MouseButton,
        pressed: bool,
        x: i32,
        y: i32,
    },
    Key {
        key_code: i32,
        pressed: bool,
        ctrl: bool,
        shift: bool,
        alt: bool,
    },
    WidgetClicked {
        widget: WidgetId,
        x: i32,
        y: i32,
    },
}

/*
 * An event delivered to a window's callback. `window` is always the window the
 * callback was registered on; for widget events it is the widget's parent.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub window: WindowId,
    pub kind: EventKind,
}

impl Event {
    pub fn new(window: WindowId, kind: EventKind) -> Self {
        Event { window, kind }
    }
}

/*
 * What a backend observed, before the core resolved `source` against the
 * registry. Coordinates are relative to the native object named by `source`.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEventKind {
    // The native object needs repainting.
    Expose,
    // A top-level window now has this client size.
    Configure {
        width: i32,
        height: i32,
    },
    CloseRequested,
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseButton {
        button: MouseButton,
        pressed: bool,
        x: i32,
        y: i32,
    },
    Key {
        key_code: i32,
        pressed: bool,
        ctrl: bool,
        shift: bool,
        alt: bool,
    },
    // A widget was activated. `None` means the native system did not report a position.
    Activate {
        position: Option<(i32, i32)>,
    },
    // The native control now holds this text after a user edit.
    TextEdited {
        text: String,
    },
    // The native system asked the event loop to stop.
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    pub source: NativeHandle,
    pub kind: NativeEventKind,
}

impl NativeEvent {
    pub fn new(source: NativeHandle, kind: NativeEventKind) -> Self {
        NativeEvent { source, kind }
    }

    pub fn quit() -> Self {
        NativeEvent {
            source: NativeHandle(0),
            kind: NativeEventKind::Quit,
        }
    }
}
