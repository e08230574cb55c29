/*
 * LightGUI: a small cross-platform GUI toolkit. Applications create windows,
 * populate them with buttons, labels and text fields, and receive a
 * normalized stream of events through one callback per window while the
 * toolkit pumps native events. One native backend is compiled in per target:
 * X11 on Linux, Win32 on Windows.
 */
pub mod core;
pub mod logging;
pub mod platform_layer;
pub mod toolkit;

pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

pub use crate::core::{
    BLACK, BLUE, CYAN, Color, ConfigManagerOperations, CoreConfigManager, GRAY, GREEN, MAGENTA,
    RED, Rect, TRANSPARENT, ToolkitConfig, WHITE, WidgetKind, YELLOW, create_color,
};
#[cfg(any(target_os = "linux", target_os = "windows"))]
pub use platform_layer::NativePlatform;
pub use platform_layer::{
    Event, EventKind, MouseButton, PlatformBackend, PlatformError, PlatformResult, UserData,
    WidgetId, WindowId,
};
#[cfg(any(target_os = "linux", target_os = "windows"))]
pub use toolkit::NativeToolkit;
pub use toolkit::{EventCallback, Toolkit};
