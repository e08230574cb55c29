pub mod backend;
pub mod error;
pub mod types;

#[cfg(target_os = "linux")]
pub mod x11;

#[cfg(target_os = "windows")]
pub mod win32;

#[cfg(test)]
pub(crate) mod mock_backend;

#[cfg(any(target_os = "linux", target_os = "windows"))]
pub use backend::NativePlatform;
pub use backend::{PlatformBackend, PlatformWidgetState, PlatformWindowState};
pub use error::PlatformError;
pub use error::Result as PlatformResult;
pub use types::{
    Event, EventKind, MouseButton, NativeEvent, NativeEventKind, NativeHandle, UserData,
    WidgetId, WindowId,
};
