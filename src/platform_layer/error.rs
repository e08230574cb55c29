#[cfg(target_os = "windows")]
use windows::core::Error as WinError;

// Represents errors that can occur within the platform abstraction layer.
//
// Most of these are produced together with a log::error! at the point of
// failure; callers mostly decide whether to carry on without the resource.
#[derive(Debug, Clone)]
pub enum PlatformError {
    /// An error originating from the Windows API.
    #[cfg(target_os = "windows")]
    Win32(WinError),
    /// An error reported by the X server or the X11 connection.
    X11(String),
    /// The toolkit has not been initialized, or has already been terminated.
    NotInitialized,
    /// Failure during the initialization of the platform layer or its components.
    InitializationFailed(String),
    /// Failure to create a native window.
    WindowCreationFailed(String),
    /// Failure to create a native control.
    ControlCreationFailed(String),
    /// A handle (`WindowId`, `WidgetId`) that does not name a live object was used.
    InvalidHandle(String),
    /// A requested operation could not be completed.
    OperationFailed(String),
}

#[cfg(target_os = "windows")]
impl From<WinError> for PlatformError {
    fn from(err: WinError) -> Self {
        PlatformError::Win32(err)
    }
}

#[cfg(target_os = "linux")]
mod x11_conversions {
    use super::PlatformError;
    use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

    impl From<ConnectError> for PlatformError {
        fn from(err: ConnectError) -> Self {
            PlatformError::X11(err.to_string())
        }
    }

    impl From<ConnectionError> for PlatformError {
        fn from(err: ConnectionError) -> Self {
            PlatformError::X11(err.to_string())
        }
    }

    impl From<ReplyError> for PlatformError {
        fn from(err: ReplyError) -> Self {
            PlatformError::X11(err.to_string())
        }
    }

    impl From<ReplyOrIdError> for PlatformError {
        fn from(err: ReplyOrIdError) -> Self {
            PlatformError::X11(err.to_string())
        }
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_os = "windows")]
            PlatformError::Win32(e) => write!(f, "Win32 Error: {}", e),
            PlatformError::X11(s) => write!(f, "X11 Error: {}", s),
            PlatformError::NotInitialized => write!(f, "Toolkit is not initialized"),
            PlatformError::InitializationFailed(s) => write!(f, "Initialization Failed: {}", s),
            PlatformError::WindowCreationFailed(s) => write!(f, "Window Creation Failed: {}", s),
            PlatformError::ControlCreationFailed(s) => write!(f, "Control Creation Failed: {}", s),
            PlatformError::InvalidHandle(s) => write!(f, "Invalid Handle: {}", s),
            PlatformError::OperationFailed(s) => write!(f, "Operation Failed: {}", s),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(target_os = "windows")]
            PlatformError::Win32(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized `Result` type for platform layer operations.
pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failure() {
        let err = PlatformError::ControlCreationFailed("Slider".to_string());
        assert_eq!(err.to_string(), "Control Creation Failed: Slider");
        assert_eq!(
            PlatformError::NotInitialized.to_string(),
            "Toolkit is not initialized"
        );
    }
}
