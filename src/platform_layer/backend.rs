/*
 * The contract every native backend fulfils. The toolkit core owns all
 * logical state (titles, sizes, widget text, colors, callbacks); a backend
 * only owns the native resources for each window and widget, stored in its
 * associated `WindowState` / `WidgetState` types, and turns native input into
 * `NativeEvent`s. The core resolves those events against its registry, so a
 * backend never needs to look up toolkit handles itself.
 *
 * Exactly one backend is compiled in per target and exported as
 * `NativePlatform`.
 */
use super::error::Result as PlatformResult;
use super::types::{NativeEvent, NativeHandle};
use crate::core::ToolkitConfig;
use crate::core::widget::WidgetProperties;
use crate::core::window::WindowProperties;

pub trait PlatformWindowState {
    fn native_handle(&self) -> NativeHandle;
}

pub trait PlatformWidgetState {
    fn native_handle(&self) -> NativeHandle;

    /// The native control identifier, for backends that assign one.
    fn control_id(&self) -> Option<i32> {
        None
    }
}

pub trait PlatformBackend {
    type WindowState: PlatformWindowState;
    type WidgetState: PlatformWidgetState;

    // Opens the display connection / registers classes. Must be safe to call
    // again after `terminate`.
    fn initialize(&mut self, config: &ToolkitConfig) -> PlatformResult<()>;
    // Releases everything `initialize` acquired. A no-op when not initialized.
    fn terminate(&mut self);

    // Creates a hidden top-level window. On error nothing native is left behind.
    fn create_window(&mut self, props: &WindowProperties) -> PlatformResult<Self::WindowState>;
    fn destroy_window(&mut self, window: Self::WindowState);
    fn show_window(&mut self, window: &mut Self::WindowState);
    fn hide_window(&mut self, window: &mut Self::WindowState);
    fn set_window_title(&mut self, window: &mut Self::WindowState, title: &str);
    // Replaces the off-screen surface after the window's client area changed size.
    fn resize_window_surface(&mut self, window: &mut Self::WindowState, width: i32, height: i32);
    // Marks the off-screen surface as needing a fresh present.
    fn invalidate_window(&mut self, window: &mut Self::WindowState);
    // Presents the off-screen surface if it is marked dirty, then clears the mark.
    fn render_window(&mut self, window: &mut Self::WindowState);

    // Creates the native representation of a widget inside `window`. Fails
    // with `ControlCreationFailed` for kinds without a native counterpart.
    fn create_widget(
        &mut self,
        window: &Self::WindowState,
        props: &WidgetProperties,
    ) -> PlatformResult<Self::WidgetState>;
    fn destroy_widget(&mut self, widget: Self::WidgetState);
    // Pushes every property of `props` to the native widget and requests a repaint.
    fn update_widget(
        &mut self,
        window: &Self::WindowState,
        widget: &mut Self::WidgetState,
        props: &WidgetProperties,
    );
    fn paint_widget(
        &mut self,
        window: &Self::WindowState,
        widget: &mut Self::WidgetState,
        props: &WidgetProperties,
    );

    // Returns the next pending native event without blocking, or `None` when
    // the native queue is drained.
    fn next_event(&mut self) -> Option<NativeEvent>;
}

#[cfg(target_os = "linux")]
pub type NativePlatform = super::x11::X11Platform;

#[cfg(target_os = "windows")]
pub type NativePlatform = super::win32::Win32Platform;
