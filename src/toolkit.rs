/*
 * The application-facing façade of LightGUI. A `Toolkit` owns one platform
 * backend, the configuration and (while initialized) the registry of live
 * windows. Every public operation validates its handle against the registry
 * first: a handle that does not name a live object turns the operation into
 * a logged no-op, never a panic.
 *
 * Mutating a widget always updates the logical copy first and then pushes the
 * whole widget state to the backend; the backend never diffs.
 *
 * Event dispatch and the run loop live in `event_loop`.
 */
mod event_loop;


use crate::core::ToolkitConfig;
use crate::core::models::{Color, Rect, WidgetKind};
use crate::core::registry::WindowRegistry;
use crate::core::widget::{Widget, WidgetProperties};
use crate::core::window::{Window, WindowProperties};
use crate::platform_layer::backend::{PlatformBackend, PlatformWidgetState, PlatformWindowState};
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::{Event, NativeHandle, UserData, WidgetId, WindowId};

#[cfg(any(target_os = "linux", target_os = "windows"))]
use crate::platform_layer::backend::NativePlatform;

/*
 * The per-window event callback. It receives the toolkit itself so it can
 * mutate widgets, create or destroy windows, or call `quit` while the event is
 * being dispatched.
 */
pub type EventCallback<P> = Box<dyn FnMut(&mut Toolkit<P>, &Event, Option<&UserData>)>;

pub struct Toolkit<P: PlatformBackend> {
    pub(crate) backend: P,
    pub(crate) config: ToolkitConfig,
    pub(crate) registry: Option<WindowRegistry<P>>,
    next_handle: u64,
    // Shared by all windows: mouse deltas are measured against the last
    // position seen anywhere.
    pub(crate) last_mouse_position: (i32, i32),
    pub(crate) quit_requested: bool,
    // Source and owning window of the last activation, for its follow-up
    // mouse event.
    pub(crate) last_activation: Option<(NativeHandle, WindowId)>,
}

/// The toolkit running on the backend compiled for the current target.
#[cfg(any(target_os = "linux", target_os = "windows"))]
pub type NativeToolkit = Toolkit<NativePlatform>;

#[cfg(any(target_os = "linux", target_os = "windows"))]
impl Toolkit<NativePlatform> {
    pub fn new() -> Self {
        Self::with_config(ToolkitConfig::default())
    }

    pub fn with_config(config: ToolkitConfig) -> Self {
        Toolkit::with_backend(NativePlatform::new(), config)
    }
}

#[cfg(any(target_os = "linux", target_os = "windows"))]
impl Default for Toolkit<NativePlatform> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PlatformBackend> Toolkit<P> {
    pub fn with_backend(backend: P, config: ToolkitConfig) -> Self {
        Toolkit {
            backend,
            config,
            registry: None,
            next_handle: 0,
            last_mouse_position: (0, 0),
            quit_requested: false,
            last_activation: None,
        }
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &P {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut P {
        &mut self.backend
    }

    fn allocate_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    // --- Lifecycle ---

    /*
     * Brings up the backend and creates an empty registry. Calling this on an
     * initialized toolkit only logs a warning. If the backend fails, it is
     * torn down again and the toolkit stays uninitialized.
     */
    pub fn initialize(&mut self) -> PlatformResult<()> {
        if self.registry.is_some() {
            log::warn!("Toolkit: initialize called on an already initialized toolkit.");
            return Ok(());
        }
        if let Err(e) = self.backend.initialize(&self.config) {
            log::error!("Toolkit: Failed to initialize platform backend: {e}");
            self.backend.terminate();
            return Err(e);
        }
        self.registry = Some(WindowRegistry::with_capacity(
            self.config.initial_window_capacity,
        ));
        self.quit_requested = false;
        log::info!(
            "Toolkit: Initialized LightGUI {}.{}.{}",
            crate::VERSION_MAJOR,
            crate::VERSION_MINOR,
            crate::VERSION_PATCH
        );
        Ok(())
    }

    /*
     * Destroys every live window (and with it every widget), releases the
     * registry and shuts down the backend.
     */
    pub fn terminate(&mut self) {
        if self.registry.is_none() {
            log::warn!("Toolkit: terminate called without a successful initialize.");
            return;
        }
        while let Some(window) = self.registry.as_ref().and_then(|r| r.last_window()) {
            self.destroy_window(window);
        }
        self.registry = None;
        self.backend.terminate();
        self.last_mouse_position = (0, 0);
        self.quit_requested = false;
        self.last_activation = None;
        log::info!("Toolkit: Terminated.");
    }

    // --- Windows ---

    pub fn create_window(
        &mut self,
        title: &str,
        width: i32,
        height: i32,
        resizable: bool,
    ) -> PlatformResult<WindowId> {
        if self.registry.is_none() {
            log::warn!("Toolkit: create_window('{title}') called before initialize.");
            return Err(PlatformError::NotInitialized);
        }
        let props = WindowProperties::new(title, width, height, resizable);
        let state = self.backend.create_window(&props).map_err(|e| {
            log::error!("Toolkit: Failed to create native window '{title}': {e}");
            e
        })?;
        let id = WindowId(self.allocate_handle());
        let native = state.native_handle();
        let window = Window::new(
            id,
            native,
            props,
            state,
            self.config.initial_widget_capacity,
        );
        let Some(registry) = self.registry.as_mut() else {
            return Err(PlatformError::NotInitialized);
        };
        registry.insert_window(window);
        log::debug!("Toolkit: Created window {id:?} ('{title}', {width}x{height}).");
        Ok(id)
    }

    /*
     * Destroys the window's widgets in their current order, then the native
     * window, then unregisters it. No-op for a handle that is not live.
     */
    pub fn destroy_window(&mut self, window: WindowId) {
        let Some(registry) = self.registry.as_ref() else {
            log::warn!("Toolkit: destroy_window({window:?}) called before initialize.");
            return;
        };
        let Some(entry) = registry.window(window) else {
            log::debug!("Toolkit: destroy_window({window:?}) ignored, window is not live.");
            return;
        };
        let widget_ids = entry.widget_ids();
        for widget in widget_ids {
            self.destroy_widget(widget);
        }
        let Some(registry) = self.registry.as_mut() else {
            return;
        };
        if let Some(state) = registry.window_mut(window).and_then(|w| w.platform.take()) {
            self.backend.destroy_window(state);
        }
        registry.remove_window(window);
        log::debug!("Toolkit: Destroyed window {window:?}.");
    }

    // Looks up a live window for a mutating operation, logging misuse.
    fn live_window_mut(&mut self, window: WindowId, operation: &str) -> Option<&mut Window<P>> {
        let Some(registry) = self.registry.as_mut() else {
            log::warn!("Toolkit: {operation}({window:?}) called before initialize.");
            return None;
        };
        let entry = registry.window_mut(window);
        if entry.is_none() {
            log::warn!("Toolkit: {operation}({window:?}) ignored, window is not live.");
        }
        entry
    }

    pub fn show_window(&mut self, window: WindowId) {
        let Some(registry) = self.registry.as_mut() else {
            log::warn!("Toolkit: show_window({window:?}) called before initialize.");
            return;
        };
        let Some(entry) = registry.window_mut(window) else {
            log::warn!("Toolkit: show_window({window:?}) ignored, window is not live.");
            return;
        };
        entry.props.visible = true;
        if let Some(state) = entry.platform.as_mut() {
            self.backend.show_window(state);
        }
    }

    pub fn hide_window(&mut self, window: WindowId) {
        let Some(registry) = self.registry.as_mut() else {
            log::warn!("Toolkit: hide_window({window:?}) called before initialize.");
            return;
        };
        let Some(entry) = registry.window_mut(window) else {
            log::warn!("Toolkit: hide_window({window:?}) ignored, window is not live.");
            return;
        };
        entry.props.visible = false;
        if let Some(state) = entry.platform.as_mut() {
            self.backend.hide_window(state);
        }
    }

    pub fn set_window_title(&mut self, window: WindowId, title: &str) {
        let Some(registry) = self.registry.as_mut() else {
            log::warn!("Toolkit: set_window_title({window:?}) called before initialize.");
            return;
        };
        let Some(entry) = registry.window_mut(window) else {
            log::warn!("Toolkit: set_window_title({window:?}) ignored, window is not live.");
            return;
        };
        entry.props.title = title.to_string();
        if let Some(state) = entry.platform.as_mut() {
            self.backend.set_window_title(state, title);
        }
    }

    /*
     * Installs (or with `None`, removes) the window's callback together with
     * the user data handed to it on every dispatch.
     */
    pub fn set_event_callback(
        &mut self,
        window: WindowId,
        callback: Option<EventCallback<P>>,
        user_data: Option<UserData>,
    ) {
        let Some(entry) = self.live_window_mut(window, "set_event_callback") else {
            return;
        };
        entry.callback = callback;
        entry.user_data = user_data;
        entry.callback_generation += 1;
    }

    // Presents the window's off-screen buffer. Hidden windows are skipped.
    pub fn render_window(&mut self, window: WindowId) {
        let Some(entry) = self.registry.as_mut().and_then(|r| r.window_mut(window)) else {
            log::warn!("Toolkit: render_window({window:?}) ignored, window is not live.");
            return;
        };
        if !entry.props.visible {
            return;
        }
        if let Some(state) = entry.platform.as_mut() {
            self.backend.render_window(state);
        }
    }

    pub fn window_count(&self) -> usize {
        self.registry.as_ref().map_or(0, |r| r.len())
    }

    // Live windows. The order is unspecified once a window has been destroyed.
    pub fn windows(&self) -> Vec<WindowId> {
        self.registry
            .as_ref()
            .map(|r| r.window_ids().to_vec())
            .unwrap_or_default()
    }

    pub fn is_window_alive(&self, window: WindowId) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|r| r.contains_window(window))
    }

    fn window_entry(&self, window: WindowId) -> Option<&Window<P>> {
        self.registry.as_ref()?.window(window)
    }

    pub fn window_title(&self, window: WindowId) -> Option<&str> {
        self.window_entry(window).map(|w| w.props.title.as_str())
    }

    pub fn window_size(&self, window: WindowId) -> Option<(i32, i32)> {
        self.window_entry(window)
            .map(|w| (w.props.width, w.props.height))
    }

    pub fn is_window_visible(&self, window: WindowId) -> bool {
        self.window_entry(window).is_some_and(|w| w.props.visible)
    }

    pub fn is_window_resizable(&self, window: WindowId) -> bool {
        self.window_entry(window).is_some_and(|w| w.props.resizable)
    }

    pub fn window_widgets(&self, window: WindowId) -> Vec<WidgetId> {
        self.window_entry(window)
            .map(|w| w.widget_ids())
            .unwrap_or_default()
    }

    pub fn window_native_handle(&self, window: WindowId) -> Option<NativeHandle> {
        self.window_entry(window).map(|w| w.native)
    }

    pub fn window_user_data(&self, window: WindowId) -> Option<UserData> {
        self.window_entry(window).and_then(|w| w.user_data.clone())
    }

    // --- Widgets ---

    pub fn create_button(
        &mut self,
        window: WindowId,
        text: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> PlatformResult<WidgetId> {
        self.create_widget(
            window,
            WidgetKind::Button,
            text,
            Rect::new(x, y, width, height),
        )
    }

    pub fn create_label(
        &mut self,
        window: WindowId,
        text: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> PlatformResult<WidgetId> {
        self.create_widget(
            window,
            WidgetKind::Label,
            text,
            Rect::new(x, y, width, height),
        )
    }

    // A text field without initial text starts empty.
    pub fn create_text_field(
        &mut self,
        window: WindowId,
        text: Option<&str>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> PlatformResult<WidgetId> {
        self.create_widget(
            window,
            WidgetKind::TextField,
            text.unwrap_or(""),
            Rect::new(x, y, width, height),
        )
    }

    /*
     * Creates a widget of any kind inside `window`. The widget only becomes
     * part of the window once the backend has produced its native
     * counterpart; on failure nothing is left behind.
     */
    pub fn create_widget(
        &mut self,
        window: WindowId,
        kind: WidgetKind,
        text: &str,
        rect: Rect,
    ) -> PlatformResult<WidgetId> {
        let Some(registry) = self.registry.as_ref() else {
            log::warn!("Toolkit: create_widget({kind:?}) called before initialize.");
            return Err(PlatformError::NotInitialized);
        };
        let Some(window_state) = registry.window(window).and_then(|w| w.platform.as_ref()) else {
            log::warn!("Toolkit: create_widget({kind:?}) ignored, window {window:?} is not live.");
            return Err(PlatformError::InvalidHandle(format!(
                "window {window:?} is not live"
            )));
        };
        let props = WidgetProperties::new(kind, text, rect);
        let state = self
            .backend
            .create_widget(window_state, &props)
            .map_err(|e| {
                log::error!("Toolkit: Failed to create {kind:?} in window {window:?}: {e}");
                e
            })?;
        let id = WidgetId(self.allocate_handle());
        let widget = Widget::new(id, window, state.native_handle(), props, state);
        let Some(registry) = self.registry.as_mut() else {
            return Err(PlatformError::NotInitialized);
        };
        if !registry.insert_widget(widget) {
            return Err(PlatformError::InvalidHandle(format!(
                "window {window:?} is not live"
            )));
        }
        log::debug!("Toolkit: Created {kind:?} {id:?} in window {window:?}.");
        Ok(id)
    }

    pub fn destroy_widget(&mut self, widget: WidgetId) {
        let Some(registry) = self.registry.as_mut() else {
            log::warn!("Toolkit: destroy_widget({widget:?}) called before initialize.");
            return;
        };
        let Some(entry) = registry.widget_mut(widget) else {
            log::debug!("Toolkit: destroy_widget({widget:?}) ignored, widget is not live.");
            return;
        };
        if let Some(state) = entry.platform.take() {
            self.backend.destroy_widget(state);
        }
        registry.remove_widget(widget);
        log::trace!("Toolkit: Destroyed widget {widget:?}.");
    }

    /*
     * Applies `mutate` to the widget's logical properties and then pushes the
     * complete widget state to the backend.
     */
    fn update_widget_with(
        &mut self,
        widget: WidgetId,
        operation: &str,
        mutate: impl FnOnce(&mut WidgetProperties),
    ) {
        let Some(registry) = self.registry.as_mut() else {
            log::warn!("Toolkit: {operation}({widget:?}) called before initialize.");
            return;
        };
        let Some(window) = registry.owning_window_mut(widget) else {
            log::warn!("Toolkit: {operation}({widget:?}) ignored, widget is not live.");
            return;
        };
        let Some(entry) = window.widgets.iter_mut().find(|w| w.id == widget) else {
            return;
        };
        mutate(&mut entry.props);
        if let (Some(window_state), Some(state)) =
            (window.platform.as_ref(), entry.platform.as_mut())
        {
            self.backend.update_widget(window_state, state, &entry.props);
        }
    }

    pub fn set_widget_text(&mut self, widget: WidgetId, text: &str) {
        self.update_widget_with(widget, "set_widget_text", |props| {
            props.text = text.to_string();
        });
    }

    pub fn set_widget_position(&mut self, widget: WidgetId, x: i32, y: i32) {
        self.update_widget_with(widget, "set_widget_position", |props| {
            props.rect.x = x;
            props.rect.y = y;
        });
    }

    pub fn set_widget_size(&mut self, widget: WidgetId, width: i32, height: i32) {
        self.update_widget_with(widget, "set_widget_size", |props| {
            props.rect.width = width;
            props.rect.height = height;
        });
    }

    pub fn set_widget_visible(&mut self, widget: WidgetId, visible: bool) {
        self.update_widget_with(widget, "set_widget_visible", |props| {
            props.visible = visible;
        });
    }

    pub fn set_widget_enabled(&mut self, widget: WidgetId, enabled: bool) {
        self.update_widget_with(widget, "set_widget_enabled", |props| {
            props.enabled = enabled;
        });
    }

    pub fn set_widget_background_color(&mut self, widget: WidgetId, color: Color) {
        self.update_widget_with(widget, "set_widget_background_color", |props| {
            props.background = color;
        });
    }

    pub fn set_widget_text_color(&mut self, widget: WidgetId, color: Color) {
        self.update_widget_with(widget, "set_widget_text_color", |props| {
            props.text_color = color;
        });
    }

    pub fn set_widget_user_data(&mut self, widget: WidgetId, user_data: Option<UserData>) {
        let Some(entry) = self.registry.as_mut().and_then(|r| r.widget_mut(widget)) else {
            log::warn!("Toolkit: set_widget_user_data({widget:?}) ignored, widget is not live.");
            return;
        };
        entry.user_data = user_data;
    }

    fn widget_entry(&self, widget: WidgetId) -> Option<&Widget<P>> {
        self.registry.as_ref()?.widget(widget)
    }

    pub fn widget_user_data(&self, widget: WidgetId) -> Option<UserData> {
        self.widget_entry(widget).and_then(|w| w.user_data.clone())
    }

    pub fn widget_text(&self, widget: WidgetId) -> Option<&str> {
        self.widget_entry(widget).map(|w| w.props.text.as_str())
    }

    /*
     * Copies the widget's text into `buffer` as bytes, truncated to
     * `buffer.len() - 1` and always followed by a NUL byte. Returns the number
     * of text bytes copied, or -1 if the widget is not live or the buffer is
     * empty. Truncation may split a multi-byte UTF-8 sequence.
     */
    pub fn get_widget_text(&self, widget: WidgetId, buffer: &mut [u8]) -> i32 {
        if buffer.is_empty() {
            log::warn!("Toolkit: get_widget_text({widget:?}) called with an empty buffer.");
            return -1;
        }
        let Some(text) = self.widget_text(widget) else {
            log::warn!("Toolkit: get_widget_text({widget:?}) ignored, widget is not live.");
            return -1;
        };
        let bytes = text.as_bytes();
        let count = bytes.len().min(buffer.len() - 1);
        buffer[..count].copy_from_slice(&bytes[..count]);
        buffer[count] = 0;
        i32::try_from(count).unwrap_or(i32::MAX)
    }

    pub fn is_widget_alive(&self, widget: WidgetId) -> bool {
        self.widget_entry(widget).is_some()
    }

    pub fn widget_window(&self, widget: WidgetId) -> Option<WindowId> {
        self.registry.as_ref()?.widget_owner(widget)
    }

    pub fn widget_kind(&self, widget: WidgetId) -> Option<WidgetKind> {
        self.widget_entry(widget).map(|w| w.props.kind)
    }

    pub fn widget_rect(&self, widget: WidgetId) -> Option<Rect> {
        self.widget_entry(widget).map(|w| w.props.rect)
    }

    pub fn is_widget_visible(&self, widget: WidgetId) -> bool {
        self.widget_entry(widget).is_some_and(|w| w.props.visible)
    }

    pub fn is_widget_enabled(&self, widget: WidgetId) -> bool {
        self.widget_entry(widget).is_some_and(|w| w.props.enabled)
    }

    // (background, text) colors.
    pub fn widget_colors(&self, widget: WidgetId) -> Option<(Color, Color)> {
        self.widget_entry(widget)
            .map(|w| (w.props.background, w.props.text_color))
    }

    pub fn widget_control_id(&self, widget: WidgetId) -> Option<i32> {
        self.widget_entry(widget)
            .and_then(|w| w.platform.as_ref())
            .and_then(|state| state.control_id())
    }

    pub fn widget_native_handle(&self, widget: WidgetId) -> Option<NativeHandle> {
        self.widget_entry(widget).map(|w| w.native)
    }
}

impl<P: PlatformBackend> Drop for Toolkit<P> {
    fn drop(&mut self) {
        if self.registry.is_some() {
            self.terminate();
        }
    }
}
