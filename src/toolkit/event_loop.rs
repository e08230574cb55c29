/*
 * Turns native events into application events and runs the callback loop.
 *
 * Each native event is resolved against the registry, translated, and its
 * callback (if any) runs to completion before the next native event is read.
 * Callbacks may freely mutate the toolkit, including destroying the window
 * that is being dispatched to.
 */
use super::Toolkit;
use crate::core::models::WidgetKind;
use crate::core::registry::Target;
use crate::platform_layer::backend::PlatformBackend;
use crate::platform_layer::types::{
    Event, EventKind, NativeEvent, NativeEventKind, WidgetId, WindowId,
};
use std::thread;
use std::time::Duration;

impl<P: PlatformBackend> Toolkit<P> {
    /*
     * Drains the backend's pending native events. Returns `false` as soon as
     * the backend reports that the application should quit, `true` once the
     * queue is empty. Returns `false` without touching the backend when
     * uninitialized.
     */
    pub fn process_events(&mut self) -> bool {
        if self.registry.is_none() {
            log::warn!("Toolkit: process_events called before initialize.");
            return false;
        }
        while let Some(native) = self.backend.next_event() {
            if !self.handle_native_event(native) {
                log::debug!("Toolkit: Native quit received.");
                return false;
            }
        }
        true
    }

    /*
     * Runs until the backend reports quit or `quit` is called: process events,
     * render every visible window, sleep for the configured frame interval.
     */
    pub fn run(&mut self) {
        if self.registry.is_none() {
            log::warn!("Toolkit: run called before initialize.");
            return;
        }
        self.quit_requested = false;
        let frame_interval = Duration::from_millis(self.config.frame_interval_ms);
        log::debug!("Toolkit: Entering event loop ({frame_interval:?} per frame).");
        loop {
            let running = self.process_events();
            self.render_all_windows();
            if !running || self.quit_requested {
                break;
            }
            thread::sleep(frame_interval);
        }
        self.quit_requested = false;
        log::debug!("Toolkit: Event loop finished.");
    }

    // Makes `run` return after its current iteration.
    pub fn quit(&mut self) {
        log::debug!("Toolkit: quit requested.");
        self.quit_requested = true;
    }

    fn render_all_windows(&mut self) {
        for window in self.windows() {
            if self.is_window_visible(window) {
                self.render_window(window);
            }
        }
    }

    // Returns `false` only for a native quit.
    fn handle_native_event(&mut self, native: NativeEvent) -> bool {
        if native.kind == NativeEventKind::Quit {
            return false;
        }
        let activation = self.last_activation.take();
        let resolved = self
            .registry
            .as_ref()
            .and_then(|r| r.resolve(native.source));
        let target = match (resolved, activation) {
            (Some(target), _) => Some(target),
            // The button that was just clicked is gone; its follow-up mouse
            // event still belongs to the window that owned it.
            (None, Some((source, window)))
                if source == native.source
                    && matches!(native.kind, NativeEventKind::MouseButton { .. }) =>
            {
                Some(Target::Window(window))
            }
            (None, _) => None,
        };
        let Some(target) = target else {
            log::trace!(
                "Toolkit: Dropping {:?} for unknown native handle {:?}.",
                native.kind,
                native.source
            );
            return true;
        };
        let window = target.window();

        match native.kind {
            NativeEventKind::Expose => self.handle_expose(target),
            NativeEventKind::Configure { width, height } => {
                if let Target::Window(window) = target {
                    self.handle_configure(window, width, height);
                }
            }
            NativeEventKind::CloseRequested => {
                if self.is_window_visible(window) {
                    self.dispatch(Event::new(window, EventKind::WindowClose));
                }
            }
            NativeEventKind::MouseMove { x, y } => {
                let (last_x, last_y) = self.last_mouse_position;
                self.last_mouse_position = (x, y);
                self.dispatch(Event::new(
                    window,
                    EventKind::MouseMove {
                        x,
                        y,
                        delta_x: x - last_x,
                        delta_y: y - last_y,
                    },
                ));
            }
            NativeEventKind::MouseButton {
                button,
                pressed,
                x,
                y,
            } => {
                self.dispatch(Event::new(
                    window,
                    EventKind::MouseButton {
                        button,
                        pressed,
                        x,
                        y,
                    },
                ));
            }
            NativeEventKind::Key {
                key_code,
                pressed,
                ctrl,
                shift,
                alt,
            } => {
                self.dispatch(Event::new(
                    window,
                    EventKind::Key {
                        key_code,
                        pressed,
                        ctrl,
                        shift,
                        alt,
                    },
                ));
            }
            NativeEventKind::Activate { position } => {
                if let Target::Widget { window, widget } = target {
                    self.last_activation = Some((native.source, window));
                    self.handle_activate(window, widget, position);
                }
            }
            NativeEventKind::TextEdited { text } => {
                if let Target::Widget { widget, .. } = target {
                    self.handle_text_edited(widget, text);
                }
            }
            NativeEventKind::Quit => return false,
        }
        true
    }

    fn handle_expose(&mut self, target: Target) {
        let Some(registry) = self.registry.as_mut() else {
            return;
        };
        match target {
            Target::Window(window) => {
                let Some(entry) = registry.window_mut(window) else {
                    return;
                };
                if let Some(state) = entry.platform.as_mut() {
                    self.backend.invalidate_window(state);
                }
                self.render_window(window);
            }
            Target::Widget { window, widget } => {
                let Some(entry) = registry.window_mut(window) else {
                    return;
                };
                let Some(widget_entry) = entry.widgets.iter_mut().find(|w| w.id == widget) else {
                    return;
                };
                if let (Some(window_state), Some(state)) =
                    (entry.platform.as_ref(), widget_entry.platform.as_mut())
                {
                    self.backend
                        .paint_widget(window_state, state, &widget_entry.props);
                }
            }
        }
    }

    // A configure that does not change the size (a pure move) dispatches nothing.
    fn handle_configure(&mut self, window: WindowId, width: i32, height: i32) {
        let Some(entry) = self.registry.as_mut().and_then(|r| r.window_mut(window)) else {
            return;
        };
        if entry.props.width == width && entry.props.height == height {
            return;
        }
        entry.props.width = width;
        entry.props.height = height;
        if let Some(state) = entry.platform.as_mut() {
            self.backend.resize_window_surface(state, width, height);
        }
        self.dispatch(Event::new(
            window,
            EventKind::WindowResize { width, height },
        ));
    }

    /*
     * Only enabled buttons report clicks. When the backend gives no position,
     * the widget's own origin is reported.
     */
    fn handle_activate(&mut self, window: WindowId, widget: WidgetId, position: Option<(i32, i32)>) {
        let Some(entry) = self.registry.as_ref().and_then(|r| r.widget(widget)) else {
            return;
        };
        if entry.props.kind != WidgetKind::Button || !entry.props.enabled {
            log::trace!("Toolkit: Ignoring activation of {widget:?}.");
            return;
        }
        let (x, y) = position.unwrap_or((entry.props.rect.x, entry.props.rect.y));
        self.dispatch(Event::new(
            window,
            EventKind::WidgetClicked { widget, x, y },
        ));
    }

    // The native control already shows `text`; only the logical copy follows.
    fn handle_text_edited(&mut self, widget: WidgetId, text: String) {
        let Some(entry) = self.registry.as_mut().and_then(|r| r.widget_mut(widget)) else {
            return;
        };
        if entry.props.kind == WidgetKind::TextField {
            entry.props.text = text;
        }
    }

    /*
     * Invokes the window's callback. The callback is moved out of the window
     * for the duration of the call and put back only if the window survived
     * and no new callback was installed meanwhile.
     */
    pub(crate) fn dispatch(&mut self, event: Event) {
        let Some(entry) = self
            .registry
            .as_mut()
            .and_then(|r| r.window_mut(event.window))
        else {
            return;
        };
        let Some(mut callback) = entry.callback.take() else {
            return;
        };
        let generation = entry.callback_generation;
        let user_data = entry.user_data.clone();

        callback(&mut *self, &event, user_data.as_ref());

        if let Some(entry) = self
            .registry
            .as_mut()
            .and_then(|r| r.window_mut(event.window))
        {
            if entry.callback_generation == generation {
                entry.callback = Some(callback);
            }
        }
    }
}
