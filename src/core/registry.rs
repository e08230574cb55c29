/*
 * The registry of live windows. It owns every `Window` (and through it every
 * `Widget`), remembers the order windows were registered in, and keeps two
 * indexes: native handle -> toolkit object, used to route native events, and
 * widget -> owning window, used by every widget operation.
 *
 * Removal swaps the last window into the freed slot, so `window_ids` is only
 * "registration order" until the first removal.
 */
use super::widget::Widget;
use super::window::Window;
use crate::platform_layer::backend::PlatformBackend;
use crate::platform_layer::types::{NativeHandle, WidgetId, WindowId};
use std::collections::HashMap;

/// What a native handle resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Window(WindowId),
    Widget { window: WindowId, widget: WidgetId },
}

impl Target {
    pub(crate) fn window(&self) -> WindowId {
        match self {
            Target::Window(window) => *window,
            Target::Widget { window, .. } => *window,
        }
    }
}

pub(crate) struct WindowRegistry<P: PlatformBackend> {
    order: Vec<WindowId>,
    windows: HashMap<WindowId, Window<P>>,
    native_index: HashMap<NativeHandle, Target>,
    widget_owners: HashMap<WidgetId, WindowId>,
}

impl<P: PlatformBackend> WindowRegistry<P> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        WindowRegistry {
            order: Vec::with_capacity(capacity),
            windows: HashMap::with_capacity(capacity),
            native_index: HashMap::new(),
            widget_owners: HashMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn window_ids(&self) -> &[WindowId] {
        &self.order
    }

    pub(crate) fn last_window(&self) -> Option<WindowId> {
        self.order.last().copied()
    }

    pub(crate) fn contains_window(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub(crate) fn insert_window(&mut self, window: Window<P>) {
        let id = window.id;
        debug_assert!(!self.windows.contains_key(&id));
        // A native handle can be recycled by the system once its previous owner is gone.
        self.native_index.insert(window.native, Target::Window(id));
        for widget in &window.widgets {
            self.native_index.insert(
                widget.native,
                Target::Widget {
                    window: id,
                    widget: widget.id,
                },
            );
            self.widget_owners.insert(widget.id, id);
        }
        self.order.push(id);
        self.windows.insert(id, window);
    }

    /*
     * Unregisters a window and returns it, together with any widgets it still
     * owns. Every index entry that pointed into the window is dropped.
     */
    pub(crate) fn remove_window(&mut self, id: WindowId) -> Option<Window<P>> {
        let window = self.windows.remove(&id)?;
        if let Some(index) = self.order.iter().position(|w| *w == id) {
            self.order.swap_remove(index);
        }
        self.native_index.remove(&window.native);
        for widget in &window.widgets {
            self.native_index.remove(&widget.native);
            self.widget_owners.remove(&widget.id);
        }
        Some(window)
    }

    pub(crate) fn window(&self, id: WindowId) -> Option<&Window<P>> {
        self.windows.get(&id)
    }

    pub(crate) fn window_mut(&mut self, id: WindowId) -> Option<&mut Window<P>> {
        self.windows.get_mut(&id)
    }

    // Returns `false` and drops nothing if the owning window is not registered.
    pub(crate) fn insert_widget(&mut self, widget: Widget<P>) -> bool {
        let Some(window) = self.windows.get_mut(&widget.window) else {
            return false;
        };
        self.native_index.insert(
            widget.native,
            Target::Widget {
                window: widget.window,
                widget: widget.id,
            },
        );
        self.widget_owners.insert(widget.id, widget.window);
        window.push_widget(widget);
        true
    }

    pub(crate) fn remove_widget(&mut self, id: WidgetId) -> Option<Widget<P>> {
        let owner = self.widget_owners.remove(&id)?;
        let widget = self.windows.get_mut(&owner)?.take_widget(id)?;
        self.native_index.remove(&widget.native);
        Some(widget)
    }

    pub(crate) fn widget_owner(&self, id: WidgetId) -> Option<WindowId> {
        self.widget_owners.get(&id).copied()
    }

    pub(crate) fn widget(&self, id: WidgetId) -> Option<&Widget<P>> {
        let owner = self.widget_owners.get(&id)?;
        self.windows.get(owner)?.widget(id)
    }

    pub(crate) fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget<P>> {
        let owner = self.widget_owners.get(&id)?;
        self.windows.get_mut(owner)?.widget_mut(id)
    }

    // The owning window of a widget, for operations that need both at once.
    pub(crate) fn owning_window_mut(&mut self, id: WidgetId) -> Option<&mut Window<P>> {
        let owner = self.widget_owners.get(&id)?;
        self.windows.get_mut(owner)
    }

    pub(crate) fn resolve(&self, native: NativeHandle) -> Option<Target> {
        self.native_index.get(&native).copied()
    }
}
