use super::widget::Widget;
use crate::platform_layer::backend::PlatformBackend;
use crate::platform_layer::types::{NativeHandle, UserData, WidgetId, WindowId};
use crate::toolkit::EventCallback;

// The logical description of a top-level window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowProperties {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub visible: bool,
    pub resizable: bool,
}

impl WindowProperties {
    // Windows always start hidden.
    pub fn new(title: &str, width: i32, height: i32, resizable: bool) -> Self {
        WindowProperties {
            title: title.to_string(),
            width,
            height,
            visible: false,
            resizable,
        }
    }
}

/*
 * A live window together with the widgets it owns. The widget list keeps no
 * meaningful order: removal swaps the last widget into the freed slot.
 */
pub(crate) struct Window<P: PlatformBackend> {
    pub(crate) id: WindowId,
    pub(crate) native: NativeHandle,
    pub(crate) props: WindowProperties,
    pub(crate) widgets: Vec<Widget<P>>,
    pub(crate) platform: Option<P::WindowState>,
    pub(crate) callback: Option<EventCallback<P>>,
    // Bumped on every `set_event_callback` so an in-flight dispatch can tell
    // whether its callback was replaced.
    pub(crate) callback_generation: u64,
    pub(crate) user_data: Option<UserData>,
}

impl<P: PlatformBackend> Window<P> {
    pub(crate) fn new(
        id: WindowId,
        native: NativeHandle,
        props: WindowProperties,
        platform: P::WindowState,
        widget_capacity: usize,
    ) -> Self {
        Window {
            id,
            native,
            props,
            widgets: Vec::with_capacity(widget_capacity),
            platform: Some(platform),
            callback: None,
            callback_generation: 0,
            user_data: None,
        }
    }

    pub(crate) fn widget(&self, id: WidgetId) -> Option<&Widget<P>> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub(crate) fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget<P>> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    pub(crate) fn push_widget(&mut self, widget: Widget<P>) {
        debug_assert_eq!(widget.window, self.id);
        debug_assert!(self.widget(widget.id).is_none());
        self.widgets.push(widget);
    }

    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Widget<P>> {
        let index = self.widgets.iter().position(|w| w.id == id)?;
        Some(self.widgets.swap_remove(index))
    }

    pub(crate) fn widget_ids(&self) -> Vec<WidgetId> {
        self.widgets.iter().map(|w| w.id).collect()
    }
}
