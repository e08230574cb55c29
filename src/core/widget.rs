use super::models::{Color, Rect, WidgetKind};
use crate::platform_layer::backend::PlatformBackend;
use crate::platform_layer::types::{NativeHandle, UserData, WidgetId, WindowId};

/*
 * The logical, backend-independent description of a widget. The core keeps
 * this authoritative copy and hands it to the backend whenever the native
 * widget must be (re)synchronized.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetProperties {
    pub kind: WidgetKind,
    pub rect: Rect,
    pub text: String,
    pub visible: bool,
    pub enabled: bool,
    pub background: Color,
    pub text_color: Color,
}

impl WidgetProperties {
    // A visible, enabled widget with the default colors for its kind.
    pub fn new(kind: WidgetKind, text: &str, rect: Rect) -> Self {
        let (background, text_color) = kind.default_colors();
        WidgetProperties {
            kind,
            rect,
            text: text.to_string(),
            visible: true,
            enabled: true,
            background,
            text_color,
        }
    }
}

pub(crate) struct Widget<P: PlatformBackend> {
    pub(crate) id: WidgetId,
    pub(crate) window: WindowId,
    pub(crate) native: NativeHandle,
    pub(crate) props: WidgetProperties,
    pub(crate) platform: Option<P::WidgetState>,
    pub(crate) user_data: Option<UserData>,
}

impl<P: PlatformBackend> Widget<P> {
    pub(crate) fn new(
        id: WidgetId,
        window: WindowId,
        native: NativeHandle,
        props: WidgetProperties,
        platform: P::WidgetState,
    ) -> Self {
        Widget {
            id,
            window,
            native,
            props,
            platform: Some(platform),
            user_data: None,
        }
    }
}
