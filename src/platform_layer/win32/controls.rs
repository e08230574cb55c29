/*
 * Native child controls. Each supported widget kind maps onto one system
 * control class; the handlers own creation and the WM_COMMAND / WM_CTLCOLOR*
 * translation for their class.
 */
pub(crate) mod button_handler;
pub(crate) mod input_handler;
pub(crate) mod label_handler;

use super::styling::ControlColors;
use super::window_common::{hwnd_key, with_shared};
use crate::core::models::WidgetKind;
use crate::core::widget::WidgetProperties;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};

use windows::Win32::{
    Foundation::{HINSTANCE, HWND},
    UI::WindowsAndMessaging::{
        CreateWindowExW, HMENU, WINDOW_EX_STYLE, WINDOW_STYLE, WS_CHILD, WS_DISABLED, WS_VISIBLE,
    },
};
use windows::core::{HSTRING, PCWSTR};

/*
 * Creates the control for `props.kind` under `parent`, with `control_id` as
 * its dialog control id, and records its colors for WM_CTLCOLOR* replies.
 */
pub(crate) fn create_control(
    instance: HINSTANCE,
    parent: HWND,
    control_id: i32,
    props: &WidgetProperties,
) -> PlatformResult<HWND> {
    let (class, class_style): (PCWSTR, WINDOW_STYLE) = match props.kind {
        WidgetKind::Button => button_handler::class_and_style(),
        WidgetKind::Label => label_handler::class_and_style(),
        WidgetKind::TextField => input_handler::class_and_style(),
        other => {
            return Err(PlatformError::ControlCreationFailed(format!(
                "Win32 backend has no {other:?} control"
            )));
        }
    };

    let mut style = WS_CHILD | class_style;
    if props.visible {
        style |= WS_VISIBLE;
    }
    if !props.enabled {
        style |= WS_DISABLED;
    }

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            class,
            &HSTRING::from(props.text.as_str()),
            style,
            props.rect.x,
            props.rect.y,
            props.rect.width,
            props.rect.height,
            Some(parent),
            Some(HMENU(control_id as isize as *mut _)),
            Some(instance),
            None,
        )
    }
    .map_err(|e| {
        PlatformError::ControlCreationFailed(format!(
            "CreateWindowExW for {:?} failed: {e}",
            props.kind
        ))
    })?;

    store_colors(hwnd, props);
    log::debug!(
        "Win32: Created {:?} control (ID {control_id}) with HWND {hwnd:?}.",
        props.kind
    );
    Ok(hwnd)
}

pub(crate) fn store_colors(hwnd: HWND, props: &WidgetProperties) {
    let colors = ControlColors::new(props.text_color, props.background);
    // The replaced entry's brush is dropped after the borrow ends.
    let previous = with_shared(|shared| shared.control_colors.insert(hwnd_key(hwnd), colors));
    drop(previous);
}

pub(crate) fn forget_colors(hwnd: HWND) {
    let previous = with_shared(|shared| shared.control_colors.remove(&hwnd_key(hwnd)));
    drop(previous);
}
