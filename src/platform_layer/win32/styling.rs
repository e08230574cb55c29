/*
 * GDI color resources for the Win32 backend. Native controls take their
 * colors from WM_CTLCOLOR* replies, so every widget with an opaque background
 * owns a solid brush that lives as long as its colors stay unchanged.
 */
use crate::core::models::Color;
use windows::Win32::Foundation::COLORREF;
use windows::Win32::Graphics::Gdi::{CreateSolidBrush, DeleteObject, HBRUSH, HGDIOBJ};

/*
 * Win32 expects colors in BGR order. Alpha has no GDI counterpart and is
 * dropped.
 */
pub(crate) fn color_to_colorref(color: Color) -> COLORREF {
    COLORREF(u32::from(color.r) | (u32::from(color.g) << 8) | (u32::from(color.b) << 16))
}

// A solid brush, deleted on drop.
#[derive(Debug)]
pub(crate) struct ControlBrush {
    brush: HBRUSH,
}

impl ControlBrush {
    pub(crate) fn solid(color: Color) -> Option<Self> {
        let brush = unsafe { CreateSolidBrush(color_to_colorref(color)) };
        if brush.is_invalid() {
            log::warn!("Win32: CreateSolidBrush failed for {color:?}.");
            return None;
        }
        Some(ControlBrush { brush })
    }

    pub(crate) fn handle(&self) -> HBRUSH {
        self.brush
    }
}

impl Drop for ControlBrush {
    fn drop(&mut self) {
        unsafe {
            _ = DeleteObject(HGDIOBJ(self.brush.0));
        }
    }
}

/*
 * The colors a control paints with. A `None` background means the control
 * is drawn transparently over its parent.
 */
#[derive(Debug)]
pub(crate) struct ControlColors {
    pub(crate) text: COLORREF,
    pub(crate) background: Option<(COLORREF, ControlBrush)>,
}

impl ControlColors {
    pub(crate) fn new(text: Color, background: Color) -> Self {
        let background = if background.is_transparent() {
            None
        } else {
            ControlBrush::solid(background).map(|brush| (color_to_colorref(background), brush))
        };
        ControlColors {
            text: color_to_colorref(text),
            background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{BLUE, RED, WHITE};

    #[test]
    fn test_color_to_colorref_swaps_to_bgr() {
        assert_eq!(color_to_colorref(RED), COLORREF(0x0000_00ff));
        assert_eq!(color_to_colorref(BLUE), COLORREF(0x00ff_0000));
        assert_eq!(color_to_colorref(WHITE), COLORREF(0x00ff_ffff));
        assert_eq!(
            color_to_colorref(Color::new(0x12, 0x34, 0x56, 0x80)),
            COLORREF(0x0056_3412)
        );
    }
}
