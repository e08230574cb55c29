/*
 * Draws widgets for the X11 backend. X11 widgets are plain child windows, so
 * every button, label and text field is painted here with core protocol
 * primitives: a background fill, an optional one-pixel border, and a line of
 * text in the core font.
 *
 * - Button: background, border, text centered both ways.
 * - Label: background only when not transparent, text 5px from the left.
 * - TextField: background, border, text 5px from the left.
 *
 * Disabled widgets draw their text in gray.
 */
use crate::core::models::{BLACK, Color, GRAY, WidgetKind};
use crate::core::widget::WidgetProperties;
use x11rb::connection::Connection;
use x11rb::errors::ConnectionError;
use x11rb::protocol::xproto::{self, ChangeGCAux, ConnectionExt as _, Gcontext, Rectangle};

const TEXT_INSET: i16 = 5;
// A single TEXTELT8 item carries at most 254 bytes.
const MAX_TEXT_ITEM: usize = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FontMetrics {
    pub(crate) ascent: i16,
    pub(crate) descent: i16,
    pub(crate) char_width: i16,
}

pub(crate) fn color_to_pixel(color: Color) -> u32 {
    (u32::from(color.r) << 16) | (u32::from(color.g) << 8) | u32::from(color.b)
}

// Core X fonts are indexed by Latin-1 byte; anything beyond that becomes '?'.
pub(crate) fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

pub(crate) fn dimension(value: i32) -> u16 {
    value.clamp(1, i32::from(u16::MAX)) as u16
}

pub(crate) fn coordinate(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/*
 * Encodes text as a PolyText8 item list: each item is a length byte, a zero
 * x-delta, then up to 254 bytes of text.
 */
pub(crate) fn encode_text_items(text: &[u8]) -> Vec<u8> {
    let mut items = Vec::with_capacity(text.len() + 2 * text.len().div_ceil(MAX_TEXT_ITEM));
    for chunk in text.chunks(MAX_TEXT_ITEM) {
        items.push(chunk.len() as u8);
        items.push(0);
        items.extend_from_slice(chunk);
    }
    items
}

// Baseline origin of the text inside a widget of the given size.
pub(crate) fn text_origin(
    kind: WidgetKind,
    width: u16,
    height: u16,
    text_len: usize,
    metrics: FontMetrics,
) -> (i16, i16) {
    let height = i32::from(height);
    let baseline = (height + i32::from(metrics.ascent) - i32::from(metrics.descent)) / 2;
    let x = match kind {
        WidgetKind::Button => {
            let text_width = i32::try_from(text_len)
                .unwrap_or(i32::MAX)
                .saturating_mul(i32::from(metrics.char_width));
            (i32::from(width) - text_width) / 2
        }
        _ => i32::from(TEXT_INSET),
    };
    (coordinate(x), coordinate(baseline))
}

pub(crate) fn paint_widget(
    conn: &impl Connection,
    gc: Gcontext,
    window: xproto::Window,
    metrics: FontMetrics,
    props: &WidgetProperties,
) -> Result<(), ConnectionError> {
    let width = dimension(props.rect.width);
    let height = dimension(props.rect.height);
    let whole = Rectangle {
        x: 0,
        y: 0,
        width,
        height,
    };

    conn.clear_area(false, window, 0, 0, 0, 0)?;
    if !props.background.is_transparent() {
        conn.change_gc(
            gc,
            &ChangeGCAux::new().foreground(color_to_pixel(props.background)),
        )?;
        conn.poly_fill_rectangle(window, gc, &[whole])?;
    }

    if matches!(props.kind, WidgetKind::Button | WidgetKind::TextField) {
        conn.change_gc(gc, &ChangeGCAux::new().foreground(color_to_pixel(BLACK)))?;
        let border = Rectangle {
            x: 0,
            y: 0,
            width: width.saturating_sub(1),
            height: height.saturating_sub(1),
        };
        conn.poly_rectangle(window, gc, &[border])?;
    }

    if props.text.is_empty() {
        return Ok(());
    }
    let text = latin1_bytes(&props.text);
    let text_color = if props.enabled { props.text_color } else { GRAY };
    let (x, y) = text_origin(props.kind, width, height, text.len(), metrics);
    conn.change_gc(gc, &ChangeGCAux::new().foreground(color_to_pixel(text_color)))?;
    conn.poly_text8(window, gc, x, y, &encode_text_items(&text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{RED, WHITE};

    const FIXED: FontMetrics = FontMetrics {
        ascent: 11,
        descent: 2,
        char_width: 6,
    };

    #[test]
    fn test_color_to_pixel_is_rgb_packed() {
        assert_eq!(color_to_pixel(WHITE), 0x00ff_ffff);
        assert_eq!(color_to_pixel(RED), 0x00ff_0000);
        assert_eq!(color_to_pixel(Color::new(0x12, 0x34, 0x56, 0)), 0x0012_3456);
    }

    #[test]
    fn test_latin1_bytes_replaces_wide_characters() {
        assert_eq!(latin1_bytes("abc"), b"abc".to_vec());
        assert_eq!(latin1_bytes("café"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(latin1_bytes("a€b"), b"a?b".to_vec());
    }

    #[test]
    fn test_encode_text_items_splits_long_text() {
        // Arrange
        let text = vec![b'x'; 300];

        // Act
        let items = encode_text_items(&text);

        // Assert
        assert_eq!(items.len(), 300 + 4);
        assert_eq!(&items[..2], &[254, 0]);
        assert_eq!(&items[256..258], &[46, 0]);
        assert!(encode_text_items(b"").is_empty());
    }

    #[test]
    fn test_text_origin_per_kind() {
        // Button: "OK" is 12px wide in a 100px button.
        assert_eq!(text_origin(WidgetKind::Button, 100, 30, 2, FIXED), (44, 19));
        assert_eq!(text_origin(WidgetKind::Label, 100, 20, 5, FIXED), (5, 14));
        assert_eq!(text_origin(WidgetKind::TextField, 100, 20, 50, FIXED), (5, 14));
    }

    #[test]
    fn test_dimension_and_coordinate_clamp() {
        assert_eq!(dimension(0), 1);
        assert_eq!(dimension(-5), 1);
        assert_eq!(dimension(70_000), u16::MAX);
        assert_eq!(coordinate(40_000), i16::MAX);
        assert_eq!(coordinate(-40_000), i16::MIN);
        assert_eq!(coordinate(12), 12);
    }
}
