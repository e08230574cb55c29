/*
 * Plain value types shared by every layer of the toolkit: colors, rectangles
 * and the widget kind tag. None of these know anything about a native
 * windowing system; the platform backends translate them at their boundary.
 */
use serde::{Deserialize, Serialize};

/// An RGBA color with 8-bit channels. An alpha of 0 means "do not paint".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

pub const BLACK: Color = Color::new(0, 0, 0, 255);
pub const WHITE: Color = Color::new(255, 255, 255, 255);
pub const RED: Color = Color::new(255, 0, 0, 255);
pub const GREEN: Color = Color::new(0, 255, 0, 255);
pub const BLUE: Color = Color::new(0, 0, 255, 255);
pub const YELLOW: Color = Color::new(255, 255, 0, 255);
pub const CYAN: Color = Color::new(0, 255, 255, 255);
pub const MAGENTA: Color = Color::new(255, 0, 255, 255);
pub const GRAY: Color = Color::new(128, 128, 128, 255);
pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

/// Builds a color from its four channels.
pub fn create_color(r: u8, g: u8, b: u8, a: u8) -> Color {
    Color::new(r, g, b, a)
}

/// A rectangle in window client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/*
 * The kind of a widget. Only `Button`, `Label` and `TextField` have a native
 * representation; the remaining kinds are reserved names that every backend
 * refuses to create.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    Button,
    Label,
    TextField,
    Checkbox,
    Slider,
    Panel,
}

impl WidgetKind {
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            WidgetKind::Button | WidgetKind::Label | WidgetKind::TextField
        )
    }

    // Background and text color a freshly created widget of this kind starts with.
    pub fn default_colors(&self) -> (Color, Color) {
        match self {
            WidgetKind::Label => (TRANSPARENT, BLACK),
            _ => (WHITE, BLACK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_color_keeps_channels() {
        // Arrange & Act
        let color = create_color(10, 20, 30, 40);

        // Assert
        assert_eq!(color, Color::new(10, 20, 30, 40));
        assert!(!color.is_transparent());
        assert!(TRANSPARENT.is_transparent());
    }

    #[test]
    fn test_default_colors_per_kind() {
        assert_eq!(WidgetKind::Button.default_colors(), (WHITE, BLACK));
        assert_eq!(WidgetKind::TextField.default_colors(), (WHITE, BLACK));
        assert_eq!(WidgetKind::Label.default_colors(), (TRANSPARENT, BLACK));
    }

    #[test]
    fn test_only_native_kinds_are_supported() {
        assert!(WidgetKind::Button.is_supported());
        assert!(WidgetKind::Label.is_supported());
        assert!(WidgetKind::TextField.is_supported());
        assert!(!WidgetKind::Checkbox.is_supported());
        assert!(!WidgetKind::Slider.is_supported());
        assert!(!WidgetKind::Panel.is_supported());
    }
}
