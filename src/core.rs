/*
 * This module consolidates the platform-agnostic part of the toolkit: value
 * types (colors, rectangles, widget kinds), the logical window and widget
 * records, the registry of live windows, and the persisted configuration
 * together with its path utilities.
 */
pub mod config;
pub mod models;
pub mod path_utils;
pub(crate) mod registry;
pub mod widget;
pub mod window;

// Re-export key value types
pub use models::{
    BLACK, BLUE, CYAN, Color, GRAY, GREEN, MAGENTA, RED, Rect, TRANSPARENT, WHITE, WidgetKind,
    YELLOW, create_color,
};

// Re-export config related items
pub use config::{ConfigError, ConfigManagerOperations, CoreConfigManager, ToolkitConfig};

pub use widget::WidgetProperties;
pub use window::WindowProperties;
