//! egui widgets for the map measurement tools.
//!
//! - **Buttons**: glyph tool buttons with selected and danger states
//! - **Toolbar**: the grouped tool strip and the cursor coordinate readout
//! - **Layout**: frames and separators

pub mod buttons;
pub mod layout;
pub mod toolbar;

pub use buttons::{ToolButton, ToolButtonStyle};
pub use layout::{toolbar_frame, vertical_separator};
pub use toolbar::{coordinate_readout, map_toolbar};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Toolbar button size
    pub const TOOL: f32 = 32.0;
    /// Glyph font size inside tool buttons
    pub const GLYPH: f32 = 16.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 6;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Destructive action color (red)
    pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(235, 235, 235);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
