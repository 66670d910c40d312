//! Glyph tool buttons.

use egui::{vec2, Align2, Color32, CornerRadius, CursorIcon, FontId, Sense, Ui, Vec2};

use crate::{sizing, theme};

/// Style configuration for tool buttons.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolButtonStyle {
    /// Button size
    pub size: Vec2,
    /// Glyph font size
    pub glyph_size: f32,
    /// Corner radius
    pub corner_radius: u8,
    /// Background color when not selected
    pub bg_color: Color32,
    /// Background color when hovered
    pub hover_color: Color32,
    /// Background color when selected/active
    pub selected_color: Color32,
    /// Glyph color
    pub glyph_color: Color32,
}

impl Default for ToolButtonStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::TOOL, sizing::TOOL),
            glyph_size: sizing::GLYPH,
            corner_radius: sizing::CORNER_RADIUS,
            bg_color: Color32::TRANSPARENT,
            hover_color: theme::HOVER_BG,
            selected_color: theme::ACCENT,
            glyph_color: theme::TEXT,
        }
    }
}

impl ToolButtonStyle {
    /// Style for destructive actions: red glyph, red hover.
    pub fn danger() -> Self {
        Self {
            hover_color: theme::DANGER.gamma_multiply(0.15),
            glyph_color: theme::DANGER,
            ..Self::default()
        }
    }

    /// Background for the given interaction state.
    pub fn background(&self, selected: bool, hovered: bool) -> Color32 {
        if selected {
            self.selected_color
        } else if hovered {
            self.hover_color
        } else {
            self.bg_color
        }
    }
}

/// A toolbar button that shows a text glyph.
pub struct ToolButton<'a> {
    glyph: &'a str,
    tooltip: &'a str,
    selected: bool,
    style: ToolButtonStyle,
}

impl<'a> ToolButton<'a> {
    pub fn new(glyph: &'a str, tooltip: &'a str) -> Self {
        Self {
            glyph,
            tooltip,
            selected: false,
            style: ToolButtonStyle::default(),
        }
    }

    /// Set whether the button is selected/active.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn style(mut self, style: ToolButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = self.style.background(self.selected, response.hovered());
            ui.painter().rect_filled(
                rect,
                CornerRadius::same(self.style.corner_radius),
                bg_color,
            );

            let glyph_color = if self.selected {
                Color32::WHITE
            } else {
                self.style.glyph_color
            };
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.glyph,
                FontId::proportional(self.style.glyph_size),
                glyph_color,
            );
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_priority() {
        let style = ToolButtonStyle::default();
        assert_eq!(style.background(true, true), theme::ACCENT);
        assert_eq!(style.background(false, true), theme::HOVER_BG);
        assert_eq!(style.background(false, false), Color32::TRANSPARENT);
    }

    #[test]
    fn test_danger_style() {
        let style = ToolButtonStyle::danger();
        assert_eq!(style.glyph_color, theme::DANGER);
        assert_eq!(style.selected_color, theme::ACCENT);
    }
}
