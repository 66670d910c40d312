//! Overlay objects placed on the map and the registry that tracks them.

use crate::geo::GeoPoint;
use crate::surface::MapSurface;
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle of a visual object on the map surface.
pub type OverlayId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`. Anything else is `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Visual style of a marker, line or polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Outline / line color.
    pub stroke_color: SerializableColor,
    /// Line width in pixels.
    pub stroke_width: f64,
    /// Stroke opacity (0.0 - 1.0).
    pub opacity: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Fill opacity (0.0 - 1.0).
    pub fill_opacity: f64,
    /// Dash pattern in pixels; empty means a solid stroke.
    pub dash: Vec<f64>,
    /// Marker radius in pixels (point markers only).
    pub radius: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::new(0x33, 0x88, 0xff, 255),
            stroke_width: 3.0,
            opacity: 1.0,
            fill_color: None,
            fill_opacity: 0.2,
            dash: Vec::new(),
            radius: 6.0,
        }
    }
}

impl OverlayStyle {
    /// Round point marker with a white outline.
    pub fn point_marker(fill: SerializableColor) -> Self {
        Self {
            stroke_color: SerializableColor::white(),
            stroke_width: 2.0,
            fill_color: Some(fill),
            fill_opacity: 1.0,
            radius: 6.0,
            ..Self::default()
        }
    }

    /// Whether the stroke is dashed.
    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }

    /// Dash pattern in the `"10, 5"` form understood by web map surfaces.
    pub fn dash_array(&self) -> Option<String> {
        if self.dash.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.dash.iter().map(|d| format!("{d}")).collect();
        Some(parts.join(", "))
    }

    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        let c = self.stroke_color;
        Color::from_rgba8(c.r, c.g, c.b, scale_alpha(c.a, self.opacity))
    }

    /// Get the fill color with fill opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill_color
            .map(|c| Color::from_rgba8(c.r, c.g, c.b, scale_alpha(c.a, self.fill_opacity)))
    }
}

fn scale_alpha(alpha: u8, opacity: f64) -> u8 {
    (alpha as f64 * opacity.clamp(0.0, 1.0)).round() as u8
}

/// What a positioned label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelKind {
    /// Total length of a ruler path.
    Distance,
    /// Area of a measured polygon.
    Area,
    /// Free text entered by the operator.
    Text,
}

/// Description of a visual object to place on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Overlay {
    PointMarker {
        position: GeoPoint,
        style: OverlayStyle,
    },
    Polyline {
        points: Vec<GeoPoint>,
        style: OverlayStyle,
    },
    Polygon {
        points: Vec<GeoPoint>,
        style: OverlayStyle,
    },
    Label {
        position: GeoPoint,
        kind: LabelKind,
        /// Plain text. Never interpreted as markup.
        text: String,
        draggable: bool,
    },
}

impl Overlay {
    /// Anchor position used for popups and hit reporting.
    pub fn anchor(&self) -> Option<GeoPoint> {
        match self {
            Overlay::PointMarker { position, .. } | Overlay::Label { position, .. } => {
                Some(*position)
            }
            Overlay::Polyline { points, .. } | Overlay::Polygon { points, .. } => {
                points.first().copied()
            }
        }
    }

    pub fn style(&self) -> Option<&OverlayStyle> {
        match self {
            Overlay::PointMarker { style, .. }
            | Overlay::Polyline { style, .. }
            | Overlay::Polygon { style, .. } => Some(style),
            Overlay::Label { .. } => None,
        }
    }

    /// HTML body for surfaces that render labels as HTML markers.
    ///
    /// The label text is escaped, so operator input always shows up literally.
    pub fn label_html(&self) -> Option<String> {
        let Overlay::Label { kind, text, .. } = self else {
            return None;
        };
        let text = escape_html(text);
        Some(match kind {
            LabelKind::Distance => format!(
                r#"<div class="measurement-label"><i class="bi bi-rulers"></i> {text}</div>"#
            ),
            LabelKind::Area => format!(
                r#"<div class="measurement-label area"><i class="bi bi-bounding-box"></i> {text}</div>"#
            ),
            LabelKind::Text => format!(r#"<div class="map-text-label">{text}</div>"#),
        })
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Every overlay the tools have placed on the map, in insertion order.
///
/// The registry only tracks handles; it exists so that bulk teardown and
/// single removals leave nothing behind on the surface.
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    entries: Vec<OverlayId>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an overlay.
    pub fn add(&mut self, id: OverlayId) {
        self.entries.push(id);
    }

    /// Stop tracking the first matching entry. Returns false if it was not tracked.
    pub fn remove(&mut self, id: OverlayId) -> bool {
        match self.entries.iter().position(|&entry| entry == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every tracked overlay from the surface and forget them.
    ///
    /// Returns how many entries were dropped.
    pub fn clear(&mut self, surface: &mut dyn MapSurface) -> usize {
        let count = self.entries.len();
        for id in self.entries.drain(..) {
            if !surface.remove_overlay(id) {
                log::warn!("overlay {id} was tracked but already gone from the map");
            }
        }
        count
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.entries.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = OverlayId> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn marker() -> Overlay {
        Overlay::PointMarker {
            position: GeoPoint::new(0.0, 0.0),
            style: OverlayStyle::default(),
        }
    }

    #[test]
    fn test_registry_add_remove() {
        let mut registry = OverlayRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        registry.add(a);
        registry.add(b);
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(a));
        assert!(!registry.contains(a));
        assert!(registry.contains(b));
    }

    #[test]
    fn test_registry_remove_is_idempotent() {
        let mut registry = OverlayRegistry::new();
        let a = Uuid::new_v4();
        registry.add(a);
        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_clear_removes_from_surface() {
        let mut surface = MemorySurface::new();
        let mut registry = OverlayRegistry::new();
        for _ in 0..3 {
            let id = surface.add_overlay(marker());
            registry.add(id);
        }
        assert_eq!(surface.overlay_count(), 3);

        assert_eq!(registry.clear(&mut surface), 3);
        assert!(registry.is_empty());
        assert_eq!(surface.overlay_count(), 0);

        // Clearing again is harmless.
        assert_eq!(registry.clear(&mut surface), 0);
    }

    #[test]
    fn test_registry_keeps_insertion_order() {
        let mut registry = OverlayRegistry::new();
        let ids: Vec<OverlayId> = (0..4).map(|_| Uuid::new_v4()).collect();
        for &id in &ids {
            registry.add(id);
        }
        assert_eq!(registry.iter().collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_label_html_escapes_text() {
        let label = Overlay::Label {
            position: GeoPoint::new(0.0, 0.0),
            kind: LabelKind::Text,
            text: "<b>ODP-1</b> & \"core\"".to_string(),
            draggable: true,
        };
        assert_eq!(
            label.label_html().as_deref(),
            Some(r#"<div class="map-text-label">&lt;b&gt;ODP-1&lt;/b&gt; &amp; &quot;core&quot;</div>"#)
        );
        assert!(marker().label_html().is_none());
    }

    #[test]
    fn test_hex_colors() {
        let blue = SerializableColor::from_hex("#3b82f6").unwrap();
        assert_eq!(blue, SerializableColor::new(0x3b, 0x82, 0xf6, 255));
        assert_eq!(blue.to_hex(), "#3b82f6");
        assert!(SerializableColor::from_hex("3b82f6").is_none());
        assert!(SerializableColor::from_hex("#xyz").is_none());
    }

    #[test]
    fn test_dash_array() {
        let mut style = OverlayStyle::default();
        assert_eq!(style.dash_array(), None);
        style.dash = vec![10.0, 5.0];
        assert_eq!(style.dash_array().as_deref(), Some("10, 5"));
        assert!(style.is_dashed());
    }
}
