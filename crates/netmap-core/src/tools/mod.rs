//! Drawing tools: the active mode and its in-progress buffer.

mod freehand;
mod measure;
mod text;

pub use freehand::StrokeSession;
pub use measure::MeasurementSession;

use crate::annotation::{Annotation, AnnotationId, AnnotationSet};
use crate::config::ToolConfig;
use crate::geo::{self, GeoPoint};
use crate::interaction::{EventBindings, EventKind};
use crate::overlay::{Overlay, OverlayId, OverlayRegistry};
use crate::prompt::{Notifier, NotifyLevel, UserPrompt};
use crate::surface::{CursorStyle, MapSurface};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub(crate) use freehand::confirm_delete;
pub(crate) use text::{drag_label, edit_label, place_label};

/// Available drawing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    None,
    Ruler,
    Area,
    Annotation,
    Text,
}

/// A mode name that is not one of `none`, `ruler`, `area`, `annotation`, `text`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool mode: {0:?}")]
pub struct ParseToolModeError(pub String);

impl ToolMode {
    pub fn all() -> &'static [ToolMode] {
        &[
            ToolMode::None,
            ToolMode::Ruler,
            ToolMode::Area,
            ToolMode::Annotation,
            ToolMode::Text,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolMode::None => "none",
            ToolMode::Ruler => "ruler",
            ToolMode::Area => "area",
            ToolMode::Annotation => "annotation",
            ToolMode::Text => "text",
        }
    }

    /// Cursor shown over the map while the mode is active.
    pub fn cursor(self) -> CursorStyle {
        match self {
            ToolMode::None => CursorStyle::Default,
            ToolMode::Ruler | ToolMode::Area | ToolMode::Annotation => CursorStyle::Crosshair,
            ToolMode::Text => CursorStyle::Text,
        }
    }

    /// Usage hint shown when the mode is activated.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            ToolMode::None => None,
            ToolMode::Ruler => Some(
                "📏 Ruler Tool: Click points to measure distance. Double-click or press ESC to finish.",
            ),
            ToolMode::Area => Some(
                "📐 Area Tool: Click points to draw polygon. Double-click or press ESC to finish.",
            ),
            ToolMode::Annotation => {
                Some("✏️ Annotation Tool: Click and drag to draw. Release to finish.")
            }
            ToolMode::Text => Some("📝 Text Tool: Click on map to add a text label."),
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolMode {
    type Err = ParseToolModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolMode::all()
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| ParseToolModeError(s.to_string()))
    }
}

/// The active mode together with its in-progress work.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// No tool is active.
    #[default]
    Idle,
    /// Accumulating ruler vertices.
    Ruler(MeasurementSession),
    /// Accumulating polygon vertices.
    Area(MeasurementSession),
    /// Waiting for or drawing a freehand stroke.
    Annotation(StrokeSession),
    /// Waiting for a click to place a text label.
    Text,
}

impl ToolState {
    /// Fresh state for a mode, with an empty buffer.
    pub fn enter(mode: ToolMode) -> Self {
        match mode {
            ToolMode::None => ToolState::Idle,
            ToolMode::Ruler => ToolState::Ruler(MeasurementSession::default()),
            ToolMode::Area => ToolState::Area(MeasurementSession::default()),
            ToolMode::Annotation => ToolState::Annotation(StrokeSession::default()),
            ToolMode::Text => ToolState::Text,
        }
    }

    pub fn mode(&self) -> ToolMode {
        match self {
            ToolState::Idle => ToolMode::None,
            ToolState::Ruler(_) => ToolMode::Ruler,
            ToolState::Area(_) => ToolMode::Area,
            ToolState::Annotation(_) => ToolMode::Annotation,
            ToolState::Text => ToolMode::Text,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ToolState::Idle)
    }

    /// Events this state needs delivered.
    pub fn bindings(&self) -> EventBindings {
        match self {
            ToolState::Idle => EventBindings::NONE,
            ToolState::Ruler(_) | ToolState::Area(_) => EventBindings::NONE
                .with(EventKind::Click)
                .with(EventKind::DoubleClick)
                .with(EventKind::KeyDown),
            ToolState::Annotation(session) if session.is_dragging() => EventBindings::NONE
                .with(EventKind::PointerDown)
                .with(EventKind::PointerMove)
                .with(EventKind::PointerUp),
            ToolState::Annotation(_) => EventBindings::NONE.with(EventKind::PointerDown),
            ToolState::Text => EventBindings::NONE.with(EventKind::Click),
        }
    }

    /// The in-progress point or path buffer.
    pub fn points(&self) -> &[GeoPoint] {
        match self {
            ToolState::Ruler(session) | ToolState::Area(session) => session.points(),
            ToolState::Annotation(session) => session.path(),
            ToolState::Idle | ToolState::Text => &[],
        }
    }

    /// Overlays owned by the in-progress work, not yet part of any finalized result.
    pub fn overlays(&self) -> Vec<OverlayId> {
        match self {
            ToolState::Ruler(session) | ToolState::Area(session) => session.overlays(),
            ToolState::Annotation(session) => session.overlays(),
            ToolState::Idle | ToolState::Text => Vec::new(),
        }
    }

    /// Throw away the in-progress work and its overlays.
    pub(crate) fn discard(&mut self, cx: &mut ToolContext<'_>) {
        match self {
            ToolState::Ruler(session) | ToolState::Area(session) => session.discard(cx),
            ToolState::Annotation(session) => session.cancel(cx),
            ToolState::Idle | ToolState::Text => {}
        }
    }

    /// Forget the buffer without touching the map, for when the overlays are already gone.
    pub(crate) fn reset_buffer(&mut self, cx: &mut ToolContext<'_>) {
        match self {
            ToolState::Ruler(session) | ToolState::Area(session) => session.reset(),
            ToolState::Annotation(session) => session.reset(cx),
            ToolState::Idle | ToolState::Text => {}
        }
    }
}

/// Everything a tool may touch while handling an event.
pub(crate) struct ToolContext<'a> {
    pub surface: &'a mut dyn MapSurface,
    pub registry: &'a mut OverlayRegistry,
    pub annotations: &'a mut AnnotationSet,
    pub prompt: &'a mut dyn UserPrompt,
    pub notifier: &'a mut dyn Notifier,
    pub config: &'a ToolConfig,
}

impl ToolContext<'_> {
    /// Put an overlay on the map and track it.
    pub fn place(&mut self, overlay: Overlay) -> OverlayId {
        let id = self.surface.add_overlay(overlay);
        self.registry.add(id);
        id
    }

    /// Take an overlay off the map and stop tracking it.
    pub fn discard(&mut self, id: OverlayId) {
        if !self.surface.remove_overlay(id) {
            log::warn!("overlay {id} missing from the map on removal");
        }
        self.registry.remove(id);
    }

    /// Replace a preview overlay wholesale.
    pub fn replace(&mut self, previous: Option<OverlayId>, overlay: Overlay) -> OverlayId {
        if let Some(previous) = previous {
            self.discard(previous);
        }
        self.place(overlay)
    }

    pub fn commit(&mut self, annotation: Annotation) -> AnnotationId {
        log::info!("committed {:?} on overlay {}", annotation.kind, annotation.overlay);
        self.annotations.add(annotation)
    }

    /// Delete an annotation together with its overlay.
    pub fn delete_annotation(&mut self, id: AnnotationId) -> Option<Annotation> {
        let annotation = self.annotations.remove(id)?;
        self.discard(annotation.overlay);
        Some(annotation)
    }

    pub fn notify(&mut self, message: &str, level: NotifyLevel, duration_ms: Option<u64>) {
        self.notifier.notify(message, level, duration_ms);
    }

    /// Area of a polygon: geodesic when the map offers a routine, planar otherwise.
    pub fn polygon_area(&self, points: &[GeoPoint]) -> f64 {
        geo::polygon_area(points, self.surface.geodesic())
    }
}
