//! Freehand annotation strokes.

use super::ToolContext;
use crate::annotation::{Annotation, AnnotationId, AnnotationKind};
use crate::geo::GeoPoint;
use crate::overlay::{Overlay, OverlayId};
use crate::prompt::NotifyLevel;

/// A stroke being dragged out.
#[derive(Debug, Clone)]
struct Stroke {
    path: Vec<GeoPoint>,
    /// Live polyline, present once the pointer has moved.
    preview: Option<OverlayId>,
}

/// Annotation mode state. Holds a stroke only while the pointer is down.
#[derive(Debug, Clone, Default)]
pub struct StrokeSession {
    stroke: Option<Stroke>,
}

impl StrokeSession {
    pub fn is_dragging(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn path(&self) -> &[GeoPoint] {
        self.stroke.as_ref().map_or(&[], |s| s.path.as_slice())
    }

    pub fn overlays(&self) -> Vec<OverlayId> {
        self.stroke.iter().filter_map(|s| s.preview).collect()
    }

    /// Start a stroke at the pointer-down position. Map panning stays off until it ends.
    pub(crate) fn begin(&mut self, cx: &mut ToolContext<'_>, point: GeoPoint) {
        if self.stroke.is_some() {
            log::warn!("stroke started while another was in progress; dropping the old one");
            self.cancel(cx);
        }
        cx.surface.set_panning(false);
        self.stroke = Some(Stroke {
            path: vec![point],
            preview: None,
        });
    }

    pub(crate) fn extend(&mut self, cx: &mut ToolContext<'_>, point: GeoPoint) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        stroke.path.push(point);
        stroke.preview = Some(cx.replace(
            stroke.preview,
            Overlay::Polyline {
                points: stroke.path.clone(),
                style: cx.config.styles.stroke_preview.clone(),
            },
        ));
    }

    /// Release the pointer. Strokes of two or more points become annotations.
    pub(crate) fn end(&mut self, cx: &mut ToolContext<'_>) -> Option<AnnotationId> {
        let stroke = self.stroke.take()?;
        cx.surface.set_panning(true);

        let preview = match stroke.preview {
            Some(preview) if stroke.path.len() >= 2 => preview,
            leftover => {
                if let Some(id) = leftover {
                    cx.discard(id);
                }
                return None;
            }
        };

        let finished = Overlay::Polyline {
            points: stroke.path.clone(),
            style: cx.config.styles.stroke_final.clone(),
        };
        if !cx.surface.update_overlay(preview, finished) {
            log::warn!("stroke preview {preview} vanished before it could be finalized");
        }
        let id = cx.commit(Annotation::new(
            preview,
            AnnotationKind::FreehandStroke { path: stroke.path },
        ));
        cx.notify(
            "✏️ Annotation added! Click on it to delete.",
            NotifyLevel::Success,
            None,
        );
        Some(id)
    }

    /// Abandon the current stroke and remove its preview.
    pub(crate) fn cancel(&mut self, cx: &mut ToolContext<'_>) {
        if let Some(stroke) = self.stroke.take() {
            if let Some(preview) = stroke.preview {
                cx.discard(preview);
            }
            cx.surface.set_panning(true);
        }
    }

    /// Drop the current stroke without touching its overlays.
    pub(crate) fn reset(&mut self, cx: &mut ToolContext<'_>) {
        if self.stroke.take().is_some() {
            cx.surface.set_panning(true);
        }
    }
}

/// Ask before deleting a finished stroke.
pub(crate) fn confirm_delete(cx: &mut ToolContext<'_>, id: AnnotationId) -> bool {
    if !cx.prompt.confirm("Delete this annotation?") {
        return false;
    }
    cx.delete_annotation(id).is_some()
}
