//! Ruler and area measurement: click to add vertices, finish to label the result.

use super::ToolContext;
use crate::annotation::{Annotation, AnnotationId, AnnotationKind};
use crate::geo::{self, GeoPoint, format_area, format_distance};
use crate::overlay::{LabelKind, Overlay, OverlayId, OverlayStyle};
use crate::prompt::NotifyLevel;

/// Vertices clicked so far and the overlays drawn for them.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSession {
    points: Vec<GeoPoint>,
    /// One point marker per vertex.
    markers: Vec<OverlayId>,
    /// Live line (ruler) or polygon (area), present from the second vertex on.
    preview: Option<OverlayId>,
}

impl MeasurementSession {
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn preview(&self) -> Option<OverlayId> {
        self.preview
    }

    pub fn overlays(&self) -> Vec<OverlayId> {
        self.markers.iter().copied().chain(self.preview).collect()
    }

    pub(crate) fn add_ruler_point(&mut self, cx: &mut ToolContext<'_>, point: GeoPoint) {
        let styles = &cx.config.styles;
        let (marker_style, line_style) = (styles.ruler_marker.clone(), styles.ruler_line.clone());

        self.push_vertex(cx, point, marker_style);
        if self.points.len() < 2 {
            return;
        }

        self.preview = Some(cx.replace(
            self.preview,
            Overlay::Polyline {
                points: self.points.clone(),
                style: line_style,
            },
        ));

        let total = geo::path_length(&self.points);
        let popup_ms = cx.config.durations.distance_popup_ms;
        cx.surface.show_popup(point, &format_distance(total), popup_ms);
    }

    pub(crate) fn add_area_point(&mut self, cx: &mut ToolContext<'_>, point: GeoPoint) {
        let styles = &cx.config.styles;
        let (marker_style, polygon_style) =
            (styles.area_marker.clone(), styles.area_preview.clone());

        self.push_vertex(cx, point, marker_style);
        if self.points.len() < 2 {
            return;
        }

        self.preview = Some(cx.replace(
            self.preview,
            Overlay::Polygon {
                points: self.points.clone(),
                style: polygon_style,
            },
        ));

        if self.points.len() >= 3 {
            let area = cx.polygon_area(&self.points);
            let readout_ms = cx.config.durations.area_readout_ms;
            cx.notify(
                &format!("Current area: {}", format_area(area)),
                NotifyLevel::Info,
                Some(readout_ms),
            );
        }
    }

    /// Label the total path length at the middle vertex.
    ///
    /// With fewer than two vertices nothing is labeled and the session's
    /// overlays are removed.
    pub(crate) fn finish_ruler(&mut self, cx: &mut ToolContext<'_>) -> Option<AnnotationId> {
        if self.points.len() < 2 {
            self.discard(cx);
            return None;
        }

        let total = geo::path_length(&self.points);
        let midpoint = self.points[self.points.len() / 2];
        let text = format_distance(total);
        let label = cx.place(Overlay::Label {
            position: midpoint,
            kind: LabelKind::Distance,
            text: text.clone(),
            draggable: false,
        });
        let id = cx.commit(Annotation::new(
            label,
            AnnotationKind::DistanceLabel {
                midpoint,
                total_distance_m: total,
            },
        ));
        cx.notify(
            &format!("📏 Total Distance: {text}"),
            NotifyLevel::Success,
            None,
        );

        self.reset();
        Some(id)
    }

    /// Freeze the polygon and label its area at the centroid.
    ///
    /// With fewer than three vertices nothing is labeled and the session's
    /// overlays are removed.
    pub(crate) fn finish_area(&mut self, cx: &mut ToolContext<'_>) -> Option<AnnotationId> {
        if self.points.len() < 3 {
            self.discard(cx);
            return None;
        }

        let area = cx.polygon_area(&self.points);
        let centroid = geo::centroid(&self.points);

        if let Some(polygon) = self.preview {
            let frozen = Overlay::Polygon {
                points: self.points.clone(),
                style: cx.config.styles.area_final.clone(),
            };
            if !cx.surface.update_overlay(polygon, frozen) {
                log::warn!("area polygon {polygon} vanished before it could be frozen");
            }
        }

        let text = format_area(area);
        let label = cx.place(Overlay::Label {
            position: centroid,
            kind: LabelKind::Area,
            text: text.clone(),
            draggable: false,
        });
        let id = cx.commit(Annotation::new(
            label,
            AnnotationKind::AreaLabel {
                centroid,
                total_area_sq_m: area,
                polygon: self.preview,
            },
        ));
        cx.notify(&format!("📐 Total Area: {text}"), NotifyLevel::Success, None);

        self.reset();
        Some(id)
    }

    /// Remove every overlay of the session and empty the buffer.
    pub(crate) fn discard(&mut self, cx: &mut ToolContext<'_>) {
        for id in self.overlays() {
            cx.discard(id);
        }
        self.reset();
    }

    /// Empty the buffer, handing the overlays over to the map.
    pub(crate) fn reset(&mut self) {
        self.points.clear();
        self.markers.clear();
        self.preview = None;
    }

    fn push_vertex(&mut self, cx: &mut ToolContext<'_>, point: GeoPoint, style: OverlayStyle) {
        self.points.push(point);
        let marker = cx.place(Overlay::PointMarker {
            position: point,
            style,
        });
        self.markers.push(marker);
    }
}
