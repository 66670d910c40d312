//! Finalized measurement results and notes that stay on the map for the session.

use crate::geo::{GeoPoint, format_area, format_distance};
use crate::overlay::OverlayId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub type AnnotationId = Uuid;

/// What an annotation records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnnotationKind {
    /// Total length of a ruler path, labeled at the path's middle vertex.
    DistanceLabel {
        midpoint: GeoPoint,
        total_distance_m: f64,
    },
    /// Area of a measured polygon, labeled at its centroid.
    AreaLabel {
        centroid: GeoPoint,
        total_area_sq_m: f64,
        /// The frozen polygon drawn for this measurement.
        polygon: Option<OverlayId>,
    },
    /// A freehand stroke.
    FreehandStroke { path: Vec<GeoPoint> },
    /// A text note.
    TextLabel {
        position: GeoPoint,
        text: String,
        editable: bool,
    },
}

/// A finalized annotation and the overlay that shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    /// The overlay this annotation owns.
    pub overlay: OverlayId,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(overlay: OverlayId, kind: AnnotationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            overlay,
            kind,
        }
    }

    /// Text shown on the annotation's label, if it has one.
    pub fn label_text(&self) -> Option<String> {
        match &self.kind {
            AnnotationKind::DistanceLabel {
                total_distance_m, ..
            } => Some(format_distance(*total_distance_m)),
            AnnotationKind::AreaLabel {
                total_area_sq_m, ..
            } => Some(format_area(*total_area_sq_m)),
            AnnotationKind::TextLabel { text, .. } => Some(text.clone()),
            AnnotationKind::FreehandStroke { .. } => None,
        }
    }

    /// Whether the operator can remove this annotation by clicking it.
    pub fn is_deletable(&self) -> bool {
        matches!(
            self.kind,
            AnnotationKind::FreehandStroke { .. } | AnnotationKind::TextLabel { .. }
        )
    }
}

/// All finalized annotations on one map, in creation order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    annotations: HashMap<AnnotationId, Annotation>,
    order: Vec<AnnotationId>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation and return its id.
    pub fn add(&mut self, annotation: Annotation) -> AnnotationId {
        let id = annotation.id;
        self.order.push(id);
        self.annotations.insert(id, annotation);
        id
    }

    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        self.order.retain(|&entry| entry != id);
        self.annotations.remove(&id)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.get_mut(&id)
    }

    /// Find the annotation that owns an overlay.
    pub fn find_by_overlay(&self, overlay: OverlayId) -> Option<AnnotationId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.annotations.get(id).is_some_and(|a| a.overlay == overlay))
    }

    /// Annotations in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.order.iter().filter_map(|id| self.annotations.get(id))
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Serialize the annotations (in order) to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let ordered: Vec<&Annotation> = self.iter().collect();
        serde_json::to_string_pretty(&ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(overlay: OverlayId, text: &str) -> Annotation {
        Annotation::new(
            overlay,
            AnnotationKind::TextLabel {
                position: GeoPoint::new(-6.2, 106.8),
                text: text.to_string(),
                editable: true,
            },
        )
    }

    #[test]
    fn test_add_and_find_by_overlay() {
        let mut set = AnnotationSet::new();
        let overlay = Uuid::new_v4();
        let id = set.add(text(overlay, "ODC-7"));

        assert_eq!(set.len(), 1);
        assert_eq!(set.find_by_overlay(overlay), Some(id));
        assert_eq!(set.find_by_overlay(Uuid::new_v4()), None);
    }

    #[test]
    fn test_remove() {
        let mut set = AnnotationSet::new();
        let id = set.add(text(Uuid::new_v4(), "ODC-7"));
        assert!(set.remove(id).is_some());
        assert!(set.remove(id).is_none());
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn test_iter_preserves_creation_order() {
        let mut set = AnnotationSet::new();
        let first = set.add(text(Uuid::new_v4(), "a"));
        let second = set.add(text(Uuid::new_v4(), "b"));
        let ids: Vec<AnnotationId> = set.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_label_text() {
        let distance = Annotation::new(
            Uuid::new_v4(),
            AnnotationKind::DistanceLabel {
                midpoint: GeoPoint::default(),
                total_distance_m: 1500.0,
            },
        );
        assert_eq!(distance.label_text().as_deref(), Some("1.50 km"));
        assert!(!distance.is_deletable());

        let stroke = Annotation::new(
            Uuid::new_v4(),
            AnnotationKind::FreehandStroke { path: Vec::new() },
        );
        assert_eq!(stroke.label_text(), None);
        assert!(stroke.is_deletable());
    }

    #[test]
    fn test_to_json_tags_kind() {
        let mut set = AnnotationSet::new();
        set.add(text(Uuid::new_v4(), "ONU"));
        let json = set.to_json().unwrap();
        assert!(json.contains(r#""type": "TextLabel""#));
        assert!(json.contains(r#""text": "ONU""#));
    }
}
