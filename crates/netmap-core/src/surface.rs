//! The map surface the tools draw on.
//!
//! The real surface (tiles, projection, rendering) lives outside this crate.
//! [`MemorySurface`] is a headless implementation for tests and scripted replays.

use crate::geo::{GeoPoint, GeodesicArea, SphericalExcess};
use crate::interaction::EventKind;
use crate::overlay::{Overlay, OverlayId};
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Mouse cursor shown over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorStyle {
    #[default]
    Default,
    Crosshair,
    Text,
}

/// Operations the tools need from the map.
pub trait MapSurface {
    /// Start delivering events of this kind to the tools.
    fn bind(&mut self, kind: EventKind);

    /// Stop delivering events of this kind.
    fn unbind(&mut self, kind: EventKind);

    /// Enable or disable panning the map by dragging.
    fn set_panning(&mut self, enabled: bool);

    fn set_cursor(&mut self, cursor: CursorStyle);

    /// Place a visual object and return its handle.
    fn add_overlay(&mut self, overlay: Overlay) -> OverlayId;

    /// Replace the description of an existing object in place.
    /// Returns false if the handle is unknown.
    fn update_overlay(&mut self, id: OverlayId, overlay: Overlay) -> bool;

    /// Remove a visual object. Returns false if the handle is unknown.
    fn remove_overlay(&mut self, id: OverlayId) -> bool;

    /// Whether the handle refers to an object currently on the map.
    fn has_overlay(&self, id: OverlayId) -> bool;

    /// Show a short-lived popup that dismisses itself after `duration_ms`.
    fn show_popup(&mut self, position: GeoPoint, text: &str, duration_ms: u64);

    /// Convert a position in screen pixels to a geographic coordinate.
    fn screen_to_geo(&self, point: Point) -> GeoPoint;

    /// Geographic coordinate at the center of the view.
    fn center(&self) -> GeoPoint;

    /// Current zoom level.
    fn zoom(&self) -> f64;

    /// Geodesic area routine offered by the map library, if any.
    fn geodesic(&self) -> Option<&dyn GeodesicArea> {
        None
    }
}

/// A popup shown through [`MapSurface::show_popup`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub position: GeoPoint,
    pub text: String,
    pub duration_ms: u64,
}

/// Headless map surface that keeps everything in memory.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    overlays: HashMap<OverlayId, Overlay>,
    /// Insertion order of overlays.
    order: Vec<OverlayId>,
    bound: HashSet<EventKind>,
    /// Number of `bind` calls for an already bound kind.
    duplicate_binds: usize,
    /// Number of `unbind` calls for a kind that was not bound.
    stray_unbinds: usize,
    panning: bool,
    cursor: CursorStyle,
    popups: Vec<Popup>,
    /// Screen pixels -> (lng, lat).
    projection: Affine,
    zoom: f64,
    viewport: kurbo::Size,
    geodesic: Option<SphericalExcess>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Degrees per pixel of the default projection.
    pub const DEFAULT_DEGREES_PER_PIXEL: f64 = 1e-5;

    /// Surface whose top-left pixel sits on (0, 0).
    pub fn new() -> Self {
        Self::with_projection(GeoPoint::default(), Self::DEFAULT_DEGREES_PER_PIXEL)
    }

    /// Surface with the top-left pixel at `origin`; x grows east, y grows south.
    pub fn with_projection(origin: GeoPoint, degrees_per_pixel: f64) -> Self {
        Self {
            overlays: HashMap::new(),
            order: Vec::new(),
            bound: HashSet::new(),
            duplicate_binds: 0,
            stray_unbinds: 0,
            panning: true,
            cursor: CursorStyle::Default,
            popups: Vec::new(),
            projection: Affine::new([
                degrees_per_pixel,
                0.0,
                0.0,
                -degrees_per_pixel,
                origin.lng,
                origin.lat,
            ]),
            zoom: 15.0,
            viewport: kurbo::Size::new(800.0, 600.0),
            geodesic: None,
        }
    }

    /// Offer the spherical-excess routine for polygon areas.
    ///
    /// Without it the tools measure areas with the planar approximation.
    pub fn with_geodesic_area(mut self) -> Self {
        self.geodesic = Some(SphericalExcess);
        self
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport = kurbo::Size::new(width, height);
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    /// Overlays in the order they were added.
    pub fn overlays(&self) -> impl Iterator<Item = (OverlayId, &Overlay)> {
        self.order
            .iter()
            .filter_map(|id| self.overlays.get(id).map(|o| (*id, o)))
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Handles of every overlay on the map, in the order they were added.
    pub fn overlay_ids(&self) -> impl Iterator<Item = OverlayId> + '_ {
        self.order.iter().copied()
    }

    pub fn is_bound(&self, kind: EventKind) -> bool {
        self.bound.contains(&kind)
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }

    pub fn duplicate_binds(&self) -> usize {
        self.duplicate_binds
    }

    pub fn stray_unbinds(&self) -> usize {
        self.stray_unbinds
    }

    pub fn is_panning_enabled(&self) -> bool {
        self.panning
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn popups(&self) -> &[Popup] {
        &self.popups
    }

    /// Inverse of [`MapSurface::screen_to_geo`].
    pub fn geo_to_screen(&self, point: GeoPoint) -> Point {
        self.projection.inverse() * Point::new(point.lng, point.lat)
    }
}

impl MapSurface for MemorySurface {
    fn bind(&mut self, kind: EventKind) {
        if !self.bound.insert(kind) {
            self.duplicate_binds += 1;
        }
    }

    fn unbind(&mut self, kind: EventKind) {
        if !self.bound.remove(&kind) {
            self.stray_unbinds += 1;
        }
    }

    fn set_panning(&mut self, enabled: bool) {
        self.panning = enabled;
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    fn add_overlay(&mut self, overlay: Overlay) -> OverlayId {
        let id = Uuid::new_v4();
        self.order.push(id);
        self.overlays.insert(id, overlay);
        id
    }

    fn update_overlay(&mut self, id: OverlayId, overlay: Overlay) -> bool {
        match self.overlays.get_mut(&id) {
            Some(existing) => {
                *existing = overlay;
                true
            }
            None => false,
        }
    }

    fn remove_overlay(&mut self, id: OverlayId) -> bool {
        self.order.retain(|&entry| entry != id);
        self.overlays.remove(&id).is_some()
    }

    fn has_overlay(&self, id: OverlayId) -> bool {
        self.overlays.contains_key(&id)
    }

    fn show_popup(&mut self, position: GeoPoint, text: &str, duration_ms: u64) {
        self.popups.push(Popup {
            position,
            text: text.to_string(),
            duration_ms,
        });
    }

    fn screen_to_geo(&self, point: Point) -> GeoPoint {
        let world = self.projection * point;
        GeoPoint::new(world.y, world.x)
    }

    fn center(&self) -> GeoPoint {
        self.screen_to_geo(Point::new(
            self.viewport.width / 2.0,
            self.viewport.height / 2.0,
        ))
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn geodesic(&self) -> Option<&dyn GeodesicArea> {
        self.geodesic.as_ref().map(|routine| routine as &dyn GeodesicArea)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayStyle;

    #[test]
    fn test_projection() {
        let surface = MemorySurface::with_projection(GeoPoint::new(-6.0, 106.0), 0.001);
        let p = surface.screen_to_geo(Point::new(100.0, 200.0));
        assert!((p.lat - (-6.2)).abs() < 1e-9);
        assert!((p.lng - 106.1).abs() < 1e-9);

        let back = surface.geo_to_screen(p);
        assert!((back.x - 100.0).abs() < 1e-6);
        assert!((back.y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_center() {
        let surface = MemorySurface::with_projection(GeoPoint::new(0.0, 0.0), 0.01);
        let c = surface.center();
        assert!((c.lng - 4.0).abs() < 1e-9);
        assert!((c.lat - (-3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_overlay_lifecycle() {
        let mut surface = MemorySurface::new();
        let overlay = Overlay::Polyline {
            points: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)],
            style: OverlayStyle::default(),
        };
        let id = surface.add_overlay(overlay.clone());
        assert!(surface.has_overlay(id));
        assert_eq!(surface.overlay(id), Some(&overlay));

        assert!(surface.remove_overlay(id));
        assert!(!surface.remove_overlay(id));
        assert!(!surface.update_overlay(id, overlay));
        assert_eq!(surface.overlay_count(), 0);
    }

    #[test]
    fn test_geodesic_routine_is_opt_in() {
        assert!(MemorySurface::new().geodesic().is_none());
        let surface = MemorySurface::new().with_geodesic_area();
        let triangle = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 0.0),
        ];
        let area = surface.geodesic().map(|routine| routine.geodesic_area(&triangle));
        assert_eq!(area, Some(SphericalExcess.geodesic_area(&triangle)));
    }

    #[test]
    fn test_overlay_ids_follow_insertion_order() {
        let mut surface = MemorySurface::new();
        let marker = Overlay::PointMarker {
            position: GeoPoint::default(),
            style: OverlayStyle::default(),
        };
        let a = surface.add_overlay(marker.clone());
        let b = surface.add_overlay(marker.clone());
        let c = surface.add_overlay(marker);
        surface.remove_overlay(b);
        assert_eq!(surface.overlay_ids().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn test_binding_bookkeeping() {
        let mut surface = MemorySurface::new();
        surface.bind(EventKind::Click);
        surface.bind(EventKind::Click);
        surface.unbind(EventKind::DoubleClick);
        assert!(surface.is_bound(EventKind::Click));
        assert_eq!(surface.duplicate_binds(), 1);
        assert_eq!(surface.stray_unbinds(), 1);
    }
}
