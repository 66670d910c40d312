//! Geographic measurement kernel: distances, areas, centroids and their display strings.
//!
//! Everything here is pure. Degenerate input (empty paths, repeated points,
//! too few vertices) yields zero or a defined fallback instead of failing.

use kurbo::{BezPath, Point, Shape};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used for great-circle distances, in meters.
///
/// This is the sphere the map's scale bar is drawn against, so ruler results
/// agree with what the operator sees on screen.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Equatorial radius used by the spherical-excess area routine, in meters.
pub const EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// Meters per degree of latitude in the planar approximation.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another point, in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance(*self, *other)
    }

    /// Format as `lat, lng` with a fixed number of decimals.
    pub fn format(&self, precision: usize) -> String {
        format!("{:.*}, {:.*}", precision, self.lat, precision, self.lng)
    }

    /// Project into local planar meters (x east, y north).
    fn to_planar(self) -> Point {
        Point::new(
            self.lng * METERS_PER_DEGREE * self.lat.to_radians().cos(),
            self.lat * METERS_PER_DEGREE,
        )
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(6))
    }
}

/// Haversine distance between two points over a spherical Earth, in meters.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Total length of a path, summing consecutive legs. Zero for fewer than two points.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|leg| distance(leg[0], leg[1])).sum()
}

/// A routine that computes polygon area on a curved Earth model.
///
/// Map surfaces may supply their own; [`SphericalExcess`] is the built-in one.
pub trait GeodesicArea {
    /// Area of the polygon closed over `points`, in square meters.
    fn geodesic_area(&self, points: &[GeoPoint]) -> f64;
}

/// Spherical-excess polygon area over a sphere with the equatorial radius.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalExcess;

impl GeodesicArea for SphericalExcess {
    fn geodesic_area(&self, points: &[GeoPoint]) -> f64 {
        if points.len() < 3 {
            return 0.0;
        }

        let n = points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let p1 = points[i];
            let p2 = points[(i + 1) % n];
            sum += (p2.lng - p1.lng).to_radians()
                * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
        }

        (sum * EQUATORIAL_RADIUS_M * EQUATORIAL_RADIUS_M / 2.0).abs()
    }
}

/// Planar approximation of polygon area, in square meters.
///
/// Each vertex is projected to local meters and the shoelace area of the
/// closed ring is taken.
pub fn planar_area(points: &[GeoPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut ring = BezPath::new();
    ring.move_to(points[0].to_planar());
    for point in &points[1..] {
        ring.line_to(point.to_planar());
    }
    ring.close_path();

    ring.area().abs()
}

/// Polygon area in square meters.
///
/// Uses the geodesic routine when one is supplied and falls back to
/// [`planar_area`] otherwise. Zero for fewer than three points.
pub fn polygon_area(points: &[GeoPoint], geodesic: Option<&dyn GeodesicArea>) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    match geodesic {
        Some(routine) => routine.geodesic_area(points),
        None => planar_area(points),
    }
}

/// Arithmetic mean of latitudes and longitudes.
///
/// Only meant for label placement. The empty path maps to the origin.
pub fn centroid(points: &[GeoPoint]) -> GeoPoint {
    if points.is_empty() {
        return GeoPoint::default();
    }

    let n = points.len() as f64;
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    GeoPoint::new(lat_sum / n, lng_sum / n)
}

/// Human-readable distance: `950.0 m`, `1.50 km`.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.1} m", meters)
    }
}

/// Human-readable area: `5000.0 m²`, `2.50 ha`, `2.00 km²`.
pub fn format_area(sq_meters: f64) -> String {
    if sq_meters >= 1_000_000.0 {
        format!("{:.2} km²", sq_meters / 1_000_000.0)
    } else if sq_meters >= 10_000.0 {
        format!("{:.2} ha", sq_meters / 10_000.0)
    } else {
        format!("{:.1} m²", sq_meters)
    }
}
