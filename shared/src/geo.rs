//! Deterministic geo-dispersion and centroid helpers
//!
//! Trees captured without a GPS fix are placed near the centroid of their
//! parent crop polygon. The offset is derived from the entity id with a
//! non-cryptographic hash, so placement is stable across recomputations and
//! visually distinct between siblings. Collisions between ids are acceptable;
//! the goal is dispersion, not uniqueness.

use geo::Contains;
use geojson::{Geometry, Value};

use crate::types::GpsPosition;

/// Default dispersion radius in coordinate degrees (~30 m near the equator).
pub const DEFAULT_DISPERSION_DELTA: f64 = 0.0003;

/// Deterministic 31-multiplier string hash, wrapped to signed 32 bits.
///
/// Iterates UTF-16 code units so the value matches the JavaScript
/// `charCodeAt` accumulator used by existing map clients.
pub fn simple_hash(id: &str) -> u32 {
    let mut hash: i32 = 0;
    for code in id.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(code));
    }
    hash.unsigned_abs()
}

/// Deterministic `(lat, lng)` offset for an id, each component in
/// `[-delta/2, delta/2]`.
///
/// The longitude axis hashes the reversed id to decorrelate it from the
/// latitude axis.
pub fn offset_from_hash(id: &str, delta: f64) -> (f64, f64) {
    let reversed: String = id.chars().rev().collect();
    let lat_offset = (f64::from(simple_hash(id) % 1000) / 1000.0 - 0.5) * delta;
    let lng_offset = (f64::from(simple_hash(&reversed) % 1000) / 1000.0 - 0.5) * delta;
    (lat_offset, lng_offset)
}

/// Vertex average of a polygon's exterior ring.
///
/// MultiPolygons use the first polygon's exterior ring. The closing vertex
/// is included in the average. Returns `None` for other geometry types,
/// empty rings, or malformed positions.
pub fn ring_centroid(geometry: &Geometry) -> Option<GpsPosition> {
    let ring = exterior_ring(geometry)?;
    if ring.is_empty() {
        return None;
    }
    let (mut lng_sum, mut lat_sum) = (0.0, 0.0);
    for position in ring {
        if position.len() < 2 {
            return None;
        }
        lng_sum += position[0];
        lat_sum += position[1];
    }
    let n = ring.len() as f64;
    Some(GpsPosition::new(lat_sum / n, lng_sum / n))
}

fn exterior_ring(geometry: &Geometry) -> Option<&Vec<Vec<f64>>> {
    match &geometry.value {
        Value::Polygon(rings) => rings.first(),
        Value::MultiPolygon(polygons) => polygons.first().and_then(|rings| rings.first()),
        _ => None,
    }
}

/// Extract the position of a GeoJSON `Point`.
pub fn point_position(geometry: &Geometry) -> Option<GpsPosition> {
    match &geometry.value {
        Value::Point(coords) if coords.len() >= 2 => Some(GpsPosition::new(coords[1], coords[0])),
        _ => None,
    }
}

/// Whether a polygonal geometry contains the given position.
///
/// Non-polygonal or malformed geometries contain nothing.
pub fn contains_position(geometry: &Geometry, position: GpsPosition) -> bool {
    let Ok(shape) = geo::Geometry::<f64>::try_from(geometry.clone()) else {
        return false;
    };
    let point = geo::Point::new(position.longitude, position.latitude);
    match shape {
        geo::Geometry::Polygon(polygon) => polygon.contains(&point),
        geo::Geometry::MultiPolygon(multi) => multi.contains(&point),
        _ => false,
    }
}

/// Resolve a display position for an entity.
///
/// An explicit position always wins unchanged. Without one, the entity is
/// dispersed around the reference centroid; without a centroid the result is
/// `None` and the caller must omit the entity from the map rather than guess.
pub fn resolve_location(
    existing: Option<GpsPosition>,
    id: &str,
    centroid: Option<GpsPosition>,
    delta: f64,
) -> Option<GpsPosition> {
    if existing.is_some() {
        return existing;
    }
    let centroid = centroid?;
    let (lat_offset, lng_offset) = offset_from_hash(id, delta);
    Some(GpsPosition::new(
        centroid.latitude + lat_offset,
        centroid.longitude + lng_offset,
    ))
}
