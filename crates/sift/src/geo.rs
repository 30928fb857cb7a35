//! Geographic filters and distance ordering.
//!
//! Records carry latitude and longitude in two numeric fields addressed by
//! path. Distances are great-circle kilometres on a spherical Earth.

use serde::{Deserialize, Serialize};

use crate::path::{resolve, FieldPath};
use crate::record::Record;
use crate::value::Value;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Point { lat, lng }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Point) -> f64 {
        haversine_km(*self, *other)
    }
}

/// A latitude/longitude rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south_west: Point,
    pub north_east: Point,
}

impl BoundingBox {
    pub fn new(south_west: Point, north_east: Point) -> Self {
        BoundingBox {
            south_west,
            north_east,
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

/// Haversine distance between two points in kilometres.
pub fn haversine_km(a: Point, b: Point) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Region a record's coordinates are tested against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Area {
    /// Within `km` of `center`, boundary included.
    Radius { center: Point, km: f64 },
    /// Inside the box, edges included.
    Box(BoundingBox),
}

/// Locates a record through its latitude and longitude fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lat: FieldPath,
    pub lng: FieldPath,
}

impl Coordinates {
    pub fn new(lat: impl Into<FieldPath>, lng: impl Into<FieldPath>) -> Self {
        Coordinates {
            lat: lat.into(),
            lng: lng.into(),
        }
    }

    /// Reads the record's position. `None` if either field is missing, null or not numeric.
    pub fn locate<R: Record + ?Sized>(&self, record: &R) -> Option<Point> {
        let lat = degrees(record, &self.lat)?;
        let lng = degrees(record, &self.lng)?;
        Some(Point { lat, lng })
    }
}

fn degrees<R: Record + ?Sized>(record: &R, path: &FieldPath) -> Option<f64> {
    match resolve(record, path).ok()?.dereference()? {
        Value::Number(n) => Some(n.to_f64()),
        _ => None,
    }
}

/// A geographic filter on one record.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoClause {
    pub coordinates: Coordinates,
    pub area: Area,
}

impl GeoClause {
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let Some(point) = self.coordinates.locate(record) else {
            return false;
        };
        match &self.area {
            Area::Radius { center, km } => haversine_km(*center, point) <= *km,
            Area::Box(bbox) => bbox.contains(&point),
        }
    }
}

/// Orders records by distance from `origin`, nearest first.
///
/// Records whose coordinates cannot be read are left out. Ties keep their input order.
pub fn sort_by_distance<'a, T: Record>(
    items: impl IntoIterator<Item = &'a T>,
    coordinates: &Coordinates,
    origin: Point,
) -> Vec<&'a T> {
    let mut located: Vec<(f64, &'a T)> = items
        .into_iter()
        .filter_map(|item| {
            coordinates
                .locate(item)
                .map(|point| (haversine_km(origin, point), item))
        })
        .collect();
    located.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    located.into_iter().map(|(_, item)| item).collect()
}
