//! Coarse geographic pre-filtering.
//!
//! [`BoundingBox::around`] turns a center and a radius into a lat/lng
//! rectangle that contains every point within the radius (great-circle
//! distance on a sphere). Corners of the rectangle lie outside the circle, so
//! callers get false positives but never false negatives.

use crate::domain::errors::{DomainError, DomainResult};
use std::f64::consts::PI;

/// Equatorial radius in meters, the same sphere the distance checks use.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

const MIN_LAT_RAD: f64 = -PI / 2.0;
const MAX_LAT_RAD: f64 = PI / 2.0;
const MIN_LNG_RAD: f64 = -PI;
const MAX_LNG_RAD: f64 = PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> DomainResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::Validation(
                "latitude must be between -90 and 90".into(),
            ));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::Validation(
                "longitude must be between -180 and 180".into(),
            ));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Haversine distance in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusKm(f64);

impl RadiusKm {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DomainError::Validation(
                "radius must be a positive number of kilometers".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn to_meters(&self) -> f64 {
        self.0 * 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn around(center: GeoPoint, radius: RadiusKm) -> Self {
        let angular = radius.to_meters() / EARTH_RADIUS_M;
        let lat = center.lat.to_radians();
        let lng = center.lng.to_radians();

        let mut min_lat = lat - angular;
        let mut max_lat = lat + angular;
        let (mut min_lng, mut max_lng);

        if min_lat > MIN_LAT_RAD && max_lat < MAX_LAT_RAD {
            let delta = (angular.sin() / lat.cos()).min(1.0).asin();
            min_lng = lng - delta;
            max_lng = lng + delta;
            // A box that wraps the antimeridian cannot be expressed as one
            // BETWEEN pair; widen to the full range instead.
            if min_lng < MIN_LNG_RAD || max_lng > MAX_LNG_RAD {
                min_lng = MIN_LNG_RAD;
                max_lng = MAX_LNG_RAD;
            }
        } else {
            min_lat = min_lat.max(MIN_LAT_RAD);
            max_lat = max_lat.min(MAX_LAT_RAD);
            min_lng = MIN_LNG_RAD;
            max_lng = MAX_LNG_RAD;
        }

        Self {
            min_lat: min_lat.to_degrees(),
            max_lat: max_lat.to_degrees(),
            min_lng: min_lng.to_degrees(),
            max_lng: max_lng.to_degrees(),
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}
