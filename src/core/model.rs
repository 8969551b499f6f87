use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type CheckpointId = u32;

/// Kilometers in one statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("coordinate is not a finite number: ({lat}, {lon})")]
    NotFinite { lat: f64, lon: f64 },
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values no location provider could report.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NotFinite { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// One fix delivered by the location provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(coordinate: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            timestamp,
        }
    }
}

/// Unit used when showing distances to the rider. Internally everything is miles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Miles => "mi",
            Self::Kilometers => "km",
        }
    }

    pub fn from_miles(&self, miles: f64) -> f64 {
        match self {
            Self::Miles => miles,
            Self::Kilometers => miles * KM_PER_MILE,
        }
    }

    /// Approximate distance as shown in notifications, e.g. `~0.9 mi`.
    pub fn format_approx(&self, miles: f64) -> String {
        format!("~{:.1} {}", self.from_miles(miles), self.abbreviation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckpointKind {
    Start,
    RestStop,
    MiniStop,
    Finish,
}

impl CheckpointKind {
    /// Title used for the approach notification
    pub fn approach_title(&self) -> &'static str {
        match self {
            Self::Start => "Start line nearby",
            Self::RestStop => "Rest stop nearby",
            Self::MiniStop => "Mini stop nearby",
            Self::Finish => "Finish line nearby",
        }
    }
}

/// A fixed stop on the published route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub name: String,
    /// Position along the route in miles from the start
    pub mile: f64,
    pub kind: CheckpointKind,
    pub coordinate: Coordinate,
    pub hours: String,
    pub amenities: Vec<String>,
    pub notes: Option<String>,
}
