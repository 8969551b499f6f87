use super::model::Coordinate;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance between two points in miles (haversine).
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Point `miles` due north of `origin`. Used to build fixtures at a known distance.
pub fn offset_north(origin: Coordinate, miles: f64) -> Coordinate {
    let dlat = (miles / EARTH_RADIUS_MILES).to_degrees();
    Coordinate {
        lat: origin.lat + dlat,
        lon: origin.lon,
    }
}
