//! The published STP route stops.
//!
//! The table is built once per process and never changes. Records are kept in
//! route order, so ids and miles both ascend.

use lazy_static::lazy_static;

use super::geo;
use super::model::{Checkpoint, CheckpointId, CheckpointKind, Coordinate};

pub const CHECKPOINT_COUNT: usize = 19;

lazy_static! {
    static ref CHECKPOINTS: Vec<Checkpoint> = build_checkpoints();
}

#[allow(clippy::too_many_arguments)]
fn checkpoint(
    id: CheckpointId,
    name: &str,
    mile: f64,
    kind: CheckpointKind,
    lat: f64,
    lon: f64,
    hours: &str,
    amenities: &[&str],
    notes: Option<&str>,
) -> Checkpoint {
    Checkpoint {
        id,
        name: name.to_string(),
        mile,
        kind,
        coordinate: Coordinate { lat, lon },
        hours: hours.to_string(),
        amenities: amenities.iter().map(|a| (*a).to_string()).collect(),
        notes: notes.map(str::to_string),
    }
}

fn build_checkpoints() -> Vec<Checkpoint> {
    use CheckpointKind::{Finish, MiniStop, RestStop, Start};

    vec![
        checkpoint(1, "University of Washington", 0.0, Start, 47.65050, -122.30250,
            "4:45 AM - 7:00 AM", &["Bag drop", "Restrooms", "Coffee"],
            Some("Start from the E1 lot; one-day riders leave first")),
        checkpoint(2, "Seward Park", 8.5, MiniStop, 47.55300, -122.25100,
            "5:15 AM - 8:30 AM", &["Water", "Restrooms"], None),
        checkpoint(3, "Kent REI", 24.5, RestStop, 47.38290, -122.23480,
            "5:45 AM - 10:30 AM", &["Food", "Water", "Restrooms", "Bike repair"], None),
        checkpoint(4, "Puyallup Pioneer Park", 37.0, MiniStop, 47.18870, -122.29420,
            "6:15 AM - 12:00 PM", &["Water", "Restrooms"], None),
        checkpoint(5, "Spanaway Middle School", 46.5, RestStop, 47.11504, -122.42719,
            "6:45 AM - 1:30 PM", &["Food", "Water", "Restrooms", "Bike repair", "Medical"],
            Some("Climb out of Puyallup ends just before the school")),
        checkpoint(6, "Roy", 57.0, MiniStop, 46.99180, -122.54370,
            "7:15 AM - 2:30 PM", &["Water", "Restrooms"], None),
        checkpoint(7, "Yelm", 61.5, MiniStop, 46.94260, -122.60590,
            "7:30 AM - 3:00 PM", &["Water", "Restrooms", "Snacks"], None),
        checkpoint(8, "Tenino City Park", 73.5, RestStop, 46.85680, -122.85300,
            "8:00 AM - 4:30 PM", &["Food", "Water", "Restrooms", "Bike repair"], None),
        checkpoint(9, "Bucoda", 79.0, MiniStop, 46.79850, -122.86980,
            "8:15 AM - 5:00 PM", &["Water", "Restrooms"], None),
        checkpoint(10, "Centralia College", 98.0, RestStop, 46.71800, -122.96290,
            "9:00 AM - 9:00 PM", &["Food", "Water", "Restrooms", "Bike repair", "Medical", "Camping"],
            Some("Official midpoint; two-day riders overnight here")),
        checkpoint(11, "Napavine", 108.0, MiniStop, 46.57460, -122.90820,
            "6:00 AM - 6:00 PM", &["Water", "Restrooms"], None),
        checkpoint(12, "Winlock", 114.0, RestStop, 46.49120, -122.93790,
            "6:15 AM - 6:30 PM", &["Food", "Water", "Restrooms"],
            Some("Home of the world's largest egg")),
        checkpoint(13, "Vader", 121.0, MiniStop, 46.40230, -122.96150,
            "6:30 AM - 7:00 PM", &["Water", "Restrooms"], None),
        checkpoint(14, "Castle Rock", 131.0, RestStop, 46.27510, -122.90760,
            "7:00 AM - 7:30 PM", &["Food", "Water", "Restrooms", "Bike repair"], None),
        checkpoint(15, "Kelso", 141.0, MiniStop, 46.14680, -122.90850,
            "7:15 AM - 8:00 PM", &["Water", "Restrooms"],
            Some("Lewis and Clark Bridge crossing follows; ride single file")),
        checkpoint(16, "Rainier", 152.0, MiniStop, 46.08900, -122.93570,
            "7:45 AM - 8:30 PM", &["Water", "Restrooms"], None),
        checkpoint(17, "St. Helens", 172.0, RestStop, 45.86400, -122.80650,
            "8:30 AM - 9:00 PM", &["Food", "Water", "Restrooms", "Bike repair", "Medical"], None),
        checkpoint(18, "Scappoose", 180.0, MiniStop, 45.75400, -122.87760,
            "8:45 AM - 9:30 PM", &["Water", "Restrooms"], None),
        checkpoint(19, "Holladay Park", 206.0, Finish, 45.52960, -122.65400,
            "10:00 AM - 10:00 PM", &["Food", "Water", "Restrooms", "Bag pickup", "Medical"],
            Some("Finish line festival in Portland's Lloyd District")),
    ]
}

/// All checkpoints in route order.
pub fn all() -> &'static [Checkpoint] {
    &CHECKPOINTS
}

pub fn by_id(id: CheckpointId) -> Option<&'static Checkpoint> {
    CHECKPOINTS.iter().find(|c| c.id == id)
}

/// Closest checkpoint to `position` and its distance in miles.
pub fn nearest(
    checkpoints: &[Checkpoint],
    position: Coordinate,
) -> Option<(&Checkpoint, f64)> {
    checkpoints
        .iter()
        .map(|c| (c, geo::distance_miles(position, c.coordinate)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// First checkpoint strictly beyond `mile` along the route.
pub fn next_after(checkpoints: &[Checkpoint], mile: f64) -> Option<&Checkpoint> {
    checkpoints.iter().find(|c| c.mile > mile)
}
