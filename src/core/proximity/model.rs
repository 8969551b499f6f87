// Proximity model types: radii configuration, dedupe state and notification events.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::model::{Checkpoint, CheckpointId, DistanceUnit};

/// Radius (miles) at which an approaching checkpoint is announced.
pub const DEFAULT_ALERT_RADIUS_MILES: f64 = 1.0;
/// Radius (miles) the rider must leave before the checkpoint can fire again.
pub const DEFAULT_CLEAR_RADIUS_MILES: f64 = 3.0;

/// Hysteresis radii - persisted in settings.json
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityConfig {
    #[serde(default = "default_alert_radius")]
    pub alert_radius_miles: f64,
    #[serde(default = "default_clear_radius")]
    pub clear_radius_miles: f64,
}

fn default_alert_radius() -> f64 {
    DEFAULT_ALERT_RADIUS_MILES
}

fn default_clear_radius() -> f64 {
    DEFAULT_CLEAR_RADIUS_MILES
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            alert_radius_miles: DEFAULT_ALERT_RADIUS_MILES,
            clear_radius_miles: DEFAULT_CLEAR_RADIUS_MILES,
        }
    }
}

impl ProximityConfig {
    /// Clamp the clear radius so it never sits inside the alert radius.
    pub fn normalized(self) -> Self {
        Self {
            alert_radius_miles: self.alert_radius_miles,
            clear_radius_miles: self.clear_radius_miles.max(self.alert_radius_miles),
        }
    }
}

/// Checkpoints that have been announced and not yet left.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityState {
    inside: HashSet<CheckpointId>,
}

impl ProximityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inside(&self, id: CheckpointId) -> bool {
        self.inside.contains(&id)
    }

    /// Returns true if the checkpoint was not already inside.
    pub(crate) fn enter(&mut self, id: CheckpointId) -> bool {
        self.inside.insert(id)
    }

    pub(crate) fn exit(&mut self, id: CheckpointId) -> bool {
        self.inside.remove(&id)
    }

    pub fn clear(&mut self) {
        self.inside.clear();
    }

    pub fn len(&self) -> usize {
        self.inside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }
}

/// Event handed to the notification sink when a checkpoint comes into range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityNotification {
    /// Stable per checkpoint so the sink can replace rather than stack alerts
    pub identifier: String,
    pub checkpoint_id: CheckpointId,
    pub title: String,
    pub body: String,
    pub distance_miles: f64,
}

impl ProximityNotification {
    pub fn identifier_for(id: CheckpointId) -> String {
        format!("stp-checkpoint-{}", id)
    }

    pub fn for_checkpoint(checkpoint: &Checkpoint, distance_miles: f64, unit: DistanceUnit) -> Self {
        Self {
            identifier: Self::identifier_for(checkpoint.id),
            checkpoint_id: checkpoint.id,
            title: checkpoint.kind.approach_title().to_string(),
            body: format!(
                "{} is {} away",
                checkpoint.name,
                unit.format_approx(distance_miles)
            ),
            distance_miles,
        }
    }
}
