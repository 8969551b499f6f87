// Proximity engine - evaluates each location sample against the checkpoint list.

use log::debug;

use super::model::{ProximityConfig, ProximityNotification, ProximityState};
use crate::core::geo;
use crate::core::model::{Checkpoint, Coordinate, DistanceUnit};

/// Per-checkpoint two-state machine (OUTSIDE / INSIDE) with a hysteresis band
/// between the alert and clear radii.
pub struct ProximityEngine {
    config: ProximityConfig,
    state: ProximityState,
}

impl ProximityEngine {
    pub fn new(config: ProximityConfig) -> Self {
        Self::with_state(config, ProximityState::new())
    }

    pub fn with_state(config: ProximityConfig, state: ProximityState) -> Self {
        Self {
            config: config.normalized(),
            state,
        }
    }

    pub fn update_config(&mut self, config: ProximityConfig) {
        self.config = config.normalized();
    }

    pub fn config(&self) -> ProximityConfig {
        self.config
    }

    pub fn state(&self) -> &ProximityState {
        &self.state
    }

    /// Evaluate one sample.
    /// Returns a notification for every checkpoint that moved from OUTSIDE to INSIDE.
    /// Disabled alerts leave the state untouched.
    pub fn evaluate(
        &mut self,
        position: Coordinate,
        checkpoints: &[Checkpoint],
        alerts_enabled: bool,
        unit: DistanceUnit,
    ) -> Vec<ProximityNotification> {
        let mut notifications = Vec::new();
        if !alerts_enabled {
            return notifications;
        }

        for checkpoint in checkpoints {
            let distance = geo::distance_miles(position, checkpoint.coordinate);

            if self.state.is_inside(checkpoint.id) {
                if distance > self.config.clear_radius_miles {
                    let was_inside = self.state.exit(checkpoint.id);
                    debug_assert!(was_inside);
                    debug!("Left range of {} ({:.2} mi)", checkpoint.name, distance);
                }
            } else if distance <= self.config.alert_radius_miles {
                let was_outside = self.state.enter(checkpoint.id);
                debug_assert!(was_outside);
                debug!("Entered range of {} ({:.2} mi)", checkpoint.name, distance);
                notifications.push(ProximityNotification::for_checkpoint(
                    checkpoint, distance, unit,
                ));
            }
        }

        notifications
    }

    /// Forget every announced checkpoint.
    pub fn reset(&mut self) {
        self.state.clear();
    }
}

impl Default for ProximityEngine {
    fn default() -> Self {
        Self::new(ProximityConfig::default())
    }
}
