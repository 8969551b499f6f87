use serde::Serialize;

use super::checkpoints;
use super::config::Settings;
use super::model::{Checkpoint, CheckpointId, LocationSample};
use super::proximity::engine::ProximityEngine;
use super::proximity::model::ProximityNotification;

/// Dashboard view of where the rider is relative to the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteProgress {
    pub nearest_id: CheckpointId,
    pub nearest_name: String,
    pub nearest_distance_miles: f64,
    /// Stop after the nearest one, None once the nearest is the finish
    pub next_id: Option<CheckpointId>,
}

pub struct CoordinatorOutput {
    pub notifications: Vec<ProximityNotification>,
    pub progress: Option<RouteProgress>,
    pub logs: Vec<String>,
}

pub struct RideCoordinator {
    engine: ProximityEngine,
    checkpoints: Vec<Checkpoint>,
    last_settings: Option<Settings>,
}

impl RideCoordinator {
    /// Coordinator over the published route.
    pub fn new() -> Self {
        Self::with_checkpoints(checkpoints::all().to_vec())
    }

    pub fn with_checkpoints(checkpoints: Vec<Checkpoint>) -> Self {
        Self {
            engine: ProximityEngine::default(),
            checkpoints,
            last_settings: None,
        }
    }

    pub fn engine(&self) -> &ProximityEngine {
        &self.engine
    }

    pub fn tick(&mut self, sample: &LocationSample, settings: &Settings) -> CoordinatorOutput {
        let mut logs = Vec::new();

        // 1. Apply settings; any change drops stale suppression
        if self.last_settings.as_ref() != Some(settings) {
            if self.last_settings.is_some() {
                self.engine.reset();
                logs.push("Settings changed, proximity alerts re-armed".to_string());
            }
            self.engine.update_config(settings.proximity);
            self.last_settings = Some(settings.clone());
        }

        // 2. Evaluate
        let notifications = self.engine.evaluate(
            sample.coordinate,
            &self.checkpoints,
            settings.alerts_enabled,
            settings.distance_unit,
        );
        for n in &notifications {
            logs.push(format!("{} at {}: {}", n.title, sample.timestamp, n.body));
        }

        // 3. Progress for the dashboard
        let progress = checkpoints::nearest(&self.checkpoints, sample.coordinate).map(
            |(nearest, distance)| RouteProgress {
                nearest_id: nearest.id,
                nearest_name: nearest.name.clone(),
                nearest_distance_miles: distance,
                next_id: checkpoints::next_after(&self.checkpoints, nearest.mile).map(|c| c.id),
            },
        );

        CoordinatorOutput {
            notifications,
            progress,
            logs,
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

impl Default for RideCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
