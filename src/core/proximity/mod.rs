// Checkpoint proximity alerts.
//
// - model.rs: radii configuration, dedupe state and notification events
// - engine.rs: per-sample evaluation with enter/exit hysteresis

pub mod engine;
pub mod model;
