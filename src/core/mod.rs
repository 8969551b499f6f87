pub mod checkpoints;
pub mod config;
pub mod coordinator;
pub mod geo;
pub mod location;
pub mod model;
pub mod notify;
pub mod proximity;
pub mod runner;
pub mod track;

#[cfg(test)]
mod sim_test;
