//! Location providers feeding the tracking loop.

use std::collections::VecDeque;
use std::path::Path;

use log::warn;
use thiserror::Error;

use super::model::LocationSample;
use super::track::{TrackError, TrackTailer};

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("GPS signal lost")]
    SignalLost,
    #[error("location permission denied")]
    PermissionDenied,
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Something that can be asked for the rider's current position.
pub trait LocationSource {
    /// `Ok(None)` means no fix is available this cycle.
    fn next_sample(&mut self) -> Result<Option<LocationSample>, LocationError>;

    /// True once the source will never produce another sample.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Serves a pre-recorded list of fixes, one per call.
pub struct ReplaySource {
    samples: VecDeque<LocationSample>,
}

impl ReplaySource {
    pub fn new(samples: Vec<LocationSample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl LocationSource for ReplaySource {
    fn next_sample(&mut self) -> Result<Option<LocationSample>, LocationError> {
        Ok(self.samples.pop_front())
    }

    fn is_exhausted(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Reports the newest fix appended to a live track file.
pub struct TailSource {
    tailer: TrackTailer,
}

impl TailSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LocationError> {
        let tailer = TrackTailer::open(path).map_err(TrackError::from)?;
        Ok(Self { tailer })
    }
}

impl LocationSource for TailSource {
    fn next_sample(&mut self) -> Result<Option<LocationSample>, LocationError> {
        let mut batch = self.tailer.read_new_samples()?;
        // Polling wants the current position, not the backlog
        match batch.samples.pop() {
            Some(latest) => {
                for e in &batch.rejected {
                    warn!("Skipped track line in {:?}: {}", self.tailer.path(), e);
                }
                Ok(Some(latest))
            }
            None => match batch.rejected.pop() {
                Some(e) => Err(e.into()),
                None => Ok(None),
            },
        }
    }
}
