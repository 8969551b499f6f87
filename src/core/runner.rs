//! Periodic location polling.
//!
//! Pulls a fix every `gps_update_interval_secs`, runs it through the
//! coordinator and hands notifications to the sink. Settings arrive over a
//! watch channel so the interval, unit and alert flag hot-reload.

use log::{debug, info, warn};
use tokio::sync::watch;

use super::config::Settings;
use super::coordinator::RideCoordinator;
use super::location::LocationSource;
use super::notify::NotificationSink;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub samples: usize,
    pub notifications: usize,
    pub errors: usize,
}

/// Runs until the source is exhausted or the settings sender is dropped.
pub async fn run_tracking_loop<S, N>(
    source: &mut S,
    sink: &mut N,
    coordinator: &mut RideCoordinator,
    mut settings_rx: watch::Receiver<Settings>,
) -> LoopSummary
where
    S: LocationSource,
    N: NotificationSink,
{
    let mut summary = LoopSummary::default();
    info!("Tracking loop started");

    loop {
        let settings = settings_rx.borrow_and_update().clone();

        let Some(period) = settings.gps_update_interval() else {
            debug!("Location polling disabled, waiting for settings");
            if settings_rx.changed().await.is_err() {
                break;
            }
            continue;
        };

        match source.next_sample() {
            Ok(Some(sample)) => {
                summary.samples += 1;
                let output = coordinator.tick(&sample, &settings);
                for msg in &output.logs {
                    debug!("{}", msg);
                }
                for notification in &output.notifications {
                    sink.deliver(notification);
                }
                summary.notifications += output.notifications.len();
            }
            Ok(None) => debug!("No location fix this cycle"),
            Err(e) => {
                summary.errors += 1;
                warn!("Location unavailable, retrying next cycle: {}", e);
            }
        }

        if source.is_exhausted() {
            info!("Location source exhausted");
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            changed = settings_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!(
        "Tracking loop stopped after {} samples, {} notifications",
        summary.samples, summary.notifications
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checkpoints;
    use crate::core::geo::offset_north;
    use crate::core::location::{LocationError, ReplaySource};
    use crate::core::model::LocationSample;
    use crate::core::proximity::model::ProximityNotification;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use std::time::Duration;

    fn approach(id: u32, distances: &[f64]) -> Vec<LocationSample> {
        let cp = checkpoints::by_id(id).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 7, 13, 8, 0, 0).unwrap();
        distances
            .iter()
            .enumerate()
            .map(|(i, d)| {
                LocationSample::new(
                    offset_north(cp.coordinate, *d),
                    start + ChronoDuration::minutes(5 * i as i64),
                )
            })
            .collect()
    }

    fn enabled() -> Settings {
        Settings {
            alerts_enabled: true,
            ..Settings::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_notifies_once_per_approach() {
        let mut source = ReplaySource::new(approach(5, &[5.0, 0.9, 0.5, 3.5, 0.8]));
        let mut sink: Vec<ProximityNotification> = Vec::new();
        let mut coord = RideCoordinator::new();
        let (_tx, rx) = watch::channel(enabled());

        let summary = run_tracking_loop(&mut source, &mut sink, &mut coord, rx).await;

        assert_eq!(summary.samples, 5);
        assert_eq!(summary.notifications, 2);
        assert_eq!(sink.len(), 2);
        assert!(sink[0].body.contains("~0.9 mi"));
        assert!(sink[1].body.contains("~0.8 mi"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_waits_for_interval() {
        let mut source = ReplaySource::new(approach(5, &[5.0, 4.0, 3.0]));
        let mut sink: Vec<ProximityNotification> = Vec::new();
        let mut coord = RideCoordinator::new();
        let (_tx, rx) = watch::channel(enabled());

        let started = tokio::time::Instant::now();
        run_tracking_loop(&mut source, &mut sink, &mut coord, rx).await;

        // Two sleeps between three samples; the last sample ends the loop
        assert_eq!(started.elapsed(), Duration::from_secs(600));
    }

    /// Fails on every odd call: permission first, then lost signal.
    struct FlakySource {
        inner: ReplaySource,
        calls: usize,
    }

    impl LocationSource for FlakySource {
        fn next_sample(&mut self) -> Result<Option<LocationSample>, LocationError> {
            self.calls += 1;
            match self.calls {
                1 => Err(LocationError::PermissionDenied),
                n if n % 2 == 1 => Err(LocationError::SignalLost),
                _ => self.inner.next_sample(),
            }
        }

        fn is_exhausted(&self) -> bool {
            self.inner.is_exhausted()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_retries_after_location_error() {
        let mut source = FlakySource {
            inner: ReplaySource::new(approach(5, &[2.0, 0.5])),
            calls: 0,
        };
        let mut sink: Vec<ProximityNotification> = Vec::new();
        let mut coord = RideCoordinator::new();
        let (_tx, rx) = watch::channel(enabled());

        let summary = run_tracking_loop(&mut source, &mut sink, &mut coord, rx).await;

        assert_eq!(summary.errors, 2);
        assert_eq!(summary.samples, 2);
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_polling_ends_when_sender_dropped() {
        let mut source = ReplaySource::new(approach(5, &[0.1]));
        let mut sink: Vec<ProximityNotification> = Vec::new();
        let mut coord = RideCoordinator::new();
        let (tx, rx) = watch::channel(Settings {
            gps_update_interval_secs: 0,
            ..enabled()
        });
        drop(tx);

        let summary = run_tracking_loop(&mut source, &mut sink, &mut coord, rx).await;
        assert_eq!(summary, LoopSummary::default());
        assert_eq!(source.remaining(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enabling_polling_resumes_loop() {
        let (tx, rx) = watch::channel(Settings {
            gps_update_interval_secs: 0,
            ..enabled()
        });

        let handle = tokio::spawn(async move {
            let mut source = ReplaySource::new(approach(5, &[0.1]));
            let mut sink: Vec<ProximityNotification> = Vec::new();
            let mut coord = RideCoordinator::new();
            run_tracking_loop(&mut source, &mut sink, &mut coord, rx).await;
            sink
        });

        tokio::time::sleep(Duration::from_secs(30)).await;
        tx.send(enabled()).unwrap();

        let sink = handle.await.unwrap();
        assert_eq!(sink.len(), 1);
    }
}
