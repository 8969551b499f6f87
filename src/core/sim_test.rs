#[cfg(test)]
mod sim_tests {
    use crate::core::checkpoints;
    use crate::core::config::Settings;
    use crate::core::coordinator::RideCoordinator;
    use crate::core::geo::offset_north;
    use crate::core::location::{LocationSource, ReplaySource};
    use crate::core::model::{DistanceUnit, LocationSample};
    use crate::core::track::read_track;
    use chrono::{TimeZone, Utc};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn simulate_full_ride_from_track_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stp.track");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "# one fix per stop, approached from 2 miles out").unwrap();

        let mut minute = 0;
        for cp in checkpoints::all() {
            for miles in [2.0, 0.6, 0.0] {
                let at = offset_north(cp.coordinate, miles);
                writeln!(
                    file,
                    "2024-07-13T{:02}:{:02}:00Z {:.6},{:.6}",
                    5 + minute / 60,
                    minute % 60,
                    at.lat,
                    at.lon
                )
                .unwrap();
                minute += 10;
            }
        }
        file.sync_all().unwrap();

        let samples = read_track(&path).unwrap();
        assert_eq!(samples.len(), checkpoints::CHECKPOINT_COUNT * 3);

        let settings = Settings {
            alerts_enabled: true,
            distance_unit: DistanceUnit::Miles,
            ..Settings::default()
        };
        let mut source = ReplaySource::new(samples);
        let mut coord = RideCoordinator::new();
        let mut fired = Vec::new();

        while let Some(sample) = source.next_sample().unwrap() {
            fired.extend(coord.tick(&sample, &settings).notifications);
        }

        let ids: Vec<u32> = fired.iter().map(|n| n.checkpoint_id).collect();
        let expected: Vec<u32> = checkpoints::all().iter().map(|c| c.id).collect();
        assert_eq!(ids, expected, "Each stop announced exactly once, in route order");
        assert!(fired.iter().all(|n| n.body.contains("~0.6 mi")));
        assert_eq!(fired.last().unwrap().title, "Finish line nearby");
    }

    #[test]
    fn simulate_rider_circling_a_rest_stop() {
        let spanaway = checkpoints::by_id(5).unwrap();
        let settings = Settings {
            alerts_enabled: true,
            ..Settings::default()
        };
        let mut coord = RideCoordinator::new();
        let mut count = 0;
        let start = Utc.with_ymd_and_hms(2024, 7, 13, 9, 0, 0).unwrap();

        // Lingering, wandering inside the band, then leaving and coming back
        for (i, miles) in [0.9, 0.2, 1.5, 2.8, 0.4, 2.99, 3.5, 2.0, 0.8].into_iter().enumerate() {
            let sample = LocationSample::new(
                offset_north(spanaway.coordinate, miles),
                start + chrono::Duration::minutes(5 * i as i64),
            );
            count += coord.tick(&sample, &settings).notifications.len();
        }

        assert_eq!(count, 2);
    }
}
