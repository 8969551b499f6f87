//! Command-line host for the proximity engine.
//!
//! ```not_rust
//! stp-companion replay <track-file>   # run a recorded ride through the engine
//! stp-companion follow <track-file>   # poll a growing track file at the GPS interval
//! ```
//!
//! Settings are read from `$STP_CONFIG_DIR/settings.json` (default `.`).

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use log::{error, info};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::core::config::{ConfigManager, Settings};
use crate::core::coordinator::RideCoordinator;
use crate::core::location::{LocationSource, ReplaySource, TailSource};
use crate::core::notify::{LogSink, NotificationSink};
use crate::core::runner::run_tracking_loop;
use crate::core::track;

const SETTINGS_POLL: Duration = Duration::from_secs(5);

enum Command {
    Replay(PathBuf),
    Follow(PathBuf),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mode = args.next();
    let path = args.next().map(PathBuf::from);
    match (mode.as_deref(), path) {
        (Some("replay"), Some(path)) => Ok(Command::Replay(path)),
        (Some("follow"), Some(path)) => Ok(Command::Follow(path)),
        _ => Err("usage: stp-companion <replay|follow> <track-file>".to_string()),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "stp_companion=info".into()),
        )
        .init();
}

pub fn run() -> ExitCode {
    init_logging();

    let command = match parse_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(usage) => {
            eprintln!("{}", usage);
            return ExitCode::from(2);
        }
    };

    let config_dir = env::var("STP_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    let config_manager = ConfigManager::new(config_dir);
    let settings = config_manager.load();
    info!(
        "Loaded settings from {:?} (alerts {})",
        config_manager.path(),
        if settings.alerts_enabled { "on" } else { "off" }
    );

    let result = match command {
        Command::Replay(path) => replay(path, &settings),
        Command::Follow(path) => follow(path, config_manager, settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Feed every fix of a recorded ride straight through the coordinator.
fn replay(path: PathBuf, settings: &Settings) -> Result<(), String> {
    let samples = track::read_track(&path).map_err(|e| e.to_string())?;
    info!("Replaying {} fixes from {:?}", samples.len(), path);

    let mut source = ReplaySource::new(samples);
    let mut sink = LogSink::new();
    let mut coordinator = RideCoordinator::new();

    while let Some(sample) = source.next_sample().map_err(|e| e.to_string())? {
        let output = coordinator.tick(&sample, settings);
        for notification in &output.notifications {
            sink.deliver(notification);
        }
    }

    info!("Replay finished: {} notifications", sink.delivered());
    Ok(())
}

/// Poll a live track file on the configured interval until Ctrl-C.
fn follow(path: PathBuf, config_manager: ConfigManager, settings: Settings) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;

    runtime.block_on(async move {
        let mut source = TailSource::open(&path).map_err(|e| e.to_string())?;
        let mut sink = LogSink::new();
        let mut coordinator = RideCoordinator::new();
        let (settings_tx, settings_rx) = watch::channel(settings);

        // Hot-reload: pick up edits to settings.json
        tokio::spawn(watch_settings(config_manager, settings_tx));

        info!("Following {:?}", path);
        tokio::select! {
            summary = run_tracking_loop(&mut source, &mut sink, &mut coordinator, settings_rx) => {
                info!("Tracking ended: {:?}", summary);
            }
            _ = tokio::signal::ctrl_c() => info!("Interrupted"),
        }
        info!("{} notifications delivered", sink.delivered());
        Ok::<(), String>(())
    })
}

async fn watch_settings(config_manager: ConfigManager, settings_tx: watch::Sender<Settings>) {
    let mut ticker = tokio::time::interval(SETTINGS_POLL);
    loop {
        ticker.tick().await;
        if settings_tx.is_closed() {
            break;
        }
        let latest = config_manager.load();
        settings_tx.send_if_modified(|current| {
            if *current == latest {
                return false;
            }
            info!("Settings changed on disk");
            *current = latest;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        assert!(matches!(
            parse_args(args(&["replay", "ride.track"])),
            Ok(Command::Replay(p)) if p == PathBuf::from("ride.track")
        ));
        assert!(matches!(
            parse_args(args(&["follow", "live.track"])),
            Ok(Command::Follow(_))
        ));
        assert!(parse_args(args(&["replay"])).is_err());
        assert!(parse_args(args(&["record", "x"])).is_err());
        assert!(parse_args(args(&[])).is_err());
    }

    #[test]
    fn test_replay_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = replay(dir.path().join("missing.track"), &Settings::default());
        assert!(result.is_err());
    }
}
