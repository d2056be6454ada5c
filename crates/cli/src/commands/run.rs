//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{error, info, warn};

use contracts::RacerBlueprint;
use ingestion::{MockScript, ReplayConfig};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{InputSource, Session, SessionConfig};

/// Execute the `run` command
pub async fn run_session(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        source = %blueprint.tracking.source_id,
        fps = blueprint.session.fps,
        tick_ms = blueprint.drivetrain.tick_ms,
        sinks = blueprint.hud.len(),
        "Configuration loaded"
    );

    let source = input_source(args)?;

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint, &source);
        return Ok(());
    }

    let session = Session::new(SessionConfig {
        blueprint,
        max_frames: (args.max_frames > 0).then_some(args.max_frames),
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        source,
    });

    info!("Starting session...");
    let stats = session
        .run(shutdown_signal())
        .await
        .context("Session failed")?;

    info!(
        frames = stats.frames,
        final_speed = stats.final_speed,
        duration_secs = stats.duration.as_secs_f64(),
        fps = format!("{:.2}", stats.fps()),
        "Session completed"
    );
    stats.print_summary();

    info!("Gesture Racer finished");
    Ok(())
}

fn input_source(args: &RunArgs) -> Result<InputSource> {
    Ok(match &args.replay {
        Some(path) => InputSource::Replay {
            path: path.clone(),
            config: ReplayConfig {
                speed_multiplier: args.replay_speed,
                loop_playback: args.replay_loop,
            },
        },
        None => {
            let script: MockScript = args
                .script
                .parse()
                .with_context(|| format!("Invalid --script '{}'", args.script))?;
            InputSource::Mock(script)
        }
    })
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    warn!("Received shutdown signal, stopping session...");
}

fn print_config_summary(blueprint: &RacerBlueprint, source: &InputSource) {
    println!("\n=== Configuration Summary ===\n");
    match source {
        InputSource::Mock(script) => println!("Input: mock tracker, script '{}'", script.name()),
        InputSource::Replay { path, config } => println!(
            "Input: replay {} (x{}, loop={})",
            path.display(),
            config.speed_multiplier,
            config.loop_playback
        ),
    }
    println!(
        "Tracking: {} @ {} Hz, channel {} ({:?})",
        blueprint.tracking.source_id,
        blueprint.tracking.frequency_hz,
        blueprint.tracking.channel_capacity,
        blueprint.tracking.drop_policy
    );
    println!(
        "Steering: ±{}°, dead zone {}°",
        blueprint.gesture.steering_limit_deg, blueprint.gesture.direction_threshold_deg
    );
    println!(
        "Drivetrain: max {} every {} ms (+{} / -{} / -{})",
        blueprint.drivetrain.max_speed,
        blueprint.drivetrain.tick_ms,
        blueprint.drivetrain.accel_rate,
        blueprint.drivetrain.brake_rate,
        blueprint.drivetrain.coast_rate
    );
    println!("Frame rate: {} fps", blueprint.session.fps);

    if !blueprint.hud.is_empty() {
        println!("\nHUD sinks ({}):", blueprint.hud.len());
        for sink in &blueprint.hud {
            println!("  - {} ({:?})", sink.name, sink.sink_type);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> RunArgs {
        RunArgs {
            config: PathBuf::from("racer.toml"),
            replay: None,
            replay_speed: 1.0,
            replay_loop: false,
            script: "lap".to_string(),
            max_frames: 0,
            timeout: 0,
            metrics_port: 0,
            dry_run: false,
        }
    }

    #[test]
    fn test_mock_source_from_script() {
        let mut a = args();
        a.script = "signal-loss".to_string();
        assert!(matches!(
            input_source(&a).unwrap(),
            InputSource::Mock(MockScript::SignalLoss)
        ));
    }

    #[test]
    fn test_unknown_script_rejected() {
        let mut a = args();
        a.script = "drift".to_string();
        assert!(input_source(&a).is_err());
    }

    #[test]
    fn test_replay_wins_over_script() {
        let mut a = args();
        a.replay = Some(PathBuf::from("session.jsonl"));
        a.replay_speed = 2.0;
        match input_source(&a).unwrap() {
            InputSource::Replay { path, config } => {
                assert_eq!(path, PathBuf::from("session.jsonl"));
                assert_eq!(config.speed_multiplier, 2.0);
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_config_fails() {
        let mut a = args();
        a.config = PathBuf::from("/nonexistent/racer.toml");
        let err = run_session(&a).await.unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");
    }
}
