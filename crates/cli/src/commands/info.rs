//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::RacerBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo<'a> {
    version: String,
    controls: ControlsInfo,
    tracking: &'a contracts::TrackingConfig,
    drivetrain: &'a contracts::DrivetrainConfig,
    motion: &'a contracts::MotionConfig,
    camera: &'a contracts::CameraConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hud: Vec<SinkInfo>,
}

/// Gesture mapping as the driver sees it
#[derive(Serialize)]
struct ControlsInfo {
    accelerate: &'static str,
    brake: &'static str,
    steer: String,
    turn_threshold_deg: f32,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    queue_capacity: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &RacerBlueprint) -> ConfigInfo<'_> {
    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        controls: ControlsInfo {
            accelerate: "raise left index finger",
            brake: "raise right index finger (wins over accelerate)",
            steer: format!(
                "tilt the line between both pinches, up to ±{}°",
                blueprint.gesture.steering_limit_deg
            ),
            turn_threshold_deg: blueprint.gesture.direction_threshold_deg,
        },
        tracking: &blueprint.tracking,
        drivetrain: &blueprint.drivetrain,
        motion: &blueprint.motion,
        camera: &blueprint.camera,
        hud: blueprint
            .hud
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
                queue_capacity: s.queue_capacity,
            })
            .collect(),
    }
}

fn print_config_info(blueprint: &RacerBlueprint) {
    println!("=== Gesture Racer Configuration ===\n");

    let tracking = &blueprint.tracking;
    println!("Tracking");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Source: {}", tracking.source_id);
    println!(
        "   ├─ Camera: {}x{} @ {} Hz",
        tracking.width, tracking.height, tracking.frequency_hz
    );
    println!(
        "   ├─ Confidence: detect {} / track {}",
        tracking.min_detection_confidence, tracking.min_tracking_confidence
    );
    println!(
        "   └─ Channel: {} ({:?})",
        tracking.channel_capacity, tracking.drop_policy
    );

    let gesture = &blueprint.gesture;
    println!("\nControls");
    println!("   ├─ Accelerate: left index up");
    println!("   ├─ Brake: right index up");
    println!(
        "   ├─ Steering: ±{}° (turn above {}°)",
        gesture.steering_limit_deg, gesture.direction_threshold_deg
    );
    println!("   └─ Finger margin: {}", gesture.finger_up_margin);

    let drivetrain = &blueprint.drivetrain;
    println!("\nDrivetrain");
    println!("   ├─ Tick: {} ms", drivetrain.tick_ms);
    println!("   ├─ Max speed: {}", drivetrain.max_speed);
    println!(
        "   └─ Rates: +{} accel / -{} brake / -{} coast",
        drivetrain.accel_rate, drivetrain.brake_rate, drivetrain.coast_rate
    );

    let motion = &blueprint.motion;
    let camera = &blueprint.camera;
    println!("\nVehicle");
    println!(
        "   ├─ Velocity: speed / {}, yaw: steering / {} ({:?}, rate {})",
        motion.speed_divisor, motion.turn_divisor, motion.smoothing, motion.smoothing_rate
    );
    println!(
        "   ├─ Body: spawn {:?}, damping {} / {}",
        blueprint.body.spawn_position, blueprint.body.linear_damping, blueprint.body.angular_damping
    );
    println!(
        "   └─ Camera: offset {:?}, rates {} / {} / {}",
        camera.offset, camera.position_rate, camera.target_rate, camera.orientation_rate
    );

    if !blueprint.hud.is_empty() {
        println!("\nHUD sinks ({})", blueprint.hud.len());
        for (i, sink) in blueprint.hud.iter().enumerate() {
            let prefix = if i == blueprint.hud.len() - 1 { "└─" } else { "├─" };
            println!("   {} {} ({:?})", prefix, sink.name, sink.sink_type);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_json_shape() {
        let blueprint = RacerBlueprint::default();
        let value = serde_json::to_value(build_config_info(&blueprint)).unwrap();
        assert_eq!(value["tracking"]["source_id"], "webcam");
        assert_eq!(value["controls"]["turn_threshold_deg"], 10.0);
        assert!(value.get("hud").is_none());
    }
}
