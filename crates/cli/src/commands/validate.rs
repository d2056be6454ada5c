//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{HudSinkType, RacerBlueprint};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    source_id: String,
    steering_limit_deg: f32,
    max_speed: f32,
    fps: f64,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    source_id: blueprint.tracking.source_id.clone(),
                    steering_limit_deg: blueprint.gesture.steering_limit_deg,
                    max_speed: blueprint.drivetrain.max_speed,
                    fps: blueprint.session.fps,
                    sink_count: blueprint.hud.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(blueprint: &RacerBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.hud.is_empty() {
        warnings.push("No HUD sinks configured - HUD frames will be dropped".to_string());
    } else if !blueprint
        .hud
        .iter()
        .any(|s| s.sink_type == HudSinkType::Log)
    {
        warnings.push("No log HUD sink - speed and gear will not appear in the logs".to_string());
    }

    let tick_hz = 1000.0 / blueprint.drivetrain.tick_ms as f64;
    if tick_hz > blueprint.session.fps {
        warnings.push(format!(
            "drivetrain ticks at {:.0} Hz, faster than the {} fps frame loop",
            tick_hz, blueprint.session.fps
        ));
    }

    if blueprint.tracking.frequency_hz < 10.0 {
        warnings.push(format!(
            "tracking.frequency_hz = {} - steering will feel sluggish",
            blueprint.tracking.frequency_hz
        ));
    }

    if blueprint.motion.smoothing_rate == 0.0 {
        warnings.push("motion.smoothing_rate = 0 - the car will never move".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Tracker: {}", summary.source_id);
            println!("  Steering limit: ±{}°", summary.steering_limit_deg);
            println!("  Max speed: {}", summary.max_speed);
            println!("  Frame rate: {} fps", summary.fps);
            println!("  HUD sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
