//! Blueprint validation
//!
//! Rules:
//! - field ranges declared on the blueprint types (`validator` derive)
//! - direction dead zone lies strictly inside the steering limit
//! - camera offset is finite and not zero
//! - HUD sink names are non-empty and unique
//! - file sinks need a `path`, network sinks need an `addr`

use std::collections::HashSet;

use contracts::{ContractError, HudSinkType, RacerBlueprint};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate a RacerBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &RacerBlueprint) -> Result<(), ContractError> {
    validate_ranges(blueprint)?;
    validate_gesture(blueprint)?;
    validate_camera(blueprint)?;
    validate_hud_sinks(blueprint)?;
    Ok(())
}

fn validate_ranges(blueprint: &RacerBlueprint) -> Result<(), ContractError> {
    match blueprint.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_violation(&errors, "")
                .unwrap_or_else(|| ("<root>".to_string(), errors.to_string()));
            Err(ContractError::config_validation(field, message))
        }
    }
}

/// Walk nested validation errors in a stable order, returning the first leaf
fn first_violation(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in entries {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let message = match &err.message {
                        Some(message) => message.to_string(),
                        None => format!("failed '{}' check", err.code),
                    };
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_violation(inner, &path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    if let Some(found) = first_violation(inner, &format!("{path}[{idx}]")) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

fn validate_gesture(blueprint: &RacerBlueprint) -> Result<(), ContractError> {
    let gesture = &blueprint.gesture;
    if gesture.direction_threshold_deg >= gesture.steering_limit_deg {
        return Err(ContractError::config_validation(
            "gesture.direction_threshold_deg / gesture.steering_limit_deg",
            format!(
                "direction_threshold_deg ({}) must be < steering_limit_deg ({})",
                gesture.direction_threshold_deg, gesture.steering_limit_deg
            ),
        ));
    }
    Ok(())
}

fn validate_camera(blueprint: &RacerBlueprint) -> Result<(), ContractError> {
    let offset = blueprint.camera.offset;
    if offset.iter().any(|c| !c.is_finite()) {
        return Err(ContractError::config_validation(
            "camera.offset",
            "offset components must be finite",
        ));
    }
    if offset.iter().all(|c| *c == 0.0) {
        return Err(ContractError::config_validation(
            "camera.offset",
            "camera offset cannot be zero",
        ));
    }
    Ok(())
}

fn validate_hud_sinks(blueprint: &RacerBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.hud.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("hud[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("hud[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        let required = match sink.sink_type {
            HudSinkType::Log => None,
            HudSinkType::File => Some("path"),
            HudSinkType::Network => Some("addr"),
        };
        if let Some(key) = required {
            if !sink.params.contains_key(key) {
                return Err(ContractError::config_validation(
                    format!("hud[{}].params.{}", sink.name, key),
                    format!("{:?} sink requires '{}'", sink.sink_type, key),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::HudSinkConfig;
    use std::collections::HashMap;

    fn sink(name: &str, sink_type: HudSinkType) -> HudSinkConfig {
        HudSinkConfig {
            name: name.into(),
            sink_type,
            queue_capacity: 16,
            params: HashMap::new(),
        }
    }

    fn minimal_blueprint() -> RacerBlueprint {
        RacerBlueprint {
            hud: vec![sink("console", HudSinkType::Log)],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_range_error_names_nested_field() {
        let mut bp = minimal_blueprint();
        bp.drivetrain.max_speed = 0.0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("drivetrain.max_speed"), "got: {err}");
    }

    #[test]
    fn test_range_error_custom_message() {
        let mut bp = minimal_blueprint();
        bp.tracking.max_hands = 1;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("two hands"), "got: {err}");
    }

    #[test]
    fn test_range_error_in_sink_list() {
        let mut bp = minimal_blueprint();
        bp.hud[0].queue_capacity = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("hud[0].queue_capacity"), "got: {err}");
    }

    #[test]
    fn test_threshold_must_be_inside_limit() {
        let mut bp = minimal_blueprint();
        bp.gesture.direction_threshold_deg = 30.0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("direction_threshold_deg"), "got: {err}");
    }

    #[test]
    fn test_zero_camera_offset() {
        let mut bp = minimal_blueprint();
        bp.camera.offset = [0.0; 3];
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be zero"), "got: {err}");
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut bp = minimal_blueprint();
        bp.hud.push(sink("console", HudSinkType::Log));
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("duplicate sink name"), "got: {err}");
    }

    #[test]
    fn test_empty_sink_name() {
        let mut bp = minimal_blueprint();
        bp.hud[0].name = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_file_sink_requires_path() {
        let mut bp = minimal_blueprint();
        bp.hud.push(sink("recorder", HudSinkType::File));
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("requires 'path'"), "got: {err}");

        bp.hud[1]
            .params
            .insert("path".into(), "/tmp/hud.jsonl".into());
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_network_sink_requires_addr() {
        let mut bp = minimal_blueprint();
        bp.hud.push(sink("udp", HudSinkType::Network));
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("requires 'addr'"), "got: {err}");
    }
}
