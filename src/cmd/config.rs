use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::config::{ConfigOverrides, GateConfig, Profile};
use crate::io::{self, reader};

/// Input arguments for config command execution API.
#[derive(Debug, Clone, Default)]
pub struct ConfigCommandArgs {
    pub profile: Option<Profile>,
    pub config: Option<PathBuf>,
}

/// Structured command response that carries exit-code mapping and JSON payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConfigCommandResponse {
    pub exit_code: i32,
    pub payload: Value,
}

pub fn run(args: &ConfigCommandArgs) -> ConfigCommandResponse {
    let config = match load_config(args.profile, args.config.as_deref()) {
        Ok(config) => config,
        Err(message) => {
            return ConfigCommandResponse {
                exit_code: 3,
                payload: usage_error_payload(message),
            };
        }
    };
    match serde_json::to_value(&config) {
        Ok(payload) => ConfigCommandResponse {
            exit_code: 0,
            payload,
        },
        Err(error) => ConfigCommandResponse {
            exit_code: 1,
            payload: json!({
                "error": "internal_error",
                "message": format!("failed to serialize configuration: {error}"),
            }),
        },
    }
}

/// Resolves the effective gate configuration from an optional profile and config file.
/// Errors are usage errors rendered as messages.
pub fn load_config(profile: Option<Profile>, path: Option<&Path>) -> Result<GateConfig, String> {
    let overrides = path.map(read_overrides).transpose()?;
    let config = GateConfig::resolve(profile, overrides).map_err(|error| error.to_string())?;
    debug!(profile = %config.profile, "resolved gate configuration");
    Ok(config)
}

pub fn pipeline_steps() -> Vec<String> {
    vec![
        "config_read_overrides".to_string(),
        "config_resolve_profile".to_string(),
        "config_validate".to_string(),
    ]
}

/// Determinism guards applied by `config`.
pub fn deterministic_guards() -> Vec<String> {
    vec![
        "config_explicit_profile_wins".to_string(),
        "config_unknown_keys_rejected".to_string(),
    ]
}

pub fn usage_error_payload(message: String) -> Value {
    json!({
        "error": "input_usage_error",
        "message": message,
    })
}

fn read_overrides(path: &Path) -> Result<ConfigOverrides, String> {
    let format = io::resolve_config_format(path).map_err(|err| {
        format!(
            "unable to resolve config format from `{}`: {err}",
            path.display()
        )
    })?;
    let file = File::open(path)
        .map_err(|err| format!("failed to open config file `{}`: {err}", path.display()))?;
    reader::read_document(file, format)
        .map_err(|err| format!("invalid config file `{}`: {err}", path.display()))
}
