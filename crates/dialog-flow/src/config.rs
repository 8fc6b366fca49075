//! Configuration loading
//!
//! A [`DialogConfig`] comes from an optional YAML file and is then adjusted by
//! environment variables, so tag vocabulary and geometry can be changed
//! without touching code.

use crate::error::{FlowError, FlowResult};
use dialog_types::{DialogConfig, HourConvention};
use std::env;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

pub const ENV_WORKERS: &str = "DIALOG_WORKERS";
pub const ENV_FPS: &str = "DIALOG_FPS";
pub const ENV_TIME_SCALE: &str = "DIALOG_TIME_SCALE";
pub const ENV_FRAMES_DIR: &str = "DIALOG_FRAMES_DIR";
pub const ENV_VIDEO: &str = "DIALOG_VIDEO";
pub const ENV_HOUR_CONVENTION: &str = "DIALOG_HOUR_CONVENTION";

/// Load, override and validate the configuration.
pub fn load_config(path: Option<&Path>) -> FlowResult<DialogConfig> {
    let mut config = match path {
        Some(path) => {
            info!("[Config] Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        }
        None => DialogConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    config.validate().map_err(FlowError::config)?;
    Ok(config)
}

/// Apply `DIALOG_*` environment variables on top of `config`.
pub fn apply_env_overrides(config: &mut DialogConfig) -> FlowResult<()> {
    if let Some(workers) = env_parse::<usize>(ENV_WORKERS)? {
        config.workers = Some(workers);
    }
    if let Some(fps) = env_parse::<f64>(ENV_FPS)? {
        config.animation.fps = fps;
    }
    if let Some(time_scale) = env_parse::<f64>(ENV_TIME_SCALE)? {
        config.animation.time_scale = time_scale;
    }
    if let Some(convention) = env_parse::<HourConvention>(ENV_HOUR_CONVENTION)? {
        config.log.hour_convention = convention;
    }
    if let Ok(dir) = env::var(ENV_FRAMES_DIR) {
        config.output.frames_dir = dir;
    }
    if let Ok(video) = env::var(ENV_VIDEO) {
        config.output.video = video;
    }
    Ok(())
}

fn env_parse<T: FromStr>(key: &str) -> FlowResult<Option<T>> {
    match env::var(key) {
        Ok(raw) => {
            debug!("[Config] {key}={raw}");
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|_| FlowError::config(format!("{key} has invalid value {raw:?}")))
        }
        Err(_) => Ok(None),
    }
}
