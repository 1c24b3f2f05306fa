use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::geometry::ViewportSize;
use crate::map::ViewOptions;
use crate::mode::ToleranceOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "pixmark";
const APP_CONFIG_FILE: &str = "config.json";

/// Session settings from `config.json`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub initial_zoom: f64,
    pub max_zoom: f64,
    pub hit_tolerance_px: f64,
    pub snap_tolerance_px: f64,
    pub modify_tolerance_px: f64,
    pub finish_tolerance_px: f64,
    pub default_freehand: bool,
    pub image_load_timeout_ms: u64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let view = ViewOptions::default();
        let tolerances = ToleranceOptions::default();
        Self {
            initial_zoom: view.initial_zoom,
            max_zoom: view.max_zoom,
            hit_tolerance_px: tolerances.hit_px,
            snap_tolerance_px: tolerances.snap_px,
            modify_tolerance_px: tolerances.modify_px,
            finish_tolerance_px: tolerances.finish_px,
            default_freehand: true,
            image_load_timeout_ms: 10_000,
            viewport_width: 1024,
            viewport_height: 768,
        }
    }
}

impl AppConfig {
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            initial_zoom: self.initial_zoom,
            max_zoom: self.max_zoom,
        }
    }

    pub fn tolerances(&self) -> ToleranceOptions {
        ToleranceOptions {
            hit_px: self.hit_tolerance_px,
            snap_px: self.snap_tolerance_px,
            modify_px: self.modify_tolerance_px,
            finish_px: self.finish_tolerance_px,
        }
    }

    pub fn viewport(&self) -> ViewportSize {
        ViewportSize::new(self.viewport_width.max(1), self.viewport_height.max(1))
    }

    pub fn image_load_timeout(&self) -> Duration {
        Duration::from_millis(self.image_load_timeout_ms)
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match config_file_path(xdg_config_home, home) {
        Ok(p) => p,
        Err(ConfigPathError::MissingHomeDirectory) => {
            tracing::debug!("neither XDG_CONFIG_HOME nor HOME is set; using default config");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// `$XDG_CONFIG_HOME/pixmark/config.json`, or `$HOME/.config/pixmark/config.json` when the
/// XDG variable is unset or empty.
pub(crate) fn config_file_path(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let root = match xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        Some(xdg) => xdg.to_path_buf(),
        None => home
            .ok_or(ConfigPathError::MissingHomeDirectory)?
            .join(".config"),
    };
    Ok(root.join(APP_DIR).join(APP_CONFIG_FILE))
}
