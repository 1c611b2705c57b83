//! Subcommands of the `gastoscan` binary.

pub mod batch;
pub mod config;
pub mod scan;

use std::path::{Path, PathBuf};

use gastoscan_core::models::config::GastoscanConfig;
use tracing::debug;

/// Location of the user's config file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gastoscan")
        .join("config.json")
}

/// Resolve the config file: the explicit `--config` path or the default one.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration from `--config`, then the default location, then defaults.
///
/// An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<GastoscanConfig> {
    if let Some(path) = explicit {
        debug!("Loading config from {}", path);
        return Ok(GastoscanConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(GastoscanConfig::from_file(&path)?)
    } else {
        Ok(GastoscanConfig::default())
    }
}
