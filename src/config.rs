//! Host configuration (`config.toml`).

use crate::error::{GridcalcError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    log_level: Option<String>,
    print: Option<PrintSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PrintSection {
    delimiter: Option<String>,
}

/// Resolved settings for a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Field delimiter for `values` / `texts`.
    pub delimiter: char,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "warn".to_string(),
            delimiter: '\t',
        }
    }
}

/// Load the config from `explicit` if given, otherwise from the user config dir.
///
/// A missing user config is not an error; a missing explicit file is.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(config_error(path, "file not found"));
            }
            path.to_path_buf()
        }
        None => match user_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let content = read_config_file(&path)?;
    parse_config(&content, &path)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn read_config_file(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(config_error(
            path,
            format!(
                "file too large ({} bytes, max {})",
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ),
        ));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|err| config_error(path, err.to_string()))?;

    let mut config = Config::default();
    if let Some(level) = file.log_level {
        config.log_level = level;
    }
    if let Some(delimiter) = file.print.and_then(|p| p.delimiter) {
        let mut chars = delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => config.delimiter = c,
            _ => {
                return Err(config_error(
                    path,
                    format!("print.delimiter must be a single character, got {:?}", delimiter),
                ));
            }
        }
    }
    Ok(config)
}

fn config_error(path: &Path, message: impl Into<String>) -> GridcalcError {
    GridcalcError::Config {
        path: path.display().to_string(),
        message: message.into(),
    }
}
