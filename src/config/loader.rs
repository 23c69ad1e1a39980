use crate::config::schema::{Settings, ValidationError};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "FOURCC_FIXER_CONFIG";

/// Settings file looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".fourcc-fixer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML{}: {source}", origin(.path.as_deref(), .key.as_deref()))]
    Toml {
        path: Option<PathBuf>,
        /// Setting on the line the parser stopped at, when there is one.
        key: Option<String>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("invalid settings{}: {source}", origin(.path.as_deref(), None))]
    Validation {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(mut self, file: &Path) -> Self {
        match &mut self {
            ConfigError::Io { .. } => {}
            ConfigError::Toml { path, .. } | ConfigError::Validation { path, .. } => {
                path.get_or_insert_with(|| file.to_path_buf());
            }
        }
        self
    }
}

fn origin(path: Option<&Path>, key: Option<&str>) -> String {
    match (path, key) {
        (Some(path), Some(key)) => format!(" ({}, setting `{key}`)", path.display()),
        (Some(path), None) => format!(" ({})", path.display()),
        (None, Some(key)) => format!(" (setting `{key}`)"),
        (None, None) => String::new(),
    }
}

/// Name of the `key = value` setting on the line holding byte `offset`.
fn setting_at(input: &str, offset: usize) -> Option<String> {
    let offset = offset.min(input.len());
    let line_start = input[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = input[line_start..].lines().next()?;
    let (key, _) = line.split_once('=')?;
    let key = key.trim().trim_matches('"');
    let is_bare_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    is_bare_key.then(|| key.to_string())
}

pub fn load_from_str(input: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml_edit::de::from_str(input).map_err(|source| {
        let key = source
            .span()
            .and_then(|span| setting_at(input, span.start));
        ConfigError::Toml {
            path: None,
            key,
            source,
        }
    })?;
    settings
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(settings)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

/// Find the settings file to load, if any.
///
/// Priority order:
/// 1. Explicit `--config` path (must exist; a missing file fails the load)
/// 2. `FOURCC_FIXER_CONFIG` environment variable
/// 3. `~/.fourcc-fixer.toml`, only if present
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    locate_with(explicit, env::var_os(CONFIG_ENV), home::home_dir())
}

fn locate_with(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        let path = PathBuf::from(value);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!(
            path = %path.display(),
            "{CONFIG_ENV} is set but the file does not exist; ignoring"
        );
    }

    home.map(|home| home.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}
