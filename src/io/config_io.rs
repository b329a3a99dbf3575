use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::document_io::atomic_write;
use crate::model::config::Config;
use crate::model::todo::DEFAULT_FLAGS;

/// Looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "orgenda.toml";

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse orgenda.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit orgenda.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

/// The config file to use: the explicit one, or `orgenda.toml` in `dir`
pub fn config_path(explicit: Option<&Path>, dir: &Path) -> PathBuf {
    explicit.map_or_else(|| dir.join(CONFIG_FILE), Path::to_path_buf)
}

/// Load the configuration. A missing `orgenda.toml` means defaults, but an
/// explicitly named file must exist.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(explicit, dir);
    if !path.exists() {
        if explicit.is_some() {
            return Err(ConfigError::ReadError {
                path,
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            });
        }
        log::debug!("no {} in {}, using defaults", CONFIG_FILE, dir.display());
        return Ok(Config::default());
    }
    let (config, _) = read_config(&path)?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing. A missing file reads as
/// an empty document.
pub fn read_config(path: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    atomic_write(path, doc.to_string().as_bytes()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Append `flag` to `[flags] vocabulary`. When the file has no vocabulary
/// yet, it is seeded with the default flags first so that adding a flag
/// never removes one. Returns false if the flag was already listed.
pub fn add_flag(doc: &mut toml_edit::DocumentMut, flag: &str) -> bool {
    if !doc.contains_key("flags") {
        doc["flags"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    if doc["flags"].get("vocabulary").is_none() {
        let defaults: toml_edit::Array = DEFAULT_FLAGS.iter().copied().collect();
        doc["flags"]["vocabulary"] = toml_edit::value(defaults);
    }

    let Some(vocabulary) = doc["flags"]["vocabulary"].as_array_mut() else {
        return false;
    };
    if vocabulary.iter().any(|v| v.as_str() == Some(flag)) {
        return false;
    }
    vocabulary.push(flag);
    true
}
