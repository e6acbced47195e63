//! Optional `dbu.toml` configuration.
//!
//! ```toml
//! content = "content/homebrew.json"
//! log_level = "debug"
//! ```
//!
//! A relative `content` path is resolved against the directory holding
//! the config file. Command-line flags override every key.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "dbu.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Content tables to load instead of the bundled corebook.
    #[serde(default)]
    pub content: Option<PathBuf>,
    /// Default log filter when `DBU_LOG` is unset.
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Load the config file.
///
/// An explicit path must exist. Without one, `dbu.toml` in the working
/// directory is used if present and defaults apply otherwise.
pub(crate) fn load(explicit: Option<&Path>) -> Result<Config, String> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    read_config(&path)
}

/// Read and parse a config file from `path`.
pub(crate) fn read_config(path: &Path) -> Result<Config, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    let mut config: Config =
        toml::from_str(&text).map_err(|e| format!("could not parse '{}': {}", path.display(), e))?;

    if let Some(content) = config.content.take() {
        let resolved = if content.is_relative() {
            path.parent()
                .map(|dir| dir.join(&content))
                .unwrap_or(content)
        } else {
            content
        };
        config.content = Some(resolved);
    }
    Ok(config)
}
