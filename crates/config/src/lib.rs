// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Import configuration.
//!
//! Settings come in layers: built-in defaults, then a TOML file, then
//! command-line overrides. Each layer is a [`PartialConfig`]; relative
//! paths in a file are taken relative to that file's directory. The merged
//! result is turned into an [`ImportConfig`] by [`PartialConfig::resolve`].
//!
//! ```toml
//! atom_count = 38
//! minima_summary = "min.data"
//! minima_coords = "extractedmin"
//! ts_summary = "ts.data"
//! ts_coords = "extractedts"
//! store = "storage.sqlite"
//! ```

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the per-user config directory.
pub const CONFIG_FILE_NAME: &str = "import.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("the number of atoms per structure is not set (`atom_count` or --atoms)")]
    MissingAtomCount,

    #[error("the number of atoms per structure must be positive")]
    ZeroAtomCount,
}

/// Everything one import run needs to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    /// Atoms per structure; every coordinate block has this many lines.
    pub atom_count: usize,
    pub minima_summary: PathBuf,
    pub minima_coords: PathBuf,
    pub ts_summary: PathBuf,
    pub ts_coords: PathBuf,
    /// The SQLite database the records are appended to.
    pub store: PathBuf,
}

/// One layer of settings. Unset fields fall through to the layer below.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub atom_count: Option<usize>,
    pub minima_summary: Option<PathBuf>,
    pub minima_coords: Option<PathBuf>,
    pub ts_summary: Option<PathBuf>,
    pub ts_coords: Option<PathBuf>,
    pub store: Option<PathBuf>,
}

const DEFAULT_STORE: &str = "storage.sqlite";

impl PartialConfig {
    /// The file names the pathway-sampling tools write.
    pub fn defaults() -> Self {
        Self {
            atom_count: None,
            minima_summary: Some("min.data".into()),
            minima_coords: Some("extractedmin".into()),
            ts_summary: Some("ts.data".into()),
            ts_coords: Some("extractedts".into()),
            store: Some(DEFAULT_STORE.into()),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads a config file. Relative paths in it are rebased onto the
    /// directory the file lives in.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;
        Ok(config.rebase(path.parent().unwrap_or(Path::new(""))))
    }

    /// Makes relative paths relative to `base` instead.
    pub fn rebase(self, base: &Path) -> Self {
        let rebase = |path: Option<PathBuf>| {
            path.map(|path| {
                if path.is_absolute() || base.as_os_str().is_empty() {
                    path
                } else {
                    base.join(path)
                }
            })
        };
        Self {
            atom_count: self.atom_count,
            minima_summary: rebase(self.minima_summary),
            minima_coords: rebase(self.minima_coords),
            ts_summary: rebase(self.ts_summary),
            ts_coords: rebase(self.ts_coords),
            store: rebase(self.store),
        }
    }

    /// Stacks `top` over `self`; fields set in `top` win.
    pub fn overlay(self, top: PartialConfig) -> Self {
        Self {
            atom_count: top.atom_count.or(self.atom_count),
            minima_summary: top.minima_summary.or(self.minima_summary),
            minima_coords: top.minima_coords.or(self.minima_coords),
            ts_summary: top.ts_summary.or(self.ts_summary),
            ts_coords: top.ts_coords.or(self.ts_coords),
            store: top.store.or(self.store),
        }
    }

    /// The store location, which is all that read-only commands need.
    pub fn store_location(&self) -> PathBuf {
        self.store
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE))
    }

    pub fn resolve(self) -> Result<ImportConfig, ConfigError> {
        let store = self.store_location();
        let defaults = Self::defaults();
        let atom_count = match self.atom_count {
            None => return Err(ConfigError::MissingAtomCount),
            Some(0) => return Err(ConfigError::ZeroAtomCount),
            Some(count) => count,
        };
        let or_default = |path: Option<PathBuf>, default: Option<PathBuf>| {
            path.or(default).unwrap_or_default()
        };

        Ok(ImportConfig {
            atom_count,
            minima_summary: or_default(self.minima_summary, defaults.minima_summary),
            minima_coords: or_default(self.minima_coords, defaults.minima_coords),
            ts_summary: or_default(self.ts_summary, defaults.ts_summary),
            ts_coords: or_default(self.ts_coords, defaults.ts_coords),
            store,
        })
    }
}

/// `import.toml` in the per-user config directory, e.g.
/// `~/.config/landscape/import.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "landscape", "landscape")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Stacks defaults, a config file and `overrides`.
///
/// The file is `explicit` when given, otherwise the per-user config file if
/// it exists. Without a file, defaults are relative to the working
/// directory; with one, they are relative to the file's directory.
pub fn layered(
    explicit: Option<&Path>,
    overrides: PartialConfig,
) -> Result<PartialConfig, ConfigError> {
    let file = match explicit {
        Some(path) => Some(path.to_owned()),
        None => default_config_path().filter(|path| path.is_file()),
    };

    let (base, from_file) = match file {
        Some(path) => {
            info!("Reading configuration from {}", path.display());
            let base = path.parent().map(Path::to_owned).unwrap_or_default();
            (base, PartialConfig::load(&path)?)
        }
        None => {
            debug!("No configuration file, using defaults");
            (PathBuf::new(), PartialConfig::default())
        }
    };

    Ok(PartialConfig::defaults()
        .rebase(&base)
        .overlay(from_file)
        .overlay(overrides))
}
