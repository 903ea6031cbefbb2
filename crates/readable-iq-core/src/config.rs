//! Configuration loading and discovery.
//!
//! Sources are merged with figment, lowest precedence first:
//! 1. Built-in defaults
//! 2. User config: `~/.config/readable-iq/config.<ext>`
//! 3. Project config, found by walking up from the search root
//! 4. Explicit files (`--config`)
//! 5. `READABLE_IQ_*` environment variables (`__` separates nested keys,
//!    e.g. `READABLE_IQ_NARRATIVE__TIMEOUT_SECS=30`)
//!
//! Project config file names, lowest precedence first, each in
//! `toml`, `yaml`, `yml` and `json`:
//! - `.riq.<ext>`, `riq.<ext>`
//! - `.readable-iq.<ext>`, `readable-iq.<ext>`
//!
//! Only the closest directory holding any of these contributes. The search
//! stops at a directory containing `.git`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use readable_iq_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir().unwrap()).unwrap();
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("input limit: {:?}", config.input_limit());
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::narrative::NarrativeConfig;

/// Input size limit applied when the config does not set one (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

/// The configuration for readable-iq.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level ("debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files.
    pub log_dir: Option<Utf8PathBuf>,
    /// Maximum input size in bytes. Defaults to 5 MiB.
    pub max_input_bytes: Option<usize>,
    /// Skip the input size check entirely.
    pub disable_input_limit: bool,
    /// Narrative generator settings.
    pub narrative: NarrativeConfig,
}

impl Config {
    /// The effective input size limit, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging.
    Debug,
    /// Standard operational information.
    #[default]
    Info,
    /// Potential problems.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which configuration files were merged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files, ordered low to high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files given explicitly, in load order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The highest-precedence file that was loaded.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .or_else(|| self.project_files.last())
            .map(Utf8PathBuf::as_path)
            .or(self.user_file.as_deref())
    }
}

const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

const APP_NAME: &str = "readable-iq";

/// Project config base names, lowest precedence first.
const APP_NAMES: &[&str] = &["riq", "readable-iq"];

const ENV_PREFIX: &str = "READABLE_IQ_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader that reads user config and stops at `.git`.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Walk up from `path` looking for project config.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Include or skip `~/.config/readable-iq/config.<ext>`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward search at a directory containing `marker`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Search all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file. Later files win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge every source and deserialize the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Deserialize`] when a source is malformed or a
    /// value has the wrong type.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = find_user_config()
        {
            figment = merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for file in &project_configs {
                figment = merge_file(figment, file);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            log_level = config.log_level.as_str(),
            primary = ?sources.primary_file(),
            narrator = config.narrative.command.is_some(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Like [`load`](Self::load), but fail when no file was found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no source file exists.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());

        if !has_user && !has_project && self.explicit_files.is_empty() {
            return Err(ConfigError::NotFound);
        }
        self.load()
    }

    /// Config files in the closest directory at or above `start` that has any.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        for dir in start.ancestors() {
            let found: Vec<_> = APP_NAMES
                .iter()
                .flat_map(|name| {
                    let dotfiles = CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| dir.join(format!(".{name}.{ext}")));
                    let regular = CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| dir.join(format!("{name}.{ext}")));
                    dotfiles.chain(regular)
                })
                .filter(|path| path.is_file())
                .collect();

            if !found.is_empty() {
                return found;
            }

            // Checked after the files so a config next to `.git` still counts
            if let Some(ref marker) = self.boundary_marker
                && dir != start
                && dir.join(marker).exists()
            {
                break;
            }
        }
        Vec::new()
    }
}

fn find_user_config() -> Option<Utf8PathBuf> {
    let config_dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| config_dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// The user config directory (`~/.config/readable-iq/` on Linux).
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(project_dirs()?.config_dir().to_path_buf()).ok()
}
