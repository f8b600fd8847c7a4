//! Shell configuration.
//!
//! Settings are read from a TOML file with kebab-case keys. Every field has a
//! default, so a partial file (or no file at all) yields a usable configuration:
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "info"
//! max-files = 3
//! directory = "logs"
//!
//! [navigation]
//! default-provider = "CoreShell"
//! max-parent-walk = 20
//! pinned-providers = ["SettingsUI"]
//! hidden-by-default = ["CoreShell", "Sample"]
//!
//! [presenter]
//! transition-duration-ms = 220
//! item-spacing = 8.0
//! overscan = 120.0
//! estimated-item-extent = 96.0
//! ```

use crate::breadcrumb::DEFAULT_MAX_PARENT_WALK;
use crate::core_shell::CORE_SHELL_ID;
use anyhow::{Context, Error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level shell configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ShellSettings {
    pub logging: LoggingSettings,
    pub navigation: NavigationSettings,
    pub presenter: PresenterSettings,
}

impl ShellSettings {
    /// Loads settings from `path`, falling back to defaults.
    ///
    /// A missing file is not an error. An unreadable or invalid file is
    /// reported on stderr and replaced by defaults, because logging is
    /// configured from these very settings and is not available yet.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return ShellSettings::default();
        }

        match load_toml::<ShellSettings, _>(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!(
                    "failed to load settings file {}: {:#}; using defaults",
                    path.display(),
                    e
                );
                ShellSettings::default()
            }
        }
    }
}

/// Logging configuration consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingSettings {
    pub enabled: bool,
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Number of run log files to keep. `0` keeps all of them.
    pub max_files: usize,
    /// Log directory, relative to the current working directory.
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            enabled: true,
            level: "info".to_string(),
            max_files: 3,
            directory: PathBuf::from("logs"),
        }
    }
}

/// Routing behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NavigationSettings {
    /// Provider whose `Root` page is shown for `HOME`.
    pub default_provider: String,
    /// Upper bound on parent lookups when a breadcrumb is built by walking
    /// up from the target page.
    pub max_parent_walk: usize,
    /// Providers that can never be hidden from the navigation pane.
    pub pinned_providers: Vec<String>,
    /// Providers hidden from the navigation pane until the user enables them.
    pub hidden_by_default: Vec<String>,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        NavigationSettings {
            default_provider: CORE_SHELL_ID.to_string(),
            max_parent_walk: DEFAULT_MAX_PARENT_WALK,
            pinned_providers: Vec::new(),
            hidden_by_default: vec![CORE_SHELL_ID.to_string(), "Sample".to_string()],
        }
    }
}

/// Content surface behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PresenterSettings {
    pub transition_duration_ms: u64,
    /// Vertical gap between two content units.
    pub item_spacing: f32,
    /// Extra distance above and below the viewport in which units are realized.
    pub overscan: f32,
    /// Height assumed for a unit that has not been rendered yet.
    pub estimated_item_extent: f32,
}

impl PresenterSettings {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

impl Default for PresenterSettings {
    fn default() -> Self {
        PresenterSettings {
            transition_duration_ms: 220,
            item_spacing: 8.0,
            overscan: 120.0,
            estimated_item_extent: 96.0,
        }
    }
}

/// Deserializes a TOML file into `T`.
pub fn load_toml<T, P: AsRef<Path>>(path: P) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("can't read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("can't parse {}", path.display()))
}

/// Serializes `value` as pretty TOML into `path`, creating parent directories.
pub fn save_toml<T, P: AsRef<Path>>(value: &T, path: P) -> Result<(), Error>
where
    T: Serialize,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("can't create directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(value).context("can't serialize settings")?;
    fs::write(path, content).with_context(|| format!("can't write {}", path.display()))
}
