//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/systree/systree.toml`
//! 3. Local config: `<dir>/.systree.toml`
//! 4. Environment variables: `SYSTREE_*` prefix, nested keys separated by `__`
//!    (e.g. `SYSTREE_DISPLAY__SHOW_IDS=true`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::RenderOptions;

/// How trees are printed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Append `[id]` to every label
    pub show_ids: bool,
    /// Append `(kind)` to every label
    pub show_kinds: bool,
    /// Append `{key=value, ...}` to every label
    pub show_attributes: bool,
    /// Ignore collapsed state and print every node
    pub show_all: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_ids: false,
            show_kinds: true,
            show_attributes: false,
            show_all: false,
        }
    }
}

/// Raw display config for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub show_ids: Option<bool>,
    pub show_kinds: Option<bool>,
    pub show_attributes: Option<bool>,
    pub show_all: Option<bool>,
}

impl DisplayConfig {
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge(&self, overlay: &RawDisplayConfig) -> Self {
        Self {
            show_ids: overlay.show_ids.unwrap_or(self.show_ids),
            show_kinds: overlay.show_kinds.unwrap_or(self.show_kinds),
            show_attributes: overlay.show_attributes.unwrap_or(self.show_attributes),
            show_all: overlay.show_all.unwrap_or(self.show_all),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub template_file: Option<PathBuf>,
    #[serde(default)]
    pub display: RawDisplayConfig,
}

/// Unified configuration for systree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// TOML template used by `rebuild` instead of the built-in one
    pub template_file: Option<PathBuf>,
    /// Tree printing options
    pub display: DisplayConfig,
}

/// Get the XDG config directory for systree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "systree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("systree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".systree.toml")
}

/// Expand environment variables and `~` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings for manual merging.
///
/// A relative `template_file` is resolved against the config file's directory.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    let mut raw: RawSettings = toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })?;

    if let Some(template) = raw.template_file.take() {
        let expanded = PathBuf::from(expand_env_vars(&template.to_string_lossy()));
        raw.template_file = Some(match path.parent() {
            Some(dir) if expanded.is_relative() => dir.join(expanded),
            _ => expanded,
        });
    }
    Ok(raw)
}

impl Settings {
    /// Options for rendering a tree with these settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_all: self.display.show_all,
            show_ids: self.display.show_ids,
            show_kinds: self.display.show_kinds,
            show_attributes: self.display.show_attributes,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(template) = &self.template_file {
            let expanded = expand_env_vars(template.to_string_lossy().as_ref());
            self.template_file = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            template_file: overlay
                .template_file
                .clone()
                .or_else(|| self.template_file.clone()),
            display: self.display.merge(&overlay.display),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.systree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/systree/systree.toml`
    /// 3. Local config: `<local_dir>/.systree.toml`
    /// 4. Environment variables: `SYSTREE_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply SYSTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SYSTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("template_file") {
            settings.template_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("display.show_ids") {
            settings.display.show_ids = val;
        }
        if let Ok(val) = config.get_bool("display.show_kinds") {
            settings.display.show_kinds = val;
        }
        if let Ok(val) = config.get_bool("display.show_attributes") {
            settings.display.show_attributes = val;
        }
        if let Ok(val) = config.get_bool("display.show_all") {
            settings.display.show_all = val;
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_merge_keeps_unspecified_fields() {
        let base = DisplayConfig::default();
        let overlay = RawDisplayConfig {
            show_ids: Some(true),
            ..Default::default()
        };
        let merged = base.merge(&overlay);
        assert!(merged.show_ids);
        assert!(merged.show_kinds);
        assert!(!merged.show_all);
    }

    #[test]
    fn given_tilde_in_template_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            template_file: Some(PathBuf::from("~/templates/pi.toml")),
            ..Default::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let template = settings.template_file.expect("template file kept");
        let template = template.to_string_lossy();
        assert!(
            template.starts_with(&home),
            "template_file should start with home dir: {}",
            template
        );
        assert!(!template.contains('~'), "template_file should not contain tilde: {}", template);
    }

    #[test]
    fn given_env_var_in_template_file_when_expand_paths_then_expands_variable() {
        let mut settings = Settings {
            template_file: Some(PathBuf::from("${HOME}/templates/pi.toml")),
            ..Default::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert_eq!(
            settings.template_file,
            Some(PathBuf::from(home).join("templates/pi.toml"))
        );
    }

    #[test]
    fn given_unknown_var_in_template_file_when_expand_paths_then_keeps_text() {
        let mut settings = Settings {
            template_file: Some(PathBuf::from("$SYSTREE_SURELY_UNSET_VAR/pi.toml")),
            ..Default::default()
        };

        settings.expand_paths();

        assert_eq!(
            settings.template_file,
            Some(PathBuf::from("$SYSTREE_SURELY_UNSET_VAR/pi.toml"))
        );
    }

    #[test]
    fn test_defaults_render_options() {
        let opts = Settings::default().render_options();
        assert!(opts.show_kinds);
        assert!(!opts.show_ids);
        assert!(!opts.show_attributes);
    }
}
