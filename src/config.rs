//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/inorder/inorder.toml`
//! 3. Explicit config file (`--config <path>`)
//! 4. Environment variables: `INORDER_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::services::SessionOptions;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Position, RandomTreeOptions, Theme, DEFAULT_POOL, VERTICAL_STEP};

/// Upper bound for `layout.spacing`; anything wider cannot be drawn.
pub const MAX_SPACING: f64 = 10_000.0;
/// Accepted `layout.vertical_step`, in layout units.
pub const VERTICAL_STEP_RANGE: (f64, f64) = (1.0, 1_000.0);

/// Where the tree is drawn, in layout units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub root_x: f64,
    pub root_y: f64,
    /// Horizontal offset of the root's children; halves per level
    pub spacing: f64,
    pub vertical_step: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root_x: 300.0,
            root_y: 50.0,
            spacing: 140.0,
            vertical_step: VERTICAL_STEP,
        }
    }
}

/// Random tree generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RandomConfig {
    pub max_depth: usize,
    pub branch_probability: f64,
    /// Distinct node values to draw from
    pub pool: Vec<i64>,
    /// Fixed seed for reproducible trees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        let options = RandomTreeOptions::default();
        Self {
            max_depth: options.max_depth,
            branch_probability: options.branch_probability,
            pool: DEFAULT_POOL.to_vec(),
            seed: None,
        }
    }
}

/// Raw layout config for intermediate parsing (all fields optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub root_x: Option<f64>,
    pub root_y: Option<f64>,
    pub spacing: Option<f64>,
    pub vertical_step: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRandomConfig {
    pub max_depth: Option<usize>,
    pub branch_probability: Option<f64>,
    pub pool: Option<Vec<i64>>,
    pub seed: Option<u64>,
}

/// Raw settings for intermediate parsing.
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some(..)` → explicit value, replaces base
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub theme: Option<Theme>,
    pub step_delay_ms: Option<u64>,
    pub layout: RawLayoutConfig,
    pub random: RawRandomConfig,
}

/// Unified configuration for the visualizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Color scheme (default: light)
    pub theme: Theme,
    /// Delay between auto-play steps (default: 800)
    pub step_delay_ms: u64,
    pub layout: LayoutConfig,
    pub random: RandomConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            step_delay_ms: 800,
            layout: LayoutConfig::default(),
            random: RandomConfig::default(),
        }
    }
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "inorder").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("inorder.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value, otherwise keep self.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let (layout, random) = (&overlay.layout, &overlay.random);
        Self {
            theme: overlay.theme.unwrap_or(self.theme),
            step_delay_ms: overlay.step_delay_ms.unwrap_or(self.step_delay_ms),
            layout: LayoutConfig {
                root_x: layout.root_x.unwrap_or(self.layout.root_x),
                root_y: layout.root_y.unwrap_or(self.layout.root_y),
                spacing: layout.spacing.unwrap_or(self.layout.spacing),
                vertical_step: layout.vertical_step.unwrap_or(self.layout.vertical_step),
            },
            random: RandomConfig {
                max_depth: random.max_depth.unwrap_or(self.random.max_depth),
                branch_probability: random
                    .branch_probability
                    .unwrap_or(self.random.branch_probability),
                pool: random
                    .pool
                    .clone()
                    .unwrap_or_else(|| self.random.pool.clone()),
                seed: random.seed.or(self.random.seed),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file; unlike the global file it must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/inorder/inorder.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `INORDER_*` prefix
    pub fn load(explicit: Option<&Path>) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit file
        if let Some(path) = explicit {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply INORDER_* environment variables as explicit overrides.
    ///
    /// Examples: `INORDER_THEME=dark`, `INORDER_LAYOUT__SPACING=120`,
    /// `INORDER_RANDOM__POOL=1,2,3`.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("INORDER")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("random.pool")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Some(val) = env_value::<String>(&config, "theme")? {
            settings.theme = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Some(val) = env_value(&config, "step_delay_ms")? {
            settings.step_delay_ms = val;
        }
        if let Some(val) = env_value(&config, "layout.root_x")? {
            settings.layout.root_x = val;
        }
        if let Some(val) = env_value(&config, "layout.root_y")? {
            settings.layout.root_y = val;
        }
        if let Some(val) = env_value(&config, "layout.spacing")? {
            settings.layout.spacing = val;
        }
        if let Some(val) = env_value(&config, "layout.vertical_step")? {
            settings.layout.vertical_step = val;
        }
        if let Some(val) = env_value(&config, "random.max_depth")? {
            settings.random.max_depth = val;
        }
        if let Some(val) = env_value(&config, "random.branch_probability")? {
            settings.random.branch_probability = val;
        }
        if let Some(val) = env_value(&config, "random.pool")? {
            settings.random.pool = val;
        }
        if let Some(val) = env_value(&config, "random.seed")? {
            settings.random.seed = Some(val);
        }

        Ok(settings)
    }

    /// Reject settings the kernel cannot work with.
    pub fn validate(&self) -> ApplicationResult<()> {
        let invalid = |message: String| Err(ApplicationError::Config { message });

        if !(self.layout.spacing > 0.0 && self.layout.spacing <= MAX_SPACING) {
            return invalid(format!(
                "layout.spacing must be in (0, {}], got {}",
                MAX_SPACING, self.layout.spacing
            ));
        }
        if !(VERTICAL_STEP_RANGE.0..=VERTICAL_STEP_RANGE.1).contains(&self.layout.vertical_step) {
            return invalid(format!(
                "layout.vertical_step must be in [{}, {}], got {}",
                VERTICAL_STEP_RANGE.0, VERTICAL_STEP_RANGE.1, self.layout.vertical_step
            ));
        }
        if !self.layout.root_x.is_finite() || !self.layout.root_y.is_finite() {
            return invalid("layout root coordinates must be finite".to_string());
        }
        if self.random.pool.is_empty() {
            return invalid("random.pool must not be empty".to_string());
        }
        if let Some(dup) = self.random.pool.iter().duplicates().next() {
            return invalid(format!("random.pool contains {} more than once", dup));
        }
        self.random_options()
            .validate()
            .map_err(|e| ApplicationError::Config {
                message: format!("random: {e}"),
            })
    }

    pub fn random_options(&self) -> RandomTreeOptions {
        RandomTreeOptions {
            max_depth: self.random.max_depth,
            branch_probability: self.random.branch_probability,
        }
    }

    /// Layout and generation parameters for a new session.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            origin: Position::new(self.layout.root_x, self.layout.root_y),
            spacing: self.layout.spacing,
            vertical_step: self.layout.vertical_step,
            pool: self.random.pool.clone(),
            random: self.random_options(),
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# inorder configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/inorder/inorder.toml
#   Explicit: inorder --config <path> (or INORDER_CONFIG)
#   Env:      INORDER_* environment variables (INORDER_LAYOUT__SPACING=120)

# Color scheme: "light" or "dark"
# theme = "light"

# Delay between auto-play steps
# step_delay_ms = 800

[layout]
# Root position and horizontal spacing of its children (halves per level)
# root_x = 300.0
# root_y = 50.0
# spacing = 140.0
# vertical_step = 80.0

[random]
# Maximum number of levels, root included
# max_depth = 3

# Probability of attaching each child
# branch_probability = 0.7

# Distinct values to build random trees from
# pool = [1, 2, 3, 4, 5, 6, 7]

# Fixed seed for reproducible trees
# seed = 42
"#
        .to_string()
    }
}

/// Typed lookup of one env override; an absent key is `None`, a value of the
/// wrong type is an error.
fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> ApplicationResult<Option<T>> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("environment override {key}: {e}"),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.step_delay_ms, 800);
        assert_eq!(settings.random.pool, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let raw: RawSettings = toml::from_str(
            r#"
theme = "dark"
[layout]
spacing = 100.0
"#,
        )
        .unwrap();
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.theme, Theme::Dark);
        assert_eq!(merged.layout.spacing, 100.0);
        assert_eq!(merged.layout.root_x, 300.0);
        assert_eq!(merged.random, RandomConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.random.branch_probability = 2.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.random.pool = vec![1, 1];
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.layout.spacing = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_template_parses() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.theme.is_none());
    }
}
