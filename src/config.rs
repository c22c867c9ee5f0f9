//! Presentation defaults persistence
//!
//! Stores presentation hints in `~/.config/detailer/config.yaml`. These are
//! passthrough values for the host's renderer; the session logic never reads
//! them.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Default minimum width of a detail pane, in points
pub const DEFAULT_MIN_WIDTH: f32 = 300.0;

/// How the renderer should draw an invalid-field marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorStyle {
    /// Symbol name (e.g. an SF Symbols / icon font identifier)
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Tint color name
    #[serde(default = "default_tint")]
    pub tint: String,
}

fn default_symbol() -> String {
    "exclamationmark.triangle".to_string()
}

fn default_tint() -> String {
    "orange".to_string()
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            tint: default_tint(),
        }
    }
}

/// Layout and indicator hints handed through to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(default = "default_min_width")]
    pub min_width: f32,
    #[serde(default)]
    pub indicator: IndicatorStyle,
}

fn default_min_width() -> f32 {
    DEFAULT_MIN_WIDTH
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            indicator: IndicatorStyle::default(),
        }
    }
}

/// Detailer configuration that persists across runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailerConfig {
    #[serde(default)]
    pub presentation: Presentation,
}

impl DetailerConfig {
    /// Load config from the user config directory, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults if it is
    /// missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to a file, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
