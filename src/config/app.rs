// src/config/app.rs
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

use crate::factors::{parse_decisions, MAX_SLIDER_SCORE, MIN_SLIDER_SCORE};
use crate::weights::{default_weights, WeightVector};

// --- env defaults & names ---
pub const DEFAULT_APP_CONFIG_PATH: &str = "config/app.toml";
pub const ENV_APP_CONFIG_PATH: &str = "LDC_CONFIG_PATH";
pub const ENV_RANDOMIZE_DEFAULTS: &str = "LDC_RANDOMIZE_DEFAULTS";

pub const DEFAULT_DECISIONS: &str = "Take New Job,Stay in Role,Third Option";

fn default_decisions() -> String {
    DEFAULT_DECISIONS.to_string()
}
fn default_factor_score() -> u8 {
    5
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default = "default_weights")]
    pub weights: WeightVector,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Comma-separated options shown on first load.
    #[serde(default = "default_decisions")]
    pub default_decisions: String,
    /// Random slider scores and random (normalized) weights on first load.
    #[serde(default = "default_true")]
    pub randomize_defaults: bool,
    /// Slider score used when `randomize_defaults` is off.
    #[serde(default = "default_factor_score")]
    pub default_factor_score: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_decisions: default_decisions(),
            randomize_defaults: true,
            default_factor_score: default_factor_score(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            weights: default_weights(),
        }
    }
}

impl AppConfig {
    /// Load using LDC_CONFIG_PATH or "config/app.toml".
    /// An explicitly configured path must exist; the default path may be absent (built-in defaults).
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match env::var(ENV_APP_CONFIG_PATH) {
            Ok(p) => {
                let path = PathBuf::from(p);
                let content = fs::read_to_string(&path).map_err(|e| {
                    anyhow::anyhow!("Failed to read app config at {}: {}", path.display(), e)
                })?;
                Self::from_toml_str(&content)?
            }
            Err(_) => match fs::read_to_string(DEFAULT_APP_CONFIG_PATH) {
                Ok(content) => Self::from_toml_str(&content)?,
                Err(_) => Self::default(),
            },
        };

        if let Some(flag) = parse_bool_env(env::var(ENV_RANDOMIZE_DEFAULTS).ok()) {
            cfg.session.randomize_defaults = flag;
        }

        Ok(cfg)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: AppConfig = toml::from_str(toml_str)?;

        if parse_decisions(&cfg.session.default_decisions).is_empty() {
            anyhow::bail!("session.default_decisions must name at least one option");
        }

        // Sanitize slider default
        cfg.session.default_factor_score = cfg
            .session
            .default_factor_score
            .clamp(MIN_SLIDER_SCORE, MAX_SLIDER_SCORE);

        if cfg
            .weights
            .iter()
            .any(|(_, w)| !w.is_finite() || !(0.0..=1.0).contains(w))
        {
            anyhow::bail!("weights must be finite and within 0..=1");
        }

        Ok(cfg)
    }
}

// "1"/"true"/"yes" and "0"/"false"/"no"; anything else is ignored
fn parse_bool_env(raw: Option<String>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
