//! Configuration loading from TOML.
//!
//! Reads `scanner.toml` (or the path in `MONEY_SCANNER_CONFIG`) and
//! deserializes into strongly-typed structs. Every section is optional;
//! missing values fall back to the built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

use crate::cooldown::CooldownGate;
use crate::presenter::DEFAULT_DECIMAL_PLACES;
use crate::registry::DenominationRegistry;
use crate::scanner::ScannerSettings;

/// Default config file path.
pub const DEFAULT_CONFIG_FILE: &str = "scanner.toml";

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "MONEY_SCANNER_CONFIG";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// Target name → denomination. Empty means "use the built-in table".
    #[serde(default)]
    pub denominations: BTreeMap<String, f64>,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScannerConfig {
    /// Cooldown in seconds to avoid double-adding a target that stays tracked.
    pub cooldown_secs: f64,
    /// Initial position of the auto-add toggle.
    pub auto_add: bool,
    pub decimal_places: u32,
    /// Ring the terminal bell after each addition.
    pub play_sound: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 0.6,
            auto_add: true,
            decimal_places: DEFAULT_DECIMAL_PLACES,
            play_sound: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExportConfig {
    /// Where to write the session history on shutdown. No export when unset.
    pub history_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from the configured path, or defaults if no file exists there.
    pub fn load_or_default() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        if std::path::Path::new(&path).exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Build the denomination registry, falling back to the built-in table.
    pub fn registry(&self) -> Result<DenominationRegistry> {
        if self.denominations.is_empty() {
            return Ok(DenominationRegistry::default());
        }
        DenominationRegistry::from_floats(&self.denominations)
            .context("Invalid [denominations] table")
    }

    pub fn settings(&self) -> Result<ScannerSettings> {
        let gate = CooldownGate::from_secs_f64(self.scanner.cooldown_secs)
            .context("Invalid scanner.cooldown_secs")?;
        Ok(ScannerSettings {
            cooldown: gate.window(),
            decimal_places: self.scanner.decimal_places,
        })
    }
}
