//! Configuration file for the stockpot CLI.
//!
//! The file is TOML with three tables:
//!
//! ```toml
//! [market]
//! bank_level = 1
//! brokers = 0
//! dragon_boost = 0.0
//! shock_chance = 0.01
//! shock_magnitude = 1.0
//! goods = 18
//!
//! [simulation]
//! ticks = 1000
//! runs = 100
//!
//! [output]
//! format = "table"
//! ```
//!
//! Resolution order: `--config` flag, then `STOCKPOT_CONFIG`, then the
//! platform config directory. A missing file yields the defaults.
//!
//! Any key can then be overridden from the environment as
//! `STOCKPOT_<TABLE>_<KEY>` (e.g. `STOCKPOT_MARKET_BANK_LEVEL=3`), the same
//! names `stockpot config export` prints.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use stockpot_core::{CATALOG, GameEnvironment};
use stockpot_sim::ShockConfig;

use crate::config_handlers::{get_nested_value, parse_value, set_nested_value};
use crate::error::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "STOCKPOT_CONFIG";

/// Prefix of per-key environment variables.
const ENV_PREFIX: &str = "STOCKPOT";

/// Dotted keys readable from and exported to the environment.
const ENV_KEYS: &[&str] = &[
    "market.bank_level",
    "market.brokers",
    "market.dragon_boost",
    "market.shock_chance",
    "market.shock_magnitude",
    "market.goods",
    "simulation.ticks",
    "simulation.runs",
    "simulation.seed",
    "output.format",
];

/// Environment variable for a dotted key: `market.bank_level` is
/// `STOCKPOT_MARKET_BANK_LEVEL`.
pub fn env_var_name(key: &str) -> String {
    format!("{ENV_PREFIX}_{}", key.replace('.', "_").to_ascii_uppercase())
}

/// How reports are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON
    Json,
}

/// `[market]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Bank building level
    pub bank_level: u32,
    /// Brokers hired
    pub brokers: u32,
    /// Dragon aura boost in `[0, 1]`
    pub dragon_boost: f64,
    /// Per-tick chance of a global shock
    pub shock_chance: f64,
    /// Largest shock magnitude
    pub shock_magnitude: f64,
    /// Number of catalog goods in the market
    pub goods: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        let shocks = ShockConfig::default();
        Self {
            bank_level: 1,
            brokers: 0,
            dragon_boost: 0.0,
            shock_chance: shocks.chance,
            shock_magnitude: shocks.max_magnitude,
            goods: CATALOG.len(),
        }
    }
}

/// `[simulation]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ticks per run
    pub ticks: usize,
    /// Runs per batch
    pub runs: usize,
    /// Fixed seed; a random one is drawn when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 1_000,
            runs: 100,
            seed: None,
        }
    }
}

/// `[output]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: OutputFormat,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockpotConfig {
    /// Market parameters
    pub market: MarketConfig,
    /// Run lengths and seeding
    pub simulation: SimulationConfig,
    /// Output settings
    pub output: OutputConfig,
}

impl StockpotConfig {
    /// Name used in messages and env var prefixes.
    pub fn project_name() -> &'static str {
        "stockpot"
    }

    /// Default location: `<config dir>/stockpot/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolves the config file path from flag, env var, or platform default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Loads the resolved config file, falling back to defaults if it is
    /// absent, then applies `STOCKPOT_<TABLE>_<KEY>` environment overrides.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        Self::load_with_env(explicit, |name| std::env::var(name).ok())
    }

    /// Like [`StockpotConfig::load`], reading overrides through `lookup`.
    pub fn load_with_env<F>(explicit: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.with_env_overrides(lookup)
    }

    /// Layers `STOCKPOT_<TABLE>_<KEY>` values found by `lookup` over this config.
    pub fn with_env_overrides<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut doc = toml::Value::try_from(&self).map_err(|e| Error::config(e.to_string()))?;
        let mut overridden = Vec::new();
        for key in ENV_KEYS {
            let name = env_var_name(key);
            let Some(raw) = lookup(&name) else {
                continue;
            };
            // `STOCKPOT_MARKET_DRAGON_BOOST=1` still means a float.
            let value = match (parse_value(&raw), get_nested_value(&doc, key)) {
                (toml::Value::Integer(i), Some(toml::Value::Float(_))) => {
                    toml::Value::Float(i as f64)
                }
                (value, _) => value,
            };
            set_nested_value(&mut doc, key, value)?;
            overridden.push(name);
        }
        if overridden.is_empty() {
            return Ok(self);
        }

        tracing::debug!(vars = ?overridden, "Applied environment overrides");
        let text = toml::to_string(&doc).map_err(|e| Error::config(e.to_string()))?;
        toml::from_str(&text).map_err(|e| {
            Error::config(format!(
                "Invalid value in {}: {e}",
                overridden.join(", ")
            ))
        })
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flattens the config into the `STOCKPOT_<TABLE>_<KEY>` variables that
    /// [`StockpotConfig::load`] reads back. Unset keys are skipped.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let doc = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        Ok(ENV_KEYS
            .iter()
            .filter_map(|key| {
                let value = match get_nested_value(&doc, key)? {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((env_var_name(key), value))
            })
            .collect())
    }

    /// Game environment described by the `[market]` table.
    pub fn environment(&self) -> GameEnvironment {
        GameEnvironment::new(self.market.bank_level, self.market.brokers)
            .with_dragon_boost(self.market.dragon_boost)
    }

    /// Shock settings described by the `[market]` table.
    pub fn shocks(&self) -> ShockConfig {
        ShockConfig {
            chance: self.market.shock_chance,
            max_magnitude: self.market.shock_magnitude,
        }
    }

    /// Checks every value the simulator will consume.
    pub fn validate(&self) -> Result<()> {
        self.environment().validate()?;
        self.shocks().validate()?;
        if self.market.goods == 0 || self.market.goods > CATALOG.len() {
            return Err(Error::config(format!(
                "market.goods must be between 1 and {}, got {}",
                CATALOG.len(),
                self.market.goods
            )));
        }
        if self.simulation.ticks == 0 {
            return Err(Error::config("simulation.ticks must be positive"));
        }
        if self.simulation.runs == 0 {
            return Err(Error::config("simulation.runs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn absent_path(dir: &tempfile::TempDir) -> String {
        dir.path().join("absent.toml").to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_is_valid() {
        assert!(StockpotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_toml_roundtrip() {
        let config = StockpotConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[market]"));
        assert!(!text.contains("seed"));
        let back: StockpotConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: StockpotConfig = toml::from_str(
            r#"
            [market]
            bank_level = 7

            [output]
            format = "csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.market.bank_level, 7);
        assert_eq!(config.market.brokers, 0);
        assert_eq!(config.simulation.ticks, 1_000);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let config = StockpotConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config, StockpotConfig::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[market\nbank_level = ").unwrap();
        let err = StockpotConfig::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StockpotConfig::default();
        config.market.dragon_boost = 3.0;
        assert!(config.validate().is_err());

        let mut config = StockpotConfig::default();
        config.market.goods = 40;
        assert!(config.validate().is_err());

        let mut config = StockpotConfig::default();
        config.simulation.ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_vars() {
        let mut config = StockpotConfig::default();
        config.simulation.seed = Some(9);
        let vars = config.to_env_vars().unwrap();
        assert!(vars.contains(&("STOCKPOT_MARKET_BANK_LEVEL".to_string(), "1".to_string())));
        assert!(vars.contains(&("STOCKPOT_SIMULATION_SEED".to_string(), "9".to_string())));
        assert!(vars.contains(&("STOCKPOT_OUTPUT_FORMAT".to_string(), "table".to_string())));
        assert!(vars.iter().all(|(name, _)| name.starts_with("STOCKPOT_")));
    }

    #[test]
    fn test_env_vars_omit_unset_seed() {
        let vars = StockpotConfig::default().to_env_vars().unwrap();
        assert!(vars.iter().all(|(name, _)| name != "STOCKPOT_SIMULATION_SEED"));
        assert_eq!(vars.len(), ENV_KEYS.len() - 1);
    }

    #[test]
    fn test_exported_env_vars_reload() {
        let mut config = StockpotConfig::default();
        config.market.bank_level = 7;
        config.market.brokers = 3;
        config.market.dragon_boost = 0.25;
        config.market.shock_chance = 0.05;
        config.market.goods = 6;
        config.simulation.runs = 12;
        config.simulation.seed = Some(42);
        config.output.format = OutputFormat::Json;

        let vars: HashMap<String, String> = config.to_env_vars().unwrap().into_iter().collect();
        let dir = tempfile::TempDir::new().unwrap();
        let loaded =
            StockpotConfig::load_with_env(Some(&absent_path(&dir)), |name| vars.get(name).cloned())
                .unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[market]\nbank_level = 2\nbrokers = 5\n").unwrap();

        let loaded = StockpotConfig::load_with_env(Some(path.to_str().unwrap()), |name| {
            match name {
                "STOCKPOT_MARKET_BANK_LEVEL" => Some("9".to_string()),
                "STOCKPOT_MARKET_DRAGON_BOOST" => Some("1".to_string()),
                "STOCKPOT_OUTPUT_FORMAT" => Some("csv".to_string()),
                _ => None,
            }
        })
        .unwrap();
        assert_eq!(loaded.market.bank_level, 9);
        assert_eq!(loaded.market.brokers, 5);
        assert_eq!(loaded.market.dragon_boost, 1.0);
        assert_eq!(loaded.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_env_override_with_bad_value() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = StockpotConfig::load_with_env(Some(&absent_path(&dir)), |name| {
            (name == "STOCKPOT_MARKET_BROKERS").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("STOCKPOT_MARKET_BROKERS"));
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("market.bank_level"), "STOCKPOT_MARKET_BANK_LEVEL");
        assert_eq!(env_var_name("output.format"), "STOCKPOT_OUTPUT_FORMAT");
    }

    #[test]
    fn test_environment_and_shocks() {
        let mut config = StockpotConfig::default();
        config.market.bank_level = 4;
        config.market.dragon_boost = 0.25;
        config.market.shock_chance = 0.5;
        let env = config.environment();
        assert_eq!(env.bank_level, 4);
        assert_eq!(env.dragon_boost, 0.25);
        assert_eq!(config.shocks().chance, 0.5);
    }
}
