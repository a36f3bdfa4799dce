// Configuration management for the grid calculator

use crate::core::projector::validate_parameters;
use crate::core::{GridConventions, GridParameters, Side, TargetMode};
use crate::fees::FeeSchedule;
use crate::market::{DailyCandle, InMemoryMarketData, MarketSnapshot};
use crate::scenario::{preset_scenarios, Scenario};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Default ladder parameters, the `[grid]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDefaults {
    #[serde(default = "default_entry_price")]
    pub entry_price: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_trade_size_percent")]
    pub trade_size_percent: f64,
    #[serde(default = "default_leverage")]
    pub leverage: f64,
    #[serde(default = "default_grid_levels")]
    pub grid_levels: u32,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default = "default_grid_multiplier")]
    pub grid_multiplier: f64,
    #[serde(default = "default_trade_size_multiplier")]
    pub trade_size_multiplier: f64,
    #[serde(default = "default_tp_percent")]
    pub tp_percent: f64,
}

fn default_entry_price() -> f64 { 100.0 }
fn default_margin() -> f64 { 1000.0 }
fn default_trade_size_percent() -> f64 { 10.0 }
fn default_leverage() -> f64 { 3.0 }
fn default_grid_levels() -> u32 { 3 }
fn default_grid_size() -> f64 { 2.0 }
fn default_grid_multiplier() -> f64 { 0.9 }
fn default_trade_size_multiplier() -> f64 { 1.15 }
fn default_tp_percent() -> f64 { 10.0 }

impl Default for GridDefaults {
    fn default() -> Self {
        Self {
            entry_price: default_entry_price(),
            margin: default_margin(),
            trade_size_percent: default_trade_size_percent(),
            leverage: default_leverage(),
            grid_levels: default_grid_levels(),
            grid_size: default_grid_size(),
            grid_multiplier: default_grid_multiplier(),
            trade_size_multiplier: default_trade_size_multiplier(),
            tp_percent: default_tp_percent(),
        }
    }
}

/// Optional replacements for individual ladder parameters.
///
/// Used by `[[pairs]]` entries and by the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_size_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leverage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_levels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_size_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tp_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl GridOverrides {
    pub fn apply(&self, params: &mut GridParameters) {
        if let Some(v) = self.entry_price { params.entry_price = v; }
        if let Some(v) = self.margin { params.margin = v; }
        if let Some(v) = self.trade_size_percent { params.trade_size_percent = v; }
        if let Some(v) = self.leverage { params.leverage = v; }
        if let Some(v) = self.grid_levels { params.grid_levels = v; }
        if let Some(v) = self.grid_size { params.grid_size = v; }
        if let Some(v) = self.grid_multiplier { params.grid_multiplier = v; }
        if let Some(v) = self.trade_size_multiplier { params.trade_size_multiplier = v; }
        if let Some(v) = self.tp_percent { params.tp_percent = v; }
        if let Some(side) = self.side { params.conventions.side = side; }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub mode: TargetMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

/// Advisory thresholds used by pre-flight validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Margin utilization percent above which a warning is raised
    #[serde(default = "default_margin_utilization_warning")]
    pub margin_utilization_warning: f64,
    #[serde(default = "default_margin_utilization_critical")]
    pub margin_utilization_critical: f64,
    /// Risk/reward ratio below which a warning is raised
    #[serde(default = "default_risk_reward_warning")]
    pub risk_reward_warning: f64,
    #[serde(default = "default_risk_reward_critical")]
    pub risk_reward_critical: f64,
    /// Liquidation distance percent below which a warning is raised
    #[serde(default = "default_liquidation_distance_warning")]
    pub liquidation_distance_warning: f64,
    #[serde(default = "default_liquidation_distance_critical")]
    pub liquidation_distance_critical: f64,
    /// Share of margin that may be lost, percent; scales liquidation and suggested spacing
    #[serde(default = "default_max_drawdown_percent")]
    pub max_drawdown_percent: f64,
}

fn default_margin_utilization_warning() -> f64 { 50.0 }
fn default_margin_utilization_critical() -> f64 { 80.0 }
fn default_risk_reward_warning() -> f64 { 1.5 }
fn default_risk_reward_critical() -> f64 { 1.0 }
fn default_liquidation_distance_warning() -> f64 { 20.0 }
fn default_liquidation_distance_critical() -> f64 { 10.0 }
fn default_max_drawdown_percent() -> f64 { 100.0 }

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            margin_utilization_warning: default_margin_utilization_warning(),
            margin_utilization_critical: default_margin_utilization_critical(),
            risk_reward_warning: default_risk_reward_warning(),
            risk_reward_critical: default_risk_reward_critical(),
            liquidation_distance_warning: default_liquidation_distance_warning(),
            liquidation_distance_critical: default_liquidation_distance_critical(),
            max_drawdown_percent: default_max_drawdown_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Trailing days averaged by the range statistics
    #[serde(default = "default_range_window_days")]
    pub range_window_days: usize,
}

fn default_range_window_days() -> usize { 5 }

impl Default for MarketConfig {
    fn default() -> Self {
        Self { range_window_days: default_range_window_days() }
    }
}

/// One `[[pairs]]` entry: market data plus per-pair parameter overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairConfig {
    pub symbol: String,
    pub last_price: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    /// Most recent first
    #[serde(default)]
    pub daily_candles: Vec<DailyCandle>,
    #[serde(default)]
    pub overrides: GridOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridDefaults,
    #[serde(default)]
    pub conventions: GridConventions,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub risk: RiskThresholds,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub fees: FeeSchedule,
    #[serde(default)]
    pub pairs: Vec<PairConfig>,
    /// What-if presets; the built-in ones apply when empty
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            println!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Default ladder parameters with the configured conventions
    pub fn grid_parameters(&self) -> GridParameters {
        let grid = &self.grid;
        GridParameters {
            entry_price: grid.entry_price,
            margin: grid.margin,
            trade_size_percent: grid.trade_size_percent,
            leverage: grid.leverage,
            grid_levels: grid.grid_levels,
            grid_size: grid.grid_size,
            grid_multiplier: grid.grid_multiplier,
            trade_size_multiplier: grid.trade_size_multiplier,
            tp_percent: grid.tp_percent,
            conventions: self.conventions,
        }
    }

    /// Parameters for a pair: defaults, entry at the pair's last price, then
    /// the pair's own overrides
    pub fn pair_parameters(&self, pair: &PairConfig) -> GridParameters {
        let mut params = self.grid_parameters();
        params.entry_price = pair.last_price;
        pair.overrides.apply(&mut params);
        params
    }

    /// Configured scenarios, or the built-in presets when none are configured
    pub fn scenarios(&self) -> Vec<Scenario> {
        if self.scenarios.is_empty() {
            preset_scenarios()
        } else {
            self.scenarios.clone()
        }
    }

    /// Market data of every configured pair
    pub fn market_data(&self) -> InMemoryMarketData {
        let mut source = InMemoryMarketData::new();
        for pair in &self.pairs {
            source.insert(
                MarketSnapshot {
                    symbol: pair.symbol.clone(),
                    last_price: pair.last_price,
                    high_24h: pair.high_24h,
                    low_24h: pair.low_24h,
                },
                pair.daily_candles.clone(),
            );
        }
        source
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        validate_parameters(&self.grid_parameters())
            .map_err(|e| ConfigError::Validation(format!("[grid] {}", e)))?;

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.logging.level
            )));
        }

        let risk = &self.risk;
        if risk.margin_utilization_critical < risk.margin_utilization_warning {
            return Err(ConfigError::Validation(
                "margin_utilization_critical must not be below margin_utilization_warning".to_string(),
            ));
        }
        if risk.risk_reward_critical > risk.risk_reward_warning {
            return Err(ConfigError::Validation(
                "risk_reward_critical must not exceed risk_reward_warning".to_string(),
            ));
        }
        if risk.liquidation_distance_critical > risk.liquidation_distance_warning {
            return Err(ConfigError::Validation(
                "liquidation_distance_critical must not exceed liquidation_distance_warning".to_string(),
            ));
        }

        if !(risk.max_drawdown_percent > 0.0 && risk.max_drawdown_percent <= 100.0) {
            return Err(ConfigError::Validation(format!(
                "max_drawdown_percent must be in (0, 100], got {}",
                risk.max_drawdown_percent
            )));
        }

        self.fees
            .validate()
            .map_err(|e| ConfigError::Validation(format!("[fees] {}", e)))?;

        if self.market.range_window_days == 0 {
            return Err(ConfigError::Validation("range_window_days must be greater than 0".to_string()));
        }

        let mut seen = HashSet::new();
        for pair in &self.pairs {
            if pair.symbol.trim().is_empty() {
                return Err(ConfigError::Validation("pair symbol must not be empty".to_string()));
            }
            if !seen.insert(pair.symbol.as_str()) {
                return Err(ConfigError::Validation(format!("duplicate pair '{}'", pair.symbol)));
            }
            if !(pair.low_24h > 0.0) || pair.high_24h < pair.low_24h {
                return Err(ConfigError::Validation(format!(
                    "{}: 24h range must satisfy 0 < low_24h <= high_24h",
                    pair.symbol
                )));
            }
            validate_parameters(&self.pair_parameters(pair))
                .map_err(|e| ConfigError::Validation(format!("[{}] {}", pair.symbol, e)))?;
        }

        let mut names = HashSet::new();
        for scenario in &self.scenarios {
            if !names.insert(scenario.name.as_str()) {
                return Err(ConfigError::Validation(format!("duplicate scenario '{}'", scenario.name)));
            }
            let mut params = self.grid_parameters();
            scenario.overrides.apply(&mut params);
            validate_parameters(&params)
                .map_err(|e| ConfigError::Validation(format!("[scenario {}] {}", scenario.name, e)))?;
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
