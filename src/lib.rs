// Grid Calculator Library
//
// Staged grid-ladder calculator: spacing and sizing progressions, level
// projection, weighted-average aggregation and take-profit targets, plus
// risk metrics, fees, market range statistics, batch computation and
// what-if scenarios.

pub mod core;
pub mod error;       // Core error types
pub mod risk;
pub mod fees;
pub mod market;
pub mod validation;  // Pre-flight validation
pub mod config;
pub mod batch;
pub mod scenario;
pub mod progress;

// Re-export core ladder types
pub use crate::core::{
    compute_grid, compute_target, compute_target_for_side, GridConventions, GridLadder, GridLevel,
    GridParameters, LadderSummary, LevelNumbering, Side, SpacingMode, SpacingStart, TargetMode,
    TargetResult,
};

// Re-export error types
pub use error::{GridError, GridResult};

// Re-export risk and market types
pub use risk::{
    assess, drawdown_liquidation_price, liquidation_price, liquidation_profile,
    maintenance_liquidation_price, suggested_grid_spacing, LevelLiquidation, LiquidationProfile,
    RiskMetrics,
};
pub use fees::{apply_fees, FeeBreakdown, FeeSchedule, LevelFees};
pub use market::{
    annualized_volatility, average_daily_range, daily_range_percent, pair_statistics, DailyCandle,
    InMemoryMarketData, MarketDataError, MarketDataSource, MarketSnapshot, PairStatistics,
};

// Re-export validation types
pub use validation::{PreFlightValidator, ValidationCheck, ValidationLevel, ValidationResult};

// Re-export configuration
pub use config::{
    Config, ConfigError, GridDefaults, GridOverrides, LoggingConfig, MarketConfig, PairConfig,
    RiskThresholds, TargetConfig,
};

// Re-export batch computation
pub use batch::{compute_batch, compute_pair, requests_from_config, BatchEntry, BatchReport, PairOutcome, PairRequest};
pub use scenario::{preset_scenarios, run_scenarios, scenario_requests, Scenario};
pub use progress::BatchProgress;
