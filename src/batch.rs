//! Parallel ladder computation for many pairs
//!
//! Each request is computed independently; a failing request is reported
//! next to the successful ones instead of aborting the batch.

use crate::config::{Config, RiskThresholds};
use crate::core::{compute_grid, GridLadder, GridParameters, TargetMode, TargetResult};
use crate::error::{GridError, GridResult};
use crate::fees::{apply_fees, FeeBreakdown, FeeSchedule};
use crate::progress::BatchProgress;
use crate::risk::{assess, liquidation_profile, suggested_grid_spacing, LiquidationProfile, RiskMetrics};
use crate::validation::{PreFlightValidator, ValidationResult};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct PairRequest {
    pub symbol: String,
    pub params: GridParameters,
}

/// Everything computed for one pair
#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    pub ladder: GridLadder,
    pub target: TargetResult,
    pub risk: RiskMetrics,
    pub liquidation: LiquidationProfile,
    pub fees: FeeBreakdown,
    /// Spacing that would spread target and drawdown evenly over this ladder
    pub suggested_grid_spacing: f64,
    pub validation: ValidationResult,
}

#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub symbol: String,
    pub result: Result<PairOutcome, GridError>,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub mode: TargetMode,
    /// In request order
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    pub fn get(&self, symbol: &str) -> Option<&BatchEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = self
            .entries
            .iter()
            .map(|entry| match &entry.result {
                Ok(outcome) => json!({ "symbol": entry.symbol, "outcome": outcome }),
                Err(e) => json!({
                    "symbol": entry.symbol,
                    "error": e.to_string(),
                    "category": e.category(),
                }),
            })
            .collect();

        json!({
            "generated_at": self.generated_at.to_rfc3339(),
            "mode": self.mode,
            "succeeded": self.succeeded(),
            "failed": self.failed(),
            "entries": entries,
        })
    }
}

/// One request per configured pair
pub fn requests_from_config(config: &Config) -> Vec<PairRequest> {
    config
        .pairs
        .iter()
        .map(|pair| PairRequest {
            symbol: pair.symbol.clone(),
            params: config.pair_parameters(pair),
        })
        .collect()
}

/// Ladder, target, risk, fees and validation for one parameter set
pub fn compute_pair(
    params: &GridParameters,
    mode: TargetMode,
    validator: &PreFlightValidator,
    fees: &FeeSchedule,
) -> GridResult<PairOutcome> {
    let max_drawdown = validator.thresholds().max_drawdown_percent;

    let ladder = compute_grid(params)?;
    let target = ladder.target(mode)?;
    let risk = assess(&ladder, &target)?;
    let liquidation = liquidation_profile(&ladder, max_drawdown)?;
    let fees = apply_fees(&ladder, fees)?;
    let suggested_grid_spacing =
        suggested_grid_spacing(params.tp_percent, max_drawdown, params.leverage, params.grid_levels)?;
    let validation = validator.validate_ladder(&ladder, &risk);

    Ok(PairOutcome {
        ladder,
        target,
        risk,
        liquidation,
        fees,
        suggested_grid_spacing,
        validation,
    })
}

/// Compute every request in parallel
pub fn compute_batch(
    requests: &[PairRequest],
    mode: TargetMode,
    thresholds: &RiskThresholds,
    fees: &FeeSchedule,
    progress: Option<&BatchProgress>,
) -> BatchReport {
    info!("🚀 Computing {} ladder(s)", requests.len());
    let validator = PreFlightValidator::new(thresholds.clone());

    let entries: Vec<BatchEntry> = requests
        .par_iter()
        .map(|request| {
            let result = compute_pair(&request.params, mode, &validator, fees);
            if let Err(e) = &result {
                debug!(symbol = %request.symbol, error = %e, "ladder computation failed");
            }
            if let Some(progress) = progress {
                progress.pair_done(&request.symbol, result.is_ok());
            }
            BatchEntry {
                symbol: request.symbol.clone(),
                result,
            }
        })
        .collect();

    let report = BatchReport {
        generated_at: Utc::now(),
        mode,
        entries,
    };

    if let Some(progress) = progress {
        progress.finish(report.succeeded(), report.failed());
    }
    info!(
        "✅ Batch finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );

    report
}
