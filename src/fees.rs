//! Entry and exit fees charged on each level's position
//!
//! Fees are a percent of the leveraged position opened at a level, paid
//! once on entry and once on exit at the target.

use crate::core::GridLadder;
use crate::error::{ensure_finite, GridError, GridResult};
use serde::{Deserialize, Serialize};

/// The `[fees]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    #[serde(default = "default_entry_fee_percent")]
    pub entry_fee_percent: f64,
    #[serde(default = "default_exit_fee_percent")]
    pub exit_fee_percent: f64,
}

fn default_entry_fee_percent() -> f64 { 0.0 }
fn default_exit_fee_percent() -> f64 { 0.0 }

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            entry_fee_percent: default_entry_fee_percent(),
            exit_fee_percent: default_exit_fee_percent(),
        }
    }
}

impl FeeSchedule {
    pub fn new(entry_fee_percent: f64, exit_fee_percent: f64) -> Self {
        Self {
            entry_fee_percent,
            exit_fee_percent,
        }
    }

    pub fn validate(&self) -> GridResult<()> {
        for (field, value) in [
            ("entry_fee_percent", self.entry_fee_percent),
            ("exit_fee_percent", self.exit_fee_percent),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(GridError::invalid(
                    field,
                    format!("must be a non-negative percent, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFees {
    pub index: usize,
    pub entry_fee: f64,
    pub exit_fee: f64,
    pub total_fees: f64,
    /// Fees of this level and every level before it
    pub accumulated_fees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub levels: Vec<LevelFees>,
    pub total_fees: f64,
    /// Sum of every level's PnL at target
    pub gross_profit: f64,
    pub net_profit: f64,
}

/// Fees of every level of `ladder` and the target profit left after them
pub fn apply_fees(ladder: &GridLadder, schedule: &FeeSchedule) -> GridResult<FeeBreakdown> {
    schedule.validate()?;

    let mut accumulated = 0.0;
    let mut gross_profit = 0.0;
    let mut levels = Vec::with_capacity(ladder.levels.len());

    for level in &ladder.levels {
        let entry_fee = level.position_size * schedule.entry_fee_percent / 100.0;
        let exit_fee = level.position_size * schedule.exit_fee_percent / 100.0;
        let total_fees = ensure_finite("fees", entry_fee + exit_fee)?;
        accumulated += total_fees;
        gross_profit += level.pnl_at_target;

        levels.push(LevelFees {
            index: level.index,
            entry_fee,
            exit_fee,
            total_fees,
            accumulated_fees: accumulated,
        });
    }

    let total_fees = ensure_finite("fees", accumulated)?;
    let gross_profit = ensure_finite("pnl_at_target", gross_profit)?;

    Ok(FeeBreakdown {
        levels,
        total_fees,
        gross_profit,
        net_profit: gross_profit - total_fees,
    })
}
