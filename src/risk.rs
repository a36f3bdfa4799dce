//! Risk metrics derived from a computed ladder and its take-profit target
//!
//! Liquidation is approximated as the price at which a move of
//! `1 / leverage` wipes out the committed margin. The per-level profile
//! also accounts for a flat maintenance margin, and a drawdown-scaled
//! variant caps the tolerated move at a share of the margin.

use crate::core::{GridLadder, Side, TargetResult};
use crate::error::{ensure_finite, GridError, GridResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub liquidation_price: f64,
    /// Distance from entry to liquidation, percent of entry
    pub liquidation_distance_percent: f64,
    /// Leveraged return from the average entry to the target price
    pub max_profit_percent: f64,
    pub risk_reward_ratio: f64,
    /// Committed capital as a percent of total margin
    pub margin_utilization_percent: f64,
    pub effective_leverage: f64,
    /// Units bought by the initial trade, before leverage
    pub token_amount: f64,
    /// True when the deepest level sits at or beyond liquidation
    pub ladder_crosses_liquidation: bool,
}

/// Maintenance margin rate used by per-level liquidation prices
pub const MAINTENANCE_MARGIN_RATE: f64 = 0.005;

/// Smallest spacing ever suggested, percent
pub const MIN_SUGGESTED_SPACING: f64 = 0.1;

pub fn liquidation_price(entry_price: f64, leverage: f64, side: Side) -> f64 {
    entry_price * (1.0 + side.ladder_sign() / leverage)
}

/// Liquidation of a position opened at `price` once maintenance margin is held back
pub fn maintenance_liquidation_price(price: f64, leverage: f64, side: Side) -> f64 {
    price * (1.0 + side.ladder_sign() * (1.0 / leverage - MAINTENANCE_MARGIN_RATE))
}

/// Price at which `max_drawdown_percent` of the margin is lost.
///
/// A drawdown of 100 gives the plain `liquidation_price`.
pub fn drawdown_liquidation_price(
    entry_price: f64,
    leverage: f64,
    side: Side,
    max_drawdown_percent: f64,
) -> f64 {
    entry_price * (1.0 + side.ladder_sign() * max_drawdown_percent / leverage / 100.0)
}

/// Liquidation of one ladder level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelLiquidation {
    pub index: usize,
    pub price: f64,
    pub liquidation_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationProfile {
    pub max_drawdown_percent: f64,
    /// Entry price moved by the leverage-scaled drawdown
    pub drawdown_liquidation_price: f64,
    pub levels: Vec<LevelLiquidation>,
}

fn check_drawdown(max_drawdown_percent: f64) -> GridResult<()> {
    if !(max_drawdown_percent > 0.0 && max_drawdown_percent <= 100.0) {
        return Err(GridError::invalid(
            "max_drawdown_percent",
            format!("must be in (0, 100], got {}", max_drawdown_percent),
        ));
    }
    Ok(())
}

/// Drawdown-scaled liquidation of the ladder and maintenance liquidation of each level
pub fn liquidation_profile(
    ladder: &GridLadder,
    max_drawdown_percent: f64,
) -> GridResult<LiquidationProfile> {
    check_drawdown(max_drawdown_percent)?;
    let params = &ladder.params;
    let side = params.conventions.side;

    let levels = ladder
        .levels
        .iter()
        .map(|level| LevelLiquidation {
            index: level.index,
            price: level.price,
            liquidation_price: maintenance_liquidation_price(level.price, params.leverage, side),
        })
        .collect();

    Ok(LiquidationProfile {
        max_drawdown_percent,
        drawdown_liquidation_price: drawdown_liquidation_price(
            params.entry_price,
            params.leverage,
            side,
            max_drawdown_percent,
        ),
        levels,
    })
}

/// Spacing that spreads the target plus the leverage-scaled drawdown evenly
/// over the ladder, rounded to one decimal and never below
/// `MIN_SUGGESTED_SPACING`.
pub fn suggested_grid_spacing(
    tp_percent: f64,
    max_drawdown_percent: f64,
    leverage: f64,
    grid_levels: u32,
) -> GridResult<f64> {
    check_drawdown(max_drawdown_percent)?;
    if !(leverage >= 1.0) || !leverage.is_finite() {
        return Err(GridError::invalid(
            "leverage",
            format!("must be at least 1, got {}", leverage),
        ));
    }
    if !tp_percent.is_finite() {
        return Err(GridError::invalid("tp_percent", "must be a finite percent"));
    }

    let total_range = tp_percent + max_drawdown_percent / leverage;
    let spacing = (total_range / (f64::from(grid_levels) + 1.0)).max(MIN_SUGGESTED_SPACING);
    Ok((spacing * 10.0).round() / 10.0)
}

/// Compute risk metrics for `ladder` against `target`
pub fn assess(ladder: &GridLadder, target: &TargetResult) -> GridResult<RiskMetrics> {
    let params = &ladder.params;
    let side = params.conventions.side;

    let liquidation_price = liquidation_price(params.entry_price, params.leverage, side);
    let liquidation_distance_percent =
        (params.entry_price - liquidation_price).abs() / params.entry_price * 100.0;

    let average = ladder.average_entry_price;
    let max_profit_percent = ensure_finite(
        "max_profit_percent",
        side.target_sign() * (target.tp_price - average) / average * 100.0 * params.leverage,
    )?;

    let deepest = ladder.deepest_level().price;
    let ladder_crosses_liquidation = match side {
        Side::Long => deepest <= liquidation_price,
        Side::Short => deepest >= liquidation_price,
    };

    Ok(RiskMetrics {
        liquidation_price,
        liquidation_distance_percent,
        max_profit_percent,
        risk_reward_ratio: (max_profit_percent / liquidation_distance_percent).abs(),
        margin_utilization_percent: ladder.total_required_margin / params.margin * 100.0,
        effective_leverage: ladder.total_position_size / ladder.total_trade_size,
        token_amount: params.base_trade_size() / params.entry_price,
        ladder_crosses_liquidation,
    })
}
