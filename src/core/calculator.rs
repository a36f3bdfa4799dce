// Public entry points of the ladder pipeline

use crate::core::aggregator::aggregate;
use crate::core::projector::project;
use crate::core::target::target;
use crate::core::types::{GridLadder, GridParameters, Side, TargetMode, TargetResult};
use crate::error::GridResult;
use tracing::debug;

/// Compute the full ladder for `params`.
///
/// Fails with the first violated constraint; never returns a partial ladder.
pub fn compute_grid(params: &GridParameters) -> GridResult<GridLadder> {
    let levels = project(params)?;
    let summary = aggregate(&levels)?;

    debug!(
        levels = levels.len(),
        average_entry_price = summary.average_entry_price,
        total_trade_size = summary.total_trade_size,
        "computed grid ladder"
    );

    Ok(GridLadder {
        params: params.clone(),
        levels,
        average_entry_price: summary.average_entry_price,
        total_trade_size: summary.total_trade_size,
        total_required_margin: summary.total_required_margin,
        total_position_size: summary.total_position_size,
    })
}

/// Take-profit projection for a long entry
pub fn compute_target(
    entry_price: f64,
    tp_percent: f64,
    leverage: f64,
    initial_trade_value: f64,
    mode: TargetMode,
) -> GridResult<TargetResult> {
    compute_target_for_side(
        entry_price,
        tp_percent,
        leverage,
        initial_trade_value,
        mode,
        Side::Long,
    )
}

pub fn compute_target_for_side(
    entry_price: f64,
    tp_percent: f64,
    leverage: f64,
    initial_trade_value: f64,
    mode: TargetMode,
    side: Side,
) -> GridResult<TargetResult> {
    target(entry_price, tp_percent, leverage, initial_trade_value, mode, side)
}

impl GridLadder {
    /// Target of the initial entry, using the ladder's own parameters
    pub fn target(&self, mode: TargetMode) -> GridResult<TargetResult> {
        let params = &self.params;
        compute_target_for_side(
            params.entry_price,
            params.tp_percent,
            params.leverage,
            params.base_trade_size(),
            mode,
            params.conventions.side,
        )
    }
}
