// Whole-ladder reduction: cost basis and committed capital

use crate::core::types::{GridLevel, LadderSummary};
use crate::error::{ensure_finite, GridError, GridResult};

/// Reduce a ladder to its volume-weighted average entry and totals.
///
/// Weights are each level's trade size, level 0 included. A ladder with no
/// committed capital has no average and is reported as `DivisionByZero`.
pub fn aggregate(levels: &[GridLevel]) -> GridResult<LadderSummary> {
    let mut total_trade_size = 0.0;
    let mut total_position_size = 0.0;
    let mut weighted_price = 0.0;
    let mut lowest = f64::INFINITY;
    let mut highest = f64::NEG_INFINITY;

    for level in levels {
        lowest = lowest.min(level.price);
        highest = highest.max(level.price);
        total_trade_size += level.trade_size;
        total_position_size += level.position_size;
        weighted_price += level.price * level.trade_size;
    }

    let total_trade_size = ensure_finite("total_trade_size", total_trade_size)?;
    let total_position_size = ensure_finite("total_position_size", total_position_size)?;
    let weighted_price = ensure_finite("average_entry_price", weighted_price)?;

    if total_trade_size == 0.0 {
        return Err(GridError::DivisionByZero {
            context: "average_entry_price",
        });
    }

    // rounding must not push the mean outside the ladder; this also keeps a
    // single-level ladder's average bit-identical to its price
    let average_entry_price = (weighted_price / total_trade_size).clamp(lowest, highest);

    Ok(LadderSummary {
        average_entry_price,
        total_trade_size,
        total_required_margin: levels.iter().map(|l| l.required_margin).sum(),
        total_position_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn level(index: usize, price: f64, trade_size: f64) -> GridLevel {
        GridLevel {
            index,
            label: -(index as i64),
            price,
            spacing_percent: 0.0,
            trade_size,
            position_size: trade_size * 2.0,
            required_margin: trade_size,
            percent_from_entry: 0.0,
            pnl_at_target: 0.0,
        }
    }

    #[test]
    fn test_weighted_not_arithmetic_mean() {
        let levels = vec![level(0, 100.0, 100.0), level(1, 90.0, 300.0)];
        let summary = aggregate(&levels).unwrap();

        // arithmetic mean would be 95
        assert_relative_eq!(summary.average_entry_price, 92.5, epsilon = 1e-12);
        assert_eq!(summary.total_trade_size, 400.0);
        assert_eq!(summary.total_required_margin, 400.0);
        assert_eq!(summary.total_position_size, 800.0);
    }

    #[test]
    fn test_single_level() {
        let summary = aggregate(&[level(0, 42.5, 10.0)]).unwrap();
        assert_eq!(summary.average_entry_price, 42.5);
    }

    #[test]
    fn test_average_stays_within_ladder() {
        let price = 0.1 + 0.2;
        let levels: Vec<GridLevel> = (0..7).map(|i| level(i, price, 3.7 * (i + 1) as f64)).collect();
        let summary = aggregate(&levels).unwrap();
        assert_eq!(summary.average_entry_price, price);
    }

    #[test]
    fn test_zero_total_is_division_by_zero() {
        let levels = vec![level(0, 100.0, 0.0), level(1, 90.0, 0.0)];
        assert_eq!(
            aggregate(&levels).unwrap_err(),
            GridError::DivisionByZero {
                context: "average_entry_price"
            }
        );
        assert!(aggregate(&[]).is_err());
    }

    #[test]
    fn test_non_finite_total_is_overflow() {
        let levels = vec![level(0, 100.0, f64::MAX), level(1, 90.0, f64::MAX)];
        let err = aggregate(&levels).unwrap_err();
        assert!(matches!(err, GridError::NumericOverflow { .. }));
    }
}
