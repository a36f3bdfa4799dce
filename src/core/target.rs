// Take-profit projection

use crate::core::types::{Side, TargetMode, TargetResult};
use crate::error::{ensure_finite, GridError, GridResult};

/// Project the take-profit price and value of an entry.
///
/// `TargetMode::Unleveraged` reads `tp_percent` as a price move;
/// `TargetMode::LeverageAdjusted` reads it as a return on margin, so the
/// price only has to move `tp_percent / leverage`. `tp_value` is
/// `initial_trade_value * leverage * tp_percent / 100` in both modes.
pub fn target(
    entry_price: f64,
    tp_percent: f64,
    leverage: f64,
    initial_trade_value: f64,
    mode: TargetMode,
    side: Side,
) -> GridResult<TargetResult> {
    if !(entry_price > 0.0) || !entry_price.is_finite() {
        return Err(GridError::invalid(
            "entry_price",
            format!("must be positive, got {}", entry_price),
        ));
    }
    if !(leverage >= 1.0) || !leverage.is_finite() {
        return Err(GridError::invalid(
            "leverage",
            format!("must be at least 1, got {}", leverage),
        ));
    }
    if !tp_percent.is_finite() {
        return Err(GridError::invalid("tp_percent", "must be a finite percent"));
    }
    if !initial_trade_value.is_finite() || initial_trade_value < 0.0 {
        return Err(GridError::invalid(
            "initial_trade_value",
            format!("must be a non-negative amount, got {}", initial_trade_value),
        ));
    }

    let price_fraction = match mode {
        TargetMode::Unleveraged => tp_percent / 100.0,
        TargetMode::LeverageAdjusted => (tp_percent / 100.0) / leverage,
    };
    let tp_price = ensure_finite(
        "tp_price",
        entry_price * (1.0 + side.target_sign() * price_fraction),
    )?;
    let price_move_to_tp = tp_price - entry_price;
    let tp_value = ensure_finite("tp_value", initial_trade_value * leverage * tp_percent / 100.0)?;

    Ok(TargetResult {
        mode,
        tp_price,
        price_move_to_tp,
        price_move_to_tp_percent: price_move_to_tp / entry_price * 100.0,
        tp_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unleveraged_target() {
        let result = target(100.0, 10.0, 3.0, 100.0, TargetMode::Unleveraged, Side::Long).unwrap();

        assert_relative_eq!(result.tp_price, 110.0, epsilon = 1e-9);
        assert_relative_eq!(result.price_move_to_tp, 10.0, epsilon = 1e-9);
        assert_relative_eq!(result.price_move_to_tp_percent, 10.0, epsilon = 1e-9);
        assert_relative_eq!(result.tp_value, 30.0, epsilon = 1e-9);
        assert_eq!(result.mode, TargetMode::Unleveraged);
    }

    #[test]
    fn test_leverage_adjusted_target() {
        let result =
            target(50.0, 10.0, 3.0, 100.0, TargetMode::LeverageAdjusted, Side::Long).unwrap();

        assert_relative_eq!(result.tp_price, 50.0 * (1.0 + 0.1 / 3.0), epsilon = 1e-9);
        assert_relative_eq!(result.price_move_to_tp, 5.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(result.price_move_to_tp_percent, 10.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(result.tp_value, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_modes_agree_without_leverage() {
        let plain = target(24.56, 5.0, 1.0, 25.0, TargetMode::Unleveraged, Side::Long).unwrap();
        let adjusted =
            target(24.56, 5.0, 1.0, 25.0, TargetMode::LeverageAdjusted, Side::Long).unwrap();
        assert_eq!(plain.tp_price, adjusted.tp_price);
        assert_eq!(plain.tp_value, adjusted.tp_value);
    }

    #[test]
    fn test_short_target_moves_down() {
        let result = target(100.0, 10.0, 2.0, 50.0, TargetMode::Unleveraged, Side::Short).unwrap();
        assert_relative_eq!(result.tp_price, 90.0, epsilon = 1e-9);
        assert_relative_eq!(result.price_move_to_tp, -10.0, epsilon = 1e-9);
        assert_relative_eq!(result.tp_value, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejections() {
        let err = target(100.0, 10.0, 0.0, 100.0, TargetMode::Unleveraged, Side::Long).unwrap_err();
        assert_eq!(err.field(), "leverage");

        let err = target(0.0, 10.0, 3.0, 100.0, TargetMode::Unleveraged, Side::Long).unwrap_err();
        assert_eq!(err.field(), "entry_price");

        let err = target(-1.0, 10.0, 3.0, 100.0, TargetMode::Unleveraged, Side::Long).unwrap_err();
        assert_eq!(err.field(), "entry_price");
    }
}
