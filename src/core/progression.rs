// Spacing and sizing progressions of a ladder

use crate::core::types::SpacingStart;
use crate::error::{ensure_finite, GridError, GridResult};

fn exponent(field: &'static str, power: usize) -> GridResult<i32> {
    i32::try_from(power).map_err(|_| GridError::NumericOverflow { field })
}

pub(crate) fn check_grid_multiplier(grid_multiplier: f64) -> GridResult<()> {
    if !(grid_multiplier >= 0.0) || !grid_multiplier.is_finite() {
        return Err(GridError::invalid(
            "grid_multiplier",
            format!("must be a non-negative number, got {}", grid_multiplier),
        ));
    }
    Ok(())
}

pub(crate) fn check_trade_size_multiplier(trade_size_multiplier: f64) -> GridResult<()> {
    if !(trade_size_multiplier > 0.0) || !trade_size_multiplier.is_finite() {
        return Err(GridError::invalid(
            "trade_size_multiplier",
            format!("must be positive, got {}", trade_size_multiplier),
        ));
    }
    Ok(())
}

/// Spacing percent of level `i` from its predecessor, closed form.
///
/// Level 0 is the entry itself and has no spacing.
pub fn spacing(
    i: usize,
    grid_size: f64,
    grid_multiplier: f64,
    start: SpacingStart,
) -> GridResult<f64> {
    check_grid_multiplier(grid_multiplier)?;
    if i == 0 {
        return Ok(0.0);
    }
    let power = match start {
        SpacingStart::Base => i - 1,
        SpacingStart::Multiplied => i,
    };
    let value = grid_size * grid_multiplier.powi(exponent("spacing_percent", power)?);
    ensure_finite("spacing_percent", value)
}

/// Trade size of level `i`: `base_size * trade_size_multiplier^i`
pub fn size(i: usize, base_size: f64, trade_size_multiplier: f64) -> GridResult<f64> {
    check_trade_size_multiplier(trade_size_multiplier)?;
    let value = base_size * trade_size_multiplier.powi(exponent("trade_size", i)?);
    ensure_finite("trade_size", value)
}

/// Running spacing of generated levels 1, 2, 3, ...
///
/// Each value is the previous one times `grid_multiplier`; the closed form
/// is never recomputed so chained prices see exactly the spacing carried
/// forward from the level before.
#[derive(Debug, Clone)]
pub struct SpacingProgression {
    current: f64,
    grid_multiplier: f64,
}

impl SpacingProgression {
    pub fn new(grid_size: f64, grid_multiplier: f64, start: SpacingStart) -> GridResult<Self> {
        check_grid_multiplier(grid_multiplier)?;
        let first = match start {
            SpacingStart::Base => grid_size,
            SpacingStart::Multiplied => grid_size * grid_multiplier,
        };
        Ok(Self {
            current: first,
            grid_multiplier,
        })
    }
}

impl Iterator for SpacingProgression {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let value = self.current;
        self.current *= self.grid_multiplier;
        Some(value)
    }
}
