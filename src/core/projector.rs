// Level projection: spacing and sizing combined into a priced ladder

use crate::core::progression::{
    check_grid_multiplier, check_trade_size_multiplier, size, SpacingProgression,
};
use crate::core::types::{GridLevel, GridParameters, SpacingMode};
use crate::error::{ensure_finite, GridError, GridResult};

/// Deepest ladder accepted; levels beyond the initial one
pub const MAX_GRID_LEVELS: u32 = 10_000;

fn require_positive(field: &'static str, value: f64) -> GridResult<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(GridError::invalid(
            field,
            format!("must be positive, got {}", value),
        ));
    }
    Ok(())
}

/// Check every documented input constraint, naming the first offending field
pub fn validate_parameters(params: &GridParameters) -> GridResult<()> {
    require_positive("entry_price", params.entry_price)?;
    require_positive("margin", params.margin)?;

    if !(params.trade_size_percent > 0.0 && params.trade_size_percent <= 100.0) {
        return Err(GridError::invalid(
            "trade_size_percent",
            format!("must be in (0, 100], got {}", params.trade_size_percent),
        ));
    }

    if !(params.leverage >= 1.0) || !params.leverage.is_finite() {
        return Err(GridError::invalid(
            "leverage",
            format!("must be at least 1, got {}", params.leverage),
        ));
    }

    if !(params.grid_size >= 0.0) || !params.grid_size.is_finite() {
        return Err(GridError::invalid(
            "grid_size",
            format!("must be a non-negative percent, got {}", params.grid_size),
        ));
    }

    check_grid_multiplier(params.grid_multiplier)?;
    check_trade_size_multiplier(params.trade_size_multiplier)?;

    // Growth past f64 is an overflow whatever the depth; checked before the level bound
    let deepest_size = params.base_trade_size()
        * params.trade_size_multiplier.powf(f64::from(params.grid_levels));
    ensure_finite("trade_size", deepest_size)?;
    if params.grid_levels > MAX_GRID_LEVELS {
        return Err(GridError::invalid(
            "grid_levels",
            format!("must be at most {}, got {}", MAX_GRID_LEVELS, params.grid_levels),
        ));
    }

    if !params.tp_percent.is_finite() {
        return Err(GridError::invalid("tp_percent", "must be a finite percent"));
    }

    Ok(())
}

fn build_level(
    params: &GridParameters,
    index: usize,
    price: f64,
    spacing_percent: f64,
    trade_size: f64,
) -> GridResult<GridLevel> {
    let position_size = ensure_finite("position_size", trade_size * params.leverage)?;
    let pnl_at_target = ensure_finite(
        "pnl_at_target",
        trade_size * params.leverage * params.tp_percent / 100.0,
    )?;
    let percent_from_entry = if index == 0 {
        0.0
    } else {
        (price - params.entry_price) / params.entry_price * 100.0
    };

    Ok(GridLevel {
        index,
        label: params.conventions.numbering.label(index),
        price,
        spacing_percent,
        trade_size,
        position_size,
        required_margin: trade_size,
        percent_from_entry,
        pnl_at_target,
    })
}

/// Project the full ladder, level 0 first, `grid_levels + 1` entries.
///
/// Each level's `pnl_at_target` uses its own trade size: every level is
/// assumed able to reach the target independently.
pub fn project(params: &GridParameters) -> GridResult<Vec<GridLevel>> {
    validate_parameters(params)?;

    let conventions = params.conventions;
    let count = params.grid_levels as usize;
    let base_size = ensure_finite("trade_size", params.base_trade_size())?;
    let sign = conventions.side.ladder_sign();

    let mut levels = Vec::with_capacity(count + 1);
    levels.push(build_level(params, 0, params.entry_price, 0.0, base_size)?);

    let spacings = SpacingProgression::new(
        params.grid_size,
        params.grid_multiplier,
        conventions.spacing_start,
    )?;

    let mut previous_price = params.entry_price;
    let mut cumulative_spacing = 0.0;

    for (index, spacing_percent) in (1..=count).zip(spacings) {
        let spacing_percent = ensure_finite("spacing_percent", spacing_percent)?;

        let price = match conventions.spacing_mode {
            SpacingMode::Chained => previous_price * (1.0 + sign * spacing_percent / 100.0),
            SpacingMode::EntryCumulative => {
                cumulative_spacing += spacing_percent;
                params.entry_price * (1.0 + sign * cumulative_spacing / 100.0)
            }
        };
        let price = ensure_finite("price", price)?;
        if price <= 0.0 {
            return Err(GridError::invalid(
                "grid_size",
                format!("level {} would be priced at {}, prices must stay positive", index, price),
            ));
        }

        let trade_size = size(index, base_size, params.trade_size_multiplier)?;
        levels.push(build_level(params, index, price, spacing_percent, trade_size)?);
        previous_price = price;
    }

    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GridConventions, LevelNumbering, Side, SpacingStart};
    use approx::assert_relative_eq;

    fn create_test_params() -> GridParameters {
        GridParameters {
            entry_price: 100.0,
            margin: 1000.0,
            trade_size_percent: 10.0,
            leverage: 3.0,
            grid_levels: 3,
            grid_size: 2.0,
            grid_multiplier: 0.9,
            trade_size_multiplier: 1.15,
            tp_percent: 10.0,
            conventions: GridConventions::default(),
        }
    }

    #[test]
    fn test_initial_level() {
        let levels = project(&create_test_params()).unwrap();
        let first = &levels[0];

        assert_eq!(first.index, 0);
        assert_eq!(first.label, 0);
        assert_eq!(first.price, 100.0);
        assert_eq!(first.spacing_percent, 0.0);
        assert_eq!(first.percent_from_entry, 0.0);
        assert_eq!(first.trade_size, 100.0);
        assert_eq!(first.position_size, 300.0);
        assert_eq!(first.required_margin, 100.0);
        assert_relative_eq!(first.pnl_at_target, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_chained_ladder() {
        let levels = project(&create_test_params()).unwrap();
        assert_eq!(levels.len(), 4);

        assert_relative_eq!(levels[1].price, 98.0, epsilon = 1e-9);
        assert_relative_eq!(levels[2].price, 96.236, epsilon = 1e-9);
        assert_relative_eq!(levels[3].price, 94.6769768, epsilon = 1e-9);

        assert_relative_eq!(levels[2].spacing_percent, 1.8, epsilon = 1e-12);
        assert_relative_eq!(levels[3].spacing_percent, 1.62, epsilon = 1e-12);
        assert_relative_eq!(levels[3].percent_from_entry, -5.3230232, epsilon = 1e-9);

        assert_relative_eq!(levels[1].trade_size, 115.0, epsilon = 1e-9);
        assert_relative_eq!(levels[3].position_size, 456.2625, epsilon = 1e-9);
        assert_relative_eq!(levels[3].pnl_at_target, 45.62625, epsilon = 1e-9);
    }

    #[test]
    fn test_entry_cumulative_ladder() {
        let mut params = create_test_params();
        params.conventions.spacing_mode = SpacingMode::EntryCumulative;
        let levels = project(&params).unwrap();

        assert_relative_eq!(levels[1].price, 98.0, epsilon = 1e-9);
        assert_relative_eq!(levels[2].price, 96.2, epsilon = 1e-9);
        assert_relative_eq!(levels[3].price, 94.58, epsilon = 1e-9);
    }

    #[test]
    fn test_multiplied_start() {
        let mut params = create_test_params();
        params.conventions.spacing_start = SpacingStart::Multiplied;
        let levels = project(&params).unwrap();

        assert_relative_eq!(levels[1].spacing_percent, 1.8, epsilon = 1e-12);
        assert_relative_eq!(levels[1].price, 98.2, epsilon = 1e-9);
    }

    #[test]
    fn test_labels_follow_numbering() {
        let descending = project(&create_test_params()).unwrap();
        let labels: Vec<i64> = descending.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec![0, -1, -2, -3]);

        let mut params = create_test_params();
        params.conventions.numbering = LevelNumbering::Ascending;
        let ascending = project(&params).unwrap();
        let labels: Vec<i64> = ascending.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec![0, 1, 2, 3]);

        // labels never change prices
        assert_eq!(descending[3].price, ascending[3].price);
    }

    #[test]
    fn test_short_ladder_moves_up() {
        let params = create_test_params().with_side(Side::Short);
        let levels = project(&params).unwrap();

        assert_relative_eq!(levels[1].price, 102.0, epsilon = 1e-9);
        assert_relative_eq!(levels[2].price, 102.0 * 1.018, epsilon = 1e-9);
        assert!(levels[3].percent_from_entry > 0.0);
    }

    #[test]
    fn test_zero_grid_size_is_degenerate() {
        let mut params = create_test_params();
        params.grid_size = 0.0;
        let levels = project(&params).unwrap();
        assert!(levels.iter().all(|l| l.price == 100.0));
    }

    fn mutated(change: impl FnOnce(&mut GridParameters)) -> GridParameters {
        let mut params = create_test_params();
        change(&mut params);
        params
    }

    #[test]
    fn test_rejections_name_the_field() {
        let cases = vec![
            ("entry_price", mutated(|p| p.entry_price = 0.0)),
            ("margin", mutated(|p| p.margin = -5.0)),
            ("trade_size_percent", mutated(|p| p.trade_size_percent = 0.0)),
            ("trade_size_percent", mutated(|p| p.trade_size_percent = 100.5)),
            ("leverage", mutated(|p| p.leverage = 0.0)),
            ("leverage", mutated(|p| p.leverage = 0.5)),
            ("grid_size", mutated(|p| p.grid_size = -1.0)),
            ("grid_multiplier", mutated(|p| p.grid_multiplier = -1.0)),
            ("trade_size_multiplier", mutated(|p| p.trade_size_multiplier = 0.0)),
            ("tp_percent", mutated(|p| p.tp_percent = f64::NAN)),
        ];

        for (field, params) in cases {
            let err = project(&params).unwrap_err();
            assert!(
                matches!(err, GridError::InvalidParameter { .. }),
                "expected InvalidParameter for {}",
                field
            );
            assert_eq!(err.field(), field);
        }
    }

    #[test]
    fn test_oversized_ladders_fail_before_allocating() {
        let exploding = mutated(|p| {
            p.grid_levels = u32::MAX;
            p.trade_size_multiplier = 10.0;
        });
        assert!(matches!(
            project(&exploding),
            Err(GridError::NumericOverflow { .. })
        ));

        // flat sizes never overflow, only the level bound stops them
        let flat = mutated(|p| {
            p.grid_levels = u32::MAX;
            p.trade_size_multiplier = 1.0;
            p.grid_size = 0.0;
        });
        let err = project(&flat).unwrap_err();
        assert!(matches!(err, GridError::InvalidParameter { .. }));
        assert_eq!(err.field(), "grid_levels");

        let deepest = mutated(|p| {
            p.grid_levels = MAX_GRID_LEVELS;
            p.trade_size_multiplier = 1.0;
            p.grid_size = 0.0;
        });
        assert_eq!(project(&deepest).unwrap().len(), MAX_GRID_LEVELS as usize + 1);
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut params = create_test_params();
        params.conventions.spacing_mode = SpacingMode::EntryCumulative;
        params.grid_size = 40.0;
        params.grid_multiplier = 1.0;

        let err = project(&params).unwrap_err();
        assert_eq!(err.field(), "grid_size");
    }
}
