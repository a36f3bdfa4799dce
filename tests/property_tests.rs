//! Property tests for ladder invariants.
//!
//! Uses proptest to verify:
//! 1. Shape: one level per step plus the entry, indices increasing
//! 2. Weighted average stays inside the ladder's price range
//! 3. Prices move monotonically away from entry in the ladder direction
//! 4. Sizing and spacing match their closed forms
//! 5. Spacing shrinks or widens monotonically with the multiplier
//! 6. Targets scale consistently between modes

use proptest::prelude::*;
use grid_calculator::core::progression::{size, spacing};
use grid_calculator::{
    compute_grid, compute_target, GridConventions, GridParameters, LevelNumbering, Side,
    SpacingMode, SpacingStart, TargetMode,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_conventions() -> impl Strategy<Value = GridConventions> {
    (
        prop_oneof![Just(SpacingMode::Chained), Just(SpacingMode::EntryCumulative)],
        prop_oneof![Just(SpacingStart::Base), Just(SpacingStart::Multiplied)],
        prop_oneof![Just(LevelNumbering::Descending), Just(LevelNumbering::Ascending)],
        prop_oneof![Just(Side::Long), Just(Side::Short)],
    )
        .prop_map(|(spacing_mode, spacing_start, numbering, side)| GridConventions {
            spacing_mode,
            spacing_start,
            numbering,
            side,
        })
}

fn arb_params() -> impl Strategy<Value = GridParameters> {
    (
        (0.01..100_000.0_f64, 10.0..1_000_000.0_f64, 0.5..50.0_f64, 1.0..25.0_f64),
        (0u32..=12, 0.0..2.0_f64, 0.0..1.15_f64, 0.5..1.5_f64, -20.0..50.0_f64),
        arb_conventions(),
    )
        .prop_map(
            |(
                (entry_price, margin, trade_size_percent, leverage),
                (grid_levels, grid_size, grid_multiplier, trade_size_multiplier, tp_percent),
                conventions,
            )| GridParameters {
                entry_price,
                margin,
                trade_size_percent,
                leverage,
                grid_levels,
                grid_size,
                grid_multiplier,
                trade_size_multiplier,
                tp_percent,
                conventions,
            },
        )
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ── 1-3. Ladder shape ────────────────────────────────────────────────

proptest! {
    #[test]
    fn ladder_shape(params in arb_params()) {
        let ladder = compute_grid(&params).unwrap();

        prop_assert_eq!(ladder.levels.len(), params.grid_levels as usize + 1);
        prop_assert_eq!(ladder.initial_level().price, params.entry_price);
        for (i, level) in ladder.levels.iter().enumerate() {
            prop_assert_eq!(level.index, i);
            prop_assert_eq!(level.label, params.conventions.numbering.label(i));
            prop_assert_eq!(level.required_margin, level.trade_size);
        }
    }

    #[test]
    fn average_within_price_range(params in arb_params()) {
        let ladder = compute_grid(&params).unwrap();

        prop_assert!(ladder.average_entry_price >= ladder.lowest_price());
        prop_assert!(ladder.average_entry_price <= ladder.highest_price());
    }

    #[test]
    fn prices_move_away_from_entry(params in arb_params()) {
        let ladder = compute_grid(&params).unwrap();

        for pair in ladder.levels.windows(2) {
            match params.conventions.side {
                Side::Long => {
                    prop_assert!(pair[1].price <= pair[0].price);
                }
                Side::Short => {
                    prop_assert!(pair[1].price >= pair[0].price);
                }
            }
        }
    }

    #[test]
    fn computation_is_idempotent(params in arb_params()) {
        prop_assert_eq!(compute_grid(&params).unwrap(), compute_grid(&params).unwrap());
    }
}

// ── 4. Closed forms ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn sizing_matches_closed_form(params in arb_params()) {
        let ladder = compute_grid(&params).unwrap();
        let base = params.base_trade_size();

        let mut total = 0.0;
        for level in &ladder.levels {
            let expected = size(level.index, base, params.trade_size_multiplier).unwrap();
            prop_assert_eq!(level.trade_size, expected);
            total += expected;
        }
        prop_assert!(close(ladder.total_trade_size, total));
    }

    #[test]
    fn spacing_matches_closed_form(params in arb_params()) {
        let ladder = compute_grid(&params).unwrap();

        for level in &ladder.levels[1..] {
            let expected = spacing(
                level.index,
                params.grid_size,
                params.grid_multiplier,
                params.conventions.spacing_start,
            )
            .unwrap();
            prop_assert!(close(level.spacing_percent, expected));
        }
    }
}

// ── 5. Spacing monotonicity ──────────────────────────────────────────

proptest! {
    #[test]
    fn spacing_follows_multiplier(params in arb_params()) {
        let ladder = compute_grid(&params).unwrap();
        let m = params.grid_multiplier;

        for pair in ladder.levels[1..].windows(2) {
            let (previous, next) = (pair[0].spacing_percent, pair[1].spacing_percent);
            if m > 0.0 && m < 1.0 {
                prop_assert!(next <= previous, "{} then {} with multiplier {}", previous, next, m);
            } else if m > 1.0 {
                prop_assert!(next >= previous, "{} then {} with multiplier {}", previous, next, m);
            }
        }
    }
}

// ── 6. Targets ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn leverage_adjusted_move_is_scaled(
        entry in 0.01..100_000.0_f64,
        tp in -50.0..100.0_f64,
        leverage in 1.0..50.0_f64,
        value in 0.0..10_000.0_f64,
    ) {
        let plain = compute_target(entry, tp, leverage, value, TargetMode::Unleveraged).unwrap();
        let adjusted = compute_target(entry, tp, leverage, value, TargetMode::LeverageAdjusted).unwrap();

        prop_assert!(close(adjusted.price_move_to_tp_percent * leverage, plain.price_move_to_tp_percent));
        prop_assert_eq!(plain.tp_value, adjusted.tp_value);
        if tp > 1e-6 {
            prop_assert!(plain.tp_price > entry);
        }
    }
}
