// Common test utilities and helpers
#![allow(dead_code)]

use grid_calculator::{Config, DailyCandle, GridConventions, GridOverrides, GridParameters, PairConfig};
use rand::Rng;

/// Reference ladder: entry 100, margin 1000, 10% initial trade, 3x, 3 levels
pub fn create_test_params() -> GridParameters {
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

/// Lower-priced ladder with a shallower spacing decay and faster size growth
pub fn create_small_cap_params() -> GridParameters {
    GridParameters {
        entry_price: 24.56,
        margin: 500.0,
        trade_size_percent: 5.0,
        leverage: 2.0,
        grid_levels: 4,
        grid_size: 1.5,
        grid_multiplier: 0.95,
        trade_size_multiplier: 1.2,
        tp_percent: 5.0,
        conventions: GridConventions::default(),
    }
}

/// Create a test configuration with two pairs
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.pairs = vec![
        create_test_pair("BTCUSDT", 43250.5, 44000.0, 42500.0),
        PairConfig {
            overrides: GridOverrides {
                leverage: Some(2.0),
                grid_levels: Some(5),
                ..Default::default()
            },
            ..create_test_pair("ETHUSDT", 2280.75, 2350.0, 2240.0)
        },
    ];
    config
}

pub fn create_test_pair(symbol: &str, last_price: f64, high_24h: f64, low_24h: f64) -> PairConfig {
    PairConfig {
        symbol: symbol.to_string(),
        last_price,
        high_24h,
        low_24h,
        daily_candles: vec![
            DailyCandle { high: low_24h * 1.032, low: low_24h },
            DailyCandle { high: low_24h * 1.028, low: low_24h },
            DailyCandle { high: low_24h * 1.035, low: low_24h },
            DailyCandle { high: low_24h * 1.029, low: low_24h },
            DailyCandle { high: low_24h * 1.031, low: low_24h },
        ],
        overrides: GridOverrides::default(),
    }
}

/// Generate a random but valid parameter set
pub fn generate_test_params(rng: &mut impl Rng) -> GridParameters {
    GridParameters {
        entry_price: rng.gen_range(0.01..100_000.0),
        margin: rng.gen_range(10.0..1_000_000.0),
        trade_size_percent: rng.gen_range(0.5..20.0),
        leverage: rng.gen_range(1.0..20.0),
        grid_levels: rng.gen_range(0..12),
        grid_size: rng.gen_range(0.1..3.0),
        grid_multiplier: rng.gen_range(0.5..1.3),
        trade_size_multiplier: rng.gen_range(0.8..1.5),
        tp_percent: rng.gen_range(0.5..25.0),
        conventions: GridConventions::default(),
    }
}

/// Generate an hourly price series
pub fn generate_test_prices(base_price: f64, count: usize, volatility: f64) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    let mut prices = Vec::with_capacity(count);
    let mut current_price = base_price;

    for _ in 0..count {
        let change_pct = rng.gen_range(-volatility..volatility);
        current_price *= 1.0 + change_pct;
        prices.push(current_price);
    }

    prices
}
