// Integration tests for configuration loading and validation

mod common;

use common::create_test_config;
use grid_calculator::{
    compute_grid, Config, ConfigError, LevelNumbering, MarketDataSource, Side, SpacingMode,
    TargetMode,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");

    let config = create_test_config();
    config.to_file(&config_path).expect("Failed to write config");

    let loaded = Config::from_file(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.pairs.len(), 2);
    assert_eq!(loaded.pairs[1].overrides.grid_levels, Some(5));
}

#[test]
fn test_load_or_create_writes_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("new_config.toml");
    assert!(!config_path.exists());

    let created = Config::load_or_create(&config_path).expect("Failed to create config");
    assert!(config_path.exists());
    assert_eq!(created, Config::default());

    let reloaded = Config::load_or_create(&config_path).expect("Failed to reload config");
    assert_eq!(reloaded, created);
}

#[test]
fn test_example_config_loads() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, include_str!("../config.toml.example")).unwrap();

    let config = Config::from_file(&config_path).expect("example config must be valid");
    assert_eq!(config.pairs.len(), 3);
    assert_eq!(config.target.mode, TargetMode::Unleveraged);
    assert_eq!(config.market.range_window_days, 5);
    assert_eq!(config.fees.entry_fee_percent, 0.04);
    assert_eq!(config.risk.max_drawdown_percent, 100.0);
    assert_eq!(config.scenarios().len(), 5);

    let sol = config.pairs.iter().find(|p| p.symbol == "SOLUSDT").unwrap();
    let ladder = compute_grid(&config.pair_parameters(sol)).unwrap();
    assert_eq!(ladder.levels.len(), 5);
    assert!((ladder.total_trade_size - 186.04).abs() < 1e-9);

    let source = config.market_data();
    assert_eq!(source.daily_candles("BTCUSDT", 5).unwrap().len(), 5);
}

#[test]
fn test_conventions_from_toml() {
    let content = r#"
[conventions]
spacing_mode = "entry_cumulative"
numbering = "ascending"
side = "short"

[target]
mode = "leverage_adjusted"
"#;
    let config: Config = toml::from_str(content).unwrap();
    let params = config.grid_parameters();

    assert_eq!(params.conventions.spacing_mode, SpacingMode::EntryCumulative);
    assert_eq!(params.conventions.numbering, LevelNumbering::Ascending);
    assert_eq!(params.conventions.side, Side::Short);
    assert_eq!(config.target.mode, TargetMode::LeverageAdjusted);
}

#[test]
fn test_invalid_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let missing = temp_dir.path().join("missing.toml");
    assert!(matches!(Config::from_file(&missing), Err(ConfigError::FileRead(_))));

    let malformed = temp_dir.path().join("malformed.toml");
    fs::write(&malformed, "[grid\nmargin = ").unwrap();
    assert!(matches!(Config::from_file(&malformed), Err(ConfigError::Parse(_))));

    let negative_levels = temp_dir.path().join("negative.toml");
    fs::write(&negative_levels, "[grid]\ngrid_levels = -2\n").unwrap();
    assert!(matches!(Config::from_file(&negative_levels), Err(ConfigError::Parse(_))));

    let bad_leverage = temp_dir.path().join("leverage.toml");
    fs::write(&bad_leverage, "[grid]\nleverage = 0.5\n").unwrap();
    match Config::from_file(&bad_leverage) {
        Err(ConfigError::Validation(message)) => assert!(message.contains("leverage")),
        other => panic!("expected validation error, got {:?}", other),
    }

    let bad_pair = temp_dir.path().join("pair.toml");
    fs::write(
        &bad_pair,
        "[[pairs]]\nsymbol = \"XRPUSDT\"\nlast_price = 0.5\nhigh_24h = 0.4\nlow_24h = 0.45\n",
    )
    .unwrap();
    assert!(matches!(Config::from_file(&bad_pair), Err(ConfigError::Validation(_))));
}
