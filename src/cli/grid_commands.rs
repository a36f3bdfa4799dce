// Grid, target, batch, scenario and range command implementations
use grid_calculator::{
    compute_batch, compute_pair, compute_target_for_side, pair_statistics, requests_from_config,
    run_scenarios, BatchProgress, BatchReport, Config, GridParameters, PairOutcome,
    PreFlightValidator, Side, TargetMode,
};
use std::error::Error;
use tracing::{info, warn};

type CommandResult = Result<(), Box<dyn Error>>;

pub fn run_grid(params: &GridParameters, mode: TargetMode, config: &Config, json: bool) -> CommandResult {
    let validator = PreFlightValidator::new(config.risk.clone());

    let outcome = compute_pair(params, mode, &validator, &config.fees).map_err(|e| e.user_message())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    print_outcome(&outcome);
    outcome.validation.display();
    Ok(())
}

pub fn run_target(
    entry_price: f64,
    tp_percent: f64,
    leverage: f64,
    initial_trade_value: f64,
    mode: TargetMode,
    side: Side,
    json: bool,
) -> CommandResult {
    let result = compute_target_for_side(entry_price, tp_percent, leverage, initial_trade_value, mode, side)
        .map_err(|e| e.user_message())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    info!("🎯 Take-profit ({:?}, {:?})", mode, side);
    println!("  TP price:        {:.6}", result.tp_price);
    println!(
        "  Move to TP:      {:+.6} ({:+.4}%)",
        result.price_move_to_tp, result.price_move_to_tp_percent
    );
    println!("  TP value:        {:.4}", result.tp_value);
    Ok(())
}

pub fn run_batch(config: &Config, symbols: Option<Vec<String>>, json: bool) -> CommandResult {
    let mut requests = requests_from_config(config);
    if let Some(symbols) = symbols {
        for symbol in &symbols {
            if !requests.iter().any(|r| &r.symbol == symbol) {
                warn!("⚠️  {} is not configured, skipping", symbol);
            }
        }
        requests.retain(|r| symbols.contains(&r.symbol));
    }

    if requests.is_empty() {
        warn!("⚠️  No pairs to compute");
        info!("💡 Add [[pairs]] entries to the config file (see grid-calc init)");
        return Ok(());
    }

    let progress = if json {
        BatchProgress::hidden(requests.len())
    } else {
        BatchProgress::new(requests.len())
    };
    let report = compute_batch(
        &requests,
        config.target.mode,
        &config.risk,
        &config.fees,
        Some(&progress),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
        return Ok(());
    }

    info!("📋 Batch report {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    print_report(&report, "Pair");

    if report.failed() > 0 {
        warn!("⚠️  {} pair(s) failed", report.failed());
    }
    Ok(())
}

pub fn run_scenarios_command(
    base: &GridParameters,
    mode: TargetMode,
    config: &Config,
    json: bool,
) -> CommandResult {
    let scenarios = config.scenarios();
    let progress = if json {
        BatchProgress::hidden(scenarios.len())
    } else {
        BatchProgress::new(scenarios.len())
    };
    let report = run_scenarios(base, &scenarios, mode, &config.risk, &config.fees, Some(&progress));

    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
        return Ok(());
    }

    info!("🔮 What-if analysis from entry {:.6}", base.entry_price);
    print_report(&report, "Scenario");

    if report.failed() > 0 {
        warn!("⚠️  {} scenario(s) failed", report.failed());
    }
    Ok(())
}

fn print_report(report: &BatchReport, label: &str) {
    println!(
        "{:<16} {:>14} {:>14} {:>14} {:>12} {:>10} {:>8}",
        label, "Entry", "Avg Entry", "TP Price", "Net Profit", "Margin %", "Checks"
    );
    for entry in &report.entries {
        match &entry.result {
            Ok(outcome) => {
                let checks = if !outcome.validation.passed {
                    "❌"
                } else if outcome.validation.warnings().is_empty() {
                    "✅"
                } else {
                    "⚠️"
                };
                println!(
                    "{:<16} {:>14.6} {:>14.6} {:>14.6} {:>12.4} {:>10.2} {:>8}",
                    entry.symbol,
                    outcome.ladder.params.entry_price,
                    outcome.ladder.average_entry_price,
                    outcome.target.tp_price,
                    outcome.fees.net_profit,
                    outcome.risk.margin_utilization_percent,
                    checks
                );
            }
            Err(e) => println!("{:<16} ❌ {}", entry.symbol, e),
        }
    }
}

pub fn run_range(config: &Config, symbol: &str, window: Option<usize>, json: bool) -> CommandResult {
    let window = window.unwrap_or(config.market.range_window_days);
    let source = config.market_data();

    let stats = pair_statistics(&source, symbol, window).map_err(|e| {
        if source.symbols().is_empty() {
            info!("💡 No pairs configured; add [[pairs]] entries to the config file");
        } else {
            info!("💡 Configured pairs: {}", source.symbols().join(", "));
        }
        e
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    info!("📈 {} range statistics", stats.symbol);
    println!("  Last price:        {:.6}", stats.last_price);
    println!("  24h range:         {:.2}%", stats.daily_range_percent);
    for (day, range) in stats.historical_ranges.iter().enumerate() {
        println!("  Day -{}:            {:.2}%", day + 1, range);
    }
    println!("  {}-day average:     {:.2}%", window, stats.average_range_percent);
    Ok(())
}

fn print_outcome(outcome: &PairOutcome) {
    let ladder = &outcome.ladder;
    let params = &ladder.params;

    info!(
        "📊 Grid ladder: entry {:.6}, {} level(s), {:?} side",
        params.entry_price,
        params.grid_levels,
        params.conventions.side
    );
    println!(
        "{:>6} {:>14} {:>9} {:>12} {:>14} {:>10} {:>12} {:>10} {:>14}",
        "Level", "Price", "Spacing%", "Trade Size", "Position", "From Entry", "PnL @ TP", "Fees", "Liquidation"
    );
    for ((level, fees), liquidation) in ladder
        .levels
        .iter()
        .zip(&outcome.fees.levels)
        .zip(&outcome.liquidation.levels)
    {
        println!(
            "{:>6} {:>14.6} {:>9.4} {:>12.4} {:>14.4} {:>9.4}% {:>12.4} {:>10.4} {:>14.6}",
            level.label,
            level.price,
            level.spacing_percent,
            level.trade_size,
            level.position_size,
            level.percent_from_entry,
            level.pnl_at_target,
            fees.total_fees,
            liquidation.liquidation_price
        );
    }

    println!();
    println!("  Average entry:     {:.6}", ladder.average_entry_price);
    println!("  Total trade size:  {:.4}", ladder.total_trade_size);
    println!("  Total position:    {:.4}", ladder.total_position_size);
    println!("  TP price:          {:.6} ({:?})", outcome.target.tp_price, outcome.target.mode);
    println!("  TP value:          {:.4}", outcome.target.tp_value);
    println!("  Total fees:        {:.4}", outcome.fees.total_fees);
    println!("  Net profit:        {:.4}", outcome.fees.net_profit);
    println!();
    println!("  Liquidation:       {:.6} ({:.2}% away)", outcome.risk.liquidation_price, outcome.risk.liquidation_distance_percent);
    println!(
        "  At {:.0}% drawdown:  {:.6}",
        outcome.liquidation.max_drawdown_percent, outcome.liquidation.drawdown_liquidation_price
    );
    println!("  Max profit:        {:.2}%", outcome.risk.max_profit_percent);
    println!("  Risk/reward:       1:{:.2}", outcome.risk.risk_reward_ratio);
    println!("  Margin used:       {:.2}%", outcome.risk.margin_utilization_percent);
    println!("  Token amount:      {:.6}", outcome.risk.token_amount);
    println!("  Suggested spacing: {:.1}%", outcome.suggested_grid_spacing);
}
