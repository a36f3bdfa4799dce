// Grid Calculator - command line interface
// Single entry point for ladder, target, batch, scenario and range computations

use clap::{Parser, Subcommand, ValueEnum};
use grid_calculator::{
    Config, ConfigError, GridOverrides, GridParameters, LevelNumbering, Side, SpacingMode,
    SpacingStart, TargetMode,
};
use std::path::Path;
use tracing::{error, info, warn, Level};

// Load command modules from cli directory
#[path = "../cli/grid_commands.rs"]
mod grid_commands;

#[derive(Parser)]
#[command(name = "grid-calc")]
#[command(version = "0.2.0")]
#[command(about = "Staged grid-ladder calculator", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Compute a grid ladder from configured defaults and overrides
    Grid {
        /// Start from a configured pair instead of the [grid] defaults
        #[arg(short, long)]
        pair: Option<String>,

        #[command(flatten)]
        overrides: ParameterArgs,

        #[arg(long, value_enum)]
        spacing_mode: Option<SpacingModeArg>,

        #[arg(long, value_enum)]
        spacing_start: Option<SpacingStartArg>,

        #[arg(long, value_enum)]
        numbering: Option<NumberingArg>,

        /// Take-profit interpretation
        #[arg(short, long, value_enum)]
        mode: Option<TargetModeArg>,
    },

    /// Project a take-profit target for a single entry
    Target {
        #[arg(long)]
        entry_price: f64,

        #[arg(long)]
        tp_percent: f64,

        #[arg(long, default_value = "1")]
        leverage: f64,

        /// Capital committed at the entry
        #[arg(long)]
        initial_trade_value: f64,

        #[arg(short, long, value_enum, default_value = "unleveraged")]
        mode: TargetModeArg,

        #[arg(long, value_enum, default_value = "long")]
        side: SideArg,
    },

    /// Compute ladders for every configured pair in parallel
    Batch {
        /// Only these pairs (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        pairs: Option<Vec<String>>,
    },

    /// Recompute a ladder under each what-if scenario
    Scenarios {
        /// Start from a configured pair instead of the [grid] defaults
        #[arg(short, long)]
        pair: Option<String>,

        #[command(flatten)]
        overrides: ParameterArgs,

        /// Take-profit interpretation
        #[arg(short, long, value_enum)]
        mode: Option<TargetModeArg>,
    },

    /// Daily range statistics of a configured pair
    Range {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,

        /// Trailing days to average
        #[arg(short, long)]
        window: Option<usize>,
    },
}

#[derive(clap::Args)]
struct ParameterArgs {
    #[arg(long)]
    entry_price: Option<f64>,
    #[arg(long)]
    margin: Option<f64>,
    #[arg(long)]
    trade_size_percent: Option<f64>,
    #[arg(long)]
    leverage: Option<f64>,
    #[arg(long)]
    grid_levels: Option<u32>,
    #[arg(long)]
    grid_size: Option<f64>,
    #[arg(long)]
    grid_multiplier: Option<f64>,
    #[arg(long)]
    trade_size_multiplier: Option<f64>,
    #[arg(long)]
    tp_percent: Option<f64>,
    #[arg(long, value_enum)]
    side: Option<SideArg>,
}

impl From<ParameterArgs> for GridOverrides {
    fn from(args: ParameterArgs) -> Self {
        GridOverrides {
            entry_price: args.entry_price,
            margin: args.margin,
            trade_size_percent: args.trade_size_percent,
            leverage: args.leverage,
            grid_levels: args.grid_levels,
            grid_size: args.grid_size,
            grid_multiplier: args.grid_multiplier,
            trade_size_multiplier: args.trade_size_multiplier,
            tp_percent: args.tp_percent,
            side: args.side.map(Side::from),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Long,
    Short,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Long => Side::Long,
            SideArg::Short => Side::Short,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetModeArg {
    Unleveraged,
    LeverageAdjusted,
}

impl From<TargetModeArg> for TargetMode {
    fn from(arg: TargetModeArg) -> Self {
        match arg {
            TargetModeArg::Unleveraged => TargetMode::Unleveraged,
            TargetModeArg::LeverageAdjusted => TargetMode::LeverageAdjusted,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SpacingModeArg {
    Chained,
    EntryCumulative,
}

impl From<SpacingModeArg> for SpacingMode {
    fn from(arg: SpacingModeArg) -> Self {
        match arg {
            SpacingModeArg::Chained => SpacingMode::Chained,
            SpacingModeArg::EntryCumulative => SpacingMode::EntryCumulative,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SpacingStartArg {
    Base,
    Multiplied,
}

impl From<SpacingStartArg> for SpacingStart {
    fn from(arg: SpacingStartArg) -> Self {
        match arg {
            SpacingStartArg::Base => SpacingStart::Base,
            SpacingStartArg::Multiplied => SpacingStart::Multiplied,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NumberingArg {
    Descending,
    Ascending,
}

impl From<NumberingArg> for LevelNumbering {
    fn from(arg: NumberingArg) -> Self {
        match arg {
            NumberingArg::Descending => LevelNumbering::Descending,
            NumberingArg::Ascending => LevelNumbering::Ascending,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so its level can apply; errors are reported after
    let loaded = match &cli.command {
        Commands::Init { .. } => Ok(Config::default()),
        _ => load_config(&cli.config),
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        loaded
            .as_ref()
            .ok()
            .and_then(|c| c.logging.level.parse::<Level>().ok())
            .unwrap_or(Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&e, &cli.config);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, config) {
        error!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    match cli.command {
        Commands::Init { force } => {
            init_config(&cli.config, force)?;
        }

        Commands::Grid {
            pair,
            overrides,
            spacing_mode,
            spacing_start,
            numbering,
            mode,
        } => {
            let mut params = base_parameters(&config, pair, overrides)?;
            if let Some(m) = spacing_mode {
                params.conventions.spacing_mode = m.into();
            }
            if let Some(s) = spacing_start {
                params.conventions.spacing_start = s.into();
            }
            if let Some(n) = numbering {
                params.conventions.numbering = n.into();
            }
            let mode = mode.map(TargetMode::from).unwrap_or(config.target.mode);

            grid_commands::run_grid(&params, mode, &config, json)?;
        }

        Commands::Target {
            entry_price,
            tp_percent,
            leverage,
            initial_trade_value,
            mode,
            side,
        } => {
            grid_commands::run_target(
                entry_price,
                tp_percent,
                leverage,
                initial_trade_value,
                mode.into(),
                side.into(),
                json,
            )?;
        }

        Commands::Batch { pairs } => {
            grid_commands::run_batch(&config, pairs, json)?;
        }

        Commands::Scenarios { pair, overrides, mode } => {
            let params = base_parameters(&config, pair, overrides)?;
            let mode = mode.map(TargetMode::from).unwrap_or(config.target.mode);

            grid_commands::run_scenarios_command(&params, mode, &config, json)?;
        }

        Commands::Range { symbol, window } => {
            grid_commands::run_range(&config, &symbol, window, json)?;
        }
    }

    Ok(())
}

/// Defaults or a configured pair, then command-line overrides
fn base_parameters(
    config: &Config,
    pair: Option<String>,
    overrides: ParameterArgs,
) -> Result<GridParameters, Box<dyn std::error::Error>> {
    let mut params = match pair {
        Some(symbol) => match config.pairs.iter().find(|p| p.symbol == symbol) {
            Some(pair) => config.pair_parameters(pair),
            None => return Err(format!("pair '{}' is not configured", symbol).into()),
        },
        None => config.grid_parameters(),
    };
    GridOverrides::from(overrides).apply(&mut params);
    Ok(params)
}

/// Load the config file, falling back to built-in defaults when it is missing
fn load_config(path: &str) -> Result<Config, ConfigError> {
    if Path::new(path).exists() {
        Config::from_file(path)
    } else {
        Ok(Config::default())
    }
}

fn report_config_error(e: &ConfigError, path: &str) {
    error!("❌ Configuration Error");
    error!("{}", e);

    if matches!(e, ConfigError::Parse(_) | ConfigError::Validation(_)) {
        error!("");
        error!("💡 Quick fix:");
        error!("   1. Compare {} with config.toml.example", path);
        error!("   2. Or regenerate it: grid-calc init --force");
    }
}

fn init_config(path: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    info!("🔧 Initializing configuration...");

    if Path::new(path).exists() && !force {
        warn!("⚠️  {} already exists, skipping (use --force to overwrite)", path);
        return Ok(());
    }

    let example = include_str!("../../config.toml.example");
    // The shipped example must itself load
    toml::from_str::<Config>(example)?;
    std::fs::write(path, example)?;
    info!("📝 Created {}", path);

    info!("✅ Configuration initialized successfully!");
    info!("💡 Next steps:");
    info!("   1. Edit {} with your pairs and defaults", path);
    info!("   2. Run: grid-calc grid");
    info!("   3. Run: grid-calc batch");
    info!("   4. Run: grid-calc scenarios");

    Ok(())
}
