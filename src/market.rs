//! Market statistics fed into ladder parameters
//!
//! The market-data provider itself is an external collaborator; this module
//! only defines the seam (`MarketDataSource`) and the plain statistics
//! computed over what it returns.

use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hours in a year, the annualization factor for hourly price series
pub const HOURLY_PERIODS_PER_YEAR: f64 = 365.0 * 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyCandle {
    pub high: f64,
    pub low: f64,
}

/// Last price and 24h range of an instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub last_price: f64,
    pub high_24h: f64,
    pub low_24h: f64,
}

/// Range statistics of one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStatistics {
    pub symbol: String,
    pub last_price: f64,
    pub daily_range_percent: f64,
    /// Per-day ranges of the trailing window, most recent first
    pub historical_ranges: Vec<f64>,
    pub average_range_percent: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarketDataError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Not enough history for {symbol}: requested {requested} days, have {available}")]
    InsufficientHistory {
        symbol: String,
        requested: usize,
        available: usize,
    },

    #[error(transparent)]
    Calculation(#[from] GridError),
}

/// Source of market data for ladder inputs
pub trait MarketDataSource: Send + Sync {
    fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot, MarketDataError>;

    /// Trailing daily candles, most recent first
    fn daily_candles(&self, symbol: &str, days: usize) -> Result<Vec<DailyCandle>, MarketDataError>;
}

/// `(high - low) / low * 100`
pub fn daily_range_percent(high: f64, low: f64) -> GridResult<f64> {
    if !(low > 0.0) || !low.is_finite() {
        return Err(GridError::invalid("low", format!("must be positive, got {}", low)));
    }
    if !(high >= low) || !high.is_finite() {
        return Err(GridError::invalid(
            "high",
            format!("must be at least low ({}), got {}", low, high),
        ));
    }
    Ok((high - low) / low * 100.0)
}

/// Arithmetic mean of per-day range percents
pub fn average_daily_range(candles: &[DailyCandle]) -> GridResult<f64> {
    if candles.is_empty() {
        return Err(crate::grid_error!(division_by_zero, "average_daily_range"));
    }
    let mut total = 0.0;
    for candle in candles {
        total += daily_range_percent(candle.high, candle.low)?;
    }
    Ok(total / candles.len() as f64)
}

/// Annualized volatility of a price series, percent.
///
/// Population standard deviation of log returns scaled by
/// `sqrt(periods_per_year)`. Fewer than two prices have no returns and
/// yield zero.
pub fn annualized_volatility(prices: &[f64], periods_per_year: f64) -> GridResult<f64> {
    if let Some(bad) = prices.iter().find(|p| !(**p > 0.0) || !p.is_finite()) {
        return Err(GridError::invalid("prices", format!("must all be positive, got {}", bad)));
    }
    if prices.len() < 2 {
        return Ok(0.0);
    }

    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    Ok((variance * periods_per_year).sqrt() * 100.0)
}

/// Collect range statistics for `symbol` over a trailing `window` of days
pub fn pair_statistics<S: MarketDataSource + ?Sized>(
    source: &S,
    symbol: &str,
    window: usize,
) -> Result<PairStatistics, MarketDataError> {
    let snapshot = source.snapshot(symbol)?;
    let candles = source.daily_candles(symbol, window)?;

    let historical_ranges = candles
        .iter()
        .map(|c| daily_range_percent(c.high, c.low))
        .collect::<GridResult<Vec<f64>>>()?;

    Ok(PairStatistics {
        symbol: snapshot.symbol,
        last_price: snapshot.last_price,
        daily_range_percent: daily_range_percent(snapshot.high_24h, snapshot.low_24h)?,
        average_range_percent: average_daily_range(&candles)?,
        historical_ranges,
    })
}

#[derive(Debug, Clone)]
struct StoredPair {
    snapshot: MarketSnapshot,
    candles: Vec<DailyCandle>,
}

/// Market data held in memory, typically loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketData {
    pairs: HashMap<String, StoredPair>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: MarketSnapshot, candles: Vec<DailyCandle>) {
        self.pairs
            .insert(snapshot.symbol.clone(), StoredPair { snapshot, candles });
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.pairs.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }

    fn pair(&self, symbol: &str) -> Result<&StoredPair, MarketDataError> {
        self.pairs
            .get(symbol)
            .ok_or_else(|| MarketDataError::UnknownSymbol(symbol.to_string()))
    }
}

impl MarketDataSource for InMemoryMarketData {
    fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot, MarketDataError> {
        Ok(self.pair(symbol)?.snapshot.clone())
    }

    fn daily_candles(&self, symbol: &str, days: usize) -> Result<Vec<DailyCandle>, MarketDataError> {
        let pair = self.pair(symbol)?;
        if pair.candles.len() < days {
            return Err(MarketDataError::InsufficientHistory {
                symbol: symbol.to_string(),
                requested: days,
                available: pair.candles.len(),
            });
        }
        Ok(pair.candles[..days].to_vec())
    }
}
