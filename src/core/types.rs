// Data types shared by the ladder pipeline

use serde::{Deserialize, Serialize};

/// How each level's price is anchored.
///
/// One mode applies to the whole ladder; levels are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingMode {
    /// `price_i = price_{i-1} * (1 - spacing_i / 100)`
    #[default]
    Chained,
    /// `price_i = entry * (1 - sum(spacing_1..=spacing_i) / 100)`
    EntryCumulative,
}

/// Which generated level receives the first application of `grid_multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingStart {
    /// Level 1 uses `grid_size` as-is, level 2 is the first multiplied one
    #[default]
    Base,
    /// Level 1 already uses `grid_size * grid_multiplier`
    Multiplied,
}

/// Labeling of levels as price moves away from entry. Has no numeric effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelNumbering {
    /// 0, -1, -2, ...
    #[default]
    Descending,
    /// 0, 1, 2, ...
    Ascending,
}

impl LevelNumbering {
    pub fn label(&self, index: usize) -> i64 {
        let index = index as i64;
        match self {
            LevelNumbering::Descending => -index,
            LevelNumbering::Ascending => index,
        }
    }
}

/// Position direction. Long ladders accumulate below entry, short ladders above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Long,
    Short,
}

impl Side {
    /// Sign applied to a ladder offset: levels move against the position
    pub fn ladder_sign(&self) -> f64 {
        match self {
            Side::Long => -1.0,
            Side::Short => 1.0,
        }
    }

    /// Sign applied to a target offset: targets move with the position
    pub fn target_sign(&self) -> f64 {
        -self.ladder_sign()
    }
}

/// Interpretation of `tp_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// `tp_percent` is a move in price
    #[default]
    Unleveraged,
    /// `tp_percent` is a return on margin; the price move is divided by leverage
    LeverageAdjusted,
}

/// The ambiguous conventions of a ladder, fixed explicitly per computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridConventions {
    #[serde(default)]
    pub spacing_mode: SpacingMode,
    #[serde(default)]
    pub spacing_start: SpacingStart,
    #[serde(default)]
    pub numbering: LevelNumbering,
    #[serde(default)]
    pub side: Side,
}

/// Immutable input of a ladder computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridParameters {
    pub entry_price: f64,
    /// Total capital
    pub margin: f64,
    /// Share of `margin` committed at level 0, in (0, 100]
    pub trade_size_percent: f64,
    pub leverage: f64,
    /// Levels beyond the initial one
    pub grid_levels: u32,
    /// Base spacing percent
    pub grid_size: f64,
    pub grid_multiplier: f64,
    pub trade_size_multiplier: f64,
    pub tp_percent: f64,
    #[serde(default)]
    pub conventions: GridConventions,
}

impl GridParameters {
    /// Capital committed at level 0 (the "initial trade value")
    pub fn base_trade_size(&self) -> f64 {
        self.margin * self.trade_size_percent / 100.0
    }

    pub fn with_conventions(mut self, conventions: GridConventions) -> Self {
        self.conventions = conventions;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.conventions.side = side;
        self
    }
}

/// One staged entry of a ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLevel {
    /// Position in the ladder, 0 = initial entry
    pub index: usize,
    /// Signed label per `LevelNumbering`
    pub label: i64,
    pub price: f64,
    /// Distance from the previous level, percent
    pub spacing_percent: f64,
    /// Capital committed at this level
    pub trade_size: f64,
    pub position_size: f64,
    pub required_margin: f64,
    pub percent_from_entry: f64,
    pub pnl_at_target: f64,
}

/// Whole-ladder reduction produced by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LadderSummary {
    pub average_entry_price: f64,
    pub total_trade_size: f64,
    pub total_required_margin: f64,
    pub total_position_size: f64,
}

/// A computed ladder together with the parameters it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLadder {
    pub params: GridParameters,
    pub levels: Vec<GridLevel>,
    pub average_entry_price: f64,
    pub total_trade_size: f64,
    pub total_required_margin: f64,
    pub total_position_size: f64,
}

impl GridLadder {
    pub fn initial_level(&self) -> &GridLevel {
        &self.levels[0]
    }

    /// Level furthest from entry
    pub fn deepest_level(&self) -> &GridLevel {
        &self.levels[self.levels.len() - 1]
    }

    pub fn lowest_price(&self) -> f64 {
        self.levels.iter().map(|l| l.price).fold(f64::INFINITY, f64::min)
    }

    pub fn highest_price(&self) -> f64 {
        self.levels
            .iter()
            .map(|l| l.price)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Take-profit projection for an entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetResult {
    pub mode: TargetMode,
    pub tp_price: f64,
    pub price_move_to_tp: f64,
    pub price_move_to_tp_percent: f64,
    /// Projected profit in capital terms
    pub tp_value: f64,
}
