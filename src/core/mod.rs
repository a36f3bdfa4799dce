// Core ladder pipeline: progressions, projection, aggregation, targets

pub mod types;
pub mod progression;
pub mod projector;
pub mod aggregator;
pub mod target;
pub mod calculator;

// Re-export commonly used types
pub use types::{
    GridConventions, GridLadder, GridLevel, GridParameters, LadderSummary, LevelNumbering, Side,
    SpacingMode, SpacingStart, TargetMode, TargetResult,
};
pub use calculator::{compute_grid, compute_target, compute_target_for_side};
