//! What-if analysis: named parameter presets applied over a base ladder
//! and recomputed side by side through the batch pipeline.

use crate::batch::{compute_batch, BatchReport, PairRequest};
use crate::config::{GridOverrides, RiskThresholds};
use crate::core::{GridParameters, TargetMode};
use crate::fees::FeeSchedule;
use crate::progress::BatchProgress;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub overrides: GridOverrides,
}

impl Scenario {
    pub fn new(name: impl Into<String>, overrides: GridOverrides) -> Self {
        Self {
            name: name.into(),
            overrides,
        }
    }

    fn preset(name: &str, tp_percent: f64, leverage: f64, grid_levels: u32) -> Self {
        Self::new(
            name,
            GridOverrides {
                tp_percent: Some(tp_percent),
                leverage: Some(leverage),
                grid_levels: Some(grid_levels),
                ..Default::default()
            },
        )
    }

    /// `base` with this scenario's overrides applied
    pub fn parameters(&self, base: &GridParameters) -> GridParameters {
        let mut params = base.clone();
        self.overrides.apply(&mut params);
        params
    }
}

/// Built-in presets, from cautious to wide
pub fn preset_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::preset("Conservative", 10.0, 3.0, 3),
        Scenario::preset("Balanced", 15.0, 5.0, 4),
        Scenario::preset("Aggressive", 20.0, 7.0, 5),
        Scenario::preset("High Frequency", 8.0, 4.0, 6),
        Scenario::preset("Wide Range", 25.0, 4.0, 3),
    ]
}

/// One batch request per scenario, named after it
pub fn scenario_requests(base: &GridParameters, scenarios: &[Scenario]) -> Vec<PairRequest> {
    scenarios
        .iter()
        .map(|scenario| PairRequest {
            symbol: scenario.name.clone(),
            params: scenario.parameters(base),
        })
        .collect()
}

/// Recompute `base` under every scenario
pub fn run_scenarios(
    base: &GridParameters,
    scenarios: &[Scenario],
    mode: TargetMode,
    thresholds: &RiskThresholds,
    fees: &FeeSchedule,
    progress: Option<&BatchProgress>,
) -> BatchReport {
    info!("🔮 Running {} what-if scenario(s)", scenarios.len());
    let requests = scenario_requests(base, scenarios);
    compute_batch(&requests, mode, thresholds, fees, progress)
}
