//! Pre-flight validation of a computed ladder
//!
//! Checks are advisory: a ladder that fails them is still returned by the
//! core, and callers decide whether to act on it.

use crate::config::RiskThresholds;
use crate::core::GridLadder;
use crate::risk::RiskMetrics;
use serde::Serialize;
use tracing::{error, info, warn};

/// Validation result with detailed findings
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub checks: Vec<ValidationCheck>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub level: ValidationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    Critical,  // Ladder should not be deployed as configured
    Warning,   // Deployable, but worth a second look
    Info,      // Informational only
}

impl ValidationCheck {
    fn new(name: &str, passed: bool, message: String, level: ValidationLevel) -> Self {
        ValidationCheck {
            name: name.to_string(),
            passed,
            message,
            level,
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        ValidationResult {
            passed: true,
            checks: Vec::new(),
        }
    }

    pub fn add_check(&mut self, check: ValidationCheck) {
        if !check.passed && check.level == ValidationLevel::Critical {
            self.passed = false;
        }
        self.checks.push(check);
    }

    pub fn critical_failures(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.level == ValidationLevel::Critical)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.level == ValidationLevel::Warning)
            .collect()
    }

    pub fn display(&self) {
        info!("🔍 Pre-flight Validation");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        for check in &self.checks {
            let icon = if check.passed {
                "✅"
            } else {
                match check.level {
                    ValidationLevel::Critical => "❌",
                    ValidationLevel::Warning => "⚠️",
                    ValidationLevel::Info => "ℹ️",
                }
            };

            info!("{} {} - {}", icon, check.name, check.message);
        }

        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if !self.passed {
            let failures = self.critical_failures();
            error!("❌ Validation failed: {} critical issue(s)", failures.len());
            for failure in failures {
                error!("   • {}: {}", failure.name, failure.message);
            }
        } else {
            let warnings = self.warnings();
            if !warnings.is_empty() {
                warn!("⚠️  {} warning(s) detected", warnings.len());
                for warning in warnings {
                    warn!("   • {}: {}", warning.name, warning.message);
                }
            }
            info!("✅ All critical checks passed");
        }
    }
}

/// Pre-flight validator for computed ladders
pub struct PreFlightValidator {
    thresholds: RiskThresholds,
}

impl PreFlightValidator {
    pub fn new(thresholds: RiskThresholds) -> Self {
        PreFlightValidator { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Run the full check suite over `ladder` and its risk metrics
    pub fn validate_ladder(&self, ladder: &GridLadder, metrics: &RiskMetrics) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.add_check(self.check_capital(ladder));
        result.add_check(self.check_margin_utilization(metrics));
        result.add_check(self.check_liquidation_distance(metrics));
        result.add_check(self.check_ladder_depth(ladder, metrics));
        result.add_check(self.check_risk_reward(metrics));

        for check in result.checks.iter().filter(|c| !c.passed) {
            warn!(check = %check.name, level = ?check.level, "{}", check.message);
        }

        result
    }

    // Individual check methods

    fn check_capital(&self, ladder: &GridLadder) -> ValidationCheck {
        let margin = ladder.params.margin;
        let required = ladder.total_required_margin;

        if required > margin {
            ValidationCheck::new(
                "Capital",
                false,
                format!("Ladder needs {:.2} but margin is {:.2}", required, margin),
                ValidationLevel::Critical,
            )
        } else {
            ValidationCheck::new(
                "Capital",
                true,
                format!("{:.2} of {:.2} committed", required, margin),
                ValidationLevel::Info,
            )
        }
    }

    fn check_margin_utilization(&self, metrics: &RiskMetrics) -> ValidationCheck {
        let utilization = metrics.margin_utilization_percent;

        if utilization > self.thresholds.margin_utilization_critical {
            ValidationCheck::new(
                "Margin Utilization",
                false,
                format!("{:.1}% exceeds {:.1}%", utilization, self.thresholds.margin_utilization_critical),
                ValidationLevel::Critical,
            )
        } else if utilization > self.thresholds.margin_utilization_warning {
            ValidationCheck::new(
                "Margin Utilization",
                false,
                format!("{:.1}% is high, consider fewer levels", utilization),
                ValidationLevel::Warning,
            )
        } else {
            ValidationCheck::new(
                "Margin Utilization",
                true,
                format!("{:.1}%", utilization),
                ValidationLevel::Info,
            )
        }
    }

    fn check_liquidation_distance(&self, metrics: &RiskMetrics) -> ValidationCheck {
        let distance = metrics.liquidation_distance_percent;

        if distance < self.thresholds.liquidation_distance_critical {
            ValidationCheck::new(
                "Liquidation Distance",
                false,
                format!(
                    "Liquidation at {:.4} is only {:.1}% from entry",
                    metrics.liquidation_price, distance
                ),
                ValidationLevel::Critical,
            )
        } else if distance < self.thresholds.liquidation_distance_warning {
            ValidationCheck::new(
                "Liquidation Distance",
                false,
                format!("{:.1}% from entry, consider lower leverage", distance),
                ValidationLevel::Warning,
            )
        } else {
            ValidationCheck::new(
                "Liquidation Distance",
                true,
                format!("{:.1}% (liquidation at {:.4})", distance, metrics.liquidation_price),
                ValidationLevel::Info,
            )
        }
    }

    fn check_ladder_depth(&self, ladder: &GridLadder, metrics: &RiskMetrics) -> ValidationCheck {
        let deepest = ladder.deepest_level();

        if metrics.ladder_crosses_liquidation {
            ValidationCheck::new(
                "Ladder Depth",
                false,
                format!(
                    "Level {} at {:.4} lies beyond liquidation ({:.4})",
                    deepest.label, deepest.price, metrics.liquidation_price
                ),
                ValidationLevel::Critical,
            )
        } else {
            ValidationCheck::new(
                "Ladder Depth",
                true,
                format!("{} levels, deepest at {:.4}", ladder.levels.len(), deepest.price),
                ValidationLevel::Info,
            )
        }
    }

    fn check_risk_reward(&self, metrics: &RiskMetrics) -> ValidationCheck {
        let ratio = metrics.risk_reward_ratio;

        if ratio < self.thresholds.risk_reward_critical {
            ValidationCheck::new(
                "Risk/Reward",
                false,
                format!("1:{:.2} is below 1:{:.2}", ratio, self.thresholds.risk_reward_critical),
                ValidationLevel::Critical,
            )
        } else if ratio < self.thresholds.risk_reward_warning {
            ValidationCheck::new(
                "Risk/Reward",
                false,
                format!("1:{:.2} is marginal", ratio),
                ValidationLevel::Warning,
            )
        } else {
            ValidationCheck::new(
                "Risk/Reward",
                true,
                format!("1:{:.2}", ratio),
                ValidationLevel::Info,
            )
        }
    }
}
