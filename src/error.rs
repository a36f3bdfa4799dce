//! Error handling for the grid calculator core
//!
//! Every failure names the field or computation that caused it. Nothing in
//! the core is retried: a pure computation that fails once fails forever.

use std::fmt;

/// Main error type for ladder and target computations
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// An input violated a documented constraint
    InvalidParameter { field: &'static str, reason: String },

    /// A weighted mean had nothing to weigh
    DivisionByZero { context: &'static str },

    /// Exponentiation or summation produced a non-finite value
    NumericOverflow { field: &'static str },
}

impl GridError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        GridError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the field or computation the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            GridError::InvalidParameter { field, .. } => field,
            GridError::DivisionByZero { context } => context,
            GridError::NumericOverflow { field } => field,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            GridError::InvalidParameter { .. } => "validation",
            GridError::DivisionByZero { .. } | GridError::NumericOverflow { .. } => "numeric",
        }
    }

    /// Get a user-friendly error message with a hint on how to fix the input
    pub fn user_message(&self) -> String {
        match self {
            GridError::InvalidParameter { field, reason } => {
                format!(
                    "Invalid parameter '{}': {}\n\n\
                    💡 Check the [grid] section of your config or the --{} flag",
                    field,
                    reason,
                    field.replace('_', "-")
                )
            }
            GridError::NumericOverflow { field } => {
                format!(
                    "Numeric overflow while computing {}\n\n\
                    💡 Reduce grid_levels or bring the multipliers closer to 1.0",
                    field
                )
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidParameter { field, reason } => {
                write!(f, "Invalid parameter '{}': {}", field, reason)
            }
            GridError::DivisionByZero { context } => {
                write!(f, "Division by zero in {}", context)
            }
            GridError::NumericOverflow { field } => {
                write!(f, "Numeric overflow: {} is not finite", field)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Result type alias using GridError
pub type GridResult<T> = Result<T, GridError>;

/// Returns `value` unchanged when finite, `NumericOverflow` otherwise
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> GridResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GridError::NumericOverflow { field })
    }
}

/// Helper macro for creating context-rich errors
#[macro_export]
macro_rules! grid_error {
    (invalid_param, $field:expr, $reason:expr) => {
        $crate::error::GridError::InvalidParameter {
            field: $field,
            reason: $reason.to_string(),
        }
    };
    (division_by_zero, $context:expr) => {
        $crate::error::GridError::DivisionByZero { context: $context }
    };
    (overflow, $field:expr) => {
        $crate::error::GridError::NumericOverflow { field: $field }
    };
}
