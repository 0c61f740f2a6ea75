//! Unified error hierarchy for trainplan
//!
//! Plan generation has exactly one failure path that callers are expected to
//! handle routinely: missing or unusable numeric inputs. Everything else
//! (infeasible goals, thin training history, a scheduler search that never
//! beats its baseline) is reported through return values, not errors.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level error type for all trainplan operations
#[derive(Debug, Error)]
pub enum TrainPlanError {
    /// Calculation errors, including insufficient input data
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Weekly scheduling errors
    #[error("Scheduling error: {0}")]
    Scheduling(#[from] SchedulingError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Workout (de)serialization errors at the persistence boundary
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Calculation errors
#[derive(Debug, Error)]
pub enum CalculationError {
    /// Required numeric input is missing, non-finite, or non-positive
    #[error("Insufficient data for {calculation}: {reason}")]
    InsufficientData { calculation: String, reason: String },

    /// Invalid parameter
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: String,
    },

    /// Division by zero
    #[error("Division by zero in {calculation}")]
    DivisionByZero { calculation: String },
}

/// Errors raised while placing workouts onto a week
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// More workouts than days in the week
    #[error("Cannot schedule {count} workouts into a 7 day week")]
    TooManyWorkouts { count: usize },

    /// Two pre-scheduled workouts share a day
    #[error("More than one workout is already scheduled on {date}")]
    DayConflict { date: NaiveDate },

    /// A pre-scheduled workout falls outside the week being planned
    #[error("Workout scheduled on {date} is outside the week starting {week_start}")]
    OutsideWindow {
        date: NaiveDate,
        week_start: NaiveDate,
    },
}

/// Result type alias for trainplan operations
pub type Result<T> = std::result::Result<T, TrainPlanError>;

impl TrainPlanError {
    /// Shorthand for the insufficient-data condition
    pub fn insufficient_data(calculation: impl Into<String>, reason: impl Into<String>) -> Self {
        TrainPlanError::Calculation(CalculationError::InsufficientData {
            calculation: calculation.into(),
            reason: reason.into(),
        })
    }

    /// True when the error means "not enough data to plan this sport/week"
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            TrainPlanError::Calculation(CalculationError::InsufficientData { .. })
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrainPlanError::Calculation(CalculationError::InsufficientData { .. }) => {
                ErrorSeverity::Warning
            }
            TrainPlanError::Validation(_) => ErrorSeverity::Warning,
            TrainPlanError::Scheduling(_) => ErrorSeverity::Error,
            TrainPlanError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrainPlanError::Calculation(CalculationError::InsufficientData {
                calculation,
                ..
            }) => {
                format!(
                    "Not enough training data to calculate {}. Log a few more activities and try again.",
                    calculation
                )
            }
            TrainPlanError::Scheduling(SchedulingError::TooManyWorkouts { count }) => {
                format!("{} workouts do not fit into a single week.", count)
            }
            TrainPlanError::Configuration(reason) => {
                format!("The configuration is invalid: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = TrainPlanError::insufficient_data("run plan", "no tempo pace");
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = TrainPlanError::Internal("test".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);

        let err = TrainPlanError::Scheduling(SchedulingError::TooManyWorkouts { count: 9 });
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_insufficient_data_detection() {
        let err = TrainPlanError::insufficient_data("FTP", "no cycling power samples");
        assert!(err.is_insufficient_data());

        let err = TrainPlanError::Validation("bad goal".to_string());
        assert!(!err.is_insufficient_data());
    }

    #[test]
    fn test_user_messages() {
        let err = TrainPlanError::insufficient_data("training paces", "no VO2max");
        assert!(err.user_message().contains("Not enough training data"));

        let err = TrainPlanError::Scheduling(SchedulingError::TooManyWorkouts { count: 8 });
        assert!(err.user_message().starts_with("8 workouts"));
    }
}
