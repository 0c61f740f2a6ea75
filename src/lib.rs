// Library interface for trainplan
// The binary and the integration tests both build on these modules

pub mod calculators;
pub mod config;
pub mod error;
pub mod inputs;
pub mod logging;
pub mod models;
pub mod plan;
pub mod planner;
pub mod scheduler;
pub mod units;
pub mod workout;

// Re-export commonly used types for convenience
pub use models::*;
pub use calculators::{
    FtpCalculator, HeartRateCalculator, StrainCalculator, TrainingPaceCalculator, TrainingPaces,
    Vo2MaxCalculator,
};
pub use config::PlannerConfig;
pub use error::{Result, TrainPlanError};
pub use inputs::PlanInputs;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use plan::PlanGenerator;
pub use planner::{next_sunday, PlanReport, Planner};
pub use scheduler::{ScheduleOutcome, WeeklySchedule, WorkoutScheduler};
pub use workout::{Workout, WorkoutFactory};
