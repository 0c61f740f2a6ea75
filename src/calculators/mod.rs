//! Threshold, zone, and pace calculators
//!
//! These are the leaves of plan generation: they turn recent best efforts into
//! FTP, maximum heart rate, VO2max, and the training paces the generators use.

pub mod ftp;
pub mod heart_rate;
pub mod strain;
pub mod training_pace;
pub mod vo2max;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use ftp::FtpCalculator;
pub use heart_rate::HeartRateCalculator;
pub use strain::StrainCalculator;
pub use training_pace::{TrainingPaceCalculator, TrainingPaces};
pub use vo2max::Vo2MaxCalculator;

/// Activities older than this are ignored by the FTP and max HR estimators
pub const RECENT_BESTS_WINDOW_DAYS: f64 = 365.25 / 2.0;

/// Best efforts recorded for a single activity by the activity summarizer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Highest average power seen over 20 minutes
    #[serde(rename = "20 Minute Power", default)]
    pub best_20_min_power: Option<f64>,

    /// Highest average power seen over 1 hour
    #[serde(rename = "1 Hour Power", default)]
    pub best_1_hour_power: Option<f64>,

    /// Highest heart rate detected during the activity
    #[serde(rename = "Maximum Heart Rate", default)]
    pub max_heart_rate: Option<f64>,
}

/// Start of the six month look-back window ending at `now`
pub(crate) fn six_month_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    let seconds = (RECENT_BESTS_WINDOW_DAYS * 24.0 * 60.0 * 60.0) as i64;
    now - Duration::seconds(seconds)
}

/// Keeps only finite, positive samples
pub(crate) fn usable_sample(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}
