use serde::{Deserialize, Serialize};

use super::Vo2MaxCalculator;
use crate::error::{Result, TrainPlanError};

/// Fractions of VO2max each training pace is run at
const LONG_RUN_FRACTION: f64 = 0.60;
const EASY_FRACTION: f64 = 0.70;
const TEMPO_FRACTION: f64 = 0.88;
const THRESHOLD_FRACTION: f64 = 0.90;
const SPEED_FRACTION: f64 = 1.10;
const SHORT_INTERVAL_FRACTION: f64 = 1.15;

/// Training paces, as speeds in meters per minute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingPaces {
    pub long_run: f64,
    pub easy: f64,
    pub tempo: f64,
    pub threshold: f64,
    pub speed: f64,
    pub short_interval: f64,
}

/// Derives training paces from a VO2max estimate
pub struct TrainingPaceCalculator;

impl TrainingPaceCalculator {
    /// Running speed (m/min) at which the given oxygen uptake is reached
    pub fn convert_to_speed(vo2: f64) -> f64 {
        29.54 + 5.000663 * vo2 - 0.007546 * vo2 * vo2
    }

    pub fn calc_from_vo2max(vo2max: f64) -> Result<TrainingPaces> {
        if !vo2max.is_finite() || vo2max <= 0.0 {
            return Err(TrainPlanError::insufficient_data(
                "training paces",
                "VO2max must be a positive number",
            ));
        }

        let pace = |fraction: f64| Self::convert_to_speed(vo2max * fraction);
        Ok(TrainingPaces {
            long_run: pace(LONG_RUN_FRACTION),
            easy: pace(EASY_FRACTION),
            tempo: pace(TEMPO_FRACTION),
            threshold: pace(THRESHOLD_FRACTION),
            speed: pace(SPEED_FRACTION),
            short_interval: pace(SHORT_INTERVAL_FRACTION),
        })
    }

    pub fn calc_from_hr(resting_hr: Option<f64>, max_hr: Option<f64>) -> Result<TrainingPaces> {
        let vo2max = Vo2MaxCalculator::estimate_vo2max_from_heart_rate(resting_hr, max_hr)?;
        Self::calc_from_vo2max(vo2max)
    }

    pub fn calc_from_race(race_distance_meters: Option<f64>, race_time_secs: Option<f64>) -> Result<TrainingPaces> {
        let vo2max = Vo2MaxCalculator::estimate_vo2max_from_race_distance(race_distance_meters, race_time_secs)?;
        Self::calc_from_vo2max(vo2max)
    }
}
