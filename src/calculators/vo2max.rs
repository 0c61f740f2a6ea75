//! VO2max estimation
//!
//! VO2max (ml/kg/min) is the single fitness number the pace calculator works
//! from. Two independent estimators are provided: the heart rate ratio method
//! and the Daniels & Gilbert race result method.

use crate::error::{CalculationError, Result, TrainPlanError};

/// Values above this are not physiologically plausible
const MAX_PLAUSIBLE_VO2MAX: f64 = 100.0;

pub struct Vo2MaxCalculator;

impl Vo2MaxCalculator {
    /// Uth–Sørensen–Overgaard–Pedersen estimate: `15.3 * max_hr / resting_hr`
    pub fn estimate_vo2max_from_heart_rate(resting_hr: Option<f64>, max_hr: Option<f64>) -> Result<f64> {
        let resting_hr = positive(resting_hr, "resting heart rate")?;
        let max_hr = positive(max_hr, "maximum heart rate")?;
        Ok(15.3 * max_hr / resting_hr)
    }

    /// Oxygen cost of running at `speed` meters per minute
    pub fn oxygen_cost(speed: f64) -> f64 {
        -4.60 + 0.182258 * speed + 0.000104 * speed * speed
    }

    /// Fraction of VO2max that can be sustained for `minutes`
    pub fn sustainable_fraction(minutes: f64) -> f64 {
        0.8 + 0.1894393 * (-0.012778 * minutes).exp() + 0.2989558 * (-0.1932605 * minutes).exp()
    }

    /// Daniels & Gilbert estimate from a recent race.
    ///
    /// # Arguments
    /// * `race_distance_meters` - Race distance in meters
    /// * `race_time_secs` - Finishing time in seconds
    pub fn estimate_vo2max_from_race_distance(
        race_distance_meters: Option<f64>,
        race_time_secs: Option<f64>,
    ) -> Result<f64> {
        let distance = positive(race_distance_meters, "race distance")?;
        let minutes = positive(race_time_secs, "race time")? / 60.0;
        let speed = distance / minutes;

        let vo2max = Self::oxygen_cost(speed) / Self::sustainable_fraction(minutes);
        if !vo2max.is_finite() || vo2max <= 0.0 || vo2max > MAX_PLAUSIBLE_VO2MAX {
            return Err(TrainPlanError::Calculation(CalculationError::InvalidParameter {
                calculation: "VO2max".to_string(),
                parameter: "race result".to_string(),
                value: format!("{:.0} m in {:.1} min", distance, minutes),
            }));
        }
        Ok(vo2max)
    }

    /// Estimate from a race result plus the average heart rate held during it
    pub fn estimate_vo2max_from_race_and_heart_rate(
        race_distance_meters: f64,
        race_time_minutes: f64,
        load_hr: f64,
        resting_hr: f64,
        max_hr: f64,
    ) -> Result<f64> {
        let reserve = max_hr - resting_hr;
        let load = load_hr - resting_hr;
        if race_time_minutes <= 0.0 || reserve <= 0.0 || load <= 0.0 {
            return Err(TrainPlanError::Calculation(CalculationError::DivisionByZero {
                calculation: "VO2max from race and heart rate".to_string(),
            }));
        }
        Ok((race_distance_meters / race_time_minutes * 0.2) / (load / reserve) + 3.5)
    }
}

fn positive(value: Option<f64>, name: &str) -> Result<f64> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| TrainPlanError::insufficient_data("VO2max", format!("no usable {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_rate_ratio() {
        let vo2max = Vo2MaxCalculator::estimate_vo2max_from_heart_rate(Some(50.0), Some(190.0)).unwrap();
        assert!((vo2max - 58.14).abs() < 0.01);
    }

    #[test]
    fn test_missing_heart_rate_is_insufficient_data() {
        let err = Vo2MaxCalculator::estimate_vo2max_from_heart_rate(None, Some(190.0)).unwrap_err();
        assert!(err.is_insufficient_data());

        let err = Vo2MaxCalculator::estimate_vo2max_from_heart_rate(Some(0.0), Some(190.0)).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_twenty_minute_5k() {
        // A 20:00 5K is a VDOT of roughly 49.8
        let vo2max = Vo2MaxCalculator::estimate_vo2max_from_race_distance(Some(5000.0), Some(1200.0)).unwrap();
        assert!((vo2max - 49.8).abs() < 0.3);
    }

    #[test]
    fn test_oxygen_cost() {
        let cost = Vo2MaxCalculator::oxygen_cost(250.0);
        assert!((cost - 47.4645).abs() < 1e-3);
    }

    #[test]
    fn test_implausible_race_rejected() {
        // 5K in 5 minutes
        let result = Vo2MaxCalculator::estimate_vo2max_from_race_distance(Some(5000.0), Some(300.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_race_and_heart_rate() {
        let vo2max =
            Vo2MaxCalculator::estimate_vo2max_from_race_and_heart_rate(10000.0, 50.0, 170.0, 50.0, 190.0).unwrap();
        // 200 m/min * 0.2 = 40, divided by 120/140, plus 3.5
        assert!((vo2max - 50.1667).abs() < 1e-3);
    }
}
