use chrono::{DateTime, Utc};

use super::{six_month_cutoff, usable_sample, ActivitySummary};

/// Upper bounds of heart rate zones 1-5 as fractions of maximum (or reserve)
pub const HEART_RATE_ZONE_MULTIPLIERS: [f64; 5] = [0.60, 0.70, 0.80, 0.90, 1.00];

/// Estimates maximum heart rate and heart rate training zones
#[derive(Debug, Clone)]
pub struct HeartRateCalculator {
    rates: Vec<f64>,
    cutoff_time: DateTime<Utc>,
}

impl HeartRateCalculator {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            rates: Vec::new(),
            cutoff_time: six_month_cutoff(now),
        }
    }

    /// Records the maximum heart rate from one activity, if recent enough
    pub fn add_activity_data(&mut self, start_time: DateTime<Utc>, summary: &ActivitySummary) {
        if start_time < self.cutoff_time {
            return;
        }
        if let Some(rate) = usable_sample(summary.max_heart_rate) {
            self.rates.push(rate);
        }
    }

    /// Average of the recorded maximums, or `207 - 0.7 * age` when nothing was recorded
    pub fn estimate_max_hr(&self, age_in_years: f64) -> f64 {
        if !self.rates.is_empty() {
            return self.rates.iter().sum::<f64>() / self.rates.len() as f64;
        }
        207.0 - (7.0 * age_in_years) / 10.0
    }

    /// Zone 1-5 upper bounds, in beats per minute.
    ///
    /// With a usable resting heart rate the Karvonen (heart rate reserve)
    /// method is used; otherwise zones are plain fractions of the maximum.
    /// A missing maximum falls back to the age-based estimate.
    pub fn training_zones(
        &self,
        max_hr: Option<f64>,
        resting_hr: Option<f64>,
        age_in_years: f64,
    ) -> [f64; 5] {
        let max_hr = usable_sample(max_hr).unwrap_or_else(|| self.estimate_max_hr(age_in_years));

        match usable_sample(resting_hr).filter(|resting| *resting < max_hr) {
            Some(resting) => {
                HEART_RATE_ZONE_MULTIPLIERS.map(|m| ((max_hr - resting) * m) + resting)
            }
            None => HEART_RATE_ZONE_MULTIPLIERS.map(|m| max_hr * m),
        }
    }
}
