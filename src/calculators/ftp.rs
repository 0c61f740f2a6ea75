use chrono::{DateTime, Utc};

use super::{six_month_cutoff, usable_sample, ActivitySummary};
use crate::error::{Result, TrainPlanError};
use crate::models::Sport;

/// Upper bounds of power zones 1-5 as fractions of FTP; zone 6 is open ended.
///
/// - Z1: Active Recovery, below 55% of FTP
/// - Z2: Endurance, 55-74% of FTP
/// - Z3: Tempo, 75-89% of FTP
/// - Z4: Lactate Threshold, 90-104% of FTP
/// - Z5: VO2 Max, 105-120% of FTP
/// - Z6: Anaerobic Capacity, above 120% of FTP
pub const POWER_ZONE_MULTIPLIERS: [f64; 5] = [0.54, 0.74, 0.89, 1.04, 1.20];

/// Estimates functional threshold power from six months of cycling bests
#[derive(Debug, Clone)]
pub struct FtpCalculator {
    best_20min: Vec<f64>,
    best_1hr: Vec<f64>,
    cutoff_time: DateTime<Utc>,
}

impl FtpCalculator {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            best_20min: Vec::new(),
            best_1hr: Vec::new(),
            cutoff_time: six_month_cutoff(now),
        }
    }

    /// Records the power bests from one activity.
    ///
    /// Non-cycling activities and activities older than six months are ignored.
    pub fn add_activity_data(
        &mut self,
        sport: Sport,
        start_time: DateTime<Utc>,
        summary: &ActivitySummary,
    ) {
        if start_time < self.cutoff_time || sport != Sport::Cycling {
            return;
        }
        if let Some(power) = usable_sample(summary.best_20_min_power) {
            self.best_20min.push(power);
        }
        if let Some(power) = usable_sample(summary.best_1_hour_power) {
            self.best_1hr.push(power);
        }
    }

    pub fn estimate_ftp_from_20_min_power(power: f64) -> f64 {
        power * 0.95
    }

    /// FTP is the larger of the best hour power and 95% of the best 20 minute power
    pub fn estimate(&self) -> Result<f64> {
        let max_20min = self.best_20min.iter().copied().fold(0.0_f64, f64::max);
        let max_1hr = self.best_1hr.iter().copied().fold(0.0_f64, f64::max);

        if max_20min <= 0.0 && max_1hr <= 0.0 {
            return Err(TrainPlanError::insufficient_data(
                "FTP",
                "no cycling power bests in the last six months",
            ));
        }

        Ok(max_1hr.max(Self::estimate_ftp_from_20_min_power(max_20min)))
    }

    /// Zone 1-5 upper bounds, in watts
    pub fn power_training_zones(ftp: f64) -> [f64; 5] {
        POWER_ZONE_MULTIPLIERS.map(|multiplier| ftp * multiplier)
    }

    /// Counts how many power readings fall into each of the six zones
    pub fn compute_power_zone_distribution(ftp: f64, powers: &[f64]) -> [u32; 6] {
        let zones = Self::power_training_zones(ftp);
        let mut distribution = [0u32; 6];

        for &power in powers {
            let index = zones
                .iter()
                .position(|&cutoff| power <= cutoff)
                .unwrap_or(zones.len());
            distribution[index] += 1;
        }

        distribution
    }
}
