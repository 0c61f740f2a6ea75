//! Estimates the load a session places on the body.
//!
//! The speed form is normalised so that one hour at threshold scores 100.

/// Thresholds below this are treated as "no data"
const MIN_THRESHOLD: f64 = 0.1;

pub struct StrainCalculator;

impl StrainCalculator {
    /// Duration-weighted intensity relative to threshold.
    ///
    /// `avg_speed` and `threshold_speed` must share units (the planner uses
    /// meters per minute). Returns 0 when the threshold is missing or near zero.
    pub fn estimate_strain_score(duration_secs: f64, avg_speed: f64, threshold_speed: f64) -> f64 {
        if !threshold_speed.is_finite() || threshold_speed < MIN_THRESHOLD {
            return 0.0;
        }
        if !duration_secs.is_finite() || !avg_speed.is_finite() {
            return 0.0;
        }
        (duration_secs / 3600.0) * (avg_speed / threshold_speed) * 100.0
    }

    /// Power based strain: `(t * IF^2) / (FTP * 36)` where `IF = NP / FTP`.
    ///
    /// Intensity scoring passes `ftp = 1.0` with the effort fraction as `np`.
    pub fn calculate_strain_score_from_power(duration_secs: f64, np: f64, ftp: f64) -> f64 {
        if !ftp.is_finite() || ftp < MIN_THRESHOLD {
            return 0.0;
        }
        if !duration_secs.is_finite() || !np.is_finite() {
            return 0.0;
        }
        let intensity_factor = np / ftp;
        (duration_secs * intensity_factor * intensity_factor) / (ftp * 36.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_at_threshold_scores_100() {
        let score = StrainCalculator::estimate_strain_score(3600.0, 250.0, 250.0);
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_power_strain_divides_by_ftp() {
        // 3600 * 1.0^2 / (250 * 36)
        let score = StrainCalculator::calculate_strain_score_from_power(3600.0, 250.0, 250.0);
        assert!((score - 0.4).abs() < 1e-9);

        // 3600 * 0.8^2 / (250 * 36)
        let score = StrainCalculator::calculate_strain_score_from_power(3600.0, 200.0, 250.0);
        assert!((score - 0.256).abs() < 1e-9);
    }

    #[test]
    fn test_power_strain_scales_with_intensity_squared() {
        let easy = StrainCalculator::calculate_strain_score_from_power(3600.0, 150.0, 300.0);
        let hard = StrainCalculator::calculate_strain_score_from_power(3600.0, 300.0, 300.0);
        assert!((hard - 4.0 * easy).abs() < 1e-9);
    }

    #[test]
    fn test_unit_ftp_scores_effort_fraction() {
        // 3600 * 0.8^2 / 36
        let score = StrainCalculator::calculate_strain_score_from_power(3600.0, 0.8, 1.0);
        assert!((score - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_threshold_is_no_data() {
        assert_eq!(StrainCalculator::estimate_strain_score(1800.0, 200.0, 0.0), 0.0);
        assert_eq!(StrainCalculator::calculate_strain_score_from_power(1800.0, 200.0, 0.01), 0.0);
        assert_eq!(StrainCalculator::estimate_strain_score(1800.0, 200.0, f64::NAN), 0.0);
    }
}
