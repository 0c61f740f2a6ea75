//! Distance, pace, and duration conversions used by the text export.
//!
//! Internally all distances are meters, all durations are seconds, and all
//! paces are speeds in meters per minute (bigger is faster).

use crate::models::Units;

pub const METERS_PER_KM: f64 = 1000.0;
pub const METERS_PER_MILE: f64 = 1609.34;
pub const METERS_PER_HALF_MARATHON: f64 = 13.1 * METERS_PER_MILE;
pub const METERS_PER_MARATHON: f64 = 26.2 * METERS_PER_MILE;

pub fn meters_to_km(meters: f64) -> f64 {
    meters / METERS_PER_KM
}

pub fn km_to_meters(km: f64) -> f64 {
    km * METERS_PER_KM
}

/// "45 minutes", "1 minute", or "30 seconds"
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0).round() as u64;
    if seconds >= 60 && seconds % 60 == 0 {
        let minutes = seconds / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", minutes)
        }
    } else if seconds >= 60 {
        format!("{}:{:02} minutes", seconds / 60, seconds % 60)
    } else {
        format!("{} seconds", seconds)
    }
}

/// Short distances stay in meters (track repeats), longer ones use km or miles
pub fn format_distance(units: Units, meters: f64) -> String {
    if meters < METERS_PER_KM {
        return format!("{} meters", meters.round() as u64);
    }
    match units {
        Units::Metric => format!("{:.2} km", meters / METERS_PER_KM),
        Units::Imperial => format!("{:.2} miles", meters / METERS_PER_MILE),
    }
}

/// Formats a speed in meters/minute as minutes per km or per mile
pub fn format_pace(units: Units, meters_per_minute: f64) -> String {
    if !meters_per_minute.is_finite() || meters_per_minute <= 0.0 {
        return "--".to_string();
    }
    let (unit_meters, label) = match units {
        Units::Metric => (METERS_PER_KM, "min/km"),
        Units::Imperial => (METERS_PER_MILE, "min/mile"),
    };
    let total_seconds = (unit_meters / meters_per_minute * 60.0).round() as u64;
    format!("{}:{:02} {}", total_seconds / 60, total_seconds % 60, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(600.0), "10 minutes");
        assert_eq!(format_duration(60.0), "1 minute");
        assert_eq!(format_duration(45.0), "45 seconds");
        assert_eq!(format_duration(90.0), "1:30 minutes");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(Units::Metric, 400.0), "400 meters");
        assert_eq!(format_distance(Units::Metric, 5000.0), "5.00 km");
        assert_eq!(format_distance(Units::Imperial, METERS_PER_MILE * 2.0), "2.00 miles");
    }

    #[test]
    fn test_format_pace() {
        // 200 m/min is 5:00 per km
        assert_eq!(format_pace(Units::Metric, 200.0), "5:00 min/km");
        assert_eq!(format_pace(Units::Metric, 0.0), "--");
        assert!(format_pace(Units::Imperial, 200.0).ends_with("min/mile"));
    }
}
