//! The prescribed workout entity and its factory
//!
//! A workout is a warmup, an ordered list of intervals, and a cooldown.
//! Paces are speeds in meters per minute; powers are fractions of FTP.
//! Generators create workouts unscheduled; the scheduler sets
//! `scheduled_time` exactly once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::calculators::StrainCalculator;
use crate::error::{Result, TrainPlanError};
use crate::models::{Goal, Sport, Units, WorkoutKind, WorkoutType};
use crate::units::{format_distance, format_duration, format_pace};

/// Warmup and cooldown intensity band, as fractions of FTP
pub const WARMUP_POWER_LOW: f64 = 0.25;
pub const WARMUP_POWER_HIGH: f64 = 0.75;

/// Intensity assumed for segments with neither a pace nor a power target
pub const UNSPECIFIED_EFFORT: f64 = 0.65;

/// Warmup or cooldown block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub duration_secs: f64,
    pub power_low: f64,
    pub power_high: f64,
}

impl Segment {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            power_low: WARMUP_POWER_LOW,
            power_high: WARMUP_POWER_HIGH,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.power_low + self.power_high) / 2.0
    }
}

/// One repeated work/recovery block.
///
/// Each side is expressed either by distance or by duration, and targets
/// either a pace or a power. Unused fields are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Interval {
    pub repeat: u32,
    pub distance_meters: f64,
    pub duration_secs: f64,
    pub pace: f64,
    pub power: f64,
    pub recovery_distance_meters: f64,
    pub recovery_duration_secs: f64,
    pub recovery_pace: f64,
    pub recovery_power: f64,
}

impl Interval {
    /// Seconds spent in one work repetition
    pub fn work_secs(&self) -> f64 {
        segment_secs(self.duration_secs, self.distance_meters, self.pace)
    }

    /// Seconds spent in one recovery
    pub fn recovery_secs(&self) -> f64 {
        segment_secs(self.recovery_duration_secs, self.recovery_distance_meters, self.recovery_pace)
    }
}

fn segment_secs(duration_secs: f64, distance_meters: f64, pace: f64) -> f64 {
    if duration_secs > 0.0 {
        duration_secs
    } else if distance_meters > 0.0 && pace > 0.0 {
        distance_meters / pace * 60.0
    } else {
        0.0
    }
}

/// Strain for one block, whatever its target
fn segment_strain(secs: f64, pace: f64, power: f64, threshold_pace: f64) -> f64 {
    if secs <= 0.0 {
        0.0
    } else if power > 0.0 {
        StrainCalculator::calculate_strain_score_from_power(secs, power, 1.0)
    } else if pace > 0.0 {
        StrainCalculator::estimate_strain_score(secs, pace, threshold_pace)
    } else {
        StrainCalculator::calculate_strain_score_from_power(secs, UNSPECIFIED_EFFORT, 1.0)
    }
}

/// A single prescribed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    #[serde(default)]
    pub user_id: String,

    #[serde(rename = "type")]
    pub workout_type: WorkoutType,

    #[serde(rename = "sport_type", default)]
    pub sport: Option<Sport>,

    /// Day the workout is scheduled for; persisted as a unix timestamp
    #[serde(default, with = "timestamp_date", skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<NaiveDate>,

    #[serde(default)]
    pub warmup: Option<Segment>,

    #[serde(default)]
    pub cooldown: Option<Segment>,

    #[serde(default)]
    pub intervals: Vec<Interval>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_intensity_score: Option<f64>,

    #[serde(default)]
    pub needs_rest_day_afterwards: bool,

    #[serde(default)]
    pub can_be_doubled: bool,
}

impl Workout {
    pub fn new(workout_type: WorkoutType, sport: Option<Sport>, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            workout_type,
            sport,
            scheduled_time: None,
            warmup: None,
            cooldown: None,
            intervals: Vec::new(),
            estimated_intensity_score: None,
            needs_rest_day_afterwards: false,
            can_be_doubled: false,
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        self.workout_type.kind()
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_time.is_some()
    }

    pub fn add_warmup(&mut self, seconds: f64) {
        self.warmup = Some(Segment::new(seconds));
    }

    pub fn add_cooldown(&mut self, seconds: f64) {
        self.cooldown = Some(Segment::new(seconds));
    }

    /// Appends a distance based interval. Recovery is dropped for single repeats.
    pub fn add_distance_interval(
        &mut self,
        repeat: u32,
        distance_meters: f64,
        pace: f64,
        recovery_distance_meters: f64,
        recovery_pace: f64,
    ) {
        let mut interval = Interval {
            repeat,
            distance_meters,
            pace,
            ..Default::default()
        };
        if repeat > 1 {
            interval.recovery_distance_meters = recovery_distance_meters;
            interval.recovery_pace = recovery_pace;
        }
        self.intervals.push(interval);
    }

    /// Appends a time based interval at a pace
    pub fn add_time_interval(
        &mut self,
        repeat: u32,
        duration_secs: f64,
        pace: f64,
        recovery_secs: f64,
        recovery_pace: f64,
    ) {
        let mut interval = Interval {
            repeat,
            duration_secs,
            pace,
            ..Default::default()
        };
        if repeat > 1 {
            interval.recovery_duration_secs = recovery_secs;
            interval.recovery_pace = recovery_pace;
        }
        self.intervals.push(interval);
    }

    /// Appends a time based interval at a fraction of FTP
    pub fn add_time_and_power_interval(
        &mut self,
        repeat: u32,
        duration_secs: f64,
        power: f64,
        recovery_secs: f64,
        recovery_power: f64,
    ) {
        let mut interval = Interval {
            repeat,
            duration_secs,
            power,
            ..Default::default()
        };
        if repeat > 1 {
            interval.recovery_duration_secs = recovery_secs;
            interval.recovery_power = recovery_power;
        }
        self.intervals.push(interval);
    }

    /// Distance covered by the prescribed distances, in meters
    pub fn total_workout_distance_meters(&self) -> f64 {
        self.intervals
            .iter()
            .map(|i| i.repeat as f64 * (i.distance_meters + i.recovery_distance_meters))
            .sum()
    }

    /// Duration including warmup and cooldown, in seconds
    pub fn total_workout_duration_secs(&self) -> f64 {
        let bookends: f64 = [self.warmup, self.cooldown]
            .iter()
            .flatten()
            .map(|s| s.duration_secs)
            .sum();
        let intervals: f64 = self
            .intervals
            .iter()
            .map(|i| i.repeat as f64 * (i.work_secs() + i.recovery_secs()))
            .sum();
        bookends + intervals
    }

    /// Computes and stores the estimated intensity score.
    ///
    /// Pace targets are scored against `threshold_pace` (meters per minute),
    /// power targets against FTP, and untargeted time at a moderate effort.
    pub fn calculate_estimated_intensity_score(&mut self, threshold_pace: f64) -> f64 {
        let mut score: f64 = [self.warmup, self.cooldown]
            .iter()
            .flatten()
            .map(|s| segment_strain(s.duration_secs, 0.0, s.midpoint(), threshold_pace))
            .sum();

        for interval in &self.intervals {
            let work = segment_strain(interval.work_secs(), interval.pace, interval.power, threshold_pace);
            let recovery = if interval.recovery_secs() > 0.0 {
                segment_strain(
                    interval.recovery_secs(),
                    interval.recovery_pace,
                    interval.recovery_power,
                    threshold_pace,
                )
            } else {
                0.0
            };
            score += interval.repeat as f64 * (work + recovery);
        }

        self.estimated_intensity_score = Some(score);
        score
    }

    /// Human readable description, used for calendars and notifications
    pub fn export_to_text(&self, units: Units) -> String {
        let mut result = String::new();

        if let Some(sport) = self.sport {
            result.push_str(&format!("{}\n", sport));
        }
        result.push_str(&format!("{}\n", self.workout_type));

        if let Some(warmup) = &self.warmup {
            result.push_str(&format!("Warmup: {}.\n", format_duration(warmup.duration_secs)));
        }

        if self.intervals.is_empty() && self.kind() == WorkoutKind::Ordinary {
            result.push_str("Steady state, no specified intensity.\n");
        }
        for interval in &self.intervals {
            result.push_str(&describe_interval(interval, units));
        }

        if let Some(cooldown) = &self.cooldown {
            result.push_str(&format!("Cooldown: {}.\n", format_duration(cooldown.duration_secs)));
        }

        match self.kind() {
            WorkoutKind::Event => result.push_str("Goal Event!\n"),
            _ => result.push_str(&format!("Purpose: {}\n", self.workout_type.purpose())),
        }

        if let Some(score) = self.estimated_intensity_score {
            result.push_str(&format!("Estimated Intensity Score: {:.1}\n", score));
        }

        result
    }

    /// JSON object of the persisted fields plus the text description
    pub fn export_to_json_str(&self, units: Units) -> Result<String> {
        let mut map = self.to_dict()?;
        map.insert("description".to_string(), Value::String(self.export_to_text(units)));
        Ok(serde_json::to_string(&Value::Object(map))?)
    }

    pub fn to_dict(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(TrainPlanError::Internal(format!(
                "workout serialized to a non-object value: {}",
                other
            ))),
        }
    }

    /// Rebuilds a workout from its persisted mapping. A missing id gets a fresh one.
    pub fn from_dict(map: &Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(map.clone()))?)
    }
}

fn describe_interval(interval: &Interval, units: Units) -> String {
    let mut text = String::from("Interval: ");

    if interval.repeat > 1 {
        text.push_str(&format!("{} x ", interval.repeat));
    }

    if interval.distance_meters > 0.0 {
        text.push_str(&format_distance(units, interval.distance_meters));
    } else if interval.duration_secs > 0.0 {
        text.push_str(&format_duration(interval.duration_secs));
    }

    if interval.pace > 0.0 {
        text.push_str(&format!(" at {}", format_pace(units, interval.pace)));
    } else if interval.power > 0.0 {
        text.push_str(&format!(" at {:.0}% FTP", interval.power * 100.0));
    }

    if interval.recovery_distance_meters > 0.0 {
        text.push_str(&format!(
            " with {} recovery",
            format_distance(units, interval.recovery_distance_meters)
        ));
    } else if interval.recovery_duration_secs > 0.0 {
        text.push_str(&format!(
            " with {} recovery",
            format_duration(interval.recovery_duration_secs)
        ));
    }

    if interval.recovery_pace > 0.0 {
        text.push_str(&format!(" at {}", format_pace(units, interval.recovery_pace)));
    } else if interval.recovery_power > 0.0 {
        text.push_str(&format!(" at {:.0}% FTP", interval.recovery_power * 100.0));
    }

    text.push_str(".\n");
    text
}

/// Builds workouts tagged with their kind and scheduler hints
pub struct WorkoutFactory;

impl WorkoutFactory {
    pub fn create(workout_type: WorkoutType, user_id: &str) -> Workout {
        let mut workout = Workout::new(workout_type, workout_type.sport(), user_id);
        workout.needs_rest_day_afterwards = matches!(
            workout_type,
            WorkoutType::LongRun
                | WorkoutType::SpeedRun
                | WorkoutType::ThresholdRun
                | WorkoutType::SpeedIntervalRide
                | WorkoutType::Event
        );
        workout.can_be_doubled = matches!(
            workout_type,
            WorkoutType::EasyRun
                | WorkoutType::FreeRun
                | WorkoutType::EasyRide
                | WorkoutType::PoolSwim
                | WorkoutType::TechniqueSwim
        );
        workout
    }

    /// The goal race itself, already scheduled on the goal date
    pub fn create_event(goal: Goal, date: NaiveDate, user_id: &str) -> Workout {
        let mut workout = Self::create(WorkoutType::Event, user_id);
        workout.sport = Some(goal.primary_sport());
        workout.scheduled_time = Some(date);
        workout
    }
}

/// `Option<NaiveDate>` <-> unix timestamp at midnight UTC
mod timestamp_date {
    use chrono::{DateTime, NaiveDate, NaiveTime};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => {
                serializer.serialize_some(&date.and_time(NaiveTime::MIN).and_utc().timestamp())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<f64>::deserialize(deserializer)? {
            Some(secs) => DateTime::from_timestamp(secs.floor() as i64, 0)
                .map(|dt| Some(dt.date_naive()))
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}", secs))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tempo_run() -> Workout {
        let mut workout = WorkoutFactory::create(WorkoutType::TempoRun, "athlete");
        workout.add_warmup(600.0);
        workout.add_distance_interval(1, 5000.0, 250.0, 0.0, 0.0);
        workout.add_cooldown(600.0);
        workout
    }

    #[test]
    fn test_factory_tags_kind_and_hints() {
        let long_run = WorkoutFactory::create(WorkoutType::LongRun, "athlete");
        assert_eq!(long_run.kind(), WorkoutKind::Ordinary);
        assert_eq!(long_run.sport, Some(Sport::Running));
        assert!(long_run.needs_rest_day_afterwards);
        assert!(!long_run.can_be_doubled);

        let rest = WorkoutFactory::create(WorkoutType::Rest, "athlete");
        assert_eq!(rest.kind(), WorkoutKind::Rest);
        assert_eq!(rest.sport, None);

        let date = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let event = WorkoutFactory::create_event(Goal::OlympicTriathlon, date, "athlete");
        assert_eq!(event.kind(), WorkoutKind::Event);
        assert_eq!(event.sport, Some(Sport::Triathlon));
        assert_eq!(event.scheduled_time, Some(date));
    }

    #[test]
    fn test_single_repeat_drops_recovery() {
        let mut workout = WorkoutFactory::create(WorkoutType::SpeedRun, "athlete");
        workout.add_distance_interval(1, 800.0, 300.0, 400.0, 180.0);
        workout.add_distance_interval(4, 800.0, 300.0, 400.0, 180.0);

        assert_eq!(workout.intervals[0].recovery_distance_meters, 0.0);
        assert_eq!(workout.intervals[1].recovery_distance_meters, 400.0);
        assert_eq!(workout.total_workout_distance_meters(), 800.0 + 4.0 * 1200.0);
    }

    #[test]
    fn test_duration_includes_bookends() {
        let workout = tempo_run();
        // 5000 m at 250 m/min is 20 minutes
        assert!((workout.total_workout_duration_secs() - 2400.0).abs() < 1e-9);
    }

    #[test]
    fn test_intensity_score() {
        let mut workout = WorkoutFactory::create(WorkoutType::EasyRide, "athlete");
        workout.add_time_and_power_interval(1, 3600.0, 1.0, 0.0, 0.0);
        assert!((workout.calculate_estimated_intensity_score(0.0) - 100.0).abs() < 1e-9);

        // One hour at threshold pace also scores 100
        let mut workout = WorkoutFactory::create(WorkoutType::TempoRun, "athlete");
        workout.add_distance_interval(1, 15000.0, 250.0, 0.0, 0.0);
        assert!((workout.calculate_estimated_intensity_score(250.0) - 100.0).abs() < 1e-9);
        assert_eq!(workout.estimated_intensity_score.map(|s| s.round()), Some(100.0));
    }

    #[test]
    fn test_warmup_scored_at_band_midpoint() {
        let mut workout = WorkoutFactory::create(WorkoutType::EasyRun, "athlete");
        workout.add_warmup(3600.0);
        // 0.5 squared times 100
        assert!((workout.calculate_estimated_intensity_score(250.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_threshold_pace_does_not_divide_by_zero() {
        let mut workout = tempo_run();
        let score = workout.calculate_estimated_intensity_score(0.0);
        assert!(score.is_finite());
    }

    #[test]
    fn test_export_to_text() {
        let mut workout = tempo_run();
        workout.calculate_estimated_intensity_score(250.0);
        let text = workout.export_to_text(Units::Metric);

        assert!(text.starts_with("Running\nTempo Run\n"));
        assert!(text.contains("Warmup: 10 minutes.\n"));
        assert!(text.contains("Interval: 5.00 km at 4:00 min/km.\n"));
        assert!(text.contains("Purpose: Tempo runs"));
        assert!(text.contains("Estimated Intensity Score:"));

        let mut ride = WorkoutFactory::create(WorkoutType::SweetSpotRide, "athlete");
        ride.add_time_and_power_interval(3, 600.0, 0.9, 300.0, 0.5);
        let text = ride.export_to_text(Units::Imperial);
        assert!(text.contains("Interval: 3 x 10 minutes at 90% FTP with 5 minutes recovery at 50% FTP.\n"));
    }

    #[test]
    fn test_dict_round_trip() {
        let mut workout = tempo_run();
        workout.scheduled_time = NaiveDate::from_ymd_opt(2026, 10, 25);
        workout.calculate_estimated_intensity_score(250.0);

        let dict = workout.to_dict().unwrap();
        assert_eq!(dict["type"], Value::String("Tempo Run".to_string()));
        assert!(dict["scheduled_time"].is_number());

        let restored = Workout::from_dict(&dict).unwrap();
        assert_eq!(restored, workout);
    }

    #[test]
    fn test_from_dict_without_id() {
        let mut dict = Map::new();
        dict.insert("type".to_string(), Value::String("Easy Run".to_string()));
        let workout = Workout::from_dict(&dict).unwrap();

        assert_eq!(workout.workout_type, WorkoutType::EasyRun);
        assert!(workout.scheduled_time.is_none());
        assert!(workout.intervals.is_empty());
    }

    #[test]
    fn test_json_export_has_description() {
        let json = tempo_run().export_to_json_str(Units::Metric).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert!(value["description"].as_str().unwrap().contains("Tempo Run"));
    }
}
