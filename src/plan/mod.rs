//! Per-sport weekly plan generation
//!
//! Each sport implements [`PlanGenerator`]. Generators never schedule dates,
//! except for the goal event which is pinned to the goal date.

use chrono::NaiveDate;
use rand::RngCore;

use crate::error::Result;
use crate::inputs::{usable, PlanInputs};
use crate::models::{Goal, Sport};
use crate::workout::Workout;

pub mod bike;
pub mod run;
pub mod swim;

pub use bike::BikePlanGenerator;
pub use run::{PlanSearchOutcome, RunPlanGenerator, RunWeek};
pub use swim::SwimPlanGenerator;

/// Interval distances, in meters, that generated sessions snap to
pub const COMMON_INTERVAL_DISTANCES: [f64; 15] = [
    400.0, 800.0, 1000.0, 1200.0, 1600.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0, 8000.0,
    10000.0, 12000.0, 15000.0, 20000.0,
];

/// Power fractions separating easy, moderate, and hard riding
const MODERATE_POWER: f64 = 0.85;
const HARD_POWER: f64 = 1.05;

/// Contract shared by the run, bike, and swim generators
pub trait PlanGenerator {
    /// Sport this generator plans
    fn sport(&self) -> Sport;

    /// True if a plan toward the goal can be generated with these inputs
    fn is_workout_plan_possible(&self, inputs: &PlanInputs) -> bool;

    /// Workouts for the coming week, unscheduled
    fn gen_workouts_for_next_week(
        &self,
        inputs: &PlanInputs,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Workout>>;
}

/// Marathon and iron distance goals taper for two weeks, half distances for one
pub fn is_in_taper(weeks_until_goal: Option<f64>, goal: Goal) -> bool {
    match (weeks_until_goal, goal.taper_weeks()) {
        (Some(weeks), Some(taper)) => weeks <= taper,
        _ => false,
    }
}

/// The goal event happens within the coming week
pub fn is_goal_week(goal: Goal, weeks_until_goal: Option<f64>, goal_date: Option<NaiveDate>) -> bool {
    goal != Goal::Fitness && goal_date.is_some() && weeks_until_goal.is_some_and(|w| w < 1.0)
}

/// Four weeks of non-decreasing total intensity call for a step down.
///
/// Weeks are ordered most recent first.
pub fn is_time_for_an_easy_week(total_intensity_by_week: &[Option<f64>; 4]) -> bool {
    match total_intensity_by_week.map(usable) {
        [Some(w1), Some(w2), Some(w3), Some(w4)] => w1 >= w2 && w2 >= w3 && w3 >= w4,
        _ => false,
    }
}

/// Nearest entry of [`COMMON_INTERVAL_DISTANCES`]
pub fn nearest_common_distance(meters: f64) -> f64 {
    COMMON_INTERVAL_DISTANCES
        .iter()
        .copied()
        .min_by(|a, b| (a - meters).abs().total_cmp(&(b - meters).abs()))
        .unwrap_or(COMMON_INTERVAL_DISTANCES[0])
}

/// Effort bucket of a training segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityBucket {
    Easy = 0,
    Moderate = 1,
    Hard = 2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketTotals {
    pub seconds: f64,
    pub meters: f64,
}

/// Time and distance accumulated per effort bucket for one candidate week
#[derive(Debug, Clone, Default)]
pub struct IntensityDistribution {
    buckets: [BucketTotals; 3],
}

impl IntensityDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Below tempo pace is easy, from tempo up to speed pace is moderate, at or above speed pace is hard
    pub fn classify_pace(pace: f64, tempo_pace: f64, speed_pace: f64) -> IntensityBucket {
        if pace >= speed_pace {
            IntensityBucket::Hard
        } else if pace >= tempo_pace {
            IntensityBucket::Moderate
        } else {
            IntensityBucket::Easy
        }
    }

    pub fn classify_power(power: f64) -> IntensityBucket {
        if power >= HARD_POWER {
            IntensityBucket::Hard
        } else if power >= MODERATE_POWER {
            IntensityBucket::Moderate
        } else {
            IntensityBucket::Easy
        }
    }

    pub fn add(&mut self, bucket: IntensityBucket, seconds: f64, meters: f64) {
        let totals = &mut self.buckets[bucket as usize];
        totals.seconds += seconds;
        totals.meters += meters;
    }

    /// Adds every segment of a workout. Warmups, cooldowns, and recoveries count as easy.
    pub fn add_workout(&mut self, workout: &Workout, tempo_pace: f64, speed_pace: f64) {
        for segment in [workout.warmup, workout.cooldown].iter().flatten() {
            self.add(IntensityBucket::Easy, segment.duration_secs, 0.0);
        }

        for interval in &workout.intervals {
            let repeat = interval.repeat as f64;

            let work_secs = interval.work_secs();
            let work_meters = if interval.distance_meters > 0.0 {
                interval.distance_meters
            } else {
                work_secs * interval.pace / 60.0
            };
            let bucket = if interval.pace > 0.0 {
                Self::classify_pace(interval.pace, tempo_pace, speed_pace)
            } else if interval.power > 0.0 {
                Self::classify_power(interval.power)
            } else {
                IntensityBucket::Easy
            };
            self.add(bucket, repeat * work_secs, repeat * work_meters);

            let recovery_secs = interval.recovery_secs();
            if recovery_secs > 0.0 {
                let recovery_meters = if interval.recovery_distance_meters > 0.0 {
                    interval.recovery_distance_meters
                } else {
                    recovery_secs * interval.recovery_pace / 60.0
                };
                self.add(IntensityBucket::Easy, repeat * recovery_secs, repeat * recovery_meters);
            }
        }
    }

    pub fn totals(&self, bucket: IntensityBucket) -> BucketTotals {
        self.buckets[bucket as usize]
    }

    pub fn total_seconds(&self) -> f64 {
        self.buckets.iter().map(|b| b.seconds).sum()
    }

    /// Share of time spent in each bucket, as percentages
    pub fn percentages(&self) -> [f64; 3] {
        let total = self.total_seconds();
        if total <= 0.0 {
            return [0.0; 3];
        }
        self.buckets.map(|b| b.seconds / total * 100.0)
    }

    /// Sum of absolute differences between this week's split and a target
    pub fn deviation_from(&self, target: [f64; 3]) -> f64 {
        self.percentages()
            .iter()
            .zip(target)
            .map(|(actual, wanted)| (actual - wanted).abs())
            .sum()
    }
}
