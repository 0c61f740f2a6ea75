//! Cycling plan generation
//!
//! An easy ride plus one interval session drawn from a fixed catalog. Longer
//! goals shift the draw toward longer, lower intensity intervals.

use rand::distributions::{Distribution, WeightedIndex};
use rand::RngCore;
use statrs::distribution::{Continuous, Normal};
use tracing::{debug, info};

use super::{is_goal_week, is_in_taper, PlanGenerator};
use crate::error::{Result, TrainPlanError};
use crate::inputs::{usable, PlanInputs};
use crate::models::{Goal, Sport, WorkoutType};
use crate::workout::{Workout, WorkoutFactory};

const EASY_RIDE_POWER: f64 = 0.60;
const DEFAULT_EASY_RIDE_SECS: f64 = 3600.0;
const TAPER_EASY_RIDE_SECS: f64 = 2700.0;
const INTERVAL_RECOVERY_POWER: f64 = 0.50;
const WARMUP_SECS: f64 = 600.0;
const COOLDOWN_SECS: f64 = 600.0;
/// Used to estimate how long the bike leg of a triathlon takes (30 km/h)
const EVENT_RIDE_METERS_PER_MINUTE: f64 = 500.0;

/// One catalog entry: repeats of `seconds` at `power` (fraction of FTP)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalSession {
    pub repeats: u32,
    pub seconds: f64,
    pub power: f64,
}

impl IntervalSession {
    const fn new(repeats: u32, seconds: f64, power: f64) -> Self {
        Self { repeats, seconds, power }
    }

    pub fn workout_type(&self) -> WorkoutType {
        if self.power >= 1.05 {
            WorkoutType::SpeedIntervalRide
        } else if self.power >= 0.95 {
            WorkoutType::TempoRide
        } else {
            WorkoutType::SweetSpotRide
        }
    }
}

/// Ordered from short and hard to long and steady
pub const INTERVAL_CATALOG: [IntervalSession; 9] = [
    IntervalSession::new(3, 300.0, 1.10),
    IntervalSession::new(4, 240.0, 1.10),
    IntervalSession::new(4, 360.0, 1.05),
    IntervalSession::new(5, 300.0, 1.05),
    IntervalSession::new(3, 600.0, 0.95),
    IntervalSession::new(4, 480.0, 0.95),
    IntervalSession::new(3, 900.0, 0.90),
    IntervalSession::new(4, 720.0, 0.90),
    IntervalSession::new(5, 600.0, 0.88),
];

/// Gaussian weights over the catalog, centered on the midpoint and shifted toward
/// the steady end for long goals
pub fn catalog_weights(goal: Goal) -> Result<Vec<f64>> {
    let len = INTERVAL_CATALOG.len() as f64;
    let bike_distance = goal.bike_distance_meters();
    let bias = if bike_distance >= 90_000.0 {
        len / 4.0
    } else if bike_distance >= 40_000.0 {
        len / 8.0
    } else {
        0.0
    };
    let mean = (len - 1.0) / 2.0 + bias;
    let normal = Normal::new(mean, len / 4.0)
        .map_err(|e| TrainPlanError::Internal(format!("invalid catalog distribution: {}", e)))?;

    Ok((0..INTERVAL_CATALOG.len()).map(|i| normal.pdf(i as f64)).collect())
}

pub struct BikePlanGenerator {
    user_id: String,
}

impl BikePlanGenerator {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
        }
    }

    fn easy_ride(&self, seconds: f64) -> Workout {
        let mut workout = WorkoutFactory::create(WorkoutType::EasyRide, &self.user_id);
        workout.add_time_and_power_interval(1, seconds, EASY_RIDE_POWER, 0.0, 0.0);
        workout
    }

    fn interval_session(&self, goal: Goal, rng: &mut dyn RngCore) -> Result<Workout> {
        let weights = catalog_weights(goal)?;
        let index = WeightedIndex::new(&weights)
            .map_err(|e| TrainPlanError::Internal(format!("invalid catalog weights: {}", e)))?;
        let session = INTERVAL_CATALOG[index.sample(rng)];
        debug!(?session, "Picked bike interval session");

        let mut workout = WorkoutFactory::create(session.workout_type(), &self.user_id);
        workout.add_warmup(WARMUP_SECS);
        workout.add_time_and_power_interval(
            session.repeats,
            session.seconds,
            session.power,
            session.seconds / 2.0,
            INTERVAL_RECOVERY_POWER,
        );
        workout.add_cooldown(COOLDOWN_SECS);
        Ok(workout)
    }
}

impl PlanGenerator for BikePlanGenerator {
    fn sport(&self) -> Sport {
        Sport::Cycling
    }

    fn is_workout_plan_possible(&self, inputs: &PlanInputs) -> bool {
        inputs.goal.bike_distance_meters() <= 0.0 || inputs.has_bicycle
    }

    fn gen_workouts_for_next_week(&self, inputs: &PlanInputs, rng: &mut dyn RngCore) -> Result<Vec<Workout>> {
        let goal = inputs.goal;
        let weeks_until_goal = inputs.weeks_until_goal();

        // Triathlon events are owned by the bike plan
        if goal.is_triathlon() && is_goal_week(goal, weeks_until_goal, inputs.goal_date) {
            let mut workouts = Vec::new();
            if let Some(date) = inputs.goal_date {
                let mut event = WorkoutFactory::create_event(goal, date, &self.user_id);
                let ride_secs = goal.bike_distance_meters() / EVENT_RIDE_METERS_PER_MINUTE * 60.0;
                event.add_time_and_power_interval(1, ride_secs, 0.75, 0.0, 0.0);
                event.calculate_estimated_intensity_score(0.0);
                info!(goal = %goal, %date, "Planned goal event");
                workouts.push(event);
            }
            return Ok(workouts);
        }

        if !inputs.has_bicycle || !(goal == Goal::Fitness || goal.is_triathlon()) {
            return Ok(Vec::new());
        }

        let mut workouts = Vec::new();
        if is_in_taper(weeks_until_goal, goal) {
            workouts.push(self.easy_ride(TAPER_EASY_RIDE_SECS));
        } else {
            let easy_secs = usable(inputs.cycling.avg_duration_four_weeks).unwrap_or(DEFAULT_EASY_RIDE_SECS);
            workouts.push(self.easy_ride(easy_secs));
            workouts.push(self.interval_session(goal, rng)?);
        }

        for workout in &mut workouts {
            workout.calculate_estimated_intensity_score(0.0);
        }
        info!(count = workouts.len(), "Generated bike workouts");
        Ok(workouts)
    }
}
