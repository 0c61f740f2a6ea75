//! Running plan generation
//!
//! A structured week is a long run, two easy runs, a tempo run, and for
//! speed-focused athletes with enough volume, a speed or threshold session.
//! Several candidate weeks are generated and the one whose easy/moderate/hard
//! split best matches the training philosophy wins.

use rand::{Rng, RngCore};
use tracing::{debug, info, warn};

use super::{
    is_goal_week, is_in_taper, is_time_for_an_easy_week, nearest_common_distance,
    IntensityDistribution, PlanGenerator,
};
use crate::error::Result;
use crate::inputs::{require, usable, PlanInputs};
use crate::models::{Goal, GoalType, Sport, WorkoutType};
use crate::units::{km_to_meters, meters_to_km};
use crate::workout::{Workout, WorkoutFactory};

/// Assumed weekly growth in long run capacity
pub const LONG_RUN_GROWTH_RATE: f64 = 0.10;

/// Applied to the longest run after three straight weeks of growth
const RECOVERY_WEEK_DISCOUNT: f64 = 0.75;

/// Below this the athlete gets free runs instead of a structured week
const MIN_STRUCTURED_LONG_RUN_METERS: f64 = 5000.0;

/// Weekly volume needed before speed or threshold sessions are added
const QUALITY_SESSION_MIN_WEEKLY_METERS: f64 = 30_000.0;

const FREE_RUN_SECS: f64 = 1800.0;
const WARMUP_SECS: f64 = 600.0;
const COOLDOWN_SECS: f64 = 600.0;
const SHAKEOUT_RUN_METERS: f64 = 3000.0;
const SHAKEOUT_RUN_SECS: f64 = 1200.0;
const SPEED_REPEAT_DISTANCES: [f64; 3] = [400.0, 800.0, 1000.0];

/// Longest long run worth doing for a goal distance, both in km
pub fn max_long_run_distance_km(goal_km: f64) -> f64 {
    -0.0049 * goal_km * goal_km + 0.9 * goal_km + 3.5
}

/// Long run reachable from `base_km` after `weeks` of compounded growth
pub fn max_attainable_distance_km(base_km: f64, weeks: f64) -> f64 {
    let rate = LONG_RUN_GROWTH_RATE;
    base_km * (1.0 + rate / 52.0).powf(52.0 * weeks)
}

/// Long run distance the goal requires, in meters
pub fn long_run_needed_meters(goal: Goal) -> f64 {
    let goal_km = meters_to_km(goal.run_distance_meters());
    km_to_meters(max_long_run_distance_km(goal_km).min(goal_km))
}

/// Weeks left to build before the taper starts
fn build_weeks(goal: Goal, weeks_until_goal: f64) -> f64 {
    (weeks_until_goal - goal.taper_weeks().unwrap_or(0.0)).max(0.0)
}

/// How the week was chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanSearchOutcome {
    /// Goal week or free runs; no candidate search was needed
    Unstructured,
    /// The best eligible candidate, found on the given attempt
    Eligible { attempt: usize, deviation: f64 },
    /// No candidate met the week-over-week intensity rule; the last one is returned
    Exhausted { attempts: usize },
}

/// A generated running week and how it was chosen
#[derive(Debug, Clone)]
pub struct RunWeek {
    pub workouts: Vec<Workout>,
    pub outcome: PlanSearchOutcome,
}

#[derive(Debug, Clone, Copy)]
struct RunPaces {
    long_run: f64,
    easy: f64,
    tempo: f64,
    threshold: f64,
    speed: f64,
    short_interval: f64,
}

impl RunPaces {
    fn from_inputs(inputs: &PlanInputs) -> Result<Self> {
        let paces = &inputs.paces;
        let tempo = require(paces.tempo, "run plan", "tempo run pace")?;
        let speed = require(paces.speed, "run plan", "speed session pace")?;
        Ok(Self {
            long_run: require(paces.long_run, "run plan", "long run pace")?,
            easy: require(paces.easy, "run plan", "easy run pace")?,
            tempo,
            threshold: usable(paces.threshold).unwrap_or(tempo),
            speed,
            short_interval: usable(paces.short_interval).unwrap_or(speed),
        })
    }
}

/// Per-week limits shared by every candidate
#[derive(Debug, Clone, Copy)]
struct WeekLimits {
    in_taper: bool,
    long_run_ceiling: f64,
    easy_run_ceiling: f64,
    tempo_run_ceiling: f64,
    quality_session: bool,
}

pub struct RunPlanGenerator {
    user_id: String,
    max_plan_candidates: usize,
}

impl RunPlanGenerator {
    pub fn new(user_id: &str, max_plan_candidates: usize) -> Self {
        Self {
            user_id: user_id.to_string(),
            max_plan_candidates: max_plan_candidates.max(1),
        }
    }

    /// Generates the week and reports how the candidate search went
    pub fn gen_week(&self, inputs: &PlanInputs, rng: &mut dyn RngCore) -> Result<RunWeek> {
        let goal = inputs.goal;
        let weeks_until_goal = inputs.weeks_until_goal();

        if is_goal_week(goal, weeks_until_goal, inputs.goal_date) {
            info!(goal = %goal, "Goal week, planning the event");
            return Ok(RunWeek {
                workouts: self.goal_week(inputs),
                outcome: PlanSearchOutcome::Unstructured,
            });
        }

        let history = &inputs.running;
        let Some(mut longest) = history
            .longest_in_four_weeks()
            .filter(|longest| *longest >= MIN_STRUCTURED_LONG_RUN_METERS)
        else {
            warn!(
                sessions = history.sessions_four_weeks,
                "Not enough running history for a structured week, using free runs"
            );
            return Ok(RunWeek {
                workouts: self.free_runs(history.sessions_four_weeks),
                outcome: PlanSearchOutcome::Unstructured,
            });
        };

        let paces = RunPaces::from_inputs(inputs)?;

        if history.longest_session_increasing() {
            longest *= RECOVERY_WEEK_DISCOUNT;
            debug!(longest, "Long runs have not dropped in three weeks, discounting");
        }

        let in_taper = is_in_taper(weeks_until_goal, goal);
        let easy_week = is_time_for_an_easy_week(&inputs.total_intensity_by_week);
        let long_run_ceiling = Self::long_run_ceiling(goal, longest, weeks_until_goal, in_taper);
        let (easy_fraction, tempo_fraction) = if inputs.experience() > 5.0 {
            (0.75, 0.50)
        } else {
            (0.60, 0.40)
        };
        let limits = WeekLimits {
            in_taper,
            long_run_ceiling,
            easy_run_ceiling: long_run_ceiling * easy_fraction,
            tempo_run_ceiling: long_run_ceiling * tempo_fraction,
            quality_session: inputs.goal_type == GoalType::Speed
                && history.weekly_volume() >= QUALITY_SESSION_MIN_WEEKLY_METERS,
        };
        debug!(?limits, easy_week, "Run week limits");

        let target = inputs.philosophy().target();
        let last_week = inputs.last_week_intensity();

        let mut best: Option<(Vec<Workout>, usize, f64)> = None;
        let mut last = Vec::new();

        for attempt in 1..=self.max_plan_candidates {
            let candidate = self.gen_candidate(&limits, &paces, rng);

            let total: f64 = candidate.iter().filter_map(|w| w.estimated_intensity_score).sum();
            let mut distribution = IntensityDistribution::new();
            for workout in &candidate {
                distribution.add_workout(workout, paces.tempo, paces.speed);
            }
            let deviation = distribution.deviation_from(target);

            let eligible = match last_week {
                Some(previous) if easy_week => total < previous,
                Some(previous) => total > previous,
                None => true,
            };
            debug!(attempt, total, deviation, eligible, "Evaluated run week candidate");

            let improves = best.as_ref().map_or(true, |(_, _, d)| deviation < *d);
            if eligible && improves {
                best = Some((candidate, attempt, deviation));
            } else {
                last = candidate;
            }
        }

        match best {
            Some((workouts, attempt, deviation)) => {
                info!(attempt, deviation, count = workouts.len(), "Chose run week");
                Ok(RunWeek {
                    workouts,
                    outcome: PlanSearchOutcome::Eligible { attempt, deviation },
                })
            }
            None => {
                warn!(
                    attempts = self.max_plan_candidates,
                    easy_week, "No run week met the intensity rule, using the last candidate"
                );
                Ok(RunWeek {
                    workouts: last,
                    outcome: PlanSearchOutcome::Exhausted {
                        attempts: self.max_plan_candidates,
                    },
                })
            }
        }
    }

    /// Fixed table while tapering, otherwise growth scaled down by how much slack remains
    fn long_run_ceiling(goal: Goal, longest: f64, weeks_until_goal: Option<f64>, in_taper: bool) -> f64 {
        if in_taper {
            return goal.taper_long_run_ceiling();
        }

        let needed = long_run_needed_meters(goal);
        let attainable = match weeks_until_goal {
            Some(weeks) => km_to_meters(max_attainable_distance_km(
                meters_to_km(longest),
                build_weeks(goal, weeks),
            )),
            None => needed,
        };
        let stretch = if needed > 0.0 { attainable / needed } else { 1.0 };
        let growth = if stretch > 0.0 {
            LONG_RUN_GROWTH_RATE.min(LONG_RUN_GROWTH_RATE / stretch)
        } else {
            LONG_RUN_GROWTH_RATE
        };

        (longest * (1.0 + growth)).min(needed.max(longest))
    }

    fn gen_candidate(&self, limits: &WeekLimits, paces: &RunPaces, rng: &mut dyn RngCore) -> Vec<Workout> {
        let mut workouts = Vec::new();

        if !limits.in_taper {
            workouts.push(self.long_run(limits.long_run_ceiling, paces, rng));
        }
        workouts.push(self.easy_run(limits.easy_run_ceiling, paces, rng));
        workouts.push(self.tempo_run(limits.tempo_run_ceiling, paces, rng));
        if limits.quality_session {
            if rng.gen_bool(0.5) {
                workouts.push(self.speed_session(limits.tempo_run_ceiling, paces, rng));
            } else {
                workouts.push(self.threshold_run(limits.tempo_run_ceiling, paces, rng));
            }
        }
        workouts.push(self.easy_run(limits.easy_run_ceiling, paces, rng));

        for workout in &mut workouts {
            workout.calculate_estimated_intensity_score(paces.threshold);
        }
        workouts
    }

    fn long_run(&self, ceiling: f64, paces: &RunPaces, rng: &mut dyn RngCore) -> Workout {
        let distance = whole_km(uniform(rng, 0.8 * ceiling, ceiling));
        let mut workout = WorkoutFactory::create(WorkoutType::LongRun, &self.user_id);
        workout.add_distance_interval(1, distance, paces.long_run, 0.0, 0.0);
        workout
    }

    fn easy_run(&self, ceiling: f64, paces: &RunPaces, rng: &mut dyn RngCore) -> Workout {
        let distance = whole_km(uniform(rng, 0.5 * ceiling, ceiling));
        let mut workout = WorkoutFactory::create(WorkoutType::EasyRun, &self.user_id);
        workout.add_distance_interval(1, distance, paces.easy, 0.0, 0.0);
        workout
    }

    fn tempo_run(&self, ceiling: f64, paces: &RunPaces, rng: &mut dyn RngCore) -> Workout {
        let distance = nearest_common_distance(uniform(rng, 0.5 * ceiling, ceiling));
        let mut workout = WorkoutFactory::create(WorkoutType::TempoRun, &self.user_id);
        workout.add_warmup(WARMUP_SECS);
        workout.add_distance_interval(1, distance, paces.tempo, 0.0, 0.0);
        workout.add_cooldown(COOLDOWN_SECS);
        workout
    }

    fn speed_session(&self, ceiling: f64, paces: &RunPaces, rng: &mut dyn RngCore) -> Workout {
        let repeat_distance = SPEED_REPEAT_DISTANCES[rng.gen_range(0..SPEED_REPEAT_DISTANCES.len())];
        let pace = if repeat_distance <= 400.0 {
            paces.short_interval
        } else {
            paces.speed
        };
        let recovery_distance = repeat_distance / 2.0;
        let volume = uniform(rng, 0.5 * ceiling, ceiling);
        let repeats = ((volume / (repeat_distance + recovery_distance)).floor() as u32).clamp(2, 12);

        let mut workout = WorkoutFactory::create(WorkoutType::SpeedRun, &self.user_id);
        workout.add_warmup(WARMUP_SECS);
        workout.add_distance_interval(repeats, repeat_distance, pace, recovery_distance, paces.easy);
        workout.add_cooldown(COOLDOWN_SECS);
        workout
    }

    fn threshold_run(&self, ceiling: f64, paces: &RunPaces, rng: &mut dyn RngCore) -> Workout {
        let distance = nearest_common_distance(uniform(rng, 0.25 * ceiling, 0.5 * ceiling));
        let mut workout = WorkoutFactory::create(WorkoutType::ThresholdRun, &self.user_id);
        workout.add_warmup(WARMUP_SECS);
        workout.add_distance_interval(2, distance, paces.threshold, 400.0, paces.easy);
        workout.add_cooldown(COOLDOWN_SECS);
        workout
    }

    fn free_runs(&self, sessions_four_weeks: u32) -> Vec<Workout> {
        let count = if sessions_four_weeks >= 8 { 3 } else { 2 };
        (0..count)
            .map(|_| {
                let mut workout = WorkoutFactory::create(WorkoutType::FreeRun, &self.user_id);
                workout.add_time_interval(1, FREE_RUN_SECS, 0.0, 0.0, 0.0);
                workout.calculate_estimated_intensity_score(0.0);
                workout
            })
            .collect()
    }

    /// The event itself plus a short shakeout run. Triathlon weeks get
    /// nothing here since the bike generator owns the event.
    fn goal_week(&self, inputs: &PlanInputs) -> Vec<Workout> {
        let goal = inputs.goal;
        if goal.is_triathlon() {
            return Vec::new();
        }
        let easy = usable(inputs.paces.easy);
        let tempo = usable(inputs.paces.tempo);
        let threshold = usable(inputs.paces.threshold).or(tempo).unwrap_or(0.0);
        let mut workouts = Vec::new();

        if let Some(date) = inputs.goal_date {
            let mut event = WorkoutFactory::create_event(goal, date, &self.user_id);
            event.add_distance_interval(1, goal.run_distance_meters(), tempo.unwrap_or(0.0), 0.0, 0.0);
            event.calculate_estimated_intensity_score(threshold);
            workouts.push(event);
        }

        let mut shakeout = match easy {
            Some(pace) => {
                let mut workout = WorkoutFactory::create(WorkoutType::EasyRun, &self.user_id);
                workout.add_distance_interval(1, SHAKEOUT_RUN_METERS, pace, 0.0, 0.0);
                workout
            }
            None => {
                let mut workout = WorkoutFactory::create(WorkoutType::FreeRun, &self.user_id);
                workout.add_time_interval(1, SHAKEOUT_RUN_SECS, 0.0, 0.0, 0.0);
                workout
            }
        };
        shakeout.calculate_estimated_intensity_score(threshold);
        workouts.push(shakeout);

        workouts
    }
}

impl PlanGenerator for RunPlanGenerator {
    fn sport(&self) -> Sport {
        Sport::Running
    }

    /// Feasible when the athlete already covers the goal, or can grow into the
    /// needed long run before the taper begins
    fn is_workout_plan_possible(&self, inputs: &PlanInputs) -> bool {
        let goal = inputs.goal;
        let goal_distance = goal.run_distance_meters();
        if goal == Goal::Fitness || goal_distance <= 0.0 {
            return true;
        }

        let longest = inputs.running.longest_in_four_weeks().unwrap_or(0.0);
        if longest >= goal_distance {
            return true;
        }

        let Some(weeks) = inputs.weeks_until_goal() else {
            return true;
        };

        let needed = long_run_needed_meters(goal);
        let attainable = km_to_meters(max_attainable_distance_km(
            meters_to_km(longest),
            build_weeks(goal, weeks),
        ));
        attainable >= needed
    }

    fn gen_workouts_for_next_week(&self, inputs: &PlanInputs, rng: &mut dyn RngCore) -> Result<Vec<Workout>> {
        self.gen_week(inputs, rng).map(|week| week.workouts)
    }
}

/// Uniform draw from `[low, high)`, or `high` when the range is empty
fn uniform(rng: &mut dyn RngCore, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        high
    }
}

/// Rounds down to whole kilometers, never below one
fn whole_km(meters: f64) -> f64 {
    km_to_meters(meters_to_km(meters).floor().max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{PaceInputs, SportHistory};
    use crate::models::WorkoutKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn paces() -> PaceInputs {
        PaceInputs {
            long_run: Some(170.0),
            easy: Some(190.0),
            tempo: Some(235.0),
            threshold: Some(240.0),
            speed: Some(280.0),
            short_interval: Some(290.0),
        }
    }

    fn marathoner(weeks_until_goal: f64) -> PlanInputs {
        PlanInputs {
            goal: Goal::Marathon,
            weeks_until_goal: Some(weeks_until_goal),
            experience_level: Some(7.0),
            running: SportHistory {
                longest_session_by_week: [Some(24000.0), Some(26000.0), Some(22000.0), Some(20000.0)],
                avg_distance_four_weeks: Some(11000.0),
                avg_duration_four_weeks: Some(3600.0),
                sessions_four_weeks: 16,
            },
            paces: paces(),
            ..Default::default()
        }
    }

    #[test]
    fn test_long_run_curve() {
        assert!((max_long_run_distance_km(10.0) - 12.01).abs() < 1e-9);
        // Short goals are capped by the goal itself
        assert_eq!(long_run_needed_meters(Goal::FiveK), 5000.0);
        let marathon = long_run_needed_meters(Goal::Marathon);
        assert!(marathon > 30000.0 && marathon < 34000.0);
    }

    #[test]
    fn test_attainable_distance_compounds() {
        assert_eq!(max_attainable_distance_km(10.0, 0.0), 10.0);
        let after_ten = max_attainable_distance_km(10.0, 10.0);
        assert!(after_ten > 27.0 && after_ten < 27.3);
    }

    #[test]
    fn test_feasibility() {
        let generator = RunPlanGenerator::new("athlete", 6);
        assert!(generator.is_workout_plan_possible(&marathoner(16.0)));
        assert!(!generator.is_workout_plan_possible(&marathoner(3.0)));

        let mut already_there = marathoner(1.0);
        already_there.running.longest_session_by_week[0] = Some(43000.0);
        assert!(generator.is_workout_plan_possible(&already_there));

        let no_date = PlanInputs {
            weeks_until_goal: None,
            ..marathoner(0.0)
        };
        assert!(generator.is_workout_plan_possible(&no_date));
    }

    #[test]
    fn test_structured_week() {
        let generator = RunPlanGenerator::new("athlete", 6);
        let mut rng = StdRng::seed_from_u64(7);
        let week = generator.gen_week(&marathoner(16.0), &mut rng).unwrap();

        let types: Vec<_> = week.workouts.iter().map(|w| w.workout_type).collect();
        assert_eq!(
            types,
            vec![WorkoutType::LongRun, WorkoutType::EasyRun, WorkoutType::TempoRun, WorkoutType::EasyRun]
        );
        assert!(matches!(week.outcome, PlanSearchOutcome::Eligible { .. }));
        assert!(week.workouts.iter().all(|w| w.estimated_intensity_score.is_some()));
        assert!(week.workouts.iter().all(|w| w.scheduled_time.is_none()));

        let tempo = &week.workouts[2];
        assert!(crate::plan::COMMON_INTERVAL_DISTANCES.contains(&tempo.intervals[0].distance_meters));
        assert!(tempo.warmup.is_some() && tempo.cooldown.is_some());
    }

    #[test]
    fn test_long_run_growth_is_bounded() {
        let generator = RunPlanGenerator::new("athlete", 6);
        let mut rng = StdRng::seed_from_u64(11);
        let week = generator.gen_week(&marathoner(16.0), &mut rng).unwrap();

        let long_run = &week.workouts[0];
        assert!(long_run.total_workout_distance_meters() <= 26000.0 * 1.1);
        assert_eq!(long_run.total_workout_distance_meters() % 1000.0, 0.0);
    }

    #[test]
    fn test_speed_goal_adds_quality_session() {
        let generator = RunPlanGenerator::new("athlete", 6);
        let inputs = PlanInputs {
            goal_type: GoalType::Speed,
            ..marathoner(16.0)
        };
        let mut rng = StdRng::seed_from_u64(3);
        let week = generator.gen_week(&inputs, &mut rng).unwrap();

        assert_eq!(week.workouts.len(), 5);
        assert!(week
            .workouts
            .iter()
            .any(|w| matches!(w.workout_type, WorkoutType::SpeedRun | WorkoutType::ThresholdRun)));
    }

    #[test]
    fn test_missing_paces_is_insufficient_data() {
        let generator = RunPlanGenerator::new("athlete", 6);
        let inputs = PlanInputs {
            paces: PaceInputs::default(),
            ..marathoner(16.0)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = generator.gen_week(&inputs, &mut rng).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_unreachable_intensity_rule_is_exhausted() {
        let generator = RunPlanGenerator::new("athlete", 6);
        let inputs = PlanInputs {
            total_intensity_by_week: [Some(1.0e6), Some(10.0), Some(20.0), Some(10.0)],
            ..marathoner(16.0)
        };
        let mut rng = StdRng::seed_from_u64(5);
        let week = generator.gen_week(&inputs, &mut rng).unwrap();

        assert_eq!(week.outcome, PlanSearchOutcome::Exhausted { attempts: 6 });
        assert_eq!(week.workouts.len(), 4);
    }

    #[test]
    fn test_free_runs_for_thin_history() {
        let generator = RunPlanGenerator::new("athlete", 6);
        let mut rng = StdRng::seed_from_u64(1);

        let inputs = PlanInputs {
            running: SportHistory {
                longest_session_by_week: [Some(3000.0), None, None, None],
                sessions_four_weeks: 9,
                ..Default::default()
            },
            ..Default::default()
        };
        let week = generator.gen_week(&inputs, &mut rng).unwrap();
        assert_eq!(week.workouts.len(), 3);
        assert!(week.workouts.iter().all(|w| w.workout_type == WorkoutType::FreeRun));
        assert_eq!(week.outcome, PlanSearchOutcome::Unstructured);
    }

    #[test]
    fn test_goal_week_has_event() {
        let generator = RunPlanGenerator::new("athlete", 6);
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();
        let inputs = PlanInputs {
            goal_date: Some(date),
            ..marathoner(0.5)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let workouts = generator.gen_workouts_for_next_week(&inputs, &mut rng).unwrap();

        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].kind(), WorkoutKind::Event);
        assert_eq!(workouts[0].scheduled_time, Some(date));
        assert_eq!(workouts[1].workout_type, WorkoutType::EasyRun);
    }

    #[test]
    fn test_triathlon_goal_week_leaves_event_to_bike() {
        let generator = RunPlanGenerator::new("athlete", 6);
        let inputs = PlanInputs {
            goal: Goal::OlympicTriathlon,
            goal_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 31),
            ..marathoner(0.5)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let workouts = generator.gen_workouts_for_next_week(&inputs, &mut rng).unwrap();

        assert!(workouts.is_empty());
    }
}
