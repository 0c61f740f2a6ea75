//! Weekly planning across sports
//!
//! Runs the swim, bike, and run generators in that order and schedules the
//! combined list into the week starting next Sunday.

use chrono::{Datelike, Duration, NaiveDate};
use rand::RngCore;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::inputs::PlanInputs;
use crate::models::{Sport, TrainingPhilosophy};
use crate::plan::{BikePlanGenerator, PlanGenerator, RunPlanGenerator, SwimPlanGenerator};
use crate::scheduler::{ScheduleOutcome, WorkoutScheduler, DAYS_PER_WEEK};
use crate::workout::Workout;

/// First Sunday strictly after `today`
pub fn next_sunday(today: NaiveDate) -> NaiveDate {
    let days_from_sunday = today.weekday().num_days_from_sunday() as i64;
    today + Duration::days(DAYS_PER_WEEK as i64 - days_from_sunday)
}

/// Sports that were left out of the week, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OmittedSport {
    pub sport: Sport,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct PlanReport {
    pub schedule: ScheduleOutcome,
    /// Sports whose goal cannot be reached with the given inputs
    pub infeasible_sports: Vec<Sport>,
    /// Sports skipped because a required input was missing
    pub skipped: Vec<OmittedSport>,
    /// Workouts dropped to fit the week
    pub dropped: Vec<Workout>,
}

pub struct Planner {
    generators: Vec<Box<dyn PlanGenerator>>,
    scheduler: WorkoutScheduler,
    default_long_run_day: Option<String>,
    default_philosophy: TrainingPhilosophy,
}

impl Planner {
    pub fn new(user_id: &str, config: &PlannerConfig) -> Self {
        let generators: Vec<Box<dyn PlanGenerator>> = vec![
            Box::new(SwimPlanGenerator::new(user_id)),
            Box::new(BikePlanGenerator::new(user_id)),
            Box::new(RunPlanGenerator::new(user_id, config.search.max_plan_candidates)),
        ];

        Self {
            generators,
            scheduler: WorkoutScheduler::new(
                config.search.schedule_attempts,
                config.search.smoothing_window,
            ),
            default_long_run_day: config.defaults.preferred_long_run_day.clone(),
            default_philosophy: config.defaults.training_philosophy,
        }
    }

    /// Sports this planner generates for, in generation order
    pub fn sports(&self) -> Vec<Sport> {
        self.generators.iter().map(|g| g.sport()).collect()
    }

    /// Fills inputs the caller left out from the goal date and configured defaults
    fn resolve_inputs(&self, inputs: &PlanInputs, week_start: NaiveDate) -> PlanInputs {
        let mut inputs = inputs.clone();
        if inputs.weeks_until_goal().is_none() {
            if let Some(goal_date) = inputs.goal_date {
                let weeks = (goal_date - week_start).num_days() as f64 / DAYS_PER_WEEK as f64;
                inputs.weeks_until_goal = Some(weeks.max(0.0));
            }
        }
        inputs.training_philosophy.get_or_insert(self.default_philosophy);
        inputs
    }

    /// Plans and schedules the week after `today`
    pub fn plan_week(&self, inputs: &PlanInputs, today: NaiveDate, rng: &mut dyn RngCore) -> Result<PlanReport> {
        inputs.validate()?;
        let week_start = next_sunday(today);
        let inputs = self.resolve_inputs(inputs, week_start);

        let mut infeasible_sports = Vec::new();
        let mut skipped = Vec::new();
        let mut workouts = Vec::new();

        for generator in &self.generators {
            let sport = generator.sport();
            if !generator.is_workout_plan_possible(&inputs) {
                warn!(%sport, goal = %inputs.goal, "Goal is not reachable with the current training history");
                infeasible_sports.push(sport);
            }

            match generator.gen_workouts_for_next_week(&inputs, rng) {
                Ok(generated) => workouts.extend(generated),
                Err(e) if e.is_insufficient_data() => {
                    warn!(%sport, error = %e, "Skipping sport");
                    skipped.push(OmittedSport {
                        sport,
                        reason: e.user_message(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let mut dropped = Vec::new();
        workouts.retain(|w| match w.scheduled_time {
            Some(date) if (date - week_start).num_days() >= DAYS_PER_WEEK as i64 || date < week_start => {
                warn!(%date, %week_start, workout = %w.workout_type, "Dated workout falls outside the planned week");
                dropped.push(w.clone());
                false
            }
            _ => true,
        });
        dropped.extend(fit_to_week(&mut workouts));

        let preferred = inputs
            .preferred_long_run_day
            .as_deref()
            .or(self.default_long_run_day.as_deref());
        let schedule = self
            .scheduler
            .schedule_workouts(workouts, week_start, preferred, rng)?;

        info!(
            %week_start,
            workouts = schedule.schedule.workouts().count(),
            score = schedule.score,
            "Planned week"
        );

        Ok(PlanReport {
            schedule,
            infeasible_sports,
            skipped,
            dropped,
        })
    }
}

/// Drops workouts until one fits per day: doublable sessions first, then the
/// most recently generated undated one
fn fit_to_week(workouts: &mut Vec<Workout>) -> Vec<Workout> {
    let mut dropped = Vec::new();
    while workouts.len() > DAYS_PER_WEEK {
        let position = workouts
            .iter()
            .rposition(|w| w.can_be_doubled && !w.is_scheduled())
            .or_else(|| workouts.iter().rposition(|w| !w.is_scheduled()));
        let Some(position) = position else {
            break;
        };
        let workout = workouts.remove(position);
        warn!(workout = %workout.workout_type, "Dropping workout, the week is full");
        dropped.push(workout);
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, WorkoutType};
    use crate::workout::WorkoutFactory;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_sunday() {
        // 2026-10-19 is a Monday
        assert_eq!(next_sunday(date(2026, 10, 19)), date(2026, 10, 25));
        assert_eq!(next_sunday(date(2026, 10, 24)), date(2026, 10, 25));
        // A Sunday moves to the following week
        assert_eq!(next_sunday(date(2026, 10, 25)), date(2026, 11, 1));
    }

    #[test]
    fn test_generation_order() {
        let planner = Planner::new("athlete", &PlannerConfig::default());
        assert_eq!(
            planner.sports(),
            vec![Sport::Swimming, Sport::Cycling, Sport::Running]
        );
    }

    #[test]
    fn test_config_philosophy_is_the_default() {
        let mut config = PlannerConfig::default();
        config.defaults.training_philosophy = TrainingPhilosophy::Threshold;
        let planner = Planner::new("athlete", &config);
        let week_start = date(2026, 10, 25);

        let resolved = planner.resolve_inputs(&PlanInputs::default(), week_start);
        assert_eq!(resolved.philosophy(), TrainingPhilosophy::Threshold);

        let inputs = PlanInputs {
            training_philosophy: Some(TrainingPhilosophy::Pyramidal),
            ..Default::default()
        };
        let resolved = planner.resolve_inputs(&inputs, week_start);
        assert_eq!(resolved.philosophy(), TrainingPhilosophy::Pyramidal);
    }

    #[test]
    fn test_goal_date_sets_weeks_until_goal() {
        let planner = Planner::new("athlete", &PlannerConfig::default());
        let inputs = PlanInputs {
            goal: Goal::TenK,
            goal_date: Some(date(2026, 11, 8)),
            ..Default::default()
        };
        let resolved = planner.resolve_inputs(&inputs, date(2026, 10, 25));
        assert_eq!(resolved.weeks_until_goal, Some(2.0));
    }

    #[test]
    fn test_fit_to_week_keeps_dated_workouts() {
        let mut workouts: Vec<Workout> = (0..7)
            .map(|_| WorkoutFactory::create(WorkoutType::TempoRun, "athlete"))
            .collect();
        let event = WorkoutFactory::create_event(Goal::TenK, date(2026, 10, 31), "athlete");
        assert!(event.is_scheduled());
        workouts.push(event);

        let dropped = fit_to_week(&mut workouts);
        assert_eq!(dropped.len(), 1);
        assert!(!dropped[0].is_scheduled());
        assert_eq!(workouts.iter().filter(|w| w.is_scheduled()).count(), 1);
    }

    #[test]
    fn test_fit_to_week_prefers_doublable() {
        let mut workouts: Vec<Workout> = (0..7)
            .map(|_| WorkoutFactory::create(WorkoutType::TempoRun, "athlete"))
            .collect();
        workouts.insert(2, WorkoutFactory::create(WorkoutType::EasyRun, "athlete"));

        let dropped = fit_to_week(&mut workouts);
        assert_eq!(workouts.len(), 7);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].workout_type, WorkoutType::EasyRun);
    }

    #[test]
    fn test_fitness_week_without_history() {
        let planner = Planner::new("athlete", &PlannerConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let report = planner
            .plan_week(&PlanInputs::default(), date(2026, 10, 19), &mut rng)
            .unwrap();

        assert!(report.infeasible_sports.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.schedule.schedule.start(), date(2026, 10, 25));
        assert!(report
            .schedule
            .schedule
            .workouts()
            .all(|w| w.workout_type == WorkoutType::FreeRun));
    }

    #[test]
    fn test_missing_paces_skip_running() {
        let mut inputs = PlanInputs {
            goal: Goal::HalfMarathon,
            weeks_until_goal: Some(10.0),
            ..Default::default()
        };
        inputs.running.longest_session_by_week = [Some(12_000.0), Some(11_000.0), None, None];

        let planner = Planner::new("athlete", &PlannerConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let report = planner.plan_week(&inputs, date(2026, 10, 19), &mut rng).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].sport, Sport::Running);
        assert_eq!(report.schedule.schedule.workouts().count(), 0);
    }
}
