//! Swimming plan generation

use rand::RngCore;
use tracing::info;

use super::{is_goal_week, is_in_taper, PlanGenerator};
use crate::error::Result;
use crate::inputs::{usable, PlanInputs};
use crate::models::{Goal, Sport, WorkoutType};
use crate::workout::{Workout, WorkoutFactory};

const WARMUP_SECS: f64 = 300.0;
const COOLDOWN_SECS: f64 = 300.0;
const DEFAULT_SWIM_SECS: f64 = 1800.0;
const MIN_SWIM_SECS: f64 = 1200.0;
const MAX_SWIM_SECS: f64 = 3600.0;
const TAPER_SWIM_SECS: f64 = 1200.0;

/// Technique sets: repeats of drills with a short rest
const TECHNIQUE_REPEATS: u32 = 4;
const TECHNIQUE_DRILL_SECS: f64 = 300.0;
const TECHNIQUE_REST_SECS: f64 = 60.0;

/// Athletes at or below this experience or comfort level get technique work
const TECHNIQUE_LEVEL: f64 = 5.0;

pub struct SwimPlanGenerator {
    user_id: String,
}

impl SwimPlanGenerator {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
        }
    }

    fn technique_swim(&self) -> Workout {
        let mut workout = WorkoutFactory::create(WorkoutType::TechniqueSwim, &self.user_id);
        workout.add_warmup(WARMUP_SECS);
        workout.add_time_interval(
            TECHNIQUE_REPEATS,
            TECHNIQUE_DRILL_SECS,
            0.0,
            TECHNIQUE_REST_SECS,
            0.0,
        );
        workout.add_cooldown(COOLDOWN_SECS);
        workout
    }

    fn steady_swim(&self, workout_type: WorkoutType, seconds: f64) -> Workout {
        let mut workout = WorkoutFactory::create(workout_type, &self.user_id);
        workout.add_warmup(WARMUP_SECS);
        workout.add_time_interval(1, seconds, 0.0, 0.0, 0.0);
        workout.add_cooldown(COOLDOWN_SECS);
        workout
    }
}

impl PlanGenerator for SwimPlanGenerator {
    fn sport(&self) -> Sport {
        Sport::Swimming
    }

    fn is_workout_plan_possible(&self, inputs: &PlanInputs) -> bool {
        inputs.goal.swim_distance_meters() <= 0.0
            || inputs.has_swimming_pool_access
            || inputs.has_open_water_swim_access
    }

    fn gen_workouts_for_next_week(&self, inputs: &PlanInputs, _rng: &mut dyn RngCore) -> Result<Vec<Workout>> {
        let goal = inputs.goal;
        let weeks_until_goal = inputs.weeks_until_goal();
        let has_pool = inputs.has_swimming_pool_access;
        let has_open_water = inputs.has_open_water_swim_access;

        if is_goal_week(goal, weeks_until_goal, inputs.goal_date) || !(has_pool || has_open_water) {
            return Ok(Vec::new());
        }

        let steady_type = if has_pool {
            WorkoutType::PoolSwim
        } else {
            WorkoutType::OpenWaterSwim
        };
        let needs_technique =
            inputs.experience() <= TECHNIQUE_LEVEL || inputs.comfort() <= TECHNIQUE_LEVEL;
        let steady_secs = usable(inputs.swimming.avg_duration_four_weeks)
            .unwrap_or(DEFAULT_SWIM_SECS)
            .clamp(MIN_SWIM_SECS, MAX_SWIM_SECS);

        let mut workouts = Vec::new();
        if goal.is_triathlon() {
            if is_in_taper(weeks_until_goal, goal) {
                workouts.push(self.steady_swim(steady_type, TAPER_SWIM_SECS));
            } else {
                if has_pool && needs_technique {
                    workouts.push(self.technique_swim());
                } else {
                    workouts.push(self.steady_swim(steady_type, steady_secs));
                }
                workouts.push(self.steady_swim(steady_type, steady_secs));
            }
        } else if goal == Goal::Fitness && has_pool {
            if needs_technique {
                workouts.push(self.technique_swim());
            } else {
                workouts.push(self.steady_swim(WorkoutType::PoolSwim, steady_secs));
            }
        }

        for workout in &mut workouts {
            workout.calculate_estimated_intensity_score(0.0);
        }
        if !workouts.is_empty() {
            info!(count = workouts.len(), "Generated swim workouts");
        }
        Ok(workouts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn swimmer(goal: Goal, pool: bool, open_water: bool) -> PlanInputs {
        PlanInputs {
            goal,
            weeks_until_goal: Some(10.0),
            has_swimming_pool_access: pool,
            has_open_water_swim_access: open_water,
            ..Default::default()
        }
    }

    fn generate(inputs: &PlanInputs) -> Vec<Workout> {
        let mut rng = StdRng::seed_from_u64(9);
        SwimPlanGenerator::new("athlete")
            .gen_workouts_for_next_week(inputs, &mut rng)
            .unwrap()
    }

    #[test]
    fn test_feasibility_needs_water() {
        let generator = SwimPlanGenerator::new("athlete");
        assert!(!generator.is_workout_plan_possible(&swimmer(Goal::IronDistance, false, false)));
        assert!(generator.is_workout_plan_possible(&swimmer(Goal::IronDistance, false, true)));
        assert!(generator.is_workout_plan_possible(&swimmer(Goal::TenK, false, false)));
    }

    #[test]
    fn test_beginner_triathlete_gets_technique() {
        let workouts = generate(&swimmer(Goal::SprintTriathlon, true, false));
        let types: Vec<_> = workouts.iter().map(|w| w.workout_type).collect();
        assert_eq!(types, vec![WorkoutType::TechniqueSwim, WorkoutType::PoolSwim]);
        assert!(workouts.iter().all(|w| w.sport == Some(Sport::Swimming)));
    }

    #[test]
    fn test_experienced_open_water_only() {
        let inputs = PlanInputs {
            experience_level: Some(8.0),
            structured_training_comfort_level: Some(8.0),
            ..swimmer(Goal::OlympicTriathlon, false, true)
        };
        let workouts = generate(&inputs);
        assert_eq!(workouts.len(), 2);
        assert!(workouts.iter().all(|w| w.workout_type == WorkoutType::OpenWaterSwim));
    }

    #[test]
    fn test_taper_is_one_short_swim() {
        let inputs = PlanInputs {
            weeks_until_goal: Some(1.5),
            ..swimmer(Goal::IronDistance, true, true)
        };
        let workouts = generate(&inputs);
        assert_eq!(workouts.len(), 1);
        assert!((workouts[0].total_workout_duration_secs() - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn test_fitness_and_running_goals() {
        assert_eq!(generate(&swimmer(Goal::Fitness, true, false)).len(), 1);
        assert!(generate(&swimmer(Goal::Fitness, false, true)).is_empty());
        assert!(generate(&swimmer(Goal::Marathon, true, true)).is_empty());
    }
}
