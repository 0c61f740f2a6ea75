//! Places a week's workouts onto days
//!
//! A deterministic placement is the baseline; randomized placements then try
//! to beat it on how evenly training stress is spread across the week.

use chrono::{Duration, NaiveDate};
use rand::{Rng, RngCore};
use statrs::statistics::Statistics;
use tracing::{debug, info};

use crate::error::{Result, SchedulingError};
use crate::models::WorkoutType;
use crate::workout::Workout;

pub const DAYS_PER_WEEK: usize = 7;

/// Slot order, starting on Sunday
pub const DAYS_OF_WEEK: [&str; DAYS_PER_WEEK] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Slot of a weekday name, ignoring case. Unknown names map to the last day.
pub fn day_index(name: &str) -> usize {
    let name = name.trim().to_lowercase();
    DAYS_OF_WEEK
        .iter()
        .position(|day| *day == name)
        .unwrap_or(DAYS_PER_WEEK - 1)
}

/// Seven day slots, each empty or holding one workout
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySchedule {
    start: NaiveDate,
    days: [Option<Workout>; DAYS_PER_WEEK],
}

impl WeeklySchedule {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            days: Default::default(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn days(&self) -> &[Option<Workout>; DAYS_PER_WEEK] {
        &self.days
    }

    pub fn date_of(&self, index: usize) -> NaiveDate {
        self.start + Duration::days(index as i64)
    }

    pub fn empty_days(&self) -> Vec<usize> {
        (0..DAYS_PER_WEEK).filter(|i| self.days[*i].is_none()).collect()
    }

    /// Puts the workout on a day and stamps its date
    fn place(&mut self, index: usize, mut workout: Workout) {
        workout.scheduled_time = Some(self.date_of(index));
        self.days[index] = Some(workout);
    }

    pub fn workouts(&self) -> impl Iterator<Item = &Workout> {
        self.days.iter().flatten()
    }

    pub fn into_workouts(self) -> Vec<Workout> {
        self.days.into_iter().flatten().collect()
    }

    /// Estimated intensity per day, zero for empty days
    pub fn daily_intensity(&self) -> [f64; DAYS_PER_WEEK] {
        let mut scores = [0.0; DAYS_PER_WEEK];
        for (score, day) in scores.iter_mut().zip(&self.days) {
            *score = day
                .as_ref()
                .and_then(|w| w.estimated_intensity_score)
                .unwrap_or(0.0);
        }
        scores
    }
}

/// Result of a scheduling run
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub schedule: WeeklySchedule,
    pub score: f64,
    /// Score of the deterministic placement
    pub baseline_score: f64,
    /// True when a randomized placement beat the baseline
    pub improved: bool,
}

pub struct WorkoutScheduler {
    attempts: usize,
    smoothing_window: usize,
}

impl WorkoutScheduler {
    /// `attempts` counts the deterministic baseline
    pub fn new(attempts: usize, smoothing_window: usize) -> Self {
        Self {
            attempts: attempts.max(1),
            smoothing_window,
        }
    }

    /// Centered moving average; the window shrinks at the edges
    pub fn smooth(values: &[f64], window: usize) -> Vec<f64> {
        (0..values.len())
            .map(|i| {
                let low = i.saturating_sub(window);
                let high = (i + window + 1).min(values.len());
                values[low..high].iter().mean()
            })
            .collect()
    }

    /// Spread of daily stress around the smoothed weekly mean. Lower is better.
    pub fn score_schedule(&self, schedule: &WeeklySchedule) -> f64 {
        let daily = schedule.daily_intensity();
        let smoothed = Self::smooth(&daily, self.smoothing_window);
        let mean = smoothed.iter().mean();
        let variance = daily.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / daily.len() as f64;
        variance.sqrt()
    }

    /// Each workout goes to the middle of the remaining empty days
    pub fn deterministic_scheduler(&self, workouts: &[Workout], week: &WeeklySchedule) -> Result<WeeklySchedule> {
        Self::fill(workouts, week, |possible| possible.len() / 2)
    }

    /// Each workout goes to a uniformly random empty day
    pub fn random_scheduler(
        &self,
        workouts: &[Workout],
        week: &WeeklySchedule,
        rng: &mut dyn RngCore,
    ) -> Result<WeeklySchedule> {
        Self::fill(workouts, week, |possible| rng.gen_range(0..possible.len()))
    }

    fn fill(
        workouts: &[Workout],
        week: &WeeklySchedule,
        mut pick: impl FnMut(&[usize]) -> usize,
    ) -> Result<WeeklySchedule> {
        let mut schedule = week.clone();
        for workout in workouts {
            let possible = schedule.empty_days();
            if possible.is_empty() {
                return Err(SchedulingError::TooManyWorkouts {
                    count: week.workouts().count() + workouts.len(),
                }
                .into());
            }
            let index = possible[pick(&possible)];
            schedule.place(index, workout.clone());
        }
        Ok(schedule)
    }

    /// Schedules the week starting on `start` (a Sunday).
    ///
    /// Workouts that already carry a date keep it. The first long run goes on
    /// the preferred day when that day is free.
    pub fn schedule_workouts(
        &self,
        workouts: Vec<Workout>,
        start: NaiveDate,
        preferred_long_run_day: Option<&str>,
        rng: &mut dyn RngCore,
    ) -> Result<ScheduleOutcome> {
        if workouts.len() > DAYS_PER_WEEK {
            return Err(SchedulingError::TooManyWorkouts {
                count: workouts.len(),
            }
            .into());
        }

        let mut week = WeeklySchedule::new(start);
        let mut unscheduled = Vec::new();

        for workout in workouts {
            let Some(date) = workout.scheduled_time else {
                unscheduled.push(workout);
                continue;
            };
            let offset = (date - start).num_days();
            if !(0..DAYS_PER_WEEK as i64).contains(&offset) {
                return Err(SchedulingError::OutsideWindow {
                    date,
                    week_start: start,
                }
                .into());
            }
            let index = offset as usize;
            if week.days[index].is_some() {
                return Err(SchedulingError::DayConflict { date }.into());
            }
            week.place(index, workout);
        }

        if let Some(day) = preferred_long_run_day {
            let index = day_index(day);
            let long_run = unscheduled
                .iter()
                .position(|w| w.workout_type == WorkoutType::LongRun);
            if let (Some(position), true) = (long_run, week.days[index].is_none()) {
                let workout = unscheduled.remove(position);
                week.place(index, workout);
            }
        }

        let mut best = self.deterministic_scheduler(&unscheduled, &week)?;
        let baseline_score = self.score_schedule(&best);
        let mut best_score = baseline_score;
        debug!(score = baseline_score, "Deterministic schedule");

        for attempt in 1..self.attempts {
            let candidate = self.random_scheduler(&unscheduled, &week, rng)?;
            let score = self.score_schedule(&candidate);
            debug!(attempt, score, "Randomized schedule");
            if score < best_score {
                best = candidate;
                best_score = score;
            }
        }

        let improved = best_score < baseline_score;
        info!(score = best_score, baseline_score, improved, %start, "Scheduled week");

        Ok(ScheduleOutcome {
            schedule: best,
            score: best_score,
            baseline_score,
            improved,
        })
    }
}
