use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use trainplan::logging::{init_logging, LogLevel};
use trainplan::scheduler::DAYS_OF_WEEK;
use trainplan::units::{format_distance, format_duration, format_pace};
use trainplan::{
    FtpCalculator, Goal, HeartRateCalculator, PlanInputs, PlanReport, Planner, PlannerConfig,
    TrainingPaceCalculator, TrainingPaces, Units,
};

/// trainplan - weekly training plan generator
///
/// Builds next week's run, bike, and swim workouts from recent training
/// history and places them on the calendar.
#[derive(Parser)]
#[command(name = "trainplan")]
#[command(version)]
#[command(about = "Weekly training plan generator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and schedule next week's workouts
    Generate {
        /// Plan inputs as JSON
        #[arg(short, long, value_name = "FILE")]
        inputs: PathBuf,

        /// Plan as if today were this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Seed for reproducible plans
        #[arg(short, long)]
        seed: Option<u64>,

        /// Unit system for distances and paces
        #[arg(short, long)]
        units: Option<Units>,

        /// Athlete ID stored on each workout
        #[arg(long, default_value = "athlete")]
        user: String,
    },

    /// Training paces from VO2max, a race result, or heart rates
    Paces {
        #[arg(long)]
        vo2max: Option<f64>,

        /// Race distance in meters, or a name such as "5k" or "marathon"
        #[arg(long, requires = "race_time")]
        race_distance: Option<String>,

        /// Race time as HH:MM:SS or MM:SS
        #[arg(long, requires = "race_distance")]
        race_time: Option<String>,

        #[arg(long, requires = "max_hr")]
        resting_hr: Option<f64>,

        #[arg(long)]
        max_hr: Option<f64>,

        #[arg(short, long)]
        units: Option<Units>,
    },

    /// Power or heart rate training zones
    Zones {
        /// Functional threshold power, in watts
        #[arg(long)]
        ftp: Option<f64>,

        #[arg(long)]
        max_hr: Option<f64>,

        #[arg(long)]
        resting_hr: Option<f64>,

        /// Used to estimate max HR when --max-hr is not given
        #[arg(long)]
        age: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Text,
    Json,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Workout")]
    workout: String,
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Intensity")]
    intensity: String,
}

#[derive(Tabled)]
struct PaceRow {
    #[tabled(rename = "Pace")]
    name: &'static str,
    #[tabled(rename = "Target")]
    pace: String,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "From")]
    low: String,
    #[tabled(rename = "To")]
    high: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    config.logging.level = match cli.verbose {
        0 => config.logging.level,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Generate {
            inputs,
            today,
            format,
            seed,
            units,
            user,
        } => {
            let json = fs::read_to_string(&inputs)
                .with_context(|| format!("Failed to read plan inputs: {}", inputs.display()))?;
            let plan_inputs = PlanInputs::from_json_str(&json)
                .map_err(|e| anyhow!(e.user_message()))
                .with_context(|| format!("Invalid plan inputs: {}", inputs.display()))?;

            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let mut rng = match seed.or(config.seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let planner = Planner::new(&user, &config);
            let report = planner
                .plan_week(&plan_inputs, today, &mut rng)
                .map_err(|e| anyhow!(e.user_message()))
                .context("Failed to plan the week")?;

            print_warnings(&report);
            let units = units.unwrap_or(config.defaults.units);
            match format {
                OutputFormat::Table => print_table(&report, units),
                OutputFormat::Text => print_text(&report, units),
                OutputFormat::Json => print_json(&report)?,
            }
        }

        Commands::Paces {
            vo2max,
            race_distance,
            race_time,
            resting_hr,
            max_hr,
            units,
        } => {
            let paces = if let Some(vo2max) = vo2max {
                TrainingPaceCalculator::calc_from_vo2max(vo2max)?
            } else if let (Some(distance), Some(time)) = (race_distance, race_time) {
                TrainingPaceCalculator::calc_from_race(
                    Some(parse_race_distance(&distance)?),
                    Some(parse_race_time(&time)?),
                )?
            } else if max_hr.is_some() {
                TrainingPaceCalculator::calc_from_hr(resting_hr, max_hr)?
            } else {
                bail!("Provide --vo2max, --race-distance with --race-time, or --resting-hr with --max-hr");
            };
            print_paces(&paces, units.unwrap_or(config.defaults.units));
        }

        Commands::Zones {
            ftp,
            max_hr,
            resting_hr,
            age,
        } => {
            if ftp.is_none() && max_hr.is_none() && age.is_none() {
                bail!("Provide --ftp, --max-hr, or --age");
            }
            if let Some(ftp) = ftp {
                print_power_zones(ftp);
            }
            if max_hr.is_some() || age.is_some() {
                let calculator = HeartRateCalculator::new(Utc::now());
                let zones = calculator.training_zones(max_hr, resting_hr, age.unwrap_or_default());
                print_zone_table("Heart rate zones", &zones, "bpm", false);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load_from_file(path),
        None => PlannerConfig::load_or_default(),
    }
}

fn parse_race_distance(value: &str) -> Result<f64> {
    if let Ok(meters) = value.trim().parse::<f64>() {
        return Ok(meters);
    }
    let goal: Goal = value
        .parse()
        .map_err(|_| anyhow!("Unknown race distance: {}", value))?;
    if goal == Goal::Fitness || goal.is_triathlon() {
        bail!("Not a running race distance: {}", value);
    }
    Ok(goal.run_distance_meters())
}

/// "HH:MM:SS", "MM:SS", or plain seconds
fn parse_race_time(value: &str) -> Result<f64> {
    let mut seconds = 0.0;
    for part in value.trim().split(':') {
        let part: f64 = part
            .parse()
            .with_context(|| format!("Invalid race time: {}", value))?;
        seconds = seconds * 60.0 + part;
    }
    Ok(seconds)
}

fn print_warnings(report: &PlanReport) {
    for sport in &report.infeasible_sports {
        eprintln!(
            "{}",
            format!("⚠ The {} goal may not be reachable with the current training history", sport).yellow()
        );
    }
    for omitted in &report.skipped {
        eprintln!("{}", format!("⚠ No {} workouts: {}", omitted.sport, omitted.reason).yellow());
    }
    for workout in &report.dropped {
        eprintln!("{}", format!("⚠ Dropped {} to fit the week", workout.workout_type).yellow());
    }
}

fn print_table(report: &PlanReport, units: Units) {
    let schedule = &report.schedule.schedule;
    let rows: Vec<DayRow> = schedule
        .days()
        .iter()
        .enumerate()
        .map(|(index, day)| {
            let date = schedule.date_of(index).to_string();
            let day_name = capitalize(DAYS_OF_WEEK[index]);
            match day {
                Some(workout) => DayRow {
                    day: day_name,
                    date,
                    workout: workout.workout_type.to_string(),
                    sport: workout.sport.map(|s| s.to_string()).unwrap_or_default(),
                    duration: format_duration(workout.total_workout_duration_secs()),
                    distance: match workout.total_workout_distance_meters() {
                        d if d > 0.0 => format_distance(units, d),
                        _ => String::new(),
                    },
                    intensity: workout
                        .estimated_intensity_score
                        .map(|s| format!("{:.1}", s))
                        .unwrap_or_default(),
                },
                None => DayRow {
                    day: day_name,
                    date,
                    workout: "Rest".to_string(),
                    sport: String::new(),
                    duration: String::new(),
                    distance: String::new(),
                    intensity: String::new(),
                },
            }
        })
        .collect();

    println!("{}", format!("Week of {}", schedule.start()).green().bold());
    println!("{}", Table::new(rows).with(Style::rounded()));
    println!(
        "{}",
        format!("Schedule score: {:.2}", report.schedule.score).dimmed()
    );
}

fn print_text(report: &PlanReport, units: Units) {
    let schedule = &report.schedule.schedule;
    for (index, day) in schedule.days().iter().enumerate() {
        println!(
            "{}",
            format!("{} {}", capitalize(DAYS_OF_WEEK[index]), schedule.date_of(index))
                .cyan()
                .bold()
        );
        match day {
            Some(workout) => println!("{}", workout.export_to_text(units)),
            None => println!("Rest\n"),
        }
    }
}

fn print_json(report: &PlanReport) -> Result<()> {
    let schedule = &report.schedule.schedule;
    let mut days = Vec::new();
    for (index, day) in schedule.days().iter().enumerate() {
        let workout = match day {
            Some(workout) => serde_json::Value::Object(workout.to_dict()?),
            None => serde_json::Value::Null,
        };
        days.push(json!({
            "day": DAYS_OF_WEEK[index],
            "date": schedule.date_of(index).to_string(),
            "workout": workout,
        }));
    }

    let output = json!({
        "week_start": schedule.start().to_string(),
        "score": report.schedule.score,
        "baseline_score": report.schedule.baseline_score,
        "days": days,
        "infeasible_sports": report.infeasible_sports,
        "skipped": report.skipped,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_paces(paces: &TrainingPaces, units: Units) {
    let rows = vec![
        PaceRow { name: "Long run", pace: format_pace(units, paces.long_run) },
        PaceRow { name: "Easy", pace: format_pace(units, paces.easy) },
        PaceRow { name: "Tempo", pace: format_pace(units, paces.tempo) },
        PaceRow { name: "Threshold", pace: format_pace(units, paces.threshold) },
        PaceRow { name: "Speed", pace: format_pace(units, paces.speed) },
        PaceRow { name: "Short interval", pace: format_pace(units, paces.short_interval) },
    ];
    println!("{}", "Training paces".green().bold());
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_power_zones(ftp: f64) {
    let zones = FtpCalculator::power_training_zones(ftp);
    print_zone_table("Power zones", &zones, "W", true);
}

fn print_zone_table(title: &str, upper_bounds: &[f64], unit: &str, open_ended: bool) {
    let mut rows = Vec::new();
    let mut low = 0.0;
    for (index, high) in upper_bounds.iter().enumerate() {
        rows.push(ZoneRow {
            zone: format!("Z{}", index + 1),
            low: format!("{:.0} {}", low, unit),
            high: format!("{:.0} {}", high, unit),
        });
        low = *high;
    }
    if open_ended {
        rows.push(ZoneRow {
            zone: format!("Z{}", upper_bounds.len() + 1),
            low: format!("{:.0} {}", low, unit),
            high: "-".to_string(),
        });
    }
    println!("{}", title.green().bold());
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
