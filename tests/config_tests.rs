use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::TempDir;
use trainplan::logging::{LogFormat, LogLevel};
use trainplan::{PlanInputs, Planner, PlannerConfig, TrainingPhilosophy, Units, WorkoutType};

#[test]
fn test_config_round_trip_through_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    let mut config = PlannerConfig::default();
    config.seed = Some(1234);
    config.search.schedule_attempts = 25;
    config.defaults.units = Units::Imperial;
    config.defaults.training_philosophy = TrainingPhilosophy::Polarized;
    config.logging.format = LogFormat::Json;
    config.logging.file_path = Some(temp_dir.path().join("logs").join("trainplan.log"));

    config.save_to_file(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[search]"));
    assert!(content.contains("schedule_attempts = 25"));

    let loaded = PlannerConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_hand_written_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
seed = 7

[defaults]
preferred_long_run_day = "sunday"
units = "imperial"
training_philosophy = "threshold"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = PlannerConfig::load_from_file(&path).unwrap();
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.defaults.units, Units::Imperial);
    assert_eq!(config.defaults.training_philosophy, TrainingPhilosophy::Threshold);
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.search.max_plan_candidates, 6);
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[search]\nschedule_attempts = 0\n").unwrap();
    assert!(PlannerConfig::load_from_file(&path).is_err());

    fs::write(&path, "this is not toml = = =").unwrap();
    assert!(PlannerConfig::load_from_file(&path).is_err());
}

#[test]
fn test_config_long_run_day_is_a_fallback() {
    let mut config = PlannerConfig::default();
    config.defaults.preferred_long_run_day = Some("wednesday".to_string());
    let planner = Planner::new("athlete", &config);

    let json = r#"{
        "goal": "Half Marathon",
        "weeks_until_goal": 10,
        "running": {
            "longest_session_by_week": [15000, 13000, 14000, 12000],
            "avg_distance_four_weeks": 9000,
            "sessions_four_weeks": 12
        },
        "paces": {"long_run": 175, "easy": 190, "tempo": 235, "speed": 280}
    }"#;
    let inputs = PlanInputs::from_json_str(json).unwrap();
    let mut rng = StdRng::seed_from_u64(21);

    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let report = planner.plan_week(&inputs, today, &mut rng).unwrap();
    let wednesday = report.schedule.schedule.days()[3].as_ref().unwrap();
    assert_eq!(wednesday.workout_type, WorkoutType::LongRun);
}
