use chrono::NaiveDate;
use proptest::prelude::*;
use trainplan::{Goal, Sport, Units, Workout, WorkoutFactory, WorkoutType};

const TYPES: [WorkoutType; 8] = [
    WorkoutType::LongRun,
    WorkoutType::SpeedRun,
    WorkoutType::TempoRun,
    WorkoutType::EasyRide,
    WorkoutType::SweetSpotRide,
    WorkoutType::PoolSwim,
    WorkoutType::OpenWaterSwim,
    WorkoutType::Rest,
];

proptest! {
    #[test]
    fn test_dict_round_trip(
        type_index in 0usize..TYPES.len(),
        repeat in 1u32..10,
        distance in 200.0f64..20_000.0,
        pace in 120.0f64..350.0,
        recovery in 0.0f64..800.0,
        warmup in prop::option::of(60.0f64..1200.0),
        day_offset in prop::option::of(0i64..400),
    ) {
        let mut workout = WorkoutFactory::create(TYPES[type_index], "athlete");
        if let Some(seconds) = warmup {
            workout.add_warmup(seconds);
            workout.add_cooldown(seconds);
        }
        workout.add_distance_interval(repeat, distance, pace, recovery, pace * 0.8);
        workout.scheduled_time = day_offset
            .map(|days| NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Duration::days(days));
        workout.calculate_estimated_intensity_score(pace);

        let dict = workout.to_dict().unwrap();
        let restored = Workout::from_dict(&dict).unwrap();
        prop_assert_eq!(restored, workout);
    }
}

#[test]
fn test_persisted_field_names() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();
    let event = WorkoutFactory::create_event(Goal::Marathon, date, "athlete");
    let dict = event.to_dict().unwrap();

    assert_eq!(dict["type"], "Event");
    assert_eq!(dict["sport_type"], serde_json::to_value(Sport::Running).unwrap());
    // Midnight UTC as a unix timestamp
    assert_eq!(dict["scheduled_time"], 1_793_404_800i64);
}

#[test]
fn test_legacy_dict_without_id() {
    let json = r#"{
        "type": "Easy Run",
        "sport_type": "Running",
        "intervals": [{"repeat": 1, "distance_meters": 8000.0, "pace": 190.0}]
    }"#;
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json).unwrap();
    let workout = Workout::from_dict(&map).unwrap();

    assert_eq!(workout.workout_type, WorkoutType::EasyRun);
    assert_eq!(workout.total_workout_distance_meters(), 8000.0);
    assert!(workout.scheduled_time.is_none());
}

#[test]
fn test_json_export_includes_description() {
    let mut workout = WorkoutFactory::create(WorkoutType::SpeedRun, "athlete");
    workout.add_warmup(600.0);
    workout.add_distance_interval(6, 800.0, 280.0, 400.0, 190.0);
    workout.add_cooldown(600.0);

    let json = workout.export_to_json_str(Units::Metric).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let description = value["description"].as_str().unwrap();
    assert!(description.contains("6 x 800 meters"));
    assert!(description.contains("Warmup: 10 minutes."));
}
