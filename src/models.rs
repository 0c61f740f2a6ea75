use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrainPlanError;
use crate::units::{METERS_PER_HALF_MARATHON, METERS_PER_MARATHON, METERS_PER_MILE};

/// Sport types the planner generates workouts for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Running,
    Cycling,
    Swimming,
    Triathlon,
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sport::Running => write!(f, "Running"),
            Sport::Cycling => write!(f, "Cycling"),
            Sport::Swimming => write!(f, "Swimming"),
            Sport::Triathlon => write!(f, "Triathlon"),
        }
    }
}

/// Broad category of a workout, used where only the purpose matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutKind {
    /// A regular training session
    Ordinary,
    /// A planned day off
    Rest,
    /// The goal race or event itself
    Event,
}

/// Workout types for categorizing prescribed sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutType {
    #[serde(rename = "Rest")]
    Rest,
    #[serde(rename = "Event")]
    Event,
    #[serde(rename = "Speed Session")]
    SpeedRun,
    #[serde(rename = "Threshold Run")]
    ThresholdRun,
    #[serde(rename = "Tempo Run")]
    TempoRun,
    #[serde(rename = "Easy Run")]
    EasyRun,
    #[serde(rename = "Long Run")]
    LongRun,
    /// A run at no specific pace
    #[serde(rename = "Free Run")]
    FreeRun,
    #[serde(rename = "Hill Ride")]
    HillRide,
    #[serde(rename = "Speed Interval Ride")]
    SpeedIntervalRide,
    #[serde(rename = "Tempo Ride")]
    TempoRide,
    #[serde(rename = "Easy Ride")]
    EasyRide,
    #[serde(rename = "Sweet Spot Ride")]
    SweetSpotRide,
    #[serde(rename = "Open Water Swim")]
    OpenWaterSwim,
    #[serde(rename = "Pool Swim")]
    PoolSwim,
    #[serde(rename = "Technique Swim")]
    TechniqueSwim,
}

impl WorkoutType {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutType::Rest => WorkoutKind::Rest,
            WorkoutType::Event => WorkoutKind::Event,
            _ => WorkoutKind::Ordinary,
        }
    }

    /// Sport the session belongs to. Rest days and events have none of their own.
    pub fn sport(&self) -> Option<Sport> {
        match self {
            WorkoutType::Rest | WorkoutType::Event => None,
            WorkoutType::SpeedRun
            | WorkoutType::ThresholdRun
            | WorkoutType::TempoRun
            | WorkoutType::EasyRun
            | WorkoutType::LongRun
            | WorkoutType::FreeRun => Some(Sport::Running),
            WorkoutType::HillRide
            | WorkoutType::SpeedIntervalRide
            | WorkoutType::TempoRide
            | WorkoutType::EasyRide
            | WorkoutType::SweetSpotRide => Some(Sport::Cycling),
            WorkoutType::OpenWaterSwim | WorkoutType::PoolSwim | WorkoutType::TechniqueSwim => {
                Some(Sport::Swimming)
            }
        }
    }

    /// One-line explanation of how the session fits into the plan
    pub fn purpose(&self) -> &'static str {
        match self {
            WorkoutType::Rest => "Rest days let the body absorb the training load.",
            WorkoutType::Event => "Goal Event!",
            WorkoutType::SpeedRun => "Speed sessions get you used to running at faster paces.",
            WorkoutType::ThresholdRun => "Threshold runs build a combination of speed and endurance. They should be performed at a pace you can hold for roughly one hour.",
            WorkoutType::TempoRun => "Tempo runs build a combination of speed and endurance. They should be performed at a pace slightly slower than your pace for a 5K race.",
            WorkoutType::EasyRun => "Easy runs build aerobic capacity while keeping the wear and tear on the body to a minimum. Pacing should be slow enough to stay at or near Heart Rate Zone 2, i.e. conversational pace.",
            WorkoutType::LongRun => "Long runs build and develop endurance.",
            WorkoutType::FreeRun => "You should run this at a pace that feels comfortable for you.",
            WorkoutType::HillRide => "Hill workouts build the strength needed to tackle hills in a race. This can be done on the indoor trainer or replaced with low gear work if hills are not available.",
            WorkoutType::SpeedIntervalRide => "Speed interval sessions get you used to riding at faster paces.",
            WorkoutType::TempoRide => "Tempo rides build a combination of speed and endurance. They should be performed at a pace you can hold for roughly one hour.",
            WorkoutType::EasyRide => "Easy rides build aerobic capacity while keeping the wear and tear on the body to a minimum.",
            WorkoutType::SweetSpotRide => "Sweet spot rides are hard enough to improve fitness while being easy enough to do frequently.",
            WorkoutType::OpenWaterSwim => "Open water swims get you used to race day conditions.",
            WorkoutType::PoolSwim => "Most training is done in the swimming pool.",
            WorkoutType::TechniqueSwim => "Develop proper swimming technique.",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkoutType::Rest => "Rest",
            WorkoutType::Event => "Event",
            WorkoutType::SpeedRun => "Speed Session",
            WorkoutType::ThresholdRun => "Threshold Run",
            WorkoutType::TempoRun => "Tempo Run",
            WorkoutType::EasyRun => "Easy Run",
            WorkoutType::LongRun => "Long Run",
            WorkoutType::FreeRun => "Free Run",
            WorkoutType::HillRide => "Hill Ride",
            WorkoutType::SpeedIntervalRide => "Speed Interval Ride",
            WorkoutType::TempoRide => "Tempo Ride",
            WorkoutType::EasyRide => "Easy Ride",
            WorkoutType::SweetSpotRide => "Sweet Spot Ride",
            WorkoutType::OpenWaterSwim => "Open Water Swim",
            WorkoutType::PoolSwim => "Pool Swim",
            WorkoutType::TechniqueSwim => "Technique Swim",
        };
        write!(f, "{}", name)
    }
}

/// The race or fitness goal the athlete is training toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Goal {
    #[default]
    #[serde(rename = "Fitness")]
    Fitness,
    #[serde(rename = "5K Run")]
    FiveK,
    #[serde(rename = "10K Run")]
    TenK,
    #[serde(rename = "15K Run")]
    FifteenK,
    #[serde(rename = "Half Marathon")]
    HalfMarathon,
    #[serde(rename = "Marathon")]
    Marathon,
    #[serde(rename = "50K Run")]
    FiftyK,
    #[serde(rename = "50 Mile Run")]
    FiftyMile,
    #[serde(rename = "Sprint Triathlon")]
    SprintTriathlon,
    #[serde(rename = "Olympic Triathlon")]
    OlympicTriathlon,
    #[serde(rename = "Half Iron Distance Triathlon")]
    HalfIronDistance,
    #[serde(rename = "Iron Distance Triathlon")]
    IronDistance,
}

impl FromStr for Goal {
    type Err = TrainPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fitness" => Ok(Self::Fitness),
            "5k" | "5k run" => Ok(Self::FiveK),
            "10k" | "10k run" => Ok(Self::TenK),
            "15k" | "15k run" => Ok(Self::FifteenK),
            "half" | "half marathon" | "half-marathon" => Ok(Self::HalfMarathon),
            "marathon" => Ok(Self::Marathon),
            "50k" | "50k run" => Ok(Self::FiftyK),
            "50 mile" | "50 mile run" | "50-mile" => Ok(Self::FiftyMile),
            "sprint triathlon" | "sprint" => Ok(Self::SprintTriathlon),
            "olympic triathlon" | "olympic" => Ok(Self::OlympicTriathlon),
            "half iron distance triathlon" | "half iron" | "70.3" => Ok(Self::HalfIronDistance),
            "iron distance triathlon" | "iron" | "ironman" => Ok(Self::IronDistance),
            _ => Err(TrainPlanError::Validation(format!("Unknown goal: {}", s))),
        }
    }
}

impl Goal {
    pub fn is_triathlon(&self) -> bool {
        matches!(
            self,
            Self::SprintTriathlon | Self::OlympicTriathlon | Self::HalfIronDistance | Self::IronDistance
        )
    }

    /// Sport whose generator owns the goal event
    pub fn primary_sport(&self) -> Sport {
        if self.is_triathlon() {
            Sport::Triathlon
        } else {
            Sport::Running
        }
    }

    pub fn run_distance_meters(&self) -> f64 {
        match self {
            Self::Fitness | Self::FiveK | Self::SprintTriathlon => 5000.0,
            Self::TenK | Self::OlympicTriathlon => 10000.0,
            Self::FifteenK => 15000.0,
            Self::HalfMarathon | Self::HalfIronDistance => METERS_PER_HALF_MARATHON,
            Self::Marathon | Self::IronDistance => METERS_PER_MARATHON,
            Self::FiftyK => 50000.0,
            Self::FiftyMile => 50.0 * METERS_PER_MILE,
        }
    }

    pub fn bike_distance_meters(&self) -> f64 {
        match self {
            Self::SprintTriathlon => 20000.0,
            Self::OlympicTriathlon => 40000.0,
            Self::HalfIronDistance => 90000.0,
            Self::IronDistance => 180000.0,
            _ => 0.0,
        }
    }

    pub fn swim_distance_meters(&self) -> f64 {
        match self {
            Self::SprintTriathlon => 750.0,
            Self::OlympicTriathlon => 1500.0,
            Self::HalfIronDistance => 1900.0,
            Self::IronDistance => 3800.0,
            _ => 0.0,
        }
    }

    /// Length of the taper, in weeks, for goals that have one.
    ///
    /// 50K and 50 mile goals have no taper rule and never taper.
    pub fn taper_weeks(&self) -> Option<f64> {
        match self {
            Self::Marathon | Self::IronDistance => Some(2.0),
            Self::HalfMarathon | Self::HalfIronDistance => Some(1.0),
            _ => None,
        }
    }

    /// Fixed long run ceiling used while tapering
    pub fn taper_long_run_ceiling(&self) -> f64 {
        match self {
            Self::Fitness | Self::FiveK | Self::SprintTriathlon => 5000.0,
            Self::TenK | Self::OlympicTriathlon => 10000.0,
            Self::FifteenK => 15000.0,
            Self::HalfMarathon | Self::HalfIronDistance => 0.75 * METERS_PER_HALF_MARATHON,
            Self::Marathon | Self::IronDistance | Self::FiftyK | Self::FiftyMile => {
                METERS_PER_HALF_MARATHON
            }
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fitness => "Fitness",
            Self::FiveK => "5K Run",
            Self::TenK => "10K Run",
            Self::FifteenK => "15K Run",
            Self::HalfMarathon => "Half Marathon",
            Self::Marathon => "Marathon",
            Self::FiftyK => "50K Run",
            Self::FiftyMile => "50 Mile Run",
            Self::SprintTriathlon => "Sprint Triathlon",
            Self::OlympicTriathlon => "Olympic Triathlon",
            Self::HalfIronDistance => "Half Iron Distance Triathlon",
            Self::IronDistance => "Iron Distance Triathlon",
        };
        write!(f, "{}", name)
    }
}

/// Whether the athlete cares about finishing or about going fast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoalType {
    #[default]
    Completion,
    Speed,
}

impl FromStr for GoalType {
    type Err = TrainPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completion" => Ok(Self::Completion),
            "speed" => Ok(Self::Speed),
            _ => Err(TrainPlanError::Validation(format!("Unknown goal type: {}", s))),
        }
    }
}

/// Training intensity distribution philosophy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingPhilosophy {
    Threshold,
    #[default]
    Polarized,
    Pyramidal,
}

impl TrainingPhilosophy {
    /// Target weights for the easy / moderate / hard buckets.
    ///
    /// These are relative weights compared by absolute difference against a
    /// week's percentage split. They do not sum to 100.
    pub fn target(&self) -> [f64; 3] {
        match self {
            TrainingPhilosophy::Threshold => [55.0, 55.0, 20.0],
            TrainingPhilosophy::Polarized => [85.0, 10.0, 25.0],
            TrainingPhilosophy::Pyramidal => [75.0, 25.0, 10.0],
        }
    }
}

impl FromStr for TrainingPhilosophy {
    type Err = TrainPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "threshold" => Ok(Self::Threshold),
            "polarized" => Ok(Self::Polarized),
            "pyramidal" => Ok(Self::Pyramidal),
            _ => Err(TrainPlanError::Validation(format!(
                "Unknown training philosophy: {}",
                s
            ))),
        }
    }
}

/// Unit system for human-readable output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl FromStr for Units {
    type Err = TrainPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" | "standard" => Ok(Self::Imperial),
            _ => Err(TrainPlanError::Validation(format!("Unknown unit system: {}", s))),
        }
    }
}
