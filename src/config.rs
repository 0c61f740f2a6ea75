use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::models::{TrainingPhilosophy, Units};
use crate::scheduler::DAYS_OF_WEEK;

/// Planner configuration, stored as TOML
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Fixed seed for reproducible plans (None draws from entropy)
    pub seed: Option<u64>,

    /// Iteration caps for the weekly plan and schedule searches
    pub search: SearchConfig,

    /// Fallbacks for values the plan inputs leave out
    pub defaults: DefaultsConfig,

    /// Logging setup
    pub logging: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidate run weeks generated before giving up
    pub max_plan_candidates: usize,

    /// Schedules tried, including the deterministic baseline
    pub schedule_attempts: usize,

    /// Half-width of the moving average used to score schedules
    pub smoothing_window: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_plan_candidates: 6,
            schedule_attempts: 10,
            smoothing_window: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Day name for the long run, e.g. "saturday"
    pub preferred_long_run_day: Option<String>,

    /// Units used when printing workouts
    pub units: Units,

    pub training_philosophy: TrainingPhilosophy,
}

impl PlannerConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: PlannerConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".trainplan")
            .join("config.toml")
    }

    /// Load the default file, falling back to built-in defaults when it is missing
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path();
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(&config_path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.max_plan_candidates == 0 {
            bail!("search.max_plan_candidates must be at least 1");
        }
        if self.search.schedule_attempts == 0 {
            bail!("search.schedule_attempts must be at least 1");
        }
        if self.search.smoothing_window == 0 {
            bail!("search.smoothing_window must be at least 1");
        }
        if let Some(day) = &self.defaults.preferred_long_run_day {
            if !DAYS_OF_WEEK.iter().any(|d| d.eq_ignore_ascii_case(day)) {
                bail!("defaults.preferred_long_run_day is not a day of the week: {}", day);
            }
        }
        Ok(())
    }
}
