//! # Settings Module
//!
//! ## Purpose
//! Persistent configuration of the coach: where the problem set lives, how problems are
//! drawn, how answers are graded, logging, and the optional video link of each mole-map
//! step.
//!
//! ## Main Data Structures
//! - **CoachConfig**: serializable configuration with defaults for every field
//! - **SettingsManager**: loads, validates and saves the configuration file
//!   (coach_config.json). A missing or unreadable file means default configuration.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "dataset_path": "data/problems.json",
//!   "include_distractors": true,
//!   "grams_range": [6, 40],
//!   "moles_half_steps": [1, 6],
//!   "absolute_tolerance": 0.05,
//!   "relative_tolerance": 0.015,
//!   "max_draw_attempts": 8,
//!   "log_level": "info",
//!   "log_file": null,
//!   "video_links": { "mole_ratio": "https://..." }
//! }
//! ```
//!
//! ## Usage
//! ```rust
//! use MoleCoach::settings::SettingsManager;
//!
//! let manager = SettingsManager::with_config_file("no_such_config.json");
//! let options = manager.get_config().generation_options();
//! assert_eq!(options.grams_range, (6, 40));
//! ```
use crate::MoleMap::path_planner::StepId;
use crate::Stoichiometry::answer_evaluator::{ABSOLUTE_TOLERANCE, RELATIVE_TOLERANCE, Tolerance};
use crate::Stoichiometry::problem_generator::GenerationOptions;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "coach_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    pub dataset_path: String,
    pub include_distractors: bool,
    pub grams_range: (u32, u32),
    pub moles_half_steps: (u32, u32),
    pub absolute_tolerance: f64,
    pub relative_tolerance: f64,
    pub max_draw_attempts: usize,
    pub log_level: String,
    pub log_file: Option<String>,
    /// keyed by step id, e.g. "grams_to_moles"
    pub video_links: HashMap<String, String>,
}

impl Default for CoachConfig {
    fn default() -> Self {
        let generation = GenerationOptions::default();
        Self {
            dataset_path: "data/problems.json".to_string(),
            include_distractors: generation.include_distractors,
            grams_range: generation.grams_range,
            moles_half_steps: generation.moles_half_steps,
            absolute_tolerance: ABSOLUTE_TOLERANCE,
            relative_tolerance: RELATIVE_TOLERANCE,
            max_draw_attempts: generation.max_draw_attempts,
            log_level: "info".to_string(),
            log_file: None,
            video_links: HashMap::new(),
        }
    }
}

impl CoachConfig {
    pub fn generation_options(&self) -> GenerationOptions {
        // reversed ranges are tolerated in the file
        let ordered = |(a, b): (u32, u32)| (a.min(b), a.max(b));
        GenerationOptions {
            include_distractors: self.include_distractors,
            grams_range: ordered(self.grams_range),
            moles_half_steps: ordered(self.moles_half_steps),
            max_draw_attempts: self.max_draw_attempts.max(1),
        }
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            absolute: self.absolute_tolerance,
            relative: self.relative_tolerance,
        }
    }
}

/// Owner of the configuration and of the file it is persisted to.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config: CoachConfig,
    config_file: String,
}

impl SettingsManager {
    /// Manager backed by coach_config.json in the working directory.
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Could not read config '{}' ({}), using defaults",
                    config_file, e
                );
                CoachConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<CoachConfig, Box<dyn std::error::Error>> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let config: CoachConfig = serde_json::from_str(&content)?;
            info!("Configuration loaded from '{}'", config_file);
            Ok(config)
        } else {
            Ok(CoachConfig::default())
        }
    }

    /// Writes the configuration as pretty JSON. Does nothing in tests.
    pub fn save_config(&self) -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(test)]
        {
            return Ok(());
        }

        #[cfg(not(test))]
        {
            let content = serde_json::to_string_pretty(&self.config)?;
            fs::write(&self.config_file, content)?;
            Ok(())
        }
    }

    pub fn get_config(&self) -> &CoachConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Points the coach at another problem set; the file has to exist.
    pub fn set_dataset_path(&mut self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        if Path::new(path).exists() {
            self.config.dataset_path = path.to_string();
            self.save_config()?;
            Ok(())
        } else {
            Err(format!("File does not exist: {}", path).into())
        }
    }

    /// Sets the video link of a step; an empty link removes it.
    pub fn set_video_link(
        &mut self,
        step: StepId,
        link: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let link = link.trim();
        if link.is_empty() {
            self.config.video_links.remove(step.as_str());
        } else {
            self.config
                .video_links
                .insert(step.as_str().to_string(), link.to_string());
        }
        self.save_config()
    }

    pub fn set_tolerance(
        &mut self,
        absolute: f64,
        relative: f64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !(absolute >= 0.0 && relative >= 0.0) {
            return Err(format!("Tolerances must be non-negative: {}, {}", absolute, relative).into());
        }
        self.config.absolute_tolerance = absolute;
        self.config.relative_tolerance = relative;
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.config = CoachConfig::default();
        self.save_config()?;
        Ok(())
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}
