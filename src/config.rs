use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{UInt, error::FarmError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for the training RNG. Drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Log training progress every this many episodes.
    pub log_every: UInt,
    /// Where the binary writes the trained Q-table.
    pub q_table_path: Option<PathBuf>,
    pub simulation: SimulationConfig,
    pub rl: RlConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Days per episode.
    pub days: UInt,
    pub initial_seeds: UInt,
    pub initial_fertilizer: UInt,
    pub initial_water: UInt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RlConfig {
    pub episodes: UInt,
    pub learning_rate: f32,
    pub discount_factor: f32,
    pub initial_epsilon: f32,
    pub epsilon_decay: f32,
    /// Exploration never decays below this rate.
    pub min_epsilon: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: None,
            log_every: 100,
            q_table_path: None,
            simulation: SimulationConfig::default(),
            rl: RlConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            days: 7,
            initial_seeds: 10,
            initial_fertilizer: 10,
            initial_water: 10,
        }
    }
}

impl Default for RlConfig {
    fn default() -> Self {
        RlConfig {
            episodes: 1000,
            learning_rate: 0.1,
            discount_factor: 0.95,
            initial_epsilon: 0.9,
            epsilon_decay: 0.99,
            min_epsilon: 0.01,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FarmError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FarmError> {
        if self.simulation.days == 0 {
            return Err(FarmError::Config("simulation.days must be positive".into()));
        }
        if self.log_every == 0 {
            return Err(FarmError::Config("log_every must be positive".into()));
        }
        self.rl.validate()
    }
}

impl RlConfig {
    pub fn validate(&self) -> Result<(), FarmError> {
        let check = |ok: bool, msg: &str| {
            if ok {
                Ok(())
            } else {
                Err(FarmError::Config(msg.to_string()))
            }
        };
        check(self.episodes > 0, "rl.episodes must be positive")?;
        check(
            self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            "rl.learning_rate must be in (0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&self.discount_factor),
            "rl.discount_factor must be in [0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&self.initial_epsilon),
            "rl.initial_epsilon must be in [0, 1]",
        )?;
        check(
            self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
            "rl.epsilon_decay must be in (0, 1]",
        )?;
        check(
            (0.0..=self.initial_epsilon).contains(&self.min_epsilon),
            "rl.min_epsilon must be in [0, initial_epsilon]",
        )
    }
}
