//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every field has a default, so a
//! TOML override file only needs to name the values it changes.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{CatLifeError, Result};
use crate::core::types::Millis;

/// How forgiving the household is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Normal => f.write_str("normal"),
            Difficulty::Hard => f.write_str("hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = CatLifeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(CatLifeError::ConfigError(format!("unknown difficulty '{other}'"))),
        }
    }
}

/// Challenge runs for a fixed number of days with a score floor; endless never stops on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Challenge,
    Endless,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Challenge => f.write_str("challenge"),
            GameMode::Endless => f.write_str("endless"),
        }
    }
}

impl FromStr for GameMode {
    type Err = CatLifeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "challenge" => Ok(GameMode::Challenge),
            "endless" => Ok(GameMode::Endless),
            other => Err(CatLifeError::ConfigError(format!("unknown game mode '{other}'"))),
        }
    }
}

/// Configuration for the simulation systems
///
/// These values have been tuned for a day that lasts a few minutes of play.
/// Changing them will affect pacing and feel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === ENERGY ===
    /// Player energy ceiling. Every action spends from this pool.
    pub max_energy: u32,
    /// Energy restored on every phase transition
    pub energy_per_phase: u32,
    pub feed_cost: u32,
    pub play_cost: u32,
    pub clean_mess_cost: u32,
    pub clean_box_cost: u32,
    pub fill_bowl_cost: u32,
    pub move_cost: u32,
    pub door_cost: u32,
    /// Cost of carrying a cat outside or letting it back in
    pub outdoor_cost: u32,
    pub sleep_cost: u32,
    pub separate_cost: u32,
    /// Spent per cat that has to be searched for at nightfall
    pub search_cost: u32,

    // === NEEDS ===
    /// Hunger added to every cat on a phase transition
    pub hunger_per_phase: i32,
    /// Above this hunger, phase decay also costs happiness
    pub starving_threshold: i32,
    pub starving_happiness_penalty: i32,
    pub aggression_per_phase: i32,
    /// Hunger above which a cat walks to the food bowl on its own
    pub hunger_seek_threshold: i32,
    /// Hunger removed when a cat eats from the bowl
    pub eat_amount: i32,
    /// Hunger removed when the player feeds a cat directly
    pub feed_amount: i32,
    pub feed_happiness: i32,
    pub play_happiness: i32,
    pub play_aggression_relief: i32,
    /// Mess level added per decay tick to every awake indoor cat
    pub mess_per_decay: i32,
    /// Mess level above which a cat looks for a litter box
    pub mess_seek_threshold: i32,
    /// Happiness lost per decay tick by each cat of a co-located disliking pair
    pub tension_penalty: i32,
    /// Health is recomputed every N decay ticks
    pub health_every_n_decay: u32,
    /// Largest change to health in a single recompute
    pub health_max_step: i32,
    /// Minimum happiness a cat needs before it agrees to sleep
    pub sleep_happiness_threshold: i32,
    /// Happiness every cat gains when the player cleans up
    pub clean_happiness: i32,

    // === STATIONS ===
    pub bowl_capacity: u32,
    pub litter_box_count: usize,
    /// Uses before a litter box is unusable
    pub litter_box_capacity: u32,
    /// Cleanliness lost per use
    pub litter_box_wear: i32,
    /// Chance of an accident when a cat needs a box and none is usable
    pub accident_chance: f32,

    // === CONFLICT ===
    /// Two disliking cats closer than this start a fight
    pub fight_distance: f32,
    /// Two friendly cats closer than this step aside
    pub avoid_distance: f32,
    pub fight_happiness_penalty: i32,
    pub fight_health_penalty: i32,
    pub fight_duration_ms: Millis,
    /// After a fight neither cat can fight again for this long
    pub fight_cooldown_ms: Millis,
    /// How far apart fighting cats are pushed once the fight ends
    pub fight_repulsion: f32,

    // === MOVEMENT ===
    /// Walking speed in house units per second
    pub base_speed: f32,
    /// Per-cat speed variation, keeps cats from moving in lockstep
    pub speed_jitter: f32,
    pub arrive_epsilon: f32,
    /// Keeps wander targets away from the walls
    pub room_margin: f32,
    /// Chance to rest instead of picking a new wander target
    pub rest_chance: f32,
    pub rest_min_ms: Millis,
    pub rest_max_ms: Millis,

    // === TIME ===
    /// Player actions that push the clock to the next phase
    pub actions_per_phase: u32,
    pub phase_interval_ms: Millis,
    pub decay_interval_ms: Millis,
    pub frame_ms: Millis,
    /// Hunger built up overnight, applied on a new day
    pub overnight_hunger: i32,

    // === OUTDOORS ===
    pub wont_come_back_chance: f32,
    pub search_find_chance: f32,

    // === HOUSEHOLD EVENTS ===
    /// Chance of a surprise after each completed player action (never at night)
    pub random_event_chance: f32,

    // === SCORING ===
    pub feed_score: i64,
    pub play_score: i64,
    pub clean_mess_score: i64,
    pub fill_bowl_score: i64,
    pub let_in_score: i64,
    pub eat_score: i64,
    pub all_fed_bonus: i64,
    pub accident_score: i64,
    pub fight_score: i64,
    pub separate_score: i64,
    pub theft_score: i64,
    pub sleep_bonus: i64,
    pub awake_content_bonus: i64,
    pub unhappy_night_penalty: i64,
    pub mess_left_penalty: i64,
    pub missing_penalty: i64,
    pub found_penalty: i64,
    /// Surprise mess left by a cat on its own
    pub event_mess_score: i64,
    pub sunbeam_score: i64,
    /// Challenge mode ends when the score falls to this value
    pub score_floor: i64,
    /// Days in a challenge run
    pub challenge_days: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_energy: 100,
            energy_per_phase: 20,
            feed_cost: 5,
            play_cost: 8,
            clean_mess_cost: 4,
            clean_box_cost: 6,
            fill_bowl_cost: 5,
            move_cost: 3,
            door_cost: 1,
            outdoor_cost: 2,
            sleep_cost: 2,
            separate_cost: 6,
            search_cost: 15,

            hunger_per_phase: 15,
            starving_threshold: 80,
            starving_happiness_penalty: 10,
            aggression_per_phase: 10,
            hunger_seek_threshold: 70,
            eat_amount: 40,
            feed_amount: 50,
            feed_happiness: 10,
            play_happiness: 20,
            play_aggression_relief: 15,
            mess_per_decay: 5,
            mess_seek_threshold: 70,
            tension_penalty: 1,
            health_every_n_decay: 3,
            health_max_step: 5,
            sleep_happiness_threshold: 50,
            clean_happiness: 5,

            bowl_capacity: 6,
            litter_box_count: 3,
            litter_box_capacity: 5,
            litter_box_wear: 20,
            accident_chance: 0.5,

            fight_distance: 30.0,
            avoid_distance: 20.0,
            fight_happiness_penalty: 15,
            fight_health_penalty: 5,
            fight_duration_ms: 3_000,
            fight_cooldown_ms: 8_000,
            fight_repulsion: 80.0,

            base_speed: 60.0,
            speed_jitter: 15.0,
            arrive_epsilon: 2.0,
            room_margin: 20.0,
            rest_chance: 0.3,
            rest_min_ms: 2_000,
            rest_max_ms: 6_000,

            actions_per_phase: 8,
            phase_interval_ms: 120_000,
            decay_interval_ms: 5_000,
            frame_ms: 50,
            overnight_hunger: 20,

            wont_come_back_chance: 0.25,
            search_find_chance: 0.6,

            random_event_chance: 0.3,

            feed_score: 5,
            play_score: 3,
            clean_mess_score: 3,
            fill_bowl_score: 3,
            let_in_score: 5,
            eat_score: 2,
            all_fed_bonus: 10,
            accident_score: -2,
            fight_score: -3,
            separate_score: 5,
            theft_score: -2,
            sleep_bonus: 10,
            awake_content_bonus: 5,
            unhappy_night_penalty: -5,
            mess_left_penalty: -5,
            missing_penalty: -50,
            found_penalty: -5,
            event_mess_score: -2,
            sunbeam_score: 2,
            score_floor: -50,
            challenge_days: 7,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults tuned for the given difficulty
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::default().with_difficulty(difficulty)
    }

    /// Scale energy and stress parameters for a difficulty level
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => {
                self.max_energy = 130;
                self.energy_per_phase = 25;
                self.accident_chance = 0.3;
                self.wont_come_back_chance = 0.15;
                self.search_find_chance = 0.8;
            }
            Difficulty::Normal => {}
            Difficulty::Hard => {
                self.max_energy = 80;
                self.energy_per_phase = 15;
                self.hunger_per_phase = 20;
                self.accident_chance = 0.7;
                self.wont_come_back_chance = 0.35;
                self.search_find_chance = 0.45;
            }
        }
        self
    }

    /// Parse a TOML override; fields that are absent keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_energy == 0 {
            return Err(CatLifeError::ConfigError("max_energy must be positive".into()));
        }

        if self.frame_ms == 0 || self.decay_interval_ms == 0 || self.phase_interval_ms == 0 {
            return Err(CatLifeError::ConfigError("driver intervals must be positive".into()));
        }

        // Frames must be finer than decay ticks, decay finer than phases
        if self.frame_ms > self.decay_interval_ms || self.decay_interval_ms > self.phase_interval_ms {
            return Err(CatLifeError::ConfigError(format!(
                "intervals must satisfy frame_ms ({}) <= decay_interval_ms ({}) <= phase_interval_ms ({})",
                self.frame_ms, self.decay_interval_ms, self.phase_interval_ms
            )));
        }

        if self.rest_min_ms > self.rest_max_ms {
            return Err(CatLifeError::ConfigError(format!(
                "rest_min_ms ({}) should be <= rest_max_ms ({})",
                self.rest_min_ms, self.rest_max_ms
            )));
        }

        if self.litter_box_count == 0 || self.litter_box_capacity == 0 {
            return Err(CatLifeError::ConfigError("there must be at least one usable litter box".into()));
        }

        for (name, p) in [
            ("accident_chance", self.accident_chance),
            ("rest_chance", self.rest_chance),
            ("wont_come_back_chance", self.wont_come_back_chance),
            ("search_find_chance", self.search_find_chance),
            ("random_event_chance", self.random_event_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CatLifeError::ConfigError(format!("{name} ({p}) must be within 0..=1")));
            }
        }

        if self.base_speed <= self.speed_jitter {
            return Err(CatLifeError::ConfigError("base_speed must exceed speed_jitter".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert!(SimulationConfig::for_difficulty(difficulty).validate().is_ok());
        }
    }

    #[test]
    fn test_difficulty_scales_energy() {
        let easy = SimulationConfig::for_difficulty(Difficulty::Easy);
        let hard = SimulationConfig::for_difficulty(Difficulty::Hard);
        assert!(easy.max_energy > hard.max_energy);
        assert!(easy.search_find_chance > hard.search_find_chance);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str("max_energy = 42\nfeed_cost = 1\n").unwrap();
        assert_eq!(config.max_energy, 42);
        assert_eq!(config.feed_cost, 1);
        assert_eq!(config.play_cost, SimulationConfig::default().play_cost);
    }

    #[test]
    fn test_invalid_intervals_rejected() {
        let config = SimulationConfig {
            frame_ms: 10_000,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(SimulationConfig::from_toml_str("accident_chance = 1.5").is_err());
        assert!(SimulationConfig::from_toml_str("random_event_chance = -0.1").is_err());
    }

    #[test]
    fn test_parse_difficulty_and_mode() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("endless".parse::<GameMode>().unwrap(), GameMode::Endless);
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}
