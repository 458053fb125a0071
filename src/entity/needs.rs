//! Per-cat need counters and their decay rules
//!
//! All counters are integers. Hunger is clamped at 0 and soft-capped,
//! happiness, mess and health live in 0..=100.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;

pub const HUNGER_CAP: i32 = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Needs {
    /// 0 = full, 100+ = starving
    pub hunger: i32,
    /// 0 = miserable, 100 = delighted
    pub happiness: i32,
    /// 0 = just used the box, 100 = desperate
    pub mess: i32,
    pub health: i32,
    /// Only aggressive cats track this
    pub aggression: Option<i32>,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            hunger: 50,
            happiness: 50,
            mess: 0,
            health: 90,
            aggression: None,
        }
    }
}

impl Needs {
    /// Keep every counter inside its range
    pub fn clamp(&mut self) {
        self.hunger = self.hunger.clamp(0, HUNGER_CAP);
        self.happiness = self.happiness.clamp(0, 100);
        self.mess = self.mess.clamp(0, 100);
        self.health = self.health.clamp(0, 100);
        if let Some(aggression) = self.aggression.as_mut() {
            *aggression = (*aggression).clamp(0, 100);
        }
    }

    pub fn adjust_happiness(&mut self, delta: i32) {
        self.happiness = (self.happiness + delta).clamp(0, 100);
    }

    pub fn adjust_health(&mut self, delta: i32) {
        self.health = (self.health + delta).clamp(0, 100);
    }

    pub fn adjust_hunger(&mut self, delta: i32) {
        self.hunger = (self.hunger + delta).clamp(0, HUNGER_CAP);
    }

    pub fn adjust_aggression(&mut self, delta: i32) {
        if let Some(aggression) = self.aggression.as_mut() {
            *aggression = (*aggression + delta).clamp(0, 100);
        }
    }

    pub fn is_hungry(&self, config: &SimulationConfig) -> bool {
        self.hunger > config.hunger_seek_threshold
    }

    pub fn needs_litter(&self, config: &SimulationConfig) -> bool {
        self.mess > config.mess_seek_threshold
    }

    /// Decay applied on every phase transition. Returns true if the cat is starving.
    pub fn phase_decay(&mut self, config: &SimulationConfig) -> bool {
        self.adjust_hunger(config.hunger_per_phase);
        let starving = self.hunger > config.starving_threshold;
        if starving {
            self.adjust_happiness(-config.starving_happiness_penalty);
        }
        self.adjust_aggression(config.aggression_per_phase);
        starving
    }

    /// Bladder pressure added by the decay timer
    pub fn build_mess(&mut self, amount: i32) {
        self.mess = (self.mess + amount).clamp(0, 100);
    }

    /// Move health toward the weighted target, at most `health_max_step` at a time
    ///
    /// Returns the change with the reasons that drove it, or None if health did not move.
    pub fn recompute_health(&mut self, room_cleanliness: i32, config: &SimulationConfig) -> Option<HealthChange> {
        let target = health_target(self, room_cleanliness);
        let step = config.health_max_step.max(0);
        let delta = (target - self.health).clamp(-step, step);
        if delta == 0 {
            return None;
        }

        let before = self.health;
        self.adjust_health(delta);
        let reasons = health_reasons(self, room_cleanliness, delta > 0);
        Some(HealthChange {
            before,
            after: self.health,
            reasons,
        })
    }
}

/// 0.3 * fullness + 0.3 * happiness + 0.2 * relief + 0.2 * room cleanliness
pub fn health_target(needs: &Needs, room_cleanliness: i32) -> i32 {
    let fullness = (100 - needs.hunger).clamp(0, 100);
    let relief = 100 - needs.mess.clamp(0, 100);
    let weighted = 3 * fullness + 3 * needs.happiness.clamp(0, 100) + 2 * relief + 2 * room_cleanliness.clamp(0, 100);
    (weighted + 5) / 10
}

fn health_reasons(needs: &Needs, room_cleanliness: i32, improving: bool) -> Vec<HealthReason> {
    let mut reasons = Vec::new();
    if improving {
        if needs.hunger <= 30 {
            reasons.push(HealthReason::WellFed);
        }
        if needs.happiness >= 70 {
            reasons.push(HealthReason::Happy);
        }
        if room_cleanliness >= 100 {
            reasons.push(HealthReason::CleanRoom);
        }
    } else {
        if needs.hunger > 70 {
            reasons.push(HealthReason::Hungry);
        }
        if needs.happiness < 30 {
            reasons.push(HealthReason::Unhappy);
        }
        if needs.mess > 70 {
            reasons.push(HealthReason::NeedsLitterBox);
        }
        if room_cleanliness < 60 {
            reasons.push(HealthReason::DirtyRoom);
        }
    }
    reasons
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthReason {
    WellFed,
    Happy,
    CleanRoom,
    Hungry,
    Unhappy,
    NeedsLitterBox,
    DirtyRoom,
}

impl HealthReason {
    pub fn describe(self) -> &'static str {
        match self {
            HealthReason::WellFed => "well fed",
            HealthReason::Happy => "happy",
            HealthReason::CleanRoom => "clean surroundings",
            HealthReason::Hungry => "hungry",
            HealthReason::Unhappy => "unhappy",
            HealthReason::NeedsLitterBox => "needs a litter box",
            HealthReason::DirtyRoom => "dirty room",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthChange {
    pub before: i32,
    pub after: i32,
    pub reasons: Vec<HealthReason>,
}

impl HealthChange {
    pub fn describe_reasons(&self) -> String {
        if self.reasons.is_empty() {
            return "general wellbeing".to_string();
        }
        self.reasons
            .iter()
            .map(|r| r.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
