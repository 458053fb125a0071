//! Score bookkeeping, daily statistics and session outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::GameMode;
use crate::core::types::CatId;
use crate::simulation::events::LogCategory;
use crate::simulation::session::GameSession;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The player ran out of energy
    EnergyDepleted,
    /// Challenge score fell to the floor
    ScoreFloor,
    /// Challenge days all played through
    Completed,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::EnergyDepleted => f.write_str("You are completely exhausted"),
            GameOutcome::ScoreFloor => f.write_str("The household has fallen apart"),
            GameOutcome::Completed => f.write_str("Challenge complete"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub feeds: u32,
    /// Portions eaten from the bowl without help
    pub meals: u32,
    pub cleans: u32,
    pub plays: u32,
    pub energy_spent: u32,
    pub conflicts: u32,
    pub accidents: u32,
}

/// How a cat ended the night
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NightVerdict {
    Asleep,
    /// Awake but content enough to be tucked in
    SettledDown,
    TooUnhappy,
    Found,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: u32,
    pub verdicts: Vec<(CatId, NightVerdict)>,
    pub messes_left: usize,
    pub day_score: i64,
    pub total_score: i64,
    pub stats: DailyStats,
}

impl DaySummary {
    pub fn render(&self) -> String {
        let mut out = format!("End of Day {} Summary:\n", self.day);
        for (cat, verdict) in &self.verdicts {
            let line = match verdict {
                NightVerdict::Asleep => "was already fast asleep",
                NightVerdict::SettledDown => "settled down for the night",
                NightVerdict::TooUnhappy => "was too upset to sleep",
                NightVerdict::Found => "was found outside and brought home",
                NightVerdict::Missing => "could not be found",
            };
            out.push_str(&format!("  {cat} {line}\n"));
        }
        if self.messes_left > 0 {
            out.push_str(&format!("  {} messes left uncleaned\n", self.messes_left));
        }
        out.push_str(&format!(
            "  Feeds {} | Meals {} | Cleans {} | Plays {} | Fights {} | Accidents {} | Energy spent {}\n",
            self.stats.feeds,
            self.stats.meals,
            self.stats.cleans,
            self.stats.plays,
            self.stats.conflicts,
            self.stats.accidents,
            self.stats.energy_spent
        ));
        out.push_str(&format!("  Day score: {} | Total score: {}", self.day_score, self.total_score));
        out
    }
}

impl GameSession {
    /// Adjust the score and check the challenge floor
    pub(crate) fn add_score(&mut self, delta: i64) {
        self.score += delta;
        if self.settings.mode == GameMode::Challenge && self.score <= self.config.score_floor {
            self.end_game(GameOutcome::ScoreFloor);
        }
    }

    /// Spend energy that has already been checked; ends the game at exactly zero
    pub(crate) fn spend_energy(&mut self, amount: u32) {
        let spent = amount.min(self.energy);
        self.energy -= spent;
        self.stats.energy_spent += spent;
        if spent > 0 {
            self.log(format!("(-{spent} energy, {} left)", self.energy), LogCategory::Energy);
        }
        if self.energy == 0 {
            self.end_game(GameOutcome::EnergyDepleted);
        }
    }

    pub(crate) fn restore_energy(&mut self, amount: u32) {
        let before = self.energy;
        self.energy = (self.energy + amount).min(self.config.max_energy);
        if self.energy > before {
            self.log(format!("(+{} energy, {} now)", self.energy - before, self.energy), LogCategory::Energy);
        }
    }

    /// Record the outcome once; later calls are ignored
    pub(crate) fn end_game(&mut self, outcome: GameOutcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.end_all_fights();
        tracing::info!(?outcome, score = self.score, day = self.clock.day(), "game over");
        self.log(format!("GAME OVER: {outcome}. Final score: {}", self.score), LogCategory::Summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Difficulty, SimulationConfig};
    use crate::core::random::ScriptedRandom;
    use crate::entity::movement::Activity;
    use crate::simulation::session::SessionSettings;

    fn session(mode: GameMode) -> GameSession {
        let settings = SessionSettings {
            player_name: "tester".into(),
            difficulty: Difficulty::Normal,
            mode,
        };
        let mut rng = ScriptedRandom::constant(0.5);
        GameSession::new(settings, SimulationConfig::default(), &mut rng)
    }

    #[test]
    fn test_score_floor_only_in_challenge() {
        let mut s = session(GameMode::Challenge);
        s.add_score(-60);
        assert_eq!(s.outcome, Some(GameOutcome::ScoreFloor));

        let mut s = session(GameMode::Endless);
        s.add_score(-600);
        assert_eq!(s.outcome, None);
    }

    #[test]
    fn test_energy_depletion_fires_once() {
        let mut s = session(GameMode::Endless);
        let energy = s.energy;
        s.spend_energy(energy);
        assert_eq!(s.energy, 0);
        assert_eq!(s.outcome, Some(GameOutcome::EnergyDepleted));

        let game_over_messages = s
            .drain_messages()
            .into_iter()
            .filter(|m| m.text.starts_with("GAME OVER"))
            .count();
        assert_eq!(game_over_messages, 1);

        s.spend_energy(10);
        s.end_game(GameOutcome::ScoreFloor);
        assert_eq!(s.energy, 0);
        assert_eq!(s.outcome, Some(GameOutcome::EnergyDepleted));
        assert!(s.drain_messages().iter().all(|m| !m.text.starts_with("GAME OVER")));
    }

    #[test]
    fn test_game_over_releases_fighters() {
        let mut s = session(GameMode::Endless);
        let (a, b) = (s.find_cat("oscar").unwrap(), s.find_cat("scampi").unwrap());
        s.start_fight(a, b);
        s.end_game(GameOutcome::EnergyDepleted);
        assert!(s.fights.is_empty());
        for idx in [a, b] {
            assert_ne!(s.cats[idx].movement.activity, Activity::Fighting);
            assert!(s.cats[idx].movement.fight_cooldown_ms > 0);
        }
    }

    #[test]
    fn test_restore_energy_capped() {
        let mut s = session(GameMode::Endless);
        s.spend_energy(10);
        s.restore_energy(500);
        assert_eq!(s.energy, s.config.max_energy);
    }
}
