//! The game session: every piece of mutable simulation state in one place
//!
//! The session is plain data plus methods. It never renders and never talks
//! to the outside world; narration is queued in an outbox that the driver
//! drains after each operation.

use serde::{Deserialize, Serialize};

use crate::core::calendar::{DayClock, Phase};
use crate::core::config::{Difficulty, GameMode, SimulationConfig};
use crate::core::error::{CatLifeError, Result};
use crate::core::random::RandomSource;
use crate::core::types::{CatId, Location};
use crate::entity::cat::{starting_household, Cat};
use crate::house::House;
use crate::simulation::conflict::Fight;
use crate::simulation::events::{GameMessage, LogCategory};
use crate::simulation::scoring::{DailyStats, DaySummary, GameOutcome};

pub const MAX_SPEED: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub mode: GameMode,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            difficulty: Difficulty::Normal,
            mode: GameMode::Challenge,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub settings: SessionSettings,
    pub config: SimulationConfig,
    pub clock: DayClock,
    pub score: i64,
    /// Score when the current day began
    pub day_start_score: i64,
    pub energy: u32,
    /// Roster order is the iteration order for every per-cat rule
    pub cats: Vec<Cat>,
    pub house: House,
    pub fights: Vec<Fight>,
    pub selected: Option<CatId>,
    pub paused: bool,
    /// Simulation speed multiplier, 1..=MAX_SPEED
    pub speed: u32,
    pub outcome: Option<GameOutcome>,
    pub stats: DailyStats,
    pub last_summary: Option<DaySummary>,
    /// Decay ticks since the session started (drives the health cadence)
    pub decay_ticks: u64,
    pub(crate) all_fed_bonus_given: bool,
    #[serde(skip)]
    outbox: Vec<GameMessage>,
}

impl GameSession {
    pub fn new(settings: SessionSettings, config: SimulationConfig, rng: &mut dyn RandomSource) -> Self {
        let cats = starting_household(rng, &config);
        let mut house = House::new(&config);
        for cat in &cats {
            if let Some(room) = cat.room() {
                house.room_mut(room).enter(&cat.id);
            }
        }

        let mut session = Self {
            energy: config.max_energy,
            settings,
            config,
            clock: DayClock::new(),
            score: 0,
            day_start_score: 0,
            cats,
            house,
            fights: Vec::new(),
            selected: None,
            paused: false,
            speed: 1,
            outcome: None,
            stats: DailyStats::default(),
            last_summary: None,
            decay_ticks: 0,
            all_fed_bonus_given: false,
            outbox: Vec::new(),
        };
        session.log(
            "Good morning! It's time to feed your cats. Type 'help' to see available commands.",
            LogCategory::Game,
        );
        tracing::info!(
            player = %session.settings.player_name,
            difficulty = %session.settings.difficulty,
            "new session started"
        );
        session
    }

    /// Session with the config that matches the settings' difficulty
    pub fn with_settings(settings: SessionSettings, rng: &mut dyn RandomSource) -> Self {
        let config = SimulationConfig::for_difficulty(settings.difficulty);
        Self::new(settings, config, rng)
    }

    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }

    pub fn day(&self) -> u32 {
        self.clock.day()
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Drivers run only while this holds
    pub fn is_running(&self) -> bool {
        !self.is_game_over() && !self.clock.is_day_over() && !self.paused
    }

    // === MESSAGES ===

    pub fn log(&mut self, text: impl Into<String>, category: LogCategory) {
        self.outbox.push(GameMessage::new(text, category));
    }

    pub fn drain_messages(&mut self) -> Vec<GameMessage> {
        std::mem::take(&mut self.outbox)
    }

    // === LOOKUP ===

    pub fn cat(&self, id: &CatId) -> Option<&Cat> {
        self.cats.iter().find(|c| &c.id == id)
    }

    pub fn index_of(&self, id: &CatId) -> Option<usize> {
        self.cats.iter().position(|c| &c.id == id)
    }

    /// Match a cat by id or display name, case-insensitive, then by unique prefix
    pub fn find_cat(&self, name: &str) -> Result<usize> {
        let needle: String = name.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();
        if needle.is_empty() {
            return Err(CatLifeError::UnknownCat(name.to_string()));
        }

        let exact = self.cats.iter().position(|c| {
            c.id.as_str() == needle || c.name.replace(' ', "").to_lowercase() == needle
        });
        if let Some(idx) = exact {
            return Ok(idx);
        }

        let mut prefixed = self
            .cats
            .iter()
            .enumerate()
            .filter(|(_, c)| c.id.as_str().starts_with(&needle));
        match (prefixed.next(), prefixed.next()) {
            (Some((idx, _)), None) => Ok(idx),
            _ => Err(CatLifeError::UnknownCat(name.to_string())),
        }
    }

    /// Named cat, or the selected one when no name is given
    pub fn resolve_cat(&self, name: Option<&str>) -> Result<usize> {
        match name {
            Some(name) => self.find_cat(name),
            None => match &self.selected {
                Some(id) => self
                    .index_of(id)
                    .ok_or_else(|| CatLifeError::UnknownCat(id.to_string())),
                None => Err(CatLifeError::InvalidAction("Which cat? Name one or select a cat first.".into())),
            },
        }
    }

    // === GUARDS ===

    pub(crate) fn ensure_playing(&self) -> Result<()> {
        if self.is_game_over() {
            return Err(CatLifeError::GameOver);
        }
        if self.clock.is_day_over() {
            return Err(CatLifeError::DayOver);
        }
        Ok(())
    }

    pub(crate) fn ensure_energy(&self, action: &'static str, cost: u32) -> Result<()> {
        if self.energy < cost {
            return Err(CatLifeError::InsufficientEnergy {
                action,
                needed: cost,
                available: self.energy,
            });
        }
        Ok(())
    }

    /// Reject cats that cannot be handled right now
    pub(crate) fn ensure_reachable(&self, idx: usize) -> Result<()> {
        let cat = &self.cats[idx];
        match cat.location {
            Location::Missing => Err(CatLifeError::InvalidAction(format!("{} is missing.", cat.name))),
            Location::Outside => Err(CatLifeError::InvalidAction(format!("{} is outside.", cat.name))),
            Location::Room(_) => Ok(()),
        }
    }

    // === MEMBERSHIP ===

    /// Change a cat's logical location, keeping room occupant lists in sync.
    /// Movement state is left alone; callers rebuild it when needed.
    pub(crate) fn set_location(&mut self, idx: usize, to: Location) {
        let id = self.cats[idx].id.clone();
        if let Some(room) = self.cats[idx].room() {
            self.house.room_mut(room).leave(&id);
        }
        if let Location::Room(room) = to {
            self.house.room_mut(room).enter(&id);
        }
        self.cats[idx].location = to;
    }

    /// Place a cat somewhere new and reset its movement to match
    pub(crate) fn relocate(&mut self, idx: usize, to: Location, rng: &mut dyn RandomSource) {
        self.set_location(idx, to);
        self.release_from_fights(idx);
        if let Location::Room(room) = to {
            let config = &self.config;
            self.cats[idx].movement.rebuild_in(room, rng, config);
        }
    }

    /// Every cat sits in exactly one place and the occupant lists agree
    pub fn check_membership(&self) -> std::result::Result<(), String> {
        for room in self.house.rooms() {
            for (i, id) in room.occupants.iter().enumerate() {
                if room.occupants[i + 1..].contains(id) {
                    return Err(format!("{id} listed twice in {}", room.name()));
                }
                match self.cat(id) {
                    Some(cat) if cat.location == Location::Room(room.id) => {}
                    Some(cat) => return Err(format!("{id} listed in {} but located at {}", room.name(), cat.location)),
                    None => return Err(format!("unknown cat {id} in {}", room.name())),
                }
            }
        }
        for cat in &self.cats {
            let listings = self.house.rooms().filter(|r| r.contains(&cat.id)).count();
            let expected = usize::from(cat.location.is_indoors());
            if listings != expected {
                return Err(format!("{} at {} appears in {listings} room lists", cat.id, cat.location));
            }
        }
        Ok(())
    }

    // === STATUS ===

    pub fn status_report(&self) -> String {
        let mut out = format!(
            "Day {} | {} | Score {} | Energy {}/{}",
            self.day(),
            self.phase(),
            self.score,
            self.energy,
            self.config.max_energy
        );
        if self.paused {
            out.push_str(" | PAUSED");
        }
        if self.speed > 1 {
            out.push_str(&format!(" | x{}", self.speed));
        }
        out.push_str(&format!(
            "\nFood bowl {}/{} | Door {}",
            self.house.bowl.current,
            self.house.bowl.capacity,
            if self.house.door_open { "open" } else { "closed" }
        ));
        for b in &self.house.litter_boxes {
            out.push_str(&format!(
                " | Box {} {}% ({}/{})",
                b.id + 1,
                b.cleanliness,
                b.uses,
                b.capacity
            ));
        }
        for cat in &self.cats {
            let marker = if Some(&cat.id) == self.selected.as_ref() { "*" } else { " " };
            let mut flags = Vec::new();
            if cat.fed {
                flags.push("fed");
            }
            if cat.asleep {
                flags.push("asleep");
            }
            if self.fights.iter().any(|f| f.involves(&cat.id)) {
                flags.push("FIGHTING");
            }
            out.push_str(&format!(
                "\n{marker}{:<8} {:<12} hunger {:>3} happy {:>3} mess {:>3} health {:>3} {}",
                cat.name,
                cat.location.to_string(),
                cat.needs.hunger,
                cat.needs.happiness,
                cat.needs.mess,
                cat.needs.health,
                flags.join(" ")
            ));
        }
        for room in self.house.rooms().filter(|r| !r.messes.is_empty()) {
            let kinds: Vec<String> = room.messes.iter().map(|m| format!("{} #{}", m.kind, m.id)).collect();
            out.push_str(&format!("\nMess in the {}: {}", room.name(), kinds.join(", ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::ScriptedRandom;
    use crate::house::RoomId;

    fn session() -> GameSession {
        let mut rng = ScriptedRandom::constant(0.5);
        GameSession::new(SessionSettings::default(), SimulationConfig::default(), &mut rng)
    }

    #[test]
    fn test_new_session_membership_consistent() {
        let s = session();
        assert!(s.check_membership().is_ok());
        assert_eq!(s.energy, s.config.max_energy);
        assert_eq!(s.phase(), Phase::Morning);
        assert_eq!(s.day(), 1);
    }

    #[test]
    fn test_find_cat_by_name_and_prefix() {
        let s = session();
        assert_eq!(s.cats[s.find_cat("Mochi").unwrap()].id.as_str(), "mochi");
        assert_eq!(s.cats[s.find_cat("osc").unwrap()].id.as_str(), "oscar");
        // "m" matches both mochi and mittens
        assert!(s.find_cat("m").is_err());
        assert!(s.find_cat("garfield").is_err());
    }

    #[test]
    fn test_resolve_uses_selection() {
        let mut s = session();
        assert!(s.resolve_cat(None).is_err());
        s.selected = Some(CatId::new("pip"));
        assert_eq!(s.cats[s.resolve_cat(None).unwrap()].id.as_str(), "pip");
    }

    #[test]
    fn test_relocate_keeps_membership() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.25);
        let idx = s.find_cat("pip").unwrap();

        s.relocate(idx, Location::Room(RoomId::Kitchen), &mut rng);
        assert!(s.check_membership().is_ok());
        assert!(s.house.room(RoomId::Kitchen).contains(&CatId::new("pip")));
        assert!(RoomId::Kitchen.bounds().contains(s.cats[idx].movement.position));

        s.relocate(idx, Location::Outside, &mut rng);
        assert!(s.check_membership().is_ok());
        assert!(s.house.rooms().all(|r| !r.contains(&CatId::new("pip"))));
    }

    #[test]
    fn test_membership_check_catches_drift() {
        let mut s = session();
        s.cats[0].location = Location::Outside;
        assert!(s.check_membership().is_err());
    }
}
