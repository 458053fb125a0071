//! Phase transitions, the nightly resolution and the new-day reset

use crate::core::calendar::Phase;
use crate::core::config::GameMode;
use crate::core::error::{CatLifeError, Result};
use crate::core::random::RandomSource;
use crate::core::types::Location;
use crate::house::rooms::RoomId;
use crate::simulation::events::LogCategory;
use crate::simulation::scoring::{DailyStats, DaySummary, GameOutcome, NightVerdict};
use crate::simulation::session::GameSession;

/// Happiness lost by a cat that had to be hunted down at night
const FOUND_HAPPINESS_PENALTY: i32 = 10;

impl GameSession {
    /// Count a completed player action, advancing the phase when the budget is
    /// spent, then give the household a chance to act up
    pub(crate) fn finish_action(&mut self, rng: &mut dyn RandomSource) {
        if self.is_game_over() || self.clock.is_day_over() {
            return;
        }
        if self.clock.record_action(self.config.actions_per_phase) {
            self.advance_phase(rng);
        }
        self.roll_incident(rng);
    }

    /// Move to the next phase and apply its side effects
    pub fn advance_phase(&mut self, rng: &mut dyn RandomSource) {
        if self.is_game_over() || self.clock.is_day_over() {
            return;
        }
        let Some(phase) = self.clock.advance() else {
            return;
        };
        tracing::info!(day = self.clock.day(), %phase, "phase advanced");
        self.log(format!("It is now {phase}."), LogCategory::Game);

        for idx in 0..self.cats.len() {
            if self.cats[idx].is_missing() {
                continue;
            }
            let config = &self.config;
            let cat = &mut self.cats[idx];
            if cat.needs.phase_decay(config) {
                let text = format!("{} is starving!", cat.name);
                self.log(text, LogCategory::Warning);
            }
        }
        self.restore_energy(self.config.energy_per_phase);

        match phase {
            Phase::Evening => self.enter_evening(),
            Phase::Night => self.enter_night(rng),
            Phase::Morning | Phase::Afternoon => {}
        }
    }

    fn enter_evening(&mut self) {
        for cat in &mut self.cats {
            cat.fed = false;
        }
        self.log("Evening has arrived. Time for the evening feeding!", LogCategory::Game);

        let outside: Vec<String> = self
            .cats
            .iter()
            .filter(|c| c.is_outside())
            .map(|c| c.name.clone())
            .collect();
        for name in outside {
            self.log(format!("{name} is still outside! Let them in before nightfall."), LogCategory::Warning);
        }
    }

    /// Search for stragglers, judge every cat, then close the day
    fn enter_night(&mut self, rng: &mut dyn RandomSource) {
        self.end_all_fights();
        let mut verdicts = Vec::new();

        for idx in 0..self.cats.len() {
            if self.cats[idx].is_outside() {
                let verdict = self.search_for(idx, rng);
                verdicts.push((self.cats[idx].id.clone(), verdict));
            }
        }

        for idx in 0..self.cats.len() {
            let cat = &self.cats[idx];
            if cat.is_missing() || verdicts.iter().any(|(id, _)| id == &cat.id) {
                continue;
            }
            let verdict = if cat.asleep {
                NightVerdict::Asleep
            } else if cat.needs.happiness >= self.config.sleep_happiness_threshold {
                NightVerdict::SettledDown
            } else {
                NightVerdict::TooUnhappy
            };
            let delta = match verdict {
                NightVerdict::Asleep => self.config.sleep_bonus,
                NightVerdict::SettledDown => self.config.awake_content_bonus,
                _ => self.config.unhappy_night_penalty,
            };
            if verdict == NightVerdict::SettledDown {
                let cat = &mut self.cats[idx];
                cat.asleep = true;
                cat.movement.fall_asleep();
            }
            verdicts.push((self.cats[idx].id.clone(), verdict));
            self.add_score(delta);
        }

        let messes_left = self.house.total_messes();
        if messes_left > 0 {
            self.add_score(self.config.mess_left_penalty * messes_left as i64);
        }

        let summary = DaySummary {
            day: self.clock.day(),
            verdicts,
            messes_left,
            day_score: self.score - self.day_start_score,
            total_score: self.score,
            stats: self.stats.clone(),
        };
        tracing::info!(day = summary.day, day_score = summary.day_score, total = summary.total_score, "day over");
        self.log(summary.render(), LogCategory::Summary);
        self.last_summary = Some(summary);
        self.clock.end_day();

        if self.settings.mode == GameMode::Challenge && self.clock.day() >= self.config.challenge_days {
            self.end_game(GameOutcome::Completed);
        }
        if !self.is_game_over() {
            self.log("Type 'newday' to start the next day.", LogCategory::Game);
        }
    }

    /// Night search for a cat still outside. It always ends indoors or missing.
    fn search_for(&mut self, idx: usize, rng: &mut dyn RandomSource) -> NightVerdict {
        let name = self.cats[idx].name.clone();
        self.log(format!("You go out searching for {name}..."), LogCategory::Game);
        self.spend_energy(self.config.search_cost);

        let mut chance = self.config.search_find_chance;
        if self.cats[idx].wont_come_back {
            chance /= 2.0;
        }
        if rng.chance(chance) {
            self.relocate(idx, Location::Room(RoomId::ENTRY), rng);
            let cat = &mut self.cats[idx];
            cat.wont_come_back = false;
            cat.needs.adjust_happiness(-FOUND_HAPPINESS_PENALTY);
            self.log(format!("You found {name} and brought them home."), LogCategory::Event);
            self.add_score(self.config.found_penalty);
            NightVerdict::Found
        } else {
            self.set_location(idx, Location::Missing);
            self.cats[idx].wont_come_back = false;
            tracing::warn!(cat = %self.cats[idx].id, "cat went missing");
            self.log(format!("{name} could not be found and is now missing."), LogCategory::Warning);
            self.add_score(self.config.missing_penalty);
            NightVerdict::Missing
        }
    }

    /// Start the next day once the night has been resolved
    pub fn new_day(&mut self, rng: &mut dyn RandomSource) -> Result<()> {
        if self.is_game_over() {
            return Err(CatLifeError::GameOver);
        }
        if !self.clock.is_day_over() {
            return Err(CatLifeError::InvalidAction("The day isn't over yet.".into()));
        }

        self.clock.start_new_day();
        self.restore_energy(self.config.max_energy / 2);
        self.house.clear_all_messes();
        self.house.door_open = false;
        self.end_all_fights();
        self.stats = DailyStats::default();
        self.day_start_score = self.score;
        self.all_fed_bonus_given = false;

        for idx in 0..self.cats.len() {
            if self.cats[idx].is_missing() {
                continue;
            }
            let overnight = self.config.overnight_hunger;
            let cat = &mut self.cats[idx];
            cat.needs.adjust_hunger(overnight);
            cat.fed = false;
            cat.asleep = false;
            cat.wont_come_back = false;
            let room = RoomId::ALL[rng.index(RoomId::ALL.len())];
            self.relocate(idx, Location::Room(room), rng);
        }

        tracing::info!(day = self.clock.day(), "new day");
        self.log(format!("Day {} begins. Good morning!", self.clock.day()), LogCategory::Game);
        Ok(())
    }
}
