//! Fine-grained need decay: bladder pressure, accidents, tension and health

use crate::core::random::RandomSource;
use crate::entity::cat::Quirk;
use crate::house::MessKind;
use crate::simulation::events::LogCategory;
use crate::simulation::session::GameSession;

/// Happiness and health lost when a cat has an accident
pub const ACCIDENT_PENALTY: i32 = 5;

impl GameSession {
    /// One firing of the decay timer
    pub fn run_decay_tick(&mut self, rng: &mut dyn RandomSource) {
        if !self.is_running() {
            return;
        }
        self.decay_ticks += 1;

        for idx in 0..self.cats.len() {
            if !self.cats[idx].is_active() {
                continue;
            }
            let config = &self.config;
            let cat = &mut self.cats[idx];
            let rate = match cat.quirk {
                Quirk::Messy => config.mess_per_decay * 2,
                _ => config.mess_per_decay,
            };
            cat.needs.build_mess(rate);

            if cat.needs.needs_litter(config) && !self.house.any_usable_box() {
                let chance = match cat.quirk {
                    Quirk::Anxious => 1.0,
                    _ => config.accident_chance,
                };
                if rng.chance(chance) {
                    self.accident(idx, rng);
                }
            }
        }

        self.apply_tension();

        let every = u64::from(self.config.health_every_n_decay.max(1));
        if self.decay_ticks % every == 0 {
            self.update_health();
        }
    }

    /// A cat with nowhere to go soils the floor of its room
    pub(crate) fn accident(&mut self, idx: usize, rng: &mut dyn RandomSource) {
        let Some(room) = self.cats[idx].room() else {
            return;
        };
        let kind = if rng.chance(0.5) { MessKind::Pee } else { MessKind::Poop };
        let position = self.cats[idx].movement.position;
        self.house.add_mess(room, kind, position);

        let cat = &mut self.cats[idx];
        cat.needs.mess = 0;
        cat.needs.adjust_happiness(-ACCIDENT_PENALTY);
        cat.needs.adjust_health(-ACCIDENT_PENALTY);
        let text = format!(
            "{} couldn't find a usable litter box and had an accident in the {}!",
            cat.name,
            room.display_name()
        );
        tracing::info!(cat = %cat.id, room = %room, ?kind, "accident");

        self.stats.accidents += 1;
        self.log(text, LogCategory::Warning);
        self.add_score(self.config.accident_score);
    }

    /// Move every indoor cat's health toward its target and narrate the changes
    pub(crate) fn update_health(&mut self) {
        for idx in 0..self.cats.len() {
            let Some(room) = self.cats[idx].room() else {
                continue;
            };
            let cleanliness = self.house.room(room).cleanliness();
            let config = &self.config;
            let cat = &mut self.cats[idx];
            let Some(change) = cat.needs.recompute_health(cleanliness, config) else {
                continue;
            };
            let direction = if change.after > change.before { "improved" } else { "declined" };
            let text = format!(
                "{}'s health {direction} from {} to {} ({})",
                cat.name,
                change.before,
                change.after,
                change.describe_reasons()
            );
            self.log(text, LogCategory::Health);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::SimulationConfig;
    use crate::core::random::ScriptedRandom;
    use crate::simulation::session::{GameSession, SessionSettings};
    use crate::simulation::events::LogCategory;

    fn session() -> GameSession {
        let mut rng = ScriptedRandom::constant(0.5);
        GameSession::new(SessionSettings::default(), SimulationConfig::default(), &mut rng)
    }

    #[test]
    fn test_mess_builds_for_awake_indoor_cats() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        let pip = s.find_cat("pip").unwrap();
        let mittens = s.find_cat("mittens").unwrap();
        let scampi = s.find_cat("scampi").unwrap();
        s.cats[scampi].asleep = true;

        s.run_decay_tick(&mut rng);
        assert_eq!(s.cats[pip].needs.mess, 5);
        // Messy cats fill up twice as fast
        assert_eq!(s.cats[mittens].needs.mess, 30);
        assert_eq!(s.cats[scampi].needs.mess, 15);
    }

    #[test]
    fn test_anxious_cat_always_has_accident_without_box() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.99);
        for b in &mut s.house.litter_boxes {
            b.uses = b.capacity;
        }
        let scampi = s.find_cat("scampi").unwrap();
        s.cats[scampi].needs.mess = 80;

        s.run_decay_tick(&mut rng);
        assert_eq!(s.cats[scampi].needs.mess, 0);
        assert_eq!(s.house.total_messes(), 1);
        assert_eq!(s.stats.accidents, 1);
        assert_eq!(s.score, s.config.accident_score);
    }

    #[test]
    fn test_no_accident_while_a_box_is_usable() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.0);
        let scampi = s.find_cat("scampi").unwrap();
        s.cats[scampi].needs.mess = 95;
        s.run_decay_tick(&mut rng);
        assert_eq!(s.house.total_messes(), 0);
    }

    #[test]
    fn test_health_recomputed_on_cadence() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        s.drain_messages();
        let oscar = s.find_cat("oscar").unwrap();
        s.cats[oscar].needs.hunger = 120;
        s.cats[oscar].needs.happiness = 5;

        s.run_decay_tick(&mut rng);
        s.run_decay_tick(&mut rng);
        assert_eq!(s.cats[oscar].needs.health, 90);
        s.run_decay_tick(&mut rng);
        assert_eq!(s.cats[oscar].needs.health, 85);
        assert!(s
            .drain_messages()
            .iter()
            .any(|m| m.category == LogCategory::Health && m.text.starts_with("Oscar's health declined")));
    }

    #[test]
    fn test_paused_session_does_not_decay() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        s.paused = true;
        s.run_decay_tick(&mut rng);
        assert_eq!(s.decay_ticks, 0);
        assert!(s.cats.iter().all(|c| c.needs.mess <= 20));
    }
}
