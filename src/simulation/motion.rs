//! Per-frame movement: walking, resting, arriving, and bumping into each other
//!
//! Frame order: fights and cooldowns tick first, then every cat in roster
//! order steps toward its target and resolves arrival, then collisions are
//! checked over the new positions.

use crate::core::random::RandomSource;
use crate::core::types::{Location, Millis};
use crate::entity::cat::in_conflict;
use crate::entity::movement::{random_point_in, Activity, Intent};
use crate::house::rooms::RoomId;
use crate::house::stations::cleanest_usable;
use crate::simulation::events::LogCategory;
use crate::simulation::session::GameSession;

/// Happiness a cat gains from a meal it found on its own
const MEAL_HAPPINESS: i32 = 5;

impl GameSession {
    /// One frame of continuous movement
    pub fn run_frame(&mut self, dt_ms: Millis, rng: &mut dyn RandomSource) {
        if !self.is_running() {
            return;
        }
        self.tick_fights(dt_ms);
        for idx in 0..self.cats.len() {
            self.update_cat(idx, dt_ms, rng);
        }
        self.resolve_collisions(rng);
    }

    fn update_cat(&mut self, idx: usize, dt_ms: Millis, rng: &mut dyn RandomSource) {
        if !self.cats[idx].is_active() {
            return;
        }
        let movement = &mut self.cats[idx].movement;
        match movement.activity {
            Activity::Fighting | Activity::Sleeping => return,
            Activity::Resting { remaining_ms } => {
                if remaining_ms > dt_ms {
                    movement.activity = Activity::Resting {
                        remaining_ms: remaining_ms - dt_ms,
                    };
                } else {
                    movement.activity = Activity::Moving;
                    self.choose_next(idx, rng);
                }
                return;
            }
            Activity::Moving => {}
        }

        if movement.target.is_none() {
            self.choose_next(idx, rng);
            return;
        }
        movement.step(dt_ms);
        if movement.arrived(self.config.arrive_epsilon) {
            self.on_arrival(idx, rng);
        }
    }

    /// Reached the current target: hop a doorway, or finish what the cat came for
    fn on_arrival(&mut self, idx: usize, rng: &mut dyn RandomSource) {
        let movement = &mut self.cats[idx].movement;
        if let Some(route) = movement.route.as_mut() {
            route.next_hop += 1;
            if !route.is_complete() {
                movement.target = route.next_doorway();
                return;
            }
            let destination = route.destination();
            movement.route = None;
            movement.target = None;
            let intent = movement.intent;
            self.set_location(idx, Location::Room(destination));
            self.target_for_intent(idx, destination, intent, rng);
            return;
        }

        let intent = movement.intent;
        match intent {
            // Fed by hand on the way over
            Intent::SeekFood if self.cats[idx].fed => {}
            Intent::SeekFood => self.eat_at_bowl(idx),
            Intent::SeekLitter(box_id) => self.use_litter_box(idx, box_id),
            Intent::Wander => {}
        }
        self.choose_next(idx, rng);
    }

    /// Final leg inside the destination room
    fn target_for_intent(&mut self, idx: usize, room: RoomId, intent: Intent, rng: &mut dyn RandomSource) {
        let goal = match intent {
            Intent::SeekFood => self.house.bowl.position,
            Intent::SeekLitter(box_id) => match self.house.litter_box(box_id) {
                Some(b) => b.position,
                None => random_point_in(room, rng, &self.config),
            },
            Intent::Wander => random_point_in(room, rng, &self.config),
        };
        self.cats[idx].movement.target = Some(goal);
    }

    /// Pick the next thing to do: food, then litter box, then rest or wander
    pub(crate) fn choose_next(&mut self, idx: usize, rng: &mut dyn RandomSource) {
        let Some(room) = self.cats[idx].room() else {
            return;
        };
        let config = &self.config;
        let cat = &mut self.cats[idx];

        if !cat.fed && cat.needs.is_hungry(config) && !self.house.bowl.is_empty() {
            cat.movement
                .head_to(room, RoomId::Kitchen, self.house.bowl.position, Intent::SeekFood);
            return;
        }
        if cat.needs.needs_litter(config) {
            if let Some(box_id) = cleanest_usable(&self.house.litter_boxes) {
                let goal = self.house.litter_boxes[box_id].position;
                cat.movement
                    .head_to(room, RoomId::Bathroom, goal, Intent::SeekLitter(box_id));
                return;
            }
        }
        if rng.chance(config.rest_chance) {
            cat.movement.rest(rng, config);
        } else {
            cat.movement.wander_to(room, rng, config);
        }
    }

    fn eat_at_bowl(&mut self, idx: usize) {
        if !self.house.bowl.take_portion() {
            let text = format!("{} found the food bowl empty.", self.cats[idx].name);
            self.log(text, LogCategory::Event);
            return;
        }
        let config = &self.config;
        let cat = &mut self.cats[idx];
        cat.needs.adjust_hunger(-config.eat_amount);
        cat.needs.adjust_happiness(MEAL_HAPPINESS);
        cat.fed = true;
        let text = format!(
            "{} ate from the food bowl ({} portions left).",
            cat.name, self.house.bowl.current
        );
        tracing::debug!(cat = %cat.id, left = self.house.bowl.current, "ate from bowl");

        self.stats.meals += 1;
        self.log(text, LogCategory::Event);
        self.add_score(self.config.eat_score);
        if self.house.bowl.is_empty() {
            self.log("The food bowl is empty!", LogCategory::Warning);
        }
    }

    fn use_litter_box(&mut self, idx: usize, box_id: usize) {
        let wear = self.config.litter_box_wear;
        let Some(litter_box) = self.house.litter_boxes.get_mut(box_id) else {
            return;
        };
        let number = box_id + 1;
        if !litter_box.use_box(wear) {
            let text = format!("{} found litter box {number} full.", self.cats[idx].name);
            self.log(text, LogCategory::Event);
            return;
        }
        let now_full = !litter_box.is_usable();
        let cat = &mut self.cats[idx];
        cat.needs.mess = 0;
        let text = format!("{} used litter box {number}.", cat.name);
        self.log(text, LogCategory::Event);
        if now_full {
            self.log(format!("Litter box {number} is full and needs cleaning!"), LogCategory::Warning);
        }
    }

    /// Enemies close together fight; anyone else too close steps aside
    fn resolve_collisions(&mut self, rng: &mut dyn RandomSource) {
        let fight_distance = self.config.fight_distance;
        let avoid_distance = self.config.avoid_distance;

        for i in 0..self.cats.len() {
            for j in (i + 1)..self.cats.len() {
                let (a, b) = (&self.cats[i], &self.cats[j]);
                if !a.is_active() || !b.is_active() || a.room() != b.room() {
                    continue;
                }
                if a.movement.is_travelling() || b.movement.is_travelling() {
                    continue;
                }
                let distance = a.movement.position.distance(&b.movement.position);
                let enemies = in_conflict(a, b);

                if enemies && distance <= fight_distance {
                    if self.can_fight(i) && self.can_fight(j) {
                        self.start_fight(i, j);
                        if self.is_game_over() {
                            return;
                        }
                    }
                } else if distance <= avoid_distance {
                    self.step_aside(j, rng);
                }
            }
        }
    }

    fn step_aside(&mut self, idx: usize, rng: &mut dyn RandomSource) {
        let Some(room) = self.cats[idx].room() else {
            return;
        };
        let movement = &self.cats[idx].movement;
        if movement.activity != Activity::Moving || movement.intent != Intent::Wander {
            return;
        }
        let config = &self.config;
        self.cats[idx].movement.wander_to(room, rng, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::random::ScriptedRandom;
    use crate::core::types::{CatId, Vec2};
    use crate::simulation::session::SessionSettings;

    fn session() -> GameSession {
        let mut rng = ScriptedRandom::constant(0.5);
        GameSession::new(SessionSettings::default(), SimulationConfig::default(), &mut rng)
    }

    /// Park every cat asleep so only the cats under test move
    fn quiet(s: &mut GameSession) {
        for cat in &mut s.cats {
            cat.asleep = true;
            cat.movement.fall_asleep();
        }
    }

    fn wake(s: &mut GameSession, name: &str) -> usize {
        let idx = s.find_cat(name).unwrap();
        s.cats[idx].asleep = false;
        s.cats[idx].movement.wake();
        idx
    }

    fn run(s: &mut GameSession, rng: &mut dyn RandomSource, frames: usize) {
        let dt = s.config.frame_ms;
        for _ in 0..frames {
            s.run_frame(dt, rng);
        }
    }

    #[test]
    fn test_hungry_cat_walks_to_bowl_and_eats_once() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        quiet(&mut s);
        s.house.bowl.fill();
        let pip = wake(&mut s, "pip");
        s.cats[pip].needs.hunger = 90;

        run(&mut s, &mut rng, 600);
        assert!(s.cats[pip].fed);
        assert_eq!(s.house.bowl.current, s.house.bowl.capacity - 1);
        assert_eq!(s.cats[pip].location, Location::Room(RoomId::Kitchen));
        assert_eq!(s.stats.meals, 1);
        assert!(s.check_membership().is_ok());
    }

    #[test]
    fn test_cat_fed_on_the_way_skips_the_bowl() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        quiet(&mut s);
        s.house.bowl.fill();
        let pip = wake(&mut s, "pip");
        s.cats[pip].needs.hunger = 90;

        for _ in 0..20 {
            run(&mut s, &mut rng, 1);
            if s.cats[pip].movement.intent == Intent::SeekFood {
                break;
            }
        }
        assert_eq!(s.cats[pip].movement.intent, Intent::SeekFood);
        s.feed(Some("pip"), &mut rng).unwrap();
        let score = s.score;

        run(&mut s, &mut rng, 1000);
        assert_eq!(s.house.bowl.current, s.house.bowl.capacity);
        assert_eq!(s.stats.meals, 0);
        assert_eq!(s.score, score);
        assert_ne!(s.cats[pip].movement.intent, Intent::SeekFood);
    }

    #[test]
    fn test_membership_commits_only_at_end_of_route() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        quiet(&mut s);
        s.house.bowl.fill();
        // Bathroom to kitchen takes two hops
        let mittens = wake(&mut s, "mittens");
        s.cats[mittens].needs.hunger = 90;

        let mut seen_route = false;
        for _ in 0..800 {
            s.run_frame(s.config.frame_ms, &mut rng);
            let cat = &s.cats[mittens];
            if cat.movement.is_travelling() {
                seen_route = true;
                assert_eq!(cat.location, Location::Room(RoomId::Bathroom));
            }
            assert!(s.check_membership().is_ok());
        }
        assert!(seen_route);
        assert_eq!(s.cats[mittens].location, Location::Room(RoomId::Kitchen));
    }

    #[test]
    fn test_full_cat_uses_cleanest_box() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        quiet(&mut s);
        s.house.litter_boxes[0].cleanliness = 40;
        let mittens = wake(&mut s, "mittens");
        s.cats[mittens].needs.mess = 90;

        run(&mut s, &mut rng, 400);
        assert_eq!(s.cats[mittens].needs.mess, 0);
        assert_eq!(s.house.litter_boxes[1].uses, 1);
        assert_eq!(s.house.litter_boxes[0].uses, 0);
    }

    #[test]
    fn test_enemies_fight_when_close() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        quiet(&mut s);
        let oscar = wake(&mut s, "oscar");
        let scampi = s.find_cat("scampi").unwrap();
        let pip = wake(&mut s, "pip");
        s.relocate(pip, Location::Room(RoomId::Bedroom), &mut rng);
        s.cats[oscar].movement.position = Vec2::new(100.0, 300.0);
        s.cats[pip].movement.position = Vec2::new(110.0, 300.0);

        s.run_frame(s.config.frame_ms, &mut rng);
        assert!(s.is_fighting(&CatId::new("oscar")));
        assert!(!s.is_fighting(&s.cats[scampi].id));
        assert_eq!(s.stats.conflicts, 1);
    }

    #[test]
    fn test_friends_never_fight() {
        let mut s = session();
        let mut rng = ScriptedRandom::new(vec![0.1, 0.5, 0.9, 0.3, 0.7]);
        quiet(&mut s);
        let pip = wake(&mut s, "pip");
        let boots = wake(&mut s, "boots");
        s.cats[pip].movement.position = Vec2::new(400.0, 100.0);
        s.cats[boots].movement.position = Vec2::new(401.0, 100.0);

        run(&mut s, &mut rng, 2000);
        assert!(s.fights.is_empty());
        assert_eq!(s.stats.conflicts, 0);
    }

    #[test]
    fn test_resting_cat_stays_put() {
        let mut s = session();
        let mut rng = ScriptedRandom::constant(0.9);
        quiet(&mut s);
        let pip = wake(&mut s, "pip");
        s.cats[pip].movement.activity = Activity::Resting { remaining_ms: 1000 };
        let before = s.cats[pip].movement.position;

        run(&mut s, &mut rng, 10);
        assert_eq!(s.cats[pip].movement.position, before);
        assert_eq!(s.cats[pip].movement.activity, Activity::Resting { remaining_ms: 500 });
    }
}
