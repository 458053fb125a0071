//! Player operations on the session
//!
//! Every operation validates first and mutates second: an `Err` always
//! means nothing changed. The text parser and any direct UI call land here.

use crate::core::calendar::Phase;
use crate::core::error::{CatLifeError, Result};
use crate::core::random::RandomSource;
use crate::core::types::{CatId, Location};
use crate::entity::cat::Quirk;
use crate::house::pathfinding::find_path;
use crate::house::rooms::{doorway, RoomId};
use crate::simulation::events::LogCategory;
use crate::simulation::session::{GameSession, MAX_SPEED};

/// Chance a food thief sharing the room steals a freshly fed cat's meal
pub const FOOD_THEFT_CHANCE: f32 = 0.3;
const THEFT_HUNGER: i32 = 20;
const THEFT_HAPPINESS: i32 = 10;
/// Extra happiness a playful cat gets from play
const PLAYFUL_BONUS: i32 = 10;
/// Direct health boost from feeding or playing
const CARE_HEALTH: i32 = 2;
const OUTDOOR_HAPPINESS: i32 = 10;
const SEPARATE_AGGRESSION_RELIEF: i32 = 30;
const CLEAN_BOX_BASE_SCORE: i64 = 2;

/// What `clean` applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanTarget {
    Room(RoomId),
    All,
}

impl GameSession {
    pub fn feed(&mut self, name: Option<&str>, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let idx = self.resolve_cat(name)?;
        self.ensure_reachable(idx)?;
        let cat = &self.cats[idx];
        if cat.fed {
            return Err(CatLifeError::AlreadyFed(cat.name.clone()));
        }
        if cat.asleep {
            return Err(CatLifeError::InvalidAction(format!("{} is asleep.", cat.name)));
        }
        self.ensure_energy("feed", self.config.feed_cost)?;

        let config = &self.config;
        let cat = &mut self.cats[idx];
        cat.needs.adjust_hunger(-config.feed_amount);
        cat.needs.adjust_happiness(config.feed_happiness);
        cat.needs.adjust_health(CARE_HEALTH);
        cat.fed = true;
        let text = format!("You fed {}. (hunger {})", cat.name, cat.needs.hunger);

        self.stats.feeds += 1;
        self.log(text, LogCategory::Player);
        self.spend_energy(self.config.feed_cost);
        self.add_score(self.config.feed_score);
        self.food_theft(idx, rng);
        self.check_all_fed();
        self.finish_action(rng);
        Ok(())
    }

    /// A food thief in the same room may steal the meal just served
    fn food_theft(&mut self, victim: usize, rng: &mut dyn RandomSource) {
        let room = self.cats[victim].room();
        let thieves: Vec<usize> = self
            .cats
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != victim && c.quirk == Quirk::FoodThief && c.is_active() && c.room() == room)
            .map(|(i, _)| i)
            .collect();

        for thief in thieves {
            if !rng.chance(FOOD_THEFT_CHANCE) {
                continue;
            }
            self.cats[thief].needs.adjust_hunger(-THEFT_HUNGER);
            let cat = &mut self.cats[victim];
            cat.needs.adjust_hunger(THEFT_HUNGER);
            cat.needs.adjust_happiness(-THEFT_HAPPINESS);
            let text = format!("{} stole some of {}'s food!", self.cats[thief].name, self.cats[victim].name);
            self.log(text, LogCategory::Event);
            self.add_score(self.config.theft_score);
        }
    }

    fn check_all_fed(&mut self) {
        if self.all_fed_bonus_given || self.phase() != Phase::Morning {
            return;
        }
        let all_fed = self.cats.iter().filter(|c| !c.is_missing()).all(|c| c.fed);
        if all_fed {
            self.all_fed_bonus_given = true;
            self.log("All cats are fed! Bonus points!", LogCategory::Event);
            self.add_score(self.config.all_fed_bonus);
        }
    }

    pub fn play(&mut self, name: Option<&str>, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let idx = self.resolve_cat(name)?;
        self.ensure_reachable(idx)?;
        if self.cats[idx].asleep {
            return Err(CatLifeError::InvalidAction(format!("{} is asleep.", self.cats[idx].name)));
        }
        self.ensure_energy("play", self.config.play_cost)?;

        let config = &self.config;
        let cat = &mut self.cats[idx];
        let joy = match cat.quirk {
            Quirk::Playful => config.play_happiness + PLAYFUL_BONUS,
            _ => config.play_happiness,
        };
        cat.needs.adjust_happiness(joy);
        cat.needs.adjust_aggression(-config.play_aggression_relief);
        cat.needs.adjust_health(CARE_HEALTH);
        let text = format!("You played with {}. (happiness {})", cat.name, cat.needs.happiness);

        self.stats.plays += 1;
        self.log(text, LogCategory::Player);
        self.spend_energy(self.config.play_cost);
        self.add_score(self.config.play_score);
        self.finish_action(rng);
        Ok(())
    }

    /// Clean every mess in one room or in the whole house; energy is charged per mess
    pub fn clean(&mut self, target: CleanTarget, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let rooms: Vec<RoomId> = match target {
            CleanTarget::Room(room) => vec![room],
            CleanTarget::All => RoomId::ALL.to_vec(),
        };
        let count: usize = rooms.iter().map(|&r| self.house.room(r).messes.len()).sum();
        if count == 0 {
            let place = match target {
                CleanTarget::Room(room) => format!("the {}", room.display_name()),
                CleanTarget::All => "the house".to_string(),
            };
            return Err(CatLifeError::InvalidAction(format!("There is nothing to clean in {place}.")));
        }
        let cost = self.config.clean_mess_cost * count as u32;
        self.ensure_energy("clean", cost)?;

        for room in rooms {
            self.house.clear_room_messes(room);
        }
        self.stats.cleans += count as u32;
        self.log(format!("You cleaned up {count} mess(es)."), LogCategory::Player);
        self.spend_energy(cost);
        self.add_score(self.config.clean_mess_score * count as i64);
        self.cheer_after_cleaning();
        self.finish_action(rng);
        Ok(())
    }

    /// Clean a single mess by id
    pub fn clean_mess(&mut self, mess_id: u32, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let room = RoomId::ALL
            .into_iter()
            .find(|&r| self.house.room(r).messes.iter().any(|m| m.id == mess_id))
            .ok_or_else(|| CatLifeError::InvalidAction(format!("There is no mess #{mess_id}.")))?;
        self.ensure_energy("clean", self.config.clean_mess_cost)?;

        self.house.room_mut(room).messes.retain(|m| m.id != mess_id);
        self.stats.cleans += 1;
        self.log(format!("You cleaned up the mess in the {}.", room.display_name()), LogCategory::Player);
        self.spend_energy(self.config.clean_mess_cost);
        self.add_score(self.config.clean_mess_score);
        self.cheer_after_cleaning();
        self.finish_action(rng);
        Ok(())
    }

    /// Scoop litter box `box_id` (zero-based); dirtier boxes are worth more
    pub fn clean_box(&mut self, box_id: usize, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let number = box_id + 1;
        let litter_box = self
            .house
            .litter_box(box_id)
            .ok_or_else(|| CatLifeError::InvalidAction(format!("There is no litter box {number}.")))?;
        if litter_box.is_spotless() {
            return Err(CatLifeError::InvalidAction(format!("Litter box {number} is already clean.")));
        }
        self.ensure_energy("clean box", self.config.clean_box_cost)?;

        let dirt = self.house.litter_boxes[box_id].clean();
        let points = CLEAN_BOX_BASE_SCORE + i64::from(dirt) / 20;
        self.stats.cleans += 1;
        self.log(format!("You cleaned litter box {number}."), LogCategory::Player);
        self.spend_energy(self.config.clean_box_cost);
        self.add_score(points);
        self.cheer_after_cleaning();
        self.finish_action(rng);
        Ok(())
    }

    pub fn fill_bowl(&mut self, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        if self.house.bowl.is_full() {
            return Err(CatLifeError::InvalidAction("The food bowl is already full.".into()));
        }
        self.ensure_energy("fill bowl", self.config.fill_bowl_cost)?;

        self.house.bowl.fill();
        self.log(
            format!("You filled the food bowl. ({} portions)", self.house.bowl.current),
            LogCategory::Player,
        );
        self.spend_energy(self.config.fill_bowl_cost);
        self.add_score(self.config.fill_bowl_score);
        self.finish_action(rng);
        Ok(())
    }

    /// Carry a cat to another room. It arrives at the doorway it would have walked through.
    pub fn move_cat(&mut self, name: Option<&str>, to: RoomId, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let idx = self.resolve_cat(name)?;
        self.ensure_reachable(idx)?;
        let cat = &self.cats[idx];
        let from = cat.room().ok_or_else(|| CatLifeError::InvalidAction(format!("{} is not indoors.", cat.name)))?;
        if from == to {
            return Err(CatLifeError::InvalidAction(format!(
                "{} is already in the {}.",
                cat.name,
                to.display_name()
            )));
        }
        if cat.asleep {
            return Err(CatLifeError::InvalidAction(format!("{} is asleep.", cat.name)));
        }
        self.ensure_energy("move", self.config.move_cost)?;

        let entry = find_path(from, to).and_then(|path| {
            let n = path.len();
            doorway(path[n - 2], path[n - 1])
        });
        self.relocate(idx, Location::Room(to), rng);
        if let Some(entry) = entry {
            let margin = self.config.room_margin;
            self.cats[idx].movement.position = to.bounds().clamp(entry, margin);
        }

        let text = format!("You moved {} to the {}.", self.cats[idx].name, to.display_name());
        self.log(text, LogCategory::Player);
        self.spend_energy(self.config.move_cost);
        self.finish_action(rng);
        Ok(())
    }

    /// Remember a cat so later commands can omit its name. Free.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let idx = self.find_cat(name)?;
        let cat = &self.cats[idx];
        let text = format!("Selected {}: {}", cat.name, cat.description);
        self.selected = Some(cat.id.clone());
        self.log(text, LogCategory::Player);
        Ok(())
    }

    pub fn toggle_door(&mut self, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        self.ensure_energy("door", self.config.door_cost)?;

        self.house.door_open = !self.house.door_open;
        let state = if self.house.door_open { "open" } else { "closed" };
        self.log(format!("The front door is now {state}."), LogCategory::Player);
        self.spend_energy(self.config.door_cost);
        self.finish_action(rng);
        Ok(())
    }

    /// Let a cat out through the open front door
    pub fn send_outside(&mut self, name: Option<&str>, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let idx = self.resolve_cat(name)?;
        self.ensure_reachable(idx)?;
        if !self.house.door_open {
            return Err(CatLifeError::InvalidAction("Open the front door first.".into()));
        }
        if self.cats[idx].asleep {
            return Err(CatLifeError::InvalidAction(format!("{} is asleep.", self.cats[idx].name)));
        }
        self.ensure_energy("send outside", self.config.outdoor_cost)?;

        self.relocate(idx, Location::Outside, rng);
        let mut chance = self.config.wont_come_back_chance;
        if self.cats[idx].quirk == Quirk::Wanderer {
            chance *= 2.0;
        }
        let wont_come_back = rng.chance(chance);
        let cat = &mut self.cats[idx];
        cat.needs.adjust_happiness(OUTDOOR_HAPPINESS);
        cat.wont_come_back = wont_come_back;
        tracing::debug!(cat = %cat.id, wont_come_back, "sent outside");
        let text = format!("{} trots out into the garden.", cat.name);

        self.log(text, LogCategory::Player);
        self.spend_energy(self.config.outdoor_cost);
        self.finish_action(rng);
        Ok(())
    }

    /// Call a cat back in. A cat that decided not to come back ignores you, and the energy is still spent.
    pub fn let_in(&mut self, name: Option<&str>, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let idx = self.resolve_cat(name)?;
        let cat = &self.cats[idx];
        if !cat.is_outside() {
            return Err(CatLifeError::InvalidAction(format!("{} is not outside.", cat.name)));
        }
        if !self.house.door_open {
            return Err(CatLifeError::InvalidAction("Open the front door first.".into()));
        }
        self.ensure_energy("let in", self.config.outdoor_cost)?;

        let name = self.cats[idx].name.clone();
        if self.cats[idx].wont_come_back {
            self.log(format!("{name} refuses to come back inside!"), LogCategory::Warning);
        } else {
            self.relocate(idx, Location::Room(RoomId::ENTRY), rng);
            self.log(format!("{name} came back inside."), LogCategory::Player);
            self.add_score(self.config.let_in_score);
        }
        self.spend_energy(self.config.outdoor_cost);
        self.finish_action(rng);
        Ok(())
    }

    /// Tuck a content cat in for the night
    pub fn put_to_sleep(&mut self, name: Option<&str>, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        if self.phase() != Phase::Evening {
            return Err(CatLifeError::InvalidAction("Cats only settle down for the night in the evening.".into()));
        }
        let idx = self.resolve_cat(name)?;
        self.ensure_reachable(idx)?;
        let cat = &self.cats[idx];
        if cat.asleep {
            return Err(CatLifeError::InvalidAction(format!("{} is already asleep.", cat.name)));
        }
        if cat.needs.happiness < self.config.sleep_happiness_threshold {
            return Err(CatLifeError::InvalidAction(format!("{} is too restless to sleep.", cat.name)));
        }
        self.ensure_energy("sleep", self.config.sleep_cost)?;

        self.release_from_fights(idx);
        let cat = &mut self.cats[idx];
        cat.asleep = true;
        cat.movement.fall_asleep();
        let text = format!("{} curls up and falls asleep.", cat.name);
        self.log(text, LogCategory::Player);
        self.spend_energy(self.config.sleep_cost);
        self.finish_action(rng);
        Ok(())
    }

    /// Break up a fight between two cats
    pub fn separate(&mut self, a: &str, b: &str, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        let (ia, ib) = (self.find_cat(a)?, self.find_cat(b)?);
        let (id_a, id_b): (CatId, CatId) = (self.cats[ia].id.clone(), self.cats[ib].id.clone());
        let pos = self.fights.iter().position(|f| f.is_between(&id_a, &id_b)).ok_or_else(|| {
            CatLifeError::InvalidAction(format!(
                "{} and {} are not fighting.",
                self.cats[ia].name, self.cats[ib].name
            ))
        })?;
        self.ensure_energy("separate", self.config.separate_cost)?;

        let fight = self.fights.remove(pos);
        self.break_up(&fight);
        for idx in [ia, ib] {
            self.cats[idx].needs.adjust_aggression(-SEPARATE_AGGRESSION_RELIEF);
        }
        let text = format!("You separated {} and {}.", self.cats[ia].name, self.cats[ib].name);
        self.log(text, LogCategory::Player);
        self.spend_energy(self.config.separate_cost);
        self.add_score(self.config.separate_score);
        self.finish_action(rng);
        Ok(())
    }

    /// Let the current phase pass
    pub fn skip(&mut self, rng: &mut dyn RandomSource) -> Result<()> {
        self.ensure_playing()?;
        self.log("You let the time pass...", LogCategory::Player);
        self.advance_phase(rng);
        self.roll_incident(rng);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.ensure_playing()?;
        if self.paused {
            return Err(CatLifeError::InvalidAction("The game is already paused.".into()));
        }
        self.paused = true;
        self.log("Game paused.", LogCategory::Game);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if !self.paused {
            return Err(CatLifeError::InvalidAction("The game is not paused.".into()));
        }
        self.paused = false;
        self.log("Game resumed.", LogCategory::Game);
        Ok(())
    }

    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        if !(1..=MAX_SPEED).contains(&speed) {
            return Err(CatLifeError::InvalidAction(format!("Speed must be between 1 and {MAX_SPEED}.")));
        }
        self.speed = speed;
        self.log(format!("Speed set to x{speed}."), LogCategory::Game);
        Ok(())
    }
}
