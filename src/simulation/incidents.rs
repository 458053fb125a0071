//! Surprises the household springs on the player between actions
//!
//! After each completed action there is a `random_event_chance` roll. On a
//! hit one of five incidents is drawn uniformly; some of them then need a
//! second roll or a qualifying cat and may come to nothing.

use crate::core::calendar::Phase;
use crate::core::random::RandomSource;
use crate::entity::cat::Quirk;
use crate::house::mess::MessKind;
use crate::simulation::events::LogCategory;
use crate::simulation::session::GameSession;

/// Aggression a grumpy cat must exceed before it picks a fight on its own
const SCUFFLE_AGGRESSION: i32 = 60;
const SCUFFLE_VICTIM_HAPPINESS: i32 = 15;
const SCUFFLE_BULLY_HAPPINESS: i32 = 10;
/// Hunger above which a cat meows for food
const MEOW_HUNGER: i32 = 50;
const MEOW_HUNGER_GAIN: i32 = 10;
const MEOW_HAPPINESS: i32 = 5;
const SUNBEAM_HAPPINESS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incident {
    /// The messy cat poops on the floor
    FloorPoop,
    /// The anxious cat pees where it stands
    StrayPee,
    /// The grumpy cat lashes out at a housemate
    Scuffle,
    /// A hungry cat demands food
    Meowing,
    /// Everybody naps in the sun
    Sunbeam,
}

impl Incident {
    pub const ALL: [Incident; 5] = [
        Incident::FloorPoop,
        Incident::StrayPee,
        Incident::Scuffle,
        Incident::Meowing,
        Incident::Sunbeam,
    ];
}

impl GameSession {
    /// Maybe spring an incident; returns the one that actually happened
    pub(crate) fn roll_incident(&mut self, rng: &mut dyn RandomSource) -> Option<Incident> {
        if self.is_game_over() || self.clock.is_day_over() || self.phase() == Phase::Night {
            return None;
        }
        if !rng.chance(self.config.random_event_chance) {
            return None;
        }
        let incident = Incident::ALL[rng.index(Incident::ALL.len())];
        let happened = match incident {
            Incident::FloorPoop => rng.chance(0.5) && self.stray_mess(Quirk::Messy, MessKind::Poop),
            Incident::StrayPee => rng.chance(0.5) && self.stray_mess(Quirk::Anxious, MessKind::Pee),
            Incident::Scuffle => self.scuffle(rng),
            Incident::Meowing => self.meowing(rng),
            Incident::Sunbeam => self.sunbeam(),
        };
        if happened {
            tracing::debug!(?incident, day = self.day(), "household incident");
        }
        happened.then_some(incident)
    }

    fn stray_mess(&mut self, quirk: Quirk, kind: MessKind) -> bool {
        let Some(idx) = self.cats.iter().position(|c| c.quirk == quirk && c.location.is_indoors()) else {
            return false;
        };
        let Some(room) = self.cats[idx].room() else {
            return false;
        };
        let position = self.cats[idx].movement.position;
        self.house.add_mess(room, kind, position);
        self.cats[idx].needs.build_mess(1);

        let verb = match kind {
            MessKind::Poop => "pooped",
            MessKind::Pee => "peed",
        };
        let text = format!("Oh no! {} has {verb} on the {} floor!", self.cats[idx].name, room.display_name());
        self.log(text, LogCategory::Event);
        self.add_score(self.config.event_mess_score);
        true
    }

    fn scuffle(&mut self, rng: &mut dyn RandomSource) -> bool {
        let Some(bully) = self.cats.iter().position(|c| {
            c.location.is_indoors() && c.needs.aggression.is_some_and(|a| a > SCUFFLE_AGGRESSION)
        }) else {
            return false;
        };
        let victims: Vec<usize> = (0..self.cats.len())
            .filter(|&i| i != bully && self.cats[i].location.is_indoors())
            .collect();
        if victims.is_empty() {
            return false;
        }
        let victim = victims[rng.index(victims.len())];

        self.cats[victim].needs.adjust_happiness(-SCUFFLE_VICTIM_HAPPINESS);
        self.cats[bully].needs.adjust_happiness(-SCUFFLE_BULLY_HAPPINESS);
        let text = format!("{} is picking a fight with {}!", self.cats[bully].name, self.cats[victim].name);
        self.stats.conflicts += 1;
        self.log(text, LogCategory::Event);
        self.add_score(self.config.fight_score);
        true
    }

    fn meowing(&mut self, rng: &mut dyn RandomSource) -> bool {
        let indoors: Vec<usize> = (0..self.cats.len())
            .filter(|&i| self.cats[i].location.is_indoors())
            .collect();
        if indoors.is_empty() {
            return false;
        }
        let idx = indoors[rng.index(indoors.len())];
        let cat = &mut self.cats[idx];
        if cat.needs.hunger <= MEOW_HUNGER {
            return false;
        }
        cat.needs.adjust_hunger(MEOW_HUNGER_GAIN);
        cat.needs.adjust_happiness(-MEOW_HAPPINESS);
        let text = format!("{} is meowing loudly for food!", cat.name);
        self.log(text, LogCategory::Event);
        true
    }

    fn sunbeam(&mut self) -> bool {
        for cat in self.cats.iter_mut().filter(|c| c.location.is_indoors()) {
            cat.needs.adjust_happiness(SUNBEAM_HAPPINESS);
        }
        self.log("A sunbeam warms the house. The cats stretch out happily.", LogCategory::Event);
        self.add_score(self.config.sunbeam_score);
        true
    }

    /// Everyone indoors enjoys a freshly cleaned house
    pub(crate) fn cheer_after_cleaning(&mut self) {
        let gain = self.config.clean_happiness;
        for cat in self.cats.iter_mut().filter(|c| c.location.is_indoors()) {
            cat.needs.adjust_happiness(gain);
        }
    }
}
