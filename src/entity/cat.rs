//! Cats and the starting household

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::random::RandomSource;
use crate::core::types::{CatId, Location};
use crate::entity::movement::MovementState;
use crate::entity::needs::Needs;
use crate::house::rooms::RoomId;

/// Personality quirk that bends one of the simulation rules for this cat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quirk {
    /// Eats other cats' food when they are fed nearby
    FoodThief,
    /// Twice as likely to refuse to come back inside
    Wanderer,
    /// Carries an aggression counter
    Grumpy,
    /// Playtime is worth more
    Playful,
    /// Bladder fills twice as fast
    Messy,
    /// Always has an accident when no litter box is usable
    Anxious,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cat {
    pub id: CatId,
    pub name: String,
    pub description: String,
    pub quirk: Quirk,
    /// Cats this one cannot stand (checked in both directions)
    pub dislikes: Vec<CatId>,
    pub needs: Needs,
    /// Fed since the last feeding round started
    pub fed: bool,
    pub asleep: bool,
    /// Rolled when the cat is carried outside
    pub wont_come_back: bool,
    pub location: Location,
    pub movement: MovementState,
}

impl Cat {
    pub fn is_missing(&self) -> bool {
        self.location == Location::Missing
    }

    pub fn is_outside(&self) -> bool {
        self.location == Location::Outside
    }

    pub fn room(&self) -> Option<RoomId> {
        self.location.room()
    }

    /// Indoors, awake and not missing
    pub fn is_active(&self) -> bool {
        self.location.is_indoors() && !self.asleep
    }

    pub fn dislikes_cat(&self, other: &CatId) -> bool {
        self.dislikes.contains(other)
    }
}

/// Either cat dislikes the other
pub fn in_conflict(a: &Cat, b: &Cat) -> bool {
    a.dislikes_cat(&b.id) || b.dislikes_cat(&a.id)
}

struct CatTemplate {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    quirk: Quirk,
    dislikes: &'static [&'static str],
    hunger: i32,
    happiness: i32,
    mess: i32,
    aggression: Option<i32>,
    room: RoomId,
}

const HOUSEHOLD: [CatTemplate; 6] = [
    CatTemplate {
        id: "boots",
        name: "Boots",
        description: "A confident wanderer who loves the outdoors but gets stressed at bedtime",
        quirk: Quirk::Wanderer,
        dislikes: &["oscar"],
        hunger: 60,
        happiness: 60,
        mess: 10,
        aggression: None,
        room: RoomId::LivingRoom,
    },
    CatTemplate {
        id: "mochi",
        name: "Mochi",
        description: "Sweet but sneaky, will steal food if left alone",
        quirk: Quirk::FoodThief,
        dislikes: &[],
        hunger: 70,
        happiness: 55,
        mess: 0,
        aggression: None,
        room: RoomId::Kitchen,
    },
    CatTemplate {
        id: "oscar",
        name: "Oscar",
        description: "Grumpy and unpredictable, prone to mood swings and conflicts",
        quirk: Quirk::Grumpy,
        dislikes: &["mochi", "pip"],
        hunger: 65,
        happiness: 40,
        mess: 5,
        aggression: Some(60),
        room: RoomId::Bedroom,
    },
    CatTemplate {
        id: "pip",
        name: "Pip",
        description: "Young and energetic, needs lots of playtime to stay happy",
        quirk: Quirk::Playful,
        dislikes: &[],
        hunger: 75,
        happiness: 65,
        mess: 0,
        aggression: None,
        room: RoomId::LivingRoom,
    },
    CatTemplate {
        id: "mittens",
        name: "Mittens",
        description: "A messy eater who tracks litter everywhere",
        quirk: Quirk::Messy,
        dislikes: &["scampi"],
        hunger: 60,
        happiness: 50,
        mess: 20,
        aggression: None,
        room: RoomId::Bathroom,
    },
    CatTemplate {
        id: "scampi",
        name: "Scampi",
        description: "Anxious and sensitive, prone to accidents when stressed",
        quirk: Quirk::Anxious,
        dislikes: &[],
        hunger: 55,
        happiness: 45,
        mess: 15,
        aggression: None,
        room: RoomId::Bedroom,
    },
];

/// The six cats every game starts with, in roster order
pub fn starting_household(rng: &mut dyn RandomSource, config: &SimulationConfig) -> Vec<Cat> {
    HOUSEHOLD
        .iter()
        .map(|t| Cat {
            id: CatId::new(t.id),
            name: t.name.to_string(),
            description: t.description.to_string(),
            quirk: t.quirk,
            dislikes: t.dislikes.iter().map(|d| CatId::new(*d)).collect(),
            needs: Needs {
                hunger: t.hunger,
                happiness: t.happiness,
                mess: t.mess,
                health: 90,
                aggression: t.aggression,
            },
            fed: false,
            asleep: false,
            wont_come_back: false,
            location: Location::Room(t.room),
            movement: MovementState::spawn_in(t.room, rng, config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::ScriptedRandom;

    #[test]
    fn test_household_ids_unique() {
        let config = SimulationConfig::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let cats = starting_household(&mut rng, &config);
        assert_eq!(cats.len(), 6);
        for (i, a) in cats.iter().enumerate() {
            for b in &cats[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_dislikes_name_real_cats() {
        let config = SimulationConfig::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let cats = starting_household(&mut rng, &config);
        for cat in &cats {
            for disliked in &cat.dislikes {
                assert!(cats.iter().any(|c| &c.id == disliked), "{} dislikes unknown {}", cat.id, disliked);
            }
        }
    }

    #[test]
    fn test_conflict_checked_both_ways() {
        let config = SimulationConfig::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let cats = starting_household(&mut rng, &config);
        let oscar = cats.iter().find(|c| c.id.as_str() == "oscar").unwrap();
        let mochi = cats.iter().find(|c| c.id.as_str() == "mochi").unwrap();
        let scampi = cats.iter().find(|c| c.id.as_str() == "scampi").unwrap();

        // Only Oscar lists Mochi, but the relation holds from either side
        assert!(in_conflict(oscar, mochi));
        assert!(in_conflict(mochi, oscar));
        assert!(!in_conflict(mochi, scampi));
    }

    #[test]
    fn test_only_grumpy_cats_track_aggression() {
        let config = SimulationConfig::default();
        let mut rng = ScriptedRandom::constant(0.5);
        for cat in starting_household(&mut rng, &config) {
            assert_eq!(cat.needs.aggression.is_some(), cat.quirk == Quirk::Grumpy);
        }
    }
}
