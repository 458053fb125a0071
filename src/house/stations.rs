//! Shared stations: the food bowl and the litter boxes

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

pub const MAX_CLEANLINESS: i32 = 100;
pub const DIRTY_FLOOR: i32 = 0;

/// The kitchen food bowl. One unit feeds one cat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodBowl {
    pub capacity: u32,
    pub current: u32,
    pub position: Vec2,
}

impl FoodBowl {
    pub fn new(capacity: u32, position: Vec2) -> Self {
        Self {
            capacity,
            current: 0,
            position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.capacity
    }

    /// Refill to capacity, returns the units added
    pub fn fill(&mut self) -> u32 {
        let added = self.capacity.saturating_sub(self.current);
        self.current = self.capacity;
        added
    }

    /// Take one portion; false if the bowl is empty
    pub fn take_portion(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitterBox {
    pub id: usize,
    /// 100 = spotless, 0 = unusable filth
    pub cleanliness: i32,
    pub uses: u32,
    pub capacity: u32,
    pub position: Vec2,
}

impl LitterBox {
    pub fn new(id: usize, capacity: u32, position: Vec2) -> Self {
        Self {
            id,
            cleanliness: MAX_CLEANLINESS,
            uses: 0,
            capacity,
            position,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.uses < self.capacity
    }

    pub fn is_spotless(&self) -> bool {
        self.uses == 0 && self.cleanliness >= MAX_CLEANLINESS
    }

    /// Record one use. Returns false (and changes nothing) if the box is full.
    pub fn use_box(&mut self, wear: i32) -> bool {
        if !self.is_usable() {
            return false;
        }
        self.uses += 1;
        self.cleanliness = (self.cleanliness - wear).max(DIRTY_FLOOR);
        if self.uses >= self.capacity {
            self.cleanliness = DIRTY_FLOOR;
        }
        true
    }

    /// Full reset. Returns how dirty the box was before cleaning.
    pub fn clean(&mut self) -> i32 {
        let dirt = MAX_CLEANLINESS - self.cleanliness;
        self.cleanliness = MAX_CLEANLINESS;
        self.uses = 0;
        dirt
    }
}

/// Cleanest usable box: highest cleanliness among non-full boxes, first wins ties
pub fn cleanest_usable(boxes: &[LitterBox]) -> Option<usize> {
    let mut best: Option<&LitterBox> = None;
    for b in boxes.iter().filter(|b| b.is_usable()) {
        match best {
            Some(current) if current.cleanliness >= b.cleanliness => {}
            _ => best = Some(b),
        }
    }
    best.map(|b| b.id)
}
