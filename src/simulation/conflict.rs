//! Conflict detection between cats that dislike each other
//!
//! Two severities: ambient tension while co-located (applied by the decay
//! tick) and timed fights started by proximity during the frame update.
//! Fights are independent of each other; a cat is in at most one.

use serde::{Deserialize, Serialize};

use crate::core::types::{CatId, Millis, Vec2};
use crate::entity::cat::{in_conflict, Cat};
use crate::entity::movement::{Activity, Intent};
use crate::simulation::events::LogCategory;
use crate::simulation::session::GameSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fight {
    pub a: CatId,
    pub b: CatId,
    pub remaining_ms: Millis,
}

impl Fight {
    pub fn new(a: CatId, b: CatId, duration_ms: Millis) -> Self {
        Self {
            a,
            b,
            remaining_ms: duration_ms,
        }
    }

    pub fn involves(&self, id: &CatId) -> bool {
        &self.a == id || &self.b == id
    }

    /// Same pair, in either order
    pub fn is_between(&self, x: &CatId, y: &CatId) -> bool {
        (&self.a == x && &self.b == y) || (&self.a == y && &self.b == x)
    }
}

/// Index pairs of awake cats sharing a room that dislike each other, in roster order
pub fn conflicting_pairs(cats: &[Cat]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in cats.iter().enumerate() {
        let Some(room) = a.room() else { continue };
        if a.asleep {
            continue;
        }
        for (j, b) in cats.iter().enumerate().skip(i + 1) {
            if b.asleep || b.room() != Some(room) {
                continue;
            }
            if in_conflict(a, b) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

impl GameSession {
    pub fn is_fighting(&self, id: &CatId) -> bool {
        self.fights.iter().any(|f| f.involves(id))
    }

    /// Awake, indoors, not walking between rooms, not fighting and not cooling down
    pub(crate) fn can_fight(&self, idx: usize) -> bool {
        let cat = &self.cats[idx];
        cat.is_active()
            && !cat.movement.is_travelling()
            && cat.movement.fight_cooldown_ms == 0
            && !self.is_fighting(&cat.id)
    }

    /// Co-located enemies lose a little happiness every decay tick
    pub(crate) fn apply_tension(&mut self) {
        let penalty = self.config.tension_penalty;
        for (i, j) in conflicting_pairs(&self.cats) {
            self.cats[i].needs.adjust_happiness(-penalty);
            self.cats[j].needs.adjust_happiness(-penalty);
            tracing::debug!(a = %self.cats[i].id, b = %self.cats[j].id, "tension");
        }
    }

    pub(crate) fn start_fight(&mut self, i: usize, j: usize) {
        let config = &self.config;
        let (happiness, health, duration) = (
            config.fight_happiness_penalty,
            config.fight_health_penalty,
            config.fight_duration_ms,
        );
        for idx in [i, j] {
            let cat = &mut self.cats[idx];
            cat.needs.adjust_happiness(-happiness);
            cat.needs.adjust_health(-health);
            cat.movement.activity = Activity::Fighting;
            cat.movement.target = None;
            cat.movement.route = None;
        }

        let (a, b) = (self.cats[i].id.clone(), self.cats[j].id.clone());
        let room = self.cats[i]
            .room()
            .map(|r| r.display_name())
            .unwrap_or("house");
        tracing::info!(%a, %b, room, "fight started");
        let text = format!("{} and {} are fighting in the {}!", self.cats[i].name, self.cats[j].name, room);
        self.fights.push(Fight::new(a, b, duration));
        self.stats.conflicts += 1;
        self.log(text, LogCategory::Event);
        self.add_score(self.config.fight_score);
    }

    /// Count down fights and cooldowns; finished fights push their cats apart
    pub(crate) fn tick_fights(&mut self, dt_ms: Millis) {
        for cat in &mut self.cats {
            cat.movement.fight_cooldown_ms = cat.movement.fight_cooldown_ms.saturating_sub(dt_ms);
        }

        let mut finished = Vec::new();
        self.fights.retain_mut(|fight| {
            fight.remaining_ms = fight.remaining_ms.saturating_sub(dt_ms);
            if fight.remaining_ms == 0 {
                finished.push(fight.clone());
                false
            } else {
                true
            }
        });

        for fight in finished {
            self.break_up(&fight);
            if let (Some(a), Some(b)) = (self.cat(&fight.a), self.cat(&fight.b)) {
                let text = format!("{} and {} stopped fighting.", a.name, b.name);
                self.log(text, LogCategory::Event);
            }
        }
    }

    /// Remove any fight the cat is in, releasing the other cat as well
    pub(crate) fn release_from_fights(&mut self, idx: usize) {
        let id = self.cats[idx].id.clone();
        let Some(pos) = self.fights.iter().position(|f| f.involves(&id)) else {
            return;
        };
        let fight = self.fights.remove(pos);
        self.break_up(&fight);
    }

    /// Stop every fight in the house (night falls, game ends)
    pub(crate) fn end_all_fights(&mut self) {
        for fight in std::mem::take(&mut self.fights) {
            self.break_up(&fight);
        }
    }

    /// Cooldown for both cats and targets pushed apart inside their room
    pub(crate) fn break_up(&mut self, fight: &Fight) {
        let (Some(i), Some(j)) = (self.index_of(&fight.a), self.index_of(&fight.b)) else {
            return;
        };
        let pa = self.cats[i].movement.position;
        let pb = self.cats[j].movement.position;
        let away = (pa - pb).normalize();
        // Cats on the same spot still need a direction
        let away = if away.length() == 0.0 { Vec2::new(1.0, 0.0) } else { away };

        let repulsion = self.config.fight_repulsion;
        let margin = self.config.room_margin;
        let cooldown = self.config.fight_cooldown_ms;
        for (idx, dir) in [(i, away), (j, away * -1.0)] {
            let cat = &mut self.cats[idx];
            let movement = &mut cat.movement;
            movement.fight_cooldown_ms = cooldown;
            if movement.activity == Activity::Fighting {
                movement.activity = Activity::Moving;
            }
            movement.intent = Intent::Wander;
            if let Some(room) = cat.location.room() {
                let pushed = movement.position + dir * repulsion;
                movement.target = Some(room.bounds().clamp(pushed, margin));
            }
        }
    }
}
