//! Continuous position and short-term movement plans for a cat

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::random::RandomSource;
use crate::core::types::{Millis, Vec2};
use crate::house::pathfinding::find_path;
use crate::house::rooms::{doorway, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    /// Walking toward the current target (or about to pick one)
    Moving,
    Resting { remaining_ms: Millis },
    Sleeping,
    Fighting,
}

/// Why the cat is walking where it is walking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Wander,
    SeekFood,
    SeekLitter(usize),
}

/// A multi-room walk through doorways. `rooms` includes the start room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub rooms: Vec<RoomId>,
    /// Index into `rooms` of the room being walked into next
    pub next_hop: usize,
}

impl Route {
    pub fn new(rooms: Vec<RoomId>) -> Self {
        Self { rooms, next_hop: 1 }
    }

    pub fn destination(&self) -> RoomId {
        self.rooms[self.rooms.len() - 1]
    }

    pub fn is_complete(&self) -> bool {
        self.next_hop >= self.rooms.len()
    }

    /// Doorway to walk to for the next hop
    pub fn next_doorway(&self) -> Option<Vec2> {
        if self.is_complete() {
            return None;
        }
        doorway(self.rooms[self.next_hop - 1], self.rooms[self.next_hop])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    pub position: Vec2,
    pub target: Option<Vec2>,
    /// House units per second, fixed per cat
    pub speed: f32,
    pub activity: Activity,
    pub intent: Intent,
    pub route: Option<Route>,
    /// While above zero the cat cannot start another fight
    pub fight_cooldown_ms: Millis,
}

impl MovementState {
    /// Fresh state at a random spot in `room`
    pub fn spawn_in(room: RoomId, rng: &mut dyn RandomSource, config: &SimulationConfig) -> Self {
        let speed = config.base_speed + rng.range_f32(-config.speed_jitter, config.speed_jitter);
        Self {
            position: random_point_in(room, rng, config),
            target: None,
            speed,
            activity: Activity::Moving,
            intent: Intent::Wander,
            route: None,
            fight_cooldown_ms: 0,
        }
    }

    /// Drop any plan and stand at a random spot in `room`; keeps the cat's speed
    pub fn rebuild_in(&mut self, room: RoomId, rng: &mut dyn RandomSource, config: &SimulationConfig) {
        self.position = random_point_in(room, rng, config);
        self.target = None;
        self.activity = Activity::Moving;
        self.intent = Intent::Wander;
        self.route = None;
        self.fight_cooldown_ms = 0;
    }

    pub fn is_travelling(&self) -> bool {
        self.route.is_some()
    }

    pub fn arrived(&self, epsilon: f32) -> bool {
        match self.target {
            Some(target) => self.position.distance(&target) <= epsilon,
            None => true,
        }
    }

    /// Advance toward the target by `dt_ms` worth of walking
    pub fn step(&mut self, dt_ms: Millis) {
        if let Some(target) = self.target {
            let max_step = self.speed * dt_ms as f32 / 1000.0;
            self.position = self.position.move_toward(target, max_step);
        }
    }

    /// Head for `goal` in `goal_room`, walking through doorways when it is elsewhere
    pub fn head_to(&mut self, from: RoomId, goal_room: RoomId, goal: Vec2, intent: Intent) {
        self.intent = intent;
        self.activity = Activity::Moving;
        match find_path(from, goal_room) {
            Some(rooms) => {
                let route = Route::new(rooms);
                self.target = route.next_doorway();
                self.route = Some(route);
            }
            None => {
                self.route = None;
                self.target = Some(goal);
            }
        }
    }

    pub fn wander_to(&mut self, room: RoomId, rng: &mut dyn RandomSource, config: &SimulationConfig) {
        self.intent = Intent::Wander;
        self.activity = Activity::Moving;
        self.route = None;
        self.target = Some(random_point_in(room, rng, config));
    }

    pub fn rest(&mut self, rng: &mut dyn RandomSource, config: &SimulationConfig) {
        let duration = rng.range_u64(config.rest_min_ms, config.rest_max_ms);
        self.activity = Activity::Resting { remaining_ms: duration };
        self.target = None;
        self.intent = Intent::Wander;
    }

    pub fn fall_asleep(&mut self) {
        self.activity = Activity::Sleeping;
        self.target = None;
        self.route = None;
        self.intent = Intent::Wander;
    }

    pub fn wake(&mut self) {
        if self.activity == Activity::Sleeping {
            self.activity = Activity::Moving;
        }
    }
}

/// Uniform point inside `room`, kept `room_margin` away from the walls
pub fn random_point_in(room: RoomId, rng: &mut dyn RandomSource, config: &SimulationConfig) -> Vec2 {
    let u = rng.next_f32();
    let v = rng.next_f32();
    room.bounds().point_at(u, v, config.room_margin)
}
