//! The house: rooms, doors and the shared stations inside them

pub mod mess;
pub mod pathfinding;
pub mod rooms;
pub mod stations;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::Vec2;

pub use mess::{Mess, MessKind};
pub use pathfinding::find_path;
pub use rooms::{Room, RoomId};
pub use stations::{FoodBowl, LitterBox};

/// Food bowl sits in the kitchen corner
pub const BOWL_POSITION: Vec2 = Vec2 { x: 60.0, y: 40.0 };

/// Front door on the east wall of the living room
pub const FRONT_DOOR: Vec2 = Vec2 { x: 600.0, y: 100.0 };

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct House {
    rooms: Vec<Room>,
    pub bowl: FoodBowl,
    pub litter_boxes: Vec<LitterBox>,
    pub door_open: bool,
    next_mess_id: u32,
}

impl House {
    pub fn new(config: &SimulationConfig) -> Self {
        let rooms = RoomId::ALL.iter().map(|&id| Room::new(id)).collect();

        // Boxes line up along the bathroom's south wall
        let bath = RoomId::Bathroom.bounds();
        let count = config.litter_box_count;
        let spacing = (bath.max.x - bath.min.x) / (count as f32 + 1.0);
        let litter_boxes = (0..count)
            .map(|i| {
                let x = bath.min.x + spacing * (i as f32 + 1.0);
                LitterBox::new(i, config.litter_box_capacity, Vec2::new(x, bath.max.y - 40.0))
            })
            .collect();

        Self {
            rooms,
            bowl: FoodBowl::new(config.bowl_capacity, BOWL_POSITION),
            litter_boxes,
            door_open: false,
            next_mess_id: 0,
        }
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    pub fn room_mut(&mut self, id: RoomId) -> &mut Room {
        &mut self.rooms[id.index()]
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn litter_box(&self, id: usize) -> Option<&LitterBox> {
        self.litter_boxes.get(id)
    }

    pub fn any_usable_box(&self) -> bool {
        self.litter_boxes.iter().any(|b| b.is_usable())
    }

    /// Drop a new mess on the floor of `room`, returning its id
    pub fn add_mess(&mut self, room: RoomId, kind: MessKind, position: Vec2) -> u32 {
        let id = self.next_mess_id;
        self.next_mess_id += 1;
        self.room_mut(room).messes.push(Mess::new(id, kind, position));
        id
    }

    pub fn total_messes(&self) -> usize {
        self.rooms.iter().map(|r| r.messes.len()).sum()
    }

    /// Remove every mess in one room, returning how many were removed
    pub fn clear_room_messes(&mut self, room: RoomId) -> usize {
        let room = self.room_mut(room);
        let count = room.messes.len();
        room.messes.clear();
        count
    }

    pub fn clear_all_messes(&mut self) -> usize {
        RoomId::ALL.iter().map(|&r| self.clear_room_messes(r)).sum()
    }
}
