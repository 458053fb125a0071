//! Rooms of the house and their static layout
//!
//! The house is a 2x2 block of rooms in a 600x400 coordinate space:
//!
//! ```text
//!   +-----------+-------------+
//!   |  Kitchen  | Living Room |==> front door (outside)
//!   +-----------+-------------+
//!   |  Bedroom  |  Bathroom   |
//!   +-----------+-------------+
//! ```
//!
//! Doorways sit at the middle of every shared wall.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::CatLifeError;
use crate::core::types::{CatId, Vec2};
use crate::house::mess::Mess;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomId {
    Kitchen,
    LivingRoom,
    Bedroom,
    Bathroom,
}

impl RoomId {
    pub const ALL: [RoomId; 4] = [RoomId::Kitchen, RoomId::LivingRoom, RoomId::Bedroom, RoomId::Bathroom];

    /// Room a cat enters when let in through the front door
    pub const ENTRY: RoomId = RoomId::LivingRoom;

    pub fn index(self) -> usize {
        match self {
            RoomId::Kitchen => 0,
            RoomId::LivingRoom => 1,
            RoomId::Bedroom => 2,
            RoomId::Bathroom => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RoomId::Kitchen => "Kitchen",
            RoomId::LivingRoom => "Living Room",
            RoomId::Bedroom => "Bedroom",
            RoomId::Bathroom => "Bathroom",
        }
    }

    /// Adjacent rooms in fixed enumeration order (BFS tie-break order)
    pub fn neighbors(self) -> &'static [RoomId] {
        match self {
            RoomId::Kitchen => &[RoomId::LivingRoom, RoomId::Bedroom],
            RoomId::LivingRoom => &[RoomId::Kitchen, RoomId::Bathroom],
            RoomId::Bedroom => &[RoomId::Kitchen, RoomId::Bathroom],
            RoomId::Bathroom => &[RoomId::LivingRoom, RoomId::Bedroom],
        }
    }

    pub fn bounds(self) -> RoomBounds {
        match self {
            RoomId::Kitchen => RoomBounds::new(0.0, 0.0, 300.0, 200.0),
            RoomId::LivingRoom => RoomBounds::new(300.0, 0.0, 600.0, 200.0),
            RoomId::Bedroom => RoomBounds::new(0.0, 200.0, 300.0, 400.0),
            RoomId::Bathroom => RoomBounds::new(300.0, 200.0, 600.0, 400.0),
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for RoomId {
    type Err = CatLifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "kitchen" => Ok(RoomId::Kitchen),
            "livingroom" | "living" | "lounge" => Ok(RoomId::LivingRoom),
            "bedroom" => Ok(RoomId::Bedroom),
            "bathroom" => Ok(RoomId::Bathroom),
            _ => Err(CatLifeError::UnknownRoom(s.to_string())),
        }
    }
}

/// Doorway coordinate between two adjacent rooms
pub fn doorway(a: RoomId, b: RoomId) -> Option<Vec2> {
    use RoomId::*;
    match (a.min(b), a.max(b)) {
        (Kitchen, LivingRoom) => Some(Vec2::new(300.0, 100.0)),
        (Kitchen, Bedroom) => Some(Vec2::new(150.0, 200.0)),
        (LivingRoom, Bathroom) => Some(Vec2::new(450.0, 200.0)),
        (Bedroom, Bathroom) => Some(Vec2::new(300.0, 300.0)),
        _ => None,
    }
}

/// Axis-aligned room rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl RoomBounds {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min: Vec2::new(x0, y0),
            max: Vec2::new(x1, y1),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamp a point into the room, keeping `margin` away from the walls
    pub fn clamp(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x + margin, self.max.x - margin),
            p.y.clamp(self.min.y + margin, self.max.y - margin),
        )
    }

    /// Map unit coordinates `(u, v)` in `[0, 1)` to a point inside the inset rectangle
    pub fn point_at(&self, u: f32, v: f32, margin: f32) -> Vec2 {
        Vec2::new(
            self.min.x + margin + u * (self.max.x - self.min.x - 2.0 * margin),
            self.min.y + margin + v * (self.max.y - self.min.y - 2.0 * margin),
        )
    }
}

/// A room: who is in it and what mess is on the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub occupants: Vec<CatId>,
    pub messes: Vec<Mess>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            occupants: Vec::new(),
            messes: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.display_name()
    }

    /// 100 for a spotless room, 20 less for every mess, never below 0
    pub fn cleanliness(&self) -> i32 {
        (100 - 20 * self.messes.len() as i32).max(0)
    }

    pub fn contains(&self, cat: &CatId) -> bool {
        self.occupants.contains(cat)
    }

    pub(crate) fn enter(&mut self, cat: &CatId) {
        if !self.contains(cat) {
            self.occupants.push(cat.clone());
        }
    }

    pub(crate) fn leave(&mut self, cat: &CatId) {
        self.occupants.retain(|c| c != cat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_symmetric() {
        for room in RoomId::ALL {
            for neighbor in room.neighbors() {
                assert!(
                    neighbor.neighbors().contains(&room),
                    "{room} -> {neighbor} has no way back"
                );
                assert!(doorway(room, *neighbor).is_some());
            }
        }
    }

    #[test]
    fn test_doorway_sits_on_both_rooms() {
        for room in RoomId::ALL {
            for neighbor in room.neighbors() {
                let door = doorway(room, *neighbor).unwrap();
                assert!(room.bounds().contains(door));
                assert!(neighbor.bounds().contains(door));
            }
        }
    }

    #[test]
    fn test_parse_room_names() {
        assert_eq!("livingroom".parse::<RoomId>().unwrap(), RoomId::LivingRoom);
        assert_eq!("Living Room".parse::<RoomId>().unwrap(), RoomId::LivingRoom);
        assert_eq!("BATHROOM".parse::<RoomId>().unwrap(), RoomId::Bathroom);
        assert!("garage".parse::<RoomId>().is_err());
    }

    #[test]
    fn test_point_at_respects_margin() {
        let bounds = RoomId::Kitchen.bounds();
        let corner = bounds.point_at(0.0, 0.0, 20.0);
        assert_eq!(corner, Vec2::new(20.0, 20.0));
        let far = bounds.point_at(0.999, 0.999, 20.0);
        assert!(far.x < 280.0 && far.y < 180.0);
    }

    #[test]
    fn test_room_cleanliness_drops_with_mess() {
        use crate::house::mess::{Mess, MessKind};

        let mut room = Room::new(RoomId::Bedroom);
        assert_eq!(room.cleanliness(), 100);
        for i in 0..6 {
            room.messes.push(Mess::new(i, MessKind::Pee, Vec2::new(10.0, 10.0)));
        }
        assert_eq!(room.cleanliness(), 0);
    }
}
