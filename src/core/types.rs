//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::house::rooms::RoomId;

/// Unique identifier for cats (the lowercase command name, e.g. `"mochi"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatId(pub String);

impl CatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Simulation time in milliseconds
pub type Millis = u64;

/// Where a cat is. `Missing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Room(RoomId),
    Outside,
    Missing,
}

impl Location {
    pub fn room(&self) -> Option<RoomId> {
        match self {
            Location::Room(room) => Some(*room),
            _ => None,
        }
    }

    pub fn is_indoors(&self) -> bool {
        matches!(self, Location::Room(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Room(room) => write!(f, "{}", room.display_name()),
            Location::Outside => f.write_str("Outside"),
            Location::Missing => f.write_str("Missing"),
        }
    }
}

/// 2D position in house coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Step toward `target` by at most `max_step`, landing exactly on it when close enough
    pub fn move_toward(&self, target: Vec2, max_step: f32) -> Vec2 {
        let delta = target - *self;
        let dist = delta.length();
        if dist <= max_step || dist <= 0.0001 {
            target
        } else {
            *self + delta.normalize() * max_step
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}
