//! Messes left on the floor by cats

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessKind {
    Poop,
    Pee,
}

impl fmt::Display for MessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessKind::Poop => f.write_str("poop"),
            MessKind::Pee => f.write_str("pee"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mess {
    pub id: u32,
    pub kind: MessKind,
    pub position: Vec2,
}

impl Mess {
    pub fn new(id: u32, kind: MessKind, position: Vec2) -> Self {
        Self { id, kind, position }
    }
}
