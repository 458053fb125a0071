//! The one-way boundary between the simulation and whatever presents it
//!
//! Session operations never call a renderer directly. They queue
//! [`GameMessage`]s; the driver drains the queue into a [`SessionObserver`]
//! and asks it to render once the operation is complete.

use serde::{Deserialize, Serialize};

use crate::simulation::session::GameSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogCategory {
    /// Ordinary narration
    Game,
    /// Echo of the player's own input
    Player,
    /// Energy spent or restored
    Energy,
    /// Rejected input or something that needs attention
    Warning,
    /// Something the cats did on their own
    Event,
    /// Health changes with their reasons
    Health,
    /// End-of-day report
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMessage {
    pub text: String,
    pub category: LogCategory,
}

impl GameMessage {
    pub fn new(text: impl Into<String>, category: LogCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

pub trait SessionObserver {
    /// Called after every state-changing operation. Must not touch the session.
    fn render(&mut self, session: &GameSession);

    fn log(&mut self, message: &GameMessage);
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn render(&mut self, _session: &GameSession) {}

    fn log(&mut self, _message: &GameMessage) {}
}
