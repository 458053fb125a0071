//! The household simulation loop
//!
//! `session` holds all state; `actions` are the player operations and
//! `incidents` the surprises that may follow them;
//! `decay`, `motion` and `progression` are the three periodic drivers,
//! sequenced by `scheduler`; `game` owns everything at runtime.

pub mod actions;
pub mod conflict;
pub mod decay;
pub mod events;
pub mod game;
pub mod incidents;
pub mod motion;
pub mod progression;
pub mod scheduler;
pub mod scoring;
pub mod session;

pub use actions::CleanTarget;
pub use conflict::{conflicting_pairs, Fight};
pub use events::{GameMessage, LogCategory, NullObserver, SessionObserver};
pub use game::Game;
pub use incidents::Incident;
pub use scheduler::{Driver, Scheduler};
pub use scoring::{DailyStats, DaySummary, GameOutcome, NightVerdict};
pub use session::{GameSession, SessionSettings, MAX_SPEED};
