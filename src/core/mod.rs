pub mod calendar;
pub mod config;
pub mod error;
pub mod random;
pub mod types;

pub use calendar::{DayClock, Phase};
pub use random::{RandomSource, ScriptedRandom};
