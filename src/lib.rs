//! Cat Life - Household Simulation
//!
//! A small household of cats with competing needs, a four-room house and a
//! player with limited energy. See `simulation::Game` for the runtime entry point.

pub mod command;
pub mod core;
pub mod entity;
pub mod house;
pub mod persistence;
pub mod simulation;
