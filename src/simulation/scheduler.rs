//! Turns elapsed wall-clock time into an ordered list of driver firings
//!
//! The phase timer, the decay timer and the frame updater all run against
//! one session. The scheduler walks simulated time in frame-sized steps and
//! emits firings in a fixed order within each step (phase, decay, frame), so
//! no update is ever interleaved with another.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::random::RandomSource;
use crate::core::types::Millis;
use crate::simulation::session::GameSession;

/// Upper bound on frames emitted per call, so a stalled host cannot snowball
pub const MAX_FRAMES_PER_ADVANCE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Driver {
    Phase,
    Decay,
    Frame,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    phase_elapsed: Millis,
    decay_elapsed: Millis,
    /// Simulated time not yet spent on a whole frame
    carry: Millis,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget accumulated time (new day, loaded game)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Firings owed for `wall_dt_ms` of real time at the given speed
    pub fn advance(&mut self, wall_dt_ms: Millis, speed: u32, config: &SimulationConfig) -> Vec<Driver> {
        let frame = config.frame_ms.max(1);
        self.carry += wall_dt_ms * u64::from(speed.max(1));

        let mut firings = Vec::new();
        let mut frames = 0;
        while self.carry >= frame && frames < MAX_FRAMES_PER_ADVANCE {
            self.carry -= frame;
            frames += 1;

            self.phase_elapsed += frame;
            if self.phase_elapsed >= config.phase_interval_ms {
                self.phase_elapsed = 0;
                firings.push(Driver::Phase);
            }
            self.decay_elapsed += frame;
            if self.decay_elapsed >= config.decay_interval_ms {
                self.decay_elapsed = 0;
                firings.push(Driver::Decay);
            }
            firings.push(Driver::Frame);
        }
        if frames == MAX_FRAMES_PER_ADVANCE && self.carry >= frame {
            tracing::debug!(dropped_ms = self.carry, "scheduler fell behind");
            self.carry = 0;
        }
        firings
    }

    /// Advance and apply every firing to the session. Halted sessions accumulate nothing.
    pub fn run(&mut self, wall_dt_ms: Millis, session: &mut GameSession, rng: &mut dyn RandomSource) -> usize {
        if !session.is_running() {
            return 0;
        }
        let firings = self.advance(wall_dt_ms, session.speed, &session.config);
        for &driver in &firings {
            session.fire(driver, rng);
        }
        firings.len()
    }
}

impl GameSession {
    /// Apply one driver firing
    pub fn fire(&mut self, driver: Driver, rng: &mut dyn RandomSource) {
        match driver {
            Driver::Phase => self.advance_phase(rng),
            Driver::Decay => self.run_decay_tick(rng),
            Driver::Frame => self.run_frame(self.config.frame_ms, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::Phase;
    use crate::core::random::ScriptedRandom;
    use crate::simulation::session::SessionSettings;

    #[test]
    fn test_frames_and_carry() {
        let config = SimulationConfig::default();
        let mut scheduler = Scheduler::new();
        let firings = scheduler.advance(120, 1, &config);
        assert_eq!(firings, vec![Driver::Frame, Driver::Frame]);
        // The leftover 20ms completes a frame with the next 30ms
        let firings = scheduler.advance(30, 1, &config);
        assert_eq!(firings, vec![Driver::Frame]);
    }

    #[test]
    fn test_decay_fires_before_frame() {
        let config = SimulationConfig {
            decay_interval_ms: 100,
            ..SimulationConfig::default()
        };
        let mut scheduler = Scheduler::new();
        let firings = scheduler.advance(100, 1, &config);
        assert_eq!(firings, vec![Driver::Frame, Driver::Decay, Driver::Frame]);
    }

    #[test]
    fn test_speed_scales_time() {
        let config = SimulationConfig::default();
        let mut slow = Scheduler::new();
        let mut fast = Scheduler::new();
        let slow_frames = slow.advance(500, 1, &config).len();
        let fast_frames = fast.advance(500, 4, &config).len();
        assert_eq!(slow_frames * 4, fast_frames);
    }

    #[test]
    fn test_frames_capped() {
        let config = SimulationConfig::default();
        let mut scheduler = Scheduler::new();
        let frames = scheduler
            .advance(1_000_000, 1, &config)
            .into_iter()
            .filter(|d| *d == Driver::Frame)
            .count();
        assert_eq!(frames, MAX_FRAMES_PER_ADVANCE as usize);
        assert!(scheduler.advance(0, 1, &config).is_empty());
    }

    #[test]
    fn test_paused_session_halts_drivers() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut session = GameSession::new(SessionSettings::default(), SimulationConfig::default(), &mut rng);
        let mut scheduler = Scheduler::new();
        session.paused = true;
        assert_eq!(scheduler.run(10_000, &mut session, &mut rng), 0);
        session.paused = false;
        assert!(scheduler.run(100, &mut session, &mut rng) > 0);
    }

    #[test]
    fn test_phase_timer_advances_clock() {
        let mut rng = ScriptedRandom::constant(0.5);
        let config = SimulationConfig {
            phase_interval_ms: 1000,
            ..SimulationConfig::default()
        };
        let mut session = GameSession::new(SessionSettings::default(), config, &mut rng);
        let mut scheduler = Scheduler::new();
        scheduler.run(1000, &mut session, &mut rng);
        assert_eq!(session.phase(), Phase::Afternoon);
    }
}
