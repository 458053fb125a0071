//! Day clock: four ordered phases per day
//!
//! Phases only move forward. Night is the last phase of a day; the only way
//! back to Morning is an explicit new day.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Segments of a game day, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Morning,   // 07:00-12:00
    Afternoon, // 12:00-17:00
    Evening,   // 17:00-22:00
    Night,     // 22:00
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Morning, Phase::Afternoon, Phase::Evening, Phase::Night];

    /// The following phase within the same day, `None` after Night
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Morning => Some(Phase::Afternoon),
            Phase::Afternoon => Some(Phase::Evening),
            Phase::Evening => Some(Phase::Night),
            Phase::Night => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Morning => "Morning",
            Phase::Afternoon => "Afternoon",
            Phase::Evening => "Evening",
            Phase::Night => "Night",
        };
        f.write_str(name)
    }
}

/// Tracks the day number, the current phase and the action budget of the phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayClock {
    day: u32,
    phase: Phase,
    actions_this_phase: u32,
    day_over: bool,
}

impl DayClock {
    pub fn new() -> Self {
        Self {
            day: 1,
            phase: Phase::Morning,
            actions_this_phase: 0,
            day_over: false,
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn actions_this_phase(&self) -> u32 {
        self.actions_this_phase
    }

    /// True once Night has been resolved and the day waits for a reset
    pub fn is_day_over(&self) -> bool {
        self.day_over
    }

    /// Count a player action; returns true when the phase budget is used up
    pub fn record_action(&mut self, actions_per_phase: u32) -> bool {
        self.actions_this_phase += 1;
        self.actions_this_phase >= actions_per_phase
    }

    /// Move to the next phase. Returns the new phase, or `None` if the day already reached Night.
    pub fn advance(&mut self) -> Option<Phase> {
        let next = self.phase.next()?;
        self.phase = next;
        self.actions_this_phase = 0;
        Some(next)
    }

    pub fn end_day(&mut self) {
        self.day_over = true;
    }

    /// Begin the next day at Morning
    pub fn start_new_day(&mut self) {
        self.day += 1;
        self.phase = Phase::Morning;
        self.actions_this_phase = 0;
        self.day_over = false;
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert!(Phase::Morning < Phase::Afternoon);
        assert!(Phase::Evening < Phase::Night);
        assert_eq!(Phase::Night.next(), None);
    }

    #[test]
    fn test_clock_advances_without_skipping() {
        let mut clock = DayClock::new();
        let mut seen = vec![clock.phase()];
        while let Some(phase) = clock.advance() {
            seen.push(phase);
        }
        assert_eq!(seen, Phase::ALL.to_vec());

        // Night is sticky until the day is reset
        assert_eq!(clock.advance(), None);
        assert_eq!(clock.phase(), Phase::Night);
    }

    #[test]
    fn test_action_budget() {
        let mut clock = DayClock::new();
        assert!(!clock.record_action(2));
        assert!(clock.record_action(2));
        clock.advance();
        assert_eq!(clock.actions_this_phase(), 0);
    }

    #[test]
    fn test_new_day_resets_to_morning() {
        let mut clock = DayClock::new();
        clock.advance();
        clock.advance();
        clock.advance();
        clock.end_day();
        assert!(clock.is_day_over());

        clock.start_new_day();
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.phase(), Phase::Morning);
        assert!(!clock.is_day_over());
    }
}
