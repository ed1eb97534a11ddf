#[cfg(feature = "defmt")]
use defmt::trace;
#[cfg(not(feature = "defmt"))]
use log::trace;

use super::types::{DebounceState, Level};

/// Outcome of feeding one raw sample through the [`DebounceGate`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateVerdict {
    /// Raw level matches the stable level; timeouts may be evaluated.
    #[default]
    Steady,
    /// A raw edge was seen and paralysis started.
    Paralyzed,
    /// Still inside the paralysis window.
    Waiting,
    /// Paralysis ended with the level back where it started.
    Glitch,
    /// Paralysis ended on a new level, which is now the stable level.
    Confirmed(Level),
}

/// Time-gated filter in front of the gesture machine.
///
/// After any raw change the gate ignores the pin for the debounce window, then
/// compares once against the level it had before. It knows nothing about
/// gestures.
#[derive(Clone, Copy, Debug)]
pub struct DebounceGate {
    state: DebounceState,
    paralysis_started_ms: u64,
    stable_level: Level,
}

impl DebounceGate {
    pub const fn new(initial_level: Level) -> Self {
        Self {
            state: DebounceState::Stable,
            paralysis_started_ms: 0,
            stable_level: initial_level,
        }
    }

    pub const fn state(&self) -> DebounceState {
        self.state
    }

    pub const fn stable_level(&self) -> Level {
        self.stable_level
    }

    pub const fn paralysis_started_ms(&self) -> Option<u64> {
        match self.state {
            DebounceState::Paralyzed => Some(self.paralysis_started_ms),
            DebounceState::Stable => None,
        }
    }

    pub fn sample(&mut self, now_ms: u64, raw: Level, window_ms: u64) -> GateVerdict {
        match self.state {
            DebounceState::Paralyzed => {
                if now_ms.saturating_sub(self.paralysis_started_ms) <= window_ms {
                    return GateVerdict::Waiting;
                }

                self.state = DebounceState::Stable;
                if raw == self.stable_level {
                    trace!(
                        "switch: glitch absorbed at {} ms (level {:?})",
                        now_ms,
                        raw
                    );
                    GateVerdict::Glitch
                } else {
                    self.stable_level = raw;
                    GateVerdict::Confirmed(raw)
                }
            }
            DebounceState::Stable => {
                if raw == self.stable_level {
                    GateVerdict::Steady
                } else if window_ms == 0 {
                    self.stable_level = raw;
                    GateVerdict::Confirmed(raw)
                } else {
                    self.state = DebounceState::Paralyzed;
                    self.paralysis_started_ms = now_ms;
                    GateVerdict::Paralyzed
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_is_confirmed_only_after_window_elapses() {
        let mut gate = DebounceGate::new(Level::High);

        assert_eq!(gate.sample(100, Level::Low, 5), GateVerdict::Paralyzed);
        assert_eq!(gate.state(), DebounceState::Paralyzed);
        assert_eq!(gate.paralysis_started_ms(), Some(100));
        assert_eq!(gate.sample(103, Level::High, 5), GateVerdict::Waiting);
        assert_eq!(gate.sample(105, Level::Low, 5), GateVerdict::Waiting);
        assert_eq!(gate.sample(106, Level::Low, 5), GateVerdict::Confirmed(Level::Low));
        assert_eq!(gate.state(), DebounceState::Stable);
        assert_eq!(gate.stable_level(), Level::Low);
        assert_eq!(gate.sample(107, Level::Low, 5), GateVerdict::Steady);
    }

    #[test]
    fn level_back_to_start_is_a_glitch() {
        let mut gate = DebounceGate::new(Level::High);

        assert_eq!(gate.sample(10, Level::Low, 5), GateVerdict::Paralyzed);
        assert_eq!(gate.sample(16, Level::High, 5), GateVerdict::Glitch);
        assert_eq!(gate.state(), DebounceState::Stable);
        assert_eq!(gate.stable_level(), Level::High);
        assert_eq!(gate.paralysis_started_ms(), None);
    }

    #[test]
    fn zero_window_accepts_edges_immediately() {
        let mut gate = DebounceGate::new(Level::Low);

        assert_eq!(gate.sample(0, Level::High, 0), GateVerdict::Confirmed(Level::High));
        assert_eq!(gate.sample(0, Level::Low, 0), GateVerdict::Confirmed(Level::Low));
        assert_eq!(gate.state(), DebounceState::Stable);
    }

    #[test]
    fn clock_going_backwards_keeps_waiting() {
        let mut gate = DebounceGate::new(Level::High);

        assert_eq!(gate.sample(1_000, Level::Low, 5), GateVerdict::Paralyzed);
        assert_eq!(gate.sample(10, Level::Low, 5), GateVerdict::Waiting);
    }
}
