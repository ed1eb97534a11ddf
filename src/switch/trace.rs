use super::{
    debounce::GateVerdict,
    types::{DebounceState, GestureState, Level},
};

/// Snapshot of the switch after one poll, for diagnostics and replays.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchTraceSample {
    pub now_ms: u64,
    pub raw: Level,
    pub verdict: GateVerdict,
    pub debounce_state: DebounceState,
    pub gesture_state: GestureState,
    pub stable_level: Level,
    pub press_started_ms: Option<u64>,
    pub click_completed_ms: Option<u64>,
    pub event_count: u8,
}
