//! Debouncing and gesture classification for a single mechanical switch.
//!
//! [`SwitchDebouncer`] is advanced by one [`SwitchDebouncer::poll`] call per
//! loop iteration with the current time and the raw pin level. It filters
//! contact bounce and turns the confirmed edges into press, release, click,
//! double-click, hold, repeat and long-click events. Hardware access is kept
//! out of the core: [`input::PinSwitch`] wires an `embedded-hal` input pin and
//! a millisecond [`input::Clock`] to it.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod input;
pub mod switch;

pub use input::{Clock, PinSwitch};
pub use switch::{
    config::SwitchTiming,
    debounce::{DebounceGate, GateVerdict},
    notify::{Notification, NotificationSlots},
    trace::SwitchTraceSample,
    types::{
        DebounceState, EventBuffer, GestureState, Level, PinMode, Polarity, SwitchEvent,
        SwitchEventKind, SwitchOutput,
    },
    SwitchDebouncer,
};
