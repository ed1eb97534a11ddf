use embedded_hal::digital::InputPin;

use crate::switch::{
    types::{Level, SwitchOutput},
    SwitchDebouncer,
};

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<F> Clock for F
where
    F: Fn() -> u64,
{
    fn now_ms(&self) -> u64 {
        self()
    }
}

/// Clock backed by the embassy time driver.
#[cfg(feature = "embassy-time")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}

/// A [`SwitchDebouncer`] that owns its pin and clock.
///
/// The pin must already be configured in the mode the debouncer was built
/// with.
pub struct PinSwitch<'a, P, C> {
    pin: P,
    clock: C,
    switch: SwitchDebouncer<'a>,
}

impl<'a, P, C> PinSwitch<'a, P, C>
where
    P: InputPin,
    C: Clock,
{
    pub fn new(pin: P, clock: C, switch: SwitchDebouncer<'a>) -> Self {
        Self { pin, clock, switch }
    }

    /// Sample the pin and advance the debouncer. A failed read leaves the
    /// debouncer untouched.
    pub fn poll(&mut self) -> Result<SwitchOutput, P::Error> {
        let level = Level::from(self.pin.is_high()?);
        let now_ms = self.clock.now_ms();
        Ok(self.switch.poll(now_ms, level))
    }

    pub fn switch(&self) -> &SwitchDebouncer<'a> {
        &self.switch
    }

    pub fn switch_mut(&mut self) -> &mut SwitchDebouncer<'a> {
        &mut self.switch
    }

    pub fn release(self) -> (P, C, SwitchDebouncer<'a>) {
        (self.pin, self.clock, self.switch)
    }
}
