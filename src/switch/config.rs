/// Timing thresholds, all in milliseconds of the injected clock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchTiming {
    /// Paralysis after a raw edge. 0 accepts edges on the poll that sees them.
    pub debounce_ms: u64,
    /// Press duration before a press becomes a hold.
    pub hold_ms: u64,
    /// Cadence of repeat events while held.
    pub repeat_ms: u64,
    /// Wait after a click for a second press before the click is final.
    pub double_click_ms: u64,
}

impl SwitchTiming {
    pub const DEFAULT: Self = Self {
        debounce_ms: 5,
        hold_ms: 500,
        repeat_ms: 500,
        double_click_ms: 200,
    };

    pub const fn with_debounce_ms(self, debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            ..self
        }
    }

    pub const fn with_hold_ms(self, hold_ms: u64) -> Self {
        Self { hold_ms, ..self }
    }

    pub const fn with_repeat_ms(self, repeat_ms: u64) -> Self {
        Self { repeat_ms, ..self }
    }

    pub const fn with_double_click_ms(self, double_click_ms: u64) -> Self {
        Self {
            double_click_ms,
            ..self
        }
    }
}

impl Default for SwitchTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}
