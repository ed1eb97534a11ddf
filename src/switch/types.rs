/// Raw logic level of the switch pin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Electrical mode the pin was configured with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input with an external pull-down: pressed reads high.
    Input,
    /// Internal pull-up, switch to ground: pressed reads low.
    #[default]
    InputPullUp,
    /// Internal pull-down, switch to supply: pressed reads high.
    InputPullDown,
}

impl PinMode {
    pub const fn on_level(self) -> Level {
        match self {
            PinMode::Input | PinMode::InputPullDown => Level::High,
            PinMode::InputPullUp => Level::Low,
        }
    }
}

/// Which raw level means "on".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Derive the on-level from the [`PinMode`].
    #[default]
    Auto,
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    pub const fn resolve(self, mode: PinMode) -> Level {
        match self {
            Polarity::Auto => mode.on_level(),
            Polarity::ActiveHigh => Level::High,
            Polarity::ActiveLow => Level::Low,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GestureState {
    #[default]
    Released = 0,
    Pressed = 1,
    Held = 2,
    ReleasedAfterClick = 3,
    PressedAfterClick = 4,
}

impl GestureState {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn is_on(self) -> bool {
        matches!(
            self,
            GestureState::Pressed | GestureState::Held | GestureState::PressedAfterClick
        )
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DebounceState {
    #[default]
    Stable = 0,
    Paralyzed = 1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SwitchEventKind {
    Pressed = 0,
    Clicked = 1,
    Held = 2,
    Repeated = 3,
    LongClicked = 4,
    DoubleClicked = 5,
    Released = 6,
}

impl SwitchEventKind {
    pub const COUNT: usize = 7;

    pub const ALL: [SwitchEventKind; Self::COUNT] = [
        SwitchEventKind::Pressed,
        SwitchEventKind::Clicked,
        SwitchEventKind::Held,
        SwitchEventKind::Repeated,
        SwitchEventKind::LongClicked,
        SwitchEventKind::DoubleClicked,
        SwitchEventKind::Released,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            SwitchEventKind::Pressed => "pressed",
            SwitchEventKind::Clicked => "clicked",
            SwitchEventKind::Held => "held",
            SwitchEventKind::Repeated => "repeated",
            SwitchEventKind::LongClicked => "long_clicked",
            SwitchEventKind::DoubleClicked => "double_clicked",
            SwitchEventKind::Released => "released",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchEvent {
    pub kind: SwitchEventKind,
    pub t_ms: u64,
}

/// Events of a single poll, in firing order.
///
/// The worst case is click + held + repeated when a second press crosses the
/// hold threshold, so four slots never overflow.
pub type EventBuffer = heapless::Vec<SwitchEvent, 4>;

/// What one [`poll`](super::SwitchDebouncer::poll) produced.
///
/// The click flags are one-shot: they describe this poll only and are
/// recomputed on every call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SwitchOutput {
    pub events: EventBuffer,
}

impl SwitchOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, kind: SwitchEventKind) -> bool {
        self.events.iter().any(|event| event.kind == kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = SwitchEventKind> + '_ {
        self.events.iter().map(|event| event.kind)
    }

    pub fn is_clicked(&self) -> bool {
        self.contains(SwitchEventKind::Clicked)
    }

    pub fn is_long_clicked(&self) -> bool {
        self.contains(SwitchEventKind::LongClicked)
    }

    pub fn is_double_clicked(&self) -> bool {
        self.contains(SwitchEventKind::DoubleClicked)
    }
}
