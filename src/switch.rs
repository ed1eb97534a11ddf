use statig::blocking::IntoStateMachineExt as _;

pub mod config;
pub mod debounce;
mod hsm;
pub mod notify;
pub mod trace;
pub mod types;


use config::SwitchTiming;
use debounce::{DebounceGate, GateVerdict};
use hsm::{DispatchContext, GestureEvent, GestureHsm};
use notify::{Notification, NotificationSlots};
use trace::SwitchTraceSample;
use types::{DebounceState, GestureState, Level, PinMode, Polarity, SwitchEventKind, SwitchOutput};

/// Debouncer and gesture classifier for one switch.
///
/// Call [`poll`](Self::poll) once per loop iteration. Each call costs a handful
/// of comparisons and fires the attached notifications for whatever happened
/// before returning. A notification runs on the polling context, so it must
/// stay short or it will skew the timing model.
pub struct SwitchDebouncer<'a> {
    pin_mode: PinMode,
    on_level: Level,
    timing: SwitchTiming,
    gate: DebounceGate,
    machine: statig::blocking::StateMachine<GestureHsm>,
    notifications: NotificationSlots<'a>,
    last_output: SwitchOutput,
    last_trace: SwitchTraceSample,
}

impl Default for SwitchDebouncer<'_> {
    fn default() -> Self {
        Self::new(PinMode::default(), Polarity::Auto, SwitchTiming::DEFAULT)
    }
}

impl<'a> SwitchDebouncer<'a> {
    pub fn new(pin_mode: PinMode, polarity: Polarity, timing: SwitchTiming) -> Self {
        let on_level = polarity.resolve(pin_mode);
        let off_level = on_level.inverted();
        Self {
            pin_mode,
            on_level,
            timing,
            gate: DebounceGate::new(off_level),
            machine: GestureHsm::new().state_machine(),
            notifications: NotificationSlots::new(),
            last_output: SwitchOutput::default(),
            last_trace: SwitchTraceSample {
                stable_level: off_level,
                raw: off_level,
                ..SwitchTraceSample::default()
            },
        }
    }

    pub fn with_mode(pin_mode: PinMode) -> Self {
        Self::new(pin_mode, Polarity::Auto, SwitchTiming::DEFAULT)
    }

    /// Advance the switch with the current time and raw pin level.
    pub fn poll(&mut self, now_ms: u64, raw: Level) -> SwitchOutput {
        let verdict = self.gate.sample(now_ms, raw, self.timing.debounce_ms);
        let mut context = DispatchContext::new(self.timing);

        match verdict {
            GateVerdict::Confirmed(level) => {
                let on = level == self.on_level;
                self.machine
                    .handle_with_context(&GestureEvent::Edge { now_ms, on }, &mut context);
            }
            GateVerdict::Steady => {
                self.machine
                    .handle_with_context(&GestureEvent::Tick { now_ms }, &mut context);
            }
            GateVerdict::Paralyzed | GateVerdict::Waiting | GateVerdict::Glitch => {}
        }

        let output = context.finish();
        self.notifications.dispatch(&output.events);
        self.record_trace(now_ms, raw, verdict, &output);
        self.last_output = output.clone();
        output
    }

    fn record_trace(&mut self, now_ms: u64, raw: Level, verdict: GateVerdict, output: &SwitchOutput) {
        let hsm = self.machine.inner();
        self.last_trace = SwitchTraceSample {
            now_ms,
            raw,
            verdict,
            debounce_state: self.gate.state(),
            gesture_state: hsm.state_id,
            stable_level: self.gate.stable_level(),
            press_started_ms: hsm.press_started_ms,
            click_completed_ms: hsm.click_completed_ms,
            event_count: output.events.len() as u8,
        };
    }

    pub fn attach(&mut self, kind: SwitchEventKind, notification: Notification<'a>) {
        self.notifications.attach(kind, notification);
    }

    pub fn detach(&mut self, kind: SwitchEventKind) -> Option<Notification<'a>> {
        self.notifications.detach(kind)
    }

    pub fn attach_pressed(&mut self, notification: Notification<'a>) {
        self.attach(SwitchEventKind::Pressed, notification);
    }

    pub fn attach_clicked(&mut self, notification: Notification<'a>) {
        self.attach(SwitchEventKind::Clicked, notification);
    }

    pub fn attach_held(&mut self, notification: Notification<'a>) {
        self.attach(SwitchEventKind::Held, notification);
    }

    pub fn attach_repeated(&mut self, notification: Notification<'a>) {
        self.attach(SwitchEventKind::Repeated, notification);
    }

    pub fn attach_long_clicked(&mut self, notification: Notification<'a>) {
        self.attach(SwitchEventKind::LongClicked, notification);
    }

    pub fn attach_double_clicked(&mut self, notification: Notification<'a>) {
        self.attach(SwitchEventKind::DoubleClicked, notification);
    }

    pub fn attach_released(&mut self, notification: Notification<'a>) {
        self.attach(SwitchEventKind::Released, notification);
    }

    pub fn set_debounce_ms(&mut self, debounce_ms: u64) {
        self.timing.debounce_ms = debounce_ms;
    }

    pub fn set_hold_ms(&mut self, hold_ms: u64) {
        self.timing.hold_ms = hold_ms;
    }

    pub fn set_repeat_ms(&mut self, repeat_ms: u64) {
        self.timing.repeat_ms = repeat_ms;
    }

    pub fn set_double_click_ms(&mut self, double_click_ms: u64) {
        self.timing.double_click_ms = double_click_ms;
    }

    pub fn timing(&self) -> SwitchTiming {
        self.timing
    }

    pub fn pin_mode(&self) -> PinMode {
        self.pin_mode
    }

    /// Raw level that reads as "on".
    pub fn polarity(&self) -> Level {
        self.on_level
    }

    pub fn gesture_state(&self) -> GestureState {
        self.machine.inner().state_id
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.gate.state()
    }

    pub fn last_stable_level(&self) -> Level {
        self.gate.stable_level()
    }

    pub fn is_on(&self) -> bool {
        self.gesture_state().is_on()
    }

    pub fn is_off(&self) -> bool {
        !self.is_on()
    }

    pub fn is_pressed(&self) -> bool {
        matches!(
            self.gesture_state(),
            GestureState::Pressed | GestureState::PressedAfterClick
        )
    }

    pub fn is_released(&self) -> bool {
        matches!(
            self.gesture_state(),
            GestureState::Released | GestureState::ReleasedAfterClick
        )
    }

    pub fn is_held(&self) -> bool {
        self.gesture_state() == GestureState::Held
    }

    pub fn is_clicked(&self) -> bool {
        self.last_output.is_clicked()
    }

    pub fn is_long_clicked(&self) -> bool {
        self.last_output.is_long_clicked()
    }

    pub fn is_double_clicked(&self) -> bool {
        self.last_output.is_double_clicked()
    }

    pub fn last_output(&self) -> &SwitchOutput {
        &self.last_output
    }

    pub fn last_trace(&self) -> SwitchTraceSample {
        self.last_trace
    }
}
