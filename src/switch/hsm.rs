#[cfg(feature = "defmt")]
use defmt::debug;
#[cfg(not(feature = "defmt"))]
use log::debug;
use statig::prelude::*;

use super::{
    config::SwitchTiming,
    types::{EventBuffer, GestureState, SwitchEvent, SwitchEventKind, SwitchOutput},
};

#[derive(Clone, Copy, Debug)]
pub(super) enum GestureEvent {
    /// A debounced level change; `on` is the new interpreted level.
    Edge { now_ms: u64, on: bool },
    /// Stable level, no edge: evaluate the timeouts of the current state.
    Tick { now_ms: u64 },
}

pub(super) struct DispatchContext {
    timing: SwitchTiming,
    events: EventBuffer,
}

impl DispatchContext {
    pub(super) fn new(timing: SwitchTiming) -> Self {
        Self {
            timing,
            events: EventBuffer::new(),
        }
    }

    fn emit(&mut self, kind: SwitchEventKind, now_ms: u64) {
        let _ = self.events.push(SwitchEvent { kind, t_ms: now_ms });
    }

    pub(super) fn finish(self) -> SwitchOutput {
        SwitchOutput {
            events: self.events,
        }
    }
}

pub(super) struct GestureHsm {
    pub(super) state_id: GestureState,
    pub(super) press_started_ms: Option<u64>,
    pub(super) click_completed_ms: Option<u64>,
}

impl GestureHsm {
    pub(super) fn new() -> Self {
        Self {
            state_id: GestureState::Released,
            press_started_ms: None,
            click_completed_ms: None,
        }
    }

    fn since_press(&self, now_ms: u64) -> u64 {
        self.press_started_ms
            .map_or(0, |start| now_ms.saturating_sub(start))
    }

    fn since_click(&self, now_ms: u64) -> u64 {
        self.click_completed_ms
            .map_or(0, |done| now_ms.saturating_sub(done))
    }

    fn on_edge(&mut self, context: &mut DispatchContext, now_ms: u64) {
        context.emit(SwitchEventKind::Pressed, now_ms);
        self.press_started_ms = Some(now_ms);
    }

    fn off_edge(&mut self, context: &mut DispatchContext, now_ms: u64) {
        context.emit(SwitchEventKind::Released, now_ms);
    }

    fn finish_gesture(&mut self) {
        self.press_started_ms = None;
        self.click_completed_ms = None;
    }

    fn start_hold(&mut self, context: &mut DispatchContext, now_ms: u64) {
        context.emit(SwitchEventKind::Held, now_ms);
        context.emit(SwitchEventKind::Repeated, now_ms);
        self.press_started_ms = Some(now_ms);
    }

    fn go(&mut self, target: GestureState) -> Outcome<State> {
        debug!("switch: {:?} -> {:?}", self.state_id, target);
        self.state_id = target;
        Transition(match target {
            GestureState::Released => State::released(),
            GestureState::Pressed => State::pressed(),
            GestureState::Held => State::held(),
            GestureState::ReleasedAfterClick => State::released_after_click(),
            GestureState::PressedAfterClick => State::pressed_after_click(),
        })
    }
}

#[state_machine(initial = "State::released()")]
impl GestureHsm {
    #[state(superstate = "idle")]
    fn released(&mut self, context: &mut DispatchContext, event: &GestureEvent) -> Outcome<State> {
        match event {
            GestureEvent::Edge { now_ms, on: true } => {
                self.on_edge(context, *now_ms);
                self.go(GestureState::Pressed)
            }
            _ => Super,
        }
    }

    #[state(superstate = "idle")]
    fn released_after_click(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureEvent,
    ) -> Outcome<State> {
        match event {
            GestureEvent::Edge { now_ms, on: true } => {
                self.on_edge(context, *now_ms);
                self.go(GestureState::PressedAfterClick)
            }
            GestureEvent::Tick { now_ms } => {
                if self.since_click(*now_ms) > context.timing.double_click_ms {
                    context.emit(SwitchEventKind::Clicked, *now_ms);
                    self.click_completed_ms = None;
                    return self.go(GestureState::Released);
                }
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "engaged")]
    fn pressed(&mut self, context: &mut DispatchContext, event: &GestureEvent) -> Outcome<State> {
        match event {
            GestureEvent::Edge { now_ms, on: false } => {
                self.off_edge(context, *now_ms);
                self.press_started_ms = None;
                self.click_completed_ms = Some(*now_ms);
                self.go(GestureState::ReleasedAfterClick)
            }
            GestureEvent::Tick { now_ms } => {
                if self.since_press(*now_ms) > context.timing.hold_ms {
                    self.start_hold(context, *now_ms);
                    return self.go(GestureState::Held);
                }
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "engaged")]
    fn held(&mut self, context: &mut DispatchContext, event: &GestureEvent) -> Outcome<State> {
        match event {
            GestureEvent::Edge { now_ms, on: false } => {
                self.off_edge(context, *now_ms);
                context.emit(SwitchEventKind::LongClicked, *now_ms);
                self.finish_gesture();
                self.go(GestureState::Released)
            }
            GestureEvent::Tick { now_ms } => {
                if self.since_press(*now_ms) > context.timing.repeat_ms {
                    context.emit(SwitchEventKind::Repeated, *now_ms);
                    self.press_started_ms = Some(*now_ms);
                }
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "engaged")]
    fn pressed_after_click(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureEvent,
    ) -> Outcome<State> {
        match event {
            GestureEvent::Edge { now_ms, on: false } => {
                self.off_edge(context, *now_ms);
                context.emit(SwitchEventKind::DoubleClicked, *now_ms);
                self.finish_gesture();
                self.go(GestureState::Released)
            }
            GestureEvent::Tick { now_ms } => {
                // Click followed by a long press: settle the first click, then
                // treat the second press as a hold. No double-click here.
                if self.since_press(*now_ms) > context.timing.hold_ms {
                    context.emit(SwitchEventKind::Clicked, *now_ms);
                    self.start_hold(context, *now_ms);
                    self.click_completed_ms = None;
                    return self.go(GestureState::Held);
                }
                Handled
            }
            _ => Super,
        }
    }

    /// Off states. Edges that do not move the gesture forward still notify.
    #[superstate]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureEvent) -> Outcome<State> {
        match event {
            GestureEvent::Edge { now_ms, on: true } => {
                self.on_edge(context, *now_ms);
                Handled
            }
            GestureEvent::Edge { now_ms, on: false } => {
                self.off_edge(context, *now_ms);
                Handled
            }
            GestureEvent::Tick { .. } => Handled,
        }
    }

    #[superstate]
    fn engaged(&mut self, context: &mut DispatchContext, event: &GestureEvent) -> Outcome<State> {
        match event {
            GestureEvent::Edge { now_ms, on: true } => {
                self.on_edge(context, *now_ms);
                Handled
            }
            GestureEvent::Edge { now_ms, on: false } => {
                self.off_edge(context, *now_ms);
                Handled
            }
            GestureEvent::Tick { .. } => Handled,
        }
    }
}
