use super::types::{SwitchEvent, SwitchEventKind};

/// A zero-argument notification borrowed for the lifetime of the switch.
pub type Notification<'a> = &'a mut (dyn FnMut() + 'a);

/// One optional notification per [`SwitchEventKind`].
///
/// Attaching replaces whatever was in the slot. Nothing fires retroactively.
pub struct NotificationSlots<'a> {
    slots: [Option<Notification<'a>>; SwitchEventKind::COUNT],
}

impl<'a> NotificationSlots<'a> {
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
        }
    }

    pub fn attach(&mut self, kind: SwitchEventKind, notification: Notification<'a>) {
        self.slots[kind.index()] = Some(notification);
    }

    pub fn detach(&mut self, kind: SwitchEventKind) -> Option<Notification<'a>> {
        self.slots[kind.index()].take()
    }

    pub fn is_attached(&self, kind: SwitchEventKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn notify(&mut self, kind: SwitchEventKind) {
        if let Some(notification) = self.slots[kind.index()].as_mut() {
            notification();
        }
    }

    pub fn dispatch(&mut self, events: &[SwitchEvent]) {
        for event in events {
            self.notify(event.kind);
        }
    }
}

impl Default for NotificationSlots<'_> {
    fn default() -> Self {
        Self::new()
    }
}
