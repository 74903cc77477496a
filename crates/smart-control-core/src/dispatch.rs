//! Output boundary towards the actuator
//!
//! Dispatch is fire-and-forget: the engine neither waits for nor retries an
//! actuation. Whatever the actuator does with a failed event is its own
//! concern.

use crate::action::ActionEvent;

/// Anything that can perform [`ActionEvent`]s.
pub trait ActionDispatcher: Send {
    fn dispatch(&mut self, event: &ActionEvent);
}

impl<F> ActionDispatcher for F
where
    F: FnMut(&ActionEvent) + Send,
{
    fn dispatch(&mut self, event: &ActionEvent) {
        self(event)
    }
}

/// Keeps every dispatched event, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingDispatcher {
    events: Vec<ActionEvent>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ActionEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ActionEvent> {
        self.events
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, event: &ActionEvent) {
        self.events.push(*event);
    }
}
