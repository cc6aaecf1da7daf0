//! Platform-agnostic input types.
//!
//! Hosts translate native touches into [`TouchPhase`] callbacks; the skin
//! engine answers with command-level [`InputEvent`]s delivered to an
//! [`InputSink`]. The engine never sees raw platform input.

use serde::{Deserialize, Serialize};

/// A command-level event emitted by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// The command became active.
    Pressed(String),
    /// The command stopped being active.
    Released(String),
}

impl InputEvent {
    /// The command this event refers to.
    pub fn command(&self) -> &str {
        match self {
            InputEvent::Pressed(c) | InputEvent::Released(c) => c,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, InputEvent::Pressed(_))
    }
}

/// Phase of a touch as delivered by the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    /// The system interrupted the gesture. Treated exactly like `Ended`.
    Cancelled,
}

impl TouchPhase {
    /// True for phases that finish the touch.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TouchPhase::Ended | TouchPhase::Cancelled)
    }
}

/// Receiver of press/release commands, typically the emulator core bridge.
pub trait InputSink {
    fn button_pressed(&mut self, command: &str);
    fn button_released(&mut self, command: &str);

    /// Dispatch a mapper event to the matching callback.
    fn dispatch(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Pressed(c) => self.button_pressed(c),
            InputEvent::Released(c) => self.button_released(c),
        }
    }
}

/// A sink that records every event it receives, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    pub events: Vec<InputEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded events.
    pub fn take(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of presses recorded for `command`.
    pub fn presses(&self, command: &str) -> usize {
        self.events
            .iter()
            .filter(|e| e.is_press() && e.command() == command)
            .count()
    }

    /// Number of releases recorded for `command`.
    pub fn releases(&self, command: &str) -> usize {
        self.events
            .iter()
            .filter(|e| !e.is_press() && e.command() == command)
            .count()
    }
}

impl InputSink for RecordingSink {
    fn button_pressed(&mut self, command: &str) {
        self.events.push(InputEvent::Pressed(command.to_string()));
    }

    fn button_released(&mut self, command: &str) {
        self.events.push(InputEvent::Released(command.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_command_accessor() {
        assert_eq!(InputEvent::Pressed("a".into()).command(), "a");
        assert_eq!(InputEvent::Released("up".into()).command(), "up");
    }

    #[test]
    fn press_differs_from_release() {
        let press = InputEvent::Pressed("a".into());
        let release = InputEvent::Released("a".into());
        assert_ne!(press, release);
        assert!(press.is_press());
        assert!(!release.is_press());
    }

    #[test]
    fn terminal_phases() {
        assert!(TouchPhase::Ended.is_terminal());
        assert!(TouchPhase::Cancelled.is_terminal());
        assert!(!TouchPhase::Began.is_terminal());
        assert!(!TouchPhase::Moved.is_terminal());
    }

    #[test]
    fn recording_sink_dispatch() {
        let mut sink = RecordingSink::new();
        sink.dispatch(&InputEvent::Pressed("start".into()));
        sink.dispatch(&InputEvent::Released("start".into()));
        assert_eq!(sink.presses("start"), 1);
        assert_eq!(sink.releases("start"), 1);
        assert_eq!(sink.presses("select"), 0);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn event_serde_roundtrip() {
        let e = InputEvent::Pressed("l".into());
        let json = serde_json::to_string(&e).unwrap();
        let e2: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(e, e2);
    }
}
