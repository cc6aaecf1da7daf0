//! Hit-testing and touch-to-command mapping.
//!
//! [`InputMapper`] turns a stream of touch points for a single finger into
//! edge-triggered [`InputEvent`]s. The per-finger state lives in an
//! [`InputSession`] owned by the caller, so one mapper can serve any number
//! of touches and views.

use padkit_types::config::EngineConfig;
use padkit_types::geometry::{EdgeInsets, Point, Rect};
use padkit_types::input::InputEvent;

use crate::descriptor::{Button, Direction, InputKind};
use crate::layout::Layout;

/// The button a finger is currently holding and the command it has pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActivePress {
    button_id: String,
    /// `None` while a directional control sits in its dead zone.
    command: Option<String>,
}

/// State of one finger between touch-down and touch-up.
#[derive(Debug, Clone, Default)]
pub struct InputSession {
    active: Option<ActivePress>,
    last_point: Option<Point>,
}

impl InputSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the finger holds a button.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the held button.
    pub fn active_button(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.button_id.as_str())
    }

    /// Command currently pressed by this finger.
    pub fn active_command(&self) -> Option<&str> {
        self.active.as_ref().and_then(|a| a.command.as_deref())
    }

    /// Last location seen, in container space.
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Release whatever is held and forget the button.
    fn release_all(&mut self, events: &mut Vec<InputEvent>) {
        if let Some(ActivePress {
            command: Some(command),
            ..
        }) = self.active.take()
        {
            events.push(InputEvent::Released(command));
        }
    }

    /// Switch the pressed command of the held button, emitting the release
    /// of the old one before the press of the new one.
    fn set_command(&mut self, command: Option<String>, events: &mut Vec<InputEvent>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.command == command {
            return;
        }
        if let Some(old) = active.command.take() {
            events.push(InputEvent::Released(old));
        }
        if let Some(ref new) = command {
            events.push(InputEvent::Pressed(new.clone()));
        }
        active.command = command;
    }
}

/// Maps touches onto a representation's buttons.
#[derive(Debug, Clone)]
pub struct InputMapper {
    extended_edge_default: f64,
    slide_margin: f64,
    dead_zone_ratio: f64,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl InputMapper {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            extended_edge_default: config.extended_edge_default,
            slide_margin: config.directional_slide_margin,
            dead_zone_ratio: config.dead_zone_ratio,
        }
    }

    /// A button's touchable region in container space.
    pub fn hit_region(&self, button: &Button, layout: &Layout) -> Rect {
        layout.transform_rect(button.hit_frame(self.extended_edge_default))
    }

    /// The region that keeps an already-held directional control active.
    fn slide_region(&self, button: &Button, layout: &Layout) -> Rect {
        let frame = button
            .hit_frame(self.extended_edge_default)
            .outset(EdgeInsets::uniform(self.slide_margin));
        layout.transform_rect(frame)
    }

    /// First button, in declaration order, whose hit region contains
    /// `point`. Touch-screen regions are never hit.
    pub fn hit_test<'a>(
        &self,
        point: Point,
        layout: &Layout,
        buttons: &'a [Button],
    ) -> Option<&'a Button> {
        buttons
            .iter()
            .filter(|b| !matches!(b.input, InputKind::Touch { .. }))
            .find(|b| self.hit_region(b, layout).contains(point))
    }

    /// Direction selected by `point` on a directional control, or `None`
    /// inside the dead zone.
    pub fn direction_at(
        &self,
        button: &Button,
        point: Point,
        layout: &Layout,
    ) -> Option<Direction> {
        let frame = layout.transform_rect(button.frame);
        let center = frame.center();
        let radius = self.dead_zone_ratio * frame.width.min(frame.height);
        if point.distance_to(center) <= radius {
            return None;
        }
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        if dx.abs() > dy.abs() {
            Some(if dx < 0.0 { Direction::Left } else { Direction::Right })
        } else {
            Some(if dy < 0.0 { Direction::Up } else { Direction::Down })
        }
    }

    /// Process a touch-down or move for one finger.
    pub fn touch(
        &self,
        session: &mut InputSession,
        point: Point,
        layout: &Layout,
        buttons: &[Button],
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();
        session.last_point = Some(point);

        let held = session
            .active
            .as_ref()
            .map(|a| buttons.iter().find(|b| b.id == a.button_id));
        if let Some(None) = held {
            log::debug!("Held button vanished from the layout; releasing");
            session.release_all(&mut events);
        }

        let target = match held.flatten() {
            Some(b) if b.is_directional() && self.slide_region(b, layout).contains(point) => {
                Some(b)
            },
            _ => self.hit_test(point, layout, buttons),
        };

        let Some(button) = target else {
            session.release_all(&mut events);
            return events;
        };

        if session.active_button() != Some(button.id.as_str()) {
            session.release_all(&mut events);
            session.active = Some(ActivePress {
                button_id: button.id.clone(),
                command: None,
            });
        }

        let command = match &button.input {
            InputKind::Single(command) => Some(command.clone()),
            InputKind::Directional(inputs) => self
                .direction_at(button, point, layout)
                .and_then(|d| inputs.command(d))
                .map(str::to_string),
            InputKind::Touch { .. } => None,
        };
        session.set_command(command, &mut events);
        events
    }

    /// Process touch-up or cancel: release everything the finger holds.
    pub fn end(&self, session: &mut InputSession) -> Vec<InputEvent> {
        let mut events = Vec::new();
        session.release_all(&mut events);
        session.last_point = None;
        events
    }
}
