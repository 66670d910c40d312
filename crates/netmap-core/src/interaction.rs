//! Translation from raw device input to map events for the tool controller.

use crate::config::ToolConfig;
use crate::controller::MapToolController;
use crate::geo::GeoPoint;
use crate::input::{Gesture, InputState, KeyEvent, OverlayEvent, PointerEvent};
use crate::overlay::OverlayId;
use crate::prompt::{Notifier, UserPrompt};
use crate::surface::MapSurface;
use crate::toolbar::CoordinateReadout;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Kinds of map events a tool can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Click,
    DoubleClick,
    KeyDown,
    PointerDown,
    PointerMove,
    PointerUp,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Click,
        EventKind::DoubleClick,
        EventKind::KeyDown,
        EventKind::PointerDown,
        EventKind::PointerMove,
        EventKind::PointerUp,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A set of event subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventBindings(u8);

impl EventBindings {
    pub const NONE: Self = Self(0);

    pub const fn with(self, kind: EventKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub const fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Subscriptions in `self` that are not in `other`.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL.into_iter().filter(move |&kind| self.contains(kind))
    }
}

impl FromIterator<EventKind> for EventBindings {
    fn from_iter<I: IntoIterator<Item = EventKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// An input event in map coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Click(GeoPoint),
    DoubleClick(GeoPoint),
    KeyDown(String),
    PointerDown(GeoPoint),
    PointerMove(GeoPoint),
    PointerUp(GeoPoint),
    /// A tool overlay was clicked.
    OverlayClick(OverlayId),
    /// A draggable tool overlay was dropped at a new position.
    OverlayDrag { overlay: OverlayId, position: GeoPoint },
}

impl MapEvent {
    /// The subscription this event needs, if any. Overlay events are always delivered.
    pub fn binding(&self) -> Option<EventKind> {
        match self {
            MapEvent::Click(_) => Some(EventKind::Click),
            MapEvent::DoubleClick(_) => Some(EventKind::DoubleClick),
            MapEvent::KeyDown(_) => Some(EventKind::KeyDown),
            MapEvent::PointerDown(_) => Some(EventKind::PointerDown),
            MapEvent::PointerMove(_) => Some(EventKind::PointerMove),
            MapEvent::PointerUp(_) => Some(EventKind::PointerUp),
            MapEvent::OverlayClick(_) | MapEvent::OverlayDrag { .. } => None,
        }
    }
}

/// Feeds device input into a [`MapToolController`].
///
/// Owns click/double-click synthesis and the screen-to-map conversion, and
/// keeps the cursor coordinate readout current. Every decision about what
/// an event means is left to the controller.
#[derive(Debug, Clone)]
pub struct InteractionSurface {
    input: InputState,
    /// Live cursor position readout.
    pub readout: CoordinateReadout,
}

impl InteractionSurface {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            input: InputState::new(&config.input),
            readout: CoordinateReadout::new(&config.readout),
        }
    }

    /// Handle a pointer event received now.
    pub fn pointer<S, P, N>(
        &mut self,
        controller: &mut MapToolController<S, P, N>,
        event: PointerEvent,
    ) where
        S: MapSurface,
        P: UserPrompt,
        N: Notifier,
    {
        self.pointer_at(controller, event, Instant::now());
    }

    /// Handle a pointer event received at `now`.
    pub fn pointer_at<S, P, N>(
        &mut self,
        controller: &mut MapToolController<S, P, N>,
        event: PointerEvent,
        now: Instant,
    ) where
        S: MapSurface,
        P: UserPrompt,
        N: Notifier,
    {
        for gesture in self.input.handle_pointer_event_at(event, now) {
            let event = match gesture {
                Gesture::Down(p) => MapEvent::PointerDown(controller.surface().screen_to_geo(p)),
                Gesture::Move(p) => {
                    let position = controller.surface().screen_to_geo(p);
                    self.readout.update(position);
                    MapEvent::PointerMove(position)
                }
                Gesture::Up(p) => MapEvent::PointerUp(controller.surface().screen_to_geo(p)),
                Gesture::Click(p) => MapEvent::Click(controller.surface().screen_to_geo(p)),
                Gesture::DoubleClick(p) => {
                    MapEvent::DoubleClick(controller.surface().screen_to_geo(p))
                }
            };
            controller.handle_event(event);
        }
    }

    /// Handle a keyboard event. Only presses reach the tools.
    pub fn key<S, P, N>(&mut self, controller: &mut MapToolController<S, P, N>, event: KeyEvent)
    where
        S: MapSurface,
        P: UserPrompt,
        N: Notifier,
    {
        if let KeyEvent::Pressed(key) = event {
            controller.handle_event(MapEvent::KeyDown(key));
        }
    }

    /// Handle a click or drag reported on one of the tool overlays.
    pub fn overlay<S, P, N>(
        &mut self,
        controller: &mut MapToolController<S, P, N>,
        event: OverlayEvent,
    ) where
        S: MapSurface,
        P: UserPrompt,
        N: Notifier,
    {
        let event = match event {
            OverlayEvent::Clicked(overlay) => MapEvent::OverlayClick(overlay),
            OverlayEvent::Dragged { overlay, position } => MapEvent::OverlayDrag {
                overlay,
                position: controller.surface().screen_to_geo(position),
            },
        };
        controller.handle_event(event);
    }
}
