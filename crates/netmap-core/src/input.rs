//! Raw pointer and keyboard input, and the gestures synthesized from it.

use crate::config::InputConfig;
use crate::overlay::OverlayId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Keyboard event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Event the map reports for one of the tool overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OverlayEvent {
    Clicked(OverlayId),
    /// A draggable overlay was dropped at a new screen position.
    Dragged { overlay: OverlayId, position: Point },
}

/// Primary-button gesture in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Down(Point),
    Move(Point),
    Up(Point),
    /// Press and release without travelling past the click tolerance.
    Click(Point),
    /// Second click in quick succession; always follows its [`Gesture::Click`].
    DoubleClick(Point),
}

/// Turns raw pointer events into gestures.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Where the primary button went down, while it is held.
    press_position: Option<Point>,
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
    click_tolerance: f64,
    double_click_window: Duration,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

impl InputState {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            pointer_position: Point::ZERO,
            press_position: None,
            last_click_time: None,
            last_click_position: None,
            click_tolerance: config.click_tolerance_px,
            double_click_window: Duration::from_millis(config.double_click_ms),
        }
    }

    /// Whether the primary button is held.
    pub fn is_pressed(&self) -> bool {
        self.press_position.is_some()
    }

    /// Process a pointer event received now.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Vec<Gesture> {
        self.handle_pointer_event_at(event, Instant::now())
    }

    /// Process a pointer event received at `now`.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) -> Vec<Gesture> {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if button != MouseButton::Left {
                    return Vec::new();
                }
                self.press_position = Some(position);
                vec![Gesture::Down(position)]
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if button != MouseButton::Left {
                    return Vec::new();
                }
                let Some(pressed_at) = self.press_position.take() else {
                    return Vec::new();
                };

                let mut gestures = vec![Gesture::Up(position)];
                if pressed_at.distance(position) <= self.click_tolerance {
                    gestures.push(Gesture::Click(position));
                    if self.is_second_click(position, now) {
                        gestures.push(Gesture::DoubleClick(position));
                        // A third click starts a new pair.
                        self.last_click_time = None;
                        self.last_click_position = None;
                    } else {
                        self.last_click_time = Some(now);
                        self.last_click_position = Some(position);
                    }
                }
                gestures
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                vec![Gesture::Move(position)]
            }
        }
    }

    fn is_second_click(&self, position: Point, now: Instant) -> bool {
        match (self.last_click_time, self.last_click_position) {
            (Some(last_time), Some(last_pos)) => {
                now.saturating_duration_since(last_time) <= self.double_click_window
                    && last_pos.distance(position) <= self.click_tolerance
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_click() {
        let mut input = InputState::default();
        let t = Instant::now();

        assert_eq!(
            input.handle_pointer_event_at(down(100.0, 100.0), t),
            vec![Gesture::Down(Point::new(100.0, 100.0))]
        );
        assert!(input.is_pressed());

        let gestures = input.handle_pointer_event_at(up(102.0, 101.0), t);
        assert_eq!(
            gestures,
            vec![
                Gesture::Up(Point::new(102.0, 101.0)),
                Gesture::Click(Point::new(102.0, 101.0)),
            ]
        );
        assert!(!input.is_pressed());
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut input = InputState::default();
        let t = Instant::now();

        input.handle_pointer_event_at(down(100.0, 100.0), t);
        input.handle_pointer_event_at(
            PointerEvent::Move {
                position: Point::new(150.0, 120.0),
            },
            t,
        );
        let gestures = input.handle_pointer_event_at(up(150.0, 120.0), t);
        assert_eq!(gestures, vec![Gesture::Up(Point::new(150.0, 120.0))]);
    }

    #[test]
    fn test_double_click_follows_click() {
        let mut input = InputState::default();
        let t = Instant::now();

        input.handle_pointer_event_at(down(100.0, 100.0), t);
        input.handle_pointer_event_at(up(100.0, 100.0), t);

        let later = t + Duration::from_millis(200);
        input.handle_pointer_event_at(down(100.0, 100.0), later);
        let gestures = input.handle_pointer_event_at(up(100.0, 100.0), later);
        assert_eq!(
            gestures,
            vec![
                Gesture::Up(Point::new(100.0, 100.0)),
                Gesture::Click(Point::new(100.0, 100.0)),
                Gesture::DoubleClick(Point::new(100.0, 100.0)),
            ]
        );
    }

    #[test]
    fn test_double_click_too_slow() {
        let mut input = InputState::default();
        let t = Instant::now();

        input.handle_pointer_event_at(down(100.0, 100.0), t);
        input.handle_pointer_event_at(up(100.0, 100.0), t);

        let later = t + Duration::from_millis(900);
        input.handle_pointer_event_at(down(100.0, 100.0), later);
        let gestures = input.handle_pointer_event_at(up(100.0, 100.0), later);
        assert!(!gestures.iter().any(|g| matches!(g, Gesture::DoubleClick(_))));
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::default();
        let t = Instant::now();

        input.handle_pointer_event_at(down(100.0, 100.0), t);
        input.handle_pointer_event_at(up(100.0, 100.0), t);
        input.handle_pointer_event_at(down(200.0, 200.0), t);
        let gestures = input.handle_pointer_event_at(up(200.0, 200.0), t);
        assert!(!gestures.iter().any(|g| matches!(g, Gesture::DoubleClick(_))));
    }

    #[test]
    fn test_triple_click_yields_one_double_click() {
        let mut input = InputState::default();
        let t = Instant::now();
        let mut doubles = 0;
        for _ in 0..3 {
            input.handle_pointer_event_at(down(10.0, 10.0), t);
            doubles += input
                .handle_pointer_event_at(up(10.0, 10.0), t)
                .iter()
                .filter(|g| matches!(g, Gesture::DoubleClick(_)))
                .count();
        }
        assert_eq!(doubles, 1);
    }

    #[test]
    fn test_secondary_button_ignored() {
        let mut input = InputState::default();
        let gestures = input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(1.0, 1.0),
            button: MouseButton::Right,
        });
        assert!(gestures.is_empty());
        assert!(!input.is_pressed());
    }
}
