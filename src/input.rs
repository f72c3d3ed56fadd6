//! Input sampling
//!
//! Platform event listeners write into `InputState` asynchronously; the
//! orchestrator reads it exactly once per frame. `clicked` and `typed` are
//! one-frame pulses cleared by the orchestrator at end of frame, never by
//! consumers. The key map is live state; games that need edges track their
//! own previous-key state through `KeyEdge`.

use std::collections::HashSet;

use glam::Vec2;

use crate::consts::{DESIGN_HEIGHT, DESIGN_WIDTH};

/// A single text-entry event for the username field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Char(char),
    Backspace,
}

/// Input snapshot shared between the event listeners and the frame loop.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Pointer position in logical surface coordinates.
    pub pointer: Vec2,
    /// One-frame pulse set on mousedown/touchstart.
    pub clicked: bool,
    /// Live primary-button/touch state for drag gestures.
    pub pointer_down: bool,
    /// Logical surface size, refreshed by the orchestrator each frame so
    /// hit-testing and layout share one viewport.
    pub view: Vec2,
    /// Live key-down set, normalized key identifiers.
    pub keys_down: HashSet<String>,
    /// One-frame buffer of text-entry events.
    pub typed: Vec<TextKey>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            view: Vec2::new(DESIGN_WIDTH, DESIGN_HEIGHT),
            ..Self::default()
        }
    }

    /// Normalize a platform key identifier: single characters lowercase,
    /// named keys untouched ("ArrowLeft", "Backspace", ...).
    pub fn normalize_key(key: &str) -> String {
        if key.chars().count() == 1 {
            key.to_lowercase()
        } else {
            key.to_string()
        }
    }

    pub fn key_down(&mut self, key: &str) {
        self.keys_down.insert(Self::normalize_key(key));
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys_down.remove(&Self::normalize_key(key));
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }

    /// Record a keydown as a text-entry event where it applies.
    pub fn record_typed(&mut self, key: &str) {
        if key == "Backspace" {
            self.typed.push(TextKey::Backspace);
        } else if key.chars().count() == 1 {
            if let Some(c) = key.chars().next() {
                if !c.is_control() {
                    self.typed.push(TextKey::Char(c));
                }
            }
        }
    }

    /// Transform a client-space position into logical surface coordinates.
    /// The backing store and the displayed element can diverge, so scale by
    /// logical size over displayed size.
    pub fn set_pointer_from_client(
        &mut self,
        client: Vec2,
        rect_origin: Vec2,
        rect_size: Vec2,
        logical_size: Vec2,
    ) {
        let local = client - rect_origin;
        let scale = Vec2::new(
            if rect_size.x > 0.0 {
                logical_size.x / rect_size.x
            } else {
                1.0
            },
            if rect_size.y > 0.0 {
                logical_size.y / rect_size.y
            } else {
                1.0
            },
        );
        self.pointer = local * scale;
    }

    /// Clear the one-frame pulses. Called by the orchestrator after each
    /// frame has consumed the snapshot.
    pub fn end_frame(&mut self) {
        self.clicked = false;
        self.typed.clear();
    }
}

/// Rising-edge detector over live key state. Game slices embed it and
/// compare whole, so it carries their `PartialEq`/`Eq`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyEdge {
    was_down: bool,
}

impl KeyEdge {
    /// Returns true exactly on the frame the key goes down.
    pub fn rising(&mut self, down: bool) -> bool {
        let edge = down && !self.was_down;
        self.was_down = down;
        edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_transform_scales_for_backing_mismatch() {
        let mut input = InputState::new();
        // Element displayed at 400x300 but logical surface is 800x600.
        input.set_pointer_from_client(
            Vec2::new(210.0, 160.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(400.0, 300.0),
            Vec2::new(800.0, 600.0),
        );
        assert_eq!(input.pointer, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_key_normalization() {
        let mut input = InputState::new();
        input.key_down("A");
        assert!(input.is_down("a"));
        input.key_up("a");
        assert!(!input.is_down("a"));
        input.key_down("ArrowLeft");
        assert!(input.is_down("ArrowLeft"));
    }

    #[test]
    fn test_pulses_clear_on_end_frame() {
        let mut input = InputState::new();
        input.clicked = true;
        input.record_typed("x");
        input.record_typed("Backspace");
        assert_eq!(
            input.typed,
            vec![TextKey::Char('x'), TextKey::Backspace]
        );
        input.end_frame();
        assert!(!input.clicked);
        assert!(input.typed.is_empty());
        // Live key state survives the frame boundary.
        input.key_down("d");
        input.end_frame();
        assert!(input.is_down("d"));
    }

    #[test]
    fn test_key_edge_fires_once() {
        let mut edge = KeyEdge::default();
        assert!(edge.rising(true));
        assert!(!edge.rising(true));
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
    }

    #[test]
    fn test_key_edge_compares_by_tracked_state() {
        let mut a = KeyEdge::default();
        let b = KeyEdge::default();
        assert_eq!(a, b);
        a.rising(true);
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_view_matches_design_size() {
        let input = InputState::new();
        assert_eq!(input.view, Vec2::new(DESIGN_WIDTH, DESIGN_HEIGHT));
    }
}
