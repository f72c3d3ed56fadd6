//! Shared UI helpers: panels, buttons, and click handling.

use glam::Vec2;

use crate::input::InputState;
use crate::surface::{palette, Align, Rect, Surface};

/// Rounded-panel stand-in: filled rect with a dim outline.
pub fn draw_panel(surface: &mut dyn Surface, rect: Rect) {
    surface.fill_rect(rect, palette::PANEL);
    surface.stroke_rect(rect, palette::DIM.with_alpha(0.5), 2.0);
}

pub fn draw_button(surface: &mut dyn Surface, rect: Rect, label: &str) {
    surface.fill_rect(rect, palette::ACCENT);
    surface.stroke_rect(rect, palette::INK.with_alpha(0.4), 2.0);
    surface.text(
        label,
        Vec2::new(rect.center().x, rect.center().y + 6.0),
        18.0,
        palette::BG,
        Align::Center,
    );
}

/// Draw a button and report whether this frame's click pulse landed on it.
pub fn button(surface: &mut dyn Surface, input: &InputState, rect: Rect, label: &str) -> bool {
    draw_button(surface, rect, label);
    input.clicked && rect.contains(input.pointer)
}

/// Check a click against a rect without drawing (for custom-drawn targets).
pub fn clicked_in(input: &InputState, rect: Rect) -> bool {
    input.clicked && rect.contains(input.pointer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullSurface;

    #[test]
    fn test_button_fires_only_on_click_inside() {
        let mut surface = NullSurface::new(800.0, 600.0);
        let rect = Rect::new(100.0, 100.0, 120.0, 40.0);

        let mut input = InputState::new();
        input.pointer = rect.center();
        assert!(!button(&mut surface, &input, rect, "Go"), "no pulse");

        input.clicked = true;
        assert!(button(&mut surface, &input, rect, "Go"));

        input.pointer = Vec2::new(0.0, 0.0);
        assert!(!button(&mut surface, &input, rect, "Go"), "outside");
    }
}
