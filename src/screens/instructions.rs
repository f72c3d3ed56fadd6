//! How-to-play screen shown once between the menu and the map.

use glam::Vec2;

use crate::input::InputState;
use crate::orchestrator::Transition;
use crate::session::Mode;
use crate::surface::{palette, Align, Rect, Surface};
use crate::ui;

const LINES: [&str; 9] = [
    "Work every station in the club to earn your membership badge.",
    "",
    "Front Desk  - click the badge that matches the member's name",
    "Weight Room - alternate A and D to pump out reps",
    "Smoothie Bar - follow the recipe with keys 1-6 or clicks",
    "Shootaround - drag from the ball and release to shoot",
    "Pool Laps   - alternate Left and Right arrows to swim",
    "Yoga Studio - keep the pointer inside the drifting focus ring",
    "Cardio Class - tap Space or click to hold the target zone",
];

pub fn frame(surface: &mut dyn Surface, input: &InputState) -> Option<Transition> {
    let view = surface.size();
    let panel = Rect::centered(view / 2.0, view.x.min(720.0), 420.0);
    ui::draw_panel(surface, panel);

    surface.text(
        "How to Play",
        Vec2::new(view.x / 2.0, panel.y + 46.0),
        30.0,
        palette::ACCENT,
        Align::Center,
    );
    for (i, line) in LINES.iter().enumerate() {
        surface.text(
            line,
            Vec2::new(panel.x + 36.0, panel.y + 92.0 + i as f32 * 28.0),
            16.0,
            palette::INK,
            Align::Left,
        );
    }

    let go = Rect::centered(
        Vec2::new(view.x / 2.0, panel.y + panel.h - 44.0),
        220.0,
        48.0,
    );
    if ui::button(surface, input, go, "To the Gym") || input.is_down("Enter") {
        return Some(Transition::Goto(Mode::Map));
    }
    None
}
