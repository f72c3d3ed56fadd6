//! Title screen with a twinkling starfield.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::input::InputState;
use crate::orchestrator::Transition;
use crate::session::Mode;
use crate::settings::Settings;
use crate::surface::{palette, Align, Rect, Surface};
use crate::ui;

#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Twinkle phase offset.
    pub phase: f32,
}

#[derive(Debug, Default)]
pub struct MenuState {
    pub stars: Vec<Star>,
    /// Viewport the field was generated for; regenerate when it changes.
    generated_for: Vec2,
}

impl MenuState {
    /// Seeded placement, density proportional to area.
    pub fn regenerate_stars(&mut self, view: Vec2, seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let count = ((view.x * view.y) / 9000.0) as usize;
        self.stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..view.x.max(1.0)),
                    rng.random_range(0.0..view.y.max(1.0)),
                ),
                radius: rng.random_range(0.5..2.2),
                phase: rng.random_range(0.0..std::f32::consts::TAU),
            })
            .collect();
        self.generated_for = view;
    }

    pub fn needs_stars(&self, view: Vec2) -> bool {
        self.stars.is_empty() || self.generated_for != view
    }
}

pub fn frame(
    surface: &mut dyn Surface,
    input: &InputState,
    state: &mut MenuState,
    settings: &Settings,
    frame: u64,
) -> Option<Transition> {
    let view = surface.size();
    if state.needs_stars(view) {
        state.regenerate_stars(view, 0xC0FFEE);
    }

    for star in &state.stars {
        let twinkle = if settings.reduced_motion {
            0.8
        } else {
            0.55 + 0.45 * (frame as f32 * 0.05 + star.phase).sin()
        };
        surface.fill_circle(star.pos, star.radius, palette::INK.with_alpha(twinkle * 0.7));
    }

    surface.text(
        "GYM RUSH",
        Vec2::new(view.x / 2.0, view.y * 0.3),
        64.0,
        palette::ACCENT,
        Align::Center,
    );
    surface.text(
        "Seven stations. One membership. No rest days.",
        Vec2::new(view.x / 2.0, view.y * 0.3 + 40.0),
        18.0,
        palette::DIM,
        Align::Center,
    );

    let center_x = view.x / 2.0;
    let start = Rect::centered(Vec2::new(center_x, view.y * 0.55), 220.0, 52.0);
    if ui::button(surface, input, start, "Start") {
        return Some(Transition::Goto(Mode::Instructions));
    }
    let board = Rect::centered(Vec2::new(center_x, view.y * 0.55 + 70.0), 220.0, 44.0);
    if ui::button(surface, input, board, "Leaderboard") {
        return Some(Transition::Goto(Mode::Leaderboard));
    }
    let saves = Rect::centered(Vec2::new(center_x, view.y * 0.55 + 128.0), 220.0, 44.0);
    if ui::button(surface, input, saves, "Save / Load") {
        return Some(Transition::Goto(Mode::SaveLoad));
    }

    surface.text(
        "M mutes sound",
        Vec2::new(view.x / 2.0, view.y - 24.0),
        13.0,
        palette::DIM.with_alpha(0.7),
        Align::Center,
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullSurface;

    #[test]
    fn test_starfield_regenerates_on_resize() {
        let mut state = MenuState::default();
        state.regenerate_stars(Vec2::new(800.0, 600.0), 1);
        let count_small = state.stars.len();
        assert!(!state.needs_stars(Vec2::new(800.0, 600.0)));

        assert!(state.needs_stars(Vec2::new(1600.0, 900.0)));
        state.regenerate_stars(Vec2::new(1600.0, 900.0), 1);
        assert!(state.stars.len() > count_small, "density scales with area");
    }

    #[test]
    fn test_start_button_goes_to_instructions() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let mut state = MenuState::default();
        let settings = Settings::default();

        let mut input = InputState::new();
        input.clicked = true;
        input.pointer = Vec2::new(960.0 / 2.0, 600.0 * 0.55);
        let transition = frame(&mut surface, &input, &mut state, &settings, 0);
        assert_eq!(transition, Some(Transition::Goto(Mode::Instructions)));
    }
}
