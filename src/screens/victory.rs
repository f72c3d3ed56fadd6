//! Victory celebration once all seven stations are cleared.

use glam::Vec2;
use rand::Rng;

use crate::input::InputState;
use crate::orchestrator::Transition;
use crate::particles::{ParticleKind, ParticleSystem};
use crate::session::{MiniGame, Mode, Session};
use crate::settings::Settings;
use crate::surface::{palette, Align, Color, Rect, Surface};
use crate::ui;

const CONFETTI: [Color; 4] = [palette::ACCENT, palette::GOOD, palette::GOLD, palette::WATER];

pub fn frame(
    surface: &mut dyn Surface,
    input: &InputState,
    session: &Session,
    particles: &mut ParticleSystem,
    settings: &Settings,
    frame: u64,
) -> Option<Transition> {
    let view = surface.size();

    // A fresh confetti burst every half second or so.
    if !settings.reduced_motion && frame % 30 == 0 {
        let pos = Vec2::new(
            particles.rng_mut().random_range(0.0..view.x.max(1.0)),
            view.y * 0.2,
        );
        let color = CONFETTI[(frame / 30) as usize % CONFETTI.len()];
        particles.spawn_burst(pos, color, ParticleKind::Burst, 18);
    }

    surface.text(
        "FULL MEMBERSHIP",
        Vec2::new(view.x / 2.0, view.y * 0.28),
        52.0,
        palette::GOLD,
        Align::Center,
    );
    surface.text(
        "Every station cleared. The club is yours.",
        Vec2::new(view.x / 2.0, view.y * 0.28 + 42.0),
        18.0,
        palette::INK,
        Align::Center,
    );
    surface.text(
        &format!("Total score: {}", session.total_score),
        Vec2::new(view.x / 2.0, view.y * 0.45),
        30.0,
        palette::ACCENT,
        Align::Center,
    );

    for (i, game) in MiniGame::ALL.iter().enumerate() {
        surface.text(
            &format!("{}  {}", game.title(), session.score_of(*game)),
            Vec2::new(view.x / 2.0, view.y * 0.52 + i as f32 * 22.0),
            14.0,
            palette::DIM,
            Align::Center,
        );
    }

    let board = Rect::centered(Vec2::new(view.x / 2.0 - 120.0, view.y - 70.0), 200.0, 46.0);
    if ui::button(surface, input, board, "Submit Score") {
        return Some(Transition::Goto(Mode::Leaderboard));
    }
    let menu = Rect::centered(Vec2::new(view.x / 2.0 + 120.0, view.y - 70.0), 200.0, 46.0);
    if ui::button(surface, input, menu, "Back to Menu") {
        return Some(Transition::Goto(Mode::Menu));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullSurface;

    #[test]
    fn test_confetti_spawns_on_interval_frames() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let input = InputState::new();
        let session = Session::new(1);
        let mut particles = ParticleSystem::new(5);
        let settings = Settings::default();

        frame(&mut surface, &input, &session, &mut particles, &settings, 30);
        assert_eq!(particles.particles.len(), 18);
        frame(&mut surface, &input, &session, &mut particles, &settings, 31);
        assert_eq!(particles.particles.len(), 18, "off-interval frame is quiet");
    }

    #[test]
    fn test_reduced_motion_suppresses_confetti() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let input = InputState::new();
        let session = Session::new(1);
        let mut particles = ParticleSystem::new(5);
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        frame(&mut surface, &input, &session, &mut particles, &settings, 30);
        assert!(particles.particles.is_empty());
    }

    #[test]
    fn test_menu_button_leaves_the_screen() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let session = Session::new(1);
        let mut particles = ParticleSystem::new(5);
        let settings = Settings::default();
        let mut input = InputState::new();
        input.clicked = true;
        input.pointer = Vec2::new(960.0 / 2.0 + 120.0, 600.0 - 70.0);
        let t = frame(&mut surface, &input, &session, &mut particles, &settings, 1);
        assert_eq!(t, Some(Transition::Goto(Mode::Menu)));
    }
}
