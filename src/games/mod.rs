//! Mini-game modules
//!
//! Every game follows the same contract: a serializable state slice, a pure
//! `step(&Slice, &InputState, dt) -> (Slice, Vec<Effect>)` update with no
//! I/O, and a `render` that only reads. The orchestrator replaces the slice
//! in the session after each step (return-new-state, no write-through
//! aliasing) and routes effects to the particle system and audio.

pub mod basketball;
pub mod cardio;
pub mod front_desk;
pub mod smoothie;
pub mod swimming;
pub mod workout;
pub mod yoga;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::input::InputState;
use crate::particles::ParticleKind;
use crate::session::{MiniGame, Session};
use crate::surface::{palette, Align, Color, Rect, Surface};
use crate::ui;

/// Lifecycle of one mini-game run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Running,
    Finished,
}

/// Side effects a pure step hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Particles {
        pos: Vec2,
        color: Color,
        kind: ParticleKind,
        count: usize,
    },
    Sound(SoundEffect),
}

impl Effect {
    pub fn burst(pos: Vec2, color: Color, count: usize) -> Self {
        Effect::Particles {
            pos,
            color,
            kind: ParticleKind::Burst,
            count,
        }
    }
}

/// Sentinel for "first frame has not run yet"; the first step initializes
/// the slice's timers and counters.
pub const TIMER_UNSET: f32 = -1.0;

/// Step the active game's slice and hand back its effects. The caller
/// replaces the slice, so re-entry resets are just `Slice::default()`.
pub fn step_game(
    game: MiniGame,
    session: &mut Session,
    input: &InputState,
    dt: f32,
) -> Vec<Effect> {
    match game {
        MiniGame::FrontDesk => {
            let (next, fx) = front_desk::step(&session.front_desk, input, dt);
            session.front_desk = next;
            fx
        }
        MiniGame::Workout => {
            let (next, fx) = workout::step(&session.workout, input, dt);
            session.workout = next;
            fx
        }
        MiniGame::Smoothie => {
            let (next, fx) = smoothie::step(&session.smoothie, input, dt);
            session.smoothie = next;
            fx
        }
        MiniGame::Basketball => {
            let (next, fx) = basketball::step(&session.basketball, input, dt);
            session.basketball = next;
            fx
        }
        MiniGame::Swimming => {
            let (next, fx) = swimming::step(&session.swimming, input, dt);
            session.swimming = next;
            fx
        }
        MiniGame::Yoga => {
            let (next, fx) = yoga::step(&session.yoga, input, dt);
            session.yoga = next;
            fx
        }
        MiniGame::Cardio => {
            let (next, fx) = cardio::step(&session.cardio, input, dt);
            session.cardio = next;
            fx
        }
    }
}

/// Render the active game.
pub fn render_game(surface: &mut dyn Surface, game: MiniGame, session: &Session, frame: u64) {
    match game {
        MiniGame::FrontDesk => front_desk::render(surface, &session.front_desk, frame),
        MiniGame::Workout => workout::render(surface, &session.workout, frame),
        MiniGame::Smoothie => smoothie::render(surface, &session.smoothie, frame),
        MiniGame::Basketball => basketball::render(surface, &session.basketball, frame),
        MiniGame::Swimming => swimming::render(surface, &session.swimming, frame),
        MiniGame::Yoga => yoga::render(surface, &session.yoga, frame),
        MiniGame::Cardio => cardio::render(surface, &session.cardio, frame),
    }
}

/// Whether the active game's run has ended.
pub fn game_finished(game: MiniGame, session: &Session) -> bool {
    phase_of(game, session) == GamePhase::Finished
}

/// Final score of the active game (base + finish bonus), valid once
/// finished.
pub fn final_score(game: MiniGame, session: &Session) -> u32 {
    match game {
        MiniGame::FrontDesk => session.front_desk.final_score(),
        MiniGame::Workout => session.workout.final_score(),
        MiniGame::Smoothie => session.smoothie.final_score(),
        MiniGame::Basketball => session.basketball.final_score(),
        MiniGame::Swimming => session.swimming.final_score(),
        MiniGame::Yoga => session.yoga.final_score(),
        MiniGame::Cardio => session.cardio.final_score(),
    }
}

fn phase_of(game: MiniGame, session: &Session) -> GamePhase {
    match game {
        MiniGame::FrontDesk => session.front_desk.phase,
        MiniGame::Workout => session.workout.phase,
        MiniGame::Smoothie => session.smoothie.phase,
        MiniGame::Basketball => session.basketball.phase,
        MiniGame::Swimming => session.swimming.phase,
        MiniGame::Yoga => session.yoga.phase,
        MiniGame::Cardio => session.cardio.phase,
    }
}

/// Slices poisoned by a logic error (non-finite timer or physics state)
/// abort the frame; the orchestrator rolls the session back.
pub fn slice_is_sane(game: MiniGame, session: &Session) -> bool {
    match game {
        MiniGame::FrontDesk => session.front_desk.timer.is_finite(),
        MiniGame::Workout => {
            let s = &session.workout;
            s.timer.is_finite() && s.effort.is_finite()
        }
        MiniGame::Smoothie => session.smoothie.timer.is_finite(),
        MiniGame::Basketball => {
            let s = &session.basketball;
            s.timer.is_finite() && s.ball_pos.is_finite() && s.ball_vel.is_finite()
        }
        MiniGame::Swimming => {
            let s = &session.swimming;
            s.timer.is_finite() && s.progress.is_finite() && s.speed.is_finite()
        }
        MiniGame::Yoga => {
            let s = &session.yoga;
            s.timer.is_finite() && s.pose_progress.is_finite()
        }
        MiniGame::Cardio => {
            let s = &session.cardio;
            s.timer.is_finite() && s.intensity.is_finite() && s.zone_time.is_finite()
        }
    }
}

/// Shared HUD strip along the top of every game: title, score, countdown.
pub fn draw_hud(surface: &mut dyn Surface, title: &str, score: u32, timer: f32) {
    let size = surface.size();
    surface.fill_rect(Rect::new(0.0, 0.0, size.x, 44.0), palette::PANEL);
    surface.text(
        title,
        Vec2::new(16.0, 29.0),
        20.0,
        palette::INK,
        Align::Left,
    );
    surface.text(
        &format!("Score {score}"),
        Vec2::new(size.x / 2.0, 29.0),
        20.0,
        palette::GOLD,
        Align::Center,
    );
    let timer_color = if timer < 10.0 { palette::BAD } else { palette::INK };
    surface.text(
        &format!("{:>4.0}s", timer.max(0.0).ceil()),
        Vec2::new(size.x - 16.0, 29.0),
        20.0,
        timer_color,
        Align::Right,
    );
}

/// Finished-state summary panel plus the single continue control.
pub fn draw_summary(surface: &mut dyn Surface, title: &str, lines: &[String], score: u32) {
    let size = surface.size();
    let panel = Rect::centered(size / 2.0, 380.0, 260.0);
    ui::draw_panel(surface, panel);
    surface.text(
        title,
        Vec2::new(size.x / 2.0, panel.y + 48.0),
        26.0,
        palette::INK,
        Align::Center,
    );
    for (i, line) in lines.iter().enumerate() {
        surface.text(
            line,
            Vec2::new(size.x / 2.0, panel.y + 88.0 + i as f32 * 26.0),
            17.0,
            palette::DIM,
            Align::Center,
        );
    }
    surface.text(
        &format!("Final score: {score}"),
        Vec2::new(size.x / 2.0, panel.y + panel.h - 70.0),
        22.0,
        palette::GOLD,
        Align::Center,
    );
    ui::draw_button(surface, continue_button(size), "Continue");
}

/// Hit-rect for the summary's continue control.
pub fn continue_button(surface_size: Vec2) -> Rect {
    Rect::centered(
        Vec2::new(surface_size.x / 2.0, surface_size.y / 2.0 + 96.0),
        180.0,
        44.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn test_step_game_replaces_slice() {
        let mut session = Session::new(1);
        let input = InputState::new();
        assert_eq!(session.workout.timer, TIMER_UNSET);
        step_game(MiniGame::Workout, &mut session, &input, 1.0 / 60.0);
        assert!(session.workout.timer > 0.0);
    }

    #[test]
    fn test_every_game_initializes_and_times_out() {
        for game in MiniGame::ALL {
            let mut session = Session::new(2);
            let input = InputState::new();
            // Large dt steps are clamped by the orchestrator; here we just
            // walk wall-clock until the countdown expires.
            for _ in 0..4000 {
                step_game(game, &mut session, &input, 0.05);
                if game_finished(game, &session) {
                    break;
                }
            }
            assert!(game_finished(game, &session), "{game:?} never timed out");
            assert!(slice_is_sane(game, &session));
        }
    }

    #[test]
    fn test_sanity_check_catches_non_finite_physics() {
        let mut session = Session::new(3);
        assert!(slice_is_sane(MiniGame::Basketball, &session));
        session.basketball.ball_pos.x = f32::NAN;
        assert!(!slice_is_sane(MiniGame::Basketball, &session));

        let mut session = Session::new(3);
        session.swimming.speed = f32::INFINITY;
        assert!(!slice_is_sane(MiniGame::Swimming, &session));
    }
}
