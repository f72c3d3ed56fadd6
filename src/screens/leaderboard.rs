//! Leaderboard screen: fetch on entry, submit with the session's username.

use glam::Vec2;

use crate::backend::{Backend, LeaderboardEntry, LEADERBOARD_CAP};
use crate::input::InputState;
use crate::orchestrator::Transition;
use crate::session::{Mode, Session};
use crate::surface::{palette, Align, Rect, Surface};
use crate::ui;

#[derive(Debug, Default)]
pub struct LeaderboardState {
    pub entries: Vec<LeaderboardEntry>,
    /// Inline status or error line.
    pub message: Option<String>,
    fetched: bool,
}

impl LeaderboardState {
    /// Force a refresh on the next frame (called when the screen is entered).
    pub fn invalidate(&mut self) {
        self.fetched = false;
        self.message = None;
    }
}

pub fn frame(
    surface: &mut dyn Surface,
    input: &InputState,
    state: &mut LeaderboardState,
    session: &Session,
    backend: &mut dyn Backend,
    now_ms: f64,
) -> Option<Transition> {
    if !state.fetched {
        state.fetched = true;
        match backend.get_leaderboard(LEADERBOARD_CAP) {
            Ok(entries) => state.entries = entries,
            Err(err) => state.message = Some(err.to_string()),
        }
    }

    let view = surface.size();
    surface.text(
        "Leaderboard",
        Vec2::new(view.x / 2.0, 56.0),
        32.0,
        palette::ACCENT,
        Align::Center,
    );

    let panel = Rect::centered(
        Vec2::new(view.x / 2.0, view.y / 2.0),
        460.0,
        view.y - 220.0,
    );
    ui::draw_panel(surface, panel);
    if state.entries.is_empty() {
        surface.text(
            "No scores yet. Be the first.",
            panel.center(),
            16.0,
            palette::DIM,
            Align::Center,
        );
    }
    let visible = ((panel.h - 32.0) / 26.0) as usize;
    for (i, entry) in state.entries.iter().take(visible).enumerate() {
        let y = panel.y + 32.0 + i as f32 * 26.0;
        surface.text(
            &format!("{:>2}. {}", i + 1, entry.username),
            Vec2::new(panel.x + 24.0, y),
            16.0,
            palette::INK,
            Align::Left,
        );
        surface.text(
            &entry.total_score.to_string(),
            Vec2::new(panel.x + panel.w - 24.0, y),
            16.0,
            palette::GOLD,
            Align::Right,
        );
    }

    if let Some(message) = &state.message {
        surface.text(
            message,
            Vec2::new(view.x / 2.0, view.y - 108.0),
            14.0,
            palette::BAD,
            Align::Center,
        );
    }

    let submit = Rect::centered(Vec2::new(view.x / 2.0 - 120.0, view.y - 64.0), 200.0, 44.0);
    if ui::button(surface, input, submit, "Submit Score") {
        match backend.submit_to_leaderboard(&session.username, session.total_score, now_ms) {
            Ok(()) => {
                state.message = Some(format!("Submitted as {}", session.username));
                match backend.get_leaderboard(LEADERBOARD_CAP) {
                    Ok(entries) => state.entries = entries,
                    Err(err) => state.message = Some(err.to_string()),
                }
            }
            Err(err) => state.message = Some(err.to_string()),
        }
    }
    let back = Rect::centered(Vec2::new(view.x / 2.0 + 120.0, view.y - 64.0), 200.0, 44.0);
    if ui::button(surface, input, back, "Back") {
        return Some(Transition::Goto(Mode::Map));
    }
    None
}
