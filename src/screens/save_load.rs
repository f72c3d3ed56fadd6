//! Save/load screen
//!
//! Username entry plus the two persistence actions. The first save mints
//! an anonymous backend id and keeps it on the session; load restores the
//! whole session from that id's record.

use glam::Vec2;

use crate::backend::{Backend, SaveRecord};
use crate::input::{InputState, TextKey};
use crate::orchestrator::Transition;
use crate::session::{Mode, Session};
use crate::surface::{palette, Align, Rect, Surface};
use crate::ui;

const USERNAME_MAX: usize = 16;

#[derive(Debug, Default)]
pub struct SaveLoadState {
    pub message: Option<String>,
}

pub fn frame(
    surface: &mut dyn Surface,
    input: &InputState,
    state: &mut SaveLoadState,
    session: &mut Session,
    backend: &mut dyn Backend,
) -> Option<Transition> {
    // The typed buffer feeds the one text field on this screen.
    for key in &input.typed {
        match key {
            TextKey::Backspace => {
                session.username.pop();
            }
            TextKey::Char(c) => {
                if session.username.chars().count() < USERNAME_MAX {
                    session.username.push(*c);
                }
            }
        }
    }

    let view = surface.size();
    surface.text(
        "Save / Load",
        Vec2::new(view.x / 2.0, 56.0),
        32.0,
        palette::ACCENT,
        Align::Center,
    );

    let panel = Rect::centered(view / 2.0, 480.0, 300.0);
    ui::draw_panel(surface, panel);

    surface.text(
        "Username",
        Vec2::new(panel.x + 32.0, panel.y + 48.0),
        15.0,
        palette::DIM,
        Align::Left,
    );
    let field = Rect::new(panel.x + 32.0, panel.y + 60.0, panel.w - 64.0, 40.0);
    surface.fill_rect(field, palette::BG);
    surface.stroke_rect(field, palette::ACCENT.with_alpha(0.6), 2.0);
    surface.text(
        &format!("{}_", session.username),
        Vec2::new(field.x + 12.0, field.y + 26.0),
        18.0,
        palette::INK,
        Align::Left,
    );

    surface.text(
        &format!(
            "Progress: {}/7 stations, {} points",
            session.completed.len(),
            session.total_score
        ),
        Vec2::new(panel.center().x, panel.y + 136.0),
        15.0,
        palette::DIM,
        Align::Center,
    );

    let save = Rect::new(panel.x + 32.0, panel.y + 168.0, 190.0, 44.0);
    if ui::button(surface, input, save, "Save Game") {
        state.message = Some(match do_save(session, backend) {
            Ok(id) => format!("Saved as {id}"),
            Err(err) => err,
        });
    }
    let load = Rect::new(panel.x + panel.w - 222.0, panel.y + 168.0, 190.0, 44.0);
    if ui::button(surface, input, load, "Load Game") {
        state.message = Some(match do_load(session, backend) {
            Ok(()) => "Progress restored".to_string(),
            Err(err) => err,
        });
    }

    if let Some(message) = &state.message {
        surface.text(
            message,
            Vec2::new(panel.center().x, panel.y + 244.0),
            14.0,
            palette::GOLD,
            Align::Center,
        );
    }

    let back = Rect::centered(Vec2::new(view.x / 2.0, view.y - 56.0), 180.0, 44.0);
    if ui::button(surface, input, back, "Back") {
        return Some(Transition::Goto(Mode::Map));
    }
    None
}

fn do_save(session: &mut Session, backend: &mut dyn Backend) -> Result<String, String> {
    let user_id = match &session.user_id {
        Some(id) => id.clone(),
        None => {
            let id = backend
                .create_anonymous_session()
                .map_err(|e| e.to_string())?;
            session.user_id = Some(id.clone());
            id
        }
    };
    let record = SaveRecord::from_session(session);
    backend
        .save_game_state(&user_id, &record)
        .map_err(|e| e.to_string())?;
    Ok(user_id)
}

fn do_load(session: &mut Session, backend: &mut dyn Backend) -> Result<(), String> {
    let Some(user_id) = session.user_id.clone() else {
        return Err("Nothing saved yet this session".to_string());
    };
    match backend.load_game_state(&user_id) {
        Ok(Some(record)) => {
            *session = record.session;
            session.user_id = Some(user_id);
            Ok(())
        }
        Ok(None) => Err("No save found".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::session::MiniGame;
    use crate::surface::NullSurface;

    fn click_at(pointer: Vec2) -> InputState {
        let mut input = InputState::new();
        input.clicked = true;
        input.pointer = pointer;
        input
    }

    fn save_button_center(view: Vec2) -> Vec2 {
        let panel = Rect::centered(view / 2.0, 480.0, 300.0);
        Rect::new(panel.x + 32.0, panel.y + 168.0, 190.0, 44.0).center()
    }

    fn load_button_center(view: Vec2) -> Vec2 {
        let panel = Rect::centered(view / 2.0, 480.0, 300.0);
        Rect::new(panel.x + panel.w - 222.0, panel.y + 168.0, 190.0, 44.0).center()
    }

    #[test]
    fn test_typing_edits_the_username() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let mut state = SaveLoadState::default();
        let mut session = Session::new(1);
        let mut backend = MemoryBackend::new();

        let mut input = InputState::new();
        input.record_typed("a");
        input.record_typed("b");
        input.record_typed("Backspace");
        input.record_typed("c");
        frame(&mut surface, &input, &mut state, &mut session, &mut backend);
        assert_eq!(session.username, "ac");
    }

    #[test]
    fn test_username_capped() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let mut state = SaveLoadState::default();
        let mut session = Session::new(1);
        let mut backend = MemoryBackend::new();

        let mut input = InputState::new();
        for _ in 0..40 {
            input.record_typed("x");
        }
        frame(&mut surface, &input, &mut state, &mut session, &mut backend);
        assert_eq!(session.username.len(), USERNAME_MAX);
    }

    #[test]
    fn test_first_save_mints_an_id_then_reuses_it() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let mut state = SaveLoadState::default();
        let mut session = Session::new(1);
        let mut backend = MemoryBackend::new();
        let view = Vec2::new(960.0, 600.0);

        let input = click_at(save_button_center(view));
        frame(&mut surface, &input, &mut state, &mut session, &mut backend);
        let first_id = session.user_id.clone().unwrap();

        frame(&mut surface, &input, &mut state, &mut session, &mut backend);
        assert_eq!(session.user_id.as_deref(), Some(first_id.as_str()));
    }

    #[test]
    fn test_save_then_load_restores_progress() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let mut state = SaveLoadState::default();
        let mut session = Session::new(1);
        let mut backend = MemoryBackend::new();
        let view = Vec2::new(960.0, 600.0);

        session.complete(MiniGame::Workout, 800);
        let input = click_at(save_button_center(view));
        frame(&mut surface, &input, &mut state, &mut session, &mut backend);

        // Lose some progress, then load it back.
        session.total_score = 0;
        session.completed.clear();
        let input = click_at(load_button_center(view));
        frame(&mut surface, &input, &mut state, &mut session, &mut backend);
        assert_eq!(session.total_score, 800);
        assert!(session.completed.contains(&MiniGame::Workout));
        assert!(session.user_id.is_some());
    }

    #[test]
    fn test_load_without_save_reports_inline() {
        let mut surface = NullSurface::new(960.0, 600.0);
        let mut state = SaveLoadState::default();
        let mut session = Session::new(1);
        let mut backend = MemoryBackend::new();
        let view = Vec2::new(960.0, 600.0);

        let input = click_at(load_button_center(view));
        frame(&mut surface, &input, &mut state, &mut session, &mut backend);
        assert!(state.message.as_deref().unwrap().contains("Nothing saved"));
    }
}
