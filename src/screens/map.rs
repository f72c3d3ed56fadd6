//! Club map hub
//!
//! Seven station nodes, the running total, and a lore card driven by the
//! mock generation client. Completing all seven hands off to the victory
//! screen.

use glam::Vec2;

use crate::avatar;
use crate::input::InputState;
use crate::lore::{LoreError, LoreKind, LoreResult, MockLoreClient};
use crate::orchestrator::Transition;
use crate::session::{MiniGame, Mode, Session};
use crate::surface::{palette, Align, Rect, Surface};
use crate::ui;

#[derive(Debug, Default)]
pub struct MapState {
    /// Last resolved generation, shown until replaced.
    pub lore_card: Option<LoreResult>,
    /// Inline error from a failed request.
    pub lore_error: Option<String>,
}

/// Station node layout: two rows of four and three across the middle band.
pub fn node_rect(view: Vec2, index: usize) -> Rect {
    let cols = 4;
    let w = 190.0_f32.min(view.x / 4.6);
    let h = 86.0;
    let gap_x = (view.x - cols as f32 * w) / (cols as f32 + 1.0);
    let row = index / cols;
    let col = index % cols;
    // Second row holds three nodes, shifted half a cell to center it.
    let offset = if row == 0 { 0.0 } else { (w + gap_x) / 2.0 };
    Rect::new(
        gap_x + col as f32 * (w + gap_x) + offset,
        view.y * 0.22 + row as f32 * (h + 28.0),
        w,
        h,
    )
}

pub fn frame(
    surface: &mut dyn Surface,
    input: &InputState,
    state: &mut MapState,
    session: &Session,
    lore: &mut MockLoreClient,
    now_ms: f64,
) -> Option<Transition> {
    let view = surface.size();

    surface.text(
        "Gym Rush Fitness Club",
        Vec2::new(view.x / 2.0, 48.0),
        30.0,
        palette::ACCENT,
        Align::Center,
    );
    surface.text(
        &format!("Total score: {}", session.total_score),
        Vec2::new(view.x / 2.0, 80.0),
        18.0,
        palette::GOLD,
        Align::Center,
    );
    surface.text(
        &format!("{}/7 stations cleared", session.completed.len()),
        Vec2::new(view.x / 2.0, 104.0),
        14.0,
        palette::DIM,
        Align::Center,
    );

    let mut picked = None;
    for (i, game) in MiniGame::ALL.iter().enumerate() {
        let rect = node_rect(view, i);
        let done = session.completed.contains(game);
        ui::draw_panel(surface, rect);
        surface.text(
            game.title(),
            Vec2::new(rect.center().x, rect.y + 34.0),
            17.0,
            if done { palette::GOOD } else { palette::INK },
            Align::Center,
        );
        if done {
            surface.text(
                &format!("done  {}", session.score_of(*game)),
                Vec2::new(rect.center().x, rect.y + 60.0),
                13.0,
                palette::GOOD,
                Align::Center,
            );
        } else {
            surface.text(
                "open",
                Vec2::new(rect.center().x, rect.y + 60.0),
                13.0,
                palette::DIM,
                Align::Center,
            );
        }
        if ui::clicked_in(input, rect) {
            picked = Some(*game);
        }
    }
    if let Some(game) = picked {
        return Some(Transition::Goto(Mode::Playing(game)));
    }

    draw_lore_card(surface, state);

    let meet_label = if lore.busy() { "Generating..." } else { "Meet a Member" };
    let meet = Rect::new(24.0, view.y - 64.0, 180.0, 40.0);
    if ui::button(surface, input, meet, meet_label) && !lore.busy() {
        match lore.request(LoreKind::Member, now_ms) {
            Ok(()) => state.lore_error = None,
            Err(LoreError::Busy) => {}
            Err(err) => state.lore_error = Some(err.to_string()),
        }
    }

    let board = Rect::new(view.x - 424.0, view.y - 64.0, 120.0, 40.0);
    if ui::button(surface, input, board, "Leaderboard") {
        return Some(Transition::Goto(Mode::Leaderboard));
    }
    let saves = Rect::new(view.x - 290.0, view.y - 64.0, 120.0, 40.0);
    if ui::button(surface, input, saves, "Save / Load") {
        return Some(Transition::Goto(Mode::SaveLoad));
    }
    let menu = Rect::new(view.x - 156.0, view.y - 64.0, 120.0, 40.0);
    if ui::button(surface, input, menu, "Menu") {
        return Some(Transition::Goto(Mode::Menu));
    }

    if session.all_complete() {
        return Some(Transition::Goto(Mode::Victory));
    }
    None
}

fn draw_lore_card(surface: &mut dyn Surface, state: &MapState) {
    let view = surface.size();
    let card = Rect::new(24.0, view.y - 200.0, 420.0, 120.0);
    match (&state.lore_card, &state.lore_error) {
        (_, Some(message)) => {
            ui::draw_panel(surface, card);
            surface.text(
                message,
                Vec2::new(card.x + 16.0, card.center().y),
                14.0,
                palette::BAD,
                Align::Left,
            );
        }
        (Some(result), None) => {
            ui::draw_panel(surface, card);
            let portrait = Rect::new(card.x + 12.0, card.y + 12.0, 96.0, 96.0);
            avatar::draw_avatar(surface, portrait, result.avatar_seed);
            // Crude wrap: the canned lines fit in two rows at this width.
            let text_x = card.x + 124.0;
            let mut split = result.text.len() / 2;
            while split > 0 && !result.text.is_char_boundary(split) {
                split -= 1;
            }
            let at = result.text[..split].rfind(' ').unwrap_or(split);
            surface.text(
                result.text[..at].trim(),
                Vec2::new(text_x, card.y + 48.0),
                14.0,
                palette::INK,
                Align::Left,
            );
            surface.text(
                result.text[at..].trim(),
                Vec2::new(text_x, card.y + 72.0),
                14.0,
                palette::INK,
                Align::Left,
            );
        }
        (None, None) => {}
    }
}
