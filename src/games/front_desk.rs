//! Front desk check-in: match the arriving member to their badge.
//!
//! A member card shows on the left; six badges sit in a grid on the right.
//! Clicking the right badge scores and brings in the next member, a wrong
//! badge burns three seconds off the clock instead of ending the run.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::avatar;
use crate::input::InputState;
use crate::particles::ParticleKind;
use crate::surface::{palette, Align, Rect, Surface};
use crate::ui;

use super::{draw_hud, draw_summary, Effect, GamePhase, TIMER_UNSET};

pub const WIN_MATCHES: u32 = 10;
pub const ROUND_SECONDS: f32 = 60.0;
pub const SCORE_PER_MATCH: u32 = 100;
/// Seconds lost on a wrong badge.
pub const WRONG_PENALTY: f32 = 3.0;

pub const BADGE_COUNT: usize = 6;

const MEMBER_NAMES: [&str; BADGE_COUNT] = ["Ava", "Bruno", "Cleo", "Dmitri", "Edith", "Felix"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontDeskSlice {
    pub phase: GamePhase,
    pub timer: f32,
    pub matches: u32,
    pub wrong: u32,
    pub score: u32,
    pub bonus: u32,
    pub seed: u64,
    /// Completed-round counter, also the per-round RNG stream.
    pub round: u64,
    /// Member currently at the desk.
    pub member: u8,
    /// Badge ids in display order for this round.
    pub badges: [u8; BADGE_COUNT],
}

impl Default for FrontDeskSlice {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl FrontDeskSlice {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            phase: GamePhase::Running,
            timer: TIMER_UNSET,
            matches: 0,
            wrong: 0,
            score: 0,
            bonus: 0,
            seed,
            round: 0,
            member: 0,
            badges: [0; BADGE_COUNT],
        }
    }

    pub fn final_score(&self) -> u32 {
        self.score + self.bonus
    }

    fn deal_round(&mut self) {
        let mut rng = Pcg32::seed_from_u64(self.seed ^ self.round.wrapping_mul(0x9E37_79B9));
        let mut badges: [u8; BADGE_COUNT] = std::array::from_fn(|i| i as u8);
        badges.shuffle(&mut rng);
        self.badges = badges;
        // Any badge position; the member is one of the dealt ids.
        self.member = badges[(self.round % BADGE_COUNT as u64) as usize];
    }
}

/// Badge grid layout, 3 columns by 2 rows on the right half.
pub fn badge_rect(view: Vec2, index: usize) -> Rect {
    let cell = Vec2::new(120.0, 96.0);
    let gap = 18.0;
    let grid_w = 3.0 * cell.x + 2.0 * gap;
    let origin = Vec2::new(
        view.x * 0.62 - grid_w / 2.0,
        view.y * 0.5 - cell.y - gap / 2.0,
    );
    let col = (index % 3) as f32;
    let row = (index / 3) as f32;
    Rect::new(
        origin.x + col * (cell.x + gap),
        origin.y + row * (cell.y + gap),
        cell.x,
        cell.y,
    )
}

fn member_card(view: Vec2) -> Rect {
    Rect::centered(Vec2::new(view.x * 0.22, view.y * 0.5), 200.0, 250.0)
}

pub fn step(slice: &FrontDeskSlice, input: &InputState, dt: f32) -> (FrontDeskSlice, Vec<Effect>) {
    let mut next = slice.clone();
    let mut effects = Vec::new();

    if next.timer <= TIMER_UNSET {
        next.timer = ROUND_SECONDS;
        next.deal_round();
    }
    if next.phase == GamePhase::Finished {
        return (next, effects);
    }

    next.timer -= dt;

    if input.clicked {
        let hit = (0..BADGE_COUNT)
            .find(|&i| badge_rect(input.view, i).contains(input.pointer));
        if let Some(i) = hit {
            if next.badges[i] == next.member {
                next.matches += 1;
                next.score += SCORE_PER_MATCH;
                next.round += 1;
                next.deal_round();
                effects.push(Effect::Sound(SoundEffect::Match));
                effects.push(Effect::Particles {
                    pos: input.pointer,
                    color: palette::GOOD,
                    kind: ParticleKind::Burst,
                    count: 10,
                });
            } else {
                next.wrong += 1;
                next.timer -= WRONG_PENALTY;
                effects.push(Effect::Sound(SoundEffect::Mismatch));
                effects.push(Effect::burst(input.pointer, palette::BAD, 1));
            }
        }
    }

    if next.matches >= WIN_MATCHES || next.timer <= 0.0 {
        next.timer = next.timer.max(0.0);
        next.bonus = 5 * next.timer.ceil() as u32;
        next.phase = GamePhase::Finished;
        effects.push(Effect::Sound(if next.matches >= WIN_MATCHES {
            SoundEffect::Win
        } else {
            SoundEffect::Lose
        }));
    }

    (next, effects)
}

pub fn render(surface: &mut dyn Surface, slice: &FrontDeskSlice, _frame: u64) {
    let view = surface.size();
    draw_hud(surface, "Front Desk", slice.score, slice.timer.max(0.0));

    if slice.phase == GamePhase::Finished {
        draw_summary(
            surface,
            "Shift over!",
            &[
                format!("{} members checked in", slice.matches),
                format!("{} wrong badges", slice.wrong),
            ],
            slice.final_score(),
        );
        return;
    }

    // Arriving member.
    let card = member_card(view);
    ui::draw_panel(surface, card);
    avatar::draw_avatar(
        surface,
        Rect::new(card.x + 40.0, card.y + 30.0, card.w - 80.0, card.w - 80.0),
        slice.member as u64,
    );
    surface.text(
        MEMBER_NAMES[slice.member as usize],
        Vec2::new(card.center().x, card.y + card.h - 50.0),
        20.0,
        palette::INK,
        Align::Center,
    );
    surface.text(
        "needs their badge",
        Vec2::new(card.center().x, card.y + card.h - 24.0),
        14.0,
        palette::DIM,
        Align::Center,
    );

    // Badge wall.
    for (i, &id) in slice.badges.iter().enumerate() {
        let rect = badge_rect(view, i);
        surface.fill_rect(rect, palette::PANEL);
        surface.stroke_rect(rect, palette::DIM, 2.0);
        avatar::draw_avatar(
            surface,
            Rect::new(rect.x + 34.0, rect.y + 8.0, 52.0, 52.0),
            id as u64,
        );
        surface.text(
            MEMBER_NAMES[id as usize],
            Vec2::new(rect.center().x, rect.y + rect.h - 14.0),
            14.0,
            palette::INK,
            Align::Center,
        );
    }

    surface.text(
        &format!("Checked in {}/{}", slice.matches, WIN_MATCHES),
        Vec2::new(view.x / 2.0, view.y - 30.0),
        16.0,
        palette::DIM,
        Align::Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u64) -> FrontDeskSlice {
        let (slice, _) = step(&FrontDeskSlice::with_seed(seed), &InputState::new(), 0.0);
        slice
    }

    fn click_badge(slice: &FrontDeskSlice, index: usize) -> (FrontDeskSlice, Vec<Effect>) {
        let mut input = InputState::new();
        input.clicked = true;
        input.pointer = badge_rect(input.view, index).center();
        step(slice, &input, 1.0 / 60.0)
    }

    fn member_index(slice: &FrontDeskSlice) -> usize {
        slice
            .badges
            .iter()
            .position(|&b| b == slice.member)
            .expect("member badge is always dealt")
    }

    #[test]
    fn test_correct_badge_scores_and_redeals() {
        let slice = started(11);
        let before_round = slice.round;
        let (next, fx) = click_badge(&slice, member_index(&slice));
        assert_eq!(next.matches, 1);
        assert_eq!(next.score, SCORE_PER_MATCH);
        assert_eq!(next.round, before_round + 1);
        assert!(fx.contains(&Effect::Sound(SoundEffect::Match)));
    }

    #[test]
    fn test_wrong_badge_burns_timer_not_matches() {
        let slice = started(11);
        let wrong = (0..BADGE_COUNT)
            .find(|&i| slice.badges[i] != slice.member)
            .unwrap();
        let timer_before = slice.timer;
        let (next, fx) = click_badge(&slice, wrong);
        assert_eq!(next.matches, 0);
        assert!(next.timer <= timer_before - WRONG_PENALTY);
        assert_eq!(next.phase, GamePhase::Running);
        // One red burst at the click location.
        assert!(fx.iter().any(|e| matches!(
            e,
            Effect::Particles { color, count: 1, .. } if *color == palette::BAD
        )));
    }

    #[test]
    fn test_ten_matches_win_with_time_bonus() {
        let mut slice = started(3);
        for _ in 0..WIN_MATCHES {
            let idx = member_index(&slice);
            let (next, _) = click_badge(&slice, idx);
            slice = next;
        }
        assert_eq!(slice.phase, GamePhase::Finished);
        assert_eq!(slice.matches, WIN_MATCHES);
        assert_eq!(slice.final_score(), slice.score + slice.bonus);
        assert!(slice.bonus > 0);
    }

    #[test]
    fn test_deal_is_deterministic_per_seed() {
        let a = started(99);
        let b = started(99);
        assert_eq!(a.badges, b.badges);
        assert_eq!(a.member, b.member);
    }
}
