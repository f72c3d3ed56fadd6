//! Weight-room workout: alternate A and D key presses to pump out reps.
//!
//! Each press that alternates from the previous arm counts one rep. The
//! effort bar fills on a rep and drains over time, purely for feedback.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::input::{InputState, KeyEdge};
use crate::particles::ParticleKind;
use crate::surface::{palette, Align, Rect, Surface};

use super::{draw_hud, draw_summary, Effect, GamePhase, TIMER_UNSET};

pub const WIN_REPS: u32 = 15;
pub const ROUND_SECONDS: f32 = 45.0;
pub const SCORE_PER_REP: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arm {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSlice {
    pub phase: GamePhase,
    pub timer: f32,
    pub reps: u32,
    pub score: u32,
    pub bonus: u32,
    /// Effort bar in [0, 1], cosmetic.
    pub effort: f32,
    pub last_arm: Option<Arm>,
    edge_a: KeyEdge,
    edge_d: KeyEdge,
}

impl Default for WorkoutSlice {
    fn default() -> Self {
        Self {
            phase: GamePhase::Running,
            timer: TIMER_UNSET,
            reps: 0,
            score: 0,
            bonus: 0,
            effort: 0.0,
            last_arm: None,
            edge_a: KeyEdge::default(),
            edge_d: KeyEdge::default(),
        }
    }
}

impl WorkoutSlice {
    pub fn final_score(&self) -> u32 {
        self.score + self.bonus
    }
}

pub fn step(slice: &WorkoutSlice, input: &InputState, dt: f32) -> (WorkoutSlice, Vec<Effect>) {
    let mut next = slice.clone();
    let mut effects = Vec::new();

    if next.timer <= TIMER_UNSET {
        next.timer = ROUND_SECONDS;
    }
    if next.phase == GamePhase::Finished {
        return (next, effects);
    }

    next.timer -= dt;
    next.effort = (next.effort - dt * 0.6).max(0.0);

    let pressed_a = next.edge_a.rising(input.is_down("a"));
    let pressed_d = next.edge_d.rising(input.is_down("d"));

    for (pressed, arm) in [(pressed_a, Arm::Left), (pressed_d, Arm::Right)] {
        if pressed && next.last_arm != Some(arm) {
            next.last_arm = Some(arm);
            next.reps += 1;
            next.score += SCORE_PER_REP;
            next.effort = (next.effort + 0.35).min(1.0);
            effects.push(Effect::Sound(SoundEffect::Rep));
            effects.push(Effect::Particles {
                pos: lifter_pos(input.view),
                color: palette::ACCENT,
                kind: ParticleKind::Trail,
                count: 4,
            });
        }
    }

    if next.reps >= WIN_REPS || next.timer <= 0.0 {
        next.timer = next.timer.max(0.0);
        next.bonus = 8 * next.timer.ceil() as u32;
        next.phase = GamePhase::Finished;
        effects.push(Effect::Sound(if next.reps >= WIN_REPS {
            SoundEffect::Win
        } else {
            SoundEffect::Lose
        }));
    }

    (next, effects)
}

fn lifter_pos(view: Vec2) -> Vec2 {
    Vec2::new(view.x / 2.0, view.y * 0.55)
}

pub fn render(surface: &mut dyn Surface, slice: &WorkoutSlice, frame: u64) {
    let view = surface.size();
    draw_hud(surface, "Weight Room", slice.score, slice.timer.max(0.0));

    if slice.phase == GamePhase::Finished {
        draw_summary(
            surface,
            "Workout complete!",
            &[format!("{} reps", slice.reps), format!("Bonus {}", slice.bonus)],
            slice.final_score(),
        );
        return;
    }

    // Lifter: torso plus a barbell that raises with the effort bar.
    let center = lifter_pos(view);
    let raise = slice.effort * 40.0;
    let wobble = (frame as f32 * 0.15).sin() * slice.effort * 3.0;
    surface.fill_circle(center - Vec2::new(0.0, 70.0), 22.0, palette::INK);
    surface.fill_rect(
        Rect::centered(center, 36.0, 90.0),
        palette::ACCENT,
    );
    let bar_y = center.y - 40.0 - raise;
    surface.line(
        Vec2::new(center.x - 80.0, bar_y + wobble),
        Vec2::new(center.x + 80.0, bar_y - wobble),
        palette::DIM,
        6.0,
    );
    surface.fill_circle(Vec2::new(center.x - 80.0, bar_y + wobble), 16.0, palette::PANEL);
    surface.fill_circle(Vec2::new(center.x + 80.0, bar_y - wobble), 16.0, palette::PANEL);

    // Effort bar and rep counter.
    let bar = Rect::new(view.x / 2.0 - 120.0, view.y * 0.78, 240.0, 18.0);
    surface.fill_rect(bar, palette::PANEL);
    surface.fill_rect(
        Rect::new(bar.x, bar.y, bar.w * slice.effort, bar.h),
        palette::GOOD,
    );
    surface.text(
        &format!("Reps {}/{}", slice.reps, WIN_REPS),
        Vec2::new(view.x / 2.0, bar.y - 14.0),
        18.0,
        palette::INK,
        Align::Center,
    );
    let hint = match slice.last_arm {
        Some(Arm::Left) => "Press D",
        Some(Arm::Right) => "Press A",
        None => "Alternate A and D",
    };
    surface.text(
        hint,
        Vec2::new(view.x / 2.0, bar.y + 48.0),
        16.0,
        palette::DIM,
        Align::Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(slice: &WorkoutSlice, key: &str) -> (WorkoutSlice, Vec<Effect>) {
        let mut input = InputState::new();
        input.key_down(key);
        let (after_down, fx) = step(slice, &input, 1.0 / 60.0);
        // Release so the next press is a fresh edge.
        let released = InputState::new();
        let (after_up, _) = step(&after_down, &released, 1.0 / 60.0);
        (after_up, fx)
    }

    #[test]
    fn test_fifteen_alternations_finish_the_game() {
        let mut slice = WorkoutSlice::default();
        let keys = ["a", "d"];
        for i in 0..15 {
            let (next, _) = press(&slice, keys[i % 2]);
            slice = next;
        }
        assert_eq!(slice.reps, 15);
        assert_eq!(slice.phase, GamePhase::Finished);
        assert_eq!(slice.score, 15 * SCORE_PER_REP);
        assert!(slice.bonus > 0, "finishing early must keep time bonus");
    }

    #[test]
    fn test_repeated_same_arm_does_not_count() {
        let mut slice = WorkoutSlice::default();
        for _ in 0..5 {
            let (next, _) = press(&slice, "a");
            slice = next;
        }
        assert_eq!(slice.reps, 1);
    }

    #[test]
    fn test_holding_key_is_one_rep() {
        let mut input = InputState::new();
        input.key_down("a");
        let mut slice = WorkoutSlice::default();
        for _ in 0..30 {
            let (next, _) = step(&slice, &input, 1.0 / 60.0);
            slice = next;
        }
        assert_eq!(slice.reps, 1);
    }

    #[test]
    fn test_timeout_finishes_without_bonus() {
        let mut slice = WorkoutSlice::default();
        let input = InputState::new();
        for _ in 0..2000 {
            let (next, _) = step(&slice, &input, 0.05);
            slice = next;
            if slice.phase == GamePhase::Finished {
                break;
            }
        }
        assert_eq!(slice.phase, GamePhase::Finished);
        assert_eq!(slice.bonus, 0);
        assert_eq!(slice.final_score(), slice.score);
    }
}
