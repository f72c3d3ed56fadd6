//! Yoga studio: hold the pointer inside a drifting balance zone.
//!
//! Each pose needs ten accumulated seconds of balance. Leaving the zone
//! drains pose progress (floored at zero) rather than failing the pose.
//! The zone wanders on a seeded path and tightens with every pose.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::input::InputState;
use crate::particles::ParticleKind;
use crate::surface::{palette, Align, Color, Rect, Surface};

use super::{draw_hud, draw_summary, Effect, GamePhase, TIMER_UNSET};

pub const WIN_POSES: u32 = 3;
pub const ROUND_SECONDS: f32 = 60.0;
pub const SCORE_PER_POSE: u32 = 150;
pub const POSE_HOLD_SECONDS: f32 = 10.0;

const POSE_NAMES: [&str; 3] = ["Tree", "Warrior", "Crane"];
const DRAIN_RATE: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YogaSlice {
    pub phase: GamePhase,
    pub timer: f32,
    pub poses: u32,
    pub score: u32,
    pub bonus: u32,
    pub seed: u64,
    /// Balance accumulated toward the current pose, seconds.
    pub pose_progress: f32,
    /// Wall-clock inside this run, drives the zone's wander path.
    pub elapsed: f32,
    /// Seconds spent in the zone, for the steadiness bonus.
    pub steady_time: f32,
    pub in_zone: bool,
}

impl Default for YogaSlice {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl YogaSlice {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            phase: GamePhase::Running,
            timer: TIMER_UNSET,
            poses: 0,
            score: 0,
            bonus: 0,
            seed,
            pose_progress: 0.0,
            elapsed: 0.0,
            steady_time: 0.0,
            in_zone: false,
        }
    }

    pub fn final_score(&self) -> u32 {
        self.score + self.bonus
    }

    /// Fraction of the run spent balanced, in [0, 1].
    pub fn steadiness(&self) -> f32 {
        if self.elapsed > 0.0 {
            (self.steady_time / self.elapsed).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn steadiness_bonus(&self) -> u32 {
        (self.steadiness() * 150.0) as u32
    }

    /// Zone radius shrinks with each completed pose.
    pub fn zone_radius(&self) -> f32 {
        (70.0 - self.poses as f32 * 12.0).max(34.0)
    }

    /// Seeded wander: two incommensurate sine pairs per axis so the path
    /// never visibly loops inside a run.
    pub fn zone_center(&self, view: Vec2) -> Vec2 {
        let p = (self.seed % 1024) as f32 * 0.37;
        let t = self.elapsed;
        let half = Vec2::new(view.x * 0.28, view.y * 0.22);
        let center = Vec2::new(view.x / 2.0, view.y * 0.5);
        center
            + Vec2::new(
                ((t * 0.31 + p).sin() + 0.5 * (t * 0.83 + p * 2.0).sin()) / 1.5 * half.x,
                ((t * 0.43 + p * 3.0).cos() + 0.5 * (t * 0.67 + p).sin()) / 1.5 * half.y,
            )
    }
}

pub fn step(slice: &YogaSlice, input: &InputState, dt: f32) -> (YogaSlice, Vec<Effect>) {
    let mut next = slice.clone();
    let mut effects = Vec::new();

    if next.timer <= TIMER_UNSET {
        next.timer = ROUND_SECONDS;
    }
    if next.phase == GamePhase::Finished {
        return (next, effects);
    }

    next.timer -= dt;
    next.elapsed += dt;

    let center = next.zone_center(input.view);
    let inside = center.distance(input.pointer) <= next.zone_radius();
    next.in_zone = inside;

    if inside {
        next.pose_progress += dt;
        next.steady_time += dt;
        // A little calm shimmer while balanced.
        if (next.elapsed * 6.0).fract() < dt * 6.0 {
            effects.push(Effect::Particles {
                pos: input.pointer,
                color: palette::GOOD,
                kind: ParticleKind::Float,
                count: 1,
            });
        }
    } else {
        next.pose_progress = (next.pose_progress - DRAIN_RATE * dt).max(0.0);
    }

    if next.pose_progress >= POSE_HOLD_SECONDS {
        next.poses += 1;
        next.score += SCORE_PER_POSE;
        next.pose_progress = 0.0;
        effects.push(Effect::Sound(SoundEffect::Pose));
        effects.push(Effect::burst(center, palette::GOLD, 12));
    }

    if next.poses >= WIN_POSES || next.timer <= 0.0 {
        next.timer = next.timer.max(0.0);
        next.bonus = 4 * next.timer.ceil() as u32 + next.steadiness_bonus();
        next.phase = GamePhase::Finished;
        effects.push(Effect::Sound(if next.poses >= WIN_POSES {
            SoundEffect::Win
        } else {
            SoundEffect::Lose
        }));
    }

    (next, effects)
}

pub fn render(surface: &mut dyn Surface, slice: &YogaSlice, _frame: u64) {
    let view = surface.size();
    draw_hud(surface, "Yoga Studio", slice.score, slice.timer.max(0.0));

    if slice.phase == GamePhase::Finished {
        draw_summary(
            surface,
            "Namaste!",
            &[
                format!("{} poses held", slice.poses),
                format!("Steadiness {:.0}%", slice.steadiness() * 100.0),
            ],
            slice.final_score(),
        );
        return;
    }

    // Mat.
    surface.fill_rect(
        Rect::centered(Vec2::new(view.x / 2.0, view.y * 0.5), view.x * 0.72, view.y * 0.56),
        Color::rgb(60, 40, 70).with_alpha(0.5),
    );

    let center = slice.zone_center(view);
    let radius = slice.zone_radius();
    let zone_color = if slice.in_zone { palette::GOOD } else { palette::DIM };
    surface.fill_circle(center, radius, zone_color.with_alpha(0.18));
    surface.stroke_circle(center, radius, zone_color, 3.0);
    // Progress arc stand-in: inner disc grows with the hold.
    surface.fill_circle(
        center,
        radius * (slice.pose_progress / POSE_HOLD_SECONDS).min(1.0),
        palette::GOLD.with_alpha(0.35),
    );

    let pose = POSE_NAMES[(slice.poses as usize).min(POSE_NAMES.len() - 1)];
    surface.text(
        &format!("{} pose  {:.1}s / {:.0}s", pose, slice.pose_progress, POSE_HOLD_SECONDS),
        Vec2::new(view.x / 2.0, view.y - 54.0),
        17.0,
        palette::INK,
        Align::Center,
    );
    surface.text(
        "Keep the cursor inside the circle",
        Vec2::new(view.x / 2.0, view.y - 28.0),
        14.0,
        palette::DIM,
        Align::Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_at(pointer: Vec2) -> InputState {
        let mut input = InputState::new();
        input.pointer = pointer;
        input
    }

    #[test]
    fn test_balanced_pointer_completes_a_pose() {
        let mut slice = YogaSlice::with_seed(4);
        let view = InputState::new().view;
        let mut held = 0.0;
        while held < POSE_HOLD_SECONDS + 1.0 {
            let input = input_at(slice.zone_center(view));
            let (next, fx) = step(&slice, &input, 1.0 / 30.0);
            if fx.contains(&Effect::Sound(SoundEffect::Pose)) {
                assert_eq!(next.poses, 1);
                assert_eq!(next.score, SCORE_PER_POSE);
                return;
            }
            slice = next;
            held += 1.0 / 30.0;
        }
        panic!("pose never completed while tracking the zone");
    }

    #[test]
    fn test_leaving_the_zone_drains_but_never_below_zero() {
        let mut slice = YogaSlice::with_seed(4);
        slice.timer = ROUND_SECONDS;
        slice.pose_progress = 1.0;
        let far = input_at(Vec2::new(-500.0, -500.0));
        for _ in 0..120 {
            let (next, _) = step(&slice, &far, 1.0 / 30.0);
            slice = next;
        }
        assert_eq!(slice.pose_progress, 0.0);
        assert_eq!(slice.phase, GamePhase::Running, "drain is not a fail");
    }

    #[test]
    fn test_zone_tightens_per_pose() {
        let mut slice = YogaSlice::with_seed(0);
        let open = slice.zone_radius();
        slice.poses = 2;
        assert!(slice.zone_radius() < open);
    }

    #[test]
    fn test_steadiness_tracks_time_in_zone() {
        let mut slice = YogaSlice::with_seed(9);
        slice.timer = ROUND_SECONDS;
        slice.elapsed = 10.0;
        slice.steady_time = 5.0;
        assert!((slice.steadiness() - 0.5).abs() < 1e-5);
        assert_eq!(slice.steadiness_bonus(), 75);
    }
}
