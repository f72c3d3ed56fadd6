//! Pool laps: alternate Left/Right arrow strokes to swim.
//!
//! Valid alternating strokes add speed against constant water drag. Each
//! stroke also charges the power meter; pressing both arrows on the same
//! frame with a full meter fires a power stroke surge. One lap is one full
//! crossing of the pool; the lane flips at each wall.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::input::{InputState, KeyEdge};
use crate::particles::ParticleKind;
use crate::surface::{palette, Align, Color, Rect, Surface};

use super::{draw_hud, draw_summary, Effect, GamePhase, TIMER_UNSET};

pub const WIN_LAPS: u32 = 3;
pub const ROUND_SECONDS: f32 = 60.0;
pub const SCORE_PER_LAP: u32 = 200;

const STROKE_IMPULSE: f32 = 90.0;
const POWER_SURGE: f32 = 260.0;
const DRAG: f32 = 1.4;
const METER_PER_STROKE: f32 = 0.2;
/// Strokes under this count per run earn efficiency points.
const EFFICIENT_STROKES: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimmingSlice {
    pub phase: GamePhase,
    pub timer: f32,
    pub laps: u32,
    pub strokes: u32,
    pub score: u32,
    pub bonus: u32,
    /// Position along the lane in [0, 1].
    pub progress: f32,
    pub speed: f32,
    /// +1 swimming right, -1 swimming left.
    pub heading: f32,
    /// Power meter in [0, 1].
    pub meter: f32,
    pub last_side: Option<Side>,
    edge_left: KeyEdge,
    edge_right: KeyEdge,
}

impl Default for SwimmingSlice {
    fn default() -> Self {
        Self {
            phase: GamePhase::Running,
            timer: TIMER_UNSET,
            laps: 0,
            strokes: 0,
            score: 0,
            bonus: 0,
            progress: 0.0,
            speed: 0.0,
            heading: 1.0,
            meter: 0.0,
            last_side: None,
            edge_left: KeyEdge::default(),
            edge_right: KeyEdge::default(),
        }
    }
}

impl SwimmingSlice {
    pub fn final_score(&self) -> u32 {
        self.score + self.bonus
    }

    pub fn efficiency_bonus(&self) -> u32 {
        10 * EFFICIENT_STROKES.saturating_sub(self.strokes)
    }
}

pub fn step(slice: &SwimmingSlice, input: &InputState, dt: f32) -> (SwimmingSlice, Vec<Effect>) {
    let mut next = slice.clone();
    let mut effects = Vec::new();

    if next.timer <= TIMER_UNSET {
        next.timer = ROUND_SECONDS;
    }
    if next.phase == GamePhase::Finished {
        return (next, effects);
    }

    next.timer -= dt;

    let left = next.edge_left.rising(input.is_down("ArrowLeft"));
    let right = next.edge_right.rising(input.is_down("ArrowRight"));

    // Power stroke first: both edges on one frame with a charged meter.
    if left && right && next.meter >= 1.0 {
        next.speed += POWER_SURGE;
        next.meter = 0.0;
        next.strokes += 1;
        next.last_side = None;
        effects.push(Effect::Sound(SoundEffect::Splash));
        effects.push(Effect::Particles {
            pos: swimmer_pos(input.view, &next),
            color: palette::WATER,
            kind: ParticleKind::Burst,
            count: 12,
        });
    } else {
        for (pressed, side) in [(left, Side::Left), (right, Side::Right)] {
            if pressed && next.last_side != Some(side) {
                next.last_side = Some(side);
                next.strokes += 1;
                next.speed += STROKE_IMPULSE;
                next.meter = (next.meter + METER_PER_STROKE).min(1.0);
                effects.push(Effect::Sound(SoundEffect::Stroke));
                effects.push(Effect::Particles {
                    pos: swimmer_pos(input.view, &next),
                    color: palette::WATER,
                    kind: ParticleKind::Trail,
                    count: 3,
                });
            }
        }
    }

    // Water drag, then advance along the lane.
    next.speed = (next.speed - next.speed * DRAG * dt).max(0.0);
    next.progress += next.heading * next.speed * dt / lane_length(input.view);

    // A lap is reaching the wall ahead; the start wall does not count.
    let reached_wall = (next.heading > 0.0 && next.progress >= 1.0)
        || (next.heading < 0.0 && next.progress <= 0.0);
    if reached_wall {
        next.progress = next.progress.clamp(0.0, 1.0);
        next.heading = -next.heading;
        next.laps += 1;
        next.score += SCORE_PER_LAP;
        next.speed *= 0.4;
        effects.push(Effect::Sound(SoundEffect::Score));
        effects.push(Effect::burst(swimmer_pos(input.view, &next), palette::GOOD, 10));
    }

    if next.laps >= WIN_LAPS || next.timer <= 0.0 {
        next.timer = next.timer.max(0.0);
        next.bonus = 4 * next.timer.ceil() as u32 + next.efficiency_bonus();
        next.phase = GamePhase::Finished;
        effects.push(Effect::Sound(if next.laps >= WIN_LAPS {
            SoundEffect::Win
        } else {
            SoundEffect::Lose
        }));
    }

    (next, effects)
}

fn lane_length(view: Vec2) -> f32 {
    (view.x - 160.0).max(200.0)
}

fn swimmer_pos(view: Vec2, slice: &SwimmingSlice) -> Vec2 {
    Vec2::new(80.0 + slice.progress * lane_length(view), view.y * 0.5)
}

pub fn render(surface: &mut dyn Surface, slice: &SwimmingSlice, frame: u64) {
    let view = surface.size();
    draw_hud(surface, "Pool Laps", slice.score, slice.timer.max(0.0));

    if slice.phase == GamePhase::Finished {
        draw_summary(
            surface,
            "Out of the pool!",
            &[
                format!("{} laps in {} strokes", slice.laps, slice.strokes),
                format!("Efficiency bonus {}", slice.efficiency_bonus()),
            ],
            slice.final_score(),
        );
        return;
    }

    // Water with drifting lane ripples.
    let pool = Rect::new(0.0, view.y * 0.32, view.x, view.y * 0.36);
    surface.fill_rect(pool, palette::WATER.with_alpha(0.35));
    for i in 0..8 {
        let y = pool.y + pool.h * (i as f32 + 0.5) / 8.0;
        let shift = ((frame as f32 * 0.02 + i as f32).sin()) * 14.0;
        surface.line(
            Vec2::new(shift.max(0.0), y),
            Vec2::new(view.x + shift.min(0.0), y),
            palette::WATER.with_alpha(0.25),
            1.5,
        );
    }
    surface.line(
        Vec2::new(80.0, pool.y),
        Vec2::new(80.0, pool.y + pool.h),
        palette::INK.with_alpha(0.4),
        3.0,
    );
    surface.line(
        Vec2::new(view.x - 80.0, pool.y),
        Vec2::new(view.x - 80.0, pool.y + pool.h),
        palette::INK.with_alpha(0.4),
        3.0,
    );

    // Swimmer: head plus kick wake scaled by speed.
    let pos = swimmer_pos(view, slice);
    let bob = (frame as f32 * 0.1).sin() * 3.0;
    surface.fill_circle(pos + Vec2::new(0.0, bob), 12.0, Color::rgb(240, 190, 150));
    surface.fill_rect(
        Rect::centered(pos + Vec2::new(-slice.heading * 26.0, bob + 4.0), 36.0, 10.0),
        palette::ACCENT,
    );

    // Meter and lap count.
    let bar = Rect::new(view.x / 2.0 - 120.0, view.y * 0.8, 240.0, 16.0);
    surface.fill_rect(bar, palette::PANEL);
    let meter_color = if slice.meter >= 1.0 { palette::GOLD } else { palette::WATER };
    surface.fill_rect(
        Rect::new(bar.x, bar.y, bar.w * slice.meter, bar.h),
        meter_color,
    );
    surface.text(
        if slice.meter >= 1.0 {
            "POWER READY: press both arrows"
        } else {
            "Alternate Left / Right arrows"
        },
        Vec2::new(view.x / 2.0, bar.y + 38.0),
        15.0,
        palette::DIM,
        Align::Center,
    );
    surface.text(
        &format!("Laps {}/{}", slice.laps, WIN_LAPS),
        Vec2::new(view.x / 2.0, bar.y - 12.0),
        17.0,
        palette::INK,
        Align::Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(slice: &SwimmingSlice, keys: &[&str]) -> (SwimmingSlice, Vec<Effect>) {
        let mut input = InputState::new();
        for k in keys {
            input.key_down(k);
        }
        let (down, fx) = step(slice, &input, 1.0 / 60.0);
        let (up, _) = step(&down, &InputState::new(), 1.0 / 60.0);
        (up, fx)
    }

    #[test]
    fn test_alternating_strokes_build_speed_and_meter() {
        let mut slice = SwimmingSlice::default();
        let (next, _) = stroke(&slice, &["ArrowLeft"]);
        slice = next;
        let (next, _) = stroke(&slice, &["ArrowRight"]);
        slice = next;
        assert_eq!(slice.strokes, 2);
        assert!(slice.speed > 0.0);
        assert!((slice.meter - 2.0 * METER_PER_STROKE).abs() < 1e-5);
    }

    #[test]
    fn test_same_side_stroke_ignored() {
        let mut slice = SwimmingSlice::default();
        for _ in 0..4 {
            let (next, _) = stroke(&slice, &["ArrowLeft"]);
            slice = next;
        }
        assert_eq!(slice.strokes, 1);
    }

    #[test]
    fn test_power_stroke_needs_full_meter() {
        let mut slice = SwimmingSlice::default();
        let (both, fx) = stroke(&slice, &["ArrowLeft", "ArrowRight"]);
        assert!(!fx.contains(&Effect::Sound(SoundEffect::Splash)));
        let _ = both;

        slice.meter = 1.0;
        let speed_before = slice.speed;
        let (next, fx) = stroke(&slice, &["ArrowLeft", "ArrowRight"]);
        assert!(fx.contains(&Effect::Sound(SoundEffect::Splash)));
        assert!(next.speed >= speed_before + POWER_SURGE * 0.9);
        assert_eq!(next.meter, 0.0);
    }

    #[test]
    fn test_crossing_the_pool_counts_a_lap_and_turns() {
        let mut slice = SwimmingSlice::default();
        slice.timer = ROUND_SECONDS;
        slice.progress = 0.99;
        slice.speed = 400.0;
        let input = InputState::new();
        let mut lapped = false;
        for _ in 0..120 {
            let (next, _) = step(&slice, &input, 1.0 / 60.0);
            slice = next;
            if slice.laps == 1 {
                lapped = true;
                break;
            }
        }
        assert!(lapped);
        assert_eq!(slice.heading, -1.0);
        assert_eq!(slice.score, SCORE_PER_LAP);
    }

    #[test]
    fn test_efficiency_bonus_shrinks_with_strokes() {
        let mut few = SwimmingSlice::default();
        few.strokes = 10;
        let mut many = SwimmingSlice::default();
        many.strokes = 100;
        assert!(few.efficiency_bonus() > 0);
        assert_eq!(many.efficiency_bonus(), 0);
    }
}
