//! Basketball shootaround: slingshot the ball into the hoop.
//!
//! Press on the ball and drag away to aim; release to shoot opposite the
//! drag. Plain projectile physics with damped bounces off the floor and
//! walls. A basket that never touches rim or backboard counts as a swish.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::input::InputState;
use crate::particles::ParticleKind;
use crate::surface::{palette, Align, Color, Rect, Surface};

use super::{draw_hud, draw_summary, Effect, GamePhase, TIMER_UNSET};

pub const WIN_BASKETS: u32 = 8;
pub const ROUND_SECONDS: f32 = 60.0;
pub const SCORE_PER_BASKET: u32 = 100;
pub const SWISH_BONUS: u32 = 50;

pub const GRAVITY: f32 = 620.0;
pub const BALL_RADIUS: f32 = 14.0;
/// Energy kept on a bounce.
const RESTITUTION: f32 = 0.62;
/// Drag-to-velocity scale.
const LAUNCH_POWER: f32 = 5.5;
const MAX_LAUNCH_SPEED: f32 = 900.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallState {
    /// Waiting on the chalk mark for a grab.
    #[default]
    Resting,
    /// Being aimed; launch on release.
    Aiming,
    /// In the air.
    Flying,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketballSlice {
    pub phase: GamePhase,
    pub timer: f32,
    pub baskets: u32,
    pub swishes: u32,
    pub attempts: u32,
    pub score: u32,
    pub bonus: u32,
    pub ball_state: BallState,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    /// Rim/backboard contact since launch disqualifies the swish.
    pub touched_rim: bool,
    /// Set while the ball is above the rim; scoring requires crossing the
    /// rim gap downward.
    pub above_rim: bool,
}

impl Default for BasketballSlice {
    fn default() -> Self {
        Self {
            phase: GamePhase::Running,
            timer: TIMER_UNSET,
            baskets: 0,
            swishes: 0,
            attempts: 0,
            score: 0,
            bonus: 0,
            ball_state: BallState::Resting,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            touched_rim: false,
            above_rim: false,
        }
    }
}

impl BasketballSlice {
    pub fn final_score(&self) -> u32 {
        self.score + self.bonus
    }
}

fn launch_spot(view: Vec2) -> Vec2 {
    Vec2::new(view.x * 0.22, view.y - 80.0 - BALL_RADIUS)
}

/// Rim gap the ball must cross downward, as a rect spanning the opening.
fn rim_gap(view: Vec2) -> Rect {
    Rect::new(view.x * 0.74, view.y * 0.38, 64.0, 8.0)
}

fn backboard(view: Vec2) -> Rect {
    let rim = rim_gap(view);
    Rect::new(rim.x + rim.w + 6.0, rim.y - 70.0, 10.0, 90.0)
}

fn floor_y(view: Vec2) -> f32 {
    view.y - 80.0
}

pub fn step(slice: &BasketballSlice, input: &InputState, dt: f32) -> (BasketballSlice, Vec<Effect>) {
    let mut next = slice.clone();
    let mut effects = Vec::new();
    let view = input.view;

    if next.timer <= TIMER_UNSET {
        next.timer = ROUND_SECONDS;
        next.ball_pos = launch_spot(view);
    }
    if next.phase == GamePhase::Finished {
        return (next, effects);
    }

    next.timer -= dt;

    match next.ball_state {
        BallState::Resting => {
            let grab_zone = next.ball_pos.distance(input.pointer) < BALL_RADIUS * 3.0;
            if input.clicked && grab_zone {
                next.ball_state = BallState::Aiming;
            }
        }
        BallState::Aiming => {
            if !input.pointer_down {
                let pull = next.ball_pos - input.pointer;
                let vel = pull * LAUNCH_POWER;
                next.ball_vel = vel.clamp_length_max(MAX_LAUNCH_SPEED);
                next.ball_state = BallState::Flying;
                next.touched_rim = false;
                next.above_rim = false;
                next.attempts += 1;
                effects.push(Effect::Sound(SoundEffect::Stroke));
            }
        }
        BallState::Flying => {
            next.ball_vel.y += GRAVITY * dt;
            next.ball_pos += next.ball_vel * dt;

            let rim = rim_gap(view);
            let board = backboard(view);

            // Walls and floor bounce, damped.
            if next.ball_pos.x < BALL_RADIUS {
                next.ball_pos.x = BALL_RADIUS;
                next.ball_vel.x = -next.ball_vel.x * RESTITUTION;
            } else if next.ball_pos.x > view.x - BALL_RADIUS {
                next.ball_pos.x = view.x - BALL_RADIUS;
                next.ball_vel.x = -next.ball_vel.x * RESTITUTION;
            }
            if next.ball_pos.y < 44.0 + BALL_RADIUS {
                next.ball_pos.y = 44.0 + BALL_RADIUS;
                next.ball_vel.y = -next.ball_vel.y * RESTITUTION;
            }

            // Backboard face.
            if board.contains(next.ball_pos + Vec2::new(BALL_RADIUS, 0.0)) && next.ball_vel.x > 0.0
            {
                next.ball_pos.x = board.x - BALL_RADIUS;
                next.ball_vel.x = -next.ball_vel.x * RESTITUTION;
                next.touched_rim = true;
                effects.push(Effect::Sound(SoundEffect::Click));
            }

            // Rim posts at both ends of the gap.
            for post in [
                Vec2::new(rim.x, rim.y),
                Vec2::new(rim.x + rim.w, rim.y),
            ] {
                let delta = next.ball_pos - post;
                let dist = delta.length();
                if dist < BALL_RADIUS + 3.0 && dist > 0.0 {
                    let normal = delta / dist;
                    next.ball_pos = post + normal * (BALL_RADIUS + 3.0);
                    let speed = next.ball_vel.length() * RESTITUTION;
                    next.ball_vel = reflect(next.ball_vel, normal).normalize_or_zero() * speed;
                    next.touched_rim = true;
                    effects.push(Effect::Sound(SoundEffect::Click));
                }
            }

            // Basket: cross the rim gap moving downward.
            let over_gap = next.ball_pos.x > rim.x && next.ball_pos.x < rim.x + rim.w;
            if over_gap && next.ball_pos.y < rim.y {
                next.above_rim = true;
            }
            if next.above_rim && over_gap && next.ball_pos.y >= rim.y && next.ball_vel.y > 0.0 {
                let swish = !next.touched_rim;
                next.baskets += 1;
                next.score += SCORE_PER_BASKET + if swish { SWISH_BONUS } else { 0 };
                if swish {
                    next.swishes += 1;
                    effects.push(Effect::Sound(SoundEffect::Swish));
                } else {
                    effects.push(Effect::Sound(SoundEffect::Score));
                }
                effects.push(Effect::burst(rim.center(), palette::GOLD, 14));
                reset_ball(&mut next, view);
            }

            // Floor: bounce until the ball settles, then respawn.
            if next.ball_pos.y > floor_y(view) - BALL_RADIUS {
                next.ball_pos.y = floor_y(view) - BALL_RADIUS;
                next.ball_vel.y = -next.ball_vel.y * RESTITUTION;
                next.ball_vel.x *= 0.92;
                if next.ball_vel.length() < 40.0 {
                    reset_ball(&mut next, view);
                } else {
                    effects.push(Effect::Particles {
                        pos: next.ball_pos + Vec2::new(0.0, BALL_RADIUS),
                        color: palette::DIM,
                        kind: ParticleKind::Trail,
                        count: 3,
                    });
                }
            }
        }
    }

    if next.baskets >= WIN_BASKETS || next.timer <= 0.0 {
        next.timer = next.timer.max(0.0);
        next.bonus = 5 * next.timer.ceil() as u32;
        next.phase = GamePhase::Finished;
        effects.push(Effect::Sound(if next.baskets >= WIN_BASKETS {
            SoundEffect::Win
        } else {
            SoundEffect::Lose
        }));
    }

    (next, effects)
}

fn reset_ball(slice: &mut BasketballSlice, view: Vec2) {
    slice.ball_state = BallState::Resting;
    slice.ball_pos = launch_spot(view);
    slice.ball_vel = Vec2::ZERO;
    slice.touched_rim = false;
    slice.above_rim = false;
}

fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

pub fn render(surface: &mut dyn Surface, slice: &BasketballSlice, _frame: u64) {
    let view = surface.size();
    draw_hud(surface, "Shootaround", slice.score, slice.timer.max(0.0));

    if slice.phase == GamePhase::Finished {
        draw_summary(
            surface,
            "Buzzer!",
            &[
                format!("{} baskets ({} swish)", slice.baskets, slice.swishes),
                format!("{} attempts", slice.attempts),
            ],
            slice.final_score(),
        );
        return;
    }

    // Court.
    surface.fill_rect(
        Rect::new(0.0, floor_y(view), view.x, view.y - floor_y(view)),
        Color::rgb(120, 80, 50),
    );
    let rim = rim_gap(view);
    let board = backboard(view);
    surface.fill_rect(board, palette::INK.with_alpha(0.85));
    surface.line(
        Vec2::new(rim.x, rim.y),
        Vec2::new(rim.x + rim.w, rim.y),
        palette::BAD,
        4.0,
    );
    // Net hint.
    for i in 0..4 {
        let t = i as f32 / 3.0;
        surface.line(
            Vec2::new(rim.x + rim.w * t, rim.y),
            Vec2::new(rim.x + rim.w * 0.5 + (t - 0.5) * rim.w * 0.5, rim.y + 26.0),
            palette::DIM.with_alpha(0.6),
            1.5,
        );
    }

    surface.fill_circle(launch_spot(view), 4.0, palette::DIM.with_alpha(0.5));
    surface.fill_circle(slice.ball_pos, BALL_RADIUS, palette::ACCENT);
    surface.stroke_circle(slice.ball_pos, BALL_RADIUS, Color::rgb(150, 70, 20), 2.0);

    surface.text(
        &format!("Baskets {}/{}", slice.baskets, WIN_BASKETS),
        Vec2::new(view.x / 2.0, view.y - 30.0),
        16.0,
        palette::INK,
        Align::Center,
    );
    if slice.ball_state == BallState::Resting {
        surface.text(
            "Grab the ball and drag to aim",
            Vec2::new(view.x / 2.0, view.y - 54.0),
            14.0,
            palette::DIM,
            Align::Center,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (BasketballSlice, InputState) {
        let input = InputState::new();
        let (slice, _) = step(&BasketballSlice::default(), &input, 0.0);
        (slice, input)
    }

    fn grab_and_release(slice: &BasketballSlice, pull_to: Vec2) -> BasketballSlice {
        let mut input = InputState::new();
        input.clicked = true;
        input.pointer_down = true;
        input.pointer = slice.ball_pos;
        let (slice, _) = step(slice, &input, 1.0 / 60.0);
        assert_eq!(slice.ball_state, BallState::Aiming);

        let mut input = InputState::new();
        input.pointer = pull_to;
        let (slice, _) = step(&slice, &input, 1.0 / 60.0);
        slice
    }

    #[test]
    fn test_release_launches_opposite_the_drag() {
        let (slice, input) = started();
        let pull_to = slice.ball_pos + Vec2::new(-60.0, 80.0);
        let next = grab_and_release(&slice, pull_to);
        assert_eq!(next.ball_state, BallState::Flying);
        assert_eq!(next.attempts, 1);
        assert!(next.ball_vel.x > 0.0, "dragged left shoots right");
        assert!(next.ball_vel.y < 0.0, "dragged down shoots up");
        let _ = input;
    }

    #[test]
    fn test_clean_drop_through_rim_is_a_swish() {
        let (mut slice, input) = started();
        let rim = rim_gap(input.view);
        // Place the ball falling straight through the middle of the gap.
        slice.ball_state = BallState::Flying;
        slice.ball_pos = Vec2::new(rim.x + rim.w / 2.0, rim.y - 40.0);
        slice.ball_vel = Vec2::new(0.0, 120.0);
        let mut fx_all = Vec::new();
        for _ in 0..60 {
            let (next, fx) = step(&slice, &input, 1.0 / 60.0);
            fx_all.extend(fx);
            slice = next;
            if slice.baskets > 0 {
                break;
            }
        }
        assert_eq!(slice.baskets, 1);
        assert_eq!(slice.swishes, 1);
        assert_eq!(slice.score, SCORE_PER_BASKET + SWISH_BONUS);
        assert!(fx_all.contains(&Effect::Sound(SoundEffect::Swish)));
        assert_eq!(slice.ball_state, BallState::Resting, "ball respawns");
    }

    #[test]
    fn test_rising_ball_through_gap_does_not_score() {
        let (mut slice, input) = started();
        let rim = rim_gap(input.view);
        slice.ball_state = BallState::Flying;
        slice.ball_pos = Vec2::new(rim.x + rim.w / 2.0, rim.y + 30.0);
        slice.ball_vel = Vec2::new(0.0, -300.0);
        for _ in 0..10 {
            let (next, _) = step(&slice, &input, 1.0 / 60.0);
            slice = next;
        }
        assert_eq!(slice.baskets, 0);
    }

    #[test]
    fn test_floor_bounce_damps_velocity() {
        let (mut slice, input) = started();
        slice.ball_state = BallState::Flying;
        slice.ball_pos = Vec2::new(input.view.x / 2.0, floor_y(input.view) - BALL_RADIUS - 1.0);
        slice.ball_vel = Vec2::new(0.0, 400.0);
        let (next, _) = step(&slice, &input, 1.0 / 60.0);
        assert!(next.ball_vel.y < 0.0, "bounced upward");
        assert!(next.ball_vel.y.abs() < 400.0, "lost energy");
    }
}
