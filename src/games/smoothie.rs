//! Smoothie bar: blend drinks by clicking ingredients in recipe order.
//!
//! Each recipe is a four-step sequence over six ingredients. A wrong
//! ingredient dumps the blender (progress resets) and burns three seconds.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::input::{InputState, KeyEdge};
use crate::particles::ParticleKind;
use crate::surface::{palette, Align, Color, Rect, Surface};
use crate::ui;

use super::{draw_hud, draw_summary, Effect, GamePhase, TIMER_UNSET};

pub const WIN_SMOOTHIES: u32 = 5;
pub const ROUND_SECONDS: f32 = 75.0;
pub const SCORE_PER_SMOOTHIE: u32 = 150;
pub const WRONG_PENALTY: f32 = 3.0;
pub const RECIPE_LEN: usize = 4;

pub const INGREDIENT_COUNT: usize = 6;
const INGREDIENT_NAMES: [&str; INGREDIENT_COUNT] =
    ["Berry", "Banana", "Kale", "Yogurt", "Ice", "Protein"];
const INGREDIENT_COLORS: [Color; INGREDIENT_COUNT] = [
    Color::rgb(220, 70, 120),
    Color::rgb(245, 215, 90),
    Color::rgb(70, 170, 90),
    Color::rgb(235, 235, 225),
    Color::rgb(150, 210, 250),
    Color::rgb(170, 130, 220),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothieSlice {
    pub phase: GamePhase,
    pub timer: f32,
    pub smoothies: u32,
    pub score: u32,
    pub bonus: u32,
    pub seed: u64,
    /// Recipes completed or dumped, also the recipe RNG stream.
    pub recipe_no: u64,
    pub recipe: [u8; RECIPE_LEN],
    /// Steps of the current recipe already blended.
    pub progress: usize,
    /// Consecutive smoothies without a wrong ingredient.
    pub streak: u32,
    pub best_streak: u32,
    digit_edges: [KeyEdge; INGREDIENT_COUNT],
}

impl Default for SmoothieSlice {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl SmoothieSlice {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            phase: GamePhase::Running,
            timer: TIMER_UNSET,
            smoothies: 0,
            score: 0,
            bonus: 0,
            seed,
            recipe_no: 0,
            recipe: [0; RECIPE_LEN],
            progress: 0,
            streak: 0,
            best_streak: 0,
            digit_edges: [KeyEdge::default(); INGREDIENT_COUNT],
        }
    }

    pub fn final_score(&self) -> u32 {
        self.score + self.bonus
    }

    fn roll_recipe(&mut self) {
        let mut rng = Pcg32::seed_from_u64(self.seed ^ self.recipe_no.wrapping_mul(0x51F1_57E5));
        self.recipe =
            std::array::from_fn(|_| rng.random_range(0..INGREDIENT_COUNT as u8));
        self.progress = 0;
    }
}

/// Ingredient buttons along the bottom.
pub fn ingredient_rect(view: Vec2, index: usize) -> Rect {
    let cell = Vec2::new(110.0, 70.0);
    let gap = 14.0;
    let total = INGREDIENT_COUNT as f32 * cell.x + (INGREDIENT_COUNT as f32 - 1.0) * gap;
    Rect::new(
        view.x / 2.0 - total / 2.0 + index as f32 * (cell.x + gap),
        view.y - 120.0,
        cell.x,
        cell.y,
    )
}

fn blender_pos(view: Vec2) -> Vec2 {
    Vec2::new(view.x / 2.0, view.y * 0.45)
}

pub fn step(slice: &SmoothieSlice, input: &InputState, dt: f32) -> (SmoothieSlice, Vec<Effect>) {
    let mut next = slice.clone();
    let mut effects = Vec::new();

    if next.timer <= TIMER_UNSET {
        next.timer = ROUND_SECONDS;
        next.roll_recipe();
    }
    if next.phase == GamePhase::Finished {
        return (next, effects);
    }

    next.timer -= dt;

    // Ingredients answer to clicks and to the 1-6 keys.
    let mut picked: Option<usize> = None;
    if input.clicked {
        picked = (0..INGREDIENT_COUNT)
            .find(|&i| ingredient_rect(input.view, i).contains(input.pointer));
    }
    for i in 0..INGREDIENT_COUNT {
        let key = ((b'1' + i as u8) as char).to_string();
        if next.digit_edges[i].rising(input.is_down(&key)) {
            picked = Some(i);
        }
    }

    if let Some(i) = picked {
        if i as u8 == next.recipe[next.progress] {
            next.progress += 1;
            effects.push(Effect::Sound(SoundEffect::Click));
            effects.push(Effect::Particles {
                pos: blender_pos(input.view),
                color: INGREDIENT_COLORS[i],
                kind: ParticleKind::Float,
                count: 3,
            });
            if next.progress == RECIPE_LEN {
                next.smoothies += 1;
                next.score += SCORE_PER_SMOOTHIE;
                next.streak += 1;
                next.best_streak = next.best_streak.max(next.streak);
                next.recipe_no += 1;
                next.roll_recipe();
                effects.push(Effect::Sound(SoundEffect::Score));
                effects.push(Effect::burst(blender_pos(input.view), palette::GOOD, 12));
            }
        } else {
            next.timer -= WRONG_PENALTY;
            next.streak = 0;
            next.recipe_no += 1;
            next.roll_recipe();
            effects.push(Effect::Sound(SoundEffect::Mismatch));
            effects.push(Effect::burst(input.pointer, palette::BAD, 6));
        }
    }

    if next.smoothies >= WIN_SMOOTHIES || next.timer <= 0.0 {
        next.timer = next.timer.max(0.0);
        next.bonus = 4 * next.timer.ceil() as u32 + 25 * next.best_streak;
        next.phase = GamePhase::Finished;
        effects.push(Effect::Sound(if next.smoothies >= WIN_SMOOTHIES {
            SoundEffect::Win
        } else {
            SoundEffect::Lose
        }));
    }

    (next, effects)
}

pub fn render(surface: &mut dyn Surface, slice: &SmoothieSlice, frame: u64) {
    let view = surface.size();
    draw_hud(surface, "Smoothie Bar", slice.score, slice.timer.max(0.0));

    if slice.phase == GamePhase::Finished {
        draw_summary(
            surface,
            "Bar closed!",
            &[
                format!("{} smoothies served", slice.smoothies),
                format!("Best streak {}", slice.best_streak),
            ],
            slice.final_score(),
        );
        return;
    }

    // Recipe ticket.
    let ticket = Rect::new(view.x / 2.0 - 170.0, 70.0, 340.0, 60.0);
    ui::draw_panel(surface, ticket);
    for (i, &ing) in slice.recipe.iter().enumerate() {
        let x = ticket.x + 50.0 + i as f32 * 70.0;
        let done = i < slice.progress;
        let color = if done {
            INGREDIENT_COLORS[ing as usize]
        } else {
            INGREDIENT_COLORS[ing as usize].with_alpha(0.35)
        };
        surface.fill_circle(Vec2::new(x, ticket.y + 24.0), 14.0, color);
        if done {
            surface.stroke_circle(Vec2::new(x, ticket.y + 24.0), 17.0, palette::GOOD, 2.0);
        }
        surface.text(
            INGREDIENT_NAMES[ing as usize],
            Vec2::new(x, ticket.y + 52.0),
            11.0,
            palette::DIM,
            Align::Center,
        );
    }

    // Blender fills as the recipe progresses.
    let pos = blender_pos(view);
    let body = Rect::centered(pos, 90.0, 130.0);
    surface.stroke_rect(body, palette::INK, 3.0);
    let fill = slice.progress as f32 / RECIPE_LEN as f32;
    let shake = if slice.progress > 0 {
        (frame as f32 * 0.4).sin() * 2.0
    } else {
        0.0
    };
    surface.fill_rect(
        Rect::new(
            body.x + 4.0 + shake,
            body.y + body.h * (1.0 - fill) + 4.0,
            body.w - 8.0,
            (body.h * fill - 8.0).max(0.0),
        ),
        palette::ACCENT.with_alpha(0.8),
    );

    for i in 0..INGREDIENT_COUNT {
        let rect = ingredient_rect(view, i);
        surface.fill_rect(rect, palette::PANEL);
        surface.stroke_rect(rect, INGREDIENT_COLORS[i], 2.0);
        surface.fill_circle(
            Vec2::new(rect.center().x, rect.y + 26.0),
            12.0,
            INGREDIENT_COLORS[i],
        );
        surface.text(
            &format!("{} [{}]", INGREDIENT_NAMES[i], i + 1),
            Vec2::new(rect.center().x, rect.y + rect.h - 12.0),
            12.0,
            palette::INK,
            Align::Center,
        );
    }

    surface.text(
        &format!("Served {}/{}  Streak {}", slice.smoothies, WIN_SMOOTHIES, slice.streak),
        Vec2::new(view.x / 2.0, view.y - 24.0),
        15.0,
        palette::DIM,
        Align::Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u64) -> SmoothieSlice {
        let (slice, _) = step(&SmoothieSlice::with_seed(seed), &InputState::new(), 0.0);
        slice
    }

    fn click_ingredient(slice: &SmoothieSlice, index: usize) -> (SmoothieSlice, Vec<Effect>) {
        let mut input = InputState::new();
        input.clicked = true;
        input.pointer = ingredient_rect(input.view, index).center();
        step(slice, &input, 1.0 / 60.0)
    }

    fn blend_one(mut slice: SmoothieSlice) -> SmoothieSlice {
        for step_no in 0..RECIPE_LEN {
            let ing = slice.recipe[step_no] as usize;
            let (next, _) = click_ingredient(&slice, ing);
            slice = next;
        }
        slice
    }

    #[test]
    fn test_full_recipe_serves_a_smoothie() {
        let slice = blend_one(started(5));
        assert_eq!(slice.smoothies, 1);
        assert_eq!(slice.score, SCORE_PER_SMOOTHIE);
        assert_eq!(slice.progress, 0, "fresh recipe after serving");
        assert_eq!(slice.streak, 1);
    }

    #[test]
    fn test_wrong_ingredient_resets_progress_and_burns_time() {
        let slice = started(5);
        let good = slice.recipe[0] as usize;
        let (slice, _) = click_ingredient(&slice, good);
        assert_eq!(slice.progress, 1);

        let wrong = (0..INGREDIENT_COUNT)
            .find(|&i| i as u8 != slice.recipe[slice.progress])
            .unwrap();
        let timer_before = slice.timer;
        let (slice, fx) = click_ingredient(&slice, wrong);
        assert_eq!(slice.progress, 0);
        assert_eq!(slice.streak, 0);
        assert!(slice.timer <= timer_before - WRONG_PENALTY);
        assert!(fx.contains(&Effect::Sound(SoundEffect::Mismatch)));
    }

    #[test]
    fn test_five_smoothies_finish_with_streak_bonus() {
        let mut slice = started(8);
        for _ in 0..WIN_SMOOTHIES {
            slice = blend_one(slice);
        }
        assert_eq!(slice.phase, GamePhase::Finished);
        assert_eq!(slice.best_streak, WIN_SMOOTHIES);
        assert!(slice.bonus >= 25 * WIN_SMOOTHIES);
    }

    #[test]
    fn test_digit_key_picks_ingredient() {
        let slice = started(13);
        let ing = slice.recipe[0];
        let key = ((b'1' + ing) as char).to_string();
        let mut input = InputState::new();
        input.key_down(&key);
        let (next, _) = step(&slice, &input, 1.0 / 60.0);
        assert_eq!(next.progress, 1);
    }
}
