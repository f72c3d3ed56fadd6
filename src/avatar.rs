//! Procedural member portraits.
//!
//! Every avatar derives from a seed, so the same member always gets the
//! same face. This is also the fallback when character art fails to load:
//! the game never shows a blank where a portrait belongs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::surface::{Color, Rect, Surface};

const SKIN_TONES: [Color; 4] = [
    Color::rgb(250, 215, 180),
    Color::rgb(225, 180, 140),
    Color::rgb(180, 130, 95),
    Color::rgb(120, 85, 60),
];

const SHIRT_COLORS: [Color; 6] = [
    Color::rgb(230, 90, 80),
    Color::rgb(80, 160, 230),
    Color::rgb(90, 200, 130),
    Color::rgb(240, 190, 70),
    Color::rgb(170, 120, 220),
    Color::rgb(240, 140, 180),
];

const HAIR_COLORS: [Color; 4] = [
    Color::rgb(50, 40, 35),
    Color::rgb(140, 95, 50),
    Color::rgb(220, 190, 120),
    Color::rgb(120, 120, 125),
];

/// Draw a seeded portrait filling `rect`.
pub fn draw_avatar(surface: &mut dyn Surface, rect: Rect, seed: u64) {
    let mut rng = Pcg32::seed_from_u64(seed.wrapping_mul(0xDA94_2042_E4DD_58B5));
    let skin = SKIN_TONES[rng.random_range(0..SKIN_TONES.len())];
    let shirt = SHIRT_COLORS[rng.random_range(0..SHIRT_COLORS.len())];
    let hair = HAIR_COLORS[rng.random_range(0..HAIR_COLORS.len())];
    let has_headband = rng.random_bool(0.4);
    let eye_spread = rng.random_range(0.16..0.24);

    let center = rect.center();
    let head_r = rect.w.min(rect.h) * 0.34;
    let head = Vec2::new(center.x, rect.y + rect.h * 0.38);

    // Shoulders, head, hair cap.
    surface.fill_rect(
        Rect::new(
            center.x - rect.w * 0.36,
            rect.y + rect.h * 0.66,
            rect.w * 0.72,
            rect.h * 0.34,
        ),
        shirt,
    );
    surface.fill_circle(head, head_r, skin);
    surface.fill_circle(
        head - Vec2::new(0.0, head_r * 0.55),
        head_r * 0.78,
        hair,
    );
    if has_headband {
        surface.fill_rect(
            Rect::new(
                head.x - head_r * 0.9,
                head.y - head_r * 0.55,
                head_r * 1.8,
                head_r * 0.28,
            ),
            shirt,
        );
    }

    // Eyes and smile.
    let eye_y = head.y + head_r * 0.05;
    let eye_dx = rect.w * eye_spread;
    surface.fill_circle(Vec2::new(head.x - eye_dx, eye_y), head_r * 0.1, Color::rgb(30, 30, 35));
    surface.fill_circle(Vec2::new(head.x + eye_dx, eye_y), head_r * 0.1, Color::rgb(30, 30, 35));
    surface.line(
        Vec2::new(head.x - head_r * 0.3, head.y + head_r * 0.45),
        Vec2::new(head.x + head_r * 0.3, head.y + head_r * 0.45),
        Color::rgb(30, 30, 35),
        2.0,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullSurface;

    #[test]
    fn test_draw_avatar_handles_any_seed() {
        let mut surface = NullSurface::new(200.0, 200.0);
        for seed in [0, 1, u64::MAX, 0xDEAD_BEEF] {
            draw_avatar(&mut surface, Rect::new(10.0, 10.0, 100.0, 100.0), seed);
        }
    }
}
