//! Particle effects
//!
//! Ephemeral visual-only entities. Spawning is randomized from a seeded PCG
//! stream so a given seed replays identically; integration is a pure filter
//! the orchestrator applies once per frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::surface::{Color, Surface};

/// Soft cap on live particles. Decay already bounds lifetime; the cap bounds
/// worst-case frame cost when many spawns land in one frame.
pub const MAX_PARTICLES: usize = 500;

/// Integration rule selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Radial pop, medium decay.
    Burst,
    /// Feels gravity, damps fast, decays fast.
    Trail,
    /// Rises and wobbles, decays slow.
    Float,
}

impl ParticleKind {
    /// Life lost per second.
    fn decay(self) -> f32 {
        match self {
            ParticleKind::Burst => 1.2,
            ParticleKind::Trail => 2.0,
            ParticleKind::Float => 0.8,
        }
    }

    /// Per-tick velocity damping factor at a 60 Hz reference rate.
    fn damping(self) -> f32 {
        match self {
            ParticleKind::Burst => 0.92,
            ParticleKind::Trail => 0.85,
            ParticleKind::Float => 0.97,
        }
    }

    /// Initial speed range (uniform).
    fn speed_range(self) -> (f32, f32) {
        match self {
            ParticleKind::Burst => (60.0, 220.0),
            ParticleKind::Trail => (20.0, 90.0),
            ParticleKind::Float => (10.0, 40.0),
        }
    }
}

/// One transient visual entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Color,
    /// Remaining life in (0, 1], starts at 1.
    pub life: f32,
    /// Life lost per second.
    pub decay: f32,
    pub kind: ParticleKind,
}

/// Owns the live collection and the spawn RNG.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Append one particle with randomized velocity. Past the soft cap the
    /// oldest particle is dropped.
    pub fn spawn(&mut self, pos: Vec2, color: Color, kind: ParticleKind) {
        let (lo, hi) = kind.speed_range();
        let speed = self.rng.random_range(lo..hi);
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let size = self.rng.random_range(2.0..5.5);
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            size,
            color,
            life: 1.0,
            decay: kind.decay(),
            kind,
        });
    }

    /// Borrow the spawn stream for callers that randomize spawn points.
    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Spawn `count` particles of the same kind at one point.
    pub fn spawn_burst(&mut self, pos: Vec2, color: Color, kind: ParticleKind, count: usize) {
        for _ in 0..count {
            self.spawn(pos, color, kind);
        }
    }

    /// Integrate the collection and keep only survivors.
    pub fn update(&mut self, dt: f32) {
        self.particles = integrate(std::mem::take(&mut self.particles), dt);
    }
}

/// Repeated f32 subtraction can leave an expired particle a few ULPs above
/// zero; anything at or below this counts as dead.
const LIFE_EPSILON: f32 = 1e-5;

/// Advance every particle by `dt` and return the surviving subset
/// (life > 0). Pure transformation so the rule is testable in isolation.
pub fn integrate(particles: Vec<Particle>, dt: f32) -> Vec<Particle> {
    particles
        .into_iter()
        .filter_map(|mut p| {
            p.pos += p.vel * dt;
            p.vel *= p.kind.damping().powf(dt * 60.0);
            match p.kind {
                ParticleKind::Trail => {
                    p.vel.y += 240.0 * dt;
                }
                ParticleKind::Float => {
                    p.vel.y -= 30.0 * dt;
                    p.vel.x += (p.life * 12.0).sin() * 20.0 * dt;
                }
                ParticleKind::Burst => {}
            }
            p.life -= p.decay * dt;
            (p.life > LIFE_EPSILON).then_some(p)
        })
        .collect()
}

/// Draw each particle as a filled circle with alpha = life. Read-only.
pub fn render(surface: &mut dyn Surface, particles: &[Particle]) {
    for p in particles {
        surface.fill_circle(p.pos, p.size * p.life.max(0.0).sqrt(), p.color.with_alpha(p.life));
    }
}
