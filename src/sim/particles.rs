//! Particle bursts for brick hits and level clears

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Rgba;

/// Downward pull per tick
const PARTICLE_GRAVITY: f32 = 0.2;
/// Size multiplier per tick
const PARTICLE_SHRINK: f32 = 0.98;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    /// 0-1, decreases by `decay` each tick
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

impl Particle {
    pub fn new(pos: Vec2, color: Rgba, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-4.0..4.0), rng.random_range(-4.0..4.0)),
            color,
            life: 1.0,
            decay: rng.random_range(0.02..0.04),
            size: rng.random_range(2.0..5.0),
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life -= self.decay;
        self.size *= PARTICLE_SHRINK;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Emit `count` particles at `pos`, never exceeding `cap` live particles
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    pos: Vec2,
    color: Rgba,
    count: usize,
    cap: usize,
) {
    let room = cap.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        particles.push(Particle::new(pos, color, rng));
    }
}

/// Advance every particle and drop the expired ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.update();
    }
    particles.retain(|p| !p.is_dead());
}
