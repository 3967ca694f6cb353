//! Reference particle
//!
//! Groups are generic over their particle type; `BasicParticle` is the
//! ready-made choice for effects that only need motion, mass and a lifetime.

use super::traits::{Aging, Kinematic, Particle};
use cgmath::{Vector3, Zero};

/// Individual particle data
#[derive(Clone, Debug, PartialEq)]
pub struct BasicParticle {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub mass: f32,
    /// Remaining life points; the particle dies at zero
    pub life: f32,
    /// Life points at spawn
    pub max_life: f32,
    pub size: f32,
    pub color: [f32; 4],
}

impl Default for BasicParticle {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            velocity: Vector3::zero(),
            mass: 1.0,
            life: 1.0,
            max_life: 1.0,
            size: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl BasicParticle {
    /// Create a particle at `position` with `life` life points
    pub fn new(position: Vector3<f32>, life: f32) -> Self {
        Self {
            position,
            life,
            max_life: life,
            ..Default::default()
        }
    }

    /// Sets the initial velocity
    pub fn with_velocity(mut self, velocity: Vector3<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Fraction of life consumed, from 0.0 at spawn to 1.0 at death
    #[inline]
    pub fn age_percent(&self) -> f32 {
        if self.max_life > 0.0 {
            (1.0 - self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

impl Particle for BasicParticle {
    fn update(&mut self, scaled_delta: f32) -> bool {
        self.life -= scaled_delta;
        self.life > 0.0
    }
}

impl Aging for BasicParticle {
    fn remaining_life(&self) -> f32 {
        self.life
    }
}

impl Kinematic for BasicParticle {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.velocity = velocity;
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}
