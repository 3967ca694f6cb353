//! Reference drivers
//!
//! Ready-made [`ParticleDriver`] implementations: a rate-based [`Emitter`],
//! [`ForceField`]s that accelerate [`Kinematic`] particles and a [`Motion`]
//! integrator that moves them.
//!
//! ```no_run
//! use vfx_groups::prelude::*;
//!
//! let sparks = ParticleGroup::new("sparks", 256)
//!     .with_driver(Emitter::new(40.0, 7, |position, _rng| BasicParticle::new(position, 2.0)).unwrap())
//!     .with_driver(ForceField::gravity(Vector3::new(0.0, 0.0, -9.8)))
//!     .with_driver(Motion::default());
//! ```

use super::group::{GroupContext, GroupStatus};
use super::traits::{Kinematic, Particle, ParticleDriver};
use crate::error::{ensure_non_negative, Error, Result};
use cgmath::{InnerSpace, Vector3, Zero};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

type Factory<T> = Box<dyn FnMut(Vector3<f32>, &mut StdRng) -> T>;

/// Spawns particles at a steady rate from the group's emission volume
///
/// Fractional particles carry over between frames, so a rate of 2.5 per
/// second spawns 5 particles over 2 seconds regardless of frame size.
/// Nothing is spawned while the group is inside its initial delay. Without
/// dynamic sizing a single frame never builds more particles than the group's
/// capacity.
pub struct Emitter<T> {
    rate: f32,
    accumulator: f32,
    pending_burst: usize,
    rng: StdRng,
    factory: Factory<T>,
}

impl<T> Emitter<T> {
    /// Create an emitter
    ///
    /// # Arguments
    /// * `rate` - Particles per second
    /// * `seed` - Seed for the emitter's own generator
    /// * `factory` - Builds a particle from a sampled spawn position
    pub fn new<F>(rate: f32, seed: u64, factory: F) -> Result<Self>
    where
        F: FnMut(Vector3<f32>, &mut StdRng) -> T + 'static,
    {
        ensure_non_negative("emission rate", rate)?;
        Ok(Self {
            rate,
            accumulator: 0.0,
            pending_burst: 0,
            rng: StdRng::seed_from_u64(seed),
            factory: Box::new(factory),
        })
    }

    /// Particles per second
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Sets the emission rate
    ///
    /// # Errors
    /// If `rate` is negative or not finite
    pub fn set_rate(&mut self, rate: f32) -> Result<()> {
        ensure_non_negative("emission rate", rate)?;
        self.rate = rate;
        Ok(())
    }

    /// Queue `count` extra particles for the next frame
    pub fn burst(&mut self, count: usize) {
        self.pending_burst += count;
    }
}

impl<T: Particle> ParticleDriver<T> for Emitter<T> {
    fn update_group(&mut self, group: &mut GroupContext<'_, T>, tpf: f32) {
        if group.in_delay_zone() {
            return;
        }
        self.accumulator += self.rate * tpf;
        let whole = self.accumulator.floor();
        self.accumulator -= whole;
        let mut count = whole as usize + std::mem::take(&mut self.pending_burst);
        if group.dynamic_sizing_step().is_none() {
            // A batch can never retain more than the capacity
            count = count.min(group.capacity());
        }
        if count == 0 {
            return;
        }

        let spawned: Vec<T> = (0..count)
            .map(|_| {
                let position = group.sample_position(&mut self.rng);
                (self.factory)(position, &mut self.rng)
            })
            .collect();
        let accepted = group.add_all(spawned);
        if accepted < count {
            debug!(
                "emitter in '{}': {} of {} particles accepted",
                group.name(),
                accepted,
                count
            );
        }
    }

    fn group_reset(&mut self, _group: &GroupStatus) {
        self.accumulator = 0.0;
        self.pending_burst = 0;
    }

    fn name(&self) -> &str {
        "emitter"
    }
}

/// Force field types for particle simulation
#[derive(Clone, Debug, PartialEq)]
pub enum ForceField {
    /// Uniform force applied to all particles
    Uniform { force: Vector3<f32> },
    /// Gravity, independent of mass
    Gravity { acceleration: Vector3<f32> },
    /// Point attractor/repulsor with inverse-square falloff
    Point {
        position: Vector3<f32>,
        strength: f32,
    },
    /// Radial force (explosion/implosion)
    Radial { center: Vector3<f32>, strength: f32 },
    /// Vortex force (spiral)
    Vortex {
        center: Vector3<f32>,
        axis: Vector3<f32>,
        strength: f32,
    },
}

impl ForceField {
    /// Constant force, divided by each particle's mass
    pub fn uniform(force: Vector3<f32>) -> Self {
        Self::Uniform { force }
    }

    /// Constant acceleration
    pub fn gravity(acceleration: Vector3<f32>) -> Self {
        Self::Gravity { acceleration }
    }

    pub fn point(position: Vector3<f32>, strength: f32) -> Self {
        Self::Point { position, strength }
    }

    pub fn radial(center: Vector3<f32>, strength: f32) -> Self {
        Self::Radial { center, strength }
    }

    /// Vortex around `axis` through `center`
    ///
    /// # Errors
    /// If `axis` has zero length
    pub fn vortex(center: Vector3<f32>, axis: Vector3<f32>, strength: f32) -> Result<Self> {
        if axis.magnitude2() <= f32::EPSILON {
            return Err(Error::InvalidParameter(
                "vortex axis must not be zero".to_string(),
            ));
        }
        Ok(Self::Vortex {
            center,
            axis: axis.normalize(),
            strength,
        })
    }

    /// Acceleration this field imparts on a particle
    pub fn acceleration(&self, position: Vector3<f32>, mass: f32) -> Vector3<f32> {
        let force = match self {
            ForceField::Uniform { force } => *force,
            ForceField::Gravity { acceleration } => return *acceleration,
            ForceField::Point {
                position: attractor,
                strength,
            } => {
                let direction = *attractor - position;
                let distance = direction.magnitude();
                if distance > 0.001 {
                    direction.normalize() * (*strength / (distance * distance))
                } else {
                    Vector3::zero()
                }
            }
            ForceField::Radial { center, strength } => {
                let direction = position - *center;
                let distance = direction.magnitude();
                if distance > 0.001 {
                    direction.normalize() * (*strength / distance)
                } else {
                    Vector3::zero()
                }
            }
            ForceField::Vortex {
                center,
                axis,
                strength,
            } => {
                let to_particle = position - *center;
                let radial = to_particle - axis.dot(to_particle) * *axis;
                let tangent = axis.cross(radial);
                if tangent.magnitude2() > 0.0 {
                    tangent.normalize() * (*strength / (radial.magnitude() + 0.001))
                } else {
                    Vector3::zero()
                }
            }
        };
        if mass > 0.0 {
            force / mass
        } else {
            Vector3::zero()
        }
    }
}

impl<T: Particle + Kinematic> ParticleDriver<T> for ForceField {
    fn update_particle(&mut self, particle: &mut T, tpf: f32) {
        let acceleration = self.acceleration(particle.position(), particle.mass());
        particle.set_velocity(particle.velocity() + acceleration * tpf);
    }

    fn name(&self) -> &str {
        "force_field"
    }
}

/// Moves particles along their velocity
///
/// Add it after any force fields so that velocity changes land in the same frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    /// Fraction of velocity kept per second
    damping: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self { damping: 1.0 }
    }
}

impl Motion {
    pub fn with_damping(damping: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&damping) {
            return Err(Error::InvalidParameter(format!(
                "damping must be within [0, 1], got {damping}"
            )));
        }
        Ok(Self { damping })
    }

    /// Fraction of velocity kept per second
    pub fn damping(&self) -> f32 {
        self.damping
    }
}

impl<T: Particle + Kinematic> ParticleDriver<T> for Motion {
    fn update_particle(&mut self, particle: &mut T, tpf: f32) {
        let mut velocity = particle.velocity();
        if self.damping < 1.0 {
            velocity *= self.damping.powf(tpf);
            particle.set_velocity(velocity);
        }
        particle.set_position(particle.position() + velocity * tpf);
    }

    fn name(&self) -> &str {
        "motion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::emission::{EmissionSphere, Placement};
    use crate::simulation::group::ParticleGroup;
    use crate::simulation::overflow::CullOldest;
    use crate::simulation::particle::BasicParticle;
    use std::cell::Cell;
    use std::rc::Rc;

    fn emitter(rate: f32, seed: u64) -> Emitter<BasicParticle> {
        Emitter::new(rate, seed, |position, _rng| BasicParticle::new(position, 100.0)).unwrap()
    }

    #[test]
    fn test_emitter_carries_fractions() {
        let mut group = ParticleGroup::new("emit", 64).with_driver(emitter(2.5, 1));
        group.step(true, 0.5, 1.0);
        assert_eq!(group.size(), 1);
        group.step(true, 0.5, 1.0);
        assert_eq!(group.size(), 2);
        group.step(true, 1.0, 1.0);
        assert_eq!(group.size(), 5);
    }

    #[test]
    fn test_emitter_respects_capacity() {
        let mut group = ParticleGroup::new("small", 3).with_driver(emitter(100.0, 1));
        group.step(true, 1.0, 1.0);
        assert_eq!(group.size(), 3);
    }

    #[test]
    fn test_emitter_builds_at_most_capacity_per_frame() {
        let built = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&built);
        let e = Emitter::new(1.0e9, 4, move |position, _rng| {
            counter.set(counter.get() + 1);
            BasicParticle::new(position, 100.0)
        })
        .unwrap();
        let mut group = ParticleGroup::new("flood", 3).with_overflow_strategy(CullOldest);
        group.add_driver(e);

        group.step(true, 1.0, 1.0);
        assert_eq!(built.get(), 3);
        assert_eq!(group.size(), 3);

        // A full group still turns over with an evicting policy
        group.step(true, 1.0, 1.0);
        assert_eq!(built.get(), 6);
        assert_eq!(group.size(), 3);
    }

    #[test]
    fn test_emitter_waits_for_delay() {
        let mut group = ParticleGroup::new("late", 16).with_driver(emitter(10.0, 1));
        group.set_initial_delay(1.0).unwrap();
        group.step(true, 0.5, 1.0);
        assert!(group.is_empty());
        group.step(true, 1.0, 1.0);
        assert_eq!(group.size(), 10);
    }

    #[test]
    fn test_burst_and_reset() {
        let mut e = emitter(0.0, 3);
        e.burst(4);
        let mut group = ParticleGroup::new("burst", 16).with_driver(e);
        group.step(true, 0.1, 1.0);
        assert_eq!(group.size(), 4);
        assert!(group.reset());
        group.step(true, 0.1, 1.0);
        assert!(group.is_empty());
    }

    #[test]
    fn test_same_seed_same_positions() {
        let build = || {
            ParticleGroup::new("seeded", 8)
                .with_volume(EmissionSphere::new(3.0).unwrap())
                .with_placement(Placement::at(Vector3::new(1.0, 2.0, 3.0)))
                .with_driver(emitter(8.0, 99))
        };
        let mut a = build();
        let mut b = build();
        a.step(true, 1.0, 1.0);
        b.step(true, 1.0, 1.0);
        assert_eq!(a.size(), 8);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(Emitter::new(-1.0, 0, |p, _rng| BasicParticle::new(p, 1.0)).is_err());
    }

    #[test]
    fn test_gravity_and_motion() {
        let mut group = ParticleGroup::new("falling", 4)
            .with_driver(ForceField::gravity(Vector3::new(0.0, 0.0, -10.0)))
            .with_driver(Motion::default());
        assert!(group.add(BasicParticle::new(Vector3::zero(), 10.0)));

        group.step(true, 0.5, 1.0);
        let p = &group.particles()[0];
        assert_eq!(p.velocity, Vector3::new(0.0, 0.0, -5.0));
        assert_eq!(p.position, Vector3::new(0.0, 0.0, -2.5));
    }

    #[test]
    fn test_uniform_force_scales_with_mass() {
        let field = ForceField::uniform(Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(
            field.acceleration(Vector3::zero(), 2.0),
            Vector3::new(2.0, 0.0, 0.0)
        );
        assert_eq!(field.acceleration(Vector3::zero(), 0.0), Vector3::zero());
    }

    #[test]
    fn test_point_attracts() {
        let field = ForceField::point(Vector3::new(2.0, 0.0, 0.0), 8.0);
        let a = field.acceleration(Vector3::zero(), 1.0);
        assert!((a.x - 2.0).abs() < 1e-5);
        assert_eq!(field.acceleration(Vector3::new(2.0, 0.0, 0.0), 1.0), Vector3::zero());
    }

    #[test]
    fn test_vortex_is_tangential() {
        assert!(ForceField::vortex(Vector3::zero(), Vector3::zero(), 1.0).is_err());
        let field = ForceField::vortex(Vector3::zero(), Vector3::new(0.0, 0.0, 2.0), 1.0).unwrap();
        let a = field.acceleration(Vector3::new(1.0, 0.0, 0.0), 1.0);
        assert!(a.x.abs() < 1e-5);
        assert!(a.y > 0.0);
        assert_eq!(field.acceleration(Vector3::new(0.0, 0.0, 5.0), 1.0), Vector3::zero());
    }

    #[test]
    fn test_damping() {
        assert!(Motion::with_damping(1.5).is_err());
        let mut motion = Motion::with_damping(0.5).unwrap();
        let mut p = BasicParticle::new(Vector3::zero(), 1.0).with_velocity(Vector3::new(4.0, 0.0, 0.0));
        ParticleDriver::<BasicParticle>::update_particle(&mut motion, &mut p, 1.0);
        assert_eq!(p.velocity, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(p.position, Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_driver_names() {
        let group = ParticleGroup::new("named", 1)
            .with_driver(emitter(1.0, 0))
            .with_driver(ForceField::gravity(Vector3::zero()))
            .with_driver(Motion::default());
        let names: Vec<&str> = group.drivers().iter().map(|d| d.name()).collect();
        assert_eq!(names, ["emitter", "force_field", "motion"]);
    }
}
