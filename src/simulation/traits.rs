//! Core simulation traits for particle groups
//!
//! Defines the contracts a [`ParticleGroup`](super::group::ParticleGroup) consumes: the particles it ages,
//! the drivers it runs every frame and the policy it consults when it would
//! overflow its capacity.

use super::group::{GroupContext, GroupStatus};
use cgmath::Vector3;

/// A single simulated particle
///
/// The group treats particles as opaque apart from this one method.
pub trait Particle {
    /// Advance the particle's internal state
    ///
    /// # Arguments
    /// * `scaled_delta` - Frame time already multiplied by the effective decay rate
    ///
    /// # Returns
    /// `true` while the particle is alive. The group drops it as soon as this
    /// returns `false`.
    fn update(&mut self, scaled_delta: f32) -> bool;
}

/// Particles that can report how much life they have left
///
/// Needed by life-aware overflow policies such as
/// [`CullLowestLife`](super::overflow::CullLowestLife).
pub trait Aging: Particle {
    /// Remaining life points
    fn remaining_life(&self) -> f32;
}

/// Particles with a position and velocity that force drivers can push around
pub trait Kinematic {
    fn position(&self) -> Vector3<f32>;
    fn set_position(&mut self, position: Vector3<f32>);
    fn velocity(&self) -> Vector3<f32>;
    fn set_velocity(&mut self, velocity: Vector3<f32>);

    /// Inertia used to turn forces into accelerations
    fn mass(&self) -> f32 {
        1.0
    }
}

/// Behavior module hooked into a group's frame update and lifecycle events
///
/// Every hook has an empty default so drivers only implement what they need.
/// Drivers are run in registration order, front to back.
pub trait ParticleDriver<T: Particle> {
    /// Called once per frame before any particle is touched
    ///
    /// The group is fully accessible, so this is where emitters add particles.
    /// Particles added from here are announced through
    /// [`particle_added`](Self::particle_added) once this hook returns.
    ///
    /// # Arguments
    /// * `group` - The group this driver belongs to
    /// * `tpf` - Speed-scaled frame time (zero while in the delay zone)
    fn update_group(&mut self, _group: &mut GroupContext<'_, T>, _tpf: f32) {}

    /// Called for every live particle, every frame, before it ages
    fn update_particle(&mut self, _particle: &mut T, _tpf: f32) {}

    /// Called once for each particle the group accepts
    fn particle_added(&mut self, _group: &GroupStatus, _particle: &mut T) {}

    /// Called when the group is reset
    fn group_reset(&mut self, _group: &GroupStatus) {}

    /// Called whenever the group's capacity changes
    ///
    /// Collaborators that keep capacity-sized buffers must reallocate here.
    fn capacity_changed(&mut self, _group: &GroupStatus) {}

    /// Name used for lookup and diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Policy consulted when a group would exceed its capacity
pub trait OverflowStrategy<T> {
    /// Remove exactly one particle from `particles` if possible
    ///
    /// # Arguments
    /// * `particles` - The group's buffer, currently one over capacity
    /// * `offending` - Index of the particle that caused the overflow, or
    ///   `None` when the group is shrinking its capacity
    ///
    /// # Returns
    /// The index the removed particle occupied, or `None` if nothing was removed.
    fn remove_particle(&mut self, particles: &mut Vec<T>, offending: Option<usize>)
        -> Option<usize>;

    /// Name used for diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
