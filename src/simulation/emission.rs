//! Emission volumes
//!
//! An emission volume turns a placement transform into a spawn position.
//! Volumes never own a random generator; the caller passes one in so that
//! sampling stays deterministic under a seeded generator.

use crate::error::{ensure_finite, ensure_non_negative, Result};
use cgmath::{ElementWise, Quaternion, Rotation, Vector3, Zero};
use rand::{Rng, RngCore};
use std::f32::consts::TAU;
use std::fmt::Debug;

/// World placement of a group, supplied by the host scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    /// Non-uniform scale
    pub scale: Vector3<f32>,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: Vector3::zero(),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Placement {
    /// Identity placement translated to `translation`
    pub fn at(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Sets the non-uniform scale
    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the rotation
    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Scale then translate a local offset, ignoring rotation
    pub fn scale_and_translate(&self, local: Vector3<f32>) -> Vector3<f32> {
        local.mul_element_wise(self.scale) + self.translation
    }

    /// Full transform of a local offset: scale, rotate, translate
    pub fn transform_point(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.rotation
            .rotate_vector(local.mul_element_wise(self.scale))
            + self.translation
    }
}

/// Geometric sampler producing spawn positions
pub trait EmissionVolume: Debug {
    /// Produce one position for a new particle
    ///
    /// # Arguments
    /// * `placement` - World placement of the emitting group
    /// * `rng` - Generator to draw from
    fn sample(&self, placement: &Placement, rng: &mut dyn RngCore) -> Vector3<f32>;
}

/// Emits every particle from a single point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionPoint {
    pub offset: Vector3<f32>,
}

impl Default for EmissionPoint {
    fn default() -> Self {
        Self {
            offset: Vector3::zero(),
        }
    }
}

impl EmissionVolume for EmissionPoint {
    fn sample(&self, placement: &Placement, _rng: &mut dyn RngCore) -> Vector3<f32> {
        placement.scale_and_translate(self.offset)
    }
}

/// Emits from inside a sphere, an ellipsoid once non-uniform scale is applied
///
/// A uniformly distributed direction is scaled by a radius drawn uniformly
/// from `[0, radius]`, offset by `center`, then scaled and translated by the
/// placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionSphere {
    center: Vector3<f32>,
    radius: f32,
}

impl Default for EmissionSphere {
    fn default() -> Self {
        Self {
            center: Vector3::zero(),
            radius: 0.5,
        }
    }
}

impl EmissionSphere {
    /// Creates a sphere at the local origin
    pub fn new(radius: f32) -> Result<Self> {
        Self::with_center(Vector3::zero(), radius)
    }

    /// Creates a sphere around a local center
    pub fn with_center(center: Vector3<f32>, radius: f32) -> Result<Self> {
        ensure_non_negative("sphere radius", radius)?;
        ensure_finite("sphere center x", center.x)?;
        ensure_finite("sphere center y", center.y)?;
        ensure_finite("sphere center z", center.z)?;
        Ok(Self { center, radius })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        ensure_non_negative("sphere radius", radius)?;
        self.radius = radius;
        Ok(())
    }

    pub fn center(&self) -> Vector3<f32> {
        self.center
    }

    pub fn set_center(&mut self, center: Vector3<f32>) {
        self.center = center;
    }
}

impl EmissionVolume for EmissionSphere {
    fn sample(&self, placement: &Placement, rng: &mut dyn RngCore) -> Vector3<f32> {
        let direction = unit_vector(rng);
        let distance = rng.random::<f32>() * self.radius;
        placement.scale_and_translate(self.center + direction * distance)
    }
}

/// Emits uniformly from inside an oriented box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionBox {
    half_extents: Vector3<f32>,
}

impl EmissionBox {
    /// Creates a box spanning `[-half_extents, half_extents]` locally
    pub fn new(half_extents: Vector3<f32>) -> Result<Self> {
        ensure_non_negative("box half extent x", half_extents.x)?;
        ensure_non_negative("box half extent y", half_extents.y)?;
        ensure_non_negative("box half extent z", half_extents.z)?;
        Ok(Self { half_extents })
    }

    pub fn half_extents(&self) -> Vector3<f32> {
        self.half_extents
    }
}

impl EmissionVolume for EmissionBox {
    fn sample(&self, placement: &Placement, rng: &mut dyn RngCore) -> Vector3<f32> {
        let local = Vector3::new(
            (rng.random::<f32>() * 2.0 - 1.0) * self.half_extents.x,
            (rng.random::<f32>() * 2.0 - 1.0) * self.half_extents.y,
            (rng.random::<f32>() * 2.0 - 1.0) * self.half_extents.z,
        );
        placement.transform_point(local)
    }
}

/// Uniformly distributed direction on the unit sphere
pub fn unit_vector(rng: &mut dyn RngCore) -> Vector3<f32> {
    let z = rng.random::<f32>() * 2.0 - 1.0;
    let azimuth = rng.random::<f32>() * TAU;
    let ring = (1.0 - z * z).max(0.0).sqrt();
    Vector3::new(ring * azimuth.cos(), ring * azimuth.sin(), z)
}
