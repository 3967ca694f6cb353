//! # VFX Groups Prelude
//!
//! Commonly used types and traits in one import.
//!
//! ```rust
//! use vfx_groups::prelude::*;
//!
//! let mut tree: GroupTree<BasicParticle> = GroupTree::new();
//! let root = tree.insert(ParticleGroup::new("root", 16));
//! tree.update(1.0 / 60.0);
//! assert!(tree.get(root).is_some());
//! ```

// Errors
pub use crate::error::{Error, Result};

// Groups and trees
pub use crate::simulation::group::{GroupContext, GroupSettings, GroupStatus, ParticleGroup};
pub use crate::simulation::manager::{FrameStats, GroupId, GroupTree};

// Simulation contracts
pub use crate::simulation::traits::{Aging, Kinematic, OverflowStrategy, Particle, ParticleDriver};

// Building blocks
pub use crate::simulation::drivers::{Emitter, ForceField, Motion};
pub use crate::simulation::emission::{
    EmissionBox, EmissionPoint, EmissionSphere, EmissionVolume, Placement,
};
pub use crate::simulation::overflow::{CullLowestLife, CullNew, CullOldest};
pub use crate::simulation::particle::BasicParticle;

// Math
pub use cgmath::Vector3;
