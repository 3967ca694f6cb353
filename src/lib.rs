// src/lib.rs
//! VFX Groups
//!
//! Hierarchical particle groups for visual effects: bounded particle buffers
//! driven by pluggable behavior modules, arranged in trees that propagate
//! time, play state and decay from parents to children.

pub mod error;
pub mod prelude;
pub mod simulation;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use simulation::group::ParticleGroup;
pub use simulation::manager::{GroupId, GroupTree};
