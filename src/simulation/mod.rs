// src/simulation/mod.rs
//! Simulation system
//!
//! Particle groups, the tree that updates them and the pluggable pieces they
//! are assembled from.

pub mod drivers;
pub mod emission;
pub mod group;
pub mod manager;
pub mod overflow;
pub mod particle;
pub mod traits;
