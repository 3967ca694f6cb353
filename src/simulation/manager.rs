//! Group tree for the particle simulation
//!
//! Owns every [`ParticleGroup`] in an arena, links them into parent/child
//! trees and drives the per-frame update from the roots down.

use super::group::ParticleGroup;
use super::traits::Particle;
use crate::error::{Error, Result};
use log::{debug, trace};
use std::fmt;

/// Handle to a group inside a [`GroupTree`]
///
/// Handles are generational: once a group is removed its handle stays invalid
/// even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId {
    index: u32,
    generation: u32,
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}v{}", self.index, self.generation)
    }
}

/// Frame bookkeeping (for debugging/statistics)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub step_count: u64,
    pub delta_accumulator: f32,
}

impl FrameStats {
    /// Record a simulation step
    pub fn record_step(&mut self, delta_time: f32) {
        self.step_count += 1;
        self.delta_accumulator += delta_time;
    }

    /// Get average frame time over the tree's lifetime
    pub fn average_frame_time(&self) -> f32 {
        if self.step_count > 0 {
            self.delta_accumulator / self.step_count as f32
        } else {
            0.0
        }
    }

    /// Get simulation frequency (steps per second)
    pub fn frequency(&self) -> f32 {
        let avg = self.average_frame_time();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    /// Clear counters
    pub fn reset(&mut self) {
        self.step_count = 0;
        self.delta_accumulator = 0.0;
    }
}

struct Slot<T: Particle> {
    generation: u32,
    group: Option<ParticleGroup<T>>,
}

/// Arena of particle groups linked into trees
///
/// Parents reference children and children reference their parent by
/// [`GroupId`], so there is no ownership cycle. Structural changes take
/// `&mut self` and therefore cannot happen during an update pass.
pub struct GroupTree<T: Particle> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    roots: Vec<GroupId>,
    stats: FrameStats,
    fixed_timestep: Option<f32>, // For deterministic simulations
    accumulated_time: f32,
}

impl<T: Particle> Default for GroupTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Particle> GroupTree<T> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            stats: FrameStats::default(),
            fixed_timestep: None,
            accumulated_time: 0.0,
        }
    }

    /// Add a group to the arena as a new root
    pub fn insert(&mut self, mut group: ParticleGroup<T>) -> GroupId {
        group.parent = None;
        group.children.clear();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.group = Some(group);
                GroupId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    group: Some(group),
                });
                GroupId {
                    index,
                    generation: 0,
                }
            }
        };
        self.roots.push(id);
        id
    }

    /// Remove a group and drop its whole subtree
    ///
    /// # Returns
    /// The removed group, detached and without children
    pub fn remove(&mut self, id: GroupId) -> Result<ParticleGroup<T>> {
        self.detach(id)?;
        self.roots.retain(|&r| r != id);

        let mut group = self.take(id)?;
        let mut pending = std::mem::take(&mut group.children);
        while let Some(descendant) = pending.pop() {
            if let Ok(mut dropped) = self.take(descendant) {
                pending.append(&mut dropped.children);
            }
        }
        debug!("removed group '{}' ({})", group.name(), id);
        Ok(group)
    }

    fn take(&mut self, id: GroupId) -> Result<ParticleGroup<T>> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .ok_or(Error::UnknownGroup(id))?;
        let group = slot.group.take().ok_or(Error::UnknownGroup(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Ok(group)
    }

    /// Group behind `id`
    ///
    /// # Returns
    /// `None` if the id is stale or from another tree
    pub fn get(&self, id: GroupId) -> Option<&ParticleGroup<T>> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.group.as_ref())
    }

    /// Mutable access to the group behind `id`
    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut ParticleGroup<T>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.group.as_mut())
    }

    fn group(&self, id: GroupId) -> Result<&ParticleGroup<T>> {
        self.get(id).ok_or(Error::UnknownGroup(id))
    }

    fn group_mut(&mut self, id: GroupId) -> Result<&mut ParticleGroup<T>> {
        self.get_mut(id).ok_or(Error::UnknownGroup(id))
    }

    /// True if `id` refers to a live group
    pub fn contains(&self, id: GroupId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live groups
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.group.is_some()).count()
    }

    /// True if the tree holds no groups
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Groups without a parent, in insertion/detachment order
    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    /// Walk from the group's parent up to its root
    pub fn ancestors(&self, id: GroupId) -> impl Iterator<Item = GroupId> + '_ {
        std::iter::successors(self.get(id).and_then(|g| g.parent), move |&p| {
            self.get(p).and_then(|g| g.parent)
        })
    }

    /// Attach `child` beneath `parent`
    ///
    /// A child that already has a parent is detached from it first. Children
    /// are updated in attachment order.
    ///
    /// # Errors
    /// `UnknownGroup` for stale ids, `CyclicAttachment` if `child` is `parent`
    /// or one of its ancestors.
    pub fn attach(&mut self, parent: GroupId, child: GroupId) -> Result<()> {
        self.group(parent)?;
        self.group(child)?;
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(Error::CyclicAttachment { parent, child });
        }

        self.detach(child)?;
        self.roots.retain(|&r| r != child);
        self.group_mut(child)?.parent = Some(parent);
        self.group_mut(parent)?.children.push(child);
        debug!("attached {} beneath {}", child, parent);
        Ok(())
    }

    /// Detach `child` from its parent, making it a root
    ///
    /// # Returns
    /// `true` if the group had a parent
    pub fn detach(&mut self, child: GroupId) -> Result<bool> {
        let Some(parent) = self.group(child)?.parent else {
            return Ok(false);
        };
        if let Some(group) = self.get_mut(parent) {
            group.children.retain(|&c| c != child);
        }
        self.group_mut(child)?.parent = None;
        self.roots.push(child);
        debug!("detached {} from {}", child, parent);
        Ok(true)
    }

    /// Update every tree (called every frame)
    ///
    /// # Arguments
    /// * `delta_time` - Time elapsed since last frame in seconds
    pub fn update(&mut self, delta_time: f32) {
        if let Some(fixed_dt) = self.fixed_timestep {
            // Fixed timestep simulation for deterministic results
            self.accumulated_time += delta_time;

            while self.accumulated_time >= fixed_dt {
                self.tick(fixed_dt);
                self.accumulated_time -= fixed_dt;
            }
        } else {
            // Variable timestep
            self.tick(delta_time);
        }
    }

    fn tick(&mut self, tpf: f32) {
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.update_subtree(root, true, tpf, 1.0);
        }
        self.stats.record_step(tpf);
        trace!("tick {} ({} s)", self.stats.step_count, tpf);
    }

    /// Update one group, then each of its children with what it propagates
    fn update_subtree(&mut self, id: GroupId, update: bool, tpf: f32, decay: f32) {
        let Some(group) = self.get_mut(id) else {
            return;
        };
        let propagation = group.step(update, tpf, decay);

        let mut i = 0;
        while let Some(child) = self.get(id).and_then(|g| g.children.get(i).copied()) {
            self.update_subtree(
                child,
                propagation.world_play_state,
                propagation.tpf,
                propagation.decay,
            );
            i += 1;
        }
    }

    /// Enable fixed timestep mode
    ///
    /// # Arguments
    /// * `timestep` - Fixed timestep in seconds, or None for variable timestep
    pub fn set_fixed_timestep(&mut self, timestep: Option<f32>) -> Result<()> {
        if let Some(dt) = timestep {
            if !dt.is_finite() || dt <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "fixed timestep must be finite and > 0, got {dt}"
                )));
            }
        }
        self.fixed_timestep = timestep;
        self.accumulated_time = 0.0; // Reset accumulator
        Ok(())
    }

    /// Current fixed timestep, `None` in variable timestep mode
    pub fn fixed_timestep(&self) -> Option<f32> {
        self.fixed_timestep
    }

    /// Frame bookkeeping since creation or the last `reset_stats`
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Clear frame bookkeeping
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Reset a group and all of its descendants
    pub fn reset(&mut self, id: GroupId) -> Result<bool> {
        self.reset_with(id, true)
    }

    /// Reset a group, optionally cascading into its children
    ///
    /// Nothing happens if the group is not world-playing. Each child decides
    /// for itself based on its own world play state.
    ///
    /// # Returns
    /// Whether `id` itself was reset
    pub fn reset_with(&mut self, id: GroupId, reset_children: bool) -> Result<bool> {
        if !self.group_mut(id)?.reset() {
            return Ok(false);
        }
        if reset_children {
            let mut i = 0;
            while let Some(child) = self.get(id).and_then(|g| g.children.get(i).copied()) {
                self.reset_with(child, true)?;
                i += 1;
            }
        }
        Ok(true)
    }

    /// Product of this group's update speed and every ancestor's
    pub fn world_update_speed(&self, id: GroupId) -> Result<f32> {
        self.fold_chain(id, |g| g.update_speed(), |a, b| a * b)
    }

    /// Product of this group's decay rate and every ancestor's
    pub fn world_decay_rate(&self, id: GroupId) -> Result<f32> {
        self.fold_chain(id, |g| g.decay_rate(), |a, b| a * b)
    }

    /// Total seconds this group waits from system start, summed down the chain
    pub fn world_initial_delay(&self, id: GroupId) -> Result<f32> {
        self.fold_chain(id, |g| g.initial_delay(), |a, b| a + b)
    }

    fn fold_chain(
        &self,
        id: GroupId,
        value: impl Fn(&ParticleGroup<T>) -> f32,
        combine: impl Fn(f32, f32) -> f32,
    ) -> Result<f32> {
        let own = value(self.group(id)?);
        Ok(self
            .ancestors(id)
            .filter_map(|a| self.get(a))
            .fold(own, |acc, g| combine(acc, value(g))))
    }
}
