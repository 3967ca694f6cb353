//! # Particle Groups
//!
//! A [`ParticleGroup`] owns a bounded particle buffer, an ordered stack of
//! drivers, an overflow policy and an emission volume. It also carries the
//! timing and play state that a [`GroupTree`](super::manager::GroupTree)
//! propagates from parents to children every frame.
//!
//! ## Frame protocol
//!
//! ```text
//! step(update, tpf, decay)
//!   world_play_state = update && playing
//!   t     = tpf * update_speed
//!   time += t                      (only while world-playing)
//!   decay = decay * local decay
//!   if world-playing:
//!       driver.update_group(..)    for each driver, front to back
//!       for each particle:
//!           driver.update_particle(..)
//!           particle.update(t * rate)   -> dropped immediately when dead
//!   children receive (world_play_state, t, decay)
//! ```
//!
//! While the group's own time is inside its initial delay, its drivers and
//! particles see a zero frame time. Children still receive the unzeroed `t`.

use super::emission::{EmissionPoint, EmissionVolume, Placement};
use super::manager::GroupId;
use super::overflow::CullNew;
use super::traits::{OverflowStrategy, Particle, ParticleDriver};
use crate::error::{ensure_non_negative, Result};
use cgmath::Vector3;
use log::{debug, trace, warn};
use rand::RngCore;
use std::fmt;
use std::ops::Deref;

/// Group configuration
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSettings {
    /// Maximum number of particles; 0 accepts none
    pub capacity: usize,
    /// When set, capacity grows to `size + step` instead of invoking the overflow policy
    pub dynamic_sizing_step: Option<usize>,
    /// Multiplier on elapsed time
    pub update_speed: f32,
    /// Life points consumed per second
    pub decay_rate: f32,
    /// Seconds of accumulated time before drivers and particles advance
    pub initial_delay: f32,
    /// Decay particles with the rate compounded from every ancestor
    pub inherit_decay_rate: bool,
    /// Local play intent
    pub playing: bool,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            capacity: 0,
            dynamic_sizing_step: None,
            update_speed: 1.0,
            decay_rate: 1.0,
            initial_delay: 0.0,
            inherit_decay_rate: false,
            playing: true,
        }
    }
}

impl GroupSettings {
    /// Check every float field
    ///
    /// # Errors
    /// `Error::InvalidParameter` if speed, decay or delay is negative or not finite
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("update speed", self.update_speed)?;
        ensure_non_negative("decay rate", self.decay_rate)?;
        ensure_non_negative("initial delay", self.initial_delay)?;
        Ok(())
    }
}

/// Read-only snapshot of a group handed to driver lifecycle hooks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupStatus {
    pub capacity: usize,
    pub size: usize,
    /// Accumulated time, delay included
    pub raw_time: f32,
    pub world_play_state: bool,
}

/// Values a group hands down to each of its children after its own step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Propagation {
    pub world_play_state: bool,
    /// Speed-scaled frame time, not zeroed by this group's delay
    pub tpf: f32,
    /// Decay rate compounded with every ancestor
    pub decay: f32,
}

/// Notifications held back while the driver stack is checked out
#[derive(Debug, Default)]
struct Deferred {
    added: Vec<usize>,
    capacity_changed: bool,
}

/// Result of pushing one particle through the overflow logic
enum Admission {
    Accepted { index: usize, evicted: Option<usize> },
    Rejected,
}

/// A bounded collection of particles driven by a stack of drivers
pub struct ParticleGroup<T: Particle> {
    name: String,
    particles: Vec<T>,
    drivers: Vec<Box<dyn ParticleDriver<T>>>,
    overflow: Box<dyn OverflowStrategy<T>>,
    volume: Box<dyn EmissionVolume>,
    placement: Placement,
    capacity: usize,
    dynamic_sizing_step: Option<usize>,
    update_speed: f32,
    decay: f32,
    inherit_decay_rate: bool,
    time: f32,
    delay: f32,
    playing: bool,
    world_play_state: bool,
    pub(crate) parent: Option<GroupId>,
    pub(crate) children: Vec<GroupId>,
    deferred: Option<Deferred>,
}

impl<T: Particle> ParticleGroup<T> {
    /// Creates a playing group with default settings and the given capacity
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self::from_valid_settings(
            name.into(),
            GroupSettings {
                capacity,
                ..Default::default()
            },
        )
    }

    /// Creates a group from validated settings
    ///
    /// # Errors
    /// `Error::InvalidParameter` if a float setting is not finite or the delay is negative.
    pub fn with_settings(name: impl Into<String>, settings: GroupSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_valid_settings(name.into(), settings))
    }

    fn from_valid_settings(name: String, settings: GroupSettings) -> Self {
        Self {
            name,
            particles: Vec::with_capacity(settings.capacity),
            drivers: Vec::new(),
            overflow: Box::new(CullNew),
            volume: Box::new(EmissionPoint::default()),
            placement: Placement::default(),
            capacity: settings.capacity,
            dynamic_sizing_step: settings.dynamic_sizing_step,
            update_speed: settings.update_speed,
            decay: settings.decay_rate,
            inherit_decay_rate: settings.inherit_decay_rate,
            time: 0.0,
            delay: settings.initial_delay,
            playing: settings.playing,
            world_play_state: settings.playing,
            parent: None,
            children: Vec::new(),
            deferred: None,
        }
    }

    /// Sets the overflow policy
    pub fn with_overflow_strategy(mut self, overflow: impl OverflowStrategy<T> + 'static) -> Self {
        self.set_overflow_strategy(overflow);
        self
    }

    /// Sets the emission volume
    pub fn with_volume(mut self, volume: impl EmissionVolume + 'static) -> Self {
        self.set_volume(volume);
        self
    }

    /// Appends a driver to the driver stack
    pub fn with_driver(mut self, driver: impl ParticleDriver<T> + 'static) -> Self {
        self.add_driver(driver);
        self
    }

    /// Sets the world placement
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Advance this group by one frame
    ///
    /// Called by the tree with `update = true`, the real frame time and a decay
    /// of 1.0 for roots, and with the parent's [`Propagation`] for children.
    ///
    /// # Panics
    /// If the group holds more particles than its capacity. That can only be
    /// caused by a broken overflow policy or a bug in this module.
    pub fn step(&mut self, update: bool, tpf: f32, decay: f32) -> Propagation {
        assert!(
            self.particles.len() <= self.capacity,
            "internal error: group '{}' holds {} particles but its capacity is {}",
            self.name,
            self.particles.len(),
            self.capacity
        );

        self.world_play_state = update && self.playing;
        let t = tpf * self.update_speed;
        if self.world_play_state {
            self.time += t;
        }
        let decay = decay * self.decay;

        if self.world_play_state {
            let local_t = if self.in_delay_zone() { 0.0 } else { t };
            let rate = if self.inherit_decay_rate {
                decay
            } else {
                self.decay
            };
            self.update_particles(local_t, rate);
        }

        Propagation {
            world_play_state: self.world_play_state,
            tpf: t,
            decay,
        }
    }

    fn update_particles(&mut self, tpf: f32, decay: f32) {
        self.run_group_hooks(tpf);

        let before = self.particles.len();
        let drivers = &mut self.drivers;
        self.particles.retain_mut(|particle| {
            for driver in drivers.iter_mut() {
                driver.update_particle(particle, tpf);
            }
            particle.update(tpf * decay)
        });

        let expired = before - self.particles.len();
        if expired > 0 {
            trace!("group '{}': {} particles expired", self.name, expired);
        }
    }

    fn run_group_hooks(&mut self, tpf: f32) {
        if self.drivers.is_empty() {
            return;
        }
        let mut drivers = std::mem::take(&mut self.drivers);
        for i in 0..drivers.len() {
            self.deferred = Some(Deferred::default());
            drivers[i].update_group(&mut GroupContext { group: &mut *self }, tpf);
            if let Some(deferred) = self.deferred.take() {
                self.flush(&mut drivers, deferred);
            }
        }
        self.drivers = drivers;
    }

    fn flush(&mut self, drivers: &mut [Box<dyn ParticleDriver<T>>], deferred: Deferred) {
        let status = self.status();
        if deferred.capacity_changed {
            for driver in drivers.iter_mut() {
                driver.capacity_changed(&status);
            }
        }
        for index in deferred.added {
            if let Some(particle) = self.particles.get_mut(index) {
                for driver in drivers.iter_mut() {
                    driver.particle_added(&status, particle);
                }
            }
        }
    }

    /// Adds a particle to this group
    ///
    /// The group must be world-playing and have a nonzero capacity. If the add
    /// overflows the capacity, the group either grows (dynamic sizing) or asks
    /// its overflow policy to evict one particle. With the default
    /// [`CullNew`] policy the new particle is the one evicted.
    ///
    /// # Returns
    /// `true` if the particle is in the group after the call
    pub fn add(&mut self, particle: T) -> bool {
        if self.capacity == 0 || !self.world_play_state {
            return false;
        }
        match self.admit(particle) {
            Admission::Accepted { index, .. } => {
                self.announce(index);
                true
            }
            Admission::Rejected => false,
        }
    }

    /// Adds every particle in the collection
    ///
    /// A batch that fits is appended in one pass. Otherwise particles go through
    /// [`add`](Self::add)'s overflow logic one at a time.
    ///
    /// # Returns
    /// Number of particles from the batch still in the group afterwards
    pub fn add_all<I>(&mut self, particles: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        if self.capacity == 0 || !self.world_play_state {
            return 0;
        }
        let batch: Vec<T> = particles.into_iter().collect();
        let start = self.particles.len();

        if start + batch.len() <= self.capacity {
            let count = batch.len();
            self.particles.extend(batch);
            for index in start..start + count {
                self.announce(index);
            }
            return count;
        }

        // Particles before this boundary predate the batch
        let mut boundary = start;
        for particle in batch {
            if let Admission::Accepted { index, evicted } = self.admit(particle) {
                if matches!(evicted, Some(e) if e < boundary) {
                    boundary -= 1;
                }
                self.announce(index);
            }
        }
        self.particles.len() - boundary
    }

    /// Push one particle and resolve any overflow it causes
    fn admit(&mut self, particle: T) -> Admission {
        self.particles.push(particle);
        let index = self.particles.len() - 1;
        if self.particles.len() <= self.capacity {
            return Admission::Accepted {
                index,
                evicted: None,
            };
        }

        if let Some(step) = self.dynamic_sizing_step {
            self.capacity = self.particles.len() + step;
            debug!(
                "group '{}' grew to capacity {}",
                self.name, self.capacity
            );
            self.notify_capacity_changed();
            return Admission::Accepted {
                index,
                evicted: None,
            };
        }

        match self.overflow.remove_particle(&mut self.particles, Some(index)) {
            Some(evicted) if evicted == index => {
                trace!("group '{}' rejected a particle on overflow", self.name);
                Admission::Rejected
            }
            Some(evicted) => {
                self.forget_index(evicted);
                Admission::Accepted {
                    index: index - 1,
                    evicted: Some(evicted),
                }
            }
            None => {
                warn!(
                    "overflow policy '{}' freed nothing in group '{}'; rejecting the new particle",
                    self.overflow.name(),
                    self.name
                );
                self.particles.pop();
                Admission::Rejected
            }
        }
    }

    /// Tell drivers about an accepted particle, now or once the hook pass allows it
    fn announce(&mut self, index: usize) {
        if let Some(deferred) = self.deferred.as_mut() {
            deferred.added.push(index);
            return;
        }
        let status = self.status();
        let particle = &mut self.particles[index];
        for driver in self.drivers.iter_mut() {
            driver.particle_added(&status, particle);
        }
    }

    fn notify_capacity_changed(&mut self) {
        if let Some(deferred) = self.deferred.as_mut() {
            deferred.capacity_changed = true;
            return;
        }
        let status = self.status();
        for driver in self.drivers.iter_mut() {
            driver.capacity_changed(&status);
        }
    }

    /// Keep deferred notifications pointing at the right particles after a removal
    fn forget_index(&mut self, removed: usize) {
        if let Some(deferred) = self.deferred.as_mut() {
            deferred.added.retain(|&i| i != removed);
            for i in deferred.added.iter_mut() {
                if *i > removed {
                    *i -= 1;
                }
            }
        }
    }

    /// Removes the particle at `index`
    ///
    /// # Returns
    /// The removed particle, or `None` if the group is not world-playing or the
    /// index is out of range
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if !self.world_play_state || index >= self.particles.len() {
            return None;
        }
        self.forget_index(index);
        Some(self.particles.remove(index))
    }

    /// Removes the first particle equal to `particle`
    ///
    /// # Returns
    /// `true` if the particle existed and the group is world-playing
    pub fn remove_particle(&mut self, particle: &T) -> bool
    where
        T: PartialEq,
    {
        match self.particles.iter().position(|p| p == particle) {
            Some(index) => self.remove(index).is_some(),
            None => false,
        }
    }

    /// Removes every particle
    ///
    /// # Returns
    /// Number of particles removed; 0 when not world-playing
    pub fn clear_all_particles(&mut self) -> usize {
        if !self.world_play_state {
            return 0;
        }
        if let Some(deferred) = self.deferred.as_mut() {
            deferred.added.clear();
        }
        let count = self.particles.len();
        self.particles.clear();
        count
    }

    /// Appends a driver to the rear of the driver stack
    pub fn add_driver(&mut self, driver: impl ParticleDriver<T> + 'static) {
        self.add_driver_at(Box::new(driver), false);
    }

    /// Puts a driver at the front of the driver stack
    pub fn add_driver_front(&mut self, driver: impl ParticleDriver<T> + 'static) {
        self.add_driver_at(Box::new(driver), true);
    }

    /// Adds a boxed driver to the front or the rear of the driver stack
    pub fn add_driver_at(&mut self, driver: Box<dyn ParticleDriver<T>>, front: bool) {
        debug!(
            "group '{}': adding driver '{}' at the {}",
            self.name,
            driver.name(),
            if front { "front" } else { "rear" }
        );
        if front {
            self.drivers.insert(0, driver);
        } else {
            self.drivers.push(driver);
        }
    }

    /// Removes the driver at `index` in the stack
    pub fn remove_driver(&mut self, index: usize) -> Option<Box<dyn ParticleDriver<T>>> {
        if index < self.drivers.len() {
            Some(self.drivers.remove(index))
        } else {
            None
        }
    }

    /// Removes the first driver whose [`name`](ParticleDriver::name) matches
    pub fn remove_driver_named(&mut self, name: &str) -> Option<Box<dyn ParticleDriver<T>>> {
        let index = self.drivers.iter().position(|d| d.name() == name)?;
        self.remove_driver(index)
    }

    /// Removes every driver
    pub fn clear_all_drivers(&mut self) {
        self.drivers.clear();
    }

    /// The driver stack, front first
    pub fn drivers(&self) -> &[Box<dyn ParticleDriver<T>>] {
        &self.drivers
    }

    /// Set the maximum number of particles this group can hold
    ///
    /// Shrinking below the current size evicts particles through the overflow
    /// policy until the group fits. Every driver is told about the change, and
    /// anything holding capacity-sized buffers has to rebuild them, so prefer
    /// setting the capacity at construction.
    pub fn set_capacity(&mut self, capacity: usize) {
        if capacity == self.capacity {
            return;
        }
        self.capacity = capacity;
        while self.particles.len() > self.capacity {
            let before = self.particles.len();
            match self.overflow.remove_particle(&mut self.particles, None) {
                Some(evicted) if self.particles.len() < before => self.forget_index(evicted),
                _ => {
                    warn!(
                        "overflow policy '{}' freed nothing in group '{}'; truncating to {}",
                        self.overflow.name(),
                        self.name,
                        self.capacity
                    );
                    self.particles.truncate(self.capacity);
                }
            }
        }
        debug!("group '{}' capacity set to {}", self.name, self.capacity);
        self.notify_capacity_changed();
    }

    /// Sets the policy used when an add would exceed capacity
    pub fn set_overflow_strategy(&mut self, overflow: impl OverflowStrategy<T> + 'static) {
        self.overflow = Box::new(overflow);
    }

    /// Sets the emission volume drivers sample spawn positions from
    pub fn set_volume(&mut self, volume: impl EmissionVolume + 'static) {
        self.volume = Box::new(volume);
    }

    /// Sets the world placement supplied by the host scene
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    /// Sets the dynamic sizing step
    ///
    /// With `Some(step)` an overflowing add grows capacity to `size + step`
    /// instead of consulting the overflow policy. `None` disables this.
    pub fn set_dynamic_sizing_step(&mut self, step: Option<usize>) {
        self.dynamic_sizing_step = step;
    }

    /// Sets the multiplier applied to elapsed time
    ///
    /// # Errors
    /// If `speed` is negative or not finite; the old speed is kept
    pub fn set_update_speed(&mut self, speed: f32) -> Result<()> {
        ensure_non_negative("update speed", speed)?;
        self.update_speed = speed;
        Ok(())
    }

    /// Sets the life points consumed per second; 0 lets particles live forever
    ///
    /// # Errors
    /// If `decay` is negative or not finite; the old rate is kept
    pub fn set_decay_rate(&mut self, decay: f32) -> Result<()> {
        ensure_non_negative("decay rate", decay)?;
        self.decay = decay;
        Ok(())
    }

    /// Sets the initial delay in seconds
    pub fn set_initial_delay(&mut self, delay: f32) -> Result<()> {
        ensure_non_negative("initial delay", delay)?;
        self.delay = delay;
        Ok(())
    }

    /// If true, particles decay with the world decay rate instead of the local one
    pub fn set_inherit_decay_rate(&mut self, inherit: bool) {
        self.inherit_decay_rate = inherit;
    }

    /// Resumes this group from the next frame on
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stops this group and, from the next frame on, all of its descendants
    ///
    /// Nothing is added, removed, mutated or aged while paused, and time does
    /// not accumulate. Setting the update speed to zero is the gentler option.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Toggles the local play state and returns the new one
    pub fn flip_play_state(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Clears particles, zeroes time and notifies drivers
    ///
    /// Only this group is reset; use [`GroupTree::reset`](super::manager::GroupTree::reset)
    /// to cascade into children.
    ///
    /// # Returns
    /// `false` without doing anything if the group is not world-playing
    pub fn reset(&mut self) -> bool {
        if !self.world_play_state {
            return false;
        }
        self.particles.clear();
        self.time = 0.0;
        let status = self.status();
        for driver in self.drivers.iter_mut() {
            driver.group_reset(&status);
        }
        debug!("group '{}' reset", self.name);
        true
    }

    /// Name given at construction
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of capacity, size, time and play state
    pub fn status(&self) -> GroupStatus {
        GroupStatus {
            capacity: self.capacity,
            size: self.particles.len(),
            raw_time: self.time,
            world_play_state: self.world_play_state,
        }
    }

    /// Maximum number of particles the group holds
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of particles currently in the group
    pub fn size(&self) -> usize {
        self.particles.len()
    }

    /// True if the group holds no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// True once the group holds as many particles as its capacity allows
    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    /// Particles in simulation order
    pub fn particles(&self) -> &[T] {
        &self.particles
    }

    /// Particle at `index`
    ///
    /// # Returns
    /// `None` if the index is out of range
    pub fn get(&self, index: usize) -> Option<&T> {
        self.particles.get(index)
    }

    /// Iterate over particles in simulation order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.particles.iter()
    }

    /// Policy consulted on overflow
    pub fn overflow_strategy(&self) -> &dyn OverflowStrategy<T> {
        self.overflow.as_ref()
    }

    /// Volume spawn positions are sampled from
    pub fn volume(&self) -> &dyn EmissionVolume {
        self.volume.as_ref()
    }

    /// World placement supplied by the host scene
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Sample a spawn position from the volume at the current placement
    pub fn sample_position(&self, rng: &mut dyn RngCore) -> Vector3<f32> {
        self.volume.sample(&self.placement, rng)
    }

    /// Growth step used instead of the overflow policy, if any
    pub fn dynamic_sizing_step(&self) -> Option<usize> {
        self.dynamic_sizing_step
    }

    /// Local multiplier on elapsed time
    pub fn update_speed(&self) -> f32 {
        self.update_speed
    }

    /// Local life points consumed per second
    pub fn decay_rate(&self) -> f32 {
        self.decay
    }

    /// Seconds before drivers and particles advance
    pub fn initial_delay(&self) -> f32 {
        self.delay
    }

    /// Whether particles decay with the compounded rate
    pub fn inherit_decay_rate(&self) -> bool {
        self.inherit_decay_rate
    }

    /// Seconds simulated since the initial delay ran out
    pub fn time(&self) -> f32 {
        (self.time - self.delay).max(0.0)
    }

    /// Seconds accumulated since the last reset, delay included
    pub fn raw_time(&self) -> f32 {
        self.time
    }

    /// True while accumulated time is still short of the initial delay
    pub fn in_delay_zone(&self) -> bool {
        self.time < self.delay
    }

    /// Local play intent
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True only if this group and every ancestor were playing at the last frame
    pub fn world_play_state(&self) -> bool {
        self.world_play_state
    }

    /// Parent group
    ///
    /// # Returns
    /// `None` for roots and groups outside a tree
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Child groups in attachment order
    pub fn children(&self) -> &[GroupId] {
        &self.children
    }
}

impl<'a, T: Particle> IntoIterator for &'a ParticleGroup<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

impl<T: Particle> fmt::Debug for ParticleGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleGroup")
            .field("name", &self.name)
            .field("size", &self.particles.len())
            .field("capacity", &self.capacity)
            .field("drivers", &self.drivers.len())
            .field("overflow", &self.overflow.name())
            .field("volume", &self.volume)
            .field("time", &self.time)
            .field("delay", &self.delay)
            .field("playing", &self.playing)
            .field("world_play_state", &self.world_play_state)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}

/// Access to a group from inside [`ParticleDriver::update_group`]
///
/// Reads go through `Deref` to the group. The driver stack is checked out
/// while hooks run, so [`ParticleGroup::drivers`] reads empty here and driver
/// registration is not available.
pub struct GroupContext<'a, T: Particle> {
    group: &'a mut ParticleGroup<T>,
}

impl<T: Particle> GroupContext<'_, T> {
    /// See [`ParticleGroup::add`]
    pub fn add(&mut self, particle: T) -> bool {
        self.group.add(particle)
    }

    /// See [`ParticleGroup::add_all`]
    pub fn add_all<I>(&mut self, particles: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.group.add_all(particles)
    }

    /// See [`ParticleGroup::remove`]
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.group.remove(index)
    }

    /// See [`ParticleGroup::clear_all_particles`]
    pub fn clear_all_particles(&mut self) -> usize {
        self.group.clear_all_particles()
    }

    /// Mutable access to live particles, without the ability to add or drop any
    pub fn particles_mut(&mut self) -> &mut [T] {
        &mut self.group.particles
    }

    pub fn play(&mut self) {
        self.group.play();
    }

    pub fn pause(&mut self) {
        self.group.pause();
    }
}

impl<T: Particle> Deref for GroupContext<'_, T> {
    type Target = ParticleGroup<T>;

    fn deref(&self) -> &Self::Target {
        &*self.group
    }
}
