//! Overflow policies
//!
//! A group consults its policy when an add would push it over capacity, or
//! repeatedly when its capacity is lowered below its current size.

use super::traits::{Aging, OverflowStrategy};

/// Discards the newest particle, which rejects whatever caused the overflow
///
/// This is the default policy. With no offending particle it removes the most
/// recently added one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullNew;

impl<T> OverflowStrategy<T> for CullNew {
    fn remove_particle(&mut self, particles: &mut Vec<T>, offending: Option<usize>) -> Option<usize> {
        let index = match offending {
            Some(i) if i < particles.len() => i,
            _ => particles.len().checked_sub(1)?,
        };
        particles.remove(index);
        Some(index)
    }

    fn name(&self) -> &str {
        "cull_new"
    }
}

/// Discards the oldest particle so new ones are always accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullOldest;

impl<T> OverflowStrategy<T> for CullOldest {
    fn remove_particle(&mut self, particles: &mut Vec<T>, _offending: Option<usize>) -> Option<usize> {
        if particles.is_empty() {
            return None;
        }
        particles.remove(0);
        Some(0)
    }

    fn name(&self) -> &str {
        "cull_oldest"
    }
}

/// Discards the particle with the least remaining life
///
/// Ties go to the earliest particle. If the offending particle is itself the
/// shortest-lived one it is the one dropped, and the add is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullLowestLife;

impl<T: Aging> OverflowStrategy<T> for CullLowestLife {
    fn remove_particle(&mut self, particles: &mut Vec<T>, _offending: Option<usize>) -> Option<usize> {
        let (index, _) = particles
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.remaining_life().total_cmp(&b.remaining_life()))?;
        particles.remove(index);
        Some(index)
    }

    fn name(&self) -> &str {
        "cull_lowest_life"
    }
}
