//! Contiguous neighborhood partitioning
//!
//! Particles are grouped by index order. Each group shares its own best
//! solution in place of a swarm-wide one; a single group is the classic
//! global topology.

use std::ops::Range;

/// Split `count` particles into `sets` contiguous index ranges.
///
/// Sizes differ by at most one and the larger sets come first, so 5
/// particles in 2 sets become `0..3` and `3..5`. `sets` is capped to
/// `count` and treated as at least 1.
pub fn split_particles_in_sets(count: usize, sets: usize) -> Vec<Range<usize>> {
    if count == 0 {
        return Vec::new();
    }
    let sets = sets.clamp(1, count);
    let base = count / sets;
    let extra = count % sets;

    let mut ranges = Vec::with_capacity(sets);
    let mut start = 0;
    for i in 0..sets {
        let len = base + usize::from(i < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}
