// THEORY:
// A `Cluster` is one of the k buckets of a run. It pairs the representative
// `centroid` used during assignment with the statistics of the most recent
// assignment pass: how many pixels landed in it and their running channel sums.
//
// The sums live in a separate `ClusterAccumulator` so that parallel workers can
// each own a private set of accumulators and hand them back to the coordinator,
// who merges them with plain integer addition. Addition is order independent,
// so the merged result is identical no matter how the buffer was partitioned.
//
// The mean is derived from the sums in O(1) after the pass, using truncating
// integer division, and is only defined when at least one pixel was assigned.

use crate::core_modules::color::color::Color;

/// Running per-cluster statistics for one assignment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterAccumulator {
    pub(crate) count: usize,
    pub(crate) sum_red: u64,
    pub(crate) sum_green: u64,
    pub(crate) sum_blue: u64,
}

impl ClusterAccumulator {
    pub fn count(&self) -> usize {
        self.count
    }

    /// Running `(red, green, blue)` channel sums.
    pub fn sums(&self) -> (u64, u64, u64) {
        (self.sum_red, self.sum_green, self.sum_blue)
    }

    #[inline]
    pub fn add(&mut self, color: &Color) {
        self.count += 1;
        self.sum_red += color.red as u64;
        self.sum_green += color.green as u64;
        self.sum_blue += color.blue as u64;
    }

    /// Folds another partition's partial sums into this one.
    pub fn merge(&mut self, other: &ClusterAccumulator) {
        self.count += other.count;
        self.sum_red += other.sum_red;
        self.sum_green += other.sum_green;
        self.sum_blue += other.sum_blue;
    }

    /// The per-channel average, or `None` for an empty accumulator.
    pub fn mean(&self) -> Option<Color> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as u64;
        Some(Color::new(
            (self.sum_red / n) as u8,
            (self.sum_green / n) as u8,
            (self.sum_blue / n) as u8,
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A single color cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// The representative color used for nearest-centroid comparisons.
    pub centroid: Color,
    /// Statistics of the most recent assignment pass.
    pub(crate) stats: ClusterAccumulator,
    /// The mean of the pixels assigned in the most recent pass, if any were.
    pub(crate) mean: Option<Color>,
}

impl Cluster {
    pub fn new(seed: Color) -> Self {
        Self {
            centroid: seed,
            stats: ClusterAccumulator::default(),
            mean: None,
        }
    }

    pub fn count(&self) -> usize {
        self.stats.count
    }

    pub fn stats(&self) -> &ClusterAccumulator {
        &self.stats
    }

    pub fn mean(&self) -> Option<Color> {
        self.mean
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// The color this cluster paints its pixels with: the mean when defined,
    /// otherwise the retained centroid.
    pub fn color(&self) -> Color {
        self.mean.unwrap_or(self.centroid)
    }

    /// Clears the pass statistics ahead of a new assignment pass.
    pub fn reset(&mut self) {
        self.stats = ClusterAccumulator::default();
        self.mean = None;
    }
}
