// THEORY:
// The assignment step maps every pixel to the index of its nearest centroid and,
// in the same sweep, accumulates that pixel into the winning cluster's counters.
// It is O(pixels * k) and dominates the runtime of a run.
//
// Key principles:
// 1.  **Frozen centroids**: Centroids are read-only for the whole pass. A pass
//     only produces new statistics; moving centroids is the update step's job.
// 2.  **Deterministic ties**: When two centroids are equally close, the lowest
//     index wins. Reproducible checksums depend on it.
// 3.  **Partitionable**: `assign_range` works on any contiguous slice of the
//     buffer and returns private partial sums plus labels for that slice.
//     Joining partitions in buffer order with `AssignmentPass::merge` gives
//     exactly the result of a single pass over the whole buffer.

use crate::core_modules::cluster::ClusterAccumulator;
use crate::core_modules::color::color::Color;
use crate::core_modules::distance::distance::squared_distance;

pub type ClusterLabel = u8;

/// Returns the index of the centroid closest to `color`, lowest index on ties.
pub fn find_closest_centroid(color: &Color, centroids: &[Color]) -> ClusterLabel {
    debug_assert!(!centroids.is_empty() && centroids.len() <= u8::MAX as usize);

    let mut best = 0usize;
    let mut best_distance = u32::MAX;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(color, centroid);
        // Strict comparison keeps the first minimum.
        if distance < best_distance {
            best_distance = distance;
            best = index;
            if distance == 0 {
                break;
            }
        }
    }
    best as ClusterLabel
}

/// The outcome of assigning a contiguous run of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPass {
    /// One accumulator per cluster, indexed like the centroids.
    pub(crate) accumulators: Vec<ClusterAccumulator>,
    /// The winning cluster for each pixel, in buffer order.
    pub(crate) labels: Vec<ClusterLabel>,
}

impl AssignmentPass {
    pub fn empty(k: usize) -> Self {
        Self {
            accumulators: vec![ClusterAccumulator::default(); k],
            labels: Vec::new(),
        }
    }

    /// Joins partitions given in buffer order.
    pub fn merge(k: usize, parts: impl IntoIterator<Item = AssignmentPass>) -> Self {
        let mut merged = AssignmentPass::empty(k);
        for part in parts {
            for (total, partial) in merged.accumulators.iter_mut().zip(part.accumulators.iter()) {
                total.merge(partial);
            }
            merged.labels.extend_from_slice(&part.labels);
        }
        merged
    }

    pub fn accumulators(&self) -> &[ClusterAccumulator] {
        &self.accumulators
    }

    pub fn labels(&self) -> &[ClusterLabel] {
        &self.labels
    }

    pub fn assigned(&self) -> usize {
        self.accumulators.iter().map(|a| a.count).sum()
    }
}

/// Assigns every pixel of `pixels` to its nearest centroid.
pub fn assign_range(pixels: &[Color], centroids: &[Color]) -> AssignmentPass {
    let mut accumulators = vec![ClusterAccumulator::default(); centroids.len()];
    let mut labels = Vec::with_capacity(pixels.len());

    for pixel in pixels {
        let label = find_closest_centroid(pixel, centroids);
        accumulators[label as usize].add(pixel);
        labels.push(label);
    }

    AssignmentPass { accumulators, labels }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pixels() -> Vec<Color> {
        vec![
            Color::new(255, 0, 0),
            Color::new(250, 0, 0),
            Color::new(0, 0, 255),
            Color::new(0, 0, 250),
            Color::new(128, 128, 128),
        ]
    }

    #[test]
    fn picks_nearest_centroid() {
        let centroids = [Color::new(255, 0, 0), Color::new(0, 0, 255)];
        assert_eq!(find_closest_centroid(&Color::new(240, 10, 10), &centroids), 0);
        assert_eq!(find_closest_centroid(&Color::new(10, 10, 240), &centroids), 1);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let centroids = [Color::new(0, 0, 0), Color::new(10, 0, 0), Color::new(0, 0, 0)];
        assert_eq!(find_closest_centroid(&Color::new(5, 0, 0), &centroids), 0);
        assert_eq!(find_closest_centroid(&Color::new(0, 0, 0), &centroids), 0);
    }

    #[test]
    fn every_pixel_is_counted_once() {
        let pixels = sample_pixels();
        let centroids = [Color::new(255, 0, 0), Color::new(0, 0, 255), Color::new(0, 255, 0)];

        let pass = assign_range(&pixels, &centroids);

        assert_eq!(pass.labels().len(), pixels.len());
        assert_eq!(pass.assigned(), pixels.len());
        // Gray is 48897 away from all three centroids; the tie goes to cluster 0.
        assert_eq!(pass.labels()[4], 0);
        assert_eq!(pass.accumulators()[0].count(), 3);
        assert_eq!(pass.accumulators()[0].sums().0, 255 + 250 + 128);
        assert_eq!(pass.accumulators()[1].count(), 2);
        assert_eq!(pass.accumulators()[2].count(), 0);
    }

    #[test]
    fn off_center_gray_goes_to_the_nearest_centroid() {
        let centroids = [Color::new(255, 0, 0), Color::new(0, 0, 255), Color::new(0, 255, 0)];
        assert_eq!(find_closest_centroid(&Color::new(120, 120, 140), &centroids), 1);
    }

    #[test]
    fn partitioned_passes_merge_to_the_whole() {
        let pixels = sample_pixels();
        let centroids = [Color::new(200, 0, 0), Color::new(0, 0, 200)];

        let whole = assign_range(&pixels, &centroids);
        let parts = pixels.chunks(2).map(|range| assign_range(range, &centroids));
        let merged = AssignmentPass::merge(centroids.len(), parts);

        assert_eq!(merged, whole);
    }
}
