// THEORY:
// `ClusterSet` is what a run hands back to its caller: the k clusters in index
// order, the label each pixel received in the last assignment pass, and how the
// run ended. Index is identity; cluster 3 is cluster 3 for the whole run.
//
// It is read-only from the outside. The checksum and the image encoder consume
// it; nothing mutates it after the controller finishes.

use std::ops::Index;

use crate::core_modules::assignment::ClusterLabel;
use crate::core_modules::cluster::Cluster;
use crate::core_modules::color::color::Color;
use crate::core_modules::convergence::Termination;

/// The final result of one k-means run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
    labels: Vec<ClusterLabel>,
    iterations: u32,
    termination: Termination,
}

impl ClusterSet {
    pub(crate) fn new(
        clusters: Vec<Cluster>,
        labels: Vec<ClusterLabel>,
        iterations: u32,
        termination: Termination,
    ) -> Self {
        Self {
            clusters,
            labels,
            iterations,
            termination,
        }
    }

    pub fn k(&self) -> usize {
        self.clusters.len()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn get(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    /// Per-pixel cluster index from the last assignment pass.
    pub fn labels(&self) -> &[ClusterLabel] {
        &self.labels
    }

    /// Number of assignment + update iterations that ran.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn is_converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Sum of all cluster counts; equals the pixel total after any pass.
    pub fn total_count(&self) -> usize {
        self.clusters.iter().map(Cluster::count).sum()
    }

    /// Indices of clusters that received no pixel in the last pass.
    pub fn empty_clusters(&self) -> Vec<usize> {
        self.clusters
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// The palette, one color per cluster in index order.
    pub fn palette(&self) -> Vec<Color> {
        self.clusters.iter().map(Cluster::color).collect()
    }

    /// The color the pixel at `index` is repainted with.
    pub fn color_of_pixel(&self, index: usize) -> Option<Color> {
        let label = *self.labels.get(index)?;
        self.clusters.get(label as usize).map(Cluster::color)
    }
}

impl Index<usize> for ClusterSet {
    type Output = Cluster;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clusters[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::cluster::ClusterAccumulator;

    fn populated(centroid: Color, count: usize) -> Cluster {
        let mut cluster = Cluster::new(centroid);
        cluster.stats = ClusterAccumulator {
            count,
            ..Default::default()
        };
        cluster.mean = Some(centroid);
        cluster
    }

    #[test]
    fn reports_empty_clusters_and_totals() {
        let set = ClusterSet::new(
            vec![
                populated(Color::new(1, 1, 1), 3),
                Cluster::new(Color::new(9, 9, 9)),
                populated(Color::new(5, 5, 5), 1),
            ],
            vec![0, 0, 2, 0],
            2,
            Termination::Converged,
        );

        assert_eq!(set.k(), 3);
        assert_eq!(set.total_count(), 4);
        assert_eq!(set.empty_clusters(), vec![1]);
        assert!(set.is_converged());
        assert_eq!(set.color_of_pixel(2), Some(Color::new(5, 5, 5)));
        assert_eq!(set.color_of_pixel(4), None);
        assert_eq!(set[1].centroid, Color::new(9, 9, 9));
    }
}
