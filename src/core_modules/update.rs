// THEORY:
// The update step turns a finished assignment pass into new centroids. Every
// cluster that received pixels moves to the truncated integer mean of those
// pixels. A cluster that received nothing keeps its centroid exactly where it
// was: it is never relocated to zero or to an undefined mean.

use crate::core_modules::assignment::AssignmentPass;
use crate::core_modules::cluster::Cluster;

/// Installs the pass statistics into `clusters` and recomputes centroids.
///
/// Returns the number of clusters whose centroid moved.
pub fn update_clusters(clusters: &mut [Cluster], pass: &AssignmentPass) -> usize {
    debug_assert_eq!(clusters.len(), pass.accumulators.len());

    let mut moved = 0;
    for (cluster, stats) in clusters.iter_mut().zip(pass.accumulators.iter()) {
        cluster.reset();
        cluster.stats = *stats;
        cluster.mean = stats.mean();

        if let Some(mean) = cluster.mean {
            if mean != cluster.centroid {
                moved += 1;
            }
            cluster.centroid = mean;
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::assignment::assign_range;
    use crate::core_modules::color::color::Color;

    #[test]
    fn moves_populated_clusters_to_their_mean() {
        let pixels = [Color::new(255, 0, 0), Color::new(250, 0, 0)];
        let mut clusters = vec![Cluster::new(Color::new(255, 0, 0))];
        let pass = assign_range(&pixels, &[clusters[0].centroid]);

        let moved = update_clusters(&mut clusters, &pass);

        assert_eq!(moved, 1);
        assert_eq!(clusters[0].centroid, Color::new(252, 0, 0));
        assert_eq!(clusters[0].count(), 2);
    }

    #[test]
    fn empty_cluster_keeps_previous_centroid() {
        let pixels = [Color::new(10, 10, 10), Color::new(12, 12, 12)];
        let far_away = Color::new(200, 200, 200);
        let mut clusters = vec![Cluster::new(Color::new(11, 11, 11)), Cluster::new(far_away)];
        let centroids: Vec<Color> = clusters.iter().map(|c| c.centroid).collect();
        let pass = assign_range(&pixels, &centroids);

        update_clusters(&mut clusters, &pass);

        assert!(clusters[1].is_empty());
        assert_eq!(clusters[1].centroid, far_away);
        assert_eq!(clusters[1].mean, None);
    }

    #[test]
    fn unchanged_means_report_no_movement() {
        let pixels = [Color::new(4, 4, 4), Color::new(6, 6, 6)];
        let mut clusters = vec![Cluster::new(Color::new(5, 5, 5))];
        let pass = assign_range(&pixels, &[clusters[0].centroid]);

        assert_eq!(update_clusters(&mut clusters, &pass), 0);
    }
}
