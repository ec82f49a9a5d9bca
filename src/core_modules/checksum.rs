// THEORY:
// The checksum is a single `u32` fingerprint over the final clusters, used to
// check that two runs over the same image and k ended bit-for-bit identical
// without comparing whole images.
//
// Each cluster contributes `r*r + 2*g + 3*b + count`, taken from its final color
// (the mean, or the retained centroid of an empty cluster). Terms are weighted
// by `index + 1` before summing so that swapping two clusters changes the
// result. All arithmetic wraps at 32 bits, which keeps the value reproducible on
// any platform with two's-complement fixed-width integers.

use tracing::info;

use crate::core_modules::cluster::Cluster;
use crate::core_modules::cluster_set::ClusterSet;

pub type Checksum = u32;

fn cluster_term(cluster: &Cluster) -> Checksum {
    let color = cluster.color();
    let (r, g, b) = (color.red as u32, color.green as u32, color.blue as u32);

    r.wrapping_mul(r)
        .wrapping_add(g.wrapping_mul(2))
        .wrapping_add(b.wrapping_mul(3))
        .wrapping_add(cluster.count() as u32)
}

/// Order-sensitive fingerprint of the first `k` clusters.
pub fn checksum_clusters(clusters: &[Cluster], k: usize) -> Checksum {
    clusters
        .iter()
        .take(k)
        .enumerate()
        .fold(0u32, |acc, (index, cluster)| {
            acc.wrapping_add(cluster_term(cluster).wrapping_mul(index as u32 + 1))
        })
}

/// Fingerprint of a finished run.
pub fn checksum(set: &ClusterSet, k: usize) -> Checksum {
    let value = checksum_clusters(set.clusters(), k);
    info!(checksum = value, k, "cluster checksum computed");
    value
}
