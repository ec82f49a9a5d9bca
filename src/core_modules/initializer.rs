// THEORY:
// Seeds are sampled at evenly spaced pixel indices, `i * total / k`. Nothing
// random is involved, so two runs over the same buffer start from the same
// centroids and end with the same checksum. When k exceeds the number of
// distinct colors some seeds coincide; that is accepted; the duplicate clusters
// simply stay empty because ties resolve to the lowest index.

use crate::core_modules::cluster::Cluster;
use crate::core_modules::color::color::Color;

/// The pixel indices used as seeds for `k` clusters over `total` pixels.
pub fn seed_indices(k: usize, total: usize) -> impl Iterator<Item = usize> {
    (0..k).map(move |i| ((i as u64 * total as u64) / k as u64) as usize)
}

/// Builds the initial cluster set. Callers guarantee `k >= 1` and a non-empty
/// buffer.
pub fn initialize_clusters(pixels: &[Color], k: usize) -> Vec<Cluster> {
    seed_indices(k, pixels.len())
        .map(|index| Cluster::new(pixels[index]))
        .collect()
}
