// THEORY:
// The `pipeline` module is the top-level API of the clustering engine. It wraps
// validation, seeding and the convergence controller behind a single call:
//
//     cluster(k, pixels, pixel_count) -> ClusterSet
//
// Parameters are validated before any work starts, so an invalid call never
// partially executes. `KMeansPipeline` is the explicitly constructed engine for
// callers who want a non-default configuration; the free function uses defaults.

use crate::core_modules::cluster_set::ClusterSet;
use crate::core_modules::color::color::Color;
use crate::core_modules::convergence::ConvergenceController;
use crate::core_modules::initializer::initialize_clusters;
use crate::error::KMeansError;

/// Largest supported k; labels are stored as `u8`.
pub const MAX_CLUSTERS: usize = 255;
pub const DEFAULT_MAX_ITERATIONS: u32 = 300;

const ENV_MAX_ITERATIONS: &str = "KMEANS_MAX_ITERATIONS";
const ENV_WORKERS: &str = "KMEANS_WORKERS";

/// Tunable behavior of a k-means run.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Safety bound on assignment + update iterations.
    pub max_iterations: u32,
    /// Number of contiguous pixel ranges assigned concurrently by the
    /// `ParallelPipeline`. Ignored by the sequential pipeline.
    pub workers: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            workers: num_cpus::get().max(1),
        }
    }
}

impl KMeansConfig {
    /// Defaults overridden by `KMEANS_MAX_ITERATIONS` and `KMEANS_WORKERS`
    /// when they are set to valid numbers.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(max_iterations) = parse_setting(lookup(ENV_MAX_ITERATIONS)) {
            config.max_iterations = max_iterations;
        }
        if let Some(workers) = parse_setting(lookup(ENV_WORKERS)) {
            config = config.with_workers(workers);
        }
        config
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

fn parse_setting<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// Checks the invocation contract before any clustering work.
pub fn validate(k: usize, pixels: &[Color], pixel_count: usize) -> Result<(), KMeansError> {
    if k == 0 || k > MAX_CLUSTERS {
        return Err(KMeansError::InvalidClusterCount { k, max: MAX_CLUSTERS });
    }
    if pixel_count != pixels.len() {
        return Err(KMeansError::PixelCountMismatch {
            declared: pixel_count,
            actual: pixels.len(),
        });
    }
    if pixels.is_empty() {
        return Err(KMeansError::EmptyPixelBuffer);
    }
    Ok(())
}

/// The sequential k-means engine.
#[derive(Debug, Clone, Default)]
pub struct KMeansPipeline {
    config: KMeansConfig,
}

impl KMeansPipeline {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn cluster(
        &self,
        k: usize,
        pixels: &[Color],
        pixel_count: usize,
    ) -> Result<ClusterSet, KMeansError> {
        validate(k, pixels, pixel_count)?;

        let seeds = initialize_clusters(pixels, k);
        ConvergenceController::new(seeds, pixels.len(), self.config.max_iterations).run(pixels)
    }
}

/// Clusters `pixels` into `k` colors with the default configuration.
pub fn cluster(k: usize, pixels: &[Color], pixel_count: usize) -> Result<ClusterSet, KMeansError> {
    KMeansPipeline::default().cluster(k, pixels, pixel_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::checksum::checksum;
    use crate::core_modules::convergence::Termination;

    fn two_by_two() -> Vec<Color> {
        vec![
            Color::new(255, 0, 0),
            Color::new(250, 0, 0),
            Color::new(0, 0, 255),
            Color::new(0, 0, 250),
        ]
    }

    fn noisy_image(len: usize) -> Vec<Color> {
        let mut state = 0x2545_f491u32;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                Color::from([(state >> 24) as u8, (state >> 16) as u8, (state >> 8) as u8])
            })
            .collect()
    }

    #[test]
    fn rejects_out_of_range_k() {
        let pixels = two_by_two();
        assert!(matches!(
            cluster(0, &pixels, 4),
            Err(KMeansError::InvalidClusterCount { k: 0, .. })
        ));
        assert!(matches!(
            cluster(256, &pixels, 4),
            Err(KMeansError::InvalidClusterCount { k: 256, .. })
        ));
    }

    #[test]
    fn rejects_pixel_count_mismatch() {
        let pixels = two_by_two();
        assert!(matches!(
            cluster(2, &pixels, 5),
            Err(KMeansError::PixelCountMismatch { declared: 5, actual: 4 })
        ));
    }

    #[test]
    fn rejects_empty_buffer() {
        assert!(matches!(cluster(1, &[], 0), Err(KMeansError::EmptyPixelBuffer)));
    }

    #[test]
    fn end_to_end_two_by_two() {
        let pixels = two_by_two();
        let set = cluster(2, &pixels, pixels.len()).unwrap();

        assert_eq!(set.termination(), Termination::Converged);
        assert_eq!(set[0].color(), Color::new(252, 0, 0));
        assert_eq!(set[1].color(), Color::new(0, 0, 252));
        assert_eq!(set[0].count(), 2);
        assert_eq!(set[1].count(), 2);
        assert_eq!(checksum(&set, 2), 65022);
    }

    #[test]
    fn single_cluster_is_the_global_mean() {
        let pixels = noisy_image(1000);
        let set = cluster(1, &pixels, pixels.len()).unwrap();

        let n = pixels.len() as u64;
        let mean = Color::new(
            (pixels.iter().map(|p| p.red as u64).sum::<u64>() / n) as u8,
            (pixels.iter().map(|p| p.green as u64).sum::<u64>() / n) as u8,
            (pixels.iter().map(|p| p.blue as u64).sum::<u64>() / n) as u8,
        );
        assert_eq!(set[0].count(), pixels.len());
        assert_eq!(set[0].color(), mean);
        assert!(set.is_converged());
    }

    #[test]
    fn runs_are_deterministic() {
        let pixels = noisy_image(2000);
        let pipeline = KMeansPipeline::new(KMeansConfig::default().with_max_iterations(50));
        for k in [2, 5, 16, 100] {
            let first = pipeline.cluster(k, &pixels, pixels.len()).unwrap();
            let second = pipeline.cluster(k, &pixels, pixels.len()).unwrap();
            assert_eq!(first, second);
            assert_eq!(checksum(&first, k), checksum(&second, k));
        }
    }

    #[test]
    fn counts_are_conserved() {
        let pixels = noisy_image(777);
        for k in [1, 3, 10, 50, 255] {
            let set = cluster(k, &pixels, pixels.len()).unwrap();
            assert_eq!(set.k(), k);
            assert_eq!(set.total_count(), pixels.len());
        }
    }

    #[test]
    fn duplicate_seeds_leave_clusters_empty_but_unmoved() {
        let pixels = vec![Color::new(40, 40, 40); 8];
        let set = cluster(3, &pixels, pixels.len()).unwrap();

        assert_eq!(set[0].count(), 8);
        assert_eq!(set.empty_clusters(), vec![1, 2]);
        assert_eq!(set[1].centroid, Color::new(40, 40, 40));
        assert_eq!(set[2].centroid, Color::new(40, 40, 40));
    }

    #[test]
    fn iteration_cap_is_respected() {
        let pixels = noisy_image(3000);
        let pipeline = KMeansPipeline::new(KMeansConfig::default().with_max_iterations(2));
        let set = pipeline.cluster(32, &pixels, pixels.len()).unwrap();

        assert!(set.iterations() <= 2);
        assert_eq!(set.total_count(), pixels.len());
    }

    #[test]
    fn lookup_overrides_valid_settings() {
        let config = KMeansConfig::from_lookup(|key| match key {
            "KMEANS_MAX_ITERATIONS" => Some(" 12 ".to_string()),
            "KMEANS_WORKERS" => Some("0".to_string()),
            _ => None,
        });

        assert_eq!(config.max_iterations, 12);
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn unparsable_settings_fall_back_to_defaults() {
        let defaults = KMeansConfig::default();
        let config = KMeansConfig::from_lookup(|key| match key {
            "KMEANS_MAX_ITERATIONS" => Some("many".to_string()),
            "KMEANS_WORKERS" => Some("-4".to_string()),
            _ => None,
        });

        assert_eq!(config.max_iterations, defaults.max_iterations);
        assert_eq!(config.workers, defaults.workers);
    }

    #[test]
    fn missing_settings_keep_defaults() {
        let config = KMeansConfig::from_lookup(|_| None);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn workers_never_drop_below_one() {
        assert_eq!(KMeansConfig::default().with_workers(0).workers, 1);
    }
}
