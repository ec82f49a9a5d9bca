// THEORY:
// The parallel pipeline spreads the assignment step, the O(pixels * k) part of
// every iteration, across blocking worker tasks on the tokio runtime.
//
// Each iteration:
// 1.  The coordinator snapshots the centroids. They stay frozen until the
//     update step, so no worker can race on them.
// 2.  The pixel buffer, shared read-only behind an `Arc`, is cut into
//     contiguous ranges; one worker per range assigns its pixels and returns
//     private partial sums plus labels.
// 3.  `try_join_all` is the barrier. Only once every worker is back does the
//     coordinator merge the partials in range order and run the update step.
//
// Integer sums are order independent and labels are per pixel, so a parallel
// run is bit-for-bit identical to a sequential one, checksum included.

use std::ops::Range;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::debug;

use crate::core_modules::assignment::{AssignmentPass, assign_range};
use crate::core_modules::cluster_set::ClusterSet;
use crate::core_modules::color::color::Color;
use crate::core_modules::convergence::ConvergenceController;
use crate::core_modules::initializer::initialize_clusters;
use crate::error::KMeansError;
use crate::pipeline::{KMeansConfig, validate};

/// Ranges smaller than this are not worth a separate worker.
const MIN_PIXELS_PER_WORKER: usize = 4096;

/// Splits `0..len` into at most `parts` contiguous, non-empty ranges.
pub fn partition_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.clamp(1, len.max(1));
    let base = len / parts;
    let remainder = len % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let size = base + usize::from(i < remainder);
        if size == 0 {
            continue;
        }
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// The k-means engine with a parallel assignment step.
#[derive(Debug, Clone, Default)]
pub struct ParallelPipeline {
    config: KMeansConfig,
}

impl ParallelPipeline {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    fn worker_count(&self, pixel_count: usize) -> usize {
        let by_size = (pixel_count / MIN_PIXELS_PER_WORKER).max(1);
        self.config.workers.max(1).min(by_size)
    }

    /// Clusters `pixels` into `k` colors with the assignment step run on
    /// `config.workers` blocking tasks.
    pub async fn cluster(
        &self,
        k: usize,
        pixels: Arc<[Color]>,
        pixel_count: usize,
    ) -> Result<ClusterSet, KMeansError> {
        validate(k, &pixels, pixel_count)?;

        let ranges = partition_ranges(pixels.len(), self.worker_count(pixels.len()));
        debug!(workers = ranges.len(), pixels = pixels.len(), k, "parallel k-means starting");

        let mut controller = ConvergenceController::new(
            initialize_clusters(&pixels, k),
            pixels.len(),
            self.config.max_iterations,
        );

        while !controller.is_finished() {
            let pass = Self::parallel_pass(&pixels, controller.centroids(), &ranges).await?;
            controller.apply_pass(pass)?;
        }
        Ok(controller.finish())
    }

    /// One assignment pass over all ranges, merged by the coordinator.
    async fn parallel_pass(
        pixels: &Arc<[Color]>,
        centroids: Vec<Color>,
        ranges: &[Range<usize>],
    ) -> Result<AssignmentPass, KMeansError> {
        let k = centroids.len();
        let centroids: Arc<[Color]> = centroids.into();

        let workers = ranges.iter().cloned().map(|range| {
            let pixels = Arc::clone(pixels);
            let centroids = Arc::clone(&centroids);
            tokio::task::spawn_blocking(move || assign_range(&pixels[range], &centroids))
        });

        let partials = try_join_all(workers).await?;
        Ok(AssignmentPass::merge(k, partials))
    }
}
