// THEORY:
// The `ConvergenceController` owns the clusters of a single run and drives them
// through repeated assignment + update iterations. It is a small state machine:
//
//     Initialized -> Iterating -> Converged            (terminal)
//                             \-> MaxIterationsReached (terminal, fallback)
//
// After every update the controller asks one question: did any centroid move?
// Channels are integers, so "moved" is exact equality with no epsilon. If
// nothing moved the run has converged. Otherwise it keeps going until the
// iteration cap, which bounds total work against oscillation. Hitting the cap is
// a normal termination mode and the clusters are still a usable result.
//
// The controller does not care who performed the assignment. The sequential
// pipeline calls `run`, the parallel pipeline computes each pass on its workers
// and feeds the merged result to `apply_pass`. Both paths converge identically.
// A pass is checked before it touches any cluster: one accumulator per cluster,
// one label per pixel, and counts that add up to the pixel total. A rejected
// pass leaves the controller exactly as it was.

use tracing::{debug, info, warn};

use crate::core_modules::assignment::{AssignmentPass, ClusterLabel, assign_range};
use crate::core_modules::cluster::Cluster;
use crate::core_modules::cluster_set::ClusterSet;
use crate::core_modules::color::color::Color;
use crate::core_modules::update::update_clusters;
use crate::error::KMeansError;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Seeds are in place; no iteration has run yet.
    Initialized,
    /// At least one iteration ran and centroids are still moving.
    Iterating,
    /// An iteration left every centroid unchanged.
    Converged,
    /// The iteration cap was hit while centroids were still moving.
    MaxIterationsReached,
}

impl ControllerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ControllerState::Converged | ControllerState::MaxIterationsReached)
    }
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Converged,
    MaxIterationsReached,
}

pub struct ConvergenceController {
    clusters: Vec<Cluster>,
    pixel_count: usize,
    labels: Vec<ClusterLabel>,
    state: ControllerState,
    iterations: u32,
    max_iterations: u32,
}

impl ConvergenceController {
    /// Takes ownership of freshly seeded clusters. The cap is at least one
    /// iteration so every finished run has assigned every pixel.
    pub fn new(clusters: Vec<Cluster>, pixel_count: usize, max_iterations: u32) -> Self {
        Self {
            clusters,
            pixel_count,
            labels: Vec::new(),
            state: ControllerState::Initialized,
            iterations: 0,
            max_iterations: max_iterations.max(1),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn k(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Snapshot of the centroids, frozen for the next assignment pass.
    pub fn centroids(&self) -> Vec<Color> {
        self.clusters.iter().map(|c| c.centroid).collect()
    }

    fn check_pass(&self, pass: &AssignmentPass) -> Result<(), KMeansError> {
        let k = self.clusters.len();
        if pass.accumulators().len() != k {
            return Err(KMeansError::PassClusterMismatch {
                expected: k,
                actual: pass.accumulators().len(),
            });
        }

        let assigned = pass.assigned();
        if pass.labels().len() != self.pixel_count || assigned != self.pixel_count {
            return Err(KMeansError::PassPixelMismatch {
                expected: self.pixel_count,
                labels: pass.labels().len(),
                assigned,
            });
        }

        if let Some((index, &label)) =
            pass.labels().iter().enumerate().find(|&(_, &label)| label as usize >= k)
        {
            return Err(KMeansError::PassLabelOutOfRange { index, label, k });
        }
        Ok(())
    }

    /// Runs the update step for one completed assignment pass and advances the
    /// state machine. Calling it on a finished controller changes nothing.
    pub fn apply_pass(&mut self, pass: AssignmentPass) -> Result<ControllerState, KMeansError> {
        if self.is_finished() {
            return Ok(self.state);
        }
        self.check_pass(&pass)?;

        self.state = ControllerState::Iterating;
        self.iterations += 1;

        let moved = update_clusters(&mut self.clusters, &pass);
        self.labels = pass.labels;

        debug!(
            iteration = self.iterations,
            moved,
            k = self.clusters.len(),
            "k-means iteration complete"
        );

        if moved == 0 {
            self.state = ControllerState::Converged;
        } else if self.iterations >= self.max_iterations {
            self.state = ControllerState::MaxIterationsReached;
        }
        Ok(self.state)
    }

    /// Iterates sequentially over `pixels` until a terminal state.
    pub fn run(mut self, pixels: &[Color]) -> Result<ClusterSet, KMeansError> {
        while !self.is_finished() {
            let pass = assign_range(pixels, &self.centroids());
            self.apply_pass(pass)?;
        }
        Ok(self.finish())
    }

    /// Consumes the controller and publishes its clusters.
    pub fn finish(self) -> ClusterSet {
        let termination = match self.state {
            ControllerState::Converged => Termination::Converged,
            _ => Termination::MaxIterationsReached,
        };

        match termination {
            Termination::Converged => info!(
                iterations = self.iterations,
                k = self.clusters.len(),
                "k-means converged"
            ),
            Termination::MaxIterationsReached => warn!(
                iterations = self.iterations,
                k = self.clusters.len(),
                "k-means stopped at the iteration cap without converging"
            ),
        }

        let empty = self.clusters.iter().filter(|c| c.is_empty()).count();
        if empty > 0 {
            warn!(empty, k = self.clusters.len(), "k-means finished with empty clusters");
        }

        ClusterSet::new(self.clusters, self.labels, self.iterations, termination)
    }
}
