// THEORY:
// This file is the main entry point for the `pixel_kmeans` library crate. It
// exposes the clustering engine as a small surface: the `cluster` entry point
// (or an explicitly constructed `KMeansPipeline` / `ParallelPipeline`), the
// resulting `ClusterSet`, and the `checksum` used to verify reproducibility.
//
// The leaf components (distance, assignment, update, convergence, seeding) live
// under `core_modules` and stay reachable for callers that want to drive a run
// step by step. Image decoding and encoding sit at the edge in
// `core_modules::utils::image_helper`.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::checksum::{Checksum, checksum};
pub use core_modules::cluster::{Cluster, ClusterAccumulator};
pub use core_modules::cluster_set::ClusterSet;
pub use core_modules::color::color::Color;
pub use core_modules::convergence::{ControllerState, Termination};
pub use error::{ImageIoError, KMeansError};
pub use parallel_pipeline::ParallelPipeline;
pub use pipeline::{KMeansConfig, KMeansPipeline, MAX_CLUSTERS, cluster};
