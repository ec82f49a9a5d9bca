// THEORY:
// Two failure domains exist and they never mix. `KMeansError` belongs to the
// clustering core and is raised only by parameter validation (before any work
// starts) or by a parallel worker dying. `ImageIoError` belongs to the image
// boundary: decoding, encoding and the integrity checks performed when a
// finished cluster set is painted back onto an image.
//
// Empty clusters and hitting the iteration cap are deliberately absent here.
// They are observable states of a `ClusterSet`, not failures.

use thiserror::Error;

/// Errors raised by the clustering core.
#[derive(Debug, Error)]
pub enum KMeansError {
    /// `k` must lie in `1..=255` so every label fits in a byte.
    #[error("cluster count {k} is outside the supported range 1..={max}")]
    InvalidClusterCount { k: usize, max: usize },

    /// The declared pixel count disagrees with the buffer length.
    #[error("pixel count mismatch: declared {declared}, buffer holds {actual}")]
    PixelCountMismatch { declared: usize, actual: usize },

    /// There is nothing to cluster.
    #[error("pixel buffer is empty")]
    EmptyPixelBuffer,

    /// An assignment pass was built for a different number of clusters.
    #[error("assignment pass carries {actual} cluster accumulators, controller holds {expected}")]
    PassClusterMismatch { expected: usize, actual: usize },

    /// An assignment pass does not account for every pixel exactly once.
    #[error("assignment pass covers {labels} labels and {assigned} counted pixels, expected {expected}")]
    PassPixelMismatch { expected: usize, labels: usize, assigned: usize },

    /// An assignment pass labels a pixel with a cluster that does not exist.
    #[error("assignment pass labels pixel {index} with cluster {label} but only {k} clusters exist")]
    PassLabelOutOfRange { index: usize, label: u8, k: usize },

    /// A parallel assignment worker panicked or was cancelled.
    #[error("assignment worker failed: {0}")]
    WorkerFailed(String),
}

impl From<tokio::task::JoinError> for KMeansError {
    fn from(err: tokio::task::JoinError) -> Self {
        KMeansError::WorkerFailed(err.to_string())
    }
}

/// Errors raised at the image decode/encode boundary.
#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `width * height` does not match the number of labelled pixels.
    #[error("image dimensions {width}x{height} do not match {pixels} labelled pixels")]
    DimensionMismatch { width: u32, height: u32, pixels: usize },

    /// The cluster counts do not account for every pixel exactly once.
    #[error("cluster counts sum to {assigned} but the image holds {expected} pixels")]
    IntegrityMismatch { assigned: usize, expected: usize },

    /// A label points past the end of the cluster set.
    #[error("pixel {index} is labelled with cluster {label} but only {k} clusters exist")]
    LabelMismatch { index: usize, label: u8, k: usize },

    #[error(transparent)]
    Cluster(#[from] KMeansError),
}
