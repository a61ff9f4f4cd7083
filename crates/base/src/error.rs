use serde::{Deserialize, Serialize};
use thiserror::Error;

// setup

#[must_use]
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum KMeansError {
    #[error("Dataset is empty.")]
    EmptyDataset,
    #[error("Cluster set is empty.")]
    EmptyClusters,
    #[error("Invalid number of clusters: {k} clusters for {n} objects.")]
    InvalidClusterCount { k: usize, n: usize },
    #[error("Dimension mismatch: dataset has {expected} coordinates, centroids have {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Initial centroids {first} and {second} are identical.")]
    DuplicateCentroids { first: usize, second: usize },
    #[error("Invalid options: {reason}.")]
    InvalidOptions { reason: String },

    // resource
    #[error("Failed to allocate accumulators for {clusters} clusters of {dims} coordinates across {workers} workers.")]
    Allocation {
        clusters: usize,
        dims: usize,
        workers: usize,
    },
    #[error("Failed to start the worker pool: {reason}.")]
    ThreadPool { reason: String },
}
