#![allow(clippy::needless_range_loop)]

pub mod accumulator;
pub mod assign;
pub mod convergence;
pub mod distance;
pub mod lloyd;
pub mod recompute;

pub use crate::convergence::StopReason;
pub use crate::distance::{euclid_distance_2, k_means_lookup};
pub use crate::lloyd::{KMeansOutcome, LloydKMeans};

use base::error::KMeansError;
use base::options::KMeansOptions;
use common::vec2::Vec2;
use validator::Validate;

/// Clusters `samples` starting from `centroids` on a dedicated worker pool.
///
/// Reaching the iteration cap is not an error; see [`KMeansOutcome::stop`].
pub fn k_means(
    samples: &Vec2<f32>,
    centroids: Vec2<f32>,
    options: &KMeansOptions,
) -> Result<KMeansOutcome, KMeansError> {
    options
        .validate()
        .map_err(|e| KMeansError::InvalidOptions {
            reason: e.to_string(),
        })?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.map(usize::from))
        .build_scoped(|pool| {
            let workers = pool.num_threads();
            pool.install(|| {
                LloydKMeans::new(samples, centroids, options, workers).map(LloydKMeans::run)
            })
        })
        .map_err(|e| KMeansError::ThreadPool {
            reason: e.to_string(),
        })?
}
