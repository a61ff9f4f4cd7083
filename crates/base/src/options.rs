use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// How worker contributions reach the per-cluster sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    /// One shared accumulator; every update is individually synchronized.
    Atomic,
    /// One accumulator per worker, merged cluster by cluster after the pass.
    #[default]
    Privatized,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "KMeansOptions::validate_self"))]
pub struct KMeansOptions {
    /// Stop once the fraction of reassigned objects is at or below this value.
    #[serde(default = "KMeansOptions::default_threshold")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub threshold: f32,
    #[serde(default = "KMeansOptions::default_max_iterations")]
    #[validate(range(min = 1))]
    pub max_iterations: u32,
    #[serde(default)]
    pub reduction: Reduction,
    /// Worker count; the platform's concurrency level when absent.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub threads: Option<u16>,
}

impl KMeansOptions {
    fn default_threshold() -> f32 {
        0.001
    }
    fn default_max_iterations() -> u32 {
        500
    }
    fn validate_self(&self) -> Result<(), ValidationError> {
        if !self.threshold.is_finite() {
            return Err(ValidationError::new("threshold must be a finite number"));
        }
        Ok(())
    }
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            threshold: Self::default_threshold(),
            max_iterations: Self::default_max_iterations(),
            reduction: Reduction::default(),
            threads: None,
        }
    }
}
