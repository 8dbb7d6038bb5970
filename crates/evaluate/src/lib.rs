//! Validation and k-fold cross-validation of Markov deterioration models.
//!
//! [`validate`] scores a model by how closely its simulated end-state
//! counts match held-out transitions; [`cross_validate`] repeats fit and
//! score over k shuffled partitions of a dataset.

mod cross;
mod error;
mod validate;

pub use cross::{CrossValidationConfig, CrossValidationSummary, FoldResult, cross_validate};
pub use error::EvaluateError;
pub use validate::{ValidationResult, validate};
