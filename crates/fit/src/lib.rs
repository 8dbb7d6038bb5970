//! Bounded least-squares fitting of monotone Markov deterioration models.
//!
//! Given the transition histogram of a dataset, finds the `N - 1` advance
//! probabilities whose simulated end-state counts best match the observed
//! ones.
//!
//! # Search
//!
//! ```text
//!  ┌──────────────┐  loss > threshold  ┌────────────────────┐
//!  │ Nelder-Mead   │───────────────────▶│ differential       │
//!  │ (argmin)      │                    │ evolution + polish │
//!  └──────────────┘                    └────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use deterior_dataset::{Histogram, TransitionRecord};
//! use deterior_fit::{FitConfig, fit_monotone};
//!
//! let records = [
//!     TransitionRecord::new(0, 0, 1),
//!     TransitionRecord::new(0, 1, 1),
//! ];
//! let histogram = Histogram::from_transitions(2, &records).unwrap();
//! let outcome = fit_monotone(&histogram, &FitConfig::default()).unwrap();
//!
//! assert!(outcome.result.success);
//! assert!(outcome.model.is_some());
//! ```

pub mod config;
pub mod error;
pub mod estimator;
pub(crate) mod evolution;
pub(crate) mod local;
pub mod loss;

pub use config::{FitConfig, GlobalSearchConfig};
pub use error::FitError;
pub use estimator::{Estimator, FitOutcome, FitResult, SearchMethod, fit_monotone};
pub use loss::MonotoneLoss;
