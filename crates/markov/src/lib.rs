//! Discrete-time Markov chains for asset deterioration.
//!
//! A [`MarkovModel`] is an immutable row-stochastic matrix over `N`
//! deterioration states, either given explicitly or built from `N - 1`
//! stay-or-advance probabilities.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │    model      │────▶│   simulate     │────▶│  persist/export  │
//!  │ (matrix M)    │     │ (M^t, curves)  │     │  (JSON, CSV)     │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use deterior_markov::{MarkovModel, ModelFile, SaveInfo};
//!
//! let model = MarkovModel::monotone(&[0.2, 0.3]).unwrap();
//! let curve = model.simulate_curve(0, 0, 5, 1).unwrap();
//! assert_eq!(curve.len(), 5);
//!
//! let info = SaveInfo::new("example", chrono::Utc::now());
//! let json = ModelFile::from_model(&model, info).to_json().unwrap();
//! let loaded = ModelFile::from_json(&json).unwrap().into_model().unwrap();
//! assert_eq!(loaded.n_state(), 3);
//! ```

pub mod curve;
pub mod error;
pub mod export;
pub(crate) mod matrix;
pub mod model;
pub mod persist;

pub use curve::LifeCurve;
pub use error::MarkovError;
pub use export::{write_curve_csv, write_matrix_csv};
pub use model::{MarkovModel, Variant};
pub use persist::{
    MatrixEntry, ModelFile, ModelMetadata, SaveInfo, VariantTag, load_model, save_model,
};
