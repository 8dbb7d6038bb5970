//! Inspection records and their reduction to transition histograms.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │ reader, xlsx  │────▶│   aggregate    │────▶│    histogram     │
//!  │ (CSV / Excel) │     │ (transitions)  │     │ (time × state)   │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use deterior_dataset::{ReaderConfig, TimeUnit, load_csv};
//!
//! let text = "ID,State,Time\nP1,A,2020-01-01\nP1,A,2020-01-05\nP1,B,2020-01-10\n";
//! let config = ReaderConfig::default().with_time_unit(TimeUnit::DAY);
//! let agg = load_csv(text.as_bytes(), &config).unwrap();
//!
//! assert_eq!(agg.n_state(), 2);
//! assert_eq!(agg.transitions.len(), 2);
//! let hist = agg.transitions.histogram();
//! assert_eq!(hist.final_states().counts(), &[1.0, 1.0]);
//! ```

pub mod aggregate;
pub mod error;
pub mod histogram;
pub mod reader;
pub mod record;
pub mod state_map;
pub mod time_unit;
pub mod xlsx;

pub use aggregate::{Aggregation, SkipReason, SkippedRow, aggregate};
pub use error::DatasetError;
pub use histogram::{FinalStateHistogram, Histogram, TimeStateHistogram};
pub use reader::{ReaderConfig, load_csv, read_csv, read_inspections};
pub use record::{InspectionRecord, TransitionRecord, TransitionSet};
pub use state_map::StateMap;
pub use time_unit::TimeUnit;
pub use xlsx::{read_xlsx, read_xlsx_inspections};
