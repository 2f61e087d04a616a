//! Output generation for aggregation results.
//!
//! The core hands back a plain `Vec<Article>`; this module is only used by the
//! binary to persist a run.
//!
//! # Submodules
//!
//! - [`json`]: Writes an [`json::AggregationReport`] to a date-partitioned JSON file
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── renewable-energy.json
//!     └── renewable-energy_solar.json
//! ```

pub mod json;
