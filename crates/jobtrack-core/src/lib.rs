//! Domain types for the job-application tracker: applications, resume
//! versions, statistics, input normalisation, and the [`store::TrackerStore`]
//! trait that backends implement.
//!
//! No I/O happens here. Anything that needs "today" takes it as an argument.

pub mod application;
pub mod error;
pub mod normalize;
pub mod resume;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
