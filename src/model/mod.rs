//! Domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary so
//! that the tracker, store and reports work with typed Discord IDs and
//! timestamps rather than database rows.

pub mod notification;
pub mod range;
pub mod report;
pub mod session;
