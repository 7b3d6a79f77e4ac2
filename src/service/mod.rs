//! Service layer for attendance tracking and reporting.
//!
//! Services sit between the bot adapter and the data (repository) layer:
//!
//! - **Session Store**: bounded, retried, transactional access to the repositories
//! - **Presence Tracker**: turns voice events into session transitions
//! - **Reports**: read-only attendance queries and formatting

pub mod presence;
pub mod report;
pub mod session_store;
