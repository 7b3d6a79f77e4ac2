//! Factory methods for creating test data.
//!
//! Each table has its own factory module with both a `Factory` struct for
//! customization and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! // Closed session from t=0 to t=100 seconds
//! let session = factory::create_attendance_session(&db, 1, 10, 0, 100).await?;
//!
//! // Open session with custom fields
//! let open = factory::open_session::OpenSessionFactory::new(&db)
//!     .user_id(1)
//!     .channel_id(10)
//!     .confirmed(false)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `attendance_session` - Create closed attendance session rows
//! - `open_session` - Create open session snapshot rows
//! - `helpers` - ID generation and timestamp helpers

pub mod attendance_session;
pub mod helpers;
pub mod open_session;

// Re-export commonly used factory functions for concise usage
pub use attendance_session::create_attendance_session;
pub use helpers::at;
pub use open_session::create_open_session;
