//! Attendance Bot Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the
//! attendance bot. This crate offers a builder pattern for creating test contexts with
//! in-memory SQLite databases and customizable table schemas.
//!
//! # Overview
//!
//! The test utilities consist of these main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Insert attendance rows with sensible defaults
//! - **serenity**: Build Serenity models from JSON
//!
//! # Usage
//!
//! Use `TestBuilder` to create a test context with the required database tables:
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::AttendanceSession;
//!
//! #[tokio::test]
//! async fn test_session_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(AttendanceSession)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
