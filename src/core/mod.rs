//! Core types for plasticup
//!
//! This module holds the error system shared by every stage of the
//! install/upgrade run.
//!
//! # Error Management
//!
//! plasticup uses a two-layer error handling system designed for both
//! developer ergonomics and end-user experience:
//! - **Strongly-typed errors** ([`InstallerError`]) for precise error
//!   handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable
//!   suggestions for CLI users
//!
//! # Examples
//!
//! ```rust
//! use plasticup::core::{InstallerError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(InstallerError::VersionUnknown.into())
//! }
//!
//! fn handle_operation() {
//!     match example_operation() {
//!         Ok(result) => println!("Success: {}", result),
//!         Err(e) => {
//!             let friendly = user_friendly_error(e);
//!             friendly.display(); // Shows colored error with suggestions
//!         }
//!     }
//! }
//! ```

pub mod error;

pub use error::{user_friendly_error, ErrorContext, InstallerError};
