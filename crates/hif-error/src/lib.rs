//! # hif-error
//!
//! Unified error handling for hif-core, following OpenDAL's error handling practices.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., UnexpectedCase, SpanTooWide)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context (offending node kind, ids)
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use hif_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::UnexpectedCase, "unhandled node kind in comparator")
//!         .with_operation("compare::compare")
//!         .with_context("kind", "Entity"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fatal conditions return `Result<T, hif_error::Error>`
//! - Policy failures (e.g. truncation disallowed) are modeled as `Option::None`, not errors
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the hif-core Error
pub type Result<T> = std::result::Result<T, Error>;
