//! md5verify Core Library
//!
//! This crate provides the types and error handling shared by the
//! manifest parser, the comparator and the command-line tool.

pub mod error;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use types::*;
