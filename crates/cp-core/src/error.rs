//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` covers the parsing
//! of core configuration values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid key precision {0}: at most {} decimals are supported", crate::key::MAX_DECIMALS)]
    PrecisionOutOfRange(usize),
}

/// Shorthand result type for `cp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
