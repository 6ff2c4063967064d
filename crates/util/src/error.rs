use thiserror::Error;

/// Errors raised by the fixed-capacity collections.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A constructor or copy argument is out of range or absent.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The collection is in a state that does not permit the operation.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
    /// A narrow count or capacity accessor cannot represent the value.
    #[error("value {0} does not fit the requested integer type")]
    Overflow(u64),
    /// The destination element type cannot hold the source elements.
    #[error("element type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
