//! Fixed-capacity collections.
//!
//! ```
//! use keel_util::collections::Stack;
//!
//! let mut stack = Stack::new(3).unwrap();
//! stack.push(1).unwrap();
//! stack.push(2).unwrap();
//! assert_eq!(stack.pop(), Ok(2));
//! assert_eq!(stack.peek(), Ok(&1));
//! ```
pub mod collections;
pub mod error;
pub mod macros;

pub use error::{Error, Result};
