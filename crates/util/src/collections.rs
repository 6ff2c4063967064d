pub mod array;
pub use array::Array;

pub mod stack;
pub use stack::{Iter, Stack, SyncRoot};

pub mod untyped;
pub use untyped::{ElementType, UntypedArray};
