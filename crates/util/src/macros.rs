/// Convert an expression to a usize using TryInto, mapping failure to
/// [`Error::InvalidArgument`](crate::Error::InvalidArgument).
#[macro_export]
macro_rules! try_cast_usize {
    ($e:expr, $what:literal) => {
        <_ as TryInto<usize>>::try_into($e).map_err(|_| $crate::Error::InvalidArgument($what))
    };
}
pub use try_cast_usize;
