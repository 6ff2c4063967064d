use std::{
    any::Any,
    fmt,
    iter::FusedIterator,
};

use crate::{
    collections::{Array, UntypedArray},
    Error, Result,
};

/// Fixed capacity stack.
///
/// Storage is allocated once at construction and never grows. Vacated slots are reset to `None`
/// so the stack does not keep popped or cleared values alive.
pub struct Stack<T> {
    slots: Array<Option<T>>,
    len: usize,
    anchor: Box<u8>,
}

/// Identity token handed out by [Stack::sync_root]. It is not a lock: callers that share a stack
/// between threads must bring their own mutual exclusion.
///
/// The token is the address of a one byte allocation owned by the stack, so it is stable across
/// moves and distinct between live stacks, including zero capacity ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SyncRoot(usize);

/// Lazy top-to-bottom iterator over a [Stack]. See [Stack::iter].
pub struct Iter<'a, T> {
    inner: std::iter::Rev<std::slice::Iter<'a, Option<T>>>,
}

impl<T> Stack<T> {
    /// Create a stack that holds at most `capacity` elements. Fails with
    /// [Error::InvalidArgument] if `capacity` is negative, does not fit in a `usize`, or cannot
    /// be allocated.
    pub fn new(capacity: impl TryInto<usize>) -> Result<Self> {
        let capacity =
            crate::try_cast_usize!(capacity, "stack capacity is negative or exceeds usize")?;
        let slots = Array::filled_with(capacity, || None)?;
        tracing::trace!(capacity, "allocated stack");
        Ok(Self {
            slots,
            len: 0,
            anchor: Box::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// True iff the stack holds `capacity` elements. A zero capacity stack is always full.
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Number of elements as an `i32`. See [Stack::count_as].
    pub fn count(&self) -> Result<i32> {
        self.count_as()
    }

    /// Number of elements converted to a narrower integer type, failing with
    /// [Error::Overflow] if it does not fit.
    pub fn count_as<I>(&self) -> Result<I>
    where
        I: TryFrom<usize>,
    {
        narrow(self.len)
    }

    pub fn long_count(&self) -> u64 {
        self.len as u64
    }

    /// Capacity as an `i32`. See [Stack::max_size_as].
    pub fn max_size(&self) -> Result<i32> {
        self.max_size_as()
    }

    /// Capacity converted to a narrower integer type, failing with [Error::Overflow] if it does
    /// not fit.
    pub fn max_size_as<I>(&self) -> Result<I>
    where
        I: TryFrom<usize>,
    {
        narrow(self.capacity())
    }

    pub fn max_capacity(&self) -> u64 {
        self.capacity() as u64
    }

    /// Push a value on top of the stack. Fails with [Error::InvalidOperation] if the stack is
    /// full, in which case the stack is left untouched and `value` is dropped.
    pub fn push(&mut self, value: T) -> Result<()> {
        let Some(slot) = self.slots.get_mut(self.len) else {
            return Err(Error::InvalidOperation("stack is full"));
        };
        *slot = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the top of the stack.
    pub fn pop(&mut self) -> Result<T> {
        let Some(top) = self.len.checked_sub(1) else {
            return Err(Error::InvalidOperation("stack is empty"));
        };
        self.len = top;
        let Some(value) = self.slots[top].take() else {
            unreachable!("live stack slot is empty")
        };
        Ok(value)
    }

    /// Borrow the top of the stack.
    pub fn peek(&self) -> Result<&T> {
        self.len
            .checked_sub(1)
            .and_then(|top| self.slots[top].as_ref())
            .ok_or(Error::InvalidOperation("stack is empty"))
    }

    /// Drop every element. The capacity is unchanged.
    pub fn clear(&mut self) {
        let len = self.len;
        self.slots.as_mut_slice()[..len]
            .iter_mut()
            .for_each(|slot| *slot = None);
        tracing::trace!(dropped = self.len, "cleared stack");
        self.len = 0;
    }

    /// Iterate from the most recently pushed element down to the oldest. Every call starts over
    /// from the current top.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.live().iter().rev(),
        }
    }

    /// Clone elements into `dest` starting at `dest[start]`, oldest first (the reverse of
    /// [Stack::iter]). Copying stops at the end of `dest`. Returns the number of elements copied.
    pub fn copy_to(&self, dest: &mut [T], start: usize) -> usize
    where
        T: Clone,
    {
        let dest = dest.get_mut(start..).unwrap_or_default();
        let mut copied = 0;
        for (slot, value) in dest.iter_mut().zip(self.bottom_up()) {
            slot.clone_from(value);
            copied += 1;
        }
        copied
    }

    /// [Stack::copy_to] for a dynamically typed destination.
    ///
    /// Fails with [Error::InvalidArgument] if `dest` is `None` or has more than one dimension,
    /// and with [Error::TypeMismatch] if its element type cannot hold a `T`.
    pub fn copy_to_untyped(&self, dest: Option<&mut UntypedArray>, start: usize) -> Result<usize>
    where
        T: Any + Clone,
    {
        let Some(dest) = dest else {
            return Err(Error::InvalidArgument("destination is absent"));
        };
        if dest.rank() != 1 {
            return Err(Error::InvalidArgument("destination must be one-dimensional"));
        }
        if !dest.element_type().accepts::<T>() {
            return Err(Error::TypeMismatch {
                expected: dest.element_type().name(),
                found: std::any::type_name::<T>(),
            });
        }
        let mut copied = 0;
        for (index, value) in (start..dest.len()).zip(self.bottom_up()) {
            dest.store(index, Box::new(value.clone()));
            copied += 1;
        }
        Ok(copied)
    }

    /// Always `true`. Kept for callers that inspect the flag; the stack performs no internal
    /// synchronization whatsoever.
    pub fn is_synchronized(&self) -> bool {
        true
    }

    /// A token unique to this stack instance, usable as a key for an external lock.
    pub fn sync_root(&self) -> SyncRoot {
        SyncRoot(&*self.anchor as *const u8 as usize)
    }

    fn live(&self) -> &[Option<T>] {
        &self.slots.as_slice()[..self.len]
    }

    fn bottom_up(&self) -> impl Iterator<Item = &T> {
        self.live().iter().flatten()
    }
}

fn narrow<I>(value: usize) -> Result<I>
where
    I: TryFrom<usize>,
{
    I::try_from(value).map_err(|_| Error::Overflow(value as u64))
}

impl<T> Clone for Stack<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
            anchor: Box::new(0),
        }
    }
}

impl<T> fmt::Debug for Stack<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("capacity", &self.capacity())
            .field("items", &self.bottom_up().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().and_then(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().and_then(Option::as_ref)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::Stack;
    use crate::{
        collections::{ElementType, UntypedArray},
        Error,
    };

    #[test]
    fn push_pop_peek_clear() {
        let mut stack = Stack::new(3).unwrap();
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        stack.push(3).unwrap();
        assert!(stack.is_full());
        assert!(matches!(stack.push(4), Err(Error::InvalidOperation(_))));
        assert_eq!(stack.len(), 3);

        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek(), Ok(&2));
        assert_eq!(stack.len(), 2);

        stack.clear();
        assert_eq!(stack.len(), 0);
        assert!(!stack.is_full());
        assert_eq!(stack.capacity(), 3);
    }

    #[test]
    fn empty() {
        let mut stack = Stack::<String>::new(2).unwrap();
        assert!(stack.is_empty());
        assert!(matches!(stack.pop(), Err(Error::InvalidOperation(_))));
        assert!(matches!(stack.peek(), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn zero_capacity() {
        let mut stack = Stack::new(0u64).unwrap();
        assert!(stack.is_full());
        assert!(matches!(stack.push('a'), Err(Error::InvalidOperation(_))));
        assert!(matches!(stack.pop(), Err(Error::InvalidOperation(_))));
        assert!(matches!(stack.peek(), Err(Error::InvalidOperation(_))));
        stack.clear();
        assert!(stack.is_full());
    }

    #[test]
    fn unallocatable_capacity() {
        assert!(matches!(
            Stack::<()>::new(i64::MAX),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Stack::<u64>::new(u64::MAX),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn negative_capacity() {
        assert!(matches!(
            Stack::<u8>::new(-1i32),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Stack::<u8>::new(i64::MIN),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn nullable_items() {
        let mut stack = Stack::new(2).unwrap();
        stack.push(None).unwrap();
        stack.push(Some("x")).unwrap();
        assert_eq!(stack.pop(), Ok(Some("x")));
        assert_eq!(stack.pop(), Ok(None));
    }

    #[test]
    fn narrow_accessors() {
        let mut stack = Stack::new(300).unwrap();
        assert_eq!(stack.count(), Ok(0));
        assert_eq!(stack.max_size(), Ok(300));
        assert_eq!(stack.max_capacity(), 300);
        assert_eq!(stack.max_size_as::<u8>(), Err(Error::Overflow(300)));

        for value in 0..256 {
            stack.push(value).unwrap();
        }
        assert_eq!(stack.count_as::<u16>(), Ok(256));
        assert_eq!(stack.count_as::<u8>(), Err(Error::Overflow(256)));
        assert_eq!(stack.long_count(), 256);
    }

    #[test]
    fn lifo_iteration() {
        let mut stack = Stack::new(4).unwrap();
        for value in ['a', 'b', 'c'] {
            stack.push(value).unwrap();
        }
        let items: Vec<_> = stack.iter().copied().collect();
        assert_eq!(items, ['c', 'b', 'a']);

        // Restartable, and reflects the state at the time of the call.
        stack.pop().unwrap();
        let items: Vec<_> = (&stack).into_iter().copied().collect();
        assert_eq!(items, ['b', 'a']);

        let iter = stack.iter();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.rev().copied().collect::<Vec<_>>(), ['a', 'b']);
    }

    #[test]
    fn copy_to() {
        let mut stack = Stack::new(3).unwrap();
        for value in [1, 2, 3] {
            stack.push(value).unwrap();
        }

        let mut dest = [0; 5];
        assert_eq!(stack.copy_to(&mut dest, 0), 3);
        assert_eq!(dest, [1, 2, 3, 0, 0]);

        let mut dest = [0; 4];
        assert_eq!(stack.copy_to(&mut dest, 2), 2);
        assert_eq!(dest, [0, 0, 1, 2]);

        let mut dest = [9; 2];
        assert_eq!(stack.copy_to(&mut dest, 7), 0);
        assert_eq!(dest, [9, 9]);
    }

    #[test]
    fn copy_to_untyped() {
        let mut stack = Stack::new(3).unwrap();
        for value in [1u32, 2, 3] {
            stack.push(value).unwrap();
        }

        let mut dest = UntypedArray::new::<u32>(4);
        assert_eq!(stack.copy_to_untyped(Some(&mut dest), 2), Ok(2));
        assert_eq!(dest.get::<u32>(1), None);
        assert_eq!(dest.get::<u32>(2), Some(&1));
        assert_eq!(dest.get::<u32>(3), Some(&2));

        let mut dest = UntypedArray::of_any(3);
        assert_eq!(stack.copy_to_untyped(Some(&mut dest), 0), Ok(3));
        assert_eq!(dest.get::<u32>(2), Some(&3));

        assert!(matches!(
            stack.copy_to_untyped(None, 0),
            Err(Error::InvalidArgument(_))
        ));

        let mut dest = UntypedArray::new::<String>(3);
        assert!(matches!(
            stack.copy_to_untyped(Some(&mut dest), 0),
            Err(Error::TypeMismatch { .. })
        ));

        let mut dest = UntypedArray::with_dimensions(ElementType::of::<u32>(), &[2, 2]);
        assert!(matches!(
            stack.copy_to_untyped(Some(&mut dest), 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn releases_ownership() {
        let value = Rc::new(());
        let mut stack = Stack::new(2).unwrap();
        stack.push(value.clone()).unwrap();
        stack.push(value.clone()).unwrap();
        assert_eq!(Rc::strong_count(&value), 3);

        drop(stack.pop().unwrap());
        assert_eq!(Rc::strong_count(&value), 2);

        stack.clear();
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn sync_marker() {
        let stack = Stack::<u8>::new(1).unwrap();
        let other = stack.clone();
        assert!(stack.is_synchronized());
        assert_eq!(stack.sync_root(), stack.sync_root());
        assert_ne!(stack.sync_root(), other.sync_root());

        let root = stack.sync_root();
        let moved = Box::new(stack);
        assert_eq!(moved.sync_root(), root);

        let empty = Stack::<u8>::new(0).unwrap();
        let also_empty = Stack::<u8>::new(0).unwrap();
        assert_ne!(empty.sync_root(), also_empty.sync_root());
    }

    #[test]
    fn debug() {
        let mut stack = Stack::new(3).unwrap();
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        assert_eq!(format!("{stack:?}"), "Stack { capacity: 3, items: [1, 2] }");
    }
}
