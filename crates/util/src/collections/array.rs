use std::ops::{Deref, DerefMut, Index, IndexMut};

use crate::{Error, Result};

/// A heap allocated slice whose length is fixed at construction.
#[repr(transparent)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Array<T> {
    inner: Box<[T]>,
}

impl<T> Array<T> {
    /// Allocate `len` slots, each produced by `init`.
    pub fn filled_with(len: impl TryInto<usize>, init: impl FnMut() -> T) -> Result<Self> {
        let len = crate::try_cast_usize!(len, "array length is negative or exceeds usize")?;
        let mut inner = Vec::new();
        inner
            .try_reserve_exact(len)
            .map_err(|_| Error::InvalidArgument("array length exceeds available memory"))?;
        inner.extend(std::iter::repeat_with(init).take(len));
        Ok(Self {
            inner: inner.into_boxed_slice(),
        })
    }

    pub fn as_slice(&self) -> &[T] {
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(value: Vec<T>) -> Self {
        Self {
            inner: value.into_boxed_slice(),
        }
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> DerefMut for Array<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<Idx, T> Index<Idx> for Array<T>
where
    Idx: TryInto<usize>,
{
    type Output = T;
    fn index(&self, index: Idx) -> &Self::Output {
        let Ok(index) = index.try_into() else {
            panic!("array index is not representable as usize")
        };
        &self.inner[index]
    }
}

impl<Idx, T> IndexMut<Idx> for Array<T>
where
    Idx: TryInto<usize>,
{
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        let Ok(index) = index.try_into() else {
            panic!("array index is not representable as usize")
        };
        &mut self.inner[index]
    }
}
