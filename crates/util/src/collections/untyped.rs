use std::any::{Any, TypeId};

/// The declared element type of an [UntypedArray].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementType {
    /// Any value may be stored.
    Any,
    /// Only values of exactly this type may be stored.
    Of { id: TypeId, name: &'static str },
}

/// A dynamically typed array, the destination of [Stack::copy_to_untyped](super::Stack::copy_to_untyped).
///
/// Elements are stored row-major across `dimensions`; only one-dimensional arrays are accepted as
/// copy destinations.
#[derive(Debug)]
pub struct UntypedArray {
    element: ElementType,
    dimensions: Vec<usize>,
    slots: Vec<Option<Box<dyn Any>>>,
}

impl ElementType {
    pub fn of<E: Any>() -> Self {
        Self::Of {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
        }
    }

    pub fn accepts<E: Any>(&self) -> bool {
        match self {
            Self::Any => true,
            Self::Of { id, .. } => *id == TypeId::of::<E>(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "dyn Any",
            Self::Of { name, .. } => *name,
        }
    }
}

impl UntypedArray {
    /// A one-dimensional array of `len` empty slots holding `E`.
    pub fn new<E: Any>(len: usize) -> Self {
        Self::with_dimensions(ElementType::of::<E>(), &[len])
    }

    /// A one-dimensional array of `len` empty slots holding anything.
    pub fn of_any(len: usize) -> Self {
        Self::with_dimensions(ElementType::Any, &[len])
    }

    pub fn with_dimensions(element: ElementType, dimensions: &[usize]) -> Self {
        let len = dimensions.iter().product();
        Self {
            element,
            dimensions: dimensions.to_vec(),
            slots: std::iter::repeat_with(|| None).take(len).collect(),
        }
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Total number of slots across all dimensions.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn element_type(&self) -> ElementType {
        self.element
    }

    /// Borrow the value at `index` if it is present and is an `E`.
    pub fn get<E: Any>(&self, index: usize) -> Option<&E> {
        self.slots.get(index)?.as_ref()?.downcast_ref()
    }

    pub(crate) fn store(&mut self, index: usize, value: Box<dyn Any>) {
        debug_assert!(index < self.slots.len());
        self.slots[index] = Some(value);
    }
}
