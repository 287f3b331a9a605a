use core::fmt;
use core::hash::{Hash, Hasher};

use super::error::ListResult;

cfg_if::cfg_if! {
    if #[cfg(feature = "no-std")] {
        use alloc::vec::Vec;
    } else {
        use std::vec::Vec;
    }
}

/// anything that knows how many elements it holds
pub trait Len {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// a group of elements that can be walked in order, grown and shrunk
pub trait Container<T>: Len {
    type Iter<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    /// iterate over every element in container order
    fn iter(&self) -> Self::Iter<'_>;

    /// add an element, returning true if the container changed
    fn add(&mut self, value: T) -> bool;

    /// remove the first element equal to `value`, returning whether one was
    /// found
    fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq;

    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    fn clear(&mut self);

    /// copy every element out into a `Vec`, in container order
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

/// a container whose elements are addressed by position
pub trait Sequence<T>: Container<T> {
    fn get(&self, index: usize) -> ListResult<&T>;

    /// replace the element at `index`, returning the one it displaced
    fn set(&mut self, index: usize, value: T) -> ListResult<T>;

    /// insert at `index`, where `index == len()` appends
    fn insert(&mut self, index: usize, value: T) -> ListResult<()>;

    fn remove_at(&mut self, index: usize) -> ListResult<T>;
}

/// a first-in first-out view of a container
pub trait Queue<T>: Container<T> {
    /// the element that `dequeue` would return, without removing it
    fn element(&self) -> ListResult<&T>;

    fn dequeue(&mut self) -> ListResult<T>;
}

/// render any container as `[a, b, c]`
pub fn fmt_container<T, C>(container: &C, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    T: fmt::Display,
    C: Container<T> + ?Sized,
{
    f.write_str("[")?;
    for (i, value) in container.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt::Display::fmt(value, f)?;
    }
    f.write_str("]")
}

/// two containers are equal when they hold equal elements in the same order,
/// regardless of their concrete types
pub fn containers_eq<T, A, B>(lhs: &A, rhs: &B) -> bool
where
    T: PartialEq,
    A: Container<T> + ?Sized,
    B: Container<T> + ?Sized,
{
    lhs.len() == rhs.len() && lhs.iter().eq(rhs.iter())
}

/// feed a container's length and then each element to `state`
pub fn hash_container<T, C, H>(container: &C, state: &mut H)
where
    T: Hash,
    C: Container<T> + ?Sized,
    H: Hasher,
{
    state.write_usize(container.len());
    for value in container.iter() {
        value.hash(state);
    }
}
