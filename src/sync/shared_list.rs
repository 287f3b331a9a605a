use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::Ordering;

use crate::collections::LinkedList;

cfg_if::cfg_if! {
    if #[cfg(all(not(feature = "no-std"), all(test, feature = "loom")))] {
        use loom::sync::atomic::AtomicBool;

        fn relax() {
            loom::thread::yield_now();
        }
    } else {
        use core::sync::atomic::AtomicBool;

        fn relax() {
            core::hint::spin_loop();
        }
    }
}

const LOCKED: bool = true;
const UNLOCKED: bool = false;

/// a [`LinkedList`] behind a single spin lock, for sharing one list between
/// threads. the list itself has no internal synchronization, so every
/// operation on it (including creating and stepping cursors) goes through
/// the guard returned by [`lock`](SharedList::lock).
pub struct SharedList<T> {
    is_locked: AtomicBool,
    list: UnsafeCell<LinkedList<T>>,
}

// Safety: all access to `list` is serialized by `is_locked`
unsafe impl<T: Send> Send for SharedList<T> {}
unsafe impl<T: Send> Sync for SharedList<T> {}

impl<T> SharedList<T> {
    pub fn new() -> Self {
        Self::from_list(LinkedList::new())
    }

    pub fn from_list(list: LinkedList<T>) -> Self {
        Self {
            is_locked: AtomicBool::new(UNLOCKED),
            list: UnsafeCell::new(list),
        }
    }

    /// spin until the list is free, then hold it until the guard drops
    pub fn lock(&self) -> SharedListGuard<'_, T> {
        while self
            .is_locked
            .compare_exchange_weak(UNLOCKED, LOCKED, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            while self.is_locked.load(Ordering::Relaxed) == LOCKED {
                relax();
            }
        }

        SharedListGuard { shared: self }
    }

    /// take the lock only if nobody else holds it
    pub fn try_lock(&self) -> Option<SharedListGuard<'_, T>> {
        self.is_locked
            .compare_exchange(UNLOCKED, LOCKED, Ordering::AcqRel, Ordering::Relaxed)
            .ok()
            .map(|_| SharedListGuard { shared: self })
    }

    pub fn into_inner(self) -> LinkedList<T> {
        self.list.into_inner()
    }

    fn unlock(&self) {
        self.is_locked.store(UNLOCKED, Ordering::Release);
    }
}

impl<T> Default for SharedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<LinkedList<T>> for SharedList<T> {
    fn from(list: LinkedList<T>) -> Self {
        Self::from_list(list)
    }
}

/// exclusive access to a [`SharedList`]'s list. unlocks when dropped.
pub struct SharedListGuard<'a, T> {
    shared: &'a SharedList<T>,
}

impl<'a, T> Deref for SharedListGuard<'a, T> {
    type Target = LinkedList<T>;

    fn deref(&self) -> &LinkedList<T> {
        // Safety: holding the guard means holding the lock
        unsafe { &*self.shared.list.get() }
    }
}

impl<'a, T> DerefMut for SharedListGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut LinkedList<T> {
        // Safety: holding the guard means holding the lock
        unsafe { &mut *self.shared.list.get() }
    }
}

impl<'a, T> Drop for SharedListGuard<'a, T> {
    fn drop(&mut self) {
        self.shared.unlock();
    }
}
