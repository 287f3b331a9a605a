use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::cursor::Cursor;
use super::error::{ListError, ListResult};
use super::node::{NodeIndex, Slot, BEGIN, END};
use super::traits::{self, Container, Len, Queue, Sequence};

cfg_if::cfg_if! {
    if #[cfg(feature = "no-std")] {
        use alloc::vec::Vec;
    } else {
        use std::vec::Vec;
    }
}

/// source of identity tokens so a cursor can tell which list created it
static NEXT_LIST_ID: AtomicUsize = AtomicUsize::new(0);

/// a doubly-linked list bracketed by two permanent sentinel nodes. nodes live
/// in an arena and link to each other by index; removed slots are recycled
/// through a free list.
///
/// every structural change (insert, remove, clear) bumps a modification
/// count. [`Cursor`]s capture that count when created and refuse to operate
/// once it no longer matches.
pub struct LinkedList<T> {
    /// node arena. slots `BEGIN` and `END` are always the sentinels
    slots: Vec<Slot<T>>,
    /// head of the chain of vacant slots available for reuse
    free: Option<NodeIndex>,
    /// the number of data nodes strictly between the sentinels
    len: usize,
    pub(crate) mod_count: u64,
    pub(crate) id: usize,
}

impl<T> LinkedList<T> {
    /// create an empty list with its two sentinels linked to each other
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// create an empty list with arena room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(2));
        slots.push(Slot::sentinel());
        slots.push(Slot::sentinel());
        Self {
            slots,
            free: None,
            len: 0,
            mod_count: 0,
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// get the length of the list, not including the sentinels
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// the current fail-fast token. it changes on every structural mutation
    /// and never on reads or on [`set`](Self::set)
    pub fn modification_count(&self) -> u64 {
        self.mod_count
    }

    /// drop every element and reset the arena to just the two sentinels
    pub fn clear(&mut self) {
        log::trace!("clearing list of {} elements", self.len);
        self.slots.truncate(2);
        self.slots[BEGIN] = Slot::sentinel();
        self.slots[END] = Slot::sentinel();
        self.free = None;
        self.len = 0;
        self.bump_mod_count();
    }

    pub fn get(&self, index: usize) -> ListResult<&T> {
        let idx = self.element_at(index)?;
        Ok(self.data(idx))
    }

    pub fn get_mut(&mut self, index: usize) -> ListResult<&mut T> {
        let idx = self.element_at(index)?;
        Ok(self.data_mut(idx))
    }

    /// replace the element at `index`, returning the old one. this is not a
    /// structural change, so live cursors stay valid.
    pub fn set(&mut self, index: usize, value: T) -> ListResult<T> {
        Ok(core::mem::replace(self.get_mut(index)?, value))
    }

    /// get the first element, or None if the list is empty
    pub fn front(&self) -> Option<&T> {
        self.slots[self.slots[BEGIN].next()].data()
    }

    /// get the last element, or None if the list is empty
    pub fn back(&self) -> Option<&T> {
        self.slots[self.slots[END].prev()].data()
    }

    /// insert `value` so that it ends up at `index`. `index == len()` appends.
    pub fn insert(&mut self, index: usize, value: T) -> ListResult<()> {
        let successor = self.node_at(index, 0, self.len)?;
        self.link_before(successor, value);
        Ok(())
    }

    pub fn push_front(&mut self, value: T) {
        let successor = self.slots[BEGIN].next();
        self.link_before(successor, value);
    }

    pub fn push_back(&mut self, value: T) {
        self.link_before(END, value);
    }

    /// remove and return the element at `index`
    pub fn remove(&mut self, index: usize) -> ListResult<T> {
        let idx = self.element_at(index)?;
        Ok(self.unlink(idx))
    }

    /// remove and return the first element. fails with
    /// [`ListError::Underflow`] on an empty list
    pub fn pop_front(&mut self) -> ListResult<T> {
        if self.is_empty() {
            return Err(ListError::Underflow);
        }
        let first = self.slots[BEGIN].next();
        Ok(self.unlink(first))
    }

    /// remove and return the last element. fails with
    /// [`ListError::Underflow`] on an empty list
    pub fn pop_back(&mut self) -> ListResult<T> {
        if self.is_empty() {
            return Err(ListError::Underflow);
        }
        let last = self.slots[END].prev();
        Ok(self.unlink(last))
    }

    /// remove the first element equal to `value`. returns whether anything
    /// was removed
    pub fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.find(value) {
            Some(idx) => {
                self.unlink(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(value).is_some()
    }

    /// create a cursor positioned before the element at `index`. `index ==
    /// len()` is allowed and yields a cursor past the last element, suitable
    /// for walking backward.
    pub fn cursor(&self, index: usize) -> ListResult<Cursor> {
        let current = self.node_at(index, 0, self.len)?;
        Ok(Cursor::new(self, current))
    }

    /// return an immutable front-to-back iterator
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.slots[BEGIN].next(),
            back: self.slots[END].prev(),
            remaining: self.len,
        }
    }

    /// return a mutable front-to-back iterator
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: self.slots[BEGIN].next(),
            back: self.slots[END].prev(),
            remaining: self.len,
            slots: self.slots.as_mut_ptr(),
            _marker: PhantomData,
        }
    }

    /// resolve `index` to an arena slot, walking from whichever sentinel is
    /// nearer. `index == len` resolves to the end sentinel.
    pub(crate) fn node_at(
        &self,
        index: usize,
        lower: usize,
        upper: usize,
    ) -> ListResult<NodeIndex> {
        debug_assert!(upper <= self.len);
        if index < lower || index > upper {
            return Err(ListError::OutOfRange {
                index,
                len: self.len,
            });
        }

        if index < self.len / 2 {
            let mut curr = self.slots[BEGIN].next();
            for _ in 0..index {
                curr = self.slots[curr].next();
            }
            Ok(curr)
        } else {
            let mut curr = END;
            for _ in index..self.len {
                curr = self.slots[curr].prev();
            }
            Ok(curr)
        }
    }

    /// resolve `index` to a data node, failing on `index >= len`
    fn element_at(&self, index: usize) -> ListResult<NodeIndex> {
        match self.len.checked_sub(1) {
            Some(last) => self.node_at(index, 0, last),
            None => Err(ListError::OutOfRange { index, len: 0 }),
        }
    }

    pub(crate) fn next_of(&self, idx: NodeIndex) -> NodeIndex {
        self.slots[idx].next()
    }

    pub(crate) fn prev_of(&self, idx: NodeIndex) -> NodeIndex {
        self.slots[idx].prev()
    }

    pub(crate) fn data(&self, idx: NodeIndex) -> &T {
        match self.slots[idx].data() {
            Some(data) => data,
            None => unreachable!("LinkedList implementation will never vend sentinels"),
        }
    }

    fn data_mut(&mut self, idx: NodeIndex) -> &mut T {
        match self.slots[idx].data_mut() {
            Some(data) => data,
            None => unreachable!("LinkedList implementation will never vend sentinels"),
        }
    }

    fn find(&self, value: &T) -> Option<NodeIndex>
    where
        T: PartialEq,
    {
        let mut curr = self.slots[BEGIN].next();
        while curr != END {
            if self.data(curr) == value {
                return Some(curr);
            }
            curr = self.slots[curr].next();
        }
        None
    }

    /// splice a new node holding `value` in front of `successor`
    // Before: (pred) <-> (successor)
    // After: (pred) <-> (new) <-> (successor)
    fn link_before(&mut self, successor: NodeIndex, value: T) -> NodeIndex {
        let pred = self.slots[successor].prev();
        let idx = self.alloc(Slot::Data {
            prev: pred,
            data: value,
            next: successor,
        });
        self.slots[pred].set_next(idx);
        self.slots[successor].set_prev(idx);

        self.len += 1;
        self.bump_mod_count();
        idx
    }

    /// remove the node at `idx` from the chain, leaving its neighbours linked
    /// to each other, and return its value
    pub(crate) fn unlink(&mut self, idx: NodeIndex) -> T {
        let (prev, next) = {
            let slot = &self.slots[idx];
            assert!(!slot.is_sentinel(), "sentinels are never unlinked");
            (slot.prev(), slot.next())
        };
        self.slots[prev].set_next(next);
        self.slots[next].set_prev(prev);

        self.len -= 1;
        self.bump_mod_count();
        self.release(idx)
    }

    fn alloc(&mut self, slot: Slot<T>) -> NodeIndex {
        match self.free {
            Some(idx) => {
                self.free = match self.slots[idx] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Sentinel { .. } | Slot::Data { .. } => {
                        unreachable!("free list points at an occupied slot")
                    }
                };
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: NodeIndex) -> T {
        let data = self.slots[idx].vacate(self.free);
        self.free = Some(idx);
        data
    }

    fn bump_mod_count(&mut self) {
        self.mod_count = self.mod_count.wrapping_add(1);
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        let mut list = Self::with_capacity(self.len);
        list.extend(self.iter().cloned());
        list
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        traits::fmt_container(self, f)
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        traits::containers_eq(self, other)
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: Hash> Hash for LinkedList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        traits::hash_container(self, state);
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Len for LinkedList<T> {
    fn len(&self) -> usize {
        LinkedList::len(self)
    }
}

impl<T> Container<T> for LinkedList<T> {
    type Iter<'a>
        = Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        LinkedList::iter(self)
    }

    fn add(&mut self, value: T) -> bool {
        self.push_back(value);
        true
    }

    fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        LinkedList::remove_value(self, value)
    }

    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        LinkedList::contains(self, value)
    }

    fn clear(&mut self) {
        LinkedList::clear(self);
    }
}

impl<T> Sequence<T> for LinkedList<T> {
    fn get(&self, index: usize) -> ListResult<&T> {
        LinkedList::get(self, index)
    }

    fn set(&mut self, index: usize, value: T) -> ListResult<T> {
        LinkedList::set(self, index, value)
    }

    fn insert(&mut self, index: usize, value: T) -> ListResult<()> {
        LinkedList::insert(self, index, value)
    }

    fn remove_at(&mut self, index: usize) -> ListResult<T> {
        LinkedList::remove(self, index)
    }
}

impl<T> Queue<T> for LinkedList<T> {
    fn element(&self) -> ListResult<&T> {
        self.front().ok_or(ListError::Underflow)
    }

    fn dequeue(&mut self) -> ListResult<T> {
        self.pop_front()
    }
}

pub struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    front: NodeIndex,
    back: NodeIndex,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = &self.list.slots[self.front];
        self.front = slot.next();
        self.remaining -= 1;
        slot.data()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = &self.list.slots[self.back];
        self.back = slot.prev();
        self.remaining -= 1;
        slot.data()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

pub struct IterMut<'a, T> {
    slots: *mut Slot<T>,
    front: NodeIndex,
    back: NodeIndex,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: `front` is a linked data slot inside the arena, which is
        // mutably borrowed for 'a. each slot is yielded at most once because
        // `remaining` stops the walk before `front` and `back` cross.
        unsafe {
            let slot = &mut *self.slots.add(self.front);
            self.front = slot.next();
            self.remaining -= 1;
            slot.data_mut()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: see `next`
        unsafe {
            let slot = &mut *self.slots.add(self.back);
            self.back = slot.prev();
            self.remaining -= 1;
            slot.data_mut()
        }
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}
impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// owning iterator, draining the list from either end
pub struct IntoIter<T> {
    list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn abc() -> LinkedList<u32> {
        let mut ll = LinkedList::new();
        ll.push_back(1);
        ll.push_back(2);
        ll.push_back(3);
        ll
    }

    #[test]
    fn new_list_is_empty() {
        let ll = LinkedList::<u32>::new();
        assert_eq!(ll.len(), 0);
        assert!(ll.is_empty());
        assert!(ll.front().is_none());
        assert!(ll.back().is_none());
        assert_eq!(ll.slots[BEGIN].next(), END);
        assert_eq!(ll.slots[END].prev(), BEGIN);
    }

    #[test]
    fn push_back_three_then_index() {
        let ll = abc();
        assert_eq!(ll.len(), 3);
        assert_eq!(ll.get(0), Ok(&1));
        assert_eq!(ll.get(1), Ok(&2));
        assert_eq!(ll.get(2), Ok(&3));
    }

    #[test]
    fn push_front_reverses_order() {
        let mut ll = LinkedList::new();
        for i in 0..4 {
            ll.push_front(i);
        }
        assert_eq!(ll.to_vec(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn get_out_of_range_reports_index_and_len() {
        let ll = abc();
        assert_eq!(ll.get(3), Err(ListError::OutOfRange { index: 3, len: 3 }));
        let empty = LinkedList::<u32>::new();
        assert_eq!(
            empty.get(0),
            Err(ListError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn set_replaces_without_structural_change() {
        let mut ll = abc();
        let before = ll.modification_count();
        assert_eq!(ll.set(1, 20), Ok(2));
        assert_eq!(ll.get(1), Ok(&20));
        assert_eq!(ll.modification_count(), before);
        assert_eq!(
            ll.set(3, 0),
            Err(ListError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn insert_at_every_position_round_trips() {
        for i in 0..=3 {
            let mut ll = abc();
            ll.insert(i, 99).expect("index within [0, len]");
            assert_eq!(ll.get(i), Ok(&99));
            assert_eq!(ll.len(), 4);
        }
    }

    #[test]
    fn insert_past_end_leaves_list_untouched() {
        let mut ll = abc();
        let before = ll.modification_count();
        assert_eq!(
            ll.insert(5, 7),
            Err(ListError::OutOfRange { index: 5, len: 3 })
        );
        assert_eq!(ll.len(), 3);
        assert_eq!(ll.modification_count(), before);
        assert_eq!(ll.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn remove_returns_value_and_relinks() {
        let mut ll = abc();
        assert_eq!(ll.remove(1), Ok(2));
        assert_eq!(ll.to_vec(), vec![1, 3]);
        assert_eq!(ll.iter().rev().copied().collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(
            ll.remove(2),
            Err(ListError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn remove_on_empty_is_out_of_range() {
        let mut ll = LinkedList::<u32>::new();
        assert_eq!(
            ll.remove(0),
            Err(ListError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn pop_on_empty_underflows() {
        let mut ll = LinkedList::<u32>::new();
        assert_eq!(ll.pop_front(), Err(ListError::Underflow));
        assert_eq!(ll.pop_back(), Err(ListError::Underflow));
        assert_eq!(ll.dequeue(), Err(ListError::Underflow));
        assert_eq!(ll.element(), Err(ListError::Underflow));
    }

    #[test]
    fn push_back_pop_front_is_fifo() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let values: Vec<u32> = (0..256).map(|_| rng.gen()).collect();
        let mut ll = LinkedList::new();
        for v in values.iter() {
            ll.push_back(*v);
        }
        for v in values.iter() {
            assert_eq!(ll.element(), Ok(v));
            assert_eq!(ll.dequeue(), Ok(*v));
        }
        assert!(ll.is_empty());
    }

    #[test]
    fn pop_back_is_lifo() {
        let mut ll = abc();
        assert_eq!(ll.pop_back(), Ok(3));
        assert_eq!(ll.pop_back(), Ok(2));
        assert_eq!(ll.pop_back(), Ok(1));
        assert_eq!(ll.pop_back(), Err(ListError::Underflow));
    }

    #[test]
    fn remove_value_takes_first_match_only() {
        let mut ll: LinkedList<u32> = [1, 2, 1, 3].into_iter().collect();
        assert!(ll.remove_value(&1));
        assert_eq!(ll.to_vec(), vec![2, 1, 3]);
        assert!(!ll.remove_value(&7));
        assert_eq!(ll.len(), 3);
    }

    #[test]
    fn absent_values_match_absent_elements() {
        let mut ll: LinkedList<Option<u32>> =
            [Some(1), None, Some(2)].into_iter().collect();
        assert!(ll.contains(&None));
        assert!(ll.remove_value(&None));
        assert!(!ll.contains(&None));
        assert_eq!(ll.to_vec(), vec![Some(1), Some(2)]);
    }

    #[test]
    fn contains_is_stable_without_mutation() {
        let ll = abc();
        for _ in 0..3 {
            assert!(ll.contains(&2));
            assert!(!ll.contains(&4));
        }
    }

    #[test]
    fn structural_changes_bump_mod_count_reads_do_not() {
        let mut ll = LinkedList::new();
        let mut last = ll.modification_count();
        let mut expect_bump = |ll: &LinkedList<u32>| {
            assert_ne!(ll.modification_count(), last);
            last = ll.modification_count();
        };

        ll.push_back(1);
        expect_bump(&ll);
        ll.push_front(0);
        expect_bump(&ll);
        ll.insert(1, 5).unwrap();
        expect_bump(&ll);
        ll.remove(1).unwrap();
        expect_bump(&ll);
        ll.remove_value(&0);
        expect_bump(&ll);
        ll.clear();
        expect_bump(&ll);

        let _ = ll.get(0);
        let _ = ll.contains(&1);
        let _ = ll.iter().count();
        assert_eq!(ll.modification_count(), last);
    }

    #[test]
    fn clear_resets_to_sentinels() {
        let mut ll = abc();
        ll.clear();
        assert!(ll.is_empty());
        assert_eq!(ll.slots.len(), 2);
        assert_eq!(ll.slots[BEGIN].next(), END);
        assert_eq!(ll.slots[END].prev(), BEGIN);
        assert!(ll.free.is_none());

        ll.push_back(4);
        assert_eq!(ll.to_vec(), vec![4]);
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut ll = abc();
        let arena = ll.slots.len();
        ll.remove(0).unwrap();
        ll.remove(0).unwrap();
        ll.push_back(4);
        ll.push_back(5);
        assert_eq!(ll.slots.len(), arena);
        assert_eq!(ll.to_vec(), vec![3, 4, 5]);
    }

    #[test]
    fn node_at_walks_from_either_end() {
        let ll: LinkedList<u32> = (0..9).collect();
        for i in 0..9 {
            let idx = ll.node_at(i, 0, ll.len() - 1).unwrap();
            assert_eq!(*ll.data(idx), i as u32);
        }
        assert_eq!(ll.node_at(9, 0, ll.len()), Ok(END));
        assert_eq!(
            ll.node_at(9, 0, ll.len() - 1),
            Err(ListError::OutOfRange { index: 9, len: 9 })
        );
        assert_eq!(
            ll.node_at(1, 2, 5),
            Err(ListError::OutOfRange { index: 1, len: 9 })
        );
    }

    #[test]
    fn iter_is_double_ended_and_exact() {
        let ll: LinkedList<u32> = (0..5).collect();
        let mut iter = ll.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn iter_terminates_properly() {
        let ll: LinkedList<u32> = [42].into_iter().collect();
        let mut iter = ll.iter();
        assert_eq!(iter.next(), Some(&42));
        for _ in 0..10 {
            assert!(iter.next().is_none());
            assert!(iter.next_back().is_none());
        }
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut ll: LinkedList<u32> = [73, 42, 114, 901].into_iter().collect();
        for v in ll.iter_mut() {
            *v += 1;
        }
        if let Some(last) = ll.iter_mut().next_back() {
            *last = 0;
        }
        assert_eq!(ll.to_vec(), vec![74, 43, 115, 0]);
    }

    #[test]
    fn into_iter_drains_both_ends() {
        let ll: LinkedList<u32> = (1..=4).collect();
        let mut iter = ll.into_iter();
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn equality_hash_and_display() {
        use std::collections::hash_map::DefaultHasher;

        let a = abc();
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a.id, b.id);

        let hash = |ll: &LinkedList<u32>| {
            let mut h = DefaultHasher::new();
            ll.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&a), hash(&b));

        let c: LinkedList<u32> = [1, 2].into_iter().collect();
        assert_ne!(a, c);

        assert_eq!(a.to_string(), "[1, 2, 3]");
        assert_eq!(format!("{:?}", a), "[1, 2, 3]");
    }

    #[test]
    fn drives_through_capability_traits() {
        fn fill<S: Sequence<u32>>(s: &mut S) {
            s.insert(0, 2).unwrap();
            s.insert(0, 1).unwrap();
            s.insert(2, 3).unwrap();
            assert!(s.add(4));
        }

        let mut ll = LinkedList::new();
        fill(&mut ll);
        assert_eq!(Sequence::get(&ll, 3), Ok(&4));
        assert_eq!(Sequence::remove_at(&mut ll, 0), Ok(1));
        assert!(Container::contains(&ll, &3));
        assert!(Container::remove_value(&mut ll, &3));
        assert_eq!(Container::to_vec(&ll), vec![2, 4]);
        assert!(!Len::is_empty(&ll));
        Container::clear(&mut ll);
        assert!(Len::is_empty(&ll));
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use std::collections::VecDeque;

    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};

    use super::*;

    proptest_state_machine::prop_state_machine! {
        #![proptest_config(Config {
            failure_persistence: None,
            .. Config::default()
        })]

        #[test]
        fn linked_list_state_machine_test(
            sequential
            100..500
            =>
            LinkedList<u32>
        );
    }

    #[derive(Clone, Debug)]
    pub enum Transition {
        PushFront(u32),
        PopFront,
        PushBack(u32),
        PopBack,
        Insert(usize, u32),
        Remove(usize),
        Set(usize, u32),
        RemoveValue(u32),
        Clear,
    }

    pub struct LinkedListStateMachine;

    impl ReferenceStateMachine for LinkedListStateMachine {
        type State = VecDeque<u32>;
        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(VecDeque::new()).boxed()
        }

        fn transitions(state: &Self::State) -> BoxedStrategy<Self::Transition> {
            let len = state.len();
            // small value range so remove-by-value actually finds matches
            let value = 0..16u32;
            if len == 0 {
                prop_oneof![
                    1 => Just(Transition::PopFront),
                    2 => value.clone().prop_map(Transition::PushFront),
                    1 => Just(Transition::PopBack),
                    2 => value.clone().prop_map(Transition::PushBack),
                    1 => value.prop_map(|v| Transition::Insert(0, v)),
                ]
                .boxed()
            } else {
                prop_oneof![
                    2 => Just(Transition::PopFront),
                    3 => value.clone().prop_map(Transition::PushFront),
                    2 => Just(Transition::PopBack),
                    3 => value.clone().prop_map(Transition::PushBack),
                    3 => (0..=len, value.clone()).prop_map(|(i, v)| Transition::Insert(i, v)),
                    2 => (0..len).prop_map(Transition::Remove),
                    2 => (0..len, value.clone()).prop_map(|(i, v)| Transition::Set(i, v)),
                    2 => value.prop_map(Transition::RemoveValue),
                    1 => Just(Transition::Clear),
                ]
                .boxed()
            }
        }

        fn preconditions(state: &Self::State, transition: &Self::Transition) -> bool {
            match transition {
                Transition::Insert(i, _) => *i <= state.len(),
                Transition::Remove(i) | Transition::Set(i, _) => *i < state.len(),
                _ => true,
            }
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            match transition {
                Transition::PushFront(v) => state.push_front(*v),
                Transition::PopFront => {
                    state.pop_front();
                }
                Transition::PushBack(v) => state.push_back(*v),
                Transition::PopBack => {
                    state.pop_back();
                }
                Transition::Insert(i, v) => state.insert(*i, *v),
                Transition::Remove(i) => {
                    state.remove(*i);
                }
                Transition::Set(i, v) => state[*i] = *v,
                Transition::RemoveValue(v) => {
                    if let Some(i) = state.iter().position(|x| x == v) {
                        state.remove(i);
                    }
                }
                Transition::Clear => state.clear(),
            }
            state
        }
    }

    impl StateMachineTest for LinkedList<u32> {
        type SystemUnderTest = Self;
        type Reference = LinkedListStateMachine;

        fn init_test(
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            Self::new()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            transition: Transition,
        ) -> Self::SystemUnderTest {
            match transition {
                Transition::PushFront(v) => state.push_front(v),
                Transition::PopFront => {
                    let was_empty = state.is_empty();
                    let popped = state.pop_front();
                    assert_eq!(was_empty, popped == Err(ListError::Underflow));
                }
                Transition::PushBack(v) => state.push_back(v),
                Transition::PopBack => {
                    let was_empty = state.is_empty();
                    let popped = state.pop_back();
                    assert_eq!(was_empty, popped == Err(ListError::Underflow));
                }
                Transition::Insert(i, v) => state.insert(i, v).expect("precondition holds"),
                Transition::Remove(i) => {
                    state.remove(i).expect("precondition holds");
                }
                Transition::Set(i, v) => {
                    state.set(i, v).expect("precondition holds");
                }
                Transition::RemoveValue(v) => {
                    let expected = state.contains(&v);
                    assert_eq!(state.remove_value(&v), expected);
                }
                Transition::Clear => state.clear(),
            }
            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            assert_eq!(state.len(), ref_state.len());
            assert!(state.iter().eq(ref_state.iter()));
            assert!(state.iter().rev().eq(ref_state.iter().rev()));
            assert_eq!(state.front(), ref_state.front());
            assert_eq!(state.back(), ref_state.back());

            let occupied = state
                .slots
                .iter()
                .filter(|s| matches!(s, Slot::Data { .. }))
                .count();
            assert_eq!(occupied, state.len());
        }
    }
}
