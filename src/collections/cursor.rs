use super::error::{ListError, ListResult};
use super::linked_list::LinkedList;
use super::node::{NodeIndex, BEGIN, END};

/// an external, bidirectional position in a [`LinkedList`].
///
/// a cursor sits *between* elements: `next` yields the element after it and
/// `previous` the element before it. it borrows nothing, so several cursors
/// may exist over the same list at once; each call takes the list it was
/// created from.
///
/// the list's modification count is captured on creation. any structural
/// change made through something other than this cursor's own
/// [`remove_last_visited`](Cursor::remove_last_visited) makes every further
/// call fail with [`ListError::ConcurrentModification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    list_id: usize,
    /// the node `next` would yield, or the end sentinel
    current: NodeIndex,
    /// the node the last step returned, until it is removed
    last_visited: Option<NodeIndex>,
    last_move_was_backward: bool,
    expected_mod_count: u64,
}

impl Cursor {
    pub(crate) fn new<T>(list: &LinkedList<T>, current: NodeIndex) -> Self {
        Self {
            list_id: list.id,
            current,
            last_visited: None,
            last_move_was_backward: false,
            expected_mod_count: list.mod_count,
        }
    }

    /// true if `next` would yield an element
    pub fn has_next<T>(&self, list: &LinkedList<T>) -> ListResult<bool> {
        self.check(list)?;
        Ok(self.current != END)
    }

    /// yield the element after the cursor and move past it
    pub fn next<'a, T>(&mut self, list: &'a LinkedList<T>) -> ListResult<&'a T> {
        if !self.has_next(list)? {
            return Err(ListError::EndOfSequence);
        }

        let visited = self.current;
        self.last_visited = Some(visited);
        self.current = list.next_of(visited);
        self.last_move_was_backward = false;
        Ok(list.data(visited))
    }

    /// true if `previous` would yield an element
    pub fn has_previous<T>(&self, list: &LinkedList<T>) -> ListResult<bool> {
        self.check(list)?;
        Ok(list.prev_of(self.current) != BEGIN)
    }

    /// step back over the element before the cursor and yield it. the same
    /// element is yielded by an immediately following `next`.
    pub fn previous<'a, T>(&mut self, list: &'a LinkedList<T>) -> ListResult<&'a T> {
        if !self.has_previous(list)? {
            return Err(ListError::EndOfSequence);
        }

        self.current = list.prev_of(self.current);
        self.last_visited = Some(self.current);
        self.last_move_was_backward = true;
        Ok(list.data(self.current))
    }

    /// remove the element most recently yielded by `next` or `previous`.
    ///
    /// only one removal is allowed per step. the cursor stays usable
    /// afterwards, but every other cursor on the list goes stale.
    pub fn remove_last_visited<T>(&mut self, list: &mut LinkedList<T>) -> ListResult<T> {
        self.check(list)?;
        let visited = self.last_visited.take().ok_or(ListError::IllegalCursorState)?;

        // after `previous` the cursor sits on the node being removed
        if self.last_move_was_backward {
            self.current = list.next_of(visited);
        }
        let value = list.unlink(visited);
        self.expected_mod_count = list.mod_count;
        Ok(value)
    }

    fn check<T>(&self, list: &LinkedList<T>) -> ListResult<()> {
        if self.list_id != list.id {
            log::debug!(
                "cursor for list {} presented to list {}",
                self.list_id,
                list.id
            );
            return Err(ListError::ForeignCursor);
        }
        if self.expected_mod_count != list.mod_count {
            log::debug!(
                "stale cursor on list {}: captured modification {} but list is at {}",
                list.id,
                self.expected_mod_count,
                list.mod_count
            );
            return Err(ListError::ConcurrentModification);
        }
        Ok(())
    }
}


// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest_derive::Arbitrary;

    use super::*;

    #[derive(Arbitrary, Debug, Clone, Copy)]
    enum Step {
        Next,
        Previous,
        Remove,
    }

    /// a cursor over a `Vec`, tracking the gap position by index
    struct Model {
        values: Vec<u32>,
        pos: usize,
        last: Option<(usize, bool)>,
    }

    impl Model {
        fn next(&mut self) -> ListResult<u32> {
            if self.pos == self.values.len() {
                return Err(ListError::EndOfSequence);
            }
            let v = self.values[self.pos];
            self.last = Some((self.pos, false));
            self.pos += 1;
            Ok(v)
        }

        fn previous(&mut self) -> ListResult<u32> {
            if self.pos == 0 {
                return Err(ListError::EndOfSequence);
            }
            self.pos -= 1;
            self.last = Some((self.pos, true));
            Ok(self.values[self.pos])
        }

        fn remove(&mut self) -> ListResult<u32> {
            let (i, backward) = self.last.take().ok_or(ListError::IllegalCursorState)?;
            if !backward {
                self.pos -= 1;
            }
            Ok(self.values.remove(i))
        }
    }

    proptest! {
        #[test]
        fn cursor_matches_vec_model(
            values in vec(any::<u32>(), 0..32),
            start in any::<prop::sample::Index>(),
            steps in vec(any::<Step>(), 0..128),
        ) {
            let mut ll: LinkedList<u32> = values.iter().copied().collect();
            let pos = start.index(values.len() + 1);
            let mut cursor = ll.cursor(pos).unwrap();
            let mut model = Model { values, pos, last: None };

            for step in steps {
                match step {
                    Step::Next => {
                        let expected = model.next();
                        prop_assert_eq!(cursor.next(&ll).copied(), expected);
                    }
                    Step::Previous => {
                        let expected = model.previous();
                        prop_assert_eq!(cursor.previous(&ll).copied(), expected);
                    }
                    Step::Remove => {
                        let expected = model.remove();
                        prop_assert_eq!(cursor.remove_last_visited(&mut ll), expected);
                    }
                }
                prop_assert_eq!(cursor.has_next(&ll), Ok(model.pos < model.values.len()));
                prop_assert_eq!(cursor.has_previous(&ll), Ok(model.pos > 0));
                prop_assert!(ll.iter().eq(model.values.iter()));
            }
        }
    }
}
