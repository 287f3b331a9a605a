pub type ListResult<T> = Result<T, ListError>;

/// every way an operation on a [`LinkedList`](super::LinkedList) or one of its
/// [`Cursor`](super::Cursor)s can fail. none of these are recovered from
/// internally; they are always handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// an index fell outside the valid range for the requested operation
    #[error("index {index} out of range for list of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// the operation needs at least one element but the list is empty
    #[error("list is empty")]
    Underflow,

    /// a cursor was stepped past the end (or start) of the list
    #[error("cursor has no more elements in that direction")]
    EndOfSequence,

    /// the list was structurally modified after the cursor captured it
    #[error("list was modified after the cursor was created")]
    ConcurrentModification,

    /// removal was requested with nothing visited since the last step
    #[error("cursor has no visited element to remove")]
    IllegalCursorState,

    /// a cursor was handed to a list other than the one that created it
    #[error("cursor belongs to a different list")]
    ForeignCursor,
}
