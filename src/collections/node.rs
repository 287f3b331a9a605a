/// position of a slot in a list's node arena
pub(crate) type NodeIndex = usize;

/// arena slot holding the begin sentinel
pub(crate) const BEGIN: NodeIndex = 0;
/// arena slot holding the end sentinel
pub(crate) const END: NodeIndex = 1;

/// a single slot in the node arena. sentinels and data nodes share the same
/// link layout so splicing never has to special-case the list boundaries.
#[derive(Debug)]
pub(crate) enum Slot<T> {
    Sentinel {
        prev: NodeIndex,
        next: NodeIndex,
    },
    Data {
        prev: NodeIndex,
        data: T,
        next: NodeIndex,
    },
    /// a reclaimed slot, threaded onto the arena's free list
    Vacant { next_free: Option<NodeIndex> },
}

impl<T> Slot<T> {
    /// a sentinel linked between the two boundary slots
    pub(crate) const fn sentinel() -> Self {
        Self::Sentinel {
            prev: BEGIN,
            next: END,
        }
    }

    pub(crate) fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel { .. })
    }

    pub(crate) fn data(&self) -> Option<&T> {
        match self {
            Self::Data { data, .. } => Some(data),
            Self::Sentinel { .. } | Self::Vacant { .. } => None,
        }
    }

    pub(crate) fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Data { data, .. } => Some(data),
            Self::Sentinel { .. } | Self::Vacant { .. } => None,
        }
    }

    pub(crate) fn prev(&self) -> NodeIndex {
        match self {
            Self::Sentinel { prev, .. } | Self::Data { prev, .. } => *prev,
            Self::Vacant { .. } => unreachable!("vacant slots are never linked"),
        }
    }

    pub(crate) fn next(&self) -> NodeIndex {
        match self {
            Self::Sentinel { next, .. } | Self::Data { next, .. } => *next,
            Self::Vacant { .. } => unreachable!("vacant slots are never linked"),
        }
    }

    pub(crate) fn set_prev(&mut self, new_prev: NodeIndex) {
        match self {
            Self::Sentinel { ref mut prev, .. } | Self::Data { ref mut prev, .. } => {
                *prev = new_prev
            }
            Self::Vacant { .. } => unreachable!("vacant slots are never linked"),
        }
    }

    pub(crate) fn set_next(&mut self, new_next: NodeIndex) {
        match self {
            Self::Sentinel { ref mut next, .. } | Self::Data { ref mut next, .. } => {
                *next = new_next
            }
            Self::Vacant { .. } => unreachable!("vacant slots are never linked"),
        }
    }

    /// take the payload out of a data slot, leaving it vacant
    pub(crate) fn vacate(&mut self, next_free: Option<NodeIndex>) -> T {
        match core::mem::replace(self, Self::Vacant { next_free }) {
            Self::Data { data, .. } => data,
            Self::Sentinel { .. } | Self::Vacant { .. } => {
                unreachable!("only data slots may be vacated")
            }
        }
    }
}
