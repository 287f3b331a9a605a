#![cfg_attr(feature = "no-std", no_std)]

#[cfg(feature = "no-std")]
extern crate alloc;

pub mod collections;
pub mod sync;

pub use collections::{Cursor, LinkedList, ListError, ListResult};
pub use sync::SharedList;
