pub mod cursor;
pub mod error;
pub mod linked_list;
mod node;
pub mod traits;

pub use cursor::Cursor;
pub use error::{ListError, ListResult};
pub use linked_list::{IntoIter, Iter, IterMut, LinkedList};
pub use traits::{containers_eq, fmt_container, hash_container, Container, Len, Queue, Sequence};
