pub mod shared_list;

pub use shared_list::{SharedList, SharedListGuard};
