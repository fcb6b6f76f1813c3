pub mod async_walker;
pub mod io;

pub use async_walker::{Filtering, WalkConfig, WalkEntry, WalkError, walk_filtered};
pub use io::{atomic_write, atomic_write_str};
