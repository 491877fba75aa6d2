pub mod fs_atomic;
pub mod logging;

pub use fs_atomic::{atomic_write_file, atomic_write_json};
pub use logging::{EventLog, Level};
