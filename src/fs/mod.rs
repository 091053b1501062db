pub mod backend;
pub mod local;
pub mod types;

pub use backend::Filesystem;
pub use local::LocalFs;
pub use types::{EntryKind, FsError};
