mod auto_ack;
pub use auto_ack::AutoAck;

mod diff;
pub use diff::{annotate_in_place, CommentTreeExt};

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(target_arch = "wasm32")]
mod local_storage;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

mod store;
pub use store::{MemoryStore, SnapshotStore};

mod tracker;
pub use tracker::{PostState, PostView, Tracker};

mod fuzz;

pub mod api {
    pub use rethread_api::*;
}

pub mod prelude {
    pub use crate::{CommentTreeExt, SnapshotStore};
}
