use gloo_storage::{LocalStorage, Storage};

use crate::{
    api::{Permalink, Snapshot},
    store::{decode_snapshot, SnapshotStore},
};

const KEY_PREFIX: &str = "rethread-snapshot:";

/// Snapshots kept in the browser's local storage, one key per post
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn key(post: &Permalink) -> String {
        format!("{KEY_PREFIX}{post}")
    }
}

impl SnapshotStore for LocalStorageStore {
    fn get(&self, post: &Permalink) -> anyhow::Result<Option<Snapshot>> {
        match LocalStorage::get::<serde_json::Value>(Self::key(post)) {
            Ok(v) => Ok(decode_snapshot(post, v)),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => {
                tracing::warn!(%post, %err, "ignoring unreadable snapshot");
                Ok(None)
            }
        }
    }

    fn set(&mut self, post: &Permalink, snapshot: Snapshot) -> anyhow::Result<()> {
        LocalStorage::set(Self::key(post), &snapshot)
            .map_err(|e| anyhow::anyhow!("saving snapshot for {post} to local storage: {e}"))
    }
}
