use std::collections::HashMap;

use anyhow::Context;

use crate::api::{Permalink, Snapshot};

/// Durable per-post storage of the last acknowledged snapshot
///
/// Entries that fail to decode as a snapshot read back as `None`, exactly like
/// a post that was never acknowledged. Errors are only returned when the
/// backing medium itself fails.
pub trait SnapshotStore {
    fn get(&self, post: &Permalink) -> anyhow::Result<Option<Snapshot>>;

    /// Replaces the whole entry for `post`
    fn set(&mut self, post: &Permalink, snapshot: Snapshot) -> anyhow::Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &mut S {
    fn get(&self, post: &Permalink) -> anyhow::Result<Option<Snapshot>> {
        (**self).get(post)
    }

    fn set(&mut self, post: &Permalink, snapshot: Snapshot) -> anyhow::Result<()> {
        (**self).set(post, snapshot)
    }
}

pub(crate) fn decode_snapshot(post: &Permalink, value: serde_json::Value) -> Option<Snapshot> {
    match serde_json::from_value(value) {
        Ok(s) => Some(s),
        Err(err) => {
            tracing::warn!(%post, %err, "ignoring malformed snapshot");
            None
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<Permalink, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Stores `value` as-is, without checking it is a valid snapshot
    pub fn insert_raw(&mut self, post: Permalink, value: serde_json::Value) {
        self.entries.insert(post, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, post: &Permalink) -> anyhow::Result<Option<Snapshot>> {
        Ok(self
            .entries
            .get(post)
            .cloned()
            .and_then(|v| decode_snapshot(post, v)))
    }

    fn set(&mut self, post: &Permalink, snapshot: Snapshot) -> anyhow::Result<()> {
        let value = serde_json::to_value(&snapshot).context("serializing snapshot")?;
        self.entries.insert(post.clone(), value);
        Ok(())
    }
}
