use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use sha1::{Digest, Sha1};

use crate::{
    api::{Permalink, Snapshot},
    store::{decode_snapshot, SnapshotStore},
};

/// Snapshots kept on disk, one JSON file per post under a directory
///
/// Each file is named after the SHA-1 of the post's permalink and replaced
/// whole through a temporary file persisted over it. Writers to different
/// posts never touch the same file, and readers see either the previous or
/// the new snapshot of a post.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> FileStore {
        FileStore { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, post: &Permalink) -> PathBuf {
        let mut hasher = Sha1::new();
        hasher.update(post.as_str().as_bytes());
        self.dir.join(format!("{}.json", hex::encode(hasher.finalize())))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, post: &Permalink) -> anyhow::Result<Option<Snapshot>> {
        let path = self.entry_path(post);
        let contents = match fs::read(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading snapshot file {:?}", path))
            }
        };
        match serde_json::from_slice(&contents) {
            Ok(value) => Ok(decode_snapshot(post, value)),
            Err(err) => {
                tracing::warn!(%post, ?path, %err, "ignoring unparseable snapshot file");
                Ok(None)
            }
        }
    }

    fn set(&mut self, post: &Permalink, snapshot: Snapshot) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating snapshot directory {:?}", self.dir))?;
        let path = self.entry_path(post);
        let tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("creating temporary file in {:?}", self.dir))?;
        serde_json::to_writer(&tmp, &snapshot).context("serializing snapshot")?;
        tmp.persist(&path)
            .with_context(|| format!("moving snapshot for {post} to {:?}", path))?;
        Ok(())
    }
}
