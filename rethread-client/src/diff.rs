use std::collections::BTreeSet;

use chrono::Utc;

use crate::api::{Comment, CommentId, Snapshot, Thread, Time};

/// Seen/new diffing of a post's comment tree against its last snapshot
///
/// Without a snapshot the post was never acknowledged, so nothing counts as
/// new. With one, a comment is new iff its id is not in the snapshot, checked
/// for each comment on its own regardless of its parent.
pub trait CommentTreeExt {
    /// Returns a copy of the tree with `is_new` set on every comment
    fn annotate(&self, snapshot: Option<&Snapshot>) -> Vec<Comment>;

    fn count_new(&self, snapshot: Option<&Snapshot>) -> usize;

    fn collect_ids(&self) -> BTreeSet<CommentId>;

    /// Lists one thread per comment flagged `is_new`, depth-first
    fn find_new_threads(&self) -> Vec<Thread<'_>>;

    /// Builds the snapshot that replaces whatever was stored for this post
    fn acknowledge(&self) -> Snapshot {
        self.acknowledge_at(Utc::now())
    }

    fn acknowledge_at(&self, time: Time) -> Snapshot;
}

impl CommentTreeExt for [Comment] {
    fn annotate(&self, snapshot: Option<&Snapshot>) -> Vec<Comment> {
        let mut res = self.to_vec();
        annotate_in_place(&mut res, snapshot);
        res
    }

    fn count_new(&self, snapshot: Option<&Snapshot>) -> usize {
        match snapshot {
            None => 0,
            Some(s) => self
                .iter()
                .map(|c| usize::from(is_new(c, s)) + c.replies.count_new(snapshot))
                .sum(),
        }
    }

    fn collect_ids(&self) -> BTreeSet<CommentId> {
        let mut res = BTreeSet::new();
        for c in self {
            add_ids(c, &mut res);
        }
        res
    }

    fn find_new_threads(&self) -> Vec<Thread<'_>> {
        let mut res = Vec::new();
        let mut path = Vec::new();
        for c in self {
            find_threads_below(c, &mut path, &mut res);
        }
        res
    }

    fn acknowledge_at(&self, time: Time) -> Snapshot {
        let snapshot = Snapshot::new(self.collect_ids(), time);
        tracing::debug!(num_ids = snapshot.len(), "built acknowledgement snapshot");
        snapshot
    }
}

/// Sets `is_new` on every comment of `tree`, overwriting any previous value
pub fn annotate_in_place(tree: &mut [Comment], snapshot: Option<&Snapshot>) {
    for c in tree.iter_mut() {
        c.is_new = match snapshot {
            None => false,
            Some(s) => is_new(c, s),
        };
        annotate_in_place(&mut c.replies, snapshot);
    }
}

fn is_new(c: &Comment, snapshot: &Snapshot) -> bool {
    !snapshot.contains(&c.id)
}

fn add_ids(c: &Comment, res: &mut BTreeSet<CommentId>) {
    res.insert(c.id.clone());
    for r in c.replies.iter() {
        add_ids(r, res);
    }
}

fn find_threads_below<'a>(
    c: &'a Comment,
    path: &mut Vec<&'a Comment>,
    res: &mut Vec<Thread<'a>>,
) {
    path.push(c);
    if c.is_new {
        res.push(Thread {
            path: path.clone(),
            new_index: path.len() - 1,
        });
    }
    // A new comment's new replies make threads of their own
    for r in c.replies.iter() {
        find_threads_below(r, path, res);
    }
    path.pop();
}
