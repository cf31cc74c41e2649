use anyhow::Context;

use crate::{
    api::{Comment, Post, Snapshot, Thread, Time},
    diff::{annotate_in_place, CommentTreeExt},
    store::SnapshotStore,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PostState {
    /// Never acknowledged
    Unseen,

    /// Acknowledged, with nothing new since
    Seen,

    /// Acknowledged, with this many new comments since
    SeenWithNew(usize),
}

impl PostState {
    pub fn new_count(&self) -> usize {
        match self {
            PostState::SeenWithNew(n) => *n,
            PostState::Unseen | PostState::Seen => 0,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PostView {
    /// Comments with `is_new` set
    pub comments: Vec<Comment>,
    pub state: PostState,
    pub last_acknowledged: Option<Time>,
}

impl PostView {
    pub fn new_count(&self) -> usize {
        self.state.new_count()
    }

    pub fn threads(&self) -> Vec<Thread<'_>> {
        self.comments.find_new_threads()
    }
}

/// Seen/new bookkeeping of posts over a snapshot store
pub struct Tracker<S> {
    store: S,
}

impl<S: SnapshotStore> Tracker<S> {
    pub fn new(store: S) -> Tracker<S> {
        Tracker { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn state(&self, post: &Post) -> anyhow::Result<PostState> {
        let snapshot = self.snapshot(post)?;
        Ok(state_for(&post.comments, snapshot.as_ref()))
    }

    /// Annotates the comments of a freshly fetched post, without recording anything
    pub fn view(&self, post: &Post) -> anyhow::Result<PostView> {
        let snapshot = self.snapshot(post)?;
        let mut comments = post.comments.clone();
        annotate_in_place(&mut comments, snapshot.as_ref());
        Ok(PostView {
            state: state_for(&comments, snapshot.as_ref()),
            last_acknowledged: snapshot.map(|s| s.last_fetch_time),
            comments,
        })
    }

    /// Marks every comment currently in `post` as seen
    pub fn acknowledge(&mut self, post: &Post) -> anyhow::Result<Snapshot> {
        self.record(post, post.comments.acknowledge())
    }

    pub fn acknowledge_at(&mut self, post: &Post, time: Time) -> anyhow::Result<Snapshot> {
        self.record(post, post.comments.acknowledge_at(time))
    }

    fn snapshot(&self, post: &Post) -> anyhow::Result<Option<Snapshot>> {
        self.store
            .get(&post.permalink)
            .with_context(|| format!("reading snapshot of post {}", post.permalink))
    }

    fn record(&mut self, post: &Post, snapshot: Snapshot) -> anyhow::Result<Snapshot> {
        self.store
            .set(&post.permalink, snapshot.clone())
            .with_context(|| format!("saving snapshot of post {}", post.permalink))?;
        tracing::debug!(
            post = %post.permalink,
            num_ids = snapshot.len(),
            "acknowledged post"
        );
        Ok(snapshot)
    }
}

fn state_for(comments: &[Comment], snapshot: Option<&Snapshot>) -> PostState {
    match snapshot {
        None => PostState::Unseen,
        Some(_) => match comments.count_new(snapshot) {
            0 => PostState::Seen,
            n => PostState::SeenWithNew(n),
        },
    }
}
