use std::fmt;

use crate::Time;

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> CommentId {
        CommentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    /// Identifier, unique within the comment tree of a post
    pub id: CommentId,

    pub author: String,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_utc: Time,

    /// Raw markdown
    pub body: String,

    /// Child comments, in reply order
    pub replies: Vec<Comment>,

    /// 0 for top-level comments
    pub depth: usize,

    /// Whether this comment was absent from the last acknowledged snapshot
    #[serde(skip)]
    pub is_new: bool,
}

impl Comment {
    pub fn new(id: impl Into<String>, author: impl Into<String>, created_utc: Time) -> Comment {
        Comment {
            id: CommentId::new(id),
            author: author.into(),
            created_utc,
            body: String::new(),
            replies: Vec::new(),
            depth: 0,
            is_new: false,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Comment {
        self.body = body.into();
        self
    }

    /// Appends `reply` as the last child, fixing up the depth of its whole subtree
    pub fn with_reply(mut self, mut reply: Comment) -> Comment {
        reply.set_depth(self.depth + 1);
        self.replies.push(reply);
        self
    }

    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        for r in self.replies.iter_mut() {
            r.set_depth(depth + 1);
        }
    }

    pub fn find_in<'a>(comments: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
        for c in comments {
            if c.id == *id {
                return Some(c);
            }
            if let Some(res) = Comment::find_in(&c.replies, id) {
                return Some(res);
            }
        }
        None
    }
}

/// Path from a top-level comment down to one new comment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Thread<'a> {
    pub path: Vec<&'a Comment>,

    /// Position of the new comment in `path`, always its last element
    pub new_index: usize,
}

impl<'a> Thread<'a> {
    pub fn new_comment(&self) -> &'a Comment {
        self.path[self.new_index]
    }

    pub fn root(&self) -> &'a Comment {
        self.path[0]
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.path.iter().map(|c| c.id.as_str()).collect()
    }
}
