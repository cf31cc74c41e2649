//! Wire format of the JSON documents Reddit serves for a post.
//!
//! `<permalink>.json` is an array of two `Listing` things: the first one holds
//! the post itself (a `t3`), the second one the top-level comments (`t1`), each
//! of which nests its replies as another `Listing`, or as an empty string when
//! there are none.

use serde::{Deserialize, Deserializer};

use crate::{time_from_reddit, Comment, CommentId, Error, Permalink, Post};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Thing {
    Listing(Listing),
    #[serde(rename = "t1")]
    Comment(CommentData),
    #[serde(rename = "t3")]
    Post(PostData),
    /// Stub standing for comments that were not loaded
    #[serde(rename = "more")]
    More(MoreData),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CommentData {
    pub id: String,
    #[serde(default)]
    pub author: String,
    pub created_utc: f64,
    #[serde(default)]
    pub body: String,
    #[serde(default, deserialize_with = "empty_or_listing")]
    pub replies: Option<Listing>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PostData {
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub created_utc: f64,
    #[serde(default)]
    pub selftext: String,
    pub permalink: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MoreData {
    #[serde(default)]
    pub children: Vec<String>,
}

fn empty_or_listing<'de, D>(deserializer: D) -> Result<Option<Listing>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replies {
        Thing(Thing),
        Empty(Option<String>),
    }

    match Replies::deserialize(deserializer)? {
        Replies::Thing(Thing::Listing(l)) => Ok(Some(l)),
        Replies::Thing(t) => Err(serde::de::Error::custom(format!(
            "replies must be a Listing, got a {}",
            t.kind()
        ))),
        Replies::Empty(_) => Ok(None),
    }
}

impl Thing {
    pub fn kind(&self) -> &'static str {
        match self {
            Thing::Listing(_) => "Listing",
            Thing::Comment(_) => "t1",
            Thing::Post(_) => "t3",
            Thing::More(_) => "more",
        }
    }

    pub fn into_listing(self) -> Result<Listing, Error> {
        match self {
            Thing::Listing(l) => Ok(l),
            t => Err(Error::UnexpectedKind {
                expected: "Listing",
                found: t.kind(),
            }),
        }
    }

    /// Converts the first listing of a post document, leaving `comments` empty
    pub(crate) fn into_post(self) -> Result<Post, Error> {
        let data = match self.into_listing()?.children.into_iter().next() {
            Some(Thing::Post(data)) => data,
            Some(t) => {
                return Err(Error::UnexpectedKind {
                    expected: "t3",
                    found: t.kind(),
                })
            }
            None => return Err(Error::MissingPost),
        };
        Ok(Post {
            permalink: Permalink(data.permalink),
            title: data.title,
            author: data.author,
            created_utc: time_from_reddit(data.created_utc)?,
            body: data.selftext,
            comments: Vec::new(),
        })
    }

    /// Converts a comments listing, `depth` being the depth of its children
    pub(crate) fn into_comments(self, depth: usize) -> Result<Vec<Comment>, Error> {
        self.into_listing()?.into_comments(depth)
    }
}

impl Listing {
    pub fn into_comments(self, depth: usize) -> Result<Vec<Comment>, Error> {
        let mut res = Vec::with_capacity(self.children.len());
        for t in self.children {
            match t {
                Thing::Comment(c) => res.push(c.into_comment(depth)?),
                // "load more" stubs carry no comment content
                Thing::More(_) => (),
                t => {
                    return Err(Error::UnexpectedKind {
                        expected: "t1",
                        found: t.kind(),
                    })
                }
            }
        }
        Ok(res)
    }
}

impl CommentData {
    pub fn into_comment(self, depth: usize) -> Result<Comment, Error> {
        Ok(Comment {
            id: CommentId(self.id),
            author: self.author,
            created_utc: time_from_reddit(self.created_utc)?,
            body: self.body,
            replies: match self.replies {
                Some(l) => l.into_comments(depth + 1)?,
                None => Vec::new(),
            },
            depth,
            is_new: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment(id: &str, replies: serde_json::Value) -> serde_json::Value {
        json!({
            "kind": "t1",
            "data": {
                "id": id,
                "author": format!("author_{id}"),
                "created_utc": 1700000000.0,
                "body": format!("body of {id}"),
                "depth": 42,
                "replies": replies,
            }
        })
    }

    fn listing(children: Vec<serde_json::Value>) -> serde_json::Value {
        json!({ "kind": "Listing", "data": { "children": children } })
    }

    fn document(comments: Vec<serde_json::Value>) -> Vec<u8> {
        serde_json::to_vec(&json!([
            listing(vec![json!({
                "kind": "t3",
                "data": {
                    "title": "A post",
                    "author": "op",
                    "created_utc": 1690000000.0,
                    "selftext": "post body",
                    "permalink": "/r/rust/comments/abc/a_post/",
                }
            })]),
            listing(comments),
        ]))
        .unwrap()
    }

    #[test]
    fn parses_nested_replies() {
        let doc = document(vec![
            comment("a", json!("")),
            comment(
                "b",
                listing(vec![comment(
                    "c",
                    listing(vec![comment("d", json!(""))]),
                )]),
            ),
        ]);
        let post = Post::from_reddit_json(&doc).unwrap();
        assert_eq!(post.permalink, Permalink::new("/r/rust/comments/abc/a_post/"));
        assert_eq!(post.title, "A post");
        assert_eq!(post.body, "post body");
        assert_eq!(post.created_utc.timestamp(), 1690000000);
        assert_eq!(post.num_comments(), 4);

        let ids = |cs: &[Comment]| cs.iter().map(|c| c.id.0.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&post.comments), vec!["a", "b"]);
        let b = &post.comments[1];
        assert_eq!(b.author, "author_b");
        assert_eq!(ids(&b.replies), vec!["c"]);
        assert_eq!(ids(&b.replies[0].replies), vec!["d"]);
    }

    #[test]
    fn depth_is_recomputed_from_nesting() {
        let doc = document(vec![comment(
            "a",
            listing(vec![comment("b", listing(vec![comment("c", json!(""))]))]),
        )]);
        let post = Post::from_reddit_json(&doc).unwrap();
        let a = &post.comments[0];
        assert_eq!(a.depth, 0);
        assert_eq!(a.replies[0].depth, 1);
        assert_eq!(a.replies[0].replies[0].depth, 2);
    }

    #[test]
    fn more_stubs_are_skipped() {
        let doc = document(vec![
            comment("a", json!("")),
            json!({ "kind": "more", "data": { "count": 12, "children": ["x", "y"] } }),
        ]);
        let post = Post::from_reddit_json(&doc).unwrap();
        assert_eq!(post.num_comments(), 1);
    }

    #[test]
    fn null_replies_are_empty() {
        let doc = document(vec![comment("a", json!(null))]);
        let post = Post::from_reddit_json(&doc).unwrap();
        assert!(post.comments[0].replies.is_empty());
    }

    #[test]
    fn post_without_comments_listing() {
        let doc = serde_json::to_vec(&json!([listing(vec![json!({
            "kind": "t3",
            "data": {
                "title": "t",
                "created_utc": 1.0,
                "permalink": "/r/a/comments/b/",
            }
        })])]))
        .unwrap();
        let post = Post::from_reddit_json(&doc).unwrap();
        assert!(post.comments.is_empty());
        assert_eq!(post.author, "");
    }

    #[test]
    fn errors() {
        assert!(matches!(
            Post::from_reddit_json(b"[]"),
            Err(Error::MissingPost)
        ));
        assert!(matches!(
            Post::from_reddit_json(b"{not json"),
            Err(Error::Json(_))
        ));
        let doc = serde_json::to_vec(&json!([listing(vec![comment("a", json!(""))])])).unwrap();
        assert!(matches!(
            Post::from_reddit_json(&doc),
            Err(Error::UnexpectedKind {
                expected: "t3",
                found: "t1"
            })
        ));
    }
}
