use std::fmt;

use crate::{Comment, Error, Thing, Time};

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct Permalink(pub String);

impl Permalink {
    pub fn new(p: impl Into<String>) -> Permalink {
        Permalink(p.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the JSON document for this post, relative to the Reddit host
    pub fn json_path(&self) -> String {
        format!("{}.json", self.0.trim_end_matches('/'))
    }
}

impl fmt::Display for Permalink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub permalink: Permalink,
    pub title: String,
    pub author: String,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_utc: Time,

    pub body: String,

    /// Top-level comments, in display order
    pub comments: Vec<Comment>,
}

impl Post {
    /// Parses the document Reddit serves at `<permalink>.json`
    pub fn from_reddit_json(body: &[u8]) -> Result<Post, Error> {
        let listings: Vec<Thing> = serde_json::from_slice(body)?;
        Post::from_listings(listings)
    }

    /// Builds a post from the post listing followed by the comments listing
    pub fn from_listings(listings: Vec<Thing>) -> Result<Post, Error> {
        let mut listings = listings.into_iter();
        let post = listings
            .next()
            .ok_or(Error::MissingPost)?
            .into_post()?;
        let comments = match listings.next() {
            Some(l) => l.into_comments(0)?,
            None => Vec::new(),
        };
        Ok(Post {
            comments,
            ..post
        })
    }

    pub fn num_comments(&self) -> usize {
        fn count(comments: &[Comment]) -> usize {
            comments.iter().map(|c| 1 + count(&c.replies)).sum()
        }
        count(&self.comments)
    }
}
