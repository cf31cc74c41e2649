//! Prints a random post document in the format Reddit serves `<permalink>.json` in.
//!
//! Without argument, generates a fresh post. With the path of a previously
//! generated document, prints the same post with a few new replies added, which
//! is handy to try `rethread-ctl --from-file` against.

use chrono::{Duration, Utc};
use rand::Rng;
use rethread_client::api::{Comment, CommentId, Permalink, Post, Time};
use serde_json::json;

const NUM_COMMENTS: usize = 60;
const NUM_NEW_COMMENTS: usize = 8;

// Probability that a comment replies to an existing one rather than to the post
const REPLY_PROBABILITY: f64 = 0.7;

const TITLE_WORD_COUNT: usize = 8;
const BODY_WORD_COUNT: usize = 30;

fn gen_id(rng: &mut impl Rng) -> CommentId {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    CommentId(
        (0..7)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect(),
    )
}

fn gen_comment(rng: &mut impl Rng, created_utc: Time) -> Comment {
    Comment::new(
        gen_id(rng).0,
        lipsum::lipsum_words(1).to_lowercase().replace('.', ""),
        created_utc,
    )
    .with_body(lipsum::lipsum_words(rng.gen_range(1..BODY_WORD_COUNT)))
}

fn count(comments: &[Comment]) -> usize {
    comments.iter().map(|c| 1 + count(&c.replies)).sum()
}

/// The `idx`-th comment in depth-first order
fn nth_mut<'a>(comments: &'a mut [Comment], idx: &mut usize) -> Option<&'a mut Comment> {
    for c in comments.iter_mut() {
        if *idx == 0 {
            return Some(c);
        }
        *idx -= 1;
        if let Some(res) = nth_mut(&mut c.replies, idx) {
            return Some(res);
        }
    }
    None
}

fn add_random_comment(rng: &mut impl Rng, comments: &mut Vec<Comment>, created_utc: Time) {
    let comment = gen_comment(rng, created_utc);
    let total = count(comments);
    if total == 0 || !rng.gen_bool(REPLY_PROBABILITY) {
        comments.push(comment);
        return;
    }
    let mut idx = rng.gen_range(0..total);
    let parent = nth_mut(comments, &mut idx).expect("index is below the number of comments");
    let mut comment = comment;
    comment.set_depth(parent.depth + 1);
    parent.replies.push(comment);
}

fn comment_json(c: &Comment) -> serde_json::Value {
    let replies = match c.replies.is_empty() {
        true => json!(""),
        false => listing_json(c.replies.iter().map(comment_json).collect()),
    };
    json!({
        "kind": "t1",
        "data": {
            "id": c.id,
            "name": format!("t1_{}", c.id),
            "author": c.author,
            "created_utc": c.created_utc.timestamp() as f64,
            "body": c.body,
            "depth": c.depth,
            "replies": replies,
        }
    })
}

fn listing_json(children: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "kind": "Listing", "data": { "children": children } })
}

fn post_json(post: &Post) -> serde_json::Value {
    json!([
        listing_json(vec![json!({
            "kind": "t3",
            "data": {
                "title": post.title,
                "author": post.author,
                "created_utc": post.created_utc.timestamp() as f64,
                "selftext": post.body,
                "permalink": post.permalink,
                "num_comments": post.num_comments(),
            }
        })]),
        listing_json(post.comments.iter().map(comment_json).collect()),
    ])
}

fn main() {
    let mut rng = rand::thread_rng();

    let post = match std::env::args().nth(1) {
        Some(path) => {
            let doc = std::fs::read(&path).expect("reading previous post document");
            let mut post = Post::from_reddit_json(&doc).expect("decoding previous post document");
            for _ in 0..NUM_NEW_COMMENTS {
                add_random_comment(&mut rng, &mut post.comments, Utc::now());
            }
            post
        }
        None => {
            let created_utc = Utc::now() - Duration::hours(6);
            let id = gen_id(&mut rng);
            let title = lipsum::lipsum_words(TITLE_WORD_COUNT);
            let slug = title
                .to_lowercase()
                .split_whitespace()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
                .collect::<Vec<_>>()
                .join("_");
            let mut post = Post {
                permalink: Permalink(format!("/r/rethread/comments/{id}/{slug}/")),
                title,
                author: String::from("rethread_bot"),
                created_utc,
                body: lipsum::lipsum(BODY_WORD_COUNT),
                comments: Vec::new(),
            };
            for i in 0..NUM_COMMENTS {
                let at = created_utc + Duration::minutes(i as i64 * 5);
                add_random_comment(&mut rng, &mut post.comments, at);
            }
            post
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&post_json(&post)).expect("serializing post document")
    );
}
