#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed post document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Post document has no post listing")]
    MissingPost,

    #[error("Expected a {expected} thing but got a {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid timestamp {0}")]
    InvalidTimestamp(f64),
}
