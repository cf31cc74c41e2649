use chrono::{TimeZone, Utc};

pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{Comment, CommentId, Thread};

mod error;
pub use error::Error;

mod listing;
pub use listing::{Listing, Thing};

mod post;
pub use post::{Permalink, Post};

mod snapshot;
pub use snapshot::Snapshot;

/// Converts a Reddit `created_utc` (fractional seconds since epoch) into a `Time`
pub fn time_from_reddit(created_utc: f64) -> Result<Time, Error> {
    if !created_utc.is_finite() {
        return Err(Error::InvalidTimestamp(created_utc));
    }
    let secs = created_utc.floor();
    let nanos = (((created_utc - secs) * 1e9) as u32).min(999_999_999);
    Utc.timestamp_opt(secs as i64, nanos)
        .single()
        .ok_or(Error::InvalidTimestamp(created_utc))
}
