use std::collections::BTreeSet;

use crate::{CommentId, Time};

/// Comments of a post already seen as of its last acknowledgement
///
/// A snapshot is always replaced as a whole, never merged with a previous one.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub comment_ids: BTreeSet<CommentId>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_fetch_time: Time,
}

impl Snapshot {
    pub fn new(comment_ids: BTreeSet<CommentId>, last_fetch_time: Time) -> Snapshot {
        Snapshot {
            comment_ids,
            last_fetch_time,
        }
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.comment_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.comment_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comment_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn json_shape() {
        let s = Snapshot::new(
            ["b", "a"].into_iter().map(CommentId::new).collect(),
            Utc.timestamp_millis_opt(1700000000123).unwrap(),
        );
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "commentIds": ["a", "b"],
                "lastFetchTime": 1700000000123i64,
            })
        );
        assert_eq!(serde_json::from_value::<Snapshot>(json).unwrap(), s);
    }

    #[test]
    fn non_array_ids_are_rejected() {
        let res = serde_json::from_value::<Snapshot>(serde_json::json!({
            "commentIds": "a,b",
            "lastFetchTime": 0,
        }));
        assert!(res.is_err());
    }

    #[test]
    fn duplicate_ids_collapse() {
        let s: Snapshot = serde_json::from_value(serde_json::json!({
            "commentIds": ["a", "a", "b"],
            "lastFetchTime": 0,
        }))
        .unwrap();
        assert_eq!(s.len(), 2);
        assert!(s.contains(&CommentId::new("a")));
        assert!(!s.contains(&CommentId::new("z")));
    }
}
