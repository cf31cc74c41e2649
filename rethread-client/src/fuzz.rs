#![cfg(test)]

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};

use crate::{
    api::{Comment, CommentId, Snapshot},
    CommentTreeExt,
};

/// Builds a tree out of `(parent choice, already seen)` pairs
///
/// Node `i` hangs at the top level when `choice % (i + 1) == 0`, and below
/// node `choice % (i + 1) - 1` otherwise, so any input gives a valid tree.
fn build_tree(nodes: &[(u8, bool)]) -> Vec<Comment> {
    let parents = nodes
        .iter()
        .enumerate()
        .map(|(i, (choice, _))| match *choice as usize % (i + 1) {
            0 => None,
            p => Some(p - 1),
        })
        .collect::<Vec<_>>();
    children_of(None, &parents, 0)
}

fn children_of(parent: Option<usize>, parents: &[Option<usize>], depth: usize) -> Vec<Comment> {
    parents
        .iter()
        .enumerate()
        .filter(|(_, p)| **p == parent)
        .map(|(i, _)| {
            let mut c = Comment::new(
                format!("c{i}"),
                "fuzzer",
                Utc.timestamp_opt(i as i64, 0).unwrap(),
            );
            c.depth = depth;
            c.replies = children_of(Some(i), parents, depth + 1);
            c
        })
        .collect()
}

fn seen_snapshot(nodes: &[(u8, bool)]) -> Snapshot {
    Snapshot::new(
        nodes
            .iter()
            .enumerate()
            .filter(|(_, (_, seen))| *seen)
            .map(|(i, _)| CommentId(format!("c{i}")))
            .collect(),
        Utc::now(),
    )
}

fn flatten(tree: &[Comment]) -> Vec<&Comment> {
    let mut res = Vec::new();
    for c in tree {
        res.push(c);
        res.extend(flatten(&c.replies));
    }
    res
}

#[test]
fn nothing_is_new_without_snapshot() {
    bolero::check!()
        .with_type::<Vec<(u8, bool)>>()
        .cloned()
        .for_each(|nodes| {
            let tree = build_tree(&nodes);
            let annotated = tree.annotate(None);
            assert!(flatten(&annotated).iter().all(|c| !c.is_new));
            assert_eq!(tree.count_new(None), 0);
            assert!(annotated.find_new_threads().is_empty());
        })
}

#[test]
fn count_annotate_and_threads_agree() {
    bolero::check!()
        .with_type::<Vec<(u8, bool)>>()
        .cloned()
        .for_each(|nodes| {
            let tree = build_tree(&nodes);
            let snapshot = seen_snapshot(&nodes);
            let annotated = tree.annotate(Some(&snapshot));
            let flagged = flatten(&annotated).iter().filter(|c| c.is_new).count();
            let unseen = nodes.iter().filter(|(_, seen)| !seen).count();
            assert_eq!(tree.count_new(Some(&snapshot)), flagged);
            assert_eq!(flagged, unseen);

            let threads = annotated.find_new_threads();
            assert_eq!(threads.len(), flagged);
            for t in threads {
                assert_eq!(t.new_index, t.path.len() - 1);
                assert!(t.new_comment().is_new);
                assert_eq!(t.root().depth, 0);
                for (i, c) in t.path.iter().enumerate() {
                    assert_eq!(c.depth, i);
                }
            }
        })
}

#[test]
fn collect_ids_visits_every_comment_once() {
    bolero::check!()
        .with_type::<Vec<(u8, bool)>>()
        .cloned()
        .for_each(|nodes| {
            let tree = build_tree(&nodes);
            let ids = tree.collect_ids();
            let expected = (0..nodes.len())
                .map(|i| CommentId(format!("c{i}")))
                .collect::<BTreeSet<_>>();
            assert_eq!(flatten(&tree).len(), nodes.len());
            assert_eq!(ids, expected);
        })
}

#[test]
fn acknowledging_is_idempotent() {
    bolero::check!()
        .with_type::<Vec<(u8, bool)>>()
        .cloned()
        .for_each(|nodes| {
            let tree = build_tree(&nodes);
            let snapshot = tree.acknowledge();
            let annotated = tree.annotate(Some(&snapshot));
            assert!(flatten(&annotated).iter().all(|c| !c.is_new));
            assert_eq!(tree.count_new(Some(&snapshot)), 0);
            assert_eq!(annotated.acknowledge().comment_ids, snapshot.comment_ids);
        })
}
