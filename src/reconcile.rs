//! Merging a locally stored message sequence with the remote history.

use std::collections::HashSet;

use crate::models::message::{Message, Sender};

/// Produce one canonical sequence from the local and remote candidates.
///
/// Local entries come first so that messages sent while offline survive and
/// so a local copy wins a duplicate tie, since it may carry attachment data
/// the remote echo lacks. Duplicates share the `(created_at, sender, text)`
/// identity. The final sort is stable, keeping same-millisecond messages in
/// send order.
pub fn reconcile(local: Vec<Message>, remote: Vec<Message>) -> Vec<Message> {
    let mut seen: HashSet<(i64, Sender, String)> = HashSet::new();
    let mut merged: Vec<Message> = local
        .into_iter()
        .chain(remote)
        .filter(|m| seen.insert((m.created_at, m.sender, m.text.clone())))
        .collect();
    merged.sort_by_key(|m| m.created_at);
    merged
}
