//! Tiered connection inference over a note snapshot.
//!
//! # Responsibility
//! - Evaluate every unordered note pair once and emit at most one connection.
//! - Explain every connection with a human-readable reason.
//!
//! # Invariants
//! - Tiers are evaluated in priority order; the first match wins.
//! - Pairs are evaluated in canonical orientation (lower id first), so the
//!   result does not depend on snapshot order.
//! - Shared-tag strength is in `[0.4, 1]`, related-tag strength is `0.35`,
//!   keyword strength is in `(0, 0.9]`.

use crate::graph::keywords::extract_keywords;
use crate::model::connection::{Connection, ConnectionSet, ConnectionTier, PairKey};
use crate::model::note::Note;
use log::debug;
use std::collections::BTreeSet;
use std::time::Instant;

/// Lower bound for exact tag matches so they always render as strong edges.
pub const SHARED_TAG_MIN_STRENGTH: f64 = 0.4;
/// Fixed weight for tags related by substring.
pub const RELATED_TAG_STRENGTH: f64 = 0.35;
/// Minimum keyword Jaccard ratio when titles do not overlap.
pub const KEYWORD_MIN_JACCARD: f64 = 0.03;
/// Linear amplification applied to the keyword Jaccard ratio.
pub const KEYWORD_AMPLIFICATION: f64 = 6.0;
/// Keyword edges stay weaker than exact-tag edges.
pub const KEYWORD_MAX_STRENGTH: f64 = 0.9;
/// Number of shared keywords listed in a keyword reason.
pub const KEYWORD_REASON_LIMIT: usize = 3;

/// Per-note features computed once per inference pass.
struct NoteFeatures<'a> {
    note: &'a Note,
    tags: BTreeSet<&'a str>,
    keywords: BTreeSet<String>,
    title_keywords: BTreeSet<String>,
}

impl<'a> NoteFeatures<'a> {
    fn new(note: &'a Note) -> Self {
        Self {
            note,
            tags: note.tags.iter().map(String::as_str).collect(),
            keywords: extract_keywords(&note.searchable_text()),
            title_keywords: extract_keywords(&note.title),
        }
    }
}

/// Computes the full connection set for a snapshot.
///
/// Runs in O(n²) over notes. Duplicate ids in the snapshot are evaluated
/// against each other only once and never connect to themselves.
pub fn infer_connections(notes: &[Note]) -> ConnectionSet {
    let started_at = Instant::now();
    let features = notes.iter().map(NoteFeatures::new).collect::<Vec<_>>();
    let mut connections = ConnectionSet::new();

    for (i, left) in features.iter().enumerate() {
        for right in &features[i + 1..] {
            let Some(key) = PairKey::new(&left.note.id, &right.note.id) else {
                continue;
            };
            let (a, b) = if left.note.id <= right.note.id {
                (left, right)
            } else {
                (right, left)
            };
            if let Some(connection) = evaluate_pair(key, a, b) {
                connections.insert(connection);
            }
        }
    }

    debug!(
        "event=graph_infer module=graph status=ok notes={} connections={} duration_us={}",
        notes.len(),
        connections.len(),
        started_at.elapsed().as_micros()
    );
    connections
}

/// Evaluates a single pair of notes in isolation.
///
/// Returns `None` when the ids are equal or no tier matches.
pub fn infer_pair(a: &Note, b: &Note) -> Option<Connection> {
    let key = PairKey::new(&a.id, &b.id)?;
    let left = NoteFeatures::new(a);
    let right = NoteFeatures::new(b);
    if a.id <= b.id {
        evaluate_pair(key, &left, &right)
    } else {
        evaluate_pair(key, &right, &left)
    }
}

fn evaluate_pair(key: PairKey, a: &NoteFeatures<'_>, b: &NoteFeatures<'_>) -> Option<Connection> {
    if let Some((strength, reason)) = shared_tags(a, b) {
        return Some(Connection {
            key,
            strength,
            reason,
            tier: ConnectionTier::SharedTags,
        });
    }

    if tags_related(a, b) {
        return Some(Connection {
            key,
            strength: RELATED_TAG_STRENGTH,
            reason: "Related tags".to_string(),
            tier: ConnectionTier::RelatedTags,
        });
    }

    keyword_overlap(a, b).map(|(strength, reason)| Connection {
        key,
        strength,
        reason,
        tier: ConnectionTier::Keywords,
    })
}

fn shared_tags(a: &NoteFeatures<'_>, b: &NoteFeatures<'_>) -> Option<(f64, String)> {
    let shared = a.tags.intersection(&b.tags).copied().collect::<Vec<_>>();
    if shared.is_empty() {
        return None;
    }

    let union = a.tags.union(&b.tags).count();
    let jaccard = shared.len() as f64 / union as f64;
    let listed = shared
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(", ");
    Some((
        jaccard.max(SHARED_TAG_MIN_STRENGTH),
        format!("Shared tags: {listed}"),
    ))
}

fn tags_related(a: &NoteFeatures<'_>, b: &NoteFeatures<'_>) -> bool {
    a.tags.iter().any(|left| {
        b.tags
            .iter()
            .any(|right| right.contains(left) || left.contains(right))
    })
}

fn keyword_overlap(a: &NoteFeatures<'_>, b: &NoteFeatures<'_>) -> Option<(f64, String)> {
    let shared = a.keywords.intersection(&b.keywords).collect::<Vec<_>>();
    if shared.is_empty() {
        return None;
    }

    let union = a.keywords.union(&b.keywords).count().max(1);
    let jaccard = shared.len() as f64 / union as f64;
    let title_match = shared
        .iter()
        .any(|word| a.title_keywords.contains(*word) || b.title_keywords.contains(*word));
    if jaccard < KEYWORD_MIN_JACCARD && !title_match {
        return None;
    }

    let listed = shared
        .iter()
        .take(KEYWORD_REASON_LIMIT)
        .map(|word| word.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Some((
        (jaccard * KEYWORD_AMPLIFICATION).min(KEYWORD_MAX_STRENGTH),
        format!("Related concepts: {listed}"),
    ))
}
