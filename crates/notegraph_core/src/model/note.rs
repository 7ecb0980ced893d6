//! Note domain model.
//!
//! # Responsibility
//! - Define the read-only note snapshot consumed by graph computations.
//! - Own tag normalization rules shared by store and inference paths.
//!
//! # Invariants
//! - `id` is opaque and unique within one snapshot.
//! - Stored tags are lowercase, trimmed, `#`-stripped and never empty.
//! - Tag order is preserved; duplicates are not removed by the model.

use serde::{Deserialize, Serialize};

/// Opaque note identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = String;

/// Canonical note record as seen by the graph core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable identifier assigned by the store.
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Normalized tags, in user-supplied order.
    pub tags: Vec<String>,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
}

impl Note {
    /// Creates a note and normalizes the provided tags.
    pub fn new(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: &[String],
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: normalize_tags(tags),
            created_at: created_at.into(),
        }
    }

    /// Text used for keyword overlap: title and content joined by a space.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

/// Normalizes one tag value.
///
/// Returns `None` when nothing remains after trimming and `#` stripping.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let stripped = tag.trim().trim_start_matches('#').trim();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_lowercase())
    }
}

/// Normalizes tag values, dropping empties and keeping input order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter().filter_map(|tag| normalize_tag(tag)).collect()
}
