//! Note store contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the load/insert/delete contract the graph core consumes.
//! - Provide semantic repository errors shared by store implementations.
//!
//! # Invariants
//! - `load_all` returns notes ordered by `created_at ASC, id ASC`.
//! - `insert` rejects ids that already exist instead of overwriting.
//! - `delete` reports whether a note was found.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A note with this id is already stored.
    DuplicateId(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "note already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "note store is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "note store table `{table}` is missing column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator consumed by the note service.
pub trait NoteStore {
    /// Loads every stored note.
    fn load_all(&self) -> RepoResult<Vec<Note>>;
    /// Stores a new note.
    fn insert(&mut self, note: &Note) -> RepoResult<()>;
    /// Deletes a note by id; returns whether it existed.
    fn delete(&mut self, id: &str) -> RepoResult<bool>;
}

/// Rejects notes that cannot be stored under any backend.
pub(crate) fn validate_note(note: &Note) -> RepoResult<()> {
    if note.id.trim().is_empty() {
        return Err(RepoError::InvalidData("note id cannot be empty".to_string()));
    }
    if note.tags.iter().any(|tag| tag.is_empty()) {
        return Err(RepoError::InvalidData(format!(
            "note `{}` contains an empty tag",
            note.id
        )));
    }
    Ok(())
}

/// Volatile note store, used for tests and scratch sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    notes: Vec<Note>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with notes, in the given order.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }
}

impl NoteStore for MemoryNoteStore {
    fn load_all(&self) -> RepoResult<Vec<Note>> {
        let mut notes = self.notes.clone();
        notes.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(notes)
    }

    fn insert(&mut self, note: &Note) -> RepoResult<()> {
        validate_note(note)?;
        if self.notes.iter().any(|existing| existing.id == note.id) {
            return Err(RepoError::DuplicateId(note.id.clone()));
        }
        self.notes.push(note.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> RepoResult<bool> {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        Ok(self.notes.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryNoteStore, NoteStore, RepoError};
    use crate::model::note::Note;

    fn note(id: &str, created_at: &str) -> Note {
        Note::new(id, "title", "content", &[], created_at)
    }

    #[test]
    fn load_all_orders_by_creation_then_id() {
        let mut store = MemoryNoteStore::new();
        store.insert(&note("b", "2026-01-02T00:00:00.000Z")).unwrap();
        store.insert(&note("c", "2026-01-01T00:00:00.000Z")).unwrap();
        store.insert(&note("a", "2026-01-02T00:00:00.000Z")).unwrap();
        let ids = store
            .load_all()
            .unwrap()
            .into_iter()
            .map(|note| note.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn insert_rejects_duplicates_and_blank_ids() {
        let mut store = MemoryNoteStore::new();
        store.insert(&note("a", "t")).unwrap();
        assert!(matches!(
            store.insert(&note("a", "t")),
            Err(RepoError::DuplicateId(_))
        ));
        assert!(matches!(
            store.insert(&note("  ", "t")),
            Err(RepoError::InvalidData(_))
        ));
    }

    #[test]
    fn delete_reports_whether_note_existed() {
        let mut store = MemoryNoteStore::with_notes(vec![note("a", "t")]);
        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert!(store.load_all().unwrap().is_empty());
    }
}
