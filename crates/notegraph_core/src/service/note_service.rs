//! Note use-case service.
//!
//! # Responsibility
//! - Create and delete notes through the store collaborator.
//! - Keep the last successfully loaded snapshot for degraded operation.
//!
//! # Invariants
//! - New notes get a fresh UUID v4 id and an RFC 3339 UTC timestamp.
//! - Tags are normalized before they reach the store.
//! - A failed store read never clears the in-memory snapshot.

use crate::model::note::{normalize_tags, Note, NoteId};
use crate::repo::note_store::{NoteStore, RepoError};
use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Input cannot form a note (e.g. blank title and content).
    InvalidNote(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNote(message) => write!(f, "invalid note: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidNote(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// User input for a new note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    /// Raw tags; `#` prefixes, case and blanks are normalized away.
    pub tags: Vec<String>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Where the current snapshot came from after a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Freshly loaded from the store.
    Store,
    /// Store unreachable; the last known snapshot is kept.
    LastKnown,
}

/// Note service facade over a store implementation.
pub struct NoteService<S: NoteStore> {
    store: S,
    snapshot: Vec<Note>,
}

impl<S: NoteStore> NoteService<S> {
    /// Creates a service with an empty snapshot; call `refresh` to load.
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshot: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Last known note snapshot.
    pub fn snapshot(&self) -> &[Note] {
        &self.snapshot
    }

    /// Reloads the snapshot, falling back to the last known one on error.
    pub fn refresh(&mut self) -> SnapshotSource {
        match self.store.load_all() {
            Ok(notes) => {
                self.snapshot = notes;
                SnapshotSource::Store
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=service status=degraded notes={} error={}",
                    self.snapshot.len(),
                    err
                );
                SnapshotSource::LastKnown
            }
        }
    }

    /// Creates one note with a generated id and timestamp.
    pub fn create_note(&mut self, input: NewNote) -> Result<Note, NoteServiceError> {
        if input.title.trim().is_empty() && input.content.trim().is_empty() {
            return Err(NoteServiceError::InvalidNote(
                "title and content cannot both be blank".to_string(),
            ));
        }

        let note = Note::new(
            Uuid::new_v4().to_string(),
            input.title.trim(),
            input.content,
            &input.tags,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        self.insert_note(note)
    }

    /// Stores a note that already carries an id (import/sync paths).
    pub fn import_note(&mut self, mut note: Note) -> Result<Note, NoteServiceError> {
        note.tags = normalize_tags(&note.tags);
        self.insert_note(note)
    }

    /// Deletes a note by id; returns whether it existed.
    pub fn delete_note(&mut self, id: &str) -> Result<bool, NoteServiceError> {
        let found = self.store.delete(id)?;
        if found {
            self.snapshot.retain(|note| note.id != id);
            info!("event=note_delete module=service status=ok note={id}");
        }
        self.refresh();
        Ok(found)
    }

    /// Ids of the current snapshot in snapshot order.
    pub fn note_ids(&self) -> Vec<NoteId> {
        self.snapshot.iter().map(|note| note.id.clone()).collect()
    }

    fn insert_note(&mut self, note: Note) -> Result<Note, NoteServiceError> {
        self.store.insert(&note)?;
        info!(
            "event=note_create module=service status=ok note={} tags={}",
            note.id,
            note.tags.len()
        );
        self.snapshot.push(note.clone());
        self.refresh();
        Ok(note)
    }
}
