//! SQLite implementation of the note store.
//!
//! # Responsibility
//! - Persist notes and their ordered tags in `notes` / `note_tags`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Insert and delete run in a single immediate transaction.
//! - Tag order is stored explicitly (`position`) and restored on load.
//! - Deleting a note deletes its tag rows.

use crate::model::note::Note;
use crate::repo::note_store::{validate_note, NoteStore, RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::HashMap;

/// SQLite-backed note store over a migrated connection.
pub struct SqliteNoteStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn load_all(&self) -> RepoResult<Vec<Note>> {
        let mut tags = load_all_tags(&*self.conn)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, created_at
             FROM notes
             ORDER BY created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let note_tags = tags.remove(&id).unwrap_or_default();
            notes.push(Note {
                title: row.get("title")?,
                content: row.get("content")?,
                created_at: row.get("created_at")?,
                tags: note_tags,
                id,
            });
        }
        Ok(notes)
    }

    fn insert(&mut self, note: &Note) -> RepoResult<()> {
        validate_note(note)?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if note_exists_in_tx(&tx, &note.id)? {
            return Err(RepoError::DuplicateId(note.id.clone()));
        }

        tx.execute(
            "INSERT INTO notes (id, title, content, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![note.id, note.title, note.content, note.created_at],
        )?;
        for (position, tag) in note.tags.iter().enumerate() {
            tx.execute(
                "INSERT INTO note_tags (note_id, position, tag) VALUES (?1, ?2, ?3);",
                params![note.id, position as i64, tag],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> RepoResult<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM note_tags WHERE note_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(changed > 0)
    }
}

fn load_all_tags(conn: &Connection) -> RepoResult<HashMap<String, Vec<String>>> {
    let mut stmt = conn.prepare(
        "SELECT note_id, tag
         FROM note_tags
         ORDER BY note_id ASC, position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut tags: HashMap<String, Vec<String>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let note_id: String = row.get(0)?;
        let tag: String = row.get(1)?;
        if tag.is_empty() {
            return Err(RepoError::InvalidData(format!(
                "empty tag stored for note `{note_id}`"
            )));
        }
        tags.entry(note_id).or_default().push(tag);
    }
    Ok(tags)
}

fn note_exists_in_tx(tx: &Transaction<'_>, id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_store_connection_ready(conn: &Connection) -> RepoResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        ("notes", &["id", "title", "content", "created_at"]),
        ("note_tags", &["note_id", "position", "tag"]),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
