use notegraph_core::{
    open_db_in_memory, ConnectionTier, GraphConfig, GraphWorkspace, MemoryNoteStore, NewNote,
    Note, NoteStore, RepoError, RepoResult, SnapshotSource, SqliteNoteStore,
};

/// Memory store whose reads can be switched off to simulate an outage.
struct FlakyStore {
    inner: MemoryNoteStore,
    reads_fail: bool,
}

impl NoteStore for FlakyStore {
    fn load_all(&self) -> RepoResult<Vec<Note>> {
        if self.reads_fail {
            return Err(RepoError::InvalidData("store offline".to_string()));
        }
        self.inner.load_all()
    }

    fn insert(&mut self, note: &Note) -> RepoResult<()> {
        self.inner.insert(note)
    }

    fn delete(&mut self, id: &str) -> RepoResult<bool> {
        self.inner.delete(id)
    }
}

#[test]
fn workspace_rebuilds_graph_on_every_mutation() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&mut conn).unwrap();
    let mut workspace = GraphWorkspace::open(store, GraphConfig::default(), 800.0, 600.0);
    assert!(workspace.graph().notes().is_empty());

    let intro = workspace
        .add_note(NewNote::new("Intro to AI", "").with_tags(["#AI", "ml"]))
        .unwrap();
    let advanced = workspace
        .add_note(NewNote::new("Advanced AI", "").with_tags(["ai"]))
        .unwrap();

    let conn_ai = workspace
        .graph()
        .connections()
        .get(&intro.id, &advanced.id)
        .unwrap()
        .clone();
    assert_eq!(conn_ai.tier, ConnectionTier::SharedTags);
    assert_eq!(conn_ai.reason, "Shared tags: #ai");
    assert_eq!(workspace.graph().frame().positions.len(), 2);

    assert!(workspace.delete_note(&advanced.id).unwrap());
    assert!(workspace.graph().connections().is_empty());
    assert_eq!(workspace.graph().frame().positions.len(), 1);
    assert!(!workspace.delete_note(&advanced.id).unwrap());
}

#[test]
fn degraded_store_keeps_last_known_snapshot() {
    let seeded = vec![
        Note::new("1", "Intro to AI", "", &["ai".to_string()], "2026-01-01T00:00:00.000Z"),
        Note::new("2", "Advanced AI", "", &["ai".to_string()], "2026-01-02T00:00:00.000Z"),
    ];
    let store = FlakyStore {
        inner: MemoryNoteStore::with_notes(seeded),
        reads_fail: false,
    };
    let mut workspace = GraphWorkspace::open(store, GraphConfig::default(), 800.0, 600.0);
    assert_eq!(workspace.snapshot_source(), SnapshotSource::Store);
    let connections = workspace.graph().connections().clone();
    assert_eq!(connections.len(), 1);

    workspace.graph_mut().simulation_mut().run(25);
    let positions = workspace.graph().simulation().positions();

    workspace.notes_mut().store_mut().reads_fail = true;
    assert_eq!(workspace.reload(), SnapshotSource::LastKnown);
    assert_eq!(workspace.snapshot_source(), SnapshotSource::LastKnown);
    assert_eq!(workspace.graph().notes().len(), 2);
    assert_eq!(workspace.graph().connections(), &connections);
    assert_eq!(workspace.graph().simulation().positions(), positions);

    workspace.notes_mut().store_mut().reads_fail = false;
    assert_eq!(workspace.reload(), SnapshotSource::Store);
}

#[test]
fn duplicate_import_surfaces_repo_error_and_keeps_graph() {
    let mut workspace = GraphWorkspace::open(
        MemoryNoteStore::new(),
        GraphConfig::default(),
        800.0,
        600.0,
    );
    let note = Note::new("fixed", "Rust", "ownership", &[], "2026-01-01T00:00:00.000Z");
    workspace.import_note(note.clone()).unwrap();

    assert!(workspace.import_note(note).is_err());
    assert_eq!(workspace.graph().notes().len(), 1);
}

#[test]
fn open_reports_unreachable_store_without_a_second_load() {
    let store = FlakyStore {
        inner: MemoryNoteStore::new(),
        reads_fail: true,
    };
    let workspace = GraphWorkspace::open(store, GraphConfig::default(), 800.0, 600.0);
    assert_eq!(workspace.snapshot_source(), SnapshotSource::LastKnown);
    assert!(workspace.graph().notes().is_empty());
    assert!(workspace.graph().connections().is_empty());
}
