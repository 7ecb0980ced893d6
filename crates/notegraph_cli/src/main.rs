//! Headless notes-graph driver.
//!
//! # Responsibility
//! - Open the note database, build the graph and let the layout cool.
//! - Print connections and final positions in a stable, greppable form.
//!
//! # Environment
//! - `NOTEGRAPH_DB_PATH`: database file (default: `<tmp>/notegraph.sqlite3`).
//! - `NOTEGRAPH_CONFIG`: optional JSON graph config.
//! - `NOTEGRAPH_LOG_DIR`: optional absolute log directory; logging is off when unset.

use log::info;
use notegraph_core::{
    core_version, default_log_level, init_logging, open_db, GraphConfig, GraphWorkspace,
    SnapshotSource, SqliteNoteStore,
};
use std::path::PathBuf;
use std::process::ExitCode;

const VIEWPORT_WIDTH: f64 = 1280.0;
const VIEWPORT_HEIGHT: f64 = 720.0;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("notegraph: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    if let Ok(log_dir) = std::env::var("NOTEGRAPH_LOG_DIR") {
        init_logging(default_log_level(), &log_dir)?;
    }

    let config = match std::env::var_os("NOTEGRAPH_CONFIG") {
        Some(path) => GraphConfig::load(&path).map_err(|err| err.to_string())?,
        None => GraphConfig::default(),
    };
    let db_path = std::env::var_os("NOTEGRAPH_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("notegraph.sqlite3"));

    let mut conn = open_db(&db_path).map_err(|err| err.to_string())?;
    let store = SqliteNoteStore::try_new(&mut conn).map_err(|err| err.to_string())?;
    let max_steps = config.simulation.max_heat;
    let mut workspace = GraphWorkspace::open(store, config, VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    if workspace.snapshot_source() == SnapshotSource::LastKnown {
        return Err(format!("failed to load notes from `{}`", db_path.display()));
    }

    let graph = workspace.graph_mut();
    let steps = graph.simulation_mut().run(max_steps);
    info!(
        "event=cli_run module=cli status=ok notes={} connections={} steps={steps}",
        graph.notes().len(),
        graph.connections().len()
    );

    println!("notegraph version={}", core_version());
    println!("db={}", db_path.display());
    println!(
        "notes={} connections={} steps={steps}",
        graph.notes().len(),
        graph.connections().len()
    );
    for edge in graph.connections() {
        println!(
            "edge {} strength={:.3} tier={:?} reason={:?}",
            edge.key, edge.strength, edge.tier, edge.reason
        );
    }
    for (id, position) in graph.frame().positions {
        println!("node {id} x={:.1} y={:.1}", position.x, position.y);
    }
    Ok(())
}
