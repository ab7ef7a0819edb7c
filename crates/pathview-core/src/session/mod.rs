//! Discovery and loading of per-session tables from a directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{PathviewError, Result};
use crate::table::SessionTable;

/// Extension of session files, without the dot
pub const TABLE_EXTENSION: &str = "csv";
/// Tag column holding the session identifier
pub const ID_COLUMN: &str = "ID";
/// Tag column holding the session base name
pub const FILENAME_COLUMN: &str = "filename";

/// One recorded session loaded from a single file
#[derive(Debug, Clone)]
pub struct Session {
    /// Zero-based identifier in filename order
    pub id: usize,
    /// Source filename without extension
    pub name: String,
    /// Path the table was read from
    pub path: PathBuf,
    pub table: SessionTable,
}

/// Base name of a session file: its filename without the extension
pub fn session_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed_session")
        .to_string()
}

impl Session {
    /// Read one session file and add the `ID` and `filename` tag columns.
    pub fn load(id: usize, path: PathBuf) -> Result<Self> {
        let name = session_name(&path);

        log::info!("Session {}: {}", id, path.display());
        let mut table = SessionTable::read_csv(&path, name.clone())?;
        log::debug!("Session {}: {} rows", id, table.len());

        table.set_constant_column(ID_COLUMN, &id.to_string());
        table.set_constant_column(FILENAME_COLUMN, &name);

        Ok(Self {
            id,
            name,
            path,
            table,
        })
    }
}

/// All sessions of a directory plus their stacked table.
///
/// `sessions[i].id == i` and the rows of `combined` tagged with `ID == i`
/// are exactly the rows of `sessions[i].table`, in order.
#[derive(Debug, Clone)]
pub struct SessionCollection {
    sessions: Vec<Session>,
    combined: SessionTable,
}

impl SessionCollection {
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn ids(&self) -> Vec<usize> {
        self.sessions.iter().map(|s| s.id).collect()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.name.clone()).collect()
    }

    pub fn tables(&self) -> impl Iterator<Item = &SessionTable> {
        self.sessions.iter().map(|s| &s.table)
    }

    /// All session tables stacked with a fresh contiguous row index
    pub fn combined(&self) -> &SessionTable {
        &self.combined
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Split into identifiers, base names, per-session tables and the stacked table
    pub fn into_parts(self) -> (Vec<usize>, Vec<String>, Vec<SessionTable>, SessionTable) {
        let ids = self.ids();
        let names = self.filenames();
        let tables = self.sessions.into_iter().map(|s| s.table).collect();
        (ids, names, tables, self.combined)
    }
}

/// List session files in `dir`, sorted by filename.
pub fn discover_session_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let read_err = |source| PathviewError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        let is_table = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == TABLE_EXTENSION);
        if is_table && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Load every session file in `dir`.
///
/// Identifiers are assigned in filename order starting at 0. Each table gets
/// the `ID` and `filename` tag columns. Column sets are not checked across
/// sessions.
pub fn load_sessions<P: AsRef<Path>>(dir: P) -> Result<SessionCollection> {
    let files = discover_session_files(dir.as_ref())?;

    let mut sessions = Vec::with_capacity(files.len());
    for (id, path) in files.into_iter().enumerate() {
        sessions.push(Session::load(id, path)?);
    }

    let combined = SessionTable::concat("combined", sessions.iter().map(|s| &s.table));

    Ok(SessionCollection { sessions, combined })
}
