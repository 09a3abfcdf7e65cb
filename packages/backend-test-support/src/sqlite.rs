//! Throwaway SQLite databases for integration tests.

use std::path::PathBuf;

use tempfile::TempDir;

/// A SQLite file living in its own temp directory.
///
/// The directory (and the database) is removed when this value is dropped, so
/// keep it alive for as long as the connection pool is in use.
pub struct TempSqlite {
    dir: TempDir,
    file_name: String,
}

impl TempSqlite {
    pub fn new() -> std::io::Result<Self> {
        Self::with_name("trxscope_test.sqlite")
    }

    pub fn with_name(file_name: &str) -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            file_name: file_name.to_string(),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join(&self.file_name)
    }

    /// Connection URL with `mode=rwc` so the file is created on first connect.
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path().display())
    }
}
