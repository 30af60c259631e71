//! Settings databases in throwaway directories

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;

use dashboard::database::Database;

/// Database file inside a temporary directory, removed on drop
pub struct TestDatabase {
    dir: TempDir,
    path: String,
}

impl TestDatabase {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir
            .path()
            .join("data")
            .join("dashboard.db")
            .to_string_lossy()
            .into_owned();
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Open (or reopen) the database; reopening simulates a restart
    pub async fn open(&self) -> Result<Arc<Database>> {
        Ok(Arc::new(Database::new(&self.path).await?))
    }
}
