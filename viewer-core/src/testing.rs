//! Fixtures shared by the unit tests.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, Executor, SqliteConnection};
use tempfile::TempDir;

use crate::prompt::Prompt;

/// Create `test.db` in a fresh temp dir and run `sql` against it. Keep the
/// returned `TempDir` alive for as long as the file is used.
pub async fn seed_database(sql: &str) -> anyhow::Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test.db");
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;
    conn.execute(sql).await?;
    conn.close().await?;
    Ok((dir, path))
}

/// Answers every confirmation with a fixed reply and records what was shown.
pub struct ScriptedPrompt {
    answer: bool,
    pub shown: Mutex<Vec<(String, String)>>,
}

impl ScriptedPrompt {
    pub fn yes() -> Self {
        Self { answer: true, shown: Mutex::new(Vec::new()) }
    }

    pub fn no() -> Self {
        Self { answer: false, shown: Mutex::new(Vec::new()) }
    }

    pub fn titles(&self) -> Vec<String> {
        self.shown.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.shown.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }

    fn record(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        self.record(title, message);
        self.answer
    }

    async fn notify(&self, title: &str, message: &str) {
        self.record(title, message);
    }

    async fn alert(&self, title: &str, message: &str) {
        self.record(title, message);
    }
}
