//! The main window's state and every action it offers.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::db::{Database, GridRow, TableDef};
use crate::error::{Error, Result};
use crate::prompt::Prompt;
use crate::selection::{deletion_summary, parse_range};

/// Heading of the synthetic display-index column.
pub const INDEX_COLUMN: &str = "#";

/// What the grid shows for the selected table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    pub table: String,
    /// `INDEX_COLUMN` followed by the table's columns.
    pub columns: Vec<String>,
    pub rows: Vec<GridRow>,
    pub editable: bool,
}

/// Rows matched by a range expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    /// Display indices present in the grid, in expression order.
    pub indices: Vec<usize>,
    /// Requested indices past the end of the grid.
    pub missing: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowRemoval {
    /// Nothing selected, malformed or empty input, or no index matched a row.
    Ignored { missing: Vec<usize> },
    Declined,
    Removed { deleted: u64, missing: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "table", rename_all = "snake_case")]
pub enum TableDrop {
    Ignored,
    Declined,
    Dropped(String),
}

struct Loaded {
    def: TableDef,
    rows: Vec<GridRow>,
}

/// Application state of the table viewer: the open file, the table list, the
/// loaded grid, the row being edited and the last highlighted selection.
pub struct Viewer {
    db: Database,
    config: ViewerConfig,
    tables: Vec<String>,
    current: Option<Loaded>,
    editing: Option<usize>,
    selection: Vec<usize>,
}

impl Viewer {
    pub async fn open(path: impl AsRef<Path>, config: ViewerConfig) -> Result<Self> {
        let db = Database::open(path.as_ref()).await?;
        let tables = db.tables().await?;
        Ok(Self {
            db,
            config,
            tables,
            current: None,
            editing: None,
            selection: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.db.path()
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn current_table(&self) -> Option<&str> {
        self.current.as_ref().map(|l| l.def.name.as_str())
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn grid(&self) -> Option<GridView> {
        self.current.as_ref().map(|loaded| GridView {
            table: loaded.def.name.clone(),
            columns: std::iter::once(INDEX_COLUMN.to_string())
                .chain(loaded.def.column_names().map(String::from))
                .collect(),
            rows: loaded.rows.clone(),
            editable: loaded.def.has_rowid() || !self.config.write_back,
        })
    }

    pub async fn refresh_tables(&mut self) -> Result<&[String]> {
        self.tables = self.db.tables().await?;
        Ok(&self.tables)
    }

    /// Load `name` into the grid, replacing whatever was shown before.
    pub async fn select_table(&mut self, name: &str) -> Result<GridView> {
        let def = self.db.describe(name).await?;
        let rows = self.db.load_rows(&def).await?;
        debug!(table = name, rows = rows.len(), "selected table");

        self.current = Some(Loaded { def, rows });
        self.editing = None;
        self.selection.clear();
        self.grid().ok_or(Error::NoTableSelected)
    }

    async fn reload(&mut self) -> Result<()> {
        if let Some(name) = self.current_table().map(String::from) {
            self.select_table(&name).await?;
        }
        Ok(())
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.current.as_ref().ok_or(Error::NoTableSelected)
    }

    /// Split `indices` into rows present in the grid and indices past its end.
    fn resolve(&self, indices: &[usize]) -> (Vec<&GridRow>, Vec<usize>) {
        let rows = self.current.as_ref().map(|l| l.rows.as_slice()).unwrap_or_default();
        let mut found = Vec::new();
        let mut missing = Vec::new();
        for &index in indices {
            match index.checked_sub(1).and_then(|i| rows.get(i)) {
                Some(row) => found.push(row),
                None => missing.push(index),
            }
        }
        if !missing.is_empty() {
            warn!(?missing, available = rows.len(), "indices outside the grid");
        }
        (found, missing)
    }

    /// Select the rows named by `expr`. Returns `None`, leaving the previous
    /// selection in place, when no table is loaded or `expr` is malformed.
    pub fn highlight(&mut self, expr: &str) -> Option<Highlight> {
        self.current.as_ref()?;
        let indices = match parse_range(expr) {
            Ok(indices) if !indices.is_empty() => indices,
            Ok(_) => return None,
            Err(e) => {
                debug!(%e, expr, "ignoring range expression");
                return None;
            }
        };
        let (found, missing) = self.resolve(&indices);
        let indices: Vec<usize> = found.iter().map(|r| r.index).collect();
        self.selection = indices.clone();
        Some(Highlight { indices, missing })
    }

    /// Delete the rows named by `expr` after the user confirms.
    ///
    /// Rows are deleted by the rowid captured when the grid was loaded, so a
    /// display index always removes the row shown at that position.
    pub async fn remove_rows<P: Prompt + ?Sized>(&mut self, expr: &str, prompt: &P) -> Result<RowRemoval> {
        let Some(loaded) = self.current.as_ref() else {
            return Ok(RowRemoval::Ignored { missing: Vec::new() });
        };
        let def = loaded.def.clone();
        let table = def.name.clone();

        let indices = match parse_range(expr) {
            Ok(indices) => indices,
            Err(e) => {
                debug!(%e, expr, "ignoring range expression");
                return Ok(RowRemoval::Ignored { missing: Vec::new() });
            }
        };

        let (found, missing) = self.resolve(&indices);
        if found.is_empty() {
            return Ok(RowRemoval::Ignored { missing });
        }
        if !def.has_rowid() {
            return Err(Error::NoRowId(table));
        }

        let mut seen = HashSet::new();
        let targets: Vec<(usize, i64)> = found
            .into_iter()
            .filter(|r| seen.insert(r.index))
            .filter_map(|r| r.key.map(|k| (r.index, k)))
            .collect();
        let shown: Vec<usize> = targets.iter().map(|(i, _)| *i).collect();
        let keys: Vec<i64> = targets.iter().map(|(_, k)| *k).collect();

        let message = deletion_summary(&shown, self.config.summary_limit);
        if !prompt.confirm("Confirm Deletion", &message).await {
            debug!(table = %table, rows = keys.len(), "row deletion declined");
            return Ok(RowRemoval::Declined);
        }

        let deleted = self.db.delete_rows(&def, &keys).await?;
        if deleted < keys.len() as u64 {
            warn!(table = %table, requested = keys.len(), deleted, "some rows were already gone");
        }

        self.refresh_tables().await?;
        self.reload().await?;
        prompt
            .notify("Rows Deleted", "Selected rows have been deleted.")
            .await;
        Ok(RowRemoval::Removed { deleted, missing })
    }

    /// Drop the selected table after the user confirms.
    pub async fn drop_table<P: Prompt + ?Sized>(&mut self, prompt: &P) -> Result<TableDrop> {
        let Some(table) = self.current_table().map(String::from) else {
            return Ok(TableDrop::Ignored);
        };

        let message = format!(
            "Are you sure you want to delete the table \"{table}\"? This action cannot be undone."
        );
        if !prompt.confirm("Confirm Deletion", &message).await {
            return Ok(TableDrop::Declined);
        }

        self.db.drop_table(&table).await?;
        self.current = None;
        self.editing = None;
        self.selection.clear();
        self.refresh_tables().await?;

        prompt
            .notify("Table Deleted", &format!("Table \"{table}\" has been deleted."))
            .await;
        Ok(TableDrop::Dropped(table))
    }

    /// Put row `index` into edit mode. Only one row is editable at a time.
    pub fn begin_edit(&mut self, index: usize) -> Result<&GridRow> {
        if let Some(active) = self.editing {
            return Err(Error::EditInProgress(active));
        }
        let loaded = self.loaded()?;
        let len = loaded.rows.len();
        if index == 0 || index > len {
            return Err(Error::RowOutOfRange { index, len });
        }
        self.editing = Some(index);
        Ok(&self.loaded()?.rows[index - 1])
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Commit the displayed cell values of the row in edit mode.
    ///
    /// The grid always takes the new values. With `write_back` the changed
    /// cells are also written to the table by rowid.
    pub async fn commit_edit(&mut self, values: Vec<Value>) -> Result<&GridRow> {
        let index = self.editing.ok_or(Error::NotEditing)?;
        let loaded = self.loaded()?;
        let expected = loaded.def.columns.len();
        if values.len() != expected {
            return Err(Error::ValueCount {
                expected,
                actual: values.len(),
            });
        }

        let row = &loaded.rows[index - 1];
        let changed: Vec<(String, Value)> = loaded
            .def
            .column_names()
            .zip(row.cells.iter().zip(&values))
            .filter(|(_, (old, new))| old != new)
            .map(|(name, (_, new))| (name.to_string(), new.clone()))
            .collect();

        if self.config.write_back && !changed.is_empty() {
            let key = row.key.ok_or_else(|| Error::NoRowId(loaded.def.name.clone()))?;
            let updated = self.db.update_row(&loaded.def, key, &changed).await?;
            if updated == 0 {
                warn!(table = %loaded.def.name, rowid = key, "edited row no longer exists");
            }
        } else if !changed.is_empty() {
            info!(row = index, columns = changed.len(), "edit kept in grid only");
        }

        self.editing = None;
        let loaded = self.current.as_mut().ok_or(Error::NoTableSelected)?;
        let row = &mut loaded.rows[index - 1];
        row.cells = values;
        Ok(row)
    }
}
