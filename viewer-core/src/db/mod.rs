pub mod builder;
pub mod schema;

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::TryStreamExt;
use serde::Serialize;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Connection, Row, SqliteConnection, ValueRef};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use schema::{ColumnDef, TableDef};

/// Keys per DELETE statement, well under SQLite's bound-parameter limit.
const DELETE_CHUNK: usize = 500;

/// One loaded record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    /// 1-based display position, reassigned on every load.
    pub index: usize,
    /// The row's rowid at load time; `None` for `WITHOUT ROWID` tables.
    pub key: Option<i64>,
    pub cells: Vec<Value>,
}

/// A SQLite file on disk. Every operation opens its own connection and closes
/// it before returning; nothing is held between calls.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl Database {
    /// Open `path` and prove it is a readable SQLite database by listing its
    /// tables once. The file is never created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(false);
        let db = Self { path, options };

        let probe = async {
            let mut conn = db.connect().await?;
            let tables = schema::list_tables(&mut conn).await?;
            conn.close().await?;
            Ok::<_, Error>(tables.len())
        };
        let outcome = probe.await;
        match outcome {
            Ok(count) => {
                info!(path = %db.path.display(), tables = count, "opened database");
                Ok(db)
            }
            Err(Error::Database(source)) => Err(Error::InvalidDatabase {
                path: db.path.clone(),
                source,
            }),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }

    pub async fn tables(&self) -> Result<Vec<String>> {
        let mut conn = self.connect().await?;
        let names = schema::list_tables(&mut conn).await?;
        conn.close().await?;
        Ok(names)
    }

    pub async fn describe(&self, table: &str) -> Result<TableDef> {
        let mut conn = self.connect().await?;
        let def = schema::describe_table(&mut conn, table).await?;
        conn.close().await?;
        Ok(def)
    }

    /// Materialise every row of `table`, numbering them from 1.
    pub async fn load_rows(&self, table: &TableDef) -> Result<Vec<GridRow>> {
        let (sql, values) = builder::build_select_rows(table);
        let offset = usize::from(table.has_rowid());
        let width = table.columns.len();

        let mut conn = self.connect().await?;
        let mut rows = Vec::new();
        {
            let mut stream = sqlx::query_with(&sql, values).fetch(&mut conn);
            while let Some(row) = stream.try_next().await? {
                let key = if table.has_rowid() {
                    Some(row.try_get::<i64, _>(0)?)
                } else {
                    None
                };
                let cells = (offset..offset + width).map(|i| cell_value(&row, i)).collect();
                rows.push(GridRow {
                    index: rows.len() + 1,
                    key,
                    cells,
                });
            }
        }
        conn.close().await?;

        debug!(table = %table.name, rows = rows.len(), "loaded rows");
        Ok(rows)
    }

    /// Delete the rows whose rowid is in `keys`, all in one transaction.
    /// Returns the number of rows actually removed.
    pub async fn delete_rows(&self, table: &TableDef, keys: &[i64]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let alias = table
            .rowid
            .as_deref()
            .ok_or_else(|| Error::NoRowId(table.name.clone()))?;
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;
        let mut deleted = 0;
        for chunk in keys.chunks(DELETE_CHUNK) {
            let (sql, values) = builder::build_delete_by_rowid(&table.name, alias, chunk);
            deleted += sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;
        conn.close().await?;

        info!(table = %table.name, requested = keys.len(), deleted, "deleted rows");
        Ok(deleted)
    }

    /// Write `values` (column, value) into the row with rowid `key`.
    pub async fn update_row(&self, table: &TableDef, key: i64, values: &[(String, Value)]) -> Result<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let alias = table
            .rowid
            .as_deref()
            .ok_or_else(|| Error::NoRowId(table.name.clone()))?;
        let (sql, binds) = builder::build_update_by_rowid(&table.name, alias, key, values);
        let mut conn = self.connect().await?;
        let updated = sqlx::query_with(&sql, binds)
            .execute(&mut conn)
            .await?
            .rows_affected();
        conn.close().await?;

        info!(table = %table.name, rowid = key, columns = values.len(), updated, "updated row");
        Ok(updated)
    }

    pub async fn drop_table(&self, table: &str) -> Result<()> {
        let sql = builder::build_drop_table(table);
        let mut conn = self.connect().await?;
        sqlx::query(&sql).execute(&mut conn).await?;
        conn.close().await?;

        info!(table, "dropped table");
        Ok(())
    }
}

/// Convert one cell to JSON. Blobs become base64 text.
fn cell_value(row: &SqliteRow, i: usize) -> Value {
    match row.try_get_raw(i) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }
    // Try common types; fallback to null
    if let Ok(v) = row.try_get::<i64, _>(i) {
        Value::from(v)
    } else if let Ok(v) = row.try_get::<f64, _>(i) {
        Value::from(v)
    } else if let Ok(v) = row.try_get::<String, _>(i) {
        Value::from(v)
    } else if let Ok(v) = row.try_get::<Vec<u8>, _>(i) {
        Value::from(STANDARD.encode(v))
    } else {
        Value::Null
    }
}
