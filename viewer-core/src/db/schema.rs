use serde::{Deserialize, Serialize};
use sqlx::{Row, SqliteConnection};

use tracing::debug;

use crate::error::{Error, Result};

/// A column definition, in physical table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default: Option<String>,
    pub is_pk: bool,
}

/// Names SQLite resolves to the rowid unless a column claims them.
const ROWID_ALIASES: [&str; 3] = ["rowid", "_rowid_", "oid"];

/// A table with its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// The name that reaches the real rowid. `None` for `WITHOUT ROWID` and
    /// virtual tables, and for tables whose columns shadow every alias.
    pub rowid: Option<String>,
}

impl TableDef {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_rowid(&self) -> bool {
        self.rowid.is_some()
    }
}

/// First rowid alias no column of `columns` is named after.
fn free_rowid_alias(columns: &[ColumnDef]) -> Option<String> {
    ROWID_ALIASES
        .iter()
        .find(|alias| !columns.iter().any(|c| c.name.eq_ignore_ascii_case(alias)))
        .map(|alias| alias.to_string())
}

/// Names of every table in the catalog, in catalog order.
pub async fn list_tables(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>("SELECT name FROM sqlite_master WHERE type = 'table'")
        .fetch_all(conn)
        .await?;
    Ok(names)
}

/// Columns and rowid access of `name`. Read fresh on every call.
pub async fn describe_table(conn: &mut SqliteConnection, name: &str) -> Result<TableDef> {
    // Virtual and shadow tables are listed alongside ordinary ones.
    let listing = sqlx::query(
        "SELECT type, wr FROM pragma_table_list \
         WHERE schema = 'main' AND type IN ('table', 'virtual', 'shadow') AND name = ?1",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
    let kind: String = listing.try_get("type")?;
    let without_rowid: i64 = listing.try_get("wr")?;

    // Table-valued pragma form so the name is bound rather than spliced in.
    let columns = sqlx::query(
        r#"SELECT name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid"#,
    )
    .bind(name)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|r| ColumnDef {
        name: r.try_get::<String, _>("name").unwrap_or_default(),
        data_type: r.try_get::<String, _>("type").unwrap_or_default(),
        not_null: r.try_get::<i64, _>("notnull").unwrap_or(0) == 1,
        default: r.try_get::<Option<String>, _>("dflt_value").unwrap_or(None),
        is_pk: r.try_get::<i64, _>("pk").unwrap_or(0) > 0,
    })
    .collect::<Vec<_>>();

    // Virtual tables are never keyed.
    let rowid = if kind == "virtual" || without_rowid != 0 {
        None
    } else {
        free_rowid_alias(&columns)
    };
    if rowid.is_none() {
        debug!(table = name, kind = %kind, "no usable rowid");
    }

    Ok(TableDef {
        name: name.to_string(),
        columns,
        rowid,
    })
}
