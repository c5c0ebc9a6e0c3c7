use sea_query::{Alias, Expr, Query, SimpleExpr, SqliteQueryBuilder, Table};
use sea_query_binder::{SqlxBinder, SqlxValues};
use serde_json::Value as JsonValue;

use super::schema::TableDef;

// ---- helpers ----

/// `alias` is one of SQLite's fixed rowid names, picked in `schema`.
fn rowid(alias: &str) -> Expr {
    Expr::expr(Expr::cust(alias))
}

fn json_to_simple(val: &JsonValue) -> SimpleExpr {
    match val {
        JsonValue::Null => Expr::val(Option::<i64>::None).into(),
        JsonValue::Bool(b) => Expr::val(*b).into(),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() { Expr::val(i).into() }
            else if let Some(f) = n.as_f64() { Expr::val(f).into() }
            else { Expr::val(n.to_string()).into() }
        }
        JsonValue::String(s) => Expr::val(s.as_str()).into(),
        // Cells never hold composites; store them as their JSON text.
        JsonValue::Array(_) | JsonValue::Object(_) => Expr::val(val.to_string()).into(),
    }
}

// ---- builders ----

/// Every row of `table`, rowid first when the table has one.
pub fn build_select_rows(table: &TableDef) -> (String, SqlxValues) {
    let mut stmt = Query::select();
    if let Some(alias) = &table.rowid {
        stmt.expr(Expr::cust(alias.as_str()));
    }
    stmt.columns(table.column_names().map(Alias::new));
    stmt.from(Alias::new(&table.name));
    stmt.build_sqlx(SqliteQueryBuilder)
}

pub fn build_delete_by_rowid(table: &str, alias: &str, keys: &[i64]) -> (String, SqlxValues) {
    let mut stmt = Query::delete();
    stmt.from_table(Alias::new(table))
        .and_where(rowid(alias).is_in(keys.iter().copied()));
    stmt.build_sqlx(SqliteQueryBuilder)
}

/// `UPDATE table SET col = value, ... WHERE (alias) = key`.
pub fn build_update_by_rowid(
    table: &str,
    alias: &str,
    key: i64,
    values: &[(String, JsonValue)],
) -> (String, SqlxValues) {
    let mut stmt = Query::update();
    stmt.table(Alias::new(table));
    for (c, v) in values {
        stmt.value(Alias::new(c), json_to_simple(v));
    }
    stmt.and_where(rowid(alias).eq(key));
    stmt.build_sqlx(SqliteQueryBuilder)
}

pub fn build_drop_table(table: &str) -> String {
    Table::drop()
        .table(Alias::new(table))
        .if_exists()
        .build(SqliteQueryBuilder)
}
