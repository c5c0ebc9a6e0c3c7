//! Core of the SQLite table viewer: catalog introspection, grid loading,
//! range selection, row and table deletion and in-place cell edits.
//!
//! Everything here runs without a window system; the desktop shell forwards
//! its commands to [`Viewer`] and implements [`Prompt`] with native dialogs.

pub mod config;
pub mod db;
pub mod error;
pub mod prompt;
pub mod selection;
pub mod viewer;

#[cfg(test)]
mod testing;

pub use config::Settings;
pub use db::{ColumnDef, Database, GridRow, TableDef};
pub use error::{ConfigError, Error, Result};
pub use prompt::Prompt;
pub use selection::{deletion_summary, parse_range, RangeError};
pub use viewer::{GridView, Highlight, RowRemoval, TableDrop, Viewer};
