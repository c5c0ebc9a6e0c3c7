use serde::{Deserialize, Serialize};
use serde_json::Value;
use tauri::{AppHandle, State, Window};
use tokio::sync::Mutex;

use lite_viewer_core::{
    Error, GridRow, GridView, Highlight, Prompt, RowRemoval, Settings, TableDrop, Viewer,
};

use crate::dialogs::{pick_database, DialogPrompt};

/// Shared state managed by Tauri: settings plus the open viewer, if any.
pub struct Session {
    settings: Settings,
    viewer: Mutex<Option<Viewer>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            viewer: Mutex::new(None),
        }
    }
}

const NO_DATABASE: &str = "no database is open";

/// Show `err` in an error dialog and hand its text back to the frontend.
async fn report(app: &AppHandle, err: Error) -> String {
    let message = err.to_string();
    tracing::error!(%message, "action failed");
    DialogPrompt::new(app.clone()).alert("Error", &message).await;
    message
}

#[derive(Serialize)]
pub struct Opened {
    pub path: String,
    pub tables: Vec<String>,
}

#[tauri::command]
pub async fn select_database(
    app: AppHandle,
    window: Window,
    session: State<'_, Session>,
) -> Result<Option<Opened>, String> {
    let Some(path) = pick_database(&app, &session.settings.dialog.extensions).await else {
        return Ok(None);
    };

    let viewer = match Viewer::open(&path, session.settings.viewer.clone()).await {
        Ok(v) => v,
        Err(e) => {
            let message = e.to_string();
            DialogPrompt::new(app.clone())
                .alert("Invalid Database", &message)
                .await;
            return Err(message);
        }
    };

    if let Err(e) = window.set_title(&format!("SQLite Viewer - {}", viewer.path().display())) {
        tracing::warn!(error = %e, "could not set window title");
    }
    let opened = Opened {
        path: viewer.path().display().to_string(),
        tables: viewer.tables().to_vec(),
    };
    *session.viewer.lock().await = Some(viewer);
    Ok(Some(opened))
}

#[tauri::command]
pub async fn list_tables(app: AppHandle, session: State<'_, Session>) -> Result<Vec<String>, String> {
    let mut guard = session.viewer.lock().await;
    let viewer = guard.as_mut().ok_or(NO_DATABASE)?;
    match viewer.refresh_tables().await {
        Ok(tables) => Ok(tables.to_vec()),
        Err(e) => Err(report(&app, e).await),
    }
}

#[derive(Deserialize)]
pub struct TableArgs {
    pub name: String,
}

#[tauri::command]
pub async fn select_table(
    app: AppHandle,
    session: State<'_, Session>,
    args: TableArgs,
) -> Result<GridView, String> {
    let mut guard = session.viewer.lock().await;
    let viewer = guard.as_mut().ok_or(NO_DATABASE)?;
    match viewer.select_table(&args.name).await {
        Ok(grid) => Ok(grid),
        Err(e) => Err(report(&app, e).await),
    }
}

#[derive(Deserialize)]
pub struct RangeArgs {
    pub expr: String,
}

#[tauri::command]
pub async fn highlight_rows(
    session: State<'_, Session>,
    args: RangeArgs,
) -> Result<Option<Highlight>, String> {
    let mut guard = session.viewer.lock().await;
    let viewer = guard.as_mut().ok_or(NO_DATABASE)?;
    Ok(viewer.highlight(&args.expr))
}

/// Table list and grid after a mutation, alongside what happened.
#[derive(Serialize)]
pub struct Refreshed<T> {
    pub outcome: T,
    pub tables: Vec<String>,
    pub grid: Option<GridView>,
}

impl<T> Refreshed<T> {
    fn of(viewer: &Viewer, outcome: T) -> Self {
        Self {
            outcome,
            tables: viewer.tables().to_vec(),
            grid: viewer.grid(),
        }
    }
}

#[tauri::command]
pub async fn remove_rows(
    app: AppHandle,
    session: State<'_, Session>,
    args: RangeArgs,
) -> Result<Refreshed<RowRemoval>, String> {
    let mut guard = session.viewer.lock().await;
    let viewer = guard.as_mut().ok_or(NO_DATABASE)?;
    let prompt = DialogPrompt::new(app.clone());
    match viewer.remove_rows(&args.expr, &prompt).await {
        Ok(outcome) => Ok(Refreshed::of(viewer, outcome)),
        Err(e) => Err(report(&app, e).await),
    }
}

#[tauri::command]
pub async fn delete_table(
    app: AppHandle,
    session: State<'_, Session>,
) -> Result<Refreshed<TableDrop>, String> {
    let mut guard = session.viewer.lock().await;
    let viewer = guard.as_mut().ok_or(NO_DATABASE)?;
    let prompt = DialogPrompt::new(app.clone());
    match viewer.drop_table(&prompt).await {
        Ok(outcome) => Ok(Refreshed::of(viewer, outcome)),
        Err(e) => Err(report(&app, e).await),
    }
}

#[derive(Deserialize)]
pub struct EditArgs {
    pub index: usize,
}

#[tauri::command]
pub async fn begin_edit(
    app: AppHandle,
    session: State<'_, Session>,
    args: EditArgs,
) -> Result<GridRow, String> {
    let mut guard = session.viewer.lock().await;
    let viewer = guard.as_mut().ok_or(NO_DATABASE)?;
    let started = viewer.begin_edit(args.index).map(Clone::clone);
    match started {
        Ok(row) => Ok(row),
        Err(e) => Err(report(&app, e).await),
    }
}

#[derive(Deserialize)]
pub struct CommitArgs {
    pub values: Vec<Value>,
}

#[tauri::command]
pub async fn commit_edit(
    app: AppHandle,
    session: State<'_, Session>,
    args: CommitArgs,
) -> Result<GridRow, String> {
    let mut guard = session.viewer.lock().await;
    let viewer = guard.as_mut().ok_or(NO_DATABASE)?;
    match viewer.commit_edit(args.values).await {
        Ok(row) => Ok(row.clone()),
        Err(e) => Err(report(&app, e).await),
    }
}

#[tauri::command]
pub async fn cancel_edit(session: State<'_, Session>) -> Result<(), String> {
    let mut guard = session.viewer.lock().await;
    let viewer = guard.as_mut().ok_or(NO_DATABASE)?;
    viewer.cancel_edit();
    Ok(())
}
