// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;     // Tauri command handlers forwarding to the core viewer
mod dialogs; // Native file picker and message boxes

use lite_viewer_core::Settings;

fn main() -> anyhow::Result<()> {
    let path = Settings::default_path();
    let loaded = match &path {
        Some(p) => Settings::load(p),
        None => Ok(Settings::default()),
    };
    let settings = match loaded {
        Ok(s) => {
            s.logging.init();
            s
        }
        Err(e) => {
            let s = Settings::default();
            s.logging.init();
            tracing::warn!(error = %e, "ignoring settings file, using defaults");
            s
        }
    };
    tracing::info!(config = ?path, "starting");

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        // One viewer session shared by every command
        .manage(api::Session::new(settings))
        .invoke_handler(tauri::generate_handler![
            api::select_database,
            api::list_tables,
            api::select_table,
            api::highlight_rows,
            api::remove_rows,
            api::delete_table,
            api::begin_edit,
            api::commit_edit,
            api::cancel_edit,
        ])
        .run(tauri::generate_context!())?;
    Ok(())
}
