use std::path::PathBuf;

use async_trait::async_trait;
use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::{
    DialogExt, FileDialogBuilder, MessageDialogButtons, MessageDialogKind,
};
use tokio::sync::oneshot;

use lite_viewer_core::Prompt;

/// Native open-file dialog limited to `extensions`. `None` when cancelled.
pub async fn pick_database<R: Runtime>(app: &AppHandle<R>, extensions: &[String]) -> Option<PathBuf> {
    // Bridge the callback-style API to async via a oneshot channel (non-blocking).
    let (tx, rx) = oneshot::channel::<Option<String>>();
    let extensions: Vec<&str> = extensions.iter().map(String::as_str).collect();

    FileDialogBuilder::new(app.dialog().clone())
        .set_title("Select Database")
        .add_filter("Database files", &extensions)
        .pick_file(move |picked| {
            let path = picked.map(|p| p.to_string());
            let _ = tx.send(path);
        });

    rx.await.ok().flatten().map(PathBuf::from)
}

/// [`Prompt`] backed by native message boxes.
pub struct DialogPrompt<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> DialogPrompt<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }

    async fn show(&self, title: &str, message: &str, kind: MessageDialogKind, buttons: MessageDialogButtons) -> bool {
        let (tx, rx) = oneshot::channel::<bool>();
        self.app
            .dialog()
            .message(message)
            .title(title)
            .kind(kind)
            .buttons(buttons)
            .show(move |answer| {
                let _ = tx.send(answer);
            });
        // A dialog torn down without an answer counts as "no".
        rx.await.unwrap_or(false)
    }
}

#[async_trait]
impl<R: Runtime> Prompt for DialogPrompt<R> {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        self.show(title, message, MessageDialogKind::Warning, MessageDialogButtons::OkCancel)
            .await
    }

    async fn notify(&self, title: &str, message: &str) {
        self.show(title, message, MessageDialogKind::Info, MessageDialogButtons::Ok)
            .await;
    }

    async fn alert(&self, title: &str, message: &str) {
        self.show(title, message, MessageDialogKind::Error, MessageDialogButtons::Ok)
            .await;
    }
}
