use async_trait::async_trait;

/// Blocking user dialogs. The desktop shell backs this with native message
/// boxes; each call returns only once the user has answered.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Yes/no question. `true` means the user agreed.
    async fn confirm(&self, title: &str, message: &str) -> bool;

    /// Informational message after something succeeded.
    async fn notify(&self, title: &str, message: &str);

    /// Error message.
    async fn alert(&self, title: &str, message: &str);
}
