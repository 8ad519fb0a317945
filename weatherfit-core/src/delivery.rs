use async_trait::async_trait;
use std::fmt::Debug;

pub mod telegram;

/// Outbound message channel. Results only matter for per-user error
/// accounting; the dispatcher never branches on delivery output.
#[async_trait]
pub trait MessageDelivery: Send + Sync + Debug {
    async fn send_text(&self, chat_id: &str, text: &str) -> anyhow::Result<()>;

    async fn send_image(&self, chat_id: &str, image_url: &str, caption: &str)
        -> anyhow::Result<()>;
}
