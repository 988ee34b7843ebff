use std::future::Future;
use std::pin::Pin;

/// A message received from a channel.
///
/// `sender` identifies the author (e.g. a Discord user ID); `id` identifies
/// the message itself so it can be deleted after a cleaned repost.
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    pub id: String,
    pub sender: String,
    pub content: String,
    pub channel: String,
    pub timestamp: u64,
}

/// Core channel trait, implemented once per messaging platform
pub trait Channel: Send + Sync {
    /// Human-readable channel name
    fn name(&self) -> &str;

    /// Sender id the channel uses for our own messages, if any
    fn self_id(&self) -> Option<&str> {
        None
    }

    /// Send a message through this channel
    fn send<'a>(
        &'a self,
        message: &'a str,
        recipient: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

    /// Start listening for incoming messages (long-running)
    fn listen<'a>(
        &'a self,
        tx: tokio::sync::mpsc::Sender<ChannelMessage>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

    fn delete_message<'a>(
        &'a self,
        _channel_id: &'a str,
        _message_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move { anyhow::bail!("message deletion not supported by this channel") })
    }
}
