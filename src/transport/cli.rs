use super::traits::{Channel, ChannelMessage};
use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

const CONSOLE_SENDER: &str = "console";
const CONSOLE_CHANNEL: &str = "cli";

/// Terminal stand-in for a chat room: each stdin line is one posted message,
/// reposts and command replies are printed to stdout.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Channel for CliChannel {
    fn name(&self) -> &str {
        CONSOLE_CHANNEL
    }

    fn send<'a>(
        &'a self,
        message: &'a str,
        _recipient: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            println!("{message}");
            Ok(())
        })
    }

    fn listen<'a>(
        &'a self,
        tx: Sender<ChannelMessage>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(forward_lines(BufReader::new(io::stdin()), tx))
    }

    /// Printed lines stay on screen; the repost simply follows the original.
    fn delete_message<'a>(
        &'a self,
        _channel_id: &'a str,
        _message_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move { Ok(()) })
    }
}

/// Forward each non-blank line of `reader` as a console message until EOF,
/// `/quit`, `/exit`, or the runtime hangs up.
async fn forward_lines<R>(reader: R, tx: Sender<ChannelMessage>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        if matches!(content, "/quit" | "/exit") {
            break;
        }
        if tx.send(console_message(content)).await.is_err() {
            break;
        }
    }
    Ok(())
}

fn console_message(content: &str) -> ChannelMessage {
    ChannelMessage {
        id: Uuid::new_v4().to_string(),
        sender: CONSOLE_SENDER.to_string(),
        content: content.to_string(),
        channel: CONSOLE_CHANNEL.to_string(),
        timestamp: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
    }
}
