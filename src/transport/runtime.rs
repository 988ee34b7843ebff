use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

use super::traits::{Channel, ChannelMessage};
use crate::commands::{handle_command, parse_command};
use crate::engine::Engine;
use crate::links::repost_notice;

const INBOUND_QUEUE_DEPTH: usize = 64;

/// Listen on `channel` until it closes.
///
/// Admin commands run inline, one at a time, in arrival order. Every other
/// message is sanitized on its own task against the snapshot current when
/// that task starts.
pub async fn run(engine: Arc<Engine>, channel: Arc<dyn Channel>) -> anyhow::Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<ChannelMessage>(INBOUND_QUEUE_DEPTH);
    let listener = {
        let channel = Arc::clone(&channel);
        tokio::spawn(async move { channel.listen(tx).await })
    };
    tracing::info!(channel = %channel.name(), "listening");

    let mut in_flight = JoinSet::new();
    while let Some(msg) = rx.recv().await {
        while let Some(finished) = in_flight.try_join_next() {
            log_task_exit(finished);
        }

        if channel.self_id().is_some_and(|me| me == msg.sender) {
            continue;
        }

        if let Some(command) = parse_command(&msg.content) {
            let result = handle_command(&command, &engine);
            let recipient = if result.ephemeral {
                &msg.sender
            } else {
                &msg.channel
            };
            if let Err(e) = channel.send(&result.text, recipient).await {
                tracing::warn!(channel = %msg.channel, error = %e, "failed to send command reply");
            }
            continue;
        }

        let engine = Arc::clone(&engine);
        let channel = Arc::clone(&channel);
        in_flight.spawn(async move {
            if let Err(e) = handle_message(&engine, channel.as_ref(), &msg).await {
                tracing::warn!(channel = %msg.channel, error = %e, "error handling message");
            }
        });
    }

    while let Some(finished) = in_flight.join_next().await {
        log_task_exit(finished);
    }
    listener.await?
}

fn log_task_exit(finished: Result<(), JoinError>) {
    if let Err(e) = finished {
        tracing::error!(error = %e, "message task failed");
    }
}

/// Sanitize one message and, when trackers were found, replace it with a
/// cleaned repost. Returns `Ok(false)` when the message was left alone.
///
/// The original is only deleted once the repost has been sent, so a failed
/// send never loses the author's message.
pub async fn handle_message(
    engine: &Engine,
    channel: &dyn Channel,
    msg: &ChannelMessage,
) -> anyhow::Result<bool> {
    let snapshot = engine.snapshot();
    let Some(outcome) = snapshot.process(&msg.content) else {
        return Ok(false);
    };

    let mention = snapshot
        .behavior
        .config()
        .mention_reply_author
        .then(|| format!("@{}", msg.sender));
    let notice = repost_notice(&outcome, mention.as_deref());
    channel.send(&notice, &msg.channel).await?;

    if let Err(e) = channel.delete_message(&msg.channel, &msg.id).await {
        tracing::warn!(
            channel = %msg.channel,
            message_id = %msg.id,
            error = %e,
            "could not delete original message"
        );
    }

    tracing::info!(
        channel = %msg.channel,
        providers = %outcome.affected_providers.join(","),
        "reposted message without trackers"
    );
    Ok(true)
}
