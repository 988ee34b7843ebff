use super::types::{MessageOutcome, format_providers};

/// Text posted in place of a message whose links were cleaned.
///
/// `mention` is the already-rendered author mention (e.g. `@alice` or
/// `<@1234>`); pass `None` when `mention_reply_author` is off.
pub fn repost_notice(outcome: &MessageOutcome, mention: Option<&str>) -> String {
    let author = mention.map(|m| format!("{m} ")).unwrap_or_default();
    format!(
        "{author}Your message has been reposted without trackers from {}:\n{}",
        format_providers(&outcome.affected_providers),
        outcome.rewritten_text
    )
}
