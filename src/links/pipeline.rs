use aho_corasick::{AhoCorasick, MatchKind};

use super::sanitizer::sanitize_url;
use super::types::{MessageOutcome, format_providers};
use crate::config::Behavior;
use crate::rules::RuleSnapshot;

/// Run one message through link detection and sanitization.
///
/// Returns `None` when the caller should leave the message alone: the link
/// gate is on and nothing matched, no link was found, or no link carried a
/// known tracker. Otherwise every qualifying link is rewritten; a message is
/// never partially rewritten.
pub fn process_message(
    text: &str,
    rules: &RuleSnapshot,
    behavior: &Behavior,
) -> Option<MessageOutcome> {
    let matcher = behavior.matcher();
    if behavior.config().require_links && !matcher.contains_match(text) {
        return None;
    }

    let mut affected: Vec<String> = Vec::new();
    let mut originals: Vec<&str> = Vec::new();
    let mut cleaned: Vec<String> = Vec::new();

    for token in matcher.find_all(text) {
        if originals.contains(&token) {
            continue;
        }
        let result = sanitize_url(token, rules);
        if !result.has_removals() {
            continue;
        }
        for provider in result.providers() {
            if !affected.iter().any(|p| p == provider) {
                affected.push(provider.to_string());
            }
        }
        originals.push(token);
        cleaned.push(result.cleaned_url);
    }

    if originals.is_empty() {
        return None;
    }

    let rewritten_text = replace_tokens(text, &originals, &cleaned)?;
    let notice = format!("Removed trackers from {}", format_providers(&affected));
    tracing::debug!(
        links = originals.len(),
        providers = %affected.join(","),
        "message sanitized"
    );

    Some(MessageOutcome {
        rewritten_text,
        affected_providers: affected,
        notice,
    })
}

/// Literal replacement of every occurrence of each original token.
///
/// Leftmost-longest matching means a token that is a substring of another
/// token never splits the longer one, and replaced text is not rescanned.
fn replace_tokens(text: &str, originals: &[&str], cleaned: &[String]) -> Option<String> {
    match AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(originals)
    {
        Ok(automaton) => Some(automaton.replace_all(text, cleaned)),
        Err(e) => {
            tracing::warn!(error = %e, "could not build link replacer; leaving message untouched");
            None
        }
    }
}
