use url::form_urlencoded;

use super::types::{ProviderRemoval, SanitizationResult, format_providers};
use crate::rules::RuleSnapshot;

const NO_TRACKERS: &str = "No trackers found";

/// Strip tracking parameters from one URL.
///
/// Only the query component is rewritten. Everything before the `?` (scheme,
/// authority, path, path params) is kept byte-for-byte, kept pairs are emitted
/// exactly as written, and the fragment is reattached. Schemeless tokens
/// (`www.example.com/x?y`) take the same path, and malformed input degrades
/// to "nothing removed" instead of an error.
pub fn sanitize_url(url: &str, rules: &RuleSnapshot) -> SanitizationResult {
    let (before_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let Some((prefix, query)) = before_fragment.split_once('?') else {
        return unchanged(url);
    };

    let mut kept: Vec<&str> = Vec::new();
    let mut removed: Vec<ProviderRemoval> = Vec::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let key = decode_key(pair);
        match rules.owner(&key.to_lowercase()) {
            Some(owner) => match removed.iter_mut().find(|r| r.provider == owner) {
                Some(entry) => entry.parameters.push(key),
                None => removed.push(ProviderRemoval {
                    provider: owner.to_string(),
                    parameters: vec![key],
                }),
            },
            None => kept.push(pair),
        }
    }

    if removed.is_empty() {
        return unchanged(url);
    }

    let mut cleaned_url = String::with_capacity(url.len());
    cleaned_url.push_str(prefix);
    if !kept.is_empty() {
        cleaned_url.push('?');
        cleaned_url.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
        cleaned_url.push('#');
        cleaned_url.push_str(fragment);
    }

    let providers: Vec<&str> = removed.iter().map(|r| r.provider.as_str()).collect();
    let message = format!("Removed trackers from {}", format_providers(&providers));
    tracing::debug!(
        url = %url,
        cleaned = %cleaned_url,
        providers = %providers.join(","),
        "url sanitized"
    );

    SanitizationResult {
        cleaned_url,
        removed,
        message,
    }
}

/// Form-decode the key of a `key=value` pair (`+` is a space, bad `%`
/// escapes pass through as-is).
fn decode_key(pair: &str) -> String {
    form_urlencoded::parse(pair.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

fn unchanged(url: &str) -> SanitizationResult {
    SanitizationResult {
        cleaned_url: url.to_string(),
        removed: Vec::new(),
        message: NO_TRACKERS.to_string(),
    }
}
