use regex::{CaptureMatches, Regex};

use crate::error::PatternError;

/// Link pattern used when `config.json` does not carry one.
///
/// Matches scheme-qualified URLs, `www.` hosts, and bare `host.tld/path`
/// tokens, stopping at whitespace, angle brackets and quotes.
pub const DEFAULT_LINK_PATTERN: &str = r#"(?i)\b((?:https?://|www\.)[^\s<>"']+|(?:[a-z0-9-]+\.)+[a-z]{2,}(?:/[^\s<>"']*)?)\b"#;

/// Compiled, immutable link pattern.
///
/// A pattern change builds a new matcher and swaps it in; an existing matcher
/// is never edited.
#[derive(Debug, Clone)]
pub struct LinkMatcher {
    regex: Regex,
}

impl LinkMatcher {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern)?;
        Ok(Self { regex })
    }

    /// Source text of the compiled pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Every non-overlapping link token in `text`, left to right.
    ///
    /// When the pattern has capture groups, the token is the first group that
    /// took part in the match; otherwise it is the whole match. Empty tokens
    /// are skipped. Calling this again restarts from the beginning.
    pub fn find_all<'r, 'h>(&'r self, text: &'h str) -> Links<'r, 'h> {
        Links {
            inner: self.regex.captures_iter(text),
        }
    }

    /// `true` iff [`find_all`](Self::find_all) yields at least one token.
    pub fn contains_match(&self, text: &str) -> bool {
        self.find_all(text).next().is_some()
    }
}

/// Lazy iterator returned by [`LinkMatcher::find_all`].
pub struct Links<'r, 'h> {
    inner: CaptureMatches<'r, 'h>,
}

impl<'h> Iterator for Links<'_, 'h> {
    type Item = &'h str;

    fn next(&mut self) -> Option<&'h str> {
        for caps in self.inner.by_ref() {
            let token = caps
                .iter()
                .skip(1)
                .flatten()
                .next()
                .or_else(|| caps.get(0))
                .map(|m| m.as_str());
            if let Some(token) = token
                && !token.is_empty()
            {
                return Some(token);
            }
        }
        None
    }
}
