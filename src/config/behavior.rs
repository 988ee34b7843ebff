use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::links::{DEFAULT_LINK_PATTERN, LinkMatcher};

/// Behavior document persisted as `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Mention the original author when reposting a cleaned message.
    #[serde(default = "default_true")]
    pub mention_reply_author: bool,
    /// Only process messages in which the link pattern matches.
    #[serde(default = "default_true")]
    pub require_links: bool,
    /// Pattern used to find links in message text.
    #[serde(default = "default_link_pattern")]
    pub regex_keys: String,
}

fn default_true() -> bool {
    true
}

fn default_link_pattern() -> String {
    DEFAULT_LINK_PATTERN.into()
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            mention_reply_author: true,
            require_links: true,
            regex_keys: default_link_pattern(),
        }
    }
}

/// A behavior config together with its compiled link pattern.
///
/// Only constructible through [`Behavior::new`], so holding one proves the
/// pattern compiles.
#[derive(Debug, Clone)]
pub struct Behavior {
    config: BehaviorConfig,
    matcher: LinkMatcher,
}

impl Behavior {
    pub fn new(config: BehaviorConfig) -> Result<Self, PatternError> {
        let matcher = LinkMatcher::new(&config.regex_keys)?;
        Ok(Self { config, matcher })
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn matcher(&self) -> &LinkMatcher {
        &self.matcher
    }
}
