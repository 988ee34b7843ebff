use super::BehaviorConfig;

/// Parse an on/off flag the way administrators tend to type it.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" | "enable" | "enabled" => Some(true),
        "false" | "off" | "no" | "0" | "disable" | "disabled" => Some(false),
        _ => None,
    }
}

impl BehaviorConfig {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(flag) = std::env::var("LINKSCRUB_REQUIRE_LINKS")
            && let Some(enabled) = parse_flag(&flag)
        {
            self.require_links = enabled;
        }

        if let Ok(flag) = std::env::var("LINKSCRUB_MENTION_REPLY_AUTHOR")
            && let Some(enabled) = parse_flag(&flag)
        {
            self.mention_reply_author = enabled;
        }

        if let Ok(pattern) = std::env::var("LINKSCRUB_REGEX")
            && !pattern.is_empty()
        {
            self.regex_keys = pattern;
        }
    }
}
