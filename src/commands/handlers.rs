use super::types::{Command, CommandResult};
use crate::engine::Engine;
use crate::error::{PatternError, RuleError, ScrubError};
use crate::rules::RuleSet;

const PATTERN_PREVIEW_CHARS: usize = 100;
const FIELD_VALUE_LIMIT: usize = 1024;
const LISTING_BUDGET: usize = 5500;
const MAX_FIELDS: usize = 25;

pub fn handle_command(command: &Command, engine: &Engine) -> CommandResult {
    match command {
        Command::Settings => handle_settings(engine),
        Command::SetMention { enabled } => handle_set_mention(engine, *enabled),
        Command::SetRequireLinks { enabled } => handle_set_require_links(engine, *enabled),
        Command::SetRegex { pattern } => handle_set_regex(engine, pattern),
        Command::ReloadConfig => handle_reload(engine),
        Command::TrackersList => handle_trackers_list(engine),
        Command::TrackersAdd { provider, tracker } => handle_trackers_add(engine, provider, tracker),
        Command::TrackersRemove { provider, tracker } => {
            handle_trackers_remove(engine, provider, tracker)
        }
        Command::Help => handle_help(),
        Command::Usage { usage } => CommandResult::ephemeral(format!("❌ Usage: `{usage}`")),
    }
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled { "✅ Enabled" } else { "❌ Disabled" }
}

fn enabled_word(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

fn handle_settings(engine: &Engine) -> CommandResult {
    let snapshot = engine.snapshot();
    let config = snapshot.behavior.config();
    let pattern = if config.regex_keys.chars().count() > PATTERN_PREVIEW_CHARS {
        let head: String = config.regex_keys.chars().take(PATTERN_PREVIEW_CHARS).collect();
        format!("`{head}...`")
    } else {
        format!("`{}`", config.regex_keys)
    };

    CommandResult::ephemeral(format!(
        "Bot Settings\n\
         Mention Reply Author: {}\n\
         Require Links: {}\n\
         Regex Pattern: {pattern}",
        enabled_label(config.mention_reply_author),
        enabled_label(config.require_links),
    ))
}

fn handle_set_mention(engine: &Engine, enabled: bool) -> CommandResult {
    match engine.set_mention(enabled) {
        Ok(_) => CommandResult::ephemeral(format!(
            "✅ Mention reply author has been {}.",
            enabled_word(enabled)
        )),
        Err(e) => failed_to_save(&e),
    }
}

fn handle_set_require_links(engine: &Engine, enabled: bool) -> CommandResult {
    match engine.set_require_links(enabled) {
        Ok(_) => CommandResult::ephemeral(format!(
            "✅ Require links has been {}.",
            enabled_word(enabled)
        )),
        Err(e) => failed_to_save(&e),
    }
}

fn handle_set_regex(engine: &Engine, pattern: &str) -> CommandResult {
    match engine.set_pattern(pattern) {
        Ok(_) => CommandResult::ephemeral(format!(
            "✅ Regex pattern has been updated.\n\nNew pattern: `{pattern}`"
        )),
        Err(ScrubError::Pattern(PatternError::InvalidPattern(e))) => {
            CommandResult::ephemeral(format!(
                "❌ Invalid regex pattern: {e}\n\nPlease provide a valid regex pattern."
            ))
        }
        Err(e) => failed_to_save(&e),
    }
}

fn failed_to_save(error: &ScrubError) -> CommandResult {
    tracing::error!(error = %error, "failed to update behavior config");
    CommandResult::ephemeral(format!("❌ Failed to update configuration: {error}"))
}

fn handle_reload(engine: &Engine) -> CommandResult {
    match engine.reload() {
        Ok(()) => CommandResult::ephemeral("✅ Configuration reloaded successfully."),
        Err(e) => {
            tracing::error!(error = %e, "reload failed");
            CommandResult::ephemeral(format!("❌ Error reloading configuration: {e}"))
        }
    }
}

fn handle_trackers_list(engine: &Engine) -> CommandResult {
    let snapshot = engine.snapshot();
    let rules = snapshot.rules.rules();
    if rules.is_empty() {
        return CommandResult::ephemeral("❌ No trackers configured.");
    }
    CommandResult::ephemeral(render_tracker_listing(rules))
}

/// Providers sorted by name, one block each, within chat message limits.
fn render_tracker_listing(rules: &RuleSet) -> String {
    let mut providers: Vec<_> = rules
        .providers()
        .iter()
        .filter(|p| !p.parameters.is_empty())
        .collect();
    providers.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::from(
        "Tracking Parameters\nAll configured tracking parameters by provider\n",
    );
    let mut used = 0usize;
    let mut shown = 0usize;

    for provider in providers {
        let mut value = format!("`{}`", provider.parameters.join(", "));
        if value.chars().count() > FIELD_VALUE_LIMIT {
            value = value.chars().take(FIELD_VALUE_LIMIT - 4).collect::<String>() + "...";
        }
        let cost = value.chars().count() + provider.name.chars().count();

        if used + cost > LISTING_BUDGET || shown >= MAX_FIELDS {
            out.push_str(&format!(
                "\n...\n*Showing first {shown} providers. Use `/trackers list` to see all.*\n"
            ));
            break;
        }

        out.push_str(&format!("\n**{}**\n{value}\n", provider.name));
        used += cost;
        shown += 1;
    }

    out.push_str(&format!("\nTotal providers: {}", rules.len()));
    out
}

fn handle_trackers_add(engine: &Engine, provider: &str, tracker: &str) -> CommandResult {
    match engine.add_tracker(provider, tracker) {
        Ok(added) => CommandResult::ephemeral(format!(
            "✅ Added tracker `{}` to provider `{}`.",
            added.parameter, added.provider
        )),
        Err(RuleError::DuplicateParameter { parameter, owner }) => {
            let requested = engine.snapshot().rules.rules().resolve_provider(provider);
            if owner == requested {
                CommandResult::ephemeral(format!(
                    "❌ Tracker `{parameter}` already exists for provider `{owner}`."
                ))
            } else {
                CommandResult::ephemeral(format!(
                    "❌ Tracker `{parameter}` already exists for provider `{owner}`. \
                     Remove it first if you want to add it to `{requested}`."
                ))
            }
        }
        Err(e) => rule_failure(&e),
    }
}

fn handle_trackers_remove(engine: &Engine, provider: &str, tracker: &str) -> CommandResult {
    match engine.remove_tracker(provider, tracker) {
        Ok(removed) if removed.provider_dropped => CommandResult::ephemeral(format!(
            "✅ Removed tracker `{}` from provider `{p}`. \
             Provider `{p}` has been removed as it has no trackers left.",
            removed.parameter,
            p = removed.provider
        )),
        Ok(removed) => CommandResult::ephemeral(format!(
            "✅ Removed tracker `{}` from provider `{}`.",
            removed.parameter, removed.provider
        )),
        Err(e) => rule_failure(&e),
    }
}

fn rule_failure(error: &RuleError) -> CommandResult {
    if let RuleError::Persist(_) = error {
        tracing::error!(error = %error, "rule change not saved");
    }
    let mut text = format!("❌ {error}");
    if !text.ends_with('.') {
        text.push('.');
    }
    CommandResult::ephemeral(text)
}

fn handle_help() -> CommandResult {
    CommandResult::visible(
        "/settings                          -- Show current settings\n\
         /set_mention <true|false>          -- Mention the author when reposting\n\
         /set_require_links <true|false>    -- Only process messages containing links\n\
         /set_regex <pattern>               -- Set the link detection pattern\n\
         /reload_config                     -- Reload settings and trackers from disk\n\
         /trackers list                     -- List trackers by provider\n\
         /trackers add <provider> <tracker> -- Add a tracker parameter\n\
         /trackers remove <provider> <tracker> -- Remove a tracker parameter\n\
         /help                              -- Show this help message",
    )
}
