use super::types::Command;
use crate::config::parse_flag;

const SET_MENTION_USAGE: &str = "/set_mention <true|false>";
const SET_REQUIRE_LINKS_USAGE: &str = "/set_require_links <true|false>";
const SET_REGEX_USAGE: &str = "/set_regex <pattern>";
const TRACKERS_USAGE: &str = "/trackers <list|add|remove> [provider] [tracker]";
const TRACKERS_ADD_USAGE: &str = "/trackers add <provider> <tracker>";
const TRACKERS_REMOVE_USAGE: &str = "/trackers remove <provider> <tracker>";

pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next()?.to_lowercase();
    let args = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "/settings" => Some(Command::Settings),
        "/set_mention" => Some(flag_command(args, SET_MENTION_USAGE, |enabled| {
            Command::SetMention { enabled }
        })),
        "/set_require_links" => Some(flag_command(args, SET_REQUIRE_LINKS_USAGE, |enabled| {
            Command::SetRequireLinks { enabled }
        })),
        "/set_regex" => Some(if args.is_empty() {
            usage(SET_REGEX_USAGE)
        } else {
            Command::SetRegex {
                pattern: args.to_string(),
            }
        }),
        "/reload_config" | "/reload" => Some(Command::ReloadConfig),
        "/trackers" => Some(parse_trackers(args)),
        "/help" | "/?" => Some(Command::Help),
        _ => None,
    }
}

fn parse_trackers(args: &str) -> Command {
    let mut words = args.split_whitespace();
    let sub = words.next().map(str::to_lowercase);
    let provider = words.next();
    let tracker = words.next();
    let extra = words.next();

    match (sub.as_deref(), provider, tracker, extra) {
        (Some("list"), None, None, None) => Command::TrackersList,
        (Some("add"), Some(provider), Some(tracker), None) => Command::TrackersAdd {
            provider: provider.to_string(),
            tracker: tracker.to_string(),
        },
        (Some("add"), ..) => usage(TRACKERS_ADD_USAGE),
        (Some("remove"), Some(provider), Some(tracker), None) => Command::TrackersRemove {
            provider: provider.to_string(),
            tracker: tracker.to_string(),
        },
        (Some("remove"), ..) => usage(TRACKERS_REMOVE_USAGE),
        _ => usage(TRACKERS_USAGE),
    }
}

fn flag_command(args: &str, usage_text: &str, build: impl FnOnce(bool) -> Command) -> Command {
    parse_flag(args).map_or_else(|| usage(usage_text), build)
}

fn usage(text: &str) -> Command {
    Command::Usage {
        usage: text.to_string(),
    }
}
