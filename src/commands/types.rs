/// Administrative command typed into the chat (`/trackers add Meta igsh`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Settings,
    SetMention { enabled: bool },
    SetRequireLinks { enabled: bool },
    SetRegex { pattern: String },
    ReloadConfig,
    TrackersList,
    TrackersAdd { provider: String, tracker: String },
    TrackersRemove { provider: String, tracker: String },
    Help,
    /// Known command with missing or malformed arguments.
    Usage { usage: String },
}

/// Reply to an admin command. Ephemeral replies go back to the sender only;
/// visible ones are posted to the channel the command came from.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub text: String,
    pub ephemeral: bool,
}

impl CommandResult {
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: true,
        }
    }
}
