pub mod matcher;
pub mod notice;
pub mod pipeline;
pub mod sanitizer;
pub mod types;

pub use matcher::{DEFAULT_LINK_PATTERN, LinkMatcher, Links};
pub use notice::repost_notice;
pub use pipeline::process_message;
pub use sanitizer::sanitize_url;
pub use types::{MessageOutcome, ProviderRemoval, SanitizationResult, format_providers};
