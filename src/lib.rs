#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod links;
pub mod rules;
pub mod transport;

pub use config::{BehaviorConfig, ConfigStore};
pub use engine::{Engine, EngineSnapshot};
pub use error::{Result, ScrubError};
pub use links::{LinkMatcher, MessageOutcome, SanitizationResult, process_message, sanitize_url};
pub use rules::{RuleSet, RuleTable};
