use anyhow::{Context, Result};
use std::sync::Arc;

use crate::cli::commands::{Cli, Commands, TrackersCommands};
use linkscrub::commands::{Command, handle_command};
use linkscrub::config::{ConfigStore, parse_flag};
use linkscrub::engine::Engine;
use linkscrub::links::repost_notice;
use linkscrub::transport::{self, CliChannel};

pub async fn dispatch(cli: Cli) -> Result<()> {
    let dir = match cli.data_dir {
        Some(dir) => dir,
        None => ConfigStore::default_dir()?,
    };
    let store = ConfigStore::open(&dir)
        .with_context(|| format!("failed to open data directory {}", dir.display()))?;
    let engine = Engine::open(store)?;

    match cli.command {
        Commands::Run => {
            println!("linkscrub: paste messages, /help for commands, /quit to exit");
            transport::run(Arc::new(engine), Arc::new(CliChannel::new())).await
        }
        Commands::Scrub { text, author } => {
            let snapshot = engine.snapshot();
            if let Some(outcome) = snapshot.process(&text) {
                let mention = author
                    .filter(|_| snapshot.behavior.config().mention_reply_author)
                    .map(|name| format!("@{name}"));
                println!("{}", repost_notice(&outcome, mention.as_deref()));
            }
            Ok(())
        }
        Commands::Settings => {
            println!("{}", handle_command(&Command::Settings, &engine).text);
            Ok(())
        }
        Commands::Trackers { trackers_command } => run_trackers(&engine, trackers_command),
        Commands::SetMention { value } => {
            let enabled = flag(&value)?;
            engine.set_mention(enabled)?;
            println!("Mention reply author: {enabled}");
            Ok(())
        }
        Commands::SetRequireLinks { value } => {
            let enabled = flag(&value)?;
            engine.set_require_links(enabled)?;
            println!("Require links: {enabled}");
            Ok(())
        }
        Commands::SetRegex { pattern } => {
            engine.set_pattern(&pattern)?;
            println!("Regex pattern updated: {pattern}");
            Ok(())
        }
    }
}

fn run_trackers(engine: &Engine, command: TrackersCommands) -> Result<()> {
    match command {
        TrackersCommands::List => {
            println!("{}", handle_command(&Command::TrackersList, engine).text);
        }
        TrackersCommands::Add { provider, tracker } => {
            let added = engine.add_tracker(&provider, &tracker)?;
            println!(
                "Added tracker `{}` to provider `{}`",
                added.parameter, added.provider
            );
        }
        TrackersCommands::Remove { provider, tracker } => {
            let removed = engine.remove_tracker(&provider, &tracker)?;
            println!(
                "Removed tracker `{}` from provider `{}`",
                removed.parameter, removed.provider
            );
            if removed.provider_dropped {
                println!("Provider `{}` has no trackers left and was removed", removed.provider);
            }
        }
    }
    Ok(())
}

fn flag(value: &str) -> Result<bool> {
    parse_flag(value).with_context(|| format!("expected true or false, got `{value}`"))
}
