use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{Behavior, BehaviorConfig, BehaviorHandle, ConfigStore};
use crate::error::{Result, RuleError};
use crate::links::{MessageOutcome, process_message};
use crate::rules::{AddOutcome, RemoveOutcome, RuleSnapshot, RuleTable};

/// Rules and behavior captured together at the start of one message.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub rules: Arc<RuleSnapshot>,
    pub behavior: Arc<Behavior>,
}

impl EngineSnapshot {
    pub fn process(&self, text: &str) -> Option<MessageOutcome> {
        process_message(text, &self.rules, &self.behavior)
    }
}

/// Shared state of a running scrubber: rule table, behavior, and the store
/// both are persisted to.
///
/// Every writer (reload, tracker edits, behavior edits) holds `writer` for its
/// whole read-modify-persist-publish cycle, so a reload can never publish a
/// document read before a concurrent edit was saved.
pub struct Engine {
    store: Arc<ConfigStore>,
    rules: RuleTable,
    behavior: BehaviorHandle,
    writer: Mutex<()>,
}

impl Engine {
    /// Load both documents from `store` and compile the link pattern.
    pub fn open(store: ConfigStore) -> Result<Self> {
        let store = Arc::new(store);
        let rules = store.load_rules()?;
        let behavior = load_behavior(&store)?;
        tracing::info!(
            dir = %store.dir().display(),
            providers = rules.len(),
            "engine ready"
        );
        Ok(Self {
            rules: RuleTable::new(rules, store.clone()),
            behavior: BehaviorHandle::new(behavior, store.clone()),
            store,
            writer: Mutex::new(()),
        })
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            rules: self.rules.snapshot(),
            behavior: self.behavior.load(),
        }
    }

    /// Sanitize one inbound message against the current snapshot.
    pub fn process(&self, text: &str) -> Option<MessageOutcome> {
        self.snapshot().process(text)
    }

    /// Re-read and re-validate both documents.
    ///
    /// The behavior document is compiled before anything is swapped, so a bad
    /// pattern on disk leaves the running config untouched.
    pub fn reload(&self) -> Result<()> {
        let _guard = self.write_lock();
        self.store.ensure_documents()?;
        let behavior = load_behavior(&self.store)?;
        let rules = self.store.load_rules()?;
        self.behavior.store(behavior);
        self.rules.load(rules);
        Ok(())
    }

    pub fn add_tracker(
        &self,
        provider: &str,
        parameter: &str,
    ) -> std::result::Result<AddOutcome, RuleError> {
        let _guard = self.write_lock();
        self.rules.add_parameter(provider, parameter)
    }

    pub fn remove_tracker(
        &self,
        provider: &str,
        parameter: &str,
    ) -> std::result::Result<RemoveOutcome, RuleError> {
        let _guard = self.write_lock();
        self.rules.remove_parameter(provider, parameter)
    }

    pub fn set_mention(&self, enabled: bool) -> Result<Arc<Behavior>> {
        let _guard = self.write_lock();
        self.behavior
            .update(|config| config.mention_reply_author = enabled)
    }

    pub fn set_require_links(&self, enabled: bool) -> Result<Arc<Behavior>> {
        let _guard = self.write_lock();
        self.behavior.update(|config| config.require_links = enabled)
    }

    /// Validate `pattern` by compiling it, then persist and publish.
    pub fn set_pattern(&self, pattern: &str) -> Result<Arc<Behavior>> {
        let _guard = self.write_lock();
        self.behavior
            .update(|config| config.regex_keys = pattern.to_string())
    }

    fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_behavior(store: &ConfigStore) -> Result<Behavior> {
    let mut config: BehaviorConfig = store.load_behavior()?;
    config.apply_env_overrides();
    Ok(Behavior::new(config)?)
}
