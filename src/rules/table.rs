use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::RuleSet;
use crate::error::{RuleError, StoreError};

/// Durable destination for the rule set.
///
/// Every successful mutation is written here before it becomes visible to
/// readers, so the in-memory table never runs ahead of storage.
pub trait RuleSink: Send + Sync {
    fn persist(&self, rules: &RuleSet) -> Result<(), StoreError>;
}

/// Immutable, point-in-time view of the rule set and its inverted index.
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    rules: RuleSet,
    index: HashMap<String, String>,
}

impl RuleSnapshot {
    /// Build the snapshot, deriving the parameter → provider index from scratch.
    pub fn new(rules: RuleSet) -> Self {
        let mut index = HashMap::new();
        for provider in rules.providers() {
            for param in &provider.parameters {
                let key = param.to_lowercase();
                if let Some(owner) = index.get(&key) {
                    tracing::warn!(
                        parameter = %param,
                        owner = %owner,
                        ignored = %provider.name,
                        "tracker listed under more than one provider"
                    );
                    continue;
                }
                index.insert(key, provider.name.clone());
            }
        }
        Self { rules, index }
    }

    /// Owning provider of an already lower-cased parameter name.
    pub fn owner(&self, normalized_param: &str) -> Option<&str> {
        self.index.get(normalized_param).map(String::as_str)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn parameter_count(&self) -> usize {
        self.index.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub provider: String,
    pub parameter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub provider: String,
    pub parameter: String,
    /// The provider had no parameters left and was deleted.
    pub provider_dropped: bool,
}

/// Live-reloadable rule table.
///
/// Readers take lock-free [`RuleSnapshot`]s through `ArcSwap`; writers
/// serialize on an internal mutex, persist through the [`RuleSink`], then
/// publish the rebuilt snapshot with a single pointer swap.
pub struct RuleTable {
    current: ArcSwap<RuleSnapshot>,
    writer: Mutex<()>,
    sink: Arc<dyn RuleSink>,
}

impl RuleTable {
    pub fn new(rules: RuleSet, sink: Arc<dyn RuleSink>) -> Self {
        Self {
            current: ArcSwap::from_pointee(RuleSnapshot::new(rules)),
            writer: Mutex::new(()),
            sink,
        }
    }

    /// Current snapshot. Lock-free.
    pub fn snapshot(&self) -> Arc<RuleSnapshot> {
        self.current.load_full()
    }

    /// Replace the whole table (reload path). Does not write back to storage.
    pub fn load(&self, rules: RuleSet) {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = RuleSnapshot::new(rules);
        tracing::info!(
            providers = fresh.rules.len(),
            parameters = fresh.parameter_count(),
            "rule table loaded"
        );
        self.current.store(Arc::new(fresh));
    }

    pub fn add_parameter(&self, provider: &str, parameter: &str) -> Result<AddOutcome, RuleError> {
        let parameter = parameter.trim();
        if parameter.is_empty() {
            return Err(RuleError::EmptyParameter);
        }

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.current.load_full();
        let provider = current.rules.resolve_provider(provider);
        if let Some(owner) = current.owner(&parameter.to_lowercase()) {
            return Err(RuleError::DuplicateParameter {
                parameter: parameter.to_string(),
                owner: owner.to_string(),
            });
        }

        let mut rules = current.rules.clone();
        rules.push_parameter(&provider, parameter);
        self.commit(rules)?;

        tracing::info!(provider = %provider, parameter = %parameter, "tracker added");
        Ok(AddOutcome {
            provider,
            parameter: parameter.to_string(),
        })
    }

    pub fn remove_parameter(
        &self,
        provider: &str,
        parameter: &str,
    ) -> Result<RemoveOutcome, RuleError> {
        let parameter = parameter.trim();

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.current.load_full();
        let provider = current.rules.resolve_provider(provider);
        let entry = current
            .rules
            .provider(&provider)
            .ok_or_else(|| RuleError::ProviderNotFound(provider.clone()))?;
        let index = entry
            .position_of(parameter)
            .ok_or_else(|| RuleError::ParameterNotFound {
                provider: provider.clone(),
                parameter: parameter.to_string(),
            })?;

        let mut rules = current.rules.clone();
        let (removed, provider_dropped) = rules
            .remove_parameter_at(&provider, index)
            .ok_or_else(|| RuleError::ParameterNotFound {
                provider: provider.clone(),
                parameter: parameter.to_string(),
            })?;
        self.commit(rules)?;

        tracing::info!(
            provider = %provider,
            parameter = %removed,
            provider_dropped,
            "tracker removed"
        );
        Ok(RemoveOutcome {
            provider,
            parameter: removed,
            provider_dropped,
        })
    }

    /// Persist then publish. Callers must hold the writer lock.
    fn commit(&self, rules: RuleSet) -> Result<(), RuleError> {
        self.sink.persist(&rules)?;
        self.current.store(Arc::new(RuleSnapshot::new(rules)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink {
        writes: AtomicUsize,
        fail: AtomicBool,
    }

    impl RuleSink for CountingSink {
        fn persist(&self, _rules: &RuleSet) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::io(
                    std::path::Path::new("trackers.json"),
                    std::io::Error::other("disk full"),
                ));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn table() -> (RuleTable, Arc<CountingSink>) {
        let sink = Arc::new(CountingSink::default());
        let rules: RuleSet = [
            ("Google".to_string(), vec!["utm_source".to_string()]),
            ("Meta".to_string(), vec!["fbclid".to_string()]),
        ]
        .into_iter()
        .collect();
        (RuleTable::new(rules, sink.clone()), sink)
    }

    #[test]
    fn add_normalizes_provider_and_rebuilds_index() {
        let (table, sink) = table();
        let outcome = table.add_parameter("tIKTOK", " ttclid ").unwrap();
        assert_eq!(outcome.provider, "Tiktok");
        assert_eq!(outcome.parameter, "ttclid");
        assert_eq!(table.snapshot().owner("ttclid"), Some("Tiktok"));
        assert_eq!(sink.writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn provider_names_resolve_to_stored_spelling() {
        let sink = Arc::new(CountingSink::default());
        let rules: RuleSet = [("TikTok".to_string(), vec!["ttclid".to_string()])]
            .into_iter()
            .collect();
        let table = RuleTable::new(rules, sink);

        let added = table.add_parameter("tiktok", "tt_medium").unwrap();
        assert_eq!(added.provider, "TikTok");
        assert_eq!(table.snapshot().rules().len(), 1);

        let removed = table.remove_parameter("TIKTOK", "ttclid").unwrap();
        assert_eq!(removed.provider, "TikTok");
        assert!(!removed.provider_dropped);
    }

    #[test]
    fn add_rejects_parameter_owned_elsewhere() {
        let (table, sink) = table();
        let before = table.snapshot();
        let err = table.add_parameter("Other", "FBCLID").unwrap_err();
        assert!(matches!(
            err,
            RuleError::DuplicateParameter { ref owner, .. } if owner == "Meta"
        ));
        assert_eq!(table.snapshot().rules(), before.rules());
        assert_eq!(sink.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn add_rejects_parameter_owned_by_same_provider() {
        let (table, _) = table();
        let err = table.add_parameter("meta", "fbclid").unwrap_err();
        assert!(matches!(err, RuleError::DuplicateParameter { .. }));
    }

    #[test]
    fn add_rejects_blank_parameter() {
        let (table, _) = table();
        assert!(matches!(
            table.add_parameter("Meta", "   "),
            Err(RuleError::EmptyParameter)
        ));
    }

    #[test]
    fn remove_matches_case_insensitively_and_drops_empty_provider() {
        let (table, _) = table();
        let outcome = table.remove_parameter("google", "UTM_SOURCE").unwrap();
        assert_eq!(outcome.parameter, "utm_source");
        assert!(outcome.provider_dropped);
        let snapshot = table.snapshot();
        assert!(snapshot.rules().provider("Google").is_none());
        assert_eq!(snapshot.owner("utm_source"), None);
    }

    #[test]
    fn remove_reports_missing_provider_and_parameter() {
        let (table, _) = table();
        assert!(matches!(
            table.remove_parameter("Nobody", "x"),
            Err(RuleError::ProviderNotFound(_))
        ));
        assert!(matches!(
            table.remove_parameter("Meta", "gclid"),
            Err(RuleError::ParameterNotFound { .. })
        ));
    }

    #[test]
    fn failed_persist_leaves_table_untouched() {
        let (table, sink) = table();
        sink.fail.store(true, Ordering::SeqCst);
        let err = table.add_parameter("Meta", "igsh").unwrap_err();
        assert!(matches!(err, RuleError::Persist(_)));
        assert_eq!(table.snapshot().owner("igsh"), None);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_mutation() {
        let (table, _) = table();
        let held = table.snapshot();
        table.add_parameter("Meta", "igsh").unwrap();
        assert_eq!(held.owner("igsh"), None);
        assert_eq!(table.snapshot().owner("igsh"), Some("Meta"));
    }

    #[test]
    fn load_replaces_everything() {
        let (table, sink) = table();
        table.load(RuleSet::new());
        assert_eq!(table.snapshot().parameter_count(), 0);
        assert_eq!(sink.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn first_provider_wins_on_conflicting_document() {
        let rules: RuleSet = [
            ("A".to_string(), vec!["ref".to_string()]),
            ("B".to_string(), vec!["REF".to_string()]),
        ]
        .into_iter()
        .collect();
        let snapshot = RuleSnapshot::new(rules);
        assert_eq!(snapshot.owner("ref"), Some("A"));
        assert_eq!(snapshot.parameter_count(), 1);
    }
}
