pub mod defaults;
pub mod table;

pub use defaults::default_rule_set;
pub use table::{AddOutcome, RemoveOutcome, RuleSink, RuleSnapshot, RuleTable};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Tracking parameters owned by one provider, in configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRules {
    pub name: String,
    pub parameters: Vec<String>,
}

impl ProviderRules {
    /// Position of `parameter` in this provider's list, compared case-insensitively.
    pub fn position_of(&self, parameter: &str) -> Option<usize> {
        let wanted = parameter.to_lowercase();
        self.parameters
            .iter()
            .position(|p| p.to_lowercase() == wanted)
    }
}

/// Provider → parameter-list mapping, kept in document order.
///
/// Serialized as a JSON object (`{"Google": ["utm_source", ...]}`) so the
/// on-disk `trackers.json` stays hand-editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    providers: Vec<ProviderRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn providers(&self) -> &[ProviderRules] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider entry whose name matches `name` ignoring case, so `tiktok`
    /// finds `TikTok`.
    pub fn provider(&self, name: &str) -> Option<&ProviderRules> {
        let wanted = name.trim().to_lowercase();
        self.providers
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
    }

    /// Stored spelling of the provider an administrator typed, or the
    /// normalized form when no such provider exists yet.
    pub fn resolve_provider(&self, typed: &str) -> String {
        self.provider(typed)
            .map_or_else(|| normalize_provider(typed), |p| p.name.clone())
    }

    /// Append `parameter` to `provider`, creating the entry when absent.
    pub(crate) fn push_parameter(&mut self, provider: &str, parameter: &str) {
        if let Some(entry) = self.providers.iter_mut().find(|p| p.name == provider) {
            entry.parameters.push(parameter.to_string());
        } else {
            self.providers.push(ProviderRules {
                name: provider.to_string(),
                parameters: vec![parameter.to_string()],
            });
        }
    }

    /// Remove the entry at `index` from `provider`, dropping the provider when
    /// it becomes empty. Returns the removed name and whether the provider went away.
    pub(crate) fn remove_parameter_at(
        &mut self,
        provider: &str,
        index: usize,
    ) -> Option<(String, bool)> {
        let slot = self.providers.iter().position(|p| p.name == provider)?;
        let entry = &mut self.providers[slot];
        if index >= entry.parameters.len() {
            return None;
        }
        let removed = entry.parameters.remove(index);
        let emptied = entry.parameters.is_empty();
        if emptied {
            self.providers.remove(slot);
        }
        Some((removed, emptied))
    }
}

impl FromIterator<(String, Vec<String>)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut rules = Self::new();
        for (name, parameters) in iter {
            if let Some(entry) = rules.providers.iter_mut().find(|p| p.name == name) {
                entry.parameters.extend(parameters);
            } else {
                rules.providers.push(ProviderRules { name, parameters });
            }
        }
        rules
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.providers.len()))?;
        for provider in &self.providers {
            map.serialize_entry(&provider.name, &provider.parameters)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of provider name to a list of tracker parameters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RuleSet, A::Error> {
                let mut entries = Vec::new();
                while let Some((name, params)) = access.next_entry::<String, Vec<String>>()? {
                    entries.push((name, params));
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}

/// Normalize a provider name typed by an administrator: trimmed, first letter
/// upper-cased, the rest lower-cased (`"tIkToK"` → `"Tiktok"`).
pub fn normalize_provider(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
