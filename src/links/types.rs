use serde::Serialize;

/// Parameters stripped from one URL on behalf of a single provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRemoval {
    pub provider: String,
    /// Original-case keys, in order of first occurrence within the URL.
    pub parameters: Vec<String>,
}

/// Outcome of sanitizing a single URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizationResult {
    pub cleaned_url: String,
    /// Providers in order of their first removed parameter.
    pub removed: Vec<ProviderRemoval>,
    pub message: String,
}

impl SanitizationResult {
    pub fn has_removals(&self) -> bool {
        !self.removed.is_empty()
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.removed.iter().map(|r| r.provider.as_str())
    }

    /// Removed keys for `provider`, if it had any.
    pub fn removed_for(&self, provider: &str) -> Option<&[String]> {
        self.removed
            .iter()
            .find(|r| r.provider == provider)
            .map(|r| r.parameters.as_slice())
    }
}

/// Result of running a whole message through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageOutcome {
    pub rewritten_text: String,
    /// Every provider with at least one removal, first-seen order, no duplicates.
    pub affected_providers: Vec<String>,
    pub notice: String,
}

/// Join provider names for display: `A`, `A, and B`, `A, B, and C`.
///
/// Duplicates are dropped, keeping the first occurrence.
pub fn format_providers<S: AsRef<str>>(providers: &[S]) -> String {
    let mut unique: Vec<&str> = Vec::with_capacity(providers.len());
    for provider in providers {
        let name = provider.as_ref();
        if !unique.contains(&name) {
            unique.push(name);
        }
    }

    match unique.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [head @ .., last] => format!("{}, and {last}", head.join(", ")),
    }
}
