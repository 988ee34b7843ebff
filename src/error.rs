use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `linkscrub`.
///
/// Each subsystem defines its own error variant. Administrative callers match
/// on these to report a specific reason; the binary continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ScrubError {
    // ── Rule table ──────────────────────────────────────────────────────
    #[error("rules: {0}")]
    Rule(#[from] RuleError),

    // ── Link pattern ────────────────────────────────────────────────────
    #[error("pattern: {0}")]
    Pattern(#[from] PatternError),

    // ── Durable storage ─────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Rule table errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("tracker `{parameter}` already exists for provider `{owner}`")]
    DuplicateParameter { parameter: String, owner: String },

    #[error("provider `{0}` not found")]
    ProviderNotFound(String),

    #[error("tracker `{parameter}` not found for provider `{provider}`")]
    ParameterNotFound { provider: String, parameter: String },

    #[error("tracker parameter name cannot be empty")]
    EmptyParameter,

    #[error("failed to persist rule set: {0}")]
    Persist(#[from] StoreError),
}

// ─── Pattern errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid link pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

// ─── Storage errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.display().to_string(),
            source,
        }
    }
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ScrubError>;
