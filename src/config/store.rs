use anyhow::Context;
use directories::UserDirs;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::BehaviorConfig;
use super::hot_reload::BehaviorSink;
use crate::error::StoreError;
use crate::rules::{RuleSet, RuleSink, default_rule_set};

pub const CONFIG_FILE: &str = "config.json";
pub const TRACKERS_FILE: &str = "trackers.json";

/// JSON documents on disk: `config.json` (behavior) and `trackers.json` (rules).
///
/// Both are validated when the store is opened and again on every reload.
/// A document that changes during validation is backed up first to
/// `<file>.backup_<YYYYmmdd_HHMMSS>.json`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        let store = Self { dir };
        store.ensure_documents()?;
        Ok(store)
    }

    /// `$LINKSCRUB_DATA_DIR`, else `~/.linkscrub`.
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        if let Ok(dir) = std::env::var("LINKSCRUB_DATA_DIR")
            && !dir.is_empty()
        {
            return Ok(PathBuf::from(dir));
        }
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Ok(home.join(".linkscrub"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn trackers_path(&self) -> PathBuf {
        self.dir.join(TRACKERS_FILE)
    }

    /// Create missing documents and repair invalid ones.
    pub fn ensure_documents(&self) -> Result<(), StoreError> {
        ensure_document(
            &self.config_path(),
            to_object(&BehaviorConfig::default())?,
            clean_behavior,
        )?;
        ensure_document(
            &self.trackers_path(),
            to_object(&default_rule_set())?,
            clean_rules,
        )
    }

    pub fn load_behavior(&self) -> Result<BehaviorConfig, StoreError> {
        read_json(&self.config_path())
    }

    pub fn save_behavior(&self, config: &BehaviorConfig) -> Result<(), StoreError> {
        write_json(&self.config_path(), config)
    }

    pub fn load_rules(&self) -> Result<RuleSet, StoreError> {
        read_json(&self.trackers_path())
    }

    pub fn save_rules(&self, rules: &RuleSet) -> Result<(), StoreError> {
        write_json(&self.trackers_path(), rules)
    }
}

impl RuleSink for ConfigStore {
    fn persist(&self, rules: &RuleSet) -> Result<(), StoreError> {
        self.save_rules(rules)
    }
}

impl BehaviorSink for ConfigStore {
    fn persist(&self, config: &BehaviorConfig) -> Result<(), StoreError> {
        self.save_behavior(config)
    }
}

/// A validated document plus a note for every change made to it.
struct Cleaned {
    document: Map<String, Value>,
    changes: Vec<String>,
}

fn ensure_document(
    path: &Path,
    defaults: Map<String, Value>,
    clean: fn(Map<String, Value>, &Map<String, Value>) -> Cleaned,
) -> Result<(), StoreError> {
    if !path.exists() {
        write_json(path, &defaults)?;
        tracing::info!(path = %path.display(), "created missing file");
        return Ok(());
    }

    let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(&raw) else {
        let backup = backup(path, &raw)?;
        write_json(path, &defaults)?;
        tracing::warn!(
            path = %path.display(),
            backup = %backup.display(),
            "invalid JSON; reset to defaults"
        );
        return Ok(());
    };

    let cleaned = clean(parsed, &defaults);
    if cleaned.changes.is_empty() {
        return Ok(());
    }
    for change in &cleaned.changes {
        tracing::warn!(path = %path.display(), "{change}");
    }
    let backup = backup(path, &raw)?;
    write_json(path, &cleaned.document)?;
    tracing::info!(
        path = %path.display(),
        backup = %backup.display(),
        "cleaned and updated file"
    );
    Ok(())
}

/// Behavior keys are a closed set: missing or mistyped keys take the default,
/// unknown keys are dropped.
fn clean_behavior(parsed: Map<String, Value>, defaults: &Map<String, Value>) -> Cleaned {
    let mut document = Map::new();
    let mut changes = Vec::new();

    for (key, default) in defaults {
        match parsed.get(key) {
            Some(value) if same_kind(value, default) => {
                document.insert(key.clone(), value.clone());
            }
            Some(_) => {
                changes.push(format!("replaced mistyped key '{key}' with its default"));
                document.insert(key.clone(), default.clone());
            }
            None => {
                changes.push(format!("added missing key '{key}'"));
                document.insert(key.clone(), default.clone());
            }
        }
    }
    for key in parsed.keys().filter(|k| !defaults.contains_key(*k)) {
        changes.push(format!("removed extra key '{key}'"));
    }

    Cleaned { document, changes }
}

/// Provider names are open-ended; only entries that are not lists of strings
/// are dropped.
fn clean_rules(parsed: Map<String, Value>, _defaults: &Map<String, Value>) -> Cleaned {
    let mut document = Map::new();
    let mut changes = Vec::new();

    for (provider, value) in parsed {
        let Value::Array(items) = value else {
            changes.push(format!("removed provider '{provider}' (not a list)"));
            continue;
        };
        let total = items.len();
        let params: Vec<Value> = items.into_iter().filter(Value::is_string).collect();
        if params.len() != total {
            changes.push(format!(
                "dropped {} non-string tracker(s) from '{provider}'",
                total - params.len()
            ));
        }
        document.insert(provider, Value::Array(params));
    }

    Cleaned { document, changes }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(StoreError::json(Path::new("<defaults>"), e)),
    }
}

fn backup(path: &Path, raw: &str) -> Result<PathBuf, StoreError> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let backup_path = path.with_file_name(format!("{file_name}.backup_{timestamp}.json"));
    fs::write(&backup_path, raw).map_err(|e| StoreError::io(&backup_path, e))?;
    Ok(backup_path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| StoreError::json(path, e))
}

/// Pretty-print with four-space indentation.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| StoreError::json(path, e))?;
    fs::write(path, buf).map_err(|e| StoreError::io(path, e))
}
