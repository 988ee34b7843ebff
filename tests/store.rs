mod support;

use std::fs;

use linkscrub::{ConfigStore, Engine};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn fresh_directory_gets_both_documents() {
    let tmp = TempDir::new().unwrap();
    let store = ConfigStore::open(tmp.path()).unwrap();

    let config: Value = serde_json::from_str(&fs::read_to_string(store.config_path()).unwrap()).unwrap();
    assert_eq!(config["mention_reply_author"], Value::Bool(true));
    assert_eq!(config["require_links"], Value::Bool(true));
    assert_eq!(store.load_rules().unwrap().len(), 17);
    assert!(support::files_with_prefix(tmp.path(), "config.json.backup_").is_empty());
}

#[test]
fn corrupt_config_is_backed_up_and_reset() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.json"), "{ not json").unwrap();

    let store = ConfigStore::open(tmp.path()).unwrap();
    assert!(store.load_behavior().unwrap().mention_reply_author);

    let backups = support::files_with_prefix(tmp.path(), "config.json.backup_");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].ends_with(".json"));
    assert_eq!(
        fs::read_to_string(tmp.path().join(&backups[0])).unwrap(),
        "{ not json"
    );
}

#[test]
fn extra_and_mistyped_keys_are_repaired() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.json"),
        r#"{"mention_reply_author": "yes", "require_links": false, "colour": "blue"}"#,
    )
    .unwrap();

    let store = ConfigStore::open(tmp.path()).unwrap();
    let raw: Value = serde_json::from_str(&fs::read_to_string(store.config_path()).unwrap()).unwrap();
    assert_eq!(raw["mention_reply_author"], Value::Bool(true));
    assert_eq!(raw["require_links"], Value::Bool(false));
    assert!(raw.get("colour").is_none());
    assert!(raw.get("regex_keys").is_some());
    assert_eq!(support::files_with_prefix(tmp.path(), "config.json.backup_").len(), 1);
}

#[test]
fn user_providers_survive_validation() {
    let (engine, tmp) = support::engine_with_trackers(r#"{"Acme": ["acme_id", 7], "Bad": "x"}"#);

    let rules = engine.store().load_rules().unwrap();
    assert_eq!(rules.provider("Acme").unwrap().parameters, ["acme_id"]);
    assert!(rules.provider("Bad").is_none());
    assert_eq!(support::files_with_prefix(tmp.path(), "trackers.json.backup_").len(), 1);
}

#[test]
fn saved_documents_use_four_space_indent() {
    let (engine, _tmp) = support::engine();
    engine.set_mention(false).unwrap();
    let raw = fs::read_to_string(engine.store().config_path()).unwrap();
    assert!(raw.contains("\n    \"mention_reply_author\": false"));
}

#[test]
fn tracker_edits_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    {
        let engine = Engine::open(ConfigStore::open(tmp.path()).unwrap()).unwrap();
        engine.add_tracker(" newsletter ", " nl_ref ").unwrap();
        engine.remove_tracker("google", "UTM_ID").unwrap();
    }

    let engine = Engine::open(ConfigStore::open(tmp.path()).unwrap()).unwrap();
    let snapshot = engine.snapshot();
    let rules = snapshot.rules.rules();
    assert_eq!(rules.provider("Newsletter").unwrap().parameters, ["nl_ref"]);
    assert!(snapshot.rules.owner("utm_id").is_none());
    assert_eq!(snapshot.rules.owner("nl_ref"), Some("Newsletter"));
}

#[test]
fn provider_order_is_kept_on_disk() {
    let (engine, _tmp) = support::engine_with_trackers(r#"{"Zeta": ["z1"], "Alpha": ["a1"]}"#);
    engine.add_tracker("Mid", "m1").unwrap();

    let raw = fs::read_to_string(engine.store().trackers_path()).unwrap();
    let zeta = raw.find("\"Zeta\"").unwrap();
    let alpha = raw.find("\"Alpha\"").unwrap();
    let mid = raw.find("\"Mid\"").unwrap();
    assert!(zeta < alpha && alpha < mid);
}
