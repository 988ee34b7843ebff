#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use linkscrub::{ConfigStore, Engine};

/// An engine over a fresh data directory seeded with the default documents.
pub fn engine() -> (Engine, TempDir) {
    let tmp = TempDir::new().unwrap();
    let engine = Engine::open(ConfigStore::open(tmp.path()).unwrap()).unwrap();
    (engine, tmp)
}

/// An engine whose `trackers.json` is `trackers` before first open.
pub fn engine_with_trackers(trackers: &str) -> (Engine, TempDir) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("trackers.json"), trackers).unwrap();
    let engine = Engine::open(ConfigStore::open(tmp.path()).unwrap()).unwrap();
    (engine, tmp)
}

/// File names in `dir` starting with `prefix`.
pub fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();
    names
}
