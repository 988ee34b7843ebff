use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{Behavior, BehaviorConfig};
use crate::error::{ScrubError, StoreError};

/// Durable destination for the behavior document.
pub trait BehaviorSink: Send + Sync {
    fn persist(&self, config: &BehaviorConfig) -> Result<(), StoreError>;
}

/// Live-reloadable behavior holder.
///
/// Wraps [`Behavior`] in an `ArcSwap` so readers never block and writers
/// atomically swap the pointer. Config and compiled pattern travel together,
/// so a reader can never see a new pattern string with an old matcher.
pub struct BehaviorHandle {
    inner: ArcSwap<Behavior>,
    writer: Mutex<()>,
    sink: Arc<dyn BehaviorSink>,
}

impl BehaviorHandle {
    /// Create a new handle seeded with `behavior`.
    pub fn new(behavior: Behavior, sink: Arc<dyn BehaviorSink>) -> Self {
        Self {
            inner: ArcSwap::from_pointee(behavior),
            writer: Mutex::new(()),
            sink,
        }
    }

    /// Current snapshot. Lock-free.
    pub fn load(&self) -> Arc<Behavior> {
        self.inner.load_full()
    }

    /// Swap in a behavior loaded from storage, without writing it back.
    pub fn store(&self, behavior: Behavior) {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.inner.store(Arc::new(behavior));
        tracing::info!("behavior config reloaded");
    }

    /// Apply `edit` to a copy of the current config, recompile, persist, publish.
    ///
    /// Nothing is written or published if the edited pattern does not compile
    /// or persistence fails.
    pub fn update<F>(&self, edit: F) -> Result<Arc<Behavior>, ScrubError>
    where
        F: FnOnce(&mut BehaviorConfig),
    {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut config = self.inner.load().config().clone();
        edit(&mut config);

        let fresh = Arc::new(Behavior::new(config)?);
        self.sink.persist(fresh.config())?;
        self.inner.store(Arc::clone(&fresh));
        tracing::info!(
            mention_reply_author = fresh.config().mention_reply_author,
            require_links = fresh.config().require_links,
            "behavior config updated"
        );
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink(AtomicUsize);

    impl BehaviorSink for CountingSink {
        fn persist(&self, _config: &BehaviorConfig) -> Result<(), StoreError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn handle() -> (BehaviorHandle, Arc<CountingSink>) {
        let sink = Arc::new(CountingSink::default());
        let behavior = Behavior::new(BehaviorConfig::default()).unwrap();
        (BehaviorHandle::new(behavior, sink.clone()), sink)
    }

    #[test]
    fn update_swaps_atomically_and_persists() {
        let (handle, sink) = handle();
        let before = handle.load();
        handle.update(|c| c.mention_reply_author = false).unwrap();

        assert!(before.config().mention_reply_author);
        assert!(!handle.load().config().mention_reply_author);
        assert_eq!(sink.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_pattern_is_not_committed() {
        let (handle, sink) = handle();
        let result = handle.update(|c| c.regex_keys = "(".into());

        assert!(matches!(result, Err(ScrubError::Pattern(_))));
        assert_eq!(handle.load().config().regex_keys, BehaviorConfig::default().regex_keys);
        assert_eq!(sink.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn new_pattern_comes_with_new_matcher() {
        let (handle, _) = handle();
        handle.update(|c| c.regex_keys = r"https://\S+".into()).unwrap();
        let snapshot = handle.load();
        assert_eq!(snapshot.matcher().as_str(), r"https://\S+");
    }

    #[test]
    fn store_replaces_without_persisting() {
        let (handle, sink) = handle();
        let mut config = BehaviorConfig::default();
        config.require_links = false;
        handle.store(Behavior::new(config).unwrap());
        assert!(!handle.load().config().require_links);
        assert_eq!(sink.0.load(Ordering::SeqCst), 0);
    }
}
