//! Reuse of built stores across analyzers.
//!
//! Building a store is the expensive part of vocabulary expansion, so
//! callers that analyze many fields against the same vocabulary keep one
//! [`StoreCache`] and ask it for stores by [`StoreKey`].

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::error::Result;
use crate::skos::engine::SkosEngine;
use crate::skos::segment::PersistedConceptStore;
use crate::skos::store::{ConceptStore, StoreConfig};
use crate::storage::{FileStorage, Storage, StorageConfig};

/// Identity of a built store: the vocabulary source and its language filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    source: String,
    languages: Vec<String>,
}

impl StoreKey {
    /// Create a key. Languages are lowercased, sorted and deduplicated, so
    /// `["fr", "EN"]` and `["en", "fr"]` name the same store.
    pub fn new<S: Into<String>>(source: S, languages: &[String]) -> Self {
        let config = StoreConfig::default().with_languages(languages.iter().cloned());
        StoreKey {
            source: source.into(),
            languages: config.normalized_languages(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Name of the persisted segment for this key: the source's file name,
    /// followed by `-lang.lang` when a language filter is set.
    pub fn segment_name(&self) -> String {
        let file_name = Path::new(&self.source)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.source);

        if self.languages.is_empty() {
            file_name.to_string()
        } else {
            format!("{file_name}-{}", self.languages.join("."))
        }
    }
}

/// An explicit cache of built stores, keyed by [`StoreKey`].
///
/// Builds are serialized per key: concurrent callers asking for the same key
/// wait for one build, while builds of other keys run alongside it.
#[derive(Debug, Default)]
pub struct StoreCache {
    stores: Mutex<AHashMap<StoreKey, Arc<dyn SkosEngine>>>,
    building: Mutex<AHashMap<StoreKey, Arc<Mutex<()>>>>,
}

impl StoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached store for `key`, if any.
    pub fn get(&self, key: &StoreKey) -> Option<Arc<dyn SkosEngine>> {
        self.stores.lock().get(key).cloned()
    }

    /// Cache a store under `key`, replacing any previous one.
    pub fn insert(&self, key: StoreKey, store: Arc<dyn SkosEngine>) {
        self.stores.lock().insert(key, store);
    }

    /// The cached store for `key`, building it on first use.
    ///
    /// Only the lock for `key` is held while `build` runs, so each key is
    /// built at most once and `build` may use the cache for other keys. A
    /// failed build caches nothing.
    pub fn get_or_build<F>(&self, key: StoreKey, build: F) -> Result<Arc<dyn SkosEngine>>
    where
        F: FnOnce(&StoreKey) -> Result<Arc<dyn SkosEngine>>,
    {
        if let Some(store) = self.get(&key) {
            debug!("Store cache hit for {key:?}");
            return Ok(store);
        }

        let gate = Arc::clone(self.building.lock().entry(key.clone()).or_default());
        let _building = gate.lock();

        // Another caller may have finished while we waited.
        if let Some(store) = self.get(&key) {
            debug!("Store cache hit for {key:?} after waiting");
            return Ok(store);
        }

        let store = build(&key)?;
        self.stores.lock().insert(key.clone(), Arc::clone(&store));
        self.building.lock().remove(&key);
        Ok(store)
    }

    /// An in-memory store for a vocabulary file.
    pub fn get_or_load(&self, source_path: &Path, config: &StoreConfig) -> Result<Arc<dyn SkosEngine>> {
        let key = StoreKey::new(source_path.display().to_string(), &config.languages);
        self.get_or_build(key, |_| {
            let store: Arc<dyn SkosEngine> =
                Arc::new(ConceptStore::from_file(source_path, config.clone())?);
            Ok(store)
        })
    }

    /// A persisted store for a vocabulary file, kept as a segment in `dir`.
    ///
    /// An existing segment for the same key is reopened; a missing or
    /// unreadable one is rebuilt from the source.
    pub fn open_or_build_persisted(
        &self,
        dir: &Path,
        source_path: &Path,
        config: &StoreConfig,
    ) -> Result<Arc<dyn SkosEngine>> {
        let key = StoreKey::new(source_path.display().to_string(), &config.languages);
        self.get_or_build(key, |key| {
            let storage = FileStorage::new(dir, StorageConfig::default())?;
            let store: Arc<dyn SkosEngine> =
                Arc::new(open_or_build_segment(&storage, key, source_path, config)?);
            Ok(store)
        })
    }

    pub fn len(&self) -> usize {
        self.stores.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.lock().is_empty()
    }

    /// Drop every cached store. Builds in progress still complete and are
    /// cached.
    pub fn clear(&self) {
        self.stores.lock().clear();
    }
}

fn open_or_build_segment(
    storage: &dyn Storage,
    key: &StoreKey,
    source_path: &Path,
    config: &StoreConfig,
) -> Result<PersistedConceptStore> {
    let name = key.segment_name();

    if storage.file_exists(&name) {
        match PersistedConceptStore::open(storage, &name) {
            Ok(store) => {
                info!("Reusing concept segment {name}");
                return Ok(store);
            }
            Err(e) => warn!("Rebuilding concept segment {name}: {e}"),
        }
    }

    let store = ConceptStore::from_file(source_path, config.clone())?;
    store.persist(storage, &name)?;
    PersistedConceptStore::open(storage, &name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkosError;
    use crate::skos::store::ConceptStoreBuilder;
    use crate::skos::types::LabelKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tiny_store() -> Arc<dyn SkosEngine> {
        let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
        builder.add_label("ex:1", LabelKind::Preferred, "jumps", None);
        Arc::new(builder.build())
    }

    #[test]
    fn test_key_normalizes_languages() {
        let a = StoreKey::new("vocab.ttl", &["fr".to_string(), "EN".to_string()]);
        let b = StoreKey::new("vocab.ttl", &["en".to_string(), "fr".to_string(), "fr".to_string()]);

        assert_eq!(a, b);
        assert_eq!(a.languages(), &["en".to_string(), "fr".to_string()]);
        assert_eq!(a.source(), "vocab.ttl");
    }

    #[test]
    fn test_segment_name() {
        let key = StoreKey::new("/data/skos/animals.ttl", &[]);
        assert_eq!(key.segment_name(), "animals.ttl");

        let key = StoreKey::new("/data/skos/animals.ttl", &["fr".to_string(), "en".to_string()]);
        assert_eq!(key.segment_name(), "animals.ttl-en.fr");
    }

    #[test]
    fn test_get_or_build_builds_once() {
        let cache = StoreCache::new();
        let builds = AtomicUsize::new(0);
        let key = StoreKey::new("vocab.ttl", &[]);

        for _ in 0..3 {
            let store = cache
                .get_or_build(key.clone(), |_| {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(tiny_store())
                })
                .unwrap();
            assert_eq!(store.concept_count(), 1);
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn test_build_may_use_cache_for_other_keys() {
        let cache = StoreCache::new();
        let outer = StoreKey::new("outer.ttl", &[]);
        let inner = StoreKey::new("inner.ttl", &[]);

        let store = cache
            .get_or_build(outer.clone(), |_| {
                let nested = cache.get_or_build(inner.clone(), |_| Ok(tiny_store()))?;
                assert_eq!(cache.len(), 1);
                Ok(nested)
            })
            .unwrap();

        assert_eq!(store.concept_count(), 1);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&inner).is_some());
        assert!(cache.get(&outer).is_some());
    }

    #[test]
    fn test_concurrent_callers_share_one_build() {
        let cache = StoreCache::new();
        let builds = AtomicUsize::new(0);
        let key = StoreKey::new("vocab.ttl", &[]);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let store = cache
                        .get_or_build(key.clone(), |_| {
                            builds.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(20));
                            Ok(tiny_store())
                        })
                        .unwrap();
                    assert_eq!(store.concept_count(), 1);
                });
            }
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_language_filters_are_distinct_entries() {
        let cache = StoreCache::new();
        cache.insert(StoreKey::new("vocab.ttl", &[]), tiny_store());
        cache.insert(StoreKey::new("vocab.ttl", &["en".to_string()]), tiny_store());

        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let cache = StoreCache::new();
        let key = StoreKey::new("broken.ttl", &[]);

        let result = cache.get_or_build(key.clone(), |_| Err(SkosError::load("bad vocabulary")));
        assert!(result.is_err());
        assert!(cache.get(&key).is_none());

        let store = cache.get_or_build(key.clone(), |_| Ok(tiny_store())).unwrap();
        assert_eq!(store.concept_count(), 1);
        assert_eq!(cache.len(), 1);
    }
}
