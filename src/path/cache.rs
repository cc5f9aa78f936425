use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::Lazy;

use super::{parse_path, OwnedPath, PathParseError};

/// A bounded memoization layer for compiled paths.
///
/// Entries are keyed by the raw path string and evicted least-recently-used
/// once the cache is full. The cache never changes what a parse returns: a
/// hit is segment-wise identical to recompiling, and failed parses are never
/// stored. It only changes what a parse *emits*: the wildcard spacing
/// diagnostics fire on the compiling call, not on hits.
#[derive(Debug)]
pub struct PathCache {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, Arc<OwnedPath>>,
    // Front is the eviction candidate.
    recency: VecDeque<String>,
    capacity: usize,
}

impl PathCache {
    pub const DEFAULT_CAPACITY: usize = 1000;

    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                recency: VecDeque::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Look up a compiled path, marking it most recently used.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Arc<OwnedPath>> {
        let mut inner = self.lock();
        let hit = inner.entries.get(path).map(Arc::clone)?;
        inner.touch(path);
        Some(hit)
    }

    /// Store a compiled path, evicting the least-recently-used entry when
    /// full.
    pub fn insert(&self, path: &str, compiled: Arc<OwnedPath>) {
        let mut inner = self.lock();
        if inner.entries.insert(path.to_owned(), compiled).is_some() {
            inner.touch(path);
            return;
        }
        if inner.recency.len() == inner.capacity {
            if let Some(evicted) = inner.recency.pop_front() {
                inner.entries.remove(&evicted);
            }
        }
        inner.recency.push_back(path.to_owned());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.recency.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Inner {
    fn touch(&mut self, path: &str) {
        if let Some(position) = self.recency.iter().position(|entry| entry == path) {
            if let Some(entry) = self.recency.remove(position) {
                self.recency.push_back(entry);
            }
        }
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Parse through the cache: return the memoized segments on a hit, otherwise
/// compile and remember the result.
pub fn parse_path_cached(
    cache: &PathCache,
    path: &str,
) -> Result<Arc<OwnedPath>, PathParseError> {
    if let Some(hit) = cache.get(path) {
        return Ok(hit);
    }
    let compiled = Arc::new(parse_path(path)?);
    cache.insert(path, Arc::clone(&compiled));
    Ok(compiled)
}

static GLOBAL_CACHE: Lazy<PathCache> = Lazy::new(PathCache::default);

pub(crate) fn global_cache() -> &'static PathCache {
    &GLOBAL_CACHE
}

/// Empty the process-wide cache backing [`crate::resolve`] and
/// [`crate::resolve_sync`], so tests relying on fresh-compile diagnostics
/// don't observe each other.
#[cfg(any(test, feature = "test"))]
pub fn reset_global_cache() {
    GLOBAL_CACHE.clear();
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::path;

    #[test]
    fn hit_is_identical_to_recompiling() {
        let cache = PathCache::default();
        let first = parse_path_cached(&cache, "one.*.id").unwrap();
        let second = parse_path_cached(&cache, "one.*.id").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, parse_path("one.*.id").unwrap());
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = PathCache::new(2);
        parse_path_cached(&cache, "a").unwrap();
        parse_path_cached(&cache, "b").unwrap();
        // Refresh "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());
        parse_path_cached(&cache, "c").unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn failed_parses_are_not_cached() {
        let cache = PathCache::default();
        assert!(parse_path_cached(&cache, "__proto__.x").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn reinsert_refreshes_recency() {
        let cache = PathCache::new(2);
        cache.insert("a", Arc::new(path!("a")));
        cache.insert("b", Arc::new(path!("b")));
        cache.insert("a", Arc::new(path!("a")));
        cache.insert("c", Arc::new(path!("c")));

        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn hits_do_not_re_emit_parse_diagnostics() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Default)]
        struct WarnCount(AtomicUsize);

        impl tracing::Subscriber for WarnCount {
            fn enabled(&self, metadata: &tracing::Metadata<'_>) -> bool {
                metadata.level() == &tracing::Level::WARN
            }
            fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
                tracing::span::Id::from_u64(1)
            }
            fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}
            fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}
            fn event(&self, _: &tracing::Event<'_>) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
            fn enter(&self, _: &tracing::span::Id) {}
            fn exit(&self, _: &tracing::span::Id) {}
        }

        let warnings = Arc::new(WarnCount::default());
        let cache = PathCache::default();

        tracing::subscriber::with_default(Arc::clone(&warnings), || {
            // Missing separator on both sides of the wildcard: two warnings.
            parse_path_cached(&cache, "on*e").unwrap();
            assert_eq!(warnings.0.load(Ordering::Relaxed), 2);

            // Served from cache: the parse, and its diagnostics, are skipped.
            parse_path_cached(&cache, "on*e").unwrap();
            assert_eq!(warnings.0.load(Ordering::Relaxed), 2);
        });
    }

    #[test]
    fn clear_empties_everything() {
        let cache = PathCache::new(4);
        parse_path_cached(&cache, "a.b").unwrap();
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("a.b").is_none());
    }
}
