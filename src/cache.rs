use crate::error::PatternError;
use crate::pattern::{Mode, Pattern};

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Memoizes compiled patterns by `(source, mode)`.
///
/// The set of route patterns is fixed once a router is built, so entries are
/// never evicted.
#[derive(Debug, Default)]
pub(crate) struct PatternCache {
    case_sensitive: bool,
    compiled: RwLock<HashMap<(String, Mode), Arc<Pattern>>>,
}

impl PatternCache {
    pub(crate) fn new(case_sensitive: bool) -> Self {
        PatternCache {
            case_sensitive,
            compiled: RwLock::default(),
        }
    }

    pub(crate) fn get(&self, source: &str, mode: Mode) -> Result<Arc<Pattern>, PatternError> {
        let key = (source.to_owned(), mode);

        if let Some(pattern) = self.compiled.read().get(&key) {
            return Ok(pattern.clone());
        }

        let mut compiled = self.compiled.write();

        // another thread may have compiled it while we waited for the lock
        if let Some(pattern) = compiled.get(&key) {
            return Ok(pattern.clone());
        }

        trace!("compiling pattern '{}' ({:?})", source, mode);
        let pattern = Arc::new(Pattern::compile(source, mode, self.case_sensitive)?);
        compiled.insert(key, pattern.clone());
        Ok(pattern)
    }

    pub(crate) fn len(&self) -> usize {
        self.compiled.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memoized() {
        let cache = PatternCache::new(false);

        let a = cache.get("/users/:id", Mode::Terminal).unwrap();
        let b = cache.get("/users/:id", Mode::Terminal).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        cache.get("/users/:id", Mode::Prefix).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = PatternCache::new(false);
        assert!(cache.get("/:id(", Mode::Terminal).is_err());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn case_sensitivity() {
        let cache = PatternCache::new(true);
        let pattern = cache.get("/users", Mode::Terminal).unwrap();
        assert!(!pattern.regex().is_match("/Users"));
    }

    #[test]
    fn shared_between_threads() {
        let cache = Arc::new(PatternCache::new(false));

        let handles = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.get("/a/:b", Mode::Prefix).unwrap())
            })
            .collect::<Vec<_>>();

        let first = cache.get("/a/:b", Mode::Prefix).unwrap();
        for handle in handles {
            assert!(Arc::ptr_eq(&first, &handle.join().unwrap()));
        }
        assert_eq!(cache.len(), 1);
    }
}
