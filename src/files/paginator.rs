use std::sync::Arc;

use crate::files::cache::{LruCache, DEFAULT_CACHE_CAPACITY};
use crate::files::grouping::{paginate_file_groups, pagination_key, FileGroups};

/// Memoizing front end to [`paginate_file_groups`]
///
/// Results are keyed by the ordered group keys and the page size, so the
/// same group layout is only paginated once while it stays in the cache.
#[derive(Debug)]
pub struct GroupPaginator {
    cache: LruCache<u64, Arc<Vec<FileGroups>>>,
    hits: u64,
    misses: u64,
}

impl Default for GroupPaginator {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl GroupPaginator {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn paginate(&mut self, groups: &FileGroups, page_size: usize) -> Arc<Vec<FileGroups>> {
        let key = pagination_key(groups, page_size);
        if let Some(pages) = self.cache.get(&key) {
            self.hits += 1;
            log::debug!("group pagination cache hit for {key:016x}");
            return Arc::clone(pages);
        }

        self.misses += 1;
        let pages = Arc::new(paginate_file_groups(groups, page_size));
        log::debug!(
            "paginated {} group(s) into {} page(s)",
            groups.len(),
            pages.len()
        );
        self.cache.insert(key, Arc::clone(&pages));
        pages
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn groups(keys: &[&str]) -> FileGroups {
        keys.iter().map(|k| ((*k).to_string(), vec![])).collect()
    }

    #[test]
    fn test_second_call_is_cached() {
        let mut paginator = GroupPaginator::default();
        let g = groups(&["S1-z-Lz", "S2-z-Lz"]);
        let first = paginator.paginate(&g, 10);
        let second = paginator.paginate(&g, 10);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(paginator.stats(), (1, 1));
    }

    #[test]
    fn test_cache_is_bounded() {
        let mut paginator = GroupPaginator::new(2);
        for size in 1..=5 {
            paginator.paginate(&groups(&["S1-z-Lz"]), size);
        }
        assert_eq!(paginator.cached_len(), 2);
    }
}
