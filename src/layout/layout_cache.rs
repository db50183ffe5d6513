use crate::layout::{LayoutGeometry, MasonryLayout};
use crate::models::{ColumnAssignment, PhotoSummary};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Maximum number of cached assignments to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the assignment cache: geometry plus list revision.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    column_count: u32,
    width_bits: u64,
    revision: u64,
    item_count: usize,
}

impl CacheKey {
    fn new(geometry: &LayoutGeometry, revision: u64, item_count: usize) -> Self {
        Self {
            column_count: geometry.column_count,
            width_bits: geometry.column_width_px.to_bits(),
            revision,
            item_count,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedAssignment {
    assignment: Arc<ColumnAssignment>,
    /// For LRU eviction
    last_used: Instant,
}

/// Memo of column assignments.
///
/// Scroll events re-derive the visible set many times per second while the
/// item list and geometry stay put; this keeps the greedy pass out of that
/// path. Keys are (column count, column width, list revision, item count).
/// The revision is supplied by the list's owner and must change whenever
/// the list does, so a lookup costs the same for 10 items or 10,000.
pub struct LayoutCache {
    cache: RwLock<HashMap<CacheKey, CachedAssignment>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::with_capacity(MAX_CACHE_ENTRIES)),
        }
    }

    pub fn get(
        &self,
        geometry: &LayoutGeometry,
        revision: u64,
        item_count: usize,
    ) -> Option<Arc<ColumnAssignment>> {
        let key = CacheKey::new(geometry, revision, item_count);
        let mut cache = self.cache.write();
        let entry = cache.get_mut(&key)?;
        entry.last_used = Instant::now();
        Some(Arc::clone(&entry.assignment))
    }

    pub fn set(
        &self,
        geometry: &LayoutGeometry,
        revision: u64,
        item_count: usize,
        assignment: Arc<ColumnAssignment>,
    ) {
        let key = CacheKey::new(geometry, revision, item_count);
        let entry = CachedAssignment {
            assignment,
            last_used: Instant::now(),
        };

        let mut cache = self.cache.write();

        if cache.len() >= MAX_CACHE_ENTRIES && !cache.contains_key(&key) {
            Self::evict_oldest(&mut cache);
        }

        cache.insert(key, entry);
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    fn evict_oldest(cache: &mut HashMap<CacheKey, CachedAssignment>) {
        let oldest_key = cache
            .iter()
            .min_by_key(|(_, v)| v.last_used)
            .map(|(k, _)| k.clone());

        if let Some(key) = oldest_key {
            cache.remove(&key);
        }
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Masonry layout combined with the memo.
pub struct CachedLayoutComputer {
    pub layout: MasonryLayout,
    pub cache: LayoutCache,
}

impl CachedLayoutComputer {
    pub fn new() -> Self {
        Self::with_layout(MasonryLayout::default())
    }

    pub fn with_layout(layout: MasonryLayout) -> Self {
        Self {
            layout,
            cache: LayoutCache::new(),
        }
    }

    /// Same result as `layout.assign(items, geometry)`, memoized on
    /// `revision`. Callers bump `revision` whenever `items` changes.
    pub fn compute(
        &self,
        items: &[PhotoSummary],
        revision: u64,
        geometry: &LayoutGeometry,
    ) -> Arc<ColumnAssignment> {
        if let Some(assignment) = self.cache.get(geometry, revision, items.len()) {
            return assignment;
        }

        let assignment = Arc::new(self.layout.assign(items, geometry));
        self.cache
            .set(geometry, revision, items.len(), Arc::clone(&assignment));
        assignment
    }

    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl Default for CachedLayoutComputer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(prefix: &str, count: u32) -> Vec<PhotoSummary> {
        (0..count)
            .map(|i| PhotoSummary::new(format!("{prefix}{i}"), 400 + i, 300 + i * 3))
            .collect()
    }

    fn geometry(column_count: u32, width: f64) -> LayoutGeometry {
        LayoutGeometry {
            column_count,
            column_width_px: width,
            container_height_px: 800.0,
        }
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = LayoutCache::new();
        let g = geometry(3, 300.0);
        assert!(cache.get(&g, 42, 0).is_none());

        cache.set(&g, 42, 0, Arc::new(ColumnAssignment::empty()));
        assert!(cache.get(&g, 42, 0).is_some());
        assert!(cache.get(&g, 43, 0).is_none());
        assert!(cache.get(&geometry(3, 301.0), 42, 0).is_none());
        assert!(cache.get(&geometry(2, 300.0), 42, 0).is_none());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = LayoutCache::new();
        for i in 0..(MAX_CACHE_ENTRIES + 5) {
            cache.set(
                &geometry(1, i as f64),
                i as u64,
                0,
                Arc::new(ColumnAssignment::empty()),
            );
        }
        assert!(cache.len() <= MAX_CACHE_ENTRIES);
    }

    #[test]
    fn test_computer_matches_direct_assignment() {
        let computer = CachedLayoutComputer::new();
        let items = make_items("p", 30);
        let g = computer.layout.compute_layout(1200.0, 800.0);

        let cached = computer.compute(&items, 1, &g);
        let direct = computer.layout.assign(&items, &g);
        assert_eq!(*cached, direct);

        let again = computer.compute(&items, 1, &g);
        assert!(Arc::ptr_eq(&cached, &again));
        assert_eq!(computer.cache.len(), 1);
    }

    #[test]
    fn test_new_revision_misses_cache() {
        let computer = CachedLayoutComputer::new();
        let mut items = make_items("p", 10);
        let g = computer.layout.compute_layout(900.0, 800.0);

        let first = computer.compute(&items, 1, &g);
        items.extend(make_items("q", 5));
        let second = computer.compute(&items, 2, &g);

        assert_eq!(first.item_count(), 10);
        assert_eq!(second.item_count(), 15);
        assert_eq!(computer.cache.len(), 2);

        // Resizing back to an earlier geometry reuses its entry.
        let narrow = computer.layout.compute_layout(600.0, 800.0);
        computer.compute(&items, 2, &narrow);
        let wide_again = computer.compute(&items, 2, &g);
        assert!(Arc::ptr_eq(&second, &wide_again));

        computer.invalidate();
        assert!(computer.cache.is_empty());
    }
}
