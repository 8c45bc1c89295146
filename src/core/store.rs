//! # Stores
//!
//! Two pieces of shared mutable state, owned by `App` and handed to every
//! screen by `&mut`:
//!
//! ```text
//! ItemStore                     AnnotationStore
//! ├── fetcher: Arc<dyn ..>      ├── tags:    id → [tag, ...]  (ordered, unique)
//! ├── items:   id → Item        └── ratings: id → i64
//! └── order:   [id, ...]  (insertion order)
//! ```
//!
//! The item cache only grows. The annotation maps are created lazily and
//! entries are never removed.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::api::{FetchError, ItemFetcher};
use crate::core::item::Item;

// ============================================================================
// Item Store
// ============================================================================

pub struct ItemStore {
    fetcher: Arc<dyn ItemFetcher>,
    items: HashMap<u64, Item>,
    order: Vec<u64>,
    last_error: Option<FetchError>,
}

impl ItemStore {
    pub fn new(fetcher: Arc<dyn ItemFetcher>) -> Self {
        Self {
            fetcher,
            items: HashMap::new(),
            order: Vec::new(),
            last_error: None,
        }
    }

    /// Returns the cached item, fetching it on a miss.
    ///
    /// A failed fetch stores nothing, so the next call for the same id
    /// asks the fetcher again.
    pub async fn get_or_fetch(&mut self, id: u64) -> Option<&Item> {
        if !self.items.contains_key(&id) && !self.fetch(id).await {
            return None;
        }
        self.items.get(&id)
    }

    /// Fetches `id` again even when cached. The new copy replaces the cached
    /// one only on success; on failure the cached copy stays and `None` is
    /// returned.
    pub async fn refresh(&mut self, id: u64) -> Option<&Item> {
        if !self.fetch(id).await {
            return None;
        }
        self.items.get(&id)
    }

    async fn fetch(&mut self, id: u64) -> bool {
        match self.fetcher.fetch_item(id).await {
            Ok(item) => {
                debug!("Fetched item {} from {}", id, self.fetcher.name());
                self.insert(item);
                true
            }
            Err(e) => {
                warn!("Failed to fetch item {}: {}", id, e);
                self.last_error = Some(e);
                false
            }
        }
    }

    /// Fetches every child of `parent` in order, one request at a time.
    ///
    /// `progress(done, total)` is called before each fetch and once after the
    /// last one. Returns how many children are now available in the cache.
    pub async fn fetch_children<F>(&mut self, parent: &Item, mut progress: F) -> usize
    where
        F: FnMut(usize, usize),
    {
        let total = parent.kids.len();
        let mut available = 0;
        info!("Fetching {} children of item {}", total, parent.id);
        for (done, &id) in parent.kids.iter().enumerate() {
            progress(done, total);
            if self.get_or_fetch(id).await.is_some() {
                available += 1;
            }
        }
        progress(total, total);
        info!("{}/{} children of item {} available", available, total, parent.id);
        available
    }

    /// Inserts or replaces an item. Replacement keeps the original position.
    pub fn insert(&mut self, item: Item) {
        let id = item.id;
        if self.items.insert(id, item).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: u64) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Cached items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The error from the most recent failed fetch, consumed on read.
    pub fn take_last_error(&mut self) -> Option<FetchError> {
        self.last_error.take()
    }
}

// ============================================================================
// Annotation Store
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnnotationStore {
    tags: BTreeMap<u64, Vec<String>>,
    ratings: BTreeMap<u64, i64>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(tags: BTreeMap<u64, Vec<String>>, ratings: BTreeMap<u64, i64>) -> Self {
        let mut store = Self {
            tags: BTreeMap::new(),
            ratings,
        };
        // Re-insert so duplicates in a hand-edited save file collapse
        for (id, list) in tags {
            for tag in list {
                store.add_tag(id, &tag);
            }
        }
        store
    }

    /// Adds a tag unless the item already carries it. Returns true if added.
    pub fn add_tag(&mut self, id: u64, tag: &str) -> bool {
        let tags = self.tags.entry(id).or_default();
        if tags.iter().any(|t| t == tag) {
            return false;
        }
        tags.push(tag.to_string());
        true
    }

    pub fn has_tag(&self, id: u64, tag: &str) -> bool {
        self.tags
            .get(&id)
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }

    /// Tags of an item in the order they were added.
    pub fn tags(&self, id: u64) -> &[String] {
        self.tags.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_rating(&mut self, id: u64, rating: i64) {
        self.ratings.insert(id, rating);
    }

    pub fn rating(&self, id: u64) -> Option<i64> {
        self.ratings.get(&id).copied()
    }

    pub fn all_tags(&self) -> &BTreeMap<u64, Vec<String>> {
        &self.tags
    }

    pub fn all_ratings(&self) -> &BTreeMap<u64, i64> {
        &self.ratings
    }

    /// Number of items with at least one tag.
    pub fn tagged_count(&self) -> usize {
        self.tags.values().filter(|tags| !tags.is_empty()).count()
    }

    pub fn rated_count(&self) -> usize {
        self.ratings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryFetcher, comment, story_with_kids};

    #[tokio::test]
    async fn test_get_or_fetch_caches_success() {
        let fetcher = Arc::new(MemoryFetcher::new([comment(1, "hello")]));
        let mut store = ItemStore::new(fetcher.clone());

        let first = store.get_or_fetch(1).await.cloned();
        let second = store.get_or_fetch(1).await.cloned();

        assert_eq!(first, second);
        assert_eq!(first.map(|i| i.id), Some(1));
        assert_eq!(fetcher.calls(1), 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch_retries_after_failure() {
        let fetcher = Arc::new(MemoryFetcher::new([]));
        let mut store = ItemStore::new(fetcher.clone());

        assert!(store.get_or_fetch(5).await.is_none());
        assert!(store.get(5).is_none());
        assert!(matches!(store.take_last_error(), Some(FetchError::NotFound(5))));

        fetcher.add(comment(5, "late"));
        assert!(store.get_or_fetch(5).await.is_some());
        assert_eq!(fetcher.calls(5), 2);
    }

    #[tokio::test]
    async fn test_fetch_children_sequential_with_progress() {
        let fetcher = Arc::new(MemoryFetcher::new([comment(11, "a"), comment(13, "c")]));
        let mut store = ItemStore::new(fetcher.clone());
        let root = story_with_kids(10, "whoishiring", vec![11, 12, 13]);

        let mut seen = Vec::new();
        let available = store
            .fetch_children(&root, |done, total| seen.push((done, total)))
            .await;

        assert_eq!(available, 2);
        assert_eq!(seen, vec![(0, 3), (1, 3), (2, 3), (3, 3)]);
        assert_eq!(fetcher.requested(), vec![11, 12, 13]);
        let ids: Vec<u64> = store.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![11, 13]);
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut store = ItemStore::new(Arc::new(MemoryFetcher::new([])));
        store.insert(comment(30, "x"));
        store.insert(comment(10, "y"));
        store.insert(comment(20, "z"));
        store.insert(comment(10, "y2"));

        let ids: Vec<u64> = store.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(store.get(10).and_then(|i| i.text.clone()).as_deref(), Some("y2"));
    }

    #[tokio::test]
    async fn test_refresh_replaces_cached_copy() {
        let fetcher = Arc::new(MemoryFetcher::new([comment(3, "v1"), comment(4, "other")]));
        let mut store = ItemStore::new(fetcher.clone());
        store.get_or_fetch(3).await;
        store.get_or_fetch(4).await;

        fetcher.add(comment(3, "v2"));
        let refreshed = store.refresh(3).await.and_then(|i| i.text.clone());

        assert_eq!(refreshed.as_deref(), Some("v2"));
        assert_eq!(fetcher.calls(3), 2);
        let ids: Vec<u64> = store.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cached_copy() {
        let fetcher = Arc::new(MemoryFetcher::new([comment(3, "v1")]));
        let mut store = ItemStore::new(fetcher.clone());
        store.get_or_fetch(3).await;

        fetcher.remove(3);
        assert!(store.refresh(3).await.is_none());

        assert!(matches!(store.take_last_error(), Some(FetchError::NotFound(3))));
        assert_eq!(store.get(3).and_then(|i| i.text.as_deref()), Some("v1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_tag_suppresses_duplicates() {
        let mut annotations = AnnotationStore::new();
        assert!(annotations.add_tag(1, "rust"));
        assert!(annotations.add_tag(1, "remote"));
        assert!(!annotations.add_tag(1, "rust"));
        assert_eq!(annotations.tags(1), ["rust", "remote"]);
        assert!(annotations.has_tag(1, "remote"));
        assert!(!annotations.has_tag(2, "rust"));
        assert!(annotations.tags(2).is_empty());
    }

    #[test]
    fn test_set_rating_replaces() {
        let mut annotations = AnnotationStore::new();
        assert_eq!(annotations.rating(4), None);
        annotations.set_rating(4, 3);
        annotations.set_rating(4, -1);
        assert_eq!(annotations.rating(4), Some(-1));
        assert_eq!(annotations.rated_count(), 1);
    }

    #[test]
    fn test_from_parts_collapses_duplicate_tags() {
        let mut tags = BTreeMap::new();
        tags.insert(1, vec!["a".to_string(), "b".to_string(), "a".to_string()]);
        let annotations = AnnotationStore::from_parts(tags, BTreeMap::new());
        assert_eq!(annotations.tags(1), ["a", "b"]);
    }
}
