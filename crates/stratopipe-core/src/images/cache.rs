//! In-memory image metadata cache, keyed by project id.
//!
//! Entries are written on the first successful fetch for a project and only
//! leave through [`ImageCache::clear`]. There is no expiry: a hit is served
//! without asking the server again, so a stale entry stays until cleared.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::models::StoredImage;

#[derive(Debug, Default)]
pub struct ImageCache {
    entries: RwLock<HashMap<String, Vec<StoredImage>>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, project_id: &str) -> Option<Vec<StoredImage>> {
        self.entries.read().get(project_id).cloned()
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.entries.read().contains_key(project_id)
    }

    /// Store images for a project, replacing any previous entry
    pub fn insert(&self, project_id: &str, images: Vec<StoredImage>) {
        self.entries.write().insert(project_id.to_string(), images);
    }

    /// Remove one project's entry, or every entry when `project_id` is `None`.
    /// Returns the number of entries removed.
    pub fn clear(&self, project_id: Option<&str>) -> usize {
        let mut entries = self.entries.write();
        match project_id {
            Some(id) => entries.remove(id).map_or(0, |_| 1),
            None => {
                let removed = entries.len();
                entries.clear();
                removed
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn project_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::stored_image;

    fn image(id: i64) -> StoredImage {
        stored_image(id, &format!("image {}", id), "")
    }

    #[test]
    fn test_empty_entry_is_still_cached() {
        let cache = ImageCache::new();
        assert!(!cache.contains("p1"));

        cache.insert("p1", Vec::new());
        assert!(cache.contains("p1"));
        assert_eq!(cache.get("p1"), Some(Vec::new()));
    }

    #[test]
    fn test_clear_one_project() {
        let cache = ImageCache::new();
        cache.insert("p1", vec![image(1)]);
        cache.insert("p2", vec![image(2)]);

        assert_eq!(cache.clear(Some("p1")), 1);
        assert!(!cache.contains("p1"));
        assert_eq!(cache.get("p2"), Some(vec![image(2)]));

        assert_eq!(cache.clear(Some("missing")), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_everything() {
        let cache = ImageCache::new();
        cache.insert("b", vec![image(1)]);
        cache.insert("a", vec![]);
        assert_eq!(cache.project_ids(), vec!["a".to_string(), "b".to_string()]);

        assert_eq!(cache.clear(None), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let cache = ImageCache::new();
        cache.insert("p", vec![image(1)]);
        cache.insert("p", vec![image(2), image(3)]);
        assert_eq!(cache.get("p").map(|v| v.len()), Some(2));
    }
}
