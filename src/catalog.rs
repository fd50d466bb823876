//! Catalog store: the authoritative in-memory collection of items.
//!
//! [`CatalogStore`] is a plain owned value with synchronous methods. Sharing
//! and mutual exclusion are the caller's concern (see
//! [`crate::service::CatalogService`]), which keeps every operation here atomic
//! with respect to the others as long as it runs under one lock acquisition.
//!
//! All lookups that can miss return `Option`; absence is never an error.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::augment::{InsightResult, SentimentResult};

/// Category assigned when none is supplied.
pub const DEFAULT_CATEGORY: &str = "General";

// ============================================================================
// Data Model
// ============================================================================

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Set only by insight generation.
    pub ai_insights: Option<InsightResult>,
    /// Set only by sentiment analysis.
    pub sentiment: Option<SentimentResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an item. Missing optionals take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    /// `None` when the payload omits it; validation rejects that.
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A partial update. `None` means "leave unchanged", never "clear".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Aggregate figures over the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: usize,
    pub with_insights: usize,
    pub categories: usize,
    pub unique_tags: usize,
    /// Rounded to two decimals, rendered as a fixed two-decimal string.
    #[serde(serialize_with = "two_decimals")]
    pub average_tags_per_item: f64,
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

// ============================================================================
// Store
// ============================================================================

/// Owns every [`Item`]. Insertion order is preserved for listings.
#[derive(Debug, Default)]
pub struct CatalogStore {
    items: IndexMap<Uuid, Item>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an item with defaults applied and append it.
    pub fn create(&mut self, fields: NewItem) -> Item {
        let now = Utc::now();
        let mut id = Uuid::new_v4();
        while self.items.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let item = Item {
            id,
            name: fields.name.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            category: fields
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags: fields.tags.unwrap_or_default(),
            ai_insights: None,
            sentiment: None,
            created_at: now,
            updated_at: now,
        };
        self.items.insert(id, item.clone());
        item
    }

    /// Every item, in insertion order.
    pub fn get_all(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<Item> {
        self.items.get(id).cloned()
    }

    /// Merge the provided fields and bump `updated_at`.
    pub fn update(&mut self, id: &Uuid, patch: ItemPatch) -> Option<Item> {
        self.mutate(id, |item| {
            if let Some(name) = patch.name {
                item.name = name;
            }
            if let Some(description) = patch.description {
                item.description = description;
            }
            if let Some(category) = patch.category {
                item.category = category;
            }
            if let Some(tags) = patch.tags {
                item.tags = tags;
            }
        })
    }

    /// Remove and return the item. Order of the remaining items is kept.
    pub fn remove(&mut self, id: &Uuid) -> Option<Item> {
        self.items.shift_remove(id)
    }

    /// Case-insensitive substring match over name, description, category and
    /// tags.
    pub fn search(&self, query: &str) -> Vec<Item> {
        let needle = query.to_lowercase();
        self.items
            .values()
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
                    || item.category.to_lowercase().contains(&needle)
                    || item
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Exact category match.
    pub fn get_by_category(&self, category: &str) -> Vec<Item> {
        self.items
            .values()
            .filter(|item| item.category == category)
            .cloned()
            .collect()
    }

    /// Exact tag match.
    pub fn get_by_tag(&self, tag: &str) -> Vec<Item> {
        self.items
            .values()
            .filter(|item| item.tags.iter().any(|t| t == tag))
            .cloned()
            .collect()
    }

    pub fn update_ai_insights(&mut self, id: &Uuid, insights: InsightResult) -> Option<Item> {
        self.mutate(id, |item| item.ai_insights = Some(insights))
    }

    pub fn update_sentiment(&mut self, id: &Uuid, sentiment: SentimentResult) -> Option<Item> {
        self.mutate(id, |item| item.sentiment = Some(sentiment))
    }

    pub fn get_stats(&self) -> CatalogStats {
        let total = self.items.len();
        let with_insights = self
            .items
            .values()
            .filter(|item| item.ai_insights.is_some())
            .count();
        let categories: HashSet<&str> = self
            .items
            .values()
            .map(|item| item.category.as_str())
            .collect();
        let tags: HashSet<&str> = self
            .items
            .values()
            .flat_map(|item| item.tags.iter().map(String::as_str))
            .collect();
        let total_tags: usize = self.items.values().map(|item| item.tags.len()).sum();

        let average_tags_per_item = if total == 0 {
            0.0
        } else {
            (total_tags as f64 / total as f64 * 100.0).round() / 100.0
        };

        CatalogStats {
            total,
            with_insights,
            categories: categories.len(),
            unique_tags: tags.len(),
            average_tags_per_item,
        }
    }

    /// Apply `f` to the item, refresh `updated_at`, return a copy.
    fn mutate(&mut self, id: &Uuid, f: impl FnOnce(&mut Item)) -> Option<Item> {
        let item = self.items.get_mut(id)?;
        f(item);
        item.updated_at = Utc::now();
        Some(item.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::Sentiment;

    fn new_item(name: &str) -> NewItem {
        NewItem {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    fn tagged(name: &str, tags: &[&str]) -> NewItem {
        NewItem {
            name: Some(name.into()),
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        }
    }

    fn sample_insights() -> InsightResult {
        InsightResult {
            category: "Books".into(),
            tags: vec!["fiction".into()],
            insights: "A novel".into(),
            suggestions: vec!["Add an author".into()],
        }
    }

    // --- create / get ---

    #[test]
    fn test_create_applies_defaults() {
        let mut store = CatalogStore::new();
        let item = store.create(NewItem {
            name: Some("Test Item".into()),
            description: Some("desc".into()),
            ..Default::default()
        });

        assert_eq!(item.name, "Test Item");
        assert_eq!(item.description, "desc");
        assert_eq!(item.category, DEFAULT_CATEGORY);
        assert!(item.tags.is_empty());
        assert!(item.ai_insights.is_none());
        assert!(item.sentiment.is_none());
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_create_missing_description_defaults_empty() {
        let mut store = CatalogStore::new();
        let item = store.create(new_item("bare"));
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_get_by_id_returns_created() {
        let mut store = CatalogStore::new();
        let created = store.create(tagged("Lamp", &["home", "light"]));
        let fetched = store.get_by_id(&created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_by_id_unknown_is_none() {
        let store = CatalogStore::new();
        assert!(store.get_by_id(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = CatalogStore::new();
        let ids: HashSet<Uuid> = (0..100)
            .map(|i| store.create(new_item(&format!("item{i}"))).id)
            .collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_get_all_preserves_insertion_order() {
        let mut store = CatalogStore::new();
        store.create(new_item("a"));
        store.create(new_item("b"));
        store.create(new_item("c"));
        let names: Vec<String> = store.get_all().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    // --- update ---

    #[test]
    fn test_update_merges_only_provided_fields() {
        let mut store = CatalogStore::new();
        let original = store.create(NewItem {
            name: Some("Original".into()),
            description: Some("keep me".into()),
            category: Some("Books".into()),
            tags: Some(vec!["t1".into()]),
        });

        let updated = store
            .update(
                &original.id,
                ItemPatch {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.description, "keep me");
        assert_eq!(updated.category, "Books");
        assert_eq!(updated.tags, vec!["t1"]);
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[test]
    fn test_update_empty_patch_changes_nothing_but_timestamp() {
        let mut store = CatalogStore::new();
        let original = store.create(tagged("x", &["a"]));
        let updated = store.update(&original.id, ItemPatch::default()).unwrap();
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.tags, original.tags);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[test]
    fn test_update_preserves_augmentation_fields() {
        let mut store = CatalogStore::new();
        let item = store.create(new_item("x"));
        store.update_ai_insights(&item.id, sample_insights());
        let updated = store
            .update(
                &item.id,
                ItemPatch {
                    description: Some("new".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.ai_insights, Some(sample_insights()));
    }

    #[test]
    fn test_update_unknown_is_none() {
        let mut store = CatalogStore::new();
        assert!(
            store
                .update(&Uuid::new_v4(), ItemPatch::default())
                .is_none()
        );
    }

    // --- remove ---

    #[test]
    fn test_remove_then_get_is_none() {
        let mut store = CatalogStore::new();
        let item = store.create(new_item("gone"));
        let removed = store.remove(&item.id).unwrap();
        assert_eq!(removed.id, item.id);
        assert!(store.get_by_id(&item.id).is_none());
        assert!(store.remove(&item.id).is_none());
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        let mut store = CatalogStore::new();
        store.create(new_item("a"));
        let b = store.create(new_item("b"));
        store.create(new_item("c"));
        store.remove(&b.id);
        let names: Vec<String> = store.get_all().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    // --- search / filters ---

    #[test]
    fn test_search_matches_each_field_case_insensitively() {
        let mut store = CatalogStore::new();
        store.create(new_item("Red Apple"));
        store.create(NewItem {
            name: Some("Pear".into()),
            description: Some("tastes like APPLE".into()),
            ..Default::default()
        });
        store.create(NewItem {
            name: Some("Cider".into()),
            category: Some("Applesauce".into()),
            ..Default::default()
        });
        store.create(tagged("Pie", &["apple-pie"]));
        store.create(new_item("Banana"));

        let names: Vec<String> = store
            .search("aPpLe")
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Red Apple", "Pear", "Cider", "Pie"]);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let mut store = CatalogStore::new();
        store.create(new_item("Banana"));
        assert!(store.search("kiwi").is_empty());
    }

    #[test]
    fn test_get_by_category_is_exact() {
        let mut store = CatalogStore::new();
        store.create(NewItem {
            name: Some("a".into()),
            category: Some("Books".into()),
            ..Default::default()
        });
        store.create(NewItem {
            name: Some("b".into()),
            category: Some("books".into()),
            ..Default::default()
        });
        let hits = store.get_by_category("Books");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "a");
    }

    #[test]
    fn test_get_by_tag_is_exact() {
        let mut store = CatalogStore::new();
        store.create(tagged("a", &["rust", "lang"]));
        store.create(tagged("b", &["rusty"]));
        let hits = store.get_by_tag("rust");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "a");
    }

    // --- augmentation writes ---

    #[test]
    fn test_update_ai_insights_touches_only_insights() {
        let mut store = CatalogStore::new();
        let item = store.create(tagged("x", &["a"]));
        let updated = store
            .update_ai_insights(&item.id, sample_insights())
            .unwrap();
        assert_eq!(updated.ai_insights, Some(sample_insights()));
        assert_eq!(updated.name, item.name);
        assert_eq!(updated.tags, item.tags);
        assert_eq!(updated.category, item.category);
        assert!(updated.sentiment.is_none());
    }

    #[test]
    fn test_update_sentiment_keeps_insights() {
        let mut store = CatalogStore::new();
        let item = store.create(new_item("x"));
        store.update_ai_insights(&item.id, sample_insights());
        let sentiment = SentimentResult {
            sentiment: Sentiment::Positive,
            confidence: 0.9,
            tone: "upbeat".into(),
            suggestions: vec![],
        };
        let updated = store
            .update_sentiment(&item.id, sentiment.clone())
            .unwrap();
        assert_eq!(updated.sentiment, Some(sentiment));
        assert_eq!(updated.ai_insights, Some(sample_insights()));
    }

    #[test]
    fn test_augmentation_write_unknown_is_none() {
        let mut store = CatalogStore::new();
        assert!(
            store
                .update_ai_insights(&Uuid::new_v4(), sample_insights())
                .is_none()
        );
    }

    // --- stats ---

    #[test]
    fn test_stats_empty() {
        let store = CatalogStore::new();
        let stats = store.get_stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_tags_per_item, 0.0);
    }

    #[test]
    fn test_stats_three_general_items() {
        let mut store = CatalogStore::new();
        store.create(tagged("a", &[]));
        store.create(tagged("b", &["x"]));
        store.create(tagged("c", &["x", "y"]));

        let stats = store.get_stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.with_insights, 0);
        assert_eq!(stats.categories, 1);
        assert!(stats.unique_tags <= 2);
        assert_eq!(stats.average_tags_per_item, 1.0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["averageTagsPerItem"], "1.00");
        assert_eq!(json["uniqueTags"], 2);
    }

    #[test]
    fn test_stats_rounds_average() {
        let mut store = CatalogStore::new();
        store.create(tagged("a", &["x"]));
        store.create(tagged("b", &[]));
        store.create(tagged("c", &[]));
        let stats = store.get_stats();
        assert_eq!(stats.average_tags_per_item, 0.33);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["averageTagsPerItem"], "0.33");
    }

    #[test]
    fn test_stats_counts_insights() {
        let mut store = CatalogStore::new();
        let a = store.create(new_item("a"));
        store.create(new_item("b"));
        store.update_ai_insights(&a.id, sample_insights());
        assert_eq!(store.get_stats().with_insights, 1);
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let mut store = CatalogStore::new();
        let item = store.create(new_item("x"));
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("aiInsights").is_some());
        assert!(json["aiInsights"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
