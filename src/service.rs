//! Orchestration layer: catalog lookups, augmentation calls, write-back.
//!
//! [`CatalogService`] owns the store behind a `tokio::sync::RwLock` and an
//! [`AugmentationGateway`]. Every store operation runs under a single lock
//! acquisition. Augmentation works on a snapshot taken under a read lock; the
//! lock is released while the provider is awaited and the result is written
//! back in one write-locked call, so concurrent augmentations of the same
//! item never interleave field by field.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::augment::{
    AugmentationGateway, InsightResult, Recommendation, SentimentResult, TestCaseSet,
};
use crate::catalog::{CatalogStats, CatalogStore, Item, ItemPatch, NewItem};

/// Result of [`CatalogService::generate_insights`].
#[derive(Debug, Clone, Serialize)]
pub struct InsightsOutcome {
    pub item: Item,
    pub insights: InsightResult,
}

/// Result of [`CatalogService::analyze_sentiment`].
#[derive(Debug, Clone, Serialize)]
pub struct SentimentOutcome {
    pub item: Item,
    pub sentiment: SentimentResult,
}

/// Result of [`CatalogService::smart_search`].
#[derive(Debug, Clone, Serialize)]
pub struct SmartSearchOutcome {
    pub items: Vec<Item>,
    pub count: usize,
    pub query: String,
}

/// Shared handle to the catalog and its augmentation gateway. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: Arc<RwLock<CatalogStore>>,
    gateway: AugmentationGateway,
}

impl CatalogService {
    pub fn new(store: CatalogStore, gateway: AugmentationGateway) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            gateway,
        }
    }

    pub fn gateway(&self) -> &AugmentationGateway {
        &self.gateway
    }

    // ------------------------------------------------------------------
    // Catalog operations
    // ------------------------------------------------------------------

    pub async fn create(&self, fields: NewItem) -> Item {
        let item = self.store.write().await.create(fields);
        debug!(id = %item.id, "item created");
        item
    }

    pub async fn get_all(&self) -> Vec<Item> {
        self.store.read().await.get_all()
    }

    pub async fn get_by_id(&self, id: &Uuid) -> Option<Item> {
        self.store.read().await.get_by_id(id)
    }

    pub async fn update(&self, id: &Uuid, patch: ItemPatch) -> Option<Item> {
        self.store.write().await.update(id, patch)
    }

    pub async fn remove(&self, id: &Uuid) -> Option<Item> {
        let removed = self.store.write().await.remove(id);
        if removed.is_some() {
            debug!(%id, "item removed");
        }
        removed
    }

    pub async fn search(&self, query: &str) -> Vec<Item> {
        self.store.read().await.search(query)
    }

    pub async fn get_by_category(&self, category: &str) -> Vec<Item> {
        self.store.read().await.get_by_category(category)
    }

    pub async fn get_by_tag(&self, tag: &str) -> Vec<Item> {
        self.store.read().await.get_by_tag(tag)
    }

    pub async fn get_stats(&self) -> CatalogStats {
        self.store.read().await.get_stats()
    }

    // ------------------------------------------------------------------
    // Augmented operations
    // ------------------------------------------------------------------

    /// Generate insights and store them on the item.
    ///
    /// `None` if the item does not exist, or was removed while the provider
    /// was being consulted.
    pub async fn generate_insights(&self, id: &Uuid) -> Option<InsightsOutcome> {
        let item = self.get_by_id(id).await?;
        let insights = self.gateway.insights(&item).await;
        let item = self
            .store
            .write()
            .await
            .update_ai_insights(id, insights.clone())?;
        Some(InsightsOutcome { item, insights })
    }

    /// Analyze sentiment and store it on the item.
    pub async fn analyze_sentiment(&self, id: &Uuid) -> Option<SentimentOutcome> {
        let item = self.get_by_id(id).await?;
        let sentiment = self.gateway.sentiment(&item).await;
        let item = self
            .store
            .write()
            .await
            .update_sentiment(id, sentiment.clone())?;
        Some(SentimentOutcome { item, sentiment })
    }

    /// Rank the whole catalog against `query`, keeping at most `limit` hits.
    pub async fn smart_search(&self, query: &str, limit: usize) -> SmartSearchOutcome {
        let items = self.get_all().await;
        let mut hits = self.gateway.smart_search(&items, query).await;
        hits.truncate(limit);
        SmartSearchOutcome {
            count: hits.len(),
            items: hits,
            query: query.to_string(),
        }
    }

    pub async fn get_recommendations(&self, limit: usize) -> Vec<Recommendation> {
        let items = self.get_all().await;
        self.gateway.recommendations(&items, limit).await
    }

    /// Draft test cases for the item's shape. Nothing is stored.
    pub async fn generate_test_cases(&self, id: &Uuid) -> Option<TestCaseSet> {
        let item = self.get_by_id(id).await?;
        Some(self.gateway.test_cases(&item).await)
    }
}
