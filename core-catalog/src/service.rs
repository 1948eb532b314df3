//! # Catalog Service
//!
//! Reads the podcast and event collections from the document store and
//! derives the home screen shelves from them.
//!
//! Every call lists the collection again; the store is the cache. Documents
//! that fail to decode are skipped with a warning so that one bad record does
//! not empty the screen.

use crate::error::{CatalogError, Result};
use crate::models::{Event, Podcast};
use crate::query::PodcastQuery;
use bridge_traits::{Document, DocumentStore};
use core_runtime::config::CollectionNames;
use core_runtime::events::{CatalogEvent, CoreEvent, EventBus};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Read-only access to the catalog.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    collections: CollectionNames,
    events: EventBus,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collections: CollectionNames,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            collections,
            events,
        }
    }

    /// Every decodable podcast, in store order.
    #[instrument(skip(self))]
    pub async fn podcasts(&self) -> Result<Vec<Podcast>> {
        self.load(&self.collections.podcasts, Podcast::from_document)
            .await
    }

    /// Every decodable event, in store order.
    #[instrument(skip(self))]
    pub async fn events(&self) -> Result<Vec<Event>> {
        self.load(&self.collections.events, Event::from_document)
            .await
    }

    /// The `n` most recently created podcasts, newest first.
    pub async fn newest(&self, n: usize) -> Result<Vec<Podcast>> {
        let mut podcasts = self.podcasts().await?;
        podcasts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        podcasts.truncate(n);
        Ok(podcasts)
    }

    /// `n` podcasts in random order.
    pub async fn recommended<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<Podcast>> {
        let mut podcasts = self.podcasts().await?;
        podcasts.shuffle(rng);
        podcasts.truncate(n);
        Ok(podcasts)
    }

    /// Podcasts matching `query`, in store order.
    pub async fn search(&self, query: &PodcastQuery) -> Result<Vec<Podcast>> {
        let podcasts = self.podcasts().await?;
        Ok(query.apply(&podcasts))
    }

    async fn load<T>(
        &self,
        collection: &str,
        decode: fn(&Document) -> Result<T>,
    ) -> Result<Vec<T>> {
        let documents = match self.store.list_all(collection).await {
            Ok(documents) => documents,
            Err(err) => {
                warn!(collection, error = %err, "Failed to list collection");
                self.emit(CatalogEvent::LoadFailed {
                    collection: collection.to_string(),
                    message: err.to_string(),
                });
                return Err(CatalogError::Store(err));
            }
        };

        let total = documents.len();
        let items: Vec<T> = documents
            .iter()
            .filter_map(|doc| match decode(doc) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(collection, id = %doc.id, error = %err, "Skipping malformed document");
                    None
                }
            })
            .collect();
        let skipped = total - items.len();

        info!(collection, count = items.len(), skipped, "Catalog collection loaded");
        self.emit(CatalogEvent::Loaded {
            collection: collection.to_string(),
            count: items.len(),
            skipped,
        });
        Ok(items)
    }

    fn emit(&self, event: CatalogEvent) {
        // No subscribers is fine.
        let _ = self.events.emit(CoreEvent::Catalog(event));
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("store", &"DocumentStore { ... }")
            .field("collections", &self.collections)
            .finish()
    }
}
