pub mod compose;
pub mod enrich;

pub use compose::{compose, execute};
pub use enrich::ImageEnricher;

use crate::{
   config::Config,
   error::{Error, Result},
   filter::FilterRequest,
   kv::KeyValueStore,
   preview::PreviewSource,
   recent::RecentSearches,
   store::DocumentStore,
   types::{EnrichedListing, Listing},
};

/// Runs filtered listing searches: compose and execute the query, enrich the
/// results, then remember the search term.
pub struct SearchEngine<S: DocumentStore, P: PreviewSource, K: KeyValueStore> {
   store:      S,
   previews:   P,
   recent:     RecentSearches<K>,
   enricher:   ImageEnricher,
   collection: String,
}

impl<S, P, K> SearchEngine<S, P, K>
where
   S: DocumentStore,
   P: PreviewSource,
   K: KeyValueStore,
{
   pub fn new(
      store: S,
      previews: P,
      kv: K,
      enricher: ImageEnricher,
      collection: impl Into<String>,
   ) -> Self {
      Self {
         store,
         previews,
         recent: RecentSearches::new(kv),
         enricher,
         collection: collection.into(),
      }
   }

   pub fn from_config(config: &Config, store: S, previews: P, kv: K) -> Self {
      Self::new(
         store,
         previews,
         kv,
         ImageEnricher::from_config(config),
         &config.listings_collection,
      )
   }

   pub async fn search(&self, request: &FilterRequest) -> Result<Vec<EnrichedListing>> {
      let listings = execute(&self.store, &self.collection, request).await?;
      tracing::debug!("{} listings matched", listings.len());

      let enriched = self
         .enricher
         .enrich(&self.store, &self.previews, listings)
         .await;

      if request.trimmed_term().is_some() {
         if let Err(e) = self.recent.record_term(&request.term).await {
            tracing::warn!("search term not remembered: {e}");
         }
      }

      Ok(enriched)
   }

   /// Fetches one visible listing by id. Inactive listings read as not found.
   pub async fn listing(&self, id: &str) -> Result<EnrichedListing> {
      let doc = self.store.get_document(&self.collection, id).await?;
      let listing = Listing::from_document(doc)?;
      if !listing.is_active() {
         return Err(Error::NotFound { collection: self.collection.clone(), id: id.to_string() });
      }

      Ok(self.enricher.enrich_one(&self.store, &self.previews, listing).await)
   }

   pub async fn recent(&self) -> Vec<String> {
      self.recent.load().await
   }

   pub async fn clear_recent(&self) {
      self.recent.clear().await;
   }
}

#[cfg(test)]
mod tests {
   use std::sync::Arc;

   use serde_json::json;

   use super::*;
   use crate::{
      filter::SortBy,
      kv::MemoryKv,
      query::Predicate,
      recent::RECENT_KEY,
      store::MemoryStore,
      types::Document,
   };

   struct UrlPreviews;

   impl PreviewSource for UrlPreviews {
      fn preview_url(&self, bucket: &str, file_id: &str, _: Option<(u32, u32)>) -> Result<String> {
         Ok(format!("https://cdn.test/{bucket}/{file_id}"))
      }
   }

   fn store() -> MemoryStore {
      MemoryStore::from_json(json!({
         "listings": [
            {
               "$id": "chair-75",
               "$createdAt": "2024-05-02T09:00:00.000+00:00",
               "title": "Wooden chair",
               "price": 75,
               "category": "Furniture",
               "status": "active",
            },
            {
               "$id": "chair-80",
               "$createdAt": "2024-05-03T09:00:00.000+00:00",
               "title": "Dining chair",
               "price": 80,
               "category": "Furniture",
               "status": "inactive",
            },
            {
               "$id": "lamp",
               "$createdAt": "2024-05-04T09:00:00.000+00:00",
               "title": "Desk lamp",
               "price": 20,
               "category": "Lighting",
               "status": "active",
            },
         ],
         "listing_images": [
            { "listingId": "chair-75", "fileId": "chair-cover", "order": 0 },
         ],
      }))
      .unwrap()
   }

   fn engine(kv: Arc<MemoryKv>) -> SearchEngine<MemoryStore, UrlPreviews, Arc<MemoryKv>> {
      SearchEngine::from_config(&Config::default(), store(), UrlPreviews, kv)
   }

   #[tokio::test]
   async fn chair_search_returns_only_active_in_range() {
      let kv = Arc::new(MemoryKv::new());
      let engine = engine(kv.clone());

      let request = FilterRequest::new("chair")
         .category("Furniture")
         .price_range(Some(50.0), Some(100.0))
         .sort_by(SortBy::PriceAsc);
      let results = engine.search(&request).await.unwrap();

      assert_eq!(results.len(), 1);
      assert_eq!(results[0].listing.id, "chair-75");
      assert_eq!(results[0].listing.price, 75.0);
      assert_eq!(
         results[0].image_url.as_deref(),
         Some("https://cdn.test/listing-images/chair-cover")
      );
      assert_eq!(engine.recent().await, vec!["chair"]);
   }

   #[tokio::test]
   async fn empty_request_lists_active_by_recency_without_history() {
      let kv = Arc::new(MemoryKv::new());
      let engine = engine(kv.clone());

      let results = engine.search(&FilterRequest::default()).await.unwrap();
      let ids: Vec<&str> = results.iter().map(|r| r.listing.id.as_str()).collect();

      assert_eq!(ids, vec!["lamp", "chair-75"]);
      assert_eq!(results[0].image_url, None);
      assert_eq!(kv.read(RECENT_KEY).await.unwrap(), None);
   }

   #[tokio::test]
   async fn recency_honors_timestamp_offsets() {
      let listing = |id: &str, created_at: &str| {
         json!({
            "$id": id,
            "$createdAt": created_at,
            "title": "Armchair",
            "price": 40,
            "category": "Furniture",
            "status": "active",
         })
      };
      let store = MemoryStore::from_json(json!({
         "listings": [
            listing("older", "2024-05-02T10:00:00.000+05:00"),
            listing("newer", "2024-05-02T09:00:00.000+00:00"),
         ],
      }))
      .unwrap();
      let engine =
         SearchEngine::from_config(&Config::default(), store, UrlPreviews, Arc::new(MemoryKv::new()));

      let results = engine.search(&FilterRequest::default()).await.unwrap();
      let ids: Vec<&str> = results.iter().map(|r| r.listing.id.as_str()).collect();
      assert_eq!(ids, vec!["newer", "older"]);
   }

   #[tokio::test]
   async fn clear_recent_forgets_terms() {
      let engine = engine(Arc::new(MemoryKv::new()));
      engine.search(&FilterRequest::new("Lamp")).await.unwrap();
      assert_eq!(engine.recent().await, vec!["lamp"]);

      engine.clear_recent().await;
      assert!(engine.recent().await.is_empty());
   }

   #[tokio::test]
   async fn listing_hides_inactive() {
      let engine = engine(Arc::new(MemoryKv::new()));

      let found = engine.listing("chair-75").await.unwrap();
      assert!(found.image_url.is_some());

      let err = engine.listing("chair-80").await.unwrap_err();
      assert!(matches!(err, Error::NotFound { .. }));
   }

   struct DownStore;

   #[async_trait::async_trait]
   impl DocumentStore for DownStore {
      async fn list_documents(&self, _: &str, _: &[Predicate]) -> Result<Vec<Document>> {
         Err(Error::Store { op: "list", status: 502, message: "bad gateway".to_string() })
      }

      async fn get_document(&self, collection: &str, id: &str) -> Result<Document> {
         Err(Error::NotFound { collection: collection.to_string(), id: id.to_string() })
      }
   }

   #[tokio::test]
   async fn failed_search_propagates_and_skips_history() {
      let kv = Arc::new(MemoryKv::new());
      let engine = SearchEngine::from_config(&Config::default(), DownStore, UrlPreviews, kv);

      let err = engine.search(&FilterRequest::new("chair")).await.unwrap_err();
      assert!(matches!(err, Error::SearchFailed { .. }));
      assert!(engine.recent().await.is_empty());
   }
}
