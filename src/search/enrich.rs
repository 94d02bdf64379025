//! Attaches preview image URLs to listings, isolating per-listing failures.

use futures::future::join_all;

use crate::{
   Result,
   config::Config,
   preview::PreviewSource,
   query::Predicate,
   store::DocumentStore,
   types::{EnrichedListing, FIELD_LISTING_ID, FIELD_ORDER, Listing, ListingImage},
};

#[derive(Debug, Clone)]
pub struct ImageEnricher {
   collection: String,
   bucket:     String,
   size:       Option<(u32, u32)>,
}

impl ImageEnricher {
   pub fn new(
      collection: impl Into<String>,
      bucket: impl Into<String>,
      size: Option<(u32, u32)>,
   ) -> Self {
      Self { collection: collection.into(), bucket: bucket.into(), size }
   }

   pub fn from_config(config: &Config) -> Self {
      Self::new(&config.images_collection, &config.images_bucket, config.preview_size())
   }

   /// Enriches every listing concurrently. The output keeps the input order and
   /// always has the same length; a failed lookup yields `image_url: None`.
   pub async fn enrich<S, P>(
      &self,
      store: &S,
      previews: &P,
      listings: Vec<Listing>,
   ) -> Vec<EnrichedListing>
   where
      S: DocumentStore + ?Sized,
      P: PreviewSource + ?Sized,
   {
      join_all(
         listings
            .into_iter()
            .map(|listing| self.enrich_one(store, previews, listing)),
      )
      .await
   }

   pub async fn enrich_one<S, P>(&self, store: &S, previews: &P, listing: Listing) -> EnrichedListing
   where
      S: DocumentStore + ?Sized,
      P: PreviewSource + ?Sized,
   {
      let image_url = match self.cover_url(store, previews, &listing.id).await {
         Ok(url) => url,
         Err(e) => {
            tracing::warn!("no preview for listing {}: {e}", listing.id);
            None
         },
      };
      EnrichedListing { listing, image_url }
   }

   async fn cover_url<S, P>(&self, store: &S, previews: &P, listing_id: &str) -> Result<Option<String>>
   where
      S: DocumentStore + ?Sized,
      P: PreviewSource + ?Sized,
   {
      let predicates = [
         Predicate::equal(FIELD_LISTING_ID, listing_id),
         Predicate::order_asc(FIELD_ORDER),
         Predicate::limit(1),
      ];

      let Some(doc) = store
         .list_documents(&self.collection, &predicates)
         .await?
         .into_iter()
         .next()
      else {
         return Ok(None);
      };

      let image: ListingImage = serde_json::from_value(serde_json::Value::Object(doc))?;
      previews
         .preview_url(&self.bucket, &image.file_id, self.size)
         .map(Some)
   }
}
