//! Translates a [`FilterRequest`] into store predicates and runs the query.

use crate::{
   error::{Error, Result},
   filter::{FilterRequest, SortBy},
   query::Predicate,
   store::DocumentStore,
   types::{
      FIELD_CATEGORY, FIELD_CONDITION, FIELD_CREATED_AT, FIELD_PRICE, FIELD_STATUS, FIELD_TITLE,
      Listing, ListingStatus,
   },
};

/// Builds the predicate list for `request`.
///
/// Clause order is fixed: status, term, category, min price, max price,
/// condition, sort. Only `status == active` listings are ever visible.
pub fn compose(request: &FilterRequest) -> Vec<Predicate> {
   let mut predicates = vec![Predicate::equal(FIELD_STATUS, ListingStatus::Active.as_str())];

   if let Some(term) = request.trimmed_term() {
      predicates.push(Predicate::contains(FIELD_TITLE, term));
   }

   if let Some(category) = request.category.value() {
      predicates.push(Predicate::equal(FIELD_CATEGORY, category));
   }

   if let Some(min) = request.min_price.filter(|p| p.is_finite()) {
      predicates.push(Predicate::greater_than_equal(FIELD_PRICE, min));
   }

   if let Some(max) = request.max_price.filter(|p| p.is_finite()) {
      predicates.push(Predicate::less_than_equal(FIELD_PRICE, max));
   }

   if let Some(condition) = request.condition.value() {
      predicates.push(Predicate::equal(FIELD_CONDITION, condition));
   }

   predicates.push(sort_predicate(request.sort_by));
   predicates
}

fn sort_predicate(sort_by: SortBy) -> Predicate {
   match sort_by {
      SortBy::PriceAsc => Predicate::order_asc(FIELD_PRICE),
      SortBy::PriceDesc => Predicate::order_desc(FIELD_PRICE),
      SortBy::Recent => Predicate::order_desc(FIELD_CREATED_AT),
   }
}

/// Runs the composed query against `collection`. Any store or decoding
/// failure surfaces as [`Error::SearchFailed`]; nothing is retried.
pub async fn execute<S: DocumentStore + ?Sized>(
   store: &S,
   collection: &str,
   request: &FilterRequest,
) -> Result<Vec<Listing>> {
   let predicates = compose(request);
   tracing::debug!("querying {collection}: {predicates:?}");

   let documents = store
      .list_documents(collection, &predicates)
      .await
      .map_err(|e| Error::search_failed(collection, e))?;

   documents
      .into_iter()
      .map(|doc| Listing::from_document(doc).map_err(|e| Error::search_failed(collection, e.into())))
      .collect()
}

#[cfg(test)]
mod tests {
   use serde_json::Value;

   use super::*;
   use crate::{filter::Facet, types::Document};

   fn has(predicates: &[Predicate], method: &str, attribute: &str) -> bool {
      predicates
         .iter()
         .any(|p| p.method() == method && p.attribute() == Some(attribute))
   }

   #[test]
   fn unconstrained_request_has_status_and_sort_only() {
      let predicates = compose(&FilterRequest::default());
      assert_eq!(predicates, vec![
         Predicate::equal("status", "active"),
         Predicate::order_desc("$createdAt"),
      ]);
   }

   #[test]
   fn explicit_all_sentinels_add_nothing() {
      let request = FilterRequest {
         term: "   ".to_string(),
         category: Facet::All,
         condition: "All".parse().unwrap(),
         ..FilterRequest::default()
      };
      assert_eq!(compose(&request).len(), 2);
   }

   #[test]
   fn term_is_trimmed_into_title_contains() {
      let predicates = compose(&FilterRequest::new("  red bike "));
      assert_eq!(predicates[1], Predicate::contains("title", "red bike"));
      assert!(!has(&predicates, "contains", "description"));
   }

   #[test]
   fn sort_direction_follows_request() {
      let asc = compose(&FilterRequest::default().sort_by(SortBy::PriceAsc));
      assert_eq!(asc.last(), Some(&Predicate::order_asc("price")));

      let desc = compose(&FilterRequest::default().sort_by(SortBy::PriceDesc));
      assert_eq!(desc.last(), Some(&Predicate::order_desc("price")));

      let unknown = compose(&FilterRequest::default().sort_by(SortBy::parse_lenient("newest")));
      assert_eq!(unknown.last(), Some(&Predicate::order_desc("$createdAt")));
   }

   #[test]
   fn zero_min_price_is_a_real_bound() {
      let predicates = compose(&FilterRequest::default().price_range(Some(0.0), None));
      assert!(predicates.contains(&Predicate::greater_than_equal("price", 0.0)));
      assert!(!has(&predicates, "lessThanEqual", "price"));
   }

   #[test]
   fn non_finite_prices_are_ignored() {
      let request = FilterRequest::default().price_range(Some(f64::NAN), Some(f64::INFINITY));
      assert_eq!(compose(&request).len(), 2);
   }

   #[test]
   fn full_request_keeps_fixed_order() {
      let request = FilterRequest::new("chair")
         .category("Furniture")
         .condition("Used")
         .price_range(Some(50.0), Some(100.0))
         .sort_by(SortBy::PriceAsc);

      let predicates = compose(&request);
      assert_eq!(predicates, vec![
         Predicate::equal("status", "active"),
         Predicate::contains("title", "chair"),
         Predicate::equal("category", "Furniture"),
         Predicate::greater_than_equal("price", 50.0),
         Predicate::less_than_equal("price", 100.0),
         Predicate::equal("condition", "Used"),
         Predicate::order_asc("price"),
      ]);
   }

   struct FailingStore;

   #[async_trait::async_trait]
   impl DocumentStore for FailingStore {
      async fn list_documents(&self, _: &str, _: &[Predicate]) -> Result<Vec<Document>> {
         Err(Error::Store { op: "list", status: 503, message: "unavailable".to_string() })
      }

      async fn get_document(&self, collection: &str, id: &str) -> Result<Document> {
         Err(Error::NotFound { collection: collection.to_string(), id: id.to_string() })
      }
   }

   #[tokio::test]
   async fn store_failure_becomes_search_failed() {
      let err = execute(&FailingStore, "listings", &FilterRequest::default())
         .await
         .unwrap_err();
      match err {
         Error::SearchFailed { collection, source } => {
            assert_eq!(collection, "listings");
            assert!(matches!(*source, Error::Store { status: 503, .. }));
         },
         other => panic!("expected SearchFailed, got {other:?}"),
      }
   }

   #[tokio::test]
   async fn malformed_document_fails_search() {
      let store = crate::store::MemoryStore::new();
      let mut doc = Document::new();
      doc.insert("status".to_string(), Value::from("active"));
      store.insert("listings", doc);

      let err = execute(&store, "listings", &FilterRequest::default())
         .await
         .unwrap_err();
      assert!(matches!(err, Error::SearchFailed { .. }));
   }
}
