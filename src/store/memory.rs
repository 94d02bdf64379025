//! In-process document store evaluating predicates locally.

use std::{cmp::Ordering, collections::HashMap, path::Path};

use chrono::DateTime;
use parking_lot::RwLock;
use serde_json::Value;

use super::DocumentStore;
use crate::{
   error::{Error, Result},
   query::Predicate,
   types::{Document, FIELD_ID},
};

#[derive(Default)]
pub struct MemoryStore {
   collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
   pub fn new() -> Self {
      Self::default()
   }

   /// Loads a fixture shaped as `{ "<collection>": [ { ...document }, ... ] }`.
   pub fn from_fixture(path: &Path) -> Result<Self> {
      let content = std::fs::read_to_string(path)?;
      Self::from_json(serde_json::from_str(&content)?)
   }

   pub fn from_json(value: Value) -> Result<Self> {
      let Value::Object(root) = value else {
         return Err(Error::Fixture("expected an object of collections".to_string()));
      };

      let store = Self::new();
      for (collection, docs) in root {
         let Value::Array(docs) = docs else {
            return Err(Error::Fixture(format!("collection `{collection}` is not an array")));
         };
         for doc in docs {
            let Value::Object(doc) = doc else {
               return Err(Error::Fixture(format!("non-object document in `{collection}`")));
            };
            store.insert(&collection, doc);
         }
      }
      Ok(store)
   }

   pub fn insert(&self, collection: &str, doc: Document) {
      self
         .collections
         .write()
         .entry(collection.to_string())
         .or_default()
         .push(doc);
   }

   pub fn len(&self, collection: &str) -> usize {
      self.collections.read().get(collection).map_or(0, Vec::len)
   }

   pub fn is_empty(&self, collection: &str) -> bool {
      self.len(collection) == 0
   }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
   async fn list_documents(
      &self,
      collection: &str,
      predicates: &[Predicate],
   ) -> Result<Vec<Document>> {
      let collections = self.collections.read();
      let Some(docs) = collections.get(collection) else {
         return Ok(Vec::new());
      };

      let mut matched: Vec<Document> = docs
         .iter()
         .filter(|doc| predicates.iter().all(|p| matches(doc, p)))
         .cloned()
         .collect();

      let orderings: Vec<&Predicate> = predicates.iter().filter(|p| p.is_ordering()).collect();
      if !orderings.is_empty() {
         matched.sort_by(|a, b| {
            orderings
               .iter()
               .fold(Ordering::Equal, |acc, p| acc.then_with(|| order_by(a, b, p)))
         });
      }

      if let Some(limit) = predicates.iter().rev().find_map(|p| match p {
         Predicate::Limit(n) => Some(*n),
         _ => None,
      }) {
         matched.truncate(limit);
      }

      Ok(matched)
   }

   async fn get_document(&self, collection: &str, id: &str) -> Result<Document> {
      self
         .collections
         .read()
         .get(collection)
         .and_then(|docs| {
            docs
               .iter()
               .find(|doc| doc.get(FIELD_ID).and_then(Value::as_str) == Some(id))
         })
         .cloned()
         .ok_or_else(|| Error::NotFound { collection: collection.to_string(), id: id.to_string() })
   }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
   haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches(doc: &Document, predicate: &Predicate) -> bool {
   match predicate {
      Predicate::Equal { attribute, value } => doc
         .get(attribute)
         .and_then(|field| compare(field, value))
         .is_some_and(Ordering::is_eq),
      Predicate::GreaterThanEqual { attribute, value } => doc
         .get(attribute)
         .and_then(|field| compare(field, value))
         .is_some_and(Ordering::is_ge),
      Predicate::LessThanEqual { attribute, value } => doc
         .get(attribute)
         .and_then(|field| compare(field, value))
         .is_some_and(Ordering::is_le),
      Predicate::Contains { attribute, value } => doc
         .get(attribute)
         .and_then(Value::as_str)
         .is_some_and(|field| contains_ci(field, value)),
      Predicate::OrderAsc(_) | Predicate::OrderDesc(_) | Predicate::Limit(_) => true,
   }
}

/// Numbers compare by value and RFC 3339 timestamps by instant, so `75`
/// equals `75.0` and offsets are honored.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
   match (a, b) {
      (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
      (Value::String(a), Value::String(b)) => {
         match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
            (Ok(x), Ok(y)) => Some(x.cmp(&y)),
            _ => Some(a.cmp(b)),
         }
      },
      (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
      _ => None,
   }
}

/// Missing or incomparable fields sort last in either direction.
fn order_by(a: &Document, b: &Document, predicate: &Predicate) -> Ordering {
   let (attribute, descending) = match predicate {
      Predicate::OrderAsc(attribute) => (attribute, false),
      Predicate::OrderDesc(attribute) => (attribute, true),
      _ => return Ordering::Equal,
   };

   match (a.get(attribute), b.get(attribute)) {
      (Some(x), Some(y)) => {
         let ord = compare(x, y).unwrap_or(Ordering::Equal);
         if descending { ord.reverse() } else { ord }
      },
      (Some(_), None) => Ordering::Less,
      (None, Some(_)) => Ordering::Greater,
      (None, None) => Ordering::Equal,
   }
}

#[cfg(test)]
mod tests {
   use serde_json::json;

   use super::*;

   fn store() -> MemoryStore {
      MemoryStore::from_json(json!({
         "listings": [
            { "$id": "a", "title": "Oak Chair", "price": 75, "status": "active" },
            { "$id": "b", "title": "Desk", "price": 120.5, "status": "active" },
            { "$id": "c", "title": "chair cushion", "price": 12, "status": "inactive" },
            { "$id": "d", "title": "Bookshelf", "status": "active" },
         ]
      }))
      .unwrap()
   }

   fn ids(docs: &[Document]) -> Vec<&str> {
      docs.iter().map(|d| d[FIELD_ID].as_str().unwrap()).collect()
   }

   #[tokio::test]
   async fn filters_are_anded() {
      let store = store();
      let docs = store
         .list_documents("listings", &[
            Predicate::equal("status", "active"),
            Predicate::contains("title", "CHAIR"),
         ])
         .await
         .unwrap();
      assert_eq!(ids(&docs), vec!["a"]);
   }

   #[tokio::test]
   async fn range_compares_numbers_and_skips_missing() {
      let store = store();
      let docs = store
         .list_documents("listings", &[
            Predicate::greater_than_equal("price", 12),
            Predicate::less_than_equal("price", 75.0),
            Predicate::order_asc("price"),
         ])
         .await
         .unwrap();
      assert_eq!(ids(&docs), vec!["c", "a"]);
   }

   #[tokio::test]
   async fn order_desc_puts_missing_last_then_limits() {
      let store = store();
      let docs = store
         .list_documents("listings", &[Predicate::order_desc("price"), Predicate::limit(3)])
         .await
         .unwrap();
      assert_eq!(ids(&docs), vec!["b", "a", "c"]);
   }

   #[tokio::test]
   async fn equal_matches_numbers_across_representations() {
      let store = store();
      let docs = store
         .list_documents("listings", &[Predicate::equal("price", 75.0)])
         .await
         .unwrap();
      assert_eq!(ids(&docs), vec!["a"]);

      let docs = store
         .list_documents("listings", &[Predicate::equal("price", "75")])
         .await
         .unwrap();
      assert!(docs.is_empty());
   }

   #[tokio::test]
   async fn timestamps_order_by_instant_across_offsets() {
      let store = MemoryStore::from_json(json!({
         "listings": [
            { "$id": "older", "$createdAt": "2024-05-02T10:00:00.000+05:00" },
            { "$id": "newer", "$createdAt": "2024-05-02T09:00:00.000+00:00" },
            { "$id": "oldest", "$createdAt": "2024-05-01T23:30:00.000-01:00" },
         ]
      }))
      .unwrap();

      let docs = store
         .list_documents("listings", &[Predicate::order_desc("$createdAt")])
         .await
         .unwrap();
      assert_eq!(ids(&docs), vec!["newer", "older", "oldest"]);

      let docs = store
         .list_documents("listings", &[Predicate::greater_than_equal(
            "$createdAt",
            "2024-05-02T05:00:00Z",
         )])
         .await
         .unwrap();
      assert_eq!(ids(&docs), vec!["older", "newer"]);
   }

   #[tokio::test]
   async fn unknown_collection_is_empty() {
      let docs = store().list_documents("nope", &[]).await.unwrap();
      assert!(docs.is_empty());
   }

   #[tokio::test]
   async fn get_document_by_id() {
      let store = store();
      let doc = store.get_document("listings", "b").await.unwrap();
      assert_eq!(doc["title"], "Desk");

      let err = store.get_document("listings", "zzz").await.unwrap_err();
      assert!(matches!(err, Error::NotFound { .. }));
   }

   #[test]
   fn fixture_must_be_collections() {
      assert!(MemoryStore::from_json(json!([1, 2])).is_err());
      assert!(MemoryStore::from_json(json!({ "listings": {} })).is_err());
      assert_eq!(store().len("listings"), 4);
   }
}
