pub mod http;
pub mod memory;

use std::sync::Arc;

use crate::{error::Result, query::Predicate, types::Document};

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
   /// Returns the documents of `collection` matching every predicate.
   async fn list_documents(&self, collection: &str, predicates: &[Predicate])
   -> Result<Vec<Document>>;

   async fn get_document(&self, collection: &str, id: &str) -> Result<Document>;
}

#[async_trait::async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
   async fn list_documents(
      &self,
      collection: &str,
      predicates: &[Predicate],
   ) -> Result<Vec<Document>> {
      (**self).list_documents(collection, predicates).await
   }

   async fn get_document(&self, collection: &str, id: &str) -> Result<Document> {
      (**self).get_document(collection, id).await
   }
}

pub use http::HttpStore;
pub use memory::MemoryStore;
