//! Document store backed by the backend's REST databases API.

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use super::DocumentStore;
use crate::{
   config::Config,
   error::{Error, Result},
   query::Predicate,
   types::Document,
};

#[derive(Deserialize)]
struct DocumentList {
   #[serde(default)]
   documents: Vec<Document>,
}

#[derive(Deserialize)]
struct ErrorBody {
   message: String,
}

pub struct HttpStore {
   client:   Client,
   endpoint: Url,
   project:  String,
   api_key:  Option<String>,
   database: String,
}

impl HttpStore {
   pub fn new(config: &Config) -> Result<Self> {
      let client = Client::builder()
         .timeout(config.request_timeout())
         .build()?;
      let endpoint = Url::parse(config.endpoint.trim_end_matches('/'))
         .map_err(|e| Error::Endpoint(format!("{}: {e}", config.endpoint)))?;

      Ok(Self {
         client,
         endpoint,
         project: config.project.clone(),
         api_key: config.api_key.clone(),
         database: config.database.clone(),
      })
   }

   fn documents_url(&self, collection: &str, id: Option<&str>) -> Result<Url> {
      let mut url = self.endpoint.clone();
      {
         let mut segments = url
            .path_segments_mut()
            .map_err(|()| Error::Endpoint(format!("{} cannot be a base", self.endpoint)))?;
         segments
            .pop_if_empty()
            .extend(["databases", self.database.as_str(), "collections", collection, "documents"]);
         if let Some(id) = id {
            segments.push(id);
         }
      }
      Ok(url)
   }

   fn list_url(&self, collection: &str, predicates: &[Predicate]) -> Result<Url> {
      let mut url = self.documents_url(collection, None)?;
      if !predicates.is_empty() {
         let mut pairs = url.query_pairs_mut();
         for predicate in predicates {
            pairs.append_pair("queries[]", &predicate.to_wire()?);
         }
      }
      Ok(url)
   }

   fn request(&self, url: Url) -> RequestBuilder {
      let builder = self
         .client
         .get(url)
         .header("X-Appwrite-Project", &self.project)
         .header("Content-Type", "application/json");
      match &self.api_key {
         Some(key) => builder.header("X-Appwrite-Key", key),
         None => builder,
      }
   }
}

async fn check(op: &'static str, response: Response) -> Result<Response> {
   let status = response.status();
   if status.is_success() {
      return Ok(response);
   }

   let text = response.text().await.unwrap_or_default();
   let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.message);
   Err(Error::Store { op, status: status.as_u16(), message })
}

#[async_trait::async_trait]
impl DocumentStore for HttpStore {
   async fn list_documents(
      &self,
      collection: &str,
      predicates: &[Predicate],
   ) -> Result<Vec<Document>> {
      let url = self.list_url(collection, predicates)?;
      tracing::debug!("listing {collection} with {} predicates", predicates.len());

      let response = check("list", self.request(url).send().await?).await?;
      let list: DocumentList = response.json().await?;
      Ok(list.documents)
   }

   async fn get_document(&self, collection: &str, id: &str) -> Result<Document> {
      let url = self.documents_url(collection, Some(id))?;
      let response = self.request(url).send().await?;

      if response.status() == StatusCode::NOT_FOUND {
         return Err(Error::NotFound { collection: collection.to_string(), id: id.to_string() });
      }

      let response = check("get", response).await?;
      Ok(response.json().await?)
   }
}
