//! Preview URL derivation for files held in storage buckets.

use reqwest::Url;

use crate::{
   config::Config,
   error::{Error, Result},
};

pub trait PreviewSource: Send + Sync {
   /// Returns a fetchable preview URL, optionally resized to `(width, height)`.
   fn preview_url(&self, bucket: &str, file_id: &str, size: Option<(u32, u32)>) -> Result<String>;
}

impl<T: PreviewSource + ?Sized> PreviewSource for std::sync::Arc<T> {
   fn preview_url(&self, bucket: &str, file_id: &str, size: Option<(u32, u32)>) -> Result<String> {
      (**self).preview_url(bucket, file_id, size)
   }
}

pub struct StoragePreviews {
   endpoint: Url,
   project:  String,
}

impl StoragePreviews {
   pub fn new(config: &Config) -> Result<Self> {
      let endpoint = Url::parse(config.endpoint.trim_end_matches('/'))
         .map_err(|e| Error::Endpoint(format!("{}: {e}", config.endpoint)))?;
      Ok(Self { endpoint, project: config.project.clone() })
   }
}

impl PreviewSource for StoragePreviews {
   fn preview_url(&self, bucket: &str, file_id: &str, size: Option<(u32, u32)>) -> Result<String> {
      if bucket.is_empty() || file_id.is_empty() {
         return Err(Error::Preview(format!("missing bucket or file id ({bucket:?}, {file_id:?})")));
      }

      let mut url = self.endpoint.clone();
      url.path_segments_mut()
         .map_err(|()| Error::Preview(format!("{} cannot be a base", self.endpoint)))?
         .pop_if_empty()
         .extend(["storage", "buckets", bucket, "files", file_id, "preview"]);

      {
         let mut pairs = url.query_pairs_mut();
         pairs.append_pair("project", &self.project);
         if let Some((width, height)) = size {
            pairs
               .append_pair("width", &width.to_string())
               .append_pair("height", &height.to_string());
         }
      }

      Ok(url.into())
   }
}
