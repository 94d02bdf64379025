pub mod recent;
pub mod search;
pub mod show;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use marketsearch::{
   SearchEngine,
   config::{self, Config},
   kv::FileKv,
   preview::StoragePreviews,
   store::{DocumentStore, HttpStore, MemoryStore},
};

pub type Engine = SearchEngine<Arc<dyn DocumentStore>, StoragePreviews, FileKv>;

/// Builds the engine against the configured backend, or against a local JSON
/// fixture when one is given.
pub fn engine(config: &Config, fixture: Option<&Path>) -> Result<Engine> {
   let store: Arc<dyn DocumentStore> = match fixture {
      Some(path) => Arc::new(
         MemoryStore::from_fixture(path)
            .with_context(|| format!("failed to load fixture {}", path.display()))?,
      ),
      None => Arc::new(HttpStore::new(config).context("failed to create backend client")?),
   };
   let previews = StoragePreviews::new(config).context("failed to create preview source")?;
   let kv = FileKv::new(config::recent_dir(config));

   Ok(SearchEngine::from_config(config, store, previews, kv))
}
