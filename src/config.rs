use std::{
   path::{Path, PathBuf},
   time::Duration,
};

use directories::BaseDirs;
use figment::{
   Figment,
   providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Result;

pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

pub const LISTINGS_COLLECTION: &str = "listings";
pub const IMAGES_COLLECTION: &str = "listing_images";
pub const IMAGES_BUCKET: &str = "listing-images";

pub const PREVIEW_SIZE: u32 = 400;

pub const ENV_PREFIX: &str = "MARKETSEARCH_";

/// Backend and local storage settings.
///
/// Layered as defaults, then a TOML file, then `MARKETSEARCH_*` environment
/// variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
   pub endpoint:            String,
   pub project:             String,
   pub api_key:             Option<String>,
   pub database:            String,
   pub listings_collection: String,
   pub images_collection:   String,
   pub images_bucket:       String,
   pub preview_width:       u32,
   pub preview_height:      u32,
   pub request_timeout_ms:  u64,
   pub data_dir:            Option<PathBuf>,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         endpoint:            DEFAULT_ENDPOINT.to_string(),
         project:             String::new(),
         api_key:             None,
         database:            "marketplace".to_string(),
         listings_collection: LISTINGS_COLLECTION.to_string(),
         images_collection:   IMAGES_COLLECTION.to_string(),
         images_bucket:       IMAGES_BUCKET.to_string(),
         preview_width:       PREVIEW_SIZE,
         preview_height:      PREVIEW_SIZE,
         request_timeout_ms:  10_000,
         data_dir:            None,
      }
   }
}

impl Config {
   /// Loads the layered configuration. Without an explicit path the file at
   /// `<data_dir>/config.toml` is used if it exists.
   pub fn load(path: Option<&Path>) -> Result<Self> {
      let file = path.map_or_else(|| data_dir().join("config.toml"), Path::to_path_buf);
      Self::figment(&file).extract().map_err(Into::into)
   }

   fn figment(file: &Path) -> Figment {
      Figment::from(Serialized::defaults(Self::default()))
         .merge(Toml::file(file))
         .merge(Env::prefixed(ENV_PREFIX))
   }

   pub fn data_dir(&self) -> PathBuf {
      self.data_dir.clone().unwrap_or_else(data_dir)
   }

   pub fn request_timeout(&self) -> Duration {
      Duration::from_millis(self.request_timeout_ms)
   }

   pub const fn preview_size(&self) -> Option<(u32, u32)> {
      if self.preview_width == 0 || self.preview_height == 0 {
         None
      } else {
         Some((self.preview_width, self.preview_height))
      }
   }
}

pub fn data_dir() -> PathBuf {
   BaseDirs::new().map_or_else(
      || PathBuf::from(".marketsearch"),
      |dirs| dirs.home_dir().join(".marketsearch"),
   )
}

pub fn recent_dir(config: &Config) -> PathBuf {
   config.data_dir().join("recent")
}
