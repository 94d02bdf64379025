//! Persisted history of recent search terms.
//!
//! The list is normalized (trimmed, lower-cased), unique, newest first and
//! capped at [`MAX_RECENT`]. It is stored as a JSON array under
//! [`RECENT_KEY`]. History is best effort: read failures degrade to an empty
//! list and clearing never fails from the caller's side.

use crate::{Result, error::Error, kv::KeyValueStore};

pub const RECENT_KEY: &str = "recent_searches";
pub const MAX_RECENT: usize = 10;

pub struct RecentSearches<K: KeyValueStore> {
   kv: K,
}

pub fn normalize(term: &str) -> Option<String> {
   let term = term.trim();
   (!term.is_empty()).then(|| term.to_lowercase())
}

impl<K: KeyValueStore> RecentSearches<K> {
   pub const fn new(kv: K) -> Self {
      Self { kv }
   }

   pub async fn load(&self) -> Vec<String> {
      let raw = match self.kv.read(RECENT_KEY).await {
         Ok(Some(raw)) => raw,
         Ok(None) => return Vec::new(),
         Err(e) => {
            tracing::warn!("failed to read recent searches: {e}");
            return Vec::new();
         },
      };

      match serde_json::from_str::<Vec<String>>(&raw) {
         Ok(mut terms) => {
            terms.truncate(MAX_RECENT);
            terms
         },
         Err(e) => {
            tracing::warn!("discarding unreadable recent searches: {e}");
            Vec::new()
         },
      }
   }

   /// Moves `term` to the front of the history and persists it.
   ///
   /// Blank terms leave the history untouched. A failed write is returned as
   /// [`Error::Persistence`] for the caller to surface or ignore. History that
   /// cannot be read or decoded counts as empty, so the stored list is
   /// replaced by `term` alone.
   pub async fn record_term(&self, term: &str) -> Result<Vec<String>> {
      let Some(term) = normalize(term) else {
         return Ok(self.load().await);
      };

      let mut terms = self.load().await;
      terms.retain(|t| *t != term);
      terms.insert(0, term);
      terms.truncate(MAX_RECENT);

      let encoded = serde_json::to_string(&terms)?;
      self
         .kv
         .write(RECENT_KEY, &encoded)
         .await
         .map_err(|e| Error::persistence(RECENT_KEY, e))?;

      Ok(terms)
   }

   pub async fn clear(&self) {
      if let Err(e) = self.kv.remove(RECENT_KEY).await {
         tracing::warn!("failed to clear recent searches: {e}");
      }
   }
}
