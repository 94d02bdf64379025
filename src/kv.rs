//! Small persisted key-value stores holding JSON text.

use std::{collections::HashMap, io::ErrorKind, path::PathBuf};

use parking_lot::Mutex;

use crate::Result;

#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
   async fn read(&self, key: &str) -> Result<Option<String>>;

   async fn write(&self, key: &str, value: &str) -> Result<()>;

   async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait::async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
   async fn read(&self, key: &str) -> Result<Option<String>> {
      (**self).read(key).await
   }

   async fn write(&self, key: &str, value: &str) -> Result<()> {
      (**self).write(key, value).await
   }

   async fn remove(&self, key: &str) -> Result<()> {
      (**self).remove(key).await
   }
}

/// One `<key>.json` file per key under a directory.
pub struct FileKv {
   dir: PathBuf,
}

impl FileKv {
   pub fn new(dir: impl Into<PathBuf>) -> Self {
      Self { dir: dir.into() }
   }

   fn path(&self, key: &str) -> PathBuf {
      let name: String = key
         .chars()
         .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
         .collect();
      self.dir.join(format!("{name}.json"))
   }
}

#[async_trait::async_trait]
impl KeyValueStore for FileKv {
   async fn read(&self, key: &str) -> Result<Option<String>> {
      match tokio::fs::read_to_string(self.path(key)).await {
         Ok(content) => Ok(Some(content)),
         Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
         Err(e) => Err(e.into()),
      }
   }

   async fn write(&self, key: &str, value: &str) -> Result<()> {
      tokio::fs::create_dir_all(&self.dir).await?;

      let path = self.path(key);
      let tmp = path.with_extension("json.tmp");
      tokio::fs::write(&tmp, value).await?;
      tokio::fs::rename(&tmp, &path).await?;
      Ok(())
   }

   async fn remove(&self, key: &str) -> Result<()> {
      match tokio::fs::remove_file(self.path(key)).await {
         Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
         _ => Ok(()),
      }
   }
}

#[derive(Default)]
pub struct MemoryKv {
   entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
   pub fn new() -> Self {
      Self::default()
   }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKv {
   async fn read(&self, key: &str) -> Result<Option<String>> {
      Ok(self.entries.lock().get(key).cloned())
   }

   async fn write(&self, key: &str, value: &str) -> Result<()> {
      self.entries.lock().insert(key.to_string(), value.to_string());
      Ok(())
   }

   async fn remove(&self, key: &str) -> Result<()> {
      self.entries.lock().remove(key);
      Ok(())
   }
}
