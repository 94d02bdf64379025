use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
   #[error("search in `{collection}` failed")]
   SearchFailed {
      collection: String,
      #[source]
      source:     Box<Error>,
   },

   #[error("store {op} request failed with status {status}: {message}")]
   Store { op: &'static str, status: u16, message: String },

   #[error("document `{id}` not found in `{collection}`")]
   NotFound { collection: String, id: String },

   #[error("invalid endpoint {0}")]
   Endpoint(String),

   #[error("http error: {0}")]
   Http(#[from] reqwest::Error),

   #[error("json error: {0}")]
   Json(#[from] serde_json::Error),

   #[error("io error: {0}")]
   Io(#[from] std::io::Error),

   #[error("config error: {0}")]
   Config(#[from] Box<figment::Error>),

   #[error("cannot derive preview url: {0}")]
   Preview(String),

   #[error("failed to persist `{key}`: {reason}")]
   Persistence { key: String, reason: String },

   #[error("invalid fixture: {0}")]
   Fixture(String),
}

impl From<figment::Error> for Error {
   fn from(err: figment::Error) -> Self {
      Self::Config(Box::new(err))
   }
}

impl Error {
   pub fn search_failed(collection: impl Into<String>, source: Self) -> Self {
      Self::SearchFailed { collection: collection.into(), source: Box::new(source) }
   }

   pub fn persistence(key: &str, reason: impl ToString) -> Self {
      Self::Persistence { key: key.to_string(), reason: reason.to_string() }
   }
}
