//! Typed filter request accepted by the search engine.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire value meaning "no constraint on this field".
pub const ALL: &str = "All";

/// A single-value filter that is either unconstrained or pinned to one value.
///
/// Serializes to the backend's `"All"` sentinel when unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Facet {
   #[default]
   All,
   Only(String),
}

impl Facet {
   pub fn only(value: impl Into<String>) -> Self {
      Self::Only(value.into())
   }

   pub fn value(&self) -> Option<&str> {
      match self {
         Self::All => None,
         Self::Only(value) => Some(value.as_str()),
      }
   }
}

impl FromStr for Facet {
   type Err = Infallible;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      let s = s.trim();
      if s.is_empty() || s == ALL {
         Ok(Self::All)
      } else {
         Ok(Self::Only(s.to_string()))
      }
   }
}

impl From<Option<String>> for Facet {
   fn from(value: Option<String>) -> Self {
      value.map_or(Self::All, |v| v.parse().unwrap_or_default())
   }
}

impl fmt::Display for Facet {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.value().unwrap_or(ALL))
   }
}

impl Serialize for Facet {
   fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      serializer.serialize_str(self.value().unwrap_or(ALL))
   }
}

impl<'de> Deserialize<'de> for Facet {
   fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
      Ok(Option::<String>::deserialize(deserializer)?.into())
   }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum SortBy {
   #[default]
   Recent,
   PriceAsc,
   PriceDesc,
}

impl SortBy {
   /// Parses a sort key; anything unrecognized sorts by recency.
   pub fn parse_lenient(s: &str) -> Self {
      match s.trim() {
         "priceAsc" | "price_asc" | "price-asc" => Self::PriceAsc,
         "priceDesc" | "price_desc" | "price-desc" => Self::PriceDesc,
         _ => Self::Recent,
      }
   }

   pub const fn as_str(self) -> &'static str {
      match self {
         Self::Recent => "recent",
         Self::PriceAsc => "priceAsc",
         Self::PriceDesc => "priceDesc",
      }
   }
}

impl From<String> for SortBy {
   fn from(value: String) -> Self {
      Self::parse_lenient(&value)
   }
}

impl FromStr for SortBy {
   type Err = Infallible;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      Ok(Self::parse_lenient(s))
   }
}

impl fmt::Display for SortBy {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.as_str())
   }
}

/// Search and filter input.
///
/// `min_price`/`max_price` are inclusive; `None` means no bound (a bound of
/// `0.0` is a real bound). Ordering of the two bounds is not validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterRequest {
   pub term:      String,
   pub category:  Facet,
   pub min_price: Option<f64>,
   pub max_price: Option<f64>,
   pub condition: Facet,
   pub sort_by:   SortBy,
}

impl FilterRequest {
   pub fn new(term: impl Into<String>) -> Self {
      Self { term: term.into(), ..Self::default() }
   }

   pub fn category(mut self, category: impl Into<String>) -> Self {
      self.category = Facet::only(category);
      self
   }

   pub fn condition(mut self, condition: impl Into<String>) -> Self {
      self.condition = Facet::only(condition);
      self
   }

   pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
      self.min_price = min;
      self.max_price = max;
      self
   }

   pub fn sort_by(mut self, sort_by: SortBy) -> Self {
      self.sort_by = sort_by;
      self
   }

   /// The trimmed search term, or `None` when blank.
   pub fn trimmed_term(&self) -> Option<&str> {
      let term = self.term.trim();
      (!term.is_empty()).then_some(term)
   }
}
