//! Query predicates understood by the document store.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
   Equal { attribute: String, value: Value },
   GreaterThanEqual { attribute: String, value: Value },
   LessThanEqual { attribute: String, value: Value },
   /// Substring match on a string attribute.
   Contains { attribute: String, value: String },
   OrderAsc(String),
   OrderDesc(String),
   Limit(usize),
}

/// JSON form sent to the backend in `queries[]`.
#[derive(Debug, Serialize)]
struct WireQuery<'a> {
   method:    &'static str,
   #[serde(skip_serializing_if = "Option::is_none")]
   attribute: Option<&'a str>,
   #[serde(skip_serializing_if = "Vec::is_empty")]
   values:    Vec<Value>,
}

impl Predicate {
   pub fn equal(attribute: &str, value: impl Into<Value>) -> Self {
      Self::Equal { attribute: attribute.to_string(), value: value.into() }
   }

   pub fn greater_than_equal(attribute: &str, value: impl Into<Value>) -> Self {
      Self::GreaterThanEqual { attribute: attribute.to_string(), value: value.into() }
   }

   pub fn less_than_equal(attribute: &str, value: impl Into<Value>) -> Self {
      Self::LessThanEqual { attribute: attribute.to_string(), value: value.into() }
   }

   pub fn contains(attribute: &str, value: impl Into<String>) -> Self {
      Self::Contains { attribute: attribute.to_string(), value: value.into() }
   }

   pub fn order_asc(attribute: &str) -> Self {
      Self::OrderAsc(attribute.to_string())
   }

   pub fn order_desc(attribute: &str) -> Self {
      Self::OrderDesc(attribute.to_string())
   }

   pub const fn limit(n: usize) -> Self {
      Self::Limit(n)
   }

   pub const fn method(&self) -> &'static str {
      match self {
         Self::Equal { .. } => "equal",
         Self::GreaterThanEqual { .. } => "greaterThanEqual",
         Self::LessThanEqual { .. } => "lessThanEqual",
         Self::Contains { .. } => "contains",
         Self::OrderAsc(_) => "orderAsc",
         Self::OrderDesc(_) => "orderDesc",
         Self::Limit(_) => "limit",
      }
   }

   pub fn attribute(&self) -> Option<&str> {
      match self {
         Self::Equal { attribute, .. }
         | Self::GreaterThanEqual { attribute, .. }
         | Self::LessThanEqual { attribute, .. }
         | Self::Contains { attribute, .. } => Some(attribute.as_str()),
         Self::OrderAsc(attribute) | Self::OrderDesc(attribute) => Some(attribute.as_str()),
         Self::Limit(_) => None,
      }
   }

   pub const fn is_ordering(&self) -> bool {
      matches!(self, Self::OrderAsc(_) | Self::OrderDesc(_))
   }

   pub fn to_wire(&self) -> serde_json::Result<String> {
      let values = match self {
         Self::Equal { value, .. }
         | Self::GreaterThanEqual { value, .. }
         | Self::LessThanEqual { value, .. } => vec![value.clone()],
         Self::Contains { value, .. } => vec![Value::from(value.as_str())],
         Self::Limit(n) => vec![Value::from(*n)],
         Self::OrderAsc(_) | Self::OrderDesc(_) => Vec::new(),
      };

      let wire = WireQuery { method: self.method(), attribute: self.attribute(), values };
      serde_json::to_string(&wire)
   }
}
