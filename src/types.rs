use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw backend document: a JSON object including the `$id` and `$createdAt`
/// system fields.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub const FIELD_ID: &str = "$id";
pub const FIELD_CREATED_AT: &str = "$createdAt";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_CONDITION: &str = "condition";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_LISTING_ID: &str = "listingId";
pub const FIELD_ORDER: &str = "order";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
   Active,
   Inactive,
}

impl ListingStatus {
   pub const fn as_str(self) -> &'static str {
      match self {
         Self::Active => "active",
         Self::Inactive => "inactive",
      }
   }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
   #[serde(rename = "$id")]
   pub id:          String,
   pub title:       String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub description: Option<String>,
   pub price:       f64,
   pub category:    String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub condition:   Option<String>,
   pub status:      ListingStatus,
   #[serde(rename = "$createdAt")]
   pub created_at:  DateTime<Utc>,
   #[serde(default, rename = "sellerId", skip_serializing_if = "Option::is_none")]
   pub seller_id:   Option<String>,
}

impl Listing {
   pub fn from_document(doc: Document) -> serde_json::Result<Self> {
      serde_json::from_value(serde_json::Value::Object(doc))
   }

   pub fn is_active(&self) -> bool {
      self.status == ListingStatus::Active
   }
}

/// Image record attached to a listing; `order` 0 is the cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingImage {
   pub listing_id: String,
   pub file_id:    String,
   #[serde(default)]
   pub order:      i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedListing {
   #[serde(flatten)]
   pub listing:   Listing,
   #[serde(rename = "imageUrl")]
   pub image_url: Option<String>,
}
