//! Document shapes stored in the hosted database.
//!
//! These mirror what the browser glue reads and writes: listing items,
//! buyer contact requests, and per-user admin flags. Field names are
//! camelCase on the wire.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Validation failures for documents built from form input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Price as entered by the seller.
///
/// Older documents store a number, newer ones whatever was typed into the
/// form, and some have no price at all. Numeric strings such as `"$1,200"`
/// are read as amounts; anything else is kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Price {
    #[default]
    Unpriced,
    Amount(f64),
    Text(String),
}

impl Price {
    /// Parse free-form price text.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Price::Unpriced;
        }
        let numeric: String = trimmed
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        match numeric.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount >= 0.0 => Price::Amount(amount),
            _ => Price::Text(trimmed.to_string()),
        }
    }

    /// Numeric amount, if there is one.
    pub fn amount(&self) -> Option<f64> {
        match self {
            Price::Amount(amount) => Some(*amount),
            _ => None,
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Unpriced => serializer.serialize_none(),
            Price::Amount(amount) => serializer.serialize_f64(*amount),
            Price::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Price::Unpriced,
            Some(Raw::Number(n)) if n.is_finite() => Price::Amount(n),
            Some(Raw::Number(_)) => Price::Unpriced,
            Some(Raw::Text(text)) => Price::parse(&text),
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Unpriced => Ok(()),
            Price::Amount(amount) if amount.fract() == 0.0 => write!(f, "${amount:.0}"),
            Price::Amount(amount) => write!(f, "${amount:.2}"),
            Price::Text(text) => f.write_str(text),
        }
    }
}

/// A listed item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
    /// Document id; not stored inside the document itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub price: Price,
    /// Image host URLs in display order; the first is the cover photo.
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_link: Option<String>,
}

impl Item {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Lifecycle of a buyer's contact request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    New,
    Contacted,
    Pending,
    Sold,
    Declined,
}

impl RequestStatus {
    /// Whether the request still needs attention from the seller.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            RequestStatus::New | RequestStatus::Contacted | RequestStatus::Pending
        )
    }
}

/// A buyer asking about an item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactRequest {
    pub user_id: String,
    pub user_email: String,
    pub contact_name: String,
    pub contact_info: String,
    pub note: String,
    pub item_id: String,
    pub item_name: String,
    pub status: RequestStatus,
    /// Milliseconds since the Unix epoch.
    pub created_at: Option<i64>,
}

impl ContactRequest {
    /// Check the fields the request form requires.
    pub fn validate(&self) -> Result<(), RecordError> {
        let required = [
            ("userId", &self.user_id),
            ("contactName", &self.contact_name),
            ("contactInfo", &self.contact_info),
            ("itemId", &self.item_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(RecordError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Per-user flags, keyed by the auth provider's user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_from_number() {
        let item: Item = serde_json::from_str(r#"{"name": "Lamp", "price": 25}"#).unwrap();
        assert_eq!(item.price, Price::Amount(25.0));
    }

    #[test]
    fn test_price_from_numeric_string() {
        let item: Item = serde_json::from_str(r#"{"price": " $1,200.50 "}"#).unwrap();
        assert_eq!(item.price.amount(), Some(1200.5));
    }

    #[test]
    fn test_price_null_and_missing() {
        let item: Item = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(item.price, Price::Unpriced);
        let item: Item = serde_json::from_str("{}").unwrap();
        assert_eq!(item.price, Price::Unpriced);
    }

    #[test]
    fn test_price_free_text_kept() {
        assert_eq!(Price::parse("Make an offer"), Price::Text("Make an offer".to_string()));
        assert_eq!(Price::parse("   "), Price::Unpriced);
        assert_eq!(Price::parse("-5"), Price::Text("-5".to_string()));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::Amount(40.0).to_string(), "$40");
        assert_eq!(Price::Amount(12.5).to_string(), "$12.50");
        assert_eq!(Price::Text("Free".to_string()).to_string(), "Free");
        assert_eq!(Price::Unpriced.to_string(), "");
    }

    #[test]
    fn test_item_round_trip_shape() {
        let json = r#"{
            "name": "Desk",
            "price": "80",
            "images": ["https://img.example/a.jpg", "https://img.example/b.jpg"],
            "tags": ["furniture"],
            "description": "Solid oak",
            "productLink": "https://shop.example/desk"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.cover_image(), Some("https://img.example/a.jpg"));
        assert_eq!(item.product_link.as_deref(), Some("https://shop.example/desk"));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["price"], 80.0);
        assert_eq!(value["productLink"], "https://shop.example/desk");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_request_status() {
        let req: ContactRequest = serde_json::from_str(r#"{"status": "pending"}"#).unwrap();
        assert_eq!(req.status, RequestStatus::Pending);
        assert!(req.status.is_open());
        assert!(!RequestStatus::Sold.is_open());
        assert!(!RequestStatus::Declined.is_open());
        assert!(serde_json::from_str::<RequestStatus>(r#""archived""#).is_err());
    }

    #[test]
    fn test_request_validation() {
        let mut req = ContactRequest {
            user_id: "u1".to_string(),
            contact_name: "Sam".to_string(),
            contact_info: "sam@example.com".to_string(),
            item_id: "item-9".to_string(),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        req.contact_info = "  ".to_string();
        assert_eq!(req.validate(), Err(RecordError::MissingField("contactInfo")));
    }

    #[test]
    fn test_user_profile_defaults_to_non_admin() {
        let user: UserProfile = serde_json::from_str("{}").unwrap();
        assert!(!user.is_admin);
        let admin: UserProfile = serde_json::from_str(r#"{"isAdmin": true}"#).unwrap();
        assert!(admin.is_admin);
    }
}
