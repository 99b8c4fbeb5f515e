use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted contact-form submission
///
/// `created_at` is nullable because rows may predate the timestamp column;
/// such legacy rows sort as oldest in every listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Wire form of a create/update request body
///
/// All fields are optional at the serde level so that a missing field
/// surfaces as a validation error, not as a malformed-JSON error.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated, trimmed contact ready for insertion or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_contact_message_wire_shape() {
        let contact = ContactMessage {
            id: 7,
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            message: "hi".to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        };

        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "Ann");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_payload_tolerates_missing_fields() {
        let payload: ContactPayload = serde_json::from_str(r#"{"name": "Ann"}"#).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Ann"));
        assert_eq!(payload.email, None);
        assert_eq!(payload.message, None);
    }
}
