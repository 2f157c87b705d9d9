//! QR code metadata model.
//!
//! # Responsibility
//! - Describe one generated QR code and the request it was built from.
//! - Provide access-policy helpers (expiry, password protection).
//!
//! # Invariants
//! - `data` holds the JSON generation request without the password field.
//! - `password_hash`, when set, is an Argon2 PHC string.
//! - `views` only ever grows.

use serde::{Deserialize, Serialize};

pub type QrCodeId = i64;

/// Kind of payload encoded in a QR code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrType {
    /// URL, optionally rewritten when it points at Dropbox.
    #[default]
    Link,
    /// Free text.
    Text,
    /// vCard 3.0 contact.
    Vcard,
    /// iCalendar `VEVENT`.
    Event,
    /// `geo:` URI.
    Location,
}

impl QrType {
    pub const ALL: [QrType; 5] = [
        QrType::Link,
        QrType::Text,
        QrType::Vcard,
        QrType::Event,
        QrType::Location,
    ];

    /// Storage and wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Text => "text",
            Self::Vcard => "vcard",
            Self::Event => "event",
            Self::Location => "location",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
    }
}

/// Persisted QR code row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    pub id: QrCodeId,
    pub kind: QrType,
    pub data: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub user_id: i64,
    pub is_favorite: bool,
    pub password_hash: Option<String>,
    /// Unix epoch milliseconds; `None` never expires.
    pub expiry_date: Option<i64>,
    pub views: i64,
}

impl QrCode {
    /// Returns whether the code is past its expiry at `now_ms`.
    ///
    /// The expiry instant itself already counts as expired.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expiry_date.is_some_and(|expiry| now_ms >= expiry)
    }
}

/// Insert shape for a new QR code row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQrCode {
    pub kind: QrType,
    pub data: String,
    pub user_id: i64,
    pub password_hash: Option<String>,
    pub expiry_date: Option<i64>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::{QrCode, QrType};

    fn sample(expiry_date: Option<i64>) -> QrCode {
        QrCode {
            id: 1,
            kind: QrType::Link,
            data: "{}".to_string(),
            created_at: 0,
            user_id: 1,
            is_favorite: false,
            password_hash: None,
            expiry_date,
            views: 0,
        }
    }

    #[test]
    fn qr_type_labels_roundtrip() {
        for kind in QrType::ALL {
            assert_eq!(QrType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(QrType::parse("wifi"), None);
        assert_eq!(QrType::default(), QrType::Link);
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        assert!(!sample(None).is_expired_at(i64::MAX));
        assert!(!sample(Some(1_000)).is_expired_at(999));
        assert!(sample(Some(1_000)).is_expired_at(1_000));
    }
}
