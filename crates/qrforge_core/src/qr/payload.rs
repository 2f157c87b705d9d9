//! Generation request shape and payload text builders.
//!
//! # Invariants
//! - `GenerateRequest` never serializes `password`; the serialized request is
//!   what gets stored in `qr_codes.data`.
//! - Link payloads pass through `modify_dropbox_link`.

use super::dropbox::modify_dropbox_link;
use super::QrError;
use crate::model::qr_code::QrType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_FILL_COLOR: &str = "black";
pub const DEFAULT_BACK_COLOR: &str = "white";

/// Client request for a new QR code.
///
/// Type-specific fields (`url`, `text`, `name`, `latitude`, ...) are kept in
/// `fields` so the stored JSON mirrors what the client sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(rename = "type", default)]
    pub kind: QrType,
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default = "default_back_color")]
    pub back_color: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn default_fill_color() -> String {
    DEFAULT_FILL_COLOR.to_string()
}

fn default_back_color() -> String {
    DEFAULT_BACK_COLOR.to_string()
}

impl GenerateRequest {
    /// Creates a request with default colors and no extra fields.
    pub fn new(kind: QrType) -> Self {
        Self {
            kind,
            fill_color: default_fill_color(),
            back_color: default_back_color(),
            password: None,
            expiry_date: None,
            fields: Map::new(),
        }
    }

    /// Builder-style setter for a type-specific field.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Returns the field rendered as text; blank strings count as absent.
    pub fn field_text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    fn required(&self, field: &'static str) -> Result<String, QrError> {
        self.field_text(field).ok_or(QrError::MissingField {
            kind: self.kind.as_str(),
            field,
        })
    }

    fn optional(&self, field: &str) -> String {
        self.field_text(field).unwrap_or_default()
    }

    /// Password with surrounding whitespace removed; blank means unprotected.
    pub fn effective_password(&self) -> Option<&str> {
        self.password
            .as_deref()
            .map(str::trim)
            .filter(|password| !password.is_empty())
    }
}

/// Builds the text encoded by the QR code for `request.kind`.
pub fn build_payload(request: &GenerateRequest) -> Result<String, QrError> {
    match request.kind {
        QrType::Link => Ok(modify_dropbox_link(&request.required("url")?)),
        QrType::Text => request.required("text"),
        QrType::Vcard => Ok(vcard_payload(
            &request.required("name")?,
            &request.optional("phone"),
            &request.optional("email"),
        )),
        QrType::Event => Ok(event_payload(
            &request.required("title")?,
            &request.optional("start_date"),
            &request.optional("end_date"),
            &request.optional("location"),
            &request.optional("description"),
        )),
        QrType::Location => Ok(location_payload(
            &request.required("latitude")?,
            &request.required("longitude")?,
            &request.optional("location_name"),
        )),
    }
}

/// vCard 3.0 contact payload.
pub fn vcard_payload(name: &str, phone: &str, email: &str) -> String {
    format!("BEGIN:VCARD\nVERSION:3.0\nN:{name}\nTEL:{phone}\nEMAIL:{email}\nEND:VCARD")
}

/// iCalendar `VEVENT` payload.
pub fn event_payload(
    title: &str,
    start_date: &str,
    end_date: &str,
    location: &str,
    description: &str,
) -> String {
    format!(
        "BEGIN:VEVENT\nSUMMARY:{title}\nDTSTART:{start_date}\nDTEND:{end_date}\nLOCATION:{location}\nDESCRIPTION:{description}\nEND:VEVENT"
    )
}

/// `geo:` URI payload.
pub fn location_payload(latitude: &str, longitude: &str, location_name: &str) -> String {
    format!("geo:{latitude},{longitude}?q={location_name}")
}
