use chrono::{DateTime, Utc};
use serde_json::json;
use skyops_types::timestamp;

use crate::schema::FieldType;

/// A typed extra-field value.
///
/// The variant is chosen by the schema's declared type at hydration time.
/// `Raw` holds values that could not be coerced (or whose key the schema
/// does not describe) exactly as they arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(f64),
    Date(DateTime<Utc>),
    Bool(bool),
    File(FileRef),
    Raw(serde_json::Value),
}

/// A file-typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum FileRef {
    /// A previously uploaded file, addressed by URL.
    Remote(String),
    /// A local file waiting to be uploaded with the next write.
    Pending(PendingFile),
}

/// A local binary attached by the UI, sent as multipart content.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl FieldValue {
    /// The declared type this value satisfies, or `None` for raw values.
    #[must_use]
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldValue::String(_) => Some(FieldType::String),
            FieldValue::Number(_) => Some(FieldType::Number),
            FieldValue::Date(_) => Some(FieldType::Date),
            FieldValue::Bool(_) => Some(FieldType::Bool),
            FieldValue::File(_) => Some(FieldType::File),
            FieldValue::Raw(_) => None,
        }
    }

    /// Returns true if this value's runtime type agrees with `declared`.
    ///
    /// Unknown declared types accept anything.
    #[must_use]
    pub fn matches(&self, declared: FieldType) -> bool {
        match declared {
            FieldType::Unknown => true,
            known => self.field_type() == Some(known),
        }
    }

    /// Returns true for values that do not satisfy a `required` rule:
    /// blank strings, `null`, and empty raw strings, arrays or objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::String(s) => s.trim().is_empty(),
            FieldValue::File(FileRef::Remote(url)) => url.trim().is_empty(),
            FieldValue::Raw(raw) => match raw {
                serde_json::Value::Null => true,
                serde_json::Value::String(s) => s.trim().is_empty(),
                serde_json::Value::Array(a) => a.is_empty(),
                serde_json::Value::Object(o) => o.is_empty(),
                _ => false,
            },
            FieldValue::Number(_)
            | FieldValue::Date(_)
            | FieldValue::Bool(_)
            | FieldValue::File(FileRef::Pending(_)) => false,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The pending local file, if one is attached.
    #[must_use]
    pub fn pending_file(&self) -> Option<&PendingFile> {
        match self {
            FieldValue::File(FileRef::Pending(file)) => Some(file),
            _ => None,
        }
    }

    /// JSON rendering for change notifications and debugging.
    ///
    /// Unlike the wire form, pending files render as a small summary
    /// instead of being omitted.
    #[must_use]
    pub fn preview(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => json!(s),
            FieldValue::Number(n) => json!(n),
            FieldValue::Date(d) => json!(timestamp::to_iso(d)),
            FieldValue::Bool(b) => json!(b),
            FieldValue::File(FileRef::Remote(url)) => json!(url),
            FieldValue::File(FileRef::Pending(file)) => json!({
                "file_name": file.file_name,
                "size": file.bytes.len(),
            }),
            FieldValue::Raw(raw) => raw.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

impl From<FileRef> for FieldValue {
    fn from(f: FileRef) -> Self {
        FieldValue::File(f)
    }
}

impl From<PendingFile> for FieldValue {
    fn from(f: PendingFile) -> Self {
        FieldValue::File(FileRef::Pending(f))
    }
}
