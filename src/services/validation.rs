//! Book payload validation.
//!
//! Payloads arrive as raw JSON so that every problem can be reported at once,
//! instead of stopping at the first serde error. Checking happens in two passes:
//!
//! 1. shape: the payload is an object, every declared field is present with the
//!    right JSON type, and nothing else is there;
//! 2. content: once the shape is right the payload is deserialized into the typed
//!    record and its `validator` rules run (non-empty strings).
//!
//! The same schema serves both operations; [`SchemaMode`] only changes how the
//! `isbn` key is treated.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::models::{Book, UpdateBook};

/// Key field of a book
pub const ISBN_FIELD: &str = "isbn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Integer,
}

/// Declared book fields, in output order
const BOOK_SCHEMA: &[(&str, FieldKind)] = &[
    (ISBN_FIELD, FieldKind::Text),
    ("amazon_url", FieldKind::Text),
    ("author", FieldKind::Text),
    ("language", FieldKind::Text),
    ("pages", FieldKind::Integer),
    ("publisher", FieldKind::Text),
    ("title", FieldKind::Text),
    ("year", FieldKind::Integer),
];

/// Which operation a payload is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    /// `isbn` is required along with every other field
    Create,
    /// `isbn` is forbidden; the key comes from the request path
    Update,
}

impl SchemaMode {
    fn requires(self, field: &str) -> bool {
        match self {
            SchemaMode::Create => true,
            SchemaMode::Update => field != ISBN_FIELD,
        }
    }
}

/// A single reason a payload was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Violation {
    /// Offending field, or `body` when the payload as a whole is wrong
    pub field: String,
    /// Human readable explanation
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, format!("missing required field '{}'", field))
    }

    pub fn unexpected(field: &str) -> Self {
        Self::new(
            field,
            format!("unexpected field '{}': additional properties not allowed", field),
        )
    }

    pub fn immutable(field: &str) -> Self {
        Self::new(
            field,
            format!("field '{}' cannot be changed; the book is addressed by its path", field),
        )
    }

    fn wrong_type(field: &str, kind: FieldKind, found: &Value) -> Self {
        let expected = match kind {
            FieldKind::Text => "a string",
            FieldKind::Integer => "an integer",
        };
        Self::new(
            field,
            format!("field '{}' must be {}, got {}", field, expected, json_type(found)),
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Non-empty, ordered list of violations for one payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.0
    }

    /// True if any violation concerns `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|v| v.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Validate a create payload into a full book record
pub fn validate_create(payload: &Value) -> Result<Book, Violations> {
    validate(payload, SchemaMode::Create)
}

/// Validate an update payload into the replacement of the mutable fields
pub fn validate_update(payload: &Value) -> Result<UpdateBook, Violations> {
    validate(payload, SchemaMode::Update)
}

fn validate<T>(payload: &Value, mode: SchemaMode) -> Result<T, Violations>
where
    T: DeserializeOwned + Validate,
{
    let violations = check(payload, mode);
    if !violations.is_empty() {
        return Err(violations);
    }

    let record: T = serde_json::from_value(normalize_integers(payload))
        .map_err(|e| Violations::from(vec![Violation::new("body", e.to_string())]))?;
    record.validate().map_err(|errors| content_violations(&errors))?;
    Ok(record)
}

/// Shape check of a raw payload. An empty result means the shape is acceptable.
pub fn check(payload: &Value, mode: SchemaMode) -> Violations {
    let Some(object) = payload.as_object() else {
        return Violations::from(vec![Violation::new(
            "body",
            format!("payload must be a JSON object, got {}", json_type(payload)),
        )]);
    };

    let mut violations = Vec::new();

    if mode == SchemaMode::Update && object.contains_key(ISBN_FIELD) {
        violations.push(Violation::immutable(ISBN_FIELD));
    }

    for &(field, kind) in BOOK_SCHEMA {
        if !mode.requires(field) {
            continue;
        }
        match object.get(field) {
            None => violations.push(Violation::missing(field)),
            Some(value) => {
                if let Some(violation) = check_kind(field, kind, value) {
                    violations.push(violation);
                }
            }
        }
    }

    violations.extend(unexpected_fields(object));

    Violations::from(violations)
}

fn check_kind(field: &str, kind: FieldKind, value: &Value) -> Option<Violation> {
    match kind {
        FieldKind::Text if value.is_string() => None,
        FieldKind::Integer => match integer_value(value) {
            Some(n) if i32::try_from(n).is_ok() => None,
            Some(_) => Some(Violation::new(
                field,
                format!("field '{}' is out of range", field),
            )),
            None => Some(Violation::wrong_type(field, kind, value)),
        },
        _ => Some(Violation::wrong_type(field, kind, value)),
    }
}

/// Integer value of a JSON number with no fractional part (`100` and `100.0` alike)
fn integer_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let n = value.as_f64()?;
    // Casting saturates, so huge values still end up out of `i32` range
    (n.fract() == 0.0).then_some(n as i64)
}

/// Copy of the payload with integral floats in integer fields rewritten as
/// integers, so they deserialize into the `i32` columns
fn normalize_integers(payload: &Value) -> Value {
    let mut payload = payload.clone();
    if let Some(object) = payload.as_object_mut() {
        for &(field, kind) in BOOK_SCHEMA {
            if !matches!(kind, FieldKind::Integer) {
                continue;
            }
            if let Some(value) = object.get_mut(field) {
                if let Some(n) = integer_value(value) {
                    *value = Value::from(n);
                }
            }
        }
    }
    payload
}

fn unexpected_fields(object: &Map<String, Value>) -> impl Iterator<Item = Violation> + '_ {
    object
        .keys()
        .filter(|key| !BOOK_SCHEMA.iter().any(|&(field, _)| field == key.as_str()))
        .map(|key| Violation::unexpected(key))
}

fn content_violations(errors: &ValidationErrors) -> Violations {
    let fields = errors.field_errors();
    let violations = BOOK_SCHEMA
        .iter()
        .filter_map(|&(field, _)| fields.get(field).map(|errs| (field, errs)))
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                Violation::new(
                    field,
                    format!(
                        "field '{}' {}",
                        field,
                        e.message.as_deref().unwrap_or("is invalid")
                    ),
                )
            })
        })
        .collect::<Vec<_>>();
    Violations::from(violations)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
