//! Cursor encoding/decoding for keyset pagination.

use serde_json::{Map, Value};
use thiserror::Error;

use super::encoding::{base64_decode, base64_encode};

/// Maximum allowed token size in bytes (4KB).
/// This prevents DoS attacks via oversized cursor payloads.
pub(crate) const MAX_CURSOR_SIZE: usize = 4 * 1024;

/// Maximum number of fields allowed in a cursor.
pub(crate) const MAX_CURSOR_FIELDS: usize = 16;

/// The position of the last record of the previous page.
///
/// An ordered list of `column -> value` pairs, one per ordering column, in
/// ordering order. Encoded as a compact JSON object, then URL-safe base64
/// without padding: `{"id":10}` becomes `eyJpZCI6MTB9`.
///
/// # Security Note
///
/// Cursors use simple base64 encoding, **not encryption**. The cursor content
/// is easily decoded by clients. Only ordering columns end up in a cursor,
/// so don't order by sensitive columns if that matters to you.
///
/// # Example
///
/// ```
/// use pagewise::Cursor;
///
/// let cursor = Cursor::new().string("animal", "cat").int("id", 18);
/// let token = cursor.encode();
///
/// let decoded = Cursor::decode(&token).unwrap();
/// assert_eq!(decoded, cursor);
/// assert_eq!(decoded.keys().collect::<Vec<_>>(), ["animal", "id"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[must_use = "cursor must be encoded with .encode() or bound to a predicate"]
pub struct Cursor {
    fields: Vec<(String, Value)>,
}

impl Cursor {
    /// Create a new empty cursor.
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set a field value, replacing any previous value for `name`.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Set an integer field.
    pub fn int(self, name: impl Into<String>, value: i64) -> Self {
        self.field(name, value)
    }

    /// Set a string field.
    pub fn string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(name, value.into())
    }

    /// Value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Field names, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// `(name, value)` pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the cursor has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode the cursor to an opaque token.
    ///
    /// No limits are checked; use [`encode_checked`](Self::encode_checked)
    /// for tokens that must be accepted by [`decode`](Self::decode).
    ///
    /// Note: This uses simple base64, not encryption. See [`Cursor`] security note.
    #[must_use]
    pub fn encode(&self) -> String {
        let object: Map<String, Value> = self.fields.iter().cloned().collect();
        base64_encode(Value::Object(object).to_string().as_bytes())
    }

    /// Encode the cursor, enforcing the same field and size limits as
    /// [`decode`](Self::decode).
    ///
    /// ```
    /// use pagewise::{Cursor, CursorError};
    ///
    /// let cursor = Cursor::new().string("title", "x".repeat(4000));
    /// assert_eq!(cursor.encode_checked(), Err(CursorError::TooLarge));
    /// ```
    pub fn encode_checked(&self) -> Result<String, CursorError> {
        if self.fields.len() > MAX_CURSOR_FIELDS {
            return Err(CursorError::TooManyFields);
        }
        let token = self.encode();
        if token.len() > MAX_CURSOR_SIZE {
            return Err(CursorError::TooLarge);
        }
        Ok(token)
    }

    /// Decode a token produced by [`encode`](Self::encode).
    ///
    /// Key order is preserved. Whether the keys make sense for a given
    /// ordering is the paginator's concern, not the codec's.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        // Check size before decoding to prevent DoS attacks
        if token.len() > MAX_CURSOR_SIZE {
            return Err(CursorError::TooLarge);
        }
        let bytes = base64_decode(token).map_err(|_| CursorError::InvalidBase64)?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|err| CursorError::InvalidJson(err.to_string()))?;
        let Value::Object(object) = value else {
            return Err(CursorError::NotAnObject);
        };
        if object.len() > MAX_CURSOR_FIELDS {
            return Err(CursorError::TooManyFields);
        }
        Ok(object.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for Cursor {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |cursor, (name, value)| cursor.field(name, value))
    }
}

impl IntoIterator for Cursor {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Errors that can occur when decoding a page token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The base64 encoding is invalid.
    #[error("invalid base64 encoding in cursor")]
    InvalidBase64,
    /// The payload is not valid JSON.
    #[error("invalid cursor payload: {0}")]
    InvalidJson(String),
    /// The payload is valid JSON but not an object.
    #[error("invalid cursor format (expected JSON object)")]
    NotAnObject,
    /// The token exceeds the maximum allowed size.
    #[error("cursor exceeds maximum size ({}KB limit)", MAX_CURSOR_SIZE / 1024)]
    TooLarge,
    /// The cursor has too many fields.
    #[error("cursor has too many fields (max {MAX_CURSOR_FIELDS})")]
    TooManyFields,
}

impl CursorError {
    /// Returns `true` if this is an encoding/format error.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBase64 | Self::InvalidJson(_) | Self::NotAnObject
        )
    }

    /// Returns `true` if this is a size/limit error.
    #[inline]
    #[must_use]
    pub const fn is_limit_error(&self) -> bool {
        matches!(self, Self::TooLarge | Self::TooManyFields)
    }
}
