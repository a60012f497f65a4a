//! Multipart form model.
//!
//! A processing request is an endpoint plus an **ordered** list of
//! form fields. Field order is part of the wire contract: the backend
//! reads streams positionally in places, so serializers append fields
//! in a fixed sequence and tests pin that sequence down.

use std::fmt;

/// One multipart field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain text part.
    Text(String),
    /// Binary part (an encoded image).
    Blob(Vec<u8>),
}

/// A named multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Field name as the backend expects it.
    pub name: &'static str,
    /// Field payload.
    pub value: FieldValue,
}

/// A fully-assembled processing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Endpoint path segment under the API base URL.
    pub endpoint: &'static str,
    /// Multipart fields in append order.
    pub fields: Vec<FormField>,
}

impl Request {
    /// Empty request for the given endpoint.
    #[must_use]
    pub const fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            fields: Vec::new(),
        }
    }

    /// Append a text field. Numbers and booleans go through `Display`,
    /// which matches the original form encoding (`2` not `2.0`,
    /// `true`/`false`).
    pub fn push_text(&mut self, name: &'static str, value: impl fmt::Display) {
        self.fields.push(FormField {
            name,
            value: FieldValue::Text(value.to_string()),
        });
    }

    /// Append a binary field.
    pub fn push_blob(&mut self, name: &'static str, bytes: Vec<u8>) {
        self.fields.push(FormField {
            name,
            value: FieldValue::Blob(bytes),
        });
    }

    /// Field names in append order, for asserting the wire sequence.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Text value of the named field, if present and textual.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).and_then(|f| match &f.value {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Blob(_) => None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn push_text_formats_like_form_data() {
        let mut req = Request::new("enhance-quality");
        req.push_text("factor", 2.0_f32);
        req.push_text("contrast", 1.2_f32);
        req.push_text("refine", true);
        assert_eq!(req.text("factor"), Some("2"));
        assert_eq!(req.text("contrast"), Some("1.2"));
        assert_eq!(req.text("refine"), Some("true"));
    }

    #[test]
    fn fields_keep_append_order() {
        let mut req = Request::new("x");
        req.push_blob("image", vec![1, 2, 3]);
        req.push_text("a", 1);
        req.push_text("b", 2);
        assert_eq!(req.field_names(), vec!["image", "a", "b"]);
    }

    #[test]
    fn text_lookup_skips_blobs() {
        let mut req = Request::new("x");
        req.push_blob("image", vec![0]);
        assert_eq!(req.text("image"), None);
        assert_eq!(req.text("missing"), None);
    }
}
