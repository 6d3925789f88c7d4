use std::collections::BTreeMap;

use thiserror::Error;

/// Field-level validation messages keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors returned by data sources and mutation endpoints.
///
/// Every variant maps to an HTTP-equivalent status so callers can branch on
/// "record already gone" without string matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("validation failed ({status}): {}", summarize(.fields, .non_field))]
    Validation {
        status: u16,
        fields: FieldErrors,
        non_field: Vec<String>,
    },

    #[error("not found")]
    NotFound,

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Validation error for a single field, used by client-side form checks.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.into(), vec![message.into()]);
        Self::Validation {
            status: 400,
            fields,
            non_field: Vec::new(),
        }
    }

    /// Classifies a non-2xx response.
    ///
    /// 404 becomes `NotFound`. 400 and 422 bodies shaped like
    /// `{"field": ["msg", ...], "non_field_errors": [...]}` become `Validation`;
    /// anything else is a `Server` error carrying the raw body.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        if status == 404 {
            return Self::NotFound;
        }

        let text = String::from_utf8_lossy(body).into_owned();
        if (status == 400 || status == 422)
            && let Some((fields, non_field)) = parse_validation_body(body)
        {
            return Self::Validation {
                status,
                fields,
                non_field,
            };
        }

        Self::Server { status, body: text }
    }

    /// HTTP-equivalent status, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Validation { status, .. } => Some(*status),
            Self::NotFound => Some(404),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Messages for one form field, empty when the field has none.
    pub fn field_errors(&self, field: &str) -> &[String] {
        match self {
            Self::Validation { fields, .. } => fields.get(field).map_or(&[][..], Vec::as_slice),
            _ => &[],
        }
    }
}

fn parse_validation_body(body: &[u8]) -> Option<(FieldErrors, Vec<String>)> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let object = value.as_object()?;

    let mut fields = FieldErrors::new();
    let mut non_field = Vec::new();
    for (key, value) in object {
        let messages = messages_of(value);
        if key == "non_field_errors" || key == "detail" {
            non_field.extend(messages);
        } else {
            fields.insert(key.clone(), messages);
        }
    }
    Some((fields, non_field))
}

fn messages_of(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items.iter().flat_map(messages_of).collect(),
        other => vec![other.to_string()],
    }
}

fn summarize(fields: &FieldErrors, non_field: &[String]) -> String {
    let mut parts: Vec<String> = non_field.to_vec();
    for (field, messages) in fields {
        parts.push(format!("{field}: {}", messages.join(" ")));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_classified() {
        let err = ApiError::from_status(404, b"{\"detail\":\"Not found.\"}");
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn bad_request_with_fields_is_validation() {
        let body = br#"{"name": ["This field is required."], "non_field_errors": ["nope"]}"#;
        let err = ApiError::from_status(400, body);

        assert_eq!(err.field_errors("name"), ["This field is required.".to_owned()]);
        assert!(err.field_errors("type").is_empty());
        match &err {
            ApiError::Validation { non_field, .. } => assert_eq!(non_field, &["nope".to_owned()]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("name: This field is required."));
    }

    #[test]
    fn bad_request_with_plain_body_is_server_error() {
        let err = ApiError::from_status(400, b"bad gateway html");
        assert_eq!(
            err,
            ApiError::Server {
                status: 400,
                body: "bad gateway html".to_owned()
            }
        );
    }

    #[test]
    fn internal_error_keeps_body() {
        let err = ApiError::from_status(500, b"boom");
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn network_error_has_no_status() {
        assert_eq!(ApiError::network("refused").status(), None);
    }
}
