use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Fallback shown when an error payload carries no detail at all.
pub const UNKNOWN_ERROR: &str = "unknown error";
/// Fallback shown when the detail payload has a shape we do not recognize.
pub const UNKNOWN_ERROR_FORMAT: &str = "unknown error format";

/// Everything that can go wrong on the client side of one exchange.
///
/// Validation and Parse never involve the server; Request, Transport and
/// JobFailure all end the active session. None of these trigger a retry.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("{message} (HTTP {status})")]
    Request { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    Parse(String),

    #[error("import failed: {0}")]
    JobFailure(String),
}

/// One field-level validation error as the backend reports them,
/// e.g. `{"loc": ["body", "url"], "msg": "field required"}`. Path segments
/// may be strings or array indices.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub loc: Vec<Value>,
    pub msg: String,
}

impl FieldError {
    /// Dotted path with the leading scope segment ("body", "query", ...)
    /// dropped.
    fn path(&self) -> String {
        self.loc
            .iter()
            .skip(1)
            .map(segment_to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn segment_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The polymorphic `detail` payload of a backend error body, discriminated
/// by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// No body, no `detail` key, or `detail: null`.
    Missing,
    /// `detail` is a plain string.
    Text(String),
    /// `detail` is a list of field-level validation errors.
    Fields(Vec<FieldError>),
    /// `detail` is some other object or array.
    Structured(Value),
    /// `detail` is a bare scalar (number, bool).
    Unrecognized,
}

impl ErrorDetail {
    /// Classify the `detail` member of a parsed error body.
    pub fn classify(body: &Value) -> ErrorDetail {
        let detail = match body.get("detail") {
            None | Some(Value::Null) => return ErrorDetail::Missing,
            Some(d) => d,
        };
        match detail {
            Value::String(s) => ErrorDetail::Text(s.clone()),
            Value::Array(_) => {
                match serde_json::from_value::<Vec<FieldError>>(detail.clone()) {
                    Ok(fields) => ErrorDetail::Fields(fields),
                    Err(_) => ErrorDetail::Structured(detail.clone()),
                }
            }
            Value::Object(_) => ErrorDetail::Structured(detail.clone()),
            _ => ErrorDetail::Unrecognized,
        }
    }

    /// Reduce the detail to one display string.
    pub fn to_message(&self) -> String {
        match self {
            ErrorDetail::Missing => UNKNOWN_ERROR.to_string(),
            ErrorDetail::Text(s) => s.clone(),
            ErrorDetail::Fields(fields) => fields
                .iter()
                .map(|f| format!("{} - {}", f.path(), f.msg))
                .collect::<Vec<_>>()
                .join("; "),
            ErrorDetail::Structured(v) => {
                serde_json::to_string(v).unwrap_or_else(|_| UNKNOWN_ERROR_FORMAT.to_string())
            }
            ErrorDetail::Unrecognized => UNKNOWN_ERROR_FORMAT.to_string(),
        }
    }
}

/// Normalize an arbitrary backend error body into one display string.
/// Pure; shared by extraction, import start and config calls so every
/// failure reads the same way.
pub fn message_from_error_body(body: &Value) -> String {
    ErrorDetail::classify(body).to_message()
}
