use std::collections::BTreeMap;
use std::fmt;

use crate::domain::value::ResponseCode;

/// Which endpoint produced a response, and so which `data` shape to expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Email,
    Sms,
}

impl ResponseKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Email => "email result with a string `message-id`",
            Self::Sms => "sms result",
        }
    }
}

/// `{code, message, data}` wrapper returned by every endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub code: ResponseCode,
    pub message: String,
    pub data: ResponseData,
}

/// Endpoint-specific payload of a [`ResponseEnvelope`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Email(EmailResult),
    Sms(SmsResult),
    /// Payload that matched no known shape, kept as received.
    Unknown(serde_json::Value),
}

impl ResponseData {
    fn describe(&self) -> String {
        match self {
            Self::Email(_) => "email result".to_owned(),
            Self::Sms(_) => "sms result".to_owned(),
            Self::Unknown(value) => match value {
                serde_json::Value::Null => "null".to_owned(),
                serde_json::Value::Bool(_) => "boolean".to_owned(),
                serde_json::Value::Number(_) => "number".to_owned(),
                serde_json::Value::String(_) => "string".to_owned(),
                serde_json::Value::Array(_) => "array".to_owned(),
                serde_json::Value::Object(map) => {
                    let keys = map.keys().map(String::as_str).collect::<Vec<_>>();
                    format!("object with keys [{}]", keys.join(", "))
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailResult {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmsResult {
    pub status: String,
    pub message: Option<String>,
    pub number_sent: Option<u32>,
    pub to: Option<String>,
    pub sms_count: Option<u32>,
    /// Credit amounts keep the provider's literal token (`"0.5"` stays `"0.5"`).
    pub credits_used: Option<String>,
    pub remaining_credit: Option<String>,
    pub reference: BTreeMap<String, String>,
    pub description: Option<String>,
    pub reply: Option<String>,
    pub bounce_type: Option<String>,
    pub error_code: Option<i64>,
}

/// Returned when a narrowing accessor is asked for the wrong payload shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatchError {
    pub expected: ResponseKind,
    pub found: String,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "response data mismatch: expected {}, found {}",
            self.expected.describe(),
            self.found
        )
    }
}

impl std::error::Error for TypeMismatchError {}

impl ResponseEnvelope {
    /// Message id of a sent email.
    pub fn message_id(&self) -> Result<&str, TypeMismatchError> {
        match &self.data {
            ResponseData::Email(result) => Ok(&result.message_id),
            other => Err(TypeMismatchError {
                expected: ResponseKind::Email,
                found: other.describe(),
            }),
        }
    }

    /// Delivery details of a sent SMS.
    pub fn sms_result(&self) -> Result<&SmsResult, TypeMismatchError> {
        match &self.data {
            ResponseData::Sms(result) => Ok(result),
            other => Err(TypeMismatchError {
                expected: ResponseKind::Sms,
                found: other.describe(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}
