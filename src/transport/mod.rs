//! Transport layer: wire-format details (serialization/deserialization).

mod credits;
mod email;
mod response;
mod sms;
mod webhook;

pub use email::{encode_email_json, encode_template_json, template_path};
pub use response::{decode_response, decode_response_as};
pub use sms::encode_sms_json;
pub use webhook::decode_webhook;

/// Failure to turn provider bytes into a typed value.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid webhook date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: time::error::Parse,
    },

    #[error("webhook ts out of range: {seconds}")]
    InvalidTimestamp {
        seconds: i64,
        #[source]
        source: time::error::ComponentRange,
    },
}
