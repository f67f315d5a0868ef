use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::domain::{
    EmailResult, ResponseCode, ResponseData, ResponseEnvelope, ResponseKind, SmsResult,
};
use crate::transport::DecodeError;
use crate::transport::credits::CreditToken;

const SMS_FIELDS: [&str; 5] = [
    "number_sent",
    "sms_count",
    "credits_used",
    "remaining_credit",
    "reference",
];

#[derive(Debug, Deserialize)]
struct EnvelopeJson {
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Box<RawValue>>,
}

#[derive(Debug, Deserialize)]
struct EmailResultJson {
    #[serde(rename = "message-id", alias = "message_id")]
    message_id: String,
}

#[derive(Debug, Deserialize)]
struct SmsResultJson {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    number_sent: Option<u32>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    sms_count: Option<u32>,
    #[serde(default)]
    credits_used: Option<CreditToken>,
    #[serde(default)]
    remaining_credit: Option<CreditToken>,
    #[serde(default)]
    reference: Option<BTreeMap<String, String>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    bounce_type: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

impl From<SmsResultJson> for SmsResult {
    fn from(value: SmsResultJson) -> Self {
        Self {
            status: value.status,
            message: value.message,
            number_sent: value.number_sent,
            to: value.to,
            sms_count: value.sms_count,
            credits_used: value.credits_used.map(CreditToken::into_string),
            remaining_credit: value.remaining_credit.map(CreditToken::into_string),
            reference: value.reference.unwrap_or_default(),
            description: value.description,
            reply: value.reply,
            bounce_type: value.bounce_type,
            error_code: value.error_code,
        }
    }
}

/// Decode an envelope whose producing endpoint is unknown.
///
/// `data` is classified by probing its structure; see [`decode_response_as`].
pub fn decode_response(bytes: &[u8]) -> Result<ResponseEnvelope, DecodeError> {
    decode_response_as(bytes, None)
}

/// Decode an envelope, expecting `data` of the given kind when one is known.
///
/// A payload that does not fit the expected (or probed) shape is kept as
/// [`ResponseData::Unknown`]; failure responses often carry `[]` or a bare string
/// there, so a mismatch is only reported when the caller narrows the envelope.
pub fn decode_response_as(
    bytes: &[u8],
    expected: Option<ResponseKind>,
) -> Result<ResponseEnvelope, DecodeError> {
    let parsed: EnvelopeJson = serde_json::from_slice(bytes)?;
    let data = match parsed.data {
        Some(raw) => classify(&raw, expected)?,
        None => ResponseData::Unknown(serde_json::Value::Null),
    };

    Ok(ResponseEnvelope {
        code: ResponseCode::new(parsed.code),
        message: parsed.message,
        data,
    })
}

fn classify(raw: &RawValue, expected: Option<ResponseKind>) -> Result<ResponseData, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(raw.get())?;
    let kind = expected.or_else(|| probe(&value));

    let data = match kind {
        Some(ResponseKind::Email) => serde_json::from_str::<EmailResultJson>(raw.get())
            .ok()
            .map(|parsed| {
                ResponseData::Email(EmailResult {
                    message_id: parsed.message_id,
                })
            }),
        Some(ResponseKind::Sms) => serde_json::from_str::<SmsResultJson>(raw.get())
            .ok()
            .map(|parsed| ResponseData::Sms(parsed.into())),
        None => None,
    };
    Ok(data.unwrap_or(ResponseData::Unknown(value)))
}

fn probe(value: &serde_json::Value) -> Option<ResponseKind> {
    let object = value.as_object()?;
    let message_id = object.get("message-id").or_else(|| object.get("message_id"));
    if message_id.is_some_and(serde_json::Value::is_string) {
        return Some(ResponseKind::Email);
    }
    if object.contains_key("status") && SMS_FIELDS.iter().any(|key| object.contains_key(*key)) {
        return Some(ResponseKind::Sms);
    }
    None
}
