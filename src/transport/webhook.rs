use std::net::IpAddr;

use serde::Deserialize;
use serde_json::{Map, Value};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::domain::{EventKind, WebhookEvent};
use crate::transport::DecodeError;

/// Spellings of the same field seen across API versions, preferred first.
const FIELD_SPELLINGS: [&[&str]; 3] = [
    &["sending_ip", "sending-ip"],
    &["message-id", "message_id"],
    &["X-Mailin-custom", "x-mailin-custom", "X_Mailin_custom"],
];

/// Webhook payload as sent, before dates and addresses are parsed.
///
/// Decoded from an object whose drifting field names were already folded
/// into the first spelling of each [`FIELD_SPELLINGS`] group.
#[derive(Debug, Deserialize)]
struct WebhookJson {
    event: String,
    email: String,
    id: i64,
    date: String,
    #[serde(default)]
    ts: Option<i64>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    sending_ip: Option<String>,
    #[serde(default, rename = "message-id")]
    message_id: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default, rename = "X-Mailin-custom")]
    x_mailin_custom: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

/// Keep one value per field group: the most preferred non-null spelling wins.
fn fold_spellings(mut fields: Map<String, Value>) -> Map<String, Value> {
    for spellings in FIELD_SPELLINGS {
        let mut chosen = None;
        for spelling in spellings {
            let value = fields.remove(*spelling);
            if chosen.is_none() {
                chosen = value.filter(|value| !value.is_null());
            }
        }
        if let Some(value) = chosen {
            fields.insert(spellings[0].to_owned(), value);
        }
    }
    fields
}

/// Decode one webhook notification.
///
/// An unparsable `date` rejects the whole event. An empty or unparsable
/// `sending_ip` only drops the address.
pub fn decode_webhook(bytes: &[u8]) -> Result<WebhookEvent, DecodeError> {
    let fields: Map<String, Value> = serde_json::from_slice(bytes)?;
    let parsed: WebhookJson = serde_json::from_value(Value::Object(fold_spellings(fields)))?;

    let date = PrimitiveDateTime::parse(
        parsed.date.trim(),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .map_err(|source| DecodeError::InvalidDate {
        value: parsed.date.clone(),
        source,
    })?;

    let ts = parsed
        .ts
        .map(|seconds| {
            OffsetDateTime::from_unix_timestamp(seconds)
                .map_err(|source| DecodeError::InvalidTimestamp { seconds, source })
        })
        .transpose()?;

    if let Some(ts) = ts {
        let offset = ts - date.assume_utc();
        if !offset.is_zero() {
            tracing::debug!(
                event_id = parsed.id,
                offset_seconds = offset.whole_seconds(),
                "webhook date is not GMT; ts is authoritative"
            );
        }
    }

    Ok(WebhookEvent {
        event: EventKind::new(parsed.event),
        email: parsed.email,
        id: parsed.id,
        date,
        ts,
        subject: parsed.subject,
        sending_ip: parse_ip(parsed.id, parsed.sending_ip.as_deref()),
        message_id: parsed.message_id,
        tag: parsed.tag,
        x_mailin_custom: parsed.x_mailin_custom,
        reason: parsed.reason,
        link: parsed.link,
    })
}

fn parse_ip(event_id: i64, raw: Option<&str>) -> Option<IpAddr> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;
    match raw.parse() {
        Ok(ip) => Some(ip),
        Err(_) => {
            tracing::debug!(event_id, sending_ip = raw, "dropping unparsable sending ip");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use time::macros::datetime;

    use crate::domain::{EventTime, KnownEventKind};

    use super::*;

    const BOUNCE: &str = r#"{"event":"bounce","email":"a@b.com","id":7,"date":"2013-06-20 20:09:22","sending_ip":"1.2.3.4","reason":"mailbox full"}"#;

    #[test]
    fn decodes_bounce_without_timezone_conversion() {
        let event = decode_webhook(BOUNCE.as_bytes()).unwrap();
        assert_eq!(event.event.known(), Some(KnownEventKind::Bounce));
        assert_eq!(event.email, "a@b.com");
        assert_eq!(event.id, 7);
        assert_eq!(event.date, datetime!(2013-06-20 20:09:22));
        assert_eq!(event.sending_ip, Some(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4))));
        assert_eq!(event.reason.as_deref(), Some("mailbox full"));
        assert_eq!(event.link, None);
        assert_eq!(event.ts, None);
        assert_eq!(
            event.time(),
            EventTime::Unzoned(datetime!(2013-06-20 20:09:22))
        );
    }

    #[test]
    fn unparsable_date_rejects_the_event() {
        let payload = BOUNCE.replace("2013-06-20 20:09:22", "20/06/2013 8pm");
        let err = decode_webhook(payload.as_bytes()).unwrap_err();
        match err {
            DecodeError::InvalidDate { value, .. } => assert_eq!(value, "20/06/2013 8pm"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn accepts_hyphenated_field_spellings() {
        let payload = r#"{
            "event": "click",
            "email": "a@b.com",
            "id": 9,
            "date": "2013-06-20 20:09:22",
            "ts": 1371758962,
            "sending-ip": "10.0.0.1",
            "message_id": "<201306202009.123@relay.example>",
            "x-mailin-custom": "order:42",
            "link": "https://example.com/promo",
            "tag": "newsletter",
            "subject": "Promo"
        }"#;
        let event = decode_webhook(payload.as_bytes()).unwrap();
        assert_eq!(event.sending_ip, Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
        assert_eq!(
            event.message_id.as_deref(),
            Some("<201306202009.123@relay.example>")
        );
        assert_eq!(event.x_mailin_custom.as_deref(), Some("order:42"));
        assert_eq!(event.link.as_deref(), Some("https://example.com/promo"));
        assert_eq!(event.ts, Some(datetime!(2013-06-20 20:09:22 UTC)));
        assert_eq!(
            event.time(),
            EventTime::Gmt(datetime!(2013-06-20 20:09:22 UTC))
        );
    }

    #[test]
    fn canonical_field_spellings_are_accepted() {
        let payload = r#"{"event":"delivered","email":"a@b.com","id":1,"date":"2013-06-20 20:09:22","message-id":"m-1","X-Mailin-custom":"c"}"#;
        let event = decode_webhook(payload.as_bytes()).unwrap();
        assert_eq!(event.message_id.as_deref(), Some("m-1"));
        assert_eq!(event.x_mailin_custom.as_deref(), Some("c"));
    }

    #[test]
    fn empty_or_bad_ip_is_absent_not_fatal() {
        let empty = BOUNCE.replace("1.2.3.4", "");
        assert_eq!(decode_webhook(empty.as_bytes()).unwrap().sending_ip, None);

        let bad = BOUNCE.replace("1.2.3.4", "1.2.3");
        assert_eq!(decode_webhook(bad.as_bytes()).unwrap().sending_ip, None);

        let missing = BOUNCE.replace(r#","sending_ip":"1.2.3.4""#, "");
        assert_eq!(decode_webhook(missing.as_bytes()).unwrap().sending_ip, None);
    }

    #[test]
    fn both_spellings_in_one_payload_prefer_the_underscored_ip_and_hyphenated_id() {
        let payload = r#"{
            "event": "delivered",
            "email": "a@b.com",
            "id": 3,
            "date": "2013-06-20 20:09:22",
            "sending-ip": "10.0.0.2",
            "sending_ip": "1.2.3.4",
            "message_id": "old",
            "message-id": "new",
            "X_Mailin_custom": "legacy",
            "x-mailin-custom": "current"
        }"#;
        let event = decode_webhook(payload.as_bytes()).unwrap();
        assert_eq!(event.sending_ip, Some(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4))));
        assert_eq!(event.message_id.as_deref(), Some("new"));
        assert_eq!(event.x_mailin_custom.as_deref(), Some("current"));
    }

    #[test]
    fn null_spelling_falls_back_to_the_other_one() {
        let payload = r#"{"event":"delivered","email":"a@b.com","id":3,"date":"2013-06-20 20:09:22","message-id":null,"message_id":"m-2"}"#;
        let event = decode_webhook(payload.as_bytes()).unwrap();
        assert_eq!(event.message_id.as_deref(), Some("m-2"));
    }

    #[test]
    fn non_object_payload_is_a_decode_error() {
        assert!(matches!(
            decode_webhook(b"[1, 2]"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn missing_required_fields_are_decode_errors() {
        let payload = r#"{"event":"bounce","email":"a@b.com","date":"2013-06-20 20:09:22"}"#;
        assert!(matches!(
            decode_webhook(payload.as_bytes()),
            Err(DecodeError::Json(_))
        ));
    }
}
