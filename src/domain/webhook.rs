use std::net::IpAddr;

use time::{OffsetDateTime, PrimitiveDateTime};

use crate::domain::value::EventKind;

/// Delivery-lifecycle notification posted by the provider to an integrator endpoint.
///
/// `reason` is only meaningful for bounce/deferred-like events and `link` only for
/// clicks; see [`crate::KnownEventKind::carries_reason`] and
/// [`crate::KnownEventKind::carries_link`]. Neither is cross-checked on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    pub event: EventKind,
    pub email: String,
    pub id: i64,
    /// `date` exactly as written by the provider, without a timezone.
    pub date: PrimitiveDateTime,
    /// `ts`, the same instant as GMT epoch seconds, when the provider sent it.
    pub ts: Option<OffsetDateTime>,
    pub subject: Option<String>,
    pub sending_ip: Option<IpAddr>,
    pub message_id: Option<String>,
    pub tag: Option<String>,
    pub x_mailin_custom: Option<String>,
    pub reason: Option<String>,
    pub link: Option<String>,
}

/// Best available time of a [`WebhookEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// From `ts`; an actual instant.
    Gmt(OffsetDateTime),
    /// From `date`; the provider does not say which timezone it is in.
    Unzoned(PrimitiveDateTime),
}

impl WebhookEvent {
    /// `ts` when present, otherwise the unzoned `date`.
    pub fn time(&self) -> EventTime {
        match self.ts {
            Some(ts) => EventTime::Gmt(ts),
            None => EventTime::Unzoned(self.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn event(ts: Option<OffsetDateTime>) -> WebhookEvent {
        WebhookEvent {
            event: EventKind::new("delivered"),
            email: "a@b.com".to_owned(),
            id: 1,
            date: datetime!(2013-06-20 22:09:22),
            ts,
            subject: None,
            sending_ip: None,
            message_id: None,
            tag: None,
            x_mailin_custom: None,
            reason: None,
            link: None,
        }
    }

    #[test]
    fn time_prefers_gmt_timestamp() {
        let ts = datetime!(2013-06-20 20:09:22 UTC);
        assert_eq!(event(Some(ts)).time(), EventTime::Gmt(ts));
        assert_eq!(
            event(None).time(),
            EventTime::Unzoned(datetime!(2013-06-20 22:09:22))
        );
    }
}
