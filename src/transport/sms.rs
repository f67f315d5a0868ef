use serde::Serialize;

use crate::domain::Sms;

#[derive(Debug, Serialize)]
struct SmsJson<'a> {
    to: &'a str,
    from: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

/// JSON body for `POST /sms`.
pub fn encode_sms_json(sms: &Sms) -> Result<Vec<u8>, serde_json::Error> {
    let options = sms.options();
    let body = SmsJson {
        to: sms.to().raw(),
        from: sms.sender().as_str(),
        text: sms.text().as_str(),
        web_url: options.web_url.as_ref().map(|url| url.as_str()),
        tag: options.tag.as_deref(),
        kind: options.kind.map(|kind| kind.as_str()),
    };
    serde_json::to_vec(&body)
}
