use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Attachment, Email, Recipients, Sender, TemplatedEmail};

#[derive(Debug, Serialize)]
struct EmailJson<'a> {
    to: BTreeMap<&'a str, &'a str>,
    subject: &'a str,
    from: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    cc: BTreeMap<&'a str, &'a str>,
    bcc: BTreeMap<&'a str, &'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replyto: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<AttachmentJson<'a>>,
    headers: &'a BTreeMap<String, String>,
    inline_image: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AttachmentJson<'a> {
    Urls(Vec<&'a str>),
    Inline(&'a BTreeMap<String, String>),
}

#[derive(Debug, Serialize)]
struct TemplateJson<'a> {
    to: BTreeMap<&'a str, &'a str>,
    cc: BTreeMap<&'a str, &'a str>,
    bcc: BTreeMap<&'a str, &'a str>,
    attr: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachment_url: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<&'a BTreeMap<String, String>>,
    headers: &'a BTreeMap<String, String>,
}

/// JSON body for `POST /email`.
pub fn encode_email_json(email: &Email) -> Result<Vec<u8>, serde_json::Error> {
    let options = email.options();
    let body = EmailJson {
        to: recipients(email.to()),
        subject: email.subject(),
        from: sender_pair(email.sender()),
        html: email.body().html_part(),
        text: email.body().text_part(),
        cc: recipients(&options.cc),
        bcc: recipients(&options.bcc),
        replyto: options.reply_to.as_ref().map(sender_pair),
        attachment: options.attachment.as_ref().map(|attachment| match attachment {
            Attachment::Urls(urls) => {
                AttachmentJson::Urls(urls.iter().map(|u| u.as_str()).collect())
            }
            Attachment::Inline(files) => AttachmentJson::Inline(files),
        }),
        headers: options.headers.as_map(),
        inline_image: &options.inline_image,
    };
    serde_json::to_vec(&body)
}

/// JSON body for `POST /template/{id}`. The id travels in the path only.
pub fn encode_template_json(template: &TemplatedEmail) -> Result<Vec<u8>, serde_json::Error> {
    let options = template.options();
    let (attachment_url, attachment): (Vec<&str>, Option<&BTreeMap<String, String>>) =
        match &options.attachment {
            Some(Attachment::Urls(urls)) => (urls.iter().map(|u| u.as_str()).collect(), None),
            Some(Attachment::Inline(files)) => (Vec::new(), Some(files)),
            None => (Vec::new(), None),
        };
    let body = TemplateJson {
        to: recipients(template.to()),
        cc: recipients(&options.cc),
        bcc: recipients(&options.bcc),
        attr: &options.attr,
        attachment_url,
        attachment,
        headers: options.headers.as_map(),
    };
    serde_json::to_vec(&body)
}

pub fn template_path(template: &TemplatedEmail) -> String {
    format!("/template/{}", template.id().value())
}

fn recipients(recipients: &Recipients) -> BTreeMap<&str, &str> {
    recipients
        .iter()
        .map(|(address, name)| (address.as_str(), name.as_str()))
        .collect()
}

fn sender_pair(sender: &Sender) -> Vec<&str> {
    let mut pair = vec![sender.address().as_str()];
    if let Some(name) = sender.name() {
        pair.push(name);
    }
    pair
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::domain::{
        Body, EmailAddress, EmailOptions, Headers, HttpUrl, TemplateId, TemplateOptions,
    };

    use super::*;

    fn recipients_of(pairs: &[(&str, &str)]) -> Recipients {
        pairs
            .iter()
            .map(|(address, name)| (EmailAddress::new(*address).unwrap(), (*name).to_owned()))
            .collect()
    }

    fn shop() -> Sender {
        Sender::named(EmailAddress::new("shop@example.com").unwrap(), "Shop")
    }

    #[test]
    fn email_body_carries_every_field() {
        let mut inline_image = BTreeMap::new();
        inline_image.insert("logo.png".to_owned(), "iVBORw0KGgo=".to_owned());
        let mut files = BTreeMap::new();
        files.insert("invoice.txt".to_owned(), "aGVsbG8=".to_owned());

        let email = Email::new(
            recipients_of(&[("to@example.com", "To"), ("other@example.com", "Other")]),
            shop(),
            "Your order",
            Body::both("<p>Thanks</p>", "Thanks").unwrap(),
            EmailOptions {
                cc: recipients_of(&[("cc@example.com", "Cc")]),
                bcc: recipients_of(&[("bcc@example.com", "Bcc")]),
                reply_to: Some(Sender::new(EmailAddress::new("reply@example.com").unwrap())),
                attachment: Some(Attachment::Inline(files)),
                headers: Headers::new().with("X-Mailin-custom", "order:42").unwrap(),
                inline_image,
            },
        )
        .unwrap();

        let body: Value = serde_json::from_slice(&encode_email_json(&email).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "to": {"other@example.com": "Other", "to@example.com": "To"},
                "subject": "Your order",
                "from": ["shop@example.com", "Shop"],
                "html": "<p>Thanks</p>",
                "text": "Thanks",
                "cc": {"cc@example.com": "Cc"},
                "bcc": {"bcc@example.com": "Bcc"},
                "replyto": ["reply@example.com"],
                "attachment": {"invoice.txt": "aGVsbG8="},
                "headers": {"X-Mailin-custom": "order:42"},
                "inline_image": {"logo.png": "iVBORw0KGgo="}
            })
        );
    }

    #[test]
    fn email_body_round_trips_with_empty_containers() {
        let email = Email::new(
            recipients_of(&[("to@example.com", "To")]),
            Sender::new(EmailAddress::new("shop@example.com").unwrap()),
            "Hi",
            Body::text("plain").unwrap(),
            EmailOptions::default(),
        )
        .unwrap();

        let body: Value = serde_json::from_slice(&encode_email_json(&email).unwrap()).unwrap();
        assert_eq!(body["to"]["to@example.com"], "To");
        assert_eq!(body["subject"], email.subject());
        assert_eq!(body["from"], json!(["shop@example.com"]));
        assert_eq!(body["text"], "plain");
        assert!(body.get("html").is_none());
        assert!(body.get("replyto").is_none());
        assert!(body.get("attachment").is_none());
        assert_eq!(body["cc"], json!({}));
        assert_eq!(body["bcc"], json!({}));
        assert_eq!(body["headers"], json!({}));
        assert_eq!(body["inline_image"], json!({}));
    }

    #[test]
    fn email_url_attachments_serialize_as_list() {
        let email = Email::new(
            recipients_of(&[("to@example.com", "To")]),
            shop(),
            "Report",
            Body::html("<p>see attached</p>").unwrap(),
            EmailOptions {
                attachment: Some(Attachment::Urls(vec![
                    HttpUrl::parse("attachment", "https://files.example.com/a.pdf").unwrap(),
                ])),
                ..Default::default()
            },
        )
        .unwrap();

        let body: Value = serde_json::from_slice(&encode_email_json(&email).unwrap()).unwrap();
        assert_eq!(body["attachment"], json!(["https://files.example.com/a.pdf"]));
    }

    #[test]
    fn template_body_omits_id_and_splits_attachments() {
        let mut attr = BTreeMap::new();
        attr.insert("NAME".to_owned(), "Ada".to_owned());

        let template = TemplatedEmail::new(
            TemplateId::new(7).unwrap(),
            recipients_of(&[("to@example.com", "To")]),
            TemplateOptions {
                attr,
                attachment: Some(Attachment::Urls(vec![
                    HttpUrl::parse("attachment", "https://files.example.com/a.pdf").unwrap(),
                ])),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(template_path(&template), "/template/7");

        let body: Value =
            serde_json::from_slice(&encode_template_json(&template).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "to": {"to@example.com": "To"},
                "cc": {},
                "bcc": {},
                "attr": {"NAME": "Ada"},
                "attachment_url": ["https://files.example.com/a.pdf"],
                "headers": {}
            })
        );
    }

    #[test]
    fn template_inline_attachment_uses_attachment_field() {
        let mut files = BTreeMap::new();
        files.insert("a.txt".to_owned(), "YQ==".to_owned());

        let template = TemplatedEmail::new(
            TemplateId::new(3).unwrap(),
            recipients_of(&[("to@example.com", "To")]),
            TemplateOptions {
                attachment: Some(Attachment::Inline(files)),
                ..Default::default()
            },
        )
        .unwrap();

        let body: Value =
            serde_json::from_slice(&encode_template_json(&template).unwrap()).unwrap();
        assert_eq!(body["attachment"], json!({"a.txt": "YQ=="}));
        assert!(body.get("attachment_url").is_none());
        assert!(body.get("id").is_none());
    }
}
