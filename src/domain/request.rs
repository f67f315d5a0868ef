use std::collections::BTreeMap;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    EmailAddress, Headers, HttpUrl, MessageText, RawPhoneNumber, Recipients, Sender, SmsSender,
    TemplateId,
};

/// Attachment payload, either hosted files or inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Files the provider downloads itself.
    Urls(Vec<HttpUrl>),
    /// File name → base64-encoded content.
    Inline(BTreeMap<String, String>),
}

/// Email body. At least one representation is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Html(String),
    Text(String),
    Both { html: String, text: String },
}

impl Body {
    /// HTML-only body.
    pub fn html(html: impl Into<String>) -> Result<Self, ValidationError> {
        let html = non_blank_body(html.into())?;
        Ok(Self::Html(html))
    }

    /// Plain-text-only body.
    pub fn text(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = non_blank_body(text.into())?;
        Ok(Self::Text(text))
    }

    /// Body with both an HTML and a plain-text part.
    pub fn both(html: impl Into<String>, text: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::Both {
            html: non_blank_body(html.into())?,
            text: non_blank_body(text.into())?,
        })
    }

    /// HTML part, if any.
    pub fn html_part(&self) -> Option<&str> {
        match self {
            Self::Html(html) | Self::Both { html, .. } => Some(html),
            Self::Text(_) => None,
        }
    }

    /// Plain-text part, if any.
    pub fn text_part(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Both { text, .. } => Some(text),
            Self::Html(_) => None,
        }
    }
}

fn non_blank_body(value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingBody);
    }
    Ok(value)
}

#[derive(Debug, Clone, Default)]
pub struct EmailOptions {
    pub cc: Recipients,
    pub bcc: Recipients,
    pub reply_to: Option<Sender>,
    pub attachment: Option<Attachment>,
    /// Sent both as HTTP headers and inside the JSON body.
    pub headers: Headers,
    /// Image name → base64 content, referenced from the HTML body.
    pub inline_image: BTreeMap<String, String>,
}

/// Email sent through `POST /email`.
#[derive(Debug, Clone)]
pub struct Email {
    to: Recipients,
    from: Sender,
    subject: String,
    body: Body,
    options: EmailOptions,
}

impl Email {
    /// Name used in validation errors for the subject line.
    pub const SUBJECT_FIELD: &'static str = "subject";

    pub fn new(
        to: Recipients,
        from: Sender,
        subject: impl Into<String>,
        body: Body,
        options: EmailOptions,
    ) -> Result<Self, ValidationError> {
        if to.is_empty() {
            return Err(ValidationError::Empty {
                field: EmailAddress::FIELD,
            });
        }
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: Self::SUBJECT_FIELD,
            });
        }
        Ok(Self {
            to,
            from,
            subject,
            body,
            options,
        })
    }

    pub fn to(&self) -> &Recipients {
        &self.to
    }

    pub fn sender(&self) -> &Sender {
        &self.from
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn options(&self) -> &EmailOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateOptions {
    pub cc: Recipients,
    pub bcc: Recipients,
    /// Substitution attributes referenced by the template.
    pub attr: BTreeMap<String, String>,
    pub attachment: Option<Attachment>,
    pub headers: Headers,
}

/// Email rendered from a provider-hosted template (`POST /template/{id}`).
#[derive(Debug, Clone)]
pub struct TemplatedEmail {
    id: TemplateId,
    to: Recipients,
    options: TemplateOptions,
}

impl TemplatedEmail {
    pub fn new(
        id: TemplateId,
        to: Recipients,
        options: TemplateOptions,
    ) -> Result<Self, ValidationError> {
        if to.is_empty() {
            return Err(ValidationError::Empty {
                field: EmailAddress::FIELD,
            });
        }
        Ok(Self { id, to, options })
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn to(&self) -> &Recipients {
        &self.to
    }

    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsType {
    Marketing,
    Transactional,
}

impl SmsType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::Transactional => "transactional",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SmsOptions {
    /// Callback the provider notifies about delivery.
    pub web_url: Option<HttpUrl>,
    pub tag: Option<String>,
    pub kind: Option<SmsType>,
}

/// SMS sent through `POST /sms`.
#[derive(Debug, Clone)]
pub struct Sms {
    to: RawPhoneNumber,
    from: SmsSender,
    text: MessageText,
    options: SmsOptions,
}

impl Sms {
    pub fn new(to: RawPhoneNumber, from: SmsSender, text: MessageText, options: SmsOptions) -> Self {
        Self {
            to,
            from,
            text,
            options,
        }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn sender(&self) -> &SmsSender {
        &self.from
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn options(&self) -> &SmsOptions {
        &self.options
    }
}
