use std::collections::BTreeMap;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sendinblue API key, sent in the `api-key` header.
///
/// Invariant: non-empty after trimming and made of visible ASCII only, so it
/// is always a valid header value.
pub struct ApiKey(String);

impl ApiKey {
    /// Name used in validation errors and environment lookups.
    pub const FIELD: &'static str = "api-key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ValidationError::InvalidHeader {
                name: Self::FIELD.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Email address used as a recipient or sender.
///
/// Invariant: trimmed, no whitespace, exactly one `@` with a non-empty local part
/// and domain. Deliverability is the provider's concern.
pub struct EmailAddress(String);

impl EmailAddress {
    /// JSON field name for primary recipients (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated [`EmailAddress`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let valid = match trimmed.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !trimmed.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(ValidationError::InvalidEmailAddress {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Address → display name mapping used for `to`, `cc` and `bcc`.
pub type Recipients = BTreeMap<EmailAddress, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Address with an optional display name (`from`, `replyto`).
///
/// Serialized by the provider as a `["address", "name"]` pair.
pub struct Sender {
    address: EmailAddress,
    name: Option<String>,
}

impl Sender {
    /// Sender without a display name.
    pub fn new(address: EmailAddress) -> Self {
        Self {
            address,
            name: None,
        }
    }

    /// Sender with a display name. A blank name is dropped.
    pub fn named(address: EmailAddress, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        Self { address, name }
    }

    pub fn address(&self) -> &EmailAddress {
        &self.address
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Absolute `http`/`https` URL.
///
/// Used for the API base URL, SMS delivery callbacks and attachment links.
pub struct HttpUrl(url::Url);

impl HttpUrl {
    /// Parse and validate a URL. `field` names the value in errors.
    pub fn parse(field: &'static str, value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(ValidationError::Empty { field });
        }
        let parsed = url::Url::parse(value).map_err(|_| ValidationError::InvalidUrl {
            field,
            input: value.to_owned(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
            return Err(ValidationError::InvalidUrl {
                field,
                input: value.to_owned(),
            });
        }
        Ok(Self(parsed))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Append a resource path (`/email`, `/template/7`) to this URL.
    ///
    /// Trailing slashes on the base are ignored so `https://host/v2.0/` and
    /// `https://host/v2.0` resolve identically.
    pub fn join_path(&self, path: &str) -> String {
        format!("{}{}", self.0.as_str().trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Extra HTTP headers requested by the caller.
///
/// Names are RFC 7230 tokens and values contain no control characters, so every
/// entry can be put on the wire unchanged. Names are unique ignoring ASCII case,
/// and the connection-framing headers in [`Headers::RESERVED`] are refused.
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Names the HTTP client derives from the request itself.
    pub const RESERVED: [&'static str; 4] =
        ["content-length", "transfer-encoding", "host", "connection"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, replacing any earlier one whose name differs only in case.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        let value = value.into();
        if !is_token(&name)
            || Self::RESERVED
                .iter()
                .any(|reserved| name.eq_ignore_ascii_case(reserved))
            || value.chars().any(|c| c.is_control() && c != '\t')
        {
            return Err(ValidationError::InvalidHeader { name });
        }
        self.0.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.0.insert(name, value);
        Ok(())
    }

    /// Builder-style [`Headers::insert`].
    pub fn with(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Look a header up, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of a template hosted by the provider.
///
/// Invariant: non-zero.
pub struct TemplateId(u32);

impl TemplateId {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "id";

    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidNumber {
                field: Self::FIELD,
                input: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS sender (`from`).
///
/// Invariant: non-empty after trimming; at most 11 characters when alphanumeric,
/// at most 15 digits when numeric.
pub struct SmsSender(String);

impl SmsSender {
    /// JSON field name (`from`).
    pub const FIELD: &'static str = "from";

    /// Maximum length of an alphanumeric sender.
    pub const MAX_ALPHANUMERIC: usize = 11;
    /// Maximum length of a numeric sender.
    pub const MAX_NUMERIC: usize = 15;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let max = if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Self::MAX_NUMERIC
        } else {
            Self::MAX_ALPHANUMERIC
        };
        let actual = trimmed.chars().count();
        if actual > max {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// SMS body (`text`), kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageText(String);

impl MessageText {
    pub const FIELD: &'static str = "text";

    /// Rejects text that is empty or only whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Destination number exactly as it goes into the SMS `to` field.
///
/// The provider wants the country code followed by the subscriber number
/// (`33689965433`). Nothing is normalized here; go through [`PhoneNumber`]
/// when the input comes from users.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    pub const FIELD: &'static str = "to";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        match value.trim() {
            "" => Err(ValidationError::Empty { field: Self::FIELD }),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    fn from(value: PhoneNumber) -> Self {
        Self(value.international_digits().to_owned())
    }
}

/// Phone number checked with `phonenumber` and kept in E.164 form.
///
/// Two numbers are equal when their E.164 forms are.
#[derive(Debug, Clone)]
pub struct PhoneNumber {
    input: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    pub const FIELD: &'static str = "to";

    /// Parse `input`, using `region` for numbers written without a `+` prefix.
    pub fn parse(
        region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into().trim().to_owned();
        if input.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = match phonenumber::parse(region, &input) {
            Ok(parsed) if phonenumber::is_valid(&parsed) => parsed,
            _ => return Err(ValidationError::InvalidPhoneNumber { input }),
        };
        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self {
            input,
            e164,
            parsed,
        })
    }

    /// Input as given, trimmed.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// E.164 without the leading `+`, the form the SMS endpoint accepts.
    pub fn international_digits(&self) -> &str {
        self.e164.trim_start_matches('+')
    }

    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Provider status string from the response envelope (`code`).
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct ResponseCode(String);

impl ResponseCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this code to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownResponseCode> {
        KnownResponseCode::from_code(&self.0)
    }

    /// Returns `true` only for the provider's `success` code.
    pub fn is_success(&self) -> bool {
        self.known() == Some(KnownResponseCode::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Envelope codes documented by the provider.
pub enum KnownResponseCode {
    Success,
    Failure,
    Error,
}

impl KnownResponseCode {
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "error" => Self::Error,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Webhook event kind (`event`), preserved verbatim.
pub struct EventKind(String);

impl EventKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn known(&self) -> Option<KnownEventKind> {
        KnownEventKind::from_name(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Delivery-lifecycle events the provider reports through webhooks.
pub enum KnownEventKind {
    Request,
    Delivered,
    Opened,
    UniqueOpened,
    Click,
    Bounce,
    HardBounce,
    SoftBounce,
    Deferred,
    Blocked,
    Spam,
    InvalidEmail,
    Unsubscribe,
}

impl KnownEventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "request" => Self::Request,
            "delivered" => Self::Delivered,
            "opened" => Self::Opened,
            "unique_opened" => Self::UniqueOpened,
            "click" => Self::Click,
            "bounce" => Self::Bounce,
            "hard_bounce" => Self::HardBounce,
            "soft_bounce" => Self::SoftBounce,
            "deferred" => Self::Deferred,
            "blocked" => Self::Blocked,
            "spam" => Self::Spam,
            "invalid_email" => Self::InvalidEmail,
            "unsubscribe" => Self::Unsubscribe,
            _ => return None,
        })
    }

    /// Events whose payload carries a meaningful `reason`.
    pub fn carries_reason(self) -> bool {
        matches!(
            self,
            Self::Bounce
                | Self::HardBounce
                | Self::SoftBounce
                | Self::Deferred
                | Self::Blocked
                | Self::InvalidEmail
        )
    }

    /// Events whose payload carries a meaningful `link`.
    pub fn carries_link(self) -> bool {
        matches!(self, Self::Click)
    }
}
