//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;
mod webhook;

pub use request::{
    Attachment, Body, Email, EmailOptions, Sms, SmsOptions, SmsType, TemplateOptions,
    TemplatedEmail,
};
pub use response::{
    EmailResult, ResponseData, ResponseEnvelope, ResponseKind, SmsResult, TypeMismatchError,
};
pub use validation::ValidationError;
pub use value::{
    ApiKey, EmailAddress, EventKind, Headers, HttpUrl, KnownEventKind, KnownResponseCode,
    MessageText, PhoneNumber, RawPhoneNumber, Recipients, ResponseCode, Sender, SmsSender,
    TemplateId,
};
pub use webhook::{EventTime, WebhookEvent};
