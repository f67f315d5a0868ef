//! Typed Rust client for the Sendinblue v2 transactional API.
//!
//! The crate has three layers: a domain layer of strong types, a transport
//! layer for wire-format quirks (JSON bodies, the `{code, message, data}`
//! envelope, webhook payloads), and a small client layer issuing one POST per
//! operation.
//!
//! ```rust,no_run
//! use sendinblue::{
//!     ApiKey, Body, Email, EmailAddress, EmailOptions, Recipients, Sender, SendinblueClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sendinblue::SendinblueError> {
//!     let client = SendinblueClient::new(ApiKey::new("...")?)?;
//!
//!     let mut to = Recipients::new();
//!     to.insert(EmailAddress::new("ada@example.com")?, "Ada".to_owned());
//!     let from = Sender::named(EmailAddress::new("shop@example.com")?, "Shop");
//!     let email = Email::new(to, from, "Hello", Body::text("hi")?, EmailOptions::default())?;
//!
//!     let response = client.send_email(&email).await?;
//!     println!("sent as {}", response.message_id()?);
//!     Ok(())
//! }
//! ```
//!
//! Webhook payloads are decoded independently of any client:
//!
//! ```rust
//! let event = sendinblue::decode_webhook(
//!     br#"{"event":"delivered","email":"a@b.com","id":1,"date":"2013-06-20 20:09:22"}"#,
//! )
//! .unwrap();
//! assert_eq!(event.event.as_str(), "delivered");
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    API_KEY_ENV, BASE_URL_ENV, ClientConfig, SendinblueClient, SendinblueClientBuilder,
    SendinblueError, TIMEOUT_ENV,
};
pub use domain::{
    ApiKey, Attachment, Body, Email, EmailAddress, EmailOptions, EmailResult, EventKind,
    EventTime, Headers, HttpUrl, KnownEventKind, KnownResponseCode, MessageText, PhoneNumber,
    RawPhoneNumber, Recipients, ResponseCode, ResponseData, ResponseEnvelope, ResponseKind, Sender,
    Sms, SmsOptions, SmsResult, SmsSender, SmsType, TemplateId, TemplateOptions, TemplatedEmail,
    TypeMismatchError, ValidationError, WebhookEvent,
};
pub use transport::{DecodeError, decode_response, decode_webhook};
