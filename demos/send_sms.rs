use std::io;

use sendinblue::{
    MessageText, PhoneNumber, SendinblueClientBuilder, Sms, SmsOptions, SmsSender, SmsType,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sendinblue=debug")),
        )
        .init();

    let phone_raw = std::env::var("SENDINBLUE_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SENDINBLUE_PHONE environment variable is required (E.164, e.g. +33689965433)",
        )
    })?;
    let sender = std::env::var("SENDINBLUE_SMS_FROM").unwrap_or_else(|_| "Demo".to_owned());
    let message = std::env::var("SENDINBLUE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the sendinblue demo.".to_owned());

    let client = SendinblueClientBuilder::from_env()?.build()?;
    let sms = Sms::new(
        PhoneNumber::parse(None, phone_raw)?.into(),
        SmsSender::new(sender)?,
        MessageText::new(message)?,
        SmsOptions {
            kind: Some(SmsType::Transactional),
            ..Default::default()
        },
    );

    let response = client.send_sms(&sms).await?;
    let result = response.sms_result()?;
    println!(
        "status: {}, sms_count: {:?}, remaining_credit: {:?}",
        result.status, result.sms_count, result.remaining_credit
    );

    Ok(())
}
