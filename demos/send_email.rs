use std::io;

use sendinblue::{
    Body, Email, EmailAddress, EmailOptions, Recipients, Sender, SendinblueClientBuilder,
};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sendinblue=debug")),
        )
        .init();

    let to_raw = required("SENDINBLUE_TO")?;
    let from_raw = required("SENDINBLUE_FROM")?;
    let subject = std::env::var("SENDINBLUE_SUBJECT")
        .unwrap_or_else(|_| "Hello from the sendinblue demo.".to_owned());

    // SENDINBLUE_API_KEY plus the optional base URL and timeout overrides.
    let client = SendinblueClientBuilder::from_env()?.build()?;

    let mut to = Recipients::new();
    to.insert(EmailAddress::new(to_raw)?, String::new());
    let email = Email::new(
        to,
        Sender::new(EmailAddress::new(from_raw)?),
        subject,
        Body::both("<p>This is just a test.</p>", "This is just a test.")?,
        EmailOptions::default(),
    )?;

    let response = client.send_email(&email).await?;
    println!(
        "code: {}, message: {:?}, message-id: {:?}",
        response.code.as_str(),
        response.message,
        response.message_id().ok()
    );

    Ok(())
}
