use std::io::Read;

use sendinblue::{EventTime, decode_webhook};

/// Reads one webhook payload from stdin and prints the decoded event.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut payload = Vec::new();
    std::io::stdin().read_to_end(&mut payload)?;

    let event = decode_webhook(&payload)?;
    println!("event: {} for {}", event.event.as_str(), event.email);
    match event.time() {
        EventTime::Gmt(at) => println!("at: {at} (from ts)"),
        EventTime::Unzoned(at) => println!("at: {at} (provider local time)"),
    }
    if let Some(reason) = &event.reason {
        println!("reason: {reason}");
    }
    if let Some(link) = &event.link {
        println!("link: {link}");
    }

    Ok(())
}
