//! SMTP feedback mailer
//!
//! Sends the volunteer feedback report to the configured recipients, with the
//! optional screenshot attached. The SMTP transport is synchronous, so the
//! send runs on the blocking pool.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;
use treetag_common::config::SmtpSettings;
use treetag_common::{Error, Result};

/// Feedback report fields from the form
#[derive(Debug, Clone)]
pub struct Report {
    pub comment: String,
    pub clarity: String,
    pub helpful: String,
    pub unsafe_flag: String,
    pub screenshot: Option<(String, Vec<u8>)>,
}

pub struct Mailer {
    settings: Option<SmtpSettings>,
}

impl Mailer {
    pub fn new(settings: Option<SmtpSettings>) -> Self {
        Self { settings }
    }

    pub async fn send_report(&self, report: Report) -> Result<()> {
        let settings = self
            .settings
            .clone()
            .ok_or_else(|| Error::Config("SMTP settings are not configured".into()))?;

        tokio::task::spawn_blocking(move || send_blocking(&settings, report))
            .await
            .map_err(|e| Error::Internal(format!("mailer task: {e}")))?
    }
}

fn send_blocking(settings: &SmtpSettings, report: Report) -> Result<()> {
    let body = format!(
        "Comment: {}\nClarity: {}\nHelpful: {}\nUnsafe: {}\n",
        report.comment, report.clarity, report.helpful, report.unsafe_flag
    );

    let mut builder = Message::builder()
        .from(
            settings
                .username
                .parse()
                .map_err(|e| Error::Config(format!("SMTP sender address: {e}")))?,
        )
        .subject("Feedback Report");
    for recipient in &settings.recipients {
        builder = builder.to(recipient
            .parse()
            .map_err(|e| Error::Config(format!("SMTP recipient {recipient}: {e}")))?);
    }

    let email = match report.screenshot {
        Some((filename, bytes)) => {
            let attachment = Attachment::new(filename).body(
                bytes,
                ContentType::parse("image/png")
                    .map_err(|e| Error::Internal(format!("attachment content type: {e}")))?,
            );
            builder
                .multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body))
                        .singlepart(attachment),
                )
                .map_err(|e| Error::Internal(format!("report message: {e}")))?
        }
        None => builder
            .singlepart(SinglePart::plain(body))
            .map_err(|e| Error::Internal(format!("report message: {e}")))?,
    };

    let transport = SmtpTransport::starttls_relay(&settings.host)
        .map_err(|e| Error::Config(format!("SMTP relay {}: {e}", settings.host)))?
        .credentials(Credentials::new(
            settings.username.clone(),
            settings.password.clone(),
        ))
        .build();

    transport
        .send(&email)
        .map_err(|e| Error::Internal(format!("report send: {e}")))?;
    info!("feedback report sent to {} recipient(s)", settings.recipients.len());
    Ok(())
}
