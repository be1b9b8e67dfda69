pub mod templates;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// A single outbound message. Mails with an HTML body are sent as
/// `multipart/alternative` with the text part first.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), String>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP relay error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), String> {
        let message = build_message(mail)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}

pub fn build_message(mail: &OutgoingMail) -> Result<Message, String> {
    let builder = Message::builder()
        .from(
            mail.from
                .parse()
                .map_err(|e| format!("Invalid from address: {e}"))?,
        )
        .to(mail
            .to
            .parse()
            .map_err(|e| format!("Invalid to address: {e}"))?)
        .subject(mail.subject.as_str());

    let message = match &mail.html {
        Some(html) => builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(mail.text.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html.clone()),
                ),
        ),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(mail.text.clone()),
    };

    message.map_err(|e| format!("Failed to build email: {e}"))
}
