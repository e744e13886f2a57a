/// SMTP notification for new submissions
use crate::{
    config::SmtpSettings,
    error::{Result, ServerError},
    services::submissions::{ContactEntry, Upload},
};
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    /// Build a mailer when SMTP is fully configured, `None` otherwise
    pub fn from_settings(settings: &SmtpSettings) -> Result<Option<Self>> {
        if !settings.is_complete() {
            return Ok(None);
        }

        let host = settings.host.as_deref().unwrap_or_default();
        let user = settings.user.clone().unwrap_or_default();
        let pass = settings.pass.clone().unwrap_or_default();

        let from = settings
            .from
            .as_deref()
            .filter(|from| !from.is_empty())
            .unwrap_or(&user);
        let from: Mailbox = from
            .parse()
            .map_err(|e| ServerError::Config(format!("Invalid SMTP sender {:?}: {}", from, e)))?;
        let to: Mailbox = settings
            .to
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e| ServerError::Config(format!("Invalid SMTP recipient: {}", e)))?;

        let builder = if settings.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| ServerError::Config(format!("Invalid SMTP host {:?}: {}", host, e)))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(user, pass))
            .build();

        Ok(Some(Self {
            transport,
            from,
            to,
        }))
    }

    /// Compose the notification for `entry`
    pub fn compose(&self, entry: &ContactEntry, upload: Option<&Upload>) -> Result<Message> {
        compose(&self.from, &self.to, entry, upload)
    }

    pub async fn send(&self, entry: &ContactEntry, upload: Option<&Upload>) -> Result<()> {
        let message = self.compose(entry, upload)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| ServerError::Mail(e.to_string()))?;
        tracing::info!("Notification sent for {}", entry.email);
        Ok(())
    }
}

fn compose(
    from: &Mailbox,
    to: &Mailbox,
    entry: &ContactEntry,
    upload: Option<&Upload>,
) -> Result<Message> {
    let mut builder = Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(format!("Novy kontakt: {}", entry.subject));

    match entry.email.parse::<Mailbox>() {
        Ok(sender) => builder = builder.reply_to(sender),
        Err(e) => tracing::warn!("Skipping Reply-To for {:?}: {}", entry.email, e),
    }

    let phone = if entry.phone.is_empty() {
        "-"
    } else {
        entry.phone.as_str()
    };
    let text = format!(
        "Jmeno: {}\nE-mail: {}\nTelefon: {}\n\nZprava:\n{}",
        entry.name, entry.email, phone, entry.message
    );

    let message = match upload {
        Some(file) => {
            let content_type = ContentType::parse(&file.content_type)
                .or_else(|_| ContentType::parse("application/octet-stream"))
                .map_err(|e| ServerError::Mail(format!("Invalid attachment type: {}", e)))?;
            let attachment =
                Attachment::new(file.file_name.clone()).body(file.bytes.to_vec(), content_type);

            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(text))
                    .singlepart(attachment),
            )
        }
        None => builder.body(text),
    };

    message.map_err(|e| ServerError::Mail(e.to_string()))
}
