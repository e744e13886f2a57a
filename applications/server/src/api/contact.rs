/// Contact relay API routes
use crate::{
    error::{Result, ServerError},
    services::submissions::{ContactEntry, FileInfo, Upload},
    state::AppState,
};
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::Serialize;

/// Largest accepted attachment (10 MiB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Request body cap: one full attachment plus room for the text fields
pub const MAX_BODY_SIZE: usize = MAX_FILE_SIZE + 1024 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub ok: bool,
    pub mail_sent: bool,
}

/// Fields of the page's contact form
#[derive(Debug, Default)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: String,
    pub consent: String,
    pub captcha: Option<String>,
    pub file: Option<Upload>,
}

impl ContactFields {
    /// Parse a `multipart/form-data` body
    ///
    /// A body of any other type yields no fields at all.
    pub async fn parse(headers: &HeaderMap, body: Bytes) -> Result<Self> {
        let content_type = headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        let Ok(boundary) = multer::parse_boundary(content_type) else {
            return Ok(Self::default());
        };

        let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);
        let mut fields = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == "file" {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    ServerError::BadRequest(format!("Failed to read file: {}", e))
                })?;

                // An empty file input still sends a nameless part
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                fields.file = Some(Upload {
                    file_name,
                    content_type,
                    bytes,
                });
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read {}: {}", name, e)))?;

            match name.as_str() {
                "name" => fields.name = value,
                "email" => fields.email = value,
                "subject" => fields.subject = value,
                "message" => fields.message = value,
                "phone" => fields.phone = value,
                "consent" => fields.consent = value,
                "g-recaptcha-response" => fields.captcha = Some(value),
                _ => {}
            }
        }

        Ok(fields)
    }

    pub fn has_required(&self) -> bool {
        [
            &self.name,
            &self.email,
            &self.subject,
            &self.message,
            &self.consent,
        ]
        .iter()
        .all(|value| !value.is_empty())
    }

    pub fn to_entry(&self) -> ContactEntry {
        ContactEntry {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            phone: self.phone.clone(),
            consent: !self.consent.is_empty(),
            file: self.file.as_ref().map(|file| FileInfo {
                name: file.file_name.clone(),
                content_type: file.content_type.clone(),
                size: file.bytes.len(),
            }),
            created_at: Utc::now(),
        }
    }
}

/// POST /api/contact
/// Store a contact submission and notify by mail when SMTP is configured
pub async fn submit(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ContactResponse>> {
    let fields = ContactFields::parse(&headers, body).await?;

    if !fields.has_required() {
        return Err(ServerError::MissingFields);
    }

    if fields
        .file
        .as_ref()
        .is_some_and(|file| file.bytes.len() > MAX_FILE_SIZE)
    {
        return Err(ServerError::FileTooLarge);
    }

    let check = app_state.captcha.verify(fields.captcha.as_deref()).await?;
    if !check.is_ok() {
        return Err(ServerError::CaptchaFailed);
    }

    let entry = fields.to_entry();
    let stored = app_state
        .submissions
        .store(&entry, fields.file.as_ref())
        .await?;
    tracing::info!("Stored contact submission at {:?}", stored.entry_path);

    let mut mail_sent = false;
    if let Some(mailer) = &app_state.mailer {
        mailer.send(&entry, fields.file.as_ref()).await?;
        mail_sent = true;
    }

    Ok(Json(ContactResponse {
        ok: true,
        mail_sent,
    }))
}
