/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use ksn_server::{
    config::CaptchaSettings, create_router, AppState, CaptchaVerifier, SubmissionStore,
};
use std::{path::PathBuf, sync::Arc};
use tempfile::TempDir;

pub const BOUNDARY: &str = "ksn-test-boundary";

/// Router over a temporary public directory, without SMTP
pub struct TestApp {
    pub router: Router,
    pub public_dir: TempDir,
    pub data_dir: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_captcha(CaptchaSettings {
            secret: None,
            url: "http://127.0.0.1:1/siteverify".to_string(),
        })
    }

    pub fn with_captcha(settings: CaptchaSettings) -> Self {
        let public_dir = TempDir::new().unwrap();
        let data_dir = public_dir.path().join(".data");

        let submissions = Arc::new(SubmissionStore::new(data_dir.clone()).unwrap());
        let captcha = Arc::new(CaptchaVerifier::new(&settings).unwrap());
        let app_state = AppState::new(submissions, captcha, None);

        let router = create_router(app_state, public_dir.path());

        Self {
            router,
            public_dir,
            data_dir,
        }
    }

    /// Put a file into the public directory
    pub fn publish(&self, relative: &str, contents: &str) {
        let path = self.public_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// Stored entry files, sorted by name
    pub fn entries(&self) -> Vec<PathBuf> {
        list_files(&self.data_dir, "json")
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        list_files(&self.data_dir.join("uploads"), "")
    }
}

fn list_files(dir: &std::path::Path, extension: &str) -> Vec<PathBuf> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = read_dir
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_file())
        .filter(|path| {
            extension.is_empty() || path.extension().and_then(|e| e.to_str()) == Some(extension)
        })
        .collect();
    files.sort();
    files
}

/// Builder for `multipart/form-data` request bodies
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fields of a complete, valid submission
    pub fn valid() -> Self {
        Self::new()
            .text("name", "Jana Dvořáková")
            .text("email", "jana@example.cz")
            .text("subject", "booking")
            .text("message", "Máte volno 14. června?")
            .text("phone", "+420 777 123 456")
            .text("consent", "on")
            .text("form-name", "contact")
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .uri("/api/contact")
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn read_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
