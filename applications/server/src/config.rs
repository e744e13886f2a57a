/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_site")]
    pub site: SiteSettings,

    #[serde(default = "default_smtp")]
    pub smtp: SmtpSettings,

    #[serde(default = "default_captcha")]
    pub captcha: CaptchaSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Public directory served as-is, and where submissions are written.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteSettings {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_data")]
    pub data: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SmtpSettings {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub pass: Option<String>,

    /// Sender address; falls back to `user`
    #[serde(default)]
    pub from: Option<String>,

    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptchaSettings {
    /// reCAPTCHA secret; verification is skipped without it
    #[serde(default)]
    pub secret: Option<String>,

    #[serde(default = "default_captcha_url")]
    pub url: String,
}

impl SmtpSettings {
    /// Host, user, password and recipient are all set
    pub fn is_complete(&self) -> bool {
        [&self.host, &self.user, &self.pass, &self.to]
            .iter()
            .all(|value| value.as_deref().is_some_and(|v| !v.is_empty()))
    }

    /// Port 465 speaks TLS from the first byte; anything else upgrades via STARTTLS
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `config.toml` in the working
    /// directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with KSN_)
        settings = settings.add_source(
            config::Environment::with_prefix("KSN")
                .separator("_")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ServerError::Config(
                "Host is required (set KSN_SERVER_HOST)".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ServerError::Config(
                "Port must be non-zero (set KSN_SERVER_PORT)".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_site() -> SiteSettings {
    SiteSettings {
        root: default_root(),
        data: default_data(),
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_data() -> PathBuf {
    PathBuf::from("./.data")
}

fn default_smtp() -> SmtpSettings {
    SmtpSettings {
        port: default_smtp_port(),
        ..SmtpSettings::default()
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_captcha() -> CaptchaSettings {
    CaptchaSettings {
        secret: None,
        url: default_captcha_url(),
    }
}

fn default_captcha_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            site: default_site(),
            smtp: default_smtp(),
            captcha: default_captcha(),
        }
    }
}
