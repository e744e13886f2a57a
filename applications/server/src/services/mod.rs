/// Server services
pub mod captcha;
pub mod mailer;
pub mod submissions;

pub use captcha::{CaptchaCheck, CaptchaVerifier};
pub use mailer::Mailer;
pub use submissions::{ContactEntry, SubmissionStore, Upload};
