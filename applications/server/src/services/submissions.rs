/// Submission storage - contact entries and uploads on disk
use crate::error::Result;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Uploaded attachment, held in memory
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Attachment summary recorded in the entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: usize,
}

/// One stored contact submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEntry {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: String,
    pub consent: bool,
    pub file: Option<FileInfo>,
    pub created_at: DateTime<Utc>,
}

/// Where a submission landed
#[derive(Debug, Clone)]
pub struct StoredSubmission {
    pub entry_path: PathBuf,
    pub upload_path: Option<PathBuf>,
}

const UNSAFE_RUN_PATTERN: &str = r"[^a-zA-Z0-9._-]+";

#[derive(Debug, Clone)]
pub struct SubmissionStore {
    data_dir: PathBuf,
    unsafe_run: Regex,
}

impl SubmissionStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            data_dir,
            unsafe_run: Regex::new(UNSAFE_RUN_PATTERN)?,
        })
    }

    /// Replace every run of characters outside `[a-zA-Z0-9._-]` with one `_`
    pub fn sanitize_name(&self, value: &str) -> String {
        self.unsafe_run.replace_all(value, "_").into_owned()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// Write the entry as `<millis>-<name>.json` and the upload under `uploads/`
    pub async fn store(
        &self,
        entry: &ContactEntry,
        upload: Option<&Upload>,
    ) -> Result<StoredSubmission> {
        fs::create_dir_all(&self.data_dir).await?;

        let stamp = entry.created_at.timestamp_millis();
        let safe_name = match entry.name.as_str() {
            "" => "contact".to_string(),
            name => self.sanitize_name(name),
        };
        let entry_path = self.data_dir.join(format!("{}-{}.json", stamp, safe_name));
        fs::write(&entry_path, serde_json::to_string_pretty(entry)?).await?;

        let upload_path = match upload {
            Some(file) => {
                let uploads_dir = self.uploads_dir();
                fs::create_dir_all(&uploads_dir).await?;

                let file_name = match file.file_name.as_str() {
                    "" => format!("upload-{}", stamp),
                    name => self.sanitize_name(name),
                };
                let path = uploads_dir.join(format!("{}-{}", stamp, file_name));
                fs::write(&path, &file.bytes).await?;
                Some(path)
            }
            None => None,
        };

        Ok(StoredSubmission {
            entry_path,
            upload_path,
        })
    }
}
