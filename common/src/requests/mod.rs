//! Payloads the client sends to the backend, with the local validation that
//! runs before any of them reaches the network.

use serde::Serialize;

use crate::error::ApiError;
use crate::model::ScanType;

/// Largest file the backend accepts.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Extensions the backend accepts for analysis.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["pdf", "csv", "json", "txt", "md"];

pub const MIN_PASSWORD_LEN: usize = 8;

/// Credentials for `POST /auth/login`, sent form-encoded with the email in
/// the `username` field.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() {
            return Err(ApiError::validation("Email is required"));
        }
        if self.password.is_empty() {
            return Err(ApiError::validation("Password is required"));
        }
        Ok(())
    }

    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.email.trim().to_string()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() {
            return Err(ApiError::validation("Email is required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Payload for `POST /jobs/evidence-run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateJobRequest {
    pub framework: String,
    pub document_ids: Vec<String>,
    pub scan_type: ScanType,
}

impl CreateJobRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.document_ids.is_empty() {
            return Err(ApiError::validation("Please upload documents first"));
        }
        Ok(())
    }
}

/// A file picked for upload, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Lower-cased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        match self.extension() {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => {
                return Err(ApiError::validation(format!(
                    "File type not allowed for {}. Allowed: {}",
                    self.file_name,
                    ALLOWED_EXTENSIONS.join(", ")
                )));
            }
        }
        if self.bytes.len() as u64 > MAX_UPLOAD_BYTES {
            return Err(ApiError::validation(format!(
                "{} exceeds the 50 MB upload limit",
                self.file_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_rejects_unknown_extensions() {
        let file = UploadFile::new("payload.exe", "application/octet-stream", vec![1, 2, 3]);
        assert!(matches!(file.validate(), Err(ApiError::Validation(_))));

        let no_ext = UploadFile::new("README", "text/plain", vec![]);
        assert!(no_ext.validate().is_err());
    }

    #[test]
    fn upload_accepts_policy_documents_case_insensitively() {
        let file = UploadFile::new("Access Policy.PDF", "application/pdf", vec![0; 16]);
        assert_eq!(file.extension().as_deref(), Some("pdf"));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn upload_rejects_oversized_files() {
        let file = UploadFile::new(
            "huge.csv",
            "text/csv",
            vec![0; (MAX_UPLOAD_BYTES + 1) as usize],
        );
        let err = file.validate().unwrap_err();
        assert!(err.message().contains("50 MB"));
    }

    #[test]
    fn job_request_needs_documents() {
        let request = CreateJobRequest {
            framework: "soc2".into(),
            document_ids: vec![],
            scan_type: ScanType::Quick,
        };
        assert_eq!(
            request.validate(),
            Err(ApiError::Validation("Please upload documents first".into()))
        );
    }

    #[test]
    fn register_enforces_password_length() {
        let request = RegisterRequest {
            email: "ops@example.com".into(),
            password: "short".into(),
            full_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn login_sends_email_as_username() {
        let request = LoginRequest {
            email: " ops@example.com ".into(),
            password: "hunter22".into(),
        };
        assert_eq!(
            request.form_fields(),
            vec![
                ("username".to_string(), "ops@example.com".to_string()),
                ("password".to_string(), "hunter22".to_string()),
            ]
        );
    }
}
