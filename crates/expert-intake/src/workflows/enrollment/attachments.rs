use std::path::PathBuf;

use base64::{engine::general_purpose, Engine as _};

/// Payload recorded for a profile photo the applicant never supplied.
pub const MISSING_PHOTO_PLACEHOLDER: &str = "default_avatar.png";

/// The three attachment positions collected by the enrollment wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSlot {
    DegreeCertificate,
    ProfessionalId,
    ProfilePhoto,
}

impl AttachmentSlot {
    pub const fn label(self) -> &'static str {
        match self {
            AttachmentSlot::DegreeCertificate => "degree_certificate",
            AttachmentSlot::ProfessionalId => "professional_id",
            AttachmentSlot::ProfilePhoto => "profile_photo",
        }
    }

    /// Payload recorded when the applicant left the slot empty. Empty slots
    /// are always materialized in the record, never omitted.
    pub const fn missing_payload(self) -> &'static str {
        match self {
            AttachmentSlot::ProfilePhoto => MISSING_PHOTO_PLACEHOLDER,
            AttachmentSlot::DegreeCertificate | AttachmentSlot::ProfessionalId => "",
        }
    }
}

/// A binary file handle captured by the wizard. Replaceable per slot until
/// submission succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub media_type: String,
    pub source: AttachmentSource,
}

/// Where the attachment bytes come from at encoding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    Bytes(Vec<u8>),
    File(PathBuf),
}

impl AttachmentUpload {
    pub fn from_bytes(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            source: AttachmentSource::Bytes(bytes),
        }
    }

    pub fn from_file(path: PathBuf, media_type: impl Into<String>) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            media_type: media_type.into(),
            source: AttachmentSource::File(path),
        }
    }
}

/// Raised when the attachment bytes can no longer be read. Aborts the whole
/// submission attempt; an unreadable file is never silently dropped.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("could not read attachment '{file_name}': {source}")]
    Unreadable {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Encode one attachment into a self-contained textual payload suitable for
/// embedding in the submission record.
pub async fn encode(upload: &AttachmentUpload) -> Result<String, EncodingError> {
    let bytes = match &upload.source {
        AttachmentSource::Bytes(bytes) => bytes.clone(),
        AttachmentSource::File(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| EncodingError::Unreadable {
                    file_name: upload.file_name.clone(),
                    source,
                })?
        }
    };

    let media_type = if upload.media_type.is_empty() {
        mime::APPLICATION_OCTET_STREAM.as_ref()
    } else {
        upload.media_type.as_str()
    };

    Ok(format!(
        "data:{};base64,{}",
        media_type,
        general_purpose::STANDARD.encode(&bytes)
    ))
}

/// Encode a slot, falling back to its fixed placeholder when empty.
pub async fn encode_slot(
    slot: AttachmentSlot,
    upload: Option<&AttachmentUpload>,
) -> Result<String, EncodingError> {
    match upload {
        Some(upload) => encode(upload).await,
        None => Ok(slot.missing_payload().to_string()),
    }
}
