use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::draft::{ApplicationDraft, LocationPath};

/// Identifier wrapper for persisted expert applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpertId(pub String);

impl ExpertId {
    /// Key format of the existing system of record: submission millis plus
    /// the applicant's name uppercased with whitespace collapsed to
    /// underscores. Collision avoidance is weak; kept as a known limitation
    /// because a stronger scheme would orphan the existing keyspace.
    pub fn derive(full_name: &str, submitted_at: DateTime<Utc>) -> Self {
        let name = full_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_uppercase();
        ExpertId(format!(
            "EXPERT_{}_{}",
            submitted_at.timestamp_millis(),
            name
        ))
    }
}

/// Review state assigned by the verification team after intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

/// Flat fee credited per delivered advisory report.
pub const DEFAULT_PAYMENT_PER_REPORT: u32 = 50;

/// Encoded credential payloads embedded in the record. A slot the applicant
/// left empty is stored as an empty string, never omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPayloads {
    pub degree_certificate: String,
    pub professional_id: String,
}

/// Encoded outputs of the three attachment slots, ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAttachments {
    pub degree_certificate: String,
    pub professional_id: String,
    pub profile_photo: String,
}

/// Immutable snapshot persisted for one accepted application. Built once at
/// submit time from the draft; a retry rebuilds a fresh record rather than
/// patching this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertRecord {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub profile_photo: String,
    pub bio: String,
    pub location: LocationPath,
    pub qualification: String,
    pub affiliation: String,
    pub experience_years: String,
    pub specializations: Vec<String>,
    pub credentials: CredentialPayloads,
    pub payment_per_report: u32,
    pub is_available: bool,
    pub verification_status: VerificationStatus,
    pub rating_avg: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpertRecord {
    pub fn from_draft(
        draft: &ApplicationDraft,
        attachments: EncodedAttachments,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: draft.full_name.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            profile_photo: attachments.profile_photo,
            bio: draft.bio.clone(),
            location: draft.location.clone(),
            qualification: draft.qualification.clone(),
            affiliation: draft.affiliation.clone(),
            experience_years: draft.experience_years.clone(),
            specializations: draft.specializations.iter().cloned().collect(),
            credentials: CredentialPayloads {
                degree_certificate: attachments.degree_certificate,
                professional_id: attachments.professional_id,
            },
            payment_per_report: DEFAULT_PAYMENT_PER_REPORT,
            is_available: true,
            verification_status: VerificationStatus::Pending,
            rating_avg: 0.0,
            created_at: submitted_at,
            updated_at: submitted_at,
        }
    }

    /// Flat, human-readable projection carried by the confirmation
    /// notification. Encoded attachment payloads are deliberately excluded.
    pub fn confirmation_message(&self) -> ConfirmationMessage {
        ConfirmationMessage {
            to_name: self.name.clone(),
            to_email: self.email.clone(),
            mobile_number: self.phone.clone(),
            region: self.location.region.clone(),
            district: self.location.district.clone(),
            subdistrict: self.location.subdistrict.clone(),
            qualification: self.qualification.clone(),
            affiliation: self.affiliation.clone(),
            experience_years: self.experience_years.clone(),
            specializations: self.specializations.join(", "),
            bio: self.bio.clone(),
            submission_date: self.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Named string fields handed to the templated-message transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationMessage {
    pub to_name: String,
    pub to_email: String,
    pub mobile_number: String,
    pub region: String,
    pub district: String,
    pub subdistrict: String,
    pub qualification: String,
    pub affiliation: String,
    pub experience_years: String,
    pub specializations: String,
    pub bio: String,
    pub submission_date: String,
}

/// Storage abstraction so the pipeline can be exercised in isolation. One
/// create-or-overwrite operation keyed by the derived identifier; there is no
/// read, update, or delete path in this workflow.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn put(&self, id: &ExpertId, record: &ExpertRecord) -> Result<(), PersistenceError>;
}

/// Record write failure. Fatal to the submission attempt: the draft is left
/// untouched so a retry is cheap.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("application store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound confirmation hook (e.g. a templated e-mail adapter).
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    async fn send(&self, message: &ConfirmationMessage) -> Result<(), NotificationError>;
}

/// Confirmation dispatch failure. Logged, never surfaced, never blocks an
/// accepted application.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("confirmation transport failed: {0}")]
    Transport(String),
}
