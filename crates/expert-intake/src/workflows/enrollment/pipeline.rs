use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::attachments::{encode_slot, AttachmentSlot, EncodingError};
use super::draft::ApplicationDraft;
use super::record::{
    ApplicationStore, ConfirmationMailer, EncodedAttachments, ExpertId, ExpertRecord,
    PersistenceError,
};

/// Two-phase submission: durable persistence must fully succeed, the
/// confirmation notification is best-effort. The system of record never
/// silently loses an accepted application, while a notification outage is not
/// a reason to tell the applicant their submission failed.
pub struct SubmissionPipeline<S, A> {
    store: Arc<S>,
    mailer: Arc<A>,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedApplication {
    pub expert_id: ExpertId,
    pub record: ExpertRecord,
    /// Whether the confirmation went out. Recorded explicitly rather than
    /// surfaced: the persistence outcome alone decides success.
    pub confirmation_sent: bool,
}

/// Fatal failure of one submission attempt. Callers need not distinguish the
/// variants; both return the wizard to the last step with the draft intact.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl<S, A> SubmissionPipeline<S, A>
where
    S: ApplicationStore + 'static,
    A: ConfirmationMailer + 'static,
{
    pub fn new(store: Arc<S>, mailer: Arc<A>) -> Self {
        Self { store, mailer }
    }

    /// Runs one submission attempt: derive the identifier, encode every
    /// attachment slot concurrently (fail-fast, before any persistence),
    /// assemble the immutable record, persist it, then attempt the
    /// confirmation.
    pub async fn submit(
        &self,
        draft: &ApplicationDraft,
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmittedApplication, SubmissionError> {
        let expert_id = ExpertId::derive(&draft.full_name, submitted_at);

        let (degree_certificate, professional_id, profile_photo) = tokio::try_join!(
            encode_slot(
                AttachmentSlot::DegreeCertificate,
                draft.degree_certificate.as_ref()
            ),
            encode_slot(AttachmentSlot::ProfessionalId, draft.professional_id.as_ref()),
            encode_slot(AttachmentSlot::ProfilePhoto, draft.profile_photo.as_ref()),
        )?;

        let record = ExpertRecord::from_draft(
            draft,
            EncodedAttachments {
                degree_certificate,
                professional_id,
                profile_photo,
            },
            submitted_at,
        );

        self.store.put(&expert_id, &record).await?;

        let confirmation_sent = match self.mailer.send(&record.confirmation_message()).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    expert_id = %expert_id.0,
                    error = %err,
                    "confirmation send failed after successful persistence"
                );
                false
            }
        };

        Ok(SubmittedApplication {
            expert_id,
            record,
            confirmation_sent,
        })
    }
}
