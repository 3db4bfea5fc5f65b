//! Expert enrollment: the multi-step application wizard and its submission
//! pipeline.
//!
//! The wizard owns the draft and the location catalog for one session and
//! drives three collaborators injected at construction time: the geography
//! gateway behind the dependent region/district/subdistrict selectors, the
//! application store, and the confirmation mailer. Persistence failures are
//! fatal to a submission attempt; confirmation failures are absorbed.

pub mod attachments;
pub mod draft;
pub mod geography;
pub mod location;
pub mod pipeline;
pub mod record;
pub mod router;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use attachments::{
    AttachmentSlot, AttachmentSource, AttachmentUpload, EncodingError, MISSING_PHOTO_PLACEHOLDER,
};
pub use draft::{ApplicationDraft, FieldEdit, LocationPath, SPECIALIZATION_TAGS};
pub use geography::{DistrictEntry, GeographyGateway, LookupError, RestGeographyGateway};
pub use location::{DistrictLoadTicket, LocationCatalog};
pub use pipeline::{SubmissionError, SubmissionPipeline, SubmittedApplication};
pub use record::{
    ApplicationStore, ConfirmationMailer, ConfirmationMessage, CredentialPayloads,
    EncodedAttachments, ExpertId, ExpertRecord, NotificationError, PersistenceError,
    VerificationStatus, DEFAULT_PAYMENT_PER_REPORT,
};
pub use router::enrollment_router;
pub use wizard::{ClosePolicy, ExpertWizard, SubmitOutcome, WizardStep};
