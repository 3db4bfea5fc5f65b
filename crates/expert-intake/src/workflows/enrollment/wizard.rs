use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::attachments::{AttachmentSlot, AttachmentUpload};
use super::draft::{ApplicationDraft, FieldEdit};
use super::geography::GeographyGateway;
use super::location::LocationCatalog;
use super::pipeline::{SubmissionError, SubmissionPipeline, SubmittedApplication};
use super::record::{ApplicationStore, ConfirmationMailer};

/// Ordered data-collection steps presented by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    PersonalInfo,
    ProfessionalDetails,
    Finalize,
}

impl WizardStep {
    pub const COUNT: usize = 3;

    /// One-based position used for the rendered progress indicator.
    pub const fn position(self) -> usize {
        match self {
            WizardStep::PersonalInfo => 1,
            WizardStep::ProfessionalDetails => 2,
            WizardStep::Finalize => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "personal_info",
            WizardStep::ProfessionalDetails => "professional_details",
            WizardStep::Finalize => "finalize",
        }
    }

    const fn forward(self) -> Self {
        match self {
            WizardStep::PersonalInfo => WizardStep::ProfessionalDetails,
            WizardStep::ProfessionalDetails | WizardStep::Finalize => WizardStep::Finalize,
        }
    }

    const fn backward(self) -> Self {
        match self {
            WizardStep::PersonalInfo | WizardStep::ProfessionalDetails => WizardStep::PersonalInfo,
            WizardStep::Finalize => WizardStep::ProfessionalDetails,
        }
    }
}

/// What `close()` does when a submission is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePolicy {
    /// Refuse to close until the in-flight attempt settles.
    #[default]
    BlockWhileSubmitting,
    /// Close immediately and discard whatever the in-flight attempt returns.
    DiscardInFlight,
}

/// Result of a submit request routed through the wizard.
#[derive(Debug)]
pub enum SubmitOutcome {
    Completed(SubmittedApplication),
    Failed(SubmissionError),
    /// Submission was not attempted: wrong step, already submitted, or an
    /// attempt is already in flight.
    Blocked,
}

/// The multi-step application controller. Owns the draft and the location
/// catalog for one session and drives the collaborators injected at
/// construction: the geography gateway behind the dependent location
/// selectors and the store/mailer pair behind submission.
///
/// All mutation happens through `&mut self` on one cooperative task; the
/// wizard never shares the draft.
pub struct ExpertWizard<G, S, A> {
    geography: Arc<G>,
    pipeline: SubmissionPipeline<S, A>,
    catalog: LocationCatalog,
    draft: ApplicationDraft,
    step: WizardStep,
    close_policy: ClosePolicy,
    submission_in_flight: bool,
    submitted: bool,
    last_error: Option<String>,
}

impl<G, S, A> ExpertWizard<G, S, A>
where
    G: GeographyGateway + 'static,
    S: ApplicationStore + 'static,
    A: ConfirmationMailer + 'static,
{
    pub fn new(geography: Arc<G>, store: Arc<S>, mailer: Arc<A>) -> Self {
        Self::with_policy(geography, store, mailer, ClosePolicy::default())
    }

    pub fn with_policy(
        geography: Arc<G>,
        store: Arc<S>,
        mailer: Arc<A>,
        close_policy: ClosePolicy,
    ) -> Self {
        Self {
            geography,
            pipeline: SubmissionPipeline::new(store, mailer),
            catalog: LocationCatalog::default(),
            draft: ApplicationDraft::default(),
            step: WizardStep::PersonalInfo,
            close_policy,
            submission_in_flight: false,
            submitted: false,
            last_error: None,
        }
    }

    /// Populates the region list. Lookup failure degrades to an empty
    /// selector so the rest of the wizard stays usable.
    pub async fn open(&mut self) {
        match self.geography.list_regions().await {
            Ok(regions) => self.catalog.set_regions(regions),
            Err(err) => {
                warn!(error = %err, "region listing failed; continuing with empty selector");
                self.catalog.set_regions(Vec::new());
            }
        }
    }

    pub fn next(&mut self) {
        if self.nav_locked() {
            return;
        }
        self.step = self.step.forward();
    }

    pub fn back(&mut self) {
        if self.nav_locked() {
            return;
        }
        self.step = self.step.backward();
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    /// (current position, total steps) for the rendered progress bar.
    pub fn progress(&self) -> (usize, usize) {
        (self.step.position(), WizardStep::COUNT)
    }

    pub fn edit(&mut self, edit: FieldEdit) {
        if self.submitted {
            return;
        }
        self.draft.apply(edit);
    }

    pub fn toggle_specialization(&mut self, tag: &str) {
        if self.submitted {
            return;
        }
        self.draft.toggle_specialization(tag);
    }

    pub fn set_attachment(&mut self, slot: AttachmentSlot, upload: AttachmentUpload) {
        if self.submitted {
            return;
        }
        self.draft.set_attachment(slot, upload);
    }

    /// Selects a region and refreshes the dependent district payload. The
    /// district and subdistrict selections always reset, forcing
    /// re-selection from the new region's set.
    pub async fn select_region(&mut self, region: &str) {
        if self.submitted {
            return;
        }

        self.draft.location.region = region.to_string();
        self.draft.location.district.clear();
        self.draft.location.subdistrict.clear();

        if region.is_empty() {
            self.catalog.reset_districts();
            return;
        }

        let ticket = self.catalog.begin_district_load();
        let districts = match self.geography.list_districts(region).await {
            Ok(districts) => districts,
            Err(err) => {
                warn!(%region, error = %err, "district listing failed; leaving selector empty");
                Vec::new()
            }
        };
        self.catalog.complete_district_load(ticket, districts);
    }

    /// Selects a district from the cached payload. Names outside the fetched
    /// set clear the selection instead of being stored, which keeps the
    /// draft's path consistent with the catalog by construction.
    pub fn select_district(&mut self, district: &str) {
        if self.submitted {
            return;
        }

        self.draft.location.subdistrict.clear();
        if district.is_empty() || !self.catalog.has_district(district) {
            self.draft.location.district.clear();
            return;
        }
        self.draft.location.district = district.to_string();
    }

    pub fn select_subdistrict(&mut self, subdistrict: &str) {
        if self.submitted {
            return;
        }

        let options = self.catalog.subdistricts_for(&self.draft.location.district);
        if subdistrict.is_empty() || !options.iter().any(|name| name == subdistrict) {
            self.draft.location.subdistrict.clear();
            return;
        }
        self.draft.location.subdistrict = subdistrict.to_string();
    }

    /// Subdistrict choices for the currently selected district; empty until a
    /// district from the current region is chosen.
    pub fn subdistrict_options(&self) -> &[String] {
        self.catalog.subdistricts_for(&self.draft.location.district)
    }

    /// Runs the submission pipeline. Only valid from the final step with no
    /// attempt in flight; on failure the wizard stays on the final step with
    /// the draft untouched so a retry is cheap.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.submitted || self.submission_in_flight || self.step != WizardStep::Finalize {
            return SubmitOutcome::Blocked;
        }

        self.submission_in_flight = true;
        self.last_error = None;

        let outcome = self.pipeline.submit(&self.draft, Utc::now()).await;
        self.submission_in_flight = false;

        match outcome {
            Ok(submitted) => {
                self.submitted = true;
                SubmitOutcome::Completed(submitted)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Discards all in-progress work and returns to the first step. Returns
    /// false only under `ClosePolicy::BlockWhileSubmitting` with an attempt
    /// still in flight.
    pub fn close(&mut self) -> bool {
        if self.submission_in_flight && self.close_policy == ClosePolicy::BlockWhileSubmitting {
            return false;
        }

        self.draft = ApplicationDraft::default();
        self.catalog.clear();
        self.step = WizardStep::PersonalInfo;
        self.submission_in_flight = false;
        self.submitted = false;
        self.last_error = None;
        true
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    pub fn is_submitting(&self) -> bool {
        self.submission_in_flight
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Generic failure signal surfaced to the active step after a failed
    /// attempt; cleared on the next attempt and on close.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn nav_locked(&self) -> bool {
        self.submission_in_flight || self.submitted
    }

    #[cfg(test)]
    pub(crate) fn force_submission_in_flight(&mut self) {
        self.submission_in_flight = true;
    }
}
