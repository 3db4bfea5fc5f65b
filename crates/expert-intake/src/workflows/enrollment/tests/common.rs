use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::workflows::enrollment::attachments::AttachmentUpload;
use crate::workflows::enrollment::draft::{ApplicationDraft, FieldEdit};
use crate::workflows::enrollment::geography::{DistrictEntry, GeographyGateway, LookupError};
use crate::workflows::enrollment::record::{
    ApplicationStore, ConfirmationMailer, ConfirmationMessage, ExpertId, ExpertRecord,
    NotificationError, PersistenceError,
};
use crate::workflows::enrollment::wizard::{ClosePolicy, ExpertWizard, WizardStep};

pub(super) fn district(name: &str, subdistricts: &[&str]) -> DistrictEntry {
    DistrictEntry {
        name: name.to_string(),
        subdistricts: subdistricts.iter().map(|s| s.to_string()).collect(),
    }
}

/// Scripted geography source with call counters so tests can assert that
/// subdistrict resolution never reaches the gateway.
pub(super) struct StubGeography {
    regions: Vec<String>,
    districts_by_region: HashMap<String, Vec<DistrictEntry>>,
    fail_regions: bool,
    fail_districts: bool,
    region_calls: AtomicUsize,
    district_calls: AtomicUsize,
}

impl StubGeography {
    pub(super) fn scripted() -> Self {
        let mut districts_by_region = HashMap::new();
        districts_by_region.insert(
            "Dhaka".to_string(),
            vec![
                district("Gazipur", &["Sreepur", "Kaliakair"]),
                district("Narayanganj", &["Rupganj"]),
            ],
        );
        districts_by_region.insert(
            "Khulna".to_string(),
            vec![district("Jessore", &["Abhaynagar", "Bagherpara"])],
        );

        Self {
            regions: vec!["Dhaka".to_string(), "Khulna".to_string()],
            districts_by_region,
            fail_regions: false,
            fail_districts: false,
            region_calls: AtomicUsize::new(0),
            district_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing_regions() -> Self {
        Self {
            fail_regions: true,
            ..Self::scripted()
        }
    }

    pub(super) fn failing_districts() -> Self {
        Self {
            fail_districts: true,
            ..Self::scripted()
        }
    }

    pub(super) fn region_calls(&self) -> usize {
        self.region_calls.load(Ordering::Relaxed)
    }

    pub(super) fn district_calls(&self) -> usize {
        self.district_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl GeographyGateway for StubGeography {
    async fn list_regions(&self) -> Result<Vec<String>, LookupError> {
        self.region_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_regions {
            return Err(LookupError::Transport("connection refused".to_string()));
        }
        Ok(self.regions.clone())
    }

    async fn list_districts(&self, region: &str) -> Result<Vec<DistrictEntry>, LookupError> {
        self.district_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_districts {
            return Err(LookupError::Transport("connection refused".to_string()));
        }
        Ok(self
            .districts_by_region
            .get(region)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory store with an availability switch so a failed attempt can be
/// retried against the same instance.
#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<HashMap<ExpertId, ExpertRecord>>,
    outage: Mutex<Option<String>>,
}

impl MemoryStore {
    pub(super) fn set_unavailable(&self, reason: &str) {
        *self.outage.lock().expect("store mutex poisoned") = Some(reason.to_string());
    }

    pub(super) fn set_available(&self) {
        *self.outage.lock().expect("store mutex poisoned") = None;
    }

    pub(super) fn records(&self) -> HashMap<ExpertId, ExpertRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn record(&self, id: &ExpertId) -> Option<ExpertRecord> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn put(&self, id: &ExpertId, record: &ExpertRecord) -> Result<(), PersistenceError> {
        if let Some(reason) = self.outage.lock().expect("store mutex poisoned").clone() {
            return Err(PersistenceError::Unavailable(reason));
        }
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(id.clone(), record.clone());
        Ok(())
    }
}

/// Records every confirmation it is asked to send; optionally fails each
/// attempt while still counting it.
#[derive(Default)]
pub(super) struct MemoryMailer {
    sent: Mutex<Vec<ConfirmationMessage>>,
    attempts: AtomicUsize,
    failing: bool,
}

impl MemoryMailer {
    pub(super) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(super) fn sent(&self) -> Vec<ConfirmationMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }

    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ConfirmationMailer for MemoryMailer {
    async fn send(&self, message: &ConfirmationMessage) -> Result<(), NotificationError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if self.failing {
            return Err(NotificationError::Transport(
                "smtp relay unreachable".to_string(),
            ));
        }
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

pub(super) type TestWizard = ExpertWizard<StubGeography, MemoryStore, MemoryMailer>;

pub(super) fn build_wizard() -> (TestWizard, Arc<StubGeography>, Arc<MemoryStore>, Arc<MemoryMailer>)
{
    build_wizard_with(
        StubGeography::scripted(),
        MemoryMailer::default(),
        ClosePolicy::default(),
    )
}

pub(super) fn build_wizard_with(
    geography: StubGeography,
    mailer: MemoryMailer,
    close_policy: ClosePolicy,
) -> (TestWizard, Arc<StubGeography>, Arc<MemoryStore>, Arc<MemoryMailer>) {
    let geography = Arc::new(geography);
    let store = Arc::new(MemoryStore::default());
    let mailer = Arc::new(mailer);
    let wizard = ExpertWizard::with_policy(
        geography.clone(),
        store.clone(),
        mailer.clone(),
        close_policy,
    );
    (wizard, geography, store, mailer)
}

/// A draft with every collected field populated, minus attachments.
pub(super) fn filled_draft() -> ApplicationDraft {
    let mut draft = ApplicationDraft::default();
    draft.apply(FieldEdit::FullName("Dr. Ayesha Rahman".to_string()));
    draft.apply(FieldEdit::Phone("+880 1700 000000".to_string()));
    draft.apply(FieldEdit::Email("ayesha@example.com".to_string()));
    draft.apply(FieldEdit::Locality("Vadun, Tongi".to_string()));
    draft.apply(FieldEdit::Qualification("PhD in Agronomy".to_string()));
    draft.apply(FieldEdit::Affiliation("BARI".to_string()));
    draft.apply(FieldEdit::ExperienceYears("12".to_string()));
    draft.apply(FieldEdit::Bio(
        "Two decades of field work on soil health.".to_string(),
    ));
    draft.apply(FieldEdit::TermsAccepted(true));
    draft.toggle_specialization("Soil Science");
    draft.toggle_specialization("Irrigation");
    draft.location.region = "Dhaka".to_string();
    draft.location.district = "Gazipur".to_string();
    draft.location.subdistrict = "Sreepur".to_string();
    draft
}

pub(super) fn sample_upload(name: &str, media_type: &str, bytes: &[u8]) -> AttachmentUpload {
    AttachmentUpload::from_bytes(name, media_type, bytes.to_vec())
}

/// Drives a fresh wizard to the final step with the standard filled draft.
pub(super) async fn wizard_at_finalize(
) -> (TestWizard, Arc<StubGeography>, Arc<MemoryStore>, Arc<MemoryMailer>) {
    let (mut wizard, geography, store, mailer) = build_wizard();
    wizard.open().await;
    fill_to_finalize(&mut wizard).await;
    (wizard, geography, store, mailer)
}

pub(super) async fn fill_to_finalize(wizard: &mut TestWizard) {
    wizard.edit(FieldEdit::FullName("Dr. Ayesha Rahman".to_string()));
    wizard.edit(FieldEdit::Phone("+880 1700 000000".to_string()));
    wizard.edit(FieldEdit::Email("ayesha@example.com".to_string()));
    wizard.select_region("Dhaka").await;
    wizard.select_district("Gazipur");
    wizard.select_subdistrict("Sreepur");
    wizard.edit(FieldEdit::Locality("Vadun, Tongi".to_string()));
    wizard.next();
    wizard.edit(FieldEdit::Qualification("PhD in Agronomy".to_string()));
    wizard.edit(FieldEdit::Affiliation("BARI".to_string()));
    wizard.edit(FieldEdit::ExperienceYears("12".to_string()));
    wizard.toggle_specialization("Soil Science");
    wizard.toggle_specialization("Irrigation");
    wizard.next();
    wizard.edit(FieldEdit::Bio(
        "Two decades of field work on soil health.".to_string(),
    ));
    wizard.edit(FieldEdit::TermsAccepted(true));
    assert_eq!(wizard.current_step(), WizardStep::Finalize);
}
