use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::attachments::{AttachmentSlot, AttachmentUpload};

/// Specialization tags offered by the application form.
pub const SPECIALIZATION_TAGS: [&str; 6] = [
    "Soil Science",
    "Pest Management",
    "Crop Disease",
    "Irrigation",
    "Organic Farming",
    "Agro-Economics",
];

/// Administrative path selected in step one plus the applicant's free-text
/// locality. `district` is only ever a member of the set fetched for the
/// current `region`, and `subdistrict` a member of the set carried by the
/// selected district; clearing the region clears both dependents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationPath {
    pub region: String,
    pub district: String,
    pub subdistrict: String,
    pub locality: String,
}

/// The in-progress application, owned exclusively by the wizard for its
/// lifetime. Created empty on open, mutated only through named field-update
/// operations, reset to empty on close.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationDraft {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub location: LocationPath,
    pub qualification: String,
    pub affiliation: String,
    pub experience_years: String,
    pub specializations: BTreeSet<String>,
    pub degree_certificate: Option<AttachmentUpload>,
    pub professional_id: Option<AttachmentUpload>,
    pub profile_photo: Option<AttachmentUpload>,
    pub bio: String,
    pub terms_accepted: bool,
}

/// One named field update. Applying an edit is total: it never fails and
/// never moves the wizard between steps.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    FullName(String),
    Phone(String),
    Email(String),
    Locality(String),
    Qualification(String),
    Affiliation(String),
    ExperienceYears(String),
    Bio(String),
    TermsAccepted(bool),
}

impl ApplicationDraft {
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::FullName(value) => self.full_name = value,
            FieldEdit::Phone(value) => self.phone = value,
            FieldEdit::Email(value) => self.email = value,
            FieldEdit::Locality(value) => self.location.locality = value,
            FieldEdit::Qualification(value) => self.qualification = value,
            FieldEdit::Affiliation(value) => self.affiliation = value,
            FieldEdit::ExperienceYears(value) => self.experience_years = value,
            FieldEdit::Bio(value) => self.bio = value,
            FieldEdit::TermsAccepted(value) => self.terms_accepted = value,
        }
    }

    /// Adds the tag when absent, removes it when present.
    pub fn toggle_specialization(&mut self, tag: &str) {
        if !self.specializations.remove(tag) {
            self.specializations.insert(tag.to_string());
        }
    }

    /// Replaces whatever the slot currently holds; uploads are never merged.
    pub fn set_attachment(&mut self, slot: AttachmentSlot, upload: AttachmentUpload) {
        *self.slot_mut(slot) = Some(upload);
    }

    pub fn attachment(&self, slot: AttachmentSlot) -> Option<&AttachmentUpload> {
        match slot {
            AttachmentSlot::DegreeCertificate => self.degree_certificate.as_ref(),
            AttachmentSlot::ProfessionalId => self.professional_id.as_ref(),
            AttachmentSlot::ProfilePhoto => self.profile_photo.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: AttachmentSlot) -> &mut Option<AttachmentUpload> {
        match slot {
            AttachmentSlot::DegreeCertificate => &mut self.degree_certificate,
            AttachmentSlot::ProfessionalId => &mut self.professional_id,
            AttachmentSlot::ProfilePhoto => &mut self.profile_photo,
        }
    }
}
