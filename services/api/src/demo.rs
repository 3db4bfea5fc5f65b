use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::infra::{InMemoryApplicationStore, LoggingConfirmationMailer, StaticGeographyGateway};
use expert_intake::config::AppConfig;
use expert_intake::error::AppError;
use expert_intake::workflows::enrollment::{
    AttachmentSlot, AttachmentUpload, ExpertWizard, FieldEdit, GeographyGateway,
    RestGeographyGateway, SubmitOutcome, SPECIALIZATION_TAGS,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Resolve locations against the live administrative-area API instead of
    /// the bundled sample hierarchy
    #[arg(long)]
    live_geography: bool,
    /// Optional degree certificate to attach
    #[arg(long)]
    degree_certificate: Option<PathBuf>,
    /// Optional professional ID document to attach
    #[arg(long)]
    professional_id: Option<PathBuf>,
    /// Optional profile photo to attach
    #[arg(long)]
    profile_photo: Option<PathBuf>,
}

pub(crate) async fn run(args: DemoArgs) -> Result<(), AppError> {
    if args.live_geography {
        let config = AppConfig::load()?;
        let geography = Arc::new(RestGeographyGateway::new(&config.geography)?);
        drive_demo(geography, args).await
    } else {
        drive_demo(Arc::new(StaticGeographyGateway), args).await
    }
}

fn upload_from_path(path: PathBuf) -> AttachmentUpload {
    let media_type = mime_guess::from_path(&path).first_or_octet_stream();
    AttachmentUpload::from_file(path, media_type.to_string())
}

async fn drive_demo<G>(geography: Arc<G>, args: DemoArgs) -> Result<(), AppError>
where
    G: GeographyGateway + 'static,
{
    let store = Arc::new(InMemoryApplicationStore::default());
    let mailer = Arc::new(LoggingConfirmationMailer);
    let mut wizard = ExpertWizard::new(geography, store.clone(), mailer);

    println!("Expert enrollment demo");

    wizard.open().await;
    let regions = wizard.catalog().regions().to_vec();
    println!(
        "Step 1: personal information ({} regions available)",
        regions.len()
    );

    wizard.edit(FieldEdit::FullName("Dr. Farida Akter".to_string()));
    wizard.edit(FieldEdit::Phone("+880 1912 000000".to_string()));
    wizard.edit(FieldEdit::Email("farida@example.com".to_string()));

    if let Some(region) = regions.first().cloned() {
        wizard.select_region(&region).await;
        if let Some(district) = wizard
            .catalog()
            .districts()
            .first()
            .map(|entry| entry.name.clone())
        {
            wizard.select_district(&district);
            if let Some(subdistrict) = wizard.subdistrict_options().first().cloned() {
                wizard.select_subdistrict(&subdistrict);
            }
        }
        let location = &wizard.draft().location;
        println!(
            "Selected location: {} / {} / {}",
            location.region, location.district, location.subdistrict
        );
    } else {
        println!("Geography source unavailable; continuing with an empty location");
    }
    wizard.edit(FieldEdit::Locality("Demo Para".to_string()));
    wizard.next();

    println!("Step 2: professional details");
    wizard.edit(FieldEdit::Qualification("PhD in Agronomy".to_string()));
    wizard.edit(FieldEdit::Affiliation("Agricultural Research Institute".to_string()));
    wizard.edit(FieldEdit::ExperienceYears("15".to_string()));
    for tag in SPECIALIZATION_TAGS.iter().take(2) {
        wizard.toggle_specialization(tag);
    }

    if let Some(path) = args.degree_certificate {
        wizard.set_attachment(AttachmentSlot::DegreeCertificate, upload_from_path(path));
    }
    if let Some(path) = args.professional_id {
        wizard.set_attachment(AttachmentSlot::ProfessionalId, upload_from_path(path));
    }
    wizard.next();

    println!("Step 3: finalize");
    wizard.edit(FieldEdit::Bio(
        "Long-time advisor on soil health and organic transitions.".to_string(),
    ));
    wizard.edit(FieldEdit::TermsAccepted(true));
    if let Some(path) = args.profile_photo {
        wizard.set_attachment(AttachmentSlot::ProfilePhoto, upload_from_path(path));
    }

    match wizard.submit().await {
        SubmitOutcome::Completed(submitted) => {
            println!("\nApplication accepted");
            println!("- expert id: {}", submitted.expert_id.0);
            println!(
                "- verification status: {}",
                submitted.record.verification_status.label()
            );
            println!("- confirmation sent: {}", submitted.confirmation_sent);
            println!(
                "- specializations: {}",
                submitted.record.specializations.join(", ")
            );
            println!("- records in store: {}", store.len());
            Ok(())
        }
        SubmitOutcome::Failed(err) => {
            println!("\nApplication failed; the draft is preserved for retry");
            Err(err.into())
        }
        SubmitOutcome::Blocked => {
            println!("\nSubmission was blocked; wizard not on the final step");
            Ok(())
        }
    }
}
