use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::attachments::AttachmentUpload;
use super::draft::{ApplicationDraft, LocationPath};
use super::geography::GeographyGateway;
use super::pipeline::{SubmissionError, SubmissionPipeline};
use super::record::{ApplicationStore, ConfirmationMailer};

struct RouterCtx<G, S, A> {
    geography: Arc<G>,
    pipeline: SubmissionPipeline<S, A>,
}

/// Router builder exposing the enrollment endpoints: the geography proxy
/// behind the dependent location selectors and the application intake.
pub fn enrollment_router<G, S, A>(geography: Arc<G>, store: Arc<S>, mailer: Arc<A>) -> Router
where
    G: GeographyGateway + 'static,
    S: ApplicationStore + 'static,
    A: ConfirmationMailer + 'static,
{
    let ctx = Arc::new(RouterCtx {
        geography,
        pipeline: SubmissionPipeline::new(store, mailer),
    });

    Router::new()
        .route("/api/v1/geography/regions", get(regions_handler::<G, S, A>))
        .route(
            "/api/v1/geography/regions/:region/districts",
            get(districts_handler::<G, S, A>),
        )
        .route(
            "/api/v1/experts/applications",
            post(submit_handler::<G, S, A>),
        )
        .with_state(ctx)
}

/// Uploaded attachment as carried over the wire: raw bytes in base64.
/// Decoded here and re-encoded by the pipeline into the durable payload.
#[derive(Debug, Deserialize)]
struct AttachmentPayload {
    file_name: String,
    #[serde(default)]
    media_type: String,
    content_base64: String,
}

#[derive(Debug, Deserialize)]
struct EnrollmentRequest {
    full_name: String,
    phone: String,
    email: String,
    #[serde(default)]
    location: LocationPath,
    #[serde(default)]
    qualification: String,
    #[serde(default)]
    affiliation: String,
    #[serde(default)]
    experience_years: String,
    #[serde(default)]
    specializations: Vec<String>,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    terms_accepted: bool,
    #[serde(default)]
    degree_certificate: Option<AttachmentPayload>,
    #[serde(default)]
    professional_id: Option<AttachmentPayload>,
    #[serde(default)]
    profile_photo: Option<AttachmentPayload>,
}

#[derive(Debug, Serialize)]
struct EnrollmentReceipt {
    expert_id: String,
    verification_status: &'static str,
    confirmation_sent: bool,
}

fn decode_attachment(payload: AttachmentPayload) -> Result<AttachmentUpload, String> {
    let bytes = general_purpose::STANDARD
        .decode(payload.content_base64.as_bytes())
        .map_err(|err| format!("attachment '{}' is not valid base64: {err}", payload.file_name))?;
    Ok(AttachmentUpload::from_bytes(
        payload.file_name,
        payload.media_type,
        bytes,
    ))
}

impl EnrollmentRequest {
    fn into_draft(self) -> Result<ApplicationDraft, String> {
        Ok(ApplicationDraft {
            full_name: self.full_name,
            phone: self.phone,
            email: self.email,
            location: self.location,
            qualification: self.qualification,
            affiliation: self.affiliation,
            experience_years: self.experience_years,
            specializations: self.specializations.into_iter().collect(),
            degree_certificate: self.degree_certificate.map(decode_attachment).transpose()?,
            professional_id: self.professional_id.map(decode_attachment).transpose()?,
            profile_photo: self.profile_photo.map(decode_attachment).transpose()?,
            bio: self.bio,
            terms_accepted: self.terms_accepted,
        })
    }
}

// Geography proxy endpoints degrade exactly like the in-process resolver:
// empty option lists on lookup failure, logged, never a blocking error.

async fn regions_handler<G, S, A>(
    State(ctx): State<Arc<RouterCtx<G, S, A>>>,
) -> Response
where
    G: GeographyGateway + 'static,
    S: ApplicationStore + 'static,
    A: ConfirmationMailer + 'static,
{
    let regions = match ctx.geography.list_regions().await {
        Ok(regions) => regions,
        Err(err) => {
            warn!(error = %err, "region listing failed; serving empty list");
            Vec::new()
        }
    };
    (StatusCode::OK, Json(json!({ "regions": regions }))).into_response()
}

async fn districts_handler<G, S, A>(
    State(ctx): State<Arc<RouterCtx<G, S, A>>>,
    Path(region): Path<String>,
) -> Response
where
    G: GeographyGateway + 'static,
    S: ApplicationStore + 'static,
    A: ConfirmationMailer + 'static,
{
    let districts = match ctx.geography.list_districts(&region).await {
        Ok(districts) => districts,
        Err(err) => {
            warn!(%region, error = %err, "district listing failed; serving empty list");
            Vec::new()
        }
    };
    (StatusCode::OK, Json(json!({ "districts": districts }))).into_response()
}

async fn submit_handler<G, S, A>(
    State(ctx): State<Arc<RouterCtx<G, S, A>>>,
    Json(request): Json<EnrollmentRequest>,
) -> Response
where
    G: GeographyGateway + 'static,
    S: ApplicationStore + 'static,
    A: ConfirmationMailer + 'static,
{
    let draft = match request.into_draft() {
        Ok(draft) => draft,
        Err(error) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response();
        }
    };

    match ctx.pipeline.submit(&draft, Utc::now()).await {
        Ok(submitted) => {
            let receipt = EnrollmentReceipt {
                expert_id: submitted.expert_id.0,
                verification_status: submitted.record.verification_status.label(),
                confirmation_sent: submitted.confirmation_sent,
            };
            (StatusCode::ACCEPTED, Json(receipt)).into_response()
        }
        Err(SubmissionError::Encoding(error)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(SubmissionError::Persistence(error)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
