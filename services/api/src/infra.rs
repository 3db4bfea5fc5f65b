use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use expert_intake::workflows::enrollment::{
    ApplicationStore, ConfirmationMailer, ConfirmationMessage, DistrictEntry, ExpertId,
    ExpertRecord, GeographyGateway, LookupError, NotificationError, PersistenceError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store used until a durable backend is wired in.
#[derive(Default)]
pub(crate) struct InMemoryApplicationStore {
    records: Mutex<HashMap<ExpertId, ExpertRecord>>,
}

impl InMemoryApplicationStore {
    pub(crate) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn put(&self, id: &ExpertId, record: &ExpertRecord) -> Result<(), PersistenceError> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(id.clone(), record.clone());
        Ok(())
    }
}

/// Stand-in confirmation adapter: logs the projection instead of delivering
/// it, so the pipeline's notification phase stays observable without SMTP
/// credentials.
pub(crate) struct LoggingConfirmationMailer;

#[async_trait]
impl ConfirmationMailer for LoggingConfirmationMailer {
    async fn send(&self, message: &ConfirmationMessage) -> Result<(), NotificationError> {
        info!(
            to = %message.to_email,
            region = %message.region,
            district = %message.district,
            "confirmation message dispatched to log"
        );
        Ok(())
    }
}

/// Bundled sample of the administrative hierarchy for offline demos.
pub(crate) struct StaticGeographyGateway;

#[async_trait]
impl GeographyGateway for StaticGeographyGateway {
    async fn list_regions(&self) -> Result<Vec<String>, LookupError> {
        Ok(vec![
            "Dhaka".to_string(),
            "Chattogram".to_string(),
            "Rajshahi".to_string(),
        ])
    }

    async fn list_districts(&self, region: &str) -> Result<Vec<DistrictEntry>, LookupError> {
        let districts = match region {
            "Dhaka" => vec![
                DistrictEntry {
                    name: "Gazipur".to_string(),
                    subdistricts: vec![
                        "Sreepur".to_string(),
                        "Kaliakair".to_string(),
                        "Kapasia".to_string(),
                    ],
                },
                DistrictEntry {
                    name: "Tangail".to_string(),
                    subdistricts: vec!["Sakhipur".to_string(), "Madhupur".to_string()],
                },
            ],
            "Chattogram" => vec![DistrictEntry {
                name: "Cumilla".to_string(),
                subdistricts: vec!["Daudkandi".to_string(), "Homna".to_string()],
            }],
            "Rajshahi" => vec![DistrictEntry {
                name: "Natore".to_string(),
                subdistricts: vec!["Singra".to_string(), "Lalpur".to_string()],
            }],
            _ => Vec::new(),
        };
        Ok(districts)
    }
}
