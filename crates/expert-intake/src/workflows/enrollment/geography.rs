use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::GeographyConfig;

/// One district with the dependent subdistricts carried by the same payload.
/// Subdistrict resolution is a pure lookup into this data; it never requires
/// another remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictEntry {
    pub name: String,
    pub subdistricts: Vec<String>,
}

/// Failure of a remote geography lookup. Recovered locally: callers degrade
/// to empty option lists and log rather than blocking the wizard.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("geography source unreachable: {0}")]
    Transport(String),
    #[error("geography payload malformed: {0}")]
    Malformed(String),
}

/// Read-only administrative-area source backing the location selectors.
#[async_trait]
pub trait GeographyGateway: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<String>, LookupError>;
    async fn list_districts(&self, region: &str) -> Result<Vec<DistrictEntry>, LookupError>;
}

/// Client for the public administrative-area REST API. Both operations are
/// plain request/response and return complete data per call.
pub struct RestGeographyGateway {
    client: reqwest::Client,
    base_url: String,
}

impl RestGeographyGateway {
    pub fn new(config: &GeographyConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: String) -> Result<T, LookupError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Transport(format!(
                "{url} returned {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| LookupError::Malformed(err.to_string()))
    }
}

// Wire shapes follow the upstream API schema; domain types stay neutral.

#[derive(Debug, Deserialize)]
struct RegionListing {
    #[serde(default)]
    data: Vec<RegionRow>,
}

#[derive(Debug, Deserialize)]
struct RegionRow {
    #[serde(rename = "division")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct DistrictListing {
    #[serde(default)]
    data: Vec<DistrictRow>,
}

#[derive(Debug, Deserialize)]
struct DistrictRow {
    district: String,
    #[serde(rename = "upazilla", default)]
    subdistricts: Vec<String>,
}

#[async_trait]
impl GeographyGateway for RestGeographyGateway {
    async fn list_regions(&self) -> Result<Vec<String>, LookupError> {
        let listing: RegionListing = self
            .fetch_json(format!("{}/divisions", self.base_url))
            .await?;
        Ok(listing.data.into_iter().map(|row| row.name).collect())
    }

    async fn list_districts(&self, region: &str) -> Result<Vec<DistrictEntry>, LookupError> {
        let listing: DistrictListing = self
            .fetch_json(format!("{}/division/{}", self.base_url, region))
            .await?;
        Ok(listing
            .data
            .into_iter()
            .map(|row| DistrictEntry {
                name: row.district,
                subdistricts: row.subdistricts,
            })
            .collect())
    }
}
