//! HTTP client for the eBird API

use super::{RecentObservationSource, SpeciesObservationSource};
use crate::config::ApiConfig;
use crate::constants::{DAYS_BACK_PARAM, EBIRD_TOKEN_HEADER, USER_AGENT};
use crate::error::{LifersError, Result};
use crate::models::Observation;
use crate::region::{RegionCode, SubregionLevel};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One entry of a region listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub code: String,
    pub name: String,
}

/// Authenticated client for the eBird region and observation endpoints
#[derive(Debug, Clone)]
pub struct RegionClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RegionClient {
    /// Build a client from configuration; fails if no token is configured
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| LifersError::configuration("An eBird API token is required"))?
            .to_string();

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| LifersError::remote(&config.base_url, e))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Subregions of `parent` at the given level, keyed by region name
    pub async fn list_subregions(
        &self,
        parent: &RegionCode,
        level: SubregionLevel,
    ) -> Result<BTreeMap<String, String>> {
        let url = format!(
            "{}/ref/region/list/subnational{}/{}",
            self.base_url, level, parent
        );
        let entries: Vec<RegionEntry> = self.get_rows(&url, None).await?;
        debug!("{} level {} subregions in {}", entries.len(), level, parent);

        Ok(entries
            .into_iter()
            .map(|entry| (entry.name, entry.code))
            .collect())
    }

    /// Recent observations of every species in a region
    pub async fn recent_observations(
        &self,
        region: &RegionCode,
        days_back: u32,
    ) -> Result<Vec<Observation>> {
        let url = format!("{}/data/obs/{}/recent", self.base_url, region);
        let observations: Vec<Observation> = self.get_rows(&url, Some(days_back)).await?;
        debug!(
            "{} recent observations in {} over {} days",
            observations.len(),
            region,
            days_back
        );
        Ok(observations)
    }

    /// Recent observations of one species in a region
    pub async fn recent_species_observations(
        &self,
        region: &RegionCode,
        species_code: &str,
        days_back: u32,
    ) -> Result<Vec<Observation>> {
        let url = format!(
            "{}/data/obs/{}/recent/{}",
            self.base_url, region, species_code
        );
        let observations: Vec<Observation> = self.get_rows(&url, Some(days_back)).await?;
        debug!(
            "{} recent observations of {} in {}",
            observations.len(),
            species_code,
            region
        );
        Ok(observations)
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        url: &str,
        days_back: Option<u32>,
    ) -> Result<Vec<T>> {
        let mut request = self
            .http_client
            .get(url)
            .header(EBIRD_TOKEN_HEADER, &self.token);
        if let Some(days_back) = days_back {
            request = request.query(&[(DAYS_BACK_PARAM, days_back)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LifersError::remote(url, e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(LifersError::remote_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LifersError::remote(url, e))?;
        decode_rows(url, &body)
    }
}

impl RecentObservationSource for RegionClient {
    async fn region_observations(
        &self,
        region: &RegionCode,
        days_back: u32,
    ) -> Result<Vec<Observation>> {
        self.recent_observations(region, days_back).await
    }
}

impl SpeciesObservationSource for RegionClient {
    async fn species_observations(
        &self,
        region: &RegionCode,
        species_code: &str,
        days_back: u32,
    ) -> Result<Vec<Observation>> {
        self.recent_species_observations(region, species_code, days_back)
            .await
    }
}

/// Decode a JSON array payload; an empty body, `null` or `{}` is no rows
fn decode_rows<T: DeserializeOwned>(url: &str, body: &str) -> Result<Vec<T>> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|e| LifersError::remote(url, e))?;
    if value.is_array() {
        return serde_json::from_value(value).map_err(|e| LifersError::remote(url, e));
    }

    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        other => Err(LifersError::remote(
            url,
            format!("expected a JSON array, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
