//! MapQuest radius-search client for places near a site
//!
//! Looks up points of interest around a postal code and turns each result into
//! a [`NearbyPlace`] whose blank fields are replaced by display placeholders.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::PlaceSource;

/// Default endpoint for the MapQuest radius search API
const MAPQUEST_RADIUS_URL: &str = "https://www.mapquestapi.com/search/v2/radius";

/// Search radius around the origin
const SEARCH_RADIUS: u32 = 10;

/// Maximum number of places returned per search
const MAX_MATCHES: u32 = 10;

const NO_NAME: &str = "No name";
const NO_CATEGORY: &str = "No category";
const NO_ADDRESS: &str = "No address";
const NO_CITY: &str = "No city";

/// Errors that can occur when searching for nearby places
#[derive(Debug, Error)]
pub enum PlacesError {
    /// HTTP request failed or returned an error status
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parsed radius-search response, cached as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacesResponse {
    #[serde(rename = "searchResults", default)]
    pub search_results: Vec<PlaceResult>,
}

/// A single search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: PlaceFields,
}

/// Descriptive fields attached to a search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceFields {
    #[serde(default)]
    pub group_sic_code_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

/// A place ready for display, with placeholders in place of blank fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyPlace {
    pub name: String,
    pub category: String,
    pub address: String,
    pub city: String,
}

impl NearbyPlace {
    /// Display line, e.g. "- Cafe (Eating Places): 1 Main St, Houghton"
    pub fn line(&self) -> String {
        format!(
            "- {} ({}): {}, {}",
            self.name, self.category, self.address, self.city
        )
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

impl From<&PlaceResult> for NearbyPlace {
    fn from(result: &PlaceResult) -> Self {
        Self {
            name: or_placeholder(&result.name, NO_NAME),
            category: or_placeholder(&result.fields.group_sic_code_name, NO_CATEGORY),
            address: or_placeholder(&result.fields.address, NO_ADDRESS),
            city: or_placeholder(&result.fields.city, NO_CITY),
        }
    }
}

impl PlacesResponse {
    /// Results converted to display records, in API order
    pub fn places(&self) -> Vec<NearbyPlace> {
        self.search_results.iter().map(NearbyPlace::from).collect()
    }
}

/// Client for the MapQuest radius search API
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    /// Endpoint URL (allows override for testing)
    endpoint: String,
}

impl PlacesClient {
    /// Create a new PlacesClient with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: MAPQUEST_RADIUS_URL.to_string(),
        }
    }

    /// Override the endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Query parameters for a radius search around `zipcode`
    fn query(&self, zipcode: &str) -> Vec<(&'static str, String)> {
        vec![
            ("origin", zipcode.to_string()),
            ("radius", SEARCH_RADIUS.to_string()),
            ("maxMatches", MAX_MATCHES.to_string()),
            ("ambiguities", "ignore".to_string()),
            ("outFormat", "json".to_string()),
            ("key", self.api_key.clone()),
        ]
    }
}

impl PlaceSource for PlacesClient {
    async fn nearby_places(&self, zipcode: &str) -> Result<PlacesResponse, PlacesError> {
        debug!(zipcode, "Searching nearby places");
        let text = self
            .client
            .get(&self.endpoint)
            .query(&self.query(zipcode))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&text)?)
    }
}
