//! Core data models and source adapters for the national park explorer
//!
//! This module contains the domain types shared by the whole application and
//! the traits that the scraping and places-search clients implement, so the
//! explorer can be driven by in-memory fakes in tests.

pub mod nps;
pub mod places;

pub use nps::{NpsClient, ScrapeError};
pub use places::{NearbyPlace, PlaceFields, PlaceResult, PlacesClient, PlacesError, PlacesResponse};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from lowercase state name to the absolute URL of its listing page
pub type StateIndex = BTreeMap<String, String>;

/// A national park service site
///
/// Only the detail-page parser builds these; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    category: String,
    name: String,
    address: String,
    zipcode: String,
    phone: String,
}

impl Site {
    /// Creates a site record
    ///
    /// # Arguments
    /// * `category` - Designation such as "National Park" (may be empty)
    /// * `name` - Site name
    /// * `address` - "<locality>, <region>"
    /// * `zipcode` - Postal code, used to search nearby places
    /// * `phone` - Contact number
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        zipcode: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            address: address.into(),
            zipcode: zipcode.into(),
            phone: phone.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn zipcode(&self) -> &str {
        &self.zipcode
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// One-line summary, e.g. "Isle Royale (National Park): Houghton, MI 49931"
    pub fn info(&self) -> String {
        format!(
            "{} ({}): {} {}",
            self.name, self.category, self.address, self.zipcode
        )
    }
}

/// Source of national park listings and site details
#[allow(async_fn_in_trait)]
pub trait SiteSource {
    /// Fetches the state name to listing URL index
    async fn state_index(&self) -> Result<StateIndex, ScrapeError>;

    /// Fetches a state's listing page and returns its site detail URLs in page order
    async fn state_site_links(&self, state_url: &str) -> Result<Vec<String>, ScrapeError>;

    /// Fetches a single site's detail page
    async fn site_detail(&self, site_url: &str) -> Result<Site, ScrapeError>;
}

/// Source of places near a postal code
#[allow(async_fn_in_trait)]
pub trait PlaceSource {
    async fn nearby_places(&self, zipcode: &str) -> Result<PlacesResponse, PlacesError>;
}
