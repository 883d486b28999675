//! Cache-mediated access to park listings and nearby places
//!
//! The explorer owns one cache per resource kind and routes every lookup
//! through it, so each distinct state index, state page, detail page and
//! places search is fetched at most once:
//!
//! | Resource        | Key                | Cache                  |
//! |-----------------|--------------------|------------------------|
//! | State index     | listing site root  | [`DiskCache`] (file)   |
//! | State site list | state page URL     | [`MemoryCache`]        |
//! | Site detail     | detail page URL    | [`MemoryCache`]        |
//! | Nearby places   | site zip code      | [`MemoryCache`]        |

use thiserror::Error;

use crate::cache::{CacheError, DiskCache, MemoryCache};
use crate::data::{
    PlaceSource, PlacesError, PlacesResponse, ScrapeError, Site, SiteSource, StateIndex,
};

/// Errors that abort an explorer lookup
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Places(#[from] PlacesError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Resolves states, site lists and nearby places through per-resource caches
pub struct Explorer<S, P> {
    sites: S,
    places: P,
    /// Key the whole state index is persisted under
    index_key: String,
    state_index: DiskCache<StateIndex>,
    site_lists: MemoryCache<String, Vec<Site>>,
    site_details: MemoryCache<String, Site>,
    nearby: MemoryCache<String, PlacesResponse>,
}

impl<S, P> Explorer<S, P>
where
    S: SiteSource,
    P: PlaceSource,
{
    /// Creates an explorer around the given sources and persisted index cache
    ///
    /// # Arguments
    /// * `sites` - Park listings source
    /// * `places` - Nearby places source
    /// * `index_key` - Key the state index is stored under in `state_index`
    /// * `state_index` - Disk cache loaded at startup
    pub fn new(
        sites: S,
        places: P,
        index_key: impl Into<String>,
        state_index: DiskCache<StateIndex>,
    ) -> Self {
        Self {
            sites,
            places,
            index_key: index_key.into(),
            state_index,
            site_lists: MemoryCache::new("site-list"),
            site_details: MemoryCache::new("site-detail"),
            nearby: MemoryCache::new("nearby-places"),
        }
    }

    /// Looks up the listing URL for a state name, case-insensitively
    ///
    /// The first call builds the entire index in one fetch and persists it.
    ///
    /// # Returns
    /// * `Ok(Some(url))` - The state is known
    /// * `Ok(None)` - No state with that name
    /// * `Err(ExplorerError)` - Fetching the index or saving the cache failed
    pub async fn state_url(&mut self, state: &str) -> Result<Option<String>, ExplorerError> {
        let key = state.trim().to_lowercase();
        let sites = &self.sites;

        let index = self
            .state_index
            .get_or_fetch(&self.index_key, || async {
                Ok::<_, ExplorerError>(sites.state_index().await?)
            })
            .await?;

        Ok(index.get(&key).cloned())
    }

    /// Returns the sites listed on a state page, in page order
    ///
    /// Each site's detail page is resolved through the detail cache, so a park
    /// listed under several states is scraped once.
    pub async fn sites_for_state(&mut self, state_url: &str) -> Result<&[Site], ExplorerError> {
        let sites = &self.sites;
        let details = &mut self.site_details;

        let list = self
            .site_lists
            .get_or_fetch(&state_url.to_string(), || async move {
                let links = sites.state_site_links(state_url).await?;
                let mut records = Vec::with_capacity(links.len());
                for link in &links {
                    let site = details
                        .get_or_fetch(link, || sites.site_detail(link))
                        .await?;
                    records.push(site.clone());
                }
                Ok::<_, ExplorerError>(records)
            })
            .await?;

        Ok(list.as_slice())
    }

    /// Returns the places-search response for a site, keyed by its zip code
    pub async fn nearby_places(&mut self, site: &Site) -> Result<&PlacesResponse, ExplorerError> {
        let places = &self.places;
        let zipcode = site.zipcode().to_string();

        let response = self
            .nearby
            .get_or_fetch(&zipcode, || places.nearby_places(site.zipcode()))
            .await?;

        Ok(response)
    }

    /// Path of the persisted state index
    pub fn cache_path(&self) -> &std::path::Path {
        self.state_index.path()
    }

    /// Number of state pages fetched this run
    pub fn cached_site_lists(&self) -> usize {
        self.site_lists.len()
    }

    /// Number of detail pages fetched this run
    pub fn cached_site_details(&self) -> usize {
        self.site_details.len()
    }

    /// Number of places searches made this run
    pub fn cached_nearby_searches(&self) -> usize {
        self.nearby.len()
    }
}
