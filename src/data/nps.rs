//! National Park Service website scraper
//!
//! Fetches the nps.gov home page, state listing pages and site detail pages,
//! and extracts domain values from them by CSS selector. Every extraction is
//! strict: a missing structural marker is a [`ScrapeError::MissingElement`].

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};

use super::{Site, SiteSource, StateIndex};

/// Base URL for the National Park Service website
pub const NPS_BASE_URL: &str = "https://www.nps.gov";

/// Suffix appended to a park's relative link to reach its detail page
const DETAIL_PAGE_SUFFIX: &str = "index.htm";

const STATE_MENU: &str = "ul.dropdown-menu.SearchBar-keywordSearch";
const PARKS_LIST: &str = "#list_parks";
const PARK_LINK: &str = "h3 a";
const SITE_NAME: &str = ".Hero-title";
const SITE_CATEGORY: &str = ".Hero-designation";
const SITE_LOCALITY: &str = "[itemprop=\"addressLocality\"]";
const SITE_REGION: &str = "[itemprop=\"addressRegion\"]";
const SITE_ZIPCODE: &str = ".postal-code";
const SITE_PHONE: &str = ".tel";

/// Errors that can occur when scraping the park service website
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP request failed or returned an error status
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An expected element is absent from the page
    #[error("Malformed page: missing element '{marker}'")]
    MissingElement { marker: &'static str },

    /// A required element is present but has no text
    #[error("Malformed page: element '{marker}' is empty")]
    EmptyField { marker: &'static str },

    /// A selector constant failed to parse
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        selector: &'static str,
        reason: String,
    },
}

/// Client for scraping nps.gov
#[derive(Debug, Clone)]
pub struct NpsClient {
    client: Client,
    /// Site root that relative links are appended to
    base_url: String,
}

impl Default for NpsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NpsClient {
    /// Create a new NpsClient pointed at nps.gov
    pub fn new() -> Self {
        Self::with_base_url(NPS_BASE_URL)
    }

    /// Create a new NpsClient with a custom site root
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The site root, also used as the persisted state-index key
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(url, "GET");
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

impl SiteSource for NpsClient {
    async fn state_index(&self) -> Result<StateIndex, ScrapeError> {
        let html = self.fetch_page(&self.base_url).await?;
        parse_state_index(&html, &self.base_url)
    }

    async fn state_site_links(&self, state_url: &str) -> Result<Vec<String>, ScrapeError> {
        let html = self.fetch_page(state_url).await?;
        parse_site_links(&html, &self.base_url)
    }

    async fn site_detail(&self, site_url: &str) -> Result<Site, ScrapeError> {
        let html = self.fetch_page(site_url).await?;
        parse_site_detail(&html)
    }
}

fn selector(css: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
        selector: css,
        reason: e.to_string(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first element matching `css`, whitespace-trimmed
fn required_text(document: &Html, css: &'static str) -> Result<String, ScrapeError> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .next()
        .map(element_text)
        .ok_or(ScrapeError::MissingElement { marker: css })
}

/// Extracts the state index from the home page's state dropdown
///
/// Keys are lowercased display names, values are `base_url` + relative link.
pub fn parse_state_index(html: &str, base_url: &str) -> Result<StateIndex, ScrapeError> {
    let document = Html::parse_document(html);
    let menu_sel = selector(STATE_MENU)?;
    let link_sel = selector("a")?;

    let menu = document
        .select(&menu_sel)
        .next()
        .ok_or(ScrapeError::MissingElement { marker: STATE_MENU })?;

    let mut index = StateIndex::new();
    for link in menu.select(&link_sel) {
        let Some(href) = link.value().attr("href") else {
            warn!(text = %element_text(link), "State link without href, skipping");
            continue;
        };
        index.insert(
            element_text(link).to_lowercase(),
            format!("{}{}", base_url, href),
        );
    }

    debug!(states = index.len(), "Parsed state index");
    Ok(index)
}

/// Extracts the detail page URLs from a state listing page, in page order
pub fn parse_site_links(html: &str, base_url: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let list_sel = selector(PARKS_LIST)?;
    let link_sel = selector(PARK_LINK)?;

    let list = document
        .select(&list_sel)
        .next()
        .ok_or(ScrapeError::MissingElement { marker: PARKS_LIST })?;

    let links = list
        .select(&link_sel)
        .filter_map(|link| link.value().attr("href"))
        .map(|href| format!("{}{}{}", base_url, href, DETAIL_PAGE_SUFFIX))
        .collect();

    Ok(links)
}

/// Builds a [`Site`] from a site detail page
///
/// All six markers must be present. Only the category may be blank.
pub fn parse_site_detail(html: &str) -> Result<Site, ScrapeError> {
    let document = Html::parse_document(html);

    let name = required_text(&document, SITE_NAME)?;
    if name.is_empty() {
        return Err(ScrapeError::EmptyField { marker: SITE_NAME });
    }
    let category = required_text(&document, SITE_CATEGORY)?;
    let locality = required_text(&document, SITE_LOCALITY)?;
    let region = required_text(&document, SITE_REGION)?;
    let zipcode = required_text(&document, SITE_ZIPCODE)?;
    let phone = required_text(&document, SITE_PHONE)?;

    Ok(Site::new(
        category,
        name,
        format!("{}, {}", locality, region),
        zipcode,
        phone,
    ))
}
