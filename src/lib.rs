//! NPS Explorer Library
//!
//! Scrapes nps.gov for national park sites by state and looks up nearby places,
//! caching every resource so each is fetched at most once.

pub mod cache;
pub mod cli;
pub mod data;
pub mod explorer;
pub mod session;
