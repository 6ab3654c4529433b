use thiserror::Error;
use url::Url;

use crate::{configuration::ScraperSettings, domain::company::ListingEntry};

use super::{Browser, BrowserError, Locator, ScrollOutcome};

pub const COMPANY_ANCHOR: Locator = Locator::Css("a._company_i9oky_355");
pub const COMPANY_NAME: Locator = Locator::ClassName("_coName_i9oky_470");

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Company listing never appeared on {url}: {source}")]
    ListingTimeout {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("Browser failed while reading the listing: {0}")]
    Browser(#[from] BrowserError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingReport {
    pub entries: Vec<ListingEntry>,
    /// False when scrolling hit its round cap, so entries may be missing.
    pub complete: bool,
}

pub async fn list_directory<B: Browser>(
    browser: &mut B,
    settings: &ScraperSettings,
) -> Result<ListingReport, ScrapeError> {
    let listing_url = settings.listing_url.as_str();
    log::info!("Listing companies from {}", listing_url);

    browser.navigate(listing_url).await?;
    browser
        .wait_for(COMPANY_ANCHOR, settings.listing_wait())
        .await
        .map_err(|source| ScrapeError::ListingTimeout {
            url: listing_url.to_string(),
            source,
        })?;

    let complete = match browser
        .scroll_until_stable(settings.scroll_pause(), settings.max_scroll_rounds)
        .await?
    {
        ScrollOutcome::Stable { rounds } => {
            log::info!("Listing stopped growing after {} scrolls", rounds);
            true
        }
        ScrollOutcome::CapReached { rounds } => {
            log::warn!(
                "Listing still growing after {} scrolls, it may be incomplete",
                rounds
            );
            false
        }
    };

    let base = Url::parse(listing_url).ok();
    let mut entries = vec![];
    for link in browser.labelled_links(COMPANY_ANCHOR, COMPANY_NAME).await? {
        match link {
            Ok((name, href)) => {
                let name = name.trim();
                if name.is_empty() {
                    log::warn!("Skipping listing entry with empty name: {}", href);
                    continue;
                }
                entries.push(ListingEntry::new(name, resolve_link(base.as_ref(), &href)));
            }
            Err(e) => log::warn!("Skipping listing entry: {}", e),
        }
    }

    log::info!("Found {} companies on the listing", entries.len());
    Ok(ListingReport { entries, complete })
}

fn resolve_link(base: Option<&Url>, href: &str) -> String {
    match base.and_then(|base| base.join(href).ok()) {
        Some(url) => url.to_string(),
        None => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_links_resolve_against_listing() {
        let base = Url::parse("https://www.ycombinator.com/companies?batch=Summer%202025").unwrap();

        assert_eq!(
            resolve_link(Some(&base), "/companies/acme"),
            "https://www.ycombinator.com/companies/acme"
        );
        assert_eq!(
            resolve_link(Some(&base), "https://www.ycombinator.com/companies/zenith"),
            "https://www.ycombinator.com/companies/zenith"
        );
        assert_eq!(resolve_link(None, "/companies/acme"), "/companies/acme");
    }
}
