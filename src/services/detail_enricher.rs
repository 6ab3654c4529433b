use std::time::Duration;

use scraper::Html;

use crate::{
    configuration::ScraperSettings,
    domain::company::{CompanyRecord, ListingEntry},
};

use super::{Browser, BrowserError, Locator};

pub const DESCRIPTION: Locator = Locator::Css("div.prose");
pub const WEBSITE: Locator = Locator::XPath("//div[contains(@class, 'group-hover:underline')]");
pub const LINKEDIN_PROFILE: Locator =
    Locator::XPath("//a[contains(@aria-label, 'LinkedIn profile')]");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Enriched(CompanyRecord),
    Skipped { name: String, reason: String },
}

/// Enriches entries one at a time, each in its own tab. A failing company
/// is reported as skipped and never stops the batch.
pub async fn enrich_all<B: Browser>(
    browser: &mut B,
    entries: &[ListingEntry],
    settings: &ScraperSettings,
) -> Vec<EnrichmentOutcome> {
    let mut outcomes = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        log::info!("[{}/{}] Enriching {}", i + 1, entries.len(), entry.name);
        outcomes.push(enrich_company(browser, entry, settings).await);
    }

    outcomes
}

pub async fn enrich_company<B: Browser>(
    browser: &mut B,
    entry: &ListingEntry,
    settings: &ScraperSettings,
) -> EnrichmentOutcome {
    if let Err(e) = browser.open_tab().await {
        log::warn!("Could not open a tab for {}: {}", entry.name, e);
        return EnrichmentOutcome::Skipped {
            name: entry.name.clone(),
            reason: e.to_string(),
        };
    }

    match scrape_detail(browser, entry, settings).await {
        Ok(record) => {
            leave_tab(browser).await;
            EnrichmentOutcome::Enriched(record)
        }
        Err(e) => {
            let reason = e.to_string();
            log::warn!("Error processing {}: {}", entry.name, reason);
            leave_tab(browser).await;
            EnrichmentOutcome::Skipped {
                name: entry.name.clone(),
                reason,
            }
        }
    }
}

async fn scrape_detail<B: Browser>(
    browser: &mut B,
    entry: &ListingEntry,
    settings: &ScraperSettings,
) -> Result<CompanyRecord, BrowserError> {
    browser.navigate(&entry.yc_page).await?;
    browser.wait_for(DESCRIPTION, settings.detail_wait()).await?;
    let description = browser.text(DESCRIPTION).await?;

    let website = match browser.text(WEBSITE).await {
        Ok(text) => Some(text.trim().to_string()).filter(|w| !w.is_empty()),
        Err(e) => {
            log::debug!("No website for {}: {}", entry.name, e);
            None
        }
    };

    let linkedin_url = match browser.attribute(LINKEDIN_PROFILE, "href").await {
        Ok(href) => href.filter(|h| !h.trim().is_empty()),
        Err(e) => {
            log::debug!("No LinkedIn profile for {}: {}", entry.name, e);
            None
        }
    };

    let mentions_batch = check_profile_mention(browser, linkedin_url.as_deref(), settings).await;

    Ok(CompanyRecord {
        name: entry.name.clone(),
        description: Some(description),
        yc_page: entry.yc_page.clone(),
        website,
        linkedin_url,
        mentions_batch,
    })
}

/// Close the company tab; if that fails, at least get back to the primary one.
async fn leave_tab<B: Browser>(browser: &mut B) {
    if let Err(e) = browser.close_tab().await {
        log::warn!("Could not close company tab: {}", e);
        if let Err(e) = browser.switch_to_primary().await {
            log::error!("Could not return to the listing tab: {}", e);
        }
    }
}

/// Missing profile or any navigation failure counts as "not mentioned".
pub async fn check_profile_mention<B: Browser>(
    browser: &mut B,
    profile_url: Option<&str>,
    settings: &ScraperSettings,
) -> bool {
    let Some(url) = profile_url else {
        return false;
    };

    match fetch_profile_text(browser, url, settings.profile_settle()).await {
        Ok(text) => mentions_phrase(&text, &settings.marker_phrase),
        Err(e) => {
            log::debug!("Profile check failed for {}: {}", url, e);
            false
        }
    }
}

async fn fetch_profile_text<B: Browser>(
    browser: &mut B,
    url: &str,
    settle: Duration,
) -> Result<String, BrowserError> {
    browser.navigate(url).await?;
    tokio::time::sleep(settle).await;
    let source = browser.page_source().await?;
    Ok(document_text(&source))
}

pub fn document_text(html: &str) -> String {
    Html::parse_document(html).root_element().text().collect()
}

pub fn mentions_phrase(text: &str, phrase: &str) -> bool {
    let phrase = phrase.trim().to_lowercase();
    !phrase.is_empty() && text.to_lowercase().contains(&phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_text_drops_markup() {
        let html = r#"<html><head><title>Acme</title></head>
            <body><p>Backed by <b>YC S25</b></p><script>var x = 1;</script></body></html>"#;

        let text = document_text(html);

        assert!(text.contains("Backed by YC S25"));
        assert!(!text.contains("<b>"));
    }

    #[test]
    fn phrase_match_ignores_case() {
        assert!(mentions_phrase("Proud to be part of yc S25!", "YC S25"));
        assert!(mentions_phrase("YC S25", "yc s25"));
        assert!(!mentions_phrase("YC W25 alumni", "yc s25"));
        assert!(!mentions_phrase("anything", "  "));
    }
}
