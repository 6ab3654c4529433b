use thiserror::Error;

use crate::{
    configuration::ScraperSettings,
    dal::company_store::{CompanyStore, StoreError},
    domain::{company::CompanyRecord, session::SessionState},
};

use super::{
    detail_enricher::{enrich_all, EnrichmentOutcome},
    directory_lister::{list_directory, ScrapeError},
    merge_engine, Browser, BrowserError, Droid,
};

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Could not start the browser: {0}")]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCompany {
    pub name: String,
    pub reason: String,
}

/// What one refresh did, for the dashboard notice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub listed: usize,
    pub candidates: usize,
    pub enriched: usize,
    pub skipped: Vec<SkippedCompany>,
    pub listing_complete: bool,
    pub saved: bool,
}

/// Store → listing → new-name difference → enrichment → union → store.
pub async fn refresh<B: Browser>(
    browser: &mut B,
    store: &CompanyStore,
    settings: &ScraperSettings,
) -> Result<(Vec<CompanyRecord>, RefreshReport), RefreshError> {
    let existing = store.load()?;
    let listing = list_directory(browser, settings).await?;

    let mut report = RefreshReport {
        listed: listing.entries.len(),
        listing_complete: listing.complete,
        ..Default::default()
    };

    let candidates = merge_engine::new_entries(&existing, listing.entries);
    report.candidates = candidates.len();
    log::info!(
        "{} of {} listed companies are new",
        candidates.len(),
        report.listed
    );

    let mut fresh = vec![];
    for outcome in enrich_all(browser, &candidates, settings).await {
        match outcome {
            EnrichmentOutcome::Enriched(record) => fresh.push(record),
            EnrichmentOutcome::Skipped { name, reason } => {
                report.skipped.push(SkippedCompany { name, reason })
            }
        }
    }
    report.enriched = fresh.len();

    if fresh.is_empty() {
        log::info!("No new companies enriched, store left untouched");
        return Ok((existing, report));
    }

    let merged = merge_engine::merge(existing, fresh);
    store.save(&merged)?;
    report.saved = true;

    Ok((merged, report))
}

/// One refresh with its own browser session, quit whatever the outcome.
pub async fn refresh_with_droid(
    store: &CompanyStore,
    settings: &ScraperSettings,
) -> Result<(Vec<CompanyRecord>, RefreshReport), RefreshError> {
    let mut droid = Droid::launch(settings).await?;
    let result = refresh(&mut droid, store, settings).await;

    if let Err(e) = droid.quit().await {
        log::warn!("Browser session did not quit cleanly: {}", e);
    }

    result
}

pub fn next_session(
    state: SessionState,
    result: Result<(Vec<CompanyRecord>, RefreshReport), RefreshError>,
) -> SessionState {
    match result {
        Ok((table, report)) => {
            log::info!(
                "Refresh done: {} enriched, {} skipped, table has {} companies",
                report.enriched,
                report.skipped.len(),
                table.len()
            );
            state.refreshed(table, report)
        }
        Err(e) => {
            log::error!("Refresh failed: {}", e);
            state.refresh_failed(e.to_string())
        }
    }
}
