#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use async_trait::async_trait;
use yc_tracker::{
    configuration::ScraperSettings,
    domain::company::CompanyRecord,
    services::{
        Browser, BrowserError, Locator, COMPANY_ANCHOR, DESCRIPTION, LINKEDIN_PROFILE, WEBSITE,
    },
};

pub const LISTING_URL: &str = "https://www.ycombinator.com/companies?batch=Summer%202025";

pub fn scraper_settings() -> ScraperSettings {
    ScraperSettings {
        webdriver_url: "http://localhost:9515".to_string(),
        listing_url: LISTING_URL.to_string(),
        headless: true,
        listing_wait_secs: 0,
        detail_wait_secs: 0,
        scroll_pause_ms: 0,
        max_scroll_rounds: 5,
        profile_settle_secs: 0,
        marker_phrase: "yc s25".to_string(),
    }
}

pub fn yc_url(name: &str) -> String {
    format!(
        "https://www.ycombinator.com/companies/{}",
        name.to_lowercase().replace(' ', "-")
    )
}

pub fn linkedin_url(name: &str) -> String {
    format!(
        "https://www.linkedin.com/company/{}",
        name.to_lowercase().replace(' ', "-")
    )
}

pub fn record(name: &str) -> CompanyRecord {
    CompanyRecord {
        name: name.to_string(),
        description: Some(format!("{} does things", name)),
        yc_page: yc_url(name),
        website: None,
        linkedin_url: None,
        mentions_batch: false,
    }
}

/// A canned page: which elements exist and what they hold.
#[derive(Default, Clone)]
pub struct FakePage {
    present: HashSet<Locator>,
    texts: HashMap<Locator, String>,
    hrefs: HashMap<Locator, String>,
    links: Vec<Option<(String, String)>>,
    source: String,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, locator: Locator) -> Self {
        self.present.insert(locator);
        self
    }

    pub fn with_text(mut self, locator: Locator, text: &str) -> Self {
        self.present.insert(locator);
        self.texts.insert(locator, text.to_string());
        self
    }

    pub fn with_href(mut self, locator: Locator, href: &str) -> Self {
        self.present.insert(locator);
        self.hrefs.insert(locator, href.to_string());
        self
    }

    pub fn with_link(mut self, name: &str, href: &str) -> Self {
        self.links.push(Some((name.to_string(), href.to_string())));
        self
    }

    /// An anchor whose name span is missing.
    pub fn with_broken_link(mut self) -> Self {
        self.links.push(None);
        self
    }

    pub fn with_source(mut self, html: &str) -> Self {
        self.source = html.to_string();
        self
    }
}

pub fn listing_page(names: &[&str]) -> FakePage {
    names
        .iter()
        .fold(FakePage::new().with_element(COMPANY_ANCHOR), |page, name| {
            page.with_link(name, &yc_url(name))
        })
}

pub fn company_page(name: &str, website: Option<&str>, linkedin: Option<&str>) -> FakePage {
    let mut page = FakePage::new().with_text(DESCRIPTION, &format!("{} builds developer tools", name));
    if let Some(website) = website {
        page = page.with_text(WEBSITE, website);
    }
    if let Some(linkedin) = linkedin {
        page = page.with_href(LINKEDIN_PROFILE, linkedin);
    }
    page
}

pub fn profile_page(body: &str) -> FakePage {
    FakePage::new().with_source(&format!("<html><body><main>{}</main></body></html>", body))
}

/// Scripted stand-in for a WebDriver session. Unknown URLs fail to load.
pub struct FakeBrowser {
    pages: HashMap<String, FakePage>,
    current: Option<String>,
    heights: Vec<i64>,
    height_reads: usize,
    keep_growing: bool,
    pub visited: Vec<String>,
    pub open_tabs: usize,
    pub tabs_opened: usize,
    pub scrolls: usize,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            current: None,
            heights: vec![1000, 2000, 2000],
            height_reads: 0,
            keep_growing: false,
            visited: vec![],
            open_tabs: 0,
            tabs_opened: 0,
            scrolls: 0,
        }
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Every height read is taller than the last.
    pub fn endless_scroll(mut self) -> Self {
        self.keep_growing = true;
        self
    }

    pub fn visited(&self, url: &str) -> bool {
        self.visited.iter().any(|v| v == url)
    }

    fn page(&self) -> Result<&FakePage, BrowserError> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| BrowserError::NotFound("no page loaded".to_string()))
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.visited.push(url.to_string());
        if self.pages.contains_key(url) {
            self.current = Some(url.to_string());
            Ok(())
        } else {
            self.current = None;
            Err(BrowserError::NotFound(format!("page {}", url)))
        }
    }

    async fn wait_for(&mut self, locator: Locator, _timeout: Duration) -> Result<(), BrowserError> {
        match self.page()?.present.contains(&locator) {
            true => Ok(()),
            false => Err(BrowserError::NotFound(locator.to_string())),
        }
    }

    async fn text(&mut self, locator: Locator) -> Result<String, BrowserError> {
        self.page()?
            .texts
            .get(&locator)
            .cloned()
            .ok_or_else(|| BrowserError::NotFound(locator.to_string()))
    }

    async fn attribute(
        &mut self,
        locator: Locator,
        _name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let page = self.page()?;
        match page.present.contains(&locator) {
            true => Ok(page.hrefs.get(&locator).cloned()),
            false => Err(BrowserError::NotFound(locator.to_string())),
        }
    }

    async fn labelled_links(
        &mut self,
        _item: Locator,
        label: Locator,
    ) -> Result<Vec<Result<(String, String), BrowserError>>, BrowserError> {
        Ok(self
            .page()?
            .links
            .iter()
            .map(|link| {
                link.clone()
                    .ok_or_else(|| BrowserError::NotFound(label.to_string()))
            })
            .collect())
    }

    async fn page_height(&mut self) -> Result<i64, BrowserError> {
        self.height_reads += 1;
        if self.keep_growing {
            return Ok(self.height_reads as i64 * 1000);
        }
        let index = (self.height_reads - 1).min(self.heights.len().saturating_sub(1));
        Ok(self.heights.get(index).copied().unwrap_or_default())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.scrolls += 1;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        Ok(self.page()?.source.clone())
    }

    async fn open_tab(&mut self) -> Result<(), BrowserError> {
        self.open_tabs += 1;
        self.tabs_opened += 1;
        self.current = None;
        Ok(())
    }

    async fn close_tab(&mut self) -> Result<(), BrowserError> {
        if self.open_tabs == 0 {
            return Err(BrowserError::NotFound("extra tab".to_string()));
        }
        self.open_tabs -= 1;
        self.current = None;
        Ok(())
    }

    async fn switch_to_primary(&mut self) -> Result<(), BrowserError> {
        Ok(())
    }
}
