use std::{fmt, time::Duration};

use async_trait::async_trait;
use thirtyfour::{prelude::*, ChromiumLikeCapabilities, WindowHandle};
use thiserror::Error;

use crate::configuration::ScraperSettings;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] WebDriverError),

    #[error("Timed out after {timeout:?} waiting for {locator}")]
    Timeout {
        locator: String,
        timeout: Duration,
        #[source]
        source: WebDriverError,
    },

    #[error("No element matches {0}")]
    NotFound(String),

    #[error("Element {locator} has no {attribute}")]
    MissingAttribute { locator: String, attribute: String },
}

/// How to find an element on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
    ClassName(&'static str),
}

impl Locator {
    fn by(&self) -> By {
        match *self {
            Locator::Css(css) => By::Css(css),
            Locator::XPath(xpath) => By::XPath(xpath),
            Locator::ClassName(class) => By::ClassName(class),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "css `{}`", css),
            Locator::XPath(xpath) => write!(f, "xpath `{}`", xpath),
            Locator::ClassName(class) => write!(f, "class `{}`", class),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Stable { rounds: usize },
    CapReached { rounds: usize },
}

/// The slice of browser automation the scraper needs. `Droid` drives a
/// real Chrome over WebDriver; tests drive a scripted fake.
#[async_trait]
pub trait Browser: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn wait_for(&mut self, locator: Locator, timeout: Duration) -> Result<(), BrowserError>;

    async fn text(&mut self, locator: Locator) -> Result<String, BrowserError>;

    async fn attribute(
        &mut self,
        locator: Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// One result per `item` element: the text of its `label` child and
    /// its link target. A bad element fails alone.
    async fn labelled_links(
        &mut self,
        item: Locator,
        label: Locator,
    ) -> Result<Vec<Result<(String, String), BrowserError>>, BrowserError>;

    async fn page_height(&mut self) -> Result<i64, BrowserError>;

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError>;

    async fn page_source(&mut self) -> Result<String, BrowserError>;

    /// Opens a blank tab and focuses it.
    async fn open_tab(&mut self) -> Result<(), BrowserError>;

    /// Closes the focused tab and refocuses the primary one.
    async fn close_tab(&mut self) -> Result<(), BrowserError>;

    async fn switch_to_primary(&mut self) -> Result<(), BrowserError>;

    /// Scrolls until the page height stops growing, at most `max_rounds` times.
    async fn scroll_until_stable(
        &mut self,
        pause: Duration,
        max_rounds: usize,
    ) -> Result<ScrollOutcome, BrowserError> {
        let mut last_height = self.page_height().await?;

        for round in 1..=max_rounds {
            self.scroll_to_bottom().await?;
            tokio::time::sleep(pause).await;

            let new_height = self.page_height().await?;
            if new_height == last_height {
                return Ok(ScrollOutcome::Stable { rounds: round });
            }
            last_height = new_height;
        }

        Ok(ScrollOutcome::CapReached { rounds: max_rounds })
    }
}

pub struct Droid {
    pub driver: WebDriver,
    primary: WindowHandle,
}

impl Droid {
    pub async fn launch(settings: &ScraperSettings) -> Result<Self, BrowserError> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }
        caps.add_arg("--window-size=1920,1080")?;

        // http://chrome:4444/wd/hub
        // http://localhost:9515
        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps).await?;
        let primary = driver.window().await?;

        log::info!("Browser session started on {}", settings.webdriver_url);
        Ok(Droid { driver, primary })
    }

    pub async fn quit(self) -> Result<(), BrowserError> {
        self.driver.quit().await?;
        Ok(())
    }
}

async fn read_labelled_link(
    element: &WebElement,
    label: Locator,
) -> Result<(String, String), BrowserError> {
    let name = element.find(label.by()).await?.text().await?;
    let href = element
        .prop("href")
        .await?
        .ok_or_else(|| BrowserError::MissingAttribute {
            locator: label.to_string(),
            attribute: "href".to_string(),
        })?;

    Ok((name, href))
}

#[async_trait]
impl Browser for Droid {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn wait_for(&mut self, locator: Locator, timeout: Duration) -> Result<(), BrowserError> {
        self.driver
            .query(locator.by())
            .wait(timeout, WAIT_POLL_INTERVAL)
            .first()
            .await
            .map(|_| ())
            .map_err(|source| BrowserError::Timeout {
                locator: locator.to_string(),
                timeout,
                source,
            })
    }

    async fn text(&mut self, locator: Locator) -> Result<String, BrowserError> {
        let element = self
            .driver
            .find(locator.by())
            .await
            .map_err(|_| BrowserError::NotFound(locator.to_string()))?;
        Ok(element.text().await?)
    }

    async fn attribute(
        &mut self,
        locator: Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let element = self
            .driver
            .find(locator.by())
            .await
            .map_err(|_| BrowserError::NotFound(locator.to_string()))?;
        Ok(element.prop(name).await?)
    }

    async fn labelled_links(
        &mut self,
        item: Locator,
        label: Locator,
    ) -> Result<Vec<Result<(String, String), BrowserError>>, BrowserError> {
        let elements = self.driver.find_all(item.by()).await?;

        let mut links = Vec::with_capacity(elements.len());
        for element in elements.iter() {
            links.push(read_labelled_link(element, label).await);
        }

        Ok(links)
    }

    async fn page_height(&mut self) -> Result<i64, BrowserError> {
        let ret = self
            .driver
            .execute("return document.body.scrollHeight", Vec::new())
            .await?;
        Ok(ret.json().as_i64().unwrap_or_default())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.driver
            .execute("window.scrollTo(0, document.body.scrollHeight);", Vec::new())
            .await?;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        Ok(self.driver.source().await?)
    }

    async fn open_tab(&mut self) -> Result<(), BrowserError> {
        let handle = self.driver.new_tab().await?;
        self.driver.switch_to_window(handle).await?;
        Ok(())
    }

    async fn close_tab(&mut self) -> Result<(), BrowserError> {
        self.driver.close_window().await?;
        self.switch_to_primary().await
    }

    async fn switch_to_primary(&mut self) -> Result<(), BrowserError> {
        self.driver.switch_to_window(self.primary.clone()).await?;
        Ok(())
    }
}
