//! Job page scraper. Fetches a posting page and pulls title, company, date and
//! description out of the HTML with a fixed chain of selectors.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::models::posting::NOT_AVAILABLE;
use crate::sources::{PageScraper, ScrapedPage, SourceError};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("jobscout/", env!("CARGO_PKG_VERSION"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static TIME: LazyLock<Selector> = LazyLock::new(|| selector("time"));
static COMPANY: LazyLock<Selector> = LazyLock::new(|| selector("div.company-name"));
/// Tried in order; `body` is the last resort.
static DESCRIPTION: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [
        selector("div.job-description"),
        selector("div.posting-content"),
        selector("body"),
    ]
});

pub struct HttpPageScraper {
    client: Client,
}

impl HttpPageScraper {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| SourceError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::InvalidUrl(url.to_string()));
        }

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageScraper for HttpPageScraper {
    async fn scrape(&self, url: &str) -> Option<ScrapedPage> {
        match self.fetch(url).await {
            Ok(html) => {
                let page = extract_page(url, &html);
                debug!(url = %url, title = %page.title, has_date = page.date.is_some(), "Scraped page");
                Some(page)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to fetch job page");
                None
            }
        }
    }
}

/// Text nodes of `element`, trimmed, empty ones dropped, joined with `sep`.
fn element_text(element: ElementRef<'_>, sep: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

fn first_text(document: &Html, selector: &Selector, sep: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| element_text(el, sep))
}

/// Field extraction from a fetched page.
pub fn extract_page(url: &str, html: &str) -> ScrapedPage {
    let document = Html::parse_document(html);

    let title = first_text(&document, &TITLE, " ")
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    // Only the first <time> counts, and only if it carries a datetime attribute.
    let date = document
        .select(&TIME)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .map(str::to_string);

    let description = DESCRIPTION
        .iter()
        .find_map(|sel| document.select(sel).next())
        .map(|el| element_text(el, " "))
        .unwrap_or_default();

    let company = first_text(&document, &COMPANY, "")
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    ScrapedPage {
        url: url.to_string(),
        title,
        company,
        date,
        description,
    }
}
