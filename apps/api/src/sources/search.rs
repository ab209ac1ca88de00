//! Web search over DuckDuckGo's HTML endpoint.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::sources::{SearchProvider, SourceError};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = concat!("jobscout/", env!("CARGO_PKG_VERSION"));

static RESULT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("static selector"));

static DDG_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://duckduckgo.com/").expect("static URL"));

#[derive(Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let urls = parse_result_links(&body, limit);
        info!(query = %query, results = urls.len(), "Search completed");
        Ok(urls)
    }
}

/// Resolves a result anchor's `href`. DuckDuckGo wraps targets as
/// `//duckduckgo.com/l/?uddg=<encoded target>`; ad links (`/y.js`) are dropped.
fn resolve_result_href(href: &str) -> Option<Url> {
    let url = DDG_BASE.join(href).ok()?;

    let target = if url.host_str().is_some_and(|h| h.ends_with("duckduckgo.com")) {
        if url.path() != "/l/" {
            return None;
        }
        let encoded = url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())?;
        Url::parse(&encoded).ok()?
    } else {
        url
    };

    matches!(target.scheme(), "http" | "https").then_some(target)
}

/// Result URLs in page order, de-duplicated, at most `limit`.
pub fn parse_result_links(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    document
        .select(&RESULT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| {
            let resolved = resolve_result_href(href);
            if resolved.is_none() {
                debug!(href = %href, "Skipping search result link");
            }
            resolved
        })
        .map(String::from)
        .filter(|u| seen.insert(u.clone()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fjobs.lever.co%2Facme%2F123&amp;rut=abc">Rust Engineer</a>
          </div>
          <div class="result result--ad">
            <a class="result__a" href="https://duckduckgo.com/y.js?ad_provider=x">Ad</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://boards.greenhouse.io/acme/jobs/456">Backend Engineer</a>
          </div>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fjobs.lever.co%2Facme%2F123">Duplicate</a>
          </div>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=mailto%3Ajobs%40acme.com">Mail</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://jobs.jobvite.com/acme/job/789">Platform Engineer</a>
          </div>
          <a class="other" href="https://example.com">Not a result</a>
        </body></html>
    "#;

    #[test]
    fn test_parses_and_decodes_result_links() {
        let urls = parse_result_links(RESULTS_PAGE, 10);
        assert_eq!(
            urls,
            vec![
                "https://jobs.lever.co/acme/123",
                "https://boards.greenhouse.io/acme/jobs/456",
                "https://jobs.jobvite.com/acme/job/789",
            ]
        );
    }

    #[test]
    fn test_respects_limit() {
        let urls = parse_result_links(RESULTS_PAGE, 2);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[1], "https://boards.greenhouse.io/acme/jobs/456");
    }

    #[test]
    fn test_empty_page_has_no_results() {
        assert!(parse_result_links("<html></html>", 5).is_empty());
    }
}
