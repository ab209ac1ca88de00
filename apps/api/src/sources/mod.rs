//! Collaborators at the network boundary: web search and job page scraping.
//!
//! Both are traits so the aggregation pipeline can be driven by in-memory fakes.
//! `AppState` carries them as `Arc<dyn SearchProvider>` / `Arc<dyn PageScraper>`.

pub mod page_scraper;
pub mod resume_loader;
pub mod search;

use async_trait::async_trait;
use thiserror::Error;

use crate::matching::recency::parse_posting_date;
use crate::models::{JobPosting, PostingError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),
}

/// Raw fields pulled off a job page, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub company: String,
    /// Unparsed `datetime` attribute, when the page had one.
    pub date: Option<String>,
    pub description: String,
}

impl ScrapedPage {
    /// An unparseable date becomes `None` on the posting; the recency decision
    /// has already been made on the raw string by then.
    pub fn into_posting(self) -> Result<JobPosting, PostingError> {
        let posted_date = self.date.as_deref().and_then(parse_posting_date);
        Ok(JobPosting::new(self.url, self.title)?
            .with_company(self.company)
            .with_posted_date(posted_date)
            .with_description(self.description))
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Result URLs for `query`, in result order, at most `limit` of them.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError>;
}

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// `None` on any fetch or parse failure; failures are logged, never raised.
    async fn scrape(&self, url: &str) -> Option<ScrapedPage>;
}

/// Domain-scoped search query for one job board.
pub fn build_board_query(job_title: &str, board: &str) -> String {
    format!("site:{board} \"{job_title}\"")
}
