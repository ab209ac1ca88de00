//! Aggregation pipeline: search each job board, scrape each result, keep what
//! passes the recency policy.
//!
//! Boards are processed in configured order and URLs in result order, strictly one
//! at a time. A failing board or URL is logged and skipped; the run always
//! completes with whatever it collected.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::matching::recency::is_recent_at;
use crate::models::JobPosting;
use crate::sources::{build_board_query, PageScraper, SearchProvider};

pub const DEFAULT_JOB_BOARDS: &[&str] = &[
    "greenhouse.io",
    "jobs.lever.co",
    "boards.greenhouse.io",
    "job-boards.greenhouse.io",
    "jobs.jobvite.com",
];

pub const DEFAULT_MAX_RESULTS_PER_BOARD: usize = 5;

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub job_title: String,
    pub days_threshold: u32,
    pub boards: Vec<String>,
    pub max_results_per_board: usize,
}

/// Counters for one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub boards_queried: usize,
    pub boards_failed: usize,
    pub urls_seen: usize,
    pub scrape_failures: usize,
    pub stale: usize,
    pub duplicates: usize,
    pub admitted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub postings: Vec<JobPosting>,
    pub summary: RunSummary,
}

/// Recency policy: dated postings must be recent; undated postings are admitted.
/// An empty date string counts as no date.
pub fn admits(date: Option<&str>, days_threshold: u32, now: NaiveDateTime) -> bool {
    match date.map(str::trim) {
        Some(d) if !d.is_empty() => is_recent_at(d, days_threshold, now),
        _ => true,
    }
}

pub struct Aggregator {
    search: Arc<dyn SearchProvider>,
    scraper: Arc<dyn PageScraper>,
}

impl Aggregator {
    pub fn new(search: Arc<dyn SearchProvider>, scraper: Arc<dyn PageScraper>) -> Self {
        Self { search, scraper }
    }

    pub async fn run(&self, request: &SearchRequest) -> AggregateResult {
        self.run_at(request, Utc::now().naive_utc()).await
    }

    pub async fn run_at(&self, request: &SearchRequest, now: NaiveDateTime) -> AggregateResult {
        let mut postings = Vec::new();
        let mut summary = RunSummary::default();
        let mut visited: HashSet<String> = HashSet::new();

        for board in &request.boards {
            let query = build_board_query(&request.job_title, board);
            info!(board = %board, query = %query, provider = self.search.name(), "Searching job board");
            summary.boards_queried += 1;

            let urls = match self.search.search(&query, request.max_results_per_board).await {
                Ok(urls) => urls,
                Err(e) => {
                    warn!(board = %board, error = %e, "Search failed for board, skipping");
                    summary.boards_failed += 1;
                    continue;
                }
            };

            // Every consumed URL counts toward the cap, admitted or not.
            for url in urls.into_iter().take(request.max_results_per_board) {
                summary.urls_seen += 1;
                if !visited.insert(url.clone()) {
                    summary.duplicates += 1;
                    continue;
                }

                let Some(page) = self.scraper.scrape(&url).await else {
                    summary.scrape_failures += 1;
                    continue;
                };

                if !admits(page.date.as_deref(), request.days_threshold, now) {
                    info!(url = %url, date = ?page.date, "Posting outside recency window");
                    summary.stale += 1;
                    continue;
                }

                match page.into_posting() {
                    Ok(posting) => {
                        postings.push(posting);
                        summary.admitted += 1;
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "Discarding invalid posting");
                        summary.scrape_failures += 1;
                    }
                }
            }
        }

        info!(
            admitted = summary.admitted,
            stale = summary.stale,
            failed_boards = summary.boards_failed,
            "Aggregation finished"
        );

        AggregateResult { postings, summary }
    }
}
