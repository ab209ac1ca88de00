use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder for a title or company the page did not expose.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error, PartialEq)]
pub enum PostingError {
    #[error("Job posting source URL must not be empty")]
    EmptySourceUrl,
}

/// A single job advertisement. `source_url` is its identity within a run.
///
/// Immutable once built, except for `match_percentage`, which the resume matcher
/// attaches after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JobPostingFields")]
pub struct JobPosting {
    title: String,
    company: String,
    posted_date: Option<NaiveDate>,
    description: String,
    source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    match_percentage: Option<f64>,
}

/// Wire shape of a posting; validated into `JobPosting`.
#[derive(Debug, Deserialize)]
struct JobPostingFields {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    posted_date: Option<NaiveDate>,
    #[serde(default)]
    description: String,
    #[serde(alias = "url")]
    source_url: String,
    #[serde(default)]
    match_percentage: Option<f64>,
}

impl TryFrom<JobPostingFields> for JobPosting {
    type Error = PostingError;

    fn try_from(fields: JobPostingFields) -> Result<Self, Self::Error> {
        let mut posting = JobPosting::new(fields.source_url, fields.title.unwrap_or_default())?
            .with_company(fields.company.unwrap_or_default())
            .with_description(fields.description);
        posting.posted_date = fields.posted_date;
        posting.match_percentage = fields.match_percentage;
        Ok(posting)
    }
}

fn or_not_available(value: String) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value
    }
}

impl JobPosting {
    pub fn new(
        source_url: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, PostingError> {
        let source_url = source_url.into();
        if source_url.trim().is_empty() {
            return Err(PostingError::EmptySourceUrl);
        }
        Ok(Self {
            title: or_not_available(title.into()),
            company: NOT_AVAILABLE.to_string(),
            posted_date: None,
            description: String::new(),
            source_url,
            match_percentage: None,
        })
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = or_not_available(company.into());
        self
    }

    pub fn with_posted_date(mut self, posted_date: Option<NaiveDate>) -> Self {
        self.posted_date = posted_date;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn posted_date(&self) -> Option<NaiveDate> {
        self.posted_date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn match_percentage(&self) -> Option<f64> {
        self.match_percentage
    }

    pub(crate) fn set_match_percentage(&mut self, percentage: f64) {
        self.match_percentage = Some(percentage);
    }
}

/// A posting paired with its relevance score and 1-based rank.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub posting: JobPosting,
    pub score: f64,
    pub rank: usize,
}
