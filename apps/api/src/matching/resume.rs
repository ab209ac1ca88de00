//! Resume matcher: keyword-overlap relevance of postings to a resume.
//!
//! Score = Jaccard index of the resume and posting keyword sets, as a percentage
//! rounded to two decimals. Postings that yield no keywords are left out rather
//! than scored 0; a resume that yields nothing aborts matching with a diagnostic.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::matching::vectorizer::{KeywordSet, TextVectorizer};
use crate::models::JobPosting;
use crate::sources::resume_loader;

/// Why a resume could not be matched at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchReason {
    ResumeUnreadable,
    EmptyResumeText,
    NoResumeKeywords,
}

impl NoMatchReason {
    pub fn message(self) -> &'static str {
        match self {
            NoMatchReason::ResumeUnreadable => "The resume could not be read.",
            NoMatchReason::EmptyResumeText => "No text could be extracted from the resume.",
            NoMatchReason::NoResumeKeywords => "No keywords could be extracted from the resume.",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeMatchReport {
    /// Scored postings, best match first. Empty whenever `diagnostic` is set.
    pub matches: Vec<JobPosting>,
    /// The resume's keyword set, sorted.
    pub resume_keywords: Vec<String>,
    /// Postings left out because their description or keyword set was empty.
    pub skipped: usize,
    pub diagnostic: Option<NoMatchReason>,
}

impl ResumeMatchReport {
    fn aborted(reason: NoMatchReason) -> Self {
        warn!(reason = ?reason, "{}", reason.message());
        Self {
            matches: Vec::new(),
            resume_keywords: Vec::new(),
            skipped: 0,
            diagnostic: Some(reason),
        }
    }
}

/// `100 * |a ∩ b| / |a ∪ b|`, rounded to two decimals with ties to even;
/// 0 when the union is empty.
pub fn jaccard_percentage(a: &KeywordSet, b: &KeywordSet) -> f64 {
    let union = a.union_len(b);
    if union == 0 {
        return 0.0;
    }
    round2(a.intersection_len(b) as f64 / union as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[derive(Clone)]
pub struct ResumeMatcher {
    vectorizer: TextVectorizer,
}

impl ResumeMatcher {
    pub fn new(vectorizer: TextVectorizer) -> Self {
        Self { vectorizer }
    }

    /// Reads the resume at `path` (PDF or plain text) and matches it.
    pub fn match_resume_file(&self, path: &Path, postings: Vec<JobPosting>) -> ResumeMatchReport {
        match resume_loader::try_load(path) {
            Ok(text) => self.match_against_resume(&text, postings),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read resume");
                ResumeMatchReport::aborted(NoMatchReason::ResumeUnreadable)
            }
        }
    }

    /// Matches an uploaded resume; `file_name` picks PDF or text extraction.
    pub fn match_resume_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        postings: Vec<JobPosting>,
    ) -> ResumeMatchReport {
        match resume_loader::load_bytes(file_name, bytes) {
            Ok(text) => self.match_against_resume(&text, postings),
            Err(e) => {
                warn!(file_name = %file_name, error = %e, "Failed to read uploaded resume");
                ResumeMatchReport::aborted(NoMatchReason::ResumeUnreadable)
            }
        }
    }

    pub fn match_against_resume(
        &self,
        resume_text: &str,
        postings: Vec<JobPosting>,
    ) -> ResumeMatchReport {
        if resume_text.trim().is_empty() {
            return ResumeMatchReport::aborted(NoMatchReason::EmptyResumeText);
        }

        let resume_keywords = self.vectorizer.keywords(resume_text);
        if resume_keywords.is_empty() {
            return ResumeMatchReport::aborted(NoMatchReason::NoResumeKeywords);
        }

        let mut matches = Vec::with_capacity(postings.len());
        let mut skipped = 0;

        for mut posting in postings {
            let description = posting.description().trim();
            if description.is_empty() {
                skipped += 1;
                continue;
            }
            let posting_keywords = self.vectorizer.keywords(description);
            if posting_keywords.is_empty() {
                skipped += 1;
                continue;
            }
            posting.set_match_percentage(jaccard_percentage(&resume_keywords, &posting_keywords));
            matches.push(posting);
        }

        matches.sort_by(|a, b| {
            let (a, b) = (
                a.match_percentage().unwrap_or_default(),
                b.match_percentage().unwrap_or_default(),
            );
            b.total_cmp(&a)
        });

        info!(
            resume_keywords = resume_keywords.len(),
            matched = matches.len(),
            skipped,
            "Matched postings against resume"
        );

        ResumeMatchReport {
            matches,
            resume_keywords: resume_keywords.iter().map(str::to_string).collect(),
            skipped,
            diagnostic: None,
        }
    }
}
