//! Symmetric document similarity and reference-based ranking.

use tracing::debug;

use crate::matching::vectorizer::TextVectorizer;
use crate::models::{JobPosting, MatchResult};
use crate::nlp::DenseVector;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

#[derive(Clone)]
pub struct SimilarityEngine {
    vectorizer: TextVectorizer,
}

/// Cosine clamped into [0, 1]. Empty or zero vectors score 0.
fn score_vectors(a: &DenseVector, b: &DenseVector) -> f64 {
    match a.cosine(b) {
        Some(cos) if cos.is_finite() => cos.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

impl SimilarityEngine {
    pub fn new(vectorizer: TextVectorizer) -> Self {
        Self { vectorizer }
    }

    pub fn model_name(&self) -> &str {
        self.vectorizer.model_name()
    }

    pub fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        if text_a.trim().is_empty() || text_b.trim().is_empty() {
            return 0.0;
        }
        score_vectors(
            &self.vectorizer.vectorize(text_a),
            &self.vectorizer.vectorize(text_b),
        )
    }

    /// Candidates whose description scores at least `threshold` against the
    /// reference description, best first. The reference itself (matched by source
    /// URL) is never returned. Ties keep candidate order.
    pub fn rank_similar(
        &self,
        reference: &JobPosting,
        candidates: &[JobPosting],
        threshold: f64,
    ) -> Vec<MatchResult> {
        let reference_vector = self.vectorizer.vectorize(reference.description());
        let reference_empty = reference.description().trim().is_empty();

        let mut results: Vec<MatchResult> = candidates
            .iter()
            .filter(|c| c.source_url() != reference.source_url())
            .filter_map(|candidate| {
                let score = if reference_empty || candidate.description().trim().is_empty() {
                    0.0
                } else {
                    score_vectors(
                        &reference_vector,
                        &self.vectorizer.vectorize(candidate.description()),
                    )
                };
                debug!(url = %candidate.source_url(), score, "Similarity scored");
                (score >= threshold).then(|| MatchResult {
                    posting: candidate.clone(),
                    score,
                    rank: 0,
                })
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        for (i, result) in results.iter_mut().enumerate() {
            result.rank = i + 1;
        }
        results
    }

    /// Drops postings that are near-identical to one kept earlier. Postings with
    /// descriptions compare by similarity; postings without one compare by title
    /// and company. Kept postings stay in input order.
    pub fn dedup_near_identical(&self, postings: Vec<JobPosting>, threshold: f64) -> Vec<JobPosting> {
        let mut kept: Vec<(JobPosting, Option<DenseVector>)> = Vec::with_capacity(postings.len());

        for posting in postings {
            let vector = (!posting.description().trim().is_empty())
                .then(|| self.vectorizer.vectorize(posting.description()));

            let duplicate = kept.iter().any(|(other, other_vector)| match (&vector, other_vector) {
                (Some(v), Some(ov)) => score_vectors(v, ov) >= threshold,
                (None, None) => {
                    other.title().eq_ignore_ascii_case(posting.title())
                        && other.company().eq_ignore_ascii_case(posting.company())
                }
                _ => false,
            });

            if duplicate {
                debug!(url = %posting.source_url(), "Dropping near-identical posting");
            } else {
                kept.push((posting, vector));
            }
        }

        kept.into_iter().map(|(posting, _)| posting).collect()
    }
}
