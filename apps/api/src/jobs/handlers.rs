use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::matching::resume::ResumeMatchReport;
use crate::models::{JobPosting, MatchResult};
use crate::pipeline::{AggregateResult, RunSummary, SearchRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobSearchRequest {
    pub job_title: String,
    #[serde(default)]
    pub days_threshold: Option<u32>,
    #[serde(default)]
    pub boards: Option<Vec<String>>,
    #[serde(default)]
    pub max_results_per_board: Option<usize>,
}

#[derive(Serialize)]
pub struct JobSearchResponse {
    pub postings: Vec<JobPosting>,
    pub summary: RunSummary,
}

#[derive(Debug, Deserialize)]
pub struct SimilarJobsRequest {
    pub reference_url: String,
    pub postings: Vec<JobPosting>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Serialize)]
pub struct SimilarJobsResponse {
    pub reference_url: String,
    pub matches: Vec<MatchResult>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeMatchRequest {
    pub resume_text: String,
    pub postings: Vec<JobPosting>,
}

#[derive(Debug, Deserialize)]
pub struct JobReportRequest {
    pub job_title: String,
    #[serde(default)]
    pub days_threshold: Option<u32>,
    /// Falls back to the resume at `RESUME_PATH` when absent.
    #[serde(default)]
    pub resume_text: Option<String>,
}

#[derive(Serialize)]
pub struct JobReportResponse {
    pub postings: Vec<JobPosting>,
    pub summary: RunSummary,
    pub duplicates_removed: usize,
    /// Ranked against the first posting; absent when nothing was found.
    pub similar: Option<SimilarJobsResponse>,
    pub resume: ResumeMatchReport,
}

fn validate_threshold(threshold: f64) -> Result<f64, AppError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(AppError::Validation(format!(
            "threshold must be between 0 and 1, got {threshold}"
        )))
    }
}

fn build_search_request(
    state: &AppState,
    job_title: String,
    days_threshold: Option<u32>,
    boards: Option<Vec<String>>,
    max_results_per_board: Option<usize>,
) -> Result<SearchRequest, AppError> {
    let job_title = job_title.trim().to_string();
    if job_title.is_empty() {
        return Err(AppError::Validation("job_title must not be empty".to_string()));
    }

    let boards: Vec<String> = match boards {
        Some(boards) => boards
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect(),
        None => state.config.job_boards.clone(),
    };
    if boards.is_empty() {
        return Err(AppError::Validation("boards must not be empty".to_string()));
    }

    let max_results_per_board = max_results_per_board.unwrap_or(state.config.max_results_per_board);
    if max_results_per_board == 0 {
        return Err(AppError::Validation(
            "max_results_per_board must be at least 1".to_string(),
        ));
    }

    Ok(SearchRequest {
        job_title,
        days_threshold: days_threshold.unwrap_or(state.config.days_threshold),
        boards,
        max_results_per_board,
    })
}

/// Runs the aggregator. Only a run where every board's search failed is an error.
async fn aggregate(state: &AppState, request: &SearchRequest) -> Result<AggregateResult, AppError> {
    let result = state.aggregator.run(request).await;
    let summary = &result.summary;
    if summary.boards_queried > 0 && summary.boards_failed == summary.boards_queried {
        return Err(AppError::Upstream(format!(
            "search failed for all {} boards",
            summary.boards_failed
        )));
    }
    Ok(result)
}

/// Moves CPU-bound matching off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Matching task failed: {e}")))
}

/// POST /api/v1/jobs/search
pub async fn handle_search(
    State(state): State<AppState>,
    AppJson(req): AppJson<JobSearchRequest>,
) -> Result<Json<JobSearchResponse>, AppError> {
    let request = build_search_request(
        &state,
        req.job_title,
        req.days_threshold,
        req.boards,
        req.max_results_per_board,
    )?;
    let result = aggregate(&state, &request).await?;
    Ok(Json(JobSearchResponse {
        postings: result.postings,
        summary: result.summary,
    }))
}

/// POST /api/v1/jobs/similar
pub async fn handle_similar(
    State(state): State<AppState>,
    AppJson(req): AppJson<SimilarJobsRequest>,
) -> Result<Json<SimilarJobsResponse>, AppError> {
    let threshold = validate_threshold(req.threshold.unwrap_or(state.config.similarity_threshold))?;

    let reference = req
        .postings
        .iter()
        .find(|p| p.source_url() == req.reference_url)
        .cloned()
        .ok_or_else(|| {
            AppError::NotFound(format!("Reference posting {} not found", req.reference_url))
        })?;

    let engine = state.similarity.clone();
    let postings = req.postings;
    let matches =
        run_blocking(move || engine.rank_similar(&reference, &postings, threshold)).await?;

    info!(reference = %req.reference_url, matches = matches.len(), "Ranked similar postings");
    Ok(Json(SimilarJobsResponse {
        reference_url: req.reference_url,
        matches,
    }))
}

/// POST /api/v1/jobs/match
pub async fn handle_match(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResumeMatchRequest>,
) -> Result<Json<ResumeMatchReport>, AppError> {
    let matcher = state.matcher.clone();
    let report =
        run_blocking(move || matcher.match_against_resume(&req.resume_text, req.postings)).await?;
    Ok(Json(report))
}

/// POST /api/v1/jobs/match/upload
///
/// Multipart form: a `resume` file part (PDF or text) and a `postings` part
/// holding a JSON array of postings.
pub async fn handle_match_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeMatchReport>, AppError> {
    let mut resume: Option<(String, bytes::Bytes)> = None;
    let mut postings: Option<Vec<JobPosting>> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                resume = Some((file_name, field.bytes().await?));
            }
            "postings" => {
                let raw = field.text().await?;
                postings = Some(serde_json::from_str(&raw).map_err(|e| {
                    let message = format!("postings is not a valid posting list: {e}");
                    if e.is_data() {
                        AppError::UnprocessableEntity(message)
                    } else {
                        AppError::Validation(message)
                    }
                })?);
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        resume.ok_or_else(|| AppError::Validation("missing 'resume' part".to_string()))?;
    let postings =
        postings.ok_or_else(|| AppError::Validation("missing 'postings' part".to_string()))?;

    let matcher = state.matcher.clone();
    let report =
        run_blocking(move || matcher.match_resume_bytes(&file_name, &bytes, postings)).await?;
    Ok(Json(report))
}

/// POST /api/v1/jobs/report
///
/// Search, drop near-identical postings, rank against the first posting and
/// match everything against the resume.
pub async fn handle_report(
    State(state): State<AppState>,
    AppJson(req): AppJson<JobReportRequest>,
) -> Result<Json<JobReportResponse>, AppError> {
    let request = build_search_request(&state, req.job_title, req.days_threshold, None, None)?;
    let AggregateResult { postings, summary } = aggregate(&state, &request).await?;

    let config = state.config.clone();
    let engine = state.similarity.clone();
    let matcher = state.matcher.clone();
    let resume_text = req.resume_text;

    let response = run_blocking(move || {
        let found = postings.len();
        let postings = engine.dedup_near_identical(postings, config.dedup_threshold);
        let duplicates_removed = found - postings.len();

        let similar = postings.first().map(|reference| SimilarJobsResponse {
            reference_url: reference.source_url().to_string(),
            matches: engine.rank_similar(reference, &postings, config.similarity_threshold),
        });

        let resume = match resume_text {
            Some(text) => matcher.match_against_resume(&text, postings.clone()),
            None => matcher.match_resume_file(&config.resume_path, postings.clone()),
        };

        JobReportResponse {
            postings,
            summary,
            duplicates_removed,
            similar,
            resume,
        }
    })
    .await?;

    info!(
        postings = response.postings.len(),
        duplicates_removed = response.duplicates_removed,
        "Built job report"
    );
    Ok(Json(response))
}
