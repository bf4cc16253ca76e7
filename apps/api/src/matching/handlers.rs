use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::errors::EngineError;
use crate::matching::MatchEngine;
use crate::models::job::{JobCategory, JobRequirement};
use crate::models::results::{ComparisonReport, MatchResult, RankingEntry, RoleSuggestion};
use crate::models::resume::{ResumeId, ResumeRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume: ResumeRecord,
    pub job: JobRequirement,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateInput {
    pub resume_id: ResumeId,
    pub resume: ResumeRecord,
}

#[derive(Debug, Deserialize)]
pub struct RankingRequest {
    pub job: JobRequirement,
    #[serde(default)]
    pub candidates: Vec<CandidateInput>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BatchCompareRequest {
    pub job: JobRequirement,
    #[serde(default)]
    pub candidates: Vec<CandidateInput>,
}

#[derive(Debug, Deserialize)]
pub struct AlternativeRolesRequest {
    #[serde(default)]
    pub resume_id: Option<ResumeId>,
    pub resume: ResumeRecord,
    #[serde(default)]
    pub categories: Vec<JobCategory>,
    /// Category names to leave out, typically the one applied to.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Signed so a negative value reaches validation instead of failing to parse.
    #[serde(default)]
    pub top_k: Option<i64>,
}

/// One ranked candidate in the documented `/rankings` shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub resume_id: ResumeId,
    pub overall_ranking: usize,
    pub ranking_score: f64,
    pub skills_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
    pub soft_skills_match: f64,
    pub shortlisted: bool,
    pub skill_detail: BTreeMap<String, f64>,
}

impl From<RankingEntry> for RankedCandidate {
    fn from(entry: RankingEntry) -> Self {
        Self {
            resume_id: entry.resume_id,
            overall_ranking: entry.rank,
            ranking_score: entry.result.overall_score,
            skills_match: entry.result.skills_score,
            experience_match: entry.result.experience_score,
            education_match: entry.result.education_score,
            soft_skills_match: entry.result.soft_skills_score,
            shortlisted: entry.shortlisted,
            skill_detail: entry.result.skill_detail,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankingResponse {
    pub job_category: String,
    pub candidates: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AlternativeRolesResponse {
    pub resume_id: Option<ResumeId>,
    pub alternative_roles: Vec<RoleSuggestion>,
}

fn into_pairs(candidates: Vec<CandidateInput>) -> Vec<(ResumeId, ResumeRecord)> {
    candidates
        .into_iter()
        .map(|c| (c.resume_id, c.resume))
        .collect()
}

fn resolve_top_k(top_k: Option<i64>) -> Result<Option<usize>, EngineError> {
    match top_k {
        Some(k) if k < 0 => Err(EngineError::configuration("top_k", k, "must not be negative")),
        Some(k) => Ok(Some(k as usize)),
        None => Ok(None),
    }
}

/// Runs CPU-bound engine work off the async executor.
async fn run_engine<T, F>(engine: &Arc<MatchEngine>, work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&MatchEngine) -> Result<T, EngineError> + Send + 'static,
{
    let engine = Arc::clone(engine);
    let outcome = tokio::task::spawn_blocking(move || work(&engine))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in matching: {e}")))?;
    Ok(outcome?)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResult>, AppError> {
    let Json(req) = payload?;
    let result = run_engine(&state.engine, move |engine| {
        engine.match_pair(&req.resume, &req.job)
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/v1/rankings
pub async fn handle_rankings(
    State(state): State<AppState>,
    payload: Result<Json<RankingRequest>, JsonRejection>,
) -> Result<Json<RankingResponse>, AppError> {
    let Json(req) = payload?;
    let job_category = req.job.category.trim().to_string();
    let candidates = into_pairs(req.candidates);
    let job = req.job;
    let limit = req.limit;

    let ranked = run_engine(&state.engine, move |engine| {
        engine.rank_candidates(&job, &candidates, limit)
    })
    .await?;

    Ok(Json(RankingResponse {
        job_category,
        candidates: ranked.into_iter().map(RankedCandidate::from).collect(),
    }))
}

/// POST /api/v1/rankings/batch-compare
pub async fn handle_batch_compare(
    State(state): State<AppState>,
    payload: Result<Json<BatchCompareRequest>, JsonRejection>,
) -> Result<Json<ComparisonReport>, AppError> {
    let Json(req) = payload?;
    let candidates = into_pairs(req.candidates);
    let job = req.job;
    let report = run_engine(&state.engine, move |engine| engine.compare(&job, &candidates)).await?;
    Ok(Json(report))
}

/// POST /api/v1/alternative-roles
pub async fn handle_alternative_roles(
    State(state): State<AppState>,
    payload: Result<Json<AlternativeRolesRequest>, JsonRejection>,
) -> Result<Json<AlternativeRolesResponse>, AppError> {
    let Json(req) = payload?;
    let top_k = resolve_top_k(req.top_k)?;
    let resume_id = req.resume_id;
    let exclude: BTreeSet<String> = req.exclude.into_iter().collect();
    let resume = req.resume;
    let categories = req.categories;

    let alternative_roles = run_engine(&state.engine, move |engine| {
        let features = engine.extract(&resume).map_err(|e| e.within("resume"))?;
        engine.suggest_alternative_roles(&features, &categories, &exclude, top_k)
    })
    .await?;

    Ok(Json(AlternativeRolesResponse {
        resume_id,
        alternative_roles,
    }))
}
