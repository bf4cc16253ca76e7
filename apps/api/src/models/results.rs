use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeId;

/// Per-pair match outcome. All scores are on the [0, 100] scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub soft_skills_score: f64,
    /// Required skill → fraction of it the résumé covers, in [0, 1].
    pub skill_detail: BTreeMap<String, f64>,
    pub overall_score: f64,
}

/// One candidate's place in a ranking for a single job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub resume_id: ResumeId,
    pub result: MatchResult,
    /// 1-based position.
    pub rank: usize,
    pub shortlisted: bool,
}

/// An alternative role proposed for a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSuggestion {
    pub job_category: String,
    pub match_score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub resume_id: ResumeId,
    pub ranking_score: f64,
    pub top_skills: Vec<String>,
    pub years_experience: u32,
}

/// Side-by-side view of several candidates for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub resumes: Vec<CandidateSummary>,
    pub comparison_metrics: ComparisonMetrics,
}

/// Set-level figures across every compared candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Canonical skills every candidate lists, sorted.
    pub skills_overlap: Vec<String>,
    /// Most minus fewest years of experience.
    pub experience_difference: u32,
    /// Lowest over highest degree rank among candidates listing education.
    pub education_similarity: f64,
}
