//! Ranker: folds dimension scores into one overall score and orders
//! candidates for a job.

use std::cmp::Ordering;

use crate::matching::features::FeatureVector;
use crate::matching::settings::DimensionWeights;
use crate::models::results::{
    CandidateSummary, ComparisonMetrics, ComparisonReport, MatchResult, RankingEntry,
};
use crate::models::resume::ResumeId;

const TOP_SKILLS: usize = 3;

/// Weighted mean of the four dimension scores, in [0, 100].
///
/// Weights are normalised by their sum, so the default policy (which sums to
/// 1.0) is a plain weighted sum.
pub fn score_one(result: &MatchResult, weights: &DimensionWeights) -> f64 {
    let total = weights.sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted = weights.skills * result.skills_score
        + weights.experience * result.experience_score
        + weights.education * result.education_score
        + weights.soft_skills * result.soft_skills_score;
    (weighted / total).clamp(0.0, 100.0)
}

/// Total order: overall desc, then skills desc, then id asc.
pub fn ranking_order(
    a: (ResumeId, &MatchResult),
    b: (ResumeId, &MatchResult),
) -> Ordering {
    b.1.overall_score
        .total_cmp(&a.1.overall_score)
        .then_with(|| b.1.skills_score.total_cmp(&a.1.skills_score))
        .then_with(|| a.0.cmp(&b.0))
}

/// Orders scored candidates and assigns 1-based ranks with no gaps.
pub fn rank(
    mut matches: Vec<(ResumeId, MatchResult)>,
    shortlist_threshold: f64,
) -> Vec<RankingEntry> {
    matches.sort_by(|a, b| ranking_order((a.0, &a.1), (b.0, &b.1)));

    matches
        .into_iter()
        .enumerate()
        .map(|(i, (resume_id, result))| RankingEntry {
            resume_id,
            shortlisted: result.overall_score >= shortlist_threshold,
            result,
            rank: i + 1,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Side-by-side comparison
// ────────────────────────────────────────────────────────────────────────────

/// Builds a comparison of candidates already scored against the same job.
/// Candidates are listed in ranking order.
pub fn compare(candidates: &[(ResumeId, &FeatureVector, &MatchResult)]) -> ComparisonReport {
    let mut ordered: Vec<&(ResumeId, &FeatureVector, &MatchResult)> = candidates.iter().collect();
    ordered.sort_by(|a, b| ranking_order((a.0, a.2), (b.0, b.2)));

    let resumes = ordered
        .iter()
        .map(|(resume_id, features, result)| CandidateSummary {
            resume_id: *resume_id,
            ranking_score: result.overall_score,
            top_skills: top_skills(features),
            years_experience: features.years,
        })
        .collect();

    let skills_overlap = match candidates.split_first() {
        Some(((_, first, _), rest)) => first
            .skills
            .keys()
            .filter(|skill| rest.iter().all(|(_, f, _)| f.skills.contains_key(*skill)))
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let years = candidates.iter().map(|(_, f, _)| f.years);
    let experience_difference = match (years.clone().max(), years.min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    };

    ComparisonReport {
        resumes,
        comparison_metrics: ComparisonMetrics {
            skills_overlap,
            experience_difference,
            education_similarity: education_similarity(candidates),
        },
    }
}

/// Highest-weight skills, ties broken by name.
fn top_skills(features: &FeatureVector) -> Vec<String> {
    let mut skills: Vec<(&String, &f64)> = features.skills.iter().collect();
    skills.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    skills
        .into_iter()
        .take(TOP_SKILLS)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Lowest ÷ highest education rank among candidates that list education.
/// 1.0 when fewer than two of them do.
fn education_similarity(candidates: &[(ResumeId, &FeatureVector, &MatchResult)]) -> f64 {
    let ranks: Vec<u8> = candidates
        .iter()
        .map(|(_, f, _)| f.education_rank)
        .filter(|&rank| rank > 0)
        .collect();
    match (ranks.iter().min(), ranks.iter().max()) {
        (Some(&lowest), Some(&highest)) if ranks.len() >= 2 => lowest as f64 / highest as f64,
        _ => 1.0,
    }
}
