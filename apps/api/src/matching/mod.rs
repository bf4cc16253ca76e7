// Matching engine: feature extraction, per-pair scoring, ranking, comparison
// and alternative-role recommendation over already-structured records.
// Pure computation; no I/O beyond loading settings at startup.

pub mod errors;
pub mod features;
pub mod handlers;
pub mod matcher;
pub mod ranker;
pub mod recommender;
pub mod settings;

use std::collections::BTreeSet;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use crate::matching::errors::EngineError;
use crate::matching::features::{FeatureExtractor, FeatureVector, JobFeatures};
use crate::matching::matcher::Matcher;
use crate::matching::recommender::RoleRecommender;
use crate::matching::settings::{category_key, EngineSettings};
use crate::models::job::{JobCategory, JobRequirement};
use crate::models::results::{ComparisonReport, MatchResult, RankingEntry, RoleSuggestion};
use crate::models::resume::{ResumeId, ResumeRecord};

/// Entry point for every engine operation. Holds settings that were
/// validated once at construction and are never mutated afterwards, so a
/// single engine can be shared across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    settings: EngineSettings,
}

impl MatchEngine {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn extractor(&self) -> FeatureExtractor<'_> {
        FeatureExtractor::new(&self.settings.synonyms)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.settings)
    }

    pub fn extract(&self, record: &ResumeRecord) -> Result<FeatureVector, EngineError> {
        self.extractor().extract(record)
    }

    pub fn validate_job(&self, job: &JobRequirement) -> Result<JobFeatures, EngineError> {
        self.extractor().extract_job(job)
    }

    pub fn match_features(&self, resume: &FeatureVector, job: &JobFeatures) -> MatchResult {
        self.matcher().match_features(resume, job)
    }

    /// Validates both records and scores the pair.
    pub fn match_pair(
        &self,
        resume: &ResumeRecord,
        job: &JobRequirement,
    ) -> Result<MatchResult, EngineError> {
        let job = self.validate_job(job).map_err(|e| e.within("job"))?;
        let resume = self.extract(resume).map_err(|e| e.within("resume"))?;
        Ok(self.match_features(&resume, &job))
    }

    /// Scores every candidate against `job` in parallel and returns them
    /// ranked, truncated to `min(limit, max_candidates)`.
    ///
    /// When several candidates are invalid the error reported is the one with
    /// the lowest index.
    pub fn rank_candidates(
        &self,
        job: &JobRequirement,
        candidates: &[(ResumeId, ResumeRecord)],
        limit: Option<usize>,
    ) -> Result<Vec<RankingEntry>, EngineError> {
        let started = Instant::now();
        let job = self.validate_job(job).map_err(|e| e.within("job"))?;

        let scored = self.score_all(&job, candidates)?;
        let matches = scored
            .into_iter()
            .map(|(resume_id, _, result)| (resume_id, result))
            .collect();

        let mut ranked = ranker::rank(matches, self.settings.shortlist_threshold);
        let cap = limit.map_or(self.settings.max_candidates, |l| {
            l.min(self.settings.max_candidates)
        });
        ranked.truncate(cap);

        info!(
            category = %job.category,
            candidates = candidates.len(),
            returned = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ranked candidates"
        );
        Ok(ranked)
    }

    /// Side-by-side comparison of candidates for one job.
    pub fn compare(
        &self,
        job: &JobRequirement,
        candidates: &[(ResumeId, ResumeRecord)],
    ) -> Result<ComparisonReport, EngineError> {
        let job = self.validate_job(job).map_err(|e| e.within("job"))?;
        let scored = self.score_all(&job, candidates)?;

        let refs: Vec<(ResumeId, &FeatureVector, &MatchResult)> = scored
            .iter()
            .map(|(resume_id, features, result)| (*resume_id, features, result))
            .collect();
        let report = ranker::compare(&refs);

        info!(
            category = %job.category,
            candidates = candidates.len(),
            overlap = report.comparison_metrics.skills_overlap.len(),
            "compared candidates"
        );
        Ok(report)
    }

    /// Best-fitting categories for one résumé.
    ///
    /// Inactive categories and those named in `exclude` (compared
    /// case-insensitively) are skipped before scoring. `top_k` defaults to
    /// the configured value.
    pub fn suggest_alternative_roles(
        &self,
        resume: &FeatureVector,
        categories: &[JobCategory],
        exclude: &BTreeSet<String>,
        top_k: Option<usize>,
    ) -> Result<Vec<RoleSuggestion>, EngineError> {
        let excluded: BTreeSet<String> = exclude.iter().map(|name| category_key(name)).collect();
        let extractor = self.extractor();

        let mut pool = Vec::with_capacity(categories.len());
        for (i, category) in categories.iter().enumerate() {
            if !category.is_active || excluded.contains(&category_key(&category.name)) {
                continue;
            }
            if category.name.trim().is_empty() {
                return Err(EngineError::invalid_record(
                    format!("categories[{i}].name"),
                    &category.name,
                    "job category must not be empty",
                ));
            }
            let job = extractor
                .extract_job_as(&category.requirement, &category.name)
                .map_err(|e| e.within(&format!("categories[{i}].requirement")))?;
            pool.push(job);
        }

        let top_k = top_k.unwrap_or(self.settings.default_top_k);
        let suggestions = RoleRecommender::new(&self.settings).suggest(resume, &pool, top_k);

        info!(
            considered = pool.len(),
            skipped = categories.len() - pool.len(),
            suggested = suggestions.len(),
            "suggested alternative roles"
        );
        Ok(suggestions)
    }

    /// Extracts and matches every candidate on the rayon pool. Results keep
    /// input order.
    fn score_all(
        &self,
        job: &JobFeatures,
        candidates: &[(ResumeId, ResumeRecord)],
    ) -> Result<Vec<(ResumeId, FeatureVector, MatchResult)>, EngineError> {
        let extractor = self.extractor();
        let matcher = self.matcher();

        let outcomes: Vec<Result<(ResumeId, FeatureVector, MatchResult), EngineError>> =
            candidates
                .par_iter()
                .enumerate()
                .map(|(i, (resume_id, record))| {
                    let features = extractor
                        .extract(record)
                        .map_err(|e| e.within(&format!("candidates[{i}].resume")))?;
                    let result = matcher.match_features(&features, job);
                    Ok((*resume_id, features, result))
                })
                .collect();

        outcomes.into_iter().collect()
    }
}
