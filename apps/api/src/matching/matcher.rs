//! Matcher: per-dimension scores for one résumé against one job.
//!
//! Each dimension is a free function of (résumé features, job features) and
//! never reads another dimension's result, so weights can be tuned in the
//! ranker without touching anything here.

use std::collections::BTreeMap;

use tracing::debug;

use crate::matching::features::{FeatureVector, JobFeatures};
use crate::matching::ranker::score_one;
use crate::matching::settings::{DimensionWeights, EngineSettings};
use crate::models::results::MatchResult;

const FULL_SCORE: f64 = 100.0;

/// Knobs for the experience dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperiencePolicy {
    /// Points removed per bucket of distance from the job's level.
    pub bucket_decay: f64,
    /// When false only a shortfall below the job's level is penalised.
    pub penalize_overqualification: bool,
}

impl Default for ExperiencePolicy {
    fn default() -> Self {
        Self {
            bucket_decay: 5.0,
            penalize_overqualification: false,
        }
    }
}

impl From<&EngineSettings> for ExperiencePolicy {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            bucket_decay: settings.experience_bucket_decay,
            penalize_overqualification: settings.penalize_overqualification,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dimension scores
// ────────────────────────────────────────────────────────────────────────────

/// Importance-weighted skill coverage.
///
/// Returns the score in [0, 100] plus the per-skill coverage fraction for
/// every required skill. A job without skills (or with all-zero importance)
/// scores 0.
pub fn skills_score(resume: &FeatureVector, job: &JobFeatures) -> (f64, BTreeMap<String, f64>) {
    let mut detail = BTreeMap::new();
    let mut total_importance = 0.0_f64;
    let mut covered = 0.0_f64;

    for (skill, &importance) in &job.required_skills {
        let fraction = resume
            .skills
            .get(skill)
            .map(|w| w.clamp(0.0, 1.0))
            .unwrap_or(0.0);
        total_importance += importance;
        covered += importance * fraction;
        detail.insert(skill.clone(), fraction);
    }

    let score = if total_importance > 0.0 {
        (FULL_SCORE * covered / total_importance).clamp(0.0, FULL_SCORE)
    } else {
        0.0
    };
    (score, detail)
}

/// Years against the stated minimum, then bucket distance from the job level.
pub fn experience_score(resume: &FeatureVector, job: &JobFeatures, policy: &ExperiencePolicy) -> f64 {
    if let Some(required) = job.min_years {
        if required > 0 && resume.years < required {
            return (FULL_SCORE * resume.years as f64 / required as f64).clamp(0.0, FULL_SCORE);
        }
    }

    let gap = match job.level {
        Some(level) => {
            let diff = level.ordinal() as i32 - resume.bucket.ordinal() as i32;
            if policy.penalize_overqualification {
                diff.abs()
            } else {
                diff.max(0)
            }
        }
        None => 0,
    };

    (FULL_SCORE - policy.bucket_decay * gap as f64).clamp(0.0, FULL_SCORE)
}

/// Highest degree rank against the required rank, linear below it.
pub fn education_score(resume: &FeatureVector, job: &JobFeatures) -> f64 {
    let required = job.min_education_rank;
    if required == 0 || resume.education_rank >= required {
        return FULL_SCORE;
    }
    (FULL_SCORE * resume.education_rank as f64 / required as f64).clamp(0.0, FULL_SCORE)
}

/// Share of the job's desired soft skills the résumé lists. Jobs that
/// declare none score 100.
pub fn soft_skills_score(resume: &FeatureVector, job: &JobFeatures) -> f64 {
    if job.desired_soft_skills.is_empty() {
        return FULL_SCORE;
    }
    let present = job
        .desired_soft_skills
        .iter()
        .filter(|tag| resume.soft_skills.contains(*tag))
        .count();
    (FULL_SCORE * present as f64 / job.desired_soft_skills.len() as f64).clamp(0.0, FULL_SCORE)
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher
// ────────────────────────────────────────────────────────────────────────────

/// Combines the four dimensions into a `MatchResult`.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    settings: &'a EngineSettings,
}

impl<'a> Matcher<'a> {
    pub fn new(settings: &'a EngineSettings) -> Self {
        Self { settings }
    }

    /// Scores a pair with the weights configured for the job's category.
    pub fn match_features(&self, resume: &FeatureVector, job: &JobFeatures) -> MatchResult {
        let weights = self.settings.weights_for(&job.category);
        self.match_with_weights(resume, job, weights)
    }

    pub fn match_with_weights(
        &self,
        resume: &FeatureVector,
        job: &JobFeatures,
        weights: &DimensionWeights,
    ) -> MatchResult {
        let policy = ExperiencePolicy::from(self.settings);

        let (skills_score, skill_detail) = skills_score(resume, job);
        let mut result = MatchResult {
            skills_score,
            experience_score: experience_score(resume, job, &policy),
            education_score: education_score(resume, job),
            soft_skills_score: soft_skills_score(resume, job),
            skill_detail,
            overall_score: 0.0,
        };
        result.overall_score = score_one(&result, weights);

        debug!(
            category = %job.category,
            skills = result.skills_score,
            experience = result.experience_score,
            education = result.education_score,
            soft_skills = result.soft_skills_score,
            overall = result.overall_score,
            "match computed"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::features::ExperienceBucket;
    use std::collections::BTreeSet;

    fn resume(skills: &[(&str, f64)], years: u32) -> FeatureVector {
        FeatureVector {
            skills: skills.iter().map(|(s, w)| (s.to_string(), *w)).collect(),
            total_months: years * 12,
            years,
            bucket: ExperienceBucket::from_years(years),
            education_rank: 0,
            soft_skills: BTreeSet::new(),
        }
    }

    fn job(skills: &[(&str, f64)]) -> JobFeatures {
        JobFeatures {
            category: "Backend Developer".to_string(),
            required_skills: skills.iter().map(|(s, w)| (s.to_string(), *w)).collect(),
            ..JobFeatures::default()
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_skills_coverage_uses_resume_proficiency() {
        // python 1.0, flask 0.8 on the résumé; job wants python 0.8, flask 0.7
        let r = resume(&[("python", 1.0), ("flask", 0.8), ("sql", 0.6)], 3);
        let j = job(&[("python", 0.8), ("flask", 0.7)]);
        let (score, detail) = skills_score(&r, &j);
        // flask contributes 0.8, not 1.0
        let expected = 100.0 * (0.8 * 1.0 + 0.7 * 0.8) / 1.5;
        assert!(approx(score, expected), "got {score}");
        assert_eq!(detail["python"], 1.0);
        assert_eq!(detail["flask"], 0.8);
        assert!(!detail.contains_key("sql"));
    }

    #[test]
    fn test_skills_full_weight_resume_scores_exactly_100() {
        let r = resume(&[("python", 1.0), ("flask", 1.0), ("sql", 0.6)], 3);
        let j = job(&[("python", 0.8), ("flask", 0.7)]);
        let (score, _) = skills_score(&r, &j);
        assert!(approx(score, 100.0), "got {score}");
    }

    #[test]
    fn test_skills_half_coverage_scores_50() {
        let r = resume(&[("python", 1.0)], 0);
        let j = job(&[("python", 0.5), ("java", 0.5)]);
        let (score, detail) = skills_score(&r, &j);
        assert!(approx(score, 50.0), "got {score}");
        assert_eq!(detail["java"], 0.0);
    }

    #[test]
    fn test_skills_importance_not_diluted_by_minor_skills() {
        let r = resume(&[("rust", 1.0)], 0);
        let j = job(&[("rust", 1.0), ("git", 0.05), ("jira", 0.05)]);
        let (score, _) = skills_score(&r, &j);
        assert!(score > 90.0, "got {score}");
    }

    #[test]
    fn test_skills_weight_above_one_is_capped() {
        let r = resume(&[("rust", 3.0)], 0);
        let j = job(&[("rust", 1.0)]);
        let (score, detail) = skills_score(&r, &j);
        assert!(approx(score, 100.0));
        assert_eq!(detail["rust"], 1.0);
    }

    #[test]
    fn test_empty_job_skills_degrade_to_zero() {
        let r = resume(&[("rust", 1.0)], 0);
        let (score, detail) = skills_score(&r, &job(&[]));
        assert_eq!(score, 0.0);
        assert!(detail.is_empty());
    }

    #[test]
    fn test_all_zero_importance_scores_zero() {
        let r = resume(&[("rust", 1.0)], 0);
        let (score, detail) = skills_score(&r, &job(&[("rust", 0.0)]));
        assert_eq!(score, 0.0);
        assert_eq!(detail["rust"], 1.0);
    }

    #[test]
    fn test_experience_junior_vs_senior_is_two_bucket_gap() {
        let r = resume(&[], 1);
        let j = JobFeatures {
            level: Some(ExperienceBucket::Senior),
            ..job(&[])
        };
        let score = experience_score(&r, &j, &ExperiencePolicy::default());
        assert!(approx(score, 90.0), "got {score}");
    }

    #[test]
    fn test_experience_below_minimum_is_linear() {
        let r = resume(&[], 2);
        let j = JobFeatures {
            min_years: Some(4),
            level: Some(ExperienceBucket::Mid),
            ..job(&[])
        };
        let score = experience_score(&r, &j, &ExperiencePolicy::default());
        assert!(approx(score, 50.0), "got {score}");
    }

    #[test]
    fn test_experience_zero_required_years_is_satisfied() {
        let r = resume(&[], 0);
        let j = JobFeatures {
            min_years: Some(0),
            ..job(&[])
        };
        assert_eq!(experience_score(&r, &j, &ExperiencePolicy::default()), 100.0);
    }

    #[test]
    fn test_experience_meets_minimum_then_bucket_decay_applies() {
        let r = resume(&[], 3);
        let j = JobFeatures {
            min_years: Some(3),
            level: Some(ExperienceBucket::Senior),
            ..job(&[])
        };
        let score = experience_score(&r, &j, &ExperiencePolicy::default());
        assert!(approx(score, 95.0), "got {score}");
    }

    #[test]
    fn test_overqualification_ignored_by_default() {
        let r = resume(&[], 10);
        let j = JobFeatures {
            level: Some(ExperienceBucket::Junior),
            ..job(&[])
        };
        assert_eq!(experience_score(&r, &j, &ExperiencePolicy::default()), 100.0);

        let strict = ExperiencePolicy {
            penalize_overqualification: true,
            ..ExperiencePolicy::default()
        };
        assert!(approx(experience_score(&r, &j, &strict), 90.0));
    }

    #[test]
    fn test_experience_no_experience_for_entry_role() {
        let r = resume(&[], 0);
        let j = JobFeatures {
            level: Some(ExperienceBucket::Junior),
            ..job(&[])
        };
        assert!(approx(experience_score(&r, &j, &ExperiencePolicy::default()), 95.0));
    }

    #[test]
    fn test_experience_large_decay_clamps_at_zero() {
        let r = resume(&[], 0);
        let j = JobFeatures {
            level: Some(ExperienceBucket::Senior),
            ..job(&[])
        };
        let policy = ExperiencePolicy {
            bucket_decay: 60.0,
            penalize_overqualification: false,
        };
        assert_eq!(experience_score(&r, &j, &policy), 0.0);
    }

    #[test]
    fn test_education_no_requirement_is_100() {
        let r = resume(&[], 0);
        assert_eq!(education_score(&r, &job(&[])), 100.0);
    }

    #[test]
    fn test_education_linear_penalty_below_requirement() {
        let mut r = resume(&[], 0);
        r.education_rank = 3;
        let j = JobFeatures {
            min_education_rank: 4,
            ..job(&[])
        };
        assert!(approx(education_score(&r, &j), 75.0));

        r.education_rank = 5;
        assert_eq!(education_score(&r, &j), 100.0);

        r.education_rank = 0;
        assert_eq!(education_score(&r, &j), 0.0);
    }

    #[test]
    fn test_soft_skills_not_declared_is_100() {
        let mut r = resume(&[], 0);
        r.soft_skills.insert("leadership".to_string());
        assert_eq!(soft_skills_score(&r, &job(&[])), 100.0);
    }

    #[test]
    fn test_soft_skills_fraction_present() {
        let mut r = resume(&[], 0);
        r.soft_skills.insert("communication".to_string());
        let j = JobFeatures {
            desired_soft_skills: ["communication", "teamwork", "leadership", "mentoring"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..job(&[])
        };
        assert!(approx(soft_skills_score(&r, &j), 25.0));
    }

    #[test]
    fn test_match_features_uses_default_weights() {
        let settings = EngineSettings::default();
        let r = resume(&[("python", 1.0)], 0);
        let j = job(&[("python", 0.5), ("java", 0.5)]);
        let result = Matcher::new(&settings).match_features(&r, &j);
        // 0.5*50 + 0.25*100 + 0.15*100 + 0.10*100
        assert!(approx(result.overall_score, 75.0), "got {}", result.overall_score);
    }

    #[test]
    fn test_match_features_uses_category_override() {
        let mut settings = EngineSettings::default();
        settings.category_weights.insert(
            "backend developer".to_string(),
            DimensionWeights {
                skills: 1.0,
                experience: 0.0,
                education: 0.0,
                soft_skills: 0.0,
            },
        );
        let r = resume(&[("python", 1.0)], 0);
        let j = job(&[("python", 0.5), ("java", 0.5)]);
        let result = Matcher::new(&settings).match_features(&r, &j);
        assert!(approx(result.overall_score, 50.0), "got {}", result.overall_score);
    }
}
