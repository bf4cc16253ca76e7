//! Role Recommender: scores one résumé against every job category and
//! proposes the best alternatives with a short templated reason.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::matching::features::{FeatureVector, JobFeatures};
use crate::matching::matcher::Matcher;
use crate::matching::settings::EngineSettings;
use crate::models::results::{MatchResult, RoleSuggestion};

/// Minimum per-skill coverage for a skill to be named in a reason.
const STRONG_SKILL_FRACTION: f64 = 0.5;
const MAX_REASON_SKILLS: usize = 2;

pub struct RoleRecommender<'a> {
    settings: &'a EngineSettings,
}

impl<'a> RoleRecommender<'a> {
    pub fn new(settings: &'a EngineSettings) -> Self {
        Self { settings }
    }

    /// Ranks `pool` for `resume` and returns up to `top_k` suggestions.
    ///
    /// Categories scoring below the inclusion floor are dropped even when
    /// that leaves fewer than `top_k` results. `top_k == 0` yields nothing.
    pub fn suggest(
        &self,
        resume: &FeatureVector,
        pool: &[JobFeatures],
        top_k: usize,
    ) -> Vec<RoleSuggestion> {
        if top_k == 0 {
            return Vec::new();
        }

        let matcher = Matcher::new(self.settings);
        let floor = self.settings.inclusion_floor;

        let mut scored: Vec<(&JobFeatures, MatchResult)> = pool
            .par_iter()
            .map(|job| (job, matcher.match_features(resume, job)))
            .filter(|(_, result)| result.overall_score >= floor)
            .collect();

        scored.sort_by(|a, b| suggestion_order(a, b));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(job, result)| RoleSuggestion {
                job_category: job.category.clone(),
                match_score: result.overall_score,
                reason: build_reason(&result, job),
            })
            .collect()
    }
}

/// Same rule as candidate ranking, with the category name as the final key.
fn suggestion_order(a: &(&JobFeatures, MatchResult), b: &(&JobFeatures, MatchResult)) -> Ordering {
    b.1.overall_score
        .total_cmp(&a.1.overall_score)
        .then_with(|| b.1.skills_score.total_cmp(&a.1.skills_score))
        .then_with(|| a.0.category.cmp(&b.0.category))
}

/// Names the one or two strongest matched skills, ordered by
/// importance-weighted contribution.
pub fn build_reason(result: &MatchResult, job: &JobFeatures) -> String {
    let mut contributors: Vec<(&str, f64)> = result
        .skill_detail
        .iter()
        .filter(|(_, &fraction)| fraction >= STRONG_SKILL_FRACTION)
        .map(|(skill, &fraction)| {
            let importance = job.required_skills.get(skill).copied().unwrap_or(0.0);
            (skill.as_str(), importance * fraction)
        })
        .collect();
    contributors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    contributors.truncate(MAX_REASON_SKILLS);

    match contributors.as_slice() {
        [(first, _), (second, _)] => format!("Strong {first} and {second} skills"),
        [(only, _)] => format!("Strong {only} skills"),
        _ => "General skill overlap".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::features::ExperienceBucket;
    use crate::matching::settings::DimensionWeights;

    fn resume(skills: &[(&str, f64)]) -> FeatureVector {
        FeatureVector {
            skills: skills.iter().map(|(s, w)| (s.to_string(), *w)).collect(),
            total_months: 48,
            years: 4,
            bucket: ExperienceBucket::Mid,
            ..FeatureVector::default()
        }
    }

    fn category(name: &str, skills: &[(&str, f64)]) -> JobFeatures {
        JobFeatures {
            category: name.to_string(),
            required_skills: skills.iter().map(|(s, w)| (s.to_string(), *w)).collect(),
            ..JobFeatures::default()
        }
    }

    fn detail(pairs: &[(&str, f64)]) -> MatchResult {
        MatchResult {
            skills_score: 0.0,
            experience_score: 0.0,
            education_score: 0.0,
            soft_skills_score: 0.0,
            skill_detail: pairs.iter().map(|(s, f)| (s.to_string(), *f)).collect(),
            overall_score: 0.0,
        }
    }

    #[test]
    fn test_reason_names_two_top_contributors() {
        let job = category("Data", &[("python", 0.9), ("sql", 0.6), ("excel", 0.2)]);
        let result = detail(&[("python", 1.0), ("sql", 1.0), ("excel", 1.0)]);
        assert_eq!(build_reason(&result, &job), "Strong python and sql skills");
    }

    #[test]
    fn test_reason_single_contributor() {
        let job = category("Data", &[("python", 0.9), ("sql", 0.6)]);
        let result = detail(&[("python", 0.7), ("sql", 0.2)]);
        assert_eq!(build_reason(&result, &job), "Strong python skills");
    }

    #[test]
    fn test_reason_orders_by_weighted_contribution_not_fraction() {
        let job = category("Web", &[("css", 0.1), ("react", 1.0), ("typescript", 0.8)]);
        let result = detail(&[("css", 1.0), ("react", 0.6), ("typescript", 0.9)]);
        // react 0.6, typescript 0.72, css 0.1
        assert_eq!(build_reason(&result, &job), "Strong typescript and react skills");
    }

    #[test]
    fn test_reason_general_overlap_when_nothing_strong() {
        let job = category("Data", &[("python", 0.9)]);
        let result = detail(&[("python", 0.4)]);
        assert_eq!(build_reason(&result, &job), "General skill overlap");
    }

    #[test]
    fn test_suggest_orders_and_truncates() {
        let settings = EngineSettings::default();
        let r = resume(&[("python", 1.0), ("sql", 1.0), ("react", 1.0)]);
        let pool = vec![
            category("Frontend Developer", &[("react", 1.0), ("css", 1.0)]),
            category("Data Analyst", &[("python", 1.0), ("sql", 1.0)]),
            category("Backend Developer", &[("python", 1.0), ("go", 1.0)]),
            category("Data Engineer", &[("python", 1.0), ("sql", 1.0), ("spark", 1.0)]),
        ];

        let suggestions = RoleRecommender::new(&settings).suggest(&r, &pool, 2);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].job_category, "Data Analyst");
        assert_eq!(suggestions[0].reason, "Strong python and sql skills");
        assert_eq!(suggestions[1].job_category, "Data Engineer");
        assert!(suggestions[0].match_score >= suggestions[1].match_score);
    }

    #[test]
    fn test_equal_scores_break_ties_by_category_name() {
        let settings = EngineSettings::default();
        let r = resume(&[("python", 1.0)]);
        let pool = vec![
            category("Zeta", &[("python", 1.0)]),
            category("Alpha", &[("python", 1.0)]),
        ];
        let suggestions = RoleRecommender::new(&settings).suggest(&r, &pool, 3);
        let names: Vec<&str> = suggestions.iter().map(|s| s.job_category.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_top_k_zero_is_empty() {
        let settings = EngineSettings::default();
        let r = resume(&[("python", 1.0)]);
        let pool = vec![category("Data Analyst", &[("python", 1.0)])];
        assert!(RoleRecommender::new(&settings).suggest(&r, &pool, 0).is_empty());
    }

    #[test]
    fn test_category_below_floor_excluded_even_when_top_k_unfilled() {
        let settings = EngineSettings {
            weights: DimensionWeights {
                skills: 1.0,
                experience: 0.0,
                education: 0.0,
                soft_skills: 0.0,
            },
            ..EngineSettings::default()
        };
        let r = resume(&[("python", 0.35)]);
        let pool = vec![category("Data Analyst", &[("python", 1.0)])];
        // skills-only weighting puts this category at 35
        let suggestions = RoleRecommender::new(&settings).suggest(&r, &pool, 3);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_general_overlap_above_floor() {
        let settings = EngineSettings::default();
        // skills 40, other dimensions 100 → overall 70, nothing ≥ 0.5 coverage
        let r = resume(&[("python", 0.4)]);
        let pool = vec![category("Data Analyst", &[("python", 1.0)])];
        let suggestions = RoleRecommender::new(&settings).suggest(&r, &pool, 3);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].reason, "General skill overlap");
    }

    #[test]
    fn test_empty_pool() {
        let settings = EngineSettings::default();
        let r = resume(&[("python", 1.0)]);
        assert!(RoleRecommender::new(&settings).suggest(&r, &[], 3).is_empty());
    }
}
