//! Feature Extractor: validates structured records and normalises them into
//! comparable features (canonical skill weights, experience bucket, education
//! rank).
//!
//! Validation happens here and only here; everything downstream may assume
//! well-formed input.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::matching::errors::EngineError;
use crate::matching::settings::SynonymTable;
use crate::models::job::{ExperienceLevel, JobRequirement};
use crate::models::resume::{ExperienceEntry, ResumeRecord};

const MIN_EDUCATION_YEAR: i32 = 1900;
const MAX_EDUCATION_YEAR: i32 = 2100;
/// A century; anything longer is a unit or parsing mistake upstream.
const MAX_DURATION_MONTHS: i64 = 1200;

// ────────────────────────────────────────────────────────────────────────────
// Feature data models
// ────────────────────────────────────────────────────────────────────────────

/// Experience band derived from whole years of experience.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceBucket {
    #[default]
    None,
    Junior,
    Mid,
    Senior,
}

impl ExperienceBucket {
    /// 0 → none, 1–2 → junior, 3–5 → mid, 6+ → senior.
    pub fn from_years(years: u32) -> Self {
        match years {
            0 => ExperienceBucket::None,
            1..=2 => ExperienceBucket::Junior,
            3..=5 => ExperienceBucket::Mid,
            _ => ExperienceBucket::Senior,
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            ExperienceBucket::None => 0,
            ExperienceBucket::Junior => 1,
            ExperienceBucket::Mid => 2,
            ExperienceBucket::Senior => 3,
        }
    }
}

impl From<ExperienceLevel> for ExperienceBucket {
    fn from(level: ExperienceLevel) -> Self {
        match level {
            ExperienceLevel::Entry => ExperienceBucket::Junior,
            ExperienceLevel::Mid => ExperienceBucket::Mid,
            ExperienceLevel::Senior => ExperienceBucket::Senior,
        }
    }
}

/// Normalised résumé features consumed by the matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Canonical skill → proficiency weight. Keys are unique.
    pub skills: BTreeMap<String, f64>,
    pub total_months: u32,
    pub years: u32,
    pub bucket: ExperienceBucket,
    /// Highest degree rank, 0 when no education is listed.
    pub education_rank: u8,
    pub soft_skills: BTreeSet<String>,
}

/// Normalised job requirements consumed by the matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFeatures {
    pub category: String,
    /// Canonical skill → importance weight.
    pub required_skills: BTreeMap<String, f64>,
    /// 0 when the job states no education requirement.
    pub min_education_rank: u8,
    pub min_years: Option<u32>,
    pub level: Option<ExperienceBucket>,
    pub desired_soft_skills: BTreeSet<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

/// Stateless extractor parameterised by the synonym table.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor<'a> {
    synonyms: &'a SynonymTable,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(synonyms: &'a SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Validates a résumé and reduces it to a `FeatureVector`.
    pub fn extract(&self, record: &ResumeRecord) -> Result<FeatureVector, EngineError> {
        let mut skills: BTreeMap<String, f64> = BTreeMap::new();
        for (i, claim) in record.skills.iter().enumerate() {
            let weight = claim.weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::invalid_record(
                    format!("skills[{i}].weight"),
                    weight,
                    "proficiency weight must be a finite, non-negative number",
                ));
            }
            let name = self.synonyms.canonicalize(claim.name());
            if name.is_empty() {
                return Err(EngineError::invalid_record(
                    format!("skills[{i}].name"),
                    claim.name(),
                    "skill name is empty after canonicalisation",
                ));
            }
            merge_max(&mut skills, name, weight);
        }

        let total_months = total_experience_months(record)?;
        let years = total_months / 12;

        let mut education_rank = 0;
        for (i, entry) in record.education.iter().enumerate() {
            if let Some(year) = entry.year {
                if !(MIN_EDUCATION_YEAR..=MAX_EDUCATION_YEAR).contains(&year) {
                    return Err(EngineError::invalid_record(
                        format!("education[{i}].year"),
                        year,
                        format!("year must lie within {MIN_EDUCATION_YEAR}..={MAX_EDUCATION_YEAR}"),
                    ));
                }
            }
            education_rank = education_rank.max(entry.degree_level.rank());
        }

        let soft_skills = self.canonical_tags(&record.soft_skills);

        Ok(FeatureVector {
            skills,
            total_months,
            years,
            bucket: ExperienceBucket::from_years(years),
            education_rank,
            soft_skills,
        })
    }

    /// Validates a job and canonicalises its skill and tag names.
    ///
    /// An empty skill map is accepted; it degrades to a skills score of 0.
    pub fn extract_job(&self, job: &JobRequirement) -> Result<JobFeatures, EngineError> {
        self.extract_job_as(job, &job.category)
    }

    /// Like `extract_job`, but files the job under `category` instead of the
    /// requirement's own category. Used for named category templates.
    pub fn extract_job_as(
        &self,
        job: &JobRequirement,
        category: &str,
    ) -> Result<JobFeatures, EngineError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(EngineError::invalid_record(
                "category",
                category,
                "job category must not be empty",
            ));
        }

        let mut required_skills: BTreeMap<String, f64> = BTreeMap::new();
        for (raw, &importance) in &job.required_skills {
            if !importance.is_finite() || importance < 0.0 {
                return Err(EngineError::invalid_record(
                    format!("required_skills.{raw}"),
                    importance,
                    "importance weight must be a finite, non-negative number",
                ));
            }
            let name = self.synonyms.canonicalize(raw);
            if name.is_empty() {
                return Err(EngineError::invalid_record(
                    "required_skills",
                    raw,
                    "skill name is empty after canonicalisation",
                ));
            }
            merge_max(&mut required_skills, name, importance);
        }

        Ok(JobFeatures {
            category: category.to_string(),
            required_skills,
            min_education_rank: job
                .qualifications
                .min_degree
                .map(|d| d.rank())
                .unwrap_or(0),
            min_years: job.qualifications.min_years,
            level: job.experience_level.map(ExperienceBucket::from),
            desired_soft_skills: self.canonical_tags(&job.desired_soft_skills),
        })
    }

    fn canonical_tags(&self, tags: &[String]) -> BTreeSet<String> {
        tags.iter()
            .map(|t| self.synonyms.canonicalize(t))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn merge_max(map: &mut BTreeMap<String, f64>, key: String, weight: f64) {
    map.entry(key)
        .and_modify(|w| *w = w.max(weight))
        .or_insert(weight);
}

// ────────────────────────────────────────────────────────────────────────────
// Experience totals
// ────────────────────────────────────────────────────────────────────────────

/// Sums experience months. Dated entries are merged into non-overlapping
/// intervals before counting; undated entries count their duration verbatim.
fn total_experience_months(record: &ResumeRecord) -> Result<u32, EngineError> {
    let fallback_end = record.as_of.or_else(|| latest_date(&record.experience));

    let mut intervals: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    let mut undated: u64 = 0;

    for (i, entry) in record.experience.iter().enumerate() {
        if let Some(months) = entry.duration_months {
            if months < 0 {
                return Err(EngineError::invalid_record(
                    format!("experience[{i}].duration_months"),
                    months,
                    "duration must not be negative",
                ));
            }
            if months > MAX_DURATION_MONTHS {
                return Err(EngineError::invalid_record(
                    format!("experience[{i}].duration_months"),
                    months,
                    format!("duration must not exceed {MAX_DURATION_MONTHS} months"),
                ));
            }
        }
        if let (Some(start), Some(end)) = (entry.start_date, entry.end_date) {
            if end < start {
                return Err(EngineError::invalid_record(
                    format!("experience[{i}].end_date"),
                    end,
                    format!("end date precedes start date {start}"),
                ));
            }
        }

        match entry.start_date {
            Some(start) => {
                let end = resolve_end(entry, start, fallback_end);
                intervals.push((start, end.max(start)));
            }
            None => undated += entry.duration_months.unwrap_or(0) as u64,
        }
    }

    intervals.sort();
    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let dated: u64 = merged
        .iter()
        .map(|(start, end)| months_between(*start, *end) as u64)
        .sum();

    Ok((dated + undated).min(u32::MAX as u64) as u32)
}

fn resolve_end(entry: &ExperienceEntry, start: NaiveDate, fallback: Option<NaiveDate>) -> NaiveDate {
    if let Some(end) = entry.end_date {
        return end;
    }
    if let Some(months) = entry.duration_months {
        let end = u32::try_from(months)
            .ok()
            .and_then(|m| start.checked_add_months(Months::new(m)));
        if let Some(end) = end {
            return end;
        }
    }
    fallback.unwrap_or(start)
}

fn latest_date(entries: &[ExperienceEntry]) -> Option<NaiveDate> {
    entries
        .iter()
        .flat_map(|e| [e.start_date, e.end_date])
        .flatten()
        .max()
}

/// Whole calendar months from `start` to `end`, never negative.
fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}
