use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::resume::DegreeLevel;

/// Seniority the role is pitched at. Acts as a soft multiplier on the
/// experience score, never as a hard filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(alias = "entry", alias = "ENTRY", alias = "Junior", alias = "junior")]
    Entry,
    #[serde(alias = "mid", alias = "MID", alias = "Intermediate", alias = "intermediate")]
    Mid,
    #[serde(alias = "senior", alias = "SENIOR", alias = "Lead", alias = "lead")]
    Senior,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Qualifications {
    #[serde(default)]
    pub min_degree: Option<DegreeLevel>,
    #[serde(default)]
    pub min_years: Option<u32>,
}

/// Structured requirements for one job (or job category template).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    /// Category the job belongs to; keys per-category weight overrides.
    #[serde(default)]
    pub category: String,
    /// Skill → importance weight. Weights need not sum to 1.
    #[serde(default)]
    pub required_skills: BTreeMap<String, f64>,
    #[serde(default)]
    pub qualifications: Qualifications,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub desired_soft_skills: Vec<String>,
}

/// A named job category in the recommendation pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCategory {
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub requirement: JobRequirement,
}

fn default_active() -> bool {
    true
}
