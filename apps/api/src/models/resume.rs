use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a résumé as assigned by the upstream store.
pub type ResumeId = i64;

/// Highest-to-lowest ordinal degree ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DegreeLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    /// Ordinal rank used by education scoring: HighSchool=1 … Doctorate=5.
    pub fn rank(self) -> u8 {
        match self {
            DegreeLevel::HighSchool => 1,
            DegreeLevel::Associate => 2,
            DegreeLevel::Bachelor => 3,
            DegreeLevel::Master => 4,
            DegreeLevel::Doctorate => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DegreeLevel::HighSchool => "HighSchool",
            DegreeLevel::Associate => "Associate",
            DegreeLevel::Bachelor => "Bachelor",
            DegreeLevel::Master => "Master",
            DegreeLevel::Doctorate => "Doctorate",
        }
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown degree_level '{0}'")]
pub struct UnknownDegreeLevel(pub String);

impl FromStr for DegreeLevel {
    type Err = UnknownDegreeLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "highschool" | "secondary" | "hsdiploma" | "ged" => Ok(DegreeLevel::HighSchool),
            "associate" | "associates" | "associatedegree" | "aa" | "as" => {
                Ok(DegreeLevel::Associate)
            }
            "bachelor" | "bachelors" | "bachelordegree" | "ba" | "bs" | "bsc" | "beng"
            | "btech" => Ok(DegreeLevel::Bachelor),
            "master" | "masters" | "masterdegree" | "ma" | "ms" | "msc" | "meng" | "mtech"
            | "mba" => Ok(DegreeLevel::Master),
            "doctorate" | "doctoral" | "phd" | "dphil" | "edd" => Ok(DegreeLevel::Doctorate),
            _ => DEGREE_KEYWORDS
                .iter()
                .find(|(keyword, _)| key.contains(*keyword))
                .map(|(_, level)| *level)
                .ok_or_else(|| UnknownDegreeLevel(s.to_string())),
        }
    }
}

/// Keywords looked for inside full degree titles such as "Bachelor of
/// Science". Checked in order, highest level first.
const DEGREE_KEYWORDS: &[(&str, DegreeLevel)] = &[
    ("doctor", DegreeLevel::Doctorate),
    ("phd", DegreeLevel::Doctorate),
    ("master", DegreeLevel::Master),
    ("bachelor", DegreeLevel::Bachelor),
    ("associate", DegreeLevel::Associate),
    ("highschool", DegreeLevel::HighSchool),
];

impl TryFrom<String> for DegreeLevel {
    type Error = UnknownDegreeLevel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DegreeLevel> for String {
    fn from(level: DegreeLevel) -> Self {
        level.as_str().to_string()
    }
}

/// Verbal proficiency as produced by résumé structuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn weight(self) -> f64 {
        match self {
            SkillLevel::Beginner => 0.25,
            SkillLevel::Intermediate => 0.5,
            SkillLevel::Advanced => 0.75,
            SkillLevel::Expert => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }
}

/// Unrecognised levels read as intermediate.
impl From<String> for SkillLevel {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "beginner" | "basic" | "novice" => SkillLevel::Beginner,
            "advanced" | "proficient" => SkillLevel::Advanced,
            "expert" | "master" => SkillLevel::Expert,
            _ => SkillLevel::Intermediate,
        }
    }
}

impl From<SkillLevel> for String {
    fn from(level: SkillLevel) -> Self {
        level.as_str().to_string()
    }
}

/// A skill as listed on a résumé: either a bare name (weight 1.0) or a
/// name with a numeric weight or verbal level. A numeric weight wins over
/// a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillClaim {
    Named(String),
    Weighted {
        name: String,
        #[serde(default)]
        weight: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<SkillLevel>,
    },
}

impl SkillClaim {
    pub fn name(&self) -> &str {
        match self {
            SkillClaim::Named(name) => name,
            SkillClaim::Weighted { name, .. } => name,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            SkillClaim::Named(_) => 1.0,
            SkillClaim::Weighted { weight, level, .. } => weight
                .or_else(|| level.map(SkillLevel::weight))
                .unwrap_or(1.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub duration_months: Option<i64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree_level: DegreeLevel,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Structured résumé as delivered by the upstream extraction step.
///
/// Raw skill names are kept as supplied; canonicalisation and duplicate
/// merging happen in `matching::features`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub skills: Vec<SkillClaim>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    /// Date the résumé was processed; closes ongoing dated positions.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}
