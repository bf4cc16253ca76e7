//! Engine settings: dimension weights, the skill synonym table, and the
//! recommendation/ranking knobs. Built and validated once, then shared
//! read-only by every computation.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::matching::errors::EngineError;

pub const DEFAULT_INCLUSION_FLOOR: f64 = 40.0;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_BUCKET_DECAY: f64 = 5.0;
pub const DEFAULT_SHORTLIST_THRESHOLD: f64 = 60.0;
pub const DEFAULT_MAX_CANDIDATES: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Dimension weights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub soft_skills: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            skills: 0.5,
            experience: 0.25,
            education: 0.15,
            soft_skills: 0.10,
        }
    }
}

impl DimensionWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.education + self.soft_skills
    }

    fn validate(&self, field: &str) -> Result<(), EngineError> {
        let parts = [
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
            ("soft_skills", self.soft_skills),
        ];
        for (name, value) in parts {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::configuration(
                    format!("{field}.{name}"),
                    value,
                    "weight must be a finite, non-negative number",
                ));
            }
        }
        let sum = self.sum();
        if sum <= 0.0 {
            return Err(EngineError::configuration(
                field,
                sum,
                "weights must sum to a positive value",
            ));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill canonicalisation
// ────────────────────────────────────────────────────────────────────────────

/// Alias → canonical pairs applied unless a settings file replaces them.
const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ecmascript", "javascript"),
    ("es6", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("python3", "python"),
    ("golang", "go"),
    ("node", "node.js"),
    ("node js", "node.js"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("vuejs", "vue"),
    ("vue.js", "vue"),
    ("angularjs", "angular"),
    ("postgres", "postgresql"),
    ("pg", "postgresql"),
    ("mongo", "mongodb"),
    ("mysql db", "mysql"),
    ("k8s", "kubernetes"),
    ("amazon web services", "aws"),
    ("google cloud", "gcp"),
    ("google cloud platform", "gcp"),
    ("ms azure", "azure"),
    ("microsoft azure", "azure"),
    ("ml", "machine learning"),
    ("dl", "deep learning"),
    ("nlp", "natural language processing"),
    ("tf", "tensorflow"),
    ("sklearn", "scikit-learn"),
    ("cpp", "c++"),
    ("csharp", "c#"),
    ("c sharp", "c#"),
    ("html5", "html"),
    ("css3", "css"),
    ("spring boot", "spring"),
    ("drf", "django"),
    ("restful", "rest"),
    ("rest api", "rest"),
    ("team player", "teamwork"),
    ("collaboration", "teamwork"),
    ("communication skills", "communication"),
];

/// NFKC-folds (full-width and compatibility forms), lower-cases, drops
/// punctuation (keeping `+` and `#`, which are significant in names like
/// `c++`/`c#`), and collapses separators to a single space.
pub fn normalize_term(raw: &str) -> String {
    let folded: String = raw.nfkc().collect();
    let mut cleaned = String::with_capacity(folded.len());
    for c in folded.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '+' || c == '#' {
            cleaned.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' || c == '/' {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Alias table keyed and valued by normalised terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynonymTable {
    aliases: HashMap<String, String>,
}

impl SynonymTable {
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (alias, canonical) in DEFAULT_SYNONYMS {
            table.insert(alias, canonical);
        }
        table
    }

    pub fn insert(&mut self, alias: &str, canonical: &str) {
        let alias = normalize_term(alias);
        let canonical = normalize_term(canonical);
        if alias.is_empty() || canonical.is_empty() || alias == canonical {
            return;
        }
        self.aliases.insert(alias, canonical);
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Canonical form of a raw skill or tag. Unknown terms pass through
    /// normalised but otherwise unchanged.
    pub fn canonicalize(&self, raw: &str) -> String {
        let normalized = normalize_term(raw);
        match self.aliases.get(&normalized) {
            Some(canonical) => canonical.clone(),
            None => normalized,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub weights: DimensionWeights,
    /// Keyed by `category_key(name)`.
    pub category_weights: HashMap<String, DimensionWeights>,
    pub synonyms: SynonymTable,
    pub inclusion_floor: f64,
    pub default_top_k: usize,
    pub experience_bucket_decay: f64,
    pub penalize_overqualification: bool,
    pub shortlist_threshold: f64,
    pub max_candidates: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            weights: DimensionWeights::default(),
            category_weights: HashMap::new(),
            synonyms: SynonymTable::builtin(),
            inclusion_floor: DEFAULT_INCLUSION_FLOOR,
            default_top_k: DEFAULT_TOP_K,
            experience_bucket_decay: DEFAULT_BUCKET_DECAY,
            penalize_overqualification: false,
            shortlist_threshold: DEFAULT_SHORTLIST_THRESHOLD,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

pub fn category_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl EngineSettings {
    /// Weights for a job category, falling back to the defaults.
    pub fn weights_for(&self, category: &str) -> &DimensionWeights {
        self.category_weights
            .get(&category_key(category))
            .unwrap_or(&self.weights)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.weights.validate("weights")?;
        for (category, weights) in &self.category_weights {
            weights.validate(&format!("category_weights.{category}"))?;
        }
        check_score("inclusion_floor", self.inclusion_floor)?;
        check_score("shortlist_threshold", self.shortlist_threshold)?;
        if !self.experience_bucket_decay.is_finite() || self.experience_bucket_decay < 0.0 {
            return Err(EngineError::configuration(
                "experience_bucket_decay",
                self.experience_bucket_decay,
                "must be a finite, non-negative number of points",
            ));
        }
        if self.max_candidates == 0 {
            return Err(EngineError::configuration(
                "max_candidates",
                0,
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Loads and validates settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::configuration("settings_path", path.display(), e.to_string())
        })?;
        let file: SettingsFile = serde_json::from_str(&raw).map_err(|e| {
            EngineError::configuration("settings_path", path.display(), e.to_string())
        })?;
        let settings = Self::try_from(file)?;
        info!(
            "Loaded engine settings from {} ({} synonyms, {} category overrides)",
            path.display(),
            settings.synonyms.len(),
            settings.category_weights.len()
        );
        Ok(settings)
    }
}

fn check_score(field: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(EngineError::configuration(
            field,
            value,
            "must lie within [0, 100]",
        ));
    }
    Ok(())
}

/// On-disk settings shape. Every field is optional; counts are signed so a
/// negative value is reported as a configuration error rather than a parse
/// failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub weights: Option<DimensionWeights>,
    pub category_weights: HashMap<String, DimensionWeights>,
    pub synonyms: HashMap<String, String>,
    pub replace_default_synonyms: bool,
    pub inclusion_floor: Option<f64>,
    pub top_k: Option<i64>,
    pub experience_bucket_decay: Option<f64>,
    pub penalize_overqualification: Option<bool>,
    pub shortlist_threshold: Option<f64>,
    pub max_candidates: Option<i64>,
}

impl TryFrom<SettingsFile> for EngineSettings {
    type Error = EngineError;

    fn try_from(file: SettingsFile) -> Result<Self, Self::Error> {
        let defaults = EngineSettings::default();

        let default_top_k = match file.top_k {
            Some(k) if k < 0 => {
                return Err(EngineError::configuration("top_k", k, "must not be negative"))
            }
            Some(k) => k as usize,
            None => defaults.default_top_k,
        };
        let max_candidates = match file.max_candidates {
            Some(n) if n < 0 => {
                return Err(EngineError::configuration(
                    "max_candidates",
                    n,
                    "must not be negative",
                ))
            }
            Some(n) => n as usize,
            None => defaults.max_candidates,
        };

        let mut synonyms = if file.replace_default_synonyms {
            SynonymTable::default()
        } else {
            defaults.synonyms
        };
        for (alias, canonical) in &file.synonyms {
            synonyms.insert(alias, canonical);
        }
        if file.replace_default_synonyms && synonyms.is_empty() {
            warn!("Default synonym table replaced with an empty table; only exact skill names will match");
        }

        let settings = EngineSettings {
            weights: file.weights.unwrap_or(defaults.weights),
            category_weights: file
                .category_weights
                .into_iter()
                .map(|(name, weights)| (category_key(&name), weights))
                .collect(),
            synonyms,
            inclusion_floor: file.inclusion_floor.unwrap_or(defaults.inclusion_floor),
            default_top_k,
            experience_bucket_decay: file
                .experience_bucket_decay
                .unwrap_or(defaults.experience_bucket_decay),
            penalize_overqualification: file
                .penalize_overqualification
                .unwrap_or(defaults.penalize_overqualification),
            shortlist_threshold: file
                .shortlist_threshold
                .unwrap_or(defaults.shortlist_threshold),
            max_candidates,
        };
        settings.validate()?;
        Ok(settings)
    }
}
