use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::vector::MacVector;

/// Library document format version.
pub const FORMAT_VERSION: &str = "2.7";

/// The fixed appraisal-dimension vocabulary a standard may impact.
/// Membership is a UI concern; the store does not reject unknown tags,
/// the audit reports them.
pub const APPRAISAL_DIMENSIONS: [&str; 14] = [
    "Valence",
    "Arousal",
    "Dominance",
    "Belonging",
    "Goal Relevance",
    "Social Impact",
    "Prospect",
    "Agency-Self",
    "Agency-Other",
    "Agency-Circumstance",
    "Intentionality",
    "Expectation",
    "Praiseworthiness",
    "Familiarity",
];

// ---------------------------------------------------------------------------
// Cluster
// ---------------------------------------------------------------------------

/// A named, ordered grouping of standards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Opaque sort key for listings. Not required unique; ties keep
    /// insertion order.
    #[serde(default)]
    pub order: i64,
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// What a standard primarily appraises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Focus {
    #[default]
    #[serde(rename = "Object/Concept")]
    ObjectConcept,
    Action,
    #[serde(rename = "Person/Group")]
    PersonGroup,
}

impl Focus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectConcept => "Object/Concept",
            Self::Action => "Action",
            Self::PersonGroup => "Person/Group",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rationale
// ---------------------------------------------------------------------------

/// Narrative justification per MAC dimension, plus an overall note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rationale {
    pub family_rationale: String,
    pub group_rationale: String,
    pub reciprocity_rationale: String,
    pub heroism_rationale: String,
    pub deference_rationale: String,
    pub fairness_rationale: String,
    pub property_rationale: String,
    pub overall_rationale: String,
}

impl Rationale {
    /// Rationale text for a canonical dimension key. None for unknown keys.
    pub fn for_dimension(&self, dimension: &str) -> Option<&str> {
        match dimension {
            "family" => Some(&self.family_rationale),
            "group" => Some(&self.group_rationale),
            "reciprocity" => Some(&self.reciprocity_rationale),
            "heroism" => Some(&self.heroism_rationale),
            "deference" => Some(&self.deference_rationale),
            "fairness" => Some(&self.fairness_rationale),
            "property" => Some(&self.property_rationale),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Standard
// ---------------------------------------------------------------------------

/// A single scored, rationalized moral-appraisal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Must reference a live [`Cluster`] id.
    pub cluster: String,
    #[serde(default = "default_importance_weight")]
    pub importance_weight: f64,
    #[serde(default)]
    pub mac_vector: MacVector,
    #[serde(default)]
    pub primary_focus: Focus,
    #[serde(default = "default_secondary_focus")]
    pub secondary_focus: Focus,
    /// Set semantics: deduplicated on every write, first occurrence wins.
    #[serde(default)]
    pub impacted_emotions: Vec<String>,
    #[serde(default)]
    pub rationale: Rationale,
    /// Immutable after creation.
    pub date_created: NaiveDate,
    /// Restamped on every mutating write.
    pub date_modified: NaiveDate,
}

pub(crate) fn default_importance_weight() -> f64 {
    0.5
}

pub(crate) fn default_secondary_focus() -> Focus {
    Focus::Action
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

/// The complete standards library as persisted on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub standards: Vec<Standard>,
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

impl Default for Library {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            last_modified: String::new(),
            clusters: Vec::new(),
            standards: Vec::new(),
        }
    }
}
