//! Search and categorical filtering over a snapshot of standards.
//!
//! Composition order is a contract: the text search applies first, the
//! categorical filter applies to its result. The output preserves the
//! relative order of the input; nothing here re-sorts.

use serde::{Deserialize, Serialize};

use canon_core::model::Standard;

/// At most one categorical criterion, selected by `type` on the wire.
///
/// Empty `values` for a non-`none` type degrades to no filtering; the
/// engine never errors on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum CategoryFilter {
    None,
    /// Keep standards whose cluster id is in the set (OR semantics).
    Cluster(Vec<String>),
    /// Single-value: keep standards whose primary OR secondary focus
    /// equals `values[0]`.
    Focus(Vec<String>),
    /// Keep standards whose impacted dimensions intersect the set.
    Dimension(Vec<String>),
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::None
    }
}

/// Apply search then the categorical filter. Stable: output order is input
/// order.
pub fn apply<'a>(
    standards: &'a [Standard],
    search: &str,
    filter: &CategoryFilter,
) -> Vec<&'a Standard> {
    let needle = search.trim().to_lowercase();
    let mut kept: Vec<&Standard> = standards
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.name.to_lowercase().contains(&needle)
                || s.id.to_lowercase().contains(&needle)
        })
        .collect();

    match filter {
        CategoryFilter::None => {}
        CategoryFilter::Cluster(ids) => {
            if !ids.is_empty() {
                kept.retain(|s| ids.iter().any(|id| *id == s.cluster));
            }
        }
        CategoryFilter::Focus(values) => {
            if let Some(value) = values.first() {
                kept.retain(|s| {
                    s.primary_focus.as_str() == value || s.secondary_focus.as_str() == value
                });
            }
        }
        CategoryFilter::Dimension(tags) => {
            if !tags.is_empty() {
                kept.retain(|s| s.impacted_emotions.iter().any(|e| tags.contains(e)));
            }
        }
    }

    kept
}
