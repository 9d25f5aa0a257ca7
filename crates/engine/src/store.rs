//! In-memory authoritative collections of standards and clusters.
//!
//! All mutation goes through [`EntityStore`]; filtering and export read a
//! [`Snapshot`]. Collections are `Vec`-backed so insertion order is
//! preserved — listing stability and merge tie-breaking depend on it.
//! Single-writer: callers serialize mutating calls externally.

use chrono::{NaiveDate, Utc};

use canon_core::model::{Cluster, Focus, Library, Rationale, Standard, FORMAT_VERSION};
use canon_core::vector::MacVector;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Mutable fields of a standard. `date_created` and `date_modified` are
/// stamped by the store, never supplied by the caller.
#[derive(Debug, Clone)]
pub struct StandardDraft {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cluster: String,
    pub importance_weight: f64,
    pub primary_focus: Focus,
    pub secondary_focus: Focus,
    pub mac_vector: MacVector,
    pub rationale: Rationale,
    pub impacted_emotions: Vec<String>,
}

impl Default for StandardDraft {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            cluster: String::new(),
            importance_weight: 0.5,
            primary_focus: Focus::ObjectConcept,
            secondary_focus: Focus::Action,
            mac_vector: MacVector::default(),
            rationale: Rationale::default(),
            impacted_emotions: Vec::new(),
        }
    }
}

/// Mutable fields of a cluster.
#[derive(Debug, Clone, Default)]
pub struct ClusterDraft {
    pub id: String,
    pub name: String,
    pub description: String,
    pub order: i64,
}

/// Read-only deep copy of both collections, internally consistent.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub clusters: Vec<Cluster>,
    pub standards: Vec<Standard>,
}

// ---------------------------------------------------------------------------
// EntityStore
// ---------------------------------------------------------------------------

/// Sole owner of the authoritative cluster and standard collections.
#[derive(Debug, Clone)]
pub struct EntityStore {
    version: String,
    clusters: Vec<Cluster>,
    standards: Vec<Standard>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            clusters: Vec::new(),
            standards: Vec::new(),
        }
    }

    /// Adopt a persisted library wholesale. Trusted snapshot: no per-record
    /// validation.
    pub fn from_library(library: Library) -> Self {
        Self {
            version: library.version,
            clusters: library.clusters,
            standards: library.standards,
        }
    }

    /// Replace all contents from a persisted library. Trusted snapshot: no
    /// per-record validation.
    pub fn restore(&mut self, library: Library) {
        self.version = library.version;
        self.clusters = library.clusters;
        self.standards = library.standards;
    }

    /// The whole store as a persistable document. `last_modified` is left
    /// empty; the save path stamps it.
    pub fn to_library(&self) -> Library {
        Library {
            version: self.version.clone(),
            last_modified: String::new(),
            clusters: self.clusters.clone(),
            standards: self.standards.clone(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn get_standard(&self, id: &str) -> Option<&Standard> {
        self.standards.iter().find(|s| s.id == id)
    }

    pub fn get_cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    /// Clusters sorted by `order`. Stable, so equal orders keep insertion
    /// order.
    pub fn clusters_ordered(&self) -> Vec<&Cluster> {
        let mut ordered: Vec<&Cluster> = self.clusters.iter().collect();
        ordered.sort_by_key(|c| c.order);
        ordered
    }

    /// Deep copy of both collections for filter/export consumers.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            clusters: self.clusters.clone(),
            standards: self.standards.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Standard mutations
    // -----------------------------------------------------------------------

    pub fn create_standard(&mut self, draft: StandardDraft) -> Result<&Standard, StoreError> {
        if draft.id.trim().is_empty() {
            return Err(StoreError::Validation("standard id is required".into()));
        }
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation("standard name is required".into()));
        }
        if self.get_standard(&draft.id).is_some() {
            return Err(StoreError::Validation(format!(
                "standard id '{}' already exists",
                draft.id
            )));
        }
        if self.get_cluster(&draft.cluster).is_none() {
            return Err(StoreError::Validation(format!(
                "unknown cluster '{}'",
                draft.cluster
            )));
        }

        let now = today();
        let index = self.standards.len();
        self.standards.push(Standard {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            cluster: draft.cluster,
            importance_weight: draft.importance_weight,
            mac_vector: draft.mac_vector,
            primary_focus: draft.primary_focus,
            secondary_focus: draft.secondary_focus,
            impacted_emotions: dedup(draft.impacted_emotions),
            rationale: draft.rationale,
            date_created: now,
            date_modified: now,
        });
        Ok(&self.standards[index])
    }

    /// Full-record replace of all mutable fields. `id` and `date_created`
    /// carry over; `date_modified` is restamped. The record keeps its
    /// position in the sequence.
    pub fn update_standard(&mut self, id: &str, draft: StandardDraft) -> Result<&Standard, StoreError> {
        let position = self
            .standards
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "standard",
                id: id.to_string(),
            })?;
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation("standard name is required".into()));
        }
        if self.get_cluster(&draft.cluster).is_none() {
            return Err(StoreError::Validation(format!(
                "unknown cluster '{}'",
                draft.cluster
            )));
        }

        let existing = &mut self.standards[position];
        existing.name = draft.name;
        existing.description = draft.description;
        existing.cluster = draft.cluster;
        existing.importance_weight = draft.importance_weight;
        existing.mac_vector = draft.mac_vector;
        existing.primary_focus = draft.primary_focus;
        existing.secondary_focus = draft.secondary_focus;
        existing.impacted_emotions = dedup(draft.impacted_emotions);
        existing.rationale = draft.rationale;
        existing.date_modified = today();
        Ok(&self.standards[position])
    }

    pub fn delete_standard(&mut self, id: &str) -> Result<(), StoreError> {
        let position = self
            .standards
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "standard",
                id: id.to_string(),
            })?;
        self.standards.remove(position);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Cluster mutations
    // -----------------------------------------------------------------------

    pub fn create_cluster(&mut self, draft: ClusterDraft) -> Result<&Cluster, StoreError> {
        if draft.id.trim().is_empty() {
            return Err(StoreError::Validation("cluster id is required".into()));
        }
        if self.get_cluster(&draft.id).is_some() {
            return Err(StoreError::Validation(format!(
                "cluster id '{}' already exists",
                draft.id
            )));
        }
        let index = self.clusters.len();
        self.clusters.push(Cluster {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            order: draft.order,
        });
        Ok(&self.clusters[index])
    }

    pub fn update_cluster(&mut self, id: &str, draft: ClusterDraft) -> Result<&Cluster, StoreError> {
        let position = self
            .clusters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "cluster",
                id: id.to_string(),
            })?;
        let existing = &mut self.clusters[position];
        existing.name = draft.name;
        existing.description = draft.description;
        existing.order = draft.order;
        Ok(&self.clusters[position])
    }

    /// Referential integrity, not cascading delete: removal is rejected
    /// while any standard references the cluster.
    pub fn delete_cluster(&mut self, id: &str) -> Result<(), StoreError> {
        let position = self
            .clusters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "cluster",
                id: id.to_string(),
            })?;
        let referencing = self.standards.iter().filter(|s| s.cluster == id).count();
        if referencing > 0 {
            return Err(StoreError::Conflict(format!(
                "cluster '{id}' is in use by {referencing} standard(s)"
            )));
        }
        self.clusters.remove(position);
        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Set semantics for impacted emotions: first occurrence wins.
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
