//! Import merge: upsert an externally supplied dataset into the store.
//!
//! Clusters land first so standards can reference them. Each standard is
//! validated independently; a failing record is skipped with a reason and
//! the batch continues. Not transactional across the payload, and
//! idempotent: replaying a payload reaches the same end state with adds
//! reported as updates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use canon_core::model::{Focus, Rationale};
use canon_core::vector::{self, MacVector};

use crate::store::{ClusterDraft, EntityStore, StandardDraft};

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Externally supplied dataset, as parsed from an import document.
/// Unknown fields (`version`, `exported`, ...) are ignored, so export
/// documents import cleanly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImportPayload {
    pub clusters: Vec<IncomingCluster>,
    pub standards: Vec<IncomingStandard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IncomingCluster {
    pub id: String,
    pub name: String,
    pub description: String,
    pub order: i64,
}

/// An incoming standard. `mac_vector` stays a raw JSON mapping so
/// malformed entries coerce to 0.0 instead of failing the parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IncomingStandard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cluster: String,
    pub importance_weight: f64,
    pub mac_vector: Option<Map<String, Value>>,
    pub primary_focus: Focus,
    pub secondary_focus: Focus,
    pub impacted_emotions: Vec<String>,
    pub rationale: Rationale,
}

impl Default for IncomingStandard {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            cluster: String::new(),
            importance_weight: 0.5,
            mac_vector: None,
            primary_focus: Focus::ObjectConcept,
            secondary_focus: Focus::Action,
            impacted_emotions: Vec::new(),
            rationale: Rationale::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Deterministic account of what an import did. Returned verbatim to the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    pub clusters_added: usize,
    pub clusters_updated: usize,
    pub standards_added: usize,
    pub standards_updated: usize,
    pub standards_skipped: usize,
    pub skipped_reasons: Vec<String>,
}

/// Per-record outcome. Skips carry their reason as data; no control-flow
/// exceptions inside the batch loop.
enum Outcome {
    Added,
    Updated,
    Skipped(String),
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

pub fn merge(store: &mut EntityStore, payload: &ImportPayload) -> MergeReport {
    let mut report = MergeReport::default();

    // Pass 1: clusters. Insert or full overwrite; never fails. A blank id
    // is dropped silently (the report carries no cluster-skip counter).
    for incoming in &payload.clusters {
        if incoming.id.trim().is_empty() {
            continue;
        }
        let draft = ClusterDraft {
            id: incoming.id.clone(),
            name: incoming.name.clone(),
            description: incoming.description.clone(),
            order: incoming.order,
        };
        if store.get_cluster(&incoming.id).is_some() {
            if store.update_cluster(&incoming.id, draft).is_ok() {
                report.clusters_updated += 1;
            }
        } else if store.create_cluster(draft).is_ok() {
            report.clusters_added += 1;
        }
    }

    // Pass 2: standards, each record independently.
    for incoming in &payload.standards {
        match upsert_standard(store, incoming) {
            Outcome::Added => report.standards_added += 1,
            Outcome::Updated => report.standards_updated += 1,
            Outcome::Skipped(reason) => {
                report.standards_skipped += 1;
                report.skipped_reasons.push(reason);
            }
        }
    }

    report
}

fn upsert_standard(store: &mut EntityStore, incoming: &IncomingStandard) -> Outcome {
    let id = incoming.id.trim();
    if id.is_empty() || incoming.name.trim().is_empty() {
        let label = if id.is_empty() { "?" } else { id };
        return Outcome::Skipped(format!("{label}: missing id or name"));
    }

    // Resolves against the live store, so clusters from pass 1 count.
    if store.get_cluster(&incoming.cluster).is_none() {
        return Outcome::Skipped(format!(
            "{id}: unknown cluster reference '{}'",
            incoming.cluster
        ));
    }

    let mac_vector = match &incoming.mac_vector {
        Some(raw) => vector::normalize(raw).vector,
        None => MacVector::default(),
    };

    let draft = StandardDraft {
        id: incoming.id.clone(),
        name: incoming.name.clone(),
        description: incoming.description.clone(),
        cluster: incoming.cluster.clone(),
        importance_weight: incoming.importance_weight,
        primary_focus: incoming.primary_focus,
        secondary_focus: incoming.secondary_focus,
        mac_vector,
        rationale: incoming.rationale.clone(),
        impacted_emotions: incoming.impacted_emotions.clone(),
    };

    // Checked against the live store per record: a duplicate id later in
    // the same batch lands as an update, so the last one wins.
    let result = if store.get_standard(&incoming.id).is_some() {
        store.update_standard(&incoming.id, draft).map(|_| Outcome::Updated)
    } else {
        store.create_standard(draft).map(|_| Outcome::Added)
    };

    match result {
        Ok(outcome) => outcome,
        Err(err) => Outcome::Skipped(format!("{id}: {err}")),
    }
}
