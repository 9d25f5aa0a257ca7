//! Filtered export payloads.
//!
//! Two selection modes: by cluster set (the clusters plus every standard
//! inside them) or by explicit standard ids (the standards plus every
//! cluster they reference). Rationale can be stripped from the document
//! entirely.

use chrono::NaiveDate;
use serde::Serialize;

use canon_core::model::{Cluster, Focus, Rationale, Standard};
use canon_core::vector::MacVector;

use crate::error::StoreError;
use crate::store::EntityStore;

/// A standard as written to an export document. `rationale` is omitted
/// from the JSON (not blanked) when the caller excludes it.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedStandard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cluster: String,
    pub importance_weight: f64,
    pub mac_vector: MacVector,
    pub primary_focus: Focus,
    pub secondary_focus: Focus,
    pub impacted_emotions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<Rationale>,
    pub date_created: NaiveDate,
    pub date_modified: NaiveDate,
}

impl ExportedStandard {
    fn from_record(standard: &Standard, include_rationale: bool) -> Self {
        Self {
            id: standard.id.clone(),
            name: standard.name.clone(),
            description: standard.description.clone(),
            cluster: standard.cluster.clone(),
            importance_weight: standard.importance_weight,
            mac_vector: standard.mac_vector,
            primary_focus: standard.primary_focus,
            secondary_focus: standard.secondary_focus,
            impacted_emotions: standard.impacted_emotions.clone(),
            rationale: include_rationale.then(|| standard.rationale.clone()),
            date_created: standard.date_created,
            date_modified: standard.date_modified,
        }
    }
}

/// The export document. Importing ignores `version` and `exported`, so a
/// document merges back cleanly.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPayload {
    pub version: String,
    pub exported: String,
    pub clusters: Vec<Cluster>,
    pub standards: Vec<ExportedStandard>,
}

/// All listed clusters plus every standard whose cluster is listed.
pub fn select_by_clusters(
    store: &EntityStore,
    ids: &[String],
    include_rationale: bool,
) -> Result<ExportPayload, StoreError> {
    let clusters: Vec<Cluster> = store
        .clusters()
        .iter()
        .filter(|c| ids.contains(&c.id))
        .cloned()
        .collect();
    if clusters.is_empty() {
        return Err(StoreError::Validation(
            "export selection resolved no clusters".into(),
        ));
    }

    let standards = store
        .standards()
        .iter()
        .filter(|s| ids.contains(&s.cluster))
        .map(|s| ExportedStandard::from_record(s, include_rationale))
        .collect();

    Ok(document(store, clusters, standards))
}

/// Exactly the requested standards plus every cluster they reference,
/// deduplicated.
pub fn select_by_standards(
    store: &EntityStore,
    ids: &[String],
    include_rationale: bool,
) -> Result<ExportPayload, StoreError> {
    let selected: Vec<&Standard> = store
        .standards()
        .iter()
        .filter(|s| ids.contains(&s.id))
        .collect();
    if selected.is_empty() {
        return Err(StoreError::Validation(
            "export selection resolved no standards".into(),
        ));
    }

    let clusters: Vec<Cluster> = store
        .clusters()
        .iter()
        .filter(|c| selected.iter().any(|s| s.cluster == c.id))
        .cloned()
        .collect();

    let standards = selected
        .into_iter()
        .map(|s| ExportedStandard::from_record(s, include_rationale))
        .collect();

    Ok(document(store, clusters, standards))
}

fn document(
    store: &EntityStore,
    clusters: Vec<Cluster>,
    standards: Vec<ExportedStandard>,
) -> ExportPayload {
    ExportPayload {
        version: store.version().to_string(),
        exported: chrono::Utc::now().to_rfc3339(),
        clusters,
        standards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ClusterDraft, StandardDraft};

    fn seeded_store() -> EntityStore {
        let mut store = EntityStore::new();
        for (id, order) in [("ENH", 1), ("JE", 2), ("IT", 3)] {
            store
                .create_cluster(ClusterDraft {
                    id: id.into(),
                    name: format!("Cluster {id}"),
                    description: String::new(),
                    order,
                })
                .unwrap();
        }
        for (id, cluster) in [("ENH-1", "ENH"), ("ENH-2", "ENH"), ("JE-1", "JE")] {
            store
                .create_standard(StandardDraft {
                    id: id.into(),
                    name: format!("Standard {id}"),
                    cluster: cluster.into(),
                    rationale: Rationale {
                        overall_rationale: "because".into(),
                        ..Rationale::default()
                    },
                    ..StandardDraft::default()
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn cluster_mode_selects_members() {
        let store = seeded_store();
        let payload = select_by_clusters(&store, &["ENH".into()], true).unwrap();
        assert_eq!(payload.clusters.len(), 1);
        assert_eq!(payload.clusters[0].id, "ENH");
        let ids: Vec<&str> = payload.standards.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["ENH-1", "ENH-2"]);
    }

    #[test]
    fn standard_mode_pulls_referenced_clusters_deduplicated() {
        let store = seeded_store();
        let payload = select_by_standards(
            &store,
            &["ENH-1".into(), "ENH-2".into(), "JE-1".into()],
            true,
        )
        .unwrap();
        let cluster_ids: Vec<&str> = payload.clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(cluster_ids, vec!["ENH", "JE"]);
        assert_eq!(payload.standards.len(), 3);
    }

    #[test]
    fn empty_resolution_is_a_validation_error() {
        let store = seeded_store();
        let err = select_by_clusters(&store, &["nope".into()], true).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = select_by_standards(&store, &[], true).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn rationale_is_omitted_not_blanked() {
        let store = seeded_store();

        let with = select_by_clusters(&store, &["ENH".into()], true).unwrap();
        let json = serde_json::to_value(&with).unwrap();
        assert!(json["standards"][0].get("rationale").is_some());

        let without = select_by_clusters(&store, &["ENH".into()], false).unwrap();
        let json = serde_json::to_value(&without).unwrap();
        assert!(json["standards"][0].get("rationale").is_none());
    }

    #[test]
    fn document_carries_version_and_stamp() {
        let store = seeded_store();
        let payload = select_by_clusters(&store, &["JE".into()], false).unwrap();
        assert_eq!(payload.version, store.version());
        assert!(!payload.exported.is_empty());
    }
}
