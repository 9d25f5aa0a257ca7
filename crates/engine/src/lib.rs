//! `canon-engine` — Library reconciliation and consistency engine.
//!
//! Pure engine crate: owns the in-memory store and the logic over it
//! (filtering, import merge, export selection, audit). No CLI or IO
//! dependencies.

pub mod audit;
pub mod error;
pub mod export;
pub mod filter;
pub mod merge;
pub mod store;

pub use error::StoreError;
pub use export::{ExportPayload, ExportedStandard};
pub use filter::CategoryFilter;
pub use merge::{ImportPayload, MergeReport};
pub use store::{ClusterDraft, EntityStore, Snapshot, StandardDraft};
