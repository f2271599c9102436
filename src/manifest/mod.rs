//! History manifests
//!
//! A manifest is a self-describing JSON document holding every version of a
//! graph: lineage, timestamps, the `current` pointer and one checksummed
//! snapshot per version.
//!
//! Format:
//! ```json
//! {
//!   "format_version": 1,
//!   "graph_id": "6f2c...",
//!   "exported_at": "2026-10-17T09:00:00Z",
//!   "current": 2,
//!   "next_id": 3,
//!   "nodes": [
//!     { "id": 0, "parent": null, "children": [1, 2], "created_at": "...",
//!       "checksum": "crc32:0a1b2c3d", "snapshot": [1, 2, 3] }
//!   ]
//! }
//! ```
//!
//! Restoring never trusts the document. Ids must be dense and in order,
//! every parent must precede its children, children lists must agree with
//! parent links, and every snapshot must match its checksum. Any violation
//! aborts the restore; no partially rebuilt graph is ever returned.

mod checksum;
mod errors;

pub use checksum::{compute_checksum, format_checksum, parse_checksum, snapshot_checksum};
pub use errors::{ManifestError, ManifestResult};

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::observability::{Event, Logger};
use crate::version::{GraphId, IdAllocator, VersionGraph, VersionId, VersionNode};

/// Manifest layout written by this crate.
pub const FORMAT_VERSION: u8 = 1;

/// One persisted version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord<S> {
    pub id: VersionId,
    pub parent: Option<VersionId>,
    pub children: Vec<VersionId>,
    pub created_at: DateTime<Utc>,
    /// CRC32 of the snapshot's canonical JSON ("crc32:XXXXXXXX")
    pub checksum: String,
    pub snapshot: S,
}

/// Complete persisted history of one graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryManifest<S> {
    pub format_version: u8,
    pub graph_id: GraphId,
    pub exported_at: DateTime<Utc>,
    pub current: VersionId,
    pub next_id: VersionId,
    pub nodes: Vec<NodeRecord<S>>,
}

impl<S> HistoryManifest<S>
where
    S: Clone + Serialize,
{
    /// Captures every version of `graph`.
    pub fn capture(graph: &VersionGraph<S>) -> ManifestResult<Self> {
        let nodes = graph
            .nodes()
            .map(|node| {
                let checksum = snapshot_checksum(node.snapshot())?;
                Ok(NodeRecord {
                    id: node.id(),
                    parent: node.parent(),
                    children: node.children().iter().copied().collect(),
                    created_at: node.created_at(),
                    checksum: format_checksum(checksum),
                    snapshot: node.snapshot().clone(),
                })
            })
            .collect::<ManifestResult<Vec<_>>>()?;

        let manifest = Self {
            format_version: FORMAT_VERSION,
            graph_id: graph.graph_id(),
            exported_at: Utc::now(),
            current: graph.current(),
            next_id: graph.next_id(),
            nodes,
        };

        let graph_id = manifest.graph_id.to_string();
        let versions = manifest.nodes.len().to_string();
        graph.logger().event(
            Event::ManifestExported,
            &[("graph_id", graph_id.as_str()), ("versions", versions.as_str())],
        );
        Ok(manifest)
    }
}

impl<S> HistoryManifest<S>
where
    S: Serialize,
{
    /// Number of versions recorded.
    pub fn version_count(&self) -> usize {
        self.nodes.len()
    }

    /// Validates the manifest and rebuilds the graph it describes.
    ///
    /// The rebuilt graph keeps the recorded identity, timestamps and
    /// `current`; its counters start from zero.
    pub fn restore(self, logger: Logger) -> ManifestResult<VersionGraph<S>> {
        if self.format_version != FORMAT_VERSION {
            return Err(ManifestError::UnsupportedFormat(self.format_version));
        }

        let root = self
            .nodes
            .first()
            .ok_or_else(|| ManifestError::corrupt("manifest holds no versions"))?;
        if root.id != VersionId::ROOT || root.parent.is_some() {
            return Err(ManifestError::corrupt(format!(
                "first version must be a parentless {}, found {}",
                VersionId::ROOT,
                root.id
            )));
        }

        let mut ids = IdAllocator::new();
        let mut derived: Vec<BTreeSet<VersionId>> = vec![BTreeSet::new(); self.nodes.len()];
        for record in self.nodes.iter().skip(1) {
            ids.mark_assigned(record.id)
                .map_err(|e| ManifestError::corrupt(e.to_string()))?;
            let parent = record.parent.ok_or_else(|| {
                ManifestError::corrupt(format!("version {} has no parent", record.id))
            })?;
            if parent >= record.id {
                return Err(ManifestError::corrupt(format!(
                    "version {} names later version {} as parent",
                    record.id, parent
                )));
            }
            derived[parent.value() as usize].insert(record.id);
        }

        for (record, expected) in self.nodes.iter().zip(&derived) {
            let listed: BTreeSet<VersionId> = record.children.iter().copied().collect();
            if listed.len() != record.children.len() || &listed != expected {
                return Err(ManifestError::corrupt(format!(
                    "children of version {} disagree with parent links",
                    record.id
                )));
            }

            let found = format_checksum(snapshot_checksum(&record.snapshot)?);
            let matches = parse_checksum(&record.checksum)
                .map(format_checksum)
                .is_some_and(|recorded| recorded == found);
            if !matches {
                return Err(ManifestError::ChecksumMismatch {
                    version: record.id,
                    expected: record.checksum.clone(),
                    found,
                });
            }
        }

        if self.next_id != ids.peek() {
            return Err(ManifestError::corrupt(format!(
                "next id {} does not follow latest version {}",
                self.next_id,
                ids.latest()
            )));
        }
        if self.current.value() as usize >= self.nodes.len() {
            return Err(ManifestError::corrupt(format!(
                "current version {} is not recorded",
                self.current
            )));
        }

        let version_count = self.nodes.len();
        let nodes = self
            .nodes
            .into_iter()
            .zip(derived)
            .map(|(record, children)| {
                VersionNode::from_parts(
                    record.id,
                    record.parent,
                    children,
                    record.created_at,
                    record.snapshot,
                )
            })
            .collect();

        let graph = VersionGraph::from_parts(self.graph_id, nodes, self.current, ids, logger);
        let graph_id = graph.graph_id().to_string();
        let versions = version_count.to_string();
        graph.logger().event(
            Event::ManifestImported,
            &[("graph_id", graph_id.as_str()), ("versions", versions.as_str())],
        );
        Ok(graph)
    }

    /// Serializes the manifest to pretty-printed JSON.
    pub fn to_json(&self) -> ManifestResult<String> {
        serde_json::to_string_pretty(self).map_err(ManifestError::Serialize)
    }

    /// Writes the manifest to `path` and fsyncs it.
    pub fn write_to_file(&self, path: &Path) -> ManifestResult<()> {
        let json = self.to_json()?;

        let mut file = File::create(path).map_err(|e| ManifestError::io(path, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| ManifestError::io(path, e))?;
        file.sync_all().map_err(|e| ManifestError::io(path, e))?;

        Ok(())
    }
}

impl<S> HistoryManifest<S>
where
    S: DeserializeOwned,
{
    /// Parses a manifest from JSON. Nothing is validated until `restore`.
    pub fn from_json(json: &str) -> ManifestResult<Self> {
        serde_json::from_str(json).map_err(ManifestError::Parse)
    }

    /// Reads a manifest from `path`.
    pub fn read_from_file(path: &Path) -> ManifestResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        Self::from_json(&content)
    }
}
