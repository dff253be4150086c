//! Figma document model.
//!
//! A Figma file is a tree of nodes rooted at a `DOCUMENT` node. Pages are
//! `CANVAS` nodes, usually direct children of the root. Only `id`, `name`,
//! `type` and `children` are modelled; every other property is kept verbatim
//! in [`DocumentNode::properties`] so the tree serialises back to the JSON
//! Figma sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node type of a page in a Figma document.
pub const CANVAS_NODE_TYPE: &str = "CANVAS";

/// A node in a Figma document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Node identifier, unique within the file (e.g. `"0:1"`).
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Node type tag (`DOCUMENT`, `CANVAS`, `FRAME`, ...).
    #[serde(rename = "type")]
    pub node_type: String,

    /// Child nodes. Absent for leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DocumentNode>>,

    /// All remaining node properties.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl DocumentNode {
    /// Returns `true` if this node is a page.
    #[must_use]
    pub fn is_canvas(&self) -> bool {
        self.node_type == CANVAS_NODE_TYPE
    }

    /// Returns the children of this node (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// A Figma file snapshot: metadata, document tree and inline thumbnail.
#[derive(Debug, Clone)]
pub struct FigmaFile {
    /// File name.
    pub name: String,
    /// File version identifier.
    pub version: String,
    /// Root of the document tree.
    pub document: DocumentNode,
    /// Signed URL of the file thumbnail.
    pub thumbnail_url: String,
    /// Base64-encoded thumbnail image.
    pub thumbnail_b64: String,
}

/// A rendered page thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasThumbnail {
    /// Canvas node id.
    pub id: String,
    /// Signed image URL the data was downloaded from.
    pub url: String,
    /// Base64-encoded PNG data.
    pub data: String,
}

/// Collects the ids of all `CANVAS` nodes in document order.
///
/// Traversal is depth-first pre-order, so a canvas root comes before any
/// canvases nested below it.
#[must_use]
pub fn collect_canvas_ids(node: &DocumentNode) -> Vec<String> {
    let mut ids = Vec::new();
    push_canvas_ids(node, &mut ids);
    ids
}

fn push_canvas_ids(node: &DocumentNode, ids: &mut Vec<String>) {
    if node.is_canvas() {
        ids.push(node.id.clone());
    }
    for child in node.children() {
        push_canvas_ids(child, ids);
    }
}
