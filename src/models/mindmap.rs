// src/models/mindmap.rs
use serde::{Deserialize, Serialize};

/// Label used when a node carries none of `name`, `text` or `topic`.
pub const PLACEHOLDER_LABEL: &str = "Untitled node";

/// Tree node as delivered by the analysis service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SourceNode>>,
}

impl SourceNode {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<SourceNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Resolves the display label: `name`, then `text`, then `topic`, then
    /// [`PLACEHOLDER_LABEL`]. Empty strings count as absent.
    pub fn label(&self) -> &str {
        [&self.name, &self.text, &self.topic]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.is_empty())
            .unwrap_or(PLACEHOLDER_LABEL)
    }

    pub fn children(&self) -> &[SourceNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// `{ "root": { ... } }` wrapper the service uses for mind-map payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindmapData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<SourceNode>,
}

impl MindmapData {
    pub fn new(root: SourceNode) -> Self {
        Self { root: Some(root) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Side for the root child at `index`: even indices go right.
    pub fn for_sibling_index(index: usize) -> Self {
        if index % 2 == 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

/// Layout-annotated node consumed by the mind-map renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapMeta {
    pub name: String,
    pub author: String,
    pub version: String,
}

impl Default for MindmapMeta {
    fn default() -> Self {
        Self {
            name: "AI Analysis Mind Map".to_string(),
            author: "AI Video Analysis Platform".to_string(),
            version: "1.0".to_string(),
        }
    }
}

/// Envelope handed to the renderer: `{ meta, format: "node_tree", data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapDocument {
    pub meta: MindmapMeta,
    pub format: String,
    pub data: LayoutNode,
}

impl MindmapDocument {
    pub const NODE_TREE_FORMAT: &'static str = "node_tree";

    pub fn node_tree(data: LayoutNode) -> Self {
        Self {
            meta: MindmapMeta::default(),
            format: Self::NODE_TREE_FORMAT.to_string(),
            data,
        }
    }
}
