// src/mindmap.rs
//! Converts service-supplied trees into layout-annotated mind maps and
//! renders them for the terminal.

use std::fmt::Write as _;
use std::path::Path;

use uuid::Uuid;

use crate::error::RenderError;
use crate::models::{Direction, LayoutNode, MindmapData, MindmapDocument, SourceNode};

/// Labels for first-level branches, cycled by sibling index.
pub const BRANCH_PALETTE: [&str; 5] = ["rose", "sky", "mint", "sunset", "pearl"];

/// Converts `root` into a fresh [`LayoutNode`] tree.
///
/// Each node gets a new random id. Only direct children of the root get a
/// [`Direction`], alternating right/left starting at index 0. The input must
/// be a finite tree; it is not modified.
pub fn convert(root: &SourceNode) -> LayoutNode {
    convert_node(root, true)
}

fn convert_node(node: &SourceNode, is_root: bool) -> LayoutNode {
    let children = node
        .children()
        .iter()
        .enumerate()
        .map(|(index, child)| {
            let mut converted = convert_node(child, false);
            if is_root {
                converted.direction = Some(Direction::for_sibling_index(index));
            }
            converted
        })
        .collect();

    LayoutNode {
        id: Uuid::new_v4().simple().to_string(),
        topic: node.label().to_string(),
        direction: None,
        children,
    }
}

/// Validates the payload and wraps the converted tree in the render envelope.
pub fn render_document(data: Option<&MindmapData>) -> Result<MindmapDocument, RenderError> {
    let root = data
        .and_then(|data| data.root.as_ref())
        .ok_or(RenderError::Unavailable)?;

    let layout = convert(root);
    tracing::debug!(
        nodes = count_nodes(&layout),
        depth = depth(&layout),
        "🧠 Converted mind map"
    );
    Ok(MindmapDocument::node_tree(layout))
}

pub fn count_nodes(node: &LayoutNode) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}

pub fn depth(node: &LayoutNode) -> usize {
    1 + node.children.iter().map(depth).max().unwrap_or(0)
}

/// Visual tier of a node, derived from its depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLevel {
    Root,
    Branch,
    Leaf,
}

impl NodeLevel {
    fn at_depth(depth: usize) -> Self {
        match depth {
            0 => NodeLevel::Root,
            1 => NodeLevel::Branch,
            _ => NodeLevel::Leaf,
        }
    }
}

/// Renders the tree as an indented outline, one node per line.
pub fn outline(root: &LayoutNode) -> String {
    let mut out = String::new();
    write_outline(&mut out, root, 0, 0);
    out
}

fn write_outline(out: &mut String, node: &LayoutNode, depth: usize, sibling_index: usize) {
    let indent = "    ".repeat(depth);
    let line = match NodeLevel::at_depth(depth) {
        NodeLevel::Root => format!("◆ {}", node.topic),
        NodeLevel::Branch => {
            let side = match node.direction {
                Some(Direction::Left) => "◀",
                Some(Direction::Right) | None => "▶",
            };
            let palette = BRANCH_PALETTE[sibling_index % BRANCH_PALETTE.len()];
            format!("{} {} [{}]", side, node.topic, palette)
        }
        NodeLevel::Leaf => format!("• {}", node.topic),
    };
    let _ = writeln!(out, "{}{}", indent, line);

    for (index, child) in node.children.iter().enumerate() {
        write_outline(out, child, depth + 1, index);
    }
}

/// Writes the envelope as pretty JSON.
pub async fn export_json(document: &MindmapDocument, path: &Path) -> Result<(), RenderError> {
    let json = serde_json::to_vec_pretty(document)
        .map_err(|e| RenderError::Export(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    tokio::fs::write(path, json).await?;
    tracing::info!("💾 Exported mind map to {}", path.display());
    Ok(())
}
