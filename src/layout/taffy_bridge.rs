//! Taffy Bridge - Page blocks to absolute rectangles.
//!
//! The page is a tree of [`Block`]s: every block is a column flexbox with an
//! optional fixed height, padding and gap between children. Taffy computes the
//! layout; we flatten the relative positions into absolute page coordinates.

use std::collections::HashMap;

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, NodeId,
    Rect as TaffyRect, Size, Style, TaffyTree,
};

use crate::error::{FolioError, Result};
use crate::types::{ElementId, Rect};

// =============================================================================
// BLOCK
// =============================================================================

/// One element in the page tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: ElementId,
    /// Fixed height. `None` sizes the block to its children.
    pub height: Option<f32>,
    pub padding: f32,
    pub gap: f32,
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            height: None,
            padding: 0.0,
            gap: 0.0,
            children: Vec::new(),
        }
    }

    /// A leaf with a fixed height.
    pub fn leaf(id: impl Into<ElementId>, height: f32) -> Self {
        Self::new(id).height(height)
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Block>) -> Self {
        self.children.extend(children);
        self
    }

    fn style(&self) -> Style {
        let pad = LengthPercentage::Length(self.padding);
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            flex_shrink: 0.0,
            size: Size {
                width: Dimension::Auto,
                height: self.height.map(Dimension::Length).unwrap_or(Dimension::Auto),
            },
            padding: TaffyRect {
                left: pad,
                right: pad,
                top: pad,
                bottom: pad,
            },
            gap: Size {
                width: LengthPercentage::Length(0.0),
                height: LengthPercentage::Length(self.gap),
            },
            ..Default::default()
        }
    }
}

// =============================================================================
// PAGE LAYOUT
// =============================================================================

/// Computed absolute geometry of a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    rects: HashMap<ElementId, Rect>,
    /// Top-level blocks in document order (the page sections).
    sections: Vec<ElementId>,
    pub content_width: f32,
    pub content_height: f32,
}

impl PageLayout {
    pub fn rect(&self, id: &ElementId) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    /// Top-level sections with their rects, in document order.
    pub fn sections(&self) -> impl Iterator<Item = (&ElementId, Rect)> {
        self.sections
            .iter()
            .filter_map(|id| self.rects.get(id).map(|r| (id, *r)))
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Lay out `blocks` as a column inside a page `width` wide.
pub fn compute_page_layout(width: f32, blocks: &[Block]) -> Result<PageLayout> {
    let mut tree: TaffyTree<()> = TaffyTree::new();
    let mut nodes: Vec<(NodeId, ElementId, Option<NodeId>)> = Vec::new();

    let mut top_level = Vec::with_capacity(blocks.len());
    for block in blocks {
        top_level.push(build_node(&mut tree, block, None, &mut nodes)?);
    }

    let root_style = Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        size: Size {
            width: Dimension::Length(width),
            height: Dimension::Auto,
        },
        ..Default::default()
    };
    let root = tree
        .new_with_children(root_style, &top_level)
        .map_err(layout_error)?;

    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::MaxContent,
        },
    )
    .map_err(layout_error)?;

    // Parents are pushed after their children, so resolve absolute origins
    // top-down by walking the list in reverse.
    let mut origins: HashMap<NodeId, (f32, f32)> = HashMap::new();
    let mut rects = HashMap::with_capacity(nodes.len());
    for (node, id, parent) in nodes.iter().rev() {
        let layout = tree.layout(*node).map_err(layout_error)?;
        let (px, py) = parent
            .and_then(|p| origins.get(&p).copied())
            .unwrap_or((0.0, 0.0));
        let x = px + layout.location.x;
        let y = py + layout.location.y;
        origins.insert(*node, (x, y));
        rects.insert(
            id.clone(),
            Rect::new(x, y, layout.size.width, layout.size.height),
        );
    }

    let root_layout = tree.layout(root).map_err(layout_error)?;

    Ok(PageLayout {
        rects,
        sections: blocks.iter().map(|b| b.id.clone()).collect(),
        content_width: root_layout.size.width,
        content_height: root_layout.size.height,
    })
}

/// Build `block` and its subtree. The parent of each node is recorded after
/// the node's children, so `nodes` ends up in post-order.
fn build_node(
    tree: &mut TaffyTree<()>,
    block: &Block,
    parent: Option<NodeId>,
    nodes: &mut Vec<(NodeId, ElementId, Option<NodeId>)>,
) -> Result<NodeId> {
    let node = tree.new_leaf(block.style()).map_err(layout_error)?;

    let mut children = Vec::with_capacity(block.children.len());
    for child in &block.children {
        children.push(build_node(tree, child, Some(node), nodes)?);
    }
    if !children.is_empty() {
        tree.set_children(node, &children).map_err(layout_error)?;
    }

    nodes.push((node, block.id.clone(), parent));
    Ok(node)
}

fn layout_error(err: taffy::TaffyError) -> FolioError {
    FolioError::Layout(err.to_string())
}
