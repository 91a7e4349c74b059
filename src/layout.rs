use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::PathFault;
use crate::path::Path;

/// Axis along which a sibling set is laid out. Serialized as the host's
/// integer enum (`0` = horizontal, `1` = vertical).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Children of a composite node are laid out on the orthogonal axis.
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

impl TryFrom<u8> for Orientation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Orientation::Horizontal),
            1 => Ok(Orientation::Vertical),
            other => Err(format!("unknown orientation {other}, expected 0 or 1")),
        }
    }
}

impl From<Orientation> for u8 {
    fn from(o: Orientation) -> Self {
        match o {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, rename = "groups", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    pub fn leaf(size: f64) -> Self {
        Self {
            size: Some(size),
            children: Vec::new(),
        }
    }

    pub fn unsized_leaf() -> Self {
        Self::default()
    }

    pub fn composite(size: Option<f64>, children: Vec<LayoutNode>) -> Self {
        Self { size, children }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Size this node contributes to its parent's total. A node with two or
    /// more sized children reports the sum of those children and ignores its
    /// own `size`.
    pub fn effective_size(&self) -> Option<f64> {
        let sized = self.children.iter().filter(|c| c.size.is_some()).count();
        if sized >= 2 {
            Some(size_sum(&self.children))
        } else {
            self.size
        }
    }

    /// True when this node is a split of two or more children that all carry
    /// a size.
    pub fn has_sized_split(&self) -> bool {
        self.children.len() > 1 && all_sized(&self.children)
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(LayoutNode::leaf_count).sum()
        }
    }
}

/// Sum of the effective sizes of a sibling list. Unsized entries contribute
/// nothing; an empty list sums to zero.
pub fn size_sum(siblings: &[LayoutNode]) -> f64 {
    siblings.iter().filter_map(LayoutNode::effective_size).sum()
}

/// Sum of the siblings' own `size` fields, or `None` if any is unsized.
pub fn direct_total(siblings: &[LayoutNode]) -> Option<f64> {
    siblings.iter().map(|s| s.size).sum()
}

pub fn all_sized(siblings: &[LayoutNode]) -> bool {
    siblings.iter().all(|s| s.size.is_some())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutTree {
    pub orientation: Orientation,
    #[serde(default)]
    pub groups: Vec<LayoutNode>,
}

impl LayoutTree {
    pub fn new(orientation: Orientation, groups: Vec<LayoutNode>) -> Self {
        Self {
            orientation,
            groups,
        }
    }

    /// Reducer total over the root groups.
    pub fn total_size(&self) -> f64 {
        size_sum(&self.groups)
    }

    pub fn leaf_count(&self) -> usize {
        self.groups.iter().map(LayoutNode::leaf_count).sum()
    }

    /// Resolve a path to the sibling list holding its target, returning the
    /// list and the target's index within it.
    pub fn siblings_of_mut(
        &mut self,
        path: &Path,
    ) -> Result<(&mut Vec<LayoutNode>, usize), PathFault> {
        let (&last, parents) = path.indices().split_last().ok_or(PathFault::Empty)?;
        let mut siblings = &mut self.groups;
        for (depth, &index) in parents.iter().enumerate() {
            let len = siblings.len();
            let node = siblings
                .get_mut(index)
                .ok_or(PathFault::OutOfRange { depth, index, len })?;
            if node.is_leaf() {
                return Err(PathFault::NotComposite { depth });
            }
            siblings = &mut node.children;
        }
        if last >= siblings.len() {
            return Err(PathFault::OutOfRange {
                depth: parents.len(),
                index: last,
                len: siblings.len(),
            });
        }
        Ok((siblings, last))
    }

    /// Orientation of the sibling list that holds the node at `path`.
    pub fn orientation_at(&self, path: &Path) -> Orientation {
        let depth = path.indices().len().saturating_sub(1);
        (0..depth).fold(self.orientation, |o, _| o.flipped())
    }

    /// Indented text dump of the tree, one line per node.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "layout: {} ({} root groups, {} panes, total {})",
            self.orientation.label(),
            self.groups.len(),
            self.leaf_count(),
            format_size(Some(self.total_size())),
        );
        self.describe_siblings(&self.groups, &Path::root(), &mut out);
        out
    }

    fn describe_siblings(&self, siblings: &[LayoutNode], parent: &Path, out: &mut String) {
        for (i, node) in siblings.iter().enumerate() {
            let path = parent.child(i);
            let indent = "  ".repeat(path.indices().len());
            if node.is_leaf() {
                let _ = writeln!(out, "{indent}[{path}] pane size={}", format_size(node.size));
            } else {
                let inner = self.orientation_at(&path.child(0));
                let _ = writeln!(
                    out,
                    "{indent}[{path}] group size={} children={} ({}) sum={}",
                    format_size(node.size),
                    node.children.len(),
                    inner.label(),
                    format_size(Some(size_sum(&node.children))),
                );
                self.describe_siblings(&node.children, &path, out);
            }
        }
    }
}

fn format_size(size: Option<f64>) -> String {
    match size {
        Some(s) if s.fract() == 0.0 => format!("{s:.0}"),
        Some(s) => format!("{s:.3}"),
        None => "-".to_string(),
    }
}
