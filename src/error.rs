//! Error types for balancing operations.
//!
//! "No change" results are not errors: they come back as
//! [`Outcome::Unchanged`](crate::balance::Outcome) with a
//! [`Skip`](crate::balance::Skip) reason. The types here cover caller bugs
//! such as a stale path coming from the layout view.

use crate::path::Path;

/// Why a path failed to resolve against a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathFault {
    /// The path has no indices, so there is no target node.
    #[error("path is empty")]
    Empty,

    /// An index points past the end of its sibling list.
    #[error("index {index} out of range at depth {depth} ({len} siblings)")]
    OutOfRange {
        depth: usize,
        index: usize,
        len: usize,
    },

    /// A non-final index names a leaf, which has no children to descend into.
    #[error("node at depth {depth} has no children")]
    NotComposite { depth: usize },

    /// The target exists but carries no size.
    #[error("target node has no size")]
    UnsizedTarget,
}

/// Errors returned by balancing operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BalanceError {
    /// The supplied path does not resolve to a sized node.
    #[error("invalid path [{path}]: {fault}")]
    PathInvalid {
        path: Path,
        #[source]
        fault: PathFault,
    },

    /// The resize delta is NaN or infinite.
    #[error("invalid resize delta: {0}")]
    InvalidDelta(f64),
}

impl BalanceError {
    pub fn path_invalid(path: &Path, fault: PathFault) -> Self {
        Self::PathInvalid {
            path: path.clone(),
            fault,
        }
    }

    /// Returns true for errors caused by a stale or malformed path.
    #[must_use]
    pub const fn is_path_invalid(&self) -> bool {
        matches!(self, Self::PathInvalid { .. })
    }
}
