//! Rebalancing operations over a [`LayoutTree`] snapshot.
//!
//! Every operation takes the caller's tree by reference and either returns a
//! modified copy or reports why nothing changed. The caller's value is never
//! mutated.

use std::fmt;

use crate::error::{BalanceError, PathFault};
use crate::layout::{all_sized, direct_total, LayoutNode, LayoutTree, Orientation};
use crate::path::Path;

/// Fixed floor for [`resize_node`], in the tree's own unit.
pub const MIN_NODE_SIZE: f64 = 0.1;

/// Size changes smaller than this are treated as floating-point noise.
pub const RESIZE_EPSILON: f64 = 0.001;

/// Fraction of the split total used by [`shift_pair`] as both step and floor.
pub const SHIFT_FRACTION: f64 = 0.1;

/// Which of the first two siblings grows in [`shift_pair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// `(grower, shrinker)` indices within the located sibling list.
    fn indices(self) -> (usize, usize) {
        match self {
            Direction::Left => (0, 1),
            Direction::Right => (1, 0),
        }
    }
}

/// Why an operation left the tree unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skip {
    /// The root orientation does not match what the operation looks for.
    WrongOrientation,
    /// No sibling set with at least two sized entries was found.
    NoSizedSplit,
    /// The computed sizes equal the current ones.
    AlreadyBalanced,
    /// The node that would shrink or grow is already at its bound.
    AtBound,
    /// The size change is below [`RESIZE_EPSILON`].
    BelowThreshold,
    /// The target has no siblings to trade space with.
    SingleSibling,
    /// Sizes are non-finite, non-positive or otherwise inconsistent.
    Malformed,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Skip::WrongOrientation => "root orientation does not apply",
            Skip::NoSizedSplit => "no split with two or more sized groups",
            Skip::AlreadyBalanced => "sizes already balanced",
            Skip::AtBound => "target already at its size bound",
            Skip::BelowThreshold => "size change below threshold",
            Skip::SingleSibling => "target has no siblings",
            Skip::Malformed => "sibling sizes are inconsistent",
        };
        f.write_str(msg)
    }
}

/// Result of a balancing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Changed(LayoutTree),
    Unchanged(Skip),
}

impl Outcome {
    pub fn into_tree(self) -> Option<LayoutTree> {
        match self {
            Outcome::Changed(tree) => Some(tree),
            Outcome::Unchanged(_) => None,
        }
    }
}

/// Where [`shift_pair`] found its sibling list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SplitLocation {
    Root,
    Group(usize),
}

// ---------------------------------------------------------------------------
// equalize-siblings
// ---------------------------------------------------------------------------

/// Give every fully sized split one level below a vertical root equal shares.
///
/// Shares are whole units: each child gets `floor(total / n)` and the first
/// `total mod n` children get one extra unit. A fractional remainder counts
/// as a whole unit, so `[0.2, 0.2]` becomes `[1, 0]`. Every qualifying root
/// group is processed.
pub fn equalize_siblings(tree: &LayoutTree) -> Outcome {
    if tree.orientation != Orientation::Vertical {
        tracing::debug!(orientation = ?tree.orientation, "equalize: root is not vertical");
        return Outcome::Unchanged(Skip::WrongOrientation);
    }

    let mut next = tree.clone();
    let mut qualified = false;
    let mut malformed = false;
    let mut changed = false;

    for (gi, group) in next.groups.iter_mut().enumerate() {
        if !group.has_sized_split() {
            continue;
        }
        let Some(shares) = equal_shares(&group.children) else {
            tracing::debug!(group = gi, "equalize: unusable sibling total");
            malformed = true;
            continue;
        };
        qualified = true;
        for (child, share) in group.children.iter_mut().zip(shares) {
            if child.size != Some(share) {
                tracing::trace!(group = gi, from = ?child.size, to = share, "equalize");
                child.size = Some(share);
                changed = true;
            }
        }
    }

    if changed {
        Outcome::Changed(next)
    } else if qualified {
        Outcome::Unchanged(Skip::AlreadyBalanced)
    } else if malformed {
        Outcome::Unchanged(Skip::Malformed)
    } else {
        Outcome::Unchanged(Skip::NoSizedSplit)
    }
}

/// Whole-unit equal shares for a fully sized sibling list, remainder going to
/// the leftmost entries.
fn equal_shares(siblings: &[LayoutNode]) -> Option<Vec<f64>> {
    let total = direct_total(siblings)?;
    if !total.is_finite() || total < 0.0 || siblings.is_empty() {
        return None;
    }
    let count = siblings.len();
    let base = (total / count as f64).floor();
    let remainder = ((total - base * count as f64).ceil() as usize).min(count);
    Some(
        (0..count)
            .map(|i| if i < remainder { base + 1.0 } else { base })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// shift-pair
// ---------------------------------------------------------------------------

/// Move a step of space between the first two siblings of the located split.
///
/// The split is the root level when the root is horizontal with two or more
/// sized groups; otherwise the first root group whose children are a fully
/// sized split. The step and the floor are both `max(1, floor(total * 0.1))`,
/// and the shrinker gives up `min(step, shrinker - floor)`: `[60, 40]` shifted
/// left becomes `[70, 30]`.
pub fn shift_pair(tree: &LayoutTree, direction: Direction) -> Outcome {
    let mut next = tree.clone();
    let Some((location, siblings)) = locate_pair_split(&mut next) else {
        tracing::debug!("shift: no sized split found");
        return Outcome::Unchanged(Skip::NoSizedSplit);
    };

    let Some(total) = direct_total(siblings) else {
        return Outcome::Unchanged(Skip::Malformed);
    };
    if !total.is_finite() || total <= 0.0 {
        return Outcome::Unchanged(Skip::Malformed);
    }

    let floor_size = (total * SHIFT_FRACTION).floor().max(1.0);
    let step = floor_size;
    let (grow, shrink) = direction.indices();

    let (Some(grow_size), Some(shrink_size)) = (siblings[grow].size, siblings[shrink].size)
    else {
        return Outcome::Unchanged(Skip::Malformed);
    };
    if shrink_size <= floor_size {
        tracing::debug!(?location, shrink_size, floor_size, "shift: shrinker at floor");
        return Outcome::Unchanged(Skip::AtBound);
    }

    let delta = step.min(shrink_size - floor_size);
    if delta <= 0.0 {
        return Outcome::Unchanged(Skip::AtBound);
    }

    siblings[grow].size = Some(grow_size + delta);
    siblings[shrink].size = Some(shrink_size - delta);
    tracing::debug!(?location, ?direction, total, delta, "shift: applied");
    Outcome::Changed(next)
}

fn locate_pair_split(tree: &mut LayoutTree) -> Option<(SplitLocation, &mut Vec<LayoutNode>)> {
    if tree.orientation == Orientation::Horizontal
        && tree.groups.len() >= 2
        && all_sized(&tree.groups)
    {
        return Some((SplitLocation::Root, &mut tree.groups));
    }
    tree.groups
        .iter_mut()
        .enumerate()
        .find(|(_, group)| group.has_sized_split())
        .map(|(gi, group)| (SplitLocation::Group(gi), &mut group.children))
}

// ---------------------------------------------------------------------------
// resize-node
// ---------------------------------------------------------------------------

/// Grow or shrink the node at `path` by `delta`, taking the difference from
/// its siblings in proportion to their current sizes.
///
/// The target is clamped to `[MIN_NODE_SIZE, total - (n - 1) * MIN_NODE_SIZE]`
/// and each sibling is floored at [`MIN_NODE_SIZE`] afterwards; a sibling that
/// hits the floor is not compensated elsewhere, so the sum may drift.
pub fn resize_node(tree: &LayoutTree, path: &Path, delta: f64) -> Result<Outcome, BalanceError> {
    if !delta.is_finite() {
        return Err(BalanceError::InvalidDelta(delta));
    }

    let mut next = tree.clone();
    let (siblings, target) = next
        .siblings_of_mut(path)
        .map_err(|fault| BalanceError::path_invalid(path, fault))?;
    let old = siblings[target]
        .size
        .ok_or_else(|| BalanceError::path_invalid(path, PathFault::UnsizedTarget))?;

    let count = siblings.len();
    if count < 2 {
        return Ok(Outcome::Unchanged(Skip::SingleSibling));
    }

    let total: f64 = siblings.iter().filter_map(|s| s.size).sum();
    let total_other: f64 = siblings
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .filter_map(|(_, s)| s.size)
        .sum();
    if !total.is_finite() || total_other <= 0.0 {
        return Ok(Outcome::Unchanged(Skip::Malformed));
    }

    let max_size = total - (count - 1) as f64 * MIN_NODE_SIZE;
    if max_size < MIN_NODE_SIZE {
        return Ok(Outcome::Unchanged(Skip::AtBound));
    }

    let new = (old + delta).clamp(MIN_NODE_SIZE, max_size);
    let diff = new - old;
    if diff.abs() < RESIZE_EPSILON {
        let skip = if delta.abs() < RESIZE_EPSILON {
            Skip::BelowThreshold
        } else {
            Skip::AtBound
        };
        tracing::debug!(%path, old, delta, ?skip, "resize: no effective change");
        return Ok(Outcome::Unchanged(skip));
    }

    siblings[target].size = Some(new);
    for (i, sibling) in siblings.iter_mut().enumerate() {
        if i == target {
            continue;
        }
        if let Some(size) = sibling.size {
            let adjusted = (size - diff * (size / total_other)).max(MIN_NODE_SIZE);
            tracing::trace!(index = i, from = size, to = adjusted, "resize: sibling");
            sibling.size = Some(adjusted);
        }
    }

    tracing::debug!(%path, old, new, total, "resize: applied");
    Ok(Outcome::Changed(next))
}
