//! Property-based tests for the balancing operations.

use pane_balance::balance::{MIN_NODE_SIZE, RESIZE_EPSILON};
use pane_balance::{
    equalize_siblings, resize_node, shift_pair, BalanceError, Direction, LayoutNode, LayoutTree,
    Orientation, Outcome, Path, Skip,
};
use proptest::prelude::*;

// ============================================================================
// Test Strategies
// ============================================================================

/// Whole-unit sibling sizes, as the equalize and shift operations expect.
fn unit_sizes_strategy() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..200, 2..8)
}

/// Fractional sibling sizes that sum to roughly one.
fn fraction_sizes_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(1u32..100, 2..6).prop_map(|weights| {
        let total: u32 = weights.iter().sum();
        weights
            .into_iter()
            .map(|w| f64::from(w) / f64::from(total))
            .collect()
    })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Left), Just(Direction::Right)]
}

fn leaves(sizes: &[f64]) -> Vec<LayoutNode> {
    sizes.iter().copied().map(LayoutNode::leaf).collect()
}

fn vertical_split(sizes: &[u32]) -> LayoutTree {
    let sizes: Vec<f64> = sizes.iter().copied().map(f64::from).collect();
    LayoutTree::new(
        Orientation::Vertical,
        vec![LayoutNode::composite(None, leaves(&sizes))],
    )
}

fn sizes_of(nodes: &[LayoutNode]) -> Vec<f64> {
    nodes.iter().map(|n| n.size.unwrap()).collect()
}

// ============================================================================
// equalize-siblings
// ============================================================================

proptest! {
    #[test]
    fn equalize_preserves_sum_and_biases_remainder(sizes in unit_sizes_strategy()) {
        let tree = vertical_split(&sizes);
        let total: u32 = sizes.iter().sum();
        let n = sizes.len() as u32;
        let base = f64::from(total / n);
        let extra = (total % n) as usize;

        let result = match equalize_siblings(&tree) {
            Outcome::Changed(next) => sizes_of(&next.groups[0].children),
            Outcome::Unchanged(skip) => {
                prop_assert_eq!(skip, Skip::AlreadyBalanced);
                sizes_of(&tree.groups[0].children)
            }
        };

        prop_assert_eq!(result.iter().sum::<f64>(), f64::from(total));
        for (i, size) in result.iter().enumerate() {
            let expected = if i < extra { base + 1.0 } else { base };
            prop_assert_eq!(*size, expected);
        }
    }

    #[test]
    fn equalize_is_idempotent(sizes in unit_sizes_strategy()) {
        let tree = vertical_split(&sizes);
        if let Outcome::Changed(once) = equalize_siblings(&tree) {
            prop_assert_eq!(equalize_siblings(&once), Outcome::Unchanged(Skip::AlreadyBalanced));
        }
    }
}

// ============================================================================
// shift-pair
// ============================================================================

proptest! {
    #[test]
    fn shift_respects_floor(sizes in unit_sizes_strategy(), direction in direction_strategy()) {
        let values: Vec<f64> = sizes.iter().copied().map(f64::from).collect();
        let tree = LayoutTree::new(Orientation::Horizontal, leaves(&values));
        let total: f64 = values.iter().sum();
        let floor_size = (total * 0.1).floor().max(1.0);

        match shift_pair(&tree, direction) {
            Outcome::Changed(next) => {
                let after = sizes_of(&next.groups);
                prop_assert!(after[0] >= floor_size.min(values[0]));
                prop_assert!(after[1] >= floor_size.min(values[1]));
                prop_assert_eq!(after.iter().sum::<f64>(), total);
                prop_assert_eq!(&after[2..], &values[2..]);
            }
            Outcome::Unchanged(_) => {
                let shrinker = match direction {
                    Direction::Left => values[1],
                    Direction::Right => values[0],
                };
                prop_assert!(shrinker <= floor_size || total <= 0.0);
            }
        }
    }

    #[test]
    fn shift_never_moves_shrinker_below_floor(a in 10u32..1000, direction in direction_strategy()) {
        // Totals of 110 and up put the floor above the 10-unit shrinker.
        let values = match direction {
            Direction::Left => vec![f64::from(a) + 90.0, 10.0],
            Direction::Right => vec![10.0, f64::from(a) + 90.0],
        };
        let tree = LayoutTree::new(Orientation::Horizontal, leaves(&values));
        prop_assert_eq!(shift_pair(&tree, direction), Outcome::Unchanged(Skip::AtBound));
    }
}

// ============================================================================
// resize-node
// ============================================================================

proptest! {
    #[test]
    fn resize_keeps_target_in_bounds(
        sizes in fraction_sizes_strategy(),
        index in 0usize..6,
        delta in -1.0f64..1.0,
    ) {
        let index = index % sizes.len();
        let tree = LayoutTree::new(Orientation::Horizontal, leaves(&sizes));
        let total: f64 = sizes.iter().sum();
        let max_size = total - (sizes.len() - 1) as f64 * MIN_NODE_SIZE;

        match resize_node(&tree, &Path::from(vec![index]), delta).unwrap() {
            Outcome::Changed(next) => {
                let after = sizes_of(&next.groups);
                prop_assert!(after[index] >= MIN_NODE_SIZE - 1e-12);
                prop_assert!(after[index] <= max_size + 1e-12);
                prop_assert!((after[index] - sizes[index]).abs() >= RESIZE_EPSILON);
                for (i, size) in after.iter().enumerate() {
                    if i != index {
                        prop_assert!(*size >= MIN_NODE_SIZE);
                    }
                }
            }
            Outcome::Unchanged(skip) => {
                let expected = matches!(skip, Skip::BelowThreshold | Skip::AtBound);
                prop_assert!(expected, "unexpected skip {:?}", skip);
            }
        }
    }

    #[test]
    fn resize_jitter_is_ignored(
        count in 2usize..6,
        index in 0usize..6,
        delta in -0.0009f64..0.0009,
    ) {
        let sizes = vec![1.0 / count as f64; count];
        let tree = LayoutTree::new(Orientation::Horizontal, leaves(&sizes));
        let outcome = resize_node(&tree, &Path::from(vec![index % count]), delta).unwrap();
        prop_assert_eq!(outcome, Outcome::Unchanged(Skip::BelowThreshold));
    }

    #[test]
    fn resize_out_of_range_first_index(sizes in fraction_sizes_strategy(), extra in 0usize..10) {
        let tree = LayoutTree::new(Orientation::Horizontal, leaves(&sizes));
        let path = Path::from(vec![sizes.len() + extra, 0]);
        let result = resize_node(&tree, &path, 0.1);
        let invalid = matches!(result, Err(BalanceError::PathInvalid { .. }));
        prop_assert!(invalid, "expected PathInvalid, got {:?}", result);
    }
}
