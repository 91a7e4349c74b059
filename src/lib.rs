//! Proportional rebalancing for recursive editor split layouts.
//!
//! The [`balance`] operations work on a [`LayoutTree`] value and return a new
//! tree or a reason for leaving it alone. [`command::execute`] wires them to a
//! [`LayoutProvider`] that owns the live layout.

pub mod balance;
pub mod command;
pub mod config;
pub mod error;
pub mod layout;
pub mod path;
pub mod provider;

pub use balance::{equalize_siblings, resize_node, shift_pair, Direction, Outcome, Skip};
pub use error::{BalanceError, PathFault};
pub use layout::{size_sum, LayoutNode, LayoutTree, Orientation};
pub use path::Path;
pub use provider::LayoutProvider;
