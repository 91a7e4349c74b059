use std::fmt;

use anyhow::Result;

use crate::balance::{self, Direction, Outcome, Skip};
use crate::config::Behavior;
use crate::path::Path;
use crate::provider::LayoutProvider;

/// One user gesture against the live layout.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Equalize,
    Shift(Direction),
    Resize { path: Path, delta: f64 },
    Expand(Path),
    Contract(Path),
    /// The host's active editor changed.
    FocusChanged,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Equalize => write!(f, "equalize"),
            Command::Shift(Direction::Left) => write!(f, "shift left"),
            Command::Shift(Direction::Right) => write!(f, "shift right"),
            Command::Resize { path, delta } => write!(f, "resize [{path}] by {delta}"),
            Command::Expand(path) => write!(f, "expand [{path}]"),
            Command::Contract(path) => write!(f, "contract [{path}]"),
            Command::FocusChanged => write!(f, "focus changed"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
    /// The layout was rewritten.
    Applied,
    /// Nothing to do; the layout was left alone.
    Skipped(Skip),
    /// The command is switched off by configuration.
    Disabled,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Applied => write!(f, "layout updated"),
            Report::Skipped(skip) => write!(f, "no change: {skip}"),
            Report::Disabled => write!(f, "no change: disabled by configuration"),
        }
    }
}

/// Read the live layout, run `command` against it, and write the result back
/// if anything changed.
pub fn execute<P: LayoutProvider + ?Sized>(
    provider: &mut P,
    command: &Command,
    behavior: &Behavior,
) -> Result<Report> {
    if *command == Command::FocusChanged && !behavior.equalize_on_focus_change {
        return Ok(Report::Disabled);
    }

    let tree = provider.layout_tree()?;
    let outcome = match command {
        Command::Equalize | Command::FocusChanged => balance::equalize_siblings(&tree),
        Command::Shift(direction) => balance::shift_pair(&tree, *direction),
        Command::Resize { path, delta } => balance::resize_node(&tree, path, *delta)?,
        Command::Expand(path) => balance::resize_node(&tree, path, behavior.resize_step)?,
        Command::Contract(path) => balance::resize_node(&tree, path, -behavior.resize_step)?,
    };

    match outcome {
        Outcome::Changed(next) => {
            provider.set_layout_tree(&next)?;
            tracing::info!(%command, "layout updated");
            Ok(Report::Applied)
        }
        Outcome::Unchanged(skip) => {
            tracing::info!(%command, %skip, "layout unchanged");
            Ok(Report::Skipped(skip))
        }
    }
}
