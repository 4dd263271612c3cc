// ABOUTME: Pane layout management for split terminal panels.
// ABOUTME: Binary split tree whose pane sizes snap to each surface's character grid.

mod content;
mod direction;
mod shared;
mod snap;
mod tree;

#[cfg(test)]
mod test_support;

pub use content::{ContentEvent, PaneContent};
pub use direction::{Direction, SplitState};
pub use shared::SharedLayout;
pub use snap::SnapBounds;
pub use tree::{CloseOutcome, LayoutTree, PaneId, ProfileId};
