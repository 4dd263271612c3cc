// ABOUTME: The capability set a pane tree needs from the surface hosted in a leaf.
// ABOUTME: Also defines the notifications a surface sends back to the tree.

use gridpane_core::Size;

use crate::PaneId;

/// A surface hosted by a leaf pane, typically a terminal grid.
pub trait PaneContent {
    /// Settings pushed to every leaf of a matching profile
    type Settings;

    /// Smallest size, in pixels, the surface can be laid out at.
    fn minimum_size(&self) -> Size;

    /// Pixel size of one character cell.
    fn cell_size(&self) -> Size;

    fn is_focused(&self) -> bool;

    /// Ask the surface to take input focus.
    fn focus(&mut self);

    /// Largest grid-aligned size not exceeding `proposed` along one axis.
    fn snap_dimension_to_grid(&self, along_width: bool, proposed: f32) -> f32 {
        let cell = self.cell_size().along(along_width);
        if cell <= 0.0 {
            return proposed;
        }
        (proposed / cell).floor() * cell
    }

    /// Called with the pixel size assigned on every layout pass.
    fn resize(&mut self, _size: Size) {}

    fn update_settings(&mut self, settings: &Self::Settings);

    /// Whether the pane should be removed when the surface reports it closed.
    fn close_on_exit(&self) -> bool {
        true
    }
}

/// Notifications raised by hosted surfaces, possibly from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEvent {
    /// The surface terminated; its pane should be removed
    Closed(PaneId),
    /// Cell metrics changed. `initial` marks the first real metrics, which
    /// require the whole tree to be laid out again.
    FontSizeChanged { pane: PaneId, initial: bool },
}
