// ABOUTME: Headless character grid surface hosted in each leaf pane.
// ABOUTME: Tracks its grid dimensions and keeps per-row cell attributes run-length encoded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gridpane_core::{Size, SurfaceSettings};
use gridpane_layout::PaneContent;
use gridpane_rle::RunStore;

/// Attribute index stored per cell (0 = default colors)
pub type Attr = u8;

const NO_FOCUS: u64 = u64::MAX;

/// Focus owner shared by every surface in one window
#[derive(Debug, Clone)]
pub struct FocusRing(Arc<AtomicU64>);

impl FocusRing {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(NO_FOCUS)))
    }

    fn owner(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn take(&self, tag: u64) {
        self.0.store(tag, Ordering::SeqCst);
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct GridSurface {
    tag: u64,
    focus: FocusRing,
    metrics: SurfaceSettings,
    columns: usize,
    rows: usize,
    /// One attribute store per row
    attributes: Vec<RunStore<Attr>>,
    close_on_exit: bool,
}

impl GridSurface {
    pub fn new(tag: u64, focus: FocusRing, metrics: SurfaceSettings) -> Self {
        Self {
            tag,
            focus,
            metrics,
            columns: 0,
            rows: 0,
            attributes: Vec::new(),
            close_on_exit: true,
        }
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn set_close_on_exit(&mut self, close: bool) {
        self.close_on_exit = close;
    }

    pub fn row(&self, row: usize) -> Option<&RunStore<Attr>> {
        self.attributes.get(row)
    }

    /// Total runs across all rows.
    pub fn attribute_runs(&self) -> usize {
        self.attributes.iter().map(|row| row.runs().len()).sum()
    }

    /// Paint `len` cells of `row` starting at `column`, clipped to the grid.
    pub fn paint(&mut self, row: usize, column: usize, len: usize, attr: Attr) {
        let columns = self.columns;
        let Some(store) = self.attributes.get_mut(row) else {
            return;
        };
        if column >= columns {
            return;
        }
        store.replace(column, len.min(columns - column), attr);
    }

    /// Reset a row from `column` to the end.
    pub fn clear_row(&mut self, row: usize, column: usize) {
        if let Some(store) = self.attributes.get_mut(row) {
            if column <= store.len() {
                store.fill(0, column);
            }
        }
    }

    /// Scroll everything up one row, inserting a blank row at the bottom.
    pub fn scroll_up(&mut self) {
        if self.attributes.is_empty() {
            return;
        }
        self.attributes.remove(0);
        self.attributes.push(RunStore::with_value(self.columns, 0));
    }

    fn grid_extent(&self, pixels: f32, cell: f32) -> usize {
        let usable = pixels - 2.0 * self.metrics.padding;
        if cell <= 0.0 || usable < cell {
            return 1;
        }
        (usable / cell).floor() as usize
    }

    fn resize_grid(&mut self, columns: usize, rows: usize) {
        if columns != self.columns {
            for row in &mut self.attributes {
                row.resize(columns);
            }
        }
        self.attributes.truncate(rows);
        while self.attributes.len() < rows {
            self.attributes.push(RunStore::with_value(columns, 0));
        }
        self.columns = columns;
        self.rows = rows;
    }
}

impl PaneContent for GridSurface {
    type Settings = SurfaceSettings;

    fn minimum_size(&self) -> Size {
        let frame = 2.0 * self.metrics.padding;
        Size::new(
            self.metrics.cell_width + frame,
            self.metrics.cell_height + frame,
        )
    }

    fn cell_size(&self) -> Size {
        Size::new(self.metrics.cell_width, self.metrics.cell_height)
    }

    fn is_focused(&self) -> bool {
        self.focus.owner() == self.tag
    }

    fn focus(&mut self) {
        self.focus.take(self.tag);
    }

    fn snap_dimension_to_grid(&self, along_width: bool, proposed: f32) -> f32 {
        let cell = self.cell_size().along(along_width);
        let frame = 2.0 * self.metrics.padding;
        if cell <= 0.0 {
            return proposed;
        }
        ((proposed - frame) / cell).floor() * cell + frame
    }

    fn resize(&mut self, size: Size) {
        let columns = self.grid_extent(size.width, self.metrics.cell_width);
        let rows = self.grid_extent(size.height, self.metrics.cell_height);
        if columns != self.columns || rows != self.rows {
            tracing::debug!(
                "Surface {} resized to {}x{} cells",
                self.tag,
                columns,
                rows
            );
            self.resize_grid(columns, rows);
        }
    }

    fn update_settings(&mut self, settings: &SurfaceSettings) {
        self.metrics = settings.clone();
    }

    fn close_on_exit(&self) -> bool {
        self.close_on_exit
    }
}
