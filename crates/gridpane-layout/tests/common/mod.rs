// ABOUTME: Grid surface stand-in shared by the layout integration tests.
// ABOUTME: Surfaces built by one factory share a focus owner like widgets in one window.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gridpane_core::Size;
use gridpane_layout::PaneContent;

const NOBODY: u64 = u64::MAX;

#[derive(Debug)]
pub struct GridSurface {
    pub tag: u64,
    focus: Arc<AtomicU64>,
    pub min: Size,
    pub cell: Size,
    pub last_size: Size,
}

impl PaneContent for GridSurface {
    type Settings = ();

    fn minimum_size(&self) -> Size {
        self.min
    }

    fn cell_size(&self) -> Size {
        self.cell
    }

    fn is_focused(&self) -> bool {
        self.focus.load(Ordering::SeqCst) == self.tag
    }

    fn focus(&mut self) {
        self.focus.store(self.tag, Ordering::SeqCst);
    }

    fn resize(&mut self, size: Size) {
        self.last_size = size;
    }

    fn update_settings(&mut self, _settings: &()) {}
}

pub struct SurfaceFactory {
    focus: Arc<AtomicU64>,
    next_tag: u64,
    pub min: Size,
    pub cell: Size,
}

impl SurfaceFactory {
    pub fn new(min: Size, cell: Size) -> Self {
        Self {
            focus: Arc::new(AtomicU64::new(NOBODY)),
            next_tag: 0,
            min,
            cell,
        }
    }

    pub fn make(&mut self) -> GridSurface {
        let tag = self.next_tag;
        self.next_tag += 1;
        GridSurface {
            tag,
            focus: Arc::clone(&self.focus),
            min: self.min,
            cell: self.cell,
            last_size: Size::ZERO,
        }
    }
}
