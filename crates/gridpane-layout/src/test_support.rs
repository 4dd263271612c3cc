// ABOUTME: Fake grid surface used by the layout unit tests.
// ABOUTME: Every surface of one tree shares a focus owner, so focusing one unfocuses the rest.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gridpane_core::Size;

use crate::PaneContent;

const NOBODY: u64 = u64::MAX;

#[derive(Debug)]
pub(crate) struct FakeSurface {
    pub(crate) tag: u64,
    focus: Arc<AtomicU64>,
    min: Size,
    cell: Size,
    pub(crate) last_size: Size,
    pub(crate) font: u32,
    pub(crate) close_on_exit: bool,
}

impl PaneContent for FakeSurface {
    type Settings = u32;

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

    fn update_settings(&mut self, settings: &u32) {
        self.font = *settings;
    }

    fn close_on_exit(&self) -> bool {
        self.close_on_exit
    }
}

/// Factory for surfaces sharing one focus owner
pub(crate) struct Surfaces {
    focus: Arc<AtomicU64>,
    next_tag: u64,
    min: Size,
    cell: Size,
}

impl Surfaces {
    pub(crate) fn new(min: Size, cell: Size) -> Self {
        Self {
            focus: Arc::new(AtomicU64::new(NOBODY)),
            next_tag: 0,
            min,
            cell,
        }
    }

    pub(crate) fn make(&mut self) -> FakeSurface {
        self.make_with(self.min, self.cell)
    }

    pub(crate) fn make_with(&mut self, min: Size, cell: Size) -> FakeSurface {
        let tag = self.next_tag;
        self.next_tag += 1;
        FakeSurface {
            tag,
            focus: Arc::clone(&self.focus),
            min,
            cell,
            last_size: Size::ZERO,
            font: 0,
            close_on_exit: true,
        }
    }

    pub(crate) fn focused_tag(&self) -> Option<u64> {
        let tag = self.focus.load(Ordering::SeqCst);
        (tag != NOBODY).then_some(tag)
    }
}
