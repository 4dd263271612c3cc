// ABOUTME: Headless gridpane host.
// ABOUTME: Lays out a window of grid surfaces, drives a scripted session and prints the layout as JSON.

mod surface;

use std::thread;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use gridpane_core::{Config, Rect, Size};
use gridpane_layout::{
    CloseOutcome, ContentEvent, Direction, LayoutTree, PaneId, ProfileId, SharedLayout, SplitState,
};
use gridpane_rle::RunStore;
use surface::{Attr, FocusRing, GridSurface};

const DEFAULT_PROFILE: ProfileId = ProfileId(0);
const ALT_PROFILE: ProfileId = ProfileId(1);

#[derive(Debug, Serialize)]
struct PaneSnapshot {
    id: u64,
    surface: u64,
    profile: u64,
    rect: Rect,
    columns: usize,
    rows: usize,
    focused: bool,
    attribute_runs: usize,
    first_row: Option<RunStore<Attr>>,
}

#[derive(Debug, Serialize)]
struct LayoutSnapshot {
    window: Size,
    min_size: Size,
    panes: Vec<PaneSnapshot>,
}

struct Host {
    config: Config,
    layout: SharedLayout<GridSurface>,
    focus: FocusRing,
    next_tag: u64,
}

impl Host {
    fn new(config: Config) -> Self {
        let focus = FocusRing::new();
        let root = GridSurface::new(0, focus.clone(), config.surface.clone());
        let mut tree = LayoutTree::new(config.layout.clone(), DEFAULT_PROFILE, root);
        if let Some(id) = tree.focused_pane() {
            tree.focus_pane(id);
        }

        Self {
            config,
            layout: SharedLayout::new(tree),
            focus,
            next_tag: 1,
        }
    }

    fn new_surface(&mut self) -> GridSurface {
        let tag = self.next_tag;
        self.next_tag += 1;
        GridSurface::new(tag, self.focus.clone(), self.config.surface.clone())
    }

    /// Lay the window out, rounded to whole cells in every pane.
    fn resize_window(&self, width: f32, height: f32) {
        let mut tree = self.layout.lock();
        let size = Size::new(
            tree.snap_dimension(true, width),
            tree.snap_dimension(false, height),
        );
        tracing::info!(
            "Window {}x{} snapped to {}x{}",
            width,
            height,
            size.width,
            size.height
        );
        tree.resize_content(size);
    }

    /// Split the focused pane and move focus into the new one.
    fn split(&mut self, state: SplitState, profile: ProfileId) -> Option<PaneId> {
        let content = self.new_surface();
        let mut tree = self.layout.lock();
        let id = tree.split(state, profile, content)?;
        tree.focus_pane(id);
        Some(id)
    }

    /// Paint a two-tone prompt on the focused pane's first row.
    fn type_prompt(&self, attr: Attr) {
        let mut tree = self.layout.lock();
        if let Some(surface) = tree.focused_content_mut() {
            surface.paint(0, 0, 2, attr);
            surface.paint(0, 2, 6, attr + 1);
        }
    }

    /// Scripted session. Returns the outcomes of the surface exit reports.
    fn run(&mut self) -> Result<Vec<Option<CloseOutcome>>> {
        let width = self.config.window_width as f32;
        let height = self.config.window_height as f32;
        self.resize_window(width, height);
        self.type_prompt(1);

        self.split(SplitState::Vertical, DEFAULT_PROFILE)
            .context("window too narrow for a vertical split")?;
        self.type_prompt(3);
        let bottom = self
            .split(SplitState::Horizontal, ALT_PROFILE)
            .context("pane too short for a horizontal split")?;
        self.type_prompt(5);

        {
            let mut tree = self.layout.lock();
            tree.navigate_focus(Direction::Left);
            if let Some(surface) = tree.focused_content_mut() {
                surface.scroll_up();
                surface.clear_row(0, 4);
            }
            tree.resize_pane(Direction::Right);
            tree.resize_pane(Direction::Right);
        }

        let scratch = self
            .split(SplitState::Horizontal, DEFAULT_PROFILE)
            .context("pane too short for a horizontal split")?;
        if let Some(surface) = self.layout.lock().content_mut(scratch) {
            surface.set_close_on_exit(false);
        }

        // Taller cells for the alternate profile; its pane asks for a relayout.
        let mut metrics = self.config.surface.clone();
        metrics.cell_height += 2.0;
        self.layout.lock().update_settings(&metrics, ALT_PROFILE);
        self.layout.notify(ContentEvent::FontSizeChanged {
            pane: bottom,
            initial: true,
        });

        // Shells exit on their own threads; one exit gets reported twice.
        let layout = self.layout.clone();
        let watcher = thread::spawn(move || {
            vec![
                layout.notify(ContentEvent::Closed(bottom)),
                layout.notify(ContentEvent::Closed(bottom)),
                layout.notify(ContentEvent::Closed(scratch)),
            ]
        });
        let outcomes = watcher
            .join()
            .map_err(|_| anyhow!("exit watcher panicked"))?;
        tracing::info!("Exit reports resolved as {:?}", outcomes);

        self.resize_window(width * 0.8, height * 0.9);
        Ok(outcomes)
    }

    fn snapshot(&self) -> LayoutSnapshot {
        let tree = self.layout.lock();
        let rects = tree.pane_rects();
        let focused = tree.focused_pane();

        let panes = tree
            .panes()
            .into_iter()
            .filter_map(|id| {
                let surface = tree.content(id)?;
                Some(PaneSnapshot {
                    id: id.0,
                    surface: surface.tag(),
                    profile: tree.profile(id).map_or(0, |profile| profile.0),
                    rect: rects.get(&id).copied().unwrap_or_default(),
                    columns: surface.columns(),
                    rows: surface.rows(),
                    focused: focused == Some(id),
                    attribute_runs: surface.attribute_runs(),
                    first_row: surface.row(0).cloned(),
                })
            })
            .collect();

        LayoutSnapshot {
            window: tree.size(),
            min_size: tree.min_size(),
            panes,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting gridpane");

    let config = Config::load_or_default();
    if std::env::args().any(|arg| arg == "--write-config") {
        let path = config.save_to_default()?;
        tracing::info!("Wrote config to {}", path.display());
    }

    let mut host = Host::new(config);
    host.run()?;

    let snapshot = host.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
