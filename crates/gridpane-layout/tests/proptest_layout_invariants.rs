// ABOUTME: Property tests for the pane tree under random split/close/focus/resize sequences.
// ABOUTME: Checks pixel conservation, minimum sizes, non-overlap and snapping stability.

mod common;

use common::{GridSurface, SurfaceFactory};
use gridpane_core::{LayoutSettings, Size};
use gridpane_layout::{CloseOutcome, Direction, LayoutTree, ProfileId, SplitState};
use proptest::prelude::*;

const SEPARATOR: f32 = 4.0;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Split(SplitState),
    Close(usize),
    Navigate(Direction),
    Resize(Direction),
    Window(u16, u16),
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Right),
        Just(Direction::Up),
        Just(Direction::Down),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => prop_oneof![Just(SplitState::Vertical), Just(SplitState::Horizontal)].prop_map(Op::Split),
        1 => any::<usize>().prop_map(Op::Close),
        2 => direction_strategy().prop_map(Op::Navigate),
        2 => direction_strategy().prop_map(Op::Resize),
        1 => (100u16..900, 60u16..600).prop_map(|(w, h)| Op::Window(w, h)),
    ]
}

/// Integral cell metrics with a minimum of a whole number of cells.
fn metrics_strategy() -> impl Strategy<Value = (Size, Size)> {
    (4u8..12, 8u8..24, 1u8..4, 1u8..3).prop_map(|(cw, ch, kw, kh)| {
        let cell = Size::new(f32::from(cw), f32::from(ch));
        let min = Size::new(cell.width * f32::from(kw), cell.height * f32::from(kh));
        (min, cell)
    })
}

fn new_tree(factory: &mut SurfaceFactory, size: Size) -> LayoutTree<GridSurface> {
    let mut tree = LayoutTree::new(LayoutSettings::default(), ProfileId(0), factory.make());
    tree.resize_content(size);
    let root = tree.panes()[0];
    tree.focus_pane(root);
    tree
}

/// Grow a requested window size so the whole tree fits.
fn fit(tree: &LayoutTree<GridSurface>, width: f32, height: f32) -> Size {
    let min = tree.min_size();
    Size::new(width.max(min.width), height.max(min.height))
}

fn check_layout(tree: &LayoutTree<GridSurface>) -> Result<(), TestCaseError> {
    let size = tree.size();
    let rects = tree.pane_rects();
    prop_assert_eq!(rects.len(), tree.panes().len());

    for (id, rect) in &rects {
        let content = tree.content(*id).unwrap();
        prop_assert!(rect.width >= content.min.width, "{:?} narrower than minimum: {:?}", id, rect);
        prop_assert!(rect.height >= content.min.height, "{:?} shorter than minimum: {:?}", id, rect);
        prop_assert!(rect.x >= 0.0 && rect.y >= 0.0);
        prop_assert!(rect.right() <= size.width && rect.bottom() <= size.height);
        prop_assert_eq!(content.last_size, rect.size());

        for (other, other_rect) in &rects {
            if id != other {
                prop_assert!(!rect.overlaps(other_rect), "{:?} overlaps {:?}", id, other);
            }
        }
    }

    if let Some(focused) = tree.focused_pane() {
        prop_assert!(tree.contains(focused));
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Random operation sequences keep the layout consistent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn random_operations_keep_layout_consistent(
        (min, cell) in metrics_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut factory = SurfaceFactory::new(min, cell);
        let mut tree = new_tree(&mut factory, Size::new(640.0, 400.0));
        let mut expected = 1usize;

        for op in ops {
            match op {
                Op::Split(state) => {
                    if tree.split(state, ProfileId(0), factory.make()).is_some() {
                        expected += 1;
                    }
                }
                Op::Close(index) => {
                    let panes = tree.panes();
                    if panes.len() > 1 {
                        let outcome = tree.close(panes[index % panes.len()]);
                        prop_assert_eq!(outcome, CloseOutcome::Closed);
                        expected -= 1;
                    }
                }
                Op::Navigate(direction) => {
                    tree.navigate_focus(direction);
                }
                Op::Resize(direction) => {
                    tree.resize_pane(direction);
                }
                Op::Window(width, height) => {
                    let size = fit(&tree, f32::from(width), f32::from(height));
                    tree.resize_content(size);
                }
            }

            prop_assert_eq!(tree.panes().len(), expected);
            check_layout(&tree)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Split sizes conserve pixels and never shrink the first child
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn split_sizes_conserve_pixels(
        (min, cell) in metrics_strategy(),
        vertical in any::<bool>(),
        steps in 0usize..6,
        grow_first in any::<bool>(),
    ) {
        let state = if vertical { SplitState::Vertical } else { SplitState::Horizontal };
        let mut factory = SurfaceFactory::new(min, cell);
        let mut tree = new_tree(&mut factory, Size::new(800.0, 600.0));
        tree.split(state, ProfileId(0), factory.make()).unwrap();

        let direction = match (vertical, grow_first) {
            (true, true) => Direction::Right,
            (true, false) => Direction::Left,
            (false, true) => Direction::Down,
            (false, false) => Direction::Up,
        };
        for _ in 0..steps {
            tree.resize_pane(direction);
        }

        let minimum = tree.min_size().along(vertical);
        let mut previous_first = 0.0f32;
        for full in (minimum as u32)..(minimum as u32 + 200) {
            let full = full as f32;
            let (first, second) = tree.split_sizes(full).unwrap();
            prop_assert_eq!(first + SEPARATOR + second, full);
            prop_assert!(first >= previous_first, "first child shrank at {}", full);
            previous_first = first;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Snapped sizes are stable under snapping again
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn snapping_a_leaf_is_idempotent(
        (min, cell) in metrics_strategy(),
        along_width in any::<bool>(),
        dimension in 0u16..1000,
    ) {
        let mut factory = SurfaceFactory::new(min, cell);
        let tree = new_tree(&mut factory, Size::new(800.0, 600.0));

        let snapped = tree.snap_dimension(along_width, f32::from(dimension));
        prop_assert!(snapped >= min.along(along_width));
        prop_assert_eq!(tree.snap_dimension(along_width, snapped), snapped);
    }
}

proptest! {
    #[test]
    fn snapping_across_a_split_is_idempotent(
        (min, cell) in metrics_strategy(),
        vertical in any::<bool>(),
        dimension in 0u16..1000,
    ) {
        let state = if vertical { SplitState::Vertical } else { SplitState::Horizontal };
        let mut factory = SurfaceFactory::new(min, cell);
        let mut tree = new_tree(&mut factory, Size::new(800.0, 600.0));
        tree.split(state, ProfileId(0), factory.make()).unwrap();

        let snapped = tree.snap_dimension(vertical, f32::from(dimension));
        let bounds = tree.snap_bounds(vertical, f32::from(dimension));
        prop_assert!(snapped == bounds.lower || snapped == bounds.higher);
        prop_assert!(snapped >= tree.min_size().along(vertical));
        prop_assert_eq!(tree.snap_dimension(vertical, snapped), snapped);
    }
}
