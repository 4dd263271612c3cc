// ABOUTME: Character grid snapping for the pane tree.
// ABOUTME: Grows a tree of minimum sizes one cell at a time to find sizes every pane can take.

use gridpane_core::Size;

use crate::content::PaneContent;
use crate::tree::{Node, Pane};

/// Nearest valid sizes at or below (`lower`) and above (`higher`) a request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapBounds {
    pub lower: f32,
    pub higher: f32,
}

impl SnapBounds {
    pub(crate) fn exact(size: f32) -> Self {
        Self {
            lower: size,
            higher: size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChildSnapBounds {
    pub(crate) first: SnapBounds,
    pub(crate) second: SnapBounds,
}

/// Sizes along one axis of a pane and its descendants, mirroring the shape
/// of the pane tree.
#[derive(Debug, Clone)]
pub(crate) struct LayoutSizeNode {
    pub(crate) size: f32,
    /// Still at the pane's minimum, which may not lie on the cell grid
    is_minimum_size: bool,
    children: Option<Box<SizeChildren>>,
}

#[derive(Debug, Clone)]
struct SizeChildren {
    first: LayoutSizeNode,
    second: LayoutSizeNode,
    /// `first` advanced by one step, computed on demand
    next_first: Option<LayoutSizeNode>,
    next_second: Option<LayoutSizeNode>,
}

impl LayoutSizeNode {
    fn children(&self) -> &SizeChildren {
        match self.children.as_deref() {
            Some(children) => children,
            None => unreachable!("size tree is out of sync with the pane tree"),
        }
    }

    fn children_mut(&mut self) -> &mut SizeChildren {
        match self.children.as_deref_mut() {
            Some(children) => children,
            None => unreachable!("size tree is out of sync with the pane tree"),
        }
    }

    pub(crate) fn child_sizes(&self) -> (f32, f32) {
        let children = self.children();
        (children.first.size, children.second.size)
    }
}

impl<C: PaneContent> Pane<C> {
    pub(crate) fn min_size(&self, separator: f32) -> Size {
        match &self.node {
            Node::Leaf(leaf) => leaf.content.minimum_size(),
            Node::Split(split) => {
                let first = split.first.min_size(separator);
                let second = split.second.min_size(separator);
                let along = |along_width: bool| {
                    if split.state.is_parallel(along_width) {
                        first.along(along_width).max(second.along(along_width))
                    } else {
                        first.along(along_width) + separator + second.along(along_width)
                    }
                };
                Size::new(along(true), along(false))
            }
        }
    }

    pub(crate) fn min_size_tree(&self, along_width: bool, separator: f32) -> LayoutSizeNode {
        let children = match &self.node {
            Node::Leaf(_) => None,
            Node::Split(split) => Some(Box::new(SizeChildren {
                first: split.first.min_size_tree(along_width, separator),
                second: split.second.min_size_tree(along_width, separator),
                next_first: None,
                next_second: None,
            })),
        };
        LayoutSizeNode {
            size: self.min_size(separator).along(along_width),
            is_minimum_size: true,
            children,
        }
    }

    /// Valid sizes around `dimension` for this pane along one axis.
    pub(crate) fn proposed_snap_sizes(&self, along_width: bool, dimension: f32, separator: f32) -> SnapBounds {
        match &self.node {
            Node::Leaf(leaf) => {
                let minimum = leaf.content.minimum_size().along(along_width);
                if dimension <= minimum {
                    return SnapBounds::exact(minimum);
                }

                let lower = leaf.content.snap_dimension_to_grid(along_width, dimension);
                if lower == dimension {
                    return SnapBounds::exact(lower);
                }
                SnapBounds {
                    lower,
                    higher: lower + leaf.content.cell_size().along(along_width),
                }
            }
            Node::Split(split) if split.state.is_parallel(along_width) => {
                let first = split.first.proposed_snap_sizes(along_width, dimension, separator);
                let second = split.second.proposed_snap_sizes(along_width, dimension, separator);
                SnapBounds {
                    lower: first.lower.max(second.lower),
                    higher: first.higher.min(second.higher),
                }
            }
            Node::Split(_) => {
                let bounds = self.calc_snapped_dimensions(along_width, dimension, separator);
                SnapBounds {
                    lower: bounds.first.lower + separator + bounds.second.lower,
                    higher: bounds.first.higher + separator + bounds.second.higher,
                }
            }
        }
    }

    /// Child sizes of the largest valid layout not exceeding `full` and of
    /// the next larger one. Both bounds are equal when `full` is valid.
    ///
    /// Panics on a leaf, which has no children to share space between.
    pub(crate) fn calc_snapped_dimensions(&self, along_width: bool, full: f32, separator: f32) -> ChildSnapBounds {
        assert!(
            !self.is_leaf(),
            "cannot distribute snapped space in a leaf pane"
        );
        debug_assert!(full.is_finite(), "snapping to a non-finite size");

        let mut size_tree = self.min_size_tree(along_width, separator);
        let mut last_size_tree = size_tree.clone();

        while size_tree.size < full {
            last_size_tree = size_tree.clone();
            self.snap_size_upwards(along_width, &mut size_tree, separator);

            if size_tree.size == full {
                let (first, second) = size_tree.child_sizes();
                return ChildSnapBounds {
                    first: SnapBounds::exact(first),
                    second: SnapBounds::exact(second),
                };
            }
        }

        let (first_lower, second_lower) = last_size_tree.child_sizes();
        let (first_higher, second_higher) = size_tree.child_sizes();
        ChildSnapBounds {
            first: SnapBounds {
                lower: first_lower,
                higher: first_higher,
            },
            second: SnapBounds {
                lower: second_lower,
                higher: second_higher,
            },
        }
    }

    /// Grow `node` to this pane's next valid size along one axis. A split
    /// grows exactly one child per step.
    pub(crate) fn snap_size_upwards(&self, along_width: bool, node: &mut LayoutSizeNode, separator: f32) {
        match &self.node {
            Node::Leaf(leaf) => {
                if node.is_minimum_size {
                    node.size = self
                        .proposed_snap_sizes(along_width, node.size + 1.0, separator)
                        .higher;
                } else {
                    let cell = leaf.content.cell_size().along(along_width);
                    assert!(cell > 0.0, "cell size must be positive to snap a pane");
                    node.size += cell;
                }
            }
            Node::Split(split) => {
                let children = node.children_mut();
                let next_first = match children.next_first.take() {
                    Some(next) => next,
                    None => split.first.advanced(along_width, &children.first, separator),
                };
                let next_second = match children.next_second.take() {
                    Some(next) => next,
                    None => split.second.advanced(along_width, &children.second, separator),
                };

                let parallel = split.state.is_parallel(along_width);
                let advance_first = if parallel {
                    next_first.size < next_second.size
                } else {
                    // Signed distance of each candidate from the desired ratio.
                    let first = children.first.size;
                    let second = children.second.size;
                    let deviation1 = next_first.size - (next_first.size + second) * split.position;
                    let deviation2 = -(first - (first + next_second.size) * split.position);
                    deviation1 <= deviation2
                };

                if advance_first {
                    children.next_first = Some(split.first.advanced(along_width, &next_first, separator));
                    children.first = next_first;
                    children.next_second = Some(next_second);
                } else {
                    children.next_second = Some(split.second.advanced(along_width, &next_second, separator));
                    children.second = next_second;
                    children.next_first = Some(next_first);
                }

                node.size = if parallel {
                    children.first.size.max(children.second.size)
                } else {
                    children.first.size + separator + children.second.size
                };
            }
        }
        node.is_minimum_size = false;
    }

    fn advanced(&self, along_width: bool, node: &LayoutSizeNode, separator: f32) -> LayoutSizeNode {
        let mut next = node.clone();
        self.snap_size_upwards(along_width, &mut next, separator);
        next
    }

    /// Whichever valid size is nearer to `dimension`; ties go to the higher one.
    pub(crate) fn snap_dimension(&self, along_width: bool, dimension: f32, separator: f32) -> f32 {
        let bounds = self.proposed_snap_sizes(along_width, dimension, separator);
        if dimension - bounds.lower < bounds.higher - dimension {
            bounds.lower
        } else {
            bounds.higher
        }
    }

    /// Divide `full` pixels along this split's axis: the first child snapped
    /// down to its grid, the second child taking everything else.
    pub(crate) fn pane_sizes(&self, full: f32, separator: f32) -> (f32, f32) {
        let along_width = match &self.node {
            Node::Split(split) => split.state.divides_width(),
            Node::Leaf(_) => true,
        };
        let bounds = self.calc_snapped_dimensions(along_width, full, separator);
        (bounds.first.lower, full - separator - bounds.first.lower)
    }

    /// Limit a split position so neither child drops below its minimum size.
    pub(crate) fn clamp_split_position(
        &self,
        along_width: bool,
        requested: f32,
        total: f32,
        separator: f32,
    ) -> f32 {
        let Node::Split(split) = &self.node else {
            return requested;
        };
        let available = total - separator;
        let min_position = split.first.min_size(separator).along(along_width) / available;
        let max_position = 1.0 - split.second.min_size(separator).along(along_width) / available;
        requested.max(min_position).min(max_position)
    }
}
