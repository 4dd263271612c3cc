// ABOUTME: Binary tree structure for split terminal pane layout.
// ABOUTME: Supports splitting, closing, resizing, focus navigation and grid-snapped relayout.

use std::collections::HashMap;

use gridpane_core::{LayoutSettings, Rect, Size};

use crate::content::{ContentEvent, PaneContent};
use crate::direction::{Direction, SplitState};
use crate::snap::SnapBounds;

/// Split position given to a freshly split pane
const HALF: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub u64);

/// Key of the settings profile a leaf was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// No leaf with that id exists any more
    Stale,
    /// The leaf was removed and its parent collapsed
    Closed,
    /// The last leaf was removed and the tree is now empty
    TreeClosed,
}

#[derive(Debug)]
pub(crate) struct Leaf<C> {
    pub(crate) id: PaneId,
    pub(crate) profile: ProfileId,
    pub(crate) content: C,
    pub(crate) last_focused: bool,
}

#[derive(Debug)]
pub(crate) struct Split<C> {
    pub(crate) state: SplitState,
    /// Desired share of the divided axis given to the first child, in (0, 1)
    pub(crate) position: f32,
    pub(crate) first: Box<Pane<C>>,
    pub(crate) second: Box<Pane<C>>,
}

#[derive(Debug)]
pub(crate) enum Node<C> {
    Leaf(Leaf<C>),
    Split(Split<C>),
}

#[derive(Debug)]
pub(crate) struct Pane<C> {
    /// Size assigned by the most recent layout pass
    pub(crate) size: Size,
    pub(crate) node: Node<C>,
}

/// Result of routing a directional request toward the focused leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Routed {
    Handled,
    /// The focused leaf is below but no split on the way could act
    Bubble,
    /// Nothing below holds focus
    Unfocused,
}

impl<C> Pane<C> {
    fn new(size: Size, node: Node<C>) -> Self {
        Self { size, node }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.node, Node::Leaf(_))
    }

    fn leaf_id(&self) -> Option<PaneId> {
        match &self.node {
            Node::Leaf(leaf) => Some(leaf.id),
            Node::Split(_) => None,
        }
    }

    /// Only leaves carry the focus flag; a split always answers false.
    fn was_last_focused(&self) -> bool {
        matches!(&self.node, Node::Leaf(leaf) if leaf.last_focused)
    }

    fn find(&self, id: PaneId) -> Option<&Leaf<C>> {
        match &self.node {
            Node::Leaf(leaf) => (leaf.id == id).then_some(leaf),
            Node::Split(split) => split.first.find(id).or_else(|| split.second.find(id)),
        }
    }

    fn find_mut(&mut self, id: PaneId) -> Option<&mut Leaf<C>> {
        match &mut self.node {
            Node::Leaf(leaf) => (leaf.id == id).then_some(leaf),
            Node::Split(split) => match split.first.find_mut(id) {
                Some(leaf) => Some(leaf),
                None => split.second.find_mut(id),
            },
        }
    }

    fn focused_leaf(&self) -> Option<&Leaf<C>> {
        match &self.node {
            Node::Leaf(leaf) => leaf.last_focused.then_some(leaf),
            Node::Split(split) => split
                .first
                .focused_leaf()
                .or_else(|| split.second.focused_leaf()),
        }
    }

    fn focused_leaf_mut(&mut self) -> Option<&mut Leaf<C>> {
        match &mut self.node {
            Node::Leaf(leaf) => leaf.last_focused.then_some(leaf),
            Node::Split(split) => match split.first.focused_leaf_mut() {
                Some(leaf) => Some(leaf),
                None => split.second.focused_leaf_mut(),
            },
        }
    }

    fn collect_panes(&self, out: &mut Vec<PaneId>) {
        match &self.node {
            Node::Leaf(leaf) => out.push(leaf.id),
            Node::Split(split) => {
                split.first.collect_panes(out);
                split.second.collect_panes(out);
            }
        }
    }

    fn collect_rects(&self, x: f32, y: f32, separator: f32, out: &mut HashMap<PaneId, Rect>) {
        match &self.node {
            Node::Leaf(leaf) => {
                out.insert(
                    leaf.id,
                    Rect {
                        x,
                        y,
                        width: self.size.width,
                        height: self.size.height,
                    },
                );
            }
            Node::Split(split) => {
                split.first.collect_rects(x, y, separator, out);
                let (second_x, second_y) = if split.state.divides_width() {
                    (x + split.first.size.width + separator, y)
                } else {
                    (x, y + split.first.size.height + separator)
                };
                split.second.collect_rects(second_x, second_y, separator, out);
            }
        }
    }
}

impl<C: PaneContent> Pane<C> {
    /// True if any surface below currently holds input focus.
    fn has_focused_child(&self) -> bool {
        match &self.node {
            Node::Leaf(leaf) => leaf.content.is_focused(),
            Node::Split(split) => split.first.has_focused_child() || split.second.has_focused_child(),
        }
    }

    /// Recompute every leaf's focus flag from its surface.
    fn update_focus(&mut self) {
        match &mut self.node {
            Node::Leaf(leaf) => leaf.last_focused = leaf.content.is_focused(),
            Node::Split(split) => {
                split.first.update_focus();
                split.second.update_focus();
            }
        }
    }

    fn focus_first_child(&mut self) {
        match &mut self.node {
            Node::Leaf(leaf) => leaf.content.focus(),
            Node::Split(split) => split.first.focus_first_child(),
        }
    }

    /// Focus the first leaf and mark it as the focused one.
    fn focus_first_leaf(&mut self) {
        match &mut self.node {
            Node::Leaf(leaf) => {
                leaf.content.focus();
                leaf.last_focused = true;
            }
            Node::Split(split) => split.first.focus_first_leaf(),
        }
    }

    fn update_settings(&mut self, settings: &C::Settings, profile: ProfileId) {
        match &mut self.node {
            Node::Leaf(leaf) => {
                if leaf.profile == profile {
                    leaf.content.update_settings(settings);
                }
            }
            Node::Split(split) => {
                split.first.update_settings(settings, profile);
                split.second.update_settings(settings, profile);
            }
        }
    }

    /// Whether the leaf that would be split (the focused one) has room for
    /// two halves along the split axis.
    fn can_split(&self, state: SplitState, separator: f32) -> bool {
        match &self.node {
            Node::Leaf(leaf) => {
                if state == SplitState::None {
                    return false;
                }
                let along_width = state.divides_width();
                let half = (self.size.along(along_width) - separator) * HALF;
                half > leaf.content.minimum_size().along(along_width)
            }
            Node::Split(split) => {
                if split.first.has_focused_child() {
                    split.first.can_split(state, separator)
                } else if split.second.has_focused_child() {
                    split.second.can_split(state, separator)
                } else {
                    false
                }
            }
        }
    }

    /// Split the focused leaf below this pane. The existing leaf becomes the
    /// first child and `new_leaf` the second.
    fn split(self: Box<Self>, state: SplitState, new_leaf: Leaf<C>, separator: f32) -> Box<Self> {
        let Pane { size, node } = *self;
        match node {
            Node::Leaf(leaf) => {
                let mut pane = Pane::new(
                    size,
                    Node::Split(Split {
                        state,
                        position: HALF,
                        first: Box::new(Pane::new(size, Node::Leaf(leaf))),
                        second: Box::new(Pane::new(size, Node::Leaf(new_leaf))),
                    }),
                );
                pane.resize_content(size, separator);
                Box::new(pane)
            }
            Node::Split(mut split) => {
                if split.first.has_focused_child() {
                    split.first = split.first.split(state, new_leaf, separator);
                } else if split.second.has_focused_child() {
                    split.second = split.second.split(state, new_leaf, separator);
                }
                Box::new(Pane::new(size, Node::Split(split)))
            }
        }
    }

    /// Remove leaf `id` from below this pane, collapsing its parent. Returns
    /// the rebuilt pane and whether a leaf was removed.
    fn close_leaf(self: Box<Self>, id: PaneId, separator: f32) -> (Box<Self>, bool) {
        let Pane { size, node } = *self;
        let mut split = match node {
            Node::Leaf(leaf) => return (Box::new(Pane::new(size, Node::Leaf(leaf))), false),
            Node::Split(split) => split,
        };

        if split.first.leaf_id() == Some(id) {
            return (Self::collapse(size, split, true, separator), true);
        }
        if split.second.leaf_id() == Some(id) {
            return (Self::collapse(size, split, false, separator), true);
        }

        let closed = if split.first.find(id).is_some() {
            let (first, closed) = split.first.close_leaf(id, separator);
            split.first = first;
            closed
        } else {
            let (second, closed) = split.second.close_leaf(id, separator);
            split.second = second;
            closed
        };
        (Box::new(Pane::new(size, Node::Split(split))), closed)
    }

    /// Drop one child of `split`. A surviving leaf is absorbed into this
    /// pane; a surviving split is spliced up one level with its own
    /// orientation but this pane's split position.
    fn collapse(size: Size, split: Split<C>, close_first: bool, separator: f32) -> Box<Self> {
        let Split {
            first,
            second,
            position,
            ..
        } = split;
        let (closed, remaining) = if close_first {
            (first, second)
        } else {
            (second, first)
        };
        let closed_focused = closed.was_last_focused();
        drop(closed);

        let Pane { node, .. } = *remaining;
        let mut pane = Box::new(Pane::new(size, node));
        match &mut pane.node {
            Node::Leaf(leaf) => {
                leaf.last_focused |= closed_focused;
                if leaf.last_focused {
                    leaf.content.focus();
                }
            }
            Node::Split(adopted) => adopted.position = position,
        }
        if closed_focused && !pane.is_leaf() {
            pane.focus_first_leaf();
        }

        pane.resize_content(size, separator);
        pane
    }

    /// Lay this pane and its descendants out in `size`.
    pub(crate) fn resize_content(&mut self, size: Size, separator: f32) {
        self.size = size;
        let along_width = match &mut self.node {
            Node::Leaf(leaf) => {
                leaf.content.resize(size);
                return;
            }
            Node::Split(split) => split.state.divides_width(),
        };

        let (first, second) = self.pane_sizes(size.along(along_width), separator);
        if let Node::Split(split) = &mut self.node {
            split
                .first
                .resize_content(size.with_along(along_width, first), separator);
            split
                .second
                .resize_content(size.with_along(along_width, second), separator);
        }
    }

    /// Walk toward the focused leaf and let the nearest split that can act
    /// on the request do so. If the focused subtree cannot handle it, this
    /// pane gets a turn before the request bubbles further up.
    fn route<F>(&mut self, act: &mut F) -> Routed
    where
        F: FnMut(&mut Pane<C>) -> bool,
    {
        let (direct, into_first, into_second) = match &self.node {
            Node::Leaf(_) => return Routed::Unfocused,
            Node::Split(split) => (
                split.first.was_last_focused() || split.second.was_last_focused(),
                !split.first.is_leaf() && split.first.has_focused_child(),
                !split.second.is_leaf() && split.second.has_focused_child(),
            ),
        };

        if !direct {
            let child = match &mut self.node {
                Node::Split(split) if into_first => &mut split.first,
                Node::Split(split) if into_second => &mut split.second,
                _ => return Routed::Unfocused,
            };
            if child.route(act) == Routed::Handled {
                return Routed::Handled;
            }
        }

        if act(self) {
            Routed::Handled
        } else {
            Routed::Bubble
        }
    }

    /// Move this split's separator one step in `direction`.
    fn resize_split(&mut self, direction: Direction, settings: &LayoutSettings) -> bool {
        let (along_width, requested) = match &self.node {
            Node::Split(split) if direction.matches(split.state) => {
                let step = if direction.toward_second() {
                    -settings.resize_step
                } else {
                    settings.resize_step
                };
                (split.state.divides_width(), split.position - step)
            }
            _ => return false,
        };

        let size = self.size;
        let position = self.clamp_split_position(
            along_width,
            requested,
            size.along(along_width),
            settings.separator_size,
        );
        if let Node::Split(split) = &mut self.node {
            split.position = position;
        }
        tracing::debug!("Moved separator {:?} to {:.3}", direction, position);

        self.resize_content(size, settings.separator_size);
        true
    }

    /// Move focus into the child of this split that lies in `direction`.
    fn navigate_split(&mut self, direction: Direction) -> bool {
        let Node::Split(split) = &mut self.node else {
            return false;
        };
        if !direction.matches(split.state) {
            return false;
        }

        let target = if direction.toward_second() {
            &mut split.second
        } else {
            &mut split.first
        };
        if target.was_last_focused() {
            return false;
        }

        target.focus_first_child();
        self.update_focus();
        true
    }
}

/// A tree of split panes hosting surfaces of type `C`.
///
/// The tree starts as a single leaf. Hosts feed it the available pixel size
/// through [`LayoutTree::resize_content`], after which every pane is sized so
/// that its surface fits a whole number of character cells.
#[derive(Debug)]
pub struct LayoutTree<C> {
    pub(crate) root: Option<Box<Pane<C>>>,
    settings: LayoutSettings,
    next_id: u64,
}

impl<C: PaneContent> LayoutTree<C> {
    pub fn new(settings: LayoutSettings, profile: ProfileId, content: C) -> Self {
        let leaf = Leaf {
            id: PaneId(0),
            profile,
            content,
            last_focused: true,
        };
        Self {
            root: Some(Box::new(Pane::new(Size::ZERO, Node::Leaf(leaf)))),
            settings,
            next_id: 1,
        }
    }

    /// True once the last pane has been closed.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Size most recently given to [`LayoutTree::resize_content`].
    pub fn size(&self) -> Size {
        self.root.as_ref().map_or(Size::ZERO, |root| root.size)
    }

    /// All pane ids, first child before second.
    pub fn panes(&self) -> Vec<PaneId> {
        let mut result = Vec::new();
        if let Some(root) = &self.root {
            root.collect_panes(&mut result);
        }
        result
    }

    /// Pixel rectangle of every leaf from the last layout pass
    pub fn pane_rects(&self) -> HashMap<PaneId, Rect> {
        let mut result = HashMap::new();
        if let Some(root) = &self.root {
            root.collect_rects(0.0, 0.0, self.settings.separator_size, &mut result);
        }
        result
    }

    fn leaf(&self, id: PaneId) -> Option<&Leaf<C>> {
        self.root.as_ref()?.find(id)
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.leaf(id).is_some()
    }

    pub fn content(&self, id: PaneId) -> Option<&C> {
        self.leaf(id).map(|leaf| &leaf.content)
    }

    pub fn content_mut(&mut self, id: PaneId) -> Option<&mut C> {
        self.root
            .as_mut()?
            .find_mut(id)
            .map(|leaf| &mut leaf.content)
    }

    pub fn profile(&self, id: PaneId) -> Option<ProfileId> {
        self.leaf(id).map(|leaf| leaf.profile)
    }

    /// Orientation of the root split, `SplitState::None` for a single leaf.
    pub fn split_state(&self) -> SplitState {
        match self.root.as_deref().map(|root| &root.node) {
            Some(Node::Split(split)) => split.state,
            _ => SplitState::None,
        }
    }

    pub fn split_position(&self) -> Option<f32> {
        match self.root.as_deref().map(|root| &root.node) {
            Some(Node::Split(split)) => Some(split.position),
            _ => None,
        }
    }

    /// How the root split would divide `full` pixels between its children:
    /// the first child snapped down to its grid, the second taking the rest.
    pub fn split_sizes(&self, full: f32) -> Option<(f32, f32)> {
        let root = self.root.as_ref()?;
        (!root.is_leaf()).then(|| root.pane_sizes(full, self.settings.separator_size))
    }

    /// Smallest size the whole tree can be laid out at.
    pub fn min_size(&self) -> Size {
        self.root.as_ref().map_or(Size::ZERO, |root| {
            root.min_size(self.settings.separator_size)
        })
    }

    /// Whether the focused leaf has room to be split in two along `state`.
    pub fn can_split(&self, state: SplitState) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.can_split(state, self.settings.separator_size))
    }

    /// Split the focused leaf, giving the second half to `content`.
    ///
    /// Returns `None`, dropping `content`, when the leaf is too small.
    pub fn split(&mut self, state: SplitState, profile: ProfileId, content: C) -> Option<PaneId> {
        if !self.can_split(state) {
            tracing::debug!("Refusing {:?} split: focused pane is too small", state);
            return None;
        }
        let root = self.root.take()?;

        let id = PaneId(self.next_id);
        self.next_id += 1;
        let leaf = Leaf {
            id,
            profile,
            content,
            last_focused: false,
        };
        self.root = Some(root.split(state, leaf, self.settings.separator_size));

        tracing::info!("Split {:?}, added pane {:?}", state, id);
        Some(id)
    }

    /// Remove a leaf. Its sibling takes over the parent's space.
    pub fn close(&mut self, id: PaneId) -> CloseOutcome {
        if !self.contains(id) {
            tracing::debug!("Pane {:?} already closed", id);
            return CloseOutcome::Stale;
        }
        let Some(root) = self.root.take() else {
            return CloseOutcome::Stale;
        };

        if root.is_leaf() {
            tracing::info!("Closed last pane {:?}", id);
            return CloseOutcome::TreeClosed;
        }

        let (root, _) = root.close_leaf(id, self.settings.separator_size);
        self.root = Some(root);
        tracing::info!(
            "Closed pane {:?}, remaining panes: {}",
            id,
            self.panes().len()
        );
        CloseOutcome::Closed
    }

    /// Move the separator nearest the focused leaf that runs across
    /// `direction`. Returns false if no such separator exists.
    pub fn resize_pane(&mut self, direction: Direction) -> bool {
        let settings = &self.settings;
        let Some(root) = self.root.as_mut() else {
            return false;
        };
        root.route(&mut |pane: &mut Pane<C>| pane.resize_split(direction, settings))
            == Routed::Handled
    }

    /// Move focus to the neighbouring pane in `direction`.
    pub fn navigate_focus(&mut self, direction: Direction) -> bool {
        let Some(root) = self.root.as_mut() else {
            return false;
        };
        let moved = root.route(&mut |pane: &mut Pane<C>| pane.navigate_split(direction))
            == Routed::Handled;
        if moved {
            tracing::debug!("Focus moved {:?} to {:?}", direction, self.focused_pane());
        }
        moved
    }

    /// Lay the whole tree out in `size`. Non-finite sizes are ignored.
    pub fn resize_content(&mut self, size: Size) {
        if !size.width.is_finite() || !size.height.is_finite() {
            tracing::warn!("Ignoring layout at non-finite size {:?}", size);
            return;
        }
        if let Some(root) = self.root.as_mut() {
            root.resize_content(size, self.settings.separator_size);
        }
    }

    /// Lay the tree out again at its current size.
    pub fn relayout(&mut self) {
        tracing::debug!("Relayout at {:?}", self.size());
        self.resize_content(self.size());
    }

    /// Nearest size along one axis the tree can be laid out at. Ties go to
    /// the larger size.
    pub fn snap_dimension(&self, along_width: bool, dimension: f32) -> f32 {
        if !dimension.is_finite() {
            return dimension;
        }
        self.root.as_ref().map_or(dimension, |root| {
            root.snap_dimension(along_width, dimension, self.settings.separator_size)
        })
    }

    /// Valid sizes on either side of `dimension` along one axis.
    pub fn snap_bounds(&self, along_width: bool, dimension: f32) -> SnapBounds {
        if !dimension.is_finite() {
            return SnapBounds::exact(dimension);
        }
        self.root
            .as_ref()
            .map_or(SnapBounds::exact(dimension), |root| {
                root.proposed_snap_sizes(along_width, dimension, self.settings.separator_size)
            })
    }

    pub fn focused_pane(&self) -> Option<PaneId> {
        self.root.as_ref()?.focused_leaf().map(|leaf| leaf.id)
    }

    pub fn focused_content(&self) -> Option<&C> {
        self.root
            .as_ref()?
            .focused_leaf()
            .map(|leaf| &leaf.content)
    }

    pub fn focused_content_mut(&mut self) -> Option<&mut C> {
        self.root
            .as_mut()?
            .focused_leaf_mut()
            .map(|leaf| &mut leaf.content)
    }

    pub fn focused_profile(&self) -> Option<ProfileId> {
        self.root
            .as_ref()?
            .focused_leaf()
            .map(|leaf| leaf.profile)
    }

    /// Refresh which leaf counts as focused from the surfaces' own state.
    pub fn update_focus(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.update_focus();
        }
    }

    /// Give input focus to one pane's surface.
    pub fn focus_pane(&mut self, id: PaneId) -> bool {
        let Some(root) = self.root.as_mut() else {
            return false;
        };
        let Some(leaf) = root.find_mut(id) else {
            return false;
        };
        leaf.content.focus();
        root.update_focus();
        true
    }

    /// Push `settings` to every leaf created from `profile`.
    pub fn update_settings(&mut self, settings: &C::Settings, profile: ProfileId) {
        if let Some(root) = self.root.as_mut() {
            root.update_settings(settings, profile);
        }
    }

    /// React to a notification from a hosted surface. Returns the close
    /// outcome when the event asked for a pane to be closed.
    pub fn handle_content_event(&mut self, event: ContentEvent) -> Option<CloseOutcome> {
        if self.is_empty() {
            tracing::warn!("Ignoring {:?}: all panes are closed", event);
            return None;
        }

        match event {
            ContentEvent::Closed(id) => {
                match self.content(id).map(|content| content.close_on_exit()) {
                    None => Some(CloseOutcome::Stale),
                    Some(false) => {
                        tracing::debug!("Pane {:?} exited but stays open", id);
                        None
                    }
                    Some(true) => Some(self.close(id)),
                }
            }
            ContentEvent::FontSizeChanged { pane, initial } => {
                if initial && self.contains(pane) {
                    self.relayout();
                }
                None
            }
        }
    }
}
