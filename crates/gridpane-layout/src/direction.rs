// ABOUTME: Split orientations and the directions used to resize and move focus.
// ABOUTME: A direction only applies to splits whose separator it crosses.

/// How a pane divides its space between two children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplitState {
    /// Not split; the pane hosts content directly
    #[default]
    None,
    /// Side by side; the separator is vertical and width is divided
    Vertical,
    /// Stacked; the separator is horizontal and height is divided
    Horizontal,
}

impl SplitState {
    /// True when a measurement along this axis is shared by both children
    /// instead of being divided between them.
    pub(crate) fn is_parallel(self, along_width: bool) -> bool {
        match self {
            SplitState::Vertical => !along_width,
            SplitState::Horizontal => along_width,
            SplitState::None => false,
        }
    }

    /// The axis this split divides: width for vertical splits.
    pub(crate) fn divides_width(self) -> bool {
        self == SplitState::Vertical
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The split orientation whose separator this direction crosses.
    pub fn split_state(self) -> SplitState {
        match self {
            Direction::Left | Direction::Right => SplitState::Vertical,
            Direction::Up | Direction::Down => SplitState::Horizontal,
        }
    }

    pub fn matches(self, state: SplitState) -> bool {
        self.split_state() == state
    }

    /// Right and Down point at the second child of a split.
    pub(crate) fn toward_second(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}
