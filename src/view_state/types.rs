//! Core view-state newtypes

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportDimensions {
    /// Width in terminal columns.
    pub width: u16,
    /// Height in terminal rows.
    pub height: u16,
}

impl ViewportDimensions {
    /// Smallest renderable geometry.
    pub const MIN: Self = Self {
        width: 1,
        height: 1,
    };

    /// Create new viewport dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Replace degenerate (zero) dimensions with the 1×1 minimum.
    ///
    /// A zero width or height never fails a render; it renders the
    /// smallest valid frame instead.
    pub fn normalized(self) -> Self {
        Self {
            width: self.width.max(Self::MIN.width),
            height: self.height.max(Self::MIN.height),
        }
    }

    /// Rows left for the post list after reserving `reserved` rows (status bar).
    ///
    /// Never less than one.
    pub fn list_budget(self, reserved: u16) -> usize {
        usize::from(self.normalized().height.saturating_sub(reserved).max(1))
    }
}

/// Index of a post within the thread. 0-indexed internally, 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PostIndex(usize);

impl PostIndex {
    /// Create a new PostIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Get the 1-based index for display purposes.
    pub fn display(&self) -> usize {
        self.0 + 1
    }

    /// Clamp into `[0, count)`; `count == 0` yields index 0.
    pub fn clamp_to(self, count: usize) -> Self {
        Self(self.0.min(count.saturating_sub(1)))
    }

    /// Get the next post index.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the previous post index, saturating at 0.
    pub fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl From<usize> for PostIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
