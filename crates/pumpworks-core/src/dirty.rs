/// Tracks which parts of a pump changed since the last save.
///
/// The host checks [`is_dirty`](DirtyTracker::is_dirty) to decide whether the
/// pump needs persisting, then calls [`mark_clean`](DirtyTracker::mark_clean).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyTracker {
    cursor: bool,
    buffer: bool,
}

impl DirtyTracker {
    /// Create a new tracker with nothing dirty.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cursor moved or was re-seated.
    pub fn mark_cursor(&mut self) {
        self.cursor = true;
    }

    /// The buffer contents changed.
    pub fn mark_buffer(&mut self) {
        self.buffer = true;
    }

    pub fn is_cursor_dirty(&self) -> bool {
        self.cursor
    }

    pub fn is_buffer_dirty(&self) -> bool {
        self.buffer
    }

    /// Returns `true` if anything has been marked dirty since the last clean.
    pub fn is_dirty(&self) -> bool {
        self.cursor || self.buffer
    }

    /// Reset all dirty flags.
    pub fn mark_clean(&mut self) {
        *self = Self::default();
    }
}
