//! Fixed-capacity lookback over the most recently consumed characters.
//!
//! Invariant: the backing store is allocated once (inline array) and never
//! grows; `push` overwrites the oldest slot once the window is full.

/// Circular buffer of the last `N` pushed items.
///
/// Slots that have never been written hold `T::default()`.
#[derive(Clone, Debug)]
pub struct HistoryBuffer<T, const N: usize> {
    slots: [T; N],
    /// Slot that the next `push` writes to.
    head: usize,
    pushed: u64,
}

impl<T: Copy + Default, const N: usize> HistoryBuffer<T, N> {
    pub fn new() -> Self {
        assert!(N > 0, "history buffer capacity must be non-zero");
        Self {
            slots: [T::default(); N],
            head: 0,
            pushed: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Total number of pushes since construction (not bounded by capacity).
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    /// Record a newly consumed item, evicting the oldest when full.
    pub fn push(&mut self, item: T) {
        self.slots[self.head] = item;
        self.head = (self.head + 1) % N;
        self.pushed = self.pushed.saturating_add(1);
    }

    /// Item at logical slot `index` of the window, where `0` is the oldest
    /// slot and `N - 1` the most recently pushed one.
    pub fn peek_at(&self, index: usize) -> T {
        assert!(
            index < N,
            "history slot {index} out of range for capacity {N}"
        );
        self.slots[(self.head + index) % N]
    }

    /// Item pushed `n` pushes before the most recent one (`0` is the most
    /// recent).
    ///
    /// Panics when `n >= N`: asking for more lookback than the window holds is
    /// a caller bug, not an input condition.
    pub fn peek_back(&self, n: usize) -> T {
        assert!(
            n < N,
            "history lookback {n} must be smaller than capacity {N}"
        );
        self.peek_at(N - 1 - n)
    }
}

impl<T: Copy + Default, const N: usize> Default for HistoryBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
