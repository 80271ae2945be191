//! Monotonic id allocation.
//!
//! # Invariants
//! - Ids start at 1 and are never handed out twice by one allocator.
//! - `observe` keeps the allocator ahead of ids restored from storage.

/// Monotonic counter shared by every entity kind drawing from one id space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: Option<u32>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next free id, or `None` once `u32::MAX` was handed out.
    pub fn allocate(&mut self) -> Option<u32> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// Records an externally assigned id so it is never allocated again.
    pub fn observe(&mut self, id: u32) {
        if let Some(next) = self.next {
            if id >= next {
                self.next = id.checked_add(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IdAllocator;

    #[test]
    fn allocates_sequentially_from_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), Some(1));
        assert_eq!(ids.allocate(), Some(2));
        assert_eq!(ids.allocate(), Some(3));
    }

    #[test]
    fn observe_only_moves_forward() {
        let mut ids = IdAllocator::new();
        ids.observe(40);
        ids.observe(7);
        assert_eq!(ids.allocate(), Some(41));
    }

    #[test]
    fn exhausts_at_max() {
        let mut ids = IdAllocator::new();
        ids.observe(u32::MAX - 1);
        assert_eq!(ids.allocate(), Some(u32::MAX));
        assert_eq!(ids.allocate(), None);
        ids.observe(3);
        assert_eq!(ids.allocate(), None);
    }
}
