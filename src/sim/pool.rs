//! Fixed-capacity slot pools
//!
//! Entities are recycled rather than allocated: a slot is acquired by linear
//! scan for the first inactive entry and released back by predicate. Linear
//! scan is fine at these sizes (<= 60 obstacles, <= 200 particles); the
//! acquire/release surface leaves room for a free list without touching call
//! sites. Pools never grow and never error on exhaustion.

/// A fixed-capacity pool of reusable entity slots
pub struct SlotPool<T> {
    slots: Vec<Slot<T>>,
}

struct Slot<T> {
    active: bool,
    item: T,
}

impl<T: Default> SlotPool<T> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot {
            active: false,
            item: T::default(),
        });
        Self { slots }
    }

    /// First inactive slot, marked active; `None` when the pool is exhausted.
    /// The returned item holds whatever the previous occupant left behind, so
    /// callers must initialize every field they care about.
    pub fn acquire(&mut self) -> Option<&mut T> {
        let slot = self.slots.iter_mut().find(|s| !s.active)?;
        slot.active = true;
        Some(&mut slot.item)
    }

    /// Deactivate every active slot matching the predicate
    pub fn release_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        for slot in self.slots.iter_mut().filter(|s| s.active) {
            if pred(&slot.item) {
                slot.active = false;
            }
        }
    }

    /// Deactivate all slots
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.active).map(|s| &s.item)
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots
            .iter_mut()
            .filter(|s| s.active)
            .map(|s| &mut s.item)
    }

    /// Active item in slot `i`, if any. Slot indices are stable for the life
    /// of the pool, giving renderers a fixed slot-to-node mapping.
    pub fn get(&self, i: usize) -> Option<&T> {
        self.slots.get(i).filter(|s| s.active).map(|s| &s.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool: SlotPool<u32> = SlotPool::new(3);
        for i in 0..3 {
            let item = pool.acquire().expect("slot available");
            *item = i;
        }
        assert_eq!(pool.active_count(), 3);
        assert!(pool.acquire().is_none(), "exhausted pool must return None");
    }

    #[test]
    fn test_release_recycles_slots() {
        let mut pool: SlotPool<u32> = SlotPool::new(2);
        *pool.acquire().unwrap() = 7;
        *pool.acquire().unwrap() = 9;
        pool.release_where(|v| *v == 7);
        assert_eq!(pool.active_count(), 1);

        let recycled = pool.acquire().expect("released slot is reusable");
        // Stale contents from the previous occupant are visible until overwritten
        assert_eq!(*recycled, 7);
    }

    #[test]
    fn test_clear_and_stable_indices() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        *pool.acquire().unwrap() = 1;
        *pool.acquire().unwrap() = 2;
        assert_eq!(pool.get(0), Some(&1));
        assert_eq!(pool.get(1), Some(&2));
        assert_eq!(pool.get(2), None);

        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.get(0), None);
    }
}
