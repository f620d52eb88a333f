use std::sync::{Arc, PoisonError, RwLock};

/// Process-wide slot holding one shared instance of a generated unit.
///
/// [`SingletonSlot::get_or_construct`] is check-then-act: the emptiness check
/// and the store are separate steps with no lock held while constructing.
/// Concurrent first calls may each construct an instance; the slot keeps the
/// last one stored.
pub struct SingletonSlot<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> SingletonSlot<T> {
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replace the held instance.
    pub fn set(&self, value: Arc<T>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    /// Empty the slot, returning what it held.
    pub fn reset(&self) -> Option<Arc<T>> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Return the held instance, or construct one, store it and return the slot's contents.
    pub fn get_or_construct(&self, construct: impl FnOnce() -> T) -> Arc<T> {
        if let Some(existing) = self.get() {
            return existing;
        }
        let created = Arc::new(construct());
        self.set(Arc::clone(&created));
        self.get().unwrap_or(created)
    }
}

impl<T> Default for SingletonSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    use super::*;

    #[test]
    fn constructs_once_when_uncontended() {
        let slot = SingletonSlot::new();
        let built = AtomicUsize::new(0);
        let first = slot.get_or_construct(|| built.fetch_add(1, Ordering::SeqCst));
        let second = slot.get_or_construct(|| built.fetch_add(1, Ordering::SeqCst));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn interleaved_first_calls_both_construct_and_last_store_wins() {
        let slot: SingletonSlot<&str> = SingletonSlot::new();

        // The inner call runs between the outer call's check and its store
        let outer = slot.get_or_construct(|| {
            let inner = slot.get_or_construct(|| "inner");
            assert_eq!(*inner, "inner");
            "outer"
        });

        assert_eq!(*outer, "outer");
        assert_eq!(slot.get().as_deref(), Some(&"outer"));
    }

    #[test]
    fn concurrent_first_calls_leave_one_instance() {
        let slot = Arc::new(SingletonSlot::new());
        let built = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (slot, built, barrier) = (Arc::clone(&slot), Arc::clone(&built), Arc::clone(&barrier));
                thread::spawn(move || {
                    barrier.wait();
                    slot.get_or_construct(|| built.fetch_add(1, Ordering::SeqCst))
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let constructed = built.load(Ordering::SeqCst);
        assert!((1..=8).contains(&constructed));
        let held = slot.get().unwrap();
        assert!(*held < constructed);
        assert!(Arc::ptr_eq(&held, &slot.get_or_construct(|| usize::MAX)));
    }

    #[test]
    fn reset_empties_the_slot() {
        let slot = SingletonSlot::new();
        slot.set(Arc::new(5));
        assert_eq!(slot.reset().as_deref(), Some(&5));
        assert!(slot.get().is_none());
    }
}
