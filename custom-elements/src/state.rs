use std::sync::{Arc, PoisonError, RwLock};

use crate::wakeup;

/// Shared component state that requests a render when it changes.
///
/// `State<T>` is shared between a component and the handlers it attaches to
/// its rendered tree. It uses `Arc<RwLock<T>>` internally, making it cheap
/// to clone and safe to touch from spawned tasks. Every mutation requests a
/// render.
///
/// # Example
///
/// ```ignore
/// let open = State::new(false);
/// let handler_state = open.clone();
/// Element::div().on("click", move |_| handler_state.update(|o| *o = !*o));
/// ```
#[derive(Debug)]
pub struct State<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> State<T> {
    /// Wrap `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Snapshot of the value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.read(T::clone)
    }

    /// Read the current value without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        self.update(|v| *v = value);
    }

    /// Update the value using a closure, returning whatever the closure returns
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        };
        wakeup::request_render();
        result
    }

    /// Update the value only if `f` reports a change
    ///
    /// Returns whether anything changed. Unchanged state requests no render.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        };
        if changed {
            wakeup::request_render();
        }
        changed
    }

}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
