//! Memoized cache cell — a compute-once slot with explicit cycle detection.
//!
//! Every lazily resolved property in the semantic graph lives in a
//! [`CacheCell`]. The cell guarantees the compute function runs at most once
//! for the lifetime of the owning node, that all readers observe the same
//! value, and that a *reentrant* request (the compute function requesting its
//! own value, directly or through other cells) is redirected to a cycle
//! substitute instead of recursing.
//!
//! Reentry is detected structurally through the state tag, not through a
//! reentrant lock: a cell under computation records the computing thread, and
//! a same-thread request against it can only mean the computation depends on
//! itself. Requests from other threads block until the value is available.

use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};

enum CellState<T> {
    Empty,
    Computing(ThreadId),
    Done(T),
}

/// A write-once slot for one lazily computed value.
///
/// Cells are independent: callers of different cells never block each other.
pub struct CacheCell<T> {
    state: Mutex<CellState<T>>,
    ready: Condvar,
}

impl<T: Clone> CacheCell<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CellState::Empty),
            ready: Condvar::new(),
        }
    }

    /// Returns the cached value, running `compute` on first access.
    ///
    /// Reentrant access from within `compute` is a programming-contract
    /// violation and panics. Properties that can legally participate in
    /// reference cycles must use [`CacheCell::get_or_compute_cyclic`].
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        self.get_or_compute_cyclic(compute, || {
            panic!("reentrant access to a cache cell that has no cycle handler")
        })
    }

    /// Returns the cached value, running `compute` on first access and
    /// substituting `on_cycle` if `compute` re-enters this cell.
    ///
    /// On reentry the cell is sealed with the substitute: the outer frame's
    /// computed value is discarded so that every observer of the cell, before
    /// and after the cycle, sees the identical substitute.
    pub fn get_or_compute_cyclic(
        &self,
        compute: impl FnOnce() -> T,
        on_cycle: impl FnOnce() -> T,
    ) -> T {
        {
            let mut state = self.state.lock();
            loop {
                match &*state {
                    CellState::Done(value) => return value.clone(),
                    CellState::Empty => {
                        *state = CellState::Computing(thread::current().id());
                        break;
                    }
                    CellState::Computing(owner) if *owner == thread::current().id() => {
                        // Reentrant request: this computation depends on its
                        // own result. Seal the cell so the cycle stays
                        // observable and the recursion cannot restart.
                        let substitute = on_cycle();
                        *state = CellState::Done(substitute.clone());
                        self.ready.notify_all();
                        return substitute;
                    }
                    CellState::Computing(_) => self.ready.wait(&mut state),
                }
            }
        }

        // Lock released while computing: the computation may read other
        // cells, and other cells' readers must not block on this one.
        let value = compute();

        let mut state = self.state.lock();
        match &*state {
            // A reentrant request sealed the cell while we were computing;
            // the sealed substitute wins.
            CellState::Done(sealed) => sealed.clone(),
            _ => {
                *state = CellState::Done(value.clone());
                self.ready.notify_all();
                value
            }
        }
    }

    /// Returns the value if it has already been computed.
    pub fn get(&self) -> Option<T> {
        match &*self.state.lock() {
            CellState::Done(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl<T: Clone> Default for CacheCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for CacheCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.get() {
            Some(value) => write!(f, "CacheCell(Done({value:?}))"),
            None => write!(f, "CacheCell(..)"),
        }
    }
}
