// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped timing, replacing the source's `profile()` context manager.
//!
//! The original wraps blocks in a `contextlib.contextmanager` that tracks an
//! indentation depth and prints elapsed time on exit. Here the same
//! "measure this block, report on every exit path including early returns"
//! guarantee is expressed as a guard that runs its callback on `Drop`.

use crate::clock::Clock;
use std::time::Duration;

/// Measures the time between construction and drop, then hands the elapsed
/// [`Duration`] to `on_drop`. Fires on every exit path (return, `?`, panic
/// unwind) the same way a context manager's `__exit__` does.
pub struct Timed<C: Clock, F: FnMut(Duration)> {
    clock: C,
    start: std::time::Instant,
    on_drop: Option<F>,
}

impl<C: Clock, F: FnMut(Duration)> Timed<C, F> {
    pub fn new(clock: C, on_drop: F) -> Self {
        let start = clock.now();
        Self { clock, start, on_drop: Some(on_drop) }
    }
}

impl<C: Clock, F: FnMut(Duration)> Drop for Timed<C, F> {
    fn drop(&mut self) {
        let elapsed = self.clock.now().saturating_duration_since(self.start);
        if let Some(mut f) = self.on_drop.take() {
            f(elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use std::cell::RefCell;
    use std::time::Duration;

    #[test]
    fn reports_elapsed_on_drop() {
        let clock = FakeClock::new();
        let reported = RefCell::new(None);
        {
            let _t = Timed::new(clock.clone(), |d| *reported.borrow_mut() = Some(d));
            clock.advance(Duration::from_secs(3));
        }
        assert_eq!(*reported.borrow(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn reports_even_on_early_return() {
        let clock = FakeClock::new();
        let reported = RefCell::new(None);

        fn inner<F: FnMut(Duration)>(clock: FakeClock, on_drop: F) -> Timed<FakeClock, F> {
            let t = Timed::new(clock.clone(), on_drop);
            clock.advance(Duration::from_millis(500));
            t
        }

        drop(inner(clock.clone(), |d| *reported.borrow_mut() = Some(d)));
        assert_eq!(*reported.borrow(), Some(Duration::from_millis(500)));
    }
}
