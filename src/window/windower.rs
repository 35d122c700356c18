//! Lazy window generator

use super::types::{Interval, Window};

/// Produces consecutive windows over `[start, end)`.
///
/// The end instant is fixed at construction so iteration always terminates.
/// Cloning yields an independent iterator from the same position.
#[derive(Debug, Clone)]
pub struct Windower {
    next_start: i64,
    end: i64,
    step_ms: i64,
}

impl Windower {
    /// Window `[start_ms, end_ms)` by the given interval
    pub fn new(start_ms: i64, end_ms: i64, interval: Interval) -> Self {
        Self::with_step_ms(start_ms, end_ms, interval.millis())
    }

    /// Window `[start_ms, end_ms)` by an arbitrary step
    pub fn with_step_ms(start_ms: i64, end_ms: i64, step_ms: i64) -> Self {
        Self {
            next_start: start_ms,
            end: end_ms,
            step_ms: step_ms.max(1),
        }
    }

    /// The fixed upper bound
    pub fn end_ms(&self) -> i64 {
        self.end
    }
}

impl Iterator for Windower {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.next_start >= self.end {
            return None;
        }

        let window_end = self.next_start.saturating_add(self.step_ms).min(self.end);
        let window = Window::new(self.next_start, window_end);
        self.next_start = window_end;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next_start >= self.end {
            return (0, Some(0));
        }
        let span = self.end.abs_diff(self.next_start);
        let windows = span.div_ceil(self.step_ms.unsigned_abs());
        match usize::try_from(windows) {
            Ok(count) => (count, Some(count)),
            Err(_) => (usize::MAX, None),
        }
    }
}
