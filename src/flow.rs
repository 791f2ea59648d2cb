//! Per-direction flow-control window accounting.
//!
//! One controller tracks one direction of one scope (a stream, or the
//! connection as a whole when the driver owns one). DATA consumes the
//! window; WINDOW_UPDATE replenishes it; `create_window_update` decides
//! when the local side should replenish the peer.

use tracing::trace;

/// Largest window the protocol can express (31 bits).
pub const MAX_WINDOW_SIZE: u32 = 0x7fff_ffff;

/// Flow-control window with threshold-based update generation.
#[derive(Debug, Clone)]
pub struct FlowController {
    /// Current window. Signed: SETTINGS changes can push it negative.
    current_window: i64,
    /// Ceiling the window is replenished back to.
    max_window: u32,
    /// Refill trigger: below this, `create_window_update` fires.
    threshold: u32,
}

impl FlowController {
    /// Create a controller. `max_window` is capped at 2^31-1; the
    /// threshold defaults to half of it.
    pub fn new(max_window: u32) -> Self {
        let max_window = max_window.min(MAX_WINDOW_SIZE);
        Self {
            current_window: max_window as i64,
            max_window,
            threshold: max_window / 2,
        }
    }

    /// Create a controller with an explicit refill threshold.
    pub fn with_threshold(max_window: u32, threshold: u32) -> Self {
        let max_window = max_window.min(MAX_WINDOW_SIZE);
        Self {
            current_window: max_window as i64,
            max_window,
            threshold,
        }
    }

    /// Current window, possibly negative.
    pub fn current_window(&self) -> i64 {
        self.current_window
    }

    /// Window ceiling.
    pub fn max_window(&self) -> u32 {
        self.max_window
    }

    /// Account for `n` payload bytes consuming this window.
    pub fn receive(&mut self, n: usize) {
        self.current_window -= n as i64;
        trace!(window = self.current_window, consumed = n, "window receive");
    }

    /// Apply a WINDOW_UPDATE increment to this window.
    pub fn apply_window_update(&mut self, n: u32) {
        self.current_window = (self.current_window + n as i64).min(MAX_WINDOW_SIZE as i64);
        trace!(window = self.current_window, increment = n, "window update");
    }

    /// Compute the increment a WINDOW_UPDATE should carry, or `None`
    /// when no update is due: the window is still above the threshold,
    /// already at the ceiling, or the computed increment is not
    /// positive.
    pub fn create_window_update(&mut self) -> Option<u32> {
        if self.current_window >= self.threshold as i64 {
            return None;
        }
        if self.current_window >= self.max_window as i64 {
            return None;
        }
        let increment = (self.max_window as i64 - self.current_window).min(MAX_WINDOW_SIZE as i64);
        if increment <= 0 {
            return None;
        }
        self.current_window += increment;
        Some(increment as u32)
    }

    /// Grow or shrink the ceiling (SETTINGS initial_window_size change),
    /// shifting the current window by the same delta.
    pub fn resize(&mut self, max_window: u32) {
        let max_window = max_window.min(MAX_WINDOW_SIZE);
        let delta = max_window as i64 - self.max_window as i64;
        self.current_window += delta;
        self.max_window = max_window;
        self.threshold = self.threshold.min(max_window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_update_above_threshold() {
        let mut fc = FlowController::new(65_535);
        fc.receive(100);
        assert_eq!(fc.create_window_update(), None);
    }

    #[test]
    fn test_update_refills_to_max() {
        let mut fc = FlowController::new(65_535);
        fc.receive(40_000);
        assert_eq!(fc.current_window(), 25_535);
        assert_eq!(fc.create_window_update(), Some(40_000));
        assert_eq!(fc.current_window(), 65_535);
        // A second call has nothing to do.
        assert_eq!(fc.create_window_update(), None);
    }

    #[test]
    fn test_negative_window_refills_fully() {
        let mut fc = FlowController::new(1_000);
        fc.receive(1_500);
        assert_eq!(fc.current_window(), -500);
        assert_eq!(fc.create_window_update(), Some(1_500));
        assert_eq!(fc.current_window(), 1_000);
    }

    #[test]
    fn test_max_window_capped() {
        let fc = FlowController::new(u32::MAX);
        assert_eq!(fc.max_window(), MAX_WINDOW_SIZE);
    }

    #[test]
    fn test_resize_shifts_current() {
        let mut fc = FlowController::new(1_000);
        fc.receive(400);
        fc.resize(2_000);
        assert_eq!(fc.current_window(), 1_600);
        fc.resize(500);
        assert_eq!(fc.current_window(), 100);
    }
}
