use std::time::{Duration, Instant};

/// Drops events that land within `window` of the last accepted one.
///
/// An event exactly `window` after the previous accepted event is still
/// dropped; it has to be strictly later. Events stamped before the last
/// accepted one (clock skew between threads) count as zero elapsed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last_accepted: None }
    }

    pub fn accept(&mut self, at: Instant) -> bool {
        if let Some(prev) = self.last_accepted {
            if at.saturating_duration_since(prev) <= self.window {
                return false;
            }
        }
        self.last_accepted = Some(at);
        true
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_measured_from_last_accepted_event() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_secs(1));
        assert!(d.accept(t0));
        assert!(!d.accept(t0 + Duration::from_millis(300)));
        assert!(!d.accept(t0 + Duration::from_millis(900)));
        // 900ms dropped event does not extend the window
        assert!(d.accept(t0 + Duration::from_millis(1100)));
    }

    #[test]
    fn boundary_is_exclusive() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_secs(1));
        assert!(d.accept(t0));
        assert!(!d.accept(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn reset_forgets_history() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_secs(1));
        assert!(d.accept(t0));
        d.reset();
        assert!(d.accept(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn zero_window_still_drops_same_instant_duplicates() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        assert!(d.accept(t0));
        assert!(!d.accept(t0));
        assert!(d.accept(t0 + Duration::from_millis(1)));
    }
}
