//! End-reached notification latch.

/// Default distance from the end, in pixels, at which end reached fires.
pub const DEFAULT_END_REACHED_THRESHOLD: f32 = 1000.0;

/// Remembers the content length the end-reached notification last fired for.
///
/// The notification fires once when the remaining scrollable distance drops
/// to the threshold. It stays quiet for the same content length until the
/// content grows (new rows appended upstream), the user scrolls back out of
/// the threshold, or the latch is re-armed explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct EndReachedLatch {
    threshold: f32,
    sent_for_content_length: Option<f32>,
}

impl Default for EndReachedLatch {
    fn default() -> Self {
        Self::new(DEFAULT_END_REACHED_THRESHOLD)
    }
}

impl EndReachedLatch {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            sent_for_content_length: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Feeds the latest distance. Returns true when the notification must fire.
    pub fn observe(&mut self, distance_remaining: f32, content_length: f32) -> bool {
        if !distance_remaining.is_finite() || !content_length.is_finite() {
            return false;
        }
        if distance_remaining > self.threshold {
            if self.sent_for_content_length.take().is_some() {
                log::trace!("end reached re-armed, distance {distance_remaining} beyond threshold");
            }
            return false;
        }
        if self.sent_for_content_length == Some(content_length) {
            return false;
        }
        self.sent_for_content_length = Some(content_length);
        true
    }

    /// Forgets the last crossing so the next one fires again.
    pub fn rearm(&mut self) {
        self.sent_for_content_length = None;
    }

    pub fn has_fired(&self) -> bool {
        self.sent_for_content_length.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_content_length() {
        let mut latch = EndReachedLatch::new(100.0);
        assert!(!latch.observe(150.0, 1000.0));
        assert!(latch.observe(80.0, 1000.0));
        assert!(!latch.observe(40.0, 1000.0));
        assert!(!latch.observe(0.0, 1000.0));
    }

    #[test]
    fn test_rearms_when_content_grows() {
        let mut latch = EndReachedLatch::new(100.0);
        assert!(latch.observe(50.0, 1000.0));
        assert!(latch.observe(50.0, 1400.0));
        assert!(!latch.observe(20.0, 1400.0));
    }

    #[test]
    fn test_rearms_after_scrolling_away() {
        let mut latch = EndReachedLatch::new(100.0);
        assert!(latch.observe(50.0, 1000.0));
        assert!(!latch.observe(300.0, 1000.0));
        assert!(!latch.has_fired());
        assert!(latch.observe(50.0, 1000.0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut latch = EndReachedLatch::new(100.0);
        assert!(latch.observe(100.0, 500.0));
    }

    #[test]
    fn test_ignores_non_finite_input() {
        let mut latch = EndReachedLatch::new(100.0);
        assert!(!latch.observe(f32::NAN, 500.0));
        assert!(!latch.observe(10.0, f32::INFINITY));
        assert!(!latch.has_fired());
    }
}
