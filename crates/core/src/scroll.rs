/// Offsets closer than this are treated as equal.
const SCROLL_DELTA_EPSILON: f32 = 1.0;

/// Follow-bottom scroll state for the conversation list.
///
/// Offsets grow downward from zero. Every content-size change and layout pass schedules a
/// jump to the end, so the newest message is always visible after it renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollManager {
    offset: f32,
    content_height: f32,
    viewport_height: f32,
    pending_scroll_to_bottom: bool,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            offset: 0.0,
            content_height: 0.0,
            viewport_height: 0.0,
            pending_scroll_to_bottom: true,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll_to_bottom
    }

    pub fn request_scroll_to_bottom(&mut self) {
        self.pending_scroll_to_bottom = true;
    }

    pub fn update_content_size(&mut self, content_height: f32, viewport_height: f32) {
        self.content_height = content_height.max(0.0);
        self.viewport_height = viewport_height.max(0.0);
        self.offset = self.offset.min(self.max_offset());
        self.pending_scroll_to_bottom = true;
    }

    pub fn on_layout(&mut self) {
        self.pending_scroll_to_bottom = true;
    }

    /// Records a scroll made by the user. It only lasts until the next content change.
    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, self.max_offset());
    }

    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn is_at_bottom(&self) -> bool {
        (self.max_offset() - self.offset).abs() <= SCROLL_DELTA_EPSILON
    }

    /// Moves to the end if a scroll is pending. Returns whether the offset changed.
    pub fn apply_pending_scroll(&mut self) -> bool {
        if !self.pending_scroll_to_bottom {
            return false;
        }
        self.pending_scroll_to_bottom = false;

        let target = self.max_offset();
        let moved = (target - self.offset).abs() > f32::EPSILON;
        self.offset = target;
        moved
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_stays_at_top() {
        let mut scroll = ScrollManager::new();
        scroll.update_content_size(200.0, 600.0);

        assert!(!scroll.apply_pending_scroll());
        assert_eq!(scroll.offset(), 0.0);
        assert!(scroll.is_at_bottom());
    }

    #[test]
    fn growing_content_jumps_to_end() {
        let mut scroll = ScrollManager::new();
        scroll.update_content_size(900.0, 600.0);
        assert!(scroll.apply_pending_scroll());
        assert_eq!(scroll.offset(), 300.0);

        scroll.update_content_size(980.0, 600.0);
        assert!(scroll.apply_pending_scroll());
        assert_eq!(scroll.offset(), 380.0);
        assert!(!scroll.has_pending_scroll());
    }

    #[test]
    fn follow_is_unconditional_after_user_scroll() {
        let mut scroll = ScrollManager::new();
        scroll.update_content_size(1_000.0, 400.0);
        scroll.apply_pending_scroll();

        scroll.set_offset(50.0);
        assert!(!scroll.is_at_bottom());

        scroll.on_layout();
        assert!(scroll.apply_pending_scroll());
        assert!(scroll.is_at_bottom());
    }

    #[test]
    fn user_offset_is_clamped() {
        let mut scroll = ScrollManager::new();
        scroll.update_content_size(500.0, 400.0);
        scroll.set_offset(10_000.0);
        assert_eq!(scroll.offset(), 100.0);
        scroll.set_offset(-3.0);
        assert_eq!(scroll.offset(), 0.0);
    }
}
