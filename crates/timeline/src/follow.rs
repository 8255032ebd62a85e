use crate::scroll::ScrollGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPin {
    /// New messages scroll the view to the bottom.
    PinnedToLatest,
    Floating,
}

impl ScrollPin {
    pub fn classify(geometry: &ScrollGeometry, bottom_tolerance: f64) -> Self {
        if geometry.is_at_bottom(bottom_tolerance) {
            Self::PinnedToLatest
        } else {
            Self::Floating
        }
    }
}

#[derive(Debug, Clone)]
pub struct FollowState {
    /// Derived from the last observed scroll position.
    pub pin: ScrollPin,
    /// Explicit opt-out of following. Scrolling back to the bottom does not
    /// clear it; only [`FollowState::reattach`] or a reset does.
    pub detached_by_user: bool,
}

impl Default for FollowState {
    fn default() -> Self {
        Self {
            pin: ScrollPin::PinnedToLatest,
            detached_by_user: false,
        }
    }
}

impl FollowState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record the pin derived from a user scroll.
    pub fn observe(&mut self, pin: ScrollPin) {
        self.pin = pin;
    }

    pub fn detach(&mut self) {
        self.detached_by_user = true;
    }

    pub fn reattach(&mut self) {
        self.pin = ScrollPin::PinnedToLatest;
        self.detached_by_user = false;
    }

    pub fn is_pinned(&self) -> bool {
        self.pin == ScrollPin::PinnedToLatest && !self.detached_by_user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_state_detach_and_reattach_roundtrip() {
        let mut state = FollowState::default();
        assert!(state.is_pinned());

        state.detach();
        state.observe(ScrollPin::PinnedToLatest);
        assert!(!state.is_pinned());

        state.reattach();
        assert!(state.is_pinned());

        state.detach();
        state.reset();
        assert!(state.is_pinned());
    }

    #[test]
    fn scroll_position_drives_pin_without_detaching() {
        let mut state = FollowState::default();

        state.observe(ScrollPin::Floating);
        assert!(!state.is_pinned());
        assert!(!state.detached_by_user);

        state.observe(ScrollPin::PinnedToLatest);
        assert!(state.is_pinned());
    }

    #[test]
    fn reattach_pins_even_when_floating() {
        let mut state = FollowState::default();
        state.observe(ScrollPin::Floating);
        state.detach();

        state.reattach();
        assert_eq!(state.pin, ScrollPin::PinnedToLatest);
        assert!(state.is_pinned());
    }

    #[test]
    fn classify_uses_bottom_tolerance() {
        let geometry = ScrollGeometry {
            scroll_top: 900.0,
            scroll_height: 1500.0,
            client_height: 500.0,
        };
        assert_eq!(ScrollPin::classify(&geometry, 50.0), ScrollPin::Floating);
        assert_eq!(ScrollPin::classify(&geometry, 100.0), ScrollPin::PinnedToLatest);
    }
}
