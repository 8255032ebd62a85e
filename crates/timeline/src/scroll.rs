use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one scroll container, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Read/write access to the element that scrolls the timeline.
///
/// Implementations report geometry in pixels. Measurement may fail when the
/// container is not attached or has not been laid out yet.
pub trait ScrollContainer {
    /// Scroll state captured from one container is meaningless on another;
    /// implementations return the same id for as long as they back the view.
    fn id(&self) -> ContainerId;

    fn geometry(&self) -> Result<ScrollGeometry, ScrollError>;

    fn set_scroll_top(&mut self, scroll_top: f64) -> Result<(), ScrollError>;
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ScrollError {
    #[error("scroll container is not attached")]
    Detached,

    #[error("scroll container has zero height")]
    ZeroHeight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollGeometry {
    /// Rejects geometry that cannot be measured meaningfully.
    pub fn checked(self) -> Result<Self, ScrollError> {
        if self.client_height <= 0.0 || self.scroll_height <= 0.0 {
            return Err(ScrollError::ZeroHeight);
        }
        Ok(self)
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn distance_from_bottom(&self) -> f64 {
        (self.max_scroll_top() - self.scroll_top).max(0.0)
    }

    pub fn is_at_bottom(&self, tolerance: f64) -> bool {
        self.distance_from_bottom() <= tolerance
    }

    pub fn is_near_top(&self, threshold: f64) -> bool {
        self.scroll_top <= threshold
    }
}

/// Measure `container`, treating zero-height layouts as failures.
pub fn measure(container: &dyn ScrollContainer) -> Result<ScrollGeometry, ScrollError> {
    container.geometry()?.checked()
}
