use crate::scroll::{ContainerId, ScrollContainer, ScrollError, ScrollGeometry};

/// In-memory scroll container made of fixed-height rows.
///
/// Growth registered with [`SimulatedContainer::defer_growth`] is applied on
/// the next [`SimulatedContainer::layout`] call, the way late-loading images
/// grow a real container after the first paint.
#[derive(Debug, Clone)]
pub struct SimulatedContainer {
    id: ContainerId,
    rows: Vec<f64>,
    client_height: f64,
    scroll_top: f64,
    attached: bool,
    deferred_growth: f64,
    extra_height: f64,
}

impl SimulatedContainer {
    pub fn new(client_height: f64) -> Self {
        Self {
            id: ContainerId::next(),
            rows: Vec::new(),
            client_height,
            scroll_top: 0.0,
            attached: true,
            deferred_growth: 0.0,
            extra_height: 0.0,
        }
    }

    pub fn with_rows(client_height: f64, count: usize, row_height: f64) -> Self {
        let mut container = Self::new(client_height);
        container.rows = vec![row_height; count];
        container
    }

    pub fn append_rows(&mut self, count: usize, row_height: f64) {
        self.rows.extend(std::iter::repeat_n(row_height, count));
    }

    /// Insert rows above the existing content without moving `scroll_top`.
    pub fn prepend_rows(&mut self, count: usize, row_height: f64) {
        let mut rows = vec![row_height; count];
        rows.append(&mut self.rows);
        self.rows = rows;
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn content_height(&self) -> f64 {
        self.rows.iter().sum::<f64>() + self.extra_height
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn defer_growth(&mut self, height: f64) {
        self.deferred_growth += height;
    }

    /// Apply pending growth.
    pub fn layout(&mut self) {
        self.extra_height += self.deferred_growth;
        self.deferred_growth = 0.0;
    }

    /// Position the view as a user drag would, clamped to the content.
    pub fn user_scroll_to(&mut self, scroll_top: f64) {
        let max = (self.content_height() - self.client_height).max(0.0);
        self.scroll_top = scroll_top.clamp(0.0, max);
    }
}

impl ScrollContainer for SimulatedContainer {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn geometry(&self) -> Result<ScrollGeometry, ScrollError> {
        if !self.attached {
            return Err(ScrollError::Detached);
        }
        Ok(ScrollGeometry {
            scroll_top: self.scroll_top,
            scroll_height: self.content_height(),
            client_height: self.client_height,
        })
    }

    fn set_scroll_top(&mut self, scroll_top: f64) -> Result<(), ScrollError> {
        if !self.attached {
            return Err(ScrollError::Detached);
        }
        self.user_scroll_to(scroll_top);
        Ok(())
    }
}
