use agentview_timeline::{ContainerId, ScrollContainer, ScrollError, ScrollGeometry};

/// Line-addressed scroll container for terminal output. One line is one unit
/// of height.
#[derive(Debug, Clone)]
pub struct TextPane {
    id: ContainerId,
    lines: Vec<String>,
    height: usize,
    scroll_top: f64,
}

impl TextPane {
    pub fn new(height: usize) -> Self {
        Self {
            id: ContainerId::next(),
            lines: Vec::new(),
            height,
            scroll_top: 0.0,
        }
    }

    /// Replace the content. Scroll position is kept, clamped to the new size.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        let max = self.max_scroll_top();
        self.scroll_top = self.scroll_top.min(max);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn max_scroll_top(&self) -> f64 {
        self.lines.len().saturating_sub(self.height) as f64
    }
}

impl ScrollContainer for TextPane {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn geometry(&self) -> Result<ScrollGeometry, ScrollError> {
        if self.height == 0 {
            return Err(ScrollError::ZeroHeight);
        }
        Ok(ScrollGeometry {
            scroll_top: self.scroll_top,
            scroll_height: self.lines.len() as f64,
            client_height: self.height as f64,
        })
    }

    fn set_scroll_top(&mut self, scroll_top: f64) -> Result<(), ScrollError> {
        self.scroll_top = scroll_top.clamp(0.0, self.max_scroll_top()).floor();
        Ok(())
    }
}
