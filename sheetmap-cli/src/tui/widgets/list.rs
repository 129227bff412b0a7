use crossterm::event::KeyCode;

/// Manages list selection and scrolling state
#[derive(Debug, Clone)]
pub struct ListState {
    selected: Option<usize>,
    scroll_offset: usize,
    /// Rows kept visible between the selection and the viewport edge
    scroll_off: usize,
    /// Up on the first row selects the last, and vice versa
    wrap_around: bool,
    /// Set by the view on every frame; paging falls back to the caller's height
    viewport_height: Option<usize>,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ListState {
    /// Create a new ListState with no selection
    pub fn new() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            scroll_off: 2,
            wrap_around: true,
            viewport_height: None,
        }
    }

    /// Create a new ListState with first item selected
    pub fn with_selection() -> Self {
        Self {
            selected: Some(0),
            ..Self::new()
        }
    }

    /// Set the viewport height (called by the view with the actual area height)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = Some(height);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Keep the selection inside a list that now has `item_count` items
    pub fn clamp(&mut self, item_count: usize) {
        self.selected = match (self.selected, item_count) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(sel), n) => Some(sel.min(n - 1)),
        };
        if item_count == 0 {
            self.scroll_offset = 0;
        } else if let Some(height) = self.viewport_height {
            self.update_scroll(height, item_count);
        }
    }

    /// Handle navigation key, returns true if handled
    /// Uses stored viewport_height if available, otherwise falls back to provided visible_height
    pub fn handle_key(&mut self, key: KeyCode, item_count: usize, visible_height: usize) -> bool {
        if item_count == 0 {
            return false;
        }

        let height = self.viewport_height.unwrap_or(visible_height);

        match key {
            KeyCode::Up => self.move_up(item_count),
            KeyCode::Down => self.move_down(item_count),
            KeyCode::PageUp => {
                let sel = self.selected.unwrap_or(0);
                self.selected = Some(sel.saturating_sub(height));
            }
            KeyCode::PageDown => {
                let sel = self.selected.unwrap_or(0);
                self.selected = Some((sel + height).min(item_count - 1));
            }
            KeyCode::Home => self.selected = Some(0),
            KeyCode::End => self.selected = Some(item_count - 1),
            _ => return false,
        }

        // Ensure the new selection is visible
        self.update_scroll(height, item_count);
        true
    }

    fn move_up(&mut self, item_count: usize) {
        self.selected = match self.selected {
            Some(0) if self.wrap_around => Some(item_count - 1),
            Some(0) => Some(0),
            Some(sel) => Some(sel - 1),
            None => Some(0),
        };
    }

    fn move_down(&mut self, item_count: usize) {
        self.selected = match self.selected {
            Some(sel) if sel + 1 < item_count => Some(sel + 1),
            Some(_) if self.wrap_around => Some(0),
            Some(sel) => Some(sel),
            None => Some(0),
        };
    }

    /// Update scroll offset based on selection and visible height
    pub fn update_scroll(&mut self, visible_height: usize, item_count: usize) {
        if let Some(sel) = self.selected {
            let min_scroll = sel.saturating_sub(visible_height.saturating_sub(self.scroll_off + 1));
            let max_scroll = sel.saturating_sub(self.scroll_off);

            if self.scroll_offset < min_scroll {
                self.scroll_offset = min_scroll;
            } else if self.scroll_offset > max_scroll {
                self.scroll_offset = max_scroll;
            }

            let max_offset = item_count.saturating_sub(visible_height);
            self.scroll_offset = self.scroll_offset.min(max_offset);
        }
    }
}
