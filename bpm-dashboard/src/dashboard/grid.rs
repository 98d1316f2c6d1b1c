/// Keys that move focus inside the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    CtrlHome,
    CtrlEnd,
}

impl NavKey {
    pub fn parse(s: &str) -> Option<Self> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" => NavKey::Up,
            "down" | "arrowdown" => NavKey::Down,
            "left" | "arrowleft" => NavKey::Left,
            "right" | "arrowright" => NavKey::Right,
            "home" => NavKey::Home,
            "end" => NavKey::End,
            "ctrl-home" | "ctrl+home" => NavKey::CtrlHome,
            "ctrl-end" | "ctrl+end" => NavKey::CtrlEnd,
            _ => return None,
        };
        Some(key)
    }
}

/// Focused cell of a `rows` x `cols` grid. Moves are clamped at the edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridFocus {
    rows: usize,
    cols: usize,
    focused: Option<(usize, usize)>,
}

impl GridFocus {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut g = GridFocus::default();
        g.resize(rows, cols);
        g
    }

    pub fn focused(&self) -> Option<(usize, usize)> {
        self.focused
    }

    /// Adapt to new dimensions, pulling focus back inside the grid.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        if rows == 0 || cols == 0 {
            self.focused = None;
            return;
        }
        self.focused = Some(match self.focused {
            Some((r, c)) => (r.min(rows - 1), c.min(cols - 1)),
            None => (0, 0),
        });
    }

    /// Focus a cell directly; out-of-range coordinates are clamped.
    pub fn focus(&mut self, row: usize, col: usize) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        self.focused = Some((row.min(self.rows - 1), col.min(self.cols - 1)));
    }

    /// Apply a key; returns whether focus moved.
    pub fn handle(&mut self, key: NavKey) -> bool {
        let Some((r, c)) = self.focused else {
            return false;
        };
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        let next = match key {
            NavKey::Up => (r.saturating_sub(1), c),
            NavKey::Down => ((r + 1).min(last_row), c),
            NavKey::Left => (r, c.saturating_sub(1)),
            NavKey::Right => (r, (c + 1).min(last_col)),
            NavKey::Home => (r, 0),
            NavKey::End => (r, last_col),
            NavKey::CtrlHome => (0, 0),
            NavKey::CtrlEnd => (last_row, last_col),
        };
        self.focused = Some(next);
        next != (r, c)
    }
}
