use super::fetch::FetchView;
use super::filter::{FilterEvents, FilterWidget, TextFilter};
use super::grid::{GridFocus, NavKey};
use super::render::{empty_message, render_table, COLUMNS, LOADING_MESSAGE};

/// The user list: filter widget, status line and table.
pub struct UserList {
    filter: Box<dyn FilterWidget>,
    query: String,
    grid: GridFocus,
}

struct ListEvents<'a> {
    query: &'a mut String,
    submitted: Option<String>,
}

impl FilterEvents for ListEvents<'_> {
    fn on_query_change(&mut self, query: &str) {
        *self.query = query.to_string();
    }

    fn on_submit(&mut self, query: &str) {
        self.submitted = Some(query.to_string());
    }
}

impl Default for UserList {
    fn default() -> Self {
        Self::new(Box::new(TextFilter))
    }
}

impl UserList {
    pub fn new(filter: Box<dyn FilterWidget>) -> Self {
        Self {
            filter,
            query: String::new(),
            grid: GridFocus::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Route a line of input through the filter widget. Returns the query to
    /// search for when the widget submitted one.
    pub fn handle_input(&mut self, line: &str) -> Option<String> {
        let current = self.query.clone();
        let mut events = ListEvents {
            query: &mut self.query,
            submitted: None,
        };
        self.filter.handle_input(&current, line, &mut events);
        events.submitted
    }

    pub fn navigate(&mut self, key: NavKey) -> bool {
        self.grid.handle(key)
    }

    pub fn focused(&self) -> Option<(usize, usize)> {
        self.grid.focused()
    }

    /// Keep focus inside the table after the rows changed.
    pub fn sync_rows(&mut self, rows: usize) {
        self.grid.resize(rows, COLUMNS.len());
    }

    pub fn render(&self, view: &FetchView) -> String {
        let mut out = vec!["Users".to_string(), self.filter.render(&self.query)];
        if view.loading() {
            out.push(LOADING_MESSAGE.to_string());
        }
        if !view.loading() && view.rows.is_empty() {
            out.push(empty_message(&view.last_searched));
        } else {
            out.push(render_table(&view.rows, self.grid.focused()));
        }
        out.join("\n")
    }
}
