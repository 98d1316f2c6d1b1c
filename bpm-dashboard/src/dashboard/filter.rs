/// Callbacks a filter widget drives.
pub trait FilterEvents {
    fn on_query_change(&mut self, query: &str);
    fn on_submit(&mut self, query: &str);
}

/// Replaceable search input of the user list.
pub trait FilterWidget: Send {
    /// Text drawn above the table for the current query.
    fn render(&self, current_query: &str) -> String;

    /// Feed one line typed by the user.
    fn handle_input(&self, current_query: &str, line: &str, events: &mut dyn FilterEvents);
}

/// Default filter: each line replaces the query and is submitted at once.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFilter;

impl FilterWidget for TextFilter {
    fn render(&self, current_query: &str) -> String {
        format!("Search users by name [{}]", current_query)
    }

    fn handle_input(&self, _current_query: &str, line: &str, events: &mut dyn FilterEvents) {
        events.on_query_change(line);
        events.on_submit(line);
    }
}

/// Two-step filter: `=<text>` edits the query, an empty line submits it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StagedFilter;

impl FilterWidget for StagedFilter {
    fn render(&self, current_query: &str) -> String {
        format!(
            "Filter: {} (=<name> to edit, empty line to search)",
            if current_query.is_empty() { "-" } else { current_query }
        )
    }

    fn handle_input(&self, current_query: &str, line: &str, events: &mut dyn FilterEvents) {
        if let Some(edit) = line.strip_prefix('=') {
            events.on_query_change(edit);
        } else if line.trim().is_empty() {
            events.on_submit(current_query);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        changes: Vec<String>,
        submits: Vec<String>,
    }

    impl FilterEvents for Recorder {
        fn on_query_change(&mut self, query: &str) {
            self.changes.push(query.to_string());
        }
        fn on_submit(&mut self, query: &str) {
            self.submits.push(query.to_string());
        }
    }

    #[test]
    fn text_filter_changes_and_submits() {
        let mut rec = Recorder::default();
        TextFilter.handle_input("", "John", &mut rec);
        assert_eq!(rec.changes, vec!["John"]);
        assert_eq!(rec.submits, vec!["John"]);
        assert_eq!(TextFilter.render("John"), "Search users by name [John]");
    }

    #[test]
    fn staged_filter_edits_then_submits_current_query() {
        let mut rec = Recorder::default();
        StagedFilter.handle_input("", "=Jane", &mut rec);
        assert_eq!(rec.changes, vec!["Jane"]);
        assert!(rec.submits.is_empty());

        StagedFilter.handle_input("Jane", "", &mut rec);
        assert_eq!(rec.submits, vec!["Jane"]);
        assert!(StagedFilter.render("").contains("Filter: -"));
    }
}
