//! Clause-based builder for the single-line event renderings.
//!
//! A rendering is a fixed head followed by optional clauses appended in a
//! fixed order and joined with one separator. Log parsers downstream depend
//! on that order, so each event's `render` lists its clauses top to bottom.

use std::fmt::Display;

use chrono::{DateTime, Utc};

/// Ordered, append-only list of rendered fragments.
#[derive(Debug, Clone)]
pub struct Clauses {
    separator: &'static str,
    fragments: Vec<String>,
}

impl Clauses {
    /// Starts a rendering with its mandatory head.
    #[must_use]
    pub fn new(separator: &'static str, head: impl Display) -> Self {
        Self {
            separator,
            fragments: vec![head.to_string()],
        }
    }

    /// Appends a clause unconditionally.
    pub fn push(&mut self, clause: impl Display) {
        self.fragments.push(clause.to_string());
    }

    /// Appends a clause when one is given.
    pub fn push_opt<T: Display>(&mut self, clause: Option<T>) {
        if let Some(clause) = clause {
            self.push(clause);
        }
    }

    /// Joins all fragments.
    #[must_use]
    pub fn finish(&self) -> String {
        self.fragments.join(self.separator)
    }
}

/// Formats an optional instant, printing an unset one as the default instant.
///
/// `DateTime::<Utc>::default()` is the Unix epoch, so an unset timestamp
/// renders as `1970-01-01 00:00:00 UTC`.
#[must_use]
pub fn instant(value: Option<DateTime<Utc>>) -> String {
    value.unwrap_or_default().to_string()
}
