//! Structured Views
//!
//! Read-only projections of the amalgamated tree into the shapes other agent
//! subsystems consume. Every projection is recomputed in full after each merge.
//! Missing subtrees give empty views; malformed entries are skipped and
//! reported as warnings so one bad entry never costs the rest of the view.

pub mod schedule;
pub mod watched_files;

pub use schedule::{extract_schedule, ScheduledQuery};
pub use watched_files::{extract_watched_files, WatchedFiles};

use crate::error::ConfigWarning;

/// A view value together with the entries dropped while building it
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub value: T,
    pub warnings: Vec<ConfigWarning>,
}

impl<T: Default> Default for Extracted<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            warnings: Vec::new(),
        }
    }
}
