//! Core types for schema comparison

use super::text::LineChange;
use crate::model::{ObjectIdentity, Side};

/// What differs about one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffItem {
    /// Object exists only on `side`
    ObjectAdded { side: Side },
    Comment {
        source: Option<String>,
        target: Option<String>,
    },
    /// Return signature of a function
    Returns { source: String, target: String },
    /// Parameter signature of a function
    Parameters { source: String, target: String },
    /// One line of a view or function body diff
    BodyLine(LineChange),
    /// Column exists only on `side`
    ColumnAdded { column: String, side: Side },
    ColumnType {
        column: String,
        source: String,
        target: String,
    },
    ColumnNullable {
        column: String,
        source: bool,
        target: bool,
    },
    ColumnComment {
        column: String,
        source: Option<String>,
        target: Option<String>,
    },
}

/// A single itemized difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Full identity, normalized schema included
    pub identity: ObjectIdentity,
    /// Identity with the short schema label, as shown in reports
    pub label: String,
    pub item: DiffItem,
}

impl Difference {
    /// Whether this entry adds to the difference count. Context lines of a body diff
    /// are reported but do not count.
    pub fn counts(&self) -> bool {
        match &self.item {
            DiffItem::BodyLine(change) => change.is_change(),
            _ => true,
        }
    }
}

/// Counters reported after a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonSummary {
    /// Size of the identity union of both sides
    pub objects_compared: usize,
    pub differing_objects: usize,
    pub total_differences: usize,
}

impl ComparisonSummary {
    pub fn is_clean(&self) -> bool {
        self.total_differences == 0
    }
}

/// Ordered differences plus counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    pub differences: Vec<Difference>,
    pub summary: ComparisonSummary,
}
