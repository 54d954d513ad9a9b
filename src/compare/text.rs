//! Line-by-line diff of view and function bodies

use similar::{ChangeTag, TextDiff};

/// Unchanged lines kept around each change block.
pub const CONTEXT_LINES: usize = 3;

/// One line of a body diff. Line numbers are 1-based on their own side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChange {
    /// Line only in the source body
    Removed { line: usize, text: String },
    /// Line only in the target body
    Added { line: usize, text: String },
    /// Unchanged line bridging a change block
    Context {
        source_line: usize,
        target_line: usize,
        text: String,
    },
}

impl LineChange {
    /// Added and removed lines are differences; context lines are not.
    pub fn is_change(&self) -> bool {
        !matches!(self, LineChange::Context { .. })
    }

    pub fn text(&self) -> &str {
        match self {
            LineChange::Removed { text, .. }
            | LineChange::Added { text, .. }
            | LineChange::Context { text, .. } => text,
        }
    }

    /// Unified-diff prefix: `-`, `+` or a space.
    pub fn marker(&self) -> char {
        match self {
            LineChange::Removed { .. } => '-',
            LineChange::Added { .. } => '+',
            LineChange::Context { .. } => ' ',
        }
    }
}

/// Diff two bodies split on `\n`. Identical bodies give an empty list.
pub fn diff_lines(source: &str, target: &str) -> Vec<LineChange> {
    let source_lines: Vec<&str> = source.split('\n').collect();
    let target_lines: Vec<&str> = target.split('\n').collect();
    let diff = TextDiff::from_slices(&source_lines, &target_lines);

    let mut changes = Vec::new();
    for group in diff.grouped_ops(CONTEXT_LINES) {
        for op in &group {
            for change in diff.iter_changes(op) {
                let text = change.value().to_string();
                let change = match (change.tag(), change.old_index(), change.new_index()) {
                    (ChangeTag::Delete, Some(old), _) => LineChange::Removed {
                        line: old + 1,
                        text,
                    },
                    (ChangeTag::Insert, _, Some(new)) => LineChange::Added {
                        line: new + 1,
                        text,
                    },
                    (ChangeTag::Equal, Some(old), Some(new)) => LineChange::Context {
                        source_line: old + 1,
                        target_line: new + 1,
                        text,
                    },
                    _ => continue,
                };
                changes.push(change);
            }
        }
    }
    changes
}
