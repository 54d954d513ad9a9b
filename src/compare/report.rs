//! Tabular and narrative projections of a comparison, and their console printers
//!
//! Both projections are built from the same [`Difference`] list, so they always carry
//! the same entries in the same order.

use std::io::{self, Write};
use std::time::Duration;

use super::text::LineChange;
use super::types::{ComparisonResult, ComparisonSummary, DiffItem, Difference};
use crate::model::{ObjectKind, Side, NULL_COMMENT};

const OBJECT_ADDED: &str = "(object added)";
const COLUMN_ADDED: &str = "(column added)";
const SEPARATOR_FILL: char = '·';

/// How differences are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Four-column table, optionally with a separator row between objects
    Table { separators: bool },
    /// One block of free-text lines per object
    Narrative,
}

/// `[object, item, source, target]` row. Object and item are blank on continuation rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub object: String,
    pub item: String,
    pub source: String,
    pub target: String,
}

impl TableRow {
    fn cells(&self) -> [&str; 4] {
        [&self.object, &self.item, &self.source, &self.target]
    }
}

/// All narrative lines for one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrativeBlock {
    pub object: String,
    pub lines: Vec<String>,
}

/// One presentation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffEntry {
    Row(TableRow),
    /// Visual break between two objects in the table
    Separator,
    Narrative(NarrativeBlock),
}

fn comment_text(comment: &Option<String>) -> &str {
    comment.as_deref().unwrap_or(NULL_COMMENT)
}

fn numbered(line: usize, text: &str) -> String {
    format!("{line:>3}: {text}")
}

fn added_cells(side: Side, marker: &str) -> (String, String) {
    match side {
        Side::Source => (marker.to_string(), String::new()),
        Side::Target => (String::new(), marker.to_string()),
    }
}

/// Table rows in difference order.
pub fn table_rows(result: &ComparisonResult) -> Vec<TableRow> {
    let mut rows = Vec::with_capacity(result.differences.len());
    let mut previous: Option<&Difference> = None;
    let mut body_started = false;

    for difference in &result.differences {
        let first_of_object = previous.map_or(true, |p| p.identity != difference.identity);
        if first_of_object {
            body_started = false;
        }

        let (item, source, target) = match &difference.item {
            DiffItem::ObjectAdded { side } => {
                let (s, t) = added_cells(*side, OBJECT_ADDED);
                (String::new(), s, t)
            }
            DiffItem::Comment { source, target } => (
                "comment".to_string(),
                comment_text(source).to_string(),
                comment_text(target).to_string(),
            ),
            DiffItem::Returns { source, target } => {
                ("returns".to_string(), source.clone(), target.clone())
            }
            DiffItem::Parameters { source, target } => {
                ("parameters".to_string(), source.clone(), target.clone())
            }
            DiffItem::BodyLine(change) => {
                let item = if body_started {
                    String::new()
                } else {
                    "definition".to_string()
                };
                body_started = true;
                let (s, t) = match change {
                    LineChange::Removed { line, text } => (numbered(*line, text), String::new()),
                    LineChange::Added { line, text } => (String::new(), numbered(*line, text)),
                    LineChange::Context {
                        source_line,
                        target_line,
                        text,
                    } => (numbered(*source_line, text), numbered(*target_line, text)),
                };
                (item, s, t)
            }
            DiffItem::ColumnAdded { column, side } => {
                let (s, t) = added_cells(*side, COLUMN_ADDED);
                (format!("column:{column}"), s, t)
            }
            DiffItem::ColumnType {
                column,
                source,
                target,
            } => (
                format!("column:{column}"),
                format!("type:{source}"),
                format!("type:{target}"),
            ),
            DiffItem::ColumnNullable {
                column,
                source,
                target,
            } => (
                format!("column:{column}"),
                format!("nullable:{source}"),
                format!("nullable:{target}"),
            ),
            DiffItem::ColumnComment {
                column,
                source,
                target,
            } => (
                format!("column:{column}"),
                format!("comment:{}", comment_text(source)),
                format!("comment:{}", comment_text(target)),
            ),
        };

        rows.push(TableRow {
            object: if first_of_object {
                difference.label.clone()
            } else {
                String::new()
            },
            item,
            source,
            target,
        });
        previous = Some(difference);
    }

    rows
}

/// Narrative blocks, one per differing object.
pub fn narrative(result: &ComparisonResult) -> Vec<NarrativeBlock> {
    let mut blocks: Vec<NarrativeBlock> = Vec::new();
    let mut previous: Option<&Difference> = None;

    for difference in &result.differences {
        let same_object = previous.is_some_and(|p| p.identity == difference.identity);
        let body_continues =
            same_object && previous.is_some_and(|p| matches!(p.item, DiffItem::BodyLine(_)));
        if !same_object {
            blocks.push(NarrativeBlock {
                object: difference.label.clone(),
                lines: Vec::new(),
            });
        }
        let Some(block) = blocks.last_mut() else {
            continue;
        };
        let lines = &mut block.lines;

        match &difference.item {
            DiffItem::ObjectAdded { side } => lines.push(format!("Object added in {side}")),
            DiffItem::Comment { source, target } => {
                lines.push("Object comment is different".to_string());
                lines.push(format!("Source object comment: {}", comment_text(source)));
                lines.push(format!("Target object comment: {}", comment_text(target)));
            }
            DiffItem::Returns { source, target } => {
                lines.push("Function return type is different".to_string());
                lines.push(format!("Source return type: {source}"));
                lines.push(format!("Target return type: {target}"));
            }
            DiffItem::Parameters { source, target } => {
                lines.push("Function parameters different".to_string());
                lines.push(format!("Source parameters: {source}"));
                lines.push(format!("Target parameters: {target}"));
            }
            DiffItem::BodyLine(change) => {
                if !body_continues {
                    lines.push("Object definition is different".to_string());
                    lines.push("Differences:".to_string());
                }
                lines.push(format!("{}{}", change.marker(), change.text()));
            }
            DiffItem::ColumnAdded { column, side } => {
                lines.push(format!("column:{column} is added in {side}"))
            }
            DiffItem::ColumnType {
                column,
                source,
                target,
            } => lines.push(format!(
                "column:{column}, Source type:{source}, Target type:{target}"
            )),
            DiffItem::ColumnNullable {
                column,
                source,
                target,
            } => lines.push(format!(
                "column:{column}, Source nullable:{source}, Target nullable:{target}"
            )),
            DiffItem::ColumnComment {
                column,
                source,
                target,
            } => lines.push(format!(
                "column:{column}, Source comment:{}, Target comment:{}",
                comment_text(source),
                comment_text(target)
            )),
        }
        previous = Some(difference);
    }

    blocks
}

/// Project a comparison onto presentation entries.
pub fn project(result: &ComparisonResult, presentation: Presentation) -> Vec<DiffEntry> {
    match presentation {
        Presentation::Narrative => narrative(result)
            .into_iter()
            .map(DiffEntry::Narrative)
            .collect(),
        Presentation::Table { separators } => {
            let mut entries = Vec::new();
            for row in table_rows(result) {
                if separators && !row.object.is_empty() && !entries.is_empty() {
                    entries.push(DiffEntry::Separator);
                }
                entries.push(DiffEntry::Row(row));
            }
            entries
        }
    }
}

/// Print table entries under `headings`. Narrative entries are skipped.
pub fn print_table<W: Write>(out: &mut W, entries: &[DiffEntry], headings: [&str; 4]) -> io::Result<()> {
    let mut widths = headings.map(|h| h.chars().count());
    for entry in entries {
        if let DiffEntry::Row(row) = entry {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }
    let rule = "-".repeat(1 + widths.iter().map(|w| w + 1).sum::<usize>());

    writeln!(out, "{rule}")?;
    write!(out, "|")?;
    for (heading, width) in headings.iter().zip(widths) {
        write!(out, "{heading:^width$}|")?;
    }
    writeln!(out)?;
    writeln!(out, "{rule}")?;

    for entry in entries {
        match entry {
            DiffEntry::Row(row) => {
                write!(out, "|")?;
                for (cell, width) in row.cells().iter().zip(widths) {
                    write!(out, "{cell:<width$}|")?;
                }
                writeln!(out)?;
            }
            DiffEntry::Separator => {
                write!(out, "|")?;
                for width in widths {
                    write!(out, "{}|", SEPARATOR_FILL.to_string().repeat(width))?;
                }
                writeln!(out)?;
            }
            DiffEntry::Narrative(_) => {}
        }
    }
    writeln!(out, "{rule}")
}

/// Print narrative blocks. Table entries are skipped.
pub fn print_narrative<W: Write>(out: &mut W, entries: &[DiffEntry]) -> io::Result<()> {
    let mut printed = false;
    for entry in entries {
        if let DiffEntry::Narrative(block) = entry {
            writeln!(out)?;
            writeln!(out, "--- Object: {} ---", block.object)?;
            for line in &block.lines {
                writeln!(out, "{line}")?;
            }
            printed = true;
        }
    }
    if printed {
        writeln!(out)?;
    }
    Ok(())
}

/// `Legend: tabl=Tables, view=Views, ...`
pub fn print_legend<W: Write>(out: &mut W) -> io::Result<()> {
    let legend = ObjectKind::ALL
        .iter()
        .map(|k| format!("{}={}", k.code(), k.description()))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "Legend: {legend}")
}

pub fn print_summary<W: Write>(out: &mut W, summary: &ComparisonSummary, elapsed: Duration) -> io::Result<()> {
    writeln!(
        out,
        "{} Compared {} object(s), found {} object(s) different and {} difference(s) [{:.2}s]",
        if summary.is_clean() { "[Ok]" } else { "[Diff]" },
        summary.objects_compared,
        summary.differing_objects,
        summary.total_differences,
        elapsed.as_secs_f64()
    )
}
