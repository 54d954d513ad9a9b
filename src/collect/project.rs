//! Embedded-source adapter: SQL cells inside notebook source files
//!
//! Notebook exports keep SQL cells as comment lines:
//!
//! ```text
//! # MAGIC %sql
//! # MAGIC create or replace view sales.v_orders as
//! # MAGIC select * from sales.orders;
//!
//! # COMMAND ----------
//! ```
//!
//! A block starts at a `# MAGIC %sql` line and ends at the next blank line or at the
//! end of the file. The tag is removed from each line, the block is joined and then
//! split into statements.

use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use rayon::prelude::*;
use tracing::{debug, info};

use super::assemble;
use super::progress::ProgressReporter;
use crate::error::SchemaCompareError;
use crate::model::{SchemaMap, Side};
use crate::parser::{split_statements, ParseContext};

/// Line tag of notebook cells that are not Python.
pub const MAGIC_TAG: &str = "# MAGIC";

/// First line of a SQL cell.
pub const SQL_START_TAG: &str = "# MAGIC %sql";

const SOURCE_EXTENSION: &str = "py";

/// Minimum number of files to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
fn read_file_with_encoding_fallback(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ))
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}

/// All notebook source files under `root`, sorted by path.
pub fn find_source_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
        .collect();
    files.sort();
    files
}

/// Candidate statements of every SQL cell in one file's content.
pub fn extract_statements(content: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut block = String::new();
    let mut in_block = false;

    for line in content.lines() {
        let trimmed = line.trim_matches(' ');

        if trimmed.starts_with(SQL_START_TAG) {
            in_block = true;
            continue;
        }
        if trimmed.trim().is_empty() {
            in_block = false;
            statements.extend(split_statements(&std::mem::take(&mut block)));
            continue;
        }
        if in_block {
            let text = trimmed
                .strip_prefix(MAGIC_TAG)
                .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                .unwrap_or(trimmed);
            if !text.trim().is_empty() {
                block.push_str(text);
                block.push('\n');
            }
        }
    }
    statements.extend(split_statements(&block));

    statements
}

fn read_statements(path: &Path) -> Result<Vec<String>, SchemaCompareError> {
    let content =
        read_file_with_encoding_fallback(path).map_err(|e| SchemaCompareError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

    // Strip UTF-8 BOM if present
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);

    let statements = extract_statements(content);
    debug!("{}: {} statement candidates", path.display(), statements.len());
    Ok(statements)
}

/// Collect a schema map from a project folder.
///
/// Files are read in parallel for larger projects, but statements are parsed in sorted
/// file order so that a duplicated definition resolves the same way on every run.
pub fn collect_project(
    root: &Path,
    ctx: &ParseContext<'_>,
    side: Side,
    progress: &mut dyn ProgressReporter,
) -> Result<SchemaMap, SchemaCompareError> {
    let files = find_source_files(root);
    info!("[{side}] Found {} source files in {}", files.len(), root.display());

    let mut statements = Vec::with_capacity(files.len() * 2);
    if files.len() >= PARALLEL_THRESHOLD {
        let results: Vec<Result<Vec<String>, SchemaCompareError>> =
            files.par_iter().map(|file| read_statements(file)).collect();

        // Combine results, propagating the first error if any
        for result in results {
            statements.extend(result?);
        }
    } else {
        for file in &files {
            statements.extend(read_statements(file)?);
        }
    }
    info!("[{side}] Extracted {} statement candidates", statements.len());

    assemble(statements, ctx, side, progress)
}
