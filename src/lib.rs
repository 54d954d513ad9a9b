//! rust-schemacompare: structural schema comparison for Databricks
//!
//! Reads table, view and function definitions from live catalog schemas or from
//! notebook project folders, and reports every structural difference between two
//! sides, or dumps one side as JSON.

pub mod collect;
pub mod compare;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod util;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use collect::{collect_catalog, collect_project, CatalogClient, ProgressReporter, SnapshotCatalog};
use compare::{compare_schema_maps, ComparisonResult, CompareInputs, DiffEntry, Presentation};
use config::{Config, SideSpec};
use model::{compile_pattern, SchemaMap, SchemaNormalizer, Selection, Side};
use parser::ParseContext;

pub use error::SchemaCompareError;

/// Name filter used when none is given
pub const DEFAULT_FILTER: &str = "*";

/// Options for comparing two sides
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Project folder, schema list (`a+b`) or schema group
    pub source: String,
    pub target: String,
    /// Glob over bare object names
    pub filter: String,
    pub presentation: Presentation,
    pub config_path: PathBuf,
    /// Recorded catalog answering the catalog queries
    pub catalog_snapshot: Option<PathBuf>,
}

/// Options for dumping one side as JSON
#[derive(Debug, Clone)]
pub struct DumpOptions {
    pub source: String,
    pub filter: String,
    pub config_path: PathBuf,
    pub catalog_snapshot: Option<PathBuf>,
}

/// A finished comparison ready to print.
#[derive(Debug, Clone)]
pub struct CompareReport {
    pub result: ComparisonResult,
    pub entries: Vec<DiffEntry>,
    pub presentation: Presentation,
    /// Column headings of the source and target sides
    pub source_label: String,
    pub target_label: String,
    pub elapsed: Duration,
}

impl CompareReport {
    /// Print the differences (if any), the legend in table mode, and the summary line.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if !self.entries.is_empty() {
            match self.presentation {
                Presentation::Narrative => compare::print_narrative(out, &self.entries)?,
                Presentation::Table { .. } => {
                    let headings = [
                        "Object",
                        "Item",
                        self.source_label.as_str(),
                        self.target_label.as_str(),
                    ];
                    compare::print_table(out, &self.entries, headings)?;
                    compare::print_legend(out)?;
                }
            }
        }
        compare::print_summary(out, &self.result.summary, self.elapsed)
    }
}

fn open_catalog(snapshot: Option<&PathBuf>) -> Result<Option<SnapshotCatalog>> {
    match snapshot {
        Some(path) => {
            let catalog = SnapshotCatalog::load(path)?;
            info!("Loaded catalog snapshot with {} queries", catalog.len());
            Ok(Some(catalog))
        }
        None => Ok(None),
    }
}

fn both_folders() -> SchemaCompareError {
    SchemaCompareError::InvalidArguments {
        message: "Source and target cannot be both folders".to_string(),
    }
}

/// Read one side. A folder side selects the schemas of `other`.
fn collect_side(
    spec: &SideSpec,
    other: &SideSpec,
    side: Side,
    filter: &str,
    normalizer: &SchemaNormalizer,
    client: Option<&mut dyn CatalogClient>,
    progress: &mut dyn ProgressReporter,
) -> Result<SchemaMap> {
    match (spec, other) {
        (SideSpec::Folder(root), SideSpec::Schemas(schemas)) => {
            let selection = Selection::new(schemas, filter, normalizer)?;
            let ctx = ParseContext {
                selection: &selection,
                normalizer,
            };
            Ok(collect_project(root, &ctx, side, progress)?)
        }
        (SideSpec::Folder(_), SideSpec::Folder(_)) => Err(both_folders().into()),
        (SideSpec::Schemas(schemas), _) => {
            let client = client.ok_or_else(|| SchemaCompareError::CatalogUnavailable {
                schemas: schemas.join("+"),
            })?;
            let pattern = compile_pattern(filter)?;
            Ok(collect_catalog(client, schemas, &pattern, normalizer, side, progress)?)
        }
    }
}

/// Compare two sides and build the report.
pub fn compare(options: &CompareOptions, progress: &mut dyn ProgressReporter) -> Result<CompareReport> {
    let config = Config::load(&options.config_path)?;
    let source = config.resolve_side(&options.source);
    let target = config.resolve_side(&options.target);

    if source.is_folder() && target.is_folder() {
        return Err(both_folders().into());
    }

    let normalizer = config.normalizer();
    let ignore_patterns = config.ignore_patterns()?;
    let mut catalog = open_catalog(options.catalog_snapshot.as_ref())?;
    let start = Instant::now();

    let source_map = collect_side(
        &source,
        &target,
        Side::Source,
        &options.filter,
        &normalizer,
        catalog.as_mut().map(|c| c as &mut dyn CatalogClient),
        progress,
    )?;
    let target_map = collect_side(
        &target,
        &source,
        Side::Target,
        &options.filter,
        &normalizer,
        catalog.as_mut().map(|c| c as &mut dyn CatalogClient),
        progress,
    )?;

    let inputs = CompareInputs {
        source: &source_map,
        target: &target_map,
        source_is_folder: source.is_folder(),
        target_is_folder: target.is_folder(),
        ignore_patterns: &ignore_patterns,
        normalizer: &normalizer,
    };
    let result = compare_schema_maps(&inputs, progress);
    progress.finish();

    Ok(CompareReport {
        entries: compare::project(&result, options.presentation),
        result,
        presentation: options.presentation,
        source_label: source.label(),
        target_label: target.label(),
        elapsed: start.elapsed(),
    })
}

/// Read one side with no comparison and serialize it as JSON.
///
/// A folder keeps every parsed object; catalog schemas are still name-filtered.
pub fn dump(options: &DumpOptions, progress: &mut dyn ProgressReporter) -> Result<String> {
    let config = Config::load(&options.config_path)?;
    let normalizer = config.normalizer();

    let map = match config.resolve_side(&options.source) {
        SideSpec::Folder(root) => {
            let selection = Selection::All;
            let ctx = ParseContext {
                selection: &selection,
                normalizer: &normalizer,
            };
            collect_project(&root, &ctx, Side::Source, progress)?
        }
        SideSpec::Schemas(schemas) => {
            let mut catalog = open_catalog(options.catalog_snapshot.as_ref())?.ok_or_else(|| {
                SchemaCompareError::CatalogUnavailable {
                    schemas: schemas.join("+"),
                }
            })?;
            let pattern = compile_pattern(&options.filter)?;
            collect_catalog(&mut catalog, &schemas, &pattern, &normalizer, Side::Source, progress)?
        }
    };
    progress.finish();

    Ok(model::dump_json(&map)?)
}
