//! Schema collection from project folders and live catalogs
//!
//! Both adapters only produce raw statement text; parsing and map assembly are shared.

mod catalog;
mod progress;
mod project;
mod snapshot;

pub use catalog::{collect_catalog, reassemble_function, CatalogClient, CatalogRow};
pub use progress::{Checkpoint, ProgressReporter, SilentProgress, TracingProgress};
pub use project::{collect_project, extract_statements, find_source_files, MAGIC_TAG, SQL_START_TAG};
pub use snapshot::{SnapshotCatalog, SnapshotEntry};

use tracing::info;

use crate::error::SchemaCompareError;
use crate::model::{SchemaMap, Side};
use crate::parser::{parse_statement, ParseContext};

/// Parse statements in order into a schema map. The first fatal parse error aborts.
fn assemble(
    statements: Vec<String>,
    ctx: &ParseContext<'_>,
    side: Side,
    progress: &mut dyn ProgressReporter,
) -> Result<SchemaMap, SchemaCompareError> {
    let total = statements.len();
    let mut map = SchemaMap::new();

    for (i, statement) in statements.iter().enumerate() {
        if let Some(object) = parse_statement(statement, ctx)? {
            progress.checkpoint(
                Checkpoint::ObjectRead,
                Some(side),
                i + 1,
                total,
                &object.identity.to_string(),
            );
            map.insert(object);
        }
    }

    info!("[{side}] Collected {} objects", map.len());
    Ok(map)
}
