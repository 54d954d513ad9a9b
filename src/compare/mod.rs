//! Schema map comparison
//!
//! Aligns two schema maps by identity and emits itemized differences in a stable
//! order: by object kind, then by short identity label.

mod labels;
mod report;
mod text;
mod types;

pub use labels::{short_identity, short_schema_labels};
pub use report::{
    narrative, print_legend, print_narrative, print_summary, print_table, project, table_rows,
    DiffEntry, NarrativeBlock, Presentation, TableRow,
};
pub use text::{diff_lines, LineChange, CONTEXT_LINES};
pub use types::{ComparisonResult, ComparisonSummary, DiffItem, Difference};

use std::collections::BTreeSet;

use glob::Pattern;
use tracing::info;

use crate::collect::{Checkpoint, ProgressReporter};
use crate::model::{ObjectDefinition, ObjectIdentity, SchemaMap, SchemaNormalizer, Side};

/// Everything one comparison needs besides progress reporting.
#[derive(Debug, Clone, Copy)]
pub struct CompareInputs<'a> {
    pub source: &'a SchemaMap,
    pub target: &'a SchemaMap,
    /// Set when the side was read from a project folder
    pub source_is_folder: bool,
    pub target_is_folder: bool,
    /// Globs over full identities (`kind:schema.name`) of objects a folder may omit
    pub ignore_patterns: &'a [Pattern],
    /// Re-applied to bodies before they are compared
    pub normalizer: &'a SchemaNormalizer,
}

impl CompareInputs<'_> {
    fn is_ignored(&self, identity: &ObjectIdentity) -> bool {
        let full = identity.to_string();
        self.ignore_patterns.iter().any(|p| p.matches(&full))
    }
}

/// Compare two schema maps.
pub fn compare_schema_maps(
    inputs: &CompareInputs<'_>,
    progress: &mut dyn ProgressReporter,
) -> ComparisonResult {
    let labels = short_schema_labels(
        inputs
            .source
            .schemas()
            .into_iter()
            .chain(inputs.target.schemas()),
    );

    let mut identities: Vec<(&ObjectIdentity, String)> = inputs
        .source
        .identities()
        .chain(inputs.target.identities())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|id| (id, short_identity(id, &labels)))
        .collect();
    identities.sort_by(|(a, a_label), (b, b_label)| {
        a.kind.cmp(&b.kind).then_with(|| a_label.cmp(b_label))
    });

    let total = identities.len();
    let mut differences = Vec::new();
    for (i, (identity, label)) in identities.into_iter().enumerate() {
        progress.checkpoint(Checkpoint::ObjectCompared, None, i + 1, total, &label);

        let items = match (inputs.source.get(identity), inputs.target.get(identity)) {
            (Some(source), Some(target)) => compare_definitions(source, target, inputs.normalizer),
            (None, Some(_)) if !(inputs.source_is_folder && inputs.is_ignored(identity)) => {
                vec![DiffItem::ObjectAdded { side: Side::Target }]
            }
            (Some(_), None) if !(inputs.target_is_folder && inputs.is_ignored(identity)) => {
                vec![DiffItem::ObjectAdded { side: Side::Source }]
            }
            _ => Vec::new(),
        };

        differences.extend(items.into_iter().map(|item| Difference {
            identity: identity.clone(),
            label: label.clone(),
            item,
        }));
    }

    let summary = ComparisonSummary {
        objects_compared: total,
        differing_objects: count_differing_objects(&differences),
        total_differences: differences.iter().filter(|d| d.counts()).count(),
    };
    info!(
        "Compared {} objects: {} different, {} differences",
        summary.objects_compared, summary.differing_objects, summary.total_differences
    );

    ComparisonResult {
        differences,
        summary,
    }
}

/// Number of identity runs in emission order. Entries of one object are always
/// adjacent, so this equals the number of distinct differing identities.
fn count_differing_objects(differences: &[Difference]) -> usize {
    let mut count = 0;
    let mut previous: Option<&ObjectIdentity> = None;
    for difference in differences {
        if previous != Some(&difference.identity) {
            count += 1;
        }
        previous = Some(&difference.identity);
    }
    count
}

fn compare_definitions(
    source: &ObjectDefinition,
    target: &ObjectDefinition,
    normalizer: &SchemaNormalizer,
) -> Vec<DiffItem> {
    let mut items = Vec::new();

    match (source, target) {
        (
            ObjectDefinition::Table {
                columns: source_columns,
                comment: source_comment,
            },
            ObjectDefinition::Table {
                columns: target_columns,
                comment: target_comment,
            },
        ) => {
            if source_comment != target_comment {
                items.push(DiffItem::Comment {
                    source: source_comment.clone(),
                    target: target_comment.clone(),
                });
            }

            let names: BTreeSet<&String> =
                source_columns.keys().chain(target_columns.keys()).collect();
            for name in names {
                match (source_columns.get(name), target_columns.get(name)) {
                    (None, Some(_)) => items.push(DiffItem::ColumnAdded {
                        column: name.clone(),
                        side: Side::Target,
                    }),
                    (Some(_), None) => items.push(DiffItem::ColumnAdded {
                        column: name.clone(),
                        side: Side::Source,
                    }),
                    (Some(s), Some(t)) => {
                        if s.data_type != t.data_type {
                            items.push(DiffItem::ColumnType {
                                column: name.clone(),
                                source: s.data_type.clone(),
                                target: t.data_type.clone(),
                            });
                        }
                        if s.nullable != t.nullable {
                            items.push(DiffItem::ColumnNullable {
                                column: name.clone(),
                                source: s.nullable,
                                target: t.nullable,
                            });
                        }
                        if s.comment != t.comment {
                            items.push(DiffItem::ColumnComment {
                                column: name.clone(),
                                source: s.comment.clone(),
                                target: t.comment.clone(),
                            });
                        }
                    }
                    (None, None) => {}
                }
            }
        }
        (ObjectDefinition::View { .. }, ObjectDefinition::View { .. }) => {
            // views carry no comment, so only the body can differ
            items.extend(compare_bodies(source, target, normalizer));
        }
        (
            ObjectDefinition::Function {
                returns: source_returns,
                ..
            },
            ObjectDefinition::Function {
                returns: target_returns,
                ..
            },
        ) => {
            let (source_sig, target_sig) = (source_returns.signature(), target_returns.signature());
            if source_sig != target_sig {
                items.push(DiffItem::Returns {
                    source: source_sig,
                    target: target_sig,
                });
            }

            let (source_params, target_params) =
                (source.parameter_signature(), target.parameter_signature());
            if source_params != target_params {
                items.push(DiffItem::Parameters {
                    source: source_params,
                    target: target_params,
                });
            }

            items.extend(compare_bodies(source, target, normalizer));
        }
        // identities carry the kind, so mixed variants never share one
        _ => {}
    }

    items
}

fn compare_bodies(
    source: &ObjectDefinition,
    target: &ObjectDefinition,
    normalizer: &SchemaNormalizer,
) -> Vec<DiffItem> {
    let source_body = normalizer.apply(source.body().unwrap_or_default());
    let target_body = normalizer.apply(target.body().unwrap_or_default());
    if source_body == target_body {
        return Vec::new();
    }
    diff_lines(&source_body, &target_body)
        .into_iter()
        .map(DiffItem::BodyLine)
        .collect()
}
