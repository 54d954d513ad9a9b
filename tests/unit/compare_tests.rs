//! Unit tests for the schema diff engine, driven by parsed statements

use pretty_assertions::assert_eq;

use rust_schemacompare::collect::SilentProgress;
use rust_schemacompare::compare::{
    compare_schema_maps, narrative, table_rows, CompareInputs, DiffItem, LineChange,
};
use rust_schemacompare::model::{compile_pattern, SchemaMap, SchemaNormalizer, Selection, Side};
use rust_schemacompare::parser::{parse_statement, ParseContext};

fn schema_map(statements: &[&str]) -> SchemaMap {
    let selection = Selection::All;
    let normalizer = SchemaNormalizer::default();
    let ctx = ParseContext {
        selection: &selection,
        normalizer: &normalizer,
    };
    statements
        .iter()
        .filter_map(|sql| parse_statement(sql, &ctx).expect("statement should parse"))
        .collect()
}

fn inputs<'a>(
    source: &'a SchemaMap,
    target: &'a SchemaMap,
    normalizer: &'a SchemaNormalizer,
) -> CompareInputs<'a> {
    CompareInputs {
        source,
        target,
        source_is_folder: false,
        target_is_folder: false,
        ignore_patterns: &[],
        normalizer,
    }
}

#[test]
fn test_identical_maps_have_no_differences() {
    let statements = [
        "create table s.t (a int, b string comment 'x') comment 'tbl'",
        "create view s.v as select a from s.t",
        "create function s.f(x int) returns int return x + 1",
    ];
    let map = schema_map(&statements);
    let normalizer = SchemaNormalizer::default();

    let result = compare_schema_maps(&inputs(&map, &map, &normalizer), &mut SilentProgress);
    assert!(result.differences.is_empty());
    assert_eq!(result.summary.objects_compared, 3);
    assert!(result.summary.is_clean());
}

#[test]
fn test_function_signature_differences() {
    let source = schema_map(&["create function s.f(x int) returns int return x + 1"]);
    let target = schema_map(&["create function s.f(x bigint, y int) returns bigint return x + 1"]);
    let normalizer = SchemaNormalizer::default();

    let result = compare_schema_maps(&inputs(&source, &target, &normalizer), &mut SilentProgress);
    let items: Vec<&DiffItem> = result.differences.iter().map(|d| &d.item).collect();
    assert_eq!(
        items,
        vec![
            &DiffItem::Returns {
                source: "int".to_string(),
                target: "long".to_string()
            },
            &DiffItem::Parameters {
                source: "x int".to_string(),
                target: "x long,y int".to_string()
            },
        ]
    );
    assert_eq!(result.summary.differing_objects, 1);
}

#[test]
fn test_table_and_view_with_same_name_are_distinct() {
    let source = schema_map(&["create table s.x (a int)"]);
    let target = schema_map(&["create view s.x as select 1 as a"]);
    let normalizer = SchemaNormalizer::default();

    let result = compare_schema_maps(&inputs(&source, &target, &normalizer), &mut SilentProgress);
    let rows = table_rows(&result);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].object, "tabl:x");
    assert_eq!(rows[0].source, "(object added)");
    assert_eq!(rows[1].object, "view:x");
    assert_eq!(rows[1].target, "(object added)");
    assert_eq!(result.summary.objects_compared, 2);
}

#[test]
fn test_body_diff_line_numbers() {
    let source = schema_map(&["create view s.v as\nselect a\nfrom s.t"]);
    let target = schema_map(&["create view s.v as\nselect a, b\nfrom s.t"]);
    let normalizer = SchemaNormalizer::default();

    let result = compare_schema_maps(&inputs(&source, &target, &normalizer), &mut SilentProgress);
    let changes: Vec<&DiffItem> = result.differences.iter().map(|d| &d.item).collect();
    assert_eq!(
        changes,
        vec![
            &DiffItem::BodyLine(LineChange::Removed {
                line: 1,
                text: "select a".to_string()
            }),
            &DiffItem::BodyLine(LineChange::Added {
                line: 1,
                text: "select a, b".to_string()
            }),
            &DiffItem::BodyLine(LineChange::Context {
                source_line: 2,
                target_line: 2,
                text: "from s.t".to_string()
            }),
        ]
    );
    assert_eq!(result.summary.total_differences, 2);

    let blocks = narrative(&result);
    assert_eq!(
        blocks[0].lines,
        vec![
            "Object definition is different",
            "Differences:",
            "-select a",
            "+select a, b",
            " from s.t",
        ]
    );
}

#[test]
fn test_ignore_patterns_require_folder_side() {
    let source = SchemaMap::new();
    let target = schema_map(&["create table s.audit_log (ts timestamp)"]);
    let normalizer = SchemaNormalizer::default();
    let patterns = vec![compile_pattern("tabl:s.audit_*").unwrap()];

    let mut compare_inputs = inputs(&source, &target, &normalizer);
    compare_inputs.ignore_patterns = &patterns;
    let result = compare_schema_maps(&compare_inputs, &mut SilentProgress);
    assert_eq!(
        result.differences[0].item,
        DiffItem::ObjectAdded { side: Side::Target }
    );

    compare_inputs.source_is_folder = true;
    let result = compare_schema_maps(&compare_inputs, &mut SilentProgress);
    assert!(result.differences.is_empty());
    assert_eq!(result.summary.objects_compared, 1);
}
