//! Integration tests for the compare workflow
//!
//! The `sales_project` fixture is compared against a recorded `sales_prd` catalog.
//! Both sides normalize to the schema `sales`.

use pretty_assertions::assert_eq;

use rust_schemacompare::collect::TracingProgress;
use rust_schemacompare::collect::{Checkpoint, ProgressReporter};
use rust_schemacompare::compare::{table_rows, DiffEntry, Presentation, TableRow};
use rust_schemacompare::SchemaCompareError;

use crate::common::{render, TestContext};

fn row(object: &str, item: &str, source: &str, target: &str) -> TableRow {
    TableRow {
        object: object.to_string(),
        item: item.to_string(),
        source: source.to_string(),
        target: target.to_string(),
    }
}

// ============================================================================
// Folder vs Catalog
// ============================================================================

#[test]
fn test_folder_vs_catalog_rows() {
    let ctx = TestContext::with_fixture("sales_project");
    let options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");
    let report = ctx.compare_successfully(&options);

    assert_eq!(
        table_rows(&report.result),
        vec![
            row("tabl:orders", "column:note", "(column added)", ""),
            row(
                "view:order_totals",
                "definition",
                "  1: select id, sum(amount) as total",
                "  1: select id, sum(amount) as total"
            ),
            row("", "", "  2: from sales.orders", "  2: from sales.orders"),
            row("", "", "", "  3: where amount > 0"),
            row("", "", "  3: group by id", "  4: group by id"),
            row("view:v_extra", "", "", "(object added)"),
        ]
    );
}

#[test]
fn test_folder_vs_catalog_summary() {
    let ctx = TestContext::with_fixture("sales_project");
    let options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");
    let report = ctx.compare_successfully(&options);

    // audit_log is compared but ignored, twice is identical on both sides
    let summary = report.result.summary;
    assert_eq!(summary.objects_compared, 5);
    assert_eq!(summary.differing_objects, 3);
    assert_eq!(summary.total_differences, 3);

    assert_eq!(report.source_label, ctx.project_arg());
    assert_eq!(report.target_label, "sales_prd");

    let output = render(&report);
    assert!(output.contains(
        "Legend: tabl=Tables, view=Views, scfn=Scalar functions, tbfn=Table functions\n"
    ));
    assert!(output.contains(
        "[Diff] Compared 5 object(s), found 3 object(s) different and 3 difference(s) ["
    ));
}

#[test]
fn test_swapped_sides_mirror_markers() {
    let ctx = TestContext::with_fixture("sales_project");
    let options = ctx.compare_options("sales_prd", &ctx.project_arg(), "sales_prd");
    let report = ctx.compare_successfully(&options);

    let rows = table_rows(&report.result);
    assert_eq!(rows[0], row("tabl:orders", "column:note", "", "(column added)"));
    assert_eq!(
        rows.last().cloned(),
        Some(row("view:v_extra", "", "(object added)", ""))
    );
    assert_eq!(report.result.summary.total_differences, 3);
}

#[test]
fn test_ignore_list_only_hides_objects_missing_from_folder() {
    let ctx = TestContext::with_fixture("sales_project");
    std::fs::write(
        ctx.config_path(),
        r#"{ "schema_name_replacements": [
            { "substring": "_dev", "replacement": "" },
            { "substring": "_prd", "replacement": "" } ] }"#,
    )
    .unwrap();

    let options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");
    let report = ctx.compare_successfully(&options);

    let rows = table_rows(&report.result);
    assert_eq!(rows[0], row("tabl:audit_log", "", "", "(object added)"));
    assert_eq!(report.result.summary.differing_objects, 4);
}

#[test]
fn test_filter_restricts_both_sides() {
    let ctx = TestContext::with_fixture("sales_project");
    let mut options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");
    options.filter = "order*".to_string();
    let report = ctx.compare_successfully(&options);

    let summary = report.result.summary;
    assert_eq!(summary.objects_compared, 2);
    assert_eq!(summary.differing_objects, 2);
    assert_eq!(summary.total_differences, 2);
}

#[test]
fn test_catalog_against_itself_is_clean() {
    let ctx = TestContext::with_fixture("sales_project");
    // "prd" is a schema group expanding to sales_prd
    let options = ctx.compare_options("sales_prd", "prd", "sales_prd");
    let report = ctx.compare_successfully(&options);

    assert!(report.result.summary.is_clean());
    assert!(report.entries.is_empty());

    let output = render(&report);
    assert!(output.starts_with(
        "[Ok] Compared 5 object(s), found 0 object(s) different and 0 difference(s) ["
    ));
}

// ============================================================================
// Presentation
// ============================================================================

#[test]
fn test_raw_output() {
    let ctx = TestContext::with_fixture("sales_project");
    let mut options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");
    options.presentation = Presentation::Narrative;
    let report = ctx.compare_successfully(&options);

    let output = render(&report);
    assert!(output.starts_with("\n--- Object: tabl:orders ---\ncolumn:note is added in source\n"));
    assert!(output.contains(
        "--- Object: view:order_totals ---\n\
         Object definition is different\n\
         Differences:\n \
         select id, sum(amount) as total\n \
         from sales.orders\n\
         +where amount > 0\n \
         group by id\n"
    ));
    assert!(output.contains("--- Object: view:v_extra ---\nObject added in target\n"));
    assert!(!output.contains("Legend:"));
}

#[test]
fn test_separator_rows_between_objects() {
    let ctx = TestContext::with_fixture("sales_project");
    let mut options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");
    options.presentation = Presentation::Table { separators: true };
    let report = ctx.compare_successfully(&options);

    let separators = report
        .entries
        .iter()
        .filter(|e| matches!(e, DiffEntry::Separator))
        .count();
    assert_eq!(separators, 2);

    let output = render(&report);
    assert!(output.lines().any(|line| line.starts_with("|·") && line.ends_with("·|")));
}

#[test]
fn test_progress_checkpoints() {
    let ctx = TestContext::with_fixture("sales_project");
    let options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");
    let mut progress = TracingProgress::new();
    rust_schemacompare::compare(&options, &mut progress).unwrap();

    assert_eq!(progress.count(Checkpoint::SchemaList), 1);
    // 3 project objects plus 5 catalog objects
    assert_eq!(progress.count(Checkpoint::ObjectRead), 8);
    assert_eq!(progress.count(Checkpoint::ObjectCompared), 5);
    progress.finish();
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_malformed_statement_aborts_run() {
    let ctx = TestContext::with_fixture("sales_project");
    ctx.add_notebook("notebooks/broken.py", &["create table sales_dev.broken"]);
    let options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");

    let err = rust_schemacompare::compare(&options, &mut TracingProgress::new()).unwrap_err();
    match err.downcast_ref::<SchemaCompareError>() {
        Some(SchemaCompareError::MissingParenthesis { object, .. }) => {
            assert_eq!(object, "sales_dev.broken")
        }
        other => panic!("Expected MissingParenthesis, got {other:?}"),
    }
}

#[test]
fn test_catalog_side_without_snapshot() {
    let ctx = TestContext::with_fixture("sales_project");
    let mut options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");
    options.catalog_snapshot = None;

    let err = rust_schemacompare::compare(&options, &mut TracingProgress::new()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaCompareError>(),
        Some(SchemaCompareError::CatalogUnavailable { .. })
    ));
}

#[test]
fn test_unrecorded_query_is_fatal() {
    let ctx = TestContext::with_fixture("sales_project");
    let options = ctx.compare_options(&ctx.project_arg(), "sales_qa", "sales_prd");

    let err = rust_schemacompare::compare(&options, &mut TracingProgress::new()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaCompareError>(),
        Some(SchemaCompareError::QueryError { .. })
    ));
}
