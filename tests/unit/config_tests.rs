//! Unit tests for configuration parsing and schema normalization

use std::path::Path;

use pretty_assertions::assert_eq;

use rust_schemacompare::config::Config;
use rust_schemacompare::model::{SchemaMap, Selection};

#[test]
fn test_replacements_apply_in_order() {
    let config = Config::parse(
        r#"{ "schema_name_replacements": [
            { "substring": "sales_dev", "replacement": "sales_x" },
            { "substring": "_x", "replacement": "" }
        ] }"#,
        Path::new("dbsc-config.json"),
    )
    .unwrap();

    let normalizer = config.normalizer();
    assert_eq!(normalizer.apply("sales_dev"), "sales");
    assert_eq!(normalizer.apply("hr_dev"), "hr_dev");
}

#[test]
fn test_selection_normalizes_selected_schemas() {
    let config = Config::parse(
        r#"{ "schema_name_replacements": [ { "substring": "_prd", "replacement": "" } ] }"#,
        Path::new("dbsc-config.json"),
    )
    .unwrap();

    let selection = Selection::new(config.schema_list("sales_prd+hr_prd"), "*", &config.normalizer())
        .unwrap();
    assert!(selection.accepts("sales", "orders"));
    assert!(selection.accepts("hr", "people"));
    assert!(!selection.accepts("sales_prd", "orders"));
}

#[test]
fn test_commented_lines_anywhere() {
    let config = Config::parse(
        "// leading comment\n{\n    // inner comment\n    \"ignored_objects_in_repo\": [\"view:*\"]\n}\n// trailing",
        Path::new("dbsc-config.json"),
    )
    .unwrap();
    assert_eq!(config.ignored_objects_in_repo, vec!["view:*"]);
    assert!(config.schema_groups.is_empty());
}

#[test]
fn test_unknown_keys_are_ignored() {
    let config = Config::parse(
        r#"{ "databricks_instances": { "dev": "x" }, "schema_groups": { "g": "a+b" } }"#,
        Path::new("dbsc-config.json"),
    )
    .unwrap();
    assert_eq!(config.schema_list("g"), vec!["a", "b"]);
}

#[test]
fn test_empty_schema_map_reports_no_schemas() {
    let map = SchemaMap::new();
    assert!(map.is_empty());
    assert!(map.schemas().is_empty());
}
