//! Integration tests for side arguments and configuration loading

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use rust_schemacompare::collect::SilentProgress;
use rust_schemacompare::config::{Config, SideSpec};
use rust_schemacompare::SchemaCompareError;

use crate::common::TestContext;

#[test]
fn test_fixture_config_loads() {
    let ctx = TestContext::with_fixture("sales_project");
    let config = Config::load(&ctx.config_path()).unwrap();

    assert_eq!(config.schema_list("prd"), vec!["sales_prd"]);
    assert_eq!(config.normalizer().apply("sales_dev"), "sales");
    assert_eq!(config.ignored_objects_in_repo, vec!["tabl:*.audit_*"]);
}

#[test]
fn test_resolve_folder_group_and_list() {
    let ctx = TestContext::with_fixture("sales_project");
    let config = Config::load(&ctx.config_path()).unwrap();

    assert_eq!(
        config.resolve_side(&ctx.project_arg()),
        SideSpec::Folder(PathBuf::from(ctx.project_arg()))
    );
    assert_eq!(
        config.resolve_side("prd"),
        SideSpec::Schemas(vec!["sales_prd".to_string()])
    );
    assert_eq!(
        config.resolve_side("sales_prd+hr_prd"),
        SideSpec::Schemas(vec!["sales_prd".to_string(), "hr_prd".to_string()])
    );
}

#[test]
fn test_both_folders_rejected() {
    let ctx = TestContext::with_fixture("sales_project");
    let options = ctx.compare_options(&ctx.project_arg(), &ctx.project_arg(), "sales_prd");

    let err = rust_schemacompare::compare(&options, &mut SilentProgress).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaCompareError>(),
        Some(SchemaCompareError::InvalidArguments { .. })
    ));
}

#[test]
fn test_malformed_config_is_fatal() {
    let ctx = TestContext::with_fixture("sales_project");
    std::fs::write(ctx.config_path(), "{ \"schema_groups\": [ }").unwrap();
    let options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");

    let err = rust_schemacompare::compare(&options, &mut SilentProgress).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaCompareError>(),
        Some(SchemaCompareError::ConfigParseError { .. })
    ));
}

#[test]
fn test_malformed_snapshot_is_fatal() {
    let ctx = TestContext::with_fixture("sales_project");
    std::fs::write(ctx.snapshot_path("sales_prd"), "{ not json").unwrap();
    let options = ctx.compare_options(&ctx.project_arg(), "sales_prd", "sales_prd");

    let err = rust_schemacompare::compare(&options, &mut SilentProgress).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaCompareError>(),
        Some(SchemaCompareError::SnapshotError { .. })
    ));
}

#[test]
fn test_invalid_filter_pattern() {
    let ctx = TestContext::with_fixture("sales_project");
    let mut options = ctx.compare_options("sales_prd", "prd", "sales_prd");
    options.filter = "[".to_string();

    let err = rust_schemacompare::compare(&options, &mut SilentProgress).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaCompareError>(),
        Some(SchemaCompareError::InvalidPattern { .. })
    ));
}
