//! Integration tests for dump mode

use pretty_assertions::assert_eq;
use serde_json::Value;

use rust_schemacompare::collect::SilentProgress;

use crate::common::TestContext;

fn dump_value(options: &rust_schemacompare::DumpOptions) -> Value {
    let json = rust_schemacompare::dump(options, &mut SilentProgress).expect("Dump should succeed");
    serde_json::from_str(&json).expect("Dump should be valid JSON")
}

#[test]
fn test_dump_folder_keeps_every_object() {
    let ctx = TestContext::with_fixture("sales_project");
    let value = dump_value(&ctx.dump_options(&ctx.project_arg()));

    let mut keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    keys.sort();
    // the temporary table is not part of the schema
    assert_eq!(
        keys,
        vec!["scfn:sales.twice", "tabl:sales.orders", "view:sales.order_totals"]
    );

    let orders = &value["tabl:sales.orders"];
    assert_eq!(orders["fullname"], "sales.orders");
    assert_eq!(orders["comment"], "Orders");
    assert_eq!(orders["columns"]["id"]["type"], "long");
    assert_eq!(orders["columns"]["id"]["nullable"], true);
    assert_eq!(orders["columns"]["id"]["comment"], "Order id");
    assert_eq!(orders["columns"]["note"]["comment"], "(null)");

    let twice = &value["scfn:sales.twice"];
    assert_eq!(twice["returns"], "int");
    assert_eq!(twice["text"], "x * 2");
    assert_eq!(twice["parameters"][0]["type"], "int");
}

#[test]
fn test_dump_catalog_group() {
    let ctx = TestContext::with_fixture("sales_project");
    let value = dump_value(&ctx.dump_options("prd"));

    let objects = value.as_object().unwrap();
    assert_eq!(objects.len(), 5);
    assert!(objects.contains_key("tabl:sales.audit_log"));
    assert_eq!(
        value["view:sales.order_totals"]["text"],
        "select id, sum(amount) as total\nfrom sales_prd.orders\nwhere amount > 0\ngroup by id"
    );
}

#[test]
fn test_dump_catalog_applies_filter() {
    let ctx = TestContext::with_fixture("sales_project");
    let mut options = ctx.dump_options("sales_prd");
    options.filter = "v_*".to_string();
    let value = dump_value(&options);

    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["view:sales.v_extra"]);
}

#[test]
fn test_dump_empty_folder() {
    let ctx = TestContext::empty();
    let value = dump_value(&ctx.dump_options(&ctx.project_arg()));
    assert_eq!(value, serde_json::json!({}));
}
