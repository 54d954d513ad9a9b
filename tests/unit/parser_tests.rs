//! Unit tests for the SQL tokenizer and CREATE statement parser

use pretty_assertions::assert_eq;

use rust_schemacompare::model::{
    ObjectDefinition, ObjectKind, ReturnSpec, SchemaNameReplacement, SchemaNormalizer, Selection,
};
use rust_schemacompare::parser::{
    find_zero_level_token, parse_statement, split_statements, tokenize, FindMode, ParseContext,
    TokenKind,
};
use rust_schemacompare::SchemaCompareError;

fn parse(sql: &str) -> Result<Option<rust_schemacompare::model::SchemaObject>, SchemaCompareError> {
    let selection = Selection::All;
    let normalizer = SchemaNormalizer::default();
    let ctx = ParseContext {
        selection: &selection,
        normalizer: &normalizer,
    };
    parse_statement(sql, &ctx)
}

// ============================================================================
// Tokenizer Tests
// ============================================================================

#[test]
fn test_tokenize_keeps_literals_whole() {
    let tokens = tokenize("select 'a, b -- c' as x -- trailing\nfrom t");
    let texts: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
    assert_eq!(texts, vec!["select", "'a, b -- c'", "as", "x", "from", "t"]);
    assert_eq!(tokens[1].kind, TokenKind::Literal);
}

#[test]
fn test_tokenize_operators_and_punctuation() {
    let tokens = tokenize("a>=b,(c<=>d)");
    let texts: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
    assert_eq!(texts, vec!["a", ">=", "b", ",", "(", "c", "<=>", "d", ")"]);
}

#[test]
fn test_tokenize_drops_comment_lines() {
    let tokens = tokenize("  -- header\ncreate view v as select 1");
    assert_eq!(tokens[0].as_str(), "create");
}

// ============================================================================
// Scanner Tests
// ============================================================================

#[test]
fn test_zero_level_sequence_skips_nested() {
    let tokens = tokenize("f(returns table) returns table (a int)");
    let idx = find_zero_level_token(&tokens, &["returns", "table"], 0, FindMode::Sequence, false);
    assert_eq!(idx, Some(5));
}

#[test]
fn test_zero_level_case_sensitivity() {
    let tokens = tokenize("a AS b");
    assert_eq!(find_zero_level_token(&tokens, &["as"], 0, FindMode::Any, true), None);
    assert_eq!(find_zero_level_token(&tokens, &["as"], 0, FindMode::Any, false), Some(1));
}

// ============================================================================
// Statement Split Tests
// ============================================================================

#[test]
fn test_split_respects_literals() {
    let parts = split_statements("create view a as select ';' as x; create view b as select 2");
    assert_eq!(parts.len(), 2);
    assert!(parts[0].contains("';'"));
}

// ============================================================================
// Statement Parser Tests
// ============================================================================

#[test]
fn test_parse_table_function() {
    let object = parse(
        "create function s.items(n int) returns table (id bigint comment 'key', label string)\n\
         return select id, label from s.t limit n",
    )
    .unwrap()
    .unwrap();

    assert_eq!(object.identity.kind, ObjectKind::TableFunction);
    let ObjectDefinition::Function {
        parameters,
        returns,
        body,
    } = object.definition
    else {
        panic!("expected function");
    };
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters[0].data_type, "int");
    let ReturnSpec::Table(columns) = returns else {
        panic!("expected table return");
    };
    assert_eq!(columns[0].name, "id");
    assert_eq!(columns[0].data_type, "long");
    assert_eq!(columns[0].comment.as_deref(), Some("key"));
    assert_eq!(body, "select id, label from s.t limit n");
}

#[test]
fn test_parse_view_keeps_body_layout() {
    let object = parse("create view s.v as\nselect a,\n  b -- note\nfrom s.t")
        .unwrap()
        .unwrap();
    assert_eq!(object.definition.body(), Some("select a,\n  b\nfrom s.t"));
}

#[test]
fn test_selection_uses_normalized_schema() {
    let selection = Selection::new(["sales_prd"], "ord*", &normalizer()).unwrap();
    let normalizer = normalizer();
    let ctx = ParseContext {
        selection: &selection,
        normalizer: &normalizer,
    };

    let object = parse_statement("create table sales_dev.orders (id int)", &ctx)
        .unwrap()
        .unwrap();
    assert_eq!(object.identity.schema, "sales");

    assert!(parse_statement("create table sales_dev.users (id int)", &ctx)
        .unwrap()
        .is_none());
    assert!(parse_statement("create table hr_dev.orders (id int)", &ctx)
        .unwrap()
        .is_none());
}

#[test]
fn test_missing_entry_type_is_fatal() {
    let err = parse("create table s.t (a int, b)").unwrap_err();
    assert!(matches!(err, SchemaCompareError::MissingEntryPart { .. }));
}

fn normalizer() -> SchemaNormalizer {
    SchemaNormalizer::new(vec![
        SchemaNameReplacement {
            substring: "_dev".to_string(),
            replacement: String::new(),
        },
        SchemaNameReplacement {
            substring: "_prd".to_string(),
            replacement: String::new(),
        },
    ])
}
