//! CREATE statement parsing
//!
//! Recognises the DDL shapes that carry a comparable object definition and turns them
//! into a [`SchemaObject`]. Anything else is "not applicable" and yields `Ok(None)`.
//!
//! ## Supported Syntax
//!
//! ```sql
//! CREATE [OR REPLACE] TABLE [IF NOT EXISTS] name ( column-list ) ... [COMMENT 'text'] ...
//! CREATE [OR REPLACE] [TEMPORARY] VIEW [IF NOT EXISTS] name ... AS body
//! CREATE [OR REPLACE] [TEMPORARY] FUNCTION [IF NOT EXISTS] name ( parameter-list )
//!     RETURNS type RETURN body
//! CREATE [OR REPLACE] [TEMPORARY] FUNCTION [IF NOT EXISTS] name ( parameter-list )
//!     RETURNS TABLE ( column-list ) RETURN body
//! ```
//!
//! Keywords match case-insensitively. A statement of a supported shape that breaks a
//! structural expectation (missing parenthesis, separator keyword, entry name or type)
//! is a fatal error naming the object.

use indexmap::IndexMap;
use tracing::debug;

use super::column_parser::{parse_entry_list, ParsedEntry};
use super::identifier_utils::{split_object_name, standard_type, strip_backticks, unquote_literal};
use super::scanner::{find_token, find_zero_level_substring, find_zero_level_token, FindMode};
use super::tokenizer::{strip_comments, tokenize, Token};
use crate::error::SchemaCompareError;
use crate::model::{
    ColumnDefinition, ObjectDefinition, ObjectIdentity, ObjectKind, ParameterDefinition,
    ReturnSpec, SchemaNormalizer, SchemaObject, Selection,
};

/// Per-side parsing inputs: which objects to keep and how schema names are normalized.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub selection: &'a Selection,
    pub normalizer: &'a SchemaNormalizer,
}

/// Object kind named in a CREATE header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreateTarget {
    Table,
    View,
    Function,
}

/// Result of parsing the `CREATE ...` prefix of a statement
#[derive(Debug, Clone, Copy)]
struct CreateHeader {
    target: CreateTarget,
    /// Index of the object name token
    name_index: usize,
}

/// Walks the leading keywords of a statement.
struct HeaderParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> HeaderParser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        self.tokens.get(self.pos).is_some_and(|t| t.is(keyword))
    }

    fn check_keywords(&self, keywords: &[&str]) -> bool {
        keywords
            .iter()
            .enumerate()
            .all(|(offset, kw)| self.tokens.get(self.pos + offset).is_some_and(|t| t.is(kw)))
    }

    fn advance(&mut self, count: usize) {
        self.pos += count;
    }

    /// Parse the header, or `None` when the statement is not a supported CREATE.
    fn parse(mut self) -> Option<CreateHeader> {
        if !self.check_keyword("create") {
            return None;
        }
        self.advance(1);

        if self.check_keyword("or") {
            if !self.check_keywords(&["or", "replace"]) {
                return None;
            }
            self.advance(2);
        }

        let temporary = self.check_keyword("temporary");
        if temporary {
            self.advance(1);
        }

        let target = if self.check_keyword("table") {
            CreateTarget::Table
        } else if self.check_keyword("view") {
            CreateTarget::View
        } else if self.check_keyword("function") {
            CreateTarget::Function
        } else {
            return None;
        };
        // temporary tables are session objects and never compared
        if temporary && target == CreateTarget::Table {
            return None;
        }
        self.advance(1);

        if self.check_keywords(&["if", "not", "exists"]) {
            self.advance(3);
        }

        Some(CreateHeader {
            target,
            name_index: self.pos,
        })
    }
}

/// Parse one statement.
///
/// Returns `Ok(None)` for statements of unsupported shape and for objects rejected by
/// the context's selection.
pub fn parse_statement(
    sql: &str,
    ctx: &ParseContext<'_>,
) -> Result<Option<SchemaObject>, SchemaCompareError> {
    let tokens = tokenize(sql);
    let Some(header) = HeaderParser::new(&tokens).parse() else {
        return Ok(None);
    };

    let name_token = tokens.get(header.name_index).ok_or_else(|| {
        SchemaCompareError::parse(
            tokens.iter().map(Token::as_str).collect::<Vec<_>>().join(" "),
            "object name expected",
        )
    })?;
    let object = name_token.as_str();
    let qualified = split_object_name(object);
    let schema = ctx.normalizer.apply(&qualified.schema);
    let name = qualified.name;

    let parsed = match header.target {
        CreateTarget::Table => {
            if !ctx.selection.accepts(&schema, &name) {
                return Ok(None);
            }
            let definition = parse_table(&tokens, header.name_index, object)?;
            SchemaObject {
                identity: ObjectIdentity::new(ObjectKind::Table, schema, name),
                definition,
            }
        }
        CreateTarget::View => {
            if !ctx.selection.accepts(&schema, &name) {
                return Ok(None);
            }
            let body = extract_body(sql, "as", object)?;
            SchemaObject {
                identity: ObjectIdentity::new(ObjectKind::View, schema, name),
                definition: ObjectDefinition::View { body },
            }
        }
        CreateTarget::Function => {
            let (open, close) = list_bounds(&tokens, header.name_index + 1, object, "parameter")?;
            let returns_table = find_zero_level_token(
                &tokens,
                &["returns", "table"],
                0,
                FindMode::Sequence,
                false,
            );
            let kind = if returns_table.is_some() {
                ObjectKind::TableFunction
            } else {
                ObjectKind::ScalarFunction
            };
            if !ctx.selection.accepts(&schema, &name) {
                return Ok(None);
            }
            let definition = parse_function(sql, &tokens, kind, open, close, object)?;
            SchemaObject {
                identity: ObjectIdentity::new(kind, schema, name),
                definition,
            }
        }
    };

    debug!("Parsed {}", parsed.identity);
    Ok(Some(parsed))
}

/// Locate the top-level `(` at or after `from` and its matching `)`.
fn list_bounds(
    tokens: &[Token],
    from: usize,
    object: &str,
    list: &str,
) -> Result<(usize, usize), SchemaCompareError> {
    let open = find_token(tokens, "(", from);
    let close = open.and_then(|o| find_token(tokens, ")", o + 1));
    match (open, close) {
        (Some(open), Some(close)) => Ok((open, close)),
        _ => Err(SchemaCompareError::MissingParenthesis {
            object: object.to_string(),
            list: list.to_string(),
        }),
    }
}

fn column_definition(entry: ParsedEntry) -> ColumnDefinition {
    ColumnDefinition {
        name: strip_backticks(&entry.name),
        data_type: entry.data_type,
        nullable: entry.not_null,
        comment: entry.comment,
    }
}

fn parse_table(
    tokens: &[Token],
    name_index: usize,
    object: &str,
) -> Result<ObjectDefinition, SchemaCompareError> {
    let (open, close) = list_bounds(tokens, name_index + 1, object, "column")?;

    let mut columns = IndexMap::new();
    for entry in parse_entry_list(tokens, open, close, object, "Column")? {
        let column = column_definition(entry);
        columns.insert(column.name.clone(), column);
    }

    let comment = find_token(tokens, "comment", close + 1)
        .and_then(|idx| tokens.get(idx + 1))
        .map(|t| unquote_literal(t.as_str()));

    Ok(ObjectDefinition::Table { columns, comment })
}

fn parse_function(
    sql: &str,
    tokens: &[Token],
    kind: ObjectKind,
    open: usize,
    close: usize,
    object: &str,
) -> Result<ObjectDefinition, SchemaCompareError> {
    let parameters = parse_entry_list(tokens, open, close, object, "Parameter")?
        .into_iter()
        .map(|entry| ParameterDefinition {
            name: entry.name,
            data_type: entry.data_type,
        })
        .collect();

    let returns = if kind == ObjectKind::TableFunction {
        let returns_index = find_zero_level_token(
            tokens,
            &["returns", "table", "("],
            0,
            FindMode::Sequence,
            false,
        )
        .ok_or_else(|| {
            SchemaCompareError::parse(
                object,
                "table specification expected after RETURNS TABLE",
            )
        })?;
        let table_open = returns_index + 2;
        let table_close = find_token(tokens, ")", table_open + 1).ok_or_else(|| {
            SchemaCompareError::MissingParenthesis {
                object: object.to_string(),
                list: "return table".to_string(),
            }
        })?;
        ReturnSpec::Table(
            parse_entry_list(tokens, table_open, table_close, object, "Return column")?
                .into_iter()
                .map(column_definition)
                .collect(),
        )
    } else {
        let return_type = find_token(tokens, "returns", 0)
            .and_then(|idx| tokens.get(idx + 1))
            .ok_or_else(|| SchemaCompareError::parse(object, "return type expected"))?;
        ReturnSpec::Scalar(standard_type(return_type.as_str()))
    };

    let body = extract_body(sql, "return", object)?;

    Ok(ObjectDefinition::Function {
        parameters,
        returns,
        body,
    })
}

/// Text after the first top-level ` keyword `, comments removed, layout preserved.
fn extract_body(sql: &str, keyword: &str, object: &str) -> Result<String, SchemaCompareError> {
    let clean = strip_comments(sql);
    // same byte length as `clean`, so offsets carry over
    let flat = clean.replace(['\n', '\t'], " ");
    let needle = format!(" {keyword} ");

    let pos = find_zero_level_substring(&flat, &needle, 0, false).ok_or_else(|| {
        SchemaCompareError::MissingKeyword {
            object: object.to_string(),
            keyword: keyword.to_string(),
        }
    })?;

    Ok(clean[pos + needle.len()..].trim().to_string())
}
