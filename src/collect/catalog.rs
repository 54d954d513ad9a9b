//! Live-catalog adapter
//!
//! Lists tables, views and user functions per schema, then reads one definition per
//! object. Tables and views come back as `show create table` text. Functions come back
//! as `describe function extended` lines, which are reassembled into an equivalent
//! `CREATE FUNCTION` statement so that both adapters share one parser.

use std::sync::LazyLock;

use glob::Pattern;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::assemble;
use super::progress::{Checkpoint, ProgressReporter};
use crate::error::SchemaCompareError;
use crate::model::{SchemaMap, SchemaNormalizer, Selection, Side};
use crate::parser::{split_object_name, standard_type, ParseContext};
use crate::util::collapse_spaces;

const TABLE_LIST_QUERY: &str = "show tables in <schema> like '*'";
const FUNCTION_LIST_QUERY: &str = "show user functions in <schema> like '*'";
const TABLE_DETAIL_QUERY: &str = "show create table <object>";
const FUNCTION_DETAIL_QUERY: &str = "describe function extended <object>";

/// `Header:   value` line of a function description. Continuation lines are indented.
static DESCRIBE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z ]*):\s*(.*)$").unwrap());

/// One result row: field name to value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRow(IndexMap<String, serde_json::Value>);

impl CatalogRow {
    pub fn new(fields: IndexMap<String, serde_json::Value>) -> Self {
        Self(fields)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.as_str())
    }

    /// Boolean field, accepting JSON booleans and `"true"`/`"false"` strings.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        match self.0.get(field)? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// First column as text, for single-column results.
    pub fn first_str(&self) -> Option<&str> {
        self.0.values().next().and_then(|v| v.as_str())
    }
}

/// Executes catalog queries. Connection setup and authentication belong to the
/// implementation.
pub trait CatalogClient {
    fn query(&mut self, sql: &str) -> Result<Vec<CatalogRow>, SchemaCompareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListedKind {
    TableOrView,
    Function,
}

#[derive(Debug, Clone)]
struct ListedObject {
    kind: ListedKind,
    schema: String,
    name: String,
}

impl ListedObject {
    fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

fn required_field<'r>(
    row: &'r CatalogRow,
    field: &str,
    sql: &str,
) -> Result<&'r str, SchemaCompareError> {
    row.get_str(field).ok_or_else(|| SchemaCompareError::QueryError {
        sql: sql.to_string(),
        message: format!("result row has no '{field}' field"),
    })
}

fn list_objects(
    client: &mut dyn CatalogClient,
    schema: &str,
    pattern: &Pattern,
) -> Result<Vec<ListedObject>, SchemaCompareError> {
    let mut objects = Vec::new();

    let sql = TABLE_LIST_QUERY.replace("<schema>", schema);
    for row in client.query(&sql)? {
        if row.get_bool("isTemporary") == Some(true) {
            continue;
        }
        let name = required_field(&row, "tableName", &sql)?;
        if !pattern.matches(name) {
            continue;
        }
        objects.push(ListedObject {
            kind: ListedKind::TableOrView,
            schema: required_field(&row, "database", &sql)?.to_string(),
            name: name.to_string(),
        });
    }

    let sql = FUNCTION_LIST_QUERY.replace("<schema>", schema);
    for row in client.query(&sql)? {
        let qualified = split_object_name(required_field(&row, "function", &sql)?);
        if !pattern.matches(&qualified.name) {
            continue;
        }
        objects.push(ListedObject {
            kind: ListedKind::Function,
            schema: if qualified.schema.is_empty() {
                schema.to_string()
            } else {
                qualified.schema
            },
            name: qualified.name,
        });
    }

    Ok(objects)
}

fn read_definition(
    client: &mut dyn CatalogClient,
    object: &ListedObject,
) -> Result<String, SchemaCompareError> {
    let qualified = object.qualified_name();
    match object.kind {
        ListedKind::TableOrView => {
            let sql = TABLE_DETAIL_QUERY.replace("<object>", &qualified);
            let mut text = String::new();
            for row in client.query(&sql)? {
                text.push_str(required_field(&row, "createtab_stmt", &sql)?);
            }
            Ok(text)
        }
        ListedKind::Function => {
            let sql = FUNCTION_DETAIL_QUERY.replace("<object>", &qualified);
            let rows = client.query(&sql)?;
            let lines: Vec<&str> = rows.iter().filter_map(CatalogRow::first_str).collect();
            reassemble_function(&object.schema, &object.name, &lines)
        }
    }
}

/// Collect a schema map from a live catalog.
///
/// Schemas are listed by their raw names; `pattern` filters object names before any
/// definition is read.
pub fn collect_catalog(
    client: &mut dyn CatalogClient,
    schemas: &[String],
    pattern: &Pattern,
    normalizer: &SchemaNormalizer,
    side: Side,
    progress: &mut dyn ProgressReporter,
) -> Result<SchemaMap, SchemaCompareError> {
    let unique: IndexSet<&str> = schemas.iter().map(String::as_str).collect();

    let mut listed = Vec::new();
    for (i, schema) in unique.iter().enumerate() {
        listed.extend(list_objects(client, schema, pattern)?);
        progress.checkpoint(Checkpoint::SchemaList, Some(side), i + 1, unique.len(), schema);
    }
    info!("[{side}] Listed {} catalog objects", listed.len());

    let mut statements = Vec::with_capacity(listed.len());
    for object in &listed {
        debug!("[{side}] Reading {}", object.qualified_name());
        statements.push(read_definition(client, object)?);
    }

    // listing already applied the selection
    let selection = Selection::All;
    let ctx = ParseContext {
        selection: &selection,
        normalizer,
    };
    assemble(statements, &ctx, side, progress)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    Input,
    Returns,
    Body,
}

/// Rebuild `CREATE FUNCTION` text from `describe function extended` lines.
pub fn reassemble_function(
    schema: &str,
    name: &str,
    lines: &[&str],
) -> Result<String, SchemaCompareError> {
    let object = format!("{schema}.{name}");
    let mut is_table = false;
    let mut parameters = Vec::new();
    let mut returns = Vec::new();
    let mut body: Option<String> = None;
    let mut section = Section::Other;

    for line in lines {
        let value = if section == Section::Body {
            // everything after Body belongs to it
            *line
        } else if let Some(caps) = DESCRIBE_HEADER_RE.captures(line) {
            let header = caps.get(1).map_or("", |m| m.as_str()).trim();
            section = match header {
                "Input" => Section::Input,
                "Returns" => Section::Returns,
                "Body" => Section::Body,
                "Type" => {
                    is_table = caps
                        .get(2)
                        .is_some_and(|m| m.as_str().trim().eq_ignore_ascii_case("TABLE"));
                    Section::Other
                }
                _ => Section::Other,
            };
            if section == Section::Body {
                body = Some(caps.get(2).map_or("", |m| m.as_str()).trim().to_string());
                continue;
            }
            caps.get(2).map_or("", |m| m.as_str())
        } else {
            *line
        };

        match section {
            Section::Input => {
                let entry = collapse_spaces(value);
                if entry.is_empty() || entry == "()" {
                    continue;
                }
                let mut parts = entry.split(' ');
                match (parts.next(), parts.next()) {
                    (Some(param), Some(data_type)) => {
                        parameters.push(format!("{param} {}", standard_type(data_type)))
                    }
                    _ => {
                        return Err(SchemaCompareError::parse(
                            &object,
                            format!("parameter name and type expected in description line '{entry}'"),
                        ))
                    }
                }
            }
            Section::Returns => {
                let entry = collapse_spaces(value);
                if !entry.is_empty() {
                    returns.push(entry);
                }
            }
            Section::Body => {
                if let Some(body) = body.as_mut() {
                    body.push('\n');
                    body.push_str(value);
                }
            }
            Section::Other => {}
        }
    }

    let body = body.ok_or_else(|| SchemaCompareError::MissingKeyword {
        object: object.clone(),
        keyword: "Body".to_string(),
    })?;
    let body = body.trim_end();
    let params = parameters.join(",");

    if is_table {
        Ok(format!(
            "create function {object} ({params}) returns table({}) return {body}",
            returns.join(",")
        ))
    } else {
        let return_type = returns.first().ok_or_else(|| SchemaCompareError::MissingKeyword {
            object: object.clone(),
            keyword: "Returns".to_string(),
        })?;
        Ok(format!(
            "create function {object} ({params}) returns {return_type} return {body}"
        ))
    }
}
