//! JSON export of a schema map (dump mode)
//!
//! Objects are keyed by their identity string (`kind:schema.name`). Every entry
//! carries `fullname` and `type`; tables add `comment` and `columns`, views add
//! `text`, functions add `parameters`, `returns` and `text`. Absent comments are
//! written as `(null)`.

use indexmap::IndexMap;
use serde::Serialize;

use super::elements::{ColumnDefinition, ObjectDefinition, ReturnSpec, NULL_COMMENT};
use super::schema_map::SchemaMap;
use crate::error::SchemaCompareError;

#[derive(Debug, Serialize)]
struct DumpColumn<'a> {
    #[serde(rename = "type")]
    data_type: &'a str,
    nullable: bool,
    comment: &'a str,
}

#[derive(Debug, Serialize)]
struct DumpReturnColumn<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    data_type: &'a str,
    comment: &'a str,
}

#[derive(Debug, Serialize)]
struct DumpParameter<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    data_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DumpReturns<'a> {
    Scalar(&'a str),
    Table(Vec<DumpReturnColumn<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DumpObject<'a> {
    Table {
        fullname: String,
        #[serde(rename = "type")]
        kind: &'static str,
        text: &'static str,
        comment: &'a str,
        columns: IndexMap<&'a str, DumpColumn<'a>>,
    },
    View {
        fullname: String,
        #[serde(rename = "type")]
        kind: &'static str,
        text: &'a str,
        comment: &'static str,
        columns: IndexMap<&'a str, DumpColumn<'a>>,
    },
    Function {
        fullname: String,
        #[serde(rename = "type")]
        kind: &'static str,
        returns: DumpReturns<'a>,
        text: &'a str,
        parameters: Vec<DumpParameter<'a>>,
    },
}

fn comment_text(comment: &Option<String>) -> &str {
    comment.as_deref().unwrap_or(NULL_COMMENT)
}

fn dump_column(column: &ColumnDefinition) -> DumpColumn<'_> {
    DumpColumn {
        data_type: &column.data_type,
        nullable: column.nullable,
        comment: comment_text(&column.comment),
    }
}

/// Serialize a schema map as pretty-printed JSON.
pub fn dump_json(map: &SchemaMap) -> Result<String, SchemaCompareError> {
    let mut objects: IndexMap<String, DumpObject<'_>> = IndexMap::with_capacity(map.len());

    for (identity, definition) in map.iter() {
        let fullname = identity.qualified_name();
        let kind = identity.kind.code();
        let object = match definition {
            ObjectDefinition::Table { columns, comment } => DumpObject::Table {
                fullname,
                kind,
                text: "",
                comment: comment_text(comment),
                columns: columns
                    .iter()
                    .map(|(name, column)| (name.as_str(), dump_column(column)))
                    .collect(),
            },
            ObjectDefinition::View { body } => DumpObject::View {
                fullname,
                kind,
                text: body,
                comment: NULL_COMMENT,
                columns: IndexMap::new(),
            },
            ObjectDefinition::Function {
                parameters,
                returns,
                body,
            } => DumpObject::Function {
                fullname,
                kind,
                returns: match returns {
                    ReturnSpec::Scalar(data_type) => DumpReturns::Scalar(data_type),
                    ReturnSpec::Table(columns) => DumpReturns::Table(
                        columns
                            .iter()
                            .map(|c| DumpReturnColumn {
                                name: &c.name,
                                data_type: &c.data_type,
                                comment: comment_text(&c.comment),
                            })
                            .collect(),
                    ),
                },
                text: body,
                parameters: parameters
                    .iter()
                    .map(|p| DumpParameter {
                        name: &p.name,
                        data_type: &p.data_type,
                    })
                    .collect(),
            },
        };
        objects.insert(identity.to_string(), object);
    }

    serde_json::to_string_pretty(&objects).map_err(SchemaCompareError::DumpSerializeError)
}
