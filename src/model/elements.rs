//! Schema object element types

use std::fmt;

use indexmap::IndexMap;

/// Rendering of an absent comment in reports and dumps.
pub const NULL_COMMENT: &str = "(null)";

/// Kind of a compared object.
///
/// The declaration order is the report order: tables, views, scalar functions,
/// table functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    Table,
    View,
    ScalarFunction,
    TableFunction,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Table,
        ObjectKind::View,
        ObjectKind::ScalarFunction,
        ObjectKind::TableFunction,
    ];

    /// Short code used in identity strings (e.g. `tabl:sales.orders`)
    pub fn code(&self) -> &'static str {
        match self {
            ObjectKind::Table => "tabl",
            ObjectKind::View => "view",
            ObjectKind::ScalarFunction => "scfn",
            ObjectKind::TableFunction => "tbfn",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ObjectKind::Table => "Tables",
            ObjectKind::View => "Views",
            ObjectKind::ScalarFunction => "Scalar functions",
            ObjectKind::TableFunction => "Table functions",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, ObjectKind::ScalarFunction | ObjectKind::TableFunction)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unique key of an object within one schema map.
///
/// The schema is always the normalized schema name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectIdentity {
    pub kind: ObjectKind,
    pub schema: String,
    pub name: String,
}

impl ObjectIdentity {
    pub fn new(kind: ObjectKind, schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.kind.code(), self.schema, self.name)
    }
}

/// Column of a table or of a table function's return table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name with back-ticks removed
    pub name: String,
    /// Standardized type name
    pub data_type: String,
    /// Set when the column declares a top-level `NOT NULL` pair. The name matches the
    /// `nullable` key of the dump format.
    pub nullable: bool,
    /// Column comment without its quotes; `None` when the column has no comment
    pub comment: Option<String>,
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    pub data_type: String,
}

/// What a function returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnSpec {
    /// Standardized scalar type
    Scalar(String),
    /// Ordered columns of the returned table
    Table(Vec<ColumnDefinition>),
}

impl ReturnSpec {
    /// Comparable signature: the scalar type, or `name type [comment c]` entries
    /// joined with commas.
    pub fn signature(&self) -> String {
        match self {
            ReturnSpec::Scalar(data_type) => data_type.clone(),
            ReturnSpec::Table(columns) => columns
                .iter()
                .map(|c| match &c.comment {
                    Some(comment) => format!("{} {} comment {}", c.name, c.data_type, comment),
                    None => format!("{} {}", c.name, c.data_type),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Structural definition of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectDefinition {
    Table {
        /// Columns in declaration order
        columns: IndexMap<String, ColumnDefinition>,
        comment: Option<String>,
    },
    View {
        body: String,
    },
    Function {
        parameters: Vec<ParameterDefinition>,
        returns: ReturnSpec,
        body: String,
    },
}

impl ObjectDefinition {
    /// Object comment. Views and functions never carry one.
    pub fn comment(&self) -> Option<&str> {
        match self {
            ObjectDefinition::Table { comment, .. } => comment.as_deref(),
            _ => None,
        }
    }

    /// Body text of views and functions.
    pub fn body(&self) -> Option<&str> {
        match self {
            ObjectDefinition::Table { .. } => None,
            ObjectDefinition::View { body } | ObjectDefinition::Function { body, .. } => {
                Some(body)
            }
        }
    }

    /// `name type` entries joined with commas; empty for non-functions.
    pub fn parameter_signature(&self) -> String {
        match self {
            ObjectDefinition::Function { parameters, .. } => parameters
                .iter()
                .map(|p| format!("{} {}", p.name, p.data_type))
                .collect::<Vec<_>>()
                .join(","),
            _ => String::new(),
        }
    }
}

/// A parsed object together with its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaObject {
    pub identity: ObjectIdentity,
    pub definition: ObjectDefinition,
}

/// Which side of a comparison a schema map was collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}
