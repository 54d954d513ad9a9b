//! Parenthesised entry lists: table columns, function parameters, return tables
//!
//! ## Supported Syntax
//!
//! ```sql
//! ( name type [NOT NULL] [COMMENT 'text'], ... )
//! ```
//!
//! Entries are delimited by commas outside parentheses and angle brackets, so nested
//! type arguments such as `decimal(10,2)` or `map<string,int>` never split an entry.
//! Only the first word of a type is kept; `decimal(10,2)` compares as `decimal`.

use super::identifier_utils::{standard_type, unquote_literal};
use super::scanner::{find_entry_token, FindMode};
use super::tokenizer::Token;
use crate::error::SchemaCompareError;

/// One entry of a parenthesised list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Name token as written
    pub name: String,
    /// Standardized type
    pub data_type: String,
    /// True when a top-level `NOT NULL` pair appears inside the entry
    pub not_null: bool,
    /// Unquoted text of the literal after `COMMENT`
    pub comment: Option<String>,
}

/// Parse the entries between the parentheses at token indices `open` and `close`.
///
/// `object` and `list` only feed error messages, e.g. `sales.orders` and `Column`.
/// An entry without both a name and a type is fatal.
pub fn parse_entry_list(
    tokens: &[Token],
    open: usize,
    close: usize,
    object: &str,
    list: &str,
) -> Result<Vec<ParsedEntry>, SchemaCompareError> {
    let mut entries = Vec::new();
    let mut i = open + 1;

    // `()`
    if i == close {
        return Ok(entries);
    }

    loop {
        let entry_end = find_entry_token(tokens, &[",", ")"], i, FindMode::Any)
            .ok_or_else(|| {
                SchemaCompareError::parse(
                    object,
                    format!("comma or ending parenthesis expected in {list} list after token {i}"),
                )
            })?;

        if i + 1 >= entry_end {
            return Err(SchemaCompareError::MissingEntryPart {
                object: object.to_string(),
                list: list.to_string(),
                token: i,
            });
        }

        let not_null = find_entry_token(tokens, &["not", "null"], i, FindMode::Sequence)
            .is_some_and(|idx| idx < entry_end);
        let comment = find_entry_token(tokens, &["comment"], i, FindMode::Any)
            .filter(|idx| *idx < entry_end && idx + 1 < tokens.len())
            .map(|idx| unquote_literal(tokens[idx + 1].as_str()));

        entries.push(ParsedEntry {
            name: tokens[i].text.clone(),
            data_type: standard_type(tokens[i + 1].as_str()),
            not_null,
            comment,
        });

        if tokens[entry_end].as_str() == ")" {
            break;
        }
        i = entry_end + 1;
        if i >= close {
            break;
        }
    }

    Ok(entries)
}
