//! SQL tokenizing and CREATE statement parsing

mod column_parser;
mod identifier_utils;
mod scanner;
mod statement_parser;
mod statements;
mod tokenizer;

pub use column_parser::{parse_entry_list, ParsedEntry};
pub use identifier_utils::{
    split_object_name, standard_type, strip_backticks, unquote_literal, QualifiedName,
};
pub use scanner::{
    find_entry_token, find_token, find_zero_level_substring, find_zero_level_token, FindMode,
};
pub use statement_parser::{parse_statement, ParseContext};
pub use statements::split_statements;
pub use tokenizer::{
    is_comment_line, strip_comments, tokenize, LexState, QuoteAutomaton, Token, TokenKind,
};
