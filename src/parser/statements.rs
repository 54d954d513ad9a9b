//! Statement splitting on `;`
//!
//! A semicolon only ends a statement when it sits outside a single-quoted literal and
//! outside a `--` comment. Empty candidates are dropped.

use super::tokenizer::QuoteAutomaton;

/// Split text into candidate statements.
pub fn split_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quotes = QuoteAutomaton::new();
    let mut in_comment = false;
    let mut prev = '\0';

    for c in text.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
            current.push(c);
            prev = c;
            continue;
        }

        let literal = quotes.feed(c);
        if !literal {
            if c == '-' && prev == '-' {
                in_comment = true;
            } else if c == ';' {
                push_statement(&mut statements, &mut current);
                prev = c;
                continue;
            }
        }

        current.push(c);
        // a quote closing a literal must not pair with a following dash
        prev = if literal { '\0' } else { c };
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = std::mem::take(current);
    if !statement.trim().is_empty() {
        statements.push(statement);
    }
}
