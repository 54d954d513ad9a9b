//! Zero-level search primitives
//!
//! Both searches track parenthesis depth relative to their start position and only
//! test for a match while the depth is exactly zero. A `)` that closes a group opened
//! before the start position drives the depth negative, which ends any chance of a
//! match until the scan is over.

use super::tokenizer::{QuoteAutomaton, Token};
use crate::util::starts_with_ci;

/// How a list of targets is matched by [`find_zero_level_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindMode {
    /// Any single target token matches.
    Any,
    /// The targets must appear as a contiguous run starting at the scan index.
    Sequence,
}

#[inline]
fn token_matches(token: &Token, target: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        token.as_str() == target
    } else {
        token.is(target)
    }
}

/// Find the first token index at depth zero matching `targets`.
pub fn find_zero_level_token(
    tokens: &[Token],
    targets: &[&str],
    start: usize,
    mode: FindMode,
    case_sensitive: bool,
) -> Option<usize> {
    scan_tokens(tokens, targets, start, mode, case_sensitive, false)
}

/// Like [`find_zero_level_token`], but `<`/`>` pairs outside parentheses nest as well.
///
/// Used inside column and parameter lists, where `map<string,int>` or
/// `struct<x: int, y: string>` must stay part of one entry. A stray `>` never drives the
/// angle depth below zero.
pub fn find_entry_token(
    tokens: &[Token],
    targets: &[&str],
    start: usize,
    mode: FindMode,
) -> Option<usize> {
    scan_tokens(tokens, targets, start, mode, false, true)
}

fn scan_tokens(
    tokens: &[Token],
    targets: &[&str],
    start: usize,
    mode: FindMode,
    case_sensitive: bool,
    angles: bool,
) -> Option<usize> {
    if targets.is_empty() {
        return None;
    }

    let mut depth: i64 = 0;
    let mut angle_depth: usize = 0;
    for i in start..tokens.len() {
        if depth == 0 && angle_depth == 0 {
            let found = match mode {
                FindMode::Any => targets
                    .iter()
                    .any(|t| token_matches(&tokens[i], t, case_sensitive)),
                FindMode::Sequence => {
                    i + targets.len() <= tokens.len()
                        && tokens[i..i + targets.len()]
                            .iter()
                            .zip(targets)
                            .all(|(tok, t)| token_matches(tok, t, case_sensitive))
                }
            };
            if found {
                return Some(i);
            }
        }

        match tokens[i].as_str() {
            "(" => depth += 1,
            ")" => depth -= 1,
            "<" if angles && depth == 0 => angle_depth += 1,
            ">" if angles && depth == 0 => angle_depth = angle_depth.saturating_sub(1),
            _ => {}
        }
    }

    None
}

/// Shorthand for a case-insensitive single-token search.
#[inline]
pub fn find_token(tokens: &[Token], target: &str, start: usize) -> Option<usize> {
    find_zero_level_token(tokens, &[target], start, FindMode::Any, false)
}

/// Find the byte offset of `needle` at depth zero in raw text.
///
/// Parentheses and needles inside single-quoted literals are ignored.
pub fn find_zero_level_substring(
    text: &str,
    needle: &str,
    start: usize,
    case_sensitive: bool,
) -> Option<usize> {
    if needle.is_empty() || start > text.len() || !text.is_char_boundary(start) {
        return None;
    }

    let mut depth: i64 = 0;
    let mut quotes = QuoteAutomaton::new();

    for (offset, c) in text[start..].char_indices() {
        let i = start + offset;
        let was_literal = quotes.in_literal();
        let is_literal = quotes.feed(c);
        if was_literal || is_literal {
            continue;
        }

        if depth == 0 {
            let rest = &text[i..];
            let found = if case_sensitive {
                rest.starts_with(needle)
            } else {
                starts_with_ci(rest, needle)
            };
            if found {
                return Some(i);
            }
        }

        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }

    None
}
