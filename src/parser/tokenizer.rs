//! Literal-aware SQL tokenizer
//!
//! Turns the raw text of one statement into a flat token sequence:
//!
//! - comment lines (`--` after leading whitespace) are dropped, an inline `--` outside a
//!   literal truncates the rest of its line
//! - operators and structural punctuation become tokens of their own
//! - a single-quoted literal is one token, delimiters included, content byte-exact
//! - a back-ticked span stays inside its word, so `` s.`order items` `` is one token
//! - everything else is split on whitespace into words, case preserved
//!
//! Quoting is driven by [`QuoteAutomaton`], a two-state machine that the statement
//! splitter and the comment stripper share with the lexer.

/// Operators recognised outside literals, longest first so that `<=>` wins over `<=`.
const OPERATORS: &[&str] = &[
    "<=>", "!=", "<=", "<>", "==", ">=", "||", "!", "%", "&", "*", "+", "-", "/", "<", "=",
    ">", "^", "|", "~",
];

/// Structural punctuation. The escaped newline `\n` is kept apart from words.
const PUNCTUATION: &[&str] = &["\\n", ",", ";", "(", ")", "[", "]", "\""];

const COMMENT_START: &str = "--";

/// Lexer state with respect to single-quoted literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    Normal,
    InLiteral,
}

/// Two-state quote automaton consumed one character at a time.
///
/// Inside a literal a backslash escapes the following character, so `'it\'s'` stays a
/// single literal.
#[derive(Debug, Clone)]
pub struct QuoteAutomaton {
    state: LexState,
    escape_pending: bool,
}

impl Default for QuoteAutomaton {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteAutomaton {
    pub fn new() -> Self {
        Self {
            state: LexState::Normal,
            escape_pending: false,
        }
    }

    #[inline]
    pub fn state(&self) -> LexState {
        self.state
    }

    #[inline]
    pub fn in_literal(&self) -> bool {
        self.state == LexState::InLiteral
    }

    /// Feed one character. Returns true when the character belongs to a literal,
    /// opening and closing quotes included.
    pub fn feed(&mut self, c: char) -> bool {
        match self.state {
            LexState::Normal => {
                if c == '\'' {
                    self.state = LexState::InLiteral;
                    true
                } else {
                    false
                }
            }
            LexState::InLiteral => {
                if self.escape_pending {
                    self.escape_pending = false;
                } else if c == '\\' {
                    self.escape_pending = true;
                } else if c == '\'' {
                    self.state = LexState::Normal;
                }
                true
            }
        }
    }
}

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Operator,
    Punctuation,
    Literal,
}

/// A single SQL token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-insensitive comparison with a keyword or symbol.
    #[inline]
    pub fn is(&self, text: &str) -> bool {
        self.text.eq_ignore_ascii_case(text)
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        self.kind == TokenKind::Literal
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Returns true when a line is a comment line and must be dropped entirely.
#[inline]
pub fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_START)
}

/// Tokenize one statement.
pub fn tokenize(sql: &str) -> Vec<Token> {
    let mut lexer = Lexer::default();
    for line in sql.lines() {
        lexer.push_line(line);
    }
    lexer.finish()
}

#[derive(Default)]
struct Lexer {
    tokens: Vec<Token>,
    word: String,
    literal: String,
    quotes: QuoteAutomaton,
    in_backticks: bool,
}

impl Lexer {
    fn push_line(&mut self, line: &str) {
        if !self.quotes.in_literal() && (line.trim().is_empty() || is_comment_line(line)) {
            return;
        }

        let mut pos = 0;
        while pos < line.len() {
            let rest = &line[pos..];
            let Some(c) = rest.chars().next() else {
                break;
            };

            if self.quotes.in_literal() {
                self.quotes.feed(c);
                self.literal.push(c);
                if !self.quotes.in_literal() {
                    let text = std::mem::take(&mut self.literal);
                    self.tokens.push(Token::new(TokenKind::Literal, text));
                }
                pos += c.len_utf8();
                continue;
            }

            if self.in_backticks || c == '`' {
                if c == '`' {
                    self.in_backticks = !self.in_backticks;
                }
                self.word.push(c);
                pos += c.len_utf8();
                continue;
            }

            if rest.starts_with(COMMENT_START) {
                break;
            }

            if c == '\'' {
                self.flush_word();
                self.quotes.feed(c);
                self.literal.push(c);
                pos += 1;
                continue;
            }

            if c.is_whitespace() {
                self.flush_word();
                pos += c.len_utf8();
                continue;
            }

            if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
                self.flush_word();
                self.tokens.push(Token::new(TokenKind::Operator, *op));
                pos += op.len();
                continue;
            }

            if let Some(p) = PUNCTUATION.iter().find(|p| rest.starts_with(**p)) {
                self.flush_word();
                self.tokens.push(Token::new(TokenKind::Punctuation, *p));
                pos += p.len();
                continue;
            }

            self.word.push(c);
            pos += c.len_utf8();
        }

        if self.quotes.in_literal() {
            // literals may span lines
            self.quotes.feed('\n');
            self.literal.push('\n');
        } else {
            // an unterminated back-tick span ends with its line
            self.in_backticks = false;
            self.flush_word();
        }
    }

    fn flush_word(&mut self) {
        if !self.word.is_empty() {
            let text = std::mem::take(&mut self.word);
            self.tokens.push(Token::new(TokenKind::Word, text));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_word();
        if !self.literal.is_empty() {
            // Unterminated literal: keep what was read rather than dropping it.
            let text = std::mem::take(&mut self.literal);
            let text = text.strip_suffix('\n').map(str::to_string).unwrap_or(text);
            self.tokens.push(Token::new(TokenKind::Literal, text));
        }
        self.tokens
    }
}

/// Remove comment lines and inline comments, keeping everything else verbatim.
///
/// Lines are right-trimmed and empty lines are dropped. Used for body extraction, where
/// the text after the separator keyword must survive with its layout intact.
pub fn strip_comments(sql: &str) -> String {
    let mut quotes = QuoteAutomaton::new();
    let mut lines = Vec::new();

    for line in sql.lines() {
        if !quotes.in_literal() && is_comment_line(line) {
            continue;
        }

        let mut cut = line.len();
        for (i, c) in line.char_indices() {
            if !quotes.in_literal() && line[i..].starts_with(COMMENT_START) {
                cut = i;
                break;
            }
            quotes.feed(c);
        }
        if quotes.in_literal() {
            quotes.feed('\n');
        }

        let kept = line[..cut].trim_end();
        if !kept.is_empty() {
            lines.push(kept);
        }
    }

    lines.join("\n")
}
