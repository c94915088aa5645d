// Whitespace tokenizer with position tracking
use crate::compat::{fmt, Vec};

// RUST CONCEPT: Source position for rich error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
    pub offset: usize, // Byte offset from start of input
}

impl SourcePos {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

// RUST CONCEPT: Borrowed tokens
// Tokens are slices of the input, so tokenizing never allocates per token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub pos: SourcePos,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut start: Option<(usize, SourcePos)> = None;

    for (offset, ch) in input.char_indices() {
        if ch.is_whitespace() {
            if let Some((begin, pos)) = start.take() {
                tokens.push(Token {
                    text: &input[begin..offset],
                    pos,
                });
            }
        } else if start.is_none() {
            start = Some((offset, SourcePos::new(line, column, offset)));
        }

        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    if let Some((begin, pos)) = start {
        tokens.push(Token {
            text: &input[begin..],
            pos,
        });
    }

    tokens
}
