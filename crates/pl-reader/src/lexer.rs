//! Tokenizer for dialogue source text.

use std::iter::Peekable;
use std::str::Chars;

use pl_core::{ErrorKind, ParleyError, SourceLocation, SourceSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Open,
    Close,
    /// Decoded string literal contents.
    Str(String),
    /// Bare word; the reader decides between number and symbol.
    Atom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

struct Lexer<'src> {
    chars: Peekable<Chars<'src>>,
    line: usize,
    column: usize,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == ';' {
                while let Some(&next) = self.chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParleyError> {
        self.skip_trivia();
        let start = self.location();
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        let kind = match ch {
            '(' => {
                self.advance();
                TokenKind::Open
            }
            ')' => {
                self.advance();
                TokenKind::Close
            }
            '"' => {
                self.advance();
                TokenKind::Str(self.read_string(&start)?)
            }
            _ => TokenKind::Atom(self.read_atom()),
        };

        Ok(Some(Token {
            kind,
            span: SourceSpan {
                start,
                end: self.location(),
            },
        }))
    }

    fn read_string(&mut self, start: &SourceLocation) -> Result<String, ParleyError> {
        let mut value = String::new();
        loop {
            let Some(ch) = self.advance() else {
                return Err(ParleyError::with_span(
                    ErrorKind::UnterminatedString,
                    format!(
                        "String literal opened at {}:{} is never closed.",
                        start.line, start.column
                    ),
                    SourceSpan {
                        start: start.clone(),
                        end: self.location(),
                    },
                ));
            };
            match ch {
                '"' => return Ok(value),
                '\\' => match self.advance() {
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => {
                        return Err(ParleyError::with_span(
                            ErrorKind::UnterminatedString,
                            format!(
                                "String literal opened at {}:{} ends inside an escape.",
                                start.line, start.column
                            ),
                            SourceSpan {
                                start: start.clone(),
                                end: self.location(),
                            },
                        ))
                    }
                },
                other => value.push(other),
            }
        }
    }

    fn read_atom(&mut self) -> String {
        let mut atom = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | ';') {
                break;
            }
            atom.push(ch);
            self.advance();
        }
        atom
    }
}

/// Splits source text into parenthesis, string and atom tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParleyError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
