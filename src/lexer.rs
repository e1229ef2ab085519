//! Indentation-aware lexer.
//!
//! The whole input is consumed eagerly at construction time and normalized
//! into a flat token list: leading whitespace becomes explicit
//! `Indent`/`Dedent` markers, physical newlines collapse into single
//! `Newline` tokens, and the list always ends with `Newline`-or-`Dedent`
//! followed by exactly one `Eof`. The external parser walks the result
//! through `current`/`advance`.

use std::io::Read;

use thiserror::Error;

use crate::token::Token;

/// Spaces per indentation level. Blocks must step by exactly this amount.
pub const INDENT_STEP: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unknown escape sequence '\\{escape}' at position {position}")]
    UnknownEscape { escape: char, position: usize },
    #[error("String literal interrupted by end of line at position {position}")]
    NewlineInString { position: usize },
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },
    #[error("Invalid integer literal '{literal}' at position {position}")]
    BadNumber { literal: String, position: usize },
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("Failed to read source: {message}")]
    Input { message: String },
}

pub type LexResult<T> = Result<T, LexError>;

/// Random-access token stream positioned at the first token.
#[derive(Debug)]
pub struct Lexer {
    tokens: Vec<Token>,
    position: usize,
}

impl Lexer {
    /// Consumes `input` to exhaustion and tokenizes it. The stream itself is
    /// not retained.
    pub fn new(input: &mut dyn Read) -> LexResult<Self> {
        let mut source = String::new();
        input
            .read_to_string(&mut source)
            .map_err(|error| LexError::Input {
                message: error.to_string(),
            })?;
        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> LexResult<Self> {
        let tokens = Tokenizer::new(source).run()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    /// Moves to the next token and returns it. Advancing past the end keeps
    /// yielding `Eof`.
    pub fn advance(&mut self) -> Token {
        if self.position + 1 >= self.tokens.len() {
            return Token::Eof;
        }
        self.position += 1;
        self.tokens[self.position].clone()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    indent: usize,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            indent: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> LexResult<Vec<Token>> {
        while self.peek_char().is_some() {
            self.step()?;
        }

        if let Some(last) = self.tokens.last()
            && *last != Token::Newline
            && *last != Token::Dedent
        {
            self.tokens.push(Token::Newline);
        }
        self.tokens.push(Token::Eof);
        Ok(self.tokens)
    }

    fn step(&mut self) -> LexResult<()> {
        let position = self.pos;
        let ch = self.peek_char().ok_or(LexError::Input {
            message: "step past end of input".to_string(),
        })?;

        match ch {
            '\n' => {
                self.consume_char();
                if self.tokens.last().is_some_and(|last| *last != Token::Newline) {
                    self.tokens.push(Token::Newline);
                }
                self.measure_indentation();
            }
            '\'' | '"' => self.read_string(position)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.read_word(position),
            '=' | '<' | '>' | '!' => self.read_comparison_or_char(),
            '#' => self.skip_comment(),
            c if c.is_ascii_punctuation() => {
                self.consume_char();
                self.tokens.push(Token::Char(c as u8));
            }
            c if c.is_ascii_digit() => self.read_number(position)?,
            ' ' => {
                self.consume_while(|c| c == ' ');
            }
            character => {
                return Err(LexError::UnexpectedCharacter {
                    character,
                    position,
                });
            }
        }
        Ok(())
    }

    /// Counts leading spaces after a physical newline and emits the matching
    /// run of `Indent`/`Dedent` tokens. Blank and comment-only lines leave the
    /// stored level untouched; end of input counts as an empty line at level
    /// zero, which flushes any open blocks.
    fn measure_indentation(&mut self) {
        let spaces = self.consume_while(|c| c == ' ');
        if matches!(self.peek_char(), Some('\n') | Some('#')) {
            return;
        }

        let delta = (spaces as isize - self.indent as isize) / INDENT_STEP as isize;
        self.indent = spaces;
        for _ in 0..delta.abs() {
            self.tokens.push(if delta > 0 {
                Token::Indent
            } else {
                Token::Dedent
            });
        }
    }

    fn read_word(&mut self, start: usize) {
        self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = &self.source[start..self.pos];
        match Token::keyword(text) {
            Some(keyword) => self.tokens.push(keyword),
            None => self.tokens.push(Token::Id(text.to_string())),
        }
    }

    fn read_number(&mut self, start: usize) -> LexResult<()> {
        self.consume_while(|c| c.is_ascii_digit());
        let literal = &self.source[start..self.pos];
        let value = literal.parse::<i64>().map_err(|_| LexError::BadNumber {
            literal: literal.to_string(),
            position: start,
        })?;
        self.tokens.push(Token::Number(value));
        Ok(())
    }

    fn read_comparison_or_char(&mut self) {
        let first = self.consume_char().unwrap_or_default();
        if self.peek_char() == Some('=') {
            self.consume_char();
            self.tokens.push(match first {
                '=' => Token::Eq,
                '<' => Token::LessOrEq,
                '>' => Token::GreaterOrEq,
                _ => Token::NotEq,
            });
        } else {
            self.tokens.push(Token::Char(first as u8));
        }
    }

    fn read_string(&mut self, start: usize) -> LexResult<()> {
        let quote = self.consume_char().unwrap_or_default();
        let mut text = String::new();

        loop {
            let position = self.pos;
            match self.consume_char() {
                Some(c) if c == quote => break,
                Some('\\') => match self.consume_char() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some('"') => text.push('"'),
                    Some('\'') => text.push('\''),
                    Some('\\') => text.push('\\'),
                    Some(escape) => {
                        return Err(LexError::UnknownEscape { escape, position });
                    }
                    None => return Err(LexError::UnterminatedString { position: start }),
                },
                Some('\n') | Some('\r') => {
                    return Err(LexError::NewlineInString { position });
                }
                Some(c) => text.push(c),
                None => return Err(LexError::UnterminatedString { position: start }),
            }
        }
        self.tokens.push(Token::String(text));
        Ok(())
    }

    /// Discards through end of line without consuming the newline itself.
    fn skip_comment(&mut self) {
        self.consume_while(|c| c != '\n');
    }

    fn consume_while<P>(&mut self, keep: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !keep(c) {
                break;
            }
            self.consume_char();
        }
        self.pos - start
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}
