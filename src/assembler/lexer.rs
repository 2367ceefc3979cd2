//! This lexer tokenizes SX64 assembly source.
use std::collections::VecDeque;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use regex::Regex;

use super::error::AsmError;

// Tokens carry either the uppercased spelling of a name or the decoded
// value of a literal. Order in the stream is the only structure; the
// generator groups tokens into instructions as it consumes them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    Keyword(String),
    Register(String),
    Number(u64),
    Char(u64),
    Comma,
    Colon,
    Newline,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Keyword(name) => write!(f, "keyword {}", name),
            Token::Register(name) => write!(f, "register {}", name),
            Token::Number(value) => write!(f, "number {}", value),
            Token::Char(value) => write!(f, "character {}", value),
            Token::Comma => write!(f, "','"),
            Token::Colon => write!(f, "':'"),
            Token::Newline => write!(f, "newline"),
        }
    }
}

/// Scan the full source text into its token sequence.
pub fn tokenize(source: &str) -> Result<VecDeque<Token>, AsmError> {
    Lexer::new(source).run()
}

/// A single-pass scanner over the source characters, with one
/// character of lookahead. `position` counts characters consumed and
/// is the position lex errors report.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
    register: Regex,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            position: 0,
            register: Regex::new(r"^[Rr][0-7]$").unwrap(),
        }
    }

    /// Run the scanner, consuming itself and returning the tokens.
    pub fn run(mut self) -> Result<VecDeque<Token>, AsmError> {
        let mut tokens: VecDeque<Token> = VecDeque::with_capacity(256);

        while let Some(c) = self.peek() {
            match c {
                // A newline is the one whitespace character that leaves
                // a token behind; instructions read better on their own
                // lines, though nothing requires it.
                '\n' => {
                    self.advance();
                    tokens.push_back(Token::Newline);
                }
                _ if c.is_whitespace() => {
                    self.advance();
                }
                ',' => {
                    self.advance();
                    tokens.push_back(Token::Comma);
                }
                ':' => {
                    self.advance();
                    tokens.push_back(Token::Colon);
                }
                '\'' => tokens.push_back(self.char_literal()?),
                _ if c.is_alphabetic() => tokens.push_back(self.identifier()),
                _ if c.is_ascii_digit() => tokens.push_back(self.number()?),
                _ => {
                    return Err(AsmError::UnexpectedCharacter {
                        found: c,
                        position: self.position,
                    })
                }
            }
        }

        Ok(tokens)
    }

    /// Identifier state: consume alphanumerics, then decide whether the
    /// word names a register or a keyword. Both are uppercased so the
    /// generator never sees mixed case.
    fn identifier(&mut self) -> Token {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if !c.is_alphanumeric() {
                break;
            }
            word.push(c);
            self.advance();
        }

        if self.register.is_match(&word) {
            Token::Register(word.to_uppercase())
        } else {
            Token::Keyword(word.to_uppercase())
        }
    }

    /// Number state: a leading `0x`/`0o`/`0b` selects the base, any
    /// other digit sequence is decimal.
    fn number(&mut self) -> Result<Token, AsmError> {
        let start = self.position;
        let mut radix = 10;
        let mut digits = String::new();

        if let Some('0') = self.peek() {
            self.advance();
            match self.peek() {
                Some('x') | Some('X') => {
                    self.advance();
                    radix = 16;
                }
                Some('o') | Some('O') => {
                    self.advance();
                    radix = 8;
                }
                Some('b') | Some('B') => {
                    self.advance();
                    radix = 2;
                }
                // Just a zero; keep it and scan on in decimal.
                _ => digits.push('0'),
            }
        }

        while let Some(c) = self.peek() {
            if !c.is_digit(radix) {
                break;
            }
            digits.push(c);
            self.advance();
        }

        // A bare radix prefix has no digits to decode.
        if digits.is_empty() {
            return Err(AsmError::InvalidRadixDigit {
                base: radix,
                position: self.position,
            });
        }

        match u64::from_str_radix(&digits, radix) {
            Ok(value) => Ok(Token::Number(value)),
            Err(_) => Err(AsmError::ValueOutOfRange { position: start }),
        }
    }

    /// Character literal state: exactly one character between quotes;
    /// its code point becomes the token value. There are no escapes.
    fn char_literal(&mut self) -> Result<Token, AsmError> {
        let start = self.position;
        self.advance(); // Opening quote.

        let value = match self.advance() {
            None | Some('\'') => {
                return Err(AsmError::EmptyCharLiteral { position: start })
            }
            Some(c) => c as u64,
        };

        match self.advance() {
            Some('\'') => Ok(Token::Char(value)),
            _ => Err(AsmError::UnterminatedCharLiteral { position: start }),
        }
    }

    /// Consume the next character, tracking the scan position.
    fn advance(&mut self) -> Option<char> {
        let next = self.chars.next();
        if next.is_some() {
            self.position += 1;
        }
        next
    }

    #[inline]
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}
