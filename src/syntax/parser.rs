//! Recursive-descent parser for the LTLf concrete syntax.

use thiserror::Error;

use super::Formula;

/// Formula parse failure, with byte offsets into the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected token '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("empty input")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Bang,
    Amp,
    Pipe,
    Arrow,
    DArrow,
    Next,
    WeakNext,
    Eventually,
    Always,
    Until,
    Release,
    True,
    False,
    Atom(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::LParen => "(".into(),
            Self::RParen => ")".into(),
            Self::Bang => "!".into(),
            Self::Amp => "&".into(),
            Self::Pipe => "|".into(),
            Self::Arrow => "->".into(),
            Self::DArrow => "<->".into(),
            Self::Next => "X".into(),
            Self::WeakNext => "WX".into(),
            Self::Eventually => "F".into(),
            Self::Always => "G".into(),
            Self::Until => "U".into(),
            Self::Release => "R".into(),
            Self::True => "true".into(),
            Self::False => "false".into(),
            Self::Atom(name) => name.clone(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let ch = bytes[i] as char;
        match ch {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push((Token::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, i));
                i += 1;
            }
            '!' => {
                tokens.push((Token::Bang, i));
                i += 1;
            }
            '&' => {
                tokens.push((Token::Amp, i));
                // `&&` is accepted as a synonym of `&`
                i += if bytes.get(i + 1) == Some(&b'&') { 2 } else { 1 };
            }
            '|' => {
                tokens.push((Token::Pipe, i));
                i += if bytes.get(i + 1) == Some(&b'|') { 2 } else { 1 };
            }
            '-' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    tokens.push((Token::Arrow, i));
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar { ch, offset: i });
                }
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'-') && bytes.get(i + 2) == Some(&b'>') {
                    tokens.push((Token::DArrow, i));
                    i += 3;
                } else {
                    return Err(ParseError::UnexpectedChar { ch, offset: i });
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len() {
                    let c = bytes[i] as char;
                    if c.is_ascii_alphanumeric() || c == '_' {
                        i += 1;
                    } else {
                        break;
                    }
                }
                let word = &input[start..i];
                let token = match word {
                    "true" => Token::True,
                    "false" => Token::False,
                    "X" => Token::Next,
                    "WX" => Token::WeakNext,
                    "F" => Token::Eventually,
                    "G" => Token::Always,
                    "U" => Token::Until,
                    "R" => Token::Release,
                    _ => Token::Atom(word.to_string()),
                };
                tokens.push((token, start));
            }
            _ => return Err(ParseError::UnexpectedChar { ch, offset: i }),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Result<(Token, usize), ParseError> {
        let item = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(item)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // Precedence climbing, loosest first. All binary operators are
    // right-associative.
    fn equiv(&mut self) -> Result<Formula, ParseError> {
        let lhs = self.implies()?;
        if self.eat(&Token::DArrow) {
            let rhs = self.equiv()?;
            return Ok(Formula::Equiv(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn implies(&mut self) -> Result<Formula, ParseError> {
        let lhs = self.or()?;
        if self.eat(&Token::Arrow) {
            let rhs = self.implies()?;
            return Ok(Formula::Implies(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn or(&mut self) -> Result<Formula, ParseError> {
        let lhs = self.and()?;
        if self.eat(&Token::Pipe) {
            let rhs = self.or()?;
            return Ok(Formula::Or(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Formula, ParseError> {
        let lhs = self.until()?;
        if self.eat(&Token::Amp) {
            let rhs = self.and()?;
            return Ok(Formula::And(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn until(&mut self) -> Result<Formula, ParseError> {
        let lhs = self.unary()?;
        if self.eat(&Token::Until) {
            let rhs = self.until()?;
            return Ok(Formula::Until(Box::new(lhs), Box::new(rhs)));
        }
        if self.eat(&Token::Release) {
            let rhs = self.until()?;
            return Ok(Formula::Release(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Formula, ParseError> {
        match self.peek() {
            Some(Token::Bang) => {
                self.pos += 1;
                Ok(Formula::Not(Box::new(self.unary()?)))
            }
            Some(Token::Next) => {
                self.pos += 1;
                Ok(Formula::Next(Box::new(self.unary()?)))
            }
            Some(Token::WeakNext) => {
                self.pos += 1;
                Ok(Formula::WeakNext(Box::new(self.unary()?)))
            }
            Some(Token::Eventually) => {
                self.pos += 1;
                Ok(Formula::Eventually(Box::new(self.unary()?)))
            }
            Some(Token::Always) => {
                self.pos += 1;
                Ok(Formula::Always(Box::new(self.unary()?)))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Formula, ParseError> {
        let (token, offset) = self.next()?;
        match token {
            Token::True => Ok(Formula::True),
            Token::False => Ok(Formula::False),
            Token::Atom(name) => Ok(Formula::Atom(name)),
            Token::LParen => {
                let inner = self.equiv()?;
                let (close, close_offset) = self.next()?;
                if close != Token::RParen {
                    return Err(ParseError::UnexpectedToken {
                        token: close.describe(),
                        offset: close_offset,
                    });
                }
                Ok(inner)
            }
            other => Err(ParseError::UnexpectedToken {
                token: other.describe(),
                offset,
            }),
        }
    }
}

/// Parse an LTLf formula from its textual form.
pub fn parse_formula(input: &str) -> Result<Formula, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let formula = parser.equiv()?;
    if let Some((_, offset)) = parser.tokens.get(parser.pos) {
        return Err(ParseError::TrailingInput { offset: *offset });
    }
    Ok(formula)
}
