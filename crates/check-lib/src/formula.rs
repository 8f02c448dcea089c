//! Whitelisted arithmetic formulas applied to polled values
//!
//! The MRTG probe lets the caller rescale a value before it is printed,
//! e.g. `VAL*8` or `(VAL-32)/1.8`. Only the four basic operators, unary
//! minus, parentheses, number literals and the `VAL` placeholder are
//! accepted; a formula is parsed once at configuration time and applied
//! per value.

use thiserror::Error;

/// A formula that does not match the arithmetic grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid formula")]
pub struct FormulaError(pub String);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Val,
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Val,
    Negate(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, value: f64) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Val => value,
            Expr::Negate(inner) => -inner.eval(value),
            Expr::Add(a, b) => a.eval(value) + b.eval(value),
            Expr::Sub(a, b) => a.eval(value) - b.eval(value),
            Expr::Mul(a, b) => a.eval(value) * b.eval(value),
            Expr::Div(a, b) => a.eval(value) / b.eval(value),
        }
    }
}

/// One parsed rescaling formula over a single `VAL` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Parse a formula, rejecting anything outside the grammar.
    pub fn parse(text: &str) -> Result<Self, FormulaError> {
        let err = || FormulaError(text.to_string());
        let tokens = tokenize(text).ok_or_else(err)?;

        let mut parser = Parser { tokens: &tokens, pos: 0 };
        let expr = parser.expr().ok_or_else(err)?;
        if parser.pos != tokens.len() {
            return Err(err());
        }

        Ok(Self { expr })
    }

    /// Apply the formula, substituting `value` for `VAL`.
    pub fn apply(&self, value: f64) -> f64 {
        self.expr.eval(value)
    }
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' | '-' | '*' | '/' | '(' | ')' => {
                chars.next();
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LeftParen,
                    _ => Token::RightParen,
                });
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(literal.parse().ok()?));
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if word != "VAL" {
                    return None;
                }
                tokens.push(Token::Val);
            }
            _ => return None,
        }
    }

    Some(tokens)
}

/// Recursive descent over the token stream.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn expr(&mut self) -> Option<Expr> {
        let mut left = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let right = self.term()?;
            left = match op {
                Token::Plus => Expr::Add(Box::new(left), Box::new(right)),
                _ => Expr::Sub(Box::new(left), Box::new(right)),
            };
        }
        Some(left)
    }

    fn term(&mut self) -> Option<Expr> {
        let mut left = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let right = self.factor()?;
            left = match op {
                Token::Star => Expr::Mul(Box::new(left), Box::new(right)),
                _ => Expr::Div(Box::new(left), Box::new(right)),
            };
        }
        Some(left)
    }

    fn factor(&mut self) -> Option<Expr> {
        match self.advance()? {
            Token::Number(n) => Some(Expr::Number(n)),
            Token::Val => Some(Expr::Val),
            Token::Minus => Some(Expr::Negate(Box::new(self.factor()?))),
            Token::LeftParen => {
                let inner = self.expr()?;
                match self.advance()? {
                    Token::RightParen => Some(inner),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
