//! Reading back synthesized formulas.
//!
//! Accepts exactly the grammar the synthesizer emits: sums of dice and
//! integer terms, parentheses, and `[tag]` suffixes, optionally grouped into
//! a `{a,b,...}` set. This is what a local host needs to roll the formulas
//! and what tests need to check their bounds.

use std::ops::Range;

use rand::rngs::StdRng;

use super::lexer::{Token, lex};
use super::roll::RolledDice;
use super::Die;
use crate::error::{MechError, MechResult};

/// A parsed damage formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// `count` dice of one size.
    Dice {
        /// Number of dice.
        count: u32,
        /// Die size.
        die: Die,
    },
    /// An integer constant.
    Constant(i64),
    /// A sum of terms.
    Sum(Vec<Formula>),
    /// A subtracted term.
    Negate(Box<Formula>),
    /// A term carrying a `[tag]` (damage type or category).
    Tagged {
        /// The tagged term.
        inner: Box<Formula>,
        /// The tag text.
        tag: String,
    },
}

/// The outcome of rolling a formula.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolledFormula {
    /// The formula's total.
    pub total: i64,
    /// Every die rolled, in formula order.
    pub dice: RolledDice,
}

impl Formula {
    /// Parse a single formula.
    pub fn parse(source: &str) -> MechResult<Self> {
        let mut parser = Parser::new(source)?;
        let formula = parser.expr()?;
        parser.finish()?;
        Ok(formula)
    }

    /// Parse either a `{a,b,...}` set or a single formula.
    pub fn parse_set(source: &str) -> MechResult<Vec<Self>> {
        let mut parser = Parser::new(source)?;
        if parser.peek() != Some(&Token::LBrace) {
            let formula = parser.expr()?;
            parser.finish()?;
            return Ok(vec![formula]);
        }
        parser.advance();
        let mut set = vec![parser.expr()?];
        while parser.peek() == Some(&Token::Comma) {
            parser.advance();
            set.push(parser.expr()?);
        }
        parser.expect(&Token::RBrace)?;
        parser.finish()?;
        Ok(set)
    }

    /// Smallest total this formula can produce.
    pub fn min(&self) -> i64 {
        match self {
            Self::Dice { count, .. } => i64::from(*count),
            Self::Constant(n) => *n,
            Self::Sum(terms) => terms.iter().map(Formula::min).sum(),
            Self::Negate(inner) => -inner.max(),
            Self::Tagged { inner, .. } => inner.min(),
        }
    }

    /// Largest total this formula can produce.
    pub fn max(&self) -> i64 {
        match self {
            Self::Dice { count, die } => i64::from(*count) * i64::from(die.sides()),
            Self::Constant(n) => *n,
            Self::Sum(terms) => terms.iter().map(Formula::max).sum(),
            Self::Negate(inner) => -inner.min(),
            Self::Tagged { inner, .. } => inner.max(),
        }
    }

    /// Tags from the outermost inwards: `((3)[persistent])[fire]` yields
    /// `["fire", "persistent"]`.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags = Vec::new();
        let mut current = self;
        while let Self::Tagged { inner, tag } = current {
            tags.push(tag.as_str());
            current = inner;
        }
        tags
    }

    /// Roll the formula.
    pub fn roll(&self, rng: &mut StdRng) -> RolledFormula {
        let mut dice = RolledDice::default();
        let total = self.roll_into(rng, &mut dice);
        RolledFormula { total, dice }
    }

    fn roll_into(&self, rng: &mut StdRng, dice: &mut RolledDice) -> i64 {
        match self {
            Self::Dice { count, die } => {
                i64::from(dice.roll_group(rng, *count, *die))
            }
            Self::Constant(n) => *n,
            Self::Sum(terms) => terms.iter().map(|t| t.roll_into(rng, dice)).sum(),
            Self::Negate(inner) => -inner.roll_into(rng, dice),
            Self::Tagged { inner, .. } => inner.roll_into(rng, dice),
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    spans: Vec<Range<usize>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> MechResult<Self> {
        let (tokens, errors) = lex(source);
        if let Some(err) = errors.first() {
            return Err(MechError::InvalidFormula(format!("{source}: {err}")));
        }
        let (tokens, spans) = tokens.into_iter().unzip();
        Ok(Self {
            source,
            tokens,
            spans,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn error(&self, message: impl std::fmt::Display) -> MechError {
        MechError::InvalidFormula(format!("{}: {message}", self.source))
    }

    fn expect(&mut self, expected: &Token) -> MechResult<()> {
        match self.advance() {
            Some(ref t) if t == expected => Ok(()),
            Some(t) => Err(self.error(format!("expected '{expected}', found '{t}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn finish(&self) -> MechResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(t) => Err(self.error(format!("unexpected '{t}'"))),
        }
    }

    fn expr(&mut self) -> MechResult<Formula> {
        let mut terms = Vec::new();
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            terms.push(Formula::Negate(Box::new(self.term()?)));
        } else {
            terms.push(self.term()?);
        }
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    terms.push(self.term()?);
                }
                Some(Token::Minus) => {
                    self.advance();
                    terms.push(Formula::Negate(Box::new(self.term()?)));
                }
                _ => break,
            }
        }
        if terms.len() == 1 {
            Ok(terms.remove(0))
        } else {
            Ok(Formula::Sum(terms))
        }
    }

    fn term(&mut self) -> MechResult<Formula> {
        let mut formula = self.atom()?;
        while self.peek() == Some(&Token::LBracket) {
            self.advance();
            let tag = self.tag()?;
            formula = Formula::Tagged {
                inner: Box::new(formula),
                tag,
            };
        }
        Ok(formula)
    }

    /// Source text up to the closing bracket. Tags such as `cold-iron` or
    /// `tier-2` lex as several tokens.
    fn tag(&mut self) -> MechResult<String> {
        let first = self.pos;
        while !matches!(self.peek(), Some(Token::RBracket) | None) {
            self.advance();
        }
        let source = self.source;
        let tag = match (self.spans.get(first), self.spans.get(self.pos.wrapping_sub(1))) {
            (Some(start), Some(end)) if self.pos > first => &source[start.start..end.end],
            _ => "",
        };
        if !tag.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
            return Err(self.error(format!("invalid tag '{tag}'")));
        }
        self.expect(&Token::RBracket)?;
        Ok(tag.to_string())
    }

    fn atom(&mut self) -> MechResult<Formula> {
        match self.advance() {
            Some(Token::Dice { count, sides }) => {
                let die = Die::from_sides(sides).ok_or_else(|| self.error(format!("d{sides}")))?;
                Ok(Formula::Dice { count, die })
            }
            Some(Token::Number(n)) => Ok(Formula::Constant(n)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(t) => Err(self.error(format!("unexpected '{t}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }
}
