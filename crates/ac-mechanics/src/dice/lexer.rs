//! Lexer for damage expressions.
//!
//! Covers both the host's embedded die expressions (`"2d6+3"`) and the
//! formulas the synthesizer emits (`"((1d6+6+0)[persistent])[fire]"`).

use std::fmt;
use std::ops::Range;

use logos::Logos;

/// Token type for damage expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A dice term such as `2d6` or `d8` (count defaults to 1).
    Dice {
        /// Number of dice.
        count: u32,
        /// Sides per die.
        sides: u32,
    },
    /// Unsigned integer literal.
    Number(i64),
    /// Plus `+`.
    Plus,
    /// Minus `-`.
    Minus,
    /// Multiplication `*`.
    Star,
    /// Division `/`.
    Slash,
    /// Left parenthesis `(`.
    LParen,
    /// Right parenthesis `)`.
    RParen,
    /// Left bracket `[`.
    LBracket,
    /// Right bracket `]`.
    RBracket,
    /// Left brace `{`.
    LBrace,
    /// Right brace `}`.
    RBrace,
    /// Comma `,`.
    Comma,
    /// Bare word: a tag inside brackets, or a roll-data reference like `@item.level`.
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Dice { count, sides } => write!(f, "{count}d{sides}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Word(w) => write!(f, "{w}"),
        }
    }
}

/// Internal logos token, converted to an owned `Token` after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"[0-9]*[dD][0-9]+")]
    Dice,

    #[regex(r"[0-9]+")]
    Number,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[regex(r"[a-zA-Z_@][a-zA-Z_.\-]*")]
    Word,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the erroneous input in the source.
    pub span: Range<usize>,
    /// Human-readable description of the lexer error.
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

/// Lex an expression into a sequence of `(Token, Span)` pairs.
///
/// Returns the token stream and any lexer errors.
pub fn lex(source: &str) -> (Vec<(Token, Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let token = match result {
            Ok(RawToken::Dice) => match parse_dice(slice) {
                Some((count, sides)) => Token::Dice { count, sides },
                None => {
                    errors.push(LexError {
                        span,
                        message: format!("invalid dice term: {slice}"),
                    });
                    continue;
                }
            },
            Ok(RawToken::Number) => match slice.parse::<i64>() {
                Ok(n) => Token::Number(n),
                Err(_) => {
                    errors.push(LexError {
                        span,
                        message: format!("invalid integer literal: {slice}"),
                    });
                    continue;
                }
            },
            Ok(RawToken::Plus) => Token::Plus,
            Ok(RawToken::Minus) => Token::Minus,
            Ok(RawToken::Star) => Token::Star,
            Ok(RawToken::Slash) => Token::Slash,
            Ok(RawToken::LParen) => Token::LParen,
            Ok(RawToken::RParen) => Token::RParen,
            Ok(RawToken::LBracket) => Token::LBracket,
            Ok(RawToken::RBracket) => Token::RBracket,
            Ok(RawToken::LBrace) => Token::LBrace,
            Ok(RawToken::RBrace) => Token::RBrace,
            Ok(RawToken::Comma) => Token::Comma,
            Ok(RawToken::Word) => Token::Word(slice.to_string()),
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span]),
                });
                continue;
            }
        };
        tokens.push((token, span));
    }

    (tokens, errors)
}

/// Split `NdS` into its count and side parts. A missing count means one die.
fn parse_dice(slice: &str) -> Option<(u32, u32)> {
    let lower = slice.to_lowercase();
    let (count, sides) = lower.split_once('d')?;
    let count = if count.is_empty() {
        1
    } else {
        count.parse().ok()?
    };
    Some((count, sides.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "errors: {errors:?}");
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn lex_simple_expression() {
        assert_eq!(
            tokens("2d6+3"),
            vec![
                Token::Dice { count: 2, sides: 6 },
                Token::Plus,
                Token::Number(3),
            ]
        );
    }

    #[test]
    fn lex_bare_die_defaults_to_one() {
        assert_eq!(tokens("d8"), vec![Token::Dice { count: 1, sides: 8 }]);
    }

    #[test]
    fn lex_synthesized_formula() {
        let toks = tokens("((3)[persistent])[fire]");
        assert_eq!(toks.len(), 11);
        assert_eq!(toks[2], Token::Number(3));
        assert_eq!(toks[5], Token::Word("persistent".to_string()));
        assert_eq!(toks[9], Token::Word("fire".to_string()));
    }

    #[test]
    fn lex_roll_data_reference() {
        let toks = tokens("1d4+@item.level");
        assert_eq!(toks[2], Token::Word("@item.level".to_string()));
    }

    #[test]
    fn lex_reports_unexpected_character() {
        let (_, errors) = lex("2d6 % 3");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unexpected character"));
    }

    #[test]
    fn token_display_round_trips_dice() {
        assert_eq!(Token::Dice { count: 3, sides: 10 }.to_string(), "3d10");
    }
}
