//! Decomposition of embedded die expressions.
//!
//! The host stores some damage as expression strings (`"2d6+3"`). Only sums
//! of dice terms and integer terms are modelled; integers may be subtracted.
//! Anything else (multiplication, division, grouping, roll-data references,
//! negated dice) fails with [`MechError::UnsupportedExpressionSyntax`].

use super::Die;
use super::lexer::{Token, lex};
use crate::error::{MechError, MechResult};

/// A die expression split into its dice terms and its flat total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposed {
    /// Dice terms as `(count, die)` in left-to-right order.
    pub dice: Vec<(u32, Die)>,
    /// Sum of every standalone integer term.
    pub flat: i32,
}

impl Decomposed {
    /// Returns true if the expression contributed neither dice nor a flat value.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty() && self.flat == 0
    }
}

/// Decompose an addition-only die expression.
pub fn decompose(expression: &str) -> MechResult<Decomposed> {
    let unsupported = |reason: String| MechError::UnsupportedExpressionSyntax {
        expression: expression.to_string(),
        reason,
    };

    let (tokens, errors) = lex(expression);
    if let Some(err) = errors.first() {
        return Err(unsupported(err.to_string()));
    }
    if tokens.is_empty() {
        return Err(unsupported("empty expression".to_string()));
    }

    let mut result = Decomposed::default();
    let mut sign: Option<i32> = Some(1);

    for (token, _) in tokens {
        match (token, sign) {
            (Token::Plus, None) => sign = Some(1),
            (Token::Minus, None) => sign = Some(-1),
            // A leading sign, or a sign directly after another sign.
            (Token::Minus, Some(s)) => sign = Some(-s),
            (Token::Plus, Some(_)) => {}
            (Token::Number(n), Some(s)) => {
                result.flat = i32::try_from(n)
                    .ok()
                    .and_then(|n| n.checked_mul(s))
                    .and_then(|n| result.flat.checked_add(n))
                    .ok_or_else(|| unsupported(format!("flat total overflows at {n}")))?;
                sign = None;
            }
            (Token::Dice { count, sides }, Some(s)) => {
                if s < 0 {
                    return Err(unsupported("subtracted dice".to_string()));
                }
                let die =
                    Die::from_sides(sides).ok_or_else(|| unsupported(format!("d{sides}")))?;
                if count > 0 {
                    result.dice.push((count, die));
                }
                sign = None;
            }
            (other, _) => return Err(unsupported(format!("unexpected '{other}'"))),
        }
    }

    if sign.is_some() {
        return Err(unsupported("dangling operator".to_string()));
    }
    Ok(result)
}
