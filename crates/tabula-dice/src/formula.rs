//! Dice formulas
//!
//! A formula like `2d6 - 12` becomes one independent throw per die plus one
//! per constant. A `-` makes every following term negative until a `+`.

use crate::lexer::{tokenize, Sign, Token};
use crate::{DiceThrow, Error, GameRng, Result};
use std::sync::Arc;
use tabula_core::Action;

/// Most dice a single formula may throw
pub const MAX_DICE: u64 = 1000;

/// Named dice formula text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub name: String,
    pub text: String,
}

impl Formula {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Build the throws this formula describes, in formula order
    pub fn throws(&self) -> Result<Vec<DiceThrow>> {
        let mut negative = false;
        let mut throws = Vec::new();

        for token in tokenize(&self.text)? {
            match token {
                Token::Sign(sign) => negative = sign == Sign::Minus,
                Token::Number(n) => {
                    let value = to_i64(n)?;
                    throws.push(
                        DiceThrow::constant(format!("{}: {}", self.name, n), value)
                            .negative(negative),
                    );
                }
                Token::Dice { count, max } => {
                    if count.saturating_add(throws.len() as u64) > MAX_DICE {
                        return Err(Error::InvalidFormula(format!(
                            "{}d{} exceeds {} dice",
                            count, max, MAX_DICE
                        )));
                    }
                    let die = DiceThrow::new(format!("{}: d{}", self.name, max), to_i64(max)?)?
                        .negative(negative);
                    for _ in 0..count {
                        throws.push(die.clone());
                    }
                }
            }
        }

        Ok(throws)
    }

    /// Throw everything and return one creation action per throw
    ///
    /// Fails when the results cannot be summed into an `i64`.
    pub fn parse(&self, rng: &mut GameRng) -> Result<Vec<Arc<Action>>> {
        let actions: Vec<_> = self
            .throws()?
            .iter()
            .map(|throw| throw.throw(rng))
            .collect();
        total(&actions)?;
        tracing::debug!(formula = %self.name, text = %self.text, throws = actions.len(), "formula parsed");
        Ok(actions)
    }
}

fn to_i64(n: u64) -> Result<i64> {
    i64::try_from(n).map_err(|_| Error::InvalidFormula(format!("{} is out of range", n)))
}

/// Sum of the integer results of throw actions
pub fn total(actions: &[Arc<Action>]) -> Result<i64> {
    actions
        .iter()
        .filter_map(|action| action.post_payload().as_int())
        .try_fold(0i64, |sum, n| {
            sum.checked_add(n)
                .ok_or_else(|| Error::InvalidFormula("total is out of range".to_string()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_dice_minus_constant() {
        let mut rng = GameRng::new(5);
        let actions = Formula::new("Test formula", "2d6 - 12").parse(&mut rng).unwrap();

        assert_eq!(actions.len(), 3);
        assert_eq!(actions[2].post_state().payload().as_float(), Some(-12.0));
        let sum = total(&actions).unwrap();
        assert!((-10..=0).contains(&sum));
    }

    #[test]
    fn test_d0_and_d1() {
        let mut rng = GameRng::default();
        let zero = Formula::new("Zero", "d0").parse(&mut rng).unwrap();
        assert_eq!(zero.len(), 1);
        assert_eq!(total(&zero).unwrap(), 0);

        let one = Formula::new("One", "d1").parse(&mut rng).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(total(&one).unwrap(), 1);
    }

    #[test]
    fn test_negative_faces_lex_as_subtraction() {
        let mut rng = GameRng::default();
        let actions = Formula::new("Minus 5", "d-5").parse(&mut rng).unwrap();
        assert_eq!(total(&actions).unwrap(), -5);
    }

    #[test]
    fn test_complicated_formula() {
        let mut rng = GameRng::default();
        let actions = Formula::new("Complicated", "90d0 - d1 + 3-4d1")
            .parse(&mut rng)
            .unwrap();
        assert_eq!(actions.len(), 90 + 1 + 1 + 4);
        assert_eq!(total(&actions).unwrap(), -2);
    }

    #[test]
    fn test_out_of_range_faces() {
        let formula = Formula::new("Huge", "d18446744073709551615");
        assert!(matches!(formula.throws(), Err(Error::InvalidFormula(_))));
    }

    #[test]
    fn test_overflowing_total() {
        let mut rng = GameRng::default();
        let formula = Formula::new("Big", "9223372036854775807 + 1");
        assert!(matches!(formula.parse(&mut rng), Err(Error::InvalidFormula(_))));

        let formula = Formula::new("Small", "-9223372036854775807 - 9223372036854775807");
        assert!(matches!(formula.parse(&mut rng), Err(Error::InvalidFormula(_))));
    }

    #[test]
    fn test_too_many_dice() {
        let formula = Formula::new("Swarm", "4294967295d6");
        assert!(matches!(formula.throws(), Err(Error::InvalidFormula(_))));

        let formula = Formula::new("Split", "600d6 + 600d6");
        assert!(matches!(formula.throws(), Err(Error::InvalidFormula(_))));

        let formula = Formula::new("Limit", format!("{}d1", MAX_DICE));
        assert_eq!(formula.throws().unwrap().len() as u64, MAX_DICE);
    }
}
