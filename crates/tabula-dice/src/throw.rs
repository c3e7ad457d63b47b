//! Single dice throws

use crate::{Error, GameRng, Result};
use std::sync::Arc;
use tabula_core::{Action, Change, Value};

/// One die, or one constant, ready to be thrown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceThrow {
    pub name: String,
    pub min: i64,
    pub max: i64,
    /// Negate the result
    pub negative: bool,
}

impl DiceThrow {
    /// Create a die with faces `1..=max`
    ///
    /// A zero-faced die always shows 0; negative faces are rejected.
    pub fn new(name: impl Into<String>, max: i64) -> Result<Self> {
        let name = name.into();
        if max < 0 {
            return Err(Error::InvalidFormula(format!(
                "die `{}` has negative maximum {}",
                name, max
            )));
        }
        Ok(Self {
            name,
            min: max.min(1),
            max,
            negative: false,
        })
    }

    /// Create a throw that always shows `value`
    pub fn constant(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            min: value,
            max: value,
            negative: false,
        }
    }

    /// Set whether the result is negated (builder pattern)
    pub fn negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    /// Check whether every throw gives the same result
    pub fn is_constant(&self) -> bool {
        self.min == self.max
    }

    /// Roll the die, recording the result as a creation action
    pub fn throw(&self, rng: &mut GameRng) -> Arc<Action> {
        let rolled = if self.is_constant() {
            self.min
        } else {
            rng.range_i64(self.min, self.max)
        };
        let result = if self.negative { -rolled } else { rolled };
        tracing::trace!(throw = %self.name, result, "dice thrown");

        let template = Change::named(format!("Action for DiceThrow \"{}\"", self.name))
            .short(format!("{} rolled {}", self.name, result));
        Action::create_with(Value::new(self.name.clone(), result), &template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::Payload;

    fn rolled(action: &Arc<Action>) -> i64 {
        action.post_state().payload().as_int().unwrap()
    }

    #[test]
    fn test_d20_throw() {
        let mut rng = GameRng::new(7);
        let die = DiceThrow::new("d20 throw", 20).unwrap();
        for _ in 0..50 {
            let value = rolled(&die.throw(&mut rng));
            assert!((1..=20).contains(&value));
        }
    }

    #[test]
    fn test_constant_throw() {
        let mut rng = GameRng::default();
        let action = DiceThrow::constant("custom throw", 15).throw(&mut rng);
        assert_eq!(action.name(), "Action for DiceThrow \"custom throw\"");
        assert_eq!(action.post_state().payload(), &Payload::Int(15));
        assert!(action.is_creation());
    }

    #[test]
    fn test_negative_throw() {
        let mut rng = GameRng::new(3);
        let die = DiceThrow::new("minus d6", 6).unwrap().negative(true);
        for _ in 0..50 {
            let value = rolled(&die.throw(&mut rng));
            assert!((-6..=-1).contains(&value));
        }
    }

    #[test]
    fn test_degenerate_dice() {
        let mut rng = GameRng::default();
        assert_eq!(rolled(&DiceThrow::new("d0", 0).unwrap().throw(&mut rng)), 0);
        assert_eq!(rolled(&DiceThrow::new("d1", 1).unwrap().throw(&mut rng)), 1);
        assert!(matches!(
            DiceThrow::new("d-5", -5),
            Err(Error::InvalidFormula(_))
        ));
    }

    #[test]
    fn test_same_seed_same_throws() {
        let die = DiceThrow::new("d100", 100).unwrap();
        let mut a = GameRng::new(99);
        let mut b = GameRng::new(99);
        for _ in 0..10 {
            assert_eq!(rolled(&die.throw(&mut a)), rolled(&die.throw(&mut b)));
        }
    }
}
