//! Rolls: a formula thrown for a purpose

use crate::formula::total;
use crate::{Formula, GameRng, Result};
use std::sync::Arc;
use tabula_core::{Action, Change, Value};

/// A thrown formula with its individual dice
#[derive(Debug, Clone, PartialEq)]
pub struct Roll {
    pub name: String,
    pub formula: Formula,
    /// What the roll is for, e.g. `attack`
    pub kind: String,
    /// Creation action holding the total
    pub main_action: Arc<Action>,
    /// One action per die or constant
    pub dependent_actions: Vec<Arc<Action>>,
}

impl Roll {
    /// Throw a formula
    pub fn new(
        name: impl Into<String>,
        formula: Formula,
        kind: impl Into<String>,
        rng: &mut GameRng,
    ) -> Result<Self> {
        let name = name.into();
        let dependent_actions = formula.parse(rng)?;
        let sum = total(&dependent_actions)?;
        let main_action = Action::create_with(
            Value::new(name.clone(), sum),
            &Change::named(format!("Main action for {}", name))
                .short(format!("{} = {}", formula.text, sum)),
        );

        Ok(Self {
            name,
            formula,
            kind: kind.into(),
            main_action,
            dependent_actions,
        })
    }

    /// Sum of every die and constant
    pub fn value(&self) -> i64 {
        self.main_action.post_payload().as_int().unwrap_or_default()
    }
}

/// An attack described by its damage formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attack {
    pub name: String,
    pub formula: Formula,
}

impl Attack {
    pub fn new(name: impl Into<String>, formula: Formula) -> Self {
        Self {
            name: name.into(),
            formula,
        }
    }

    /// Roll the attack's formula
    pub fn roll(&self, rng: &mut GameRng) -> Result<Roll> {
        Roll::new(
            format!("Roll for attack \"{}\"", self.name),
            self.formula.clone(),
            "attack",
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::Payload;

    #[test]
    fn test_roll_value() {
        let mut rng = GameRng::new(11);
        let roll = Roll::new("Fireball", Formula::new("Fireball", "8d6"), "damage", &mut rng).unwrap();

        assert_eq!(roll.dependent_actions.len(), 8);
        assert!((8..=48).contains(&roll.value()));
        assert_eq!(
            roll.main_action.post_state().payload(),
            &Payload::Int(roll.value())
        );
    }

    #[test]
    fn test_attack_roll() {
        let mut rng = GameRng::new(11);
        let attack = Attack::new("Longsword", Formula::new("Longsword", "d8 + 3"));
        let roll = attack.roll(&mut rng).unwrap();

        assert_eq!(roll.kind, "attack");
        assert_eq!(roll.name, "Roll for attack \"Longsword\"");
        assert!((4..=11).contains(&roll.value()));
    }

    #[test]
    fn test_roll_rejects_overflowing_formula() {
        let mut rng = GameRng::new(11);
        let formula = Formula::new("Big", "9223372036854775807 + d6");
        assert!(matches!(
            Roll::new("Big", formula, "damage", &mut rng),
            Err(crate::Error::InvalidFormula(_))
        ));
    }
}
