//! Character sheets stored as map payloads

use crate::{Action, Change, Payload, PayloadMap, Transform, Value};
use std::sync::Arc;

/// Ability scores of a player or monster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub strength: i64,
    pub dexterity: i64,
    pub constitution: i64,
    pub intelligence: i64,
    pub wisdom: i64,
    pub charisma: i64,
}

impl Character {
    /// Create a character with every ability at zero
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strength: 0,
            dexterity: 0,
            constitution: 0,
            intelligence: 0,
            wisdom: 0,
            charisma: 0,
        }
    }

    /// Encode as a map payload
    pub fn to_payload(&self) -> Payload {
        let mut map = PayloadMap::new();
        map.insert("name".into(), self.name.as_str().into());
        for (field, score) in self.abilities() {
            map.insert(field.into(), score.into());
        }
        Payload::Map(map)
    }

    /// Decode from a map payload; missing abilities read as zero
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        let map = payload.as_map()?;
        let name = map.get("name")?.as_str()?.to_string();
        let score = |field: &str| map.get(field).and_then(Payload::as_int).unwrap_or(0);
        Some(Self {
            strength: score("strength"),
            dexterity: score("dexterity"),
            constitution: score("constitution"),
            intelligence: score("intelligence"),
            wisdom: score("wisdom"),
            charisma: score("charisma"),
            name,
        })
    }

    fn abilities(&self) -> [(&'static str, i64); 6] {
        [
            ("strength", self.strength),
            ("dexterity", self.dexterity),
            ("constitution", self.constitution),
            ("intelligence", self.intelligence),
            ("wisdom", self.wisdom),
            ("charisma", self.charisma),
        ]
    }

    /// Wrap this sheet in a fresh value named after the character
    pub fn to_value(&self) -> Value {
        Value::new(self.name.clone(), self.to_payload())
    }

    /// Creation action for a new character with default abilities
    pub fn create_action(name: impl Into<String>) -> Arc<Action> {
        Self::new(name).into_action()
    }

    /// Creation action for this sheet
    pub fn into_action(self) -> Arc<Action> {
        let template = Change::named(format!("Create character {}", self.name))
            .short(format!("Character {} joins the game", self.name));
        Action::create_with(self.to_value(), &template)
    }

    /// Mutation action setting one field; unknown fields are ignored
    pub fn change_field_action(
        container: &Value,
        field: &str,
        value: impl Into<Payload>,
    ) -> Arc<Action> {
        let template = Change::named(format!("Change {} of {}", field, container.name()));
        container
            .change_described(Some(Transform::set_field(field, value)), None, &template)
            .1
    }

    /// Mutation action setting several fields at once
    pub fn change_fields_action(container: &Value, fields: PayloadMap) -> Arc<Action> {
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        let template = Change::named(format!(
            "Change {} of {}",
            names.join(", "),
            container.name()
        ));
        container
            .change_described(Some(Transform::SetFields(fields)), None, &template)
            .1
    }
}
