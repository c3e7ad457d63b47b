//! Dynamic payload carried by a [`Value`](crate::Value)

use crate::identity::ValueId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The data held by a value: a hit point total, a name, a character sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Payload {
    /// No data
    #[default]
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer (hit points, ability scores, dice results)
    Int(i64),
    /// Floating point (durations, fractional modifiers)
    Float(f64),
    /// Free text
    String(String),
    /// Reference to another value
    EntityRef(ValueId),
    /// List of payloads
    List(Vec<Payload>),
    /// Named fields, e.g. a character sheet
    Map(PayloadMap),
}

/// Named payload fields
///
/// Uses IndexMap so field order is stable across saves
pub type PayloadMap = IndexMap<String, Payload>;

impl Payload {
    /// Check if this payload is null
    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    /// Try to get this payload as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Payload::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this payload as an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Payload::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this payload as a float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Payload::Float(f) => Some(*f),
            Payload::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this payload as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this payload as a value reference
    pub fn as_entity_ref(&self) -> Option<ValueId> {
        match self {
            Payload::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get this payload as a list
    pub fn as_list(&self) -> Option<&[Payload]> {
        match self {
            Payload::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get this payload as a map
    pub fn as_map(&self) -> Option<&PayloadMap> {
        match self {
            Payload::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a field of a map payload
    pub fn field(&self, key: &str) -> Option<&Payload> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Get the type name of this payload
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Null => "null",
            Payload::Bool(_) => "bool",
            Payload::Int(_) => "int",
            Payload::Float(_) => "float",
            Payload::String(_) => "string",
            Payload::EntityRef(_) => "entity_ref",
            Payload::List(_) => "list",
            Payload::Map(_) => "map",
        }
    }

    /// Check if this payload is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Payload::Null => false,
            Payload::Bool(b) => *b,
            Payload::Int(i) => *i != 0,
            Payload::Float(f) => *f != 0.0,
            Payload::String(s) => !s.is_empty(),
            Payload::EntityRef(_) => true,
            Payload::List(list) => !list.is_empty(),
            Payload::Map(map) => !map.is_empty(),
        }
    }

    /// Text used by full text search: strings unquoted, everything else displayed
    pub fn search_text(&self) -> String {
        match self {
            Payload::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => write!(f, "null"),
            Payload::Bool(b) => write!(f, "{}", b),
            Payload::Int(i) => write!(f, "{}", i),
            Payload::Float(fl) => write!(f, "{}", fl),
            Payload::String(s) => write!(f, "\"{}\"", s),
            Payload::EntityRef(id) => write!(f, "{}", id),
            Payload::List(list) => {
                write!(f, "[")?;
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Payload::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Bool(b)
    }
}

impl From<i64> for Payload {
    fn from(i: i64) -> Self {
        Payload::Int(i)
    }
}

impl From<i32> for Payload {
    fn from(i: i32) -> Self {
        Payload::Int(i as i64)
    }
}

impl From<f64> for Payload {
    fn from(f: f64) -> Self {
        Payload::Float(f)
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::String(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::String(s.to_string())
    }
}

impl From<ValueId> for Payload {
    fn from(id: ValueId) -> Self {
        Payload::EntityRef(id)
    }
}

impl From<PayloadMap> for Payload {
    fn from(map: PayloadMap) -> Self {
        Payload::Map(map)
    }
}

impl<T: Into<Payload>> From<Vec<T>> for Payload {
    fn from(vec: Vec<T>) -> Self {
        Payload::List(vec.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_types() {
        assert!(Payload::Null.is_null());
        assert_eq!(Payload::Bool(true).as_bool(), Some(true));
        assert_eq!(Payload::Int(42).as_int(), Some(42));
        assert_eq!(Payload::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Payload::Int(42).as_float(), Some(42.0));
        assert_eq!(Payload::String("orc".into()).as_str(), Some("orc"));
    }

    #[test]
    fn test_payload_truthiness() {
        assert!(!Payload::Null.is_truthy());
        assert!(!Payload::Int(0).is_truthy());
        assert!(Payload::Int(1).is_truthy());
        assert!(!Payload::String("".into()).is_truthy());
    }

    #[test]
    fn test_field_lookup() {
        let mut sheet = PayloadMap::new();
        sheet.insert("strength".into(), 14.into());
        let payload = Payload::from(sheet);

        assert_eq!(payload.field("strength"), Some(&Payload::Int(14)));
        assert_eq!(payload.field("wisdom"), None);
        assert_eq!(Payload::Int(3).field("strength"), None);
    }

    #[test]
    fn test_search_text() {
        assert_eq!(Payload::from("12 goblins").search_text(), "12 goblins");
        assert_eq!(Payload::Int(12).search_text(), "12");
        assert_eq!(Payload::from(vec![1i64, 2]).search_text(), "[1, 2]");
    }
}
