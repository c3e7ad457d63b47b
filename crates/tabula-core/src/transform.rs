//! Forward and rollback transforms
//!
//! A transform describes how one value snapshot becomes the next. Most
//! variants rewrite the payload and leave the action log untouched;
//! [`Transform::Restore`] hands back a captured snapshot whole and is what
//! every change uses as its default rollback.

use crate::{Payload, PayloadMap, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An operation to modify a numeric payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifyOp {
    /// Set to the operand
    Set,
    /// Add the operand
    Add,
    /// Subtract the operand
    Sub,
    /// Multiply by the operand
    Mul,
    /// Divide by the operand
    Div,
    /// Set to minimum of current and operand
    Min,
    /// Set to maximum of current and operand
    Max,
}

impl ModifyOp {
    /// Apply this operation to a current value
    pub fn apply(&self, current: f64, operand: f64) -> f64 {
        match self {
            ModifyOp::Set => operand,
            ModifyOp::Add => current + operand,
            ModifyOp::Sub => current - operand,
            ModifyOp::Mul => current * operand,
            ModifyOp::Div => {
                if operand != 0.0 {
                    current / operand
                } else {
                    current
                }
            }
            ModifyOp::Min => current.min(operand),
            ModifyOp::Max => current.max(operand),
        }
    }

    /// Apply to a payload. Integers stay integers while the result is integral.
    ///
    /// Returns `None` for non-numeric payloads.
    pub fn apply_payload(&self, payload: &Payload, operand: f64) -> Option<Payload> {
        match payload {
            Payload::Int(current) => {
                let result = self.apply(*current as f64, operand);
                if result.fract() == 0.0 && result.abs() < i64::MAX as f64 {
                    Some(Payload::Int(result as i64))
                } else {
                    Some(Payload::Float(result))
                }
            }
            Payload::Float(current) => Some(Payload::Float(self.apply(*current, operand))),
            _ => None,
        }
    }
}

/// Signature of an in-memory payload function
pub type PayloadFn = dyn Fn(&Payload) -> Payload + Send + Sync;

/// A named closure over payloads
///
/// Lives only in memory: games holding one cannot be archived.
#[derive(Clone)]
pub struct CustomTransform {
    name: String,
    func: Arc<PayloadFn>,
}

impl CustomTransform {
    /// Wrap a closure under a descriptive name
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Payload) -> Payload + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The descriptive name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the closure
    pub fn call(&self, payload: &Payload) -> Payload {
        (self.func)(payload)
    }
}

impl fmt::Debug for CustomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTransform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomTransform {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && std::ptr::addr_eq(Arc::as_ptr(&self.func), Arc::as_ptr(&other.func))
    }
}

/// How a value snapshot is turned into the next one
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Transform {
    /// Leave the value as it is
    #[default]
    Identity,
    /// Replace the payload with a constant
    Set(Payload),
    /// Numeric delta on the payload
    Modify { op: ModifyOp, operand: f64 },
    /// Set one existing field of a map payload; unknown fields are ignored
    SetField { field: String, value: Payload },
    /// Set several existing fields of a map payload
    SetFields(PayloadMap),
    /// Return the captured snapshot verbatim, log included
    Restore(Box<Value>),
    /// Apply transforms in order
    Sequence(Vec<Transform>),
    /// In-memory closure
    Custom(CustomTransform),
}

impl Transform {
    /// Create a constant-set transform
    pub fn set(payload: impl Into<Payload>) -> Self {
        Transform::Set(payload.into())
    }

    /// Create an add transform
    pub fn add(operand: f64) -> Self {
        Transform::Modify {
            op: ModifyOp::Add,
            operand,
        }
    }

    /// Create a subtract transform
    pub fn sub(operand: f64) -> Self {
        Transform::Modify {
            op: ModifyOp::Sub,
            operand,
        }
    }

    /// Create a multiply transform
    pub fn multiply(operand: f64) -> Self {
        Transform::Modify {
            op: ModifyOp::Mul,
            operand,
        }
    }

    /// Create a single field update
    pub fn set_field(field: impl Into<String>, value: impl Into<Payload>) -> Self {
        Transform::SetField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a snapshot restore
    pub fn restore(snapshot: Value) -> Self {
        Transform::Restore(Box::new(snapshot))
    }

    /// Create a custom transform from a closure
    pub fn custom(
        name: impl Into<String>,
        func: impl Fn(&Payload) -> Payload + Send + Sync + 'static,
    ) -> Self {
        Transform::Custom(CustomTransform::new(name, func))
    }

    /// Check whether this is a snapshot restore
    pub fn is_restore(&self) -> bool {
        matches!(self, Transform::Restore(_))
    }

    /// Apply this transform to a value snapshot
    pub fn apply(&self, value: &Value) -> Value {
        match self {
            Transform::Restore(snapshot) => (**snapshot).clone(),
            Transform::Sequence(steps) => steps
                .iter()
                .fold(value.clone(), |current, step| step.apply(&current)),
            other => value.with_payload(other.apply_payload(value.payload())),
        }
    }

    fn apply_payload(&self, payload: &Payload) -> Payload {
        match self {
            Transform::Identity => payload.clone(),
            Transform::Set(new) => new.clone(),
            Transform::Modify { op, operand } => {
                op.apply_payload(payload, *operand).unwrap_or_else(|| {
                    tracing::warn!(
                        payload_type = payload.type_name(),
                        ?op,
                        "numeric modify on non-numeric payload, leaving it unchanged"
                    );
                    payload.clone()
                })
            }
            Transform::SetField { field, value } => set_fields(payload, [(field, value)]),
            Transform::SetFields(fields) => set_fields(payload, fields.iter()),
            Transform::Custom(custom) => custom.call(payload),
            Transform::Restore(snapshot) => snapshot.payload().clone(),
            Transform::Sequence(steps) => steps
                .iter()
                .fold(payload.clone(), |current, step| step.apply_payload(&current)),
        }
    }
}

fn set_fields<'a>(
    payload: &Payload,
    fields: impl IntoIterator<Item = (&'a String, &'a Payload)>,
) -> Payload {
    let Payload::Map(map) = payload else {
        tracing::debug!(
            payload_type = payload.type_name(),
            "field update on non-map payload ignored"
        );
        return payload.clone();
    };

    let mut map = map.clone();
    for (field, value) in fields {
        match map.get_mut(field) {
            Some(slot) => *slot = value.clone(),
            None => tracing::debug!(field = %field, "unknown field ignored"),
        }
    }
    Payload::Map(map)
}
