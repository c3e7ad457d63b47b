//! Duration-bound modifiers
//!
//! An [`Effect`] is a reusable definition (a forward transform, an optional
//! rollback and a duration). Applying it to a value records a marker plus
//! the change and returns a fresh effect record describing that application.
//! Subscribing the record to a [`Timer`](crate::Timer) lets the timer expire it.

use crate::{ActionId, Change, EffectId, Timer, TimerEntry, Transform, Value};

/// The two sides of one effect application
#[derive(Debug, Clone, PartialEq)]
pub struct EffectApplication {
    /// Value the effect's change started from
    pub before: Value,
    /// Value right after the effect's change
    pub after: Value,
    /// Identity of the change action
    pub action: ActionId,
}

/// A temporary modifier: a buff, a curse, a lit torch
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub(crate) id: EffectId,
    pub(crate) name: String,
    pub(crate) forward: Transform,
    pub(crate) rollback: Option<Transform>,
    pub(crate) application: Option<EffectApplication>,
    pub(crate) finished: bool,
    pub(crate) duration: f64,
    pub(crate) short_description: Option<String>,
    pub(crate) full_description: Option<String>,
}

impl Effect {
    /// Create an effect that lasts forever
    pub fn new(name: impl Into<String>, forward: Transform) -> Self {
        Self {
            id: EffectId::new(),
            name: name.into(),
            forward,
            rollback: None,
            application: None,
            finished: false,
            duration: f64::INFINITY,
            short_description: None,
            full_description: None,
        }
    }

    /// Set the duration in seconds (builder pattern)
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Set the transform used to remove the effect
    pub fn with_rollback(mut self, rollback: Transform) -> Self {
        self.rollback = Some(rollback);
        self
    }

    /// Set the descriptions used for applications
    pub fn with_descriptions(
        mut self,
        short_description: impl Into<String>,
        full_description: impl Into<String>,
    ) -> Self {
        self.short_description = Some(short_description.into());
        self.full_description = Some(full_description.into());
        self
    }

    /// Identity, fresh for every application
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transform applied to the target
    pub fn forward(&self) -> &Transform {
        &self.forward
    }

    /// Explicit undo transform, if one was given
    pub fn rollback(&self) -> Option<&Transform> {
        self.rollback.as_ref()
    }

    /// Lifetime in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether a timer has expired this effect
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// One-line description, if set
    pub fn short_description(&self) -> Option<&str> {
        self.short_description.as_deref()
    }

    /// Long-form description, if set
    pub fn full_description(&self) -> Option<&str> {
        self.full_description.as_deref()
    }

    /// The recorded application, if the effect has been applied
    pub fn application(&self) -> Option<&EffectApplication> {
        self.application.as_ref()
    }

    /// The value as this effect leaves it
    ///
    /// The post-change value while running, the pre-change value once
    /// finished, `None` before the first application.
    pub fn current_value(&self) -> Option<&Value> {
        self.application.as_ref().map(|application| {
            if self.finished {
                &application.before
            } else {
                &application.after
            }
        })
    }

    /// Check whether a subscription started at `start_time` has run out
    pub fn expires_by(&self, start_time: f64, seconds_passed: f64) -> bool {
        start_time + self.duration <= seconds_passed
    }

    /// Apply the effect to a value
    ///
    /// Descriptions resolve as the explicit argument, then the effect's own,
    /// then a generated sentence. Returns the changed value and a new effect
    /// record for this application.
    pub fn apply(
        &self,
        value: &Value,
        short_description: Option<&str>,
        full_description: Option<&str>,
    ) -> (Value, Effect) {
        let generated = format!(
            "Value {} changed due to effect {} application",
            value.name(),
            self.name
        );
        let short = short_description
            .map(str::to_string)
            .or_else(|| self.short_description.clone())
            .unwrap_or_else(|| generated.clone());
        let full = full_description
            .map(str::to_string)
            .or_else(|| self.full_description.clone())
            .unwrap_or(generated);

        let (marked, _) = value.mark(
            &Change::named(format!("Effect {} applied", self.name))
                .short(short.clone())
                .full(full.clone()),
        );
        let (after, action) = marked.change_described(
            Some(self.forward.clone()),
            self.rollback.clone(),
            &Change::named(self.name.clone()).short(short.clone()).full(full.clone()),
        );

        let applied = Effect {
            id: EffectId::new(),
            application: Some(EffectApplication {
                before: marked,
                after: after.clone(),
                action: action.id(),
            }),
            finished: false,
            short_description: Some(short),
            full_description: Some(full),
            ..self.clone()
        };
        (after, applied)
    }

    /// Remove the effect from a value as a new forward step
    ///
    /// The removal transform is `rollback` if given, else the effect's own
    /// rollback, else a restore of the value the application started from.
    pub fn unapply(&self, value: &Value, rollback: Option<Transform>) -> Value {
        let text = format!(
            "Value {} changed due to effect {} removal",
            value.name(),
            self.name
        );
        let (marked, _) = value.mark(
            &Change::named(format!("Effect {} removed", self.name))
                .short(text.clone())
                .full(text.clone()),
        );

        let removal = rollback
            .or_else(|| self.rollback.clone())
            .or_else(|| {
                self.application
                    .as_ref()
                    .map(|application| Transform::restore(application.before.clone()))
            })
            .unwrap_or_default();

        marked
            .change_described(
                Some(removal),
                None,
                &Change::named(format!("Remove {}", self.name))
                    .short(text.clone())
                    .full(text),
            )
            .0
    }

    /// Mark the effect finished, returning the timer entry recording it
    pub fn set_finished(&self) -> (Effect, TimerEntry) {
        let finished = Effect {
            finished: true,
            ..self.clone()
        };
        (finished, TimerEntry::EffectFinished { effect: self.id })
    }

    /// Subscribe this effect to a timer at its current time
    pub fn subscribe(&self, timer: &Timer) -> Timer {
        timer.subscribe(self.clone())
    }

    pub(crate) fn reset(&self) -> Effect {
        Effect {
            finished: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payload;

    fn blessing() -> Effect {
        Effect::new("Bless", Transform::add(2.0)).with_duration(20.0)
    }

    #[test]
    fn test_new_effect_defaults() {
        let effect = Effect::new("Rage", Transform::Identity);
        assert!(effect.duration().is_infinite());
        assert!(!effect.is_finished());
        assert!(effect.current_value().is_none());
    }

    #[test]
    fn test_apply_records_marker_and_change() {
        let value = Value::new("strength", 10);
        let (changed, applied) = blessing().apply(&value, None, None);

        assert_eq!(changed.payload(), &Payload::Int(12));
        assert_eq!(changed.log().len(), 2);
        assert_eq!(
            applied.short_description(),
            Some("Value strength changed due to effect Bless application")
        );
        assert_eq!(applied.current_value(), Some(&changed));
        assert_eq!(
            applied.application().unwrap().before.payload(),
            &Payload::Int(10)
        );
    }

    #[test]
    fn test_apply_description_precedence() {
        let value = Value::new("strength", 10);
        let effect = blessing().with_descriptions("blessed", "Blessed by the cleric");

        let (_, own) = effect.apply(&value, None, None);
        assert_eq!(own.short_description(), Some("blessed"));

        let (changed, explicit) = effect.apply(&value, Some("holy"), Some("Holy light"));
        assert_eq!(explicit.full_description(), Some("Holy light"));
        assert_eq!(changed.last_action().unwrap().short_description(), "holy");
    }

    #[test]
    fn test_each_application_is_fresh() {
        let value = Value::new("strength", 10);
        let effect = blessing();
        let (_, first) = effect.apply(&value, None, None);
        let (_, second) = effect.apply(&value, None, None);
        assert_ne!(first.id(), second.id());
        assert_ne!(first.id(), effect.id());
    }

    #[test]
    fn test_unapply_restores_payload() {
        let value = Value::new("strength", 10);
        let (changed, applied) = blessing().apply(&value, None, None);
        let removed = applied.unapply(&changed, None);

        assert_eq!(removed.payload(), &Payload::Int(10));
        assert_eq!(removed.log().len(), 4);
    }

    #[test]
    fn test_unapply_with_rollback() {
        let value = Value::new("strength", 10);
        let (changed, applied) = blessing().apply(&value, None, None);
        let removed = applied.unapply(&changed, Some(Transform::sub(1.0)));
        assert_eq!(removed.payload(), &Payload::Int(11));

        let effect = blessing().with_rollback(Transform::sub(2.0));
        let (changed, applied) = effect.apply(&value, None, None);
        assert_eq!(applied.unapply(&changed, None).payload(), &Payload::Int(10));
    }

    #[test]
    fn test_finished_effect_reads_before() {
        let value = Value::new("strength", 10);
        let (_, applied) = blessing().apply(&value, None, None);
        let (finished, entry) = applied.set_finished();

        assert!(finished.is_finished());
        assert_eq!(finished.current_value().unwrap().payload(), &Payload::Int(10));
        assert_eq!(entry, TimerEntry::EffectFinished { effect: applied.id() });
    }
}
