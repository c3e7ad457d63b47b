//! Immutable values and their action logs
//!
//! A [`Value`] is never mutated in place. Every change produces a new
//! snapshot with the same identity and a log extended by one [`Action`];
//! rolling back produces yet another snapshot.

use crate::action::{NO_FULL_DESCRIPTION, NO_SHORT_DESCRIPTION};
use crate::{Action, ActionId, Change, Payload, Transform, ValueId};
use std::sync::Arc;

/// A named snapshot of one entity's data plus its change history
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub(crate) id: ValueId,
    pub(crate) name: String,
    pub(crate) payload: Payload,
    pub(crate) short_description: String,
    pub(crate) full_description: String,
    pub(crate) log: Vec<Arc<Action>>,
}

impl Value {
    /// Create a value with a fresh identity and an empty log
    pub fn new(name: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            id: ValueId::new(),
            name: name.into(),
            payload: payload.into(),
            short_description: NO_SHORT_DESCRIPTION.to_string(),
            full_description: NO_FULL_DESCRIPTION.to_string(),
            log: Vec::new(),
        }
    }

    /// Set both descriptions (builder pattern)
    pub fn with_descriptions(
        mut self,
        short_description: impl Into<String>,
        full_description: impl Into<String>,
    ) -> Self {
        self.short_description = short_description.into();
        self.full_description = full_description.into();
        self
    }

    /// Same identity and log, different payload
    pub fn with_payload(&self, payload: Payload) -> Self {
        Self {
            payload,
            ..self.clone()
        }
    }

    /// Identity shared by every snapshot of this value
    pub fn id(&self) -> ValueId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current data
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// One-line description
    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// Long-form description
    pub fn full_description(&self) -> &str {
        &self.full_description
    }

    /// Actions applied to this value, oldest first
    pub fn log(&self) -> &[Arc<Action>] {
        &self.log
    }

    /// Get the most recent action
    pub fn last_action(&self) -> Option<&Arc<Action>> {
        self.log.last()
    }

    /// Find an action in the log by identity
    pub fn find_action(&self, id: ActionId) -> Option<&Arc<Action>> {
        self.log.iter().find(|action| action.id == id)
    }

    /// Payloads this value has held after each logged action, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Payload> {
        self.log.iter().map(|action| &action.post.payload)
    }

    /// Check whether the name, a description or the payload contains `text`
    pub fn matches(&self, text: &str) -> bool {
        self.name.contains(text)
            || self.short_description.contains(text)
            || self.full_description.contains(text)
            || self.payload.search_text().contains(text)
    }

    /// Apply a forward transform and record it
    ///
    /// Without `forward` the returned value is `self` and the action is a
    /// bare marker that is not logged. Without `rollback` the action restores
    /// this exact snapshot when rolled back.
    pub fn change(
        &self,
        forward: Option<Transform>,
        rollback: Option<Transform>,
    ) -> (Value, Arc<Action>) {
        self.change_described(forward, rollback, &Change::default())
    }

    /// Like [`change`](Self::change), labelling the action from a template
    pub fn change_described(
        &self,
        forward: Option<Transform>,
        rollback: Option<Transform>,
        template: &Change,
    ) -> (Value, Arc<Action>) {
        let Some(forward) = forward else {
            let mut action = Action::record(
                self,
                self.clone(),
                Transform::Identity,
                rollback.unwrap_or(Transform::Identity),
                template,
            );
            action.appended = false;
            return (self.clone(), Arc::new(action));
        };

        let action = Arc::new(self.transition(forward, rollback, template));
        (action.post_state(), action)
    }

    /// Append a descriptive action that leaves the payload untouched
    pub fn mark(&self, template: &Change) -> (Value, Arc<Action>) {
        let action = Arc::new(self.transition(Transform::Identity, None, template));
        (action.post_state(), action)
    }

    fn transition(
        &self,
        forward: Transform,
        rollback: Option<Transform>,
        template: &Change,
    ) -> Action {
        let post = self.with_payload(forward.apply(self).payload);
        let rollback = rollback.unwrap_or_else(|| Transform::restore(self.clone()));
        tracing::trace!(value = %self.id, action = %template.name, "change");
        Action::record(self, post, forward, rollback, template)
    }

    /// Undo the most recent action
    ///
    /// An empty log leaves the value as it is.
    pub fn rollback(&self) -> Value {
        match self.log.len().checked_sub(1) {
            Some(position) => self.undo(position),
            None => {
                tracing::debug!(value = %self.id, "rollback on empty log ignored");
                self.clone()
            }
        }
    }

    /// Retract one action and replay everything logged after it
    ///
    /// Each later action is re-applied with its own forward transform and
    /// keeps its identity, labels and timestamp. Unknown ids leave the value
    /// as it is.
    pub fn rollback_action(&self, id: ActionId) -> Value {
        let Some(position) = self.log.iter().position(|action| action.id == id) else {
            tracing::debug!(value = %self.id, action = %id, "rollback of unknown action ignored");
            return self.clone();
        };

        let base = self.undo(position);
        self.log[position + 1..]
            .iter()
            .fold(base, |current, action| current.replay(action))
    }

    // The rollback sees the action's own post-state, cut back to the log
    // that preceded it
    fn undo(&self, position: usize) -> Value {
        let action = &self.log[position];
        let mut state = self.with_payload(action.post_payload().clone());
        state.log.truncate(position);
        action.rollback.apply(&state)
    }

    fn replay(&self, action: &Action) -> Value {
        // A snapshot restore would point at the pre-retraction history
        let rollback = (!action.rollback.is_restore()).then(|| action.rollback.clone());
        let mut replayed =
            self.transition(action.forward.clone(), rollback, &Change::from_action(action));
        replayed.id = action.id;
        replayed.timestamp = action.timestamp;
        tracing::trace!(value = %self.id, action = %action.id, "replay");
        Arc::new(replayed).post_state()
    }
}
