//! Recorded state transitions
//!
//! An [`Action`] holds the snapshot before a change, the snapshot after it,
//! and the transforms that move between the two. The post-state is stored
//! without the action itself in its log; [`Action::post_state`] re-attaches
//! it, so nothing has to be self-referential in memory.

use crate::{ActionId, Payload, Transform, Value, ValueId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub(crate) const NO_SHORT_DESCRIPTION: &str = "No short description";
pub(crate) const NO_FULL_DESCRIPTION: &str = "No full description";

/// Who may see an action in a ledger view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Visibility {
    /// Everyone at the table
    #[default]
    Visible,
    /// Nobody; bookkeeping only
    Hidden,
    /// The game master only
    GameMaster,
}

/// Labels for a change: name, descriptions, visibility and the game time it takes
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub name: String,
    pub short_description: String,
    pub full_description: String,
    pub visibility: Visibility,
    /// Seconds of game time committing this change takes
    pub duration: f64,
}

impl Change {
    /// Create a template with a name and default descriptions
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the short description
    pub fn short(mut self, text: impl Into<String>) -> Self {
        self.short_description = text.into();
        self
    }

    /// Set the full description
    pub fn full(mut self, text: impl Into<String>) -> Self {
        self.full_description = text.into();
        self
    }

    /// Set the visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the duration in seconds
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Copy the labels of a recorded action
    pub fn from_action(action: &Action) -> Self {
        Self {
            name: action.name.clone(),
            short_description: action.short_description.clone(),
            full_description: action.full_description.clone(),
            visibility: action.visibility,
            duration: action.duration,
        }
    }
}

impl Default for Change {
    fn default() -> Self {
        Self {
            name: "Change".to_string(),
            short_description: NO_SHORT_DESCRIPTION.to_string(),
            full_description: NO_FULL_DESCRIPTION.to_string(),
            visibility: Visibility::Visible,
            duration: 0.0,
        }
    }
}

/// One recorded state transition
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub(crate) id: ActionId,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) name: String,
    pub(crate) pre: Option<Value>,
    pub(crate) post: Value,
    /// Whether `post_state` carries this action at the end of its log
    pub(crate) appended: bool,
    pub(crate) forward: Transform,
    pub(crate) rollback: Transform,
    pub(crate) short_description: String,
    pub(crate) full_description: String,
    pub(crate) visibility: Visibility,
    pub(crate) duration: f64,
}

impl Action {
    /// Record the creation of a brand-new entity
    pub fn create(value: Value) -> Arc<Action> {
        Self::create_with(value, &Change::named("Create"))
    }

    /// Record the creation of a brand-new entity with custom labels
    pub fn create_with(value: Value, template: &Change) -> Arc<Action> {
        Arc::new(Action {
            id: ActionId::new(),
            timestamp: Utc::now(),
            name: template.name.clone(),
            pre: None,
            rollback: Transform::Identity,
            post: value,
            appended: false,
            forward: Transform::Identity,
            short_description: template.short_description.clone(),
            full_description: template.full_description.clone(),
            visibility: template.visibility,
            duration: template.duration,
        })
    }

    pub(crate) fn record(
        pre: &Value,
        post: Value,
        forward: Transform,
        rollback: Transform,
        template: &Change,
    ) -> Action {
        Action {
            id: ActionId::new(),
            timestamp: Utc::now(),
            name: template.name.clone(),
            pre: Some(pre.clone()),
            post,
            appended: true,
            forward,
            rollback,
            short_description: template.short_description.clone(),
            full_description: template.full_description.clone(),
            visibility: template.visibility,
            duration: template.duration,
        }
    }

    /// Get the identity
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Get the creation time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Get the name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value before the change, `None` for a creation
    pub fn pre_state(&self) -> Option<&Value> {
        self.pre.as_ref()
    }

    /// Get the value after the change, including this action in its log
    pub fn post_state(self: &Arc<Self>) -> Value {
        let mut value = self.post.clone();
        if self.appended {
            value.log.push(Arc::clone(self));
        }
        value
    }

    /// Get the payload the action leaves behind
    pub fn post_payload(&self) -> &Payload {
        &self.post.payload
    }

    /// Get the identity of the value this action produces
    pub fn target(&self) -> ValueId {
        self.post.id
    }

    /// Check whether this action creates a new entity
    pub fn is_creation(&self) -> bool {
        self.pre.is_none()
    }

    /// Get the forward transform
    pub fn forward(&self) -> &Transform {
        &self.forward
    }

    /// Get the rollback transform
    pub fn rollback(&self) -> &Transform {
        &self.rollback
    }

    /// Get the short description
    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// Get the full description
    pub fn full_description(&self) -> &str {
        &self.full_description
    }

    /// Get the visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Get the game time this action takes, in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_action() {
        let value = Value::new("goblin", 7);
        let action = Action::create(value.clone());

        assert!(action.is_creation());
        assert_eq!(action.target(), value.id());
        assert_eq!(action.post_state(), value);
        assert_eq!(action.short_description(), NO_SHORT_DESCRIPTION);
    }

    #[test]
    fn test_post_state_carries_action() {
        let value = Value::new("hp", 10);
        let (changed, action) = value.change(Some(Transform::add(1.0)), None);

        let post = action.post_state();
        assert_eq!(post, changed);
        assert!(Arc::ptr_eq(post.log().last().unwrap(), &action));
        assert_eq!(action.pre_state(), Some(&value));
    }

    #[test]
    fn test_change_template() {
        let template = Change::named("Poison")
            .short("poisoned")
            .full("Bitten by a spider")
            .visibility(Visibility::GameMaster)
            .duration(6.0);

        let value = Value::new("hp", 10);
        let (_, action) = value.change_described(Some(Transform::sub(2.0)), None, &template);
        assert_eq!(action.name(), "Poison");
        assert_eq!(action.visibility(), Visibility::GameMaster);
        assert_eq!(action.duration(), 6.0);
        assert_eq!(Change::from_action(&action), template);
    }
}
