//! Game ledger
//!
//! A [`Game`] is one global, ordered action log over many entities, the
//! current snapshot of each entity, and the shared [`Timer`]. Cancelling an
//! action never edits the log in place: a fresh game is rebuilt by replaying
//! everything else.

use crate::{Action, ActionId, Character, Effect, Timer, Value, ValueId};
use indexmap::IndexMap;
use std::sync::Arc;

/// Game configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub name: String,
    pub timer_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Noname game".to_string(),
            timer_name: "Game timer".to_string(),
        }
    }
}

/// Ledger of every committed action plus derived entity state
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub(crate) name: String,
    pub(crate) log: Vec<Arc<Action>>,
    pub(crate) entities: IndexMap<ValueId, Value>,
    pub(crate) timer: Timer,
}

impl Game {
    /// Create an empty game with default configuration
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Create an empty game with custom configuration
    pub fn with_config(config: GameConfig) -> Self {
        Self {
            name: config.name,
            log: Vec::new(),
            entities: IndexMap::new(),
            timer: Timer::new(config.timer_name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Committed actions, oldest first
    pub fn actions(&self) -> &[Arc<Action>] {
        &self.log
    }

    pub fn last_action(&self) -> Option<&Arc<Action>> {
        self.log.last()
    }

    /// Current snapshot of an entity
    pub fn entity(&self, id: ValueId) -> Option<&Value> {
        self.entities.get(&id)
    }

    /// Current entity snapshots in creation order
    pub fn entities(&self) -> impl Iterator<Item = &Value> {
        self.entities.values()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Commit an action
    ///
    /// A mutation of an entity the game does not hold is ignored. Actions
    /// with a duration advance the timer.
    pub fn make_action(&self, action: &Arc<Action>) -> Game {
        let mut next = self.clone();
        next.commit(action);
        next
    }

    fn commit(&mut self, action: &Arc<Action>) -> bool {
        let target = action.target();
        if !action.is_creation() && !self.entities.contains_key(&target) {
            tracing::debug!(action = %action.id(), entity = %target, "mutation of absent entity ignored");
            return false;
        }

        self.entities.insert(target, action.post_state());
        self.log.push(Arc::clone(action));
        if action.duration() != 0.0 {
            self.timer = self.timer.tick(action.duration()).0;
        }
        tracing::trace!(action = %action.id(), entity = %target, "committed");
        true
    }

    /// Cancel an action and rebuild the game without it
    ///
    /// Cancelling a creation also drops every later action on the created
    /// entity. Unknown ids leave the game as it is.
    pub fn cancel_action(&self, id: ActionId) -> Game {
        let Some(target) = self.log.iter().find(|action| action.id() == id) else {
            tracing::debug!(action = %id, "cancel of unknown action ignored");
            return self.clone();
        };
        let ignored = target.is_creation().then(|| target.target());

        let mut rebuilt = Game {
            name: self.name.clone(),
            log: Vec::new(),
            entities: IndexMap::new(),
            timer: self.timer.reseeded(),
        };
        for action in &self.log {
            let depends_on_ignored = ignored.is_some()
                && action.pre_state().map(Value::id) == ignored;
            if action.id() == id || depends_on_ignored {
                continue;
            }
            rebuilt.commit(action);
        }

        tracing::debug!(
            action = %id,
            removed = self.log.len() - rebuilt.log.len(),
            "action cancelled"
        );
        rebuilt
    }

    /// Cancel the most recent action
    pub fn cancel_last_action(&self) -> Game {
        match self.last_action() {
            Some(action) => self.cancel_action(action.id()),
            None => self.clone(),
        }
    }

    /// Cancel the action at a zero-based position in the log
    pub fn cancel_action_by_number(&self, number: usize) -> Game {
        match self.log.get(number) {
            Some(action) => self.cancel_action(action.id()),
            None => {
                tracing::debug!(number, len = self.log.len(), "cancel beyond log ignored");
                self.clone()
            }
        }
    }

    /// Entities whose name, descriptions or payload contain `text`
    pub fn full_text_search(&self, text: &str) -> IndexMap<ValueId, Value> {
        self.entities
            .iter()
            .filter(|(_, value)| value.matches(text))
            .map(|(id, value)| (*id, value.clone()))
            .collect()
    }

    /// Create a character entity with default abilities
    pub fn add_character(&self, name: impl Into<String>) -> Game {
        self.make_action(&Character::create_action(name))
    }

    /// Subscribe an applied effect to the game timer
    pub fn subscribe_effect(&self, effect: &Effect) -> Game {
        Game {
            timer: self.timer.subscribe(effect.clone()),
            ..self.clone()
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
