//! Archived form of a game
//!
//! Values and actions nest inside each other (an action holds its pre- and
//! post-state, a value holds its log, a restore transform holds a snapshot),
//! so a naive serialization repeats the same history many times over. The
//! archive flattens everything into one node table: every action is stored
//! once, and every reference points at an earlier node.

use crate::{
    Action, ActionId, Effect, EffectApplication, EffectId, Error, Game, ModifyOp, Payload,
    PayloadMap, Result, Subscription, Timer, TimerEntry, Transform, Value, ValueId, Visibility,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Current archive layout version
pub const ARCHIVE_VERSION: u32 = 1;

/// A whole game as flat, serializable records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameArchive {
    pub version: u32,
    pub name: String,
    pub nodes: Vec<Node>,
    /// Global log as node indices
    pub log: Vec<usize>,
    /// Entity snapshots as node indices
    pub entities: Vec<usize>,
    pub timer: TimerRecord,
}

/// One entry of the node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Value(ValueRecord),
    Action(ActionRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub id: ValueId,
    pub name: String,
    pub payload: Payload,
    pub short_description: String,
    pub full_description: String,
    pub log: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: ActionId,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub pre: Option<usize>,
    pub post: usize,
    pub appended: bool,
    pub forward: TransformRecord,
    pub rollback: TransformRecord,
    pub short_description: String,
    pub full_description: String,
    pub visibility: Visibility,
    pub duration: f64,
}

/// A transform with snapshots replaced by node indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransformRecord {
    Identity,
    Set(Payload),
    Modify { op: ModifyOp, operand: f64 },
    SetField { field: String, value: Payload },
    SetFields(PayloadMap),
    Restore(usize),
    Sequence(Vec<TransformRecord>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerRecord {
    pub name: String,
    pub ticks: Vec<f64>,
    pub log: Vec<TimerEntry>,
    pub subscriptions: Vec<SubscriptionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub start_time: f64,
    pub effect: EffectRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub id: EffectId,
    pub name: String,
    pub forward: TransformRecord,
    pub rollback: Option<TransformRecord>,
    /// `(before, after, action)` of the recorded application
    pub application: Option<(usize, usize, ActionId)>,
    pub finished: bool,
    pub duration: f64,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
}

#[derive(Default)]
struct Encoder {
    nodes: Vec<Node>,
    actions: HashMap<*const Action, usize>,
}

impl Encoder {
    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn value(&mut self, value: &Value) -> Result<usize> {
        let log = value
            .log
            .iter()
            .map(|action| self.action(action))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.push(Node::Value(ValueRecord {
            id: value.id,
            name: value.name.clone(),
            payload: value.payload.clone(),
            short_description: value.short_description.clone(),
            full_description: value.full_description.clone(),
            log,
        })))
    }

    fn action(&mut self, action: &Arc<Action>) -> Result<usize> {
        let key = Arc::as_ptr(action);
        if let Some(&index) = self.actions.get(&key) {
            return Ok(index);
        }

        let pre = action.pre.as_ref().map(|pre| self.value(pre)).transpose()?;
        let post = self.value(&action.post)?;
        let forward = self.transform(&action.forward)?;
        let rollback = self.transform(&action.rollback)?;
        let index = self.push(Node::Action(ActionRecord {
            id: action.id,
            timestamp: action.timestamp,
            name: action.name.clone(),
            pre,
            post,
            appended: action.appended,
            forward,
            rollback,
            short_description: action.short_description.clone(),
            full_description: action.full_description.clone(),
            visibility: action.visibility,
            duration: action.duration,
        }));
        self.actions.insert(key, index);
        Ok(index)
    }

    fn transform(&mut self, transform: &Transform) -> Result<TransformRecord> {
        Ok(match transform {
            Transform::Identity => TransformRecord::Identity,
            Transform::Set(payload) => TransformRecord::Set(payload.clone()),
            Transform::Modify { op, operand } => TransformRecord::Modify {
                op: *op,
                operand: *operand,
            },
            Transform::SetField { field, value } => TransformRecord::SetField {
                field: field.clone(),
                value: value.clone(),
            },
            Transform::SetFields(fields) => TransformRecord::SetFields(fields.clone()),
            Transform::Restore(snapshot) => TransformRecord::Restore(self.value(snapshot)?),
            Transform::Sequence(steps) => TransformRecord::Sequence(
                steps
                    .iter()
                    .map(|step| self.transform(step))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Transform::Custom(custom) => {
                return Err(Error::UnserializableTransform(custom.name().to_string()))
            }
        })
    }

    fn effect(&mut self, effect: &Effect) -> Result<EffectRecord> {
        let application = match &effect.application {
            Some(application) => Some((
                self.value(&application.before)?,
                self.value(&application.after)?,
                application.action,
            )),
            None => None,
        };
        Ok(EffectRecord {
            id: effect.id,
            name: effect.name.clone(),
            forward: self.transform(&effect.forward)?,
            rollback: effect
                .rollback
                .as_ref()
                .map(|rollback| self.transform(rollback))
                .transpose()?,
            application,
            finished: effect.finished,
            duration: effect.duration,
            short_description: effect.short_description.clone(),
            full_description: effect.full_description.clone(),
        })
    }

    fn timer(&mut self, timer: &Timer) -> Result<TimerRecord> {
        let mut subscriptions = Vec::with_capacity(timer.subscriptions.len());
        for subscription in timer.subscriptions.values() {
            subscriptions.push(SubscriptionRecord {
                start_time: subscription.start_time,
                effect: self.effect(&subscription.effect)?,
            });
        }
        Ok(TimerRecord {
            name: timer.name.clone(),
            ticks: timer.ticks.clone(),
            log: timer.log.clone(),
            subscriptions,
        })
    }
}

enum Decoded {
    Value(Value),
    Action(Arc<Action>),
}

#[derive(Default)]
struct Decoder {
    nodes: Vec<Decoded>,
}

impl Decoder {
    fn value(&self, index: usize) -> Result<Value> {
        match self.nodes.get(index) {
            Some(Decoded::Value(value)) => Ok(value.clone()),
            _ => Err(Error::UnknownValueRef(index)),
        }
    }

    fn action(&self, index: usize) -> Result<Arc<Action>> {
        match self.nodes.get(index) {
            Some(Decoded::Action(action)) => Ok(Arc::clone(action)),
            _ => Err(Error::UnknownActionRef(index)),
        }
    }

    fn node(&mut self, node: Node) -> Result<()> {
        let decoded = match node {
            Node::Value(record) => Decoded::Value(Value {
                id: record.id,
                name: record.name,
                payload: record.payload,
                short_description: record.short_description,
                full_description: record.full_description,
                log: record
                    .log
                    .into_iter()
                    .map(|index| self.action(index))
                    .collect::<Result<Vec<_>>>()?,
            }),
            Node::Action(record) => Decoded::Action(Arc::new(Action {
                id: record.id,
                timestamp: record.timestamp,
                name: record.name,
                pre: record.pre.map(|index| self.value(index)).transpose()?,
                post: self.value(record.post)?,
                appended: record.appended,
                forward: self.transform(record.forward)?,
                rollback: self.transform(record.rollback)?,
                short_description: record.short_description,
                full_description: record.full_description,
                visibility: record.visibility,
                duration: record.duration,
            })),
        };
        self.nodes.push(decoded);
        Ok(())
    }

    fn transform(&self, record: TransformRecord) -> Result<Transform> {
        Ok(match record {
            TransformRecord::Identity => Transform::Identity,
            TransformRecord::Set(payload) => Transform::Set(payload),
            TransformRecord::Modify { op, operand } => Transform::Modify { op, operand },
            TransformRecord::SetField { field, value } => Transform::SetField { field, value },
            TransformRecord::SetFields(fields) => Transform::SetFields(fields),
            TransformRecord::Restore(index) => Transform::restore(self.value(index)?),
            TransformRecord::Sequence(steps) => Transform::Sequence(
                steps
                    .into_iter()
                    .map(|step| self.transform(step))
                    .collect::<Result<Vec<_>>>()?,
            ),
        })
    }

    fn effect(&self, record: EffectRecord) -> Result<Effect> {
        let application = match record.application {
            Some((before, after, action)) => Some(EffectApplication {
                before: self.value(before)?,
                after: self.value(after)?,
                action,
            }),
            None => None,
        };
        Ok(Effect {
            id: record.id,
            name: record.name,
            forward: self.transform(record.forward)?,
            rollback: record
                .rollback
                .map(|rollback| self.transform(rollback))
                .transpose()?,
            application,
            finished: record.finished,
            duration: record.duration,
            short_description: record.short_description,
            full_description: record.full_description,
        })
    }

    fn timer(&self, record: TimerRecord) -> Result<Timer> {
        let mut subscriptions = IndexMap::new();
        for subscription in record.subscriptions {
            let effect = self.effect(subscription.effect)?;
            subscriptions.insert(
                effect.id,
                Subscription {
                    effect,
                    start_time: subscription.start_time,
                },
            );
        }
        Ok(Timer {
            name: record.name,
            ticks: record.ticks,
            subscriptions,
            log: record.log,
        })
    }
}

impl TryFrom<&Game> for GameArchive {
    type Error = Error;

    fn try_from(game: &Game) -> Result<Self> {
        let mut encoder = Encoder::default();
        let log = game
            .log
            .iter()
            .map(|action| encoder.action(action))
            .collect::<Result<Vec<_>>>()?;
        let entities = game
            .entities
            .values()
            .map(|value| encoder.value(value))
            .collect::<Result<Vec<_>>>()?;
        let timer = encoder.timer(&game.timer)?;

        Ok(GameArchive {
            version: ARCHIVE_VERSION,
            name: game.name.clone(),
            nodes: encoder.nodes,
            log,
            entities,
            timer,
        })
    }
}

impl TryFrom<GameArchive> for Game {
    type Error = Error;

    fn try_from(archive: GameArchive) -> Result<Self> {
        if archive.version != ARCHIVE_VERSION {
            return Err(Error::Corrupt(format!(
                "unsupported archive version {}",
                archive.version
            )));
        }

        let mut decoder = Decoder::default();
        for node in archive.nodes {
            decoder.node(node)?;
        }

        let log = archive
            .log
            .into_iter()
            .map(|index| decoder.action(index))
            .collect::<Result<Vec<_>>>()?;
        let mut entities = IndexMap::new();
        for index in archive.entities {
            let value = decoder.value(index)?;
            entities.insert(value.id, value);
        }
        let timer = decoder.timer(archive.timer)?;

        Ok(Game {
            name: archive.name,
            log,
            entities,
            timer,
        })
    }
}

impl Serialize for Game {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        GameArchive::try_from(self)
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Game {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let archive = GameArchive::deserialize(deserializer)?;
        Game::try_from(archive).map_err(<D::Error as serde::de::Error>::custom)
    }
}
