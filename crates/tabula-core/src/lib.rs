//! Tabula Core - Immutable state-change engine for tabletop games
//!
//! This crate provides the record-and-rollback model the rest of tabula
//! builds on:
//! - Dynamic payloads (`Payload`, `PayloadMap`) and stable identities
//! - Immutable values with their own action logs (`Value`, `Action`)
//! - Forward and rollback transforms (`Transform`, `ModifyOp`)
//! - Duration-bound modifiers on a shared clock (`Effect`, `Timer`)
//! - The global game ledger with cascading cancellation (`Game`)
//!
//! Every operation takes a snapshot and returns a new one. Nothing is
//! mutated in place, so any earlier snapshot stays valid after later changes.
//!
//! ## Example
//!
//! ```
//! use tabula_core::{Action, Game, Payload, Transform, Value};
//!
//! let game = Game::new().make_action(&Action::create(Value::new("hp", 12)));
//! let hp = game.entities().next().unwrap().clone();
//! let (_, hit) = hp.change(Some(Transform::sub(5.0)), None);
//!
//! let game = game.make_action(&hit);
//! assert_eq!(game.entity(hp.id()).unwrap().payload(), &Payload::Int(7));
//!
//! let game = game.cancel_action(hit.id());
//! assert_eq!(game.entity(hp.id()).unwrap().payload(), &Payload::Int(12));
//! ```

mod action;
pub mod archive;
mod character;
mod effect;
mod error;
mod game;
mod identity;
mod payload;
pub mod timer;
mod transform;
mod value;

pub use action::{Action, Change, Visibility};
pub use archive::GameArchive;
pub use character::Character;
pub use effect::{Effect, EffectApplication};
pub use error::{Error, Result};
pub use game::{Game, GameConfig};
pub use identity::{ActionId, EffectId, ValueId};
pub use payload::{Payload, PayloadMap};
pub use timer::{Subscription, Timer, TimerEntry, TimerTick};
pub use transform::{CustomTransform, ModifyOp, PayloadFn, Transform};
pub use value::Value;
