//! Shared game clock
//!
//! A [`Timer`] advances by discrete tick amounts measured in seconds and
//! expires the effects subscribed to it. Like values, timers are snapshots:
//! ticking returns a new timer plus a [`TimerTick`] record that can undo it.

use crate::{ActionId, Effect, EffectId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entry in a timer's own history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimerEntry {
    /// Time advanced by `seconds`, which may be negative
    Ticked { seconds: f64 },
    /// A subscribed effect ran out
    EffectFinished { effect: EffectId },
}

/// An effect subscribed to a timer
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub effect: Effect,
    /// Seconds passed on the timer when the effect was subscribed
    pub start_time: f64,
}

/// Record of one tick, enough to undo it exactly
#[derive(Debug, Clone, PartialEq)]
pub struct TimerTick {
    pub id: ActionId,
    pub seconds: f64,
    /// The timer before the tick
    pub pre: Timer,
    /// Effects this tick finished
    pub finished: Vec<EffectId>,
}

/// Simulation clock with subscribed effects
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    pub(crate) name: String,
    pub(crate) ticks: Vec<f64>,
    pub(crate) subscriptions: IndexMap<EffectId, Subscription>,
    pub(crate) log: Vec<TimerEntry>,
}

impl Timer {
    /// Create a timer at zero with no subscriptions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticks: Vec::new(),
            subscriptions: IndexMap::new(),
            log: Vec::new(),
        }
    }

    /// Timer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tick amounts, oldest first
    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    /// Total time passed
    pub fn seconds_passed(&self) -> f64 {
        if self.ticks.is_empty() {
            return 0.0;
        }
        self.ticks.iter().sum()
    }

    /// Ticks and expiries, oldest first
    pub fn log(&self) -> &[TimerEntry] {
        &self.log
    }

    /// All subscriptions, finished ones included, in subscription order
    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.values()
    }

    /// Find a subscribed effect by identity
    pub fn find_effect(&self, id: EffectId) -> Option<&Effect> {
        self.subscriptions.get(&id).map(|subscription| &subscription.effect)
    }

    /// Get the start time of a subscription
    pub fn start_time(&self, id: EffectId) -> Option<f64> {
        self.subscriptions.get(&id).map(|subscription| subscription.start_time)
    }

    /// Effects that are still running
    pub fn active_effects(&self) -> impl Iterator<Item = &Effect> {
        self.subscriptions
            .values()
            .map(|subscription| &subscription.effect)
            .filter(|effect| !effect.is_finished())
    }

    /// Subscribe an effect starting now, replacing any earlier subscription
    pub fn subscribe(&self, effect: Effect) -> Timer {
        let start_time = self.seconds_passed();
        let mut next = self.clone();
        next.subscriptions.shift_remove(&effect.id);
        next.subscriptions
            .insert(effect.id, Subscription { effect, start_time });
        next
    }

    /// Remove a subscription; unknown ids leave the timer as it is
    pub fn unsubscribe(&self, id: EffectId) -> Timer {
        let mut next = self.clone();
        if next.subscriptions.shift_remove(&id).is_none() {
            tracing::debug!(timer = %self.name, effect = %id, "unsubscribe of unknown effect ignored");
        }
        next
    }

    /// Advance the clock and finish every effect whose time is up
    ///
    /// An effect subscribed at `start` with duration `d` finishes on the tick
    /// that brings the total to `start + d` or beyond.
    pub fn tick(&self, seconds: f64) -> (Timer, TimerTick) {
        let mut next = self.clone();
        next.ticks.push(seconds);
        next.log.push(TimerEntry::Ticked { seconds });

        let passed = next.seconds_passed();
        let expired: Vec<EffectId> = next
            .subscriptions
            .iter()
            .filter(|(_, subscription)| {
                !subscription.effect.is_finished()
                    && subscription
                        .effect
                        .expires_by(subscription.start_time, passed)
            })
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            if let Some(subscription) = next.subscriptions.shift_remove(id) {
                let (effect, entry) = subscription.effect.set_finished();
                tracing::debug!(timer = %next.name, effect = %id, passed, "effect finished");
                next.log.push(entry);
                next.subscriptions.insert(
                    *id,
                    Subscription {
                        effect,
                        start_time: subscription.start_time,
                    },
                );
            }
        }

        let record = TimerTick {
            id: ActionId::new(),
            seconds,
            pre: self.clone(),
            finished: expired,
        };
        (next, record)
    }

    /// Undo a tick by restoring the timer it started from
    pub fn untick(tick: &TimerTick) -> Timer {
        tick.pre.clone()
    }

    /// Fresh clock with the same name and subscriptions, all running again
    pub(crate) fn reseeded(&self) -> Timer {
        let mut timer = Timer::new(self.name.clone());
        timer.subscriptions = self
            .subscriptions
            .iter()
            .map(|(id, subscription)| {
                (
                    *id,
                    Subscription {
                        effect: subscription.effect.reset(),
                        start_time: subscription.start_time,
                    },
                )
            })
            .collect();
        timer
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new("Game timer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transform;

    fn effect(duration: f64) -> Effect {
        Effect::new("Haste", Transform::Identity).with_duration(duration)
    }

    #[test]
    fn test_seconds_passed() {
        let timer = Timer::new("round");
        assert_eq!(timer.seconds_passed(), 0.0);

        let (timer, tick) = timer.tick(6.0);
        let (timer, _) = timer.tick(1.5);
        assert_eq!(timer.seconds_passed(), 7.5);
        assert_eq!(tick.seconds, 6.0);
        assert_eq!(timer.log().len(), 2);
    }

    #[test]
    fn test_effect_finishes_on_boundary() {
        let haste = effect(20.0);
        let timer = Timer::new("round").subscribe(haste.clone());

        let (timer, first) = timer.tick(10.0);
        assert!(first.finished.is_empty());
        assert!(!timer.find_effect(haste.id()).unwrap().is_finished());

        let (timer, second) = timer.tick(10.0);
        assert_eq!(second.finished, vec![haste.id()]);
        assert!(timer.find_effect(haste.id()).unwrap().is_finished());
        assert_eq!(timer.start_time(haste.id()), Some(0.0));
        assert_eq!(timer.active_effects().count(), 0);
    }

    #[test]
    fn test_effect_not_finished_before_boundary() {
        let haste = effect(20.0);
        let (timer, _) = Timer::new("round").subscribe(haste.clone()).tick(19.0);
        assert!(!timer.find_effect(haste.id()).unwrap().is_finished());
    }

    #[test]
    fn test_start_time_is_current_time() {
        let (timer, _) = Timer::new("round").tick(5.0);
        let haste = effect(3.0);
        let timer = timer.subscribe(haste.clone());
        assert_eq!(timer.start_time(haste.id()), Some(5.0));

        let (timer, tick) = timer.tick(2.0);
        assert!(tick.finished.is_empty());
        let (_, tick) = timer.tick(1.0);
        assert_eq!(tick.finished, vec![haste.id()]);
    }

    #[test]
    fn test_finished_effect_not_ticked_again() {
        let haste = effect(1.0);
        let (timer, _) = Timer::new("round").subscribe(haste.clone()).tick(1.0);
        let (timer, tick) = timer.tick(1.0);
        assert!(tick.finished.is_empty());
        let finished_entries = timer
            .log()
            .iter()
            .filter(|entry| matches!(entry, TimerEntry::EffectFinished { .. }))
            .count();
        assert_eq!(finished_entries, 1);
    }

    #[test]
    fn test_untick_restores_snapshot() {
        let haste = effect(4.0);
        let timer = Timer::new("round").subscribe(haste.clone());
        let (ticked, tick) = timer.tick(4.0);
        assert!(ticked.find_effect(haste.id()).unwrap().is_finished());

        let restored = Timer::untick(&tick);
        assert_eq!(restored, timer);
        assert!(!restored.find_effect(haste.id()).unwrap().is_finished());
    }

    #[test]
    fn test_resubscribe_replaces() {
        let haste = effect(10.0);
        let timer = Timer::new("round").subscribe(haste.clone());
        let (timer, _) = timer.tick(3.0);
        let timer = timer.subscribe(haste.clone());

        assert_eq!(timer.subscriptions().count(), 1);
        assert_eq!(timer.start_time(haste.id()), Some(3.0));
    }

    #[test]
    fn test_unsubscribe() {
        let haste = effect(10.0);
        let timer = Timer::new("round").subscribe(haste.clone());
        let timer = timer.unsubscribe(haste.id());
        assert!(timer.find_effect(haste.id()).is_none());
        assert_eq!(timer.unsubscribe(haste.id()), timer);
    }

    #[test]
    fn test_reseeded_resets_effects() {
        let haste = effect(1.0);
        let (timer, _) = Timer::new("round").subscribe(haste.clone()).tick(2.0);
        let fresh = timer.reseeded();

        assert_eq!(fresh.seconds_passed(), 0.0);
        assert_eq!(fresh.name(), "round");
        assert!(!fresh.find_effect(haste.id()).unwrap().is_finished());
        assert_eq!(fresh.start_time(haste.id()), Some(0.0));
    }
}
