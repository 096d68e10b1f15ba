//! Active-time readiness scheduler.
//!
//! Every registered combatant fills a readiness accumulator at one second
//! per second of game time. When the accumulator reaches the combatant's
//! live threshold it is marked ready and queued FIFO. The host pops one turn
//! at a time and must end it before popping the next.
//!
//! With `pause_mode` on, time freezes while anyone waits in the ready queue.
//! Slow combatants can starve if the queue is never drained; the host is
//! expected to pop promptly.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, trace};

use super::entity::CombatantId;
use crate::error::{ErrorSeverity, GameError};

/// Scheduler invariant violations. Never expected in normal operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("turn already active for {0}")]
    TurnAlreadyActive(CombatantId),

    #[error("{0} is not the current actor")]
    NotCurrentActor(CombatantId),

    #[error("{0} is not registered with the scheduler")]
    UnknownEntity(CombatantId),
}

impl GameError for SchedulerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TurnAlreadyActive(_) => ErrorSeverity::Fatal,
            Self::NotCurrentActor(_) | Self::UnknownEntity(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TurnAlreadyActive(_) => "SCHEDULER_TURN_ALREADY_ACTIVE",
            Self::NotCurrentActor(_) => "SCHEDULER_NOT_CURRENT_ACTOR",
            Self::UnknownEntity(_) => "SCHEDULER_UNKNOWN_ENTITY",
        }
    }
}

/// A popped turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnGrant {
    pub actor: CombatantId,
    /// `base + min(carried, carry_cap)`.
    pub ap: u32,
}

/// Observer fired at turn boundaries.
///
/// Hooks run in priority order (lower values first).
pub trait TurnHook: Send + Sync {
    fn priority(&self) -> i32 {
        0
    }

    fn on_turn_start(&self, _grant: &TurnGrant) {}

    fn on_turn_end(&self, _actor: CombatantId, _carried: u32) {}
}

/// Emits turn boundaries as trace events.
#[derive(Debug)]
pub struct TracingHook;

impl TurnHook for TracingHook {
    fn priority(&self) -> i32 {
        100
    }

    fn on_turn_start(&self, grant: &TurnGrant) {
        trace!(actor = %grant.actor, ap = grant.ap, "turn start");
    }

    fn on_turn_end(&self, actor: CombatantId, carried: u32) {
        trace!(%actor, carried, "turn end");
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Gauge {
    id: CombatantId,
    accumulator: f64,
    carried: u32,
    carry_cap: u32,
    ready: bool,
}

/// Readiness scheduler for one combat session.
#[derive(Clone)]
pub struct AtbScheduler {
    gauges: Vec<Gauge>,
    queue: VecDeque<CombatantId>,
    current: Option<CombatantId>,
    pause_mode: bool,
    base_ap: u32,
    hooks: Vec<Arc<dyn TurnHook>>,
}

impl AtbScheduler {
    pub fn new(pause_mode: bool, base_ap: u32) -> Self {
        Self {
            gauges: Vec::new(),
            queue: VecDeque::new(),
            current: None,
            pause_mode,
            base_ap,
            hooks: Vec::new(),
        }
    }

    /// Registers a hook, keeping the list sorted by priority.
    pub fn add_hook(&mut self, hook: Arc<dyn TurnHook>) {
        self.hooks.push(hook);
        self.hooks.sort_by_key(|h| h.priority());
    }

    /// Adds a combatant with an empty accumulator.
    pub fn register(&mut self, id: CombatantId, carried: u32, carry_cap: u32) {
        self.gauges.retain(|g| g.id != id);
        self.gauges.push(Gauge {
            id,
            accumulator: 0.0,
            carried: carried.min(carry_cap),
            carry_cap,
            ready: false,
        });
    }

    /// Drops a combatant (e.g. on death) from the gauges and the queue.
    pub fn retire(&mut self, id: CombatantId) {
        self.gauges.retain(|g| g.id != id);
        self.queue.retain(|queued| *queued != id);
    }

    /// Advances time by `delta` seconds.
    ///
    /// `threshold` returns each combatant's live fill time. Returns the
    /// combatants that became ready on this tick, in queue order. Time never
    /// runs backwards: a non-positive or NaN `delta` is a no-op.
    pub fn tick(&mut self, delta: f64, threshold: impl Fn(CombatantId) -> f64) -> Vec<CombatantId> {
        if self.is_frozen() || delta.is_nan() || delta <= 0.0 {
            return Vec::new();
        }
        let mut newly_ready = Vec::new();
        for gauge in self.gauges.iter_mut().filter(|g| !g.ready) {
            gauge.accumulator += delta;
            if gauge.accumulator >= threshold(gauge.id) {
                gauge.ready = true;
                self.queue.push_back(gauge.id);
                newly_ready.push(gauge.id);
                debug!(actor = %gauge.id, "ready");
            }
        }
        newly_ready
    }

    /// Whether pause mode is currently holding time still.
    pub fn is_frozen(&self) -> bool {
        self.pause_mode && !self.queue.is_empty()
    }

    pub fn has_turn_ready(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Dequeues the next ready combatant and grants its AP pool.
    pub fn pop_turn(&mut self) -> Result<Option<TurnGrant>, SchedulerError> {
        if let Some(active) = self.current {
            return Err(SchedulerError::TurnAlreadyActive(active));
        }
        let Some(actor) = self.queue.pop_front() else {
            return Ok(None);
        };
        let gauge = self.gauge(actor)?;
        let grant = TurnGrant {
            actor,
            ap: self.base_ap + gauge.carried.min(gauge.carry_cap),
        };
        self.current = Some(actor);
        for hook in &self.hooks {
            hook.on_turn_start(&grant);
        }
        Ok(Some(grant))
    }

    /// Ends the current turn, banking `min(carry_cap, carry)` AP.
    ///
    /// Returns the banked amount.
    pub fn end_turn(&mut self, actor: CombatantId, carry: u32) -> Result<u32, SchedulerError> {
        if self.current != Some(actor) {
            return Err(SchedulerError::NotCurrentActor(actor));
        }
        self.current = None;
        // A combatant retired mid-turn has no gauge left to reset.
        let carried = match self.gauges.iter_mut().find(|g| g.id == actor) {
            Some(gauge) => {
                gauge.carried = carry.min(gauge.carry_cap);
                gauge.accumulator = 0.0;
                gauge.ready = false;
                gauge.carried
            }
            None => 0,
        };
        for hook in &self.hooks {
            hook.on_turn_end(actor, carried);
        }
        Ok(carried)
    }

    pub fn current(&self) -> Option<CombatantId> {
        self.current
    }

    pub fn queue(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.queue.iter().copied()
    }

    pub fn accumulator(&self, id: CombatantId) -> Option<f64> {
        self.gauges.iter().find(|g| g.id == id).map(|g| g.accumulator)
    }

    pub fn carried(&self, id: CombatantId) -> Option<u32> {
        self.gauges.iter().find(|g| g.id == id).map(|g| g.carried)
    }

    pub fn is_ready(&self, id: CombatantId) -> bool {
        self.gauges.iter().any(|g| g.id == id && g.ready)
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    /// Tears everything down.
    pub fn clear(&mut self) {
        self.gauges.clear();
        self.queue.clear();
        self.current = None;
    }

    fn gauge(&self, id: CombatantId) -> Result<&Gauge, SchedulerError> {
        self.gauges
            .iter()
            .find(|g| g.id == id)
            .ok_or(SchedulerError::UnknownEntity(id))
    }
}

impl core::fmt::Debug for AtbScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtbScheduler")
            .field("gauges", &self.gauges)
            .field("queue", &self.queue)
            .field("current", &self.current)
            .field("pause_mode", &self.pause_mode)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::party::MemberId;

    const FAST: CombatantId = CombatantId::Ally(MemberId(1));
    const SLOW: CombatantId = CombatantId::Enemy(0);

    fn pace(id: CombatantId) -> f64 {
        match id {
            CombatantId::Ally(_) => 2.0,
            CombatantId::Enemy(_) => 3.0,
        }
    }

    fn scheduler(pause_mode: bool) -> AtbScheduler {
        let mut atb = AtbScheduler::new(pause_mode, 3);
        atb.register(FAST, 0, 2);
        atb.register(SLOW, 0, 2);
        atb
    }

    #[test]
    fn readiness_follows_fill_time() {
        let mut atb = scheduler(true);
        assert!(atb.tick(1.5, pace).is_empty());
        assert_eq!(atb.tick(0.5, pace), vec![FAST]);
        let grant = atb.pop_turn().unwrap().unwrap();
        assert_eq!(grant, TurnGrant { actor: FAST, ap: 3 });
        assert_eq!(atb.end_turn(FAST, 1), Ok(1));
        assert_eq!(atb.tick(1.0, pace), vec![SLOW]);
    }

    #[test]
    fn ties_resolve_in_registration_order() {
        let mut atb = AtbScheduler::new(false, 3);
        atb.register(SLOW, 0, 2);
        atb.register(FAST, 0, 2);
        assert_eq!(atb.tick(5.0, |_| 2.0), vec![SLOW, FAST]);
        assert_eq!(atb.queue().collect::<Vec<_>>(), vec![SLOW, FAST]);
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut atb = scheduler(false);
        atb.tick(1.0, pace);
        for delta in [-5.0, 0.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(atb.tick(delta, pace).is_empty());
        }
        assert_eq!(atb.accumulator(FAST), Some(1.0));
        assert_eq!(atb.accumulator(SLOW), Some(1.0));
        assert_eq!(atb.tick(1.0, pace), vec![FAST]);
    }

    #[test]
    fn pause_mode_freezes_every_accumulator() {
        let mut atb = scheduler(true);
        atb.tick(2.0, pace);
        assert!(atb.is_frozen());
        let slow_before = atb.accumulator(SLOW);
        for _ in 0..1_000 {
            assert!(atb.tick(0.25, pace).is_empty());
        }
        assert_eq!(atb.accumulator(SLOW), slow_before);
        assert_eq!(atb.accumulator(FAST), Some(2.0));
    }

    #[test]
    fn without_pause_mode_time_keeps_flowing() {
        let mut atb = scheduler(false);
        atb.tick(2.0, pace);
        atb.tick(1.0, pace);
        assert_eq!(atb.queue().collect::<Vec<_>>(), vec![FAST, SLOW]);
        // Ready combatants do not accumulate further.
        assert_eq!(atb.accumulator(FAST), Some(2.0));
    }

    #[test]
    fn only_one_turn_at_a_time() {
        let mut atb = scheduler(false);
        atb.tick(3.0, pace);
        atb.pop_turn().unwrap();
        assert_eq!(atb.pop_turn(), Err(SchedulerError::TurnAlreadyActive(FAST)));
        assert_eq!(atb.end_turn(SLOW, 0), Err(SchedulerError::NotCurrentActor(SLOW)));
        assert_eq!(
            SchedulerError::TurnAlreadyActive(FAST).severity(),
            ErrorSeverity::Fatal
        );
    }

    #[test]
    fn carry_is_capped() {
        let mut atb = scheduler(true);
        atb.tick(2.0, pace);
        atb.pop_turn().unwrap();
        assert_eq!(atb.end_turn(FAST, 9), Ok(2));
        assert_eq!(atb.carried(FAST), Some(2));
        assert_eq!(atb.accumulator(FAST), Some(0.0));
        assert!(!atb.is_ready(FAST));

        atb.tick(2.0, pace);
        let grant = atb.pop_turn().unwrap().unwrap();
        assert_eq!(grant.ap, 5);
    }

    #[test]
    fn retired_combatants_leave_the_queue() {
        let mut atb = scheduler(false);
        atb.tick(3.0, pace);
        atb.retire(FAST);
        let grant = atb.pop_turn().unwrap().unwrap();
        assert_eq!(grant.actor, SLOW);
        assert_eq!(atb.len(), 1);
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl TurnHook for Recorder {
        fn on_turn_start(&self, grant: &TurnGrant) {
            if let Ok(mut log) = self.0.lock() {
                log.push(format!("start {} {}", grant.actor, grant.ap));
            }
        }

        fn on_turn_end(&self, actor: CombatantId, carried: u32) {
            if let Ok(mut log) = self.0.lock() {
                log.push(format!("end {actor} {carried}"));
            }
        }
    }

    #[test]
    fn hooks_observe_turn_boundaries() {
        let recorder = Arc::new(Recorder::default());
        let mut atb = scheduler(true);
        atb.add_hook(Arc::new(TracingHook));
        atb.add_hook(recorder.clone());
        atb.tick(2.0, pace);
        atb.pop_turn().unwrap();
        atb.end_turn(FAST, 1).unwrap();
        let log = recorder.0.lock().unwrap().clone();
        assert_eq!(log, vec!["start ally#1 3".to_string(), "end ally#1 1".to_string()]);
    }
}
