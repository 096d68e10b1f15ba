//! Combat session: the per-fight state machine.
//!
//! ```text
//! WaitingForReady ──advance()──▶ ActorTurn(ally | enemy)
//!        ▲                              │ attack / ability / item (spend AP)
//!        └────── turn ends (AP 0, end_turn, enemy done)
//!                                       │
//!                              check_end() ──▶ Ended(victory | defeat | fled)
//! ```
//!
//! The session borrows the canonical [`Party`] mutably for its whole
//! lifetime, so HP/XP/gold/inventory changes land directly on it. Enemy
//! instances are owned by the session and dropped with it.

use std::collections::VecDeque;
use std::time::Duration;

use rand::{Rng, RngCore};
use tracing::{debug, info, warn};

use super::atb::{AtbScheduler, SchedulerError, TurnGrant, TurnHook};
use super::damage::{physical_damage, strike};
use super::entity::{CombatState, Combatant, CombatantId, DamageTaken, EnemyInstance};
use super::error::{ActionError, CombatError};
use super::events::{CombatEvent, CombatOutcome};
use super::rewards::{BattleSummary, MemberSummary, Rewards, StatsLedger};
use crate::config::{CombatConfig, GameConfig, ProgressionConfig};
use crate::encounter::EncounterDefinition;
use crate::env::{AbilityOracle, ConsumableEffect, GameEnv, ItemOracle};
use crate::party::{MemberId, Party, XpGain};

/// Where the state machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatPhase {
    WaitingForReady,
    ActorTurn(CombatantId),
    Ended(CombatOutcome),
}

/// One fight between the party and a set of enemy instances.
pub struct CombatSession<'p, R: RngCore> {
    pub(super) party: &'p mut Party,
    pub(super) enemies: Vec<EnemyInstance>,
    pub(super) abilities: &'p dyn AbilityOracle,
    pub(super) items: &'p dyn ItemOracle,
    pub(super) config: CombatConfig,
    pub(super) progression: ProgressionConfig,
    pub(super) scheduler: AtbScheduler,
    pub(super) phase: CombatPhase,
    pub(super) turn_count: u32,
    pub(super) ledger: StatsLedger,
    pub(super) events: VecDeque<CombatEvent>,
    pub(super) summary: Option<BattleSummary>,
    pub(super) rng: R,
}

impl<'p, R: RngCore> CombatSession<'p, R> {
    /// Instantiates `encounter` and starts a session against it.
    pub fn start(
        party: &'p mut Party,
        encounter: &EncounterDefinition,
        env: GameEnv<'p>,
        config: &GameConfig,
        rng: R,
    ) -> Result<Self, CombatError> {
        Self::with_enemies(party, encounter.instantiate(), env, config, rng)
    }

    /// Starts a session against already instantiated enemies.
    pub fn with_enemies(
        party: &'p mut Party,
        enemies: Vec<EnemyInstance>,
        env: GameEnv<'p>,
        config: &GameConfig,
        rng: R,
    ) -> Result<Self, CombatError> {
        if !party.any_alive() {
            return Err(CombatError::EmptyParty);
        }
        if !enemies.iter().any(Combatant::is_alive) {
            return Err(CombatError::EmptyEncounter);
        }
        let abilities = env.abilities()?;
        let items = env.items()?;

        let combat = config.combat.clone();
        let mut scheduler = AtbScheduler::new(combat.pause_mode, combat.base_ap_per_turn);
        for member in party.members_mut() {
            member.reset_combat(combat.ap_carry_cap);
            if member.is_alive() {
                scheduler.register(CombatantId::Ally(member.id), 0, combat.ap_carry_cap);
            }
        }
        let mut enemies = enemies;
        for (index, enemy) in enemies.iter_mut().enumerate() {
            enemy.combat = CombatState::new(combat.ap_carry_cap);
            if enemy.is_alive() {
                scheduler.register(CombatantId::Enemy(index), 0, combat.ap_carry_cap);
            }
        }

        let ledger = StatsLedger::new(party.members().iter().map(|m| m.id));
        info!(
            allies = party.len(),
            enemies = enemies.len(),
            pause_mode = combat.pause_mode,
            "combat started"
        );

        let mut session = Self {
            party,
            enemies,
            abilities,
            items,
            config: combat,
            progression: config.progression.clone(),
            scheduler,
            phase: CombatPhase::WaitingForReady,
            turn_count: 0,
            ledger,
            events: VecDeque::new(),
            summary: None,
            rng,
        };
        session.log("Battle begins.".to_string());
        session.emit(CombatEvent::Refresh);
        Ok(session)
    }

    /// Registers a scheduler hook for turn boundaries.
    pub fn add_turn_hook(&mut self, hook: std::sync::Arc<dyn TurnHook>) {
        self.scheduler.add_hook(hook);
    }

    // ===== accessors =====

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, CombatPhase::Ended(_))
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        match self.phase {
            CombatPhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn current_actor(&self) -> Option<CombatantId> {
        match self.phase {
            CombatPhase::ActorTurn(actor) => Some(actor),
            _ => None,
        }
    }

    pub fn is_enemy_turn(&self) -> bool {
        self.current_actor().is_some_and(|actor| actor.is_enemy())
    }

    pub fn party(&self) -> &Party {
        self.party
    }

    pub fn enemies(&self) -> &[EnemyInstance] {
        &self.enemies
    }

    pub fn scheduler(&self) -> &AtbScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn ledger(&self) -> &StatsLedger {
        &self.ledger
    }

    /// Post-battle record; set once the session has ended.
    pub fn summary(&self) -> Option<&BattleSummary> {
        self.summary.as_ref()
    }

    /// UI pacing delay the host should wait before [`Self::run_enemy_turn`].
    pub fn enemy_turn_delay(&self) -> Duration {
        self.config.enemy_turn_delay()
    }

    /// Takes every pending event in emission order.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain(..).collect()
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&dyn Combatant> {
        match id {
            CombatantId::Ally(member) => self.party.member(member).map(|m| m as &dyn Combatant),
            CombatantId::Enemy(index) => self.enemies.get(index).map(|e| e as &dyn Combatant),
        }
    }

    pub(super) fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut dyn Combatant> {
        match id {
            CombatantId::Ally(member) => self
                .party
                .member_mut(member)
                .map(|m| m as &mut dyn Combatant),
            CombatantId::Enemy(index) => self
                .enemies
                .get_mut(index)
                .map(|e| e as &mut dyn Combatant),
        }
    }

    /// AP the combatant holds right now.
    pub fn ap(&self, id: CombatantId) -> u32 {
        self.combatant(id).map_or(0, |c| c.state().ap)
    }

    pub fn living_allies(&self) -> Vec<MemberId> {
        self.party
            .members()
            .iter()
            .filter(|m| m.is_alive())
            .map(|m| m.id)
            .collect()
    }

    /// Indices of living enemies in formation order.
    pub fn living_enemies(&self) -> Vec<usize> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_alive())
            .map(|(index, _)| index)
            .collect()
    }

    // ===== time =====

    /// Advances the readiness clocks and begins the next turn if one is due.
    ///
    /// Returns the actor whose turn began, if any.
    pub fn advance(&mut self, delta: f64) -> Result<Option<CombatantId>, SchedulerError> {
        if self.is_over() {
            return Ok(None);
        }
        let party = &*self.party;
        let enemies = &self.enemies;
        let config = &self.config;
        self.scheduler
            .tick(delta, |id| threshold_of(party, enemies, config, id));

        if self.phase != CombatPhase::WaitingForReady {
            return Ok(None);
        }
        match self.scheduler.pop_turn()? {
            Some(grant) => {
                self.begin_turn(grant)?;
                Ok(Some(grant.actor))
            }
            None => Ok(None),
        }
    }

    fn begin_turn(&mut self, grant: TurnGrant) -> Result<(), SchedulerError> {
        self.turn_count += 1;
        let actor = grant.actor;
        let max_ap = self.config.max_ap();
        let Some(unit) = self.combatant_mut(actor) else {
            warn!(%actor, "popped a turn for an unknown combatant");
            self.scheduler.end_turn(actor, 0)?;
            return Ok(());
        };
        let state = unit.state_mut();
        let bonus = state.statuses.take_bonus_ap();
        state.ap = (grant.ap + bonus).min(max_ap);
        state.tick_cooldowns();
        let ap = state.ap;
        let poison = state.statuses.poison_tick();
        let name = unit.display_name().to_string();

        self.phase = CombatPhase::ActorTurn(actor);
        self.emit(CombatEvent::TurnStarted { actor, ap });
        debug!(%actor, ap, turn = self.turn_count, "turn begins");

        if let Some(amount) = poison {
            self.wound(None, actor, amount);
            self.log(format!("{name} takes {amount} poison damage."));
            if !self.is_alive(actor) {
                return self.finish_turn(0);
            }
        }

        match actor {
            CombatantId::Ally(_) => self.log(format!("Your turn: {name} (AP {ap})")),
            CombatantId::Enemy(_) => self.log(format!("{name} prepares to act.")),
        }
        self.emit(CombatEvent::Refresh);
        Ok(())
    }

    /// Closes the active turn, banking `carry` AP (capped by the scheduler).
    pub(super) fn finish_turn(&mut self, carry: u32) -> Result<(), SchedulerError> {
        let CombatPhase::ActorTurn(actor) = self.phase else {
            return Ok(());
        };
        let turn = self.turn_count;
        let (name, expired) = match self.combatant_mut(actor) {
            Some(unit) => {
                let state = unit.state_mut();
                state.ap = 0;
                let expired = state.statuses.expire(turn);
                (unit.display_name().to_string(), expired)
            }
            None => (actor.to_string(), Vec::new()),
        };
        let carried = self.scheduler.end_turn(actor, carry)?;
        if let Some(unit) = self.combatant_mut(actor) {
            unit.state_mut().carried_ap = carried;
        }
        for source in expired {
            self.log(format!("{source} wears off {name}."));
        }

        self.phase = CombatPhase::WaitingForReady;
        self.emit(CombatEvent::TurnEnded { actor, carried });
        self.check_end();
        Ok(())
    }

    // ===== player actions =====

    /// Basic attack: 1 AP, physical damage against one living enemy.
    pub fn attack(&mut self, target: usize) -> Result<(), ActionError> {
        const COST: u32 = 1;
        let caster = self.ally_turn()?;
        let actor = CombatantId::Ally(caster);
        self.require_ap(actor, COST)?;
        let defender = self
            .enemies
            .get(target)
            .filter(|e| e.is_alive())
            .map(|e| e.effective_stats())
            .ok_or(ActionError::InvalidTarget)?;
        let attacker = self.stats_of(actor)?;

        let base = physical_damage(f64::from(attacker.p_atk), defender.def, 1.0, &mut self.rng);
        let hit = strike(
            base,
            attacker.crit_pct,
            self.config.crit_multiplier,
            &mut self.rng,
        );
        self.spend_ap(actor, COST);
        let victim = CombatantId::Enemy(target);
        let line = format!(
            "{} hits {} for {}{}.",
            self.name_of(actor),
            self.name_of(victim),
            hit.damage,
            crit_tag(hit.critical)
        );
        self.log(line);
        self.wound(Some(actor), victim, hit.damage);
        debug!(%actor, %victim, damage = hit.damage, critical = hit.critical, "attack");
        self.after_action()
    }

    /// Uses one consumable on a living ally for 1 AP.
    ///
    /// Healing an ally at full HP is rejected without spending anything.
    pub fn use_item(&mut self, item_id: &str, target: MemberId) -> Result<(), ActionError> {
        const COST: u32 = 1;
        let caster = self.ally_turn()?;
        let actor = CombatantId::Ally(caster);
        let items = self.items;
        let item = items
            .item(item_id)
            .filter(|_| self.party.inventory.has(item_id))
            .ok_or_else(|| ActionError::ItemUnavailable(item_id.to_string()))?;
        let Some(ConsumableEffect::Heal(amount)) = item.consumable_effect() else {
            return Err(ActionError::ItemUnavailable(item_id.to_string()));
        };
        let patient = self
            .party
            .member(target)
            .filter(|m| m.is_alive() && !m.is_full_hp())
            .ok_or(ActionError::InvalidTarget)?;
        let patient_name = patient.name.clone();
        self.require_ap(actor, COST)?;

        self.party
            .inventory
            .remove(item_id, 1)
            .map_err(|_| ActionError::ItemUnavailable(item_id.to_string()))?;
        let healed = self
            .combatant_mut(CombatantId::Ally(target))
            .map_or(0, |unit| unit.heal(amount));
        self.ledger.heal(caster, target, healed);
        self.spend_ap(actor, COST);
        let line = format!(
            "{} uses {} on {patient_name} (+{healed} HP).",
            self.name_of(actor),
            item.name
        );
        self.log(line);
        self.after_action()
    }

    /// Ends the current ally turn, banking `min(ap, carry_cap)` AP.
    pub fn end_turn(&mut self) -> Result<(), ActionError> {
        let caster = self.ally_turn()?;
        let actor = CombatantId::Ally(caster);
        let ap = self.ap(actor);
        let cap = self
            .combatant(actor)
            .map_or(self.config.ap_carry_cap, |c| c.state().carry_cap);
        self.finish_turn(ap.min(cap))?;
        Ok(())
    }

    /// Attempts to escape. Failure costs nothing and may be retried.
    pub fn flee(&mut self) -> Result<bool, ActionError> {
        self.ally_turn()?;
        let chance = f64::from(self.config.flee_chance_pct.min(100)) / 100.0;
        if self.rng.gen_bool(chance) {
            self.log("You flee successfully.".to_string());
            self.conclude(CombatOutcome::Fled);
            Ok(true)
        } else {
            self.log("Could not escape!".to_string());
            self.emit(CombatEvent::Refresh);
            Ok(false)
        }
    }

    // ===== end of combat =====

    /// Evaluates the end conditions; concludes the session when met.
    pub fn check_end(&mut self) -> Option<CombatOutcome> {
        if let Some(outcome) = self.outcome() {
            return Some(outcome);
        }
        if !self.party.any_alive() {
            self.log("Your party falls…".to_string());
            self.conclude(CombatOutcome::Defeat);
        } else if !self.enemies.iter().any(Combatant::is_alive) {
            self.conclude(CombatOutcome::Victory);
        }
        self.outcome()
    }

    fn conclude(&mut self, outcome: CombatOutcome) {
        let (rewards, gains) = match outcome {
            CombatOutcome::Victory => {
                let (rewards, gains) = self.grant_rewards();
                (Some(rewards), gains)
            }
            CombatOutcome::Defeat | CombatOutcome::Fled => (None, Vec::new()),
        };

        let members = self
            .party
            .members()
            .iter()
            .map(|m| MemberSummary {
                id: m.id,
                name: m.name.clone(),
                stats: self.ledger.get(m.id),
                level_up: gains
                    .iter()
                    .find(|(id, gain)| *id == m.id && gain.levels > 0)
                    .map(|(_, gain)| *gain),
            })
            .collect();
        self.summary = Some(BattleSummary {
            outcome,
            rewards,
            turns: self.turn_count,
            members,
        });

        self.scheduler.clear();
        let cap = self.config.ap_carry_cap;
        for member in self.party.members_mut() {
            member.reset_combat(cap);
        }
        self.phase = CombatPhase::Ended(outcome);
        info!(%outcome, turns = self.turn_count, "combat ended");
        self.emit(CombatEvent::Ended(outcome));
        self.emit(CombatEvent::Refresh);
    }

    fn grant_rewards(&mut self) -> (Rewards, Vec<(MemberId, XpGain)>) {
        let rewards = Rewards::roll(&self.config, &mut self.rng);
        self.party.add_gold(rewards.gold);
        for id in &rewards.loot {
            self.party.inventory.add(id.as_str(), 1);
        }
        let gains = self.party.grant_xp(rewards.xp, &self.progression);

        self.log(format!(
            "Victory! +{} XP, +{} gold.",
            rewards.xp, rewards.gold
        ));
        let items = self.items;
        for id in &rewards.loot {
            let name = items.item(id).map_or(id.as_str(), |item| item.name.as_str());
            self.log(format!("Found {name} ×1."));
        }
        for (id, gain) in &gains {
            if gain.levels > 0 {
                let name = self.name_of(CombatantId::Ally(*id));
                self.log(format!("{name} reaches level {}!", gain.new_level));
            }
        }
        (rewards, gains)
    }

    // ===== shared helpers =====

    pub(super) fn ally_turn(&self) -> Result<MemberId, ActionError> {
        match self.phase {
            CombatPhase::Ended(_) => Err(ActionError::CombatEnded),
            CombatPhase::ActorTurn(CombatantId::Ally(id)) => Ok(id),
            _ => Err(ActionError::NotAllyTurn),
        }
    }

    pub(super) fn require_ap(&self, actor: CombatantId, cost: u32) -> Result<(), ActionError> {
        let available = self.ap(actor);
        if available < cost {
            return Err(ActionError::InsufficientAp {
                required: cost,
                available,
            });
        }
        Ok(())
    }

    pub(super) fn spend_ap(&mut self, actor: CombatantId, cost: u32) {
        if let Some(unit) = self.combatant_mut(actor) {
            let state = unit.state_mut();
            state.ap = state.ap.saturating_sub(cost);
        }
    }

    pub(super) fn stats_of(
        &self,
        id: CombatantId,
    ) -> Result<crate::stats::DerivedStats, ActionError> {
        self.combatant(id)
            .map(|c| c.effective_stats())
            .ok_or(ActionError::Scheduler(SchedulerError::UnknownEntity(id)))
    }

    pub(super) fn name_of(&self, id: CombatantId) -> String {
        self.combatant(id)
            .map_or_else(|| id.to_string(), |c| c.display_name().to_string())
    }

    pub(super) fn is_alive(&self, id: CombatantId) -> bool {
        self.combatant(id).is_some_and(|c| c.is_alive())
    }

    /// Applies damage, records it, and retires the target if it falls.
    pub(super) fn wound(
        &mut self,
        source: Option<CombatantId>,
        target: CombatantId,
        amount: u32,
    ) -> DamageTaken {
        let Some(unit) = self.combatant_mut(target) else {
            return DamageTaken::default();
        };
        let taken = unit.apply_damage(amount);
        let fell = !unit.is_alive();
        let name = unit.display_name().to_string();
        self.ledger.damage(source, target, taken.lost);
        if taken.absorbed > 0 {
            self.log(format!("{name}'s shield absorbs {}.", taken.absorbed));
        }
        if fell {
            self.scheduler.retire(target);
            self.emit(CombatEvent::Defeated(target));
            self.log(format!("{name} falls."));
        }
        taken
    }

    /// Ends the turn when AP ran out or one side is down.
    pub(super) fn after_action(&mut self) -> Result<(), ActionError> {
        self.emit(CombatEvent::Refresh);
        let Some(actor) = self.current_actor() else {
            return Ok(());
        };
        let decided =
            !self.party.any_alive() || !self.enemies.iter().any(Combatant::is_alive);
        if decided || self.ap(actor) == 0 {
            self.finish_turn(0)?;
        }
        Ok(())
    }

    pub(super) fn log(&mut self, line: String) {
        self.events.push_back(CombatEvent::Log(line));
    }

    pub(super) fn emit(&mut self, event: CombatEvent) {
        self.events.push_back(event);
    }
}

fn threshold_of(
    party: &Party,
    enemies: &[EnemyInstance],
    config: &CombatConfig,
    id: CombatantId,
) -> f64 {
    let unit = match id {
        CombatantId::Ally(member) => party.member(member).map(|m| m as &dyn Combatant),
        CombatantId::Enemy(index) => enemies.get(index).map(|e| e as &dyn Combatant),
    };
    unit.map_or(f64::INFINITY, |c| c.atb_threshold(config))
}

pub(super) fn crit_tag(critical: bool) -> &'static str {
    if critical { " (CRIT)" } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::status::{StatusEffect, StatusKind};
    use crate::combat::testing::{FixedRng, arena, enemy, env, fixtures};
    use crate::env::Tier;

    #[test]
    fn session_requires_both_sides() {
        let (abilities, items) = fixtures();
        let config = GameConfig::default();
        let mut party = arena(1);
        assert!(matches!(
            CombatSession::with_enemies(
                &mut party,
                Vec::new(),
                env(&abilities, &items),
                &config,
                FixedRng(0),
            ),
            Err(CombatError::EmptyEncounter)
        ));

        let mut empty = Party::new(&config.progression);
        assert!(matches!(
            CombatSession::with_enemies(
                &mut empty,
                vec![enemy("Wolf", Tier::Normal, 20)],
                env(&abilities, &items),
                &config,
                FixedRng(0),
            ),
            Err(CombatError::EmptyParty)
        ));
    }

    #[test]
    fn first_turn_goes_to_the_faster_side() {
        let (abilities, items) = fixtures();
        let config = GameConfig::default();
        let mut party = arena(1);
        let mut session = CombatSession::with_enemies(
            &mut party,
            vec![enemy("Wolf", Tier::Normal, 20)],
            env(&abilities, &items),
            &config,
            FixedRng(0),
        )
        .unwrap();

        let mut started = None;
        for _ in 0..100 {
            if let Some(actor) = session.advance(0.1).unwrap() {
                started = Some(actor);
                break;
            }
        }
        // DEX 12 vs pace DEX 12: tie broken by registration order.
        assert_eq!(started, Some(CombatantId::Ally(MemberId(1))));
        assert_eq!(session.ap(CombatantId::Ally(MemberId(1))), 3);
        assert_eq!(session.turn_count(), 1);
        assert!(session.attack(0).is_ok());
        assert!(matches!(session.run_enemy_turn(), Err(ActionError::NotEnemyTurn)));
    }

    #[test]
    fn ending_a_turn_banks_capped_ap() {
        let (abilities, items) = fixtures();
        let config = GameConfig::default();
        let mut party = arena(1);
        let mut session = CombatSession::with_enemies(
            &mut party,
            vec![enemy("Ogre", Tier::Elite, 500)],
            env(&abilities, &items),
            &config,
            FixedRng(0),
        )
        .unwrap();
        let hero = CombatantId::Ally(MemberId(1));
        while session.current_actor() != Some(hero) {
            session.advance(0.1).unwrap();
            if session.is_enemy_turn() {
                session.run_enemy_turn().unwrap();
            }
        }
        session.end_turn().unwrap();
        assert_eq!(session.scheduler().carried(hero), Some(2));
        assert_eq!(session.party().members()[0].state().carried_ap, 2);
        assert!(matches!(session.end_turn(), Err(ActionError::NotAllyTurn)));
    }

    #[test]
    fn ledger_counts_hp_actually_lost() {
        let (abilities, items) = fixtures();
        let config = GameConfig::default();
        let mut party = arena(1);
        let mut session = CombatSession::with_enemies(
            &mut party,
            vec![enemy("Wolf", Tier::Normal, 20)],
            env(&abilities, &items),
            &config,
            FixedRng(0),
        )
        .unwrap();
        let hero = CombatantId::Ally(MemberId(1));
        let wolf = CombatantId::Enemy(0);
        session
            .combatant_mut(hero)
            .unwrap()
            .state_mut()
            .statuses
            .add(StatusEffect {
                source: "aegis".into(),
                kind: StatusKind::Shield { remaining: 10 },
                turns_left: 2,
                applied_on_turn: 1,
            });

        let taken = session.wound(Some(wolf), hero, 30);
        assert_eq!(taken, DamageTaken { absorbed: 10, lost: 20 });
        assert_eq!(session.ledger().get(MemberId(1)).taken, 20);

        let overkill = session.wound(Some(hero), wolf, 50);
        assert_eq!(overkill.lost, 20);
        assert_eq!(session.ledger().get(MemberId(1)).dealt, 20);
    }

    #[test]
    fn events_are_ordered_and_drained() {
        let (abilities, items) = fixtures();
        let config = GameConfig::default();
        let mut party = arena(1);
        let mut session = CombatSession::with_enemies(
            &mut party,
            vec![enemy("Wolf", Tier::Normal, 20)],
            env(&abilities, &items),
            &config,
            FixedRng(0),
        )
        .unwrap();
        let events = session.drain_events();
        assert_eq!(events.first(), Some(&CombatEvent::Log("Battle begins.".into())));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn flee_uses_its_chance() {
        let (abilities, items) = fixtures();
        let config = GameConfig::default();
        let mut party = arena(1);
        let mut session = CombatSession::with_enemies(
            &mut party,
            vec![enemy("Wolf", Tier::Normal, 20)],
            env(&abilities, &items),
            &config,
            FixedRng(u64::MAX),
        )
        .unwrap();
        assert!(matches!(session.flee(), Err(ActionError::NotAllyTurn)));
        while session.current_actor().is_none() {
            session.advance(0.1).unwrap();
        }
        // A maxed roll never clears the 50% bar.
        assert_eq!(session.flee(), Ok(false));
        assert_eq!(session.flee(), Ok(false));
        assert!(!session.is_over());
    }
}
