//! Ability resolution.
//!
//! Abilities are data: a cost, a target selector and a list of effects. This
//! module validates a use, resolves targets, pays the cost and applies each
//! effect through the generic effect interpreter below.

use rand::{Rng, RngCore};
use tracing::debug;

use super::atb::SchedulerError;
use super::damage::{damage_for, strike};
use super::entity::{Combatant, CombatantId};
use super::error::ActionError;
use super::session::{CombatSession, crit_tag};
use super::status::{StatusEffect, StatusKind};
use crate::env::{AbilityDefinition, AbilityEffect, TargetSelector};
use crate::party::MemberId;
use crate::stats::{AttributeBlock, DerivedStats};

/// AP an ability costs after a pending reduction. Never below 1 for an
/// ability that costs anything.
pub fn ability_cost(ability: &AbilityDefinition, reduction: u32) -> u32 {
    if ability.ap_cost == 0 {
        return 0;
    }
    ability.ap_cost.saturating_sub(reduction).max(1)
}

/// Resolves a selector against the living combatants.
///
/// `allies` and `enemies` list the living members of each side in formation
/// order. Selectors that need a chosen target reject anything that is not a
/// living member of the right side.
pub fn select_targets(
    selector: TargetSelector,
    chosen: Option<CombatantId>,
    caster: MemberId,
    allies: &[MemberId],
    enemies: &[usize],
) -> Result<Vec<CombatantId>, ActionError> {
    let chosen_ally = || match chosen {
        Some(CombatantId::Ally(id)) if allies.contains(&id) => Ok(id),
        _ => Err(ActionError::InvalidTarget),
    };
    let chosen_enemy = || match chosen {
        Some(CombatantId::Enemy(index)) => enemies
            .iter()
            .position(|&living| living == index)
            .ok_or(ActionError::InvalidTarget),
        _ => Err(ActionError::InvalidTarget),
    };

    let targets = match selector {
        TargetSelector::Caster => vec![CombatantId::Ally(caster)],
        TargetSelector::Ally => vec![CombatantId::Ally(chosen_ally()?)],
        TargetSelector::Enemy => vec![CombatantId::Enemy(enemies[chosen_enemy()?])],
        TargetSelector::AllAllies => allies.iter().copied().map(CombatantId::Ally).collect(),
        TargetSelector::AllEnemies => enemies.iter().copied().map(CombatantId::Enemy).collect(),
        TargetSelector::EnemyLine(count) => {
            let start = chosen_enemy()?;
            enemies[start..]
                .iter()
                .take(usize::from(count.max(1)))
                .copied()
                .map(CombatantId::Enemy)
                .collect()
        }
    };
    if targets.is_empty() {
        return Err(ActionError::InvalidTarget);
    }
    Ok(targets)
}

/// Caster-side numbers captured once per ability use.
struct Caster {
    id: CombatantId,
    stats: DerivedStats,
    attributes: AttributeBlock,
    crit_bonus: f64,
}

impl<'p, R: RngCore> CombatSession<'p, R> {
    /// Uses an unlocked ability during the current ally's turn.
    ///
    /// Validation runs in order (turn, unknown, locked, cooldown, AP,
    /// targets) and a rejected use changes nothing.
    pub fn use_ability(
        &mut self,
        key: &str,
        target: Option<CombatantId>,
    ) -> Result<(), ActionError> {
        let caster_id = self.ally_turn()?;
        let actor = CombatantId::Ally(caster_id);
        let abilities = self.abilities;
        let ability = abilities
            .ability(key)
            .ok_or_else(|| ActionError::UnknownAbility(key.to_string()))?;
        let member = self
            .party
            .member(caster_id)
            .ok_or(ActionError::Scheduler(SchedulerError::UnknownEntity(actor)))?;
        if !ability.usable_by(member.class(), member.level()) {
            return Err(ActionError::AbilityLocked(key.to_string()));
        }
        let state = member.state();
        let turns = state.cooldown(key);
        if turns > 0 {
            return Err(ActionError::AbilityOnCooldown {
                key: key.to_string(),
                turns,
            });
        }
        let reduction = state.statuses.cost_reduction();
        let cost = ability_cost(ability, reduction);
        self.require_ap(actor, cost)?;
        let targets = select_targets(
            ability.target,
            target,
            caster_id,
            &self.living_allies(),
            &self.living_enemies(),
        )?;

        let caster = Caster {
            id: actor,
            stats: member.effective_stats(),
            attributes: *member.attributes(),
            crit_bonus: ability.crit_bonus(),
        };
        if let Some(unit) = self.combatant_mut(actor) {
            let state = unit.state_mut();
            if reduction > 0 && ability.ap_cost > 0 {
                state.statuses.take_cost_reduction();
            }
            state.ap = state.ap.saturating_sub(cost);
            state.start_cooldown(key, ability.cooldown);
        }
        let line = format!("{} uses {}.", self.name_of(actor), ability.name);
        self.log(line);
        debug!(%actor, ability = key, cost, targets = targets.len(), "ability");

        for target in targets {
            for effect in &ability.effects {
                if !self.is_alive(target) {
                    break;
                }
                self.apply_effect(&caster, &ability.key, effect, target);
            }
        }
        self.after_action()
    }

    /// Abilities the member has unlocked, with their current cost and
    /// remaining cooldown.
    pub fn ability_menu(&self, member: MemberId) -> Vec<(&'p AbilityDefinition, u32, u8)> {
        let abilities = self.abilities;
        let Some(member) = self.party.member(member) else {
            return Vec::new();
        };
        let state = member.state();
        abilities
            .abilities_for(member.class(), member.level())
            .into_iter()
            .map(|ability| {
                (
                    ability,
                    ability_cost(ability, state.statuses.cost_reduction()),
                    state.cooldown(&ability.key),
                )
            })
            .collect()
    }

    fn apply_effect(
        &mut self,
        caster: &Caster,
        source: &str,
        effect: &AbilityEffect,
        target: CombatantId,
    ) {
        let name = self.name_of(target);
        match *effect {
            AbilityEffect::Damage { kind, power } => {
                let Ok(defender) = self.stats_of(target) else {
                    return;
                };
                let base = damage_for(kind, &caster.stats, &defender, power, &mut self.rng);
                let hit = strike(
                    base,
                    caster.stats.crit_pct + caster.crit_bonus,
                    self.config.crit_multiplier,
                    &mut self.rng,
                );
                self.log(format!("{name} takes {}{}.", hit.damage, crit_tag(hit.critical)));
                self.wound(Some(caster.id), target, hit.damage);
            }
            AbilityEffect::Heal { scaling } => {
                let amount = scaling.amount(&caster.attributes);
                let healed = self
                    .combatant_mut(target)
                    .map_or(0, |unit| unit.heal(amount));
                if let (CombatantId::Ally(from), CombatantId::Ally(to)) = (caster.id, target) {
                    self.ledger.heal(from, to, healed);
                }
                self.log(format!("{name} recovers {healed} HP."));
            }
            AbilityEffect::Shield { scaling, duration } => {
                let remaining = scaling.amount(&caster.attributes);
                self.afflict(target, source, StatusKind::Shield { remaining }, duration);
                self.log(format!("{name} is shielded for {remaining}."));
            }
            AbilityEffect::Buff {
                stat,
                change,
                duration,
            } => {
                self.afflict(target, source, StatusKind::Buff { stat, change }, duration);
                self.log(format!("{name} gains {stat}."));
            }
            AbilityEffect::Debuff {
                stat,
                change,
                duration,
            } => {
                let resist = self.stats_of(target).map_or(0.0, |s| s.status_resist_pct);
                if self.rng.gen_bool((resist / 100.0).clamp(0.0, 1.0)) {
                    self.log(format!("{name} resists."));
                    return;
                }
                self.afflict(target, source, StatusKind::Debuff { stat, change }, duration);
                self.log(format!("{name} suffers {stat} down."));
            }
            AbilityEffect::Poison {
                chance_pct,
                potency,
                duration,
            } => {
                let resist = self.stats_of(target).map_or(0.0, |s| s.status_resist_pct);
                let chance = chance_pct * caster.stats.status_apply_scalar - resist;
                if !self.rng.gen_bool((chance / 100.0).clamp(0.0, 1.0)) {
                    self.log(format!("{name} shrugs off the poison."));
                    return;
                }
                self.afflict(target, source, StatusKind::Poison { potency }, duration);
                self.log(format!("{name} is poisoned."));
            }
            AbilityEffect::GainNextTurnAp { amount } => {
                self.afflict(target, source, StatusKind::BonusAp { amount }, 1);
                self.log(format!("{name} will gain +{amount} AP next turn."));
            }
            AbilityEffect::CostReduction { amount } => {
                self.afflict(target, source, StatusKind::CostReduction { amount }, 1);
            }
            AbilityEffect::ResetCooldowns { max } => {
                let cleared = self
                    .combatant_mut(target)
                    .map_or(0, |unit| unit.state_mut().reset_cooldowns(max));
                if cleared > 0 {
                    self.log(format!("{name}'s cooldowns reset."));
                }
            }
            AbilityEffect::CritBonus { .. } => {}
        }
    }

    fn afflict(&mut self, target: CombatantId, source: &str, kind: StatusKind, duration: u8) {
        let effect = StatusEffect {
            source: source.to_string(),
            kind,
            turns_left: duration.max(1),
            applied_on_turn: self.turn_count,
        };
        let added = self
            .combatant_mut(target)
            .is_some_and(|unit| unit.state_mut().statuses.add(effect));
        if !added {
            debug!(%target, source, "status list full; effect dropped");
        }
    }
}
