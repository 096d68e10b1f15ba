//! Enemy turns.
//!
//! An enemy picks one living ally by its AI behavior and swings at it up to
//! `min(max_enemy_swings, AP)` times (at least once), stopping early if the
//! target falls. Enemy turns never bank AP.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::debug;

use super::damage::strike;
use super::entity::{Combatant, CombatantId};
use super::error::ActionError;
use super::events::CombatEvent;
use super::session::{CombatPhase, CombatSession, crit_tag};
use crate::env::AiBehavior;
use crate::party::MemberId;

/// Chooses a target among `(id, current_hp)` candidates.
///
/// `LowestHp` takes the first candidate with the least HP; `Random` draws
/// uniformly.
pub fn pick_target<R: Rng + ?Sized>(
    ai: AiBehavior,
    candidates: &[(MemberId, u32)],
    rng: &mut R,
) -> Option<MemberId> {
    match ai {
        AiBehavior::LowestHp => candidates.iter().min_by_key(|(_, hp)| *hp).map(|(id, _)| *id),
        AiBehavior::Random => candidates.choose(rng).map(|(id, _)| *id),
    }
}

/// One enemy swing before crits: `max(1, atk + roll − floor(def))`.
pub fn swing_damage(atk: i32, roll: u32, def: f64) -> u32 {
    let raw = i64::from(atk) + i64::from(roll) - def.floor() as i64;
    raw.max(1) as u32
}

impl<R: RngCore> CombatSession<'_, R> {
    /// Resolves the current enemy's turn and closes it.
    pub fn run_enemy_turn(&mut self) -> Result<(), ActionError> {
        let index = match self.phase {
            CombatPhase::Ended(_) => return Err(ActionError::CombatEnded),
            CombatPhase::ActorTurn(CombatantId::Enemy(index)) => index,
            _ => return Err(ActionError::NotEnemyTurn),
        };
        let actor = CombatantId::Enemy(index);
        let Some(enemy) = self.enemies.get(index) else {
            self.finish_turn(0)?;
            return Ok(());
        };
        let ai = enemy.ai;
        let die = enemy.damage;
        let attack = enemy.effective_stats().p_atk;
        let swings = enemy
            .state()
            .ap
            .min(self.config.max_enemy_swings)
            .max(1);
        let name = enemy.display_name().to_string();

        let candidates: Vec<(MemberId, u32)> = self
            .party
            .members()
            .iter()
            .filter(|m| m.is_alive())
            .map(|m| (m.id, m.hp()))
            .collect();
        let Some(victim) = pick_target(ai, &candidates, &mut self.rng) else {
            self.finish_turn(0)?;
            return Ok(());
        };
        let target = CombatantId::Ally(victim);
        let target_name = self.name_of(target);
        debug!(%actor, %target, swings, "enemy turn");

        for _ in 0..swings {
            if !self.is_alive(target) {
                break;
            }
            let evasion = self
                .combatant(target)
                .map_or(0.0, |c| c.state().statuses.evasion_pct());
            if evasion > 0.0 && self.rng.gen_bool(evasion / 100.0) {
                self.log(format!("{name} misses {target_name}."));
                continue;
            }
            let def = self.stats_of(target)?.def;
            let roll = die.roll(&mut self.rng);
            let hit = strike(
                swing_damage(attack, roll, def),
                self.config.enemy_crit_pct,
                self.config.crit_multiplier,
                &mut self.rng,
            );
            self.log(format!(
                "{name} hits {target_name} for {}{}.",
                hit.damage,
                crit_tag(hit.critical)
            ));
            self.wound(Some(actor), target, hit.damage);
        }

        self.emit(CombatEvent::Refresh);
        self.finish_turn(0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::combat::testing::{FixedRng, arena, enemy, env, fixtures};
    use crate::combat::CombatOutcome;
    use crate::config::GameConfig;
    use crate::env::{PcgRng, Tier};

    fn enemy_turn<R: RngCore>(session: &mut CombatSession<'_, R>) {
        loop {
            match session.current_actor() {
                Some(CombatantId::Enemy(_)) => break,
                Some(CombatantId::Ally(_)) => session.end_turn().unwrap(),
                None => {
                    session.advance(0.1).unwrap();
                }
            }
        }
    }

    #[test]
    fn lowest_hp_takes_the_first_minimum() {
        let candidates = [(MemberId(1), 40), (MemberId(2), 12), (MemberId(3), 12)];
        let mut rng = FixedRng(0);
        assert_eq!(
            pick_target(AiBehavior::LowestHp, &candidates, &mut rng),
            Some(MemberId(2))
        );
        assert_eq!(pick_target(AiBehavior::Random, &[], &mut rng), None);
    }

    #[test]
    fn random_targets_spread_out() {
        let candidates = [(MemberId(1), 40), (MemberId(2), 12)];
        let mut rng = PcgRng::seed_from_u64(3);
        let firsts = (0..200)
            .filter(|_| pick_target(AiBehavior::Random, &candidates, &mut rng) == Some(MemberId(1)))
            .count();
        assert!((50..=150).contains(&firsts), "firsts = {firsts}");
    }

    #[test]
    fn swings_never_drop_below_one() {
        assert_eq!(swing_damage(3, 1, 9.6), 1);
        assert_eq!(swing_damage(12, 4, 9.6), 7);
        assert_eq!(swing_damage(-5, 0, 0.0), 1);
    }

    #[test]
    fn focus_fire_on_the_weakest() {
        let (abilities, items) = fixtures();
        let config = GameConfig::default();
        let mut party = arena(2);
        party.members_mut()[1].set_hp(50);
        let mut foe = enemy("Ghoul", Tier::Normal, 40);
        foe.ai = AiBehavior::LowestHp;
        let mut session = CombatSession::with_enemies(
            &mut party,
            vec![foe],
            env(&abilities, &items),
            &config,
            FixedRng(0),
        )
        .unwrap();
        enemy_turn(&mut session);
        session.run_enemy_turn().unwrap();

        // Three swings of max(1, 3 + 1 − 9), each a crit that floors back to 1.
        assert_eq!(session.party().members()[0].hp(), 216);
        assert_eq!(session.party().members()[1].hp(), 47);
        assert_eq!(session.ledger().get(MemberId(2)).taken, 3);
        assert_eq!(session.phase(), CombatPhase::WaitingForReady);
        assert_eq!(
            session.scheduler().carried(CombatantId::Enemy(0)),
            Some(0)
        );
        assert_eq!(session.run_enemy_turn(), Err(ActionError::NotEnemyTurn));
    }

    #[test]
    fn swings_stop_when_the_target_falls() {
        let (abilities, items) = fixtures();
        let config = GameConfig::default();
        let mut party = arena(1);
        party.members_mut()[0].set_hp(1);
        let mut session = CombatSession::with_enemies(
            &mut party,
            vec![enemy("Wolf", Tier::Normal, 40)],
            env(&abilities, &items),
            &config,
            FixedRng(0),
        )
        .unwrap();
        enemy_turn(&mut session);
        session.drain_events();
        session.run_enemy_turn().unwrap();

        let events = session.drain_events();
        let hits = events
            .iter()
            .filter_map(CombatEvent::as_log)
            .filter(|line| line.starts_with("Wolf hits"))
            .count();
        assert_eq!(hits, 1);
        assert!(events.contains(&CombatEvent::Log("Your party falls…".into())));
        assert_eq!(session.outcome(), Some(CombatOutcome::Defeat));
        let summary = session.summary().unwrap();
        assert_eq!(summary.rewards, None);
        assert_eq!(summary.members[0].stats.taken, 1);
        assert_eq!(session.run_enemy_turn(), Err(ActionError::CombatEnded));
    }
}
