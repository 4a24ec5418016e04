//! State transitions for each phase of the encounter.
//!
//! Each function mutates the encounter state for one step and appends the
//! events it produced. Phase bookkeeping stays in [`super::Encounter`].

use super::event::{BattleEvent, Combatant, LogTone};
use crate::agility::TimingTier;
use crate::combat::{self, AttackRoll, CritTier, MonsterAction};
use crate::env::RandomSource;
use crate::progression::{self, ProgressSnapshot};
use crate::state::EncounterState;

pub(super) fn player_attack(
    state: &mut EncounterState,
    rng: &mut impl RandomSource,
    tier: TimingTier,
    events: &mut Vec<BattleEvent>,
) {
    events.push(BattleEvent::log("You attack!", LogTone::Neutral));
    events.push(BattleEvent::Timing { tier });
    events.push(BattleEvent::log(tier.feedback(), LogTone::Timing(tier)));

    let roll = combat::player_attack_damage(rng, state.player.level, tier.multiplier());
    events.push(hit_line(Combatant::Player, roll, LogTone::PlayerHit));

    let hp_before = state.monster.hp;
    state.monster.take_damage(roll.damage);
    events.push(BattleEvent::Damage {
        target: Combatant::Monster,
        amount: roll.damage,
        crit: roll.crit,
        hp_before,
        hp_after: state.monster.hp,
    });
    events.push(stats(state));

    // Experience is granted even for the killing blow.
    let gained = progression::apply_xp(&mut state.player, progression::xp_for_damage(roll.damage));
    for level_up in &gained {
        events.push(BattleEvent::log(
            format!("LEVEL UP! LVL {}", level_up.level),
            LogTone::LevelUp,
        ));
        events.push(BattleEvent::LevelUp {
            level: level_up.level,
        });
    }
    if !gained.is_empty() {
        events.push(stats(state));
    }
    events.push(BattleEvent::Progress(ProgressSnapshot::of(&state.player)));
}

pub(super) fn player_heal(
    state: &mut EncounterState,
    rng: &mut impl RandomSource,
    events: &mut Vec<BattleEvent>,
) {
    events.push(BattleEvent::log("You heal!", LogTone::Neutral));

    let amount = combat::player_heal_amount(rng, state.player.level);
    let hp_before = state.player.hp;
    state.player.heal(amount);

    events.push(BattleEvent::log(
        format!("Player heals for {amount} HP"),
        LogTone::Heal,
    ));
    events.push(BattleEvent::Heal {
        target: Combatant::Player,
        amount,
        hp_before,
        hp_after: state.player.hp,
    });
    events.push(stats(state));
}

pub(super) fn monster_turn(
    state: &mut EncounterState,
    rng: &mut impl RandomSource,
    events: &mut Vec<BattleEvent>,
) {
    match combat::choose_monster_action(rng) {
        MonsterAction::Attack => {
            events.push(BattleEvent::log("Monster attacks!", LogTone::Neutral));

            let base =
                combat::monster_base_damage(state.monster.max_hp, state.monster.damage_multiplier());
            let roll = combat::monster_attack_damage(rng, base);
            events.push(hit_line(Combatant::Monster, roll, LogTone::MonsterHit));

            let hp_before = state.player.hp;
            state.player.take_damage(roll.damage);
            events.push(BattleEvent::Damage {
                target: Combatant::Player,
                amount: roll.damage,
                crit: roll.crit,
                hp_before,
                hp_after: state.player.hp,
            });
            events.push(stats(state));
        }
        MonsterAction::Heal => {
            events.push(BattleEvent::log("Monster heals!", LogTone::Neutral));

            let amount = combat::monster_heal_amount(rng, state.round);
            let hp_before = state.monster.hp;
            state.monster.heal(amount);

            events.push(BattleEvent::log(
                format!("Monster heals for {amount} HP"),
                LogTone::Heal,
            ));
            events.push(BattleEvent::Heal {
                target: Combatant::Monster,
                amount,
                hp_before,
                hp_after: state.monster.hp,
            });
            events.push(stats(state));
        }
    }
}

pub(super) fn defeat(who: Combatant, events: &mut Vec<BattleEvent>) {
    let message = match who {
        Combatant::Monster => "The monster is defeated!",
        Combatant::Player => "You have fallen!",
    };
    events.push(BattleEvent::log(message, LogTone::Defeat));
    events.push(BattleEvent::Defeated { who });
}

pub(super) fn round_transition(
    state: &mut EncounterState,
    defeated: Combatant,
    events: &mut Vec<BattleEvent>,
) {
    state.advance_round(defeated);

    let message = match defeated {
        Combatant::Monster => format!(
            "Round {}: a stronger monster appears ({} HP)",
            state.round, state.monster.max_hp
        ),
        Combatant::Player => format!("Round {}: you rise again", state.round),
    };
    events.push(BattleEvent::log(message, LogTone::Defeat));
    events.push(BattleEvent::RoundAdvanced {
        round: state.round,
        monster_max_hp: state.monster.max_hp,
        damage_multiplier: state.monster.damage_multiplier(),
    });
    events.push(stats(state));
}

fn hit_line(attacker: Combatant, roll: AttackRoll, plain: LogTone) -> BattleEvent {
    let target = attacker.opponent();
    match roll.crit {
        CritTier::None => BattleEvent::log(
            format!("{attacker} hits {target} for {}", roll.damage),
            plain,
        ),
        crit => BattleEvent::log(
            format!("{attacker} hits {target} for {} ({crit} Crit!)", roll.damage),
            LogTone::Crit(crit),
        ),
    }
}

pub(super) fn stats(state: &EncounterState) -> BattleEvent {
    BattleEvent::Stats {
        player_hp: state.player.hp,
        monster_hp: state.monster.hp,
        monster_max_hp: state.monster.max_hp,
    }
}
